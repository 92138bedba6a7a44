use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::enums::{BetterDirection, Trend};
use crate::models::{LabReport, LabTestResult};

use super::canonical::{canonicalize_test_name, parse_numeric, CanonicalTest};

/// Latest movement of one lab test concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub canonical_name: String,
    /// Display text of the newest observation.
    pub current_value: String,
    /// Display text of the second-newest observation; `None` on a first report.
    pub previous_value: Option<String>,
    pub trend: Trend,
    pub unit: String,
    pub data_points: usize,
}

struct Observation {
    result: LabTestResult,
    numeric: Option<f64>,
    /// Position in the input, used to order results sharing a report date.
    seq: usize,
}

/// One trend per canonical test, in order of first appearance.
///
/// Only the two newest parseable values are compared. Older history never
/// affects the trend. A test seen once is reported `Stable`, which is a
/// display convention, not a clinical statement.
pub fn analyze_trends(reports: &[LabReport]) -> Vec<TrendResult> {
    let results: Vec<TrendResult> = group_observations(reports)
        .into_iter()
        .filter_map(|(test, observations)| summarize(&test, observations))
        .collect();
    tracing::debug!(
        reports = reports.len(),
        tests = results.len(),
        "Lab trend analysis complete"
    );
    results
}

/// Parseable values for one test concept, oldest first, for charting.
pub fn history(reports: &[LabReport], test: &CanonicalTest) -> Vec<(NaiveDateTime, f64)> {
    let mut points: Vec<(NaiveDateTime, usize, f64)> = reports
        .iter()
        .flat_map(|r| r.results())
        .enumerate()
        .filter(|(_, r)| canonicalize_test_name(&r.raw_name) == *test)
        .filter_map(|(seq, r)| parse_numeric(&r.value).map(|v| (r.report_date, seq, v)))
        .collect();
    points.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    points.into_iter().map(|(date, _, v)| (date, v)).collect()
}

fn group_observations(reports: &[LabReport]) -> Vec<(CanonicalTest, Vec<Observation>)> {
    let mut groups: Vec<(CanonicalTest, Vec<Observation>)> = Vec::new();
    let mut index: HashMap<CanonicalTest, usize> = HashMap::new();

    let all = reports.iter().flat_map(|r| r.results()).enumerate();
    for (seq, result) in all {
        if result.raw_name.trim().is_empty() {
            tracing::debug!(report_id = %result.report_id, "Skipping lab result without a name");
            continue;
        }
        let test = canonicalize_test_name(&result.raw_name);
        let numeric = parse_numeric(&result.value);
        if numeric.is_none() {
            tracing::debug!(
                test = %test.display_name(),
                value = %result.value,
                "Lab value not numeric, excluded from trend"
            );
        }

        let pos = match index.get(&test) {
            Some(&pos) => pos,
            None => {
                index.insert(test.clone(), groups.len());
                groups.push((test, Vec::new()));
                groups.len() - 1
            }
        };
        groups[pos].1.push(Observation {
            result,
            numeric,
            seq,
        });
    }
    groups
}

fn summarize(test: &CanonicalTest, mut observations: Vec<Observation>) -> Option<TrendResult> {
    // Newest first; on equal dates the later input counts as newer.
    observations.sort_by(|a, b| {
        b.result
            .report_date
            .cmp(&a.result.report_date)
            .then(b.seq.cmp(&a.seq))
    });

    let newest = observations.first()?;
    let previous = observations.get(1);

    let parsed: Vec<f64> = observations.iter().filter_map(|o| o.numeric).take(2).collect();
    let trend = match parsed.as_slice() {
        [current, prior, ..] => compare(*current, *prior, test.direction()),
        _ => Trend::Stable,
    };

    Some(TrendResult {
        canonical_name: test.display_name().to_string(),
        current_value: newest.result.display_value(),
        previous_value: previous.map(|o| o.result.display_value()),
        trend,
        unit: newest.result.unit.trim().to_string(),
        data_points: observations.len(),
    })
}

fn compare(current: f64, previous: f64, direction: BetterDirection) -> Trend {
    if current == previous {
        return Trend::Stable;
    }
    let improved = match direction {
        BetterDirection::Lower => current < previous,
        BetterDirection::Higher => current > previous,
    };
    if improved {
        Trend::Improved
    } else {
        Trend::Degraded
    }
}
