use serde::{Deserialize, Serialize};

use crate::models::enums::Severity;
use crate::resolver::NameMatcher;

use super::resolver::{dedup_names, ConflictResolver};

/// Square severity grid over a medication list, for the interaction table view.
/// `cells[i][j]` equals `cells[j][i]`; the diagonal is always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionMatrix {
    pub names: Vec<String>,
    pub cells: Vec<Vec<Option<Severity>>>,
}

impl InteractionMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<Severity> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        self.cells[i][j]
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim().to_lowercase();
        self.names.iter().position(|n| n.to_lowercase() == name)
    }
}

impl<'kb, M: NameMatcher> ConflictResolver<'kb, M> {
    /// Build the grid with the same pair resolution as `find_conflicts`.
    pub fn interaction_matrix<S: AsRef<str>>(&self, names: &[S]) -> InteractionMatrix {
        let names = dedup_names(names, self.min_name_len());
        let n = names.len();
        let mut cells = vec![vec![None; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let severity = self.resolve_pair(&names[i], &names[j]).map(|c| c.severity);
                cells[i][j] = severity;
                cells[j][i] = severity;
            }
        }
        InteractionMatrix { names, cells }
    }
}

#[cfg(test)]
mod tests {
    use crate::interactions::ConflictResolver;
    use crate::knowledge::KnowledgeBase;
    use crate::models::enums::Severity;

    #[test]
    fn grid_is_symmetric_with_empty_diagonal() {
        let kb = KnowledgeBase::load_test();
        let resolver = ConflictResolver::new(&kb);
        let matrix = resolver.interaction_matrix(&["Warfarin", "Aspirin", "Metformin", "Lisinopril"]);

        assert_eq!(matrix.names.len(), 4);
        for i in 0..4 {
            assert!(matrix.cells[i][i].is_none());
            for j in 0..4 {
                assert_eq!(matrix.cells[i][j], matrix.cells[j][i]);
            }
        }
        assert_eq!(matrix.get("Warfarin", "Aspirin"), Some(Severity::High));
        assert_eq!(matrix.get("aspirin", "warfarin"), Some(Severity::High));
        assert_eq!(matrix.get("Metformin", "Lisinopril"), Some(Severity::Low));
        assert_eq!(matrix.get("Metformin", "Aspirin"), None);
    }

    #[test]
    fn axes_are_deduplicated() {
        let kb = KnowledgeBase::load_test();
        let resolver = ConflictResolver::new(&kb);
        let matrix = resolver.interaction_matrix(&["Warfarin", "WARFARIN", "x"]);
        assert_eq!(matrix.names, vec!["Warfarin".to_string()]);
        assert_eq!(matrix.cells, vec![vec![None]]);
    }

    #[test]
    fn unknown_name_lookup_is_none() {
        let kb = KnowledgeBase::load_test();
        let resolver = ConflictResolver::new(&kb);
        let matrix = resolver.interaction_matrix(&["Warfarin", "Aspirin"]);
        assert_eq!(matrix.get("Warfarin", "Digoxin"), None);
    }
}
