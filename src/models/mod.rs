pub mod enums;
pub mod lab;
pub mod medication;

pub use lab::*;
pub use medication::*;
