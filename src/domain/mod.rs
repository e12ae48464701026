pub mod audit;
pub mod records;
pub mod report;
pub mod ruleset;

pub use audit::*;
pub use records::*;
pub use report::*;
pub use ruleset::*;
