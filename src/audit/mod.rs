pub mod aggregate;
pub mod compose;
pub mod evaluator;
pub mod runner;
pub mod standards;

pub use aggregate::*;
pub use compose::*;
pub use evaluator::*;
pub use runner::*;
pub use standards::*;
