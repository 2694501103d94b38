/// Query layer: target parsing, value flattening, batch evaluation.
pub mod errors;
pub mod evaluate;
pub mod normalize;
pub mod target;

pub use errors::QueryError;
pub use evaluate::{EvaluatedTarget, EvaluationMode, Outcome, evaluate};
pub use target::{Target, parse_target, read_target_file};
