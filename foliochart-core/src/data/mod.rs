//! Timeline loading, validation and synthetic generation

pub mod response;
pub mod synthetic;
pub mod validate;

pub use response::{load_response, parse_response, tag_baselines, BacktestResponse, LoadError};
pub use synthetic::{synthetic_timeline, SyntheticOptions};
pub use validate::{validate_timeline, TimelineIssue};
