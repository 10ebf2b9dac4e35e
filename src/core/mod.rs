pub mod config;
pub mod error;
pub mod types;

pub use error::{ClinchError, Result};
pub use types::{MatchId, Side, Turn};
