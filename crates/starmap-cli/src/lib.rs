//! Starmap command-line tools.
//!
//! `starmap-replay` feeds a JSON-lines file of recorded observations into an
//! engine and prints what the resulting system trees look like.

pub mod error;
pub mod replay;

pub use error::{Error, Result};
pub use replay::{replay, summarize, ReplayRecord, ReplayStats, SystemSummary};
