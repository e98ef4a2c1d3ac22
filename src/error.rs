//! Error types for the descriptor database.
//!
//! The detector itself never fails: insufficient history and degenerate
//! scans are reported as ordinary "no loop" results. Errors only arise
//! from read access with an invalid node index.

use thiserror::Error;

/// Errors that can occur when reading from the descriptor database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("node index {index} out of range ({len} scans stored)")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
