//! Error type shared by table loading, sampling and tree generation.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading tables or growing a tree.
///
/// Lookup misses and empty choice lists are data-integrity failures: the
/// generator never retries or rolls back, it surfaces them to the caller.
#[derive(Debug, Error)]
pub enum FamilyTreeError {
    #[error("no {table} entry for decade {decade}")]
    MissingDecade { table: &'static str, decade: i32 },

    #[error("no probability for surname rank {0}")]
    MissingRank(u32),

    #[error("{table} list for decade {decade} is empty")]
    EmptyChoices { table: &'static str, decade: i32 },

    #[error("invalid weights in {table} for decade {decade}: {reason}")]
    InvalidWeights {
        table: &'static str,
        decade: i32,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed row {line} in {file}: {message}")]
    MalformedRow {
        file: &'static str,
        line: u64,
        message: String,
    },

    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FamilyTreeError>;
