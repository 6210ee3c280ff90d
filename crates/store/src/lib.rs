//! Persistence collaborators for the analysis agent
//!
//! The agent treats all three as external: an append-only alert store, a
//! single-slot report store, and a best-effort Airtable audit sink.

use thiserror::Error;

pub mod airtable;
pub mod alerts;
pub mod report;

pub use airtable::AirtableSink;
pub use alerts::AlertStore;
pub use report::ReportStore;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
