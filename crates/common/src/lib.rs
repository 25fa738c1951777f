//! Shared types for the balise error reporting pipeline
//!
//! This crate contains the error record data model and the wire shapes
//! used by both the `balise-reporter` client and the `balise-agent` server.

pub mod record;
pub mod wire;

// Re-export commonly used types
pub use record::{Context, ErrorRecord, Severity};
pub use wire::{IngestAck, IngestFailure};
