//! Balise agent - standalone error ingest server
//!
//! This crate provides the `balise-agent` binary, a stateless HTTP endpoint
//! that receives error records from browser-side reporters, writes them to
//! an injected log sink, and acknowledges receipt. It keeps nothing: no
//! persistence, no deduplication, no auth. A best-effort sink must never
//! become a blocking dependency for the reporting application's own error
//! paths.

pub mod server;
pub mod sink;

pub use server::{DEFAULT_PORT, router, run_server, serve};
pub use sink::{LogSink, TracingSink};
