//! Log sink abstraction for the ingest endpoint.
//!
//! The endpoint writes records through an injected [`LogSink`] rather than
//! straight to a process-wide stream, so its behavior can be exercised in
//! tests with a recording or failing sink.

use balise_common::{ErrorRecord, Severity};
use tracing::{error, info, warn};

/// A destination for accepted error records.
pub trait LogSink: Send + Sync {
    /// Write one structured record. A sink failure surfaces to the client
    /// as a failed acknowledgment; the record is not retried server-side.
    fn write(&self, record: &ErrorRecord) -> Result<(), String>;
}

/// Production sink that emits records as `tracing` events.
///
/// Each record becomes one event tagged with the uppercased severity and
/// carrying id, user id, context and client timestamp; a stack trace, when
/// present, is emitted as a separate event at the same level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &ErrorRecord) -> Result<(), String> {
        match record.severity {
            Severity::Critical | Severity::High => {
                error!(
                    severity = record.severity.as_upper(),
                    id = %record.id,
                    user_id = ?record.user_id,
                    context = ?record.context,
                    timestamp = %record.timestamp,
                    "[{}] {}",
                    record.error_code,
                    record.message
                );
                if let Some(stack) = &record.stack {
                    error!(id = %record.id, "{stack}");
                }
            }
            Severity::Medium => {
                warn!(
                    severity = record.severity.as_upper(),
                    id = %record.id,
                    user_id = ?record.user_id,
                    context = ?record.context,
                    timestamp = %record.timestamp,
                    "[{}] {}",
                    record.error_code,
                    record.message
                );
                if let Some(stack) = &record.stack {
                    warn!(id = %record.id, "{stack}");
                }
            }
            Severity::Low => {
                info!(
                    severity = record.severity.as_upper(),
                    id = %record.id,
                    user_id = ?record.user_id,
                    context = ?record.context,
                    timestamp = %record.timestamp,
                    "[{}] {}",
                    record.error_code,
                    record.message
                );
                if let Some(stack) = &record.stack {
                    info!(id = %record.id, "{stack}");
                }
            }
        }
        Ok(())
    }
}
