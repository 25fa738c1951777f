//! Error record data model.
//!
//! An [`ErrorRecord`] is built once by the reporter at the moment a failure
//! is observed and never mutated afterwards; retries resend the same value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Caller-supplied diagnostic data attached to a record.
///
/// Values are restricted to what JSON can carry; insertion order is
/// irrelevant.
pub type Context = serde_json::Map<String, serde_json::Value>;

/// Severity of a reported error. Closed set; anything else is rejected at
/// the parse boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Cosmetic or recoverable issue.
    Low,
    /// Default for anything unclassified.
    #[default]
    Medium,
    /// Degraded behavior visible to the user.
    High,
    /// Core functionality is broken.
    Critical,
}

impl Severity {
    /// Uppercased tag used when writing the record to a log sink.
    pub fn as_upper(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("Unknown severity: {other}")),
        }
    }
}

/// A single error event, as sent over the wire.
///
/// Field names serialize in camelCase to match the ingest endpoint's JSON
/// contract. Optional fields are omitted entirely when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    /// Unique identifier, generated at capture time.
    pub id: String,
    /// Capture time as an RFC 3339 UTC string, assigned by the client so
    /// that client-perceived ordering survives out-of-order ingestion.
    pub timestamp: String,
    /// Short machine-readable category. Never empty.
    pub error_code: String,
    /// Human-readable description. Never empty.
    pub message: String,
    /// Optional multi-line stack trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// Opaque identifier of the acting user; absent for anonymous sessions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Caller-supplied diagnostic data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    /// Severity classification.
    pub severity: Severity,
}

impl ErrorRecord {
    /// Create a record with a fresh id and the current capture timestamp.
    ///
    /// Rejects empty or whitespace-only `error_code`/`message`.
    pub fn new(
        error_code: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Result<Self, String> {
        let record = Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            error_code: error_code.into(),
            message: message.into(),
            stack: None,
            user_id: None,
            context: None,
            severity,
        };
        record.validate()?;
        Ok(record)
    }

    /// Check the non-empty invariants. Used server-side after
    /// deserialization, where serde alone cannot enforce them.
    pub fn validate(&self) -> Result<(), String> {
        if self.error_code.trim().is_empty() {
            return Err("errorCode must not be empty".to_string());
        }
        if self.message.trim().is_empty() {
            return Err("message must not be empty".to_string());
        }
        Ok(())
    }
}
