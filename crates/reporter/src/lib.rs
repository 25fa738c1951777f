//! HTTP client for delivering error records to the balise ingest endpoint.
//!
//! The reporter is deliberately fire-and-forget: [`Reporter::report`] maps
//! every outcome, including transport failures, to a [`ReportOutcome`]
//! value. Error-reporting code must never be able to crash the host
//! application, so nothing here panics or returns `Err` to the caller.

use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use balise_common::{Context, ErrorRecord, IngestAck, Severity};

const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Context key recording a severity value that had to be coerced.
const SEVERITY_NOTE_KEY: &str = "severityNote";

/// Optional fields accepted by [`Reporter::report`].
///
/// Severity is carried as a plain string on purpose: the caller-facing
/// contract tolerates unknown values and coerces them rather than failing.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Multi-line stack trace, if one was captured.
    pub stack: Option<String>,
    /// Opaque identifier of the acting user.
    pub user_id: Option<String>,
    /// Caller-supplied diagnostic data.
    pub context: Option<Context>,
    /// Severity token; absent or unrecognized values become `medium`.
    pub severity: Option<String>,
}

/// Result of one report attempt. Inspected, never thrown.
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Whether the ingest endpoint acknowledged the record.
    pub success: bool,
    /// The record id acknowledged by the endpoint, on success.
    pub error_id: Option<String>,
    /// Diagnostic describing the failure, on failure.
    pub error: Option<String>,
}

impl ReportOutcome {
    fn acked(error_id: String) -> Self {
        Self {
            success: true,
            error_id: Some(error_id),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            error_id: None,
            error: Some(error),
        }
    }
}

/// Client-side reporter: builds an [`ErrorRecord`] from an observed failure
/// and delivers it to the configured ingest endpoint in a single POST.
#[derive(Debug, Clone)]
pub struct Reporter {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl Reporter {
    /// Create a reporter targeting the given ingest endpoint URL, with the
    /// default request timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, String> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a reporter with an explicit request timeout. The timeout
    /// bounds the only suspension point in [`report`](Self::report), so a
    /// reporting failure can never stall the host application indefinitely.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, String> {
        let client = build_client()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    /// Report one observed failure.
    ///
    /// Builds a record with a fresh id and the current timestamp, sends it
    /// as one JSON POST, and interprets the acknowledgment. Every failure
    /// mode (invalid input, network error, timeout, non-2xx status,
    /// malformed acknowledgment) resolves to `success: false`; no retry is
    /// performed. Re-invoking for the same semantic failure produces a new
    /// record with a new id.
    pub async fn report(
        &self,
        error_code: &str,
        message: &str,
        options: ReportOptions,
    ) -> ReportOutcome {
        let record = match build_record(error_code, message, options) {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, "Refusing to send invalid error record.");
                return ReportOutcome::failed(err);
            }
        };
        self.send(&record).await
    }

    async fn send(&self, record: &ErrorRecord) -> ReportOutcome {
        debug!(id = %record.id, endpoint = %self.endpoint, "Sending error report.");
        let response = match self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(record)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, id = %record.id, "Error report request failed.");
                return ReportOutcome::failed(format!("Report request failed: {err}"));
            }
        };

        if response.status() != StatusCode::OK {
            warn!(status = %response.status(), id = %record.id, "Ingest endpoint rejected report.");
            return ReportOutcome::failed(format!(
                "Report request failed with status {}",
                response.status()
            ));
        }

        match response.json::<IngestAck>().await {
            Ok(ack) if ack.success => {
                debug!(error_id = %ack.error_id, "Error report acknowledged.");
                ReportOutcome::acked(ack.error_id)
            }
            Ok(_) => ReportOutcome::failed("Ingest endpoint reported failure".to_string()),
            Err(err) => {
                warn!(error = %err, "Failed to parse ingest acknowledgment.");
                ReportOutcome::failed(format!("Failed to parse ingest acknowledgment: {err}"))
            }
        }
    }
}

/// Assemble the record to transmit. Unknown severities are coerced to
/// `medium` and noted in the record's context; empty code or message is the
/// one condition that refuses to produce a record at all.
fn build_record(
    error_code: &str,
    message: &str,
    options: ReportOptions,
) -> Result<ErrorRecord, String> {
    let (severity, note) = resolve_severity(options.severity.as_deref());

    let mut record = ErrorRecord::new(error_code, message, severity)?;
    record.stack = options.stack;
    record.user_id = options.user_id;

    let mut context = options.context;
    if let Some(note) = note {
        context
            .get_or_insert_with(Context::new)
            .insert(SEVERITY_NOTE_KEY.to_string(), serde_json::Value::String(note));
    }
    record.context = context;

    Ok(record)
}

/// Map an optional severity token to the closed set. Absent means the
/// default; unrecognized values coerce to the default with a note, never an
/// error visible to the caller.
fn resolve_severity(token: Option<&str>) -> (Severity, Option<String>) {
    match token {
        None => (Severity::default(), None),
        Some(token) => match token.parse::<Severity>() {
            Ok(severity) => (severity, None),
            Err(_) => {
                debug!(token, "Coercing unrecognized severity to medium.");
                (
                    Severity::default(),
                    Some(format!("unrecognized severity \"{token}\"; coerced to medium")),
                )
            }
        },
    }
}

fn build_client() -> Result<reqwest::Client, String> {
    reqwest::Client::builder().build().map_err(|err| {
        warn!(error = %err, "Failed to build report HTTP client.");
        format!("Failed to build HTTP client: {err}")
    })
}
