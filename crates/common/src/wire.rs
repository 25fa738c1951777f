//! Acknowledgment shapes returned by the ingest endpoint.

use serde::{Deserialize, Serialize};

/// Successful acknowledgment: the record reached the log sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestAck {
    /// Always `true` in this shape.
    pub success: bool,
    /// Always `true`; the record was written to the sink.
    pub logged: bool,
    /// Echo of the record's `id`.
    #[serde(rename = "errorId")]
    pub error_id: String,
}

impl IngestAck {
    /// Acknowledge the record with the given id.
    pub fn logged(error_id: impl Into<String>) -> Self {
        Self {
            success: true,
            logged: true,
            error_id: error_id.into(),
        }
    }
}

/// Failure response. Malformed input and sink failures share this shape;
/// callers only branch on `success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFailure {
    /// Always `false` in this shape.
    pub success: bool,
    /// Stable failure label.
    pub error: String,
    /// Human-readable diagnostic.
    pub message: String,
}

impl IngestFailure {
    /// Build the failure body with the given diagnostic.
    pub fn failed_to_log(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: "Failed to log error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_ack_wire_shape() {
        let json = serde_json::to_value(IngestAck::logged("abc")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "logged": true, "errorId": "abc"})
        );
    }

    #[test]
    fn test_failure_wire_shape() {
        let json = serde_json::to_value(IngestFailure::failed_to_log("bad json")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to log error");
        assert_eq!(json["message"], "bad json");
    }
}
