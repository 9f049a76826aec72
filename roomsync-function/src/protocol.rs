use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use roomsync_core::ConfigOverrides;

/// Invocation parameters. Configuration keys override the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionRequest {
    #[serde(flatten)]
    pub config: ConfigOverrides,
    /// Sync destination → source instead.
    #[serde(default)]
    pub reverse: bool,
    /// Compute the missing set without adding anyone.
    #[serde(default)]
    pub dry_run: bool,
}

/// `{ statusCode, body }` pair returned to the invoking host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub status_code: u16,
    pub body: Value,
}

impl ActionResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    pub fn error(status_code: u16, message: impl Into<String>, upstream: Option<u16>) -> Self {
        let mut body = json!({ "error": message.into() });
        if let Some(status) = upstream {
            body["status"] = json!(status);
        }
        Self { status_code, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
