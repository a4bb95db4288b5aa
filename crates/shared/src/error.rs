use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A REST call that never produced a usable response: the connection failed,
/// the backend answered with a non-2xx status, or the body was not the
/// expected JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("REST call failed ({}): {body}", status_label(.status))]
pub struct RestFailure {
    /// HTTP status, `None` when no response arrived at all.
    pub status: Option<u16>,
    /// Raw response body, or the transport error text.
    pub body: String,
}

impl RestFailure {
    pub fn new(status: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::new(Some(status), body)
    }

    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::new(None, reason)
    }

    pub fn has_status(&self, status: u16) -> bool {
        self.status == Some(status)
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!("HTTP {status}"),
        None => "no response".to_string(),
    }
}
