//! Results of calls that cross the process boundary.
//!
//! The UI bridge answers every call with a `{ success, data, error }` object.
//! [`Envelope`] is that object on the wire; [`RemoteResult`] is what the rest of
//! the code works with, so the success flag is checked exactly once, at decode
//! time.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a failed response carries no explanation.
pub const DEFAULT_FAILURE_MESSAGE: &str = "request failed";

/// Result of a remote call.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure of a remote call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The far side answered and refused the request.
    #[error("{0}")]
    Rejected(String),

    /// The call itself failed (channel closed, malformed response, timeout).
    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// The message as reported by the far side (or the transport), unprefixed.
    pub fn message(&self) -> &str {
        match self {
            RemoteError::Rejected(msg) | RemoteError::Transport(msg) => msg,
        }
    }
}

/// Wire shape of a bridge response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
            message: None,
        }
    }

    fn failure(self) -> RemoteError {
        let msg = self
            .error
            .or(self.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        RemoteError::Rejected(msg)
    }

    /// Convert a response whose payload is required.
    pub fn into_result(self) -> RemoteResult<T> {
        if !self.success {
            return Err(self.failure());
        }
        self.data
            .ok_or_else(|| RemoteError::rejected("empty response"))
    }

    /// Convert a response whose payload may legitimately be absent.
    pub fn into_optional(self) -> RemoteResult<Option<T>> {
        if !self.success {
            return Err(self.failure());
        }
        Ok(self.data)
    }
}

impl<T> From<RemoteResult<T>> for Envelope<T> {
    fn from(value: RemoteResult<T>) -> Self {
        match value {
            Ok(data) => Envelope::ok(data),
            Err(err) => Envelope::failed(err.message()),
        }
    }
}

/// Decode a raw bridge response carrying a required payload.
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> RemoteResult<T> {
    parse_envelope::<T>(value)?.into_result()
}

/// Decode a raw bridge response whose payload may be absent.
pub fn decode_optional<T: DeserializeOwned>(value: serde_json::Value) -> RemoteResult<Option<T>> {
    parse_envelope::<T>(value)?.into_optional()
}

fn parse_envelope<T: DeserializeOwned>(value: serde_json::Value) -> RemoteResult<Envelope<T>> {
    serde_json::from_value(value)
        .map_err(|e| RemoteError::transport(format!("malformed response: {e}")))
}
