//! Request errors and their normalization
//!
//! Every failure of a remote operation is one [`RequestError`]. Thunks never
//! propagate it further: [`RequestError::normalize`] turns it into the single
//! human-readable message recorded in the slice.

use folio_core::cancel::DEFAULT_CANCEL_REASON;
use std::time::Duration;
use thiserror::Error;

/// Message used when a request was sent but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";

/// Failure of one request through the envelope
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The caller's cancellation signal fired
    #[error("{reason}")]
    Cancelled {
        /// Reason given when cancelling
        reason: String,
    },

    /// No response before the deadline
    #[error("Request timed out after {}ms", after.as_millis())]
    Timeout {
        /// The deadline that passed
        after: Duration,
    },

    /// Connection failure or an interrupted response
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a status the operation does not accept
    #[error("Server responded with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase, if the status has one
        status_text: Option<String>,
        /// `message` field of the response body, if any
        message: Option<String>,
    },

    /// The request could not be built (bad URL, missing path parameter, bad form part)
    #[error("{0}")]
    Construction(String),

    /// The response body did not match the expected payload
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Coarse classification of a [`RequestError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Cancelled by the caller
    Cancelled,
    /// Deadline passed
    Timeout,
    /// No response
    Network,
    /// Response with a rejected status
    Status,
    /// Request never left the client
    Construction,
    /// Response did not decode
    Decode,
}

impl RequestError {
    /// The error's class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Cancelled { .. } => ErrorClass::Cancelled,
            Self::Timeout { .. } => ErrorClass::Timeout,
            Self::Network(_) => ErrorClass::Network,
            Self::Status { .. } => ErrorClass::Status,
            Self::Construction(_) => ErrorClass::Construction,
            Self::Decode(_) => ErrorClass::Decode,
        }
    }

    /// Map the error to the message shown to the admin.
    ///
    /// | Error | Message |
    /// |---|---|
    /// | cancelled | the cancellation reason |
    /// | response received | server `message`, else status text, else `default` |
    /// | network failure | [`NO_RESPONSE_MESSAGE`] |
    /// | timeout | `Request timed out after {ms}ms` |
    /// | construction / decode | the error's own message, else `default` |
    #[must_use]
    pub fn normalize(&self, default: &str) -> String {
        match self {
            Self::Cancelled { reason } => non_empty(Some(reason.as_str()))
                .unwrap_or(DEFAULT_CANCEL_REASON)
                .to_string(),
            Self::Status {
                status_text,
                message,
                ..
            } => non_empty(message.as_deref())
                .or_else(|| non_empty(status_text.as_deref()))
                .unwrap_or(default)
                .to_string(),
            Self::Network(_) => NO_RESPONSE_MESSAGE.to_string(),
            Self::Timeout { .. } => self.to_string(),
            Self::Construction(message) | Self::Decode(message) => {
                if message.trim().is_empty() {
                    default.to_string()
                } else {
                    self.to_string()
                }
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
