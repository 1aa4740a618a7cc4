//! Cooperative cancellation.
//!
//! A [`CancelSignal`] is a clonable, set-once flag carrying the reason it was
//! triggered. The caller keeps one clone (for example while a view is open)
//! and the in-flight request holds another; triggering either side wakes every
//! waiter.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Reason reported when a signal is triggered without an explicit message.
pub const DEFAULT_CANCEL_REASON: &str = "Request was canceled";

/// Set-once cancellation signal shared between a caller and its request.
#[derive(Clone)]
pub struct CancelSignal {
    reason: Arc<watch::Sender<Option<String>>>,
}

impl CancelSignal {
    /// Create a signal that has not been triggered.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            reason: Arc::new(tx),
        }
    }

    /// Trigger the signal with the default reason.
    ///
    /// Returns `false` if the signal was already triggered.
    pub fn cancel(&self) -> bool {
        self.cancel_with(DEFAULT_CANCEL_REASON)
    }

    /// Trigger the signal with a custom reason.
    ///
    /// The first reason wins; later calls return `false` and leave it untouched.
    pub fn cancel_with(&self, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        self.reason.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    /// Whether the signal has been triggered.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.reason.borrow().is_some()
    }

    /// The reason the signal was triggered with, if any.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        self.reason.borrow().clone()
    }

    /// Wait until the signal is triggered and return its reason.
    ///
    /// Resolves immediately if the signal was already triggered.
    pub async fn cancelled(&self) -> String {
        let mut rx = self.reason.subscribe();
        // The borrow guard is not `Send`; release it before any other await.
        let reason = match rx.wait_for(Option::is_some).await {
            Ok(reason) => Some(reason.clone().unwrap_or_else(|| DEFAULT_CANCEL_REASON.to_string())),
            Err(_) => None,
        };
        match reason {
            Some(reason) => reason,
            // The sender lives as long as `self`, so the channel cannot close here.
            None => std::future::pending().await,
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelSignal")
            .field("reason", &*self.reason.borrow())
            .finish()
    }
}
