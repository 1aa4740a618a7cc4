//! Async operation lifecycle
//!
//! Every remote operation a slice performs goes through the same three phases:
//!
//! ```text
//! Idle ──Pending──▶ Loading ──Fulfilled──▶ Idle   (clear error, stamp last_updated, reconcile)
//!                      └──────Rejected───▶ Idle   (record SliceError)
//! ```
//!
//! A slice action enum has one variant per operation, each carrying a
//! [`Lifecycle`]. The slice reducer hands the phase to the operation's
//! [`OperationReducer`], which updates the shared [`SliceStatus`] and applies
//! the operation's reconciliation rule. Selecting the rule is a `match` on the
//! variant, never a lookup by action name.

use crate::cancel::CancelSignal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Name of an operation inside a slice (e.g. `fetchAll`, `delete`).
///
/// Keys are the loading-flag names and the `action` recorded on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OperationKey(&'static str);

impl OperationKey {
    /// Create a key from a static name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The key's name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Loading flags of a slice, one per operation key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LoadingStates(BTreeMap<OperationKey, bool>);

impl LoadingStates {
    /// Create flags for the given keys, all idle.
    #[must_use]
    pub fn with_keys(keys: &[OperationKey]) -> Self {
        Self(keys.iter().map(|key| (*key, false)).collect())
    }

    /// Whether `key` is currently in flight.
    #[must_use]
    pub fn is_loading(&self, key: OperationKey) -> bool {
        self.0.get(&key).copied().unwrap_or(false)
    }

    /// Whether any operation of the slice is in flight.
    #[must_use]
    pub fn any(&self) -> bool {
        self.0.values().any(|loading| *loading)
    }

    /// Set the flag for `key`.
    pub fn set(&mut self, key: OperationKey, loading: bool) {
        self.0.insert(key, loading);
    }

    /// Clear the flag for `key` if it is currently set.
    ///
    /// Unknown keys are ignored.
    pub fn reset(&mut self, key: OperationKey) {
        if let Some(flag) = self.0.get_mut(&key) {
            *flag = false;
        }
    }

    /// Iterate over `(key, loading)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (OperationKey, bool)> + '_ {
        self.0.iter().map(|(key, loading)| (*key, *loading))
    }
}

/// The last failure recorded by a slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceError {
    /// Normalized, human-readable message
    pub message: String,
    /// Operation that failed
    pub action: OperationKey,
    /// When the failure was reduced
    pub timestamp: DateTime<Utc>,
}

/// Bookkeeping every async slice carries next to its domain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceStatus {
    /// Per-operation loading flags
    pub loading_states: LoadingStates,
    /// Last failure, cleared on every new attempt and on success
    pub error: Option<SliceError>,
    /// Last successful completion of any operation in the slice
    pub last_updated: Option<DateTime<Utc>>,
}

impl SliceStatus {
    /// Create a status with idle flags for `keys`.
    #[must_use]
    pub fn new(keys: &[OperationKey]) -> Self {
        Self {
            loading_states: LoadingStates::with_keys(keys),
            error: None,
            last_updated: None,
        }
    }

    /// Whether `key` is currently in flight.
    #[must_use]
    pub fn is_loading(&self, key: OperationKey) -> bool {
        self.loading_states.is_loading(key)
    }

    /// An attempt for `key` started.
    pub fn begin(&mut self, key: OperationKey) {
        self.loading_states.set(key, true);
        self.error = None;
    }

    /// The attempt for `key` succeeded at `now`.
    pub fn succeed(&mut self, key: OperationKey, now: DateTime<Utc>) {
        self.loading_states.set(key, false);
        self.error = None;
        self.last_updated = Some(now);
    }

    /// The attempt for `key` failed; the error is recorded only when `record` is set.
    pub fn fail(&mut self, key: OperationKey, message: String, now: DateTime<Utc>, record: bool) {
        self.loading_states.set(key, false);
        if record {
            self.error = Some(SliceError {
                message,
                action: key,
                timestamp: now,
            });
        }
    }

    /// Drop the recorded error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// A state that carries a [`SliceStatus`].
pub trait AsyncSlice {
    /// Read access to the slice bookkeeping.
    fn status(&self) -> &SliceStatus;

    /// Write access to the slice bookkeeping.
    fn status_mut(&mut self) -> &mut SliceStatus;
}

/// Phase tag of a [`Lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Request started
    Pending,
    /// Request succeeded
    Fulfilled,
    /// Request failed
    Rejected,
}

/// The three lifecycle signals of one asynchronous operation.
///
/// `input` is the original request argument. It travels with every phase so
/// reconciliation can use it (delete-by-id removes the entry named by the
/// argument, not by the response body).
#[derive(Debug, Clone)]
pub enum Lifecycle<Req, Res> {
    /// Start the operation
    Pending {
        /// Request argument
        input: Req,
        /// Caller-held cancellation signal, forwarded to the request
        signal: CancelSignal,
    },
    /// The operation succeeded
    Fulfilled {
        /// Request argument
        input: Req,
        /// Decoded response payload
        payload: Res,
    },
    /// The operation failed
    Rejected {
        /// Request argument
        input: Req,
        /// Normalized error message
        error: String,
    },
}

impl<Req, Res> Lifecycle<Req, Res> {
    /// Start an operation that nobody else can cancel.
    #[must_use]
    pub fn start(input: Req) -> Self {
        Self::Pending {
            input,
            signal: CancelSignal::new(),
        }
    }

    /// Start an operation bound to a caller-held cancellation signal.
    #[must_use]
    pub const fn start_with(input: Req, signal: CancelSignal) -> Self {
        Self::Pending { input, signal }
    }

    /// The phase of this signal.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Pending { .. } => Phase::Pending,
            Self::Fulfilled { .. } => Phase::Fulfilled,
            Self::Rejected { .. } => Phase::Rejected,
        }
    }

    /// Whether this signal settles the operation.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }

    /// The original request argument.
    #[must_use]
    pub const fn input(&self) -> &Req {
        match self {
            Self::Pending { input, .. }
            | Self::Fulfilled { input, .. }
            | Self::Rejected { input, .. } => input,
        }
    }

    /// The normalized error, for rejected signals.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Rejected { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Reconciliation rule applied on `Fulfilled`: `(state, input, payload)`.
pub type Reconcile<S, Req, Res> = fn(&mut S, &Req, Res);

/// Extra state change applied on `Rejected`.
pub type OnRejected<S> = fn(&mut S);

/// Parametric reducer for one operation: `{key, reconciliation rule}`.
///
/// Instantiated once per operation, typically as a `const`:
///
/// ```ignore
/// const DELETE: OperationReducer<ServicesState, RecordId, IgnoredAny> =
///     OperationReducer::new(OperationKey::new("delete"), |state, id, _| {
///         state.services.remove_by_id(id);
///     });
/// ```
pub struct OperationReducer<S, Req, Res> {
    key: OperationKey,
    reconcile: Reconcile<S, Req, Res>,
    on_rejected: Option<OnRejected<S>>,
    record_errors: bool,
}

impl<S, Req, Res> OperationReducer<S, Req, Res> {
    /// Create a reducer for `key` with the given reconciliation rule.
    #[must_use]
    pub const fn new(key: OperationKey, reconcile: Reconcile<S, Req, Res>) -> Self {
        Self {
            key,
            reconcile,
            on_rejected: None,
            record_errors: true,
        }
    }

    /// Run `hook` on the state whenever the operation is rejected.
    #[must_use]
    pub const fn on_rejected(mut self, hook: OnRejected<S>) -> Self {
        self.on_rejected = Some(hook);
        self
    }

    /// Do not record failures of this operation in the slice error.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.record_errors = false;
        self
    }

    /// The operation key.
    #[must_use]
    pub const fn key(&self) -> OperationKey {
        self.key
    }
}

impl<S, Req, Res> OperationReducer<S, Req, Res>
where
    S: AsyncSlice,
{
    /// Reduce one lifecycle signal into the slice.
    ///
    /// Returns the request input and its cancellation signal for `Pending`,
    /// so the caller can launch the request; `None` for settled phases.
    pub fn reduce(
        &self,
        state: &mut S,
        phase: Lifecycle<Req, Res>,
        now: DateTime<Utc>,
    ) -> Option<(Req, CancelSignal)> {
        match phase {
            Lifecycle::Pending { input, signal } => {
                state.status_mut().begin(self.key);
                Some((input, signal))
            },
            Lifecycle::Fulfilled { input, payload } => {
                state.status_mut().succeed(self.key, now);
                (self.reconcile)(state, &input, payload);
                None
            },
            Lifecycle::Rejected { error, .. } => {
                state
                    .status_mut()
                    .fail(self.key, error, now, self.record_errors);
                if let Some(hook) = self.on_rejected {
                    hook(state);
                }
                None
            },
        }
    }
}

impl<S, Req, Res> Clone for OperationReducer<S, Req, Res> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, Req, Res> Copy for OperationReducer<S, Req, Res> {}

impl<S, Req, Res> fmt::Debug for OperationReducer<S, Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationReducer")
            .field("key", &self.key)
            .field("record_errors", &self.record_errors)
            .finish_non_exhaustive()
    }
}
