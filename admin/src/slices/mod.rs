//! Content slices
//!
//! One module per backend domain. Each slice has a state carrying a
//! [`SliceStatus`](folio_core::SliceStatus), a closed action enum with one
//! lifecycle variant per remote operation plus local actions, and a reducer.
//!
//! Remote operations are declared once as [`Operation`] constants pairing the
//! lifecycle bookkeeping (key and reconciliation rule) with the thunk that
//! performs the request:
//!
//! ```ignore
//! const DELETE: Operation<ServicesState, RecordId, IgnoredAny> = Operation::new(
//!     OperationReducer::new(keys::DELETE, |state, id, _| {
//!         state.services.remove_by_id(id);
//!     }),
//!     Thunk::new("deleteService", HttpMethod::Delete, endpoints::services::DELETE),
//! );
//! ```

use crate::environment::AdminEnvironment;
use crate::thunk::{Thunk, ThunkInput};
use folio_core::effect::Effect;
use folio_core::{AsyncSlice, Lifecycle, OperationKey, OperationReducer, Phase, SmallVec, smallvec};
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub mod about;
pub mod auth;
pub mod contact;
pub mod education;
pub mod hero;
pub mod projects;
pub mod services;
pub mod skills;

/// A remote operation of a slice: lifecycle reducer plus request.
pub struct Operation<S, I, T> {
    reducer: OperationReducer<S, I, T>,
    thunk: Thunk,
}

impl<S, I, T> Operation<S, I, T> {
    /// Pair a lifecycle reducer with its thunk.
    #[must_use]
    pub const fn new(reducer: OperationReducer<S, I, T>, thunk: Thunk) -> Self {
        Self { reducer, thunk }
    }

    /// The loading-flag key.
    #[must_use]
    pub const fn key(&self) -> OperationKey {
        self.reducer.key()
    }

    /// The request descriptor.
    #[must_use]
    pub const fn thunk(&self) -> Thunk {
        self.thunk
    }
}

impl<S, I, T> Operation<S, I, T>
where
    S: AsyncSlice,
    I: ThunkInput + Send + Sync + 'static,
    T: DeserializeOwned + Send + 'static,
{
    /// Reduce one lifecycle signal; `Pending` launches the request.
    pub fn drive<A>(
        &self,
        state: &mut S,
        phase: Lifecycle<I, T>,
        env: &AdminEnvironment,
        wrap: fn(Lifecycle<I, T>) -> A,
    ) -> SmallVec<[Effect<A>; 4]>
    where
        A: Send + 'static,
    {
        match self.reducer.reduce(state, phase, env.clock.now()) {
            Some((input, signal)) => {
                tracing::debug!(operation = self.thunk.name(), key = %self.key(), "Operation pending");
                smallvec![self.thunk.launch(Arc::clone(&env.api), input, signal, wrap)]
            },
            None => SmallVec::new(),
        }
    }
}

/// Lifecycle signal observed on an action, used to wait for an operation to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleEvent<'a> {
    /// Slice the operation belongs to
    pub slice: &'static str,
    /// Operation key
    pub key: OperationKey,
    /// Phase of the signal
    pub phase: Phase,
    /// Normalized message, for rejections
    pub error: Option<&'a str>,
}

impl<'a> LifecycleEvent<'a> {
    pub(crate) fn of<I, T>(slice: &'static str, key: OperationKey, phase: &'a Lifecycle<I, T>) -> Self {
        Self {
            slice,
            key,
            phase: phase.phase(),
            error: phase.error(),
        }
    }

    /// Whether `self` settles the operation `pending` started.
    #[must_use]
    pub fn settles(&self, pending: &LifecycleEvent<'_>) -> bool {
        self.slice == pending.slice && self.key == pending.key && self.phase != Phase::Pending
    }
}
