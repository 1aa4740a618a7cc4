//! About section
//!
//! A single record. Both the fetch and the add/update upload replace it; a
//! response without data keeps what is already loaded.

use super::{LifecycleEvent, Operation};
use crate::endpoints;
use crate::envelope::HttpMethod;
use crate::environment::AdminEnvironment;
use crate::form::FormData;
use crate::models::About;
use crate::thunk::Thunk;
use folio_core::effect::Effect;
use folio_core::reducer::Reducer;
use folio_core::{AsyncSlice, Lifecycle, OperationKey, OperationReducer, SliceStatus, SmallVec};
use serde::Serialize;

/// Slice name used in lifecycle events
pub const SLICE: &str = "about";

/// Loading-flag keys
#[allow(missing_docs)]
pub mod keys {
    use folio_core::OperationKey;

    pub const FETCH: OperationKey = OperationKey::new("fetchAboutData");
    pub const ADD_UPDATE: OperationKey = OperationKey::new("addUpdateAboutData");
}

/// About slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutState {
    /// Loading flags, last error, last update
    #[serde(flatten)]
    pub status: SliceStatus,
    /// The about content
    pub about_data: Option<About>,
}

impl Default for AboutState {
    fn default() -> Self {
        Self {
            status: SliceStatus::new(&[keys::FETCH, keys::ADD_UPDATE]),
            about_data: None,
        }
    }
}

impl AsyncSlice for AboutState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }
}

/// About actions
#[derive(Debug, Clone)]
pub enum AboutAction {
    /// Load the content
    Fetch(Lifecycle<(), Option<About>>),
    /// Create or replace the content
    AddUpdate(Lifecycle<FormData, Option<About>>),
    /// Drop the recorded error
    ClearError,
    /// Clear one loading flag
    ResetLoading(OperationKey),
    /// Back to the initial state
    Reset,
}

impl AboutAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        match self {
            Self::Fetch(phase) => Some(LifecycleEvent::of(SLICE, keys::FETCH, phase)),
            Self::AddUpdate(phase) => Some(LifecycleEvent::of(SLICE, keys::ADD_UPDATE, phase)),
            Self::ClearError | Self::ResetLoading(_) | Self::Reset => None,
        }
    }
}

fn replace(state: &mut AboutState, about: Option<About>) {
    if let Some(about) = about {
        state.about_data = Some(about);
    }
}

const FETCH: Operation<AboutState, (), Option<About>> = Operation::new(
    OperationReducer::new(keys::FETCH, |state, _, about| replace(state, about)),
    Thunk::new("fetchAboutData", HttpMethod::Get, endpoints::about::GET_CONTENT),
);

const ADD_UPDATE: Operation<AboutState, FormData, Option<About>> = Operation::new(
    OperationReducer::new(keys::ADD_UPDATE, |state, _, about| replace(state, about)),
    Thunk::new("updateAboutData", HttpMethod::Post, endpoints::about::ADD_UPDATE_CONTENT).multipart(),
);

/// Reducer of the about slice
#[derive(Debug, Clone, Copy, Default)]
pub struct AboutReducer;

impl Reducer for AboutReducer {
    type State = AboutState;
    type Action = AboutAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut AboutState,
        action: AboutAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<AboutAction>; 4]> {
        match action {
            AboutAction::Fetch(phase) => FETCH.drive(state, phase, env, AboutAction::Fetch),
            AboutAction::AddUpdate(phase) => ADD_UPDATE.drive(state, phase, env, AboutAction::AddUpdate),
            AboutAction::ClearError => {
                state.status.clear_error();
                SmallVec::new()
            },
            AboutAction::ResetLoading(key) => {
                state.status.loading_states.reset(key);
                SmallVec::new()
            },
            AboutAction::Reset => {
                *state = AboutState::default();
                SmallVec::new()
            },
        }
    }
}
