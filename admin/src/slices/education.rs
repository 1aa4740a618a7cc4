//! Education entries
//!
//! A list of records plus the entry opened for editing.

use super::{LifecycleEvent, Operation};
use crate::endpoints;
use crate::envelope::HttpMethod;
use crate::environment::AdminEnvironment;
use crate::form::FormData;
use crate::inputs::UpdateInput;
use crate::models::Education;
use crate::thunk::Thunk;
use folio_core::effect::Effect;
use folio_core::reducer::Reducer;
use folio_core::{AsyncSlice, Collection, Lifecycle, OperationReducer, RecordId, SliceStatus, SmallVec};
use serde::Serialize;
use serde::de::IgnoredAny;

/// Slice name used in lifecycle events
pub const SLICE: &str = "education";

/// Loading-flag keys
#[allow(missing_docs)]
pub mod keys {
    use folio_core::OperationKey;

    pub const CREATE: OperationKey = OperationKey::new("create");
    pub const FETCH_ALL: OperationKey = OperationKey::new("fetchAll");
    pub const FETCH_BY_ID: OperationKey = OperationKey::new("fetchById");
    pub const UPDATE: OperationKey = OperationKey::new("update");
    pub const DELETE: OperationKey = OperationKey::new("delete");

    pub const ALL: [OperationKey; 5] = [CREATE, FETCH_ALL, FETCH_BY_ID, UPDATE, DELETE];
}

/// Education slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationState {
    /// Loading flags, last error, last update
    #[serde(flatten)]
    pub status: SliceStatus,
    /// Entries and the current one
    pub education: Collection<Education>,
}

impl Default for EducationState {
    fn default() -> Self {
        Self {
            status: SliceStatus::new(&keys::ALL),
            education: Collection::new(),
        }
    }
}

impl AsyncSlice for EducationState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }
}

/// Education actions
#[derive(Debug, Clone)]
pub enum EducationAction {
    /// Add an entry
    Create(Lifecycle<FormData, Option<Education>>),
    /// Load every entry
    FetchAll(Lifecycle<(), Option<Vec<Education>>>),
    /// Open one entry
    FetchById(Lifecycle<RecordId, Option<Education>>),
    /// Replace an entry
    Update(Lifecycle<UpdateInput, Option<Education>>),
    /// Delete an entry
    Delete(Lifecycle<RecordId, IgnoredAny>),
    /// Drop the recorded error
    ClearError,
    /// Back to the initial state
    Reset,
    /// Select an entry locally
    SetCurrent(Option<Education>),
}

impl EducationAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        let event = match self {
            Self::Create(phase) => LifecycleEvent::of(SLICE, keys::CREATE, phase),
            Self::FetchAll(phase) => LifecycleEvent::of(SLICE, keys::FETCH_ALL, phase),
            Self::FetchById(phase) => LifecycleEvent::of(SLICE, keys::FETCH_BY_ID, phase),
            Self::Update(phase) => LifecycleEvent::of(SLICE, keys::UPDATE, phase),
            Self::Delete(phase) => LifecycleEvent::of(SLICE, keys::DELETE, phase),
            Self::ClearError | Self::Reset | Self::SetCurrent(_) => return None,
        };
        Some(event)
    }
}

const CREATE: Operation<EducationState, FormData, Option<Education>> = Operation::new(
    OperationReducer::new(keys::CREATE, |state, _, entry| state.education.append(entry)),
    Thunk::new("createEducation", HttpMethod::Post, endpoints::education::CREATE).multipart(),
);

const FETCH_ALL: Operation<EducationState, (), Option<Vec<Education>>> = Operation::new(
    OperationReducer::new(keys::FETCH_ALL, |state, _, entries| state.education.replace_all(entries)),
    Thunk::new("getAllEducation", HttpMethod::Get, endpoints::education::GET_ALL),
);

const FETCH_BY_ID: Operation<EducationState, RecordId, Option<Education>> = Operation::new(
    OperationReducer::new(keys::FETCH_BY_ID, |state, _, entry| state.education.set_current(entry)),
    Thunk::new("getEducationById", HttpMethod::Get, endpoints::education::GET),
);

const UPDATE: Operation<EducationState, UpdateInput, Option<Education>> = Operation::new(
    OperationReducer::new(keys::UPDATE, |state, _, entry| {
        if let Some(entry) = entry {
            state.education.update_by_id(entry);
        }
    }),
    Thunk::new("updateEducation", HttpMethod::Put, endpoints::education::UPDATE).multipart(),
);

const DELETE: Operation<EducationState, RecordId, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::DELETE, |state, id, _| {
        state.education.remove_by_id(id);
    }),
    Thunk::new("deleteEducation", HttpMethod::Delete, endpoints::education::DELETE),
);

/// Reducer of the education slice
#[derive(Debug, Clone, Copy, Default)]
pub struct EducationReducer;

impl Reducer for EducationReducer {
    type State = EducationState;
    type Action = EducationAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut EducationState,
        action: EducationAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<EducationAction>; 4]> {
        match action {
            EducationAction::Create(phase) => CREATE.drive(state, phase, env, EducationAction::Create),
            EducationAction::FetchAll(phase) => FETCH_ALL.drive(state, phase, env, EducationAction::FetchAll),
            EducationAction::FetchById(phase) => {
                FETCH_BY_ID.drive(state, phase, env, EducationAction::FetchById)
            },
            EducationAction::Update(phase) => UPDATE.drive(state, phase, env, EducationAction::Update),
            EducationAction::Delete(phase) => DELETE.drive(state, phase, env, EducationAction::Delete),
            EducationAction::ClearError => {
                state.status.clear_error();
                SmallVec::new()
            },
            EducationAction::Reset => {
                *state = EducationState::default();
                SmallVec::new()
            },
            EducationAction::SetCurrent(entry) => {
                state.education.set_current(entry);
                SmallVec::new()
            },
        }
    }
}
