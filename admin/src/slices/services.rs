//! Offered services

use super::{LifecycleEvent, Operation};
use crate::endpoints;
use crate::envelope::HttpMethod;
use crate::environment::AdminEnvironment;
use crate::form::FormData;
use crate::inputs::UpdateInput;
use crate::models::Service;
use crate::thunk::Thunk;
use folio_core::effect::Effect;
use folio_core::reducer::Reducer;
use folio_core::{AsyncSlice, Collection, Lifecycle, OperationReducer, RecordId, SliceStatus, SmallVec};
use serde::Serialize;
use serde::de::IgnoredAny;

/// Slice name used in lifecycle events
pub const SLICE: &str = "services";

/// Loading-flag keys
#[allow(missing_docs)]
pub mod keys {
    use folio_core::OperationKey;

    pub const FETCH_ALL: OperationKey = OperationKey::new("fetchAll");
    pub const FETCH_BY_ID: OperationKey = OperationKey::new("fetchById");
    pub const CREATE: OperationKey = OperationKey::new("create");
    pub const UPDATE: OperationKey = OperationKey::new("update");
    pub const DELETE: OperationKey = OperationKey::new("delete");

    pub const ALL: [OperationKey; 5] = [FETCH_ALL, FETCH_BY_ID, CREATE, UPDATE, DELETE];
}

/// Services slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesState {
    /// Loading flags, last error, last update
    #[serde(flatten)]
    pub status: SliceStatus,
    /// Services and the current one
    pub services: Collection<Service>,
}

impl Default for ServicesState {
    fn default() -> Self {
        Self {
            status: SliceStatus::new(&keys::ALL),
            services: Collection::new(),
        }
    }
}

impl AsyncSlice for ServicesState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }
}

/// Services actions
#[derive(Debug, Clone)]
pub enum ServicesAction {
    /// Load every service
    FetchAll(Lifecycle<(), Option<Vec<Service>>>),
    /// Open one service
    FetchById(Lifecycle<RecordId, Option<Service>>),
    /// Add a service
    Create(Lifecycle<FormData, Option<Service>>),
    /// Replace a service
    Update(Lifecycle<UpdateInput, Option<Service>>),
    /// Delete a service
    Delete(Lifecycle<RecordId, IgnoredAny>),
    /// Drop the recorded error
    ClearError,
    /// Back to the initial state
    Reset,
    /// Select a service locally
    SetCurrent(Option<Service>),
}

impl ServicesAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        let event = match self {
            Self::FetchAll(phase) => LifecycleEvent::of(SLICE, keys::FETCH_ALL, phase),
            Self::FetchById(phase) => LifecycleEvent::of(SLICE, keys::FETCH_BY_ID, phase),
            Self::Create(phase) => LifecycleEvent::of(SLICE, keys::CREATE, phase),
            Self::Update(phase) => LifecycleEvent::of(SLICE, keys::UPDATE, phase),
            Self::Delete(phase) => LifecycleEvent::of(SLICE, keys::DELETE, phase),
            Self::ClearError | Self::Reset | Self::SetCurrent(_) => return None,
        };
        Some(event)
    }
}

const FETCH_ALL: Operation<ServicesState, (), Option<Vec<Service>>> = Operation::new(
    OperationReducer::new(keys::FETCH_ALL, |state, _, services| state.services.replace_all(services)),
    Thunk::new("getAllServices", HttpMethod::Get, endpoints::services::GET_ALL),
);

const FETCH_BY_ID: Operation<ServicesState, RecordId, Option<Service>> = Operation::new(
    OperationReducer::new(keys::FETCH_BY_ID, |state, _, service| state.services.set_current(service)),
    Thunk::new("getServiceById", HttpMethod::Get, endpoints::services::GET),
);

const CREATE: Operation<ServicesState, FormData, Option<Service>> = Operation::new(
    OperationReducer::new(keys::CREATE, |state, _, service| state.services.append(service)),
    Thunk::new("createService", HttpMethod::Post, endpoints::services::CREATE).multipart(),
);

const UPDATE: Operation<ServicesState, UpdateInput, Option<Service>> = Operation::new(
    OperationReducer::new(keys::UPDATE, |state, _, service| {
        if let Some(service) = service {
            state.services.update_by_id(service);
        }
    }),
    Thunk::new("updateService", HttpMethod::Put, endpoints::services::UPDATE).multipart(),
);

const DELETE: Operation<ServicesState, RecordId, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::DELETE, |state, id, _| {
        state.services.remove_by_id(id);
    }),
    Thunk::new("deleteService", HttpMethod::Delete, endpoints::services::DELETE),
);

/// Reducer of the services slice
#[derive(Debug, Clone, Copy, Default)]
pub struct ServicesReducer;

impl Reducer for ServicesReducer {
    type State = ServicesState;
    type Action = ServicesAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut ServicesState,
        action: ServicesAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<ServicesAction>; 4]> {
        match action {
            ServicesAction::FetchAll(phase) => FETCH_ALL.drive(state, phase, env, ServicesAction::FetchAll),
            ServicesAction::FetchById(phase) => FETCH_BY_ID.drive(state, phase, env, ServicesAction::FetchById),
            ServicesAction::Create(phase) => CREATE.drive(state, phase, env, ServicesAction::Create),
            ServicesAction::Update(phase) => UPDATE.drive(state, phase, env, ServicesAction::Update),
            ServicesAction::Delete(phase) => DELETE.drive(state, phase, env, ServicesAction::Delete),
            ServicesAction::ClearError => {
                state.status.clear_error();
                SmallVec::new()
            },
            ServicesAction::Reset => {
                *state = ServicesState::default();
                SmallVec::new()
            },
            ServicesAction::SetCurrent(service) => {
                state.services.set_current(service);
                SmallVec::new()
            },
        }
    }
}
