//! Hero banner
//!
//! A single record, replaced by every successful fetch or upload. A response
//! without data clears it.

use super::{LifecycleEvent, Operation};
use crate::endpoints;
use crate::envelope::HttpMethod;
use crate::environment::AdminEnvironment;
use crate::form::FormData;
use crate::models::Hero;
use crate::thunk::Thunk;
use folio_core::effect::Effect;
use folio_core::reducer::Reducer;
use folio_core::{AsyncSlice, Lifecycle, OperationKey, OperationReducer, SliceStatus, SmallVec};
use serde::Serialize;

/// Slice name used in lifecycle events
pub const SLICE: &str = "hero";

/// Loading-flag keys
#[allow(missing_docs)]
pub mod keys {
    use folio_core::OperationKey;

    pub const FETCH: OperationKey = OperationKey::new("fetchHeroData");
    pub const UPDATE: OperationKey = OperationKey::new("updateHeroData");
}

/// Hero slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroState {
    /// Loading flags, last error, last update
    #[serde(flatten)]
    pub status: SliceStatus,
    /// The banner content
    pub hero_data: Option<Hero>,
}

impl Default for HeroState {
    fn default() -> Self {
        Self {
            status: SliceStatus::new(&[keys::FETCH, keys::UPDATE]),
            hero_data: None,
        }
    }
}

impl AsyncSlice for HeroState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }
}

/// Hero actions
#[derive(Debug, Clone)]
pub enum HeroAction {
    /// Load the banner
    Fetch(Lifecycle<(), Option<Hero>>),
    /// Create or replace the banner
    Update(Lifecycle<FormData, Option<Hero>>),
    /// Drop the recorded error
    ClearError,
    /// Clear one loading flag
    ResetLoading(OperationKey),
    /// Back to the initial state
    Reset,
}

impl HeroAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        match self {
            Self::Fetch(phase) => Some(LifecycleEvent::of(SLICE, keys::FETCH, phase)),
            Self::Update(phase) => Some(LifecycleEvent::of(SLICE, keys::UPDATE, phase)),
            _ => None,
        }
    }
}

const FETCH: Operation<HeroState, (), Option<Hero>> = Operation::new(
    OperationReducer::new(keys::FETCH, |state, _, hero| state.hero_data = hero),
    Thunk::new("fetchHeroData", HttpMethod::Get, endpoints::hero::GET_CONTENT),
);

const UPDATE: Operation<HeroState, FormData, Option<Hero>> = Operation::new(
    OperationReducer::new(keys::UPDATE, |state, _, hero| state.hero_data = hero),
    Thunk::new("updateHeroData", HttpMethod::Post, endpoints::hero::ADD_UPDATE_CONTENT).multipart(),
);

/// Reducer of the hero slice
#[derive(Debug, Clone, Copy, Default)]
pub struct HeroReducer;

impl Reducer for HeroReducer {
    type State = HeroState;
    type Action = HeroAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut HeroState,
        action: HeroAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<HeroAction>; 4]> {
        match action {
            HeroAction::Fetch(phase) => FETCH.drive(state, phase, env, HeroAction::Fetch),
            HeroAction::Update(phase) => UPDATE.drive(state, phase, env, HeroAction::Update),
            HeroAction::ClearError => {
                state.status.clear_error();
                SmallVec::new()
            },
            HeroAction::ResetLoading(key) => {
                state.status.loading_states.reset(key);
                SmallVec::new()
            },
            HeroAction::Reset => {
                *state = HeroState::default();
                SmallVec::new()
            },
        }
    }
}
