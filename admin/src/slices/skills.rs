//! Skill categories and the skills inside them
//!
//! Skill edits go through their category: the backend answers every add,
//! update and delete with the whole updated category, which replaces the
//! stored one by id.

use super::{LifecycleEvent, Operation};
use crate::endpoints;
use crate::envelope::HttpMethod;
use crate::environment::AdminEnvironment;
use crate::inputs::{JsonBody, SkillInput, SkillRef};
use crate::models::{Skill, SkillCategory};
use crate::thunk::Thunk;
use folio_core::effect::Effect;
use folio_core::reducer::Reducer;
use folio_core::{AsyncSlice, Collection, Lifecycle, OperationReducer, RecordId, SliceStatus, SmallVec};
use serde::Serialize;
use serde::de::IgnoredAny;

/// Slice name used in lifecycle events
pub const SLICE: &str = "skills";

/// Loading-flag keys
#[allow(missing_docs)]
pub mod keys {
    use folio_core::OperationKey;

    pub const FETCH_ALL: OperationKey = OperationKey::new("fetchAll");
    pub const FETCH_BY_ID: OperationKey = OperationKey::new("fetchById");
    pub const CREATE: OperationKey = OperationKey::new("create");
    pub const DELETE: OperationKey = OperationKey::new("delete");
    pub const ADD_SKILL: OperationKey = OperationKey::new("addSkill");
    pub const UPDATE_SKILL: OperationKey = OperationKey::new("updateSkill");
    pub const DELETE_SKILL: OperationKey = OperationKey::new("deleteSkill");

    pub const ALL: [OperationKey; 7] = [
        FETCH_ALL,
        FETCH_BY_ID,
        CREATE,
        DELETE,
        ADD_SKILL,
        UPDATE_SKILL,
        DELETE_SKILL,
    ];
}

/// Skills slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsState {
    /// Loading flags, last error, last update
    #[serde(flatten)]
    pub status: SliceStatus,
    /// Categories and the current one
    pub categories: Collection<SkillCategory>,
    /// Skill selected for editing
    pub current_skill: Option<Skill>,
}

impl Default for SkillsState {
    fn default() -> Self {
        Self {
            status: SliceStatus::new(&keys::ALL),
            categories: Collection::new(),
            current_skill: None,
        }
    }
}

impl AsyncSlice for SkillsState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }
}

/// Skills actions
#[derive(Debug, Clone)]
pub enum SkillsAction {
    /// Create a category
    CreateCategory(Lifecycle<JsonBody, Option<SkillCategory>>),
    /// Load every category
    FetchAll(Lifecycle<(), Option<Vec<SkillCategory>>>),
    /// Open one category
    FetchById(Lifecycle<RecordId, Option<SkillCategory>>),
    /// Delete a category
    DeleteCategory(Lifecycle<RecordId, IgnoredAny>),
    /// Add a skill to a category
    AddSkill(Lifecycle<SkillInput, Option<SkillCategory>>),
    /// Edit a skill
    UpdateSkill(Lifecycle<SkillRef, Option<SkillCategory>>),
    /// Remove a skill
    DeleteSkill(Lifecycle<SkillRef, Option<SkillCategory>>),
    /// Drop the recorded error
    ClearError,
    /// Back to the initial state
    Reset,
    /// Select a category locally
    SetCurrentCategory(Option<SkillCategory>),
    /// Select a skill locally
    SetCurrentSkill(Option<Skill>),
}

impl SkillsAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        let event = match self {
            Self::CreateCategory(phase) => LifecycleEvent::of(SLICE, keys::CREATE, phase),
            Self::FetchAll(phase) => LifecycleEvent::of(SLICE, keys::FETCH_ALL, phase),
            Self::FetchById(phase) => LifecycleEvent::of(SLICE, keys::FETCH_BY_ID, phase),
            Self::DeleteCategory(phase) => LifecycleEvent::of(SLICE, keys::DELETE, phase),
            Self::AddSkill(phase) => LifecycleEvent::of(SLICE, keys::ADD_SKILL, phase),
            Self::UpdateSkill(phase) => LifecycleEvent::of(SLICE, keys::UPDATE_SKILL, phase),
            Self::DeleteSkill(phase) => LifecycleEvent::of(SLICE, keys::DELETE_SKILL, phase),
            Self::ClearError | Self::Reset | Self::SetCurrentCategory(_) | Self::SetCurrentSkill(_) => {
                return None;
            },
        };
        Some(event)
    }
}

fn refresh_category<I>(state: &mut SkillsState, _: &I, category: Option<SkillCategory>) {
    if let Some(category) = category {
        state.categories.update_by_id(category);
    }
}

const CREATE_CATEGORY: Operation<SkillsState, JsonBody, Option<SkillCategory>> = Operation::new(
    OperationReducer::new(keys::CREATE, |state, _, category| state.categories.append(category)),
    Thunk::new("createSkillCategory", HttpMethod::Post, endpoints::skills::CREATE_CATEGORY),
);

const FETCH_ALL: Operation<SkillsState, (), Option<Vec<SkillCategory>>> = Operation::new(
    OperationReducer::new(keys::FETCH_ALL, |state, _, categories| {
        state.categories.replace_all(categories);
    }),
    Thunk::new("getAllSkillCategories", HttpMethod::Get, endpoints::skills::GET_ALL_CATEGORIES),
);

const FETCH_BY_ID: Operation<SkillsState, RecordId, Option<SkillCategory>> = Operation::new(
    OperationReducer::new(keys::FETCH_BY_ID, |state, _, category| {
        state.categories.set_current(category);
    }),
    Thunk::new("getSkillCategoryById", HttpMethod::Get, endpoints::skills::GET_CATEGORY),
);

const DELETE_CATEGORY: Operation<SkillsState, RecordId, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::DELETE, |state, id, _| {
        state.categories.remove_by_id(id);
    }),
    Thunk::new("deleteSkillCategory", HttpMethod::Delete, endpoints::skills::DELETE_CATEGORY),
);

const ADD_SKILL: Operation<SkillsState, SkillInput, Option<SkillCategory>> = Operation::new(
    OperationReducer::new(keys::ADD_SKILL, refresh_category),
    Thunk::new("addSkillToCategory", HttpMethod::Post, endpoints::skills::ADD_SKILL),
);

const UPDATE_SKILL: Operation<SkillsState, SkillRef, Option<SkillCategory>> = Operation::new(
    OperationReducer::new(keys::UPDATE_SKILL, refresh_category),
    Thunk::new("updateSkillToCategory", HttpMethod::Put, endpoints::skills::UPDATE_SKILL),
);

const DELETE_SKILL: Operation<SkillsState, SkillRef, Option<SkillCategory>> = Operation::new(
    OperationReducer::new(keys::DELETE_SKILL, refresh_category),
    Thunk::new("deleteSkillFromCategory", HttpMethod::Delete, endpoints::skills::DELETE_SKILL),
);

/// Reducer of the skills slice
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillsReducer;

impl Reducer for SkillsReducer {
    type State = SkillsState;
    type Action = SkillsAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut SkillsState,
        action: SkillsAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<SkillsAction>; 4]> {
        match action {
            SkillsAction::CreateCategory(phase) => {
                CREATE_CATEGORY.drive(state, phase, env, SkillsAction::CreateCategory)
            },
            SkillsAction::FetchAll(phase) => FETCH_ALL.drive(state, phase, env, SkillsAction::FetchAll),
            SkillsAction::FetchById(phase) => FETCH_BY_ID.drive(state, phase, env, SkillsAction::FetchById),
            SkillsAction::DeleteCategory(phase) => {
                DELETE_CATEGORY.drive(state, phase, env, SkillsAction::DeleteCategory)
            },
            SkillsAction::AddSkill(phase) => ADD_SKILL.drive(state, phase, env, SkillsAction::AddSkill),
            SkillsAction::UpdateSkill(phase) => UPDATE_SKILL.drive(state, phase, env, SkillsAction::UpdateSkill),
            SkillsAction::DeleteSkill(phase) => DELETE_SKILL.drive(state, phase, env, SkillsAction::DeleteSkill),
            SkillsAction::ClearError => {
                state.status.clear_error();
                SmallVec::new()
            },
            SkillsAction::Reset => {
                *state = SkillsState::default();
                SmallVec::new()
            },
            SkillsAction::SetCurrentCategory(category) => {
                state.categories.set_current(category);
                SmallVec::new()
            },
            SkillsAction::SetCurrentSkill(skill) => {
                state.current_skill = skill;
                SmallVec::new()
            },
        }
    }
}
