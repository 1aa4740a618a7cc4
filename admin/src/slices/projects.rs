//! Portfolio projects
//!
//! Besides the project list and the project opened for editing, the slice
//! keeps the featured selection shown on the landing page. Deleting a project
//! drops it from both.

use super::{LifecycleEvent, Operation};
use crate::endpoints;
use crate::envelope::HttpMethod;
use crate::environment::AdminEnvironment;
use crate::form::FormData;
use crate::inputs::{FeaturedSelection, UpdateInput};
use crate::models::Project;
use crate::thunk::Thunk;
use folio_core::effect::Effect;
use folio_core::reducer::Reducer;
use folio_core::{
    AsyncSlice, Collection, Identified, Lifecycle, OperationReducer, RecordId, SliceStatus, SmallVec,
};
use serde::Serialize;
use serde::de::IgnoredAny;

/// Slice name used in lifecycle events
pub const SLICE: &str = "projects";

/// Loading-flag keys
#[allow(missing_docs)]
pub mod keys {
    use folio_core::OperationKey;

    pub const FETCH_ALL: OperationKey = OperationKey::new("fetchAll");
    pub const FETCH_BY_ID: OperationKey = OperationKey::new("fetchById");
    pub const CREATE: OperationKey = OperationKey::new("create");
    pub const UPDATE: OperationKey = OperationKey::new("update");
    pub const DELETE: OperationKey = OperationKey::new("delete");
    pub const FETCH_FEATURED: OperationKey = OperationKey::new("fetchFeatured");
    pub const SET_FEATURED: OperationKey = OperationKey::new("setFeatured");

    pub const ALL: [OperationKey; 7] = [
        FETCH_ALL,
        FETCH_BY_ID,
        CREATE,
        UPDATE,
        DELETE,
        FETCH_FEATURED,
        SET_FEATURED,
    ];
}

/// Projects slice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsState {
    /// Loading flags, last error, last update
    #[serde(flatten)]
    pub status: SliceStatus,
    /// Projects and the current one
    pub projects: Collection<Project>,
    /// Featured projects in display order
    pub featured_projects: Vec<Project>,
}

impl Default for ProjectsState {
    fn default() -> Self {
        Self {
            status: SliceStatus::new(&keys::ALL),
            projects: Collection::new(),
            featured_projects: Vec::new(),
        }
    }
}

impl ProjectsState {
    fn remove(&mut self, id: &RecordId) {
        self.projects.remove_by_id(id);
        self.featured_projects.retain(|project| !project.has_id(id));
    }
}

impl AsyncSlice for ProjectsState {
    fn status(&self) -> &SliceStatus {
        &self.status
    }

    fn status_mut(&mut self) -> &mut SliceStatus {
        &mut self.status
    }
}

/// Projects actions
#[derive(Debug, Clone)]
pub enum ProjectsAction {
    /// Load every project
    FetchAll(Lifecycle<(), Option<Vec<Project>>>),
    /// Open one project
    FetchById(Lifecycle<RecordId, Option<Project>>),
    /// Add a project
    Create(Lifecycle<FormData, Option<Project>>),
    /// Replace a project
    Update(Lifecycle<UpdateInput, Option<Project>>),
    /// Delete a project
    Delete(Lifecycle<RecordId, IgnoredAny>),
    /// Load the featured selection
    FetchFeatured(Lifecycle<(), Option<Vec<Project>>>),
    /// Replace the featured selection
    SetFeatured(Lifecycle<FeaturedSelection, Option<Vec<Project>>>),
    /// Drop the recorded error
    ClearError,
    /// Back to the initial state
    Reset,
    /// Select a project locally
    SetCurrent(Option<Project>),
}

impl ProjectsAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        let event = match self {
            Self::FetchAll(phase) => LifecycleEvent::of(SLICE, keys::FETCH_ALL, phase),
            Self::FetchById(phase) => LifecycleEvent::of(SLICE, keys::FETCH_BY_ID, phase),
            Self::Create(phase) => LifecycleEvent::of(SLICE, keys::CREATE, phase),
            Self::Update(phase) => LifecycleEvent::of(SLICE, keys::UPDATE, phase),
            Self::Delete(phase) => LifecycleEvent::of(SLICE, keys::DELETE, phase),
            Self::FetchFeatured(phase) => LifecycleEvent::of(SLICE, keys::FETCH_FEATURED, phase),
            Self::SetFeatured(phase) => LifecycleEvent::of(SLICE, keys::SET_FEATURED, phase),
            Self::ClearError | Self::Reset | Self::SetCurrent(_) => return None,
        };
        Some(event)
    }
}

const FETCH_ALL: Operation<ProjectsState, (), Option<Vec<Project>>> = Operation::new(
    OperationReducer::new(keys::FETCH_ALL, |state, _, projects| state.projects.replace_all(projects)),
    Thunk::new("getAllProjects", HttpMethod::Get, endpoints::projects::GET_ALL),
);

const FETCH_BY_ID: Operation<ProjectsState, RecordId, Option<Project>> = Operation::new(
    OperationReducer::new(keys::FETCH_BY_ID, |state, _, project| state.projects.set_current(project)),
    Thunk::new("getProjectById", HttpMethod::Get, endpoints::projects::GET),
);

const CREATE: Operation<ProjectsState, FormData, Option<Project>> = Operation::new(
    OperationReducer::new(keys::CREATE, |state, _, project| state.projects.append(project)),
    Thunk::new("createProject", HttpMethod::Post, endpoints::projects::CREATE).multipart(),
);

const UPDATE: Operation<ProjectsState, UpdateInput, Option<Project>> = Operation::new(
    OperationReducer::new(keys::UPDATE, |state, _, project| {
        if let Some(project) = project {
            state.projects.update_by_id(project);
        }
    }),
    Thunk::new("updateProjectById", HttpMethod::Put, endpoints::projects::UPDATE).multipart(),
);

const DELETE: Operation<ProjectsState, RecordId, IgnoredAny> = Operation::new(
    OperationReducer::new(keys::DELETE, |state, id, _| state.remove(id)),
    Thunk::new("deleteProjectById", HttpMethod::Delete, endpoints::projects::DELETE),
);

const FETCH_FEATURED: Operation<ProjectsState, (), Option<Vec<Project>>> = Operation::new(
    OperationReducer::new(keys::FETCH_FEATURED, |state, _, featured| {
        state.featured_projects = featured.unwrap_or_default();
    }),
    Thunk::new("getFeaturedProjects", HttpMethod::Get, endpoints::projects::GET_FEATURED),
);

const SET_FEATURED: Operation<ProjectsState, FeaturedSelection, Option<Vec<Project>>> = Operation::new(
    OperationReducer::new(keys::SET_FEATURED, |state, _, featured| {
        state.featured_projects = featured.unwrap_or_default();
    }),
    Thunk::new("setFeaturedProjects", HttpMethod::Post, endpoints::projects::SET_FEATURED),
);

/// Reducer of the projects slice
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectsReducer;

impl Reducer for ProjectsReducer {
    type State = ProjectsState;
    type Action = ProjectsAction;
    type Environment = AdminEnvironment;

    fn reduce(
        &self,
        state: &mut ProjectsState,
        action: ProjectsAction,
        env: &AdminEnvironment,
    ) -> SmallVec<[Effect<ProjectsAction>; 4]> {
        match action {
            ProjectsAction::FetchAll(phase) => FETCH_ALL.drive(state, phase, env, ProjectsAction::FetchAll),
            ProjectsAction::FetchById(phase) => FETCH_BY_ID.drive(state, phase, env, ProjectsAction::FetchById),
            ProjectsAction::Create(phase) => CREATE.drive(state, phase, env, ProjectsAction::Create),
            ProjectsAction::Update(phase) => UPDATE.drive(state, phase, env, ProjectsAction::Update),
            ProjectsAction::Delete(phase) => DELETE.drive(state, phase, env, ProjectsAction::Delete),
            ProjectsAction::FetchFeatured(phase) => {
                FETCH_FEATURED.drive(state, phase, env, ProjectsAction::FetchFeatured)
            },
            ProjectsAction::SetFeatured(phase) => {
                SET_FEATURED.drive(state, phase, env, ProjectsAction::SetFeatured)
            },
            ProjectsAction::ClearError => {
                state.status.clear_error();
                SmallVec::new()
            },
            ProjectsAction::Reset => {
                *state = ProjectsState::default();
                SmallVec::new()
            },
            ProjectsAction::SetCurrent(project) => {
                state.projects.set_current(project);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::testing::test_environment;
    use folio_testing::{ReducerTest, assertions};

    fn project(id: &str) -> Project {
        Project::with_id(id).field("title", format!("Project {id}"))
    }

    fn showcase() -> ProjectsState {
        let mut state = ProjectsState::default();
        state
            .projects
            .replace_all(Some(vec![project("p1"), project("p2"), project("p3")]));
        state.featured_projects = vec![project("p3"), project("p1")];
        state.projects.set_current(Some(project("p1")));
        state
    }

    #[test]
    fn delete_drops_project_from_featured() {
        ReducerTest::new(ProjectsReducer)
            .with_env(test_environment())
            .given_state(showcase())
            .when_action(ProjectsAction::Delete(Lifecycle::Fulfilled {
                input: RecordId::from("p1"),
                payload: IgnoredAny,
            }))
            .then_state(|state| {
                assert_eq!(state.projects.items(), &[project("p2"), project("p3")]);
                assert_eq!(state.featured_projects, vec![project("p3")]);
                assert!(state.projects.current().is_none());
            })
            .run();
    }

    #[test]
    fn set_featured_replaces_selection_with_response() {
        ReducerTest::new(ProjectsReducer)
            .with_env(test_environment())
            .given_state(showcase())
            .when_actions([
                ProjectsAction::SetFeatured(Lifecycle::start(FeaturedSelection {
                    project_ids: vec![RecordId::from("p2")],
                })),
                ProjectsAction::SetFeatured(Lifecycle::Fulfilled {
                    input: FeaturedSelection {
                        project_ids: vec![RecordId::from("p2")],
                    },
                    payload: Some(vec![project("p2")]),
                }),
            ])
            .then_state(|state| {
                assert_eq!(state.featured_projects, vec![project("p2")]);
                assert_eq!(state.projects.len(), 3);
                assertions::assert_idle(&state.status);
            })
            .run();
    }

    #[test]
    fn missing_featured_list_clears_selection() {
        ReducerTest::new(ProjectsReducer)
            .with_env(test_environment())
            .given_state(showcase())
            .when_action(ProjectsAction::FetchFeatured(Lifecycle::Fulfilled {
                input: (),
                payload: None,
            }))
            .then_state(|state| assert!(state.featured_projects.is_empty()))
            .run();
    }

    #[test]
    fn update_does_not_touch_featured_copies() {
        let renamed = Project::with_id("p3").field("title", "Renamed");
        let expected = renamed.clone();

        ReducerTest::new(ProjectsReducer)
            .with_env(test_environment())
            .given_state(showcase())
            .when_action(ProjectsAction::Update(Lifecycle::Fulfilled {
                input: UpdateInput {
                    id: RecordId::from("p3"),
                    form: FormData::new().text("title", "Renamed"),
                },
                payload: Some(renamed),
            }))
            .then_state(move |state| {
                assert_eq!(state.projects.items()[2], expected);
                assert_eq!(state.featured_projects[0], project("p3"));
            })
            .run();
    }

    #[test]
    fn featured_rejection_is_recorded_under_its_key() {
        ReducerTest::new(ProjectsReducer)
            .with_env(test_environment())
            .given_state(ProjectsState::default())
            .when_action(ProjectsAction::FetchFeatured(Lifecycle::Rejected {
                input: (),
                error: "Failed to get featured projects".to_string(),
            }))
            .then_state(|state| {
                assertions::assert_error(&state.status, keys::FETCH_FEATURED, "Failed to get featured projects");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn thunk_names_drive_default_messages() {
        assert_eq!(DELETE.thunk().default_message(), "Failed to delete project by id");
        assert_eq!(SET_FEATURED.thunk().default_message(), "Failed to set featured projects");
    }
}
