//! The admin store: every slice composed under one state tree.
//!
//! ```ignore
//! let store = admin_store(AdminEnvironment::from_config(&config)?);
//!
//! let settled = dispatch(
//!     &store,
//!     AdminAction::Projects(ProjectsAction::FetchAll(Lifecycle::start(()))),
//!     Duration::from_secs(20),
//! )
//! .await?;
//!
//! let count = store.state(|s| s.projects.projects.items().len()).await;
//! ```

use crate::environment::AdminEnvironment;
use crate::slices::LifecycleEvent;
use crate::slices::about::{AboutAction, AboutReducer, AboutState};
use crate::slices::auth::{AuthAction, AuthReducer, AuthState};
use crate::slices::contact::{ContactAction, ContactReducer, ContactState};
use crate::slices::education::{EducationAction, EducationReducer, EducationState};
use crate::slices::hero::{HeroAction, HeroReducer, HeroState};
use crate::slices::projects::{ProjectsAction, ProjectsReducer, ProjectsState};
use crate::slices::services::{ServicesAction, ServicesReducer, ServicesState};
use crate::slices::skills::{SkillsAction, SkillsReducer, SkillsState};
use folio_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use folio_core::{OperationKey, Phase};
use folio_runtime::{Store, StoreError};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// State of every slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminState {
    /// Admin session
    pub auth: AuthState,
    /// About section
    pub about: AboutState,
    /// Hero banner
    pub hero: HeroState,
    /// Contact details and messages
    pub contact: ContactState,
    /// Education entries
    pub education: EducationState,
    /// Projects and the featured selection
    pub projects: ProjectsState,
    /// Offered services
    pub services: ServicesState,
    /// Skill categories
    pub skills: SkillsState,
}

/// Action of any slice.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum AdminAction {
    Auth(AuthAction),
    About(AboutAction),
    Hero(HeroAction),
    Contact(ContactAction),
    Education(EducationAction),
    Projects(ProjectsAction),
    Services(ServicesAction),
    Skills(SkillsAction),
}

impl AdminAction {
    /// The lifecycle signal carried by this action, if any.
    #[must_use]
    pub fn lifecycle(&self) -> Option<LifecycleEvent<'_>> {
        match self {
            Self::Auth(action) => action.lifecycle(),
            Self::About(action) => action.lifecycle(),
            Self::Hero(action) => action.lifecycle(),
            Self::Contact(action) => action.lifecycle(),
            Self::Education(action) => action.lifecycle(),
            Self::Projects(action) => action.lifecycle(),
            Self::Services(action) => action.lifecycle(),
            Self::Skills(action) => action.lifecycle(),
        }
    }

    fn into_auth(self) -> Option<AuthAction> {
        match self {
            Self::Auth(action) => Some(action),
            _ => None,
        }
    }

    fn into_about(self) -> Option<AboutAction> {
        match self {
            Self::About(action) => Some(action),
            _ => None,
        }
    }

    fn into_hero(self) -> Option<HeroAction> {
        match self {
            Self::Hero(action) => Some(action),
            _ => None,
        }
    }

    fn into_contact(self) -> Option<ContactAction> {
        match self {
            Self::Contact(action) => Some(action),
            _ => None,
        }
    }

    fn into_education(self) -> Option<EducationAction> {
        match self {
            Self::Education(action) => Some(action),
            _ => None,
        }
    }

    fn into_projects(self) -> Option<ProjectsAction> {
        match self {
            Self::Projects(action) => Some(action),
            _ => None,
        }
    }

    fn into_services(self) -> Option<ServicesAction> {
        match self {
            Self::Services(action) => Some(action),
            _ => None,
        }
    }

    fn into_skills(self) -> Option<SkillsAction> {
        match self {
            Self::Skills(action) => Some(action),
            _ => None,
        }
    }
}

/// Reducer of the whole admin state.
pub type AdminReducer = CombinedReducer<AdminState, AdminAction, AdminEnvironment>;

/// Store holding the admin state.
pub type AdminStore = Store<AdminState, AdminAction, AdminEnvironment, AdminReducer>;

/// Compose the slice reducers; each only sees its own actions and state.
#[must_use]
pub fn admin_reducer() -> AdminReducer {
    combine_reducers(vec![
        Box::new(scope_reducer(
            AuthReducer,
            |s: &mut AdminState| &mut s.auth,
            AdminAction::into_auth,
            AdminAction::Auth,
        )),
        Box::new(scope_reducer(
            AboutReducer,
            |s: &mut AdminState| &mut s.about,
            AdminAction::into_about,
            AdminAction::About,
        )),
        Box::new(scope_reducer(
            HeroReducer,
            |s: &mut AdminState| &mut s.hero,
            AdminAction::into_hero,
            AdminAction::Hero,
        )),
        Box::new(scope_reducer(
            ContactReducer,
            |s: &mut AdminState| &mut s.contact,
            AdminAction::into_contact,
            AdminAction::Contact,
        )),
        Box::new(scope_reducer(
            EducationReducer,
            |s: &mut AdminState| &mut s.education,
            AdminAction::into_education,
            AdminAction::Education,
        )),
        Box::new(scope_reducer(
            ProjectsReducer,
            |s: &mut AdminState| &mut s.projects,
            AdminAction::into_projects,
            AdminAction::Projects,
        )),
        Box::new(scope_reducer(
            ServicesReducer,
            |s: &mut AdminState| &mut s.services,
            AdminAction::into_services,
            AdminAction::Services,
        )),
        Box::new(scope_reducer(
            SkillsReducer,
            |s: &mut AdminState| &mut s.skills,
            AdminAction::into_skills,
            AdminAction::Skills,
        )),
    ])
}

/// Create a store with every slice in its initial state.
#[must_use]
pub fn admin_store(environment: AdminEnvironment) -> AdminStore {
    Store::new(AdminState::default(), admin_reducer(), environment)
}

/// Errors from [`dispatch`].
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The action does not start a remote operation
    #[error("Action does not start an operation")]
    NotAnOperation,

    /// The operation settled as rejected
    #[error("{message}")]
    Rejected {
        /// Slice of the operation
        slice: &'static str,
        /// Operation key
        key: OperationKey,
        /// Normalized failure message
        message: String,
    },

    /// The store failed to deliver the outcome
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Start an operation and wait until it settles.
///
/// `action` must carry a `Pending` lifecycle. Returns the settling action when
/// the operation is fulfilled.
///
/// # Errors
///
/// - [`DispatchError::NotAnOperation`]: `action` is not a pending operation
/// - [`DispatchError::Rejected`]: the operation settled as rejected
/// - [`DispatchError::Store`]: shutdown, timeout, or closed channel
#[tracing::instrument(skip(store, action), name = "admin_dispatch")]
pub async fn dispatch(
    store: &AdminStore,
    action: AdminAction,
    timeout: Duration,
) -> Result<AdminAction, DispatchError> {
    let pending = match action.lifecycle() {
        Some(event) if event.phase == Phase::Pending => LifecycleEvent {
            slice: event.slice,
            key: event.key,
            phase: Phase::Pending,
            error: None,
        },
        _ => return Err(DispatchError::NotAnOperation),
    };

    let settled = store
        .send_and_wait_for(
            action,
            |candidate| candidate.lifecycle().is_some_and(|event| event.settles(&pending)),
            timeout,
        )
        .await?;

    let rejection = settled
        .lifecycle()
        .and_then(|event| event.error.map(str::to_string));

    match rejection {
        Some(message) => {
            tracing::debug!(slice = pending.slice, key = %pending.key, %message, "Dispatch rejected");
            Err(DispatchError::Rejected {
                slice: pending.slice,
                key: pending.key,
                message,
            })
        },
        None => Ok(settled),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::slices::{auth, projects};
    use crate::testing::test_environment;
    use folio_core::reducer::Reducer;
    use folio_core::{Lifecycle, RecordId};
    use serde::de::IgnoredAny;

    #[test]
    fn actions_reach_only_their_slice() {
        let reducer = admin_reducer();
        let mut state = AdminState::default();

        let effects = reducer.reduce(
            &mut state,
            AdminAction::Projects(ProjectsAction::FetchAll(Lifecycle::start(()))),
            &test_environment(),
        );

        assert_eq!(effects.len(), 1);
        assert!(state.projects.status.is_loading(projects::keys::FETCH_ALL));
        assert!(!state.services.status.is_loading(crate::slices::services::keys::FETCH_ALL));
        assert!(!state.education.status.is_loading(crate::slices::education::keys::FETCH_ALL));
    }

    #[test]
    fn local_actions_are_scoped_too() {
        let reducer = admin_reducer();
        let mut state = AdminState::default();
        state.auth.status.begin(auth::keys::LOGIN);
        state.hero.status.begin(crate::slices::hero::keys::FETCH);

        let effects = reducer.reduce(&mut state, AdminAction::Auth(AuthAction::Reset), &test_environment());

        assert!(effects.is_empty());
        assert!(!state.auth.status.is_loading(auth::keys::LOGIN));
        assert!(state.hero.status.is_loading(crate::slices::hero::keys::FETCH));
    }

    #[test]
    fn lifecycle_is_delegated() {
        let action = AdminAction::Skills(SkillsAction::DeleteCategory(Lifecycle::Rejected {
            input: RecordId::from("c1"),
            error: "Not found".to_string(),
        }));
        let event = action.lifecycle().unwrap();

        assert_eq!(event.slice, crate::slices::skills::SLICE);
        assert_eq!(event.phase, Phase::Rejected);
        assert_eq!(event.error, Some("Not found"));
        assert!(AdminAction::Hero(HeroAction::Reset).lifecycle().is_none());
    }

    #[test]
    fn settling_matches_slice_and_key() {
        let pending = AdminAction::Services(ServicesAction::Delete(Lifecycle::start(RecordId::from("s1"))));
        let same = AdminAction::Services(ServicesAction::Delete(Lifecycle::Fulfilled {
            input: RecordId::from("s1"),
            payload: IgnoredAny,
        }));
        let other_slice = AdminAction::Education(EducationAction::Delete(Lifecycle::Fulfilled {
            input: RecordId::from("s1"),
            payload: IgnoredAny,
        }));

        let pending = pending.lifecycle().unwrap();
        assert!(same.lifecycle().unwrap().settles(&pending));
        assert!(!other_slice.lifecycle().unwrap().settles(&pending));
        assert!(!pending.settles(&pending));
    }

    #[test]
    fn state_serializes_per_slice() {
        let json = serde_json::to_value(AdminState::default()).unwrap();

        assert_eq!(json["auth"]["isAuthenticated"], false);
        assert_eq!(json["projects"]["featuredProjects"], serde_json::json!([]));
        assert_eq!(json["hero"]["loadingStates"]["fetchHeroData"], false);
    }

    #[tokio::test]
    async fn dispatch_refuses_local_actions() {
        let store = admin_store(test_environment());

        let outcome = dispatch(&store, AdminAction::About(AboutAction::Reset), Duration::from_millis(50)).await;

        assert!(matches!(outcome, Err(DispatchError::NotAnOperation)));
    }
}
