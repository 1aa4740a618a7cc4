//! # Folio Core
//!
//! Core traits and types for the Folio admin store.
//!
//! This crate provides the abstractions every content slice is built from:
//! the Reducer pattern, effect descriptions, and the generic async-request
//! lifecycle (pending → fulfilled | rejected) with its reconciliation rules.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a slice (loading flags, data, last error)
//! - **Action**: All possible inputs to a reducer, one closed enum per slice
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//! - **Lifecycle**: The three phases of an asynchronous operation
//!
//! ## Example
//!
//! ```ignore
//! use folio_core::*;
//!
//! #[derive(Clone, Debug)]
//! enum ProjectsAction {
//!     FetchAll(Lifecycle<(), Option<Vec<Project>>>),
//! }
//!
//! const FETCH_ALL: OperationReducer<ProjectsState, (), Option<Vec<Project>>> =
//!     OperationReducer::new(OperationKey::new("fetchAll"), |state, _, payload| {
//!         state.projects.replace_all(payload);
//!     });
//!
//! impl Reducer for ProjectsReducer {
//!     type State = ProjectsState;
//!     type Action = ProjectsAction;
//!     type Environment = AdminEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut ProjectsState,
//!         action: ProjectsAction,
//!         env: &AdminEnvironment,
//!     ) -> SmallVec<[Effect<ProjectsAction>; 4]> {
//!         match action {
//!             ProjectsAction::FetchAll(phase) => {
//!                 // Marks the operation loading and hands back the input to launch
//!                 FETCH_ALL.reduce(state, phase, env.clock.now());
//!                 SmallVec::new()
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Cooperative cancellation signals
pub mod cancel;

/// Async operation lifecycle: loading flags, slice errors, operation reducers
pub mod lifecycle;

/// List and record reconciliation rules
pub mod reconcile;

pub use cancel::CancelSignal;
pub use lifecycle::{
    AsyncSlice, Lifecycle, LoadingStates, OperationKey, OperationReducer, Phase, SliceError,
    SliceStatus,
};
pub use reconcile::{Collection, Identified, RecordId};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for HeroReducer {
    ///     type State = HeroState;
    ///     type Action = HeroAction;
    ///     type Environment = AdminEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut HeroState,
    ///         action: HeroAction,
    ///         env: &AdminEnvironment,
    ///     ) -> SmallVec<[Effect<HeroAction>; 4]> {
    ///         match action {
    ///             HeroAction::ClearError => {
    ///                 state.status.clear_error();
    ///                 SmallVec::new()
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns effect descriptions to be executed
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the runtime
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution).
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Lift an effect into a wider action type
        ///
        /// Used when a child reducer is embedded into a parent: every action the
        /// effect eventually produces is wrapped with `embed`.
        #[must_use]
        pub fn map<B>(self, embed: fn(Action) -> B) -> Effect<B>
        where
            Action: Send + 'static,
            B: 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Future(fut) => Effect::Future(Box::pin(async move { fut.await.map(embed) })),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Slices stamp `last_updated` and error timestamps through this trait so
    /// tests can pin time with a fixed clock.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock backed by `Utc::now()`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
