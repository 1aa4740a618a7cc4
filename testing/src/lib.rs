//! # Folio Testing
//!
//! Testing utilities and helpers for the Folio admin store.
//!
//! This crate provides:
//! - A deterministic clock for slice timestamps
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects and slice lifecycle bookkeeping
//! - proptest strategies for backend identifiers
//!
//! ## Example
//!
//! ```ignore
//! use folio_testing::{ReducerTest, assertions, test_clock};
//!
//! #[test]
//! fn fetch_all_marks_loading() {
//!     ReducerTest::new(ProjectsReducer)
//!         .with_env(test_environment())
//!         .given_state(ProjectsState::default())
//!         .when_action(ProjectsAction::FetchAll(Lifecycle::start(())))
//!         .then_state(|state| assertions::assert_loading(&state.status, FETCH_ALL))
//!         .then_effects(assertions::assert_has_future_effect)
//!         .run();
//! }
//! ```

use chrono::{DateTime, Utc};
use folio_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use folio_testing::mocks::FixedClock;
    /// use folio_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use folio_core::RecordId;
    use proptest::prelude::*;

    /// Identifiers shaped like the backend's 24-hex-digit object ids.
    pub fn record_ids() -> impl Strategy<Value = RecordId> {
        "[0-9a-f]{24}".prop_map(RecordId::new)
    }

    /// A small pool of identifiers, so generated lists contain duplicates.
    pub fn colliding_ids() -> impl Strategy<Value = RecordId> {
        prop::sample::select(vec!["a1", "b2", "c3"]).prop_map(RecordId::from)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
