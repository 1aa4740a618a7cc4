//! Dependencies injected into every slice reducer.

use crate::config::AdminConfig;
use crate::envelope::ApiClient;
use crate::error::RequestError;
use folio_core::environment::{Clock, SystemClock};
use std::sync::Arc;

/// Environment of the admin store.
///
/// Reducers read the clock to stamp slices and hand the client to the
/// effects they launch.
#[derive(Clone)]
pub struct AdminEnvironment {
    /// Backend client shared by every launched operation
    pub api: Arc<ApiClient>,
    /// Time source for `last_updated` and error timestamps
    pub clock: Arc<dyn Clock>,
}

impl AdminEnvironment {
    /// Create an environment from its parts.
    #[must_use]
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            api: Arc::new(api),
            clock,
        }
    }

    /// Production environment: a client for `config` and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Construction`] if the HTTP client cannot be built.
    pub fn from_config(config: &AdminConfig) -> Result<Self, RequestError> {
        Ok(Self::new(ApiClient::new(config)?, Arc::new(SystemClock)))
    }
}

impl std::fmt::Debug for AdminEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminEnvironment")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
