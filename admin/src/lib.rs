//! # Folio Admin
//!
//! Admin client for the Folio portfolio backend.
//!
//! Every piece of site content (session, about, hero, contact, education,
//! projects, services, skills) is a slice of one [`AdminState`]. Remote
//! operations run as effects of the slice reducers and feed their settled
//! lifecycle actions back into the [`AdminStore`].
//!
//! ## Layers
//!
//! - [`envelope`]: the HTTP request envelope (timeout, cancellation, status policy)
//! - [`error`]: request failures and their normalized messages
//! - [`thunk`]: operation descriptors turning a typed input into a request
//! - [`slices`]: per-domain state, actions, and reducers
//! - [`store`]: the composed state tree and the dispatch helper
//!
//! ## Example
//!
//! ```ignore
//! use folio_admin::{AdminConfig, AdminEnvironment, admin_store, dispatch};
//!
//! let config = AdminConfig::from_env()?;
//! let store = admin_store(AdminEnvironment::from_config(&config)?);
//!
//! dispatch(
//!     &store,
//!     AdminAction::Services(ServicesAction::FetchAll(Lifecycle::start(()))),
//!     Duration::from_secs(20),
//! )
//! .await?;
//! ```

pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod environment;
pub mod error;
pub mod form;
pub mod inputs;
pub mod models;
pub mod slices;
pub mod store;
pub mod thunk;

pub use config::{AdminConfig, ConfigError};
pub use envelope::{ApiClient, CancelHandle, HttpMethod, StatusPolicy};
pub use environment::AdminEnvironment;
pub use error::{ErrorClass, RequestError};
pub use form::{FileUpload, FormData};
pub use store::{AdminAction, AdminState, AdminStore, DispatchError, admin_reducer, admin_store, dispatch};
pub use thunk::Thunk;
