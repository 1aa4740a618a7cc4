//! Thunk factory
//!
//! A [`Thunk`] describes one remote operation: its name, endpoint, method,
//! body encoding and status policy. Running it renders the path from the
//! operation input, sends the request through the [`ApiClient`], decodes the
//! `{ data }` envelope and normalizes any failure into a message.
//!
//! Slice reducers launch thunks as effects with [`Thunk::launch`]; the effect
//! feeds back exactly one `Fulfilled` or `Rejected` lifecycle action.
//!
//! ```ignore
//! const GET_ALL: Thunk = Thunk::new("getAllProjects", HttpMethod::Get, endpoints::projects::GET_ALL);
//! const CREATE: Thunk = Thunk::new("createProject", HttpMethod::Post, endpoints::projects::CREATE).multipart();
//! ```

use crate::endpoints::Endpoint;
use crate::envelope::{ApiClient, ApiRequest, HttpMethod, RequestBody, StatusPolicy};
use crate::error::RequestError;
use crate::form::FormData;
use folio_core::effect::Effect;
use folio_core::{CancelSignal, Lifecycle};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// How a request payload is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    /// `application/json`
    #[default]
    Json,
    /// `multipart/form-data`; JSON object payloads become text fields
    Multipart,
}

/// Body content provided by an operation input.
#[derive(Debug, Clone, Default)]
pub enum Payload {
    /// Nothing to send
    #[default]
    None,
    /// A JSON value
    Json(Value),
    /// A prepared form
    Form(FormData),
}

/// Input of a remote operation.
///
/// Supplies the values for path placeholders and the request payload. Inputs
/// that carry an identifier and a nested payload (update forms, skills inside
/// a category) expose only the nested part as payload.
pub trait ThunkInput {
    /// Value for the `{name}` placeholder.
    fn path_param(&self, _name: &str) -> Option<String> {
        None
    }

    /// Request payload.
    fn payload(&self) -> Payload {
        Payload::None
    }
}

/// Descriptor of one remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thunk {
    name: &'static str,
    method: HttpMethod,
    endpoint: Endpoint,
    encoding: BodyEncoding,
    policy: StatusPolicy,
}

impl Thunk {
    /// A JSON operation accepting only 2xx responses.
    #[must_use]
    pub const fn new(name: &'static str, method: HttpMethod, endpoint: Endpoint) -> Self {
        Self {
            name,
            method,
            endpoint,
            encoding: BodyEncoding::Json,
            policy: StatusPolicy::Success2xx,
        }
    }

    /// Send the payload as `multipart/form-data`.
    #[must_use]
    pub const fn multipart(mut self) -> Self {
        self.encoding = BodyEncoding::Multipart;
        self
    }

    /// Accept the statuses of `policy` as success.
    #[must_use]
    pub const fn accepting(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The operation name (`getAllProjects`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// The endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Statuses treated as success.
    #[must_use]
    pub const fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Message used when a failure carries nothing better:
    /// `getAllProjects` → `Failed to get all projects`.
    #[must_use]
    pub fn default_message(&self) -> String {
        format!("Failed to {}", humanize(self.name))
    }

    /// Build the envelope request for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Construction`] if a path parameter is missing or
    /// the payload cannot be encoded as multipart.
    pub fn build_request<I>(&self, api: &ApiClient, input: &I) -> Result<ApiRequest, RequestError>
    where
        I: ThunkInput,
    {
        let path = self.endpoint.render(|name| input.path_param(name))?;
        let request = ApiRequest::new(self.method, path, api.timeout_for(self.method)).policy(self.policy);

        if !self.method.has_body() {
            return Ok(request);
        }

        let body = match (self.encoding, input.payload()) {
            (_, Payload::None) => RequestBody::Empty,
            (_, Payload::Form(form)) => RequestBody::Multipart(form),
            (BodyEncoding::Json, Payload::Json(value)) => RequestBody::Json(value),
            (BodyEncoding::Multipart, Payload::Json(Value::Object(object))) => {
                RequestBody::Multipart(FormData::from_json_object(&object))
            },
            (BodyEncoding::Multipart, Payload::Json(other)) => {
                return Err(RequestError::Construction(format!(
                    "{} expects form fields, got {other}",
                    self.name
                )));
            },
        };

        Ok(request.body(body))
    }

    /// Run the operation and decode its payload.
    ///
    /// # Errors
    ///
    /// Returns the normalized failure message.
    #[tracing::instrument(skip(self, api, input, signal), fields(operation = self.name))]
    pub async fn run<I, T>(&self, api: &ApiClient, input: &I, signal: &CancelSignal) -> Result<T, String>
    where
        I: ThunkInput,
        T: DeserializeOwned,
    {
        let outcome = match self.build_request(api, input) {
            Ok(request) => match api.execute(request, signal).await {
                Ok(response) => response.into_data::<T>(),
                Err(error) => Err(error),
            },
            Err(error) => Err(error),
        };

        outcome.map_err(|error| {
            let message = error.normalize(&self.default_message());
            tracing::warn!(class = ?error.class(), %error, %message, "Operation rejected");
            message
        })
    }

    /// Effect that runs the operation and feeds back its settled lifecycle action.
    pub fn launch<I, T, A>(
        self,
        api: Arc<ApiClient>,
        input: I,
        signal: CancelSignal,
        wrap: fn(Lifecycle<I, T>) -> A,
    ) -> Effect<A>
    where
        I: ThunkInput + Send + Sync + 'static,
        T: DeserializeOwned + Send + 'static,
        A: Send + 'static,
    {
        folio_core::async_effect! {
            let settled = match self.run::<I, T>(&api, &input, &signal).await {
                Ok(payload) => {
                    tracing::debug!(operation = self.name, "Operation fulfilled");
                    Lifecycle::Fulfilled { input, payload }
                },
                Err(error) => Lifecycle::Rejected { input, error },
            };
            Some(wrap(settled))
        }
    }
}

/// Split a camelCase operation name into lowercase words.
///
/// Runs of capitals stay one word: `generateOTP` → `generate otp`.
fn humanize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words = String::with_capacity(name.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(' ');
            }
        }
        words.extend(c.to_lowercase());
    }

    words
}
