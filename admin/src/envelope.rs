//! Request envelope
//!
//! Every backend call goes through [`ApiClient`]. It attaches the session
//! cookies (one cookie jar shared by every request of the client), races the
//! transport against a deadline and a [`CancelSignal`], and classifies the
//! outcome as an [`ApiResponse`] or a [`RequestError`].
//!
//! When the deadline passes or the signal fires, the in-flight transport
//! future is dropped, which aborts the connection.

use crate::config::AdminConfig;
use crate::error::RequestError;
use crate::form::FormData;
use folio_core::CancelSignal;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// HTTP verbs used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Whether requests with this method carry a body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Whether this is a read.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Get)
    }

    const fn as_reqwest(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// Which response statuses count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Only 2xx
    #[default]
    Success2xx,
    /// Everything below 500 (the public message form reports validation
    /// problems in a 4xx body)
    BelowServerError,
}

impl StatusPolicy {
    /// Whether `status` is accepted.
    #[must_use]
    pub const fn accepts(self, status: u16) -> bool {
        match self {
            Self::Success2xx => status >= 200 && status < 300,
            Self::BelowServerError => status < 500,
        }
    }
}

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// `application/json`
    Json(Value),
    /// `multipart/form-data`
    Multipart(FormData),
}

/// One call through the envelope.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path relative to the base URL
    pub path: String,
    /// Body
    pub body: RequestBody,
    /// Extra headers
    pub headers: Vec<(String, String)>,
    /// Deadline for the whole exchange
    pub timeout: Duration,
    /// Accepted statuses
    pub policy: StatusPolicy,
}

impl ApiRequest {
    /// A bodiless request with the default status policy.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            headers: Vec::new(),
            timeout,
            policy: StatusPolicy::default(),
        }
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the status policy.
    #[must_use]
    pub const fn policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Accepted response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status
    pub status: u16,
    /// Parsed body. Empty bodies are `null`, non-JSON bodies are kept as a string.
    pub body: Value,
}

impl ApiResponse {
    /// Decode the `{ data }` envelope.
    ///
    /// When the body is an object with a `data` key, `data` is decoded;
    /// otherwise the whole body is.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Decode`] if the value does not match `T`.
    pub fn into_data<T>(self) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        let data = match self.body {
            Value::Object(mut object) if object.contains_key("data") => {
                object.remove("data").unwrap_or(Value::Null)
            },
            body => body,
        };

        serde_json::from_value(data).map_err(|e| RequestError::Decode(e.to_string()))
    }

    /// The top-level `message` field, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Pending result of [`ApiClient::send`].
pub type PendingResponse = Pin<Box<dyn Future<Output = Result<ApiResponse, RequestError>> + Send>>;

/// Cancels one request started with [`ApiClient::send`].
#[derive(Debug, Clone)]
pub struct CancelHandle {
    signal: CancelSignal,
    settled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancel with the default reason.
    ///
    /// Returns `false` if the request already settled or was already cancelled.
    pub fn cancel(&self) -> bool {
        !self.settled.load(Ordering::Acquire) && self.signal.cancel()
    }

    /// Cancel with a custom reason.
    ///
    /// Returns `false` if the request already settled or was already cancelled.
    pub fn cancel_with(&self, reason: impl Into<String>) -> bool {
        !self.settled.load(Ordering::Acquire) && self.signal.cancel_with(reason)
    }
}

/// HTTP client for the backend.
///
/// Cloning is cheap; clones share the connection pool and the cookie jar.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl ApiClient {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::Construction`] if the TLS backend cannot be initialized.
    pub fn new(config: &AdminConfig) -> Result<Self, RequestError> {
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| RequestError::Construction(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        })
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Deadline for a method class: reads use the read timeout, everything
    /// else the write timeout.
    #[must_use]
    pub const fn timeout_for(&self, method: HttpMethod) -> Duration {
        if method.is_read() {
            self.read_timeout
        } else {
            self.write_timeout
        }
    }

    /// Start a request and hand back its cancel handle.
    ///
    /// The request only makes progress while the returned future is polled.
    #[must_use]
    pub fn send(&self, request: ApiRequest) -> (PendingResponse, CancelHandle) {
        let signal = CancelSignal::new();
        let settled = Arc::new(AtomicBool::new(false));
        let handle = CancelHandle {
            signal: signal.clone(),
            settled: Arc::clone(&settled),
        };

        let client = self.clone();
        let pending = Box::pin(async move {
            let result = client.execute(request, &signal).await;
            settled.store(true, Ordering::Release);
            result
        });

        (pending, handle)
    }

    /// Run a request to completion, observing `signal` and the request deadline.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Cancelled`]: `signal` fired first
    /// - [`RequestError::Timeout`]: the deadline passed first
    /// - [`RequestError::Network`]: connection failed or the body was cut off
    /// - [`RequestError::Status`]: the status is not accepted by the request's policy
    /// - [`RequestError::Construction`]: the request could not be built
    #[tracing::instrument(
        skip(self, request, signal),
        fields(method = %request.method, path = %request.path)
    )]
    pub async fn execute(
        &self,
        request: ApiRequest,
        signal: &CancelSignal,
    ) -> Result<ApiResponse, RequestError> {
        let deadline = request.timeout;

        tokio::select! {
            biased;

            reason = signal.cancelled() => {
                tracing::debug!(%reason, "Request cancelled");
                Err(RequestError::Cancelled { reason })
            }

            outcome = tokio::time::timeout(deadline, self.transport(request)) => {
                outcome.unwrap_or_else(|_| {
                    tracing::debug!(timeout_ms = deadline.as_millis(), "Request timed out");
                    Err(RequestError::Timeout { after: deadline })
                })
            }
        }
    }

    async fn transport(&self, request: ApiRequest) -> Result<ApiResponse, RequestError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.as_reqwest(), &url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form.into_multipart()?),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                RequestError::Construction(e.to_string())
            } else {
                RequestError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RequestError::Network(e.to_string()))?;
        let body = parse_body(&bytes);

        tracing::debug!(status = status.as_u16(), "Response received");

        if request.policy.accepts(status.as_u16()) {
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(status_error(status, &body))
        }
    }
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn status_error(status: StatusCode, body: &Value) -> RequestError {
    RequestError::Status {
        status: status.as_u16(),
        status_text: status.canonical_reason().map(str::to_string),
        message: body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}
