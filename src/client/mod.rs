//! Client layer: request execution, error classification, and orchestration.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{
    AuthSession, AuthToken, CaseId, DeviceIdentity, SessionId, ValidationError,
};

mod api;
mod login;

pub use api::SendMessageOptions;
pub use login::{CancelSignal, FixedCodeProvider, LoginState, OtpCodeProvider, SmsLoginFlow};

/// Base URL of the emulated app's backend.
pub const DEFAULT_BASE_URL: &str = "https://prod-api.hingeaws.net";

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Boxed future alias used by the injectable capability traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// HTTP method of an outbound call.
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Canonical wire form of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A raw HTTP response as returned by the transport.
///
/// Successful responses (status < 400) are handed back to the caller
/// unmodified; everything else is classified into a [`HingeError`].
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
/// Transport-level failure: no HTTP response was obtained.
pub(crate) struct TransportFailure {
    /// Failure kind, e.g. `timeout`, `connect`, `request`.
    pub kind: String,
    pub message: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        method: HttpMethod,
        url: &'a str,
        headers: &'a [(String, String)],
        body: Option<&'a str>,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn failure_from(err: &reqwest::Error) -> TransportFailure {
        let kind = if err.is_timeout() {
            "timeout"
        } else if err.is_connect() {
            "connect"
        } else {
            "request"
        };
        TransportFailure {
            kind: kind.to_owned(),
            message: err.to_string(),
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        method: HttpMethod,
        url: &'a str,
        headers: &'a [(String, String)],
        body: Option<&'a str>,
    ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>> {
        Box::pin(async move {
            let mut request = match method {
                HttpMethod::Get => self.client.get(url),
                HttpMethod::Post => self.client.post(url),
            };
            for (name, value) in headers {
                request = request.header(name, value);
            }
            if let Some(body) = body {
                request = request.body(body.to_owned());
            }

            let response = request
                .send()
                .await
                .map_err(|err| Self::failure_from(&err))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|err| Self::failure_from(&err))?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Structured payload attached to [`HingeError`] variants.
///
/// Invariant: `request_headers` never contains the authorization value; it is
/// stripped case-insensitively before the payload is built.
pub struct ErrorDetails {
    /// HTTP status code, when a response was received.
    pub status_code: Option<u16>,
    /// Endpoint URL of the failed call.
    pub endpoint: Option<String>,
    /// HTTP method of the failed call.
    pub method: Option<String>,
    /// Transport failure kind (`timeout`, `connect`, `request`).
    pub exception_type: Option<String>,
    /// Request headers with the authorization entry removed.
    pub request_headers: Option<BTreeMap<String, String>>,
    /// Request body as sent, if any.
    pub request_body: Option<String>,
    /// Raw response body, if any.
    pub response_body: Option<String>,
    /// Secondary-verification case id from a 412 verify response.
    pub case_id: Option<CaseId>,
    /// Human-readable message supplied by the server, when present.
    pub server_message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
/// Errors produced by the request layer and the login flow.
///
/// Classification invariant: HTTP 401 and 412 map to [`HingeError::Auth`];
/// every other status ≥ 400 maps to [`HingeError::Request`]; transport
/// failures (no response obtained) map to [`HingeError::Api`]. Callers match
/// on the variant; there is no local recovery or retry at this layer.
pub enum HingeError {
    /// General failure: transport error, unparseable response, or a missing
    /// expected field.
    #[error("API error: {message}")]
    Api {
        message: String,
        details: ErrorDetails,
    },

    /// Authentication or authorization failure (401/412, or a
    /// secondary-verification requirement).
    #[error("authentication error: {message}")]
    Auth {
        message: String,
        details: ErrorDetails,
    },

    /// Any other HTTP error status.
    #[error("request error: status {status}: {message}")]
    Request {
        status: u16,
        message: String,
        body: Option<String>,
        details: ErrorDetails,
    },

    /// The injected cancellation signal fired during login.
    #[error("login cancelled")]
    Cancelled,

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl HingeError {
    /// The structured payload, for variants that carry one.
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::Api { details, .. }
            | Self::Auth { details, .. }
            | Self::Request { details, .. } => Some(details),
            Self::Cancelled | Self::Validation(_) => None,
        }
    }

    /// HTTP status code, when a response was received.
    pub fn status_code(&self) -> Option<u16> {
        self.details().and_then(|details| details.status_code)
    }

    /// Whether this is an authentication/authorization failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

/// Copy of the request headers with the authorization entry removed,
/// comparing header names case-insensitively.
pub(crate) fn sanitize_headers(headers: &[(String, String)]) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case(AuthToken::HEADER))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

pub(crate) fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_owned(), JSON_CONTENT_TYPE.to_owned())]
}

pub(crate) fn endpoint_url(base: &str, path: &str) -> Result<Url, HingeError> {
    let base_url = Url::parse(base).map_err(|_| ValidationError::InvalidBaseUrl {
        input: base.to_owned(),
    })?;
    let joined = base_url
        .join(path)
        .map_err(|_| ValidationError::InvalidBaseUrl {
            input: path.to_owned(),
        })?;
    Ok(joined)
}

#[derive(Clone)]
/// Wraps the pooled HTTP session: merges identity headers with per-call
/// headers, performs the call, and classifies failures into [`HingeError`].
pub struct RequestExecutor {
    identity: DeviceIdentity,
    auth_token: Option<AuthToken>,
    session_id: Option<SessionId>,
    http: Arc<dyn HttpTransport>,
}

impl RequestExecutor {
    pub(crate) fn new(
        identity: DeviceIdentity,
        auth_token: Option<AuthToken>,
        session_id: Option<SessionId>,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            identity,
            auth_token,
            session_id,
            http,
        }
    }

    /// The identity this executor stamps onto every call.
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Merge caller headers with identity headers.
    ///
    /// Precedence: caller-supplied values win, except the fixed identity
    /// fields that define the emulated client, which always win. Header names
    /// are normalized to lowercase first.
    fn merge_headers(&self, caller: &[(String, String)]) -> Vec<(String, String)> {
        let mut merged: BTreeMap<String, String> = caller
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect();
        for (name, value) in self
            .identity
            .build_headers(self.auth_token.as_ref(), self.session_id.as_ref())
        {
            merged.insert(name, value);
        }
        merged.into_iter().collect()
    }

    /// Execute one HTTP call and classify the outcome.
    ///
    /// Does not return until a response or a transport failure is known.
    /// Successful responses (status < 400) come back unmodified.
    pub async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        headers: &[(String, String)],
        body: Option<String>,
    ) -> Result<HttpResponse, HingeError> {
        let merged = self.merge_headers(headers);
        tracing::debug!(method = method.as_str(), url, "sending request");

        let response = match self.http.send(method, url, &merged, body.as_deref()).await {
            Ok(response) => response,
            Err(failure) => {
                tracing::warn!(
                    method = method.as_str(),
                    url,
                    kind = %failure.kind,
                    "transport failure"
                );
                return Err(HingeError::Api {
                    message: format!("request failed: {}", failure.message),
                    details: ErrorDetails {
                        exception_type: Some(failure.kind),
                        endpoint: Some(url.to_owned()),
                        method: Some(method.as_str().to_owned()),
                        ..Default::default()
                    },
                });
            }
        };

        tracing::debug!(
            method = method.as_str(),
            url,
            status = response.status,
            "received response"
        );
        if response.status < 400 {
            return Ok(response);
        }

        let response_body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body.clone())
        };
        let details = ErrorDetails {
            status_code: Some(response.status),
            endpoint: Some(url.to_owned()),
            method: Some(method.as_str().to_owned()),
            request_headers: Some(sanitize_headers(&merged)),
            request_body: body,
            response_body: response_body.clone(),
            ..Default::default()
        };

        match response.status {
            401 => Err(HingeError::Auth {
                message: "authentication failed".to_owned(),
                details,
            }),
            412 => Err(HingeError::Auth {
                message: "precondition failed".to_owned(),
                details,
            }),
            status => Err(HingeError::Request {
                status,
                message: format!("HTTP status {status}"),
                body: response_body,
                details,
            }),
        }
    }
}

#[derive(Clone)]
/// High-level client bound to an [`AuthSession`].
///
/// Construct via [`HingeClient::builder`] with an existing token, or through
/// [`HingeClient::login_with_sms`] to run the OTP login flow first.
pub struct HingeClient {
    executor: RequestExecutor,
    base_url: String,
    session: AuthSession,
}

impl HingeClient {
    /// Start building a client with custom settings.
    pub fn builder() -> HingeClientBuilder {
        HingeClientBuilder::new()
    }

    /// Create a client from an existing bearer token with default identity
    /// and endpoint settings.
    pub fn with_token(auth_token: AuthToken) -> Self {
        HingeClientBuilder::new().auth_token(auth_token).build()
    }

    /// The session this client is bound to.
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// The executor bound to this client's session headers.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, HingeError> {
        endpoint_url(&self.base_url, path)
    }

    /// Execute a call against a path on the configured backend, with the full
    /// identity/session header set applied.
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(String, String)],
        body: Option<String>,
    ) -> Result<HttpResponse, HingeError> {
        let url = self.endpoint(path)?;
        self.executor.execute(method, url.as_str(), headers, body).await
    }
}

#[derive(Clone)]
/// Builder for [`HingeClient`].
///
/// Use this to customize the device identity, backend URL, session, or
/// request timeout.
pub struct HingeClientBuilder {
    identity: DeviceIdentity,
    base_url: String,
    timeout: Option<Duration>,
    session: AuthSession,
    http: Option<Arc<dyn HttpTransport>>,
}

impl HingeClientBuilder {
    fn new() -> Self {
        Self {
            identity: DeviceIdentity::default(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            session: AuthSession::empty(),
            http: None,
        }
    }

    /// Use a specific device identity instead of the defaults.
    pub fn identity(mut self, identity: DeviceIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Override the backend base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bind the client to an existing bearer token.
    ///
    /// No session id is assumed; the `x-session-id` header stays absent
    /// until a full session is bound via [`Self::session`].
    pub fn auth_token(mut self, auth_token: AuthToken) -> Self {
        self.session = AuthSession::with_token(auth_token);
        self
    }

    /// Bind the client to a full session, e.g. one produced by the login flow.
    pub fn session(mut self, session: AuthSession) -> Self {
        self.session = session;
        self
    }

    #[cfg(test)]
    pub(crate) fn transport(mut self, http: Arc<dyn HttpTransport>) -> Self {
        self.http = Some(http);
        self
    }

    /// Build a [`HingeClient`].
    pub fn build(self) -> HingeClient {
        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                match builder.build() {
                    Ok(client) => Arc::new(ReqwestTransport { client }) as Arc<dyn HttpTransport>,
                    // Falls back to the default pooled client; builder failure
                    // here only occurs with an unusable TLS backend.
                    Err(_) => Arc::new(ReqwestTransport::new()) as Arc<dyn HttpTransport>,
                }
            }
        };
        let executor = RequestExecutor::new(
            self.identity,
            self.session.auth_token().cloned(),
            self.session.session_id().cloned(),
            http,
        );
        HingeClient {
            executor,
            base_url: self.base_url,
            session: self.session,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::{BoxFuture, HttpMethod, HttpResponse, HttpTransport, TransportFailure};

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedRequest {
        pub method: HttpMethod,
        pub url: String,
        pub headers: Vec<(String, String)>,
        pub body: Option<String>,
    }

    /// Fake transport replaying a queue of canned outcomes and recording
    /// every request it receives.
    #[derive(Clone)]
    pub(crate) struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    struct FakeTransportState {
        responses: VecDeque<Result<HttpResponse, TransportFailure>>,
        requests: Vec<RecordedRequest>,
    }

    impl FakeTransport {
        pub(crate) fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    responses: VecDeque::new(),
                    requests: Vec::new(),
                })),
            }
        }

        pub(crate) fn single(status: u16, body: impl Into<String>) -> Self {
            let transport = Self::new();
            transport.push_response(status, body);
            transport
        }

        pub(crate) fn push_response(&self, status: u16, body: impl Into<String>) {
            self.state.lock().unwrap().responses.push_back(Ok(HttpResponse {
                status,
                body: body.into(),
            }));
        }

        pub(crate) fn push_failure(&self, kind: &str, message: &str) {
            self.state
                .lock()
                .unwrap()
                .responses
                .push_back(Err(TransportFailure {
                    kind: kind.to_owned(),
                    message: message.to_owned(),
                }));
        }

        pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
            self.state.lock().unwrap().requests.clone()
        }

        pub(crate) fn last_request(&self) -> Option<RecordedRequest> {
            self.state.lock().unwrap().requests.last().cloned()
        }
    }

    impl HttpTransport for FakeTransport {
        fn send<'a>(
            &'a self,
            method: HttpMethod,
            url: &'a str,
            headers: &'a [(String, String)],
            body: Option<&'a str>,
        ) -> BoxFuture<'a, Result<HttpResponse, TransportFailure>> {
            Box::pin(async move {
                let mut state = self.state.lock().unwrap();
                state.requests.push(RecordedRequest {
                    method,
                    url: url.to_owned(),
                    headers: headers.to_vec(),
                    body: body.map(str::to_owned),
                });
                state.responses.pop_front().unwrap_or_else(|| {
                    Err(TransportFailure {
                        kind: "request".to_owned(),
                        message: "no canned response left".to_owned(),
                    })
                })
            })
        }
    }

    pub(crate) fn header_value<'a>(
        headers: &'a [(String, String)],
        name: &str,
    ) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
