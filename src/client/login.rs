//! SMS OTP login flow: initiate, await a code, verify, yield a session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::client::{
    BoxFuture, DEFAULT_BASE_URL, ErrorDetails, HingeClient, HingeError, HttpMethod,
    HttpTransport, ReqwestTransport, RequestExecutor, endpoint_url, json_headers,
};
use crate::domain::{
    AuthSession, AuthToken, CaseId, DeviceIdentity, OtpCode, RawPhoneNumber, SessionId, UserId,
};
use crate::transport::{
    decode_verify_json_response, encode_initiate_json_body, encode_verify_json_body,
};

pub(crate) const SMS_INITIATE_PATH: &str = "/auth/sms/v2/initiate";
pub(crate) const SMS_VERIFY_PATH: &str = "/auth/sms/v2";

/// Supplies the one-time passcode once the user has received it.
///
/// The contract is blocking: the returned future must not resolve until a
/// code is available or acquisition has failed. The flow applies no timeout
/// of its own; pair with a [`CancelSignal`] to abort externally.
pub trait OtpCodeProvider: Send + Sync {
    fn otp_code<'a>(&'a self) -> BoxFuture<'a, Result<OtpCode, HingeError>>;
}

#[derive(Debug, Clone)]
/// Provider that hands out a pre-arranged code; useful for tests and
/// scripted logins.
pub struct FixedCodeProvider {
    code: OtpCode,
}

impl FixedCodeProvider {
    /// Wrap an already-known code.
    pub fn new(code: OtpCode) -> Self {
        Self { code }
    }
}

impl OtpCodeProvider for FixedCodeProvider {
    fn otp_code<'a>(&'a self) -> BoxFuture<'a, Result<OtpCode, HingeError>> {
        let code = self.code.clone();
        Box::pin(async move { Ok(code) })
    }
}

#[derive(Debug, Clone, Default)]
/// Cooperative cancellation for a login attempt.
///
/// The flow checks the signal before waiting for a code and again before the
/// verify call; once triggered, the attempt aborts with
/// [`HingeError::Cancelled`].
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
}

impl CancelSignal {
    /// A fresh, untriggered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Observable states of the login flow.
pub enum LoginState {
    Unauthenticated,
    Initiating,
    AwaitingCode,
    Verifying,
    Authenticated,
    /// Absorbing state; the error returned from [`SmsLoginFlow::run`] carries
    /// the reason.
    Failed,
}

/// Drives the two-call OTP login protocol.
///
/// `Unauthenticated → Initiating → AwaitingCode → Verifying → Authenticated`,
/// with `Failed` reachable from `Initiating`, `Verifying`, and the
/// cancellation checks. A single failure at any step aborts the attempt; no
/// retries happen at this layer.
pub struct SmsLoginFlow<P> {
    identity: DeviceIdentity,
    phone: RawPhoneNumber,
    base_url: String,
    executor: RequestExecutor,
    code_provider: P,
    cancel: CancelSignal,
    state: LoginState,
}

impl<P: OtpCodeProvider> SmsLoginFlow<P> {
    /// Create a flow against the default backend with a fresh, untriggered
    /// cancel signal. The executor is unauthenticated by construction.
    pub fn new(phone: RawPhoneNumber, identity: DeviceIdentity, code_provider: P) -> Self {
        Self::with_transport(phone, identity, code_provider, Arc::new(ReqwestTransport::new()))
    }

    pub(crate) fn with_transport(
        phone: RawPhoneNumber,
        identity: DeviceIdentity,
        code_provider: P,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        let executor = RequestExecutor::new(identity.clone(), None, None, http);
        Self {
            identity,
            phone,
            base_url: DEFAULT_BASE_URL.to_owned(),
            executor,
            code_provider,
            cancel: CancelSignal::new(),
            state: LoginState::Unauthenticated,
        }
    }

    /// Override the backend base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Install a shared cancellation signal.
    pub fn cancel_signal(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Current state of the flow.
    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Run the protocol to completion, producing a populated session.
    ///
    /// Blocks (in the async sense) on the code provider; there is no internal
    /// timeout. Every error leaves the flow in [`LoginState::Failed`].
    pub async fn run(&mut self) -> Result<AuthSession, HingeError> {
        self.state = LoginState::Initiating;
        if let Err(err) = self.initiate().await {
            self.state = LoginState::Failed;
            return Err(err);
        }

        self.state = LoginState::AwaitingCode;
        if self.cancel.is_cancelled() {
            self.state = LoginState::Failed;
            return Err(HingeError::Cancelled);
        }
        tracing::debug!("awaiting one-time passcode");
        let code = match self.code_provider.otp_code().await {
            Ok(code) => code,
            Err(err) => {
                self.state = LoginState::Failed;
                return Err(err);
            }
        };
        if self.cancel.is_cancelled() {
            self.state = LoginState::Failed;
            return Err(HingeError::Cancelled);
        }

        self.state = LoginState::Verifying;
        let session = match self.verify(&code).await {
            Ok(session) => session,
            Err(err) => {
                self.state = LoginState::Failed;
                return Err(err);
            }
        };

        self.state = LoginState::Authenticated;
        tracing::info!("sms login complete");
        Ok(session)
    }

    /// POST the initiate call. Any success status counts; the response body
    /// is ignored — the subsequent OTP alone completes the protocol.
    async fn initiate(&self) -> Result<(), HingeError> {
        let url = endpoint_url(&self.base_url, SMS_INITIATE_PATH)?;
        let body = encode_initiate_json_body(&self.phone, self.identity.device_id());
        tracing::debug!("initiating sms login");
        self.executor
            .execute(HttpMethod::Post, url.as_str(), &json_headers(), Some(body))
            .await?;
        Ok(())
    }

    async fn verify(&self, code: &OtpCode) -> Result<AuthSession, HingeError> {
        let url = endpoint_url(&self.base_url, SMS_VERIFY_PATH)?;
        let body = encode_verify_json_body(
            &self.phone,
            self.identity.device_id(),
            self.identity.install_id(),
            code,
        );
        let response = match self
            .executor
            .execute(HttpMethod::Post, url.as_str(), &json_headers(), Some(body))
            .await
        {
            Ok(response) => response,
            Err(err) => return Err(map_verify_error(err)),
        };

        let fields = decode_verify_json_response(&response.body).map_err(|_| {
            HingeError::Api {
                message: "failed to parse verification response".to_owned(),
                details: ErrorDetails {
                    status_code: Some(response.status),
                    response_body: Some(response.body.clone()),
                    ..Default::default()
                },
            }
        })?;

        let Some(token) = fields.token.filter(|t| !t.trim().is_empty()) else {
            return Err(HingeError::Api {
                message: "failed to retrieve authentication token".to_owned(),
                details: ErrorDetails {
                    status_code: Some(response.status),
                    response_body: Some(response.body.clone()),
                    ..Default::default()
                },
            });
        };
        let token = AuthToken::new(token)?;

        let user_id = fields
            .player_id
            .filter(|id| !id.trim().is_empty())
            .map(UserId::new)
            .transpose()?;

        let session_id = match fields.session_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => SessionId::new(id)?,
            None => {
                tracing::debug!("verify response missing sessionId; generating a fresh one");
                SessionId::generate()
            }
        };

        Ok(AuthSession::authenticated(token, user_id, session_id))
    }
}

/// A 412 from the verify endpoint signals a secondary verification challenge.
/// When the body carries a case id, surface it as the dedicated auth error;
/// otherwise the executor's classification stands.
fn map_verify_error(err: HingeError) -> HingeError {
    match err {
        HingeError::Auth {
            message,
            mut details,
        } if details.status_code == Some(412) => {
            let fields = details
                .response_body
                .as_deref()
                .and_then(|body| decode_verify_json_response(body).ok());
            let case_id = fields
                .as_ref()
                .and_then(|fields| fields.case_id.clone())
                .and_then(|id| CaseId::new(id).ok());
            match case_id {
                Some(case_id) => {
                    details.case_id = Some(case_id);
                    details.server_message =
                        fields.and_then(|fields| fields.message);
                    HingeError::Auth {
                        message: "email verification required".to_owned(),
                        details,
                    }
                }
                None => HingeError::Auth { message, details },
            }
        }
        other => other,
    }
}

impl HingeClient {
    /// Run the SMS OTP login flow and return a client bound to the resulting
    /// session.
    pub async fn login_with_sms<P: OtpCodeProvider>(
        phone: RawPhoneNumber,
        identity: DeviceIdentity,
        code_provider: P,
    ) -> Result<Self, HingeError> {
        let mut flow = SmsLoginFlow::new(phone, identity.clone(), code_provider);
        let session = flow.run().await?;
        Ok(HingeClient::builder().identity(identity).session(session).build())
    }
}
