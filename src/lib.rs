//! Typed Rust client for the Hinge private mobile API.
//!
//! The crate emulates the official Android client: a [`DeviceIdentity`]
//! produces the fixed header set, a request executor performs authenticated
//! calls and classifies failures into [`HingeError`], and [`SmsLoginFlow`]
//! drives the SMS one-time-passcode login that yields an [`AuthSession`].
//! The design follows three layers: a domain layer of strong types, a
//! transport layer for wire-format details, and a client layer orchestrating
//! requests.
//!
//! ```rust,no_run
//! use hingesdk::{
//!     DeviceIdentity, FixedCodeProvider, HingeClient, OtpCode, RawPhoneNumber,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hingesdk::HingeError> {
//!     let phone = RawPhoneNumber::new("+12025550123")?;
//!     let code = FixedCodeProvider::new(OtpCode::new("123456")?);
//!     let client =
//!         HingeClient::login_with_sms(phone, DeviceIdentity::default(), code).await?;
//!     let recs = client.get_recommendations(false, false).await?;
//!     println!("{recs}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    CancelSignal, DEFAULT_BASE_URL, ErrorDetails, FixedCodeProvider, HingeClient,
    HingeClientBuilder, HingeError, HttpMethod, HttpResponse, LoginState, OtpCodeProvider,
    RequestExecutor, SendMessageOptions, SmsLoginFlow,
};
pub use domain::{
    AuthSession, AuthSettings, AuthToken, CaseId, DeviceId, DeviceIdentity,
    DeviceIdentityBuilder, InstallId, LikeLimit, OtpCode, PhoneNumber, RawPhoneNumber, SessionId,
    UserId, ValidationError,
};
