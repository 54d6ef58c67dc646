//! Domain layer: strong types with validation and invariants (no I/O).

mod identity;
mod response;
mod session;
mod validation;
mod value;

pub use identity::{DeviceIdentity, DeviceIdentityBuilder};
pub use response::{AuthSettings, LikeLimit};
pub use session::AuthSession;
pub use validation::ValidationError;
pub use value::{
    AuthToken, CaseId, DeviceId, InstallId, OtpCode, PhoneNumber, RawPhoneNumber, SessionId,
    UserId,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_token_rejects_empty() {
        assert!(matches!(
            AuthToken::new("   "),
            Err(ValidationError::Empty {
                field: AuthToken::HEADER
            })
        ));
    }

    #[test]
    fn otp_code_rejects_empty() {
        assert!(matches!(
            OtpCode::new(""),
            Err(ValidationError::Empty {
                field: OtpCode::FIELD
            })
        ));
    }

    #[test]
    fn phone_number_parses_with_region_and_trims() {
        let pn = PhoneNumber::parse(Some(phonenumber::country::Id::US), " 2025550123 ").unwrap();
        assert_eq!(pn.raw(), "2025550123");
        assert_eq!(pn.e164(), "+12025550123");
    }

    #[test]
    fn raw_phone_number_from_phone_number_uses_e164() {
        let pn = PhoneNumber::parse(Some(phonenumber::country::Id::US), "2025550123").unwrap();
        let raw: RawPhoneNumber = pn.into();
        assert_eq!(raw.raw(), "+12025550123");
    }

    #[test]
    fn session_fallback_generation_is_random() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn identity_session_headers_follow_presence() {
        let identity = DeviceIdentity::default();
        let without = identity.build_headers(None, None);
        assert!(!without.contains_key(SessionId::HEADER));

        let session = SessionId::new("S").unwrap();
        let with = identity.build_headers(None, Some(&session));
        assert_eq!(with.get(SessionId::HEADER).map(String::as_str), Some("S"));
    }
}
