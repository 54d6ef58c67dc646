use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Bearer token returned by a successful login.
///
/// Invariant: non-empty after trimming. The token is sent as
/// `authorization: Bearer <token>` and must never appear in logs or error
/// details.
pub struct AuthToken(String);

impl AuthToken {
    /// Header name the token is sent under.
    pub const HEADER: &'static str = "authorization";

    /// Create a validated [`AuthToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::HEADER,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Header value in `Bearer <token>` form.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Session identifier (`x-session-id` header, `sessionId` wire field).
///
/// Invariant: non-empty after trimming.
pub struct SessionId(String);

impl SessionId {
    /// Header name the session id is sent under.
    pub const HEADER: &'static str = "x-session-id";

    /// JSON field name used on the wire (`sessionId`).
    pub const FIELD: &'static str = "sessionId";

    /// Create a validated [`SessionId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a fresh random session id.
    ///
    /// Used when the verify response omits `sessionId`; the backend accepts a
    /// client-generated value.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the validated session id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// User identifier (`playerId` on the wire).
///
/// Invariant: non-empty after trimming.
pub struct UserId(String);

impl UserId {
    /// JSON field name used on the wire (`playerId`).
    pub const FIELD: &'static str = "playerId";

    /// Create a validated [`UserId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated user id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Device identifier (`x-device-id` header, `deviceId` wire field).
///
/// Invariant: non-empty after trimming.
pub struct DeviceId(String);

impl DeviceId {
    /// Header name the device id is sent under.
    pub const HEADER: &'static str = "x-device-id";

    /// JSON field name used on the wire (`deviceId`).
    pub const FIELD: &'static str = "deviceId";

    /// Create a validated [`DeviceId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a random Android-style device id (16 lowercase hex digits).
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(hex[..16].to_owned())
    }

    /// Borrow the validated device id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Installation identifier (`x-install-id` header, `installId` wire field).
///
/// Invariant: non-empty after trimming.
pub struct InstallId(String);

impl InstallId {
    /// Header name the install id is sent under.
    pub const HEADER: &'static str = "x-install-id";

    /// JSON field name used on the wire (`installId`).
    pub const FIELD: &'static str = "installId";

    /// Create a validated [`InstallId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a fresh random install id (UUID form, matching the app).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the validated install id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// One-time passcode delivered via SMS (`otp` wire field).
///
/// Invariant: non-empty after trimming. No digit/length check is applied; the
/// backend is the authority on code shape.
pub struct OtpCode(String);

impl OtpCode {
    /// JSON field name used on the wire (`otp`).
    pub const FIELD: &'static str = "otp";

    /// Create a validated [`OtpCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of a secondary verification challenge (`caseId` on the wire).
///
/// Returned by the verify endpoint instead of a token when email confirmation
/// is required.
pub struct CaseId(String);

impl CaseId {
    /// JSON field name used on the wire (`caseId`).
    pub const FIELD: &'static str = "caseId";

    /// Create a validated [`CaseId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated case id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated phone number as sent to the backend (`phoneNumber`).
///
/// Invariant: non-empty after trimming. This type does not normalize; if you
/// want E.164 normalization, parse into [`PhoneNumber`] and convert it into
/// [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// JSON field name used on the wire (`phoneNumber`).
    pub const FIELD: &'static str = "phoneNumber";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to the backend.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Convert an already-parsed phone number to a normalized raw value (E.164).
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// JSON field name used on the wire (`phoneNumber`).
    pub const FIELD: &'static str = "phoneNumber";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit
    /// country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let token = AuthToken::new("  tok ").unwrap();
        assert_eq!(token.as_str(), "tok");
        assert_eq!(token.bearer(), "Bearer tok");
        assert!(AuthToken::new("  ").is_err());

        let session = SessionId::new(" s1 ").unwrap();
        assert_eq!(session.as_str(), "s1");
        assert!(SessionId::new("").is_err());

        let user = UserId::new(" u1 ").unwrap();
        assert_eq!(user.as_str(), "u1");
        assert!(UserId::new("  ").is_err());

        let device = DeviceId::new(" b4b578b8250e8ca8 ").unwrap();
        assert_eq!(device.as_str(), "b4b578b8250e8ca8");
        assert!(DeviceId::new("  ").is_err());

        let install = InstallId::new(" 735de715-0876-45c5-be1e-aecdf8cb42d1 ").unwrap();
        assert_eq!(install.as_str(), "735de715-0876-45c5-be1e-aecdf8cb42d1");
        assert!(InstallId::new("").is_err());

        let otp = OtpCode::new(" 123456 ").unwrap();
        assert_eq!(otp.as_str(), "123456");
        assert!(OtpCode::new("   ").is_err());

        let case = CaseId::new(" C1 ").unwrap();
        assert_eq!(case.as_str(), "C1");
        assert!(CaseId::new("  ").is_err());
    }

    #[test]
    fn generated_session_ids_are_non_empty_and_distinct() {
        let a = SessionId::generate();
        let b = SessionId::generate();
        assert!(!a.as_str().is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn generated_device_id_is_sixteen_hex_digits() {
        let id = DeviceId::generate();
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_install_ids_are_distinct() {
        assert_ne!(InstallId::generate(), InstallId::generate());
    }

    #[test]
    fn raw_phone_number_trims_and_exposes_raw() {
        let raw = RawPhoneNumber::new(" +12025550123 ").unwrap();
        assert_eq!(raw.raw(), "+12025550123");
        assert!(RawPhoneNumber::new("").is_err());
    }

    #[test]
    fn phone_number_parsing_and_equality_use_e164() {
        let p1 = PhoneNumber::parse(None, "+12025550123").unwrap();
        let p2 = PhoneNumber::parse(None, "+1 202 555-0123").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.e164(), "+12025550123");

        let raw: RawPhoneNumber = p1.clone().into();
        assert_eq!(raw.raw(), "+12025550123");
        assert!(PhoneNumber::parse(None, "not-a-number").is_err());
    }

    #[test]
    fn phone_number_parses_with_default_region() {
        let pn = PhoneNumber::parse(Some(country::Id::US), "2025550123").unwrap();
        assert_eq!(pn.e164(), "+12025550123");
    }
}
