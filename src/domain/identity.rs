use std::collections::BTreeMap;

use crate::domain::value::{AuthToken, DeviceId, InstallId, SessionId};

/// Default device/app identity values, matching the emulated client build.
mod defaults {
    pub const APP_VERSION: &str = "9.68.0";
    pub const OS_VERSION: &str = "14";
    pub const OS_VERSION_CODE: &str = "34";
    pub const DEVICE_MODEL: &str = "Pixel 6a";
    pub const MANUFACTURER: &str = "Google";
    pub const BUILD_NUMBER: &str = "168200482";
    pub const PLATFORM: &str = "android";
    pub const INSTALL_ID: &str = "735de715-0876-45c5-be1e-aecdf8cb42d1";
    pub const DEVICE_ID: &str = "b4b578b8250e8ca8";
    pub const ACCEPT_LANGUAGE: &str = "en-US";
    pub const DEVICE_REGION: &str = "US";
    pub const USER_AGENT: &str = "okhttp/4.12.0";
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable bag of client-emulation attributes.
///
/// Produces the fixed header set that makes outbound calls resemble a specific
/// mobile client build. Never mutated after construction; use
/// [`DeviceIdentity::builder`] to override individual fields.
pub struct DeviceIdentity {
    app_version: String,
    os_version: String,
    os_version_code: String,
    device_model: String,
    device_model_code: String,
    manufacturer: String,
    build_number: String,
    platform: String,
    install_id: InstallId,
    device_id: DeviceId,
    accept_language: String,
    device_region: String,
    user_agent: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        DeviceIdentityBuilder::new().build()
    }
}

impl DeviceIdentity {
    /// Start building an identity with the default field values.
    pub fn builder() -> DeviceIdentityBuilder {
        DeviceIdentityBuilder::new()
    }

    /// The device identifier sent as `x-device-id` and in login bodies.
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// The installation identifier sent as `x-install-id` and in login bodies.
    pub fn install_id(&self) -> &InstallId {
        &self.install_id
    }

    /// Build the identity header mapping.
    ///
    /// Pure and deterministic. The fixed identity fields are always present;
    /// `authorization` (as `Bearer <token>`) and `x-session-id` appear only
    /// when the corresponding value is supplied.
    pub fn build_headers(
        &self,
        auth_token: Option<&AuthToken>,
        session_id: Option<&SessionId>,
    ) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("x-app-version".to_owned(), self.app_version.clone());
        headers.insert("x-os-version".to_owned(), self.os_version.clone());
        headers.insert("x-os-version-code".to_owned(), self.os_version_code.clone());
        headers.insert("x-device-model".to_owned(), self.device_model.clone());
        headers.insert(
            "x-device-model-code".to_owned(),
            self.device_model_code.clone(),
        );
        headers.insert("x-device-manufacturer".to_owned(), self.manufacturer.clone());
        headers.insert("x-build-number".to_owned(), self.build_number.clone());
        headers.insert("x-device-platform".to_owned(), self.platform.clone());
        headers.insert(
            InstallId::HEADER.to_owned(),
            self.install_id.as_str().to_owned(),
        );
        headers.insert(
            DeviceId::HEADER.to_owned(),
            self.device_id.as_str().to_owned(),
        );
        headers.insert("accept-language".to_owned(), self.accept_language.clone());
        headers.insert("x-device-region".to_owned(), self.device_region.clone());
        headers.insert("user-agent".to_owned(), self.user_agent.clone());

        if let Some(token) = auth_token {
            headers.insert(AuthToken::HEADER.to_owned(), token.bearer());
        }
        if let Some(session) = session_id {
            headers.insert(SessionId::HEADER.to_owned(), session.as_str().to_owned());
        }

        headers
    }
}

#[derive(Debug, Clone)]
/// Builder for [`DeviceIdentity`].
///
/// Every field starts at the canonical default; override only what the test
/// or emulation target needs.
pub struct DeviceIdentityBuilder {
    app_version: String,
    os_version: String,
    os_version_code: String,
    device_model: String,
    device_model_code: Option<String>,
    manufacturer: String,
    build_number: String,
    platform: String,
    install_id: InstallId,
    device_id: DeviceId,
    accept_language: String,
    device_region: String,
    user_agent: String,
}

impl DeviceIdentityBuilder {
    fn new() -> Self {
        Self {
            app_version: defaults::APP_VERSION.to_owned(),
            os_version: defaults::OS_VERSION.to_owned(),
            os_version_code: defaults::OS_VERSION_CODE.to_owned(),
            device_model: defaults::DEVICE_MODEL.to_owned(),
            device_model_code: None,
            manufacturer: defaults::MANUFACTURER.to_owned(),
            build_number: defaults::BUILD_NUMBER.to_owned(),
            platform: defaults::PLATFORM.to_owned(),
            install_id: InstallId::new(defaults::INSTALL_ID)
                .unwrap_or_else(|_| InstallId::generate()),
            device_id: DeviceId::new(defaults::DEVICE_ID).unwrap_or_else(|_| DeviceId::generate()),
            accept_language: defaults::ACCEPT_LANGUAGE.to_owned(),
            device_region: defaults::DEVICE_REGION.to_owned(),
            user_agent: defaults::USER_AGENT.to_owned(),
        }
    }

    /// Override the application version (`x-app-version`).
    pub fn app_version(mut self, value: impl Into<String>) -> Self {
        self.app_version = value.into();
        self
    }

    /// Override the OS version (`x-os-version`).
    pub fn os_version(mut self, value: impl Into<String>) -> Self {
        self.os_version = value.into();
        self
    }

    /// Override the OS version code (`x-os-version-code`).
    pub fn os_version_code(mut self, value: impl Into<String>) -> Self {
        self.os_version_code = value.into();
        self
    }

    /// Override the device model (`x-device-model`).
    ///
    /// Unless [`device_model_code`](Self::device_model_code) is also set, the
    /// model code header mirrors this value, as the real client does.
    pub fn device_model(mut self, value: impl Into<String>) -> Self {
        self.device_model = value.into();
        self
    }

    /// Override the device model code (`x-device-model-code`).
    pub fn device_model_code(mut self, value: impl Into<String>) -> Self {
        self.device_model_code = Some(value.into());
        self
    }

    /// Override the device manufacturer (`x-device-manufacturer`).
    pub fn manufacturer(mut self, value: impl Into<String>) -> Self {
        self.manufacturer = value.into();
        self
    }

    /// Override the build number (`x-build-number`).
    pub fn build_number(mut self, value: impl Into<String>) -> Self {
        self.build_number = value.into();
        self
    }

    /// Override the platform (`x-device-platform`).
    pub fn platform(mut self, value: impl Into<String>) -> Self {
        self.platform = value.into();
        self
    }

    /// Override the installation identifier (`x-install-id`).
    pub fn install_id(mut self, value: InstallId) -> Self {
        self.install_id = value;
        self
    }

    /// Override the device identifier (`x-device-id`).
    pub fn device_id(mut self, value: DeviceId) -> Self {
        self.device_id = value;
        self
    }

    /// Override the accepted language (`accept-language`).
    pub fn accept_language(mut self, value: impl Into<String>) -> Self {
        self.accept_language = value.into();
        self
    }

    /// Override the device region (`x-device-region`).
    pub fn device_region(mut self, value: impl Into<String>) -> Self {
        self.device_region = value.into();
        self
    }

    /// Override the HTTP `user-agent` header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.user_agent = value.into();
        self
    }

    /// Build the immutable [`DeviceIdentity`].
    pub fn build(self) -> DeviceIdentity {
        let device_model_code = self
            .device_model_code
            .unwrap_or_else(|| self.device_model.clone());
        DeviceIdentity {
            app_version: self.app_version,
            os_version: self.os_version,
            os_version_code: self.os_version_code,
            device_model: self.device_model,
            device_model_code,
            manufacturer: self.manufacturer,
            build_number: self.build_number,
            platform: self.platform,
            install_id: self.install_id,
            device_id: self.device_id,
            accept_language: self.accept_language,
            device_region: self.device_region,
            user_agent: self.user_agent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::{AuthToken, SessionId};

    #[test]
    fn default_identity_emits_fixed_header_set() {
        let identity = DeviceIdentity::default();
        let headers = identity.build_headers(None, None);

        assert_eq!(headers.get("x-app-version").map(String::as_str), Some("9.68.0"));
        assert_eq!(headers.get("x-os-version").map(String::as_str), Some("14"));
        assert_eq!(headers.get("x-os-version-code").map(String::as_str), Some("34"));
        assert_eq!(headers.get("x-device-model").map(String::as_str), Some("Pixel 6a"));
        assert_eq!(
            headers.get("x-device-model-code").map(String::as_str),
            Some("Pixel 6a")
        );
        assert_eq!(
            headers.get("x-device-manufacturer").map(String::as_str),
            Some("Google")
        );
        assert_eq!(headers.get("x-build-number").map(String::as_str), Some("168200482"));
        assert_eq!(headers.get("x-device-platform").map(String::as_str), Some("android"));
        assert_eq!(
            headers.get("x-install-id").map(String::as_str),
            Some("735de715-0876-45c5-be1e-aecdf8cb42d1")
        );
        assert_eq!(
            headers.get("x-device-id").map(String::as_str),
            Some("b4b578b8250e8ca8")
        );
        assert_eq!(headers.get("accept-language").map(String::as_str), Some("en-US"));
        assert_eq!(headers.get("x-device-region").map(String::as_str), Some("US"));
        assert_eq!(headers.get("user-agent").map(String::as_str), Some("okhttp/4.12.0"));
    }

    #[test]
    fn headers_omit_auth_and_session_when_absent() {
        let headers = DeviceIdentity::default().build_headers(None, None);
        assert!(!headers.contains_key("authorization"));
        assert!(!headers.contains_key("x-session-id"));
    }

    #[test]
    fn headers_include_auth_and_session_when_present() {
        let token = AuthToken::new("tok").unwrap();
        let session = SessionId::new("S").unwrap();
        let headers = DeviceIdentity::default().build_headers(Some(&token), Some(&session));

        assert_eq!(
            headers.get("authorization").map(String::as_str),
            Some("Bearer tok")
        );
        assert_eq!(headers.get("x-session-id").map(String::as_str), Some("S"));
    }

    #[test]
    fn build_headers_is_deterministic() {
        let identity = DeviceIdentity::default();
        assert_eq!(
            identity.build_headers(None, None),
            identity.build_headers(None, None)
        );
    }

    #[test]
    fn builder_overrides_are_applied() {
        let identity = DeviceIdentity::builder()
            .app_version("9.70.1")
            .device_model("Pixel 8")
            .device_region("GB")
            .accept_language("en-GB")
            .build();
        let headers = identity.build_headers(None, None);

        assert_eq!(headers.get("x-app-version").map(String::as_str), Some("9.70.1"));
        assert_eq!(headers.get("x-device-model").map(String::as_str), Some("Pixel 8"));
        // model code mirrors the model unless overridden
        assert_eq!(
            headers.get("x-device-model-code").map(String::as_str),
            Some("Pixel 8")
        );
        assert_eq!(headers.get("x-device-region").map(String::as_str), Some("GB"));
        assert_eq!(headers.get("accept-language").map(String::as_str), Some("en-GB"));
    }

    #[test]
    fn explicit_model_code_wins_over_mirroring() {
        let identity = DeviceIdentity::builder()
            .device_model("Pixel 8")
            .device_model_code("GKWS6")
            .build();
        let headers = identity.build_headers(None, None);
        assert_eq!(
            headers.get("x-device-model-code").map(String::as_str),
            Some("GKWS6")
        );
    }
}
