use serde::{Deserialize, Serialize};

use crate::domain::{DeviceId, InstallId, OtpCode, RawPhoneNumber};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiateJsonBody<'a> {
    phone_number: &'a str,
    device_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyJsonBody<'a> {
    device_id: &'a str,
    install_id: &'a str,
    phone_number: &'a str,
    otp: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Fields the verify endpoint may return. Everything is optional on the wire;
/// the login flow decides which absences are failures.
pub struct VerifyFields {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn encode_initiate_json_body(phone: &RawPhoneNumber, device_id: &DeviceId) -> String {
    let body = InitiateJsonBody {
        phone_number: phone.raw(),
        device_id: device_id.as_str(),
    };
    // Serializing a struct of string slices cannot fail.
    serde_json::to_string(&body).unwrap_or_default()
}

pub fn encode_verify_json_body(
    phone: &RawPhoneNumber,
    device_id: &DeviceId,
    install_id: &InstallId,
    otp: &OtpCode,
) -> String {
    let body = VerifyJsonBody {
        device_id: device_id.as_str(),
        install_id: install_id.as_str(),
        phone_number: phone.raw(),
        otp: otp.as_str(),
    };
    serde_json::to_string(&body).unwrap_or_default()
}

pub fn decode_verify_json_response(json: &str) -> Result<VerifyFields, TransportError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_initiate_body_uses_wire_field_names() {
        let phone = RawPhoneNumber::new("+12025550123").unwrap();
        let device = DeviceId::new("b4b578b8250e8ca8").unwrap();

        let body = encode_initiate_json_body(&phone, &device);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "phoneNumber": "+12025550123",
                "deviceId": "b4b578b8250e8ca8",
            })
        );
    }

    #[test]
    fn encode_verify_body_uses_wire_field_names() {
        let phone = RawPhoneNumber::new("+12025550123").unwrap();
        let device = DeviceId::new("b4b578b8250e8ca8").unwrap();
        let install = InstallId::new("735de715-0876-45c5-be1e-aecdf8cb42d1").unwrap();
        let otp = OtpCode::new("123456").unwrap();

        let body = encode_verify_json_body(&phone, &device, &install, &otp);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "deviceId": "b4b578b8250e8ca8",
                "installId": "735de715-0876-45c5-be1e-aecdf8cb42d1",
                "phoneNumber": "+12025550123",
                "otp": "123456",
            })
        );
    }

    #[test]
    fn decode_verify_response_with_full_payload() {
        let json = r#"
        {
          "token": "T",
          "playerId": "U",
          "sessionId": "S"
        }
        "#;

        let fields = decode_verify_json_response(json).unwrap();
        assert_eq!(fields.token.as_deref(), Some("T"));
        assert_eq!(fields.player_id.as_deref(), Some("U"));
        assert_eq!(fields.session_id.as_deref(), Some("S"));
        assert_eq!(fields.case_id, None);
    }

    #[test]
    fn decode_verify_response_with_missing_fields_defaults_to_none() {
        let fields = decode_verify_json_response("{}").unwrap();
        assert_eq!(fields.token, None);
        assert_eq!(fields.player_id, None);
        assert_eq!(fields.session_id, None);
    }

    #[test]
    fn decode_verify_response_with_case_id() {
        let json = r#"
        {
          "caseId": "C1",
          "message": "verify email"
        }
        "#;

        let fields = decode_verify_json_response(json).unwrap();
        assert_eq!(fields.case_id.as_deref(), Some("C1"));
        assert_eq!(fields.message.as_deref(), Some("verify email"));
    }

    #[test]
    fn decode_verify_response_rejects_non_json() {
        assert!(matches!(
            decode_verify_json_response("<html>gateway error</html>"),
            Err(TransportError::Json(_))
        ));
    }
}
