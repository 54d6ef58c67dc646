use serde::{Deserialize, Serialize};

use crate::domain::{AuthSettings, LikeLimit, UserId};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationsJsonBody<'a> {
    player_id: Option<&'a str>,
    active_today: bool,
    new_here: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageJsonBody<'a> {
    subject_id: &'a str,
    match_message: bool,
    origin: &'a str,
    dedup_id: &'a str,
    message_data: MessageData<'a>,
    message_type: &'a str,
    ays: bool,
}

#[derive(Debug, Serialize)]
struct MessageData<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthSettingsJsonResponse {
    #[serde(default)]
    apple_authed: bool,
    #[serde(default)]
    facebook_authed: bool,
    #[serde(default)]
    google_authed: bool,
    #[serde(default)]
    sms_authed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikeLimitJsonResponse {
    #[serde(default)]
    likes_left: u32,
    #[serde(default)]
    superlikes_left: u32,
    #[serde(default)]
    free_superlikes_left: u32,
    #[serde(default)]
    free_superlike_expiration: Option<String>,
}

pub fn encode_recommendations_json_body(
    player_id: Option<&UserId>,
    active_today: bool,
    new_here: bool,
) -> String {
    let body = RecommendationsJsonBody {
        player_id: player_id.map(UserId::as_str),
        active_today,
        new_here,
    };
    serde_json::to_string(&body).unwrap_or_default()
}

pub fn encode_send_message_json_body(
    subject_id: &str,
    message: &str,
    match_message: bool,
    origin: &str,
    message_type: &str,
    ays: bool,
    dedup_id: &str,
) -> String {
    let body = SendMessageJsonBody {
        subject_id,
        match_message,
        origin,
        dedup_id,
        message_data: MessageData { message },
        message_type,
        ays,
    };
    serde_json::to_string(&body).unwrap_or_default()
}

pub fn decode_json_value(json: &str) -> Result<serde_json::Value, TransportError> {
    Ok(serde_json::from_str(json)?)
}

pub fn decode_auth_settings_json_response(json: &str) -> Result<AuthSettings, TransportError> {
    let parsed: AuthSettingsJsonResponse = serde_json::from_str(json)?;
    Ok(AuthSettings {
        apple_authed: parsed.apple_authed,
        facebook_authed: parsed.facebook_authed,
        google_authed: parsed.google_authed,
        sms_authed: parsed.sms_authed,
    })
}

pub fn decode_like_limit_json_response(json: &str) -> Result<LikeLimit, TransportError> {
    let parsed: LikeLimitJsonResponse = serde_json::from_str(json)?;
    Ok(LikeLimit {
        likes_left: parsed.likes_left,
        superlikes_left: parsed.superlikes_left,
        free_superlikes_left: parsed.free_superlikes_left,
        free_superlike_expiration: parsed.free_superlike_expiration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_recommendations_body_uses_wire_field_names() {
        let player = UserId::new("U").unwrap();
        let body = encode_recommendations_json_body(Some(&player), true, false);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "playerId": "U",
                "activeToday": true,
                "newHere": false,
            })
        );
    }

    #[test]
    fn encode_send_message_body_nests_message_data() {
        let body = encode_send_message_json_body(
            "subject-1",
            "hi there",
            false,
            "Native Chat",
            "message",
            true,
            "dedup-1",
        );
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "subjectId": "subject-1",
                "matchMessage": false,
                "origin": "Native Chat",
                "dedupId": "dedup-1",
                "messageData": { "message": "hi there" },
                "messageType": "message",
                "ays": true,
            })
        );
    }

    #[test]
    fn decode_auth_settings_defaults_missing_flags_to_false() {
        let json = r#"{ "smsAuthed": true }"#;
        let settings = decode_auth_settings_json_response(json).unwrap();
        assert!(settings.sms_authed);
        assert!(!settings.apple_authed);
        assert!(!settings.facebook_authed);
        assert!(!settings.google_authed);
    }

    #[test]
    fn decode_like_limit_maps_payload() {
        let json = r#"
        {
          "likesLeft": 8,
          "superlikesLeft": 1,
          "freeSuperlikesLeft": 1,
          "freeSuperlikeExpiration": "2026-09-01T00:00:00Z"
        }
        "#;

        let limit = decode_like_limit_json_response(json).unwrap();
        assert_eq!(limit.likes_left, 8);
        assert_eq!(limit.superlikes_left, 1);
        assert_eq!(limit.free_superlikes_left, 1);
        assert_eq!(
            limit.free_superlike_expiration.as_deref(),
            Some("2026-09-01T00:00:00Z")
        );
    }

    #[test]
    fn decode_json_value_rejects_non_json() {
        assert!(matches!(
            decode_json_value("not json"),
            Err(TransportError::Json(_))
        ));
    }
}
