//! Thin authenticated REST wrappers over the request executor.
//!
//! These are one-shot calls with no protocol logic of their own; every one of
//! them stamps the full identity/session header set via
//! [`RequestExecutor::execute`](super::RequestExecutor::execute) and parses
//! the JSON payload.

use url::Url;

use crate::client::{
    ErrorDetails, HingeClient, HingeError, HttpMethod, HttpResponse, json_headers,
};
use crate::domain::{AuthSettings, LikeLimit, UserId};
use crate::transport;

const RECOMMENDATIONS_PATH: &str = "/rec/v2";
const PUBLIC_USERS_PATH: &str = "/user/v2/public";
const PUBLIC_CONTENT_PATH: &str = "/content/v1/public";
const AUTH_SETTINGS_PATH: &str = "/auth/settings";
const LIKE_LIMIT_PATH: &str = "/likelimit";
const SEND_MESSAGE_PATH: &str = "/message/send";
const CONTENT_SETTINGS_PATH: &str = "/content/v1/settings";
const NOTIFICATION_SETTINGS_PATH: &str = "/notification/v1/settings";
const USER_TRAITS_PATH: &str = "/user/v2/traits";
const ACCOUNT_INFO_PATH: &str = "/store/v2/account";
const EXPORT_STATUS_PATH: &str = "/user/export/status";

#[derive(Debug, Clone)]
/// Optional knobs for [`HingeClient::send_message`], mirroring the app's
/// defaults.
pub struct SendMessageOptions {
    pub match_message: bool,
    pub origin: String,
    pub message_type: String,
    pub ays: bool,
}

impl Default for SendMessageOptions {
    fn default() -> Self {
        Self {
            match_message: false,
            origin: "Native Chat".to_owned(),
            message_type: "message".to_owned(),
            ays: true,
        }
    }
}

fn parse_error(response: &HttpResponse) -> HingeError {
    HingeError::Api {
        message: "failed to parse response".to_owned(),
        details: ErrorDetails {
            status_code: Some(response.status),
            response_body: Some(response.body.clone()),
            ..Default::default()
        },
    }
}

fn ids_query(url: &mut Url, ids: &[UserId]) {
    let joined = ids
        .iter()
        .map(UserId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    url.query_pairs_mut().append_pair("ids", &joined);
}

impl HingeClient {
    /// Fetch the recommendation feeds for the logged-in user
    /// (`POST /rec/v2`).
    pub async fn get_recommendations(
        &self,
        active_today: bool,
        new_here: bool,
    ) -> Result<serde_json::Value, HingeError> {
        let body = transport::encode_recommendations_json_body(
            self.session().user_id(),
            active_today,
            new_here,
        );
        let response = self
            .execute(
                HttpMethod::Post,
                RECOMMENDATIONS_PATH,
                &json_headers(),
                Some(body),
            )
            .await?;
        transport::decode_json_value(&response.body).map_err(|_| parse_error(&response))
    }

    /// Fetch public profiles for a set of users (`GET /user/v2/public`).
    pub async fn get_public_users(
        &self,
        ids: &[UserId],
    ) -> Result<serde_json::Value, HingeError> {
        let mut url = self.endpoint(PUBLIC_USERS_PATH)?;
        ids_query(&mut url, ids);
        let response = self
            .executor()
            .execute(HttpMethod::Get, url.as_str(), &[], None)
            .await?;
        transport::decode_json_value(&response.body).map_err(|_| parse_error(&response))
    }

    /// Fetch public content entries (`GET /content/v1/public`).
    pub async fn get_public_content(
        &self,
        ids: &[UserId],
    ) -> Result<serde_json::Value, HingeError> {
        let mut url = self.endpoint(PUBLIC_CONTENT_PATH)?;
        ids_query(&mut url, ids);
        let response = self
            .executor()
            .execute(HttpMethod::Get, url.as_str(), &[], None)
            .await?;
        transport::decode_json_value(&response.body).map_err(|_| parse_error(&response))
    }

    /// Which login methods are linked to the account (`GET /auth/settings`).
    pub async fn get_auth_settings(&self) -> Result<AuthSettings, HingeError> {
        let response = self
            .execute(HttpMethod::Get, AUTH_SETTINGS_PATH, &[], None)
            .await?;
        transport::decode_auth_settings_json_response(&response.body)
            .map_err(|_| parse_error(&response))
    }

    /// Remaining like/superlike allowance (`GET /likelimit`).
    pub async fn get_like_limit(&self) -> Result<LikeLimit, HingeError> {
        let response = self
            .execute(HttpMethod::Get, LIKE_LIMIT_PATH, &[], None)
            .await?;
        transport::decode_like_limit_json_response(&response.body)
            .map_err(|_| parse_error(&response))
    }

    /// Fetch the user's content settings (`GET /content/v1/settings`).
    pub async fn get_settings(&self) -> Result<serde_json::Value, HingeError> {
        self.get_json(CONTENT_SETTINGS_PATH).await
    }

    /// Fetch the notification preferences (`GET /notification/v1/settings`).
    pub async fn get_notification_settings(&self) -> Result<serde_json::Value, HingeError> {
        self.get_json(NOTIFICATION_SETTINGS_PATH).await
    }

    /// Fetch the logged-in user's traits (`GET /user/v2/traits`).
    pub async fn get_user_traits(&self) -> Result<serde_json::Value, HingeError> {
        self.get_json(USER_TRAITS_PATH).await
    }

    /// Fetch subscription/account information (`GET /store/v2/account`).
    pub async fn get_account_info(&self) -> Result<serde_json::Value, HingeError> {
        self.get_json(ACCOUNT_INFO_PATH).await
    }

    /// Fetch the status of a pending data export (`GET /user/export/status`).
    pub async fn get_export_status(&self) -> Result<serde_json::Value, HingeError> {
        self.get_json(EXPORT_STATUS_PATH).await
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, HingeError> {
        let response = self.execute(HttpMethod::Get, path, &[], None).await?;
        transport::decode_json_value(&response.body).map_err(|_| parse_error(&response))
    }

    /// Send a chat message to another user (`POST /message/send`).
    ///
    /// A fresh `dedupId` is generated per call, as the app does.
    pub async fn send_message(
        &self,
        subject_id: &UserId,
        message: &str,
        options: SendMessageOptions,
    ) -> Result<serde_json::Value, HingeError> {
        let dedup_id = uuid::Uuid::new_v4().to_string();
        let body = transport::encode_send_message_json_body(
            subject_id.as_str(),
            message,
            options.match_message,
            &options.origin,
            &options.message_type,
            options.ays,
            &dedup_id,
        );
        let response = self
            .execute(HttpMethod::Post, SEND_MESSAGE_PATH, &json_headers(), Some(body))
            .await?;
        transport::decode_json_value(&response.body).map_err(|_| parse_error(&response))
    }
}
