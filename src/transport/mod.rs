//! Transport layer: wire-format details (JSON bodies and response decoding).

mod api;
mod login;

pub use api::{
    decode_auth_settings_json_response, decode_json_value, decode_like_limit_json_response,
    encode_recommendations_json_body, encode_send_message_json_body,
};
pub use login::{
    VerifyFields, decode_verify_json_response, encode_initiate_json_body, encode_verify_json_body,
};
