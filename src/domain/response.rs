#[derive(Debug, Clone, PartialEq, Eq)]
/// Which login methods are linked to the account (`GET /auth/settings`).
pub struct AuthSettings {
    pub apple_authed: bool,
    pub facebook_authed: bool,
    pub google_authed: bool,
    pub sms_authed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Remaining like/superlike allowance (`GET /likelimit`).
pub struct LikeLimit {
    pub likes_left: u32,
    pub superlikes_left: u32,
    pub free_superlikes_left: u32,
    pub free_superlike_expiration: Option<String>,
}
