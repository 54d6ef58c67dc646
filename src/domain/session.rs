use crate::domain::value::{AuthToken, SessionId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// The triple of bearer token, session identifier, and user identifier
/// representing a logged-in principal.
///
/// Created empty; populated exactly once by a successful SMS login run and
/// destroyed with the owning client.
pub struct AuthSession {
    auth_token: Option<AuthToken>,
    session_id: Option<SessionId>,
    user_id: Option<UserId>,
}

impl AuthSession {
    /// An empty session: no token, no session id, no user id.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A session holding only a bearer token supplied out of band.
    ///
    /// No session id is assumed; the `x-session-id` header stays absent
    /// until the backend issues one.
    pub fn with_token(auth_token: AuthToken) -> Self {
        Self {
            auth_token: Some(auth_token),
            session_id: None,
            user_id: None,
        }
    }

    /// A populated session, as produced by a successful login.
    pub fn authenticated(
        auth_token: AuthToken,
        user_id: Option<UserId>,
        session_id: SessionId,
    ) -> Self {
        Self {
            auth_token: Some(auth_token),
            session_id: Some(session_id),
            user_id,
        }
    }

    /// Whether a bearer token is present.
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// The bearer token, absent until login.
    pub fn auth_token(&self) -> Option<&AuthToken> {
        self.auth_token.as_ref()
    }

    /// The session identifier, absent until assigned.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// The user identifier (`playerId`), absent until login.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }
}
