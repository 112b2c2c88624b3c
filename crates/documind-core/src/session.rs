/// Bearer credential issued by the token endpoint. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// In-memory authentication state for one API client.
///
/// Empty until a login succeeds; each successful login overwrites the token.
/// Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<SessionToken>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(SessionToken::new(token)),
        }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(SessionToken::new(token));
    }

    pub(crate) fn clear(&mut self) {
        self.token = None;
    }

    /// `Authorization` header value, if a token is held.
    pub(crate) fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.bearer().is_none());
    }

    #[test]
    fn test_set_token_overwrites() {
        let mut session = Session::with_token("first");
        session.set_token("second");
        assert_eq!(session.token().unwrap().as_str(), "second");
        assert_eq!(session.bearer().as_deref(), Some("Bearer second"));
    }

    #[test]
    fn test_clear() {
        let mut session = Session::with_token("tok");
        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::with_token("super-secret");
        let debug = format!("{session:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }
}
