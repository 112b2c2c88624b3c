use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumindError {
    /// The token endpoint rejected the credentials. Carries no detail.
    #[error("Login failed")]
    Authentication,

    #[error("API Error: {status_text}")]
    Api { status: u16, status_text: String },

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DocumindError {
    /// HTTP status of a rejected API call. `None` for every other kind,
    /// including failed logins.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the service rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }

    pub(crate) fn api(status: reqwest::StatusCode) -> Self {
        Self::Api {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        }
    }

    pub(crate) fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocumindError>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_api_error_uses_reason_phrase() {
        let err = DocumindError::api(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "API Error: Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_api_error_unknown_status() {
        let err = DocumindError::api(StatusCode::from_u16(599).unwrap());
        assert_eq!(err.to_string(), "API Error: Unknown Status");
        assert_eq!(err.status(), Some(599));
    }

    #[test]
    fn test_authentication_error_is_fixed() {
        let err = DocumindError::Authentication;
        assert_eq!(err.to_string(), "Login failed");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_unauthorized() {
        assert!(DocumindError::api(StatusCode::UNAUTHORIZED).is_unauthorized());
        assert!(!DocumindError::api(StatusCode::FORBIDDEN).is_unauthorized());
        assert!(!DocumindError::Authentication.is_unauthorized());
    }

    #[test]
    fn test_malformed_message() {
        let err = DocumindError::malformed("/token", "missing field `access_token`");
        assert_eq!(
            err.to_string(),
            "Malformed response from /token: missing field `access_token`"
        );
    }
}
