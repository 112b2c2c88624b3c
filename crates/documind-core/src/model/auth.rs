use serde::{Deserialize, Serialize};

/// Login credentials. Sent on the wire as the `username`/`password` form pair.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Form body for `POST /token`.
#[derive(Serialize)]
pub(crate) struct TokenForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for TokenForm<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self {
            username: &credentials.email,
            password: &credentials.password,
        }
    }
}

/// Body returned by the token endpoint. Fields beyond `access_token` and
/// `token_type` are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
