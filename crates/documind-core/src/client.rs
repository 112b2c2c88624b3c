use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{DocumindError, Result};
use crate::model::*;
use crate::session::Session;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP client for the DocuMind service.
///
/// Owns one [`Session`]. Every call except `login` and `register` carries
/// `Authorization: Bearer <token>` when the session holds a token; without
/// one the header is omitted and the service decides. Any non-2xx answer is
/// an error and its body is never parsed. No retries, no timeouts.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session: Session::new(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url)
    }

    /// Replace the session, e.g. to resume with a token obtained elsewhere.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// A new client for the same service with an empty session. Shares the
    /// underlying connection pool.
    pub fn detached(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            session: Session::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `POST /token` with a form-encoded `username`/`password` pair.
    ///
    /// Stores the returned access token in the session. A rejected login
    /// leaves any earlier token in place.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<TokenResponse> {
        let form = serde_urlencoded::to_string(TokenForm::from(credentials))
            .map_err(|e| DocumindError::InvalidInput(format!("cannot encode credentials: {e}")))?;

        tracing::debug!(method = "POST", path = "/token", "sending request");
        let response = self
            .http
            .post(self.url("/token"))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "login rejected");
            return Err(DocumindError::Authentication);
        }

        let body = response.text().await?;
        let token: TokenResponse = decode("/token", &body)?;
        if token.access_token.is_empty() {
            return Err(DocumindError::malformed("/token", "empty access_token"));
        }

        self.session.set_token(token.access_token.clone());
        tracing::info!(email = %credentials.email, "logged in");
        Ok(token)
    }

    /// Forget the session token. Purely local; the service is not told.
    pub fn logout(&mut self) {
        if self.session.is_authenticated() {
            tracing::info!("logged out");
        }
        self.session.clear();
    }

    /// `POST /users` to create an account. Sent without credentials.
    pub async fn register(&self, credentials: &Credentials) -> Result<serde_json::Value> {
        let request = self
            .http
            .post(self.url("/users"))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(credentials);
        self.send("/users", request).await
    }

    /// `POST /documents` as multipart with the file under the `file` field.
    pub async fn upload_document(&self, file: &UploadFile) -> Result<Document> {
        let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        if let Some(mime) = &file.mime_type {
            part = part.mime_str(mime).map_err(|e| {
                DocumindError::InvalidInput(format!("invalid MIME type '{mime}': {e}"))
            })?;
        }
        let form = Form::new().part("file", part);

        // multipart sets its own Content-Type with the boundary
        let request = self.authorized(Method::POST, "/documents").multipart(form);
        self.send("/documents", request).await
    }

    /// `GET /documents`, in the order the service returns them.
    pub async fn get_documents(&self) -> Result<Vec<Document>> {
        let request = self.json_request(Method::GET, "/documents");
        self.send("/documents", request).await
    }

    /// `DELETE /documents/{id}`. Returns whatever the service answers.
    pub async fn delete_document(&self, id: &str) -> Result<serde_json::Value> {
        let path = format!("/documents/{id}");
        let request = self.json_request(Method::DELETE, &path);
        self.send(&path, request).await
    }

    /// `POST /chat/{doc_id}` with `{ "message": ... }`.
    pub async fn send_message(&self, doc_id: &str, message: &str) -> Result<ChatReply> {
        let path = format!("/chat/{doc_id}");
        let request = self
            .json_request(Method::POST, &path)
            .json(&ChatRequest { message });
        self.send(&path, request).await
    }

    /// `GET /chat/{doc_id}`, oldest first as stored by the service.
    pub async fn get_chat_history(&self, doc_id: &str) -> Result<Vec<ChatMessage>> {
        let path = format!("/chat/{doc_id}");
        let request = self.json_request(Method::GET, &path);
        self.send(&path, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));
        match self.session.bearer() {
            Some(bearer) => request.header(AUTHORIZATION, bearer),
            None => request,
        }
    }

    fn json_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.authorized(method, path)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
    }

    async fn send<R: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> Result<R> {
        let request = request.build()?;
        tracing::debug!(method = %request.method(), path, "sending request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "request rejected");
            return Err(DocumindError::api(status));
        }

        let body = response.text().await?;
        decode(path, &body)
    }
}

/// Parse a success body, turning any shape mismatch into `MalformedResponse`.
fn decode<R: DeserializeOwned>(path: &str, body: &str) -> Result<R> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(300).collect();
        DocumindError::malformed(path, format!("{e}; body: {preview}"))
    })
}
