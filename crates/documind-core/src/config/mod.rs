use crate::error::{DocumindError, Result};
use crate::model::Credentials;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumindConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Stored login used by the CLI when no credentials are passed on the
/// command line.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthConfig {
    /// Both halves must be present and non-empty.
    pub fn credentials(&self) -> Option<Credentials> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(Credentials::new(email, password))
            }
            _ => None,
        }
    }
}

/// Timings of the locally simulated upload and chat flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default = "default_delay_ms")]
    pub upload_delay_ms: u64,
    #[serde(default = "default_delay_ms")]
    pub reply_delay_ms: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            upload_delay_ms: default_delay_ms(),
            reply_delay_ms: default_delay_ms(),
        }
    }
}

impl WorkspaceConfig {
    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

// -- Defaults --

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_delay_ms() -> u64 {
    1500
}

impl DocumindConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/documind/config.toml (global)
    /// 2. .documind/config.toml (project)
    /// 3. .documind/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".documind").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".documind").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| DocumindError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| DocumindError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Validate config values, replacing unusable ones and logging warnings.
    /// Never rejects the config.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        let trimmed = self.api.base_url.trim().trim_end_matches('/').to_string();
        match reqwest::Url::parse(&trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                self.api.base_url = trimmed;
            }
            Ok(url) => {
                warnings.push(format!(
                    "api.base_url scheme '{}' is not http(s), using {DEFAULT_BASE_URL}",
                    url.scheme()
                ));
                self.api.base_url = default_base_url();
            }
            Err(e) => {
                warnings.push(format!(
                    "api.base_url '{}' is not a valid URL ({e}), using {DEFAULT_BASE_URL}",
                    self.api.base_url
                ));
                self.api.base_url = default_base_url();
            }
        }

        if self.auth.email.is_some() != self.auth.password.is_some() {
            warnings.push("auth needs both email and password; ignoring stored login".to_string());
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("documind").join("config.toml"))
}
