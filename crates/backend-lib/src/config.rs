// ============================
// jobboard-backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Signing secret used when none is configured. Known to everyone who has
/// read this file, so tokens signed with it can be forged.
pub const DEFAULT_TOKEN_SECRET: &str = "jobboard-insecure-development-secret";

/// Superuser pair used when none is configured
pub const DEFAULT_SUPERUSER_EMAIL: &str = "admin@jobboard.local";
pub const DEFAULT_SUPERUSER_PASSWORD: &str = "admin123";

/// Environment variable prefix, e.g. `JOBBOARD_TOKEN__SECRET`
pub const ENV_PREFIX: &str = "JOBBOARD_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Emit JSON log lines instead of the human format
    pub log_json: bool,
    pub token: TokenSettings,
    pub superuser: SuperuserSettings,
    pub password: PasswordSettings,
    pub cors: CorsSettings,
    pub storage: StorageSettings,
}

/// Token signing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    /// HMAC secret for issued tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub ttl_secs: u64,
}

/// The fixed, never-stored admin credential pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperuserSettings {
    pub email: String,
    pub password: String,
}

/// scrypt cost parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Exact origins, or a single `"*"` for any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Root directory for the flat-file backend
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 10000)),
            log_level: "info".to_string(),
            log_json: false,
            token: TokenSettings::default(),
            superuser: SuperuserSettings::default(),
            password: PasswordSettings::default(),
            cors: CorsSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            secret: DEFAULT_TOKEN_SECRET.to_string(),
            ttl_secs: 60 * 60, // 1 hour
        }
    }
}

impl Default for SuperuserSettings {
    fn default() -> Self {
        Self {
            email: DEFAULT_SUPERUSER_EMAIL.to_string(),
            password: DEFAULT_SUPERUSER_PASSWORD.to_string(),
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self { log_n: 15, r: 8, p: 1 }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl TokenSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Settings {
    /// Load settings from defaults, an optional TOML file and `JOBBOARD_*`
    /// environment variables, in increasing order of precedence.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new("config.toml"));
        let settings: Settings = Self::figment(path)
            .extract()
            .with_context(|| format!("loading configuration from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// The provider stack behind [`Settings::load`]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            bail!("unknown log level `{}`", self.log_level);
        }
        if self.token.ttl_secs == 0 {
            bail!("token.ttl_secs must be greater than zero");
        }
        if self.token.secret.is_empty() {
            bail!("token.secret must not be empty");
        }
        if self.superuser.email.is_empty() || self.superuser.password.is_empty() {
            bail!("superuser email and password must not be empty");
        }
        crate::auth::ScryptHasher::from_settings(&self.password)
            .context("invalid password hashing parameters")?;
        self.cors.origins()?;
        Ok(())
    }

    /// True while the compiled-in signing secret is in use
    pub fn uses_default_secret(&self) -> bool {
        self.token.secret == DEFAULT_TOKEN_SECRET
    }

    /// True while the compiled-in superuser password is in use
    pub fn uses_default_superuser(&self) -> bool {
        self.superuser.password == DEFAULT_SUPERUSER_PASSWORD
    }
}

/// Parsed CORS origin policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

impl CorsSettings {
    pub fn origins(&self) -> Result<AllowedOrigins> {
        if self.allowed_origins.iter().any(|o| o == "*") {
            return Ok(AllowedOrigins::Any);
        }
        let origins = self
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin `{o}`"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AllowedOrigins::List(origins))
    }
}
