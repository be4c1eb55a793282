use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_request_logging: bool,
}

/// Where the Monji API lives and how we talk to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// Per-request timeout. `None` leaves outbound calls unbounded.
    pub timeout_secs: Option<u64>,
}

/// Attributes applied to the `token` cookie on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub secure: bool,
    pub same_site: Option<SameSite>,
    pub max_age_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(SameSite::Strict),
            "lax" => Some(SameSite::Lax),
            "none" => Some(SameSite::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("SERVER_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("SERVER_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Backend overrides
        if let Ok(v) = env::var("API_BASE_URL") {
            self.backend.base_url = v;
        }
        if let Ok(v) = env::var("API_TIMEOUT_SECS") {
            self.backend.timeout_secs = v.parse().ok().filter(|secs| *secs > 0);
        }

        // Session cookie overrides
        if let Ok(v) = env::var("SESSION_COOKIE_SECURE") {
            self.session.secure = v.parse().unwrap_or(self.session.secure);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_SAME_SITE") {
            self.session.same_site = SameSite::parse(&v);
        }
        if let Ok(v) = env::var("SESSION_COOKIE_MAX_AGE_SECS") {
            self.session.max_age_secs = v.parse().ok();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
            },
            backend: BackendConfig {
                base_url: "http://localhost:8080".to_string(),
                timeout_secs: None,
            },
            session: SessionConfig {
                secure: false,
                same_site: None,
                max_age_secs: None,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: true,
            },
            backend: BackendConfig {
                base_url: "http://api:8080".to_string(),
                timeout_secs: None,
            },
            session: SessionConfig {
                secure: true,
                same_site: Some(SameSite::Lax),
                max_age_secs: Some(60 * 60 * 24), // 1 day
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                enable_request_logging: false,
            },
            backend: BackendConfig {
                base_url: "http://api:8080".to_string(),
                timeout_secs: None,
            },
            session: SessionConfig {
                secure: true,
                same_site: Some(SameSite::Strict),
                max_age_secs: Some(60 * 60 * 8), // 8 hours
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
