use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_HEADER: &str = "\
# SmartNET API configuration.
# Any key can be overridden from the environment, e.g.
#   SMARTNET__OWNER__USER=owner SMARTNET__OWNER__PASS=secret
#   SMARTNET__EMAIL__API_KEY=re_xxx

";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub owner: OwnerConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub magic_link: MagicLinkConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            app: AppConfig::default(),
            owner: OwnerConfig::default(),
            email: EmailConfig::default(),
            rate_limit: RateLimitConfig::default(),
            magic_link: MagicLinkConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the public site, used to build quote and owner links
    pub public_url: String,
    /// `development` or `production`
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            public_url: "http://localhost:3000".to_string(),
            environment: "development".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OwnerConfig {
    pub user: Option<String>,
    pub pass: Option<String>,
    /// When set, `DELETE /api/owner/dev` also requires a matching `x-owner-dev-secret` header
    pub dev_secret: Option<String>,
    pub session_days: i64,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            user: None,
            pass: None,
            dev_secret: None,
            session_days: 7,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EmailConfig {
    /// Resend API key; without one, outgoing mail is only logged
    pub api_key: Option<String>,
    pub api_url: String,
    pub from: String,
    pub booking_inbox: Option<String>,
    pub fallback_notify: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.resend.com/emails".to_string(),
            from: "SmartNET <onboarding@resend.dev>".to_string(),
            booking_inbox: None,
            fallback_notify: None,
        }
    }
}

impl EmailConfig {
    /// Booking notification recipients, blanks dropped and duplicates removed
    pub fn booking_recipients(&self) -> Vec<String> {
        let mut recipients: Vec<String> = Vec::new();
        for address in [&self.booking_inbox, &self.fallback_notify].into_iter().flatten() {
            let address = address.trim();
            if !address.is_empty() && !recipients.iter().any(|r| r.eq_ignore_ascii_case(address)) {
                recipients.push(address.to_string());
            }
        }
        recipients
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RateLimitConfig {
    pub owner_login_attempts: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            owner_login_attempts: 12,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct MagicLinkConfig {
    pub ttl_days: i64,
}

impl Default for MagicLinkConfig {
    fn default() -> Self {
        Self { ttl_days: 7 }
    }
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();
        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    /// Read the TOML file at `config_path`, writing defaults first if it is missing,
    /// then apply `SMARTNET__SECTION__KEY` environment overrides.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            let body = toml::to_string_pretty(&ApiConfig::default()).map_err(|e| {
                ConfigError::Message(format!("Failed to serialize default config: {e}"))
            })?;
            std::fs::write(config_path, format!("{DEFAULT_CONFIG_HEADER}{body}")).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .add_source(
                Environment::with_prefix("SMARTNET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app.environment.eq_ignore_ascii_case("production")
    }

    pub fn listen_address(&self) -> (String, u16) {
        match &self.server {
            Some(server) => (server.host.clone(), server.port),
            None => ("127.0.0.1".to_string(), 8080),
        }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("smartnet").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
