use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub origin: OriginConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            worker_threads: Some(4),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Token signing settings.
///
/// `signing_key` stays optional here: its absence is reported by the token
/// manager at construction, which is the fatal startup error.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub signing_key: Option<String>,
    #[serde(default = "default_token_ttl")]
    pub access_token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { signing_key: None, access_token_ttl_secs: default_token_ttl() }
    }
}

/// Geolocation allow-list applied to create/delete requests.
#[derive(Debug, Clone, Deserialize)]
pub struct OriginConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_allowed_countries")]
    pub allowed_countries: Vec<String>,
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_countries: default_allowed_countries(),
            lookup_url: default_lookup_url(),
            lookup_timeout_secs: default_lookup_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_request_timeout() -> u64 { 15 }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_token_ttl() -> u64 { 3600 }

/// Upper bound for `auth.access_token_ttl_secs`.
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 3600;
fn default_allowed_countries() -> Vec<String> { vec!["Cyprus".to_string()] }
fn default_lookup_url() -> String { "https://ipapi.co".to_string() }
fn default_lookup_timeout() -> u64 { 5 }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `CONFIG_PATH` (or `config.toml`), apply environment overrides and
    /// validate. A missing file is not an error: defaults plus environment
    /// are enough to run.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.apply_env();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Environment variables win over file values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(host) = get("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(url) = get("DATABASE_URL") {
            if self.database.url.trim().is_empty() {
                self.database.url = url;
            }
        }
        if let Some(key) = get("SIGNING_KEY") {
            self.auth.signing_key = Some(key);
        }
        if let Some(ttl) = get("ACCESS_TOKEN_TTL_SECS").and_then(|v| v.parse::<u64>().ok()) {
            self.auth.access_token_ttl_secs = ttl;
        }
        if let Some(enabled) = get("ORIGIN_CHECK_ENABLED") {
            self.origin.enabled = matches!(enabled.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.origin.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("server.request_timeout_secs must be positive"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn validate(&self) -> Result<()> {
        if self.access_token_ttl_secs == 0 {
            return Err(anyhow!("auth.access_token_ttl_secs must be positive"));
        }
        if self.access_token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(anyhow!("auth.access_token_ttl_secs must be <= {MAX_TOKEN_TTL_SECS} (one year)"));
        }
        Ok(())
    }
}

impl OriginConfig {
    fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.allowed_countries.iter().all(|c| c.trim().is_empty()) {
            return Err(anyhow!("origin.allowed_countries must not be empty when the origin check is enabled"));
        }
        let lower = self.lookup_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("origin.lookup_url must start with http(s)"));
        }
        if self.lookup_timeout_secs == 0 {
            return Err(anyhow!("origin.lookup_timeout_secs must be positive"));
        }
        Ok(())
    }
}
