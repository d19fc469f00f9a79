use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppIdentity,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Prefix for the posts routes, e.g. `/_ah/api/posts/v1`. Empty mounts at `/posts`.
    #[serde(default)]
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), base_path: String::new() }
    }
}

/// Deployment identity used by the referer guard.
#[derive(Debug, Clone, Deserialize)]
pub struct AppIdentity {
    #[serde(default)]
    pub app_id: String,
    #[serde(default = "default_domain_suffix")]
    pub domain_suffix: String,
    /// Local development: every referer is accepted.
    #[serde(default)]
    pub dev_server: bool,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self { app_id: String::new(), domain_suffix: default_domain_suffix(), dev_server: false }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// JSON file the memory backend persists to; `None` keeps posts in memory only.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_domain_suffix() -> String { "appspot.com".into() }
fn default_max_connections() -> u32 { 10 }
fn default_connect_timeout() -> u64 { 30 }
fn default_log_format() -> String { "compact".into() }

/// Config file location: `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    let path = config_path();
    load_from_file(&path).map_err(|e| anyhow!("{path}: {e}"))
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Build a config purely from environment variables.
pub fn from_env() -> AppConfig {
    let mut cfg = AppConfig::default();
    if let Ok(host) = std::env::var("SERVER_HOST") {
        cfg.server.host = host;
    }
    if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        cfg.server.port = port;
    }
    cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok());
    if let Ok(base) = std::env::var("API_BASE_PATH") {
        cfg.server.base_path = base;
    }
    if let Ok(app_id) = std::env::var("APP_ID") {
        cfg.app.app_id = app_id;
    }
    if let Ok(v) = std::env::var("DEV_SERVER") {
        cfg.app.dev_server = parse_flag(&v);
    }
    if let Ok(v) = std::env::var("STORE_BACKEND") {
        cfg.store.backend = if v.eq_ignore_ascii_case("postgres") { StoreBackend::Postgres } else { StoreBackend::Memory };
    }
    cfg.store.path = std::env::var("STORE_PATH").ok().filter(|p| !p.trim().is_empty());
    if let Ok(fmt) = std::env::var("LOG_FORMAT") {
        cfg.logging.format = fmt;
    }
    cfg
}

fn parse_flag(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to env vars when the file is absent.
    /// A present but unreadable or malformed file is an error.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = if std::path::Path::new(&config_path()).exists() {
            load_default()?
        } else {
            from_env()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.app.validate()?;
        self.store.normalize_from_env();
        self.store.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        let base = self.base_path.trim().trim_end_matches('/').to_string();
        if !base.is_empty() && !base.starts_with('/') {
            return Err(anyhow!("server.base_path must be empty or start with '/'"));
        }
        self.base_path = base;
        Ok(())
    }
}

impl AppIdentity {
    fn validate(&self) -> Result<()> {
        if !self.dev_server && self.app_id.trim().is_empty() {
            return Err(anyhow!("app.app_id is required unless app.dev_server is enabled (or set APP_ID)"));
        }
        if self.domain_suffix.trim().is_empty() {
            return Err(anyhow!("app.domain_suffix must not be empty"));
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn normalize_from_env(&mut self) {
        if self.backend == StoreBackend::Postgres && self.database_url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.database_url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend != StoreBackend::Postgres {
            return Ok(());
        }
        if self.database_url.trim().is_empty() {
            return Err(anyhow!("store.database_url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.database_url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("store.database_url must start with postgresql:// or postgres://"));
        }
        if self.max_connections == 0 {
            return Err(anyhow!("store.max_connections must be >= 1"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(anyhow!("store.connect_timeout_secs must be a positive number of seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            base_path = "/_ah/api/posts/v1/"

            [app]
            app_id = "my-app"

            [store]
            backend = "memory"
            path = "data/posts.json"

            [logging]
            format = "json"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.base_path, "/_ah/api/posts/v1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.app.app_id, "my-app");
        assert_eq!(cfg.app.domain_suffix, "appspot.com");
        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.store.path.as_deref(), Some("data/posts.json"));
        assert_eq!(cfg.logging.format, "json");
        Ok(())
    }

    #[test]
    fn production_requires_app_id() -> Result<()> {
        let mut cfg = parse("[server]\nhost = \"127.0.0.1\"\nport = 8080\n")?;
        assert!(cfg.normalize_and_validate().is_err());

        cfg.app.dev_server = true;
        cfg.normalize_and_validate()?;
        Ok(())
    }

    #[test]
    fn rejects_relative_base_path() -> Result<()> {
        let mut cfg = parse("[server]\nhost = \"\"\nport = 1\nbase_path = \"api\"\n[app]\ndev_server = true\n")?;
        assert!(cfg.normalize_and_validate().is_err());
        Ok(())
    }

    #[test]
    fn postgres_url_must_use_postgres_scheme() -> Result<()> {
        let mut cfg = parse(
            "[app]\napp_id = \"a\"\n[store]\nbackend = \"postgres\"\ndatabase_url = \"mysql://x\"\n",
        )?;
        assert!(cfg.normalize_and_validate().is_err());
        cfg.store.database_url = "postgres://u:p@localhost/posts".into();
        cfg.normalize_and_validate()?;
        Ok(())
    }

    #[test]
    fn load_and_validate_reads_config_path() -> Result<()> {
        let path = std::env::temp_dir().join(format!("posts_config_{}.toml", std::process::id()));
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\nport = 9100\n[app]\napp_id = \"from-file\"\n")?;
        std::env::set_var("CONFIG_PATH", &path);

        let cfg = AppConfig::load_and_validate();
        std::fs::write(&path, "[server\n")?;
        let broken = load_default();

        std::env::remove_var("CONFIG_PATH");
        let _ = std::fs::remove_file(&path);

        let cfg = cfg?;
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.app.app_id, "from-file");
        assert!(broken.is_err());
        Ok(())
    }

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
