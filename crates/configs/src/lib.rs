use std::path::{Path, PathBuf};

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
    /// Static assets served for every route outside `/api`.
    pub frontend_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            worker_threads: None,
            frontend_dir: PathBuf::from("../frontend"),
        }
    }
}

/// Connection settings. `url` wins when set; otherwise it is assembled from
/// the discrete host/user/password/name/port fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: "localhost".into(),
            user: "root".into(),
            password: String::new(),
            name: "habit_tracker".into(),
            port: 3306,
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 3600,
            acquire_timeout_secs: 30,
            sqlx_logging: false,
        }
    }
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Read `path`, or fall back to defaults when the file does not exist.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    if Path::new(path).exists() {
        load_from_file(path)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or defaults when it is absent), layer process
    /// environment variables on top, then validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_or_default(&config_path())?;
        cfg.apply_env(|name| std::env::var(name).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.server.apply_env(&lookup);
        self.database.apply_env(&lookup);
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize();
        self.database.validate()?;
        Ok(())
    }
}

fn parsed<T: std::str::FromStr, F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse::<T>().ok())
}

impl ServerConfig {
    fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if let Some(host) = lookup("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = parsed(lookup, "PORT") {
            self.port = port;
        }
        if let Some(w) = parsed(lookup, "TOKIO_WORKER_THREADS") {
            self.worker_threads = Some(w);
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.frontend_dir = PathBuf::from(dir);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        // 0 个工作线程视为未配置，交给 tokio 按 CPU 数决定
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, lookup: &F) {
        if let Some(url) = lookup("DATABASE_URL") {
            self.url = url;
        }
        if let Some(host) = lookup("DB_HOST") {
            self.host = host;
        }
        if let Some(user) = lookup("DB_USER") {
            self.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.password = password;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.name = name;
        }
        if let Some(port) = parsed(lookup, "DB_PORT") {
            self.port = port;
        }
        if let Some(max) = parsed(lookup, "DB_MAX_CONNECTIONS") {
            self.max_connections = max;
        }
    }

    /// Fill `url` from the discrete fields when it was not given directly.
    pub fn normalize(&mut self) {
        if self.url.trim().is_empty() {
            self.url = self.assembled_url();
        }
    }

    fn assembled_url(&self) -> String {
        let auth = if self.password.is_empty() {
            self.user.clone()
        } else {
            format!("{}:{}", self.user, self.password)
        };
        format!("mysql://{}@{}:{}/{}", auth, self.host, self.port, self.name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml, DATABASE_URL or DB_* variables"));
        }
        let lower = self.url.to_lowercase();
        let supported = ["postgres://", "postgresql://", "mysql://", "sqlite:"];
        if !supported.iter().any(|p| lower.starts_with(p)) {
            return Err(anyhow!("database.url must use one of the postgres, mysql or sqlite schemes"));
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
