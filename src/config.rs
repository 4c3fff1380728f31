// Configuración del servidor leída desde variables de entorno (y `.env` si existe).
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_DB_PATH: &str = "yourplan.db";
const DEFAULT_BIND_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DEADLINE_MS: u64 = 5000;
const DEFAULT_HISTORY_YEARS: [i32; 2] = [2023, 2022];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub bind_host: String,
    pub port: u16,
    pub workers: usize,
    /// Plazo máximo para el check+commit de una inscripción.
    pub request_deadline: Duration,
    /// Años mostrados por `/history`, del más reciente al más antiguo.
    pub history_years: Vec<i32>,
    pub cors_permissive: bool,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: num_cpus::get(),
            request_deadline: Duration::from_millis(DEFAULT_DEADLINE_MS),
            history_years: DEFAULT_HISTORY_YEARS.to_vec(),
            cors_permissive: false,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Lee la configuración del entorno del proceso, cargando `.env` primero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Versión parametrizable para pruebas: `lookup` resuelve una variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = AppConfig::default();

        if let Some(p) = lookup("YOURPLAN_DB_PATH") {
            cfg.db_path = PathBuf::from(p);
        } else if let Some(url) = lookup("YOURPLAN_DB_URL") {
            cfg.db_path = db_path_from_url(&url)?;
        }

        if let Some(host) = lookup("YOURPLAN_BIND") {
            if !host.trim().is_empty() { cfg.bind_host = host.trim().to_string(); }
        }
        if let Some(v) = lookup("PORT") {
            cfg.port = parse_value("PORT", &v)?;
        }
        if let Some(v) = lookup("YOURPLAN_WORKERS") {
            let workers: usize = parse_value("YOURPLAN_WORKERS", &v)?;
            if workers == 0 {
                return Err(ConfigError::Invalid { key: "YOURPLAN_WORKERS", value: v });
            }
            cfg.workers = workers;
        }
        if let Some(v) = lookup("YOURPLAN_REQUEST_DEADLINE_MS") {
            let ms: u64 = parse_value("YOURPLAN_REQUEST_DEADLINE_MS", &v)?;
            cfg.request_deadline = Duration::from_millis(ms);
        }
        if let Some(v) = lookup("YOURPLAN_HISTORY_YEARS") {
            let years = v
                .split(',')
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(|p| parse_value::<i32>("YOURPLAN_HISTORY_YEARS", p))
                .collect::<Result<Vec<_>, _>>()?;
            if years.is_empty() {
                return Err(ConfigError::Invalid { key: "YOURPLAN_HISTORY_YEARS", value: v });
            }
            cfg.history_years = years;
        }
        if let Some(v) = lookup("YOURPLAN_CORS_PERMISSIVE") {
            cfg.cors_permissive = parse_value("YOURPLAN_CORS_PERMISSIVE", &v)?;
        }
        if let Some(f) = lookup("YOURPLAN_LOG").or_else(|| lookup("RUST_LOG")) {
            cfg.log_filter = f;
        }

        Ok(cfg)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

// sqlite:///abs/path, sqlite://rel/path y file://path; cualquier otro esquema se rechaza
fn db_path_from_url(url: &str) -> Result<PathBuf, ConfigError> {
    if let Some(rest) = url.strip_prefix("sqlite://") {
        Ok(PathBuf::from(rest))
    } else if let Some(rest) = url.strip_prefix("file://") {
        Ok(PathBuf::from(rest))
    } else {
        Err(ConfigError::UnsupportedScheme { key: "YOURPLAN_DB_URL", value: url.to_string() })
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::Invalid { key, value: raw.to_string() })
}
