use std::env;
use std::path::PathBuf;

/// Dashboard configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub bind: String,
    pub port: u16,

    /// Path to the sqlite database file (created on first run).
    pub db_path: PathBuf,

    /// Directory holding the static frontend served at the root.
    pub static_dir: PathBuf,

    /// Max connections in the sqlite pool.
    pub db_pool_size: u32,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_path(name: &str, default: &str) -> PathBuf {
    PathBuf::from(env_str(name, default))
}

impl DashConfig {
    pub fn from_env() -> Self {
        Self {
            bind: env_str("STOCKSENSE_BIND", "127.0.0.1"),
            port: env_u16("STOCKSENSE_PORT", 8080),
            db_path: env_path("STOCKSENSE_DB", "stocksense.db"),
            static_dir: env_path("STOCKSENSE_STATIC_DIR", "static"),
            db_pool_size: env_u32("STOCKSENSE_DB_POOL_SIZE", 4),
        }
    }
}
