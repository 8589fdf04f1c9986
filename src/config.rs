use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

/// Which record store backs the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase { url: String, api_key: String },
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub posts_table: String,
    pub store: StoreBackend,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| format!("0.0.0.0:{}", port));
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let posts_table = lookup("POSTS_TABLE").unwrap_or_else(|| "posts".to_string());

        let backend = lookup("STORE_BACKEND").unwrap_or_else(|| "supabase".to_string());
        let store = match backend.to_ascii_lowercase().as_str() {
            "supabase" => StoreBackend::Supabase {
                url: lookup("SUPABASE_URL").ok_or_else(|| ConfigError::MissingVar("SUPABASE_URL".into()))?,
                api_key: lookup("SUPABASE_ANON_KEY")
                    .ok_or_else(|| ConfigError::MissingVar("SUPABASE_ANON_KEY".into()))?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidVar(
                    "STORE_BACKEND".into(),
                    format!("expected 'supabase' or 'memory', got '{}'", other),
                ));
            }
        };

        Ok(Config {
            bind_address,
            posts_table,
            store,
        })
    }
}

/// Keeps only the ends of a secret for logging.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "[REDACTED]".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
