use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Which record store backend to talk to.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// Hosted REST table API (Supabase).
    Postgrest { url: String, api_key: String },
    Postgres { database_url: String },
    Memory,
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StoreBackend::Postgrest { .. } => "postgrest",
            StoreBackend::Postgres { .. } => "postgres",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a variable required by the chosen backend is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let backend = lookup("STORE_BACKEND").unwrap_or_else(|| "postgrest".to_string());
        let store = match backend.as_str() {
            "postgrest" | "supabase" => StoreBackend::Postgrest {
                url: require("SUPABASE_URL")?,
                api_key: require("SUPABASE_KEY")?,
            },
            "postgres" => StoreBackend::Postgres {
                database_url: require("DATABASE_URL")?,
            },
            "memory" => StoreBackend::Memory,
            other => bail!("STORE_BACKEND must be one of postgrest, postgres, memory; got '{other}'"),
        };

        Ok(Config {
            store,
            scaler_path: lookup("SCALER_PATH")
                .unwrap_or_else(|| "artifacts/scaler.json".to_string())
                .into(),
            model_path: lookup("MODEL_PATH")
                .unwrap_or_else(|| "artifacts/classifier.json".to_string())
                .into(),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
