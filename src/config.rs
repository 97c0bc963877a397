use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_postgres::config::SslMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    /// File served at `GET /`.
    pub landing_page: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full `postgres://` connection string. TLS is always required on top of it.
    pub url: String,
    pub max_connections: usize,
    /// How long a request may wait for (or create) a pooled connection.
    pub connection_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        if port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        let database = DatabaseConfig::from_lookup(&lookup)?;

        let landing_page = lookup("LANDING_PAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static/index.html"));

        Ok(Config {
            port,
            database,
            landing_page,
        })
    }
}

impl DatabaseConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<usize>()
            .context("DATABASE_MAX_CONNECTIONS must be a valid number")?;

        let connection_timeout_secs = lookup("DATABASE_CONNECTION_TIMEOUT")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("DATABASE_CONNECTION_TIMEOUT must be a valid number of seconds")?;

        let config = DatabaseConfig {
            url,
            max_connections,
            connection_timeout: Duration::from_secs(connection_timeout_secs),
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.url.starts_with("postgresql://") && !self.url.starts_with("postgres://") {
            anyhow::bail!("DATABASE_URL must start with 'postgresql://' or 'postgres://'");
        }

        let parsed = tokio_postgres::Config::from_str(&self.url)
            .context("DATABASE_URL is not a valid PostgreSQL connection string")?;

        if parsed.get_hosts().is_empty() {
            anyhow::bail!("DATABASE_URL must name a host");
        }

        // The connection string may not opt out of encryption
        if parsed.get_ssl_mode() == SslMode::Disable {
            anyhow::bail!("DATABASE_URL must not disable TLS (sslmode=disable)");
        }

        if self.max_connections == 0 {
            anyhow::bail!("Max connections must be greater than 0");
        }

        if self.connection_timeout.as_secs() == 0 {
            anyhow::bail!("Connection timeout must be greater than 0");
        }

        Ok(())
    }
}
