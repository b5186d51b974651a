use anyhow::Context;
use serde::Deserialize;

const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub bcrypt_cost: u32,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {v}"))?,
            None => 3000,
        };
        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("BCRYPT_COST is not a number: {v}"))?,
            None => DEFAULT_BCRYPT_COST,
        };
        anyhow::ensure!(
            (4..=31).contains(&bcrypt_cost),
            "BCRYPT_COST must be between 4 and 31, got {bcrypt_cost}"
        );
        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        Ok(Self {
            database_url,
            host,
            port,
            bcrypt_cost,
            db_max_connections,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
