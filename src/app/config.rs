use std::{env, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable '{0}' not set")]
    Missing(&'static str),
    #[error("Environment variable '{key}' has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_pool_size: u32,
    pub secret_key: String,
    pub token_ttl_secs: i64,
    pub bind_address: String,
    pub port: u16,
    pub bcrypt_cost: u32,
}

impl Config {
    pub const DEFAULT_SECRET_KEY: &'static str = "super secret key";

    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let secret_key = match env::var("SECRET_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ => {
                log::warn!("SECRET_KEY not set, falling back to the built-in development key");
                Self::DEFAULT_SECRET_KEY.to_string()
            }
        };

        Ok(Config {
            database_url,
            database_pool_size: parse_or("DATABASE_POOL_SIZE", 10)?,
            secret_key,
            token_ttl_secs: parse_or("TOKEN_TTL_SECS", 3600)?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080)?,
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
