use std::{env, net::SocketAddr};

use dotenvy::dotenv;
use pizza_restaurant_service::DEFAULT_DATABASE_URL;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5555";
pub const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub pool_size: u32,
}

impl Config {
    /// Reads `.env` if present, then the process environment. `DB_URI` is
    /// accepted when `DATABASE_URL` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_URI"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_address: SocketAddr = parse_var(&lookup, "BIND_ADDRESS", DEFAULT_BIND_ADDRESS)?;
        let pool_size: u32 = parse_var(&lookup, "DATABASE_POOL_SIZE", &DEFAULT_POOL_SIZE.to_string())?;
        if pool_size == 0 {
            return Err(ConfigError::Invalid {
                name: "DATABASE_POOL_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url,
            bind_address,
            pool_size,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let value = lookup(name).unwrap_or_else(|| default.to_string());
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
