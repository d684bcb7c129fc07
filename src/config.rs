// src/config.rs

use std::{env, path::PathBuf, time::Duration};
//
use crate::error::{Result, ViewError};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    /// When set, suppliers come from this CSV instead of the HTTP endpoint.
    pub catalog_path: Option<PathBuf>,
    pub fetch_timeout: Duration,
}

impl Config {
    /// Loads `.env` (if any) and reads the environment.
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("SUPPLIERS_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let catalog_path = lookup("SUPPLIERS_CSV")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let fetch_timeout = match lookup("FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ViewError::Config(format!("FETCH_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"))
                })?;
                if secs == 0 {
                    return Err(ViewError::Config("FETCH_TIMEOUT_SECS must be greater than zero".to_string()));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        Ok(Self { base_url, catalog_path, fetch_timeout })
    }
}
