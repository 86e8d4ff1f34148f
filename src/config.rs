//! Settings read from the environment (and `.env`, when present).

use std::env;

use anyhow::{Context, Result};

pub const DEFAULT_SEND_BASE_URL: &str = "https://send.api.mailtrap.io/api";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Provider base URL; `/send` is appended per request.
    pub send_base_url: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a valid port number")?,
            None => 8080,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(max) => max
                .parse()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            send_base_url: lookup("MAILTRAP_SEND_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SEND_BASE_URL.into()),
            max_upload_bytes,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
