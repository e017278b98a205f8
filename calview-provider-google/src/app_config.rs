//! Google Maps API credentials.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "GOOGLE_MAPS_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
}

pub fn credentials_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("calview")
        .join("providers")
        .join("google.toml"))
}

/// Environment first, then the credentials file.
pub fn load() -> Result<Credentials> {
    if let Some(api_key) = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
    {
        return Ok(Credentials { api_key });
    }

    let path = credentials_path()?;

    if !path.exists() {
        anyhow::bail!(
            "Google Maps API key not found.\n\n\
            Set {} or create {} with:\n\n\
            api_key = \"your-geocoding-api-key\"\n\n\
            See https://console.cloud.google.com/apis/credentials for setup.",
            API_KEY_ENV,
            path.display()
        );
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

    let creds: Credentials = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse credentials from {}", path.display()))?;

    Ok(creds)
}
