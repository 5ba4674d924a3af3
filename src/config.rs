//! Configuration module for zonesync
//!
//! This module handles loading and validating configuration from files and environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use zeroize::ZeroizeOnDrop;

use crate::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_TIMEOUT_SECS, ENV_API_TOKEN, ENV_TIMEOUT, ENV_VERBOSE,
    ENV_ZONE_ID, MAX_TIMEOUT_SECS, MIN_API_TOKEN_LENGTH, MIN_TIMEOUT_SECS,
};
use crate::validation::validate_zone_id;

//==============================================================================
// Config
//==============================================================================

/// Configuration for talking to the Cloudflare API
///
/// Sensitive fields (api_token and zone_id) are wrapped in `Zeroizing` to ensure
/// they are securely cleared from memory when dropped.
///
/// # Configuration Loading Priority
///
/// Configuration is loaded from multiple sources in order of precedence:
/// 1. Environment variables (highest priority)
/// 2. Config file (`/etc/zonesync/config.toml` or custom path)
/// 3. Defaults (lowest priority)
///
/// Credentials are optional at load time because listing a local zone needs
/// none; commands that reach the API call [`Config::require_api_token`].
#[derive(Debug, Clone, ZeroizeOnDrop)]
pub struct Config {
    /// Cloudflare API token with `Zone:DNS:Edit` permission
    ///
    /// It can be set via the `CLOUDFLARE_API_TOKEN` environment variable.
    #[zeroize(skip)]
    pub api_token: zeroize::Zeroizing<String>,
    /// Cloudflare zone ID, empty to look it up from the zone's SOA name
    ///
    /// It can be set via the `CLOUDFLARE_ZONE_ID` environment variable.
    #[zeroize(skip)]
    pub zone_id: zeroize::Zeroizing<String>,
    /// HTTP request timeout
    ///
    /// Default: 30 seconds
    #[zeroize(skip)]
    pub timeout: Duration,
    /// Enable verbose logging
    ///
    /// Default: false
    #[zeroize(skip)]
    pub verbose: bool,
}

impl Config {
    /// Loads configuration from file and environment variables
    ///
    /// This method loads configuration in the following order:
    /// 1. Loads from the specified config file, or the default path when
    ///    none is given (missing files are skipped)
    /// 2. Overrides with environment variables (if set)
    /// 3. Validates the final configuration
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::load_from_file(path)?;
        Self::override_with_env(&mut config)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Loads configuration from a TOML file, using defaults for missing
    /// fields or a missing file
    fn load_from_file(path: PathBuf) -> Result<Self> {
        let mut api_token = String::new();
        let mut zone_id = String::new();
        let mut timeout = DEFAULT_TIMEOUT_SECS;
        let mut verbose = false;

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let toml_config: TomlConfig =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;

            api_token = toml_config.api_token.unwrap_or_default();
            zone_id = toml_config.zone_id.unwrap_or_default();
            timeout = toml_config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
            verbose = toml_config.verbose.unwrap_or(false);
        }

        Ok(Self {
            api_token: zeroize::Zeroizing::new(api_token),
            zone_id: zeroize::Zeroizing::new(zone_id),
            timeout: Duration::from_secs(timeout),
            verbose,
        })
    }

    /// Overrides configuration values with environment variables that are
    /// set and non-empty
    fn override_with_env(config: &mut Self) -> Result<()> {
        if let Ok(v) = env::var(ENV_API_TOKEN) {
            if !v.is_empty() {
                config.api_token = zeroize::Zeroizing::new(v);
            }
        }
        if let Ok(v) = env::var(ENV_ZONE_ID) {
            if !v.is_empty() {
                config.zone_id = zeroize::Zeroizing::new(v);
            }
        }
        if let Ok(v) = env::var(ENV_TIMEOUT) {
            if !v.is_empty() {
                let secs: u64 = v.trim().parse().context("Invalid ZONESYNC_TIMEOUT value")?;
                config.timeout = Duration::from_secs(secs);
            }
        }
        if let Ok(v) = env::var(ENV_VERBOSE) {
            if !v.is_empty() {
                config.verbose = parse_bool_env(&v).context("Invalid ZONESYNC_VERBOSE value")?;
            }
        }
        Ok(())
    }

    /// Validates the values that are present
    fn validate(&self) -> Result<()> {
        // Cloudflare API tokens are typically 40 characters
        if !self.api_token.is_empty() && self.api_token.len() < MIN_API_TOKEN_LENGTH {
            return Err(anyhow::anyhow!(
                "{} is too short ({} chars, minimum {})",
                ENV_API_TOKEN,
                self.api_token.len(),
                MIN_API_TOKEN_LENGTH
            ));
        }
        if !self.zone_id.is_empty() {
            validate_zone_id(self.zone_id.as_str())?;
        }

        let timeout_secs = self.timeout.as_secs();
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(anyhow::anyhow!(
                "timeout must be between {} and {} seconds, got {}",
                MIN_TIMEOUT_SECS,
                MAX_TIMEOUT_SECS,
                timeout_secs
            ));
        }

        Ok(())
    }

    /// Returns the API token or an error naming the missing variable
    pub fn require_api_token(&self) -> Result<&str> {
        if self.api_token.is_empty() {
            return Err(anyhow::anyhow!("Missing {}", ENV_API_TOKEN));
        }
        Ok(self.api_token.as_str())
    }

    /// Returns the configured zone ID, if any
    pub fn zone_id(&self) -> Option<&str> {
        if self.zone_id.is_empty() {
            None
        } else {
            Some(self.zone_id.as_str())
        }
    }
}

/// Parses a boolean value from an environment variable
///
/// Accepts "1", "true", "yes", "on" and "0", "false", "no", "off".
fn parse_bool_env(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "expected boolean (true/false/1/0/yes/no/on/off)"
        )),
    }
}

/// TOML configuration file structure
#[derive(Debug, serde::Deserialize)]
struct TomlConfig {
    api_token: Option<String>,
    zone_id: Option<String>,
    timeout: Option<u64>,
    verbose: Option<bool>,
}

//==============================================================================
// Tests
//==============================================================================
