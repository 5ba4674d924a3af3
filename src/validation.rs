//! Validation utilities for zonesync
//!
//! This module validates user-supplied zone names and Cloudflare zone IDs
//! before they are used in API requests.

use anyhow::{anyhow, Result};

use crate::constants::{
    ENV_ZONE_ID, MAX_LABEL_LENGTH, MAX_NAME_LENGTH, MAX_ZONE_ID_LENGTH, MIN_ZONE_ID_LENGTH,
};

/// Validates that a string is a usable zone name
///
/// Zone names are looked up through the Cloudflare API, so they must be
/// plain hostnames:
///
/// 1. **Length**: at most 253 characters (excluding trailing dot), labels at
///    most 63 characters
/// 2. **Syntax**: dot separated, non-empty labels, no leading dot
/// 3. **Characters**: letters, digits, hyphens (not at a label boundary)
///
/// A single trailing dot (FQDN notation) is accepted and ignored.
///
/// # Examples
///
/// ```
/// use zonesync::validation::validate_zone_name;
///
/// assert!(validate_zone_name("example.com").is_ok());
/// assert!(validate_zone_name("example.com.").is_ok());
///
/// assert!(validate_zone_name("").is_err());
/// assert!(validate_zone_name("*.example.com").is_err());
/// assert!(validate_zone_name("example..com").is_err());
/// ```
pub fn validate_zone_name(zone_name: &str) -> Result<()> {
    let trimmed = zone_name.trim();
    let name = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if name.is_empty() {
        return Err(anyhow!("Zone name cannot be empty"));
    }
    if name.contains(' ') {
        return Err(anyhow!("Zone name cannot contain spaces"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(anyhow!(
            "Zone name too long (max {} characters, got {})",
            MAX_NAME_LENGTH,
            name.len()
        ));
    }
    if name.starts_with('.') {
        return Err(anyhow!("Zone name cannot start with a dot"));
    }
    if name.contains("..") {
        return Err(anyhow!("Zone name cannot contain consecutive dots"));
    }

    for label in name.split('.') {
        if label.len() > MAX_LABEL_LENGTH {
            return Err(anyhow!(
                "Zone name label too long (max {} characters, got {})",
                MAX_LABEL_LENGTH,
                label.len()
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(anyhow!("Zone name label cannot start or end with hyphen"));
        }
        if let Some(ch) = label.chars().find(|c| !c.is_alphanumeric() && *c != '-') {
            return Err(anyhow!(
                "Zone name contains invalid character: '{}' (allowed: letters, digits, '-')",
                ch
            ));
        }
    }

    Ok(())
}

/// Validates the format of a Cloudflare zone ID
///
/// Zone IDs are alphanumeric and typically 32 characters long.
pub fn validate_zone_id(zone_id: &str) -> Result<()> {
    if !zone_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(anyhow!(
            "{} must be alphanumeric, got: {}",
            ENV_ZONE_ID,
            zone_id
        ));
    }
    if !(MIN_ZONE_ID_LENGTH..=MAX_ZONE_ID_LENGTH).contains(&zone_id.len()) {
        return Err(anyhow!(
            "{} has invalid length ({} chars, expected {}-{})",
            ENV_ZONE_ID,
            zone_id.len(),
            MIN_ZONE_ID_LENGTH,
            MAX_ZONE_ID_LENGTH
        ));
    }
    Ok(())
}
