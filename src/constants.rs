//! Common constants used throughout zonesync

//==============================================================================
// Cloudflare API Constants
//==============================================================================

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// User agent string for Cloudflare API requests
pub const CLOUDFLARE_USER_AGENT: &str = "zonesync/1.0";

/// Page size used when listing DNS records
pub const CLOUDFLARE_PAGE_SIZE: u32 = 100;

/// TTL the Cloudflare API reports for "automatic"
pub const CLOUDFLARE_TTL_AUTO: u64 = 1;

//==============================================================================
// Zone TTL Conventions
//==============================================================================

/// Zone file TTL marking a record as proxied
pub const TTL_PROXIED: u32 = 1;

/// Zone file TTL requesting an automatic TTL
pub const TTL_AUTOMATIC: u32 = 0;

//==============================================================================
// HTTP Status Codes
//==============================================================================

/// HTTP status code for unauthorized requests (401)
pub const HTTP_STATUS_UNAUTHORIZED: u16 = 401;

/// HTTP status code for forbidden requests (403)
pub const HTTP_STATUS_FORBIDDEN: u16 = 403;

//==============================================================================
// Timeout Constants
//==============================================================================

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Minimum HTTP request timeout in seconds
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Maximum HTTP request timeout in seconds
pub const MAX_TIMEOUT_SECS: u64 = 300;

//==============================================================================
// Validation Constants
//==============================================================================

/// Minimum API token length in characters
pub const MIN_API_TOKEN_LENGTH: usize = 32;

/// Minimum zone ID length in characters
pub const MIN_ZONE_ID_LENGTH: usize = 16;

/// Maximum zone ID length in characters
pub const MAX_ZONE_ID_LENGTH: usize = 64;

/// Maximum DNS name length in characters
pub const MAX_NAME_LENGTH: usize = 253;

/// Maximum DNS label length in characters
pub const MAX_LABEL_LENGTH: usize = 63;

//==============================================================================
// Paths and Environment Variable Names
//==============================================================================

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/zonesync/config.toml";

/// Environment variable name for Cloudflare API token
pub const ENV_API_TOKEN: &str = "CLOUDFLARE_API_TOKEN";

/// Environment variable name for Cloudflare zone ID
pub const ENV_ZONE_ID: &str = "CLOUDFLARE_ZONE_ID";

/// Environment variable name for the HTTP timeout
pub const ENV_TIMEOUT: &str = "ZONESYNC_TIMEOUT";

/// Environment variable name for verbose logging
pub const ENV_VERBOSE: &str = "ZONESYNC_VERBOSE";
