//! Cloudflare API client for DNS operations
//!
//! Uses reqwest with rustls for HTTP requests.

use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use urlencoding::encode;

use crate::collection::RecordCollection;
use crate::constants::{
    CLOUDFLARE_API_BASE, CLOUDFLARE_PAGE_SIZE, CLOUDFLARE_TTL_AUTO, CLOUDFLARE_USER_AGENT,
    HTTP_STATUS_FORBIDDEN, HTTP_STATUS_UNAUTHORIZED, TTL_AUTOMATIC, TTL_PROXIED,
};
use crate::dns_provider::DnsProvider;
use crate::record::{Record, RecordType};

//==============================================================================
// Types
//==============================================================================

/// A DNS record as the Cloudflare API returns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct DnsRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    content: String,
    #[serde(default)]
    proxied: bool,
    ttl: u64,
    #[serde(default)]
    priority: Option<u16>,
}

impl DnsRecord {
    /// Converts to a [`Record`], mapping Cloudflare's proxied flag and
    /// automatic TTL onto the zone TTL convention
    ///
    /// Returns `None` for record types that cannot be reconciled.
    fn into_record(self) -> Option<Record> {
        let record_type = self.record_type.parse::<RecordType>().ok()?;
        let ttl = if self.proxied {
            TTL_PROXIED
        } else if self.ttl == CLOUDFLARE_TTL_AUTO {
            TTL_AUTOMATIC
        } else {
            u32::try_from(self.ttl).unwrap_or(u32::MAX)
        };

        let mut record = Record::new(record_type, self.name, self.content, ttl).with_id(self.id);
        if record_type == RecordType::Mx {
            record = record.with_priority(self.priority.unwrap_or_default());
        }
        Some(record)
    }
}

/// Request body for creating a record
#[derive(Debug, Serialize)]
struct Payload<'a> {
    #[serde(rename = "type")]
    rt: &'static str,
    name: &'a str,
    content: &'a str,
    ttl: u64,
    proxied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<u16>,
}

impl<'a> From<&'a Record> for Payload<'a> {
    fn from(record: &'a Record) -> Self {
        let ttl = match record.ttl() {
            TTL_PROXIED | TTL_AUTOMATIC => CLOUDFLARE_TTL_AUTO,
            ttl => u64::from(ttl),
        };
        Self {
            rt: record.record_type.as_str(),
            name: record.name(),
            content: record.content(),
            ttl,
            proxied: record.is_proxied(),
            priority: (record.record_type == RecordType::Mx).then_some(record.priority),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Zone {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiError>,
    result: Option<T>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ResultInfo {
    page: u32,
    total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiError {
    code: u64,
    message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Builds the error for a failed API call
fn api_failure(action: &str, status: StatusCode, errors: &[ApiError]) -> anyhow::Error {
    let code = status.as_u16();
    if code == HTTP_STATUS_UNAUTHORIZED || code == HTTP_STATUS_FORBIDDEN {
        return anyhow!("{} failed: authentication rejected by Cloudflare ({})", action, code);
    }
    if status.is_server_error() {
        return anyhow!("{} failed: Cloudflare server error: {}", action, code);
    }
    anyhow!(
        "{} failed: {}",
        action,
        errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// Redacts sensitive data (API tokens and zone IDs) from log messages
///
/// # Examples
///
/// ```
/// use zonesync::cloudflare::redact_secrets;
///
/// let message = "API call with token secret123 and zone zone456";
/// let redacted = redact_secrets(message, "secret123", "zone456");
/// assert!(!redacted.contains("secret123"));
/// assert!(!redacted.contains("zone456"));
/// assert!(redacted.contains("***REDACTED***"));
/// ```
#[must_use]
pub fn redact_secrets(message: &str, api_token: &str, zone_id: &str) -> String {
    let mut sanitized = message.to_string();

    if !api_token.is_empty() {
        sanitized = sanitized.replace(api_token, "***REDACTED***");
    }
    if !zone_id.is_empty() {
        sanitized = sanitized.replace(zone_id, "***REDACTED***");
    }

    sanitized
}

//==============================================================================
// Client
//==============================================================================

pub struct CloudflareClient {
    api_token: String,
    client: reqwest::Client,
}

impl CloudflareClient {
    pub fn new(api_token: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(CLOUDFLARE_USER_AGENT)
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            api_token: api_token.to_string(),
            client,
        })
    }

    /// Sends a request and unwraps the Cloudflare response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        action: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<(Option<T>, Option<ResultInfo>)> {
        // reqwest errors carry the request URL, which contains the zone ID
        let resp = request
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("{} request failed", action))?;
        let status = resp.status();
        let body: ApiResponse<T> = resp
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to parse response")?;

        if !body.success {
            return Err(api_failure(action, status, &body.errors));
        }

        Ok((body.result, body.result_info))
    }

    /// Describes a request for the debug log with secrets redacted
    fn request_line(&self, method: &str, url: &str, zone_id: &str) -> String {
        format!(
            "{} {}",
            method,
            redact_secrets(url, &self.api_token, zone_id)
        )
    }

    async fn list_page(&self, zone_id: &str, page: u32) -> Result<(Vec<DnsRecord>, u32)> {
        let url = format!(
            "{}/zones/{}/dns_records?page={}&per_page={}",
            CLOUDFLARE_API_BASE, zone_id, page, CLOUDFLARE_PAGE_SIZE
        );

        debug!("{}", self.request_line("GET", &url, zone_id));
        let (records, info) = self
            .send::<Vec<DnsRecord>>("List records", self.client.get(&url))
            .await?;
        let total_pages = info.map(|i| i.total_pages).unwrap_or(1);
        if let Some(info) = info {
            debug!("Fetched page {}/{}", info.page, info.total_pages);
        }
        Ok((records.unwrap_or_default(), total_pages))
    }
}

#[async_trait]
impl DnsProvider for CloudflareClient {
    async fn zone_id_by_name(&self, zone_name: &str) -> Result<String> {
        let url = format!("{}/zones?name={}", CLOUDFLARE_API_BASE, encode(zone_name));

        debug!("GET {}", url);
        let (zones, _) = self
            .send::<Vec<Zone>>("Zone lookup", self.client.get(&url))
            .await?;

        zones
            .unwrap_or_default()
            .into_iter()
            .find(|z| z.name.eq_ignore_ascii_case(zone_name))
            .map(|z| z.id)
            .ok_or_else(|| anyhow!("Zone {} not found", zone_name))
    }

    async fn list_records(&self, zone_id: &str) -> Result<RecordCollection> {
        let mut records = RecordCollection::new();
        let mut page = 1;

        loop {
            let (batch, total_pages) = self.list_page(zone_id, page).await?;
            for dns_record in batch {
                let description = format!("{} {}", dns_record.record_type, dns_record.name);
                match dns_record.into_record() {
                    Some(record) => records.push(record),
                    None => debug!("Skipping unsupported remote record {}", description),
                }
            }
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    async fn create_record(&self, zone_id: &str, record: &Record) -> Result<Record> {
        let url = format!("{}/zones/{}/dns_records", CLOUDFLARE_API_BASE, zone_id);
        let payload = serde_json::to_string(&Payload::from(record))?;

        debug!("{}", self.request_line("POST", &url, zone_id));
        let request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(payload);
        let (created, _) = self.send::<DnsRecord>("Create", request).await?;

        created
            .context("API returned success but no result")?
            .into_record()
            .context("API returned a record of an unexpected type")
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            CLOUDFLARE_API_BASE, zone_id, record_id
        );

        debug!("{}", self.request_line("DELETE", &url, zone_id));
        let (deleted, _) = self
            .send::<serde_json::Value>("Delete", self.client.delete(&url))
            .await?;
        if deleted.is_none() {
            bail!("API returned success but no result");
        }
        Ok(())
    }
}

//==============================================================================
// Tests
//==============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0123456789abcdefghijklmnopqrstuvwxyz";
    const ZONE_ID: &str = "023e105f4ecef8ad9ca31a8372d0c353";

    fn dns_record(rt: &str, ttl: u64, proxied: bool) -> DnsRecord {
        DnsRecord {
            id: "372e67954025e0ba6aaa6d586b9e0b59".to_string(),
            record_type: rt.to_string(),
            name: "www.example.com".to_string(),
            content: "198.51.100.4".to_string(),
            proxied,
            ttl,
            priority: None,
        }
    }

    #[test]
    fn test_list_response_parsing() {
        let json = r#"{
            "success": true,
            "errors": [],
            "messages": [],
            "result": [
                {
                    "id": "abc123",
                    "type": "MX",
                    "name": "example.com",
                    "content": "mail.example.com",
                    "proxied": false,
                    "ttl": 300,
                    "priority": 10,
                    "locked": false
                }
            ],
            "result_info": {"page": 1, "per_page": 100, "count": 1, "total_count": 1, "total_pages": 1}
        }"#;

        let resp: ApiResponse<Vec<DnsRecord>> = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.result_info.map(|i| i.total_pages), Some(1));

        let record = resp.result.unwrap().remove(0).into_record().unwrap();
        assert_eq!(record.record_type, RecordType::Mx);
        assert_eq!(record.priority, 10);
        assert_eq!(record.ttl(), 300);
        assert_eq!(record.id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_error_response_parsing() {
        let json = r#"{
            "success": false,
            "errors": [{"code": 81057, "message": "Record already exists."}],
            "messages": [],
            "result": null
        }"#;
        let resp: ApiResponse<DnsRecord> = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        let err = api_failure("Create", StatusCode::BAD_REQUEST, &resp.errors);
        assert_eq!(err.to_string(), "Create failed: [81057] Record already exists.");
    }

    #[test]
    fn test_api_failure_auth_and_server() {
        let err = api_failure("List records", StatusCode::FORBIDDEN, &[]);
        assert!(err.to_string().contains("authentication rejected"));
        let err = api_failure("List records", StatusCode::BAD_GATEWAY, &[]);
        assert!(err.to_string().contains("server error: 502"));
    }

    #[test]
    fn test_remote_ttl_mapping() {
        let proxied = dns_record("A", 1, true).into_record().unwrap();
        assert_eq!(proxied.ttl(), TTL_PROXIED);
        assert!(proxied.is_proxied());

        let auto = dns_record("A", 1, false).into_record().unwrap();
        assert_eq!(auto.ttl(), TTL_AUTOMATIC);
        assert!(!auto.is_proxied());

        let literal = dns_record("A", 3600, false).into_record().unwrap();
        assert_eq!(literal.ttl(), 3600);
    }

    #[test]
    fn test_unsupported_remote_type_skipped() {
        assert!(dns_record("SRV", 300, false).into_record().is_none());
        assert!(dns_record("NS", 300, false).into_record().is_none());
    }

    #[test]
    fn test_payload_ttl_mapping() {
        let proxied = Record::new(RecordType::Cname, "www.a.com", "a.com", 1);
        let json = serde_json::to_value(Payload::from(&proxied)).unwrap();
        assert_eq!(json["ttl"], 1);
        assert_eq!(json["proxied"], true);
        assert!(json.get("priority").is_none());

        let auto = Record::new(RecordType::A, "a.com", "1.1.1.1", 0);
        let json = serde_json::to_value(Payload::from(&auto)).unwrap();
        assert_eq!(json["ttl"], 1);
        assert_eq!(json["proxied"], false);

        let mx = Record::new(RecordType::Mx, "a.com", "mail.a.com", 300).with_priority(10);
        let json = serde_json::to_value(Payload::from(&mx)).unwrap();
        assert_eq!(json["type"], "MX");
        assert_eq!(json["ttl"], 300);
        assert_eq!(json["priority"], 10);
    }

    #[test]
    fn test_local_remote_round_trip_matches() {
        let local = Record::new(RecordType::A, "a.com", "1.1.1.1", 0);
        let payload = Payload::from(&local);
        let remote = DnsRecord {
            id: "id".to_string(),
            record_type: payload.rt.to_string(),
            name: payload.name.to_string(),
            content: payload.content.to_string(),
            proxied: payload.proxied,
            ttl: payload.ttl,
            priority: payload.priority,
        }
        .into_record()
        .unwrap();
        assert!(crate::matcher::matches(&local, &remote));
    }

    #[test]
    fn test_request_line_hides_secrets() {
        let client = CloudflareClient::new(TOKEN, Duration::from_secs(5)).unwrap();
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            CLOUDFLARE_API_BASE, ZONE_ID, "372e67954025e0ba6aaa6d586b9e0b59"
        );

        let line = client.request_line("DELETE", &url, ZONE_ID);
        assert!(line.starts_with("DELETE https://api.cloudflare.com/"));
        assert!(line.contains("/zones/***REDACTED***/dns_records/"));
        assert!(!line.contains(ZONE_ID));
    }

    #[tokio::test]
    async fn test_request_error_hides_zone_id() {
        let client = CloudflareClient::new(TOKEN, Duration::from_secs(5)).unwrap();
        let url = format!("ftp://api.cloudflare.com/zones/{}/dns_records", ZONE_ID);

        let err = client
            .send::<serde_json::Value>("List records", client.client.get(&url))
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).starts_with("List records request failed"));
        assert!(!format!("{:#}", err).contains(ZONE_ID));
        assert!(!format!("{:?}", err).contains(ZONE_ID));
    }

    #[test]
    fn test_redact_secrets() {
        let message = "token abc zone def";
        assert_eq!(
            redact_secrets(message, "abc", "def"),
            "token ***REDACTED*** zone ***REDACTED***"
        );
        assert_eq!(redact_secrets(message, "", ""), message);
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError {
            code: 6003,
            message: "Invalid request headers".to_string(),
        };
        assert_eq!(format!("{}", err), "[6003] Invalid request headers");
    }
}
