//! Provider-agnostic DNS record representation
//!
//! A [`Record`] is what both sides of a reconciliation are reduced to: the
//! records parsed from a zone file and the records fetched from the DNS
//! provider.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{TTL_AUTOMATIC, TTL_PROXIED};

//==============================================================================
// Types
//==============================================================================

/// The record types that can be reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "TXT" => Ok(RecordType::Txt),
            _ => Err(anyhow!("Unsupported record type: {}", s)),
        }
    }
}

/// A single DNS record
///
/// `ttl` doubles as a provider convention: a TTL of 1 marks the record as
/// proxied by the provider, a TTL of 0 requests an automatic TTL. The
/// `proxied` flag is derived from the TTL when the record is constructed and
/// cannot be set on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Provider-assigned identifier, only present on fetched records
    pub id: Option<String>,
    pub record_type: RecordType,
    name: String,
    content: String,
    /// Mail exchange preference, zero for anything but MX
    pub priority: u16,
    ttl: u32,
    proxied: bool,
}

impl Record {
    /// Creates a record, deriving the proxied flag from `ttl`
    pub fn new(
        record_type: RecordType,
        name: impl Into<String>,
        content: impl Into<String>,
        ttl: u32,
    ) -> Self {
        let name = name.into();
        Self {
            id: None,
            record_type,
            name: name.trim_end_matches('.').to_string(),
            content: content.into(),
            priority: 0,
            ttl,
            proxied: ttl == TTL_PROXIED,
        }
    }

    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Fully qualified name without the trailing dot
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    /// Whether the provider should pick the TTL
    pub fn is_automatic_ttl(&self) -> bool {
        self.ttl == TTL_AUTOMATIC
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DNS {} {} -> ", self.record_type, self.name)?;
        if self.record_type == RecordType::Mx {
            write!(f, "{} ", self.priority)?;
        }
        write!(
            f,
            "{} (TTL: {}, Proxied: {})",
            self.content, self.ttl, self.proxied
        )
    }
}

//==============================================================================
// Tests
//==============================================================================
