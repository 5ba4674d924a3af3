//! Zone file tokens
//!
//! Zone text is scanned by the `domain` crate. Its records are turned into
//! [`Token`]s carrying just the fields the record builder needs, and handed
//! out one at a time through the [`ZoneTokens`] iterator.

use std::io::Read;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use anyhow::{anyhow, Context as _, Result};
use bytes::Bytes;
use domain::base::name::{Name, ToLabelIter};
use domain::rdata::ZoneRecordData;
use domain::zonefile::inplace::{Entry, ScannedRecord, Zonefile};
use thiserror::Error;

//==============================================================================
// Types
//==============================================================================

/// Owner, TTL and class of a scanned resource record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    /// Absolute owner name, including the trailing dot
    pub name: String,
    pub ttl: u32,
    pub class: String,
}

/// Type-specific payload of a scanned resource record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Cname(String),
    Mx { preference: u16, exchange: String },
    Txt(Vec<String>),
    Ns(String),
    Soa { mname: String },
    /// Any other record type, by mnemonic
    Other(String),
}

/// One resource record from a zone file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub header: TokenHeader,
    pub data: TokenData,
}

impl Token {
    /// Creates an `IN` class token
    pub fn new(name: impl Into<String>, ttl: u32, data: TokenData) -> Self {
        Self {
            header: TokenHeader {
                name: name.into(),
                ttl,
                class: "IN".to_string(),
            },
            data,
        }
    }

    fn from_scanned(record: &ScannedRecord) -> Self {
        let data = match record.data() {
            ZoneRecordData::A(a) => TokenData::A(a.addr()),
            ZoneRecordData::Aaaa(aaaa) => TokenData::Aaaa(aaaa.addr()),
            ZoneRecordData::Cname(cname) => TokenData::Cname(fqdn(cname.cname())),
            ZoneRecordData::Mx(mx) => TokenData::Mx {
                preference: mx.preference(),
                exchange: fqdn(mx.exchange()),
            },
            ZoneRecordData::Txt(txt) => TokenData::Txt(txt.iter().map(txt_string).collect()),
            ZoneRecordData::Ns(ns) => TokenData::Ns(fqdn(ns.nsdname())),
            ZoneRecordData::Soa(soa) => TokenData::Soa {
                mname: fqdn(soa.mname()),
            },
            _ => TokenData::Other(record.rtype().to_string()),
        };

        Self {
            header: TokenHeader {
                name: fqdn(record.owner()),
                ttl: record.ttl().as_secs(),
                class: record.class().to_string(),
            },
            data,
        }
    }
}

/// A syntax error reported by the zone scanner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TokenError(pub String);

/// Renders a domain name in absolute form with a single trailing dot
fn fqdn<N: ToLabelIter + ?Sized>(name: &N) -> String {
    let mut out = String::new();
    for label in name.iter_labels() {
        if label.is_root() {
            continue;
        }
        out.push_str(&label.to_string());
        out.push('.');
    }
    if out.is_empty() {
        out.push('.');
    }
    out
}

/// Decodes a TXT character string, escaping bytes that are not valid UTF-8
/// as `\DDD`
fn txt_string(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let invalid = err.error_len().unwrap_or(rest.len());
                for byte in &rest[..invalid] {
                    out.push_str(&format!("\\{:03}", byte));
                }
                bytes = &rest[invalid..];
            }
        }
    }
}

//==============================================================================
// Token stream
//==============================================================================

/// Lazy, single-pass stream of tokens scanned from zone text
///
/// Entries are scanned on demand as the iterator is advanced. `$ORIGIN` and
/// `$TTL` directives are handled by the scanner; `$INCLUDE` is reported as
/// an error.
pub struct ZoneTokens {
    zonefile: Zonefile,
}

impl ZoneTokens {
    /// Reads zone text from `reader`
    pub fn load(reader: &mut impl Read) -> Result<Self> {
        let zonefile = Zonefile::load(reader).context("Failed to read zone file")?;
        Ok(Self { zonefile })
    }

    /// Sets the origin used for relative names appearing before any
    /// `$ORIGIN` directive
    pub fn with_origin(mut self, origin: &str) -> Result<Self> {
        let name = Name::<Bytes>::from_str(origin)
            .map_err(|e| anyhow!("Invalid origin '{}': {}", origin, e))?;
        self.zonefile.set_origin(name);
        Ok(self)
    }
}

impl From<&str> for ZoneTokens {
    fn from(text: &str) -> Self {
        Self {
            zonefile: Zonefile::from(text),
        }
    }
}

impl Iterator for ZoneTokens {
    type Item = Result<Token, TokenError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.zonefile.next_entry() {
            Ok(Some(Entry::Record(record))) => Some(Ok(Token::from_scanned(&record))),
            Ok(Some(Entry::Include { path, .. })) => Some(Err(TokenError(format!(
                "$INCLUDE {} is not supported",
                path
            )))),
            Ok(None) => None,
            Err(err) => Some(Err(TokenError(err.to_string()))),
        }
    }
}

//==============================================================================
// Tests
//==============================================================================
