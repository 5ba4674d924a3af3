//! Errors raised while turning zone file tokens into records

use thiserror::Error;

/// Failure while loading a zone into a [`RecordCollection`](crate::collection::RecordCollection)
///
/// Every variant aborts the whole load; no partial collection is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// The tokenizer reported a syntax error for an entry
    #[error("Zone parse error: {0}")]
    TokenParse(String),

    /// A record type outside A, AAAA, CNAME, MX, TXT, NS and SOA
    #[error("Record type {0} is not supported")]
    UnsupportedRecordType(String),

    /// The token stream ended without an SOA record
    #[error("Zone name not found (no SOA record)")]
    MissingOrigin,
}
