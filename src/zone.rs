//! Zone loading
//!
//! Drives a token stream through the record builder and picks up the zone
//! name from the SOA record on the way.

use tracing::debug;

use crate::builder::build_record;
use crate::collection::RecordCollection;
use crate::error::ZoneError;
use crate::token::{Token, TokenData, TokenError};

/// Consumes `tokens` and returns the zone's origin name and its records
///
/// The first token error or unsupported record aborts the load. The SOA
/// may appear anywhere in the stream, but one must appear.
pub fn load_zone<I>(tokens: I) -> Result<(String, RecordCollection), ZoneError>
where
    I: IntoIterator<Item = Result<Token, TokenError>>,
{
    let mut origin = String::new();
    let mut records = RecordCollection::new();

    for token in tokens {
        let token = token.map_err(|e| ZoneError::TokenParse(e.to_string()))?;

        if let TokenData::Soa { .. } = token.data {
            origin = token.header.name.trim_matches('.').to_string();
        }

        match build_record(&token)? {
            Some(record) => records.push(record),
            None => debug!("Skipping {:?} at {}", token.data, token.header.name),
        }
    }

    if origin.is_empty() {
        return Err(ZoneError::MissingOrigin);
    }

    debug!("Loaded {} records for {}", records.len(), origin);
    Ok((origin, records))
}
