//! Conversion of zone file tokens into records
//!
//! NS and SOA tokens are dropped: the provider does not allow changing
//! nameservers and the SOA is zone metadata rather than a manageable record.

use crate::error::ZoneError;
use crate::record::{Record, RecordType};
use crate::token::{Token, TokenData};

/// Builds the record described by `token`
///
/// Returns `Ok(None)` for NS and SOA tokens and
/// [`ZoneError::UnsupportedRecordType`] for types that cannot be reconciled.
pub fn build_record(token: &Token) -> Result<Option<Record>, ZoneError> {
    let name = token.header.name.as_str();
    let ttl = token.header.ttl;

    let record = match &token.data {
        TokenData::A(addr) => Record::new(RecordType::A, name, addr.to_string(), ttl),
        TokenData::Aaaa(addr) => Record::new(RecordType::Aaaa, name, addr.to_string(), ttl),
        TokenData::Cname(target) => {
            let target = target.strip_suffix('.').unwrap_or(target);
            Record::new(RecordType::Cname, name, target, ttl)
        }
        TokenData::Mx {
            preference,
            exchange,
        } => Record::new(RecordType::Mx, name, exchange.trim_end_matches('.'), ttl)
            .with_priority(*preference),
        TokenData::Txt(chunks) => {
            let content = chunks.first().cloned().unwrap_or_default();
            Record::new(RecordType::Txt, name, content, ttl)
        }
        TokenData::Ns(_) | TokenData::Soa { .. } => return Ok(None),
        TokenData::Other(rtype) => return Err(ZoneError::UnsupportedRecordType(rtype.clone())),
    };

    Ok(Some(record))
}
