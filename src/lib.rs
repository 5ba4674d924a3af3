//! zonesync - reconcile a BIND zone file with Cloudflare DNS
//!
//! Architecture:
//! - Zone text is scanned by the `domain` crate into a lazy token stream
//! - Tokens become provider-agnostic records (TTL 1 = proxied, 0 = automatic)
//! - Local and remote record collections are diffed under a matching rule
//!   that ignores provider bookkeeping
//! - The difference is applied through a `DnsProvider` (Cloudflare via reqwest)

pub mod builder;
pub mod cloudflare;
pub mod collection;
pub mod config;
pub mod constants;
pub mod dns_provider;
pub mod error;
pub mod matcher;
pub mod reconcile;
pub mod record;
pub mod token;
pub mod validation;
pub mod zone;

pub use collection::RecordCollection;
pub use error::ZoneError;
pub use record::{Record, RecordType};
pub use zone::load_zone;
