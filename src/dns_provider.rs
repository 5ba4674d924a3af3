//! DNS provider abstraction layer
//!
//! This module defines the operations the reconciler needs from a DNS
//! provider, so that the Cloudflare client can be swapped for another
//! provider or an in-memory fake in tests.

use async_trait::async_trait;

use crate::collection::RecordCollection;
use crate::record::Record;

//==============================================================================
// Trait
//==============================================================================

/// DNS provider trait for managing the records of a zone
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Looks up the provider's zone ID for a zone name
    ///
    /// # Errors
    ///
    /// Fails when no zone with that name is visible to the credentials, or
    /// when the request fails.
    async fn zone_id_by_name(&self, zone_name: &str) -> anyhow::Result<String>;

    /// Fetches every supported record in the zone
    ///
    /// Returned records carry their provider ID. Records of types that
    /// cannot be reconciled are left out.
    async fn list_records(&self, zone_id: &str) -> anyhow::Result<RecordCollection>;

    /// Creates `record` and returns it as stored by the provider
    async fn create_record(&self, zone_id: &str, record: &Record) -> anyhow::Result<Record>;

    /// Deletes the record with the given provider ID
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> anyhow::Result<()>;
}
