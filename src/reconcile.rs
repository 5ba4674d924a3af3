//! Reconciliation of a local zone with the provider's records
//!
//! The local collection is diffed against the remote one; records only the
//! provider has are deleted and records only the zone file has are created.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::collection::RecordCollection;
use crate::dns_provider::DnsProvider;

//==============================================================================
// Report
//==============================================================================

/// Records touched by a reconciliation run
///
/// In a dry run these are the records that would have been touched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub created: RecordCollection,
    pub deleted: RecordCollection,
}

impl SyncReport {
    pub fn is_in_sync(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

//==============================================================================
// Reconciler
//==============================================================================

/// Applies the difference between a local zone and a provider zone
pub struct Reconciler<P: DnsProvider> {
    provider: Arc<P>,
    zone_id: String,
}

impl<P: DnsProvider> Reconciler<P> {
    pub fn new(provider: Arc<P>, zone_id: impl Into<String>) -> Self {
        Self {
            provider,
            zone_id: zone_id.into(),
        }
    }

    /// Fetches the remote records and diffs them against `local`
    ///
    /// Returns `(local_only, remote_only)`.
    pub async fn plan(
        &self,
        local: &RecordCollection,
    ) -> Result<(RecordCollection, RecordCollection)> {
        let remote = self.provider.list_records(&self.zone_id).await?;
        info!(
            "Comparing {} local records with {} remote records",
            local.len(),
            remote.len()
        );
        Ok(local.diff(&remote))
    }

    /// Brings the provider in line with `local`
    ///
    /// Remote-only records are deleted first, then local-only records are
    /// created, each in collection order. The first provider error aborts
    /// the run. With `dry_run` nothing is written.
    pub async fn reconcile(&self, local: &RecordCollection, dry_run: bool) -> Result<SyncReport> {
        let (create, delete) = self.plan(local).await?;

        if create.is_empty() && delete.is_empty() {
            info!("Zone is in sync");
            return Ok(SyncReport::default());
        }

        if dry_run {
            for record in &delete {
                warn!("Dry run: would delete {}", record);
            }
            for record in &create {
                warn!("Dry run: would create {}", record);
            }
            return Ok(SyncReport {
                created: create,
                deleted: delete,
            });
        }

        let mut report = SyncReport::default();

        for record in delete {
            let id = record
                .id
                .as_deref()
                .ok_or_else(|| anyhow!("Remote record has no ID: {}", record))?;
            self.provider.delete_record(&self.zone_id, id).await?;
            info!("Deleted {}", record);
            report.deleted.push(record);
        }

        for record in &create {
            let created = self.provider.create_record(&self.zone_id, record).await?;
            info!("Created {}", created);
            report.created.push(created);
        }

        Ok(report)
    }
}

//==============================================================================
// Tests
//==============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordType};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    const ZONE_ID: &str = "0123456789abcdef0123456789abcdef";

    /// In-memory provider recording every write
    #[derive(Default)]
    struct FakeProvider {
        records: Mutex<Vec<Record>>,
        calls: Mutex<Vec<String>>,
        fail_deletes: bool,
    }

    impl FakeProvider {
        fn with_records(records: Vec<Record>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl DnsProvider for FakeProvider {
        async fn zone_id_by_name(&self, _zone_name: &str) -> Result<String> {
            Ok(ZONE_ID.to_string())
        }

        async fn list_records(&self, zone_id: &str) -> Result<RecordCollection> {
            assert_eq!(zone_id, ZONE_ID);
            Ok(self.records.lock().await.iter().cloned().collect())
        }

        async fn create_record(&self, _zone_id: &str, record: &Record) -> Result<Record> {
            let mut records = self.records.lock().await;
            let created = record.clone().with_id(format!("new{}", records.len()));
            records.push(created.clone());
            self.calls.lock().await.push(format!("create {}", record.name()));
            Ok(created)
        }

        async fn delete_record(&self, _zone_id: &str, record_id: &str) -> Result<()> {
            if self.fail_deletes {
                return Err(anyhow!("delete refused"));
            }
            self.records
                .lock()
                .await
                .retain(|r| r.id.as_deref() != Some(record_id));
            self.calls.lock().await.push(format!("delete {}", record_id));
            Ok(())
        }
    }

    fn local_zone() -> RecordCollection {
        RecordCollection::from(vec![
            Record::new(RecordType::A, "example.com", "192.0.2.1", 300),
            Record::new(RecordType::Cname, "www.example.com", "example.com", 1),
        ])
    }

    #[tokio::test]
    async fn test_reconcile_creates_and_deletes() {
        let provider = Arc::new(FakeProvider::with_records(vec![
            Record::new(RecordType::A, "example.com", "192.0.2.1", 300).with_id("keep"),
            Record::new(RecordType::A, "old.example.com", "192.0.2.9", 300).with_id("stale"),
        ]));
        let reconciler = Reconciler::new(provider.clone(), ZONE_ID);

        let report = reconciler.reconcile(&local_zone(), false).await.unwrap();
        assert_eq!(report.deleted.len(), 1);
        assert_eq!(report.created.len(), 1);
        assert_eq!(
            report.created.iter().next().unwrap().id.as_deref(),
            Some("new1")
        );

        let calls = provider.calls.lock().await.clone();
        assert_eq!(calls, ["delete stale", "create www.example.com"]);

        // A second run finds nothing to do
        let report = reconciler.reconcile(&local_zone(), false).await.unwrap();
        assert!(report.is_in_sync());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let provider = Arc::new(FakeProvider::with_records(vec![Record::new(
            RecordType::Txt,
            "example.com",
            "stale",
            300,
        )
        .with_id("txt")]));
        let reconciler = Reconciler::new(provider.clone(), ZONE_ID);

        let report = reconciler.reconcile(&local_zone(), true).await.unwrap();
        assert_eq!(report.created.len(), 2);
        assert_eq!(report.deleted.len(), 1);
        assert!(provider.calls.lock().await.is_empty());
        assert_eq!(provider.records.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_aborts() {
        let provider = Arc::new(FakeProvider {
            records: Mutex::new(vec![
                Record::new(RecordType::A, "old.example.com", "192.0.2.9", 300).with_id("stale")
            ]),
            fail_deletes: true,
            ..Default::default()
        });
        let reconciler = Reconciler::new(provider.clone(), ZONE_ID);

        let err = reconciler.reconcile(&local_zone(), false).await.unwrap_err();
        assert!(err.to_string().contains("delete refused"));
        assert!(provider.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_remote_record_without_id_is_an_error() {
        let provider = Arc::new(FakeProvider::with_records(vec![Record::new(
            RecordType::A,
            "old.example.com",
            "192.0.2.9",
            300,
        )]));
        let reconciler = Reconciler::new(provider, ZONE_ID);

        let err = reconciler.reconcile(&local_zone(), false).await.unwrap_err();
        assert!(err.to_string().contains("has no ID"));
    }
}
