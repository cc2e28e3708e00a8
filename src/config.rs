//! Monitor configuration, passed in at construction.

use serde::{Deserialize, Serialize};

use crate::audit::AuditLimits;
use crate::scanner::ScanMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Container every processed log payload is archived into.
    pub archive_container: String,
    /// Key prefix for archived payloads.
    pub archive_prefix: String,
    /// Notification topic name, resolved by the channel at publish time.
    pub topic_name: String,
    /// Table receiving object metadata records.
    pub table_name: String,
    pub limits: AuditLimits,
    /// Restrict the audit run to these buckets; empty means audit
    /// everything the lister returns.
    pub bucket_names: Vec<String>,
    pub scan_mode: ScanMode,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            archive_container: "backup-for-logs-dev".to_string(),
            archive_prefix: "logs".to_string(),
            topic_name: "storage-alerts".to_string(),
            table_name: "object-metadata-table".to_string(),
            limits: AuditLimits::default(),
            bucket_names: Vec::new(),
            scan_mode: ScanMode::Occurrences,
        }
    }
}
