// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025-2026 JR Morton

//! Storage-event pipeline: fetch, scan, notify, archive.
//!
//! Every handler is a single sequential pass over one event with no state
//! retained between invocations. Failures are caught at the batch boundary
//! and folded into the returned summary; redelivery is the invoking
//! environment's concern. A missing notification topic is non-fatal: the
//! run continues without publishing. Archival and notification are
//! independent legs — both are attempted, both failures are reported.

use chrono::Utc;

use crate::audit::{ThresholdAuditor, Violation};
use crate::config::MonitorConfig;
use crate::error::{ProcessorError, PublishError};
use crate::events::{parse_object_events, ObjectRef};
use crate::report;
use crate::rules::{default_rules, Rule};
use crate::scanner::{AnomalyScanner, Finding};
use crate::stores::traits::{
    FieldValue, NotificationChannel, ObjectStore, Record, RecordStore, ResourceLister,
};

/// How the alert leg of a scan invocation ended.
#[derive(Debug)]
pub enum AlertStatus {
    /// A finding was published, exactly once.
    Sent,
    /// The payload was clean; nothing to send.
    NotRequired,
    /// No destination matched the configured topic name (non-fatal).
    NoDestination,
    /// Delivery was attempted and rejected.
    Failed(ProcessorError),
}

/// Result of scanning one stored object.
#[derive(Debug)]
pub struct ScanOutcome {
    pub object: ObjectRef,
    pub finding: Option<Finding>,
    pub alert: AlertStatus,
    /// Key the payload was archived under, when archival succeeded.
    pub archive_key: Option<String>,
    pub archive_error: Option<ProcessorError>,
}

impl ScanOutcome {
    pub fn is_success(&self) -> bool {
        self.archive_error.is_none() && !matches!(self.alert, AlertStatus::Failed(_))
    }
}

/// Result of recording one object's metadata.
#[derive(Debug)]
pub struct MetadataOutcome {
    pub object: ObjectRef,
    /// False when the topic name resolved to no destination.
    pub notified: bool,
}

/// Result of one audit run.
#[derive(Debug, Default)]
pub struct AuditOutcome {
    pub resources_checked: usize,
    pub violations: Vec<Violation>,
    pub alerts_sent: usize,
    pub alert_failures: usize,
}

/// Outermost result of one event delivery.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub outcomes: Vec<Result<ScanOutcome, ProcessorError>>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// The event processor. Owns its configuration, scanner, and auditor;
/// borrows the collaborator backends it talks to.
pub struct Monitor<'a> {
    config: MonitorConfig,
    scanner: AnomalyScanner,
    auditor: ThresholdAuditor,
    objects: &'a dyn ObjectStore,
    records: &'a dyn RecordStore,
    notifier: &'a dyn NotificationChannel,
}

impl<'a> Monitor<'a> {
    pub fn new(
        config: MonitorConfig,
        objects: &'a dyn ObjectStore,
        records: &'a dyn RecordStore,
        notifier: &'a dyn NotificationChannel,
    ) -> Self {
        let scanner = AnomalyScanner::new(default_rules(), config.scan_mode);
        let auditor = ThresholdAuditor::new(config.limits);
        Self {
            config,
            scanner,
            auditor,
            objects,
            records,
            notifier,
        }
    }

    /// Replace the stock keyword set.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.scanner = AnomalyScanner::new(rules, self.config.scan_mode);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Fetch one stored log, scan it, alert on findings, archive the
    /// payload. A fetch failure aborts before either leg runs.
    #[tracing::instrument(skip_all, fields(object = %object))]
    pub fn scan_stored_object(&self, object: &ObjectRef) -> Result<ScanOutcome, ProcessorError> {
        let bytes = self.objects.get(&object.container_id, &object.object_key)?;
        let payload = String::from_utf8(bytes).map_err(|_| {
            ProcessorError::InputMalformed(format!("object {object} is not valid UTF-8 text"))
        })?;

        let result = self.scanner.scan(&payload);
        let finding = self.scanner.summarize(&object.object_key, &result);

        let alert = match &finding {
            None => AlertStatus::NotRequired,
            Some(finding) => {
                tracing::info!(total = finding.total_count, "alarm keywords found");
                self.publish_finding(finding)
            }
        };

        // Archival runs for every processed payload, alert leg notwithstanding.
        let (archive_key, archive_error) = match self.archive_payload(payload.as_bytes()) {
            Ok(key) => (Some(key), None),
            Err(err) => {
                tracing::error!(error = %err, "archival failed");
                (None, Some(err))
            }
        };

        Ok(ScanOutcome {
            object: object.clone(),
            finding,
            alert,
            archive_key,
            archive_error,
        })
    }

    fn publish_finding(&self, finding: &Finding) -> AlertStatus {
        let subject = report::alert_subject(finding);
        let body = report::alert_body(finding);
        match self.notifier.publish(&self.config.topic_name, &subject, &body) {
            Ok(()) => AlertStatus::Sent,
            Err(PublishError::TopicUnresolved(name)) => {
                tracing::warn!(topic = %name, "no destination matched topic; continuing without alert");
                AlertStatus::NoDestination
            }
            Err(err @ PublishError::DeliveryRejected(_)) => {
                tracing::error!(error = %err, "alert delivery failed");
                AlertStatus::Failed(err.into())
            }
        }
    }

    fn archive_payload(&self, body: &[u8]) -> Result<String, ProcessorError> {
        let stamp = Utc::now().format("%Y-%m-%d_%H:%M:%S");
        let key = format!("{}/service_logs_{}.txt", self.config.archive_prefix, stamp);
        self.objects
            .put(&self.config.archive_container, &key, body)?;
        Ok(key)
    }

    /// Record a newly stored object's metadata and announce the upload.
    #[tracing::instrument(skip_all, fields(object = %object))]
    pub fn record_object_metadata(
        &self,
        object: &ObjectRef,
    ) -> Result<MetadataOutcome, ProcessorError> {
        let meta = self.objects.head(&object.container_id, &object.object_key)?;

        let mut record = Record::new();
        record.insert(
            "object_key".to_string(),
            FieldValue::Text(object.object_key.clone()),
        );
        record.insert(
            "container".to_string(),
            FieldValue::Text(object.container_id.clone()),
        );
        record.insert(
            "size_bytes".to_string(),
            FieldValue::Integer(meta.size as i64),
        );
        record.insert(
            "content_type".to_string(),
            FieldValue::Text(meta.content_type.clone()),
        );
        record.insert(
            "last_modified".to_string(),
            FieldValue::Text(meta.last_modified.to_rfc3339()),
        );
        record.insert(
            "processed_at".to_string(),
            FieldValue::Text(Utc::now().to_rfc3339()),
        );
        self.records.upsert(&self.config.table_name, &record)?;

        let body = format!("New object stored: {}", object.object_key);
        let notified = match self.notifier.publish(
            &self.config.topic_name,
            "Object upload notification",
            &body,
        ) {
            Ok(()) => true,
            Err(PublishError::TopicUnresolved(name)) => {
                tracing::warn!(topic = %name, "no destination matched topic; continuing without alert");
                false
            }
            Err(err) => return Err(err.into()),
        };

        Ok(MetadataOutcome {
            object: object.clone(),
            notified,
        })
    }

    /// Enumerate resources once and alert on every compliance violation.
    /// Publish failures are counted per violation; they never abort the
    /// remaining resources.
    #[tracing::instrument(skip_all)]
    pub fn audit_resources(
        &self,
        lister: &dyn ResourceLister,
    ) -> Result<AuditOutcome, ProcessorError> {
        let resources = lister.list_resources()?;
        if resources.is_empty() {
            tracing::info!("no resources to audit");
        }

        let mut outcome = AuditOutcome::default();
        for resource in &resources {
            if !self.config.bucket_names.is_empty()
                && !self.config.bucket_names.iter().any(|n| n == &resource.name)
            {
                continue;
            }
            outcome.resources_checked += 1;

            for violation in self.auditor.audit(resource) {
                tracing::warn!(
                    resource = %resource.name,
                    kind = violation.kind(),
                    "compliance violation"
                );
                let subject = format!("Storage compliance alert: {}", resource.name);
                match self
                    .notifier
                    .publish(&self.config.topic_name, &subject, &violation.to_string())
                {
                    Ok(()) => outcome.alerts_sent += 1,
                    Err(PublishError::TopicUnresolved(name)) => {
                        tracing::warn!(topic = %name, "no destination matched topic; continuing without alert");
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "alert delivery failed");
                        outcome.alert_failures += 1;
                    }
                }
                outcome.violations.push(violation);
            }
        }
        Ok(outcome)
    }

    /// Outermost boundary for a storage-event delivery: decode the
    /// envelope, process each object, catch every invocation-level failure
    /// and fold it into the summary. One object's failure never aborts the
    /// rest of the batch.
    #[tracing::instrument(skip_all)]
    pub fn handle_storage_event(&self, raw: &str) -> BatchSummary {
        let mut summary = BatchSummary::default();

        let objects = match parse_object_events(raw) {
            Ok(objects) => objects,
            Err(err) => {
                tracing::error!(error = %err, "event envelope rejected");
                summary.failed = 1;
                summary.outcomes.push(Err(err));
                return summary;
            }
        };

        for object in objects {
            summary.processed += 1;
            match self.scan_stored_object(&object) {
                Ok(outcome) => {
                    if !outcome.is_success() {
                        summary.failed += 1;
                    }
                    summary.outcomes.push(Ok(outcome));
                }
                Err(err) => {
                    tracing::error!(object = %object, error = %err, "invocation failed");
                    summary.failed += 1;
                    summary.outcomes.push(Err(err));
                }
            }
        }
        summary
    }
}
