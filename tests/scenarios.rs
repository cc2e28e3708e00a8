//! End-to-end scenarios over the in-memory backends.

use anyhow::Result;

use clawpipe::stores::memory::{MemoryNotifier, MemoryObjectStore, MemoryRecordStore, StaticLister};
use clawpipe::{
    BucketStatus, KeywordCategory, MonitorConfig, Monitor, ObjectRef, Rule, ScanMode,
};

#[test]
fn queue_wrapped_delivery_alerts_and_archives() -> Result<()> {
    let objects = MemoryObjectStore::new();
    objects.insert(
        "incoming-logs-dev",
        "service.log",
        b"ERROR occurred, then Timeout, then ERROR again",
    );
    let records = MemoryRecordStore::new();
    let channel = MemoryNotifier::with_topics(&["storage-alerts"]);
    let monitor = Monitor::new(MonitorConfig::default(), &objects, &records, &channel);

    let inner = serde_json::json!({
        "Records": [
            {"s3": {"bucket": {"name": "incoming-logs-dev"}, "object": {"key": "service.log"}}}
        ]
    })
    .to_string();
    let raw = serde_json::json!({ "Records": [{ "body": inner }] }).to_string();

    let summary = monitor.handle_storage_event(&raw);
    assert!(summary.all_succeeded());
    assert_eq!(summary.processed, 1);

    let published = channel.published();
    assert_eq!(published.len(), 1);
    assert!(published[0].body.contains("66.7%"));
    assert!(published[0].body.contains("33.3%"));
    assert!(published[0].body.contains("TOTAL"));

    let archived = objects.keys_in("backup-for-logs-dev");
    assert_eq!(archived.len(), 1);
    assert!(archived[0].starts_with("logs/service_logs_"));
    Ok(())
}

#[test]
fn custom_rules_and_presence_mode_compose() -> Result<()> {
    let objects = MemoryObjectStore::new();
    objects.insert("incoming-logs-dev", "api.log", b"403 403 403 and one 500");
    let records = MemoryRecordStore::new();
    let channel = MemoryNotifier::with_topics(&["storage-alerts"]);

    let config = MonitorConfig {
        scan_mode: ScanMode::Presence,
        ..MonitorConfig::default()
    };
    let monitor = Monitor::new(config, &objects, &records, &channel).with_rules(vec![
        Rule::new("403", KeywordCategory::ClientError),
        Rule::new("500", KeywordCategory::ServerError),
    ]);

    let outcome = monitor.scan_stored_object(&ObjectRef {
        container_id: "incoming-logs-dev".to_string(),
        object_key: "api.log".to_string(),
    })?;

    let finding = outcome.finding.expect("both keywords are present");
    assert_eq!(finding.total_count, 2);
    assert_eq!(finding.breakdown.count(KeywordCategory::ClientError), 1);
    assert_eq!(finding.breakdown.count(KeywordCategory::ServerError), 1);
    Ok(())
}

#[test]
fn scheduled_audit_run_end_to_end() -> Result<()> {
    let objects = MemoryObjectStore::new();
    let records = MemoryRecordStore::new();
    let channel = MemoryNotifier::with_topics(&["storage-alerts"]);
    let monitor = Monitor::new(MonitorConfig::default(), &objects, &records, &channel);

    let lister = StaticLister::new(vec![
        BucketStatus {
            name: "compliant".to_string(),
            object_count: 1,
            versioning_enabled: true,
        },
        BucketStatus {
            name: "no-versioning".to_string(),
            object_count: 1,
            versioning_enabled: false,
        },
        BucketStatus {
            name: "overfull".to_string(),
            object_count: 12,
            versioning_enabled: true,
        },
    ]);

    let outcome = monitor.audit_resources(&lister)?;
    assert_eq!(outcome.resources_checked, 3);
    assert_eq!(outcome.violations.len(), 2);
    assert_eq!(outcome.alerts_sent, 2);

    let bodies: Vec<String> = channel.published().into_iter().map(|m| m.body).collect();
    assert!(bodies.iter().any(|b| b.contains("no-versioning")));
    assert!(bodies.iter().any(|b| b.contains("overfull")));
    Ok(())
}

#[test]
fn upload_notification_records_metadata() -> Result<()> {
    let objects = MemoryObjectStore::new();
    objects.insert_with_content_type("image-uploads", "pixel.png", &[0u8; 2048], "image/png");
    let records = MemoryRecordStore::new();
    let channel = MemoryNotifier::with_topics(&["storage-alerts"]);
    let monitor = Monitor::new(MonitorConfig::default(), &objects, &records, &channel);

    let outcome = monitor.record_object_metadata(&ObjectRef {
        container_id: "image-uploads".to_string(),
        object_key: "pixel.png".to_string(),
    })?;

    assert!(outcome.notified);
    assert_eq!(records.rows("object-metadata-table").len(), 1);
    assert_eq!(channel.published().len(), 1);
    Ok(())
}
