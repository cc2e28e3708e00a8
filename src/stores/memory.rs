//! In-memory collaborator implementations with failure injection.
//!
//! These back the unit and integration tests; nothing in the pipeline
//! depends on them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::audit::BucketStatus;
use crate::error::{PublishError, StoreError};
use crate::stores::traits::{
    NotificationChannel, ObjectMeta, ObjectStore, Record, RecordStore, ResourceLister,
};

struct StoredObject {
    body: Vec<u8>,
    content_type: String,
    last_modified: DateTime<Utc>,
}

/// Object store backed by a map of (container, key) pairs.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    reject_puts: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, container_id: &str, object_key: &str, body: &[u8]) {
        self.insert_with_content_type(container_id, object_key, body, "text/plain");
    }

    pub fn insert_with_content_type(
        &self,
        container_id: &str,
        object_key: &str,
        body: &[u8],
        content_type: &str,
    ) {
        self.objects.lock().unwrap().insert(
            (container_id.to_string(), object_key.to_string()),
            StoredObject {
                body: body.to_vec(),
                content_type: content_type.to_string(),
                last_modified: Utc::now(),
            },
        );
    }

    /// Make every subsequent put fail with a write rejection.
    pub fn reject_writes(&self) {
        self.reject_puts.store(true, Ordering::SeqCst);
    }

    pub fn object(&self, container_id: &str, object_key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(container_id.to_string(), object_key.to_string()))
            .map(|o| o.body.clone())
    }

    pub fn keys_in(&self, container_id: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(container, _)| container == container_id)
            .map(|(_, key)| key.clone())
            .collect()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn get(&self, container_id: &str, object_key: &str) -> Result<Vec<u8>, StoreError> {
        self.object(container_id, object_key)
            .ok_or_else(|| StoreError::NotFound {
                container: container_id.to_string(),
                key: object_key.to_string(),
            })
    }

    fn put(&self, container_id: &str, object_key: &str, body: &[u8]) -> Result<(), StoreError> {
        if self.reject_puts.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected(format!(
                "put {container_id}/{object_key} rejected"
            )));
        }
        self.insert(container_id, object_key, body);
        Ok(())
    }

    fn head(&self, container_id: &str, object_key: &str) -> Result<ObjectMeta, StoreError> {
        let objects = self.objects.lock().unwrap();
        let stored = objects
            .get(&(container_id.to_string(), object_key.to_string()))
            .ok_or_else(|| StoreError::NotFound {
                container: container_id.to_string(),
                key: object_key.to_string(),
            })?;
        Ok(ObjectMeta {
            size: stored.body.len() as u64,
            content_type: stored.content_type.clone(),
            last_modified: stored.last_modified,
        })
    }
}

/// Record store keeping upserted rows per table.
#[derive(Default)]
pub struct MemoryRecordStore {
    rows: Mutex<HashMap<String, Vec<Record>>>,
    reject: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_writes(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.rows
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn upsert(&self, table: &str, record: &Record) -> Result<(), StoreError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected(format!(
                "upsert into {table} rejected"
            )));
        }
        self.rows
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub subject: String,
    pub body: String,
}

/// Notification channel resolving topics against a fixed name list.
#[derive(Default)]
pub struct MemoryNotifier {
    topics: Vec<String>,
    published: Mutex<Vec<PublishedMessage>>,
    reject: AtomicBool,
}

impl MemoryNotifier {
    pub fn with_topics(names: &[&str]) -> Self {
        Self {
            topics: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    /// A channel where no topic name resolves.
    pub fn without_topics() -> Self {
        Self::default()
    }

    pub fn reject_deliveries(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }
}

impl NotificationChannel for MemoryNotifier {
    fn publish(&self, topic_name: &str, subject: &str, body: &str) -> Result<(), PublishError> {
        if !self.topics.iter().any(|t| t == topic_name) {
            return Err(PublishError::TopicUnresolved(topic_name.to_string()));
        }
        if self.reject.load(Ordering::SeqCst) {
            return Err(PublishError::DeliveryRejected(format!(
                "delivery to {topic_name} refused"
            )));
        }
        self.published.lock().unwrap().push(PublishedMessage {
            topic: topic_name.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Lister returning a fixed resource snapshot.
pub struct StaticLister {
    resources: Vec<BucketStatus>,
}

impl StaticLister {
    pub fn new(resources: Vec<BucketStatus>) -> Self {
        Self { resources }
    }
}

impl ResourceLister for StaticLister {
    fn list_resources(&self) -> Result<Vec<BucketStatus>, StoreError> {
        Ok(self.resources.clone())
    }
}
