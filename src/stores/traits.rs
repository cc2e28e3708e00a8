//! Collaborator contracts for the storage, record, and notification
//! backends. The pipeline only ever talks to these narrow interfaces;
//! transports and credentials live on the implementation side.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::audit::BucketStatus;
use crate::error::{PublishError, StoreError};

/// Metadata returned by a head call, without the object body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub size: u64,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

/// Scalar value in a flat record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

/// Flat field-name-to-scalar mapping handed to the record store.
pub type Record = BTreeMap<String, FieldValue>;

pub trait ObjectStore: Send + Sync {
    fn get(&self, container_id: &str, object_key: &str) -> Result<Vec<u8>, StoreError>;

    fn put(&self, container_id: &str, object_key: &str, body: &[u8]) -> Result<(), StoreError>;

    fn head(&self, container_id: &str, object_key: &str) -> Result<ObjectMeta, StoreError>;
}

pub trait RecordStore: Send + Sync {
    fn upsert(&self, table: &str, record: &Record) -> Result<(), StoreError>;
}

pub trait NotificationChannel: Send + Sync {
    /// Publish to the destination matching `topic_name`. Resolution happens
    /// by name lookup inside the implementation; an unmatched name fails
    /// with [`PublishError::TopicUnresolved`].
    fn publish(&self, topic_name: &str, subject: &str, body: &str) -> Result<(), PublishError>;
}

pub trait ResourceLister: Send + Sync {
    /// Enumerate audit targets, once per run.
    fn list_resources(&self) -> Result<Vec<BucketStatus>, StoreError>;
}
