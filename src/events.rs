//! Storage-notification envelope decoding.
//!
//! Two envelope shapes arrive in practice: direct storage notifications
//! (`Records[].s3.bucket.name` / `.object.key`) and queue-wrapped batches
//! where each outer record's `body` string is itself a JSON storage
//! notification. Both decode to the same flat list of object references;
//! the transport envelope is otherwise ignored.

use std::fmt;

use serde_json::Value;

use crate::error::ProcessorError;

/// One newly stored object named by the event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub container_id: String,
    pub object_key: String,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container_id, self.object_key)
    }
}

/// Decode an event envelope into object references.
pub fn parse_object_events(raw: &str) -> Result<Vec<ObjectRef>, ProcessorError> {
    let envelope: Value = serde_json::from_str(raw)
        .map_err(|e| ProcessorError::InputMalformed(format!("invalid JSON envelope: {e}")))?;

    let records = envelope
        .get("Records")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ProcessorError::InputMalformed("missing top-level Records array".to_string())
        })?;

    let mut refs = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        if let Some(body) = record.get("body").and_then(Value::as_str) {
            // Queue-wrapped: the body string carries the storage notification.
            let inner: Value = serde_json::from_str(body).map_err(|e| {
                ProcessorError::InputMalformed(format!("record {idx}: invalid body JSON: {e}"))
            })?;
            let inner_records = inner
                .get("Records")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    ProcessorError::InputMalformed(format!(
                        "record {idx}: body has no Records array"
                    ))
                })?;
            for inner_record in inner_records {
                refs.push(object_ref(inner_record, idx)?);
            }
        } else {
            refs.push(object_ref(record, idx)?);
        }
    }
    Ok(refs)
}

fn object_ref(record: &Value, idx: usize) -> Result<ObjectRef, ProcessorError> {
    let container_id = record
        .pointer("/s3/bucket/name")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ProcessorError::InputMalformed(format!("record {idx}: missing s3.bucket.name"))
        })?;
    let object_key = record
        .pointer("/s3/object/key")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ProcessorError::InputMalformed(format!("record {idx}: missing s3.object.key"))
        })?;
    Ok(ObjectRef {
        container_id: container_id.to_string(),
        object_key: object_key.to_string(),
    })
}
