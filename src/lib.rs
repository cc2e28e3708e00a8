// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025-2026 JR Morton

//! clawpipe — storage-event monitor.
//!
//! Reacts to storage-upload notifications and scheduled checks: scans
//! uploaded text logs for alarm keywords and forwards a summary alert while
//! archiving the log, records object metadata into a table and announces
//! the upload, and audits buckets for object-count and versioning-policy
//! violations.
//!
//! All backends sit behind the narrow traits in [`stores::traits`]; the
//! pipeline itself is a single sequential pass per event with no retained
//! state between invocations, so any number of invocations may run
//! concurrently without coordination.

pub mod audit;
pub mod config;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod stores;

pub use audit::{AuditLimits, BucketStatus, ThresholdAuditor, Violation};
pub use config::MonitorConfig;
pub use error::{ProcessorError, PublishError, StoreError};
pub use events::{parse_object_events, ObjectRef};
pub use pipeline::{
    AlertStatus, AuditOutcome, BatchSummary, MetadataOutcome, Monitor, ScanOutcome,
};
pub use rules::{default_rules, KeywordCategory, Rule};
pub use scanner::{AnomalyScanner, Finding, ScanMode, ScanResult};
