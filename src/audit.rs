//! Bucket compliance checks: object-count ceiling and versioning policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Snapshot of one storage resource, recomputed on every audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStatus {
    pub name: String,
    pub object_count: u64,
    pub versioning_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLimits {
    pub max_object_count: u64,
}

impl Default for AuditLimits {
    fn default() -> Self {
        Self {
            max_object_count: 5,
        }
    }
}

/// A single compliance failure on one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Violation {
    CountExceeded {
        resource: String,
        count: u64,
        limit: u64,
    },
    VersioningDisabled {
        resource: String,
    },
}

impl Violation {
    pub fn kind(&self) -> &'static str {
        match self {
            Violation::CountExceeded { .. } => "COUNT_EXCEEDED",
            Violation::VersioningDisabled { .. } => "VERSIONING_DISABLED",
        }
    }

    pub fn resource(&self) -> &str {
        match self {
            Violation::CountExceeded { resource, .. } => resource,
            Violation::VersioningDisabled { resource } => resource,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::CountExceeded {
                resource,
                count,
                limit,
            } => write!(
                f,
                "bucket \"{resource}\" holds {count} objects, exceeding the limit of {limit}; \
                 please delete unused objects"
            ),
            Violation::VersioningDisabled { resource } => write!(
                f,
                "versioning is currently disabled on bucket \"{resource}\"; \
                 please re-enable it to keep a change history"
            ),
        }
    }
}

/// Pure threshold checks over a resource snapshot. No I/O, no retained
/// state between runs.
pub struct ThresholdAuditor {
    limits: AuditLimits,
}

impl ThresholdAuditor {
    pub fn new(limits: AuditLimits) -> Self {
        Self { limits }
    }

    /// Violations for one resource, count check before versioning check.
    /// Empty when the resource is compliant.
    pub fn audit(&self, resource: &BucketStatus) -> Vec<Violation> {
        let mut violations = Vec::new();
        if resource.object_count > self.limits.max_object_count {
            violations.push(Violation::CountExceeded {
                resource: resource.name.clone(),
                count: resource.object_count,
                limit: self.limits.max_object_count,
            });
        }
        if !resource.versioning_enabled {
            violations.push(Violation::VersioningDisabled {
                resource: resource.name.clone(),
            });
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(count: u64, versioning: bool) -> BucketStatus {
        BucketStatus {
            name: "incoming-logs-dev".to_string(),
            object_count: count,
            versioning_enabled: versioning,
        }
    }

    #[test]
    fn compliant_resource_yields_no_violations() {
        let auditor = ThresholdAuditor::new(AuditLimits {
            max_object_count: 5,
        });
        assert!(auditor.audit(&bucket(5, true)).is_empty());
    }

    #[test]
    fn count_at_the_limit_is_still_compliant() {
        let auditor = ThresholdAuditor::new(AuditLimits {
            max_object_count: 10,
        });
        let violations = auditor.audit(&bucket(10, true));
        assert!(violations.is_empty());
    }

    #[test]
    fn both_violations_in_deterministic_order() {
        let auditor = ThresholdAuditor::new(AuditLimits {
            max_object_count: 5,
        });
        let violations = auditor.audit(&bucket(10, false));
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].kind(), "COUNT_EXCEEDED");
        assert_eq!(violations[1].kind(), "VERSIONING_DISABLED");
    }

    #[test]
    fn messages_name_the_resource() {
        let auditor = ThresholdAuditor::new(AuditLimits {
            max_object_count: 1,
        });
        let violations = auditor.audit(&bucket(3, false));
        for v in &violations {
            assert_eq!(v.resource(), "incoming-logs-dev");
            assert!(v.to_string().contains("incoming-logs-dev"));
        }
        assert!(violations[0].to_string().contains("limit of 1"));
    }
}
