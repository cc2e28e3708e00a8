// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025-2026 JR Morton

//! Anomaly scanner — inspects an uploaded log payload against a configured
//! keyword rule set and produces at most one finding per invocation.
//!
//! Matching is literal, case-sensitive substring search; every occurrence
//! start counts, so overlapping matches are counted independently. Rules
//! that share a category accumulate into one count. Scanning is pure:
//! identical payload and rule set always yield an identical result.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rules::{KeywordCategory, Rule};

/// Detection semantics for a scan pass.
///
/// `Occurrences` counts every hit of every keyword. `Presence` caps each
/// rule's contribution at one, for parity with monitors that only care
/// whether a keyword showed up at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanMode {
    #[default]
    Occurrences,
    Presence,
}

/// Per-category occurrence counts for one scan pass. Built fresh per
/// invocation; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    counts: BTreeMap<KeywordCategory, u32>,
}

impl ScanResult {
    /// Zero-filled result covering every category.
    pub fn empty() -> Self {
        let counts = KeywordCategory::ALL.iter().map(|c| (*c, 0)).collect();
        Self { counts }
    }

    fn add(&mut self, category: KeywordCategory, n: u32) {
        *self.counts.entry(category).or_insert(0) += n;
    }

    pub fn count(&self, category: KeywordCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Categories with at least one hit, in stable category order.
    pub fn nonzero(&self) -> impl Iterator<Item = (KeywordCategory, u32)> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(category, count)| (*category, *count))
    }
}

/// The output of a scan that matched at least one rule.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub source_identifier: String,
    pub total_count: u32,
    pub breakdown: ScanResult,
    pub generated_at: DateTime<Utc>,
}

impl Finding {
    /// Share of the total for one category, rounded to one decimal place.
    pub fn percentage(&self, category: KeywordCategory) -> f64 {
        let count = self.breakdown.count(category);
        (count as f64 / self.total_count as f64 * 1000.0).round() / 10.0
    }

    /// Stable key for downstream alert deduplication: the source plus the
    /// set of categories that fired.
    pub fn dedup_key(&self) -> String {
        let mut key = self.source_identifier.clone();
        for (category, _) in self.breakdown.nonzero() {
            key.push('|');
            key.push_str(category.label());
        }
        key
    }
}

/// Scans payloads against an ordered rule sequence fixed at construction.
pub struct AnomalyScanner {
    rules: Vec<Rule>,
    mode: ScanMode,
}

impl AnomalyScanner {
    pub fn new(rules: Vec<Rule>, mode: ScanMode) -> Self {
        Self { rules, mode }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Count rule hits in `payload`. Side-effect-free.
    pub fn scan(&self, payload: &str) -> ScanResult {
        let mut result = ScanResult::empty();
        for rule in &self.rules {
            let mut hits = count_occurrences(payload, &rule.keyword);
            if self.mode == ScanMode::Presence {
                hits = hits.min(1);
            }
            result.add(rule.category, hits);
        }
        result
    }

    /// Turn a scan result into a finding, or `None` when every count is
    /// zero.
    pub fn summarize(&self, source_identifier: &str, result: &ScanResult) -> Option<Finding> {
        let total = result.total();
        if total == 0 {
            return None;
        }
        Some(Finding {
            source_identifier: source_identifier.to_string(),
            total_count: total,
            breakdown: result.clone(),
            generated_at: Utc::now(),
        })
    }
}

/// Occurrence starts of `needle` in `haystack`, overlapping included.
fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() || needle.len() > haystack.len() {
        return 0;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .filter(|window| *window == needle.as_bytes())
        .count() as u32
}
