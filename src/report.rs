//! Tabular rendering of findings for alert bodies.
//!
//! Pure formatting, no side effects.

use crate::scanner::Finding;

const TABLE_WIDTH: usize = 60;

/// Fixed-width breakdown table: header, one row per category with hits,
/// footer with the total at 100.0%.
pub fn format_report(finding: &Finding) -> String {
    let mut table = String::new();
    table.push_str(&"=".repeat(TABLE_WIDTH));
    table.push('\n');
    table.push_str(&format!(
        "{:<15} | {:<10} | {:<10}\n",
        "KEYWORD", "COUNT", "PERCENTAGE"
    ));
    table.push_str(&"-".repeat(TABLE_WIDTH));
    table.push('\n');

    for (category, count) in finding.breakdown.nonzero() {
        table.push_str(&format!(
            "{:<15} | {:<10} | {:.1}%\n",
            category.label(),
            count,
            finding.percentage(category)
        ));
    }

    table.push_str(&"=".repeat(TABLE_WIDTH));
    table.push('\n');
    table.push_str(&format!(
        "{:<15} | {:<10} | 100.0%\n",
        "TOTAL", finding.total_count
    ));
    table.push_str(&"=".repeat(TABLE_WIDTH));
    table
}

pub fn alert_subject(finding: &Finding) -> String {
    format!(
        "Log alert: {} keyword hits in {}",
        finding.total_count, finding.source_identifier
    )
}

/// Full operator-facing alert body around the breakdown table.
pub fn alert_body(finding: &Finding) -> String {
    format!(
        "LOG ALERT NOTIFICATION\n\n\
         File: {}\n\
         Timestamp: {}\n\
         Total error count: {}\n\n\
         ERROR BREAKDOWN:\n{}\n\n\
         Please investigate and resolve these issues.\n",
        finding.source_identifier,
        finding.generated_at.format("%Y-%m-%d %H:%M:%S"),
        finding.total_count,
        format_report(finding)
    )
}
