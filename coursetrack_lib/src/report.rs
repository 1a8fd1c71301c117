//! Report rows and the export seam.
//!
//! Flattens stat records into tabular rows and hands them to an injected
//! [`ExportSink`]. Byte-level concerns (CSV quoting, the UTF-8 BOM,
//! spreadsheet formats) live behind the sink.

use crate::stats::{CourseSummary, ReportQuery, StatRecord};

/// Category-path prefix of customized (in-house) courses. These sort
/// ahead of catalog courses in the exported report.
const CUSTOMIZED_PREFIX: &str = "Customized";

/// Destination for a finished report. Implementations are supplied by
/// the embedding layer (file download, spreadsheet writer, ...).
pub trait ExportSink {
    fn export(&self, filename: &str, rows: &[Vec<String>]) -> Result<(), String>;
}

pub const REPORT_HEADER: [&str; 14] = [
    "Name",
    "Login",
    "Birthday",
    "Email",
    "Company",
    "Department",
    "Division",
    "Certification",
    "Course",
    "Year",
    "Completed",
    "Completion Date",
    "Units",
    "Category",
];

fn is_customized(summary: &CourseSummary) -> bool {
    summary.category_path.trim_start().starts_with(CUSTOMIZED_PREFIX)
}

/// Presentation order within one member's record: customized-category
/// courses first, then alphabetical by trimmed title.
fn sorted_summaries(record: &StatRecord) -> Vec<&CourseSummary> {
    let mut summaries: Vec<&CourseSummary> = record.courses.iter().collect();
    summaries.sort_by(|a, b| {
        is_customized(b)
            .cmp(&is_customized(a))
            .then_with(|| a.title.trim().cmp(b.title.trim()))
    });
    summaries
}

/// Flattens records into a header row plus one row per (member, course)
/// pair.
pub fn report_rows(records: &[StatRecord]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(REPORT_HEADER.iter().map(|h| h.to_string()).collect());
    for record in records {
        for summary in sorted_summaries(record) {
            rows.push(vec![
                record.user_name.clone(),
                record.user_id.clone(),
                record.birthday.clone(),
                record.email.clone(),
                record.company.clone(),
                record.department.clone(),
                record.division.clone(),
                record.certi_type.clone(),
                summary.title.clone(),
                summary.year.clone(),
                summary.completion_yn.clone(),
                summary.completion_date.clone(),
                summary.lesson_unit.to_string(),
                summary.category_path.clone(),
            ]);
        }
    }
    rows
}

/// Report filename derived from the query: fixed stem, keyword slug,
/// date range.
pub fn report_filename(query: &ReportQuery) -> String {
    let mut name = String::from("completion-report");
    if let Some(keyword) = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        name.push('_');
        name.push_str(&slug(keyword));
    }
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        name.push_str(&format!("_{}_{}", start, end));
    }
    name.push_str(".csv");
    name
}

fn slug(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}
