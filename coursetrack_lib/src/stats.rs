//! Join & filter engine producing per-member statistics records.
//!
//! Joins the member and course snapshots on completion rows, applying
//! the keyword and date-range filters. Snapshots are borrowed read-only;
//! records are built fresh per query and never persisted.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use coursetrack_api::types::{Completion, Course, Member};

/// Filters of one search/report run. All optional; an empty query
/// targets every member with at least one completion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportQuery {
    pub keyword: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// One course line of a member's report row.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseSummary {
    pub title: String,
    pub year: String,
    pub completion_yn: String,
    pub completion_date: String,
    pub lesson_unit: i64,
    pub category_path: String,
}

/// Per-member join output: identity fields plus the surviving course
/// summaries, in snapshot course order.
#[derive(Clone, Debug, PartialEq)]
pub struct StatRecord {
    pub user_seq: i64,
    pub user_id: String,
    pub user_name: String,
    pub birthday: String,
    pub email: String,
    pub company: String,
    pub department: String,
    pub division: String,
    pub certi_type: String,
    pub courses: Vec<CourseSummary>,
}

impl StatRecord {
    fn new(member: &Member) -> Self {
        Self {
            user_seq: member.user_seq,
            user_id: member.user_id.clone(),
            user_name: member.user_name.clone(),
            birthday: member.birthday.clone(),
            email: member.email.clone(),
            company: member.company.clone(),
            department: member.department.clone(),
            division: member.division.clone(),
            certi_type: member.certi_type.clone(),
            courses: Vec::new(),
        }
    }
}

/// Normalized completion-date window. Boundaries are date-only: the
/// start is UTC midnight of the first day, and the end bound is UTC
/// midnight of the day *after* the last day, so the whole last day is in
/// range. A timestamp survives iff `start <= t < end_bound`.
struct DateWindow {
    start: DateTime<Utc>,
    end_bound: DateTime<Utc>,
}

impl DateWindow {
    fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_time(NaiveTime::MIN).and_utc(),
            end_bound: (end + Duration::days(1)).and_time(NaiveTime::MIN).and_utc(),
        }
    }

    fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end_bound
    }
}

/// Parses a host completion timestamp, tolerating the date and datetime
/// shapes the console has been seen to emit.
fn parse_completion_ts(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    const DATETIME_FORMATS: [&str; 3] =
        ["%Y-%m-%d %H:%M:%S", "%Y.%m.%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d.and_time(NaiveTime::MIN).and_utc());
        }
    }
    None
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// First completion row for the member, if any. First-found wins on
/// duplicate (course, member) pairs.
fn completion_for(course: &Course, user_seq: i64) -> Option<&Completion> {
    course.completions.iter().find(|c| c.user_seq == user_seq)
}

/// Keyword target set: members whose company or department matches,
/// united with members completing any title-matching course.
fn target_member_seqs(members: &[Member], courses: &[Course], keyword: &str) -> HashSet<i64> {
    let needle = keyword.to_lowercase();
    let mut targets: HashSet<i64> = members
        .iter()
        .filter(|m| contains_ci(&m.company, &needle) || contains_ci(&m.department, &needle))
        .map(|m| m.user_seq)
        .collect();
    for course in courses {
        if contains_ci(&course.title, &needle) {
            targets.extend(course.completions.iter().map(|c| c.user_seq));
        }
    }
    targets
}

/// Joins the snapshots into per-member records under the query's
/// filters. Members with zero surviving course entries are dropped.
pub fn join(members: &[Member], courses: &[Course], query: &ReportQuery) -> Vec<StatRecord> {
    let keyword = query
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());
    let targets = keyword.map(|k| target_member_seqs(members, courses, k));
    let window = match (query.start_date, query.end_date) {
        (Some(start), Some(end)) => Some(DateWindow::new(start, end)),
        _ => None,
    };

    let mut records = Vec::new();
    for member in members {
        if let Some(targets) = &targets {
            if !targets.contains(&member.user_seq) {
                continue;
            }
        }
        let mut record = StatRecord::new(member);
        for course in courses {
            let Some(completion) = completion_for(course, member.user_seq) else {
                continue;
            };
            if let Some(window) = &window {
                let Some(t) = completion
                    .completion_date
                    .as_deref()
                    .and_then(parse_completion_ts)
                else {
                    continue;
                };
                if !window.contains(t) {
                    continue;
                }
            }
            record.courses.push(CourseSummary {
                title: course.title.clone(),
                year: course.year.clone(),
                completion_yn: completion.completion_yn.clone(),
                completion_date: completion.completion_date.clone().unwrap_or_default(),
                lesson_unit: course.lesson_unit,
                category_path: course.category_path.clone(),
            });
        }
        if !record.courses.is_empty() {
            records.push(record);
        }
    }
    records
}
