use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{field_i64, field_string};

/// A start/end pair of host-formatted date strings, stored verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: String,
    pub end: String,
}

impl DateSpan {
    fn from_row(row: &Value, start_key: &str, end_key: &str) -> Self {
        Self {
            start: field_string(row, start_key),
            end: field_string(row, end_key),
        }
    }
}

/// One course instance. The completion list and lesson unit are filled
/// during the fetch-and-assemble phase; once a course is cached it is
/// treated as immutable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Active-instance id; the key the detail endpoints take.
    pub active_seq: i64,
    /// Master-group id.
    pub master_seq: i64,
    pub title: String,
    pub status_cd: String,
    pub type_cd: String,
    /// Course year as delivered by the host; kept a string because the
    /// host sends both `2024` and `"2024"`.
    pub year: String,
    pub apply: DateSpan,
    pub study: DateSpan,
    pub open: DateSpan,
    pub eval: DateSpan,
    /// Completion-time unit: organization-element count + exam-element
    /// count.
    pub lesson_unit: i64,
    /// Category path, e.g. `"IT > Security"`.
    pub category_path: String,
    pub completions: Vec<Completion>,
}

impl Course {
    pub fn from_row(row: &Value) -> Self {
        Self {
            active_seq: field_i64(row, "courseActiveSeq"),
            master_seq: field_i64(row, "courseMasterSeq"),
            title: field_string(row, "courseNm"),
            status_cd: field_string(row, "statusCd"),
            type_cd: field_string(row, "typeCd"),
            year: field_string(row, "csYear"),
            apply: DateSpan::from_row(row, "applyStartDt", "applyEndDt"),
            study: DateSpan::from_row(row, "studyStartDt", "studyEndDt"),
            open: DateSpan::from_row(row, "openStartDt", "openEndDt"),
            eval: DateSpan::from_row(row, "evalStartDt", "evalEndDt"),
            lesson_unit: 0,
            category_path: field_string(row, "categoryPathNm"),
            completions: Vec::new(),
        }
    }
}

/// One member's completion state in one course. At most one entry per
/// (course, member) pair is meaningful; duplicates resolve first-found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub user_seq: i64,
    pub apply_status: String,
    /// Study-start date, merged in from the application list; empty when
    /// the member does not appear there.
    pub study_start: String,
    /// `Y`, `N`, or empty when the member never attended.
    pub completion_yn: String,
    pub completion_date: Option<String>,
}

impl Completion {
    pub fn from_row(row: &Value) -> Self {
        let completion_date = field_string(row, "completionDt");
        Self {
            user_seq: field_i64(row, "userSeq"),
            apply_status: field_string(row, "applyStatusCd"),
            study_start: String::new(),
            completion_yn: field_string(row, "completionYn"),
            completion_date: if completion_date.is_empty() {
                None
            } else {
                Some(completion_date)
            },
        }
    }
}

/// One row of the application list; only consulted for the study-start
/// date missing from completion rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Application {
    pub user_seq: i64,
    pub study_start: String,
}

impl Application {
    pub fn from_row(row: &Value) -> Self {
        Self {
            user_seq: field_i64(row, "userSeq"),
            study_start: field_string(row, "studyStartDt"),
        }
    }
}
