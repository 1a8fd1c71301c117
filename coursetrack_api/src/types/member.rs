use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{field_i64, field_string};

/// One approved member of the console. Immutable once fetched; uniquely
/// identified by `user_seq`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub user_seq: i64,
    pub user_id: String,
    pub user_name: String,
    pub birthday: String,
    pub email: String,
    pub company: String,
    pub department: String,
    pub division: String,
    pub certi_type: String,
}

impl Member {
    /// Projects a raw member-list row into the fields the reports use.
    pub fn from_row(row: &Value) -> Self {
        Self {
            user_seq: field_i64(row, "userSeq"),
            user_id: field_string(row, "userId"),
            user_name: field_string(row, "userNm"),
            birthday: field_string(row, "birthday"),
            email: field_string(row, "email"),
            company: field_string(row, "compNm"),
            department: field_string(row, "deptNm"),
            division: field_string(row, "divNm"),
            certi_type: field_string(row, "certiType"),
        }
    }
}
