//! Request builders for the console's list endpoints.
//!
//! Every endpoint takes the same flat form payload: page index, page
//! size, sort code, and the two menu-context ids, plus entity-specific
//! filter fields. Builders compose [`RequestCommon`] with those extras
//! and serialize to flat form pairs. Plain structs with `with_*`
//! methods; no inheritance, just field composition.

mod application;
mod completion;
mod course;
mod element;
mod member;

pub use self::application::ApplicationListRequest;
pub use self::completion::CompletionListRequest;
pub use self::course::CourseListRequest;
pub use self::element::{ElementCountRequest, ElementKind};
pub use self::member::MemberListRequest;

/// Flat pairs sent as an `application/x-www-form-urlencoded` body.
pub type FormPairs = Vec<(String, String)>;

/// A buildable payload for one of the console's list endpoints.
pub trait ListRequest {
    /// Endpoint path relative to the console base URL.
    fn endpoint(&self) -> &'static str;

    /// Serializes the full payload to form pairs.
    fn to_form(&self) -> FormPairs;

    /// Mutable access to the shared paging/context fields.
    fn common_mut(&mut self) -> &mut RequestCommon;

    fn with_page(mut self, page: i64) -> Self
    where
        Self: Sized,
    {
        self.common_mut().page = page;
        self
    }

    fn with_page_size(mut self, page_size: i64) -> Self
    where
        Self: Sized,
    {
        self.common_mut().page_size = page_size;
        self
    }
}

/// Fields shared by every list endpoint.
#[derive(Clone, Debug)]
pub struct RequestCommon {
    /// Page number (1-indexed).
    pub page: i64,
    /// Results per page. The host returns everything up to this size;
    /// there is no server-side cursor.
    pub page_size: i64,
    /// Host-side sort code.
    pub sort_code: String,
    /// Menu id of the console screen issuing the call.
    pub menu_seq: String,
    /// Top-level menu context id.
    pub top_menu_seq: String,
}

impl Default for RequestCommon {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            sort_code: "REG_DT".to_string(),
            menu_seq: String::new(),
            top_menu_seq: String::new(),
        }
    }
}

impl RequestCommon {
    /// Appends the shared paging and context pairs.
    pub fn to_form(&self) -> FormPairs {
        vec![
            ("pageIndex".to_string(), self.page.to_string()),
            ("countPerPage".to_string(), self.page_size.to_string()),
            ("sortCd".to_string(), self.sort_code.clone()),
            ("menuSeq".to_string(), self.menu_seq.clone()),
            ("topMenuSeq".to_string(), self.top_menu_seq.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair<'a>(form: &'a FormPairs, key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn common_pairs_present_on_every_builder() {
        let member = MemberListRequest::default().with_page(3).with_page_size(50);
        let form = member.to_form();
        assert_eq!(pair(&form, "pageIndex"), Some("3"));
        assert_eq!(pair(&form, "countPerPage"), Some("50"));
        assert_eq!(pair(&form, "sortCd"), Some("REG_DT"));
    }

    #[test]
    fn member_request_carries_approval_filter() {
        let form = MemberListRequest::default().to_form();
        assert_eq!(pair(&form, "searchUserStatus"), Some("APPROVAL"));
    }

    #[test]
    fn completion_request_carries_course_id() {
        let form = CompletionListRequest::for_course(77).to_form();
        assert_eq!(pair(&form, "courseActiveSeq"), Some("77"));
    }

    #[test]
    fn element_request_carries_kind_code() {
        let organization =
            ElementCountRequest::for_course(5, ElementKind::Organization).to_form();
        assert_eq!(pair(&organization, "elementType"), Some("ORGANIZATION"));
        let exam = ElementCountRequest::for_course(5, ElementKind::Exam).to_form();
        assert_eq!(pair(&exam, "elementType"), Some("EXAM"));
    }
}
