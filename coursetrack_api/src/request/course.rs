use super::{FormPairs, ListRequest, RequestCommon};

/// Course-list payload. Year filtering is a client-side concern (the
/// host's year field is unreliable as a server filter), so this carries
/// no entity-specific fields.
#[derive(Clone, Debug, Default)]
pub struct CourseListRequest {
    pub common: RequestCommon,
}

impl ListRequest for CourseListRequest {
    fn endpoint(&self) -> &'static str {
        "/course/selectCourseList.do"
    }

    fn to_form(&self) -> FormPairs {
        self.common.to_form()
    }

    fn common_mut(&mut self) -> &mut RequestCommon {
        &mut self.common
    }
}
