use super::{FormPairs, ListRequest, RequestCommon};

/// Application-list payload for one course instance. Fetched alongside
/// the completion list because the completion rows lack the member's
/// study-start date.
#[derive(Clone, Debug)]
pub struct ApplicationListRequest {
    pub common: RequestCommon,
    pub course_active_seq: i64,
}

impl ApplicationListRequest {
    pub fn for_course(course_active_seq: i64) -> Self {
        Self {
            common: RequestCommon::default(),
            course_active_seq,
        }
    }
}

impl ListRequest for ApplicationListRequest {
    fn endpoint(&self) -> &'static str {
        "/course/selectApplicationList.do"
    }

    fn to_form(&self) -> FormPairs {
        let mut form = self.common.to_form();
        form.push((
            "courseActiveSeq".to_string(),
            self.course_active_seq.to_string(),
        ));
        form
    }

    fn common_mut(&mut self) -> &mut RequestCommon {
        &mut self.common
    }
}
