use super::{FormPairs, ListRequest, RequestCommon};

/// Completion-list payload for one course instance.
#[derive(Clone, Debug)]
pub struct CompletionListRequest {
    pub common: RequestCommon,
    pub course_active_seq: i64,
}

impl CompletionListRequest {
    pub fn for_course(course_active_seq: i64) -> Self {
        Self {
            common: RequestCommon::default(),
            course_active_seq,
        }
    }
}

impl ListRequest for CompletionListRequest {
    fn endpoint(&self) -> &'static str {
        "/course/selectCompletionList.do"
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
