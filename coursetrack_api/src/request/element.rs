use super::{FormPairs, ListRequest, RequestCommon};

/// The two element kinds counted into a course's completion-time unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Class/organization units.
    Organization,
    /// Exam units.
    Exam,
}

impl ElementKind {
    pub fn code(self) -> &'static str {
        match self {
            ElementKind::Organization => "ORGANIZATION",
            ElementKind::Exam => "EXAM",
        }
    }
}

/// Element-list payload for one course instance, filtered to one kind.
/// Only ever sent as a count probe; the rows themselves are not used.
#[derive(Clone, Debug)]
pub struct ElementCountRequest {
    pub common: RequestCommon,
    pub course_active_seq: i64,
    pub kind: ElementKind,
}

impl ElementCountRequest {
    pub fn for_course(course_active_seq: i64, kind: ElementKind) -> Self {
        Self {
            common: RequestCommon::default(),
            course_active_seq,
            kind,
        }
    }
}

impl ListRequest for ElementCountRequest {
    fn endpoint(&self) -> &'static str {
        "/course/selectCourseElementList.do"
    }

    fn to_form(&self) -> FormPairs {
        let mut form = self.common.to_form();
        form.push((
            "courseActiveSeq".to_string(),
            self.course_active_seq.to_string(),
        ));
        form.push(("elementType".to_string(), self.kind.code().to_string()));
        form
    }

    fn common_mut(&mut self) -> &mut RequestCommon {
        &mut self.common
    }
}
