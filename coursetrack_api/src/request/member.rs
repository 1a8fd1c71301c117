use super::{FormPairs, ListRequest, RequestCommon};

/// Member-list payload. The console only ever lists approved members
/// for reporting, so the status filter is fixed.
#[derive(Clone, Debug)]
pub struct MemberListRequest {
    pub common: RequestCommon,
    pub status: String,
}

impl Default for MemberListRequest {
    fn default() -> Self {
        Self {
            common: RequestCommon::default(),
            status: "APPROVAL".to_string(),
        }
    }
}

impl ListRequest for MemberListRequest {
    fn endpoint(&self) -> &'static str {
        "/user/selectUserList.do"
    }

    fn to_form(&self) -> FormPairs {
        let mut form = self.common.to_form();
        form.push(("searchUserStatus".to_string(), self.status.clone()));
        form
    }

    fn common_mut(&mut self) -> &mut RequestCommon {
        &mut self.common
    }
}
