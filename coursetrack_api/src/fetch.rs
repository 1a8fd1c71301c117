//! Count-probe + bulk-fetch adapters over the resilient client.
//!
//! The console's list endpoints have no server-side cursor: a probe with
//! page size 1 yields the total count (`cnt`), and a second call with
//! page size = count returns the full `list`. All adapters follow that
//! two-step protocol.

use std::collections::HashMap;

use serde_json::Value;

use crate::client::{CancelToken, Client, RetryPolicy};
use crate::request::{
    ApplicationListRequest, CompletionListRequest, CourseListRequest, ElementCountRequest,
    ElementKind, ListRequest, MemberListRequest,
};
use crate::types::{coerce_i64, Application, Completion, Course, Member};
use crate::Error;

/// Issues a page-size-1 probe and reads the total count, coercing a
/// numeric string. A non-coercible count is a contract violation.
pub async fn probe_count<R>(client: &Client, request: &R, cancel: &CancelToken) -> Result<i64, Error>
where
    R: ListRequest + Clone,
{
    let probe = request.clone().with_page(1).with_page_size(1);
    let value = client
        .send(probe.endpoint(), &probe.to_form(), &RetryPolicy::probe(), cancel)
        .await?;
    count_field(&value)
}

fn count_field(value: &Value) -> Result<i64, Error> {
    coerce_i64(value.get("cnt"))
        .ok_or_else(|| Error::Api(format!("count field is not numeric: {:?}", value.get("cnt"))))
}

/// Re-issues the request with page size = `total` and returns the raw
/// `list` rows.
async fn bulk_list<R>(
    client: &Client,
    request: &R,
    total: i64,
    cancel: &CancelToken,
) -> Result<Vec<Value>, Error>
where
    R: ListRequest + Clone,
{
    if total == 0 {
        return Ok(Vec::new());
    }
    let bulk = request.clone().with_page(1).with_page_size(total);
    let value = client
        .send(bulk.endpoint(), &bulk.to_form(), &RetryPolicy::bulk(), cancel)
        .await?;
    match value.get("list") {
        Some(Value::Array(rows)) => Ok(rows.clone()),
        other => Err(Error::Api(format!("list field is not an array: {:?}", other))),
    }
}

/// Fetches the full approved-member snapshot.
pub async fn fetch_all_members(client: &Client, cancel: &CancelToken) -> Result<Vec<Member>, Error> {
    let request = MemberListRequest::default();
    let total = probe_count(client, &request, cancel).await?;
    let rows = bulk_list(client, &request, total, cancel).await?;
    Ok(rows.iter().map(Member::from_row).collect())
}

/// Fetches the full course snapshot, optionally narrowed to one year.
///
/// The year filter is applied client-side with loose string equality so
/// `"2024"` from the caller matches a numeric `2024` from the host.
pub async fn fetch_all_courses(
    client: &Client,
    year: Option<&str>,
    cancel: &CancelToken,
) -> Result<Vec<Course>, Error> {
    let request = CourseListRequest::default();
    let total = probe_count(client, &request, cancel).await?;
    let rows = bulk_list(client, &request, total, cancel).await?;
    let mut courses: Vec<Course> = rows.iter().map(Course::from_row).collect();
    if let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) {
        courses.retain(|course| course.year.trim() == year);
    }
    Ok(courses)
}

/// Fetches a course's completion list.
///
/// When the course has any completions, the application list for the
/// same course is fetched concurrently (same count) solely to recover
/// each member's study-start date, which the completion rows lack.
/// Members absent from the application list keep an empty study-start.
pub async fn fetch_completions(
    client: &Client,
    course_active_seq: i64,
    cancel: &CancelToken,
) -> Result<Vec<Completion>, Error> {
    let completion_request = CompletionListRequest::for_course(course_active_seq);
    let total = probe_count(client, &completion_request, cancel).await?;
    if total == 0 {
        return Ok(Vec::new());
    }

    let application_request = ApplicationListRequest::for_course(course_active_seq);
    let (completion_rows, application_rows) = tokio::join!(
        bulk_list(client, &completion_request, total, cancel),
        bulk_list(client, &application_request, total, cancel),
    );
    let completion_rows = completion_rows?;
    let application_rows = application_rows?;

    let mut study_starts: HashMap<i64, String> = HashMap::new();
    for application in application_rows.iter().map(Application::from_row) {
        study_starts
            .entry(application.user_seq)
            .or_insert(application.study_start);
    }

    let mut completions: Vec<Completion> =
        completion_rows.iter().map(Completion::from_row).collect();
    for completion in &mut completions {
        if let Some(start) = study_starts.get(&completion.user_seq) {
            completion.study_start = start.clone();
        }
    }
    Ok(completions)
}

/// Counts a course's organization and exam elements and sums them into
/// its completion-time unit. Both probes run concurrently.
pub async fn fetch_element_units(
    client: &Client,
    course_active_seq: i64,
    cancel: &CancelToken,
) -> Result<i64, Error> {
    let organization = ElementCountRequest::for_course(course_active_seq, ElementKind::Organization);
    let exam = ElementCountRequest::for_course(course_active_seq, ElementKind::Exam);
    let (organization_count, exam_count) = tokio::join!(
        probe_count(client, &organization, cancel),
        probe_count(client, &exam, cancel),
    );
    Ok(organization_count? + exam_count?)
}
