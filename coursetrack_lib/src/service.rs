//! Update and search orchestration.
//!
//! Wires the host client, the snapshot store, the join engine, and the
//! export sink into the two user-triggered actions. Progress goes to an
//! injected sink; nothing here talks to a UI directly.

use coursetrack_api::types::{Course, Member};
use coursetrack_api::{fetch, CancelToken, Client};

use crate::error::Error;
use crate::report::{self, ExportSink};
use crate::stats::{self, ReportQuery, StatRecord};
use crate::store::{SnapshotStore, COURSES_KEY, MEMBERS_KEY};

/// Progress events emitted while a run walks the host. The UI layer
/// renders them; the default implementations ignore everything.
pub trait Progress {
    fn stage(&self, _label: &str) {}
    fn course_done(&self, _done: usize, _total: usize) {}
}

/// Swallows all progress events.
pub struct NullProgress;

impl Progress for NullProgress {}

/// Outcome counts of a completed update run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateSummary {
    pub members: usize,
    pub courses: usize,
}

pub struct ReportService<'a> {
    client: &'a Client,
    store: &'a SnapshotStore,
}

impl<'a> ReportService<'a> {
    pub fn new(client: &'a Client, store: &'a SnapshotStore) -> Self {
        Self { client, store }
    }

    /// Refreshes both snapshots from the host, optionally narrowing
    /// courses to one year.
    ///
    /// Course details are fetched sequentially in snapshot order to
    /// bound load on the host. A transient per-course failure keeps the
    /// course with empty detail and the batch continues; probe and
    /// snapshot-level failures abort the whole run. Nothing is written
    /// to the store unless the entire batch completes, so a cancelled or
    /// failed update never leaves a partial snapshot behind.
    pub async fn update(
        &self,
        year: Option<&str>,
        cancel: &CancelToken,
        progress: &dyn Progress,
    ) -> Result<UpdateSummary, Error> {
        progress.stage("members");
        let members = fetch::fetch_all_members(self.client, cancel).await?;

        progress.stage("courses");
        let mut courses = fetch::fetch_all_courses(self.client, year, cancel).await?;

        progress.stage("course details");
        let total = courses.len();
        for (index, course) in courses.iter_mut().enumerate() {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.fill_course_detail(course, cancel).await?;
            progress.course_done(index + 1, total);
        }

        self.store.write(MEMBERS_KEY, &members)?;
        self.store.write(COURSES_KEY, &courses)?;
        Ok(UpdateSummary {
            members: members.len(),
            courses: courses.len(),
        })
    }

    /// Fills one course's completion list and lesson units, tolerating
    /// per-course failures. Cancellation still aborts.
    async fn fill_course_detail(
        &self,
        course: &mut Course,
        cancel: &CancelToken,
    ) -> Result<(), Error> {
        match fetch::fetch_completions(self.client, course.active_seq, cancel).await {
            Ok(completions) => course.completions = completions,
            Err(coursetrack_api::Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                tracing::warn!(
                    "completion fetch for course {} failed, keeping it with an empty list: {}",
                    course.active_seq,
                    e
                );
                course.completions = Vec::new();
            }
        }

        match fetch::fetch_element_units(self.client, course.active_seq, cancel).await {
            Ok(units) => course.lesson_unit = units,
            Err(coursetrack_api::Error::Cancelled) => return Err(Error::Cancelled),
            Err(e) => {
                tracing::warn!(
                    "element count for course {} failed, keeping zero units: {}",
                    course.active_seq,
                    e
                );
                course.lesson_unit = 0;
            }
        }
        Ok(())
    }

    /// Reads both snapshots, falling back to a fresh host fetch (cached
    /// afterwards) for any key that was never written.
    async fn snapshots(&self, cancel: &CancelToken) -> Result<(Vec<Member>, Vec<Course>), Error> {
        let members = match self.store.read::<Vec<Member>>(MEMBERS_KEY)? {
            Some(members) => members,
            None => {
                tracing::info!("member snapshot missing, fetching from host");
                let members = fetch::fetch_all_members(self.client, cancel).await?;
                self.store.write(MEMBERS_KEY, &members)?;
                members
            }
        };

        let courses = match self.store.read::<Vec<Course>>(COURSES_KEY)? {
            Some(courses) => courses,
            None => {
                tracing::info!("course snapshot missing, fetching from host");
                let mut courses = fetch::fetch_all_courses(self.client, None, cancel).await?;
                for course in courses.iter_mut() {
                    if cancel.is_cancelled() {
                        return Err(Error::Cancelled);
                    }
                    self.fill_course_detail(course, cancel).await?;
                }
                self.store.write(COURSES_KEY, &courses)?;
                courses
            }
        };

        Ok((members, courses))
    }

    /// Runs the join over the cached snapshots.
    pub async fn search(
        &self,
        query: &ReportQuery,
        cancel: &CancelToken,
    ) -> Result<Vec<StatRecord>, Error> {
        let (members, courses) = self.snapshots(cancel).await?;
        Ok(stats::join(&members, &courses, query))
    }

    /// Runs a search and pushes the flattened rows to the sink. Returns
    /// the number of members in the report.
    pub async fn search_and_export(
        &self,
        query: &ReportQuery,
        sink: &dyn ExportSink,
        cancel: &CancelToken,
    ) -> Result<usize, Error> {
        let records = self.search(query, cancel).await?;
        let rows = report::report_rows(&records);
        let filename = report::report_filename(query);
        sink.export(&filename, &rows).map_err(Error::Export)?;
        Ok(records.len())
    }
}
