//! Course search against the KNU course-plan portal.
//!
//! The portal's result grid is a 17+ column table whose layout (element ids,
//! column order) is an implicit contract; the constants here pin it down.

pub mod cells;
pub mod dedup;
pub mod extract;
pub mod form;

use crate::browser::chrome::LaunchOptions;
use crate::browser::environment::{self, Platform};
use crate::browser::{BrowserError, ChromeSession, EnvironmentError, Session};
use crate::config::Config;
use crate::data::CourseRecord;
use crate::ratings::RatingStore;
use crate::utils::{fmt_duration, log_if_slow};
use extract::{CourseCollector, ScrollSummary};
use std::time::{Duration, Instant};
use tracing::{Instrument, error, info, warn};

/// Rows of the result grid.
pub const GRID_ROWS_XPATH: &str = "//tbody[@id='grid01_body_tbody']/tr";

/// Scrollable container around the result grid.
pub const SCROLL_CONTAINER_ID: &str = "grid01_scrollY_div";

/// Column positions in the result grid.
pub mod columns {
    pub const YEAR: usize = 3;
    pub const DIVISION: usize = 4;
    pub const CODE: usize = 7;
    pub const NAME: usize = 8;
    pub const CREDIT: usize = 9;
    pub const PROFESSOR: usize = 12;
    pub const LECTURE_TIME: usize = 13;
    pub const CLASSROOM: usize = 15;
    pub const ROOM_NUMBER: usize = 16;

    /// Rows narrower than this are not course rows.
    pub const MIN_CELLS: usize = 17;
}

/// Searches slower than this are logged at warn.
const SLOW_SEARCH: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Four-digit academic year.
    pub year: String,
    /// Semester label as shown in the portal dropdown.
    pub semester: String,
    /// Free-text subject name.
    pub subject: String,
}

/// Failures that prevent a search from starting at all.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error("could not start a browser session")]
    Launch(#[source] BrowserError),
}

/// Run the search form and collect every course in the result grid.
///
/// Never fails: form or grid errors are logged and whatever was collected
/// before the failure is returned.
pub async fn crawl<S: Session>(
    session: &S,
    config: &Config,
    query: &SearchQuery,
) -> Vec<CourseRecord> {
    let mut collector = CourseCollector::new(&query.semester);

    match run_search(session, config, query, &mut collector).await {
        Ok(summary) => info!(
            iterations = summary.iterations,
            offset = summary.final_offset,
            truncated = summary.truncated,
            courses = collector.len(),
            "grid extraction finished"
        ),
        Err(e) => error!(
            error = %e,
            courses = collector.len(),
            "extraction aborted, returning partial results"
        ),
    }

    collector.into_courses()
}

async fn run_search<S: Session>(
    session: &S,
    config: &Config,
    query: &SearchQuery,
    collector: &mut CourseCollector,
) -> Result<ScrollSummary, BrowserError> {
    form::submit_search(session, config, query).await?;
    extract::scroll_and_collect(session, config, collector).await
}

/// [`crawl`], then close the session whether or not extraction succeeded.
pub async fn crawl_and_release<S: Session>(
    mut session: S,
    config: &Config,
    query: &SearchQuery,
) -> Vec<CourseRecord> {
    let courses = crawl(&session, config, query).await;

    if let Err(e) = session.close().await {
        warn!(error = %e, "failed to close browser session");
    }
    courses
}

/// Launch a browser, crawl the portal and release the browser.
///
/// Only environment and launch problems are errors; see [`crawl`].
pub async fn fetch_courses(
    config: &Config,
    query: &SearchQuery,
) -> Result<Vec<CourseRecord>, SearchError> {
    let platform = Platform::current()?;
    let executable = environment::resolve_browser(platform, config.browser_path.as_deref())?;

    let span = tracing::info_span!(
        "search",
        year = %query.year,
        semester = %query.semester,
        subject = %query.subject
    );

    async move {
        let start = Instant::now();
        let session = ChromeSession::launch(LaunchOptions {
            headless: config.headless,
            window_size: (config.window_width, config.window_height),
            executable: executable.as_deref(),
        })
        .await
        .map_err(SearchError::Launch)?;

        let courses = crawl_and_release(session, config, query).await;

        let elapsed = start.elapsed();
        info!(
            courses = courses.len(),
            duration = fmt_duration(elapsed),
            "search completed"
        );
        log_if_slow(elapsed, SLOW_SEARCH, "portal search");
        Ok::<_, SearchError>(courses)
    }
    .instrument(span)
    .await
}

/// [`fetch_courses`] followed by rating enrichment from the configured rating file.
pub async fn search(
    config: &Config,
    query: &SearchQuery,
) -> Result<Vec<CourseRecord>, SearchError> {
    let mut courses = fetch_courses(config, query).await?;
    let ratings = RatingStore::load(&config.rating_file);
    let rated = ratings.apply(&mut courses);
    info!(rated, total = courses.len(), "ratings applied");
    Ok(courses)
}
