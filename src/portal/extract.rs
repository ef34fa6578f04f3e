//! Incremental extraction from the portal's virtualized result grid.
//!
//! The grid only renders the rows around its scroll position, so rows are
//! collected snapshot by snapshot while the scroll container is advanced in
//! fixed steps. Extraction ends when a scroll no longer moves the container.

use super::cells::cell_text;
use super::dedup::{CourseKey, SeenCourses};
use super::{GRID_ROWS_XPATH, SCROLL_CONTAINER_ID, columns};
use crate::browser::{Element, Locator, Result, Session, find_one};
use crate::config::Config;
use crate::data::{CourseRecord, RowColumns};
use tracing::{debug, trace, warn};

/// What happened to a single grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Added,
    /// Same identity key as a row seen earlier.
    Duplicate,
    /// Fewer cells than the grid layout requires.
    TooNarrow,
    /// Missing or placeholder name/code.
    Placeholder,
}

/// Accumulates unique course records across scroll snapshots.
#[derive(Debug)]
pub struct CourseCollector {
    semester: String,
    seen: SeenCourses,
    courses: Vec<CourseRecord>,
}

impl CourseCollector {
    pub fn new(semester: impl Into<String>) -> Self {
        Self {
            semester: semester.into(),
            seen: SeenCourses::new(),
            courses: Vec::new(),
        }
    }

    /// Extract one row.
    ///
    /// The identity key is recorded before the row's fields are read, so a
    /// row that turns out to be a placeholder or fails mid-extraction is not
    /// retried from later snapshots.
    pub async fn process_row<E: Element>(&mut self, row: &E) -> Result<RowOutcome> {
        let cells = row.find_all(&Locator::tag("td")).await?;
        if cells.len() < columns::MIN_CELLS {
            return Ok(RowOutcome::TooNarrow);
        }

        let key = CourseKey::from_cells(&cells).await?;
        if !self.seen.insert(key) {
            return Ok(RowOutcome::Duplicate);
        }

        let row_columns = read_columns(&cells).await?;
        match CourseRecord::from_columns(row_columns, &self.semester) {
            Some(record) => {
                trace!(code = %record.code, name = %record.name, "extracted course");
                self.courses.push(record);
                Ok(RowOutcome::Added)
            }
            None => Ok(RowOutcome::Placeholder),
        }
    }

    pub fn courses(&self) -> &[CourseRecord] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn into_courses(self) -> Vec<CourseRecord> {
        self.courses
    }
}

async fn read_columns<E: Element>(cells: &[E]) -> Result<RowColumns> {
    Ok(RowColumns {
        year: cell_text(&cells[columns::YEAR]).await?,
        division: cell_text(&cells[columns::DIVISION]).await?,
        code: cell_text(&cells[columns::CODE]).await?,
        name: cell_text(&cells[columns::NAME]).await?,
        credit: cell_text(&cells[columns::CREDIT]).await?,
        professor: cell_text(&cells[columns::PROFESSOR]).await?,
        lecture_time: cell_text(&cells[columns::LECTURE_TIME]).await?,
        classroom: cell_text(&cells[columns::CLASSROOM]).await?,
        room_number: cell_text(&cells[columns::ROOM_NUMBER]).await?,
    })
}

/// How a scroll run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSummary {
    pub iterations: u32,
    pub final_offset: i64,
    /// Stopped by `max_scroll_iterations` rather than by reaching the end.
    pub truncated: bool,
}

/// Scroll through the result grid, feeding every rendered row to `collector`.
///
/// Each iteration snapshots the rendered rows, scrolls by `scroll_step` and
/// compares the offset before and after. While the grid still moves, the
/// last row of the snapshot may be partially rendered and is left for the
/// next snapshot; once it stops, every row is processed. A failing row is
/// logged and skipped; any other failure ends the run with an error, leaving
/// what was collected so far in `collector`.
pub async fn scroll_and_collect<S: Session>(
    session: &S,
    config: &Config,
    collector: &mut CourseCollector,
) -> Result<ScrollSummary> {
    let container = find_one(session, &Locator::id(SCROLL_CONTAINER_ID)).await?;
    let rows_locator = Locator::xpath(GRID_ROWS_XPATH);
    let max_iterations = config.max_scroll_iterations.max(1);
    let mut iteration = 0u32;

    loop {
        iteration += 1;
        tokio::time::sleep(config.settle_delay).await;

        let rows = session.find_all(&rows_locator).await?;
        let before = container.scroll_top().await?;
        container.scroll_by(config.scroll_step).await?;
        tokio::time::sleep(config.settle_delay).await;
        let after = container.scroll_top().await?;

        let at_end = after == before;
        let truncated = !at_end && iteration >= max_iterations;
        if truncated {
            warn!(
                iteration,
                offset = after,
                "scroll iteration limit reached before the grid stopped moving"
            );
        }
        let done = at_end || truncated;

        let limit = if done {
            rows.len()
        } else {
            rows.len().saturating_sub(1)
        };

        for (index, row) in rows[..limit].iter().enumerate() {
            match collector.process_row(row).await {
                Ok(outcome) => trace!(index, ?outcome, "row processed"),
                Err(e) => warn!(iteration, index, error = %e, "failed to parse row, skipping"),
            }
        }

        debug!(
            iteration,
            rows = rows.len(),
            offset = after,
            collected = collector.len(),
            "scroll iteration"
        );

        if done {
            return Ok(ScrollSummary {
                iterations: iteration,
                final_offset: after,
                truncated,
            });
        }
    }
}
