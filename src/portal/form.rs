//! Filling in and submitting the course-plan search form.

use super::SearchQuery;
use crate::browser::{Element, Locator, Result, Session, WaitCondition, find_one, wait_for};
use crate::config::Config;
use tracing::debug;

const YEAR_INPUT_ID: &str = "schEstblYear___input";
const SEMESTER_SELECT: &str = "select[title='개설학기']";
const SUBJECT_CODE_ID: &str = "schSbjetCd1";
const SEARCH_KIND_ID: &str = "schCode";
const QUERY_INPUT_ID: &str = "schCodeContents";
const SEARCH_BUTTON_ID: &str = "btnSearch";
const FIRST_ROW_XPATH: &str = "//tbody[@id='grid01_body_tbody']/tr[1]";

/// Search-kind option that matches on subject name.
pub const SEARCH_BY_NAME: &str = "교과목명";

/// Open the portal, run a subject-name search and wait for the first result row.
pub async fn submit_search<S: Session>(
    session: &S,
    config: &Config,
    query: &SearchQuery,
) -> Result<()> {
    let wait = |locator: Locator, condition: WaitCondition| async move {
        wait_for(
            session,
            &locator,
            condition,
            config.wait_timeout,
            config.poll_interval,
        )
        .await
    };

    session.goto(&config.portal_url).await?;
    debug!(url = %config.portal_url, "opened portal");

    // The year field is a masked widget that ignores typed input.
    let year_input = wait(Locator::id(YEAR_INPUT_ID), WaitCondition::Present).await?;
    year_input.set_value(&query.year).await?;

    let semester = wait(Locator::css(SEMESTER_SELECT), WaitCondition::Clickable).await?;
    semester.select_by_visible_text(&query.semester).await?;

    find_one(session, &Locator::id(SUBJECT_CODE_ID))
        .await?
        .set_value("")
        .await?;

    let kind = wait(Locator::id(SEARCH_KIND_ID), WaitCondition::Clickable).await?;
    kind.select_by_visible_text(SEARCH_BY_NAME).await?;

    let input = wait(Locator::id(QUERY_INPUT_ID), WaitCondition::Present).await?;
    input.clear_and_type(&query.subject).await?;

    let button = wait(Locator::id(SEARCH_BUTTON_ID), WaitCondition::Clickable).await?;
    button.click().await?;
    debug!(year = %query.year, semester = %query.semester, subject = %query.subject, "search submitted");

    wait(Locator::xpath(FIRST_ROW_XPATH), WaitCondition::Present).await?;
    Ok(())
}
