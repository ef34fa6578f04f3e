//! Text extraction from grid cells.

use crate::browser::{Element, Locator, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// The grid wraps multi-line cell content in a `<nobr>` with `<br>` separators.
const RICH_TEXT_TAG: &str = "nobr";

static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br[^>]*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Convert cell markup to text: line-break tags become `\n`, other tags are
/// dropped, entities are decoded and the result is trimmed.
///
/// Entities are decoded on purpose: the plain-text fallback comes back from
/// the browser already decoded, and both paths must yield the same text.
///
/// ```
/// use knu_courses::portal::cells::rich_text_to_plain;
///
/// assert_eq!(rich_text_to_plain("월 09:00<BR/>수 09:00 "), "월 09:00\n수 09:00");
/// assert_eq!(rich_text_to_plain("<span>R&amp;D</span>"), "R&D");
/// ```
pub fn rich_text_to_plain(markup: &str) -> String {
    let with_breaks = BREAK_RE.replace_all(markup, "\n");
    let stripped = TAG_RE.replace_all(&with_breaks, "");
    let decoded = if stripped.contains('&') {
        htmlize::unescape(&*stripped).into_owned()
    } else {
        stripped.into_owned()
    };
    decoded.trim().to_string()
}

/// Normalized text of a grid cell.
///
/// Prefers the cell's rich-text child so that line breaks survive; any failure
/// on that path falls back to the cell's rendered text.
pub async fn cell_text<E: Element>(cell: &E) -> Result<String> {
    match rich_text(cell).await {
        Ok(Some(text)) => return Ok(text),
        Ok(None) => {}
        Err(e) => trace!(error = %e, "rich text lookup failed, using plain text"),
    }
    Ok(cell.text().await?.trim().to_string())
}

async fn rich_text<E: Element>(cell: &E) -> Result<Option<String>> {
    let children = cell.find_all(&Locator::tag(RICH_TEXT_TAG)).await?;
    let Some(rich) = children.first() else {
        return Ok(None);
    };
    let markup = rich.inner_html().await?;
    Ok(Some(rich_text_to_plain(&markup)))
}
