//! A scripted stand-in for the portal page: a search form plus a virtualized
//! grid that only renders the rows inside its scroll window.

#![allow(dead_code)]

use async_trait::async_trait;
use knu_courses::browser::{BrowserError, Element, Locator, Session};
use knu_courses::config::Config;
use knu_courses::portal::{GRID_ROWS_XPATH, SCROLL_CONTAINER_ID, SearchQuery};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

type Result<T> = std::result::Result<T, BrowserError>;

/// Config tuned for the fake: no settle delay and short waits.
pub fn test_config() -> Config {
    Config {
        settle_delay: Duration::ZERO,
        poll_interval: Duration::from_millis(1),
        wait_timeout: Duration::from_millis(50),
        scroll_step: 320,
        ..Config::default()
    }
}

pub fn query(subject: &str) -> SearchQuery {
    SearchQuery {
        year: "2025".into(),
        semester: "1학기".into(),
        subject: subject.into(),
    }
}

#[derive(Debug, Clone)]
pub struct FakeCell {
    text: String,
    rich: Option<String>,
    rich_fails: bool,
    text_fails: bool,
}

impl FakeCell {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.into(),
            rich: None,
            rich_fails: false,
            text_fails: false,
        }
    }

    /// A cell whose content sits in a `<nobr>` child. The rendered text
    /// flattens line breaks the way a browser's text extraction may.
    pub fn rich(markup: &str) -> Self {
        Self {
            text: markup.replace("<br>", " "),
            rich: Some(markup.into()),
            rich_fails: false,
            text_fails: false,
        }
    }

    /// A cell whose rich-text lookup errors out.
    pub fn broken_rich(text: &str) -> Self {
        Self {
            rich_fails: true,
            ..Self::plain(text)
        }
    }

    /// A cell that cannot be read at all.
    pub fn unreadable() -> Self {
        Self {
            rich_fails: true,
            text_fails: true,
            ..Self::plain("")
        }
    }
}

#[derive(Debug, Clone)]
pub struct FakeRow {
    cells: Vec<FakeCell>,
    cells_fail: bool,
}

impl FakeRow {
    /// A well-formed 17-cell course row.
    pub fn course(code: &str, name: &str, professor: &str, time: &str) -> Self {
        let mut cells: Vec<FakeCell> = (0..17).map(|i| FakeCell::plain(&format!("c{i}"))).collect();
        cells[3] = FakeCell::plain("2025");
        cells[4] = FakeCell::plain("전공필수");
        cells[7] = FakeCell::plain(code);
        cells[8] = FakeCell::plain(name);
        cells[9] = FakeCell::plain("3");
        cells[12] = FakeCell::plain(professor);
        cells[13] = FakeCell::plain(time);
        cells[15] = FakeCell::plain("IT대학5호관");
        cells[16] = FakeCell::plain("345");
        Self {
            cells,
            cells_fail: false,
        }
    }

    /// Course rows numbered `0..count` with distinct codes.
    pub fn numbered(count: usize) -> Vec<Self> {
        (0..count)
            .map(|i| Self::course(&format!("COMP{i:04}"), &format!("과목{i}"), "김교수", "월 09:00 ~ 10:15"))
            .collect()
    }

    pub fn narrow(cells: usize) -> Self {
        Self {
            cells: (0..cells).map(|i| FakeCell::plain(&format!("n{i}"))).collect(),
            cells_fail: false,
        }
    }

    /// A row whose cell lookup errors out.
    pub fn broken() -> Self {
        Self {
            cells: Vec::new(),
            cells_fail: true,
        }
    }

    pub fn with_cell(mut self, index: usize, cell: FakeCell) -> Self {
        self.cells[index] = cell;
        self
    }
}

#[derive(Debug)]
struct State {
    rows: Vec<FakeRow>,
    row_height: i64,
    viewport_rows: usize,
    scroll_top: i64,
    form_present: bool,
    container_present: bool,
    /// Row snapshots served before lookups start failing.
    row_lookups_left: Option<usize>,
    actions: Vec<String>,
    offsets: Vec<i64>,
    closed: bool,
}

impl State {
    fn max_scroll(&self) -> i64 {
        let content = self.rows.len() as i64 * self.row_height;
        let viewport = self.viewport_rows as i64 * self.row_height;
        (content - viewport).max(0)
    }

    fn visible_rows(&self) -> Vec<FakeRow> {
        let start = (self.scroll_top / self.row_height) as usize;
        let end = (start + self.viewport_rows).min(self.rows.len());
        self.rows.get(start..end).map(<[FakeRow]>::to_vec).unwrap_or_default()
    }
}

/// The fake page. Cloning shares state, so a test can keep a handle for
/// inspection after passing one to the code under test.
#[derive(Debug, Clone)]
pub struct FakePortal {
    state: Arc<Mutex<State>>,
}

impl FakePortal {
    /// A grid 32px per row, showing `viewport_rows` at a time.
    pub fn new(rows: Vec<FakeRow>, viewport_rows: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                rows,
                row_height: 32,
                viewport_rows,
                scroll_top: 0,
                form_present: true,
                container_present: true,
                row_lookups_left: None,
                actions: Vec::new(),
                offsets: Vec::new(),
                closed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn without_form(self) -> Self {
        self.lock().form_present = false;
        self
    }

    pub fn without_scroll_container(self) -> Self {
        self.lock().container_present = false;
        self
    }

    pub fn fail_row_lookups_after(self, snapshots: usize) -> Self {
        self.lock().row_lookups_left = Some(snapshots);
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.lock().actions.clone()
    }

    /// Every scroll offset read by the code under test, in order.
    pub fn offsets(&self) -> Vec<i64> {
        self.lock().offsets.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn record(&self, action: String) {
        self.lock().actions.push(action);
    }
}

#[derive(Debug, Clone)]
pub enum FakeElement {
    Control { portal: FakePortal, locator: String },
    Container(FakePortal),
    Row(FakeRow),
    Cell(FakeCell),
    Rich(String),
}

#[async_trait]
impl Session for FakePortal {
    type Element = FakeElement;

    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto {url}"));
        Ok(())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<FakeElement>> {
        let mut state = self.lock();
        match locator {
            Locator::XPath(expr) if expr == GRID_ROWS_XPATH => {
                if let Some(left) = state.row_lookups_left.as_mut() {
                    if *left == 0 {
                        return Err(BrowserError::Script("grid detached".into()));
                    }
                    *left -= 1;
                }
                Ok(state.visible_rows().into_iter().map(FakeElement::Row).collect())
            }
            Locator::XPath(expr) if expr.ends_with("/tr[1]") => Ok(state
                .visible_rows()
                .into_iter()
                .take(1)
                .map(FakeElement::Row)
                .collect()),
            Locator::Id(id) if id == SCROLL_CONTAINER_ID => {
                if state.container_present {
                    Ok(vec![FakeElement::Container(self.clone())])
                } else {
                    Ok(Vec::new())
                }
            }
            other if state.form_present => Ok(vec![FakeElement::Control {
                portal: self.clone(),
                locator: other.to_string(),
            }]),
            _ => Ok(Vec::new()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.lock().closed = true;
        Ok(())
    }
}

#[async_trait]
impl Element for FakeElement {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>> {
        match (self, locator) {
            (FakeElement::Row(row), Locator::Tag(tag)) if tag == "td" => {
                if row.cells_fail {
                    return Err(BrowserError::Script("row went stale".into()));
                }
                Ok(row.cells.iter().cloned().map(FakeElement::Cell).collect())
            }
            (FakeElement::Cell(cell), Locator::Tag(tag)) if tag == "nobr" => {
                if cell.rich_fails {
                    return Err(BrowserError::Script("nobr lookup failed".into()));
                }
                Ok(cell.rich.iter().cloned().map(FakeElement::Rich).collect())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn inner_html(&self) -> Result<String> {
        match self {
            FakeElement::Rich(markup) => Ok(markup.clone()),
            _ => Ok(String::new()),
        }
    }

    async fn text(&self) -> Result<String> {
        match self {
            FakeElement::Cell(cell) if cell.text_fails => {
                Err(BrowserError::Script("cell detached".into()))
            }
            FakeElement::Cell(cell) => Ok(cell.text.clone()),
            _ => Ok(String::new()),
        }
    }

    async fn set_value(&self, value: &str) -> Result<()> {
        if let FakeElement::Control { portal, locator } = self {
            portal.record(format!("set {locator} = {value}"));
        }
        Ok(())
    }

    async fn clear_and_type(&self, text: &str) -> Result<()> {
        if let FakeElement::Control { portal, locator } = self {
            portal.record(format!("type {locator} = {text}"));
        }
        Ok(())
    }

    async fn select_by_visible_text(&self, text: &str) -> Result<()> {
        if let FakeElement::Control { portal, locator } = self {
            portal.record(format!("select {locator} = {text}"));
        }
        Ok(())
    }

    async fn click(&self) -> Result<()> {
        if let FakeElement::Control { portal, locator } = self {
            portal.record(format!("click {locator}"));
        }
        Ok(())
    }

    async fn is_clickable(&self) -> Result<bool> {
        Ok(true)
    }

    async fn scroll_top(&self) -> Result<i64> {
        match self {
            FakeElement::Container(portal) => {
                let mut state = portal.lock();
                let top = state.scroll_top;
                state.offsets.push(top);
                Ok(top)
            }
            _ => Err(BrowserError::Unsupported("scrollTop on non-container".into())),
        }
    }

    async fn scroll_by(&self, dy: i64) -> Result<()> {
        match self {
            FakeElement::Container(portal) => {
                let mut state = portal.lock();
                state.scroll_top = (state.scroll_top + dy).clamp(0, state.max_scroll());
                Ok(())
            }
            _ => Err(BrowserError::Unsupported("scroll on non-container".into())),
        }
    }
}
