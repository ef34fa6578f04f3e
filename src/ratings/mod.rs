//! Professor ratings loaded from a local text file and joined onto course records.
//!
//! The file has one entry per line: subject name, professor, rating, separated
//! by whitespace. The subject may itself contain spaces; the professor is the
//! last token before the rating.
//!
//! ```text
//! 자료구조 김교수 4.5
//! 공학 설계 Ⅰ 이교수 3.8
//! ```

pub mod normalize;

use crate::data::CourseRecord;
use normalize::rating_key;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One parsed line of the rating file.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEntry {
    pub subject: String,
    pub professor: String,
    pub rating: f64,
}

impl RatingEntry {
    /// Parse one line; `None` for blank or malformed lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (key_part, rating) = line.rsplit_once(char::is_whitespace)?;
        let rating: f64 = rating.trim().parse().ok()?;
        if !rating.is_finite() {
            return None;
        }

        let key_part = key_part.trim();
        let professor = key_part.split_whitespace().last()?;
        if key_part.split_whitespace().count() < 2 {
            return None;
        }
        let subject = key_part[..key_part.len() - professor.len()].trim();

        Some(Self {
            subject: subject.to_string(),
            professor: professor.to_string(),
            rating,
        })
    }
}

/// Ratings keyed by normalized subject name and professor.
#[derive(Debug, Clone, Default)]
pub struct RatingStore {
    ratings: HashMap<String, f64>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the rating file, degrading to an empty store when it is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let Some(resolved) = resolve_resource(path) else {
            warn!(path = %path.display(), "rating file not found, continuing without ratings");
            return Self::new();
        };

        match File::open(&resolved) {
            Ok(file) => {
                let store = Self::from_reader(BufReader::new(file));
                info!(path = %resolved.display(), entries = store.len(), "loaded rating file");
                store
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %resolved.display(), "rating file not found, continuing without ratings");
                Self::new()
            }
            Err(e) => {
                warn!(path = %resolved.display(), error = %e, "failed to open rating file");
                Self::new()
            }
        }
    }

    /// [`parse`](Self::parse), discarding everything if the read fails partway.
    pub fn from_reader<R: BufRead>(reader: R) -> Self {
        Self::parse(reader).unwrap_or_else(|e| {
            warn!(error = %e, "failed to read rating file, continuing without ratings");
            Self::new()
        })
    }

    /// Parse rating lines from `reader`.
    ///
    /// Malformed lines are skipped and invalid UTF-8 is replaced, so a bad
    /// line only loses itself. Later lines overwrite earlier ones with the
    /// same key.
    pub fn parse<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut store = Self::new();
        let mut skipped = 0usize;
        let mut buf = Vec::new();
        let mut line_no = 0usize;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                debug!(line = line_no, "rating line is not valid UTF-8");
            }

            match RatingEntry::parse(&line) {
                Some(entry) => store.insert(&entry.subject, &entry.professor, entry.rating),
                None if line.trim().is_empty() => {}
                None => {
                    skipped += 1;
                    debug!(line = line_no, content = %line.trim_end(), "skipping malformed rating line");
                }
            }
        }

        if skipped > 0 {
            debug!(skipped, "malformed rating lines ignored");
        }
        Ok(store)
    }

    pub fn insert(&mut self, subject: &str, professor: &str, rating: f64) {
        self.ratings.insert(rating_key(subject, professor), rating);
    }

    pub fn get(&self, subject: &str, professor: &str) -> Option<f64> {
        self.ratings.get(&rating_key(subject, professor)).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Set `rating` on every record with a matching entry; returns how many matched.
    ///
    /// The professor is trimmed but otherwise compared verbatim.
    pub fn apply(&self, records: &mut [CourseRecord]) -> usize {
        let mut matched = 0;
        for record in records.iter_mut() {
            if let Some(rating) = self.get(&record.name, record.professor.trim()) {
                record.rating = Some(rating);
                matched += 1;
            }
        }
        debug!(matched, total = records.len(), "applied ratings");
        matched
    }
}

/// Find a bundled resource: absolute paths as-is, relative paths next to the
/// executable first and then in the working directory.
fn resolve_resource(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)));

    beside_exe
        .into_iter()
        .chain(std::iter::once(path.to_path_buf()))
        .find(|candidate| candidate.is_file())
}
