//! Rendering search results for the terminal.

use crate::data::CourseRecord;
use clap::ValueEnum;
use std::io::{self, Write};
use yansi::Paint;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per course
    Table,
    /// Pretty-printed JSON array
    Json,
}

pub fn render<W: Write>(
    out: &mut W,
    courses: &[CourseRecord],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, courses)?;
            writeln!(out)?;
        }
        OutputFormat::Table => render_table(out, courses)?,
    }
    Ok(())
}

/// Multi-line cell values are shown on one line.
fn flatten(value: &str) -> String {
    value.split('\n').map(str::trim).collect::<Vec<_>>().join(", ")
}

fn render_table<W: Write>(out: &mut W, courses: &[CourseRecord]) -> io::Result<()> {
    if courses.is_empty() {
        writeln!(out, "{}", "no courses found".dim())?;
        return Ok(());
    }

    for course in courses {
        let mut flags = Vec::new();
        if course.is_required {
            flags.push("required");
        }
        if course.is_design {
            flags.push("design");
        }
        let rating = match course.rating {
            Some(rating) => format!("{rating:.1}").green().to_string(),
            None => "-".dim().to_string(),
        };

        writeln!(
            out,
            "{} {} [{}] {}cr  {}  {}  {} {}  rating {}{}",
            course.code.bold(),
            course.name,
            flatten(&course.division),
            course.credit,
            flatten(&course.professor).cyan(),
            flatten(&course.lecture_time),
            flatten(&course.classroom),
            course.room_number,
            rating,
            if flags.is_empty() {
                String::new()
            } else {
                format!("  ({})", flags.join(", ")).yellow().to_string()
            },
        )?;
    }
    writeln!(out, "{} course(s)", courses.len())?;
    Ok(())
}
