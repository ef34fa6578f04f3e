use crate::output::OutputFormat;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

/// Course-plan scraper for the KNU registration portal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value_t = default_tracing_format(), global = true)]
    pub tracing: TracingFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the portal for courses by subject name
    Search(SearchArgs),
    /// Look up a single entry in the rating file
    Rating {
        /// Subject name as it appears in the portal
        name: String,
        /// Professor name
        professor: String,
    },
}

#[derive(ClapArgs, Debug)]
pub struct SearchArgs {
    /// Academic year, e.g. 2025 (defaults to the current year)
    #[arg(long)]
    pub year: Option<String>,

    /// Semester label exactly as shown in the portal dropdown, e.g. "1학기"
    #[arg(long)]
    pub semester: String,

    /// Subject name query
    #[arg(long, short)]
    pub query: String,

    /// How results are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Skip rating enrichment
    #[arg(long)]
    pub no_ratings: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TracingFormat {
    /// Human-readable compact output
    Pretty,
    /// Structured JSON lines
    Json,
}

fn default_tracing_format() -> TracingFormat {
    if cfg!(debug_assertions) {
        TracingFormat::Pretty
    } else {
        TracingFormat::Json
    }
}
