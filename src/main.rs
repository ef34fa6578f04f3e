use clap::Parser;
use knu_courses::cli::{Args, Command, SearchArgs};
use knu_courses::config::Config;
use knu_courses::logging::setup_logging;
use knu_courses::output::render;
use knu_courses::portal::{self, SearchQuery};
use knu_courses::ratings::RatingStore;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Config must be loaded before logging so startup logs are never dropped
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        "starting knu-courses"
    );

    let result = match args.command {
        Command::Search(search) => run_search(&config, search).await,
        Command::Rating { name, professor } => run_rating(&config, &name, &professor),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!(error = ?e, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run_search(config: &Config, args: SearchArgs) -> anyhow::Result<ExitCode> {
    let query = SearchQuery {
        year: args
            .year
            .unwrap_or_else(|| chrono::Local::now().format("%Y").to_string()),
        semester: args.semester,
        subject: args.query,
    };

    let courses = if args.no_ratings {
        portal::fetch_courses(config, &query).await?
    } else {
        portal::search(config, &query).await?
    };

    let mut stdout = std::io::stdout().lock();
    render(&mut stdout, &courses, args.format)?;
    Ok(ExitCode::SUCCESS)
}

fn run_rating(config: &Config, name: &str, professor: &str) -> anyhow::Result<ExitCode> {
    let store = RatingStore::load(&config.rating_file);
    match store.get(name, professor.trim()) {
        Some(rating) => {
            println!("{rating}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("no rating for {name} / {professor}");
            Ok(ExitCode::FAILURE)
        }
    }
}
