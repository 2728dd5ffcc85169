use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use campus_events::config::Config;
use campus_events::infra::ReqwestFetcher;
use campus_events::pipeline::{self, RunReport};
use campus_events::types::Source;
use campus_events::{logging, output};

#[derive(Parser)]
#[command(name = "campus_events")]
#[command(about = "Campus event listing scraper for NTHU and NYCU")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML config file (falls back to $CAMPUS_EVENTS_CONFIG, then built-in sources)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only log to the console
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every source, merge, keep one year and write the JSON file
    Run {
        /// Year to keep (defaults to the config value)
        #[arg(long)]
        year: Option<i32>,
        /// Output file (defaults to merged_events_<year>.json)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Comma-separated sources to crawl. Available: nthu, nycu
        #[arg(long)]
        sources: Option<String>,
    },
    /// Run one source's extractor over a saved HTML page and print the JSON
    Parse {
        /// Source whose layout to apply
        #[arg(long)]
        source: String,
        /// Saved HTML page
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        year: Option<i32>,
    },
    /// List configured sources
    Sources,
}

fn parse_sources(list: &str) -> anyhow::Result<Vec<Source>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Source>().map_err(anyhow::Error::from))
        .collect()
}

fn print_report(report: &RunReport) -> anyhow::Result<()> {
    println!("{}", report.summary_line());
    println!("{}", output::to_json(&report.events)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref())?;
    let log_dir = if cli.no_log_file { None } else { config.log_dir.clone() };
    let _log_guard = logging::init_logging(log_dir.as_deref());

    match cli.command {
        Commands::Run {
            year,
            output: output_path,
            sources,
        } => {
            if let Some(year) = year {
                config.target_year = year;
            }
            if let Some(path) = output_path {
                config.output = Some(path);
            }
            if let Some(list) = sources {
                config.retain_sources(&parse_sources(&list)?)?;
            }
            config.validate()?;

            let fetcher = ReqwestFetcher::new(config.timeout_seconds, &config.user_agent)?;
            info!("Starting crawl of {} sources", config.sources.len());
            let report = match pipeline::run(&config, &fetcher).await {
                Ok(report) => report,
                Err(e) => {
                    error!("Crawl failed: {}", e);
                    return Err(e.into());
                }
            };

            print_report(&report)?;
            let path = config.output_path();
            output::write_events(&path, &report.events)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        Commands::Parse { source, file, year } => {
            let source: Source = source.parse()?;
            let source_config = config
                .source(source)
                .with_context(|| format!("source {source} is not configured"))?;
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let target_year = year.unwrap_or(config.target_year);

            let report = pipeline::parse_saved_page(source_config, &html, target_year)?;
            print_report(&report)?;
        }
        Commands::Sources => {
            for source in &config.sources {
                let pages = source.start_urls()?;
                println!(
                    "{} ({}, {} start pages{})",
                    source.source,
                    source.layout.name(),
                    pages.len(),
                    if source.pagination.is_some() { ", paginated" } else { "" }
                );
                for page in pages {
                    println!("  {page}");
                }
            }
        }
    }

    Ok(())
}
