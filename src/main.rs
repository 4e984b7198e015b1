use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{info, warn};

use filingscan::config::Config;
use filingscan::edgar::extractor::SecExtractorClient;
use filingscan::edgar::query::SecQueryClient;
use filingscan::keywords::vocabulary::Vocabulary;
use filingscan::output::{csv as csv_out, terminal, OutputPaths, RELEVANT_FIRMS_SUFFIX};
use filingscan::pipeline::relevance::filter_relevant;
use filingscan::pipeline::run::{self, RunOutcome};
use filingscan::pipeline::CancelFlag;

/// filingscan: find firms exposed to a trade-tariff policy event.
///
/// Scans annual filings for tariff, trade-policy and exemption keywords and
/// keeps the firms that discuss all three.
#[derive(Parser)]
#[command(name = "filingscan", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve, scan and filter filings, writing both output tables
    Scan {
        /// First filing year (default: START_YEAR or 2018)
        #[arg(long)]
        start_year: Option<i32>,

        /// Last filing year, inclusive (default: END_YEAR or 2025)
        #[arg(long)]
        end_year: Option<i32>,

        /// Number of filings to process in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: u32,
    },

    /// Re-run the relevance filter on an existing raw keyword scan
    Filter {
        /// Path to a *_Raw_Keyword_Scan.csv file
        #[arg(long)]
        raw: PathBuf,
    },

    /// Check the keyword vocabulary against the category sets
    Vocab,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("filingscan=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            start_year,
            end_year,
            concurrency,
        } => {
            let mut config = Config::load()?;
            config.require_api_key()?;
            if let Some(year) = start_year {
                config.start_year = year;
            }
            if let Some(year) = end_year {
                config.end_year = year;
            }
            let pipeline = config.pipeline(concurrency as usize)?;

            let vocabulary = Vocabulary::load(&config.keyword_file_path)?;
            println!(
                "Loaded {} keywords for the initial scan.",
                vocabulary.len()
            );

            std::fs::create_dir_all(&config.output_dir).with_context(|| {
                format!(
                    "Failed to create output directory {}",
                    config.output_dir.display()
                )
            })?;
            let paths = OutputPaths::new(&config.output_dir, &config.filename_prefix);

            let index = SecQueryClient::new(
                &config.query_api_url,
                &config.sec_api_key,
                config.request_timeout,
            )?;
            let extractor = SecExtractorClient::new(
                &config.extractor_api_url,
                &config.sec_api_key,
                config.request_timeout,
                config.extractor_requests_per_second,
            )?;

            // Ctrl-C stops new filings from starting; in-flight ones finish.
            let cancel = CancelFlag::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, finishing in-flight filings");
                    on_signal.cancel();
                }
            });

            println!(
                "Scanning {} filings from {} to {} (items: {})...",
                pipeline.form_type,
                pipeline.start_year,
                pipeline.end_year,
                pipeline.items.join(", "),
            );

            let outcome =
                run::run(&index, &extractor, &vocabulary, &pipeline, &paths, &cancel).await?;

            match outcome {
                RunOutcome::NoFilings => {
                    println!("\n{}", "No filings found. Nothing was written.".yellow());
                }
                RunOutcome::NoRelevantFirms { scanned } => {
                    println!("\n{}", "Scan complete.".bold());
                    println!("  Filings scanned: {scanned}");
                    println!("  Raw scan saved to: {}", paths.raw_scan.display());
                    println!(
                        "\n{}",
                        "No firms matched the combined keyword criteria.".yellow()
                    );
                }
                RunOutcome::Complete { scanned, relevant } => {
                    terminal::display_relevant_firms(&relevant);
                    println!("\n{}", "Scan complete.".bold());
                    println!("  Filings scanned: {scanned}");
                    println!("  Relevant filings: {}", relevant.len());
                    println!("  Raw scan saved to: {}", paths.raw_scan.display());
                    println!(
                        "{}",
                        format!("Relevant firms saved to: {}", paths.relevant_firms.display())
                            .bold()
                    );
                }
            }
        }

        Commands::Filter { raw } => {
            let config = Config::load()?;
            let pipeline = config.pipeline(1)?;

            let (items, records) = csv_out::read_raw_scan(&raw)?;
            info!(count = records.len(), items = ?items, "Loaded raw keyword scan");
            println!("Filtering {} filings from {}...", records.len(), raw.display());

            let relevant = filter_relevant(&records, &pipeline.categories);
            if relevant.is_empty() {
                println!(
                    "\n{}",
                    "No firms matched the combined keyword criteria.".yellow()
                );
                return Ok(());
            }

            let out_path = relevant_path_for(&raw);
            csv_out::write_relevant_firms(&out_path, &items, &relevant)?;
            terminal::display_relevant_firms(&relevant);
            println!(
                "\n{}",
                format!("Relevant firms saved to: {}", out_path.display()).bold()
            );
        }

        Commands::Vocab => {
            let config = Config::load()?;
            let pipeline = config.pipeline(1)?;
            let vocabulary = Vocabulary::load(&config.keyword_file_path)?;
            terminal::display_vocabulary_report(&vocabulary, &pipeline.categories);
        }
    }

    Ok(())
}

/// `<prefix>_Raw_Keyword_Scan.csv` -> `<prefix>_Relevant_Firms.csv`, next to the input.
fn relevant_path_for(raw: &std::path::Path) -> PathBuf {
    let name = raw
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let prefix = name
        .strip_suffix(filingscan::output::RAW_SCAN_SUFFIX)
        .unwrap_or_else(|| name.trim_end_matches(".csv"));
    raw.with_file_name(format!("{prefix}{RELEVANT_FIRMS_SUFFIX}"))
}
