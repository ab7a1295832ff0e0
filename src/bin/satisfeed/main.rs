use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use spdlog::{info, warn};

use satisfeed::config::Config;
use satisfeed::ingest::IngestionService;
use satisfeed::logger::configure_logger;
use satisfeed::mirror::{CsvMirror, MirrorSink, TextMirror};
use satisfeed::pager::HistoryPager;
use satisfeed::stats::AggregationEngine;
use satisfeed::store::{FeedbackStore, LabelCounts, StoreBackend};

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "satisfeed.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the feedback table and the mirror files if missing
    Init,
    /// Store one satisfaction rating
    Record { label: String },
    /// Per-label tallies for today and up to two comparison dates
    Stats {
        #[arg(long)]
        date1: Option<NaiveDate>,
        #[arg(long)]
        date2: Option<NaiveDate>,
    },
    /// One page of the record history, newest first
    History {
        #[arg(long, default_value_t = 1)]
        page: i64,
    },
    /// Dump a mirror file verbatim
    Export {
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum ExportFormat {
    Csv,
    Txt,
}

fn print_counts(title: &str, counts: &LabelCounts) {
    println!("{}", title);
    let mut labels: Vec<&String> = counts.keys().collect();
    labels.sort();
    if labels.is_empty() {
        println!("  (no records)");
    }
    for label in labels {
        println!("  {:<16} {}", label, counts[label]);
    }
}

async fn run(config: Config, command: Command) -> Result<()> {
    let store = StoreBackend::connect(&config.storage).await?;
    let csv = CsvMirror::new(config.mirrors.csv_file.clone());
    let txt = TextMirror::new(config.mirrors.txt_file.clone());

    match command {
        Command::Init => {
            store.init_schema().await?;
            for path in [&config.mirrors.csv_file, &config.mirrors.txt_file] {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Creating {}", parent.display()))?;
                }
            }
            csv.ensure_created()?;
            txt.ensure_created()?;
            info!("Storage initialized");
            println!("OK");
        }
        Command::Record { label } => {
            let service = IngestionService::new(store, csv, txt);
            let id = service.record(&label).await?;
            info!("Stored feedback record {}", id);
            println!("OK");
        }
        Command::Stats { date1, date2 } => {
            let engine = AggregationEngine::new(store);
            let today = Local::now().date_naive();
            let counts = engine.dashboard(today, date1, date2).await?;
            print_counts(&format!("Today ({})", today), &counts.today);
            if let (Some(date), Some(counts)) = (date1, counts.first.as_ref()) {
                print_counts(&date.to_string(), counts);
            }
            if let (Some(date), Some(counts)) = (date2, counts.second.as_ref()) {
                print_counts(&date.to_string(), counts);
            }
        }
        Command::History { page } => {
            let pager = HistoryPager::new(store);
            let history = pager.page(page).await?;
            println!("Page {} of {}", history.number, history.total_pages);
            for record in &history.records {
                println!(
                    "{:>6}  {}  {}  {:<16} dia {}",
                    record.id,
                    record.date_string(),
                    record.time_string(),
                    record.label,
                    record.weekday
                );
            }
        }
        Command::Export { format, output } => {
            let sink: &dyn MirrorSink = match format {
                ExportFormat::Csv => &csv,
                ExportFormat::Txt => &txt,
            };
            let bytes = sink
                .export()
                .with_context(|| format!("Reading {}", sink.path().display()))?;
            match output {
                Some(path) => fs::write(&path, bytes)
                    .with_context(|| format!("Writing {}", path.display()))?,
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run satisfeed --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    run(config, args.command).await
}
