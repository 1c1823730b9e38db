//! metasift: Classify the metadata keys of a file or a directory tree
//!
//! Usage:
//!   # Files already hold Tika JSON output
//!   metasift ./metadata --output-dir ./keys
//!
//!   # Send every file under ./docs to a Tika server first
//!   metasift ./docs --tika-url http://localhost:9998 --jobs 4
//!
//!   # Also print the unique core metadata
//!   metasift report.json --report
//!
//! Writes core_keys.txt, ignored_keys.txt and remaining_keys.txt, one key per
//! line, sorted. Set RUST_LOG (e.g. RUST_LOG=metasift=debug) for more detail.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use metasift::{
    collect_files, JsonFileSource, KeySetWriter, MetadataSource, Pipeline, PipelineConfig,
    ProcessConfig, TikaClient, TikaConfig,
};
use metasift::value::{DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "metasift")]
#[command(about = "Classify document metadata keys into core, ignored and remaining sets", long_about = None)]
struct Args {
    /// File or directory to process (directories are walked recursively)
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Tika server to extract metadata with; without it files are read as JSON
    #[arg(long, env = "TIKA_URL")]
    tika_url: Option<String>,

    /// Directory for the key-set files
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: PathBuf,

    /// Don't write ignored_keys.txt
    #[arg(long)]
    no_ignored: bool,

    /// Print the unique core metadata entries to stdout
    #[arg(long)]
    report: bool,

    /// Number of worker threads
    #[arg(long, short = 'j', default_value_t = 1)]
    jobs: usize,

    /// Maximum nesting depth accepted in a metadata document (1-126)
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_DEPTH as u64,
        value_parser = clap::value_parser!(u64).range(1..=MAX_SUPPORTED_DEPTH as u64)
    )]
    max_depth: u64,

    /// Tika request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let Some(path) = args.path.as_deref() else {
        eprintln!("error: missing <PATH> argument\n\nUsage: metasift [OPTIONS] <PATH>");
        return Ok(ExitCode::FAILURE);
    };

    let files = match collect_files(path) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    if files.files.is_empty() && files.skipped.is_empty() {
        warn!(path = %path.display(), "no files to process");
    }

    let source: Box<dyn MetadataSource> = match &args.tika_url {
        Some(url) => Box::new(
            TikaClient::new(TikaConfig {
                base_url: url.clone(),
                timeout: Duration::from_secs(args.timeout),
                ..TikaConfig::default()
            })
            .context("Failed to create Tika client")?,
        ),
        None => Box::new(JsonFileSource),
    };

    let config = PipelineConfig {
        jobs: args.jobs,
        process: ProcessConfig {
            max_depth: args.max_depth as usize,
        },
    };
    let summary = Pipeline::new(source, config).run_collected(files);

    let mut writer = KeySetWriter::new(&args.output_dir)?;
    if args.no_ignored {
        writer = writer.without_ignored();
    }
    let result = summary.classification();
    let written = writer
        .write(&result)
        .context("Failed to write key sets")?;

    if args.report {
        print!("{}", summary.report);
    }

    eprintln!(
        "✓ {} processed, {} skipped: {} core, {} ignored, {} remaining keys",
        summary.processed,
        summary.failed(),
        result.core.len(),
        result.ignored.len(),
        result.remaining.len()
    );
    for path in written {
        eprintln!("  • {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}
