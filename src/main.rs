use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use trimbench::config::{BenchConfig, ExitPolicy};
use trimbench::driver::Driver;
use trimbench::error::TrimbenchError;
use trimbench::logging;
use trimbench::sweep::{self, SweepSpec};

/// Command line arguments for trimbench.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (.toml, .yaml, .yml, or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Suite to run; repeatable, default is every suite
    #[arg(long)]
    suite: Vec<String>,

    /// Override the configured repeat count
    #[arg(long)]
    repeats: Option<u32>,

    /// Directory containing the external trimming binaries
    #[arg(long)]
    exec_dir: Option<PathBuf>,

    /// Directory containing the .fastq input files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory receiving per-invocation log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Print commands instead of executing them
    #[arg(long)]
    dry_run: bool,

    /// Skip the page-cache flush between blocks
    #[arg(long)]
    no_cache_flush: bool,

    /// List available suites and exit
    #[arg(long)]
    list_suites: bool,

    /// Write the effective configuration to a file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BenchConfig::load_from_file(path)?,
        None => BenchConfig::default(),
    };
    config.apply_env()?;

    if let Some(repeats) = args.repeats {
        config.run.repeats = repeats;
    }
    if let Some(dir) = args.exec_dir {
        config.paths.exec_dir = dir;
    }
    if let Some(dir) = args.data_dir {
        config.paths.data_dir = dir;
    }
    if let Some(dir) = args.log_dir {
        config.paths.log_dir = dir;
    }
    if args.dry_run {
        config.run.dry_run = true;
    }
    if args.no_cache_flush {
        config.run.drop_cache = false;
    }
    if args.verbose {
        config.logging.level = logging::LogLevel::Debug;
    }
    config.validate()?;

    logging::init(&config.logging);

    let mut suites = sweep::builtin_suites();
    suites.extend(config.extra_suites.iter().cloned());

    if args.list_suites {
        for suite in &suites {
            println!(
                "{:<16} {} ({} grid point{})",
                suite.label,
                suite.program,
                suite.grid_len(),
                if suite.grid_len() == 1 { "" } else { "s" }
            );
        }
        return Ok(());
    }

    if let Some(path) = &args.write_config {
        config.save_to_file(path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let selected: Vec<&SweepSpec> = if args.suite.is_empty() {
        suites.iter().collect()
    } else {
        args.suite
            .iter()
            .map(|label| {
                sweep::find_suite(&suites, label)
                    .ok_or_else(|| TrimbenchError::UnknownSuite(label.clone()))
            })
            .collect::<Result<_, _>>()?
    };

    info!(
        started = %Utc::now().to_rfc3339(),
        suites = selected.len(),
        datasets = config.datasets.len(),
        repeats = config.run.repeats,
        "trimbench session"
    );

    let mut driver = Driver::new(&config);
    let summaries = driver.run_suites(&selected)?;

    let mut failures = 0;
    for (spec, summary) in selected.iter().zip(&summaries) {
        info!(
            suite = %spec.label,
            planned = summary.planned,
            executed = summary.executed,
            failures = summary.failures,
            "summary"
        );
        failures += summary.failures;
    }
    if failures > 0 && config.run.exit_policy == ExitPolicy::Warn {
        bail!("{} invocation(s) exited abnormally; see the logs", failures);
    }
    Ok(())
}
