mod logging;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use exif_rename_core::{
    app_paths, load_config, CollisionFallback, Outcome, Renamer, RunConfig, RunReport,
};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "exif-rename", version)]
#[command(about = "Rename photos and media files after the date they were taken")]
struct Cli {
    /// Files or directories to rename (directories are not descended into).
    /// Put names starting with '-' after `--`.
    paths: Vec<PathBuf>,

    /// Log what would be renamed without touching any file
    #[arg(short = 'd', short_alias = 'D', long)]
    dry_run: bool,

    /// On a name collision, try _2 .. _9 suffixes
    #[arg(short = 'i', short_alias = 'I', long)]
    increment: bool,

    /// Fall back to the file's last-modified time when no date is found
    #[arg(short = 'm', short_alias = 'M', long)]
    last_modified: bool,

    /// Collision handling when --increment is off
    #[arg(long, value_enum)]
    collision: Option<CollisionArg>,

    /// Fail files whose metadata cannot be decoded instead of scanning them
    #[arg(long)]
    strict: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CollisionArg {
    Skip,
    LastModifiedSuffix,
}

impl From<CollisionArg> for CollisionFallback {
    fn from(value: CollisionArg) -> Self {
        match value {
            CollisionArg::Skip => CollisionFallback::Skip,
            CollisionArg::LastModifiedSuffix => CollisionFallback::LastModifiedSuffix,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    debug!("Command arguments {:?}", cli);

    let config = effective_config(&cli)?;
    if cli.show_config {
        return cmd_show_config(&cli, &config);
    }

    let report = Renamer::new(config).run(&cli.paths);
    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report),
    }

    if report.dry_run {
        eprintln!("dry-run mode: no files were changed.");
    }
    Ok(())
}

/// Config file values with the command-line flags layered on top.
fn effective_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    config.dry_run |= cli.dry_run;
    config.use_increment |= cli.increment;
    config.use_last_modified |= cli.last_modified;
    config.strict_metadata |= cli.strict;
    if let Some(collision) = cli.collision {
        config.collision_fallback = collision.into();
    }
    Ok(config)
}

fn cmd_show_config(cli: &Cli, config: &RunConfig) -> Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => app_paths()?.config_path,
    };
    println!("config file: {}", path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn print_table(report: &RunReport) {
    for entry in &report.entries {
        let path = entry.path.display();
        match &entry.outcome {
            Outcome::Renamed { to, source } => println!("{path} -> {} ({source})", to.display()),
            Outcome::WouldRename { to, source } => {
                println!("{path} -> {} ({source}, would rename)", to.display())
            }
            Outcome::AlreadyNamed { source } => println!("{path}: already named ({source})"),
            Outcome::Skipped { taken } => println!("{path}: skipped, {} exists", taken.display()),
            Outcome::Failed { kind, message } => println!("{path}: failed [{kind}] {message}"),
            Outcome::Missing => println!("{path}: missing"),
        }
    }

    let stats = &report.stats;
    println!(
        "\nsummary: renamed={} would_rename={} already_named={} skipped={} failed={} missing={}",
        stats.renamed,
        stats.would_rename,
        stats.already_named,
        stats.skipped,
        stats.failed,
        stats.missing
    );
}
