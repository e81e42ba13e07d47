//! convsync - converting directory synchronizer
//!
//! Keeps a destination tree in sync with a source tree: files in the tracked
//! extensions are converted through an arbitrary external command, other
//! configured extensions are copied verbatim, and destination files with no
//! remaining source counterpart are deleted.

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::style;
use convsync_config::{Config, ConfigLoader};
use convsync_engine::{
    CommandTemplate, ExecutorOptions, OutputGate, RunStatus, SyncExecutor, SyncReport,
};
use convsync_plan::{DiffOptions, ExtRemap, SyncPlanner};
use convsync_types::{ErrorKind, Extension, ExtensionSet};
use std::path::PathBuf;
use tracing::info;

/// convsync - converting directory synchronizer
#[derive(Parser)]
#[command(
    name = "convsync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sync a directory tree while converting tracked file formats",
    long_about = "convsync mirrors a source tree into a destination tree,\n\
                  converting files of the tracked extensions via an external\n\
                  command, copying other configured extensions verbatim, and\n\
                  deleting destination files that no longer correspond to a\n\
                  source file."
)]
struct Cli {
    /// How many workers to use; zero or negative leaves that many cores free
    #[arg(short, long, allow_negative_numbers = true)]
    jobs: Option<i64>,

    /// Compute and print the plan without mutating the filesystem
    #[arg(short, long)]
    dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(long)]
    noconfirm: bool,

    /// Always print captured converter output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - errors only on the log stream
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Comma-separated list of extensions to convert from
    #[arg(short = 'f', long = "from", value_name = "EXTS")]
    from_exts: Option<String>,

    /// Extension to convert to
    #[arg(short = 't', long = "to", value_name = "EXT")]
    to_ext: Option<String>,

    /// Comma-separated list of extensions to copy through verbatim
    #[arg(short = 'c', long = "copy", value_name = "EXTS")]
    copy_exts: Option<String>,

    /// Treat matched files as up to date regardless of timestamps
    #[arg(long)]
    ignore_mtime: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the source library
    source: PathBuf,

    /// Path where converted files should end up
    dest: PathBuf,

    /// Converter command, after `--`; use @source and @dest for the paths
    #[arg(last = true)]
    convert_cmd: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli).context("failed to load configuration")?;
    init_logging(&cli, &config)?;
    if !config.logging.colored_output {
        console::set_colors_enabled(false);
    }

    info!("convsync v{} starting", env!("CARGO_PKG_VERSION"));

    run(cli, config).await
}

/// Load the configuration baseline and fold the command line over it
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load_default()?,
    };

    if let Some(jobs) = cli.jobs {
        config.execution.workers = jobs;
    }
    if cli.dry_run {
        config.execution.dry_run = true;
    }
    if cli.noconfirm {
        config.execution.skip_confirmation = true;
    }
    if cli.verbose {
        config.execution.verbose = true;
    }
    if cli.ignore_mtime {
        config.sync.check_mtime = false;
    }
    if let Some(raw) = &cli.from_exts {
        config.sync.convert_exts = raw.split(',').map(str::to_string).collect();
    }
    if let Some(raw) = &cli.to_ext {
        config.sync.target_ext = Some(raw.clone());
    }
    if let Some(raw) = &cli.copy_exts {
        config.sync.copy_exts = raw.split(',').map(str::to_string).collect();
    }

    Ok(config)
}

fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    // fatal misconfiguration is caught here, before any filesystem mutation
    if !cli.source.is_dir() {
        bail!("source '{}' is not a directory", cli.source.display());
    }
    if !cli.dest.is_dir() {
        bail!("destination '{}' is not a directory", cli.dest.display());
    }

    let template = CommandTemplate::new(cli.convert_cmd.clone())?;

    if config.sync.convert_exts.is_empty() {
        bail!("no extensions to convert from (use --from or the config file)");
    }
    let tracked: ExtensionSet = config
        .sync
        .convert_exts
        .iter()
        .map(Extension::new)
        .collect::<convsync_types::Result<_>>()?;

    let target = match &config.sync.target_ext {
        Some(raw) => Extension::new(raw)?,
        None => bail!("no extension to convert to (use --to or the config file)"),
    };

    let copied: ExtensionSet = config
        .sync
        .copy_exts
        .iter()
        .map(Extension::new)
        .collect::<convsync_types::Result<_>>()?;

    let remap = ExtRemap::to(target);
    let planner = SyncPlanner::new(&cli.source, &cli.dest).with_options(DiffOptions {
        check_mtime: config.sync.check_mtime,
    });
    let conversions = planner.plan(&tracked, &remap)?;
    let copies = planner.plan(&copied, &ExtRemap::identity())?;

    info!(
        convert = conversions.to_create.len(),
        copy = copies.to_create.len(),
        delete = conversions.to_delete.len() + copies.to_delete.len(),
        "plan computed"
    );

    // one explicit console gate, shared by the executor and every worker
    let executor = SyncExecutor::new(
        &cli.source,
        &cli.dest,
        template,
        remap,
        ExecutorOptions::from_config(&config),
    )
    .with_gate(OutputGate::new());

    match executor.execute(conversions, copies).await {
        Ok(report) => {
            if report.status == RunStatus::Completed {
                print_report(&report);
            }
            Ok(())
        }
        // an interrupt ends the run; a later invocation picks up the rest
        Err(e) if e.kind() == ErrorKind::Cancelled => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn print_report(report: &SyncReport) {
    println!();
    println!("{}", style("Sync summary:").bold().underlined());
    println!("  Deleted:   {}", style(report.deleted).red());
    println!("  Copied:    {}", style(report.copied).yellow());
    println!("  Converted: {}", style(report.converted).green());
    println!(
        "  Failed:    {}",
        if report.failed > 0 {
            style(report.failed).red()
        } else {
            style(report.failed).green()
        }
    );
}
