//! hdrtone - HDR to LDR tone mapping CLI
//!
//! Reads Radiance HDR files and writes 16-bit PNG using iCAM06.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hdrtone")]
#[command(author, version, about = "HDR tone mapping with the iCAM06 appearance model")]
#[command(long_about = "
Tone maps high dynamic range images into 16-bit display PNG.

Examples:
  hdrtone info memorial.hdr                  # Show header and luminance stats
  hdrtone icam06 memorial.hdr -o out.png     # Tone map with defaults
  hdrtone icam06 in.hdr -o out.png --contrast 0.8 --max-clip 0.995
  hdrtone -j 4 -v icam06 in.hdr -o out.png --tile-rows 64
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Write the log to this file instead of stderr
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Display HDR header and luminance statistics
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Tone map an HDR image with iCAM06
    #[command(visible_alias = "tm")]
    Icam06(Icam06Args),
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Input HDR files
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Show luminance statistics
    #[arg(short, long)]
    stats: bool,
}

/// Arguments for the `icam06` command.
#[derive(Args)]
struct Icam06Args {
    /// Input HDR image
    input: PathBuf,

    /// Output PNG (default: input with .png extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Contrast exponent, clamped to [0.6, 0.85]
    #[arg(short, long, default_value_t = hdrtone_tmo::DEFAULT_CONTRAST)]
    contrast: f64,

    /// Black point percentile, clamped to [0, 1]
    #[arg(long, default_value_t = hdrtone_tmo::DEFAULT_MIN_CLIPPING)]
    min_clip: f64,

    /// White point percentile, clamped to [0, 1]
    #[arg(long, default_value_t = hdrtone_tmo::DEFAULT_MAX_CLIPPING)]
    max_clip: f64,

    /// Rows per parallel tile
    #[arg(long, default_value_t = hdrtone_ops::DEFAULT_TILE_ROWS)]
    tile_rows: u32,

    /// Divide pixels by the file's EXPOSURE header first
    #[arg(long)]
    undo_exposure: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log.as_ref())?;

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Icam06(args) => commands::icam06::run(args, cli.verbose, cli.threads),
    }
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(
    verbose: u8,
    log: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    match log {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir.unwrap_or(Path::new(".")), name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
