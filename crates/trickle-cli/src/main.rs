/// trickle command-line tool: stream zlib files through fixed-size buffers.
///
/// # Command overview
///
/// ```text
/// trickle <COMMAND> [OPTIONS]
///
/// Commands:
///   inflate    Decode a zlib file in pull or push mode
///   stats      Decode a zlib file and report streaming statistics
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log driver activity to stderr (-v debug, -vv trace)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                      |
/// |------|----------------------------------------------|
/// | 0    | Success                                      |
/// | 1    | Error (I/O failure, corrupt stream, etc.)    |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cmd_inflate;
mod cmd_stats;
mod source;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decode zlib streams with bounded memory.
#[derive(Parser)]
#[command(name = "trickle", version, about = "Fixed-buffer streaming zlib decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log driver activity to stderr; repeat for per-step tracing.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode a zlib file to stdout or a file.
    Inflate(InflateArgs),
    /// Decode a zlib file, discard the output, and report statistics.
    Stats(StatsArgs),
}

/// Which streaming contract drives the decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Request decoded bytes; the stream asks for compressed chunks.
    Pull,
    /// Write compressed chunks; the stream hands back decoded windows.
    Push,
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `trickle inflate`.
///
/// ```text
/// ┌───────────────┬───────────────────────────────────────────────────────┐
/// │ Flag          │ Effect                                                │
/// ├───────────────┼───────────────────────────────────────────────────────┤
/// │ --mode        │ pull (default) | push                                 │
/// │ --chunk N     │ compressed bytes per read from FILE (pull caps at 4K) │
/// │ --read N      │ decoded bytes per request (pull only)                 │
/// │ -o / --output │ write to file instead of stdout                       │
/// └───────────────┴───────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InflateArgs {
    /// Path to the zlib-framed input file.
    pub file: PathBuf,

    /// Exact size of the decoded stream in bytes.
    #[arg(long)]
    pub decoded_size: usize,

    #[arg(long, value_enum, default_value_t = ModeArg::Pull)]
    pub mode: ModeArg,

    /// Compressed bytes handed to the stream at a time.
    #[arg(long, default_value_t = trickle_stream::DEFAULT_CHUNK_SIZE)]
    pub chunk: usize,

    /// Decoded bytes requested per read in pull mode.
    #[arg(long, default_value_t = 512)]
    pub read: usize,

    /// Write decoded output to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `trickle stats`.
///
/// Runs the file through push mode, discards the decoded bytes, and prints
/// the counters the stream collected along the way.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Path to the zlib-framed input file.
    pub file: PathBuf,

    /// Exact size of the decoded stream in bytes.
    #[arg(long)]
    pub decoded_size: usize,

    /// Compressed bytes handed to the stream at a time.
    #[arg(long, default_value_t = trickle_stream::DEFAULT_CHUNK_SIZE)]
    pub chunk: usize,

    /// Emit JSON instead of a text table.
    #[arg(long)]
    pub json: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install log subscriber: {e}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Inflate(args) => cmd_inflate::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
