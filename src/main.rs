//! rollcdc - print the content-defined chunks of a file.
//!
//! Output on stdout is the file size, the chunk count and one hex digest
//! per chunk. Logs go to stderr.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rollcdc::{
    ChunkConfig, ChunkReport, Chunker, DEFAULT_AVG_CHUNK_SIZE, DEFAULT_MAX_CHUNK_SIZE,
    DEFAULT_MIN_CHUNK_SIZE, DEFAULT_WINDOW_SIZE, HashConfig,
};

/// Split a file into content-defined chunks and list their digests.
#[derive(Parser)]
#[command(name = "rollcdc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to chunk
    path: PathBuf,

    /// Rolling hash window in bytes
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window: usize,

    /// Minimum chunk size in bytes
    #[arg(long, default_value_t = DEFAULT_MIN_CHUNK_SIZE)]
    min: usize,

    /// Target average chunk size in bytes
    #[arg(long, default_value_t = DEFAULT_AVG_CHUNK_SIZE)]
    avg: usize,

    /// Maximum chunk size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_SIZE)]
    max: usize,

    /// Name chunks by SHA-256 instead of BLAKE3
    #[arg(long)]
    sha256: bool,

    /// Find boundaries and hash chunks in separate passes
    #[arg(long)]
    two_pass: bool,

    /// Verbosity level (-v, -vv, -vvv), overridden by RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Default log directive for a `-v` count.
fn verbosity_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(cli.verbose)));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;

    let hash = if cli.sha256 {
        HashConfig::sha256()
    } else {
        HashConfig::blake3()
    };
    let config = ChunkConfig::new(cli.window, cli.min, cli.avg, cli.max)
        .context("Invalid chunking parameters")?
        .with_hash_config(hash);
    info!(%config, path = %cli.path.display(), "chunking");

    let report = if cli.two_pass {
        let file = File::open(&cli.path)
            .with_context(|| format!("Failed to open {}", cli.path.display()))?;
        Chunker::new(config)
            .assemble(file)
            .collect::<Result<Vec<_>, _>>()
            .map(ChunkReport::from_chunks)
    } else {
        ChunkReport::from_path(&cli.path, config)
    }
    .with_context(|| format!("Failed to chunk {}", cli.path.display()))?;

    info!(
        chunks = report.chunks.len(),
        unique = report.unique_chunks(),
        ratio = report.dedup_ratio(),
        "done"
    );

    let mut stdout = io::stdout().lock();
    write!(stdout, "{report}").context("Failed to write report")?;
    stdout.flush().context("Failed to write report")?;

    Ok(())
}
