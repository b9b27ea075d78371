//! File chunking demo.
//!
//! Run with:
//!     cargo run --example sync_file -- /path/to/file

use std::collections::HashSet;
use std::env;
use std::fs::File;

use rollcdc::{BoundaryKind, ChunkConfig, Chunker, format_size};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Chunking file: {}\n", path);

    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    println!("File size: {}\n", format_size(metadata.len()));

    // Larger chunks than the defaults.
    let config = ChunkConfig::new(
        64,         // window
        8 * 1024,   // min: 8 KiB
        32 * 1024,  // avg: 32 KiB
        128 * 1024, // max: 128 KiB
    )?;

    let chunker = Chunker::new(config);

    let mut total_chunks = 0;
    let mut total_bytes = 0;
    let mut forced = 0;
    let mut seen = HashSet::new();

    for chunk in chunker.chunk(file) {
        let chunk = chunk?;
        total_chunks += 1;
        total_bytes += chunk.len();
        if chunk.boundary == BoundaryKind::Forced {
            forced += 1;
        }
        let repeat = if seen.insert(chunk.hash) { "" } else { " (repeat)" };

        println!(
            "Chunk {}: offset={:>10}, len={:>8}, hash={}{}",
            total_chunks, chunk.offset, chunk.len(), chunk.hash, repeat
        );
    }

    println!("\nTotal: {} chunks, {} bytes", total_chunks, total_bytes);
    if total_chunks > 0 {
        println!("Average chunk size: {} bytes", total_bytes / total_chunks);
        println!("Forced cuts: {}, distinct chunks: {}", forced, seen.len());
    }

    Ok(())
}
