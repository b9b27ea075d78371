// Integration tests for the chunking front ends
// Tests cover: completeness, bounds, determinism, content addressing,
// local-edit stability, the two-pass path and the report

use std::io::{self, Cursor, Read};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rollcdc::{
    BoundaryKind, Chunk, ChunkConfig, ChunkEngine, ChunkError, ChunkHasher, ChunkReport, Chunker,
    HashAlgorithm, HashConfig,
};

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

fn chunk_all(config: ChunkConfig, data: &[u8]) -> Vec<Chunk> {
    Chunker::new(config)
        .chunk(Cursor::new(data))
        .collect::<Result<_, _>>()
        .expect("in-memory reads cannot fail")
}

fn lengths(chunks: &[Chunk]) -> Vec<usize> {
    chunks.iter().map(|c| c.len()).collect()
}

/// Hands out at most one byte per read.
struct ByteAtATime<'a>(&'a [u8]);

impl Read for ByteAtATime<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_input() {
    let chunker = Chunker::default();

    assert!(chunker.chunk_bytes(b"").is_empty(), "Empty input must yield no chunks");
    assert_eq!(chunker.chunk(Cursor::new(Vec::new())).count(), 0);
    assert_eq!(chunker.lengths(&b""[..]).count(), 0);
    assert_eq!(chunker.assemble(&b""[..]).count(), 0);
}

#[test]
fn test_input_shorter_than_min() {
    let data = random_bytes(1, 100);
    let chunks = chunk_all(ChunkConfig::default(), &data);

    assert_eq!(chunks.len(), 1, "Short input is a single chunk");
    assert_eq!(chunks[0].len(), 100);
    assert_eq!(chunks[0].boundary, BoundaryKind::EndOfStream);
}

#[test]
fn test_completeness() {
    let data = random_bytes(2, 200_000);
    let chunks = chunk_all(ChunkConfig::default(), &data);

    let total: usize = chunks.iter().map(|c| c.len()).sum();
    assert_eq!(total, data.len(), "Chunk lengths must sum to the input size");

    let rebuilt: Vec<u8> = chunks.iter().flat_map(|c| c.slice(&data).to_vec()).collect();
    assert_eq!(rebuilt, data, "Concatenated chunks must reproduce the input");

    let mut expected_offset = 0u64;
    for chunk in &chunks {
        assert_eq!(chunk.offset, expected_offset, "Chunks must be contiguous");
        expected_offset = chunk.end();
    }
}

#[test]
fn test_bounding() {
    let config = ChunkConfig::default();
    let data = random_bytes(3, 300_000);
    let chunks = chunk_all(config, &data);

    let (last, rest) = chunks.split_last().expect("input is not empty");
    for chunk in rest {
        assert!(chunk.len() >= config.min_size(), "Chunk below min_size: {}", chunk);
        assert!(chunk.len() <= config.max_size(), "Chunk above max_size: {}", chunk);
        assert_ne!(chunk.boundary, BoundaryKind::EndOfStream);
    }
    assert!(last.len() <= config.max_size());
}

#[test]
fn test_average_size_near_avg() {
    let config = ChunkConfig::default();
    let data = random_bytes(4, 8 << 20);
    let chunks = chunk_all(config, &data);

    let mean = data.len() as f64 / chunks.len() as f64;
    let avg = config.avg_size() as f64;
    assert!(
        (mean - avg).abs() / avg < 0.15,
        "Mean chunk size {:.0} more than 15% away from {}",
        mean,
        avg
    );

    let content = chunks
        .iter()
        .filter(|c| c.boundary == BoundaryKind::Content)
        .count();
    assert!(content > chunks.len() / 2, "Random data should mostly cut on content");
}

#[test]
fn test_ten_kilobyte_example() {
    let data = random_bytes(18, 10_000);
    let count = chunk_all(ChunkConfig::default(), &data).len();
    assert!((3..=7).contains(&count), "{} chunks for 10 kB", count);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_determinism_across_runs() {
    let data = random_bytes(5, 100_000);
    let first = chunk_all(ChunkConfig::default(), &data);
    let second = chunk_all(ChunkConfig::default(), &data);

    assert_eq!(first, second, "Same bytes and config must give the same chunks");
}

#[test]
fn test_determinism_across_read_sizes() {
    let config = ChunkConfig::new(8, 32, 128, 512).unwrap();
    let data = random_bytes(6, 20_000);
    let expected = chunk_all(config, &data);

    let trickled: Vec<_> = Chunker::new(config)
        .chunk(ByteAtATime(&data))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(expected, trickled, "Reader granularity must not change chunks");

    for step in [3, 100, 4096, 65_536] {
        let mut engine = ChunkEngine::new(config);
        let mut pushed = Vec::new();
        for piece in data.chunks(step) {
            pushed.extend(engine.push(piece));
        }
        pushed.extend(engine.finish());
        assert_eq!(expected, pushed, "Push size {} changed the chunks", step);
    }
}

#[test]
fn test_parameters_change_boundaries() {
    let data = random_bytes(7, 50_000);
    let base = chunk_all(ChunkConfig::default(), &data);
    let other = chunk_all(ChunkConfig::default().with_polynomial(0x3DA3_358B_4DC1_73), &data);

    assert_ne!(lengths(&base), lengths(&other), "A different polynomial moves the boundaries");
}

// ============================================================================
// Content Addressing
// ============================================================================

#[test]
fn test_digest_matches_chunk_bytes() {
    let data = random_bytes(8, 40_000);
    for (algorithm, hash) in [
        (HashAlgorithm::Blake3, HashConfig::blake3()),
        (HashAlgorithm::Sha256, HashConfig::sha256()),
    ] {
        let chunks = chunk_all(ChunkConfig::default().with_hash_config(hash), &data);
        for chunk in &chunks {
            assert_eq!(chunk.hash, ChunkHasher::digest(algorithm, chunk.slice(&data)));
        }
    }
}

#[test]
fn test_repeated_content_shares_digests() {
    let block = random_bytes(9, 60_000);
    let mut data = block.clone();
    data.extend_from_slice(&block);

    let report: ChunkReport = chunk_all(ChunkConfig::default(), &data).into_iter().collect();
    assert!(
        report.unique_chunks() < report.chunks.len(),
        "A repeated block must repeat chunk digests"
    );
    assert!(report.dedup_ratio() > 1.5);
}

#[test]
fn test_algorithms_disagree() {
    let data = random_bytes(10, 10_000);
    let blake = chunk_all(ChunkConfig::default(), &data);
    let sha = chunk_all(ChunkConfig::default().with_hash_config(HashConfig::sha256()), &data);

    assert_eq!(lengths(&blake), lengths(&sha), "Digest choice must not move boundaries");
    assert_ne!(blake[0].hash, sha[0].hash);
}

// ============================================================================
// Forced Boundaries
// ============================================================================

#[test]
fn test_single_forced_boundary() {
    let config = ChunkConfig::default();
    let max = config.max_size();

    let exact = chunk_all(config, &vec![0u8; max]);
    assert_eq!(lengths(&exact), vec![max]);
    assert_eq!(exact[0].boundary, BoundaryKind::Forced);

    let longer = chunk_all(config, &vec![0u8; max + 10]);
    assert_eq!(lengths(&longer), vec![max, 10]);
    assert_eq!(longer[0].boundary, BoundaryKind::Forced);
    assert_eq!(longer[1].boundary, BoundaryKind::EndOfStream);
}

#[test]
fn test_zeros_example() {
    let chunks = chunk_all(ChunkConfig::default(), &[0u8; 10_000]);

    assert_eq!(lengths(&chunks), vec![4096, 4096, 1808]);
    assert_eq!(chunks[0].hash, chunks[1].hash);
    assert_ne!(chunks[1].hash, chunks[2].hash);
}

// ============================================================================
// Local-Edit Stability
// ============================================================================

#[test]
fn test_append_keeps_all_but_last() {
    let data = random_bytes(11, 10_000);
    let base = chunk_all(ChunkConfig::default(), &data);
    assert!(base.len() >= 2, "10 kB of random data spans several chunks");

    let mut appended = data.clone();
    appended.push(0x42);
    let grown = chunk_all(ChunkConfig::default(), &appended);

    let keep = base.len() - 1;
    assert_eq!(base[..keep], grown[..keep], "Only the last chunk may change");
}

#[test]
fn test_insert_resynchronizes() {
    let mut rng = StdRng::seed_from_u64(12);
    let data = random_bytes(13, 100_000);
    let at = 50_000;

    let mut edited = data[..at].to_vec();
    let insert: Vec<u8> = (0..rng.gen_range(1..200)).map(|_| rng.r#gen()).collect();
    edited.extend_from_slice(&insert);
    edited.extend_from_slice(&data[at..]);

    let base = chunk_all(ChunkConfig::default(), &data);
    let after = chunk_all(ChunkConfig::default(), &edited);

    // Everything that ends before the edit is untouched.
    let prefix = base.iter().take_while(|c| c.end() <= at as u64).count();
    assert!(prefix > 0);
    assert_eq!(base[..prefix], after[..prefix]);

    // The tail falls back in step, shifted by the insertion.
    let tail = 10;
    let shift = insert.len() as u64;
    for (old, new) in base.iter().rev().zip(after.iter().rev()).take(tail) {
        assert_eq!(old.hash, new.hash);
        assert_eq!(old.len(), new.len());
        assert_eq!(old.offset + shift, new.offset);
    }

    let missing = base
        .iter()
        .filter(|c| !after.iter().any(|n| n.hash == c.hash))
        .count();
    assert!(missing <= 8, "{} of {} chunks changed", missing, base.len());
}

/// Random bytes with `keep` applied to each, then one byte inserted early.
fn insert_survival(keep: u8) -> (Vec<Chunk>, usize) {
    let mut data = random_bytes(19, 256 * 1024);
    for b in &mut data {
        *b &= keep;
    }
    let mut edited = data.clone();
    edited.insert(1000, 0x40 & keep);

    let base = chunk_all(ChunkConfig::default(), &data);
    let after = chunk_all(ChunkConfig::default(), &edited);
    let missing = base
        .iter()
        .filter(|c| !after.iter().any(|n| n.hash == c.hash))
        .count();
    (base, missing)
}

#[test]
fn test_constant_low_bits_still_cut_on_content() {
    for keep in [0xFE, 0xF0, 0x80 | 0x40 | 0x20] {
        let (base, missing) = insert_survival(keep);

        let content = base
            .iter()
            .filter(|c| c.boundary == BoundaryKind::Content)
            .count();
        assert!(
            content > base.len() / 2,
            "mask {:#04x}: {} content cuts out of {}",
            keep,
            content,
            base.len()
        );
        assert!(
            missing <= 8,
            "mask {:#04x}: {} of {} chunks lost to a 1-byte insert",
            keep,
            missing,
            base.len()
        );
    }
}

#[test]
fn test_delete_resynchronizes() {
    let data = random_bytes(14, 100_000);
    let mut edited = data.clone();
    edited.drain(30_000..30_100);

    let base = chunk_all(ChunkConfig::default(), &data);
    let after = chunk_all(ChunkConfig::default(), &edited);

    for (old, new) in base.iter().rev().zip(after.iter().rev()).take(10) {
        assert_eq!(old.hash, new.hash);
        assert_eq!(old.offset, new.offset + 100);
    }
}

// ============================================================================
// Two-Pass Assembly
// ============================================================================

#[test]
fn test_two_pass_matches_fused() {
    let data = random_bytes(15, 150_000);
    for hash in [HashConfig::blake3(), HashConfig::sha256()] {
        let config = ChunkConfig::default().with_hash_config(hash);
        let chunker = Chunker::new(config);

        let two_pass: Vec<_> = chunker
            .assemble(ByteAtATime(&data))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(two_pass, chunk_all(config, &data));

        let lens: Vec<usize> = chunker
            .lengths(&data[..])
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lens, lengths(&two_pass));
    }
}

#[test]
fn test_disagreeing_replay_is_fatal() {
    let data = random_bytes(16, 20_000);
    let chunker = Chunker::default();

    let replay = &data[..data.len() - 1];
    let assembler = rollcdc::ChunkStreamAssembler::new(
        chunker.lengths(&data[..]),
        replay,
        HashAlgorithm::Blake3,
    );

    let results: Vec<_> = assembler.collect();
    let (last, rest) = results.split_last().unwrap();
    assert!(rest.iter().all(Result::is_ok));
    match last {
        Err(ChunkError::TruncatedStream { expected, actual, .. }) => {
            assert_eq!(*actual + 1, *expected);
        }
        other => panic!("expected TruncatedStream, got {:?}", other),
    }
}

// ============================================================================
// Report
// ============================================================================

#[test]
fn test_report_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.bin");
    let data = random_bytes(17, 12_345);
    std::fs::write(&path, &data).unwrap();

    let report = ChunkReport::from_path(&path, ChunkConfig::default()).unwrap();
    let text = report.to_string();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("12 kB"));
    assert_eq!(lines.next(), Some(report.chunks.len().to_string().as_str()));
    let hexes: Vec<&str> = lines.collect();
    assert_eq!(hexes.len(), report.chunks.len());
    for (line, chunk) in hexes.iter().zip(&report.chunks) {
        assert_eq!(*line, chunk.hash.to_hex());
    }
}

#[test]
fn test_report_missing_file() {
    let err = ChunkReport::from_path("/nonexistent/rollcdc/input", ChunkConfig::default())
        .unwrap_err();
    assert!(matches!(err, ChunkError::SourceUnavailable { .. }));
    assert!(err.offset().is_none());
}
