#![no_main]

use libfuzzer_sys::fuzz_target;
use rollcdc::{BoundaryKind, ChunkConfig, ChunkEngine, ChunkHasher, Chunker};

fuzz_target!(|data: Vec<u8>| {
    let configs = [
        ChunkConfig::new(4, 16, 64, 256).unwrap(),
        ChunkConfig::new(16, 64, 256, 1024).unwrap(),
        ChunkConfig::default(),
    ];

    for config in configs {
        let chunks = Chunker::new(config).chunk_bytes(&data);

        // Bounds: only the last chunk may be short.
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(chunk.len() <= config.max_size());
            if i + 1 < chunks.len() {
                assert!(chunk.len() >= config.min_size());
                assert_ne!(chunk.boundary, BoundaryKind::EndOfStream);
            }
            if chunk.boundary == BoundaryKind::Forced {
                assert_eq!(chunk.len(), config.max_size());
            }
        }

        // Completeness and offsets.
        let mut expected_offset = 0u64;
        for chunk in &chunks {
            assert_eq!(chunk.offset, expected_offset);
            expected_offset += chunk.len() as u64;
        }
        assert_eq!(expected_offset, data.len() as u64);

        // Content addressing.
        let algorithm = config.hash_config().algorithm;
        for chunk in &chunks {
            assert_eq!(chunk.hash, ChunkHasher::digest(algorithm, chunk.slice(&data)));
        }

        // Push granularity does not matter.
        let step = (data.first().copied().unwrap_or(1) as usize).max(1);
        let mut engine = ChunkEngine::new(config);
        let mut pushed = Vec::new();
        for piece in data.chunks(step) {
            pushed.extend(engine.push(piece));
        }
        pushed.extend(engine.finish());
        assert_eq!(chunks, pushed);
    }
});
