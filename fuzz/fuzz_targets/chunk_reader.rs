#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use rollcdc::{ChunkConfig, Chunker, HashConfig};

fuzz_target!(|data: Vec<u8>| {
    let configs = [
        ChunkConfig::new(4, 16, 64, 256).unwrap(),
        ChunkConfig::default().with_hash_config(HashConfig::sha256()),
    ];

    for config in configs {
        let chunker = Chunker::new(config);

        let fused: Vec<_> = chunker
            .chunk(Cursor::new(&data))
            .collect::<Result<_, _>>()
            .unwrap();
        let two_pass: Vec<_> = chunker
            .assemble(Cursor::new(&data))
            .collect::<Result<_, _>>()
            .unwrap();
        let lengths: Vec<usize> = chunker
            .lengths(Cursor::new(&data))
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(fused, two_pass);
        assert_eq!(fused, chunker.chunk_bytes(&data));
        assert_eq!(lengths, fused.iter().map(|c| c.len()).collect::<Vec<_>>());
    }
});
