#![no_main]

use libfuzzer_sys::fuzz_target;
use rangedb_core::{encode_key, extract_index, split_key};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail cleanly
    if let Ok((index, key)) = split_key(data) {
        let reencoded = encode_key(index, key);
        assert_eq!(extract_index(&reencoded).ok(), Some(index));
    }

    // Every encoded key decodes back to its index and sub-key
    if data.len() >= 8 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&data[..8]);
        let index = u64::from_le_bytes(head);
        let composite = encode_key(index, &data[8..]);
        let (decoded, key) = split_key(&composite).unwrap();
        assert_eq!(decoded, index);
        assert_eq!(key, &data[8..]);
    }
});
