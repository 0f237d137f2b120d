#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rangedb::{MemoryBackend, RangeDb};

#[derive(Arbitrary, Debug)]
enum RangeOp {
    Set { index: u8, key: Vec<u8>, value: Vec<u8> },
    Get { index: u8, key: Vec<u8> },
    Delete { index: u8, key: Vec<u8> },
    Prune { start: u8, end: u8 },
}

fuzz_target!(|ops: Vec<RangeOp>| {
    let Ok(db) = RangeDb::new(MemoryBackend::new()) else {
        return;
    };

    let mut floor = db.floor();
    for op in ops.iter().take(100) { // Limit operations to prevent timeout
        match op {
            RangeOp::Set { index, key, value } => {
                let index = u64::from(*index);
                if key.len() <= 256 && value.len() <= 1024 {
                    db.set(index, key, value).unwrap();
                    let expected = (index >= db.floor()).then(|| value.clone());
                    assert_eq!(db.get(index, key).unwrap(), expected);
                }
            }
            RangeOp::Get { index, key } => {
                let index = u64::from(*index);
                let found = db.get(index, key).unwrap();
                if index < db.floor() {
                    assert!(found.is_none());
                }
            }
            RangeOp::Delete { index, key } => {
                let index = u64::from(*index);
                db.delete(index, key).unwrap();
                assert!(!db.has(index, key).unwrap());
            }
            RangeOp::Prune { start, end } => {
                let result = db.prune(u64::from(*start), u64::from(*end));
                assert_eq!(result.is_ok(), start < end);
            }
        }

        assert!(db.floor() >= floor);
        floor = db.floor();
    }
});
