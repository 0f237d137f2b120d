// Floor invariants: nothing is visible below the floor, and the floor never
// moves backwards, across sequential and concurrent workloads.

mod common;

use common::*;
use rangedb::{encode_key, Backend, MemoryBackend, RangeDb};
use std::sync::Arc;
use std::thread;

#[test]
fn test_populate_from_empty() {
    let db = memory_db();
    populate(&db, 1, 5).unwrap();
    require_empty_below_floor(&db);
    assert_eq!(db.floor(), 0);
}

#[test]
fn test_delete_from_populated() {
    let db = memory_db();
    populate(&db, 1, 5).unwrap();
    let _ = db.delete(2, KEY);
    require_empty_below_floor(&db);
    assert_eq!(db.floor(), 0);
}

#[test]
fn test_prune_from_populated() {
    let db = memory_db();
    populate(&db, 1, 10).unwrap();
    let _ = db.prune(0, 3);
    assert_eq!(db.floor(), 3);
    require_empty_below_floor(&db);
}

#[test]
fn test_populate_prune_populate_round_trip() {
    let db = memory_db();
    populate(&db, 1, 30).unwrap();
    db.prune(0, 25).unwrap();

    // Re-populating pruned indices must not bring them back
    populate(&db, 5, 10).unwrap();

    require_empty_below_floor(&db);
    require_exist(&db, 25, 30);
}

#[test]
fn test_floor_is_monotonic_over_a_sequence() {
    let db = memory_db();
    populate(&db, 0, 100).unwrap();

    let mut last = db.floor();
    for (start, end) in [(10, 20), (0, 5), (30, 40), (7, 2), (15, 35), (50, 51)] {
        let _ = db.prune(start, end);
        let floor = db.floor();
        assert!(floor >= last, "floor went from {} to {}", last, floor);
        last = floor;
    }

    assert_eq!(last, 51);
    require_empty_below_floor(&db);
    require_exist(&db, 51, 100);
}

#[test]
fn test_concurrent_prunes_keep_maximum_floor() {
    let db = Arc::new(memory_db());
    populate(&db, 0, 400).unwrap();

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                let mut seen = 0;
                for step in 0..25u64 {
                    let end = t * 40 + step + 1;
                    db.prune(end - 1, end).unwrap();
                    let floor = db.floor();
                    assert!(floor >= seen);
                    seen = floor;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Largest end any thread pruned to
    assert_eq!(db.floor(), 7 * 40 + 25);
    require_empty_below_floor(&db);
    require_exist(&db, 305, 400);
}

#[test]
fn test_writes_racing_prunes_stay_hidden() {
    let db = Arc::new(RangeDb::new(MemoryBackend::new()).unwrap());

    thread::scope(|scope| {
        for t in 0..4u64 {
            let db = Arc::clone(&db);
            scope.spawn(move || {
                for index in 0..500u64 {
                    db.set(index, &t.to_be_bytes(), VALUE).unwrap();
                }
            });
        }

        let db = Arc::clone(&db);
        scope.spawn(move || {
            for end in (10..=250u64).step_by(10) {
                db.prune(end - 10, end).unwrap();
            }
        });
    });

    assert_eq!(db.floor(), 250);
    for index in 0..250u64 {
        for t in 0..4u64 {
            assert!(!db.has(index, &t.to_be_bytes()).unwrap(), "index {}", index);
        }
    }
    for index in 250..500u64 {
        for t in 0..4u64 {
            assert!(db.has(index, &t.to_be_bytes()).unwrap(), "index {}", index);
        }
    }
}

#[test]
fn test_file_backend_writes_racing_prunes_succeed() {
    let fixture = FileFixture::new();
    let db = &fixture.db;

    thread::scope(|scope| {
        for t in 0..4u32 {
            scope.spawn(move || {
                for n in 0..300u32 {
                    let key = [t.to_be_bytes(), n.to_be_bytes()].concat();
                    db.set(db.floor(), &key, VALUE).unwrap();
                }
            });
        }

        scope.spawn(|| {
            for end in 1..=300u64 {
                db.prune(end - 1, end).unwrap();
            }
        });
    });

    assert_eq!(db.floor(), 300);
    assert_eq!(db.backend().recorded_floor().unwrap(), 300);
    for index in 0..300u64 {
        for t in 0..4u32 {
            for n in 0..300u32 {
                let key = [t.to_be_bytes(), n.to_be_bytes()].concat();
                assert!(!db.backend().has(&encode_key(index, &key)).unwrap());
            }
        }
    }
}

#[test]
fn test_write_between_deletion_and_floor_update_is_swept() {
    let db = RangeDb::new(GatedBackend::new()).unwrap();
    db.set(5, KEY, b"old").unwrap();

    thread::scope(|scope| {
        let pruner = scope.spawn(|| db.prune(0, 10));

        // The range is deleted but the floor has not moved yet
        db.backend().deleted.wait();
        assert_eq!(db.floor(), 0);
        db.set(5, KEY, VALUE).unwrap();
        assert!(db.backend().inner.has(&encode_key(5, KEY)).unwrap());
        db.backend().resume.wait();

        pruner.join().unwrap().unwrap();
    });

    assert_eq!(db.floor(), 10);
    assert!(!db.has(5, KEY).unwrap());
    assert!(!db.backend().inner.has(&encode_key(5, KEY)).unwrap());
}
