//! Demonstrates pruning a retention window on a file-backed store.
//!
//! Run with: cargo run -p rangedb --example prune_demo

use rangedb::logging::LogConfig;
use rangedb::{FileBackend, FileDbConfig, RangeDb, StoreConfig};
use std::path::Path;

/// Number of most recent slots to keep
const RETENTION: u64 = 8;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = LogConfig::info().init();

    let db_path = "./demo_sidecars";
    if Path::new(db_path).exists() {
        std::fs::remove_dir_all(db_path)?;
    }

    println!("=== RangeDB Prune Demo ===\n");

    {
        let backend = FileBackend::open(FileDbConfig::new(db_path))?;
        let db = RangeDb::new(backend)?;

        for slot in 0..20u64 {
            db.set(slot, b"blob-0", format!("sidecar for slot {}", slot).as_bytes())?;

            // Keep only the last RETENTION slots
            if slot >= RETENTION {
                db.prune_below(slot + 1 - RETENTION)?;
            }
        }

        println!("Floor after ingest: {}", db.floor());
        println!("Slot 5 present:  {}", db.has(5, b"blob-0")?);
        println!("Slot 15 present: {}", db.has(15, b"blob-0")?);
    }

    // Reopen and resume from the recorded floor
    let backend = FileBackend::open(FileDbConfig::new(db_path))?;
    let floor = backend.recorded_floor()?;
    let db = RangeDb::with_config(backend, StoreConfig::default().with_initial_floor(floor))?;
    println!("\nFloor after reopen: {}", db.floor());

    // Late sidecar for an expired slot is dropped
    db.set(3, b"blob-0", b"too late")?;
    println!("Late write to slot 3 visible: {}", db.has(3, b"blob-0")?);

    std::fs::remove_dir_all(db_path)?;
    println!("\n=== Demo Complete ===");
    Ok(())
}
