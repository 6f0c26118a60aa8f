use anyhow::Result;
use linkage::records::{generate_demo_records, write_records_csv, DEFAULT_DEMO_SEED};
use std::env;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Utility to create a synthetic person dataset CSV for linkage runs.
///
/// The output carries a ground-truth `cluster` column so resolution results
/// can be checked against it.
///
/// Usage:
///    cargo run --bin generate_demo_data -- OUTPUT_CSV [NUM_RECORDS] [SEED]
///
/// Example:
///    cargo run --bin generate_demo_data -- data/fake_persons.csv 1000
///
/// Parameters:
///    OUTPUT_CSV: Where to write the dataset
///    NUM_RECORDS: Number of records to generate (default: 1000)
///    SEED: RNG seed; the same seed reproduces the same dataset (default: 42)

fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set default subscriber");

    // Get command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 4 {
        eprintln!("Usage: {} OUTPUT_CSV [NUM_RECORDS] [SEED]", args[0]);
        eprintln!("Example: {} data/fake_persons.csv 1000 42", args[0]);
        std::process::exit(1);
    }

    let output = PathBuf::from(&args[1]);
    let size: usize = args.get(2).map_or(1000, |s| s.parse().unwrap_or(1000));
    let seed: u64 = args
        .get(3)
        .map_or(DEFAULT_DEMO_SEED, |s| s.parse().unwrap_or(DEFAULT_DEMO_SEED));

    let records = generate_demo_records(size, seed);
    write_records_csv(&output, &records)?;

    info!(
        "Successfully wrote {} records to {}",
        records.len(),
        output.display()
    );
    info!(
        "To resolve them, run: cargo run -- resolve --input {}",
        output.display()
    );

    Ok(())
}
