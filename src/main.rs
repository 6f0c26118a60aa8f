use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row as PrettyRow, Table};
use tracing::info;

use linkage::clustering::{
    cluster_at_thresholds, size_histogram, summarize, ClusterSummary, RunReport,
    ThresholdClusters,
};
use linkage::db::{cluster, records as db_records, Database};
use linkage::matching::{
    score_pairs, MatchWeights, DEFAULT_BLOCKING_RULES, DEFAULT_PROBABILITY_FLOOR,
};
use linkage::records::{
    generate_demo_records, profile, read_records_csv, write_assignments_csv, write_records_csv,
    PersonRecord, DEFAULT_DEMO_SEED,
};
use linkage::{environment, logging, pipeline};

/// Records generated when no input CSV exists yet.
const DEMO_DATASET_SIZE: usize = 1000;

#[derive(Parser)]
#[clap(name = "linkage", about = "Probabilistic record linkage over person datasets")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile a records CSV: totals, missing fields, ground truth
    Explore {
        /// Records CSV; generated on first use when absent
        #[clap(short, long, default_value = "data/fake_persons.csv")]
        input: PathBuf,
    },

    /// Score pairs and cluster at one or more thresholds
    Resolve {
        /// Records CSV; generated on first use when absent
        #[clap(short, long, default_value = "data/fake_persons.csv")]
        input: PathBuf,

        /// Match-probability thresholds to cluster at
        #[clap(short, long, value_delimiter = ',')]
        thresholds: Vec<f64>,

        /// JSON file overriding the default match weights
        #[clap(short, long)]
        weights: Option<PathBuf>,

        /// Directory for the per-threshold assignment CSVs
        #[clap(short, long, default_value = "data")]
        out_dir: PathBuf,

        /// Directory for the JSON run report
        #[clap(long, default_value = "reports")]
        reports_dir: PathBuf,
    },

    /// Load a records CSV into the database
    Seed {
        /// Records CSV; generated on first use when absent
        #[clap(short, long, default_value = "data/fake_persons.csv")]
        input: PathBuf,
    },

    /// Run the full resolution pipeline against the database
    Pipeline {
        /// Match-probability thresholds to cluster at
        #[clap(short, long, value_delimiter = ',')]
        thresholds: Vec<f64>,

        /// JSON file overriding the default match weights
        #[clap(short, long)]
        weights: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging();

    let args = Cli::parse();
    match args.command {
        Commands::Explore { input } => explore(&input)?,
        Commands::Resolve {
            input,
            thresholds,
            weights,
            out_dir,
            reports_dir,
        } => resolve(&input, &thresholds, weights.as_deref(), &out_dir, &reports_dir)?,
        Commands::Seed { input } => seed(&input).await?,
        Commands::Pipeline {
            thresholds,
            weights,
        } => run_pipeline(&thresholds, weights.as_deref()).await?,
    }

    Ok(())
}

/// Load the records CSV, generating and saving the synthetic demo dataset
/// when the file does not exist yet.
fn load_or_generate(path: &Path) -> Result<Vec<PersonRecord>> {
    if path.exists() {
        read_records_csv(path)
    } else {
        info!(
            "{} not found, generating {} demo records",
            path.display(),
            DEMO_DATASET_SIZE
        );
        let records = generate_demo_records(DEMO_DATASET_SIZE, DEFAULT_DEMO_SEED);
        write_records_csv(path, &records)?;
        Ok(records)
    }
}

fn load_weights(path: Option<&Path>) -> Result<MatchWeights> {
    match path {
        Some(path) => MatchWeights::from_json_file(path),
        None => Ok(MatchWeights::default()),
    }
}

fn effective_thresholds(cli_thresholds: &[f64]) -> Vec<f64> {
    if cli_thresholds.is_empty() {
        environment::cluster_thresholds()
    } else {
        cli_thresholds.to_vec()
    }
}

/// Prints a dataset profile table
fn explore(input: &Path) -> Result<()> {
    let records = load_or_generate(input)?;
    let profile = profile(&records);

    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Records"),
        Cell::new("Distinct IDs"),
        Cell::new("No first name"),
        Cell::new("No surname"),
        Cell::new("No DOB"),
        Cell::new("No city"),
        Cell::new("No email"),
        Cell::new("True entities"),
    ]));
    table.add_row(PrettyRow::new(vec![
        Cell::new(&profile.total_records.to_string()),
        Cell::new(&profile.distinct_ids.to_string()),
        Cell::new(&profile.missing_first_name.to_string()),
        Cell::new(&profile.missing_surname.to_string()),
        Cell::new(&profile.missing_dob.to_string()),
        Cell::new(&profile.missing_city.to_string()),
        Cell::new(&profile.missing_email.to_string()),
        Cell::new(
            &profile
                .ground_truth_entities
                .map_or("-".to_string(), |entities| entities.to_string()),
        ),
    ]));
    table.printstd();

    Ok(())
}

/// Scores, clusters and reports on a records CSV without touching the database
fn resolve(
    input: &Path,
    cli_thresholds: &[f64],
    weights_path: Option<&Path>,
    out_dir: &Path,
    reports_dir: &Path,
) -> Result<()> {
    let records = load_or_generate(input)?;
    let weights = load_weights(weights_path)?;
    let thresholds = effective_thresholds(cli_thresholds);

    let edges = score_pairs(
        &records,
        &DEFAULT_BLOCKING_RULES,
        &weights,
        DEFAULT_PROBABILITY_FLOOR,
    );
    let high_confidence = edges.iter().filter(|edge| edge.probability > 0.9).count();
    info!(
        "Found {} high-confidence matches (>90% probability)",
        high_confidence
    );

    let identifiers: HashSet<i64> = records.iter().map(|record| record.unique_id).collect();
    let runs = cluster_at_thresholds(&identifiers, &edges, &thresholds)?;

    let mut summaries = Vec::with_capacity(runs.len());
    for run in &runs {
        let output = out_dir.join(format!("clusters_threshold_{}.csv", run.threshold));
        write_assignments_csv(&output, run)?;
        summaries.push(summarize(run));
    }

    print_summary_table(&summaries);
    print_largest_histogram(runs.last());

    let report = RunReport {
        total_records: records.len(),
        scored_edges: edges.len(),
        summaries,
    };
    write_report(reports_dir, &report)?;

    Ok(())
}

/// Seeds the database from a records CSV
async fn seed(input: &Path) -> Result<()> {
    let records = load_or_generate(input)?;
    let db = Database::new(&environment::database_path()).await?;

    let inserted = db_records::insert_person_records(&db, &records).await?;
    let total = db_records::count_person_records(&db).await?;
    println!(
        "Seeded {} new records ({} total in {})",
        inserted,
        total,
        environment::database_path()
    );

    Ok(())
}

/// Runs the daily pipeline job end to end
async fn run_pipeline(cli_thresholds: &[f64], weights_path: Option<&Path>) -> Result<()> {
    let weights = load_weights(weights_path)?;
    let thresholds = effective_thresholds(cli_thresholds);
    let db = Database::new(&environment::database_path()).await?;

    let report = pipeline::run_daily_pipeline(&db, &weights, &thresholds).await?;
    print_summary_table(&report.summaries);

    for &threshold in &thresholds {
        let (assigned, clusters) = cluster::assignment_stats(&db, threshold).await?;
        println!(
            "Threshold {}: {} persisted assignments across {} clusters",
            threshold, assigned, clusters
        );
    }

    Ok(())
}

/// Prints per-threshold cluster statistics as a table
fn print_summary_table(summaries: &[ClusterSummary]) {
    let mut table = Table::new();
    table.add_row(PrettyRow::new(vec![
        Cell::new("Threshold"),
        Cell::new("Clusters"),
        Cell::new("Multi-record"),
        Cell::new("Singletons"),
        Cell::new("Largest"),
    ]));

    for summary in summaries {
        table.add_row(PrettyRow::new(vec![
            Cell::new(&summary.threshold.to_string()),
            Cell::new(&summary.total_clusters.to_string()),
            Cell::new(&summary.multi_record_clusters.to_string()),
            Cell::new(&summary.singleton_clusters.to_string()),
            Cell::new(&summary.largest_cluster_size.to_string()),
        ]));
    }

    table.printstd();
}

/// Prints the cluster-size histogram for the loosest threshold
fn print_largest_histogram(run: Option<&ThresholdClusters<i64>>) {
    let Some(run) = run else {
        return;
    };

    println!("Cluster sizes at threshold {}:", run.threshold);
    for (size, count) in size_histogram(&run.assignments) {
        println!("  {:>3} members: {} clusters", size, count);
    }
}

fn write_report(reports_dir: &Path, report: &RunReport) -> Result<()> {
    fs::create_dir_all(reports_dir)
        .with_context(|| format!("Failed to create {}", reports_dir.display()))?;
    let path = reports_dir.join("run_summary.json");
    let raw = serde_json::to_string_pretty(report)?;
    fs::write(&path, raw).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Run report saved to {}", path.display());
    Ok(())
}
