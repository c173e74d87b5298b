//! Waste Collection Monitor CLI

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use wm_core::markers::DirectionsLink;
use wm_core::report::{self, CollectionReport, ReportFormat};
use wm_core::{CollectionRecord, CoreResult, FilterCriteria, NewCollection, SiteCatalog, WasteType};

#[derive(Parser)]
#[command(name = "wm")]
#[command(about = "Waste collection monitoring tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a JSON export of collection records
    Summarize {
        /// Path to the records file
        #[arg(short, long)]
        file: PathBuf,

        /// Output format (json, markdown)
        #[arg(short, long, default_value = "markdown")]
        output: String,

        /// Output file (defaults to stdout)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,

        /// Only this site
        #[arg(long)]
        site: Option<String>,

        /// Only this waste type
        #[arg(long)]
        waste_type: Option<WasteType>,

        /// First collection date, inclusive
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last collection date, inclusive
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Print daily collected volume
    Trend {
        /// Path to the records file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List catalog sites
    Sites {
        /// Site catalog to read instead of the built-in one
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Print a directions link for a site
    Directions {
        /// Site name as listed by `wm sites`
        site: String,
    },

    /// Submit the sample collections to a running server
    Seed {
        /// API base URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set subscriber: {e}");
    }

    let result = match cli.command {
        Commands::Summarize { file, output, output_file, site, waste_type, from, to } => {
            let criteria = FilterCriteria {
                site_name: site,
                waste_type,
                start_date: from,
                end_date: to,
                ..Default::default()
            };
            cmd_summarize(&file, &output, output_file.as_deref(), criteria)
        }
        Commands::Trend { file } => cmd_trend(&file),
        Commands::Sites { catalog } => cmd_sites(catalog.as_deref()),
        Commands::Directions { site } => cmd_directions(&site),
        Commands::Seed { server } => cmd_seed(&server).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn load_records(file: &Path) -> CoreResult<Vec<CollectionRecord>> {
    info!("Reading records from {}", file.display());
    let json = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&json)?)
}

fn cmd_summarize(
    file: &Path,
    output_format: &str,
    output_file: Option<&Path>,
    criteria: FilterCriteria,
) -> CoreResult<()> {
    let format: ReportFormat = output_format.parse()?;
    let records = load_records(file)?;

    let collection_report = CollectionReport::build(&records, criteria)?;
    info!(
        "Summarized {} of {} records",
        collection_report.summary.total_records,
        records.len()
    );

    let content = report::generate_report(&collection_report, format)?;
    match output_file {
        Some(out_path) => {
            std::fs::write(out_path, &content)?;
            info!("Report written to: {}", out_path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn cmd_trend(file: &Path) -> CoreResult<()> {
    let records = load_records(file)?;
    let trend = wm_core::trend(&records)?;

    println!("\nDaily Volume\n{}", "=".repeat(30));
    for (date, volume) in &trend {
        println!("{}  {:>10} t", date, volume);
    }
    println!("{}", "=".repeat(30));
    println!("{} days, {} t", trend.len(), trend.values().copied().sum::<Decimal>());
    Ok(())
}

fn cmd_sites(catalog: Option<&Path>) -> CoreResult<()> {
    let catalog = SiteCatalog::load(catalog)?;

    println!("\nSites\n{}", "=".repeat(50));
    for site in catalog.sites() {
        println!("\n{} [{}]", site.name, site.kind.label());
        println!("  {} ({})", site.category, site.status);
        println!("  Location: {}, {}", site.latitude, site.longitude);
        println!("  Challenges: {}", site.challenges);
    }
    Ok(())
}

fn cmd_directions(site: &str) -> CoreResult<()> {
    let catalog = SiteCatalog::builtin()?;
    let Some(location) = catalog.by_name(site) else {
        return Err(wm_core::CoreError::Catalog(format!("unknown site {site:?}")));
    };

    println!("{}", DirectionsLink::google(location.latitude, location.longitude).url);
    Ok(())
}

/// Three example collections on catalog sites
fn sample_collections(catalog: &SiteCatalog) -> Vec<NewCollection> {
    let samples = [
        ("Rosterman Dumpsite", WasteType::Organic, (2025, 10, 20), "12.5", Some(("8.5", "4.0")), 3),
        ("Khayenga Refuse Chamber", WasteType::Mixed, (2025, 10, 21), "18.3", None, 2),
        ("Lurambi Refuse Chamber", WasteType::Inorganic, (2025, 10, 22), "15.7", Some(("3.2", "12.5")), 1),
    ];

    samples
        .into_iter()
        .filter_map(|(name, waste_type, (y, m, d), total, split, count)| {
            let site = catalog.by_name(name)?;
            let decimal = |raw: &str| raw.parse::<Decimal>().ok();
            Some(NewCollection {
                site_name: site.name.clone(),
                waste_type,
                collection_date: NaiveDate::from_ymd_opt(y, m, d)?,
                total_volume: decimal(total)?,
                waste_separated: split.is_some(),
                organic_volume: split.and_then(|(organic, _)| decimal(organic)),
                inorganic_volume: split.and_then(|(_, inorganic)| decimal(inorganic)),
                collection_count: count,
                latitude: site.latitude,
                longitude: site.longitude,
                comments: None,
            })
        })
        .collect()
}

async fn cmd_seed(server: &str) -> CoreResult<()> {
    let catalog = SiteCatalog::builtin()?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/collections", server.trim_end_matches('/'));
    let samples = sample_collections(&catalog);

    info!("Seeding {} collections into {}", samples.len(), url);
    for sample in &samples {
        let response = client
            .post(&url)
            .json(sample)
            .send()
            .await
            .map_err(|e| wm_core::CoreError::Store(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(wm_core::CoreError::Store(format!(
                "server rejected {}: {} {}",
                sample.site_name, status, body
            )));
        }

        let record: CollectionRecord = response
            .json()
            .await
            .map_err(|e| wm_core::CoreError::Store(e.to_string()))?;
        info!("Created collection {} at {}", record.id, record.site_name);
    }

    println!("Seeded {} collections", samples.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_samples_are_valid() {
        let catalog = SiteCatalog::builtin().unwrap();
        let samples = sample_collections(&catalog);

        assert_eq!(samples.len(), 3);
        for sample in &samples {
            sample.validate().unwrap();
        }
        assert_eq!(samples[0].organic_volume, Some(dec!(8.5)));
        assert!(!samples[1].waste_separated);
    }

    #[test]
    fn test_summarize_args() {
        let cli = Cli::parse_from([
            "wm", "summarize", "-f", "records.json", "--waste-type", "mixed", "--from", "2025-10-20",
        ]);
        match cli.command {
            Commands::Summarize { waste_type, from, .. } => {
                assert_eq!(waste_type, Some(WasteType::Mixed));
                assert_eq!(from, NaiveDate::from_ymd_opt(2025, 10, 20));
            }
            _ => panic!("expected summarize"),
        }
    }
}
