//! eligis CLI - renewable-energy land eligibility from raster layers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use eligis_algorithms::eligibility::{determine_eligibility, EligibilityParams};
use eligis_algorithms::statistics::{eligible_areas, AreaParams, AreaReport};
use eligis_core::io::{read_geotiff, write_geotiff, GeoTiffOptions};
use eligis_core::{Raster, RasterElement};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "eligis")]
#[command(author, version, about = "Renewable-energy land eligibility from raster layers")]
#[command(long_about = "Renewable-energy land eligibility from raster layers.\n\n\
Classification takes its five paths under the `eligibility` subcommand:\n  \
eligis eligibility <LAND_COVER> <PROTECTED_AREAS> <SLOPE> <BATHYMETRY> <OUTPUT> [--strict]")]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Classify land into eligibility categories (0, 80, 150, 200, 250)
    Eligibility {
        /// GlobCover land cover raster
        land_cover: PathBuf,
        /// Protected areas raster (255 protected, 0 not protected)
        protected_areas: PathBuf,
        /// Slope raster in degrees
        slope: PathBuf,
        /// Bathymetry raster in metres
        bathymetry: PathBuf,
        /// Output eligibility raster
        output: PathBuf,
        /// Fail on land cover or protection codes outside their enumerations
        #[arg(long)]
        strict: bool,
    },
    /// Report eligible area per category of an eligibility raster
    Areas {
        /// Eligibility raster
        input: PathBuf,
        /// Length of one projected map unit in metres
        #[arg(long, default_value = "1.0")]
        unit_m: f64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_layer<T: RasterElement>(path: &Path, layer: &str) -> Result<Raster<T>> {
    let pb = spinner(&format!("Reading {}...", layer));
    let raster: Raster<T> = read_geotiff(path, None)
        .with_context(|| format!("Failed to read {} raster {}", layer, path.display()))?;
    pb.finish_and_clear();
    info!("{}: {} x {}", layer, raster.cols(), raster.rows());
    Ok(raster)
}

fn write_result(raster: &Raster<u8>, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geotiff(raster, path, Some(GeoTiffOptions::default()))
        .with_context(|| format!("Failed to write output {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn print_areas(report: &AreaReport) {
    println!("{:<42} {:>12} {:>14}", "Property", "Cells", "Area (km²)");
    for area in &report.areas {
        println!(
            "{:<42} {:>12} {:>14.3}",
            area.property_name, area.pixel_count, area.area_km2
        );
    }
    println!("{:<42} {:>12} {:>14.3}", "total", "", report.total_km2());
    if report.unclassified_cells > 0 {
        println!("Unclassified cells: {}", report.unclassified_cells);
    }
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Info { input } => {
            let raster: Raster<f64> = read_layer(&input, "input")?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            if let Some(crs) = raster.crs() {
                println!("CRS: {}", crs);
            }
            if let Some(nodata) = raster.nodata() {
                println!("NoData: {}", nodata);
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            if !raster.is_empty() {
                println!(
                    "  Valid cells: {} ({:.1}%)",
                    stats.valid_count,
                    100.0 * stats.valid_count as f64 / raster.len() as f64
                );
            }
        }

        Commands::Eligibility {
            land_cover,
            protected_areas,
            slope,
            bathymetry,
            output,
            strict,
        } => {
            // categorical layers are read wide and decoded per cell
            let land_cover: Raster<f64> = read_layer(&land_cover, "land cover")?;
            let protected_areas: Raster<f64> = read_layer(&protected_areas, "protected areas")?;
            let slope: Raster<f64> = read_layer(&slope, "slope")?;
            let bathymetry: Raster<f64> = read_layer(&bathymetry, "bathymetry")?;

            let start = Instant::now();
            let result = determine_eligibility(
                &land_cover,
                &protected_areas,
                &slope,
                &bathymetry,
                EligibilityParams { strict_codes: strict },
            )
            .context("Failed to determine eligibility")?;
            let elapsed = start.elapsed();

            write_result(&result, &output)?;
            done("Eligibility", &output, elapsed);
        }

        Commands::Areas {
            input,
            unit_m,
            json,
        } => {
            let eligibility: Raster<u8> = read_layer(&input, "eligibility")?;
            let params = AreaParams {
                linear_unit_m: unit_m,
                ..AreaParams::default()
            };
            let report =
                eligible_areas(&eligibility, params).context("Failed to aggregate areas")?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to serialize report")?
                );
            } else {
                print_areas(&report);
            }
        }
    }

    Ok(())
}
