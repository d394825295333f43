#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the earthquake dashboard.
//!
//! Loads the dataset once, then renders the requested view and writes its
//! chart specification to stdout as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use quake_map_charts::{DashboardContext, Navigation, render};
use quake_map_cli::commands::{Commands, build_request};
use quake_map_cli::config::{ConfigOverrides, DashboardConfig};
use quake_map_cli::output::RenderedView;
use quake_map_cli::summary::summarize;
use quake_map_geography::{BoundaryGeometry, ImpactFormula};

#[derive(Parser)]
#[command(name = "quake_map", about = "Interactive earthquake dashboard charts")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "QUAKE_MAP_CONFIG")]
    config: Option<PathBuf>,
    /// Earthquake CSV (overrides `data_path`)
    #[arg(long, global = true, env = "QUAKE_MAP_DATA")]
    data: Option<PathBuf>,
    /// Country boundary `GeoJSON` (overrides `boundaries_path`)
    #[arg(long, global = true, env = "QUAKE_MAP_BOUNDARIES")]
    boundaries: Option<PathBuf>,
    /// Radius formula for the world map: `exponential` or `empirical`
    #[arg(long, global = true, env = "QUAKE_MAP_MAP_RADIUS")]
    map_radius: Option<ImpactFormula>,
    /// Radius formula for the epicentre view: `exponential` or `empirical`
    #[arg(long, global = true, env = "QUAKE_MAP_EPICENTRE_RADIUS")]
    epicentre_radius: Option<ImpactFormula>,
    /// Year preselected by the map and time-series views
    #[arg(long, global = true, env = "QUAKE_MAP_DEFAULT_YEAR")]
    default_year: Option<i32>,
    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_path: self.data.clone(),
            boundaries_path: self.boundaries.clone(),
            map_radius: self.map_radius,
            epicentre_radius: self.epicentre_radius,
            default_year: self.default_year,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = DashboardConfig::load_or_default(cli.config.as_deref())?.with_overrides(cli.overrides());
    log::debug!("Using config: {config:?}");

    let dataset = Arc::new(quake_map_dataset::load_and_prepare(&config.data_path)?);
    let report = dataset.report();
    log::info!(
        "Loaded {} earthquakes ({} rows read, {} dropped)",
        dataset.len(),
        report.rows_read,
        report.dropped()
    );

    let Some(request) = build_request(cli.command, &config, &dataset) else {
        return print_json(&summarize(&dataset), cli.pretty);
    };

    let boundaries = BoundaryGeometry::load_or_empty(config.boundaries_path.as_deref());
    let ctx = DashboardContext::new(dataset, boundaries, config.presets());

    let chart = render(&ctx, &request);
    let mut navigation = Navigation::default();
    print_json(&RenderedView::new(&mut navigation, &request, chart), cli.pretty)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
