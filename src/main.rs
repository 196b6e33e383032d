use clap::Parser;
use geoheat::{
    HeatmapConfig, HeatmapError, Viewport, aggregate, clusters_to_geojson, compose,
    read_samples_csv,
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Render a CSV of location samples as heatmap circles for a map viewport.
#[derive(Debug, Parser)]
#[command(name = "geoheat", version)]
struct Args {
    /// CSV file with `latitude` and `longitude` columns
    samples: PathBuf,

    /// Viewport center latitude (defaults to the center of the samples)
    #[arg(long, allow_hyphen_values = true, requires = "center_lon")]
    center_lat: Option<f64>,

    /// Viewport center longitude (defaults to the center of the samples)
    #[arg(long, allow_hyphen_values = true, requires = "center_lat")]
    center_lon: Option<f64>,

    /// Visible latitude span in degrees
    #[arg(long, default_value_t = 0.05)]
    lat_span: f64,

    /// Visible longitude span in degrees
    #[arg(long, default_value_t = 0.05)]
    lon_span: f64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1024.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 768.0)]
    height: f64,

    /// JSON config file (gridResolutionDegrees, saturationCount, radiusScale, fillColor)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the clusters as GeoJSON instead of drawable circles
    #[arg(long)]
    geojson: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8, json: bool) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    // logs go to stderr so stdout stays machine-readable
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<(), HeatmapError> {
    let args = Args::parse();
    setup_logging(args.verbose, args.json_logs);

    let config = match &args.config {
        Some(path) => HeatmapConfig::from_json_file(path)?,
        None => HeatmapConfig::default(),
    };

    let samples = read_samples_csv(&args.samples)?;
    info!(samples = samples.len(), path = %args.samples.display(), "loaded samples");

    if args.geojson {
        let clusters = aggregate(&samples, config.grid_resolution_degrees);
        println!(
            "{}",
            clusters_to_geojson(&clusters, config.grid_resolution_degrees)
        );
        return Ok(());
    }

    let viewport = match (args.center_lat, args.center_lon) {
        (Some(lat), Some(lon)) => {
            Viewport::new(&(lat, lon), args.lat_span, args.lon_span, args.width, args.height)
        }
        _ => match Viewport::fit_to_samples(&samples, args.width, args.height) {
            Some(viewport) => viewport,
            None => {
                warn!("no samples to fit a viewport to");
                println!("[]");
                return Ok(());
            }
        },
    };

    let frame = compose(&samples, &viewport, &config);
    if !frame.is_drawn() {
        warn!(?viewport, "invalid viewport, nothing drawn");
    }
    info!(circles = frame.len(), "composed heatmap");

    println!("{}", serde_json::to_string_pretty(&frame.circles)?);
    Ok(())
}
