use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use nearby_places::api::{HttpFetcher, Schema};
use nearby_places::config::{EndpointConfig, FileConfig};
use nearby_places::geometry::Coordinate;
use nearby_places::location::FixedLocation;
use nearby_places::report::{self, Rendered};
use nearby_places::search::SearchController;

/// Find points of interest near a location using OpenStreetMap data
///
/// Examples:
///   # Cafes within 1km via Overpass
///   nearby cafe --lat 37.7749 --lon -122.4194
///
///   # Free-text search via Nominatim
///   nearby "ferry building" --schema nominatim --lat 37.7749 --lon -122.4194
///
///   # Use a config file for location and contact details
///   nearby pharmacy --config my-settings.toml
#[derive(Parser, Debug)]
#[command(name = "nearby")]
#[command(version, about, long_about = None)]
struct Args {
    /// What to look for (an amenity like "cafe" for Overpass, free text for Nominatim)
    term: String,

    /// Path to config file (optional, auto-searches nearby.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Which search API to use
    #[arg(long, value_enum)]
    schema: Option<Schema>,

    /// Override the search endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Latitude of the last known location (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude of the last known location (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Overpass search radius in meters
    #[arg(short = 'r', long)]
    radius: Option<u32>,

    /// Maximum Nominatim results
    #[arg(short = 'l', long)]
    limit: Option<u32>,

    /// Contact string sent in the identifying request header
    #[arg(long)]
    contact: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match args.config {
        Some(ref path) => FileConfig::load_from(path)?,
        None => FileConfig::load().unwrap_or_default(),
    };

    let verbose = args.verbose || file_config.verbose;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let schema = args.schema.or(file_config.schema).unwrap_or_default();

    let mut endpoint = EndpointConfig::from_file(schema, &file_config);
    if let Some(url) = args.endpoint.clone() {
        endpoint = endpoint.with_url(url);
    }
    if let Some(contact) = args.contact.clone() {
        endpoint = endpoint.with_contact(contact);
    }
    if let Some(radius) = args.radius {
        endpoint = endpoint.with_radius(radius);
    }
    if let Some(limit) = args.limit {
        endpoint = endpoint.with_limit(limit);
    }

    let lat = args.lat.or(file_config.lat);
    let lon = args.lon.or(file_config.lon);
    let fix = match (lat, lon) {
        (Some(lat), Some(lon)) => {
            Some(Coordinate::new(lat, lon).context("Invalid location coordinates")?)
        }
        _ => None,
    };

    log::debug!("Endpoint: {:?}", endpoint);

    let fetcher = HttpFetcher::new(endpoint).context("Failed to create HTTP client")?;
    let mut controller = SearchController::new(fetcher, schema);

    let status = controller.refresh_location(&FixedLocation::new(fix));
    if let Some(message) = report::location_message(status) {
        println!("{}", message);
    }

    let spinner = create_spinner(&format!("Searching for {:?}...", args.term))?;
    let start = Instant::now();
    let handle = controller.spawn_search(&args.term);
    let result = handle.wait();
    spinner.finish_and_clear();
    log::debug!("Search finished in {:.1}s", start.elapsed().as_secs_f32());

    match report::render(result) {
        Rendered::List(places) => {
            println!();
            for place in &places {
                println!("{}", place);
                println!();
            }
            println!("{} places found", places.len());
        }
        Rendered::Status(message) => println!("{}", message),
    }

    Ok(())
}

fn create_spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    Ok(pb)
}
