//! Batch district lookup over a CSV of addresses.
//!
//! Resolves each row (geocoding the address column, or reading coordinates
//! directly) and writes a CSV report, optionally checking each row against
//! an expected state/district.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use district_pip::config::{Config, GeocoderBackend, Overrides};
use district_pip::geocode::{ConfiguredGeocoder, Geocoder};
use district_pip::pip::normalize_district_code;
use district_pip::{BoundaryCollection, DistrictLookup, DistrictResolver, GeocodingError};

#[derive(Parser, Debug)]
#[command(name = "batch")]
#[command(about = "Resolve congressional districts for every row of a CSV file")]
struct Args {
    /// Input CSV file (with a header row)
    #[arg(short, long)]
    file: PathBuf,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Census shapefile base name (overrides config)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Test the closing edge of rings stored open
    #[arg(long)]
    close_rings: bool,

    /// Geocoder backend (overrides config)
    #[arg(long)]
    geocoder: Option<GeocoderBackend>,

    /// Geocoder API key (overrides config)
    #[arg(long)]
    api_key: Option<String>,

    /// Output CSV file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Column holding the address to geocode
    #[arg(long, default_value = "address")]
    address_column: String,

    /// Columns holding latitude/longitude; when both are set no geocoding happens
    #[arg(long, requires = "lng_column")]
    lat_column: Option<String>,

    #[arg(long, requires = "lat_column")]
    lng_column: Option<String>,

    /// Column identifying the row in the report
    #[arg(long)]
    label_column: Option<String>,

    /// Column with the expected state abbreviation
    #[arg(long, requires = "district_column")]
    state_column: Option<String>,

    /// Column with the expected district code
    #[arg(long, requires = "state_column")]
    district_column: Option<String>,
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let overrides = Overrides {
            dataset: self.dataset.clone(),
            close_rings: self.close_rings,
            geocoder: self.geocoder,
            api_key: self.api_key.clone(),
            listen: None,
        };
        Config::resolve(self.config.as_deref(), overrides)
    }
}

/// Where each input field lives in a record
struct Columns {
    address: Option<usize>,
    coords: Option<(usize, usize)>,
    label: Option<usize>,
    expected: Option<(usize, usize)>,
}

impl Columns {
    fn locate(headers: &StringRecord, args: &Args) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .with_context(|| format!("Column '{}' not found", name))
        };

        let coords = match (&args.lat_column, &args.lng_column) {
            (Some(lat), Some(lng)) => Some((find(lat)?, find(lng)?)),
            _ => None,
        };
        let address = if coords.is_some() {
            headers.iter().position(|h| h == args.address_column)
        } else {
            Some(find(&args.address_column)?)
        };
        let label = args.label_column.as_deref().map(find).transpose()?;
        let expected = match (&args.state_column, &args.district_column) {
            (Some(state), Some(district)) => Some((find(state)?, find(district)?)),
            _ => None,
        };

        Ok(Self {
            address,
            coords,
            label,
            expected,
        })
    }
}

/// Outcome of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RowStatus {
    /// Resolved; no expectation given
    Found,
    /// Expected district is among the matches
    Match,
    /// Resolved, but the expected district is not among the matches
    Mismatch,
    /// No district contains the point
    NoDistrict,
    /// Geocoding failed or the row could not be read
    Error,
}

#[derive(Debug, Serialize)]
struct ReportRow {
    label: String,
    address: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    expected: String,
    found: String,
    status: RowStatus,
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = args.load_config()?;

    info!("District Batch Lookup");
    info!("File: {}", args.file.display());

    let collection = BoundaryCollection::open(&config.dataset.path, config.dataset.load_options())
        .context("Failed to load census boundaries")?;
    let resolver = DistrictResolver::new(Arc::new(collection));

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers, &args)?;
    let records = reader.records().collect::<Result<Vec<_>, _>>()?;

    // Only needed when rows carry no coordinates
    let geocoder = match columns.coords {
        Some(_) => None,
        None => Some(ConfiguredGeocoder::from_config(&config.geocoder).context("Failed to set up geocoder")?),
    };

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).with_context(|| format!("Failed to create {}", path.display()))?),
        None => Box::new(io::stdout()),
    };
    let mut writer = WriterBuilder::new().from_writer(out);

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut tally = [0usize; 5];
    for (i, record) in records.iter().enumerate() {
        let row = match &geocoder {
            Some(geocoder) => process_row(&resolver, Some(geocoder), &columns, record).await,
            None => process_row::<ConfiguredGeocoder>(&resolver, None, &columns, record).await,
        };
        if row.status == RowStatus::Error {
            warn!("Row {}: {}", i + 1, row.error);
        }
        tally[row.status as usize] += 1;
        writer.serialize(&row)?;
        pb.inc(1);
    }
    pb.finish_and_clear();
    writer.flush()?;

    info!(
        "Processed {} rows: {} found, {} match, {} mismatch, {} without district, {} errors",
        records.len(),
        tally[RowStatus::Found as usize],
        tally[RowStatus::Match as usize],
        tally[RowStatus::Mismatch as usize],
        tally[RowStatus::NoDistrict as usize],
        tally[RowStatus::Error as usize]
    );

    Ok(())
}

async fn process_row<G: Geocoder>(
    resolver: &DistrictResolver,
    geocoder: Option<&G>,
    columns: &Columns,
    record: &StringRecord,
) -> ReportRow {
    let get = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").to_string();

    let address = get(columns.address);
    let expected = columns
        .expected
        .map(|(s, d)| (get(Some(s)), get(Some(d))));

    let mut row = ReportRow {
        label: get(columns.label),
        address: address.clone(),
        latitude: None,
        longitude: None,
        expected: expected
            .as_ref()
            .map(|(s, d)| format!("{}-{}", s, normalize_district_code(d)))
            .unwrap_or_default(),
        found: String::new(),
        status: RowStatus::Error,
        error: String::new(),
    };

    let lookup = match (columns.coords, geocoder) {
        (Some((lat, lng)), _) => lookup_coords(resolver, &get(Some(lat)), &get(Some(lng))),
        (None, Some(geocoder)) => resolver
            .resolve_address(&address, geocoder)
            .await
            .map_err(|e: GeocodingError| format!("GeocodingError: {} - {}", e.code(), e)),
        (None, None) => Err("no geocoder configured".to_string()),
    };

    match lookup {
        Ok(lookup) => {
            row.latitude = Some(lookup.lat);
            row.longitude = Some(lookup.lng);
            row.found = lookup
                .districts
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(";");
            row.status = classify(&lookup, expected.as_ref());
        }
        Err(e) => row.error = e,
    }
    row
}

fn lookup_coords(resolver: &DistrictResolver, lat: &str, lng: &str) -> Result<DistrictLookup, String> {
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude {:?}", lat))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude {:?}", lng))?;
    Ok(resolver.resolve_point(lat, lng))
}

fn classify(lookup: &DistrictLookup, expected: Option<&(String, String)>) -> RowStatus {
    if lookup.is_empty() {
        return RowStatus::NoDistrict;
    }
    match expected {
        None => RowStatus::Found,
        Some((state, district)) => {
            let district = normalize_district_code(district);
            if lookup
                .districts
                .iter()
                .any(|d| d.state.eq_ignore_ascii_case(state) && d.district == district)
            {
                RowStatus::Match
            } else {
                RowStatus::Mismatch
            }
        }
    }
}
