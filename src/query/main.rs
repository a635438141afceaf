//! Query server for district lookups.
//!
//! Provides an HTTP API mapping addresses (via a geocoder) or raw
//! latitude/longitude to the congressional districts containing them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use district_pip::config::{Config, GeocoderBackend, Overrides};
use district_pip::geocode::ConfiguredGeocoder;
use district_pip::{BoundaryCollection, DistrictLookup, DistrictResolver, GeocodingError};

mod render;
use render::{DistrictResponse, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Congressional district lookup server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Census shapefile base name (overrides config)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Geocoder backend (overrides config)
    #[arg(long)]
    geocoder: Option<GeocoderBackend>,

    /// Geocoder API key (overrides config)
    #[arg(long)]
    api_key: Option<String>,

    /// Test the closing edge of rings stored open
    #[arg(long)]
    close_rings: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let overrides = Overrides {
            dataset: self.dataset,
            close_rings: self.close_rings,
            geocoder: self.geocoder,
            api_key: self.api_key,
            listen: self.listen,
        };
        Config::resolve(self.config.as_deref(), overrides)
    }
}

/// Application state shared across handlers
struct AppState {
    resolver: DistrictResolver,
    geocoder: ConfiguredGeocoder,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.into_config()?;

    info!("District Query Server");
    info!("Loading boundaries from {}", config.dataset.path.display());

    let collection = BoundaryCollection::open(&config.dataset.path, config.dataset.load_options())
        .context("Failed to load census boundaries")?;
    let resolver = DistrictResolver::new(Arc::new(collection));

    let geocoder = ConfiguredGeocoder::from_config(&config.geocoder)
        .context("Failed to set up geocoder")?;
    info!("Using {} geocoder", geocoder.name());

    let state = Arc::new(AppState { resolver, geocoder });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/district", get(address_handler))
        .route("/v1/district/point", get(point_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        boundaries: state.resolver.collection().len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    boundaries: usize,
}

#[derive(Deserialize)]
struct AddressQueryParams {
    /// Address in any format the geocoder accepts
    address: Option<String>,
    /// "json" (default) or "xml"
    output: Option<String>,
}

#[derive(Deserialize)]
struct PointQueryParams {
    lat: f64,
    lng: f64,
    output: Option<String>,
}

/// Address -> districts
async fn address_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddressQueryParams>,
) -> Result<Response, ApiError> {
    let address = params.address.ok_or(ApiError::MissingAddress)?;
    let format = OutputFormat::parse(params.output.as_deref()).ok_or(ApiError::InvalidOutput)?;

    let lookup = state
        .resolver
        .resolve_address(&address, &state.geocoder)
        .await
        .map_err(|e| {
            tracing::warn!("Geocoding {:?} failed: {}", address, e);
            ApiError::Geocoding(e)
        })?;

    Ok(respond(format, Some(&address), &lookup))
}

/// Latitude/longitude -> districts
async fn point_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PointQueryParams>,
) -> Result<Response, ApiError> {
    let format = OutputFormat::parse(params.output.as_deref()).ok_or(ApiError::InvalidOutput)?;
    let lookup = state.resolver.resolve_point(params.lat, params.lng);
    Ok(respond(format, None, &lookup))
}

fn respond(format: OutputFormat, address: Option<&str>, lookup: &DistrictLookup) -> Response {
    let body = DistrictResponse::new(address, lookup);
    match format {
        OutputFormat::Json => Json(body).into_response(),
        OutputFormat::Xml => ([(header::CONTENT_TYPE, "text/xml")], body.to_xml()).into_response(),
    }
}

/// Request failures, rendered as plain text
#[derive(Debug)]
enum ApiError {
    MissingAddress,
    InvalidOutput,
    Geocoding(GeocodingError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingAddress | ApiError::InvalidOutput => StatusCode::BAD_REQUEST,
            ApiError::Geocoding(e) => match e {
                GeocodingError::EmptyAddress
                | GeocodingError::UnknownAddress
                | GeocodingError::ProhibitedAddress => StatusCode::UNPROCESSABLE_ENTITY,
                GeocodingError::RateLimited => StatusCode::SERVICE_UNAVAILABLE,
                GeocodingError::BadCredentials => StatusCode::INTERNAL_SERVER_ERROR,
                GeocodingError::Server(_) | GeocodingError::Unclassified { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::MissingAddress => "error: must provide address parameter".to_string(),
            ApiError::InvalidOutput => "error: invalid output parameter specified".to_string(),
            ApiError::Geocoding(e) => format!("error: GeocodingError: {} - {}", e.code(), e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        assert_eq!(ApiError::MissingAddress.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Geocoding(GeocodingError::UnknownAddress).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Geocoding(GeocodingError::Server("x".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ApiError::MissingAddress.message(),
            "error: must provide address parameter"
        );
        assert_eq!(
            ApiError::Geocoding(GeocodingError::UnknownAddress).message(),
            "error: GeocodingError: 602 - Unknown Address"
        );
    }

    #[test]
    fn test_args_require_dataset_without_config() {
        let args = Args::parse_from(["query"]);
        assert!(args.into_config().is_err());

        let args = Args::parse_from(["query", "--dataset", "cd99_110", "--geocoder", "google_maps"]);
        let config = args.into_config().unwrap();
        assert_eq!(config.dataset.path, PathBuf::from("cd99_110"));
        assert_eq!(config.geocoder.backend, GeocoderBackend::GoogleMaps);
    }
}
