//! Address geocoding.
//!
//! The district resolver only needs an address turned into a point; which
//! service does that is decided by whoever constructs the geocoder.

mod geocoder_us;
mod google;

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, Response, StatusCode};
use url::Url;

pub use geocoder_us::{parse_geocoder_us, GeocoderUs};
pub use google::{parse_google_csv, GoogleMaps};

use crate::config::{GeocoderBackend, GeocoderConfig};
use crate::error::GeocodingError;
use crate::models::GeoPoint;

/// Converts a free-text address into a point
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> impl Future<Output = Result<GeoPoint, GeocodingError>> + Send;
}

/// Geocoder selected by configuration
pub enum ConfiguredGeocoder {
    GeocoderUs(GeocoderUs),
    GoogleMaps(GoogleMaps),
}

impl ConfiguredGeocoder {
    pub fn from_config(config: &GeocoderConfig) -> anyhow::Result<Self> {
        let client = http_client(Duration::from_secs(config.timeout_secs))?;
        let endpoint = config
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .context("Invalid geocoder base_url")?;
        match config.backend {
            GeocoderBackend::GeocoderUs => {
                let mut geocoder = GeocoderUs::new(client);
                if let Some(url) = endpoint {
                    geocoder = geocoder.with_endpoint(url);
                }
                Ok(Self::GeocoderUs(geocoder))
            }
            GeocoderBackend::GoogleMaps => {
                let mut geocoder = GoogleMaps::new(client, config.api_key.clone().unwrap_or_default())?;
                if let Some(url) = endpoint {
                    geocoder = geocoder.with_endpoint(url);
                }
                Ok(Self::GoogleMaps(geocoder))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GeocoderUs(_) => "geocoder.us",
            Self::GoogleMaps(_) => "google maps",
        }
    }
}

impl Geocoder for ConfiguredGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        match self {
            Self::GeocoderUs(g) => g.geocode(address).await,
            Self::GoogleMaps(g) => g.geocode(address).await,
        }
    }
}

/// HTTP client shared by the geocoder backends
pub fn http_client(timeout: Duration) -> Result<Client, GeocodingError> {
    Client::builder()
        .user_agent(concat!("district-pip/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| GeocodingError::Server(format!("could not build HTTP client: {}", e)))
}

/// Fetch a response body, classifying transport and HTTP-level failures
async fn response_text(response: Result<Response, reqwest::Error>) -> Result<String, GeocodingError> {
    let response = response.map_err(|e| GeocodingError::Server(e.to_string()))?;

    if let Some(err) = classify_status(response.status()) {
        return Err(err);
    }

    response
        .text()
        .await
        .map_err(|e| GeocodingError::Server(e.to_string()))
}

/// HTTP-level failure for a status, `None` on success
fn classify_status(status: StatusCode) -> Option<GeocodingError> {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Some(GeocodingError::RateLimited),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(GeocodingError::BadCredentials),
        s if !s.is_success() => Some(GeocodingError::Server(format!("HTTP {}", s))),
        _ => None,
    }
}

fn parse_coordinate(value: &str, body: &str) -> Result<f64, GeocodingError> {
    value
        .trim()
        .parse()
        .map_err(|_| GeocodingError::Server(body.trim().to_string()))
}
