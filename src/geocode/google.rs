//! Google Maps legacy CSV geocoder backend.

use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{parse_coordinate, response_text, Geocoder};
use crate::error::GeocodingError;
use crate::models::GeoPoint;

const GOOGLE_MAPS_ENDPOINT: &str = "http://maps.google.com/maps/geo";

/// Status the CSV geocoder returns on success
const STATUS_OK: i32 = 200;

/// Geocoder backed by the Google Maps CSV geocoding endpoint
pub struct GoogleMaps {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GoogleMaps {
    /// Requires an API key; an empty one is rejected up front.
    pub fn new(client: Client, api_key: impl Into<String>) -> Result<Self, GeocodingError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeocodingError::BadCredentials);
        }
        Ok(Self {
            client,
            endpoint: Url::parse(GOOGLE_MAPS_ENDPOINT).expect("static endpoint URL is valid"),
            api_key,
        })
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    fn request_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("output", "csv")
            .append_pair("q", address)
            .append_pair("key", &self.api_key);
        url
    }
}

impl Geocoder for GoogleMaps {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        if address.trim().is_empty() {
            return Err(GeocodingError::EmptyAddress);
        }

        debug!("Google Maps geocode request for {:?}", address);
        let body = response_text(self.client.get(self.request_url(address)).send().await).await?;
        parse_google_csv(&body)
    }
}

/// Parse a `status,accuracy,lat,lng` reply; any status but 200 is classified.
pub fn parse_google_csv(body: &str) -> Result<GeoPoint, GeocodingError> {
    let line = body.trim();
    let parts: Vec<&str> = line.split(',').collect();

    let status: i32 = parts
        .first()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| GeocodingError::Server(line.to_string()))?;

    if status != STATUS_OK {
        return Err(GeocodingError::from_status(status, line));
    }
    if parts.len() != 4 {
        return Err(GeocodingError::Server(line.to_string()));
    }

    let lat = parse_coordinate(parts[2], line)?;
    let lon = parse_coordinate(parts[3], line)?;
    Ok(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        assert!(matches!(
            GoogleMaps::new(Client::new(), ""),
            Err(GeocodingError::BadCredentials)
        ));
        assert!(GoogleMaps::new(Client::new(), "abc").is_ok());
    }

    #[test]
    fn test_parse_success() {
        assert_eq!(
            parse_google_csv("200,8,30.6883,-88.0986\n"),
            Ok(GeoPoint::new(30.6883, -88.0986))
        );
    }

    #[test]
    fn test_parse_classified_statuses() {
        assert_eq!(
            parse_google_csv("602,0,0,0"),
            Err(GeocodingError::UnknownAddress)
        );
        assert_eq!(
            parse_google_csv("603,0,0,0"),
            Err(GeocodingError::ProhibitedAddress)
        );
        assert_eq!(parse_google_csv("610,0,0,0"), Err(GeocodingError::BadCredentials));
        assert_eq!(parse_google_csv("620,0,0,0"), Err(GeocodingError::RateLimited));
        assert!(matches!(
            parse_google_csv("604,0,0,0"),
            Err(GeocodingError::Unclassified { code: 604, .. })
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_google_csv("<html>oops</html>"),
            Err(GeocodingError::Server(_))
        ));
        assert!(matches!(
            parse_google_csv("200,8,30.6"),
            Err(GeocodingError::Server(_))
        ));
    }

    #[test]
    fn test_request_url() {
        let geocoder = GoogleMaps::new(Client::new(), "k3y").unwrap();
        assert_eq!(
            geocoder.request_url("Mobile, AL").as_str(),
            "http://maps.google.com/maps/geo?output=csv&q=Mobile%2C+AL&key=k3y"
        );
    }
}
