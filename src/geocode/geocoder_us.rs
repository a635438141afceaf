//! geocoder.us CSV RPC backend.

use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{parse_coordinate, response_text, Geocoder};
use crate::error::GeocodingError;
use crate::models::GeoPoint;

const GEOCODER_US_ENDPOINT: &str = "http://rpc.geocoder.us/service/csv";

/// Geocoder backed by the geocoder.us CSV service
pub struct GeocoderUs {
    client: Client,
    endpoint: Url,
}

impl GeocoderUs {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: Url::parse(GEOCODER_US_ENDPOINT).expect("static endpoint URL is valid"),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    fn request_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("address", address);
        url
    }
}

impl Geocoder for GeocoderUs {
    async fn geocode(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        if address.trim().is_empty() {
            return Err(GeocodingError::EmptyAddress);
        }

        let url = self.request_url(address);
        debug!("geocoder.us request: {}", url);

        let body = response_text(self.client.get(url).send().await).await?;
        parse_geocoder_us(&body)
    }
}

/// Parse a geocoder.us CSV reply.
///
/// Success is `lat,long,street,city,state,zip`; failures are `<n>: message`,
/// where `2:` means the address was not found. Only the first line is used.
pub fn parse_geocoder_us(body: &str) -> Result<GeoPoint, GeocodingError> {
    let line = body.lines().next().unwrap_or("").trim();

    if line.starts_with("2:") {
        return Err(GeocodingError::UnknownAddress);
    }

    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != 6 {
        return Err(GeocodingError::Server(line.to_string()));
    }

    let lat = parse_coordinate(parts[0], line)?;
    let lon = parse_coordinate(parts[1], line)?;
    Ok(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let point = parse_geocoder_us(
            "38.898748,-77.037684,1600 Pennsylvania Ave NW,Washington,DC,20502\nextra line",
        )
        .unwrap();
        assert_eq!(point, GeoPoint::new(38.898748, -77.037684));
    }

    #[test]
    fn test_parse_not_found() {
        assert_eq!(
            parse_geocoder_us("2: couldn't find this address! sorry"),
            Err(GeocodingError::UnknownAddress)
        );
    }

    #[test]
    fn test_parse_unexpected_reply() {
        assert_eq!(
            parse_geocoder_us("1: some other failure"),
            Err(GeocodingError::Server("1: some other failure".to_string()))
        );
        assert!(matches!(
            parse_geocoder_us("north,west,a,b,c,d"),
            Err(GeocodingError::Server(_))
        ));
    }

    #[test]
    fn test_address_is_query_encoded() {
        let geocoder = GeocoderUs::new(Client::new());
        let url = geocoder.request_url("1 Main St, Suite #2");
        assert_eq!(
            url.as_str(),
            "http://rpc.geocoder.us/service/csv?address=1+Main+St%2C+Suite+%232"
        );
    }

    #[tokio::test]
    async fn test_empty_address_rejected_before_request() {
        // unroutable endpoint: reaching the network would fail differently
        let geocoder = GeocoderUs::new(Client::new())
            .with_endpoint(Url::parse("http://127.0.0.1:9/csv").unwrap());
        assert_eq!(
            geocoder.geocode("   ").await,
            Err(GeocodingError::EmptyAddress)
        );
    }
}
