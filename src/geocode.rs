//! Google Maps Geocoding API client.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{error_for_status, GoogleError, Result};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Raw response envelope of the Geocoding API.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub formatted_address: String,
    pub geometry: Geometry,
    pub place_id: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub partial_match: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: Location,
    pub location_type: LocationType,
    pub viewport: Viewport,
    #[serde(default)]
    pub bounds: Option<Viewport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Viewport {
    pub northeast: Location,
    pub southwest: Location,
}

/// Precision of a geocoded location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Rooftop,
    RangeInterpolated,
    GeometricCenter,
    Approximate,
}

/// Client for forward and reverse geocoding.
#[derive(Clone)]
pub struct Geocode {
    api_key: String,
    http: Client,
    base_url: String,
}

impl Geocode {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http: Client::new(),
            base_url: GEOCODE_URL.to_string(),
        }
    }

    /// Override the endpoint URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Look up coordinates for an address.
    pub async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>> {
        debug!(address, "geocoding");
        self.request(&[("address", address.to_string())]).await
    }

    /// Look up addresses for a coordinate pair.
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Vec<GeocodeResult>> {
        debug!(lat, lng, "reverse geocoding");
        self.request(&[("latlng", format!("{},{}", lat, lng))]).await
    }

    async fn request(&self, params: &[(&str, String)]) -> Result<Vec<GeocodeResult>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(params)
            .query(&[("key", &self.api_key)])
            .send()
            .await?;

        let body: GeocodeResponse = error_for_status(response).await?.json().await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body.results),
            status => Err(GoogleError::ApiError {
                status: 200,
                message: body
                    .error_message
                    .map(|m| format!("{}: {}", status, m))
                    .unwrap_or_else(|| status.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn sample_result() -> serde_json::Value {
        json!({
            "address_components": [
                {"long_name": "1600", "short_name": "1600", "types": ["street_number"]}
            ],
            "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
            "geometry": {
                "location": {"lat": 37.4224, "lng": -122.0842},
                "location_type": "ROOFTOP",
                "viewport": {
                    "northeast": {"lat": 37.4238, "lng": -122.0829},
                    "southwest": {"lat": 37.4211, "lng": -122.0856}
                }
            },
            "place_id": "ChIJ2eUgeAK6j4ARbn5u_wAGqWA",
            "types": ["street_address"]
        })
    }

    #[test]
    fn test_deserialize_result() {
        let result: GeocodeResult = serde_json::from_value(sample_result()).unwrap();
        assert_eq!(result.geometry.location_type, LocationType::Rooftop);
        assert_eq!(result.geometry.location.lat, 37.4224);
        assert!(result.geometry.bounds.is_none());
        assert!(!result.partial_match);
        assert_eq!(result.address_components[0].types, vec!["street_number"]);
    }

    #[tokio::test]
    async fn test_geocode_sends_address_and_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("address".into(), "1600 Amphitheatre Pkwy".into()),
                Matcher::UrlEncoded("key".into(), "secret".into()),
            ]))
            .with_body(json!({"results": [sample_result()], "status": "OK"}).to_string())
            .create_async()
            .await;

        let geocode =
            Geocode::new("secret").with_base_url(format!("{}/geocode/json", server.url()));
        let results = geocode.geocode("1600 Amphitheatre Pkwy").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].place_id, "ChIJ2eUgeAK6j4ARbn5u_wAGqWA");
    }

    #[tokio::test]
    async fn test_reverse_geocode_zero_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::UrlEncoded("latlng".into(), "0.5,-1.25".into()))
            .with_body(json!({"results": [], "status": "ZERO_RESULTS"}).to_string())
            .create_async()
            .await;

        let geocode =
            Geocode::new("secret").with_base_url(format!("{}/geocode/json", server.url()));
        assert!(geocode.reverse_geocode(0.5, -1.25).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_geocode_denied_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/geocode/json")
            .match_query(Matcher::Any)
            .with_body(
                json!({"results": [], "status": "REQUEST_DENIED", "error_message": "bad key"})
                    .to_string(),
            )
            .create_async()
            .await;

        let geocode =
            Geocode::new("secret").with_base_url(format!("{}/geocode/json", server.url()));
        let err = geocode.geocode("anywhere").await.unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED: bad key"));
    }
}
