pub mod error;
pub mod fetcher;
pub mod nominatim;
pub mod overpass;

use serde::Deserialize;

use crate::config::EndpointConfig;
use crate::domain::PlaceRecord;
use crate::geometry::Coordinate;

pub use error::FetchError;
pub use fetcher::{HttpFetcher, PlaceFetcher};

/// Outcome of one search: the complete list or a single failure
pub type FetchResult = Result<Vec<PlaceRecord>, FetchError>;

/// One user search, built at search time and dropped once answered
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub term: String,
    pub origin: Coordinate,
}

/// Which public API contract the endpoint speaks.
///
/// Chosen by configuration; responses are never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// Overpass QL `amenity` lookup within a radius
    #[default]
    Overpass,
    /// Nominatim free-text search
    Nominatim,
}

impl Schema {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Schema::Overpass => overpass::OVERPASS_URL,
            Schema::Nominatim => nominatim::NOMINATIM_URL,
        }
    }

    /// Trim the term; Overpass also lowercases it because it is matched
    /// against the enumerated `amenity` vocabulary.
    pub fn normalize_term(self, term: &str) -> String {
        let term = term.trim();
        match self {
            Schema::Overpass => term.to_lowercase(),
            Schema::Nominatim => term.to_string(),
        }
    }

    pub fn query_params(
        self,
        endpoint: &EndpointConfig,
        query: &SearchQuery,
    ) -> Vec<(&'static str, String)> {
        match self {
            Schema::Overpass => vec![(
                "data",
                overpass::build_query(&query.term, query.origin, endpoint.radius_m),
            )],
            Schema::Nominatim => nominatim::query_params(&query.term, query.origin, endpoint.limit),
        }
    }

    /// The identifying header each API asks clients to send
    pub fn identity_header(self, endpoint: &EndpointConfig) -> (&'static str, String) {
        match self {
            Schema::Overpass => ("VcStudent", format!("VcProject/v1 ({})", endpoint.contact)),
            Schema::Nominatim => (
                "User-Agent",
                format!(
                    "{}/{} ({})",
                    endpoint.app_id, endpoint.app_version, endpoint.contact
                ),
            ),
        }
    }

    pub fn parse(self, body: &str, origin: Coordinate) -> FetchResult {
        match self {
            Schema::Overpass => overpass::parse_places(body, origin),
            Schema::Nominatim => nominatim::parse_places(body),
        }
    }
}
