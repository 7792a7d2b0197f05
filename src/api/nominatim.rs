use serde::Deserialize;
use serde_json::Value;

use super::{FetchError, FetchResult};
use crate::domain::PlaceRecord;
use crate::domain::place::join_address;
use crate::geometry::Coordinate;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Deserialize)]
struct NominatimResult {
    display_name: Option<String>,
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    road: Option<String>,
    city: Option<String>,
    country: Option<String>,
}

/// Query parameters for a free-text search biased towards the origin
pub fn query_params(term: &str, origin: Coordinate, limit: u32) -> Vec<(&'static str, String)> {
    vec![
        ("q", term.to_string()),
        ("lat", origin.latitude.to_string()),
        ("lon", origin.longitude.to_string()),
        ("format", "json".to_string()),
        ("addressdetails", "1".to_string()),
        ("limit", limit.to_string()),
    ]
}

/// Parse a Nominatim `format=json` array into places.
///
/// Nominatim's `display_name` is used verbatim. Result coordinates are not
/// read, so no distance is attached.
pub fn parse_places(body: &str) -> FetchResult {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("Failed to parse Nominatim JSON response: {e}")))?;

    let results = root
        .as_array()
        .ok_or_else(|| FetchError::Parse("Nominatim response is not an array".into()))?;

    let places = results
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match NominatimResult::deserialize(raw) {
            Ok(result) => Some(to_place(result)),
            Err(e) => {
                log::warn!("Skipping Nominatim result {index}: {e}");
                None
            }
        })
        .collect();

    Ok(places)
}

fn to_place(result: NominatimResult) -> PlaceRecord {
    let address = result
        .address
        .map(|a| join_address([a.road.as_deref(), a.city.as_deref(), a.country.as_deref()]))
        .unwrap_or_default();

    PlaceRecord::new(result.display_name.as_deref().unwrap_or_default(), &address, None)
}
