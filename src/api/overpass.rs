use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::{FetchError, FetchResult};
use crate::domain::PlaceRecord;
use crate::domain::place::join_address;
use crate::geometry::{Coordinate, distance_km};

pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// A single node from an Overpass `out body` response
#[derive(Debug, Deserialize)]
struct Element {
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: Option<HashMap<String, String>>,
}

/// Build the Overpass QL query for amenity nodes around the origin
///
/// The term is matched exactly against the `amenity` tag, so callers are
/// expected to pass it already lowercased.
pub fn build_query(term: &str, origin: Coordinate, radius_m: u32) -> String {
    format!(
        r#"[out:json];node["amenity"="{term}"](around:{radius_m},{lat},{lon});out body;"#,
        term = escape_ql(term),
        radius_m = radius_m,
        lat = origin.latitude,
        lon = origin.longitude
    )
}

fn escape_ql(term: &str) -> String {
    term.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parse an Overpass response body into places, measuring each from `origin`
///
/// # Algorithm
/// 1. Require a root object with an `elements` array
/// 2. Decode each element on its own, skipping any without numeric lat/lon
/// 3. Resolve name: `tags.name` -> capitalized `tags.amenity` -> "Unnamed Place"
/// 4. Resolve address from `addr:street`, `addr:city`, `addr:country`
pub fn parse_places(body: &str, origin: Coordinate) -> FetchResult {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("Failed to parse Overpass JSON response: {e}")))?;

    let elements = root
        .get("elements")
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Parse("Overpass response has no \"elements\" array".into()))?;

    let places = elements
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match Element::deserialize(raw) {
            Ok(element) => to_place(element, origin),
            Err(e) => {
                log::warn!("Skipping Overpass element {index}: {e}");
                None
            }
        })
        .collect();

    Ok(places)
}

fn to_place(element: Element, origin: Coordinate) -> Option<PlaceRecord> {
    let position = match Coordinate::new(element.lat, element.lon) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Skipping Overpass element: {e}");
            return None;
        }
    };
    let distance = distance_km(origin, position);

    let Some(tags) = element.tags else {
        return Some(PlaceRecord::new("", "", Some(distance)));
    };

    let tag = |key: &str| tags.get(key).map(String::as_str).filter(|v| !v.trim().is_empty());

    let name = match (tag("name"), tag("amenity")) {
        (Some(name), _) => name.to_string(),
        (None, Some(amenity)) => capitalize(amenity),
        (None, None) => String::new(),
    };
    let address = join_address([tag("addr:street"), tag("addr:city"), tag("addr:country")]);

    Some(PlaceRecord::new(&name, &address, Some(distance)))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ADDRESS_NOT_AVAILABLE, UNNAMED_PLACE};

    fn origin() -> Coordinate {
        Coordinate::new(40.0, -73.0).unwrap()
    }

    #[test]
    fn test_amenity_fallback_name() {
        let json = r#"{"elements":[{"lat":40.0,"lon":-73.0,"tags":{"amenity":"cafe"}}]}"#;
        let places = parse_places(json, origin()).unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].display_name, "Cafe");
        assert_eq!(places[0].address, ADDRESS_NOT_AVAILABLE);
        assert_eq!(places[0].distance_km, Some(0.0));
    }

    #[test]
    fn test_name_takes_precedence_over_amenity() {
        let json = r#"{"elements":[{"lat":40.01,"lon":-73.0,"tags":{
            "amenity":"cafe","name":"Joe's Coffee",
            "addr:street":"Main St","addr:city":"","addr:country":"US"}}]}"#;
        let places = parse_places(json, origin()).unwrap();

        assert_eq!(places[0].display_name, "Joe's Coffee");
        assert_eq!(places[0].address, "Main St, US");
        let d = places[0].distance_km.unwrap();
        assert!((d - 1.11).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_element_without_tags() {
        let json = r#"{"elements":[{"type":"node","id":7,"lat":40.0,"lon":-73.0}]}"#;
        let places = parse_places(json, origin()).unwrap();

        assert_eq!(places[0].display_name, UNNAMED_PLACE);
        assert_eq!(places[0].address, ADDRESS_NOT_AVAILABLE);
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let json = r#"{"elements":[
            {"lat":40.0,"tags":{"amenity":"bar"}},
            {"lat":"north","lon":-73.0},
            {"lat":40.0,"lon":-73.0,"tags":{"amenity":"pub"}},
            {"lat":95.0,"lon":-73.0},
            {"lat":40.0,"lon":-73.0,"tags":{"name":"Last"}}
        ]}"#;
        let places = parse_places(json, origin()).unwrap();

        let names: Vec<_> = places.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, ["Pub", "Last"]);
    }

    #[test]
    fn test_missing_elements_is_parse_error() {
        assert!(matches!(
            parse_places(r#"{"version":0.6}"#, origin()),
            Err(FetchError::Parse(_))
        ));
        assert!(matches!(
            parse_places("<html>busy</html>", origin()),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_elements_is_empty_success() {
        let places = parse_places(r#"{"elements":[]}"#, origin()).unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_build_query() {
        let query = build_query("cafe", origin(), 1000);
        assert_eq!(
            query,
            r#"[out:json];node["amenity"="cafe"](around:1000,40,-73);out body;"#
        );
    }

    #[test]
    fn test_build_query_escapes_quotes() {
        let query = build_query(r#"ca"fe"#, origin(), 500);
        assert!(query.contains(r#"["amenity"="ca\"fe"]"#));
        assert!(query.contains("(around:500,"));
    }
}
