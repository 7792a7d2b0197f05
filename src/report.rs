use std::cmp::Ordering;

use crate::api::{FetchError, FetchResult};
use crate::domain::PlaceRecord;
use crate::location::LocationStatus;

pub const NO_LOCATIONS_FOUND: &str = "No locations found";
pub const LOCATION_ACQUIRED: &str = "Location acquired!";

/// What the user should see for one finished search
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    List(Vec<PlaceRecord>),
    Status(String),
}

/// Turn a search outcome into either a distance-sorted list or a status line.
///
/// An empty success is its own message, not an error.
pub fn render(result: FetchResult) -> Rendered {
    match result {
        Ok(places) if places.is_empty() => Rendered::Status(NO_LOCATIONS_FOUND.to_string()),
        Ok(mut places) => {
            sort_by_distance(&mut places);
            Rendered::List(places)
        }
        Err(e) => Rendered::Status(e.to_string()),
    }
}

/// Nearest first; places without a distance keep their order at the end
pub fn sort_by_distance(places: &mut [PlaceRecord]) {
    places.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn location_message(status: LocationStatus) -> Option<String> {
    match status {
        LocationStatus::Acquired(_) => Some(LOCATION_ACQUIRED.to_string()),
        LocationStatus::PermissionDenied => Some(FetchError::PermissionDenied.to_string()),
        LocationStatus::Unavailable => None,
    }
}
