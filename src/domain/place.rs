use std::fmt;

pub const UNNAMED_PLACE: &str = "Unnamed Place";
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// One search result, ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub display_name: String,
    pub address: String,
    /// Only present when computed locally from the result's coordinates
    pub distance_km: Option<f64>,
}

impl PlaceRecord {
    /// Build a record, substituting the fallback name and address for blank values
    pub fn new(display_name: &str, address: &str, distance_km: Option<f64>) -> Self {
        let display_name = match display_name.trim() {
            "" => UNNAMED_PLACE.to_string(),
            _ => display_name.to_string(),
        };
        let address = match address.trim() {
            "" => ADDRESS_NOT_AVAILABLE.to_string(),
            _ => address.to_string(),
        };
        Self {
            display_name,
            address,
            distance_km,
        }
    }
}

impl fmt::Display for PlaceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n  {}", self.display_name, self.address)?;
        if let Some(d) = self.distance_km {
            write!(f, "\n  {:.2} km", d)?;
        }
        Ok(())
    }
}

/// Join the non-blank address parts with ", "
pub fn join_address<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
