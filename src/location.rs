use crate::geometry::Coordinate;

/// Source of the device's position.
///
/// Only a one-shot "last known location" is consumed; there is no
/// subscription to continuous updates.
pub trait LocationProvider {
    /// Whether the user has allowed location reads
    fn has_permission(&self) -> bool;

    fn last_known_location(&self) -> Option<Coordinate>;
}

/// Result of asking a provider for a fresh fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationStatus {
    Acquired(Coordinate),
    Unavailable,
    PermissionDenied,
}

/// A provider that always reports the same fix, e.g. one given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    fix: Option<Coordinate>,
}

impl FixedLocation {
    pub fn new(fix: Option<Coordinate>) -> Self {
        Self { fix }
    }
}

impl LocationProvider for FixedLocation {
    fn has_permission(&self) -> bool {
        true
    }

    fn last_known_location(&self) -> Option<Coordinate> {
        self.fix
    }
}
