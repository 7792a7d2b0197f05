pub mod distance;

pub use distance::{Coordinate, CoordinateError, distance_km};
