pub mod place;

pub use place::{ADDRESS_NOT_AVAILABLE, PlaceRecord, UNNAMED_PLACE};
