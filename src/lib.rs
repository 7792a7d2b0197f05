//! nearby-places - Find points of interest near you using OpenStreetMap data

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod location;
pub mod report;
pub mod search;
