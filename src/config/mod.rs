use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::Schema;

pub const DEFAULT_APP_ID: &str = "nearby-places";
pub const DEFAULT_APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_CONTACT: &str = "nearby-places@example.com";

fn default_radius() -> u32 {
    1000
}
fn default_limit() -> u32 {
    10
}

/// Settings read from `nearby.toml`. Every field is optional; CLI flags win.
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub schema: Option<Schema>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub verbose: bool,
}

impl FileConfig {
    /// Search the usual locations and return the first config that parses
    pub fn load() -> Option<Self> {
        Self::load_first(&get_config_paths())
    }

    /// Read a config the user pointed at explicitly; failures are errors
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn load_first(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                // Runs before the logger is set up, so warn on stderr directly
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("nearby.toml"), PathBuf::from(".nearby.toml")];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("nearby").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".nearby.toml"));
    }

    paths
}

/// Where and how to reach the search API
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    pub schema: Schema,
    pub url: String,
    /// Contact string embedded in the identifying header
    pub contact: String,
    pub app_id: String,
    pub app_version: String,
    /// Overpass `around` radius in meters
    pub radius_m: u32,
    /// Nominatim result limit
    pub limit: u32,
}

impl EndpointConfig {
    pub fn for_schema(schema: Schema) -> Self {
        Self {
            schema,
            url: schema.default_endpoint().to_string(),
            contact: DEFAULT_CONTACT.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            app_version: DEFAULT_APP_VERSION.to_string(),
            radius_m: default_radius(),
            limit: default_limit(),
        }
    }

    /// Start from the schema defaults and apply whatever the file sets
    pub fn from_file(schema: Schema, file: &FileConfig) -> Self {
        let mut config = Self::for_schema(schema);
        if let Some(url) = &file.endpoint {
            config.url = url.clone();
        }
        if let Some(contact) = &file.contact {
            config.contact = contact.clone();
        }
        if let Some(app_id) = &file.app_id {
            config.app_id = app_id.clone();
        }
        if let Some(app_version) = &file.app_version {
            config.app_version = app_version.clone();
        }
        if let Some(radius) = file.radius {
            config.radius_m = radius;
        }
        if let Some(limit) = file.limit {
            config.limit = limit;
        }
        config
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}
