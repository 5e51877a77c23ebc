//! YAML seed files describing peddlers for local development.
//!
//! A seed file stands in for the location-reporting side of the app: it is
//! upserted into the store at startup so searches have something to find.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::types::NewPeddler;
use crate::ConfigError;

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub peddlers: Vec<NewPeddler>,
}

/// Load and validate a seed file from disk.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed_file(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_seed(&content)
}

/// Parse and validate seed YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_seed(yaml: &str) -> Result<SeedFile, ConfigError> {
    let seed: SeedFile = serde_yaml::from_str(yaml)?;
    validate_seed(&seed)?;
    Ok(seed)
}

fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for peddler in &seed.peddlers {
        if peddler.id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "peddler id must be non-empty".to_string(),
            ));
        }

        if peddler.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "peddler '{}' must have a non-empty name",
                peddler.id
            )));
        }

        if !seen_ids.insert(peddler.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate peddler id: '{}'",
                peddler.id
            )));
        }

        if let Some(location) = peddler.location {
            if !location.is_valid() {
                return Err(ConfigError::Validation(format!(
                    "peddler '{}' has out-of-range location ({}, {})",
                    peddler.id, location.lat, location.lon
                )));
            }
        }

        if let Some(rating) = peddler.rating {
            if !(1.0..=5.0).contains(&rating) {
                return Err(ConfigError::Validation(format!(
                    "peddler '{}' has rating {rating}; must be between 1 and 5",
                    peddler.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
