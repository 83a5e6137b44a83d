//! Reading heatmap configuration & day data from JSON files
use crate::model::HeatmapDay;
use crate::options::CalendarConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub fn parse_config(src: &str) -> Result<CalendarConfig, serde_json::Error> {
    serde_json::from_str(src)
}

/// Parses a JSON array of `{"date": "YYYY-MM-DD", "count": N, "data": ...}`
/// objects
pub fn parse_days(src: &str) -> Result<Vec<HeatmapDay>, serde_json::Error> {
    serde_json::from_str(src)
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CalendarConfig, LoadError> {
    let path = path.as_ref();
    let config = parse_config(&read(path)?).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), "loaded calendar configuration");
    Ok(config)
}

pub fn load_days<P: AsRef<Path>>(path: P) -> Result<Vec<HeatmapDay>, LoadError> {
    let path = path.as_ref();
    let days = parse_days(&read(path)?).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), days = days.len(), "loaded heatmap data");
    Ok(days)
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
