//! The three ways a building enters the viewer. All of them end in
//! [`convert`](crate::convert::convert).

use crate::convert::convert_str;
use crate::error::IngestError;
use crate::model::Building;
use std::path::PathBuf;
use tracing::info;

/// Three stacked pentagonal levels with one unit each.
pub const SAMPLE_BUILDING_JSON: &str = include_str!("../data/sample-building.json");

#[derive(Debug, Clone)]
pub enum IngestSource {
    Sample,
    File(PathBuf),
    Text(String),
}

pub fn load(source: &IngestSource) -> Result<Building, IngestError> {
    match source {
        IngestSource::Sample => sample(),
        IngestSource::File(path) => {
            info!(path = %path.display(), "loading building file");
            // The whole file is read before parsing; a short read is just an I/O error.
            let text = std::fs::read_to_string(path)
                .map_err(|e| IngestError::File(e.into()))?;
            convert_str(&text).map_err(IngestError::File)
        }
        IngestSource::Text(text) => convert_str(text).map_err(IngestError::Text),
    }
}

pub fn sample() -> Result<Building, IngestError> {
    convert_str(SAMPLE_BUILDING_JSON).map_err(IngestError::Sample)
}
