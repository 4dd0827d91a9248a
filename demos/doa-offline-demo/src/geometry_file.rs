//! YAML geometry file loading.
//!
//! Array geometry is never parsed by the core pipeline crates — only by
//! this demo. A flat list of `{id, position}` entries, duplicate ids
//! rejected, sorted by id before use.

use doa_geometry::MicPosition;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawMic {
    id: u32,
    position: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    microphones: Vec<RawMic>,
}

/// Errors while loading a geometry YAML file.
#[derive(Debug, thiserror::Error)]
pub enum GeometryFileError {
    /// The file could not be read.
    #[error("failed to read geometry file {path}: {source}")]
    ReadFile {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file's contents were not valid geometry YAML.
    #[error("failed to parse geometry YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Two microphones shared the same id.
    #[error("duplicate microphone id {0} in geometry file")]
    DuplicateId(u32),
}

/// Load microphone positions from a YAML file, sorted by microphone id.
///
/// Expected shape:
/// ```yaml
/// microphones:
///   - id: 0
///     position: [0.0226, 0.0226, 0.0]
///   - id: 1
///     position: [-0.0226, 0.0226, 0.0]
/// ```
pub fn load_positions(path: &Path) -> Result<Vec<MicPosition>, GeometryFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| GeometryFileError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let raw: RawGeometry = serde_yaml::from_str(&text)?;

    let mut seen = HashSet::new();
    for mic in &raw.microphones {
        if !seen.insert(mic.id) {
            return Err(GeometryFileError::DuplicateId(mic.id));
        }
    }

    let mut mics = raw.microphones;
    mics.sort_by_key(|m| m.id);
    Ok(mics.into_iter().map(|m| m.position).collect())
}
