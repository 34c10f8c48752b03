//! Dataset descriptor (`dataset.json`) decoding.
//!
//! Every LOD level directory carries a descriptor with the tile geometry for
//! that level and a per-file maximum elevation table:
//!
//! ```json
//! {
//!   "grid_size": 2,
//!   "elevation": { "tile_prefix": "plzen_elev_", "pixel_size": 26.0632, "tile_size": 716 },
//!   "satellite": { "tile_prefix": "plzen_rgb_", "tile_size": 716 },
//!   "files": { "plzen_elev_0_0.tif": { "maxval": 812 } }
//! }
//! ```
//!
//! `grid_size` and `satellite.pixel_size` are optional; every other key above
//! is required. Unknown keys (the generator emits `"// ..."` comment keys) are
//! ignored.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::error::{DecodeError, DecodeResult};

/// Per-level tile geometry read from a dataset descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetDescription {
    /// Filename prefix of elevation tiles (e.g. `plzen_elev_`).
    pub elevation_tile_prefix: String,
    /// Elevation tile edge length in pixels (tiles are square).
    pub elevation_tile_size: u32,
    /// World units per elevation pixel.
    pub elevation_pixel_size: f64,
    /// Filename prefix of satellite tiles (e.g. `plzen_rgb_`).
    pub satellite_tile_prefix: String,
    /// Satellite tile edge length in pixels (tiles are square).
    pub satellite_tile_size: u32,
    /// World units per satellite pixel, when the generator recorded it.
    pub satellite_pixel_size: Option<f64>,
    /// Number of tiles along one side of the level grid, when recorded.
    pub grid_size: Option<u32>,
}

/// Maximum elevation value for every elevation tile file of one level.
///
/// Keyed by bare filename (no directory). The table belongs to the
/// descriptor it was read from, so lookups for one level can never see
/// entries of another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaxElevationTable {
    entries: HashMap<String, i32>,
}

impl MaxElevationTable {
    /// Look up the maximum elevation of a tile file by exact filename.
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<i32> {
        self.entries.get(file_name).copied()
    }

    /// Number of files in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A fully decoded dataset descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetDescriptor {
    /// Tile geometry of the level.
    pub description: DatasetDescription,
    /// Maximum elevation per elevation tile file of the level.
    pub max_elevations: MaxElevationTable,
}

#[derive(Deserialize)]
struct RawDescriptor {
    grid_size: Option<u32>,
    elevation: Option<RawLayer>,
    satellite: Option<RawLayer>,
    files: Option<BTreeMap<String, RawFile>>,
}

#[derive(Deserialize)]
struct RawLayer {
    tile_prefix: Option<String>,
    tile_size: Option<u32>,
    pixel_size: Option<f64>,
}

#[derive(Deserialize)]
struct RawFile {
    maxval: Option<i32>,
}

/// Decode a dataset descriptor from JSON bytes.
///
/// # Errors
///
/// Returns [`DecodeError::MissingField`] naming the dotted key path of the
/// first absent required key, or [`DecodeError::InvalidFormat`] if the JSON is
/// malformed, a value has the wrong type, or a size is not positive.
pub fn parse_dataset_descriptor(json: &[u8]) -> DecodeResult<DatasetDescriptor> {
    let raw: RawDescriptor =
        serde_json::from_slice(json).map_err(|e| DecodeError::InvalidFormat {
            context: "dataset descriptor",
            detail: e.to_string(),
        })?;

    let elevation = raw.elevation.ok_or_else(|| missing("elevation"))?;
    let elevation_tile_prefix = elevation
        .tile_prefix
        .ok_or_else(|| missing("elevation.tile_prefix"))?;
    let elevation_pixel_size = elevation
        .pixel_size
        .ok_or_else(|| missing("elevation.pixel_size"))?;
    let elevation_tile_size = elevation
        .tile_size
        .ok_or_else(|| missing("elevation.tile_size"))?;

    let satellite = raw.satellite.ok_or_else(|| missing("satellite"))?;
    let satellite_tile_prefix = satellite
        .tile_prefix
        .ok_or_else(|| missing("satellite.tile_prefix"))?;
    let satellite_tile_size = satellite
        .tile_size
        .ok_or_else(|| missing("satellite.tile_size"))?;

    let files = raw.files.ok_or_else(|| missing("files"))?;
    let mut entries = HashMap::with_capacity(files.len());
    for (file_name, file) in files {
        let Some(maxval) = file.maxval else {
            return Err(missing(&format!("files.{file_name}.maxval")));
        };
        entries.insert(file_name, maxval);
    }

    require_positive_size("elevation.tile_size", elevation_tile_size)?;
    require_positive_size("satellite.tile_size", satellite_tile_size)?;
    require_positive_pixel_size("elevation.pixel_size", elevation_pixel_size)?;
    if let Some(pixel_size) = satellite.pixel_size {
        require_positive_pixel_size("satellite.pixel_size", pixel_size)?;
    }

    Ok(DatasetDescriptor {
        description: DatasetDescription {
            elevation_tile_prefix,
            elevation_tile_size,
            elevation_pixel_size,
            satellite_tile_prefix,
            satellite_tile_size,
            satellite_pixel_size: satellite.pixel_size,
            grid_size: raw.grid_size,
        },
        max_elevations: MaxElevationTable { entries },
    })
}

fn missing(field: &str) -> DecodeError {
    DecodeError::MissingField {
        field: field.to_string(),
    }
}

fn require_positive_size(field: &'static str, value: u32) -> DecodeResult<()> {
    if value == 0 {
        return Err(DecodeError::InvalidFormat {
            context: "dataset descriptor",
            detail: format!("{field} must be greater than zero"),
        });
    }
    Ok(())
}

fn require_positive_pixel_size(field: &'static str, value: f64) -> DecodeResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(DecodeError::InvalidFormat {
            context: "dataset descriptor",
            detail: format!("{field} must be a positive number, got {value}"),
        });
    }
    Ok(())
}
