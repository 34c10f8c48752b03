//! Error types for the lodtiles crate.

use std::fmt;
use std::path::PathBuf;

use lodtiles_decode::{DecodeError, TileCoord};

/// Result type for terrain grid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a terrain grid.
///
/// Every variant aborts the load it occurred in; no partially loaded grid is
/// ever returned.
#[derive(Debug)]
pub enum Error {
    /// Filesystem access failed.
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The error message.
        message: String,
    },
    /// The dataset on disk is malformed.
    Dataset(DatasetError),
    /// Loaded tiles do not fit the expected grid structure.
    Structural(StructuralError),
    /// A tile texture could not be decoded.
    Decode {
        /// The tile file that failed.
        path: PathBuf,
        /// The underlying decode error.
        source: DecodeError,
    },
}

/// Configuration errors in a level's dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// The descriptor file is unparseable or misses a required key.
    Descriptor {
        /// Path of the descriptor file.
        path: PathBuf,
        /// What was wrong with it.
        source: DecodeError,
    },
    /// A loaded elevation tile has no `files.<name>.maxval` entry.
    MissingMaxElevation {
        /// The elevation tile file name.
        file_name: String,
    },
}

/// Structural invariant violations found while assembling the quadtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A level directory holds the wrong number of tiles.
    TileCount {
        /// The level being loaded.
        level: u32,
        /// Number of tiles required.
        expected: usize,
        /// Number of tiles found.
        found: usize,
    },
    /// A descriptor's `grid_size` disagrees with the level it describes.
    GridSizeMismatch {
        /// The level being loaded.
        level: u32,
        /// Grid size of the level (`2^level`).
        expected: u32,
        /// Grid size the descriptor declares.
        found: u32,
    },
    /// A tile texture is not square.
    NonSquareTexture {
        /// The tile file.
        path: PathBuf,
        /// Texture width in pixels.
        width: u32,
        /// Texture height in pixels.
        height: u32,
    },
    /// A tile texture does not have the size the descriptor declares.
    TextureSizeMismatch {
        /// The tile file.
        path: PathBuf,
        /// Size declared by the descriptor.
        expected: u32,
        /// Actual edge length.
        found: u32,
    },
    /// A tile's grid cell does not map to a quadrant slot.
    QuadrantOutOfRange {
        /// The level being placed.
        level: u32,
        /// The offending cell.
        coord: TileCoord,
    },
    /// Two tiles map to the same quadrant slot.
    QuadrantCollision {
        /// The level being placed.
        level: u32,
        /// The cell placed twice.
        coord: TileCoord,
    },
    /// No tile exists at a cell the grid topology requires.
    MissingTile {
        /// The level searched.
        level: u32,
        /// The required cell.
        coord: TileCoord,
    },
    /// A node that already has children was subdivided again.
    NotALeaf {
        /// Arena index of the node.
        node: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, message } => {
                write!(f, "failed to access {}: {message}", path.display())
            }
            Error::Dataset(e) => write!(f, "invalid dataset: {e}"),
            Error::Structural(e) => write!(f, "invalid grid structure: {e}"),
            Error::Decode { path, source } => {
                write!(f, "failed to decode tile {}: {source}", path.display())
            }
        }
    }
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Descriptor { path, source } => {
                write!(f, "descriptor {}: {source}", path.display())
            }
            DatasetError::MissingMaxElevation { file_name } => {
                write!(f, "no max elevation listed for {file_name}")
            }
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::TileCount {
                level,
                expected,
                found,
            } => write!(f, "level {level} has {found} tiles, expected {expected}"),
            StructuralError::GridSizeMismatch {
                level,
                expected,
                found,
            } => write!(
                f,
                "level {level} descriptor declares grid size {found}, expected {expected}"
            ),
            StructuralError::NonSquareTexture {
                path,
                width,
                height,
            } => write!(
                f,
                "texture {} is {width}x{height}, expected a square",
                path.display()
            ),
            StructuralError::TextureSizeMismatch {
                path,
                expected,
                found,
            } => write!(
                f,
                "texture {} has size {found}, descriptor says {expected}",
                path.display()
            ),
            StructuralError::QuadrantOutOfRange { level, coord } => write!(
                f,
                "level {level} tile ({}, {}) is outside the quadrant",
                coord.column, coord.row
            ),
            StructuralError::QuadrantCollision { level, coord } => write!(
                f,
                "level {level} tile ({}, {}) placed twice",
                coord.column, coord.row
            ),
            StructuralError::MissingTile { level, coord } => write!(
                f,
                "level {level} has no tile at ({}, {})",
                coord.column, coord.row
            ),
            StructuralError::NotALeaf { node } => {
                write!(f, "node {node} is already subdivided")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Dataset(e) => Some(e),
            Error::Structural(e) => Some(e),
            Error::Decode { source, .. } => Some(source),
            Error::Io { .. } => None,
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Descriptor { source, .. } => Some(source),
            DatasetError::MissingMaxElevation { .. } => None,
        }
    }
}

impl std::error::Error for StructuralError {}

impl From<DatasetError> for Error {
    fn from(e: DatasetError) -> Self {
        Error::Dataset(e)
    }
}

impl From<StructuralError> for Error {
    fn from(e: StructuralError) -> Self {
        Error::Structural(e)
    }
}
