//! Per-level dataset and tile loading.
//!
//! A level directory holds a `dataset.json` descriptor plus pairs of
//! `<elevation_prefix>C_R.tif` / `<satellite_prefix>C_R.tif` tiles. Files are
//! visited in directory order and tiles are returned unordered.

use std::path::{Path, PathBuf};

use lodtiles_decode::{
    DatasetDescriptor, DecodedTexture, TextureKind, parse_dataset_descriptor, parse_tile_name,
    read_tiff, tile_file_name,
};

use crate::error::{DatasetError, Error, Result, StructuralError};
use crate::store::TextureStore;
use crate::types::{
    DESCRIPTOR_FILE_NAME, TerrainTile, UNPLACED_LEVEL, grid_size, to_world_position,
};

/// Read and parse `<dir>/dataset.json`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and
/// [`DatasetError::Descriptor`] if it is malformed or misses a required key.
pub fn load_description(dir: &Path) -> Result<DatasetDescriptor> {
    let path = dir.join(DESCRIPTOR_FILE_NAME);
    let bytes = std::fs::read(&path).map_err(|e| Error::Io {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let descriptor = parse_dataset_descriptor(&bytes)
        .map_err(|source| DatasetError::Descriptor { path, source })?;

    tracing::debug!(
        dir = %dir.display(),
        files = descriptor.max_elevations.len(),
        "loaded dataset descriptor"
    );
    Ok(descriptor)
}

/// Load every complete tile pair of one level directory.
///
/// Elevation tiles without a satellite companion are skipped. Returned tiles
/// have their level unset; the caller assigns it when placing them.
///
/// # Errors
///
/// Fails if the descriptor declares a grid size other than `2^level`, the
/// directory cannot be read, a texture fails to decode or has the wrong
/// shape, or a tile has no max elevation entry. On failure every texture
/// uploaded by this call has already been released.
pub fn load_level_tiles<S: TextureStore>(
    dir: &Path,
    level: u32,
    descriptor: &DatasetDescriptor,
    quad_size: f32,
    store: &mut S,
) -> Result<Vec<TerrainTile>> {
    if let Some(found) = descriptor.description.grid_size {
        let expected = grid_size(level);
        if found != expected {
            return Err(StructuralError::GridSizeMismatch {
                level,
                expected,
                found,
            }
            .into());
        }
    }

    let entries = std::fs::read_dir(dir).map_err(|e| {
        tracing::error!(dir = %dir.display(), "tile directory does not exist");
        Error::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    let mut tiles = Vec::new();
    for entry in entries {
        let result = entry
            .map_err(|e| Error::Io {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })
            .and_then(|entry| load_entry(dir, &entry.path(), level, descriptor, quad_size, store));

        match result {
            Ok(Some(tile)) => tiles.push(tile),
            Ok(None) => {}
            Err(e) => {
                release_tiles(store, &tiles);
                return Err(e);
            }
        }
    }

    Ok(tiles)
}

/// Release both textures of every tile.
pub(crate) fn release_tiles<'a, S: TextureStore>(
    store: &mut S,
    tiles: impl IntoIterator<Item = &'a TerrainTile>,
) {
    for tile in tiles {
        for handle in tile.textures() {
            store.release(handle);
        }
    }
}

fn load_entry<S: TextureStore>(
    dir: &Path,
    path: &Path,
    level: u32,
    descriptor: &DatasetDescriptor,
    quad_size: f32,
    store: &mut S,
) -> Result<Option<TerrainTile>> {
    let description = &descriptor.description;

    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return Ok(None);
    };
    let Some(coord) = parse_tile_name(file_name, &description.elevation_tile_prefix) else {
        tracing::debug!(file = file_name, "ignoring file");
        return Ok(None);
    };

    let satellite_path = dir.join(tile_file_name(&description.satellite_tile_prefix, coord));
    if !satellite_path.is_file() {
        tracing::info!(
            file = file_name,
            satellite = %satellite_path.display(),
            "skipping tile without satellite image"
        );
        return Ok(None);
    }

    let position = to_world_position(coord.column, coord.row, level, quad_size);
    tracing::debug!(
        column = coord.column,
        row = coord.row,
        x = position.x,
        y = position.y,
        "tile position"
    );

    let elevation = read_texture(path, TextureKind::Elevation, description.elevation_tile_size)?;
    let satellite = read_texture(
        &satellite_path,
        TextureKind::Satellite,
        description.satellite_tile_size,
    )?;

    let max_elevation = descriptor.max_elevations.get(file_name).ok_or_else(|| {
        DatasetError::MissingMaxElevation {
            file_name: file_name.to_string(),
        }
    })?;

    let tile = TerrainTile {
        elevation_map: store.upload(elevation),
        satellite_map: store.upload(satellite),
        position,
        elevation_min: max_elevation as f32,
        grid_c: coord.column,
        grid_r: coord.row,
        level: UNPLACED_LEVEL,
    };
    tracing::info!(
        elevation = file_name,
        satellite = %satellite_path.display(),
        "loaded tile"
    );

    Ok(Some(tile))
}

fn read_texture(path: &Path, kind: TextureKind, expected: u32) -> Result<DecodedTexture> {
    let texture = read_tiff(path, kind).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    if !texture.is_square() {
        return Err(StructuralError::NonSquareTexture {
            path: PathBuf::from(path),
            width: texture.width,
            height: texture.height,
        }
        .into());
    }
    if texture.width != expected {
        return Err(StructuralError::TextureSizeMismatch {
            path: PathBuf::from(path),
            expected,
            found: texture.width,
        }
        .into());
    }

    Ok(texture)
}
