//! Fixture datasets written into `tempfile` directories.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb};

use crate::types::DESCRIPTOR_FILE_NAME;

/// The four cells of the refined quadrant.
pub(crate) const QUADRANT: [(u32, u32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

pub(crate) fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Max elevation written for a fixture tile.
pub(crate) fn max_elevation_of(column: u32, row: u32) -> i32 {
    1000 + 10 * column as i32 + row as i32
}

/// Write a `dataset.json` with prefixes `elev_`/`rgb_` and pixel size 26.
pub(crate) fn write_descriptor(dir: &Path, tile_size: u32, files: &[(&str, i32)]) {
    let files: serde_json::Map<String, serde_json::Value> = files
        .iter()
        .map(|(name, maxval)| {
            (
                (*name).to_string(),
                serde_json::json!({ "minval": 0, "maxval": maxval }),
            )
        })
        .collect();
    let json = serde_json::json!({
        "// generator": "fixture",
        "elevation": { "tile_prefix": "elev_", "tile_size": tile_size, "pixel_size": 26.0 },
        "satellite": { "tile_prefix": "rgb_", "tile_size": tile_size, "pixel_size": 26.0 },
        "files": files,
    });
    std::fs::write(dir.join(DESCRIPTOR_FILE_NAME), json.to_string()).unwrap();
}

pub(crate) fn write_elevation(path: &Path, width: u32, height: u32, value: u16) {
    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_pixel(width, height, Luma([value]));
    DynamicImage::ImageLuma16(buffer)
        .save_with_format(path, ImageFormat::Tiff)
        .unwrap();
}

pub(crate) fn write_satellite(path: &Path, edge: u32) {
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(edge, edge, Rgb([40, 120, 60]));
    DynamicImage::ImageRgb8(buffer)
        .save_with_format(path, ImageFormat::Tiff)
        .unwrap();
}

/// Write a complete level directory with a tile pair per cell.
pub(crate) fn write_level(dir: &Path, tile_size: u32, cells: &[(u32, u32)]) {
    std::fs::create_dir_all(dir).unwrap();
    let mut files = Vec::new();
    for &(column, row) in cells {
        let name = format!("elev_{column}_{row}.tif");
        write_elevation(&dir.join(&name), tile_size, tile_size, 500);
        write_satellite(&dir.join(format!("rgb_{column}_{row}.tif")), tile_size);
        files.push((name, max_elevation_of(column, row)));
    }
    let files: Vec<(&str, i32)> = files
        .iter()
        .map(|(name, maxval)| (name.as_str(), *maxval))
        .collect();
    write_descriptor(dir, tile_size, &files);
}

/// Write `level1` and `level2` directories with the quadrant cells.
pub(crate) fn write_dataset(root: &Path, tile_size: u32) {
    write_level(&root.join("level1"), tile_size, &QUADRANT);
    write_level(&root.join("level2"), tile_size, &QUADRANT);
}
