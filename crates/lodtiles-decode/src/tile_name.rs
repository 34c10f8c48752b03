//! Tile filename convention.

use crate::TileCoord;

/// File extension shared by elevation and satellite tiles.
pub const TILE_EXTENSION: &str = ".tif";

/// Parse grid coordinates from a tile filename.
///
/// Tile files are named `<prefix><column>_<row>.tif`, where column and row are
/// non-negative decimal integers. Elevation and satellite tiles for the same
/// grid cell share column and row and differ only by prefix.
///
/// Returns `None` if `file_name` does not follow the convention for `prefix`.
///
/// # Example
///
/// `plzen_elev_3_1.tif` with prefix `plzen_elev_` is column 3, row 1.
#[must_use]
pub fn parse_tile_name(file_name: &str, prefix: &str) -> Option<TileCoord> {
    let stem = file_name
        .strip_prefix(prefix)?
        .strip_suffix(TILE_EXTENSION)?;
    let (column, row) = stem.split_once('_')?;

    Some(TileCoord {
        column: parse_index(column)?,
        row: parse_index(row)?,
    })
}

/// Format the tile filename for a grid cell.
#[must_use]
pub fn tile_file_name(prefix: &str, coord: TileCoord) -> String {
    format!("{prefix}{}_{}{TILE_EXTENSION}", coord.column, coord.row)
}

/// Parse a grid index, accepting only ASCII digits (no sign, no whitespace).
fn parse_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_tile_name_basic() {
        let coord = parse_tile_name("elev_1_0.tif", "elev_").unwrap();
        assert_eq!(coord, TileCoord { column: 1, row: 0 });
    }

    #[test]
    fn test_parse_tile_name_multi_digit() {
        // Both indices keep every digit, not just the last one.
        let coord = parse_tile_name("plzen_elev_12_305.tif", "plzen_elev_").unwrap();
        assert_eq!(
            coord,
            TileCoord {
                column: 12,
                row: 305
            }
        );
    }

    #[test]
    fn test_parse_tile_name_prefix_with_underscores() {
        let coord = parse_tile_name("a_b_c_7_8.tif", "a_b_c_").unwrap();
        assert_eq!(coord, TileCoord { column: 7, row: 8 });
    }

    #[test]
    fn test_parse_tile_name_rejects() {
        // Wrong prefix.
        assert!(parse_tile_name("rgb_0_0.tif", "elev_").is_none());
        // Wrong extension.
        assert!(parse_tile_name("elev_0_0.png", "elev_").is_none());
        assert!(parse_tile_name("elev_0_0.tiff", "elev_").is_none());
        // Missing row.
        assert!(parse_tile_name("elev_0.tif", "elev_").is_none());
        // Extra component.
        assert!(parse_tile_name("elev_0_1_2.tif", "elev_").is_none());
        // Signs and empty parts.
        assert!(parse_tile_name("elev_-1_0.tif", "elev_").is_none());
        assert!(parse_tile_name("elev_+1_0.tif", "elev_").is_none());
        assert!(parse_tile_name("elev__0.tif", "elev_").is_none());
        assert!(parse_tile_name("elev_0_.tif", "elev_").is_none());
        // Not a number.
        assert!(parse_tile_name("elev_x_0.tif", "elev_").is_none());
    }

    #[test]
    fn test_tile_file_name() {
        let name = tile_file_name("rgb_", TileCoord { column: 1, row: 0 });
        assert_eq!(name, "rgb_1_0.tif");
    }

    #[test]
    fn test_companion_name_shares_coordinates() {
        // The satellite companion is derived from the parsed elevation coordinates.
        let coord = parse_tile_name("elev_4_2.tif", "elev_").unwrap();
        assert_eq!(tile_file_name("rgb_", coord), "rgb_4_2.tif");
    }

    proptest! {
        #[test]
        fn test_parse_formatted_name(column in 0u32..100_000, row in 0u32..100_000) {
            let coord = TileCoord { column, row };
            let name = tile_file_name("elev_", coord);
            prop_assert_eq!(parse_tile_name(&name, "elev_"), Some(coord));
        }
    }
}
