//! TIFF tile decoding.
//!
//! Two kinds of tile textures exist per grid cell:
//! - Elevation: 16-bit grayscale (or 16-bit RGB) height samples
//! - Satellite: 8-bit RGB imagery
//!
//! Both decode to CPU-side pixel buffers suitable for GPU upload. Rows of
//! both layers are flipped so the first row is the bottom of the tile,
//! matching world Y pointing up.

use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::error::{DecodeError, DecodeResult};

/// Which layer of a grid cell a texture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// Height samples.
    Elevation,
    /// Colour imagery draped over the terrain.
    Satellite,
}

impl TextureKind {
    fn name(self) -> &'static str {
        match self {
            Self::Elevation => "elevation",
            Self::Satellite => "satellite",
        }
    }
}

/// Decoded pixel storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TexturePixels {
    /// One 16-bit channel per pixel.
    R16(Vec<u16>),
    /// Three 16-bit channels per pixel.
    Rgb16(Vec<u16>),
    /// Three 8-bit channels per pixel.
    Rgb8(Vec<u8>),
}

impl TexturePixels {
    /// Number of channels per pixel.
    #[must_use]
    pub fn channels(&self) -> usize {
        match self {
            Self::R16(_) => 1,
            Self::Rgb16(_) | Self::Rgb8(_) => 3,
        }
    }

    /// Number of channel samples stored.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        match self {
            Self::R16(data) | Self::Rgb16(data) => data.len(),
            Self::Rgb8(data) => data.len(),
        }
    }
}

/// Decoded texture data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    /// Pixel data, row-major.
    pub pixels: TexturePixels,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
}

impl DecodedTexture {
    /// Check if the texture is square.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Check if the pixel buffer length matches the dimensions.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pixels.sample_count()
            == (self.width as usize) * (self.height as usize) * self.pixels.channels()
    }
}

/// Check whether a path names a TIFF file (`.tif` or `.tiff`).
#[must_use]
pub fn is_tiff_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "tif" || ext == "tiff")
}

/// Decode a TIFF image held in memory.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidFormat`] if the bytes are not a decodable
/// TIFF, or [`DecodeError::UnsupportedLayout`] if the channel layout does not
/// fit `kind` (elevation: 16-bit gray or RGB; satellite: 8-bit RGB).
pub fn decode_tiff(data: &[u8], kind: TextureKind) -> DecodeResult<DecodedTexture> {
    let image =
        image::load_from_memory_with_format(data, ImageFormat::Tiff).map_err(|e| {
            DecodeError::InvalidFormat {
                context: "tiff",
                detail: e.to_string(),
            }
        })?;
    texture_from_image(image, kind)
}

/// Read and decode a TIFF tile from disk.
///
/// # Errors
///
/// Returns [`DecodeError::UnsupportedFormat`] for paths without a TIFF
/// extension, [`DecodeError::Io`] if the file cannot be read, and otherwise
/// the errors of [`decode_tiff`].
pub fn read_tiff(path: &Path, kind: TextureKind) -> DecodeResult<DecodedTexture> {
    if !is_tiff_path(path) {
        return Err(DecodeError::UnsupportedFormat {
            detail: format!(
                "{} tile {} is not a TIFF (*.tif, *.tiff) file",
                kind.name(),
                path.display()
            ),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| DecodeError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    decode_tiff(&bytes, kind)
}

fn texture_from_image(image: DynamicImage, kind: TextureKind) -> DecodeResult<DecodedTexture> {
    let (width, height) = (image.width(), image.height());

    let pixels = match (kind, image) {
        (TextureKind::Elevation, DynamicImage::ImageLuma16(buffer)) => {
            TexturePixels::R16(image::imageops::flip_vertical(&buffer).into_raw())
        }
        (TextureKind::Elevation, DynamicImage::ImageRgb16(buffer)) => {
            TexturePixels::Rgb16(image::imageops::flip_vertical(&buffer).into_raw())
        }
        (TextureKind::Satellite, DynamicImage::ImageRgb8(buffer)) => {
            TexturePixels::Rgb8(image::imageops::flip_vertical(&buffer).into_raw())
        }
        (kind, other) => {
            return Err(DecodeError::UnsupportedLayout {
                context: kind.name(),
                layout: format!("{:?}", other.color()),
            });
        }
    };

    Ok(DecodedTexture {
        pixels,
        width,
        height,
    })
}

/// Encode an image as TIFF bytes, for building fixtures in tests.
#[cfg(test)]
pub(crate) fn encode_tiff(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Tiff).unwrap();
    bytes.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb, Rgba};

    #[test]
    fn test_decode_elevation_gray16() {
        // Two rows: top row is 1, 2; bottom row is 3, 4.
        let buffer: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(2, 2, vec![1, 2, 3, 4]).unwrap();
        let bytes = encode_tiff(&DynamicImage::ImageLuma16(buffer));

        let texture = decode_tiff(&bytes, TextureKind::Elevation).unwrap();

        assert_eq!(texture.width, 2);
        assert_eq!(texture.height, 2);
        assert!(texture.is_square());
        assert!(texture.is_valid());
        // Rows flipped so the bottom row comes first.
        assert_eq!(texture.pixels, TexturePixels::R16(vec![3, 4, 1, 2]));
    }

    #[test]
    fn test_decode_elevation_rgb16() {
        let buffer: ImageBuffer<Rgb<u16>, Vec<u16>> =
            ImageBuffer::from_pixel(3, 2, Rgb([100, 200, 300]));
        let bytes = encode_tiff(&DynamicImage::ImageRgb16(buffer));

        let texture = decode_tiff(&bytes, TextureKind::Elevation).unwrap();

        assert_eq!((texture.width, texture.height), (3, 2));
        assert!(!texture.is_square());
        assert!(texture.is_valid());
        assert_eq!(texture.pixels.channels(), 3);
    }

    #[test]
    fn test_decode_satellite_rgb8() {
        // Top row is 10, 20, 30; bottom row is 40, 50, 60.
        let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(1, 2, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let bytes = encode_tiff(&DynamicImage::ImageRgb8(buffer));

        let texture = decode_tiff(&bytes, TextureKind::Satellite).unwrap();

        assert_eq!(
            texture.pixels,
            TexturePixels::Rgb8(vec![40, 50, 60, 10, 20, 30])
        );
    }

    #[test]
    fn test_layers_share_row_order() {
        // Top row marked 1, bottom row marked 2 in both layers.
        let elevation: ImageBuffer<Luma<u16>, Vec<u16>> =
            ImageBuffer::from_raw(1, 2, vec![1, 2]).unwrap();
        let satellite: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_raw(1, 2, vec![1, 1, 1, 2, 2, 2]).unwrap();

        let elevation = decode_tiff(
            &encode_tiff(&DynamicImage::ImageLuma16(elevation)),
            TextureKind::Elevation,
        )
        .unwrap();
        let satellite = decode_tiff(
            &encode_tiff(&DynamicImage::ImageRgb8(satellite)),
            TextureKind::Satellite,
        )
        .unwrap();

        let TexturePixels::R16(heights) = elevation.pixels else {
            panic!("expected R16 elevation");
        };
        let TexturePixels::Rgb8(colors) = satellite.pixels else {
            panic!("expected Rgb8 satellite");
        };
        assert_eq!(u16::from(colors[0]), heights[0]);
        assert_eq!(heights[0], 2);
    }

    #[test]
    fn test_decode_unsupported_layouts() {
        // 8-bit gray is not an elevation layout.
        let gray8: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Luma([7]));
        let bytes = encode_tiff(&DynamicImage::ImageLuma8(gray8));
        assert!(matches!(
            decode_tiff(&bytes, TextureKind::Elevation),
            Err(DecodeError::UnsupportedLayout {
                context: "elevation",
                ..
            })
        ));

        // RGBA is not a satellite layout.
        let rgba: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(2, 2, Rgba([1, 2, 3, 4]));
        let bytes = encode_tiff(&DynamicImage::ImageRgba8(rgba));
        assert!(matches!(
            decode_tiff(&bytes, TextureKind::Satellite),
            Err(DecodeError::UnsupportedLayout {
                context: "satellite",
                ..
            })
        ));

        // 16-bit elevation data is not satellite imagery.
        let gray16: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(2, 2, Luma([7]));
        let bytes = encode_tiff(&DynamicImage::ImageLuma16(gray16));
        assert!(decode_tiff(&bytes, TextureKind::Satellite).is_err());
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode_tiff(&[0xFF, 0xD8, 0xFF, 0xE0], TextureKind::Elevation);
        assert!(matches!(result, Err(DecodeError::InvalidFormat { .. })));
    }

    #[test]
    fn test_is_tiff_path() {
        assert!(is_tiff_path(Path::new("data/level1/elev_0_0.tif")));
        assert!(is_tiff_path(Path::new("elev_0_0.tiff")));
        assert!(!is_tiff_path(Path::new("elev_0_0.png")));
        assert!(!is_tiff_path(Path::new("elev_0_0")));
    }

    #[test]
    fn test_read_tiff_rejects_other_formats() {
        let result = read_tiff(Path::new("heights.png"), TextureKind::Elevation);
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_read_tiff_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.tif");
        let result = read_tiff(&path, TextureKind::Satellite);
        assert!(matches!(result, Err(DecodeError::Io { .. })));
    }
}
