//! JPEG encoding of finished cells.
//!
//! One lossy format, one fixed quality per run. Output is deterministic for a
//! given encoder build, but different JPEG implementations produce different
//! bytes for the same pixels, so callers should compare decoded pixels.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType};

use crate::error::{SliceError, SliceResult};
use crate::raster::RasterBuffer;

/// Quality used when nothing else is configured (0.92 on a 0..1 scale).
pub const DEFAULT_QUALITY: u8 = 92;

/// File extension matching what [`Encoder`] writes.
pub const EXTENSION: &str = "jpg";

/// An encoded output image and its upload position (0-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// File name the packaging step gives this image (`1.jpg`..`4.jpg`).
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.index + 1, EXTENSION)
    }
}

/// Fixed-quality JPEG encoder.
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    quality: u8,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

impl Encoder {
    pub fn new(quality: u8) -> SliceResult<Self> {
        if !(1..=100).contains(&quality) {
            return Err(SliceError::config(
                "quality",
                quality.to_string(),
                "must be between 1 and 100",
            ));
        }
        Ok(Self { quality })
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode `buffer` as a standalone JPEG. Alpha is dropped.
    pub fn encode(&self, buffer: &RasterBuffer) -> SliceResult<Vec<u8>> {
        let (width, height) = (buffer.width(), buffer.height());
        if width == 0 || height == 0 {
            return Err(SliceError::encode(
                None,
                format!("cannot encode an empty {}x{} buffer", width, height),
            ));
        }

        let rgb = DynamicImage::ImageRgba8(buffer.as_image().clone()).into_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(Cursor::new(&mut bytes), self.quality)
            .encode(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
            .map_err(|e| SliceError::encode(None, e.to_string()))?;
        Ok(bytes)
    }

    /// Encode and tag with the upload position.
    pub fn encode_indexed(&self, index: usize, buffer: &RasterBuffer) -> SliceResult<EncodedImage> {
        let bytes = self.encode(buffer).map_err(|e| match e {
            SliceError::Encode { reason, .. } => SliceError::encode(Some(index + 1), reason),
            other => other,
        })?;
        Ok(EncodedImage {
            index,
            width: buffer.width(),
            height: buffer.height(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_scale::geometry::Size;

    #[test]
    fn encodes_a_decodable_jpeg() {
        let buffer = RasterBuffer::filled(Size::new(32, 16), [200, 40, 40, 255]);
        let bytes = Encoder::default().encode(&buffer).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (32, 16));
        let px = decoded.get_pixel(16, 8);
        assert!((i32::from(px[0]) - 200).abs() <= 4);
        assert!((i32::from(px[1]) - 40).abs() <= 4);
    }

    #[test]
    fn empty_buffer_is_an_encode_error() {
        let err = Encoder::default()
            .encode_indexed(2, &RasterBuffer::new(0, 10))
            .unwrap_err();
        assert!(matches!(err, SliceError::Encode { index: Some(3), .. }));
    }

    #[test]
    fn quality_is_validated() {
        assert!(Encoder::new(0).is_err());
        assert!(Encoder::new(101).is_err());
        assert_eq!(Encoder::new(75).unwrap().quality(), 75);
    }

    #[test]
    fn file_names_follow_upload_order() {
        let image = EncodedImage {
            index: 0,
            width: 1,
            height: 1,
            bytes: vec![],
        };
        assert_eq!(image.file_name(), "1.jpg");
    }
}
