//! # Raster Buffers
//!
//! [`RasterBuffer`] is the owned RGBA8 pixel grid every stage passes around.
//! Decoding goes through the `image` crate; cropping, blitting, fills and
//! fades go through `reveal_scale::cpu` so the geometry crate stays the single
//! place pixel loops live.
//!
//! Each buffer is created and exclusively owned by the stage that allocates
//! it. Buffers that several cell workers read (the cropped and original
//! images) are shared behind an `Arc` and never written after creation.

use fast_image_resize::Resizer;
use image::{DynamicImage, GenericImageView, RgbaImage};
use reveal_scale::cpu::{self, FadeEdge, ResampleFilter};
use reveal_scale::geometry::{PixelRect, Size, SrcRect};

use crate::error::{SliceError, SliceResult};

/// Opaque black, the background of every reveal canvas.
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// Owned, mutable RGBA8 image.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl RasterBuffer {
    /// Transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Buffer with every pixel set to `rgba`.
    pub fn filled(size: Size, rgba: [u8; 4]) -> Self {
        let mut buffer = Self::new(size.w, size.h);
        buffer.fill(rgba);
        buffer
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image: image.into_rgba8(),
        }
    }

    /// Decode an encoded image held in memory.
    pub fn load(bytes: &[u8]) -> SliceResult<Self> {
        if bytes.is_empty() {
            return Err(SliceError::decode("input is empty"));
        }

        let decoded = match image::guess_format(bytes) {
            Ok(format) => image::load_from_memory_with_format(bytes, format),
            Err(_) => image::load_from_memory(bytes),
        }
        .map_err(|e| SliceError::decode(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(SliceError::decode(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        log::debug!("decoded source image {}x{}", width, height);
        Ok(Self::from_dynamic(decoded))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Pixel at `(x, y)`; panics outside the buffer like `RgbaImage::get_pixel`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Copy `rect` out into a new buffer, pixel for pixel.
    pub fn crop(&self, rect: PixelRect) -> SliceResult<Self> {
        if !rect.fits_within(self.size()) {
            return Err(SliceError::bounds(
                "crop",
                format!(
                    "{}x{} at {},{} is not inside the {}x{} image",
                    rect.width,
                    rect.height,
                    rect.x,
                    rect.y,
                    self.width(),
                    self.height()
                ),
            ));
        }

        let pixels = cpu::copy_rect_rgba(self.as_raw(), self.size(), rect)?;
        let image = RgbaImage::from_raw(rect.width, rect.height, pixels)
            .ok_or_else(|| SliceError::processing("crop", "cropped buffer length mismatch"))?;
        Ok(Self { image })
    }

    /// Resample `src_rect` of `src` into `dst_rect` of this buffer.
    ///
    /// Rect sizes may differ; `filter` decides how the scale change is sampled.
    pub fn blit(
        &mut self,
        dst_rect: PixelRect,
        src: &RasterBuffer,
        src_rect: SrcRect,
        filter: ResampleFilter,
    ) -> SliceResult<()> {
        let dst_size = self.size();
        cpu::blit_rgba_cpu(
            &mut Resizer::new(),
            src.as_raw(),
            src.size(),
            src_rect,
            &mut self.image,
            dst_size,
            dst_rect,
            filter,
        )?;
        Ok(())
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        cpu::fill_rgba(&mut self.image, rgba);
    }

    /// Darken `band` rows toward black starting at `edge`.
    pub fn fade(&mut self, edge: FadeEdge, band: f64, peak: f32) {
        let size = self.size();
        cpu::fade_rows(&mut self.image, size, edge, band, peak);
    }
}
