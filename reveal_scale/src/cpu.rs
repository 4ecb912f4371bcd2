// SPDX-License-Identifier: MIT
// CPU pixel routines built on fast_image_resize (SIMD-accelerated).
// RGBA8 in → RGBA8 out, direct write into caller-provided dst buffers.

use fast_image_resize as fir;
use fir::images::{TypedCroppedImageMut, TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{ResizeAlg, ResizeOptions, Resizer};

use crate::geometry::{PixelRect, Size, SrcRect};

#[derive(Debug)]
pub enum ScaleError {
    BufferTooSmall { needed: usize, got: usize },
    /// Source box is empty or reaches outside the source buffer.
    SourceOutOfBounds(String),
    /// Destination ROI reaches outside the destination buffer.
    DestOutOfBounds(String),
    /// Cells do not tile their buffer.
    Untileable(String),
    /// A reveal canvas would exceed what an output image can hold.
    CanvasTooLarge { cell_height: u32, multiplier: f64, max: u32 },
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
    Crop(fir::CropBoxError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }
impl From<fir::CropBoxError> for ScaleError { fn from(e: fir::CropBoxError) -> Self { Self::Crop(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::BufferTooSmall { needed, got } => {
                write!(f, "Buffer too small: need {} bytes, got {}", needed, got)
            }
            ScaleError::SourceOutOfBounds(msg) => write!(f, "Source region out of bounds: {}", msg),
            ScaleError::DestOutOfBounds(msg) => write!(f, "Destination region out of bounds: {}", msg),
            ScaleError::Untileable(msg) => write!(f, "Cells do not tile the buffer: {}", msg),
            ScaleError::CanvasTooLarge { cell_height, multiplier, max } => write!(
                f,
                "Reveal canvas too tall: {} rows x {} exceeds {} rows",
                cell_height, multiplier, max
            ),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
            ScaleError::Crop(e) => write!(f, "Crop error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            ScaleError::Crop(e) => Some(e),
            _ => None,
        }
    }
}

/// Resampling kernel used when a blit changes size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResampleFilter {
    #[clap(name = "nearest")]
    Nearest,
    #[default]
    #[clap(name = "bilinear")]
    Bilinear,
    #[clap(name = "catmull-rom")]
    CatmullRom,
    #[clap(name = "lanczos3")]
    Lanczos3,
}

impl ResampleFilter {
    fn to_alg(self) -> ResizeAlg {
        match self {
            ResampleFilter::Nearest => ResizeAlg::Nearest,
            ResampleFilter::Bilinear => ResizeAlg::Convolution(fir::FilterType::Bilinear),
            ResampleFilter::CatmullRom => ResizeAlg::Convolution(fir::FilterType::CatmullRom),
            ResampleFilter::Lanczos3 => ResizeAlg::Convolution(fir::FilterType::Lanczos3),
        }
    }
}

/// Which edge of a canvas a fade starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeEdge {
    Top,
    Bottom,
}

#[inline]
fn rgba_len(size: Size) -> usize {
    (size.w as usize) * (size.h as usize) * 4
}

fn check_len(buf: &[u8], size: Size) -> Result<usize, ScaleError> {
    let needed = rgba_len(size);
    if buf.len() < needed {
        return Err(ScaleError::BufferTooSmall { needed, got: buf.len() });
    }
    Ok(needed)
}

/// Resample `src_box` of `src_rgba` into `dst_roi` of `dst_rgba`.
///
/// `src_box` may be fractional; the resizer samples sub-pixel crops. Both
/// buffers are tightly packed RGBA8. Pixels of `dst_rgba` outside `dst_roi`
/// are left untouched.
#[allow(clippy::too_many_arguments)]
pub fn blit_rgba_cpu(
    resizer: &mut Resizer,
    src_rgba: &[u8],
    src: Size,
    src_box: SrcRect,
    dst_rgba: &mut [u8],
    dst: Size,
    dst_roi: PixelRect,
    filter: ResampleFilter,
) -> Result<(), ScaleError> {
    let src_len = check_len(src_rgba, src)?;
    let dst_len = check_len(dst_rgba, dst)?;

    if src_box.is_empty()
        || src_box.x < 0.0
        || src_box.y < 0.0
        || src_box.x + src_box.w > f64::from(src.w) + 1e-6
        || src_box.bottom() > f64::from(src.h) + 1e-6
    {
        return Err(ScaleError::SourceOutOfBounds(format!(
            "{:.2}x{:.2} at {:.2},{:.2} in {}x{}",
            src_box.w, src_box.h, src_box.x, src_box.y, src.w, src.h
        )));
    }
    if !dst_roi.fits_within(dst) {
        return Err(ScaleError::DestOutOfBounds(format!(
            "{}x{} at {},{} in {}x{}",
            dst_roi.width, dst_roi.height, dst_roi.x, dst_roi.y, dst.w, dst.h
        )));
    }

    // Absorb float drift at the far edges so the crop box stays valid.
    let crop_w = src_box.w.min(f64::from(src.w) - src_box.x);
    let crop_h = src_box.h.min(f64::from(src.h) - src_box.y);

    let src_view = TypedImageRef::<U8x4>::from_buffer(src.w, src.h, &src_rgba[..src_len])?;
    let mut dst_image = TypedImage::<U8x4>::from_buffer(dst.w, dst.h, &mut dst_rgba[..dst_len])?;
    let mut roi = TypedCroppedImageMut::from_ref(
        &mut dst_image,
        dst_roi.x,
        dst_roi.y,
        dst_roi.width,
        dst_roi.height,
    )?;

    let opts = ResizeOptions::new()
        .crop(src_box.x, src_box.y, crop_w, crop_h)
        .resize_alg(filter.to_alg())
        .use_alpha(false);

    resizer.resize_typed::<U8x4>(&src_view, &mut roi, &opts)?;
    Ok(())
}

/// Copy the integer `rect` of `src_rgba` into a new tightly packed buffer.
pub fn copy_rect_rgba(src_rgba: &[u8], src: Size, rect: PixelRect) -> Result<Vec<u8>, ScaleError> {
    check_len(src_rgba, src)?;
    if !rect.fits_within(src) {
        return Err(ScaleError::SourceOutOfBounds(format!(
            "{}x{} at {},{} in {}x{}",
            rect.width, rect.height, rect.x, rect.y, src.w, src.h
        )));
    }

    let src_pitch = (src.w as usize) * 4;
    let row_bytes = (rect.width as usize) * 4;
    let mut out = vec![0u8; row_bytes * rect.height as usize];
    for (r, dst_row) in out.chunks_exact_mut(row_bytes).enumerate() {
        let row_off = (rect.y as usize + r) * src_pitch + (rect.x as usize) * 4;
        dst_row.copy_from_slice(&src_rgba[row_off..row_off + row_bytes]);
    }
    Ok(out)
}

/// Fill every pixel with `rgba`.
#[inline]
pub fn fill_rgba(dst: &mut [u8], rgba: [u8; 4]) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// Darken a band of rows toward black, strongest at `edge`.
///
/// Row `d` away from the edge gets alpha `peak * (1 - d / band)`; the blend is
/// `c * (1 - alpha)` per colour channel, alpha channel untouched. Rows at or
/// beyond `band` are not modified.
pub fn fade_rows(dst: &mut [u8], size: Size, edge: FadeEdge, band: f64, peak: f32) {
    if band <= 0.0 || size.is_empty() {
        return;
    }
    let peak = f64::from(peak.clamp(0.0, 1.0));
    let rows = (band.ceil() as u32).min(size.h);
    let row_bytes = (size.w as usize) * 4;

    for d in 0..rows {
        let alpha = peak * (1.0 - f64::from(d) / band);
        if alpha <= 0.0 {
            break;
        }
        let keep = (1.0 - alpha) as f32;
        let y = match edge {
            FadeEdge::Top => d,
            FadeEdge::Bottom => size.h - 1 - d,
        } as usize;
        let Some(row) = dst.get_mut(y * row_bytes..(y + 1) * row_bytes) else {
            break;
        };
        for px in row.chunks_exact_mut(4) {
            for c in &mut px[..3] {
                *c = (f32::from(*c) * keep).round() as u8;
            }
        }
    }
}
