//! # Grid Reveal
//!
//! Turns one image into four JPEGs that tile seamlessly in a social
//! timeline's four-image grid.
//!
//! - Landscape (and square) crops split into 2×2 quadrants.
//! - Portrait crops split into four horizontal strips.
//! - With extended reveal on, each cell is made taller than its slice and
//!   filled with the surrounding content of the original image, so the grid
//!   thumbnail (center-cropped by the platform) still looks seamless while
//!   opening an image shows more. Where the original runs out the padding is
//!   black and fades into the content.
//!
//! ## Architecture
//!
//! - `raster`: owned RGBA buffers, decode, crop, blit, fill, fade
//! - `orientation`: portrait/landscape classification
//! - `processing`: quadrant and strip slicers, the reveal extender
//! - `encoder`: fixed-quality JPEG output
//! - `pipeline`: the async orchestration of all of the above
//! - `output`: writing the four images with a README and manifest
//! - `config`: user-facing configuration and validation
//!
//! Geometry, tiling and reveal planning live in the `reveal_scale` crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grid_reveal::{slice_image, SliceOptions};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let output = slice_image(Path::new("photo.png"), None, SliceOptions::default()).await?;
//! for image in &output.images {
//!     std::fs::write(image.file_name(), &image.bytes)?;
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use reveal_scale::cpu::ResampleFilter;
use reveal_scale::geometry::{Mode, PixelRect};
use reveal_scale::reveal::RevealCfg;

pub mod config;
pub mod encoder;
pub mod error;
pub mod orientation;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod raster;

/// Re-export error types for convenience
pub use error::{HasRecoverySuggestion, HasSeverity, SliceError, SliceResult};

pub use encoder::{EncodedImage, Encoder};
pub use orientation::ModeInfo;
pub use pipeline::{Pipeline, SliceOutput, process};
pub use raster::RasterBuffer;

/// Options for one slicing run.
///
/// # Examples
///
/// ```rust
/// use grid_reveal::SliceOptions;
///
/// let options = SliceOptions {
///     extended_reveal: false,
///     quality: 85,
///     ..SliceOptions::default()
/// };
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SliceOptions {
    /// Render taller reveal cells instead of plain slices.
    pub extended_reveal: bool,

    /// Force a partition instead of classifying the crop.
    pub mode: Option<Mode>,

    /// Multipliers and fade strength for extended reveal.
    pub reveal: RevealCfg,

    /// JPEG quality, 1-100.
    pub quality: u8,

    /// Resampling filter used when reveal content is scaled.
    pub filter: ResampleFilter,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            extended_reveal: true,
            mode: None,
            reveal: RevealCfg::default(),
            quality: encoder::DEFAULT_QUALITY,
            filter: ResampleFilter::default(),
        }
    }
}

impl SliceOptions {
    /// Check quality and reveal tuning without running anything.
    pub fn validate(&self) -> SliceResult<()> {
        Encoder::new(self.quality)?;
        for mode in [Mode::Landscape, Mode::Portrait] {
            processing::RevealExtender::from_cfg(mode, &self.reveal)?;
        }
        Ok(())
    }
}

/// Load the image at `input` and slice it.
///
/// `crop` is in source pixels and defaults to the whole image.
pub async fn slice_image(
    input: &Path,
    crop: Option<PixelRect>,
    options: SliceOptions,
) -> SliceResult<SliceOutput> {
    let pipeline = Pipeline::new(options)?;
    let source = tokio::fs::read(input)
        .await
        .map_err(|e| SliceError::io("read input", e).with_path(input.display().to_string()))?;
    log::info!("loaded {} ({} bytes)", input.display(), source.len());
    pipeline
        .run(source, crop)
        .await
        .map_err(|e| e.with_context(input.display().to_string()))
}
