//! # Slice Configuration
//!
//! The common interface between the CLI and the slicing library: plain
//! fields, defaults matching the platform's expectations, validation with
//! readable messages, and conversion into [`crate::SliceOptions`].
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `input` | `String` | Existing image path | Source image |
//! | `output_dir` | `String` | Any valid path | Where `1.jpg`..`4.jpg` go |
//! | `crop` | `Option<PixelRect>` | Inside the image | Crop in source pixels |
//! | `extended_reveal` | `bool` | true/false | Taller cells with hidden content |
//! | `mode` | `Option<Mode>` | portrait/landscape | Override classification |
//! | `landscape_multiplier` | `f64` | 1.0-65535 | Quadrant height multiplier |
//! | `portrait_multiplier` | `f64` | 1.0-65535 | Strip height multiplier |
//! | `quality` | `u8` | 1-100 | JPEG quality |
//! | `fade_peak` | `f32` | 0.0-1.0 | Strength of the edge fade |
//! | `filter` | `ResampleFilter` | | Resampling for reveal content |
//!
//! ## Examples
//!
//! ```rust
//! use grid_reveal::config::SliceConfig;
//!
//! let mut config = SliceConfig::default();
//! config.input = "photo.png".to_string();
//! assert!(config.validate().is_ok());
//!
//! let options = config.to_slice_options();
//! assert!(options.extended_reveal);
//! ```

use reveal_scale::cpu::ResampleFilter;
use reveal_scale::geometry::{Mode, PixelRect};
use reveal_scale::reveal::{MAX_OUTPUT_DIM, RevealCfg};

use crate::encoder::DEFAULT_QUALITY;

/// Configuration for one slicing run.
#[derive(Debug, Clone)]
pub struct SliceConfig {
    /// Path of the source image. Any format the `image` crate decodes.
    pub input: String,

    /// Directory receiving the four images, README and manifest.
    /// Created if missing.
    pub output_dir: String,

    /// Crop rectangle in source pixels. `None` uses the whole image.
    pub crop: Option<PixelRect>,

    /// Whether to render taller reveal cells.
    pub extended_reveal: bool,

    /// Forces the partition instead of deriving it from the crop shape.
    pub mode: Option<Mode>,

    /// Height multiplier for landscape quadrants.
    pub landscape_multiplier: f64,

    /// Height multiplier for portrait strips.
    pub portrait_multiplier: f64,

    /// JPEG quality on a 1-100 scale (92 matches 0.92).
    pub quality: u8,

    /// Darkness of the fade where reveal padding meets content.
    /// 1.0 fades all the way to black at the edge.
    pub fade_peak: f32,

    pub filter: ResampleFilter,
}

impl Default for SliceConfig {
    /// Defaults:
    /// - `output_dir`: "grid"
    /// - extended reveal on, multipliers 2.5 (landscape) and 1.5 (portrait)
    /// - `quality`: 92
    /// - `fade_peak`: 1.0
    /// - bilinear filtering
    fn default() -> Self {
        let reveal = RevealCfg::default();
        Self {
            input: String::new(),
            output_dir: "grid".to_string(),
            crop: None,
            extended_reveal: true,
            mode: None,
            landscape_multiplier: reveal.landscape_multiplier,
            portrait_multiplier: reveal.portrait_multiplier,
            quality: DEFAULT_QUALITY,
            fade_peak: reveal.fade_peak,
            filter: ResampleFilter::default(),
        }
    }
}

impl SliceConfig {
    /// Creates a configuration for `input` → `output_dir` with default tuning.
    pub fn new(input: String, output_dir: String, crop: Option<PixelRect>, extended_reveal: bool) -> Self {
        Self {
            input,
            output_dir,
            crop,
            extended_reveal,
            ..Self::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.trim().is_empty() {
            return Err("Input image path must not be empty".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("Output directory must not be empty".to_string());
        }
        if let Some(crop) = self.crop {
            if crop.width == 0 || crop.height == 0 {
                return Err(format!(
                    "Crop must have a non-zero size, got {}x{}",
                    crop.width, crop.height
                ));
            }
        }
        for (name, value) in [
            ("Landscape multiplier", self.landscape_multiplier),
            ("Portrait multiplier", self.portrait_multiplier),
        ] {
            if !(1.0..=f64::from(MAX_OUTPUT_DIM)).contains(&value) {
                return Err(format!(
                    "{} must be between 1.0 and {}, got {}",
                    name, MAX_OUTPUT_DIM, value
                ));
            }
        }
        if !(1..=100).contains(&self.quality) {
            return Err("Quality must be between 1 and 100".to_string());
        }
        if !(0.0..=1.0).contains(&self.fade_peak) {
            return Err("Fade peak must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }

    /// Convert to SliceOptions for use with the slicing library
    pub fn to_slice_options(&self) -> crate::SliceOptions {
        crate::SliceOptions {
            extended_reveal: self.extended_reveal,
            mode: self.mode,
            reveal: RevealCfg {
                landscape_multiplier: self.landscape_multiplier,
                portrait_multiplier: self.portrait_multiplier,
                fade_peak: self.fade_peak,
            },
            quality: self.quality,
            filter: self.filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SliceConfig {
        SliceConfig::new("in.png".to_string(), "out".to_string(), None, true)
    }

    #[test]
    fn test_default_config() {
        let config = SliceConfig::default();
        assert_eq!(config.output_dir, "grid");
        assert_eq!(config.quality, 92);
        assert_eq!(config.landscape_multiplier, 2.5);
        assert_eq!(config.portrait_multiplier, 1.5);
        assert!(config.extended_reveal);
        assert!(config.crop.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid();
        assert!(config.validate().is_ok());

        config.input = " ".to_string();
        assert!(config.validate().is_err());
        config.input = "in.png".to_string();

        config.crop = Some(PixelRect::new(0, 0, 0, 10));
        assert!(config.validate().is_err());
        config.crop = Some(PixelRect::new(0, 0, 10, 10));

        config.portrait_multiplier = 0.9;
        assert!(config.validate().is_err());
        config.portrait_multiplier = 1e10;
        assert!(config.validate().is_err());
        config.portrait_multiplier = f64::NAN;
        assert!(config.validate().is_err());
        config.portrait_multiplier = 1.5;

        config.quality = 0;
        assert!(config.validate().is_err());
        config.quality = 92;

        config.fade_peak = 1.2;
        assert!(config.validate().is_err());
        config.fade_peak = 0.8;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_options_carry_tuning() {
        let mut config = valid();
        config.landscape_multiplier = 2.0;
        config.fade_peak = 0.8;
        config.mode = Some(Mode::Portrait);

        let options = config.to_slice_options();
        assert_eq!(options.reveal.landscape_multiplier, 2.0);
        assert_eq!(options.reveal.fade_peak, 0.8);
        assert_eq!(options.mode, Some(Mode::Portrait));
        assert!(options.validate().is_ok());
    }
}
