// SPDX-License-Identifier: MIT
//! # Reveal Extension Planning
//!
//! A reveal cell is taller than the slice it stands for: the platform
//! center-crops it in the timeline grid (so the grid still looks seamless), and
//! opening the image shows the extra photo content above and below.
//!
//! For each cell the planner:
//! 1. sizes the canvas as `cellW × round(cellH × multiplier)`
//! 2. grows the cell's source box symmetrically along the vertical axis by
//!    `extraHeight = (outputHeight − cellH) / 2` cropped-buffer rows
//! 3. maps it into original-image space through the crop's scale factors
//! 4. clamps it to the original image's rows
//! 5. derives the destination band from the clamped amount, so whatever is
//!    missing stays black, and flags the clipped edges for a fade
//!
//! Nothing here touches pixels; [`crate::cpu`] executes the plan.

use crate::cpu::ScaleError;
use crate::geometry::{Mode, PixelRect, Size, SrcRect};
use crate::tiling::{CellLabel, CellSpec};

/// Reveal tuning. Multipliers are output height over cell height.
#[derive(Clone, Copy, Debug)]
pub struct RevealCfg {
    /// Applied to quadrant cells.
    pub landscape_multiplier: f64,
    /// Applied to strip cells.
    pub portrait_multiplier: f64,
    /// Alpha of the black fade at the clipped edge, 0.0..=1.0.
    pub fade_peak: f32,
}

impl Default for RevealCfg {
    fn default() -> Self {
        Self {
            landscape_multiplier: 2.5,
            portrait_multiplier: 1.5,
            fade_peak: 1.0,
        }
    }
}

impl RevealCfg {
    pub fn multiplier_for(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Landscape => self.landscape_multiplier,
            Mode::Portrait => self.portrait_multiplier,
        }
    }
}

/// Everything needed to render one extended cell.
#[derive(Clone, Copy, Debug)]
pub struct RevealPlan {
    pub index: usize,
    pub label: CellLabel,
    /// Cell inside the cropped buffer.
    pub cell: PixelRect,
    /// Output canvas.
    pub out: Size,
    /// Padding above and below the cell, in cropped-buffer rows (unrounded).
    pub extra_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Cell mapped into original-image space.
    pub src: SrcRect,
    /// `src` grown vertically by `extra_height` on both sides.
    pub extended: SrcRect,
    /// Part of `extended` that exists in the original image; `None` if nothing does.
    pub visible: Option<SrcRect>,
    /// Destination band `(y, h)` on the canvas that `visible` is drawn into.
    pub dst_band: Option<(u32, u32)>,
    pub fade_top: bool,
    pub fade_bottom: bool,
}

impl RevealPlan {
    /// Destination rectangle for the visible content.
    pub fn dst_rect(&self) -> Option<PixelRect> {
        self.dst_band
            .map(|(y, h)| PixelRect::new(0, y, self.out.w, h))
    }
}

/// Largest canvas side JPEG can encode.
pub const MAX_OUTPUT_DIM: u32 = u16::MAX as u32;

/// Plan one reveal cell.
///
/// `cropped` is the size of the buffer `cell` was partitioned from, `crop` the
/// rectangle that buffer was cut from in the original image, and `original`
/// the original image's size.
///
/// Fails with [`ScaleError::CanvasTooLarge`] when `cellH × multiplier` is not
/// a height an output image can have, before anything is allocated.
pub fn plan_reveal(
    cell: &CellSpec,
    cropped: Size,
    crop: PixelRect,
    original: Size,
    multiplier: f64,
) -> Result<RevealPlan, ScaleError> {
    let cell_w = f64::from(cell.rect.width);
    let cell_h = f64::from(cell.rect.height);

    let out_h_exact = cell_h * multiplier;
    if !out_h_exact.is_finite() || out_h_exact.round() > f64::from(MAX_OUTPUT_DIM) {
        return Err(ScaleError::CanvasTooLarge {
            cell_height: cell.rect.height,
            multiplier,
            max: MAX_OUTPUT_DIM,
        });
    }
    let out = Size {
        w: cell.rect.width,
        h: out_h_exact.round().max(0.0) as u32,
    };
    let extra_height = (out_h_exact - cell_h) / 2.0;

    let scale_x = f64::from(crop.width) / f64::from(cropped.w.max(1));
    let scale_y = f64::from(crop.height) / f64::from(cropped.h.max(1));

    let src = SrcRect {
        x: f64::from(crop.x) + f64::from(cell.rect.x) * scale_x,
        y: f64::from(crop.y) + f64::from(cell.rect.y) * scale_y,
        w: cell_w * scale_x,
        h: cell_h * scale_y,
    };

    let extra_src = extra_height * scale_y;
    let extended = SrcRect {
        x: src.x,
        y: src.y - extra_src,
        w: src.w,
        h: src.h + 2.0 * extra_src,
    };

    let clamped_y = extended.y.max(0.0);
    let clamped_bottom = extended.bottom().min(f64::from(original.h));
    let clamped_h = clamped_bottom - clamped_y;

    let fade_top = clamped_y > extended.y;
    let fade_bottom = clamped_bottom < extended.bottom();

    // Horizontal extent never grows, but float error must not push past the image.
    let visible_w = src.w.min(f64::from(original.w) - src.x);

    let mut visible = None;
    let mut dst_band = None;
    if clamped_h > 0.0 && visible_w > 0.0 && scale_y > 0.0 {
        let dest_y = (clamped_y - extended.y) / scale_y;
        let dest_h = clamped_h / scale_y;
        let top = (dest_y.round().max(0.0) as u32).min(out.h);
        let bottom = ((dest_y + dest_h).round().max(0.0) as u32).min(out.h);
        if bottom > top {
            visible = Some(SrcRect {
                x: src.x,
                y: clamped_y,
                w: visible_w,
                h: clamped_h,
            });
            dst_band = Some((top, bottom - top));
        }
    }

    Ok(RevealPlan {
        index: cell.index,
        label: cell.label,
        cell: cell.rect,
        out,
        extra_height,
        scale_x,
        scale_y,
        src,
        extended,
        visible,
        dst_band,
        fade_top,
        fade_bottom,
    })
}
