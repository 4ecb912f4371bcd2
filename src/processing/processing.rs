//! # Cell Slicers
//!
//! Every way of producing the four outputs implements [`Slicer`]: it names the
//! cells for a cropped buffer and renders one cell at a time. Rendering a cell
//! only reads the shared inputs and writes a buffer it allocates itself, so
//! the pipeline can run the four cells on separate workers in any order.
//!
//! - [`QuadrantSlicer`]: 2×2 quadrants, exact pixel copies
//! - [`StripSlicer`]: 4 horizontal strips, exact pixel copies
//! - [`RevealExtender`]: taller cells re-sampled from the original image with
//!   black padding and edge fades where the original runs out

use reveal_scale::cpu::{FadeEdge, ResampleFilter};
use reveal_scale::geometry::{Mode, PixelRect, Size};
use reveal_scale::reveal::{MAX_OUTPUT_DIM, RevealCfg, plan_reveal};
use reveal_scale::tiling::{CELL_COUNT, CellSpec, partition, verify_tiling};

use crate::error::{SliceError, SliceResult};
use crate::raster::{BLACK, RasterBuffer};

/// Read-only inputs a cell is rendered from.
#[derive(Clone, Copy, Debug)]
pub struct CellSource<'a> {
    /// Buffer the cells were partitioned from.
    pub cropped: &'a RasterBuffer,
    /// Uncropped source image.
    pub original: &'a RasterBuffer,
    /// Where `cropped` came from inside `original`, in original pixels.
    pub crop: PixelRect,
}

impl<'a> CellSource<'a> {
    /// Source for callers that only have the cropped buffer.
    pub fn cropped_only(cropped: &'a RasterBuffer) -> Self {
        Self {
            cropped,
            original: cropped,
            crop: PixelRect::full(cropped.size()),
        }
    }
}

/// A strategy for producing the four outputs.
pub trait Slicer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Partition the slicer works on.
    fn mode(&self) -> Mode;

    /// The four cells for a cropped buffer of `cropped` size, verified to tile it.
    fn cells(&self, cropped: Size) -> SliceResult<[CellSpec; CELL_COUNT]> {
        let cells = partition(self.mode(), cropped);
        verify_tiling(&cells, cropped)?;
        Ok(cells)
    }

    /// Render one cell into a freshly allocated buffer.
    fn render_cell(&self, source: &CellSource<'_>, cell: &CellSpec) -> SliceResult<RasterBuffer>;

    /// Render all four cells in order on the calling thread.
    fn slice(&self, source: &CellSource<'_>) -> SliceResult<[RasterBuffer; CELL_COUNT]> {
        let cells = self.cells(source.cropped.size())?;
        let buffers = cells
            .iter()
            .map(|cell| self.render_cell(source, cell))
            .collect::<SliceResult<Vec<_>>>()?;
        into_four(buffers)
    }
}

fn into_four(buffers: Vec<RasterBuffer>) -> SliceResult<[RasterBuffer; CELL_COUNT]> {
    buffers.try_into().map_err(|rest: Vec<RasterBuffer>| {
        SliceError::processing("slice", format!("expected {} cells, got {}", CELL_COUNT, rest.len()))
    })
}

/// Landscape, non-extended: quadrants TL, TR, BL, BR.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadrantSlicer;

impl Slicer for QuadrantSlicer {
    fn name(&self) -> &'static str {
        "quadrants"
    }

    fn mode(&self) -> Mode {
        Mode::Landscape
    }

    fn render_cell(&self, source: &CellSource<'_>, cell: &CellSpec) -> SliceResult<RasterBuffer> {
        source.cropped.crop(cell.rect)
    }
}

/// Portrait, non-extended: strips top to bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripSlicer;

impl Slicer for StripSlicer {
    fn name(&self) -> &'static str {
        "strips"
    }

    fn mode(&self) -> Mode {
        Mode::Portrait
    }

    fn render_cell(&self, source: &CellSource<'_>, cell: &CellSpec) -> SliceResult<RasterBuffer> {
        source.cropped.crop(cell.rect)
    }
}

/// Extended reveal for either partition.
#[derive(Debug, Clone, Copy)]
pub struct RevealExtender {
    mode: Mode,
    multiplier: f64,
    fade_peak: f32,
    filter: ResampleFilter,
}

impl RevealExtender {
    /// Extender for `mode` with an explicit multiplier.
    ///
    /// The multiplier must lie in `1.0..=MAX_OUTPUT_DIM`; whether a given
    /// cell fits is checked again per cell, before its canvas is allocated.
    pub fn new(mode: Mode, multiplier: f64) -> SliceResult<Self> {
        if !(1.0..=f64::from(MAX_OUTPUT_DIM)).contains(&multiplier) {
            return Err(SliceError::config(
                format!("{}_multiplier", mode),
                multiplier.to_string(),
                format!("must be between 1.0 and {}", MAX_OUTPUT_DIM),
            ));
        }
        let defaults = RevealCfg::default();
        Ok(Self {
            mode,
            multiplier,
            fade_peak: defaults.fade_peak,
            filter: ResampleFilter::default(),
        })
    }

    /// Extender for `mode` taking the multiplier and fade from `cfg`.
    pub fn from_cfg(mode: Mode, cfg: &RevealCfg) -> SliceResult<Self> {
        Self::new(mode, cfg.multiplier_for(mode))?.with_fade_peak(cfg.fade_peak)
    }

    pub fn with_fade_peak(mut self, peak: f32) -> SliceResult<Self> {
        if !(0.0..=1.0).contains(&peak) {
            return Err(SliceError::config(
                "fade_peak",
                peak.to_string(),
                "must be between 0.0 and 1.0",
            ));
        }
        self.fade_peak = peak;
        Ok(self)
    }

    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }
}

impl Slicer for RevealExtender {
    fn name(&self) -> &'static str {
        match self.mode {
            Mode::Landscape => "reveal-quadrants",
            Mode::Portrait => "reveal-strips",
        }
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn render_cell(&self, source: &CellSource<'_>, cell: &CellSpec) -> SliceResult<RasterBuffer> {
        let plan = plan_reveal(
            cell,
            source.cropped.size(),
            source.crop,
            source.original.size(),
            self.multiplier,
        )?;
        log::debug!(
            "cell {} ({}): canvas {}x{}, source rows {:.1}..{:.1}, band {:?}",
            plan.index,
            plan.label.as_str(),
            plan.out.w,
            plan.out.h,
            plan.extended.y,
            plan.extended.bottom(),
            plan.dst_band
        );

        let mut canvas = RasterBuffer::filled(plan.out, BLACK);
        match (plan.visible, plan.dst_rect()) {
            (Some(visible), Some(dst)) => canvas.blit(dst, source.original, visible, self.filter)?,
            _ => log::warn!("cell {} has no source pixels, leaving it black", plan.index),
        }

        if plan.fade_top {
            canvas.fade(FadeEdge::Top, plan.extra_height, self.fade_peak);
        }
        if plan.fade_bottom {
            canvas.fade(FadeEdge::Bottom, plan.extra_height, self.fade_peak);
        }
        Ok(canvas)
    }
}

/// Split a cropped buffer into quadrants TL, TR, BL, BR.
pub fn slice_quadrants(cropped: &RasterBuffer) -> SliceResult<[RasterBuffer; CELL_COUNT]> {
    QuadrantSlicer.slice(&CellSource::cropped_only(cropped))
}

/// Split a cropped buffer into four strips, top to bottom.
pub fn slice_strips(cropped: &RasterBuffer) -> SliceResult<[RasterBuffer; CELL_COUNT]> {
    StripSlicer.slice(&CellSource::cropped_only(cropped))
}

/// Reveal-extend the cells of `cropped`, sampling padding from `original`.
pub fn extend(
    cropped: &RasterBuffer,
    original: &RasterBuffer,
    crop: PixelRect,
    mode: Mode,
    multiplier: f64,
) -> SliceResult<[RasterBuffer; CELL_COUNT]> {
    let source = CellSource {
        cropped,
        original,
        crop,
    };
    RevealExtender::new(mode, multiplier)?.slice(&source)
}
