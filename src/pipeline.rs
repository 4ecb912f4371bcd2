//! # Slicing Pipeline
//!
//! decode → crop → classify → partition → render (×4, in parallel) → encode (×4)
//!
//! The four cells are independent: each worker reads the shared original and
//! cropped buffers and owns the canvas it renders into. Workers run on
//! tokio's blocking pool and are joined in cell order, so the output order is
//! the upload order no matter which worker finishes first. Any failure fails
//! the whole run; no partial set is ever returned.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::try_join_all;
use reveal_scale::geometry::{Mode, PixelRect, Size, classify};
use reveal_scale::tiling::{CELL_COUNT, CellSpec};

use crate::SliceOptions;
use crate::encoder::{EncodedImage, Encoder};
use crate::error::{SliceError, SliceResult};
use crate::orientation::ModeInfo;
use crate::processing::{CellSource, QuadrantSlicer, RevealExtender, Slicer, StripSlicer};
use crate::raster::RasterBuffer;

/// Result of one run: four encoded images plus what produced them.
#[derive(Debug, Clone)]
pub struct SliceOutput {
    pub mode: Mode,
    pub extended_reveal: bool,
    /// Size of the decoded source image.
    pub source: Size,
    pub crop: PixelRect,
    pub cells: [CellSpec; CELL_COUNT],
    pub images: [EncodedImage; CELL_COUNT],
}

impl SliceOutput {
    pub fn info(&self) -> ModeInfo {
        ModeInfo::for_mode(self.mode)
    }

    pub fn into_images(self) -> [EncodedImage; CELL_COUNT] {
        self.images
    }
}

/// Validated options plus the encoder they imply.
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: SliceOptions,
    encoder: Encoder,
}

impl Pipeline {
    pub fn new(options: SliceOptions) -> SliceResult<Self> {
        options.validate()?;
        let encoder = Encoder::new(options.quality)?;
        Ok(Self { options, encoder })
    }

    pub fn options(&self) -> &SliceOptions {
        &self.options
    }

    /// The strategy that renders cells for `mode` under these options.
    pub fn slicer_for(&self, mode: Mode) -> SliceResult<Arc<dyn Slicer>> {
        if !self.options.extended_reveal {
            let slicer: Arc<dyn Slicer> = match mode {
                Mode::Landscape => Arc::new(QuadrantSlicer),
                Mode::Portrait => Arc::new(StripSlicer),
            };
            return Ok(slicer);
        }
        let extender =
            RevealExtender::from_cfg(mode, &self.options.reveal)?.with_filter(self.options.filter);
        Ok(Arc::new(extender))
    }

    /// Decode `source` and slice it. `crop` defaults to the whole image.
    pub async fn run(&self, source: Vec<u8>, crop: Option<PixelRect>) -> SliceResult<SliceOutput> {
        let original = tokio::task::spawn_blocking(move || RasterBuffer::load(&source)).await??;
        self.run_buffer(original, crop).await
    }

    /// Slice an already decoded image.
    pub async fn run_buffer(
        &self,
        original: RasterBuffer,
        crop: Option<PixelRect>,
    ) -> SliceResult<SliceOutput> {
        let started = Instant::now();
        let source_size = original.size();
        let crop = crop.unwrap_or_else(|| PixelRect::full(source_size));

        let cropped = original.crop(crop)?;
        let mode = self.options.mode.unwrap_or_else(|| classify(crop));
        let slicer = self.slicer_for(mode)?;
        let cells = slicer.cells(cropped.size())?;
        log::debug!(
            "slicing {}x{} crop at {},{} with {}",
            crop.width,
            crop.height,
            crop.x,
            crop.y,
            slicer.name()
        );

        let original = Arc::new(original);
        let cropped = Arc::new(cropped);
        let encoder = self.encoder;

        let workers = cells.iter().copied().enumerate().map(|(i, cell)| {
            let original = Arc::clone(&original);
            let cropped = Arc::clone(&cropped);
            let slicer = Arc::clone(&slicer);
            tokio::task::spawn_blocking(move || -> SliceResult<EncodedImage> {
                let source = CellSource {
                    cropped: cropped.as_ref(),
                    original: original.as_ref(),
                    crop,
                };
                let buffer = slicer.render_cell(&source, &cell)?;
                encoder.encode_indexed(i, &buffer)
            })
        });

        let images = try_join_all(workers)
            .await?
            .into_iter()
            .collect::<SliceResult<Vec<_>>>()?;
        let images: [EncodedImage; CELL_COUNT] = images.try_into().map_err(|rest: Vec<_>| {
            SliceError::processing(
                "join cells",
                format!("expected {} images, got {}", CELL_COUNT, rest.len()),
            )
        })?;

        log::info!(
            "sliced {}x{} crop into 4 {} images ({}) in {:?}",
            crop.width,
            crop.height,
            mode,
            if self.options.extended_reveal { "extended reveal" } else { "basic" },
            started.elapsed()
        );

        Ok(SliceOutput {
            mode,
            extended_reveal: self.options.extended_reveal,
            source: source_size,
            crop,
            cells,
            images,
        })
    }
}

/// Slice `source` with default tuning: four JPEGs in upload order.
pub async fn process(
    source: &[u8],
    crop: PixelRect,
    use_extended_reveal: bool,
) -> SliceResult<[EncodedImage; CELL_COUNT]> {
    let options = SliceOptions {
        extended_reveal: use_extended_reveal,
        ..SliceOptions::default()
    };
    let output = Pipeline::new(options)?.run(source.to_vec(), Some(crop)).await?;
    Ok(output.into_images())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn striped(width: u32, height: u32) -> RasterBuffer {
        RasterBuffer::from_image(RgbaImage::from_fn(width, height, |_, y| {
            Rgba([(y * 255 / height.max(1)) as u8, 128, 64, 255])
        }))
    }

    #[tokio::test]
    async fn run_buffer_returns_cells_in_upload_order() {
        let pipeline = Pipeline::new(SliceOptions {
            extended_reveal: false,
            ..SliceOptions::default()
        })
        .unwrap();
        let output = pipeline.run_buffer(striped(40, 80), None).await.unwrap();

        assert_eq!(output.mode, Mode::Portrait);
        let indices: Vec<usize> = output.images.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(output.images.iter().all(|i| (i.width, i.height) == (40, 20)));
    }

    #[tokio::test]
    async fn mode_override_beats_classification() {
        let pipeline = Pipeline::new(SliceOptions {
            mode: Some(Mode::Landscape),
            ..SliceOptions::default()
        })
        .unwrap();
        let output = pipeline.run_buffer(striped(40, 80), None).await.unwrap();

        assert_eq!(output.mode, Mode::Landscape);
        // Quadrants of 20x40 extended by 2.5.
        assert!(output.images.iter().all(|i| (i.width, i.height) == (20, 100)));
    }

    #[tokio::test]
    async fn crop_outside_source_fails_before_slicing() {
        let pipeline = Pipeline::new(SliceOptions::default()).unwrap();
        let err = pipeline
            .run_buffer(striped(40, 80), Some(PixelRect::new(30, 0, 20, 20)))
            .await
            .unwrap_err();
        assert_eq!(err.category(), "bounds");
    }

    #[test]
    fn invalid_options_are_rejected() {
        let err = Pipeline::new(SliceOptions {
            quality: 0,
            ..SliceOptions::default()
        })
        .unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
