//! End-to-end tests for the slicing pipeline: encoded bytes in, four JPEGs out.

mod common;

use common::*;
use grid_reveal::{Pipeline, SliceError, SliceOptions, process};
use reveal_scale::geometry::{Mode, PixelRect};

fn basic() -> SliceOptions {
    SliceOptions {
        extended_reveal: false,
        ..SliceOptions::default()
    }
}

#[tokio::test]
async fn square_crop_splits_into_quadrants() {
    let source = png_bytes(&quadrant_colors(1000, 1000));
    let images = process(&source, PixelRect::new(0, 0, 1000, 1000), false)
        .await
        .unwrap();

    for (image, expected) in images.iter().zip([RED, GREEN, BLUE, YELLOW]) {
        let decoded = decode(&image.bytes);
        assert_eq!(decoded.dimensions(), (500, 500));
        assert_near(decoded.get_pixel(250, 250), expected, 8, "quadrant center");
        assert_near(decoded.get_pixel(10, 490), expected, 8, "quadrant corner");
    }
}

#[tokio::test]
async fn portrait_crop_splits_into_strips_top_to_bottom() {
    let source = png_bytes(&band_colors(800, 1600));
    let images = process(&source, PixelRect::new(0, 0, 800, 1600), false)
        .await
        .unwrap();

    for (image, expected) in images.iter().zip([RED, GREEN, BLUE, YELLOW]) {
        let decoded = decode(&image.bytes);
        assert_eq!(decoded.dimensions(), (800, 400));
        assert_near(decoded.get_pixel(400, 200), expected, 8, "strip center");
    }
}

#[tokio::test]
async fn portrait_reveal_pads_and_fades_at_source_edges() {
    let source = png_bytes(&band_colors(800, 1600));
    let images = process(&source, PixelRect::new(0, 0, 800, 1600), true)
        .await
        .unwrap();
    let decoded: Vec<_> = images.iter().map(|i| decode(&i.bytes)).collect();
    assert!(decoded.iter().all(|d| d.dimensions() == (800, 600)));

    // Top strip: nothing above the source, so the first 100 rows stay black.
    let top = &decoded[0];
    assert!(row_luma(top, 0) < 4.0);
    assert!(row_luma(top, 90) < 4.0);
    assert_near(top.get_pixel(400, 300), RED, 8, "top strip content");
    assert_near(top.get_pixel(400, 560), GREEN, 8, "top strip reveal below");

    // Second strip is interior: real content above and below.
    let second = &decoded[1];
    assert_near(second.get_pixel(400, 40), RED, 8, "reveal above");
    assert_near(second.get_pixel(400, 300), GREEN, 8, "strip content");
    assert_near(second.get_pixel(400, 560), BLUE, 8, "reveal below");

    // Bottom strip: nothing below the source.
    let bottom = &decoded[3];
    assert_near(bottom.get_pixel(400, 40), BLUE, 8, "reveal above bottom strip");
    assert!(row_luma(bottom, 599) < 4.0);
    assert!(row_luma(bottom, 530) < 4.0);
}

#[tokio::test]
async fn partially_clipped_reveal_fades_real_content() {
    let source = png_bytes(&band_colors(800, 1600));
    // Strips of 380 rows, 95 rows of reveal; the top strip finds only 40 rows above.
    let images = process(&source, PixelRect::new(0, 40, 800, 1520), true)
        .await
        .unwrap();
    let top = decode(&images[0].bytes);
    assert_eq!(top.dimensions(), (800, 570));

    assert!(row_luma(&top, 30) < 4.0, "missing rows stay black");
    let faded = row_luma(&top, 70);
    let full = row_luma(&top, 150);
    assert!(faded > 10.0, "real content shows through the fade");
    assert!(faded < full - 10.0, "fade darkens content near the edge");
}

#[tokio::test]
async fn landscape_reveal_keeps_aspect_invariant() {
    let source = png_bytes(&quadrant_colors(1000, 1000));
    let images = process(&source, PixelRect::new(0, 0, 1000, 1000), true)
        .await
        .unwrap();

    for image in &images {
        let decoded = decode(&image.bytes);
        assert_eq!(decoded.dimensions(), (500, 1250));
    }
    // Top-left cell: its own quadrant in the middle, the bottom-left quadrant below it.
    let tl = decode(&images[0].bytes);
    assert_near(tl.get_pixel(250, 600), RED, 8, "tl content");
    assert_near(tl.get_pixel(250, 1000), BLUE, 8, "tl reveal below");
    assert!(row_luma(&tl, 100) < 4.0);
}

#[tokio::test]
async fn offset_crop_reveal_samples_the_right_columns() {
    let source = png_bytes(&quadrant_colors(1000, 1000));
    // 800x600 crop starting at x=200: right-hand cells come from source x 600..1000.
    let images = process(&source, PixelRect::new(200, 0, 800, 600), true)
        .await
        .unwrap();
    let top_right = decode(&images[1].bytes);
    let bottom_right = decode(&images[3].bytes);
    assert_eq!(top_right.dimensions(), (400, 750));

    // Column 50 maps to source x 650; ignoring the crop offset would land on x 450 (red/blue).
    assert!(row_luma(&top_right, 100) < 4.0, "nothing above the source");
    assert_near(top_right.get_pixel(50, 300), GREEN, 8, "top-right content");
    assert_near(top_right.get_pixel(50, 740), YELLOW, 8, "top-right reveal below");

    // Bottom-right cell covers source rows 300..600, revealed from 75 to 825.
    assert_near(bottom_right.get_pixel(50, 100), GREEN, 8, "bottom-right reveal above");
    assert_near(bottom_right.get_pixel(50, 600), YELLOW, 8, "bottom-right reveal below");
}

#[tokio::test]
async fn oversized_multiplier_is_a_config_error() {
    let pipeline = Pipeline::new(SliceOptions {
        reveal: reveal_scale::reveal::RevealCfg {
            portrait_multiplier: 200.0,
            ..Default::default()
        },
        ..SliceOptions::default()
    })
    .unwrap();
    let source = png_bytes(&solid(800, 1600, BLUE));

    // 400-row strips times 200 would need 80000-row JPEGs.
    let err = pipeline.run(source, None).await.unwrap_err();
    assert!(matches!(err, SliceError::Config { .. }), "{err}");

    let err = Pipeline::new(SliceOptions {
        reveal: reveal_scale::reveal::RevealCfg {
            landscape_multiplier: 1e10,
            ..Default::default()
        },
        ..SliceOptions::default()
    })
    .unwrap_err();
    assert_eq!(err.category(), "config");
}

#[tokio::test]
async fn orientation_flips_one_pixel_past_square() {
    let pipeline = Pipeline::new(basic()).unwrap();
    let source = png_bytes(&solid(60, 60, GREEN));

    let square = pipeline
        .run(source.clone(), Some(PixelRect::new(0, 0, 40, 40)))
        .await
        .unwrap();
    assert_eq!(square.mode, Mode::Landscape);

    let tall = pipeline
        .run(source, Some(PixelRect::new(0, 0, 40, 41)))
        .await
        .unwrap();
    assert_eq!(tall.mode, Mode::Portrait);
    let heights: Vec<u32> = tall.images.iter().map(|i| i.height).collect();
    assert_eq!(heights, vec![10, 10, 10, 11]);
}

#[tokio::test]
async fn basic_slicing_is_repeatable() {
    let source = png_bytes(&quadrant_colors(301, 199));
    let crop = PixelRect::new(3, 5, 290, 180);

    let first = process(&source, crop, false).await.unwrap();
    let second = process(&source, crop, false).await.unwrap();
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(decode(&a.bytes), decode(&b.bytes));
    }
}

#[tokio::test]
async fn garbage_input_is_a_decode_error() {
    let err = process(b"not an image at all", PixelRect::new(0, 0, 10, 10), false)
        .await
        .unwrap_err();
    assert!(matches!(err, SliceError::Decode { .. }));
}

#[tokio::test]
async fn crop_outside_source_is_a_bounds_error() {
    let source = png_bytes(&solid(100, 100, RED));
    for crop in [
        PixelRect::new(50, 50, 60, 10),
        PixelRect::new(0, 0, 100, 101),
        PixelRect::new(0, 0, 0, 0),
    ] {
        let err = process(&source, crop, true).await.unwrap_err();
        assert!(matches!(err, SliceError::Bounds { .. }), "{crop:?}: {err}");
    }
}

#[tokio::test]
async fn crop_too_small_to_tile_is_a_bounds_error() {
    let source = png_bytes(&solid(100, 100, RED));
    let err = process(&source, PixelRect::new(10, 10, 1, 1), false)
        .await
        .unwrap_err();
    assert!(matches!(err, SliceError::Bounds { .. }));
}
