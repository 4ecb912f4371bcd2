// SPDX-License-Identifier: MIT
//! # Four-Cell Partitions
//!
//! Splits a cropped buffer into the four cells of a grid post:
//!
//! ```text
//! Landscape (quadrants)      Portrait (strips)
//! ┌──────┬──────┐            ┌─────────────┐
//! │  1   │  2   │            │      1      │  Top
//! ├──────┼──────┤            ├─────────────┤
//! │  3   │  4   │            │      2      │  UpperMiddle
//! └──────┴──────┘            ├─────────────┤
//!                            │      3      │  LowerMiddle
//!                            ├─────────────┤
//!                            │      4      │  Bottom
//!                            └─────────────┘
//! ```
//!
//! ## Remainder Policy
//!
//! Cell extents are floored. Whatever is left over along a split axis goes to
//! the last cell on that axis, so a 101×7 landscape crop yields columns of 50
//! and 51 and rows of 3 and 4. The four cells therefore always cover every
//! pixel exactly once; [`verify_tiling`] checks that invariant.

use crate::cpu::ScaleError;
use crate::geometry::{Mode, PixelRect, Size};

/// Number of outputs in every grid post.
pub const CELL_COUNT: usize = 4;

/// Semantic position of a cell inside its partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellLabel {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    UpperMiddle,
    LowerMiddle,
    Bottom,
}

impl CellLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            CellLabel::TopLeft => "top-left",
            CellLabel::TopRight => "top-right",
            CellLabel::BottomLeft => "bottom-left",
            CellLabel::BottomRight => "bottom-right",
            CellLabel::Top => "top",
            CellLabel::UpperMiddle => "upper-middle",
            CellLabel::LowerMiddle => "lower-middle",
            CellLabel::Bottom => "bottom",
        }
    }
}

/// One of the four ordered cells, in cropped-buffer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSpec {
    /// Upload position, 1..=4.
    pub index: usize,
    pub label: CellLabel,
    pub rect: PixelRect,
}

/// Split `len` into `parts` floored spans; the last span takes the remainder.
fn spans(len: u32, parts: u32) -> Vec<(u32, u32)> {
    let step = len / parts;
    (0..parts)
        .map(|i| {
            let offset = i * step;
            let extent = if i + 1 == parts { len - offset } else { step };
            (offset, extent)
        })
        .collect()
}

/// 2×2 quadrants in upload order TL, TR, BL, BR.
pub fn quadrants(size: Size) -> [CellSpec; CELL_COUNT] {
    let cols = spans(size.w, 2);
    let rows = spans(size.h, 2);
    let labels = [
        CellLabel::TopLeft,
        CellLabel::TopRight,
        CellLabel::BottomLeft,
        CellLabel::BottomRight,
    ];

    std::array::from_fn(|i| {
        let (x, w) = cols[i % 2];
        let (y, h) = rows[i / 2];
        CellSpec {
            index: i + 1,
            label: labels[i],
            rect: PixelRect::new(x, y, w, h),
        }
    })
}

/// Four full-width horizontal strips, top to bottom.
pub fn strips(size: Size) -> [CellSpec; CELL_COUNT] {
    let rows = spans(size.h, CELL_COUNT as u32);
    let labels = [
        CellLabel::Top,
        CellLabel::UpperMiddle,
        CellLabel::LowerMiddle,
        CellLabel::Bottom,
    ];

    std::array::from_fn(|i| {
        let (y, h) = rows[i];
        CellSpec {
            index: i + 1,
            label: labels[i],
            rect: PixelRect::new(0, y, size.w, h),
        }
    })
}

/// Partition matching `mode`.
pub fn partition(mode: Mode, size: Size) -> [CellSpec; CELL_COUNT] {
    match mode {
        Mode::Landscape => quadrants(size),
        Mode::Portrait => strips(size),
    }
}

/// Check that `cells` are non-empty, in bounds, pairwise disjoint and cover `size`.
pub fn verify_tiling(cells: &[CellSpec], size: Size) -> Result<(), ScaleError> {
    if cells.len() != CELL_COUNT {
        return Err(ScaleError::Untileable(format!(
            "expected {} cells, got {}",
            CELL_COUNT,
            cells.len()
        )));
    }

    let mut covered = 0u64;
    for (i, cell) in cells.iter().enumerate() {
        if cell.index != i + 1 {
            return Err(ScaleError::Untileable(format!(
                "cell at position {} carries index {}",
                i + 1,
                cell.index
            )));
        }
        if !cell.rect.fits_within(size) {
            return Err(ScaleError::Untileable(format!(
                "cell {} ({}x{} at {},{}) does not fit a {}x{} buffer",
                cell.index, cell.rect.width, cell.rect.height, cell.rect.x, cell.rect.y, size.w, size.h
            )));
        }
        for other in &cells[i + 1..] {
            if cell.rect.intersects(&other.rect) {
                return Err(ScaleError::Untileable(format!(
                    "cells {} and {} overlap",
                    cell.index, other.index
                )));
            }
        }
        covered += cell.rect.size().area();
    }

    if covered != size.area() {
        return Err(ScaleError::Untileable(format!(
            "cells cover {} of {} pixels",
            covered,
            size.area()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(cells: &[CellSpec; CELL_COUNT], size: Size) -> Vec<u8> {
        let mut hits = vec![0u8; size.area() as usize];
        for cell in cells {
            let r = cell.rect;
            for y in r.y..r.y + r.height {
                for x in r.x..r.x + r.width {
                    hits[(y * size.w + x) as usize] += 1;
                }
            }
        }
        hits
    }

    #[test]
    fn even_square_splits_into_equal_quadrants() {
        let cells = quadrants(Size::new(1000, 1000));
        let expected = [(0, 0), (500, 0), (0, 500), (500, 500)];
        for (cell, (x, y)) in cells.iter().zip(expected) {
            assert_eq!(cell.rect, PixelRect::new(x, y, 500, 500));
        }
        assert_eq!(cells[0].label, CellLabel::TopLeft);
        assert_eq!(cells[3].label, CellLabel::BottomRight);
    }

    #[test]
    fn portrait_strips_stack_top_to_bottom() {
        let cells = strips(Size::new(800, 1600));
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.index, i + 1);
            assert_eq!(cell.rect, PixelRect::new(0, 400 * i as u32, 800, 400));
        }
        assert_eq!(cells[1].label, CellLabel::UpperMiddle);
    }

    #[test]
    fn odd_dimensions_give_remainder_to_last_cell() {
        let cells = quadrants(Size::new(101, 7));
        assert_eq!(cells[0].rect, PixelRect::new(0, 0, 50, 3));
        assert_eq!(cells[1].rect, PixelRect::new(50, 0, 51, 3));
        assert_eq!(cells[2].rect, PixelRect::new(0, 3, 50, 4));
        assert_eq!(cells[3].rect, PixelRect::new(50, 3, 51, 4));

        let cells = strips(Size::new(9, 103));
        let heights: Vec<u32> = cells.iter().map(|c| c.rect.height).collect();
        assert_eq!(heights, vec![25, 25, 25, 28]);
    }

    #[test]
    fn every_pixel_is_covered_exactly_once() {
        for (w, h) in [(2, 4), (3, 5), (17, 4), (640, 359), (1001, 1999)] {
            let size = Size::new(w, h);
            for mode in [Mode::Landscape, Mode::Portrait] {
                let cells = partition(mode, size);
                assert!(verify_tiling(&cells, size).is_ok(), "{w}x{h} {mode}");
                assert!(coverage(&cells, size).iter().all(|&n| n == 1), "{w}x{h} {mode}");
            }
        }
    }

    #[test]
    fn too_small_buffers_are_rejected() {
        let size = Size::new(1, 1);
        assert!(verify_tiling(&quadrants(size), size).is_err());
        let size = Size::new(10, 3);
        assert!(verify_tiling(&strips(size), size).is_err());
    }

    #[test]
    fn overlapping_cells_are_rejected() {
        let size = Size::new(10, 10);
        let mut cells = quadrants(size);
        cells[1].rect.x -= 1;
        cells[1].rect.width += 1;
        assert!(matches!(verify_tiling(&cells, size), Err(ScaleError::Untileable(_))));
    }
}
