// SPDX-License-Identifier: MIT
//! # reveal-scale: Grid Geometry for Four-Image Social Posts
//!
//! This crate holds the codec-free half of the slicer: the coordinate math that
//! turns one crop rectangle into four cells, the reveal-extension planning that
//! maps an enlarged cell back into the original photo, and the CPU pixel
//! routines (resampling blit, background fill, edge fade) those plans drive.
//!
//! ## Key Components
//!
//! - [`geometry`]: sizes, integer and fractional rectangles, and the
//!   portrait/landscape classifier
//! - [`tiling`]: 2×2 quadrant and 4×1 strip partitions with a fixed remainder policy
//! - [`reveal`]: per-cell reveal plans (canvas size, clamped source box, fade edges)
//! - [`cpu`]: RGBA8 blit via `fast_image_resize`, fills and fades
//!
//! ## Usage Example
//!
//! ```rust
//! use reveal_scale::geometry::{classify, Mode, PixelRect, Size};
//! use reveal_scale::reveal::{plan_reveal, RevealCfg};
//! use reveal_scale::tiling::partition;
//!
//! let crop = PixelRect::new(0, 0, 800, 1600);
//! assert_eq!(classify(crop), Mode::Portrait);
//!
//! let cropped = Size { w: 800, h: 1600 };
//! let cells = partition(Mode::Portrait, cropped);
//! let plan = plan_reveal(
//!     &cells[0],
//!     cropped,
//!     crop,
//!     Size { w: 800, h: 1600 },
//!     RevealCfg::default().multiplier_for(Mode::Portrait),
//! )
//! .unwrap();
//! assert_eq!((plan.out.w, plan.out.h), (800, 600));
//! assert!(plan.fade_top);
//! ```

pub mod cpu;
pub mod geometry;
pub mod reveal;
pub mod tiling;
