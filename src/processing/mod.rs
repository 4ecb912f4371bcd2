//! # Processing Module
//!
//! Turns a cropped buffer into the four cell buffers: plain quadrants or
//! strips, or reveal-extended cells sampled from the original image.

pub mod processing;

pub use processing::{
    extend, slice_quadrants, slice_strips, CellSource, QuadrantSlicer, RevealExtender, Slicer,
    StripSlicer,
};
