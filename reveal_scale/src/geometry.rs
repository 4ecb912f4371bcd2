// SPDX-License-Identifier: MIT
//! # Rectangles, Sizes and Orientation
//!
//! All rectangles here live in pixel space. [`PixelRect`] is the integer crop
//! a caller hands in (always in source-image pixels, never display pixels);
//! [`SrcRect`] is the fractional box the reveal planner produces when it maps
//! cell coordinates back into the original photo.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn area(&self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }
}

/// Integer rectangle in source-image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle covering a whole buffer of the given size.
    pub fn full(size: Size) -> Self {
        Self::new(0, 0, size.w, size.h)
    }

    pub fn size(&self) -> Size {
        Size { w: self.width, h: self.height }
    }

    /// Exclusive right edge, widened to avoid u32 overflow.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge, widened to avoid u32 overflow.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// True when the rectangle is non-empty and lies fully inside `bounds`.
    pub fn fits_within(&self, bounds: Size) -> bool {
        self.width > 0
            && self.height > 0
            && self.right() <= u64::from(bounds.w)
            && self.bottom() <= u64::from(bounds.h)
    }

    /// True when the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &PixelRect) -> bool {
        u64::from(self.x) < other.right()
            && u64::from(other.x) < self.right()
            && u64::from(self.y) < other.bottom()
            && u64::from(other.y) < self.bottom()
    }
}

/// Fractional rectangle, used for sub-pixel source boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SrcRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl SrcRect {
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }
}

impl From<PixelRect> for SrcRect {
    fn from(r: PixelRect) -> Self {
        Self {
            x: f64::from(r.x),
            y: f64::from(r.y),
            w: f64::from(r.width),
            h: f64::from(r.height),
        }
    }
}

/// Layout the four outputs are built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Mode {
    /// Four horizontal strips, top to bottom; swiping 1→4 rebuilds a tall photo.
    #[clap(name = "portrait")]
    Portrait,
    /// Four quadrants TL, TR, BL, BR; the timeline grid shows one seamless picture.
    #[clap(name = "landscape")]
    Landscape,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Portrait => "portrait",
            Mode::Landscape => "landscape",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portrait iff the crop is strictly taller than wide; squares are landscape.
pub fn classify(rect: PixelRect) -> Mode {
    if rect.height > rect.width {
        Mode::Portrait
    } else {
        Mode::Landscape
    }
}
