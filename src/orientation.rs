//! Portrait/landscape classification and the human-facing description of each mode.

pub use reveal_scale::geometry::{classify, Mode};
use reveal_scale::geometry::PixelRect;

/// What a mode does, phrased for whoever is about to post the images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeInfo {
    pub mode: Mode,
    pub description: &'static str,
    /// How the four images look together in the timeline grid.
    pub grid_preview: &'static str,
    /// What a viewer sees after opening the post.
    pub opened_view: &'static str,
}

impl ModeInfo {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Portrait => Self {
                mode,
                description: "Horizontal strips - swipe to reveal full portrait",
                grid_preview: "Creative composite (strips in grid)",
                opened_view: "Swipe 1→2→3→4 reveals complete image",
            },
            Mode::Landscape => Self {
                mode,
                description: "Quadrant grid - seamless panorama on timeline",
                grid_preview: "Seamless panorama",
                opened_view: "Each quadrant with extended content",
            },
        }
    }

    /// Classify `crop` and describe the result.
    pub fn for_crop(crop: PixelRect) -> Self {
        Self::for_mode(classify(crop))
    }

    pub fn is_portrait(&self) -> bool {
        self.mode == Mode::Portrait
    }
}
