//! Writing a finished run to disk.
//!
//! A run becomes a directory holding `1.jpg`..`4.jpg` in upload order, a
//! `README.txt` with posting instructions for the mode, and a
//! `manifest.json` describing how the images were made.

use std::path::{Path, PathBuf};

use reveal_scale::geometry::Mode;
use serde_json::json;

use crate::error::{SliceError, SliceResult};
use crate::pipeline::SliceOutput;

pub const README_NAME: &str = "README.txt";
pub const MANIFEST_NAME: &str = "manifest.json";

/// Posting instructions for `mode`.
pub fn readme_text(mode: Mode) -> String {
    let mut text = String::new();
    text.push_str("Grid Reveal - Upload Instructions\n");
    text.push_str("=================================\n");
    text.push_str(match mode {
        Mode::Portrait => "Mode: PORTRAIT (stacked strips)\n\n",
        Mode::Landscape => "Mode: LANDSCAPE (seamless quadrants)\n\n",
    });
    text.push_str(
        "POSTING\n\
         -------\n\
         1. Start a new post and attach media\n\
         2. Select all four images at once (1.jpg to 4.jpg)\n\
         3. Check they are attached in order: 1, 2, 3, 4\n\
         4. Post\n\n\
         GRID LAYOUT\n\
         -----------\n\
         Upload order fills the 2x2 grid row by row:\n\n\
         +-----+-----+\n\
         |  1  |  2  |\n\
         +-----+-----+\n\
         |  3  |  4  |\n\
         +-----+-----+\n\n",
    );
    text.push_str(match mode {
        Mode::Portrait => {
            "HOW IT LOOKS\n\
             ------------\n\
             The images are horizontal strips of your photo:\n\
             \x20 1 = top, 2 = upper middle, 3 = lower middle, 4 = bottom\n\n\
             The timeline shows them as a grid. Opening the post and swiping\n\
             1 to 4 walks down the full portrait.\n\n"
        }
        Mode::Landscape => {
            "HOW IT LOOKS\n\
             ------------\n\
             The images are quadrants of your photo:\n\
             \x20 1 = top left, 2 = top right, 3 = bottom left, 4 = bottom right\n\n\
             The timeline tiles them into one seamless picture. Opening an\n\
             image shows extra content above and below its quadrant when\n\
             extended reveal was on.\n\n"
        }
    });
    text.push_str(
        "TROUBLESHOOTING\n\
         ---------------\n\
         - Out of order? Remove the images and select 1.jpg first.\n\
         - Grid looks wrong? Make sure exactly four images are attached.\n",
    );
    text
}

/// Manifest describing `output`, as pretty-printed JSON.
pub fn manifest_json(output: &SliceOutput) -> SliceResult<String> {
    let info = output.info();
    let images: Vec<_> = output
        .cells
        .iter()
        .zip(output.images.iter())
        .map(|(cell, image)| {
            json!({
                "file": image.file_name(),
                "position": cell.label.as_str(),
                "cell": {
                    "x": cell.rect.x,
                    "y": cell.rect.y,
                    "width": cell.rect.width,
                    "height": cell.rect.height,
                },
                "width": image.width,
                "height": image.height,
                "bytes": image.bytes.len(),
            })
        })
        .collect();

    let manifest = json!({
        "mode": output.mode.as_str(),
        "description": info.description,
        "extended_reveal": output.extended_reveal,
        "source": { "width": output.source.w, "height": output.source.h },
        "crop": {
            "x": output.crop.x,
            "y": output.crop.y,
            "width": output.crop.width,
            "height": output.crop.height,
        },
        "images": images,
    });
    serde_json::to_string_pretty(&manifest)
        .map_err(|e| SliceError::processing("write manifest", e.to_string()))
}

/// Write the images, README and manifest into `dir`, creating it if needed.
///
/// Returns the paths written, images first in upload order.
pub fn write_outputs(dir: &Path, output: &SliceOutput) -> SliceResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| SliceError::io("create output dir", e).with_path(dir.display().to_string()))?;

    let mut written = Vec::with_capacity(output.images.len() + 2);
    for image in &output.images {
        written.push(write_file(dir, &image.file_name(), &image.bytes)?);
    }
    written.push(write_file(dir, README_NAME, readme_text(output.mode).as_bytes())?);
    written.push(write_file(dir, MANIFEST_NAME, manifest_json(output)?.as_bytes())?);

    log::info!("wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> SliceResult<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, bytes)
        .map_err(|e| SliceError::io("write output", e).with_path(path.display().to_string()))?;
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
