use std::path::Path;

use anyhow::Result;
use clap::Parser;
use grid_reveal::config::SliceConfig;
use reveal_scale::cpu::ResampleFilter;
use reveal_scale::geometry::{Mode, PixelRect};

/// Slice one image into four grid-ready JPEGs:
/// - landscape/square crops: 2×2 quadrants
/// - portrait crops: 4 horizontal strips
#[derive(Parser, Debug)]
#[command(name = "reveal")]
#[command(about = "🧩 Slice an image into a seamless four-image grid")]
#[command(long_about = "Slice an image into four JPEGs that tile seamlessly in a four-image social grid.
Landscape crops become quadrants, portrait crops become strips. With extended reveal (the default)
each image also carries the surrounding photo content, shown when the image is opened.")]
struct Args {
    /// Source image
    #[arg(help = "Image to slice (PNG, JPEG, WebP, ...)")]
    input: String,

    /// Output directory
    #[arg(short, long, default_value = "grid",
          help = "Directory for 1.jpg..4.jpg, README.txt and manifest.json")]
    output: String,

    /// Crop rectangle
    #[arg(short, long,
          help = "Crop in source pixels as x,y,width,height (default: whole image)")]
    crop: Option<String>,

    /// Plain slices without reveal content
    #[arg(long, help = "Disable extended reveal and emit exact slices")]
    no_reveal: bool,

    /// Force a layout
    #[arg(short, long, value_enum,
          help = "Force a layout instead of deriving it from the crop shape")]
    mode: Option<Mode>,

    /// JPEG quality
    #[arg(short, long, default_value = "0.92",
          help = "JPEG quality as a fraction (0.92) or percentage (92)")]
    quality: String,

    #[arg(long, default_value_t = 2.5, help = "Height multiplier for landscape quadrants")]
    landscape_multiplier: f64,

    #[arg(long, default_value_t = 1.5, help = "Height multiplier for portrait strips")]
    portrait_multiplier: f64,

    #[arg(long, default_value_t = 1.0,
          help = "Fade strength where reveal padding meets the photo (0.0-1.0)")]
    fade_peak: f32,

    #[arg(long, value_enum, default_value_t = ResampleFilter::Bilinear,
          help = "Resampling filter for reveal content")]
    filter: ResampleFilter,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Parse crop string (e.g., "100,0,800,1600")
    let crop = args.crop.as_deref().map(parse_crop).transpose()?;

    // Parse quality (e.g., "0.92" or "92")
    let quality = parse_quality(&args.quality)?;

    let mut config = SliceConfig::new(args.input, args.output, crop, !args.no_reveal);
    config.mode = args.mode;
    config.quality = quality;
    config.landscape_multiplier = args.landscape_multiplier;
    config.portrait_multiplier = args.portrait_multiplier;
    config.fade_peak = args.fade_peak;
    config.filter = args.filter;

    config.validate().map_err(anyhow::Error::msg)?;
    let options = config.to_slice_options();

    let output = grid_reveal::slice_image(Path::new(&config.input), config.crop, options).await?;
    let info = output.info();
    log::info!("{}: {}", output.mode, info.description);

    let written = grid_reveal::output::write_outputs(Path::new(&config.output_dir), &output)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

/// Parse a crop string like "100,0,800,1600" into a rectangle
fn parse_crop(crop: &str) -> Result<PixelRect> {
    let parts: Vec<&str> = crop.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(anyhow::anyhow!(
            "Invalid crop format: {}. Use x,y,width,height",
            crop
        ));
    }

    let mut values = [0u32; 4];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid number in crop: {}", part))?;
    }
    let [x, y, width, height] = values;
    Ok(PixelRect::new(x, y, width, height))
}

/// Parse quality as a 0-1 fraction or a 1-100 percentage
fn parse_quality(quality: &str) -> Result<u8> {
    let value: f64 = quality
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid quality: {}. Use e.g. 0.92 or 92", quality))?;

    let percent = if value > 0.0 && value <= 1.0 { value * 100.0 } else { value };
    if !(1.0..=100.0).contains(&percent) {
        return Err(anyhow::anyhow!("Quality out of range: {}. Use 0.01-1.0 or 1-100", quality));
    }
    Ok(percent.round() as u8)
}
