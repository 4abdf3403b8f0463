use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{ColorImage, Rect};

/// Convert an egui screenshot into an RGBA buffer, optionally cropped to
/// `region` (in points).
pub fn to_rgba(shot: &ColorImage, region: Option<(Rect, f32)>) -> Result<image::RgbaImage> {
    let cropped;
    let source = match region {
        Some((rect, pixels_per_point)) => {
            cropped = shot.region(&rect, Some(pixels_per_point));
            &cropped
        }
        None => shot,
    };

    let [w, h] = source.size;
    let bytes: Vec<u8> = source
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();

    image::RgbaImage::from_raw(w as u32, h as u32, bytes)
        .with_context(|| format!("screenshot buffer does not match {w}×{h}"))
}

/// Write a screenshot (or part of it) to a PNG file.
pub fn save_png(shot: &ColorImage, region: Option<(Rect, f32)>, path: &Path) -> Result<()> {
    let rgba = to_rgba(shot, region)?;
    rgba.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved plot ({}×{}) to {}", rgba.width(), rgba.height(), path.display());
    Ok(())
}
