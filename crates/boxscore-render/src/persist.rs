//! Atomic persistence for annotated images.

use std::path::Path;

use image::{ImageFormat, RgbaImage};
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Write an annotated image to `path`, creating missing parent directories.
///
/// The output format is chosen from the path extension. The buffer is
/// written to a sibling temporary file first and renamed into place, so a
/// failed write never leaves a partial output file behind.
pub fn save_annotated(image: &RgbaImage, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();

    // Resolve the format before touching the filesystem
    let format = ImageFormat::from_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("tmp");

    if let Err(e) = write_with_format(image, &tmp_path, format) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        RenderError::from(e)
    })?;

    debug!(path = %path.display(), "Saved annotated image");
    Ok(())
}

fn write_with_format(image: &RgbaImage, path: &Path, format: ImageFormat) -> RenderResult<()> {
    // JPEG has no alpha channel; flatten for formats that reject RGBA
    match format {
        ImageFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            rgb.save_with_format(path, format)?;
        }
        _ => image.save_with_format(path, format)?,
    }
    Ok(())
}
