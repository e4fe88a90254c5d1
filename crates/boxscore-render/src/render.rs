//! Pure annotation transform: image + detections -> pixel buffer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::debug;

use boxscore_models::DetectionSet;

use crate::error::{RenderError, RenderResult};
use crate::persist::save_annotated;

/// A loaded TTF/OTF font for label text, shareable across renders.
#[derive(Clone)]
pub struct LabelFont(Arc<FontVec>);

impl LabelFont {
    /// Load a font from a TTF/OTF file.
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let font_load = |detail: String| RenderError::FontLoad {
            path: path.to_path_buf(),
            detail,
        };
        let bytes = std::fs::read(path).map_err(|e| font_load(e.to_string()))?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| font_load(e.to_string()))?;
        Ok(Self(Arc::new(font)))
    }
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LabelFont")
    }
}

/// Rendering options, explicit per call rather than ambient.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Only detections scoring strictly above this are drawn
    pub min_score: f64,
    /// Box and label color
    pub color: Rgba<u8>,
    /// Box edge thickness in pixels
    pub thickness: u32,
    /// Font for label text; boxes are drawn without text when absent
    pub font: Option<LabelFont>,
    /// Label text height in pixels
    pub font_scale: f32,
    /// Resize the image to this size before drawing
    pub target_size: Option<(u32, u32)>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_score: 0.5,
            color: Rgba([255, 64, 64, 255]),
            thickness: 2,
            font: None,
            font_scale: 16.0,
            target_size: None,
        }
    }
}

/// Draw one rectangle (and label, when a font is available) per detection
/// scoring above `options.min_score`.
///
/// Pure with respect to the filesystem: the input image is not modified and
/// nothing is written anywhere. Box coordinates are denormalized against
/// the (possibly resized) image dimensions.
pub fn annotate(
    image: &DynamicImage,
    set: &DetectionSet,
    options: &RenderOptions,
) -> RenderResult<RgbaImage> {
    let mut canvas = match options.target_size {
        Some((w, h)) => image
            .resize_exact(w, h, image::imageops::FilterType::Triangle)
            .to_rgba8(),
        None => image.to_rgba8(),
    };
    let (width, height) = canvas.dimensions();

    let mut drawn = 0usize;
    for detection in set.iter().filter(|d| d.score > options.min_score) {
        let (x0, y0, x1, y1) = detection.bounds.to_pixels(width, height);
        draw_box_edges(&mut canvas, x0, y0, x1, y1, options);

        if let Some(font) = &options.font {
            let text = format!("{} {:.2}", detection.label, detection.score);
            let text_y = y0.saturating_sub(options.font_scale as u32 + 2);
            draw_text_mut(
                &mut canvas,
                options.color,
                x0 as i32,
                text_y as i32,
                PxScale::from(options.font_scale),
                font.0.as_ref(),
                &text,
            );
        }
        drawn += 1;
    }

    debug!(
        image = set.image_reference(),
        detections = set.len(),
        drawn,
        "Annotated image"
    );

    Ok(canvas)
}

/// Load the image behind `image_path`, annotate it, and persist the result.
pub fn render_to_file(
    image_path: impl AsRef<Path>,
    set: &DetectionSet,
    options: &RenderOptions,
    out_path: impl AsRef<Path>,
) -> RenderResult<PathBuf> {
    let image = image::open(image_path.as_ref())?;
    let annotated = annotate(&image, set, options)?;
    save_annotated(&annotated, out_path.as_ref())?;
    Ok(out_path.as_ref().to_path_buf())
}

/// Draw a hollow rectangle with the requested edge thickness by insetting
/// one-pixel rectangles.
fn draw_box_edges(canvas: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, options: &RenderOptions) {
    for t in 0..options.thickness {
        let left = x0.saturating_add(t);
        let top = y0.saturating_add(t);
        let right = x1.saturating_sub(t);
        let bottom = y1.saturating_sub(t);
        if left >= right || top >= bottom {
            break;
        }
        // pixel bounds are inclusive on both edges
        let rect = Rect::at(left as i32, top as i32).of_size(right - left + 1, bottom - top + 1);
        draw_hollow_rect_mut(canvas, rect, options.color);
    }
}
