//! App icon generation.
//!
//! The logo is drawn as SVG; browsers and the web app manifest want PNGs at
//! fixed sizes. `convert` rasterizes the SVG once, `generate` derives every
//! manifest icon size from that PNG.

use std::path::{Path, PathBuf};

use foodpi_core::{ICON_SIZES, icon_file_name};
use image::imageops::FilterType;
use resvg::{tiny_skia, usvg};
use thiserror::Error;
use tracing::{error, info};

/// Default rasterized logo size.
pub const DEFAULT_LOGO_SIZE: u32 = 512;

/// Errors that can occur while producing icons.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid SVG: {0}")]
    Svg(#[from] usvg::Error),

    #[error("Cannot allocate a {0}x{0} canvas")]
    Canvas(u32),

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{failed} of {total} icon sizes failed")]
    Partial { failed: usize, total: usize },
}

/// Rasterize an SVG into a square PNG of `size` pixels.
///
/// # Errors
///
/// Returns an error if the SVG cannot be read or parsed, or the PNG cannot be
/// written.
pub fn convert(svg_path: &Path, png_path: &Path, size: u32) -> Result<(), IconError> {
    let data = std::fs::read(svg_path).map_err(|source| IconError::Read {
        path: svg_path.to_path_buf(),
        source,
    })?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())?;

    let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or(IconError::Canvas(size))?;
    let svg_size = tree.size();
    #[allow(clippy::cast_precision_loss)]
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / svg_size.width(),
        size as f32 / svg_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    ensure_parent(png_path)?;
    pixmap.save_png(png_path).map_err(|e| IconError::Write {
        path: png_path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!(svg = %svg_path.display(), png = %png_path.display(), size, "Converted SVG to PNG");
    Ok(())
}

/// Write `icon-{s}x{s}.png` into `out_dir` for every manifest icon size.
///
/// Each size is scaled to cover the square and center-cropped. A failing
/// size is logged and the remaining sizes are still written.
///
/// # Errors
///
/// Returns an error if the source image cannot be opened, or
/// `IconError::Partial` if any size failed.
pub fn generate(source: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, IconError> {
    std::fs::create_dir_all(out_dir).map_err(|e| IconError::Write {
        path: out_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let image = image::open(source)?;
    let mut written = Vec::with_capacity(ICON_SIZES.len());
    let mut failed = 0;

    for size in ICON_SIZES {
        let path = out_dir.join(icon_file_name(size));
        match image
            .resize_to_fill(size, size, FilterType::Lanczos3)
            .save(&path)
        {
            Ok(()) => {
                info!(size, path = %path.display(), "Generated icon");
                written.push(path);
            }
            Err(e) => {
                error!(size, path = %path.display(), error = %e, "Failed to generate icon");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(IconError::Partial {
            failed,
            total: ICON_SIZES.len(),
        });
    }
    Ok(written)
}

fn ensure_parent(path: &Path) -> Result<(), IconError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| IconError::Write {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })
        }
        _ => Ok(()),
    }
}
