//! Debug overlay text.
//!
//! In debug mode the file name, the estimated playing time and the frame
//! status are drawn along the bottom edge of each scaled frame. Glyphs are
//! rasterised with `fontdue` and alpha-blended straight into the RGB buffer.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
};

use fontdue::{Font, FontSettings};
use image::{Rgb, RgbImage};

use crate::error::SlowMovieError;

/// Overlay text height in pixels.
pub const OVERLAY_FONT_SIZE: f32 = 20.0;

/// Fonts tried, in order, when no font path is configured.
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Renders single-line captions onto frames.
pub struct Overlay {
    font: Font,
    size: f32,
    color: Rgb<u8>,
}

impl Debug for Overlay {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Overlay")
            .field("size", &self.size)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Overlay {
    /// Load a TrueType/OpenType font from `path`.
    ///
    /// # Errors
    ///
    /// [`SlowMovieError::Font`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SlowMovieError> {
        let font_error = |reason: String| SlowMovieError::Font {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = fs::read(path).map_err(|error| font_error(error.to_string()))?;
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|reason| font_error(reason.to_string()))?;
        log::debug!("Loaded overlay font {}", path.display());
        Ok(Self {
            font,
            size: OVERLAY_FONT_SIZE,
            color: Rgb([255, 255, 255]),
        })
    }

    /// The configured font if given, otherwise the first of
    /// [`FONT_CANDIDATES`] present on this machine.
    pub fn locate(configured: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = configured {
            return Some(path.to_path_buf());
        }
        FONT_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }

    /// Rendered width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars()
            .map(|character| self.font.metrics(character, self.size).advance_width)
            .sum::<f32>()
            .ceil() as u32
    }

    /// Draw `left` at the bottom-left corner and `right` at the bottom-right
    /// corner of `image`.
    pub fn draw_corners(&self, image: &mut RgbImage, left: &str, right: &str) {
        let descent = self
            .font
            .horizontal_line_metrics(self.size)
            .map(|metrics| metrics.descent)
            .unwrap_or(0.0);
        let baseline = image.height() as i32 + descent.floor() as i32;

        self.draw_text(image, 0, baseline, left);
        let right_x = image.width() as i32 - self.text_width(right) as i32;
        self.draw_text(image, right_x, baseline, right);
    }

    /// Draw `text` with its pen starting at `x` on the baseline `baseline`.
    pub fn draw_text(&self, image: &mut RgbImage, x: i32, baseline: i32, text: &str) {
        let mut pen_x = x as f32;
        for character in text.chars() {
            let (metrics, coverage) = self.font.rasterize(character, self.size);
            let left = pen_x.round() as i32 + metrics.xmin;
            let top = baseline - metrics.ymin - metrics.height as i32;

            for row in 0..metrics.height {
                for column in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + column];
                    if alpha == 0 {
                        continue;
                    }
                    let px = left + column as i32;
                    let py = top + row as i32;
                    if px < 0 || py < 0 || px >= image.width() as i32 || py >= image.height() as i32 {
                        continue;
                    }
                    let pixel = image.get_pixel_mut(px as u32, py as u32);
                    *pixel = blend(*pixel, self.color, alpha);
                }
            }
            pen_x += metrics.advance_width;
        }
    }
}

fn blend(background: Rgb<u8>, foreground: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let alpha = alpha as u16;
    let mix = |bg: u8, fg: u8| ((bg as u16 * (255 - alpha) + fg as u16 * alpha) / 255) as u8;
    Rgb([
        mix(background[0], foreground[0]),
        mix(background[1], foreground[1]),
        mix(background[2], foreground[2]),
    ])
}
