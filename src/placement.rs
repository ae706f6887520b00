//! Fitting a frame onto the display surface.
//!
//! [`Placement::fit`] decides how a source frame of arbitrary aspect ratio
//! is scaled and positioned on a fixed-size output surface. The image is
//! scaled by whichever surface dimension is the binding constraint, centred
//! horizontally and kept top-aligned.

use image::{Rgb, RgbImage, imageops::FilterType};

/// Background behind a scaled frame.
pub const LETTERBOX_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Background behind an unscaled frame, so no-scale mode is obvious on screen.
pub const NO_SCALE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Which destination dimension determined the scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    /// The source is relatively wider than the surface; it spans the full width.
    Width,
    /// The source is relatively taller (or equal); it spans the full height.
    Height,
}

/// Scale factor and position of a frame on the output surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Multiplier applied to both source dimensions.
    pub scale_factor: f64,
    /// Source width × scale factor.
    pub scaled_width: f64,
    /// Source height × scale factor.
    pub scaled_height: f64,
    /// Left edge of the frame on the surface.
    pub offset_x: i32,
    /// Top edge of the frame on the surface. Always 0: frames are top-aligned.
    pub offset_y: i32,
    /// Constraining axis, or `None` when scaling is disabled.
    pub fit_axis: Option<FitAxis>,
}

impl Placement {
    /// Fit a `source_width × source_height` frame into a
    /// `dest_width × dest_height` surface, preserving aspect ratio.
    ///
    /// Zero dimensions are treated as 1.
    ///
    /// # Example
    ///
    /// ```
    /// use slow_movie::{FitAxis, Placement};
    ///
    /// let placement = Placement::fit(600, 800, 800, 600);
    /// assert_eq!(placement.fit_axis, Some(FitAxis::Height));
    /// assert_eq!(placement.offset_x, 175);
    /// ```
    pub fn fit(source_width: u32, source_height: u32, dest_width: u32, dest_height: u32) -> Self {
        let source_width = source_width.max(1) as f64;
        let source_height = source_height.max(1) as f64;
        let dest_width = dest_width.max(1) as f64;
        let dest_height = dest_height.max(1) as f64;

        let source_aspect = source_width / source_height;
        let dest_aspect = dest_width / dest_height;

        let (scale_factor, fit_axis) = if source_aspect > dest_aspect {
            (dest_width / source_width, FitAxis::Width)
        } else {
            (dest_height / source_height, FitAxis::Height)
        };

        let scaled_width = source_width * scale_factor;
        let scaled_height = source_height * scale_factor;
        let offset_x = ((dest_width - scaled_width) / 2.0).trunc() as i32;

        Self {
            scale_factor,
            scaled_width,
            scaled_height,
            offset_x,
            offset_y: 0,
            fit_axis: Some(fit_axis),
        }
    }

    /// Placement used when scaling is disabled: native size at the top-left corner.
    pub fn identity(source_width: u32, source_height: u32) -> Self {
        Self {
            scale_factor: 1.0,
            scaled_width: source_width as f64,
            scaled_height: source_height as f64,
            offset_x: 0,
            offset_y: 0,
            fit_axis: None,
        }
    }

    /// Scaled size rounded to whole pixels (never below 1×1).
    pub fn pixel_size(&self) -> (u32, u32) {
        let width = self.scaled_width.round().max(1.0) as u32;
        let height = self.scaled_height.round().max(1.0) as u32;
        (width, height)
    }
}

/// Resize `image` to the placement's pixel size.
///
/// Returns a copy untouched when the size already matches.
pub fn scale_frame(image: &RgbImage, placement: &Placement) -> RgbImage {
    let (width, height) = placement.pixel_size();
    if (width, height) == image.dimensions() {
        return image.clone();
    }
    log::debug!(
        "Scaling frame {}x{} -> {}x{} (factor {:.4})",
        image.width(),
        image.height(),
        width,
        height,
        placement.scale_factor
    );
    image::imageops::resize(image, width, height, FilterType::Triangle)
}

/// Background colour to fill the surface with before blitting.
pub fn background_color(scale_to_fit: bool) -> Rgb<u8> {
    if scale_to_fit { LETTERBOX_COLOR } else { NO_SCALE_COLOR }
}
