//! Presentation sink.
//!
//! The playback controller hands each composed frame to a
//! [`PresentationSink`] and asks it whether the viewer wants to quit. The
//! SDL2 implementation lives in [`display`](crate::display) (feature
//! `display`); tests use in-memory sinks.

use image::{Rgb, RgbImage};

use crate::error::SlowMovieError;

/// A fixed-size output surface that shows frames.
pub trait PresentationSink {
    /// Surface size as `(width, height)`; constant for the sink's lifetime.
    fn size(&self) -> (u32, u32);

    /// Fill the surface with `background`, draw `image` with its top-left
    /// corner at `(x, y)` (clipping anything off-surface), and present it.
    ///
    /// # Errors
    ///
    /// [`SlowMovieError::Display`] when the surface cannot be updated.
    fn present(&mut self, image: &RgbImage, x: i32, y: i32, background: Rgb<u8>) -> Result<(), SlowMovieError>;

    /// Drain pending input and report whether the viewer asked to quit
    /// (window closed or Escape pressed).
    fn poll_cancel(&mut self) -> bool;
}
