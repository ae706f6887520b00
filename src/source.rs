//! Frame sources.
//!
//! The playback controller never talks to FFmpeg directly. It asks a
//! [`FrameSource`] for a file's frame count and for individual frames, which
//! lets the decoding strategy change without touching the playback loop.
//!
//! Two implementations are provided:
//!
//! - [`ReopeningSource`] (the default) opens the file for every request and
//!   releases it immediately afterwards. Nothing is held between frames.
//! - [`CachingSource`] keeps the most recently used file open and reuses it
//!   while the path stays the same.

use std::path::Path;

use image::RgbImage;

use crate::{error::SlowMovieError, video::VideoFile};

/// A decoded frame: tightly-packed RGB pixels with their width and height.
pub type DecodedFrame = RgbImage;

/// Access to the frames of video files.
pub trait FrameSource {
    /// Number of frames in the video at `path`.
    ///
    /// # Errors
    ///
    /// [`SlowMovieError::Open`] when the file cannot be opened.
    fn frame_count(&mut self, path: &Path) -> Result<u64, SlowMovieError>;

    /// Decode frame `frame_number` of the video at `path` in RGB order.
    ///
    /// # Errors
    ///
    /// [`SlowMovieError::FrameOutOfRange`] when `frame_number` is outside
    /// `[0, frame_count)`, [`SlowMovieError::Decode`] when reading fails, or
    /// [`SlowMovieError::Open`] when the file cannot be opened.
    fn decode_frame(&mut self, path: &Path, frame_number: u64) -> Result<DecodedFrame, SlowMovieError>;
}

/// Opens the video for each request and closes it straight after.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReopeningSource;

impl FrameSource for ReopeningSource {
    fn frame_count(&mut self, path: &Path) -> Result<u64, SlowMovieError> {
        Ok(VideoFile::open(path)?.frame_count())
    }

    fn decode_frame(&mut self, path: &Path, frame_number: u64) -> Result<DecodedFrame, SlowMovieError> {
        let mut video = VideoFile::open(path)?;
        let frame = video.frame(frame_number)?;
        log::debug!(
            "Decoded frame {} of {} ({}x{})",
            frame_number,
            path.display(),
            frame.width(),
            frame.height()
        );
        Ok(frame)
    }
}

/// Keeps the last opened video around between requests.
#[derive(Debug, Default)]
pub struct CachingSource {
    current: Option<VideoFile>,
}

impl CachingSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn video(&mut self, path: &Path) -> Result<&mut VideoFile, SlowMovieError> {
        let stale = self
            .current
            .as_ref()
            .is_none_or(|video| video.path() != path);
        if stale {
            // Drop the previous decoder before opening the next file.
            self.current = None;
            self.current = Some(VideoFile::open(path)?);
        }
        self.current.as_mut().ok_or_else(|| SlowMovieError::Open {
            path: path.to_path_buf(),
            reason: "video handle unavailable".to_string(),
        })
    }
}

impl FrameSource for CachingSource {
    fn frame_count(&mut self, path: &Path) -> Result<u64, SlowMovieError> {
        Ok(self.video(path)?.frame_count())
    }

    fn decode_frame(&mut self, path: &Path, frame_number: u64) -> Result<DecodedFrame, SlowMovieError> {
        let result = self.video(path)?.frame(frame_number);
        if matches!(result, Err(SlowMovieError::Decode { .. })) {
            // A failed decode can leave the demuxer mid-stream; start clean next time.
            self.current = None;
        }
        result
    }
}
