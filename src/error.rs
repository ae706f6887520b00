//! Error types for the `slow-movie` crate.
//!
//! This module defines [`SlowMovieError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry the file path and frame
//! number involved so a log line is enough to diagnose the problem.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `slow-movie` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SlowMovieError {
    /// A configuration value is missing or invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The configured movie file or random-mode directory does not exist.
    #[error("{} can not be found", path.display())]
    SourceNotFound {
        /// The path that was configured.
        path: PathBuf,
    },

    /// The video file could not be opened or holds no decodable frames.
    #[error("Failed to open video file at {}: {reason}", path.display())]
    Open {
        /// Path of the video file.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The requested frame index lies outside `[0, total_frames)`.
    #[error(
        "Frame {frame_number} of {} is out of range (video has {total_frames} frames)",
        path.display()
    )]
    FrameOutOfRange {
        /// Path of the video file.
        path: PathBuf,
        /// The frame index that was requested.
        frame_number: u64,
        /// The total number of frames in the video.
        total_frames: u64,
    },

    /// Reading or decoding a frame failed.
    #[error("Failed to decode frame {frame_number} of {}: {reason}", path.display())]
    Decode {
        /// Path of the video file.
        path: PathBuf,
        /// The frame index being decoded.
        frame_number: u64,
        /// Underlying reason the decode failed.
        reason: String,
    },

    /// A random-mode directory contains no files with a video extension.
    #[error("No video files found in {}", directory.display())]
    NoCandidates {
        /// The directory that was searched.
        directory: PathBuf,
    },

    /// The presentation surface failed.
    #[error("Display error: {0}")]
    Display(String),

    /// The overlay font could not be loaded.
    #[error("Failed to load font {}: {reason}", path.display())]
    Font {
        /// Path of the font file.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while scaling a frame.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

impl SlowMovieError {
    /// Returns `true` for failures confined to a single frame extraction
    /// (open, seek and decode errors).
    ///
    /// The playback controller reports these and moves on instead of
    /// stopping the run.
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            SlowMovieError::Open { .. }
                | SlowMovieError::FrameOutOfRange { .. }
                | SlowMovieError::Decode { .. }
                | SlowMovieError::Ffmpeg(_)
        )
    }
}

impl From<FfmpegError> for SlowMovieError {
    fn from(error: FfmpegError) -> Self {
        SlowMovieError::Ffmpeg(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_errors_are_classified() {
        let decode = SlowMovieError::Decode {
            path: PathBuf::from("movie.mp4"),
            frame_number: 3,
            reason: "truncated packet".to_string(),
        };
        assert!(decode.is_frame_error());

        let missing = SlowMovieError::SourceNotFound {
            path: PathBuf::from("movie.mp4"),
        };
        assert!(!missing.is_frame_error());
        assert_eq!(missing.to_string(), "movie.mp4 can not be found");
    }
}
