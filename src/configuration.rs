//! Playback configuration.
//!
//! [`PlaybackConfig`] is built once before playback starts and never changes
//! during a run. It is a consuming builder: start from
//! [`sequential`](PlaybackConfig::sequential) or
//! [`random`](PlaybackConfig::random) and chain `with_*` calls.
//!
//! # Example
//!
//! ```
//! use slow_movie::PlaybackConfig;
//!
//! let config = PlaybackConfig::sequential("movie.mp4")
//!     .with_delay(120)
//!     .with_frame_increment(2)
//!     .with_initial_frame(1_000);
//! assert_eq!(config.delay_seconds(), 120);
//! assert!(!config.is_random());
//! ```

use std::path::{Path, PathBuf};

use crate::error::SlowMovieError;

/// Where frames come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Play one file frame by frame, looping forever.
    Sequential {
        /// The video file.
        file: PathBuf,
    },
    /// Show one random frame of a random file per iteration.
    Random {
        /// Directory holding candidate video files.
        directory: PathBuf,
    },
}

/// Immutable settings for one playback run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    mode: PlaybackMode,
    delay_seconds: u64,
    frame_increment: u64,
    initial_frame: u64,
    scale_to_fit: bool,
    debug: bool,
    keep_open: bool,
    font: Option<PathBuf>,
}

impl PlaybackConfig {
    fn with_mode(mode: PlaybackMode) -> Self {
        Self {
            mode,
            delay_seconds: 1,
            frame_increment: 1,
            initial_frame: 0,
            scale_to_fit: true,
            debug: false,
            keep_open: false,
            font: None,
        }
    }

    /// Sequential playback of `file`.
    ///
    /// Defaults: 1 second delay, every frame, starting at frame 0, scaled to
    /// fit, debug off.
    pub fn sequential<P: Into<PathBuf>>(file: P) -> Self {
        Self::with_mode(PlaybackMode::Sequential { file: file.into() })
    }

    /// Random-frame playback from the videos in `directory`.
    pub fn random<P: Into<PathBuf>>(directory: P) -> Self {
        Self::with_mode(PlaybackMode::Random {
            directory: directory.into(),
        })
    }

    /// Seconds between frames. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_delay(mut self, seconds: u64) -> Self {
        self.delay_seconds = seconds.max(1);
        self
    }

    /// Frames to advance after each shown frame. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_frame_increment(mut self, increment: u64) -> Self {
        self.frame_increment = increment.max(1);
        self
    }

    /// First frame shown on every pass (sequential mode only).
    #[must_use]
    pub fn with_initial_frame(mut self, frame: u64) -> Self {
        self.initial_frame = frame;
        self
    }

    /// Scale frames to fit the display. Defaults to `true`.
    #[must_use]
    pub fn with_scaling(mut self, scale_to_fit: bool) -> Self {
        self.scale_to_fit = scale_to_fit;
        self
    }

    /// Verbose diagnostics plus the on-screen overlay.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Keep the video decoder open between frames instead of reopening the
    /// file for each one.
    #[must_use]
    pub fn with_keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = keep_open;
        self
    }

    /// Font used for the debug overlay.
    #[must_use]
    pub fn with_font<P: Into<PathBuf>>(mut self, font: P) -> Self {
        self.font = Some(font.into());
        self
    }

    /// The diagnostic preset: 1 second delay, every 10th frame, scaling on,
    /// debug on.
    #[must_use]
    pub fn with_test_mode(self) -> Self {
        self.with_delay(1)
            .with_frame_increment(10)
            .with_scaling(true)
            .with_debug(true)
    }

    pub fn mode(&self) -> &PlaybackMode {
        &self.mode
    }

    /// The video file (sequential) or candidate directory (random).
    pub fn source_path(&self) -> &Path {
        match &self.mode {
            PlaybackMode::Sequential { file } => file,
            PlaybackMode::Random { directory } => directory,
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self.mode, PlaybackMode::Random { .. })
    }

    pub fn delay_seconds(&self) -> u64 {
        self.delay_seconds
    }

    pub fn frame_increment(&self) -> u64 {
        self.frame_increment
    }

    pub fn initial_frame(&self) -> u64 {
        self.initial_frame
    }

    pub fn scale_to_fit(&self) -> bool {
        self.scale_to_fit
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn keep_open(&self) -> bool {
        self.keep_open
    }

    pub fn font(&self) -> Option<&Path> {
        self.font.as_deref()
    }

    /// Check that the configured file or directory exists.
    ///
    /// # Errors
    ///
    /// [`SlowMovieError::SourceNotFound`] when the path is missing,
    /// [`SlowMovieError::Config`] when a file was expected but a directory
    /// was given or vice versa.
    pub fn validate(&self) -> Result<(), SlowMovieError> {
        let path = self.source_path();
        if !path.exists() {
            return Err(SlowMovieError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        match &self.mode {
            PlaybackMode::Sequential { file } if file.is_dir() => Err(SlowMovieError::Config(
                format!("{} is a directory; pass a video file or use random mode", file.display()),
            )),
            PlaybackMode::Random { directory } if !directory.is_dir() => {
                Err(SlowMovieError::Config(format!(
                    "random mode needs a directory, got {}",
                    directory.display()
                )))
            }
            _ => Ok(()),
        }
    }
}
