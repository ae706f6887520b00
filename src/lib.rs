//! # slow-movie
//!
//! Play a video one frame at a time at a very slow, user-controlled pace on
//! a fullscreen display: a feature film stretched over hours or days on a
//! wall-mounted panel.
//!
//! Frames are decoded with FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate, scaled to
//! fill the screen while preserving aspect ratio, and shown with SDL2. The
//! wait between frames stays responsive: closing the window or pressing
//! Escape stops playback within a second even when frames are minutes apart.
//!
//! ## Quick Start
//!
//! ```no_run
//! use slow_movie::{PlaybackConfig, PlaybackController, ReopeningSource, Sdl2Display};
//!
//! let config = PlaybackConfig::sequential("metropolis.mkv")
//!     .with_delay(30)
//!     .with_frame_increment(4);
//! config.validate()?;
//!
//! let display = Sdl2Display::fullscreen("slow-movie")?;
//! PlaybackController::new(&config, ReopeningSource, display).run()?;
//! # Ok::<(), slow_movie::SlowMovieError>(())
//! ```
//!
//! ## Modes
//!
//! - **Sequential**: one file, every `frame_increment`-th frame from
//!   `initial_frame`, looping forever.
//! - **Random**: each iteration shows one random frame of a random video in a
//!   directory, skipping the first and last five minutes of long videos.
//!
//! ## Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `display` (default) | SDL2 fullscreen output and the `slow-movie` binary |
//! | `bundled-sdl` | Build SDL2 from source instead of linking the system library |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed, and SDL2 unless
//! `bundled-sdl` is enabled.

pub mod configuration;
mod conversion;
pub mod controller;
#[cfg(feature = "display")]
pub mod display;
pub mod error;
pub mod error_log;
pub mod estimate;
pub mod ffmpeg;
pub mod overlay;
pub mod placement;
pub mod selection;
pub mod sink;
pub mod source;
pub mod status;
pub mod video;
pub mod wait;

pub use configuration::{PlaybackConfig, PlaybackMode};
pub use controller::{PlaybackController, PlaybackSummary};
#[cfg(feature = "display")]
pub use display::Sdl2Display;
pub use error::SlowMovieError;
pub use estimate::{PlaybackEstimate, TimeUnit, estimate_playback};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use overlay::Overlay;
pub use placement::{FitAxis, LETTERBOX_COLOR, NO_SCALE_COLOR, Placement, background_color, scale_frame};
pub use selection::{
    GUARD_BAND_FRAMES, VIDEO_EXTENSIONS, is_video_file, select_random_frame_index,
    select_random_source, video_candidates,
};
pub use sink::PresentationSink;
pub use source::{CachingSource, DecodedFrame, FrameSource, ReopeningSource};
pub use status::FrameStatus;
pub use video::VideoFile;
pub use wait::{CancellationToken, Sleeper, ThreadSleeper, WAIT_TICK, WaitOutcome, wait_interruptibly};
