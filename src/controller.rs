//! The playback loop.
//!
//! [`PlaybackController`] drives one run:
//!
//! 1. **Select source**: the configured file, or a random file from the
//!    configured directory.
//! 2. **Compute metadata**: the frame count and, in sequential mode, the
//!    estimated time for one pass.
//! 3. **Play frame**: decode, fit to the display, blit.
//! 4. **Wait**: the inter-frame delay in one-second ticks, watching for quit.
//! 5. **Advance / restart / terminate**: sequential mode steps by the frame
//!    increment until it runs off the end, then starts the next pass; random
//!    mode shows a single frame and goes back to step 1. Cancellation at any
//!    poll point ends the run.
//!
//! A frame that cannot be decoded is reported and skipped; the index still
//! advances and the delay still runs.

use std::path::{Path, PathBuf};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    configuration::{PlaybackConfig, PlaybackMode},
    error::SlowMovieError,
    estimate::{PlaybackEstimate, estimate_playback},
    overlay::Overlay,
    placement::{Placement, background_color, scale_frame},
    selection::{select_random_frame_index, select_random_source},
    sink::PresentationSink,
    source::FrameSource,
    status::FrameStatus,
    wait::{CancellationToken, Sleeper, ThreadSleeper, WaitOutcome, wait_interruptibly},
};

/// Mutable state of a run, threaded through the playback loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PlaybackSession {
    /// Number of passes (sequential) or picks (random) started so far.
    iteration: u64,
    /// The file currently playing.
    source: PathBuf,
    /// Index of the next frame to show.
    current_frame: u64,
    /// Frame count of `source`.
    total_frames: u64,
}

impl PlaybackSession {
    /// Point the session at a new source; the iteration counter is kept.
    fn restart(&mut self, source: PathBuf, start_frame: u64, total_frames: u64) {
        self.source = source;
        self.current_frame = start_frame;
        self.total_frames = total_frames;
    }
}

/// Totals reported when a run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Passes or random picks started.
    pub iterations: u64,
    /// Frames put on screen.
    pub frames_shown: u64,
    /// Frames (or random picks) skipped because of a decode or open error.
    pub frames_skipped: u64,
}

/// Drives frame selection, fitting, presentation and timing.
///
/// # Example
///
/// ```no_run
/// use slow_movie::{PlaybackConfig, PlaybackController, ReopeningSource, Sdl2Display};
///
/// let config = PlaybackConfig::sequential("movie.mp4").with_delay(60);
/// config.validate()?;
/// let display = Sdl2Display::fullscreen("slow-movie")?;
/// let mut controller = PlaybackController::new(&config, ReopeningSource, display);
/// let summary = controller.run()?;
/// println!("showed {} frames", summary.frames_shown);
/// # Ok::<(), slow_movie::SlowMovieError>(())
/// ```
pub struct PlaybackController<'a, S, P> {
    config: &'a PlaybackConfig,
    source: S,
    sink: P,
    sleeper: Box<dyn Sleeper>,
    rng: StdRng,
    token: CancellationToken,
    overlay: Option<Overlay>,
}

impl<'a, S: FrameSource, P: PresentationSink> PlaybackController<'a, S, P> {
    /// Create a controller that sleeps on the current thread.
    ///
    /// In debug mode the overlay font is loaded here; a missing font only
    /// disables the overlay.
    pub fn new(config: &'a PlaybackConfig, source: S, sink: P) -> Self {
        let overlay = if config.debug() {
            load_overlay(config.font())
        } else {
            None
        };
        Self {
            config,
            source,
            sink,
            sleeper: Box::new(ThreadSleeper),
            rng: StdRng::from_entropy(),
            token: CancellationToken::new(),
            overlay,
        }
    }

    /// Replace the sleeper (tests use a virtual clock).
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Replace the random number generator used in random mode.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Share a cancellation token so playback can be stopped from elsewhere.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Replace (or remove) the debug overlay.
    #[must_use]
    pub fn with_overlay(mut self, overlay: Option<Overlay>) -> Self {
        self.overlay = overlay;
        self
    }

    /// A clone of the token that stops this controller.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    /// Play until the viewer quits.
    ///
    /// # Errors
    ///
    /// - [`SlowMovieError::NoCandidates`] if a random-mode directory holds no
    ///   video files.
    /// - [`SlowMovieError::Open`] if the sequential-mode file cannot be opened.
    /// - [`SlowMovieError::Config`] if the initial frame lies past the end of
    ///   the video.
    /// - [`SlowMovieError::Display`] if the display fails.
    pub fn run(&mut self) -> Result<PlaybackSummary, SlowMovieError> {
        let mut session = PlaybackSession::default();
        let mut summary = PlaybackSummary::default();

        while !self.cancel_requested() {
            // Select source.
            session.iteration += 1;
            summary.iterations = session.iteration;
            let path = match self.config.mode() {
                PlaybackMode::Sequential { file } => file.clone(),
                PlaybackMode::Random { directory } => select_random_source(directory, &mut self.rng)?,
            };
            log::info!("Playing {}. Iteration {}.", path.display(), session.iteration);

            // Compute metadata.
            let total_frames = match self.source.frame_count(&path) {
                Ok(total_frames) => total_frames,
                Err(error) if self.config.is_random() && error.is_frame_error() => {
                    log::warn!("Skipping {}: {error}", path.display());
                    summary.frames_skipped += 1;
                    if self.wait() == WaitOutcome::Cancelled {
                        break;
                    }
                    continue;
                }
                Err(error) => return Err(error),
            };

            let (start_frame, estimate) = if self.config.is_random() {
                (select_random_frame_index(total_frames, &mut self.rng), None)
            } else {
                let start_frame = self.config.initial_frame();
                if start_frame >= total_frames {
                    return Err(SlowMovieError::Config(format!(
                        "initial frame {start_frame} is past the end of {} ({total_frames} frames)",
                        path.display()
                    )));
                }
                let estimate = estimate_playback(
                    total_frames,
                    self.config.delay_seconds(),
                    self.config.frame_increment(),
                );
                log::info!("Time to play: {estimate}");
                (start_frame, Some(estimate))
            };
            session.restart(path, start_frame, total_frames);

            if self.play_source(&mut session, &mut summary, estimate)? == WaitOutcome::Cancelled {
                break;
            }
        }

        log::info!(
            "Stopped after {} iteration(s), {} frame(s) shown",
            summary.iterations,
            summary.frames_shown
        );
        Ok(summary)
    }

    /// Show frames of the session's source until it is exhausted (sequential)
    /// or one frame has been shown (random).
    fn play_source(
        &mut self,
        session: &mut PlaybackSession,
        summary: &mut PlaybackSummary,
        estimate: Option<PlaybackEstimate>,
    ) -> Result<WaitOutcome, SlowMovieError> {
        let mut first_frame = true;
        loop {
            match self.play_frame(session, estimate, first_frame) {
                Ok(()) => summary.frames_shown += 1,
                Err(error) if error.is_frame_error() => {
                    log::warn!("Skipping frame {}: {error}", session.current_frame);
                    summary.frames_skipped += 1;
                }
                Err(error) => return Err(error),
            }
            first_frame = false;

            session.current_frame = session
                .current_frame
                .saturating_add(self.config.frame_increment());
            if self.wait() == WaitOutcome::Cancelled {
                return Ok(WaitOutcome::Cancelled);
            }

            if self.config.is_random() || session.current_frame >= session.total_frames {
                return Ok(WaitOutcome::Completed);
            }
            if self.cancel_requested() {
                return Ok(WaitOutcome::Cancelled);
            }
        }
    }

    /// Decode, fit and present the session's current frame.
    fn play_frame(
        &mut self,
        session: &PlaybackSession,
        estimate: Option<PlaybackEstimate>,
        first_frame: bool,
    ) -> Result<(), SlowMovieError> {
        let frame = self.source.decode_frame(&session.source, session.current_frame)?;
        let status = FrameStatus {
            iteration: session.iteration,
            frame_number: session.current_frame,
            total_frames: session.total_frames,
        };
        log::info!("{} {}", session.source.display(), status);

        let (screen_width, screen_height) = self.sink.size();
        let scale_to_fit = self.config.scale_to_fit();
        let (placement, mut image) = if scale_to_fit {
            let placement = Placement::fit(frame.width(), frame.height(), screen_width, screen_height);
            if first_frame {
                log::debug!(
                    "Screen aspect ratio: {:.4}, Image aspect ratio: {:.4}, fit by {:?}",
                    screen_width as f64 / screen_height.max(1) as f64,
                    frame.width() as f64 / frame.height().max(1) as f64,
                    placement.fit_axis
                );
            }
            (placement, scale_frame(&frame, &placement))
        } else {
            (Placement::identity(frame.width(), frame.height()), frame)
        };

        if let Some(overlay) = &self.overlay {
            let caption = caption(&session.source, estimate);
            overlay.draw_corners(&mut image, &caption, &status.to_string());
        }

        self.sink.present(
            &image,
            placement.offset_x,
            placement.offset_y,
            background_color(scale_to_fit),
        )
    }

    fn wait(&mut self) -> WaitOutcome {
        let sink = &mut self.sink;
        wait_interruptibly(
            self.config.delay_seconds(),
            self.sleeper.as_mut(),
            &self.token,
            || sink.poll_cancel(),
        )
    }

    fn cancel_requested(&mut self) -> bool {
        if self.sink.poll_cancel() {
            self.token.cancel();
        }
        self.token.is_cancelled()
    }
}

/// Left-hand overlay text: the file name, plus the playing time when known.
fn caption(path: &Path, estimate: Option<PlaybackEstimate>) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match estimate {
        Some(estimate) => format!("{name} ({estimate})"),
        None => name,
    }
}

fn load_overlay(configured: Option<&Path>) -> Option<Overlay> {
    let Some(path) = Overlay::locate(configured) else {
        log::warn!("No overlay font found; pass --font to enable the debug overlay");
        return None;
    };
    match Overlay::load(&path) {
        Ok(overlay) => Some(overlay),
        Err(error) => {
            log::warn!("Debug overlay disabled: {error}");
            None
        }
    }
}
