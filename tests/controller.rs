//! Playback loop tests against an in-memory source, a recording sink and a
//! virtual clock.

use std::{
    cell::Cell,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use image::{Rgb, RgbImage};
use rand::{SeedableRng, rngs::StdRng};
use slow_movie::{
    CancellationToken, DecodedFrame, FrameSource, LETTERBOX_COLOR, NO_SCALE_COLOR, PlaybackConfig,
    PlaybackController, PresentationSink, Sleeper, SlowMovieError,
};

// ── Test doubles ────────────────────────────────────────────────────

/// Advances a shared clock instead of sleeping.
struct VirtualClock {
    seconds: Rc<Cell<u64>>,
}

impl Sleeper for VirtualClock {
    fn sleep(&mut self, duration: Duration) {
        self.seconds.set(self.seconds.get() + duration.as_secs());
    }
}

/// Serves blank frames of a fixed size and records every request.
#[derive(Default)]
struct FakeSource {
    totals: HashMap<PathBuf, u64>,
    default_total: u64,
    frame_size: (u32, u32),
    failing_frames: Vec<u64>,
    unopenable: bool,
    decoded: Vec<(PathBuf, u64)>,
}

impl FakeSource {
    fn new(total: u64) -> Self {
        Self {
            default_total: total,
            frame_size: (16, 9),
            ..Self::default()
        }
    }
}

impl FrameSource for FakeSource {
    fn frame_count(&mut self, path: &Path) -> Result<u64, SlowMovieError> {
        if self.unopenable {
            return Err(SlowMovieError::Open {
                path: path.to_path_buf(),
                reason: "unsupported container".to_string(),
            });
        }
        Ok(*self.totals.get(path).unwrap_or(&self.default_total))
    }

    fn decode_frame(&mut self, path: &Path, frame_number: u64) -> Result<DecodedFrame, SlowMovieError> {
        self.decoded.push((path.to_path_buf(), frame_number));
        if self.failing_frames.contains(&frame_number) {
            return Err(SlowMovieError::Decode {
                path: path.to_path_buf(),
                frame_number,
                reason: "corrupt packet".to_string(),
            });
        }
        let (width, height) = self.frame_size;
        Ok(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])))
    }
}

struct Presented {
    size: (u32, u32),
    offset: (i32, i32),
    background: Rgb<u8>,
}

/// Records presented frames and asks to quit after a number of them, or
/// once the virtual clock reaches a deadline.
struct RecordingSink {
    size: (u32, u32),
    presented: Vec<Presented>,
    quit_after_frames: Option<usize>,
    quit_at_second: Option<(Rc<Cell<u64>>, u64)>,
    cancel_token_after_frames: Option<(CancellationToken, usize)>,
}

impl RecordingSink {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            presented: Vec::new(),
            quit_after_frames: None,
            quit_at_second: None,
            cancel_token_after_frames: None,
        }
    }

    fn quit_after(mut self, frames: usize) -> Self {
        self.quit_after_frames = Some(frames);
        self
    }
}

impl PresentationSink for RecordingSink {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn present(&mut self, image: &RgbImage, x: i32, y: i32, background: Rgb<u8>) -> Result<(), SlowMovieError> {
        self.presented.push(Presented {
            size: image.dimensions(),
            offset: (x, y),
            background,
        });
        if let Some((token, frames)) = &self.cancel_token_after_frames
            && self.presented.len() >= *frames
        {
            token.cancel();
        }
        Ok(())
    }

    fn poll_cancel(&mut self) -> bool {
        let frames_reached = self
            .quit_after_frames
            .is_some_and(|frames| self.presented.len() >= frames);
        let deadline_reached = self
            .quit_at_second
            .as_ref()
            .is_some_and(|(clock, deadline)| clock.get() >= *deadline);
        frames_reached || deadline_reached
    }
}

fn clock() -> (Rc<Cell<u64>>, Box<dyn Sleeper>) {
    let seconds = Rc::new(Cell::new(0));
    let sleeper = Box::new(VirtualClock {
        seconds: Rc::clone(&seconds),
    });
    (seconds, sleeper)
}

fn frame_numbers(source: &FakeSource) -> Vec<u64> {
    source.decoded.iter().map(|(_, frame)| *frame).collect()
}

// ── Sequential mode ─────────────────────────────────────────────────

#[test]
fn sequential_steps_by_increment_and_restarts() {
    let config = PlaybackConfig::sequential("movie.mp4")
        .with_initial_frame(1)
        .with_frame_increment(10);
    let (seconds, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, FakeSource::new(101), RecordingSink::new(160, 90).quit_after(12))
            .with_sleeper(sleeper);

    let summary = controller.run().expect("playback failed");

    assert_eq!(
        frame_numbers(controller.source()),
        [1, 11, 21, 31, 41, 51, 61, 71, 81, 91, 1, 11]
    );
    assert_eq!(summary.iterations, 2);
    assert_eq!(summary.frames_shown, 12);
    assert_eq!(summary.frames_skipped, 0);
    // One second after each frame.
    assert_eq!(seconds.get(), 12);
}

#[test]
fn last_frame_ends_the_pass_when_increment_divides_evenly() {
    let config = PlaybackConfig::sequential("movie.mp4").with_frame_increment(5);
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, FakeSource::new(10), RecordingSink::new(160, 90).quit_after(3))
            .with_sleeper(sleeper);

    controller.run().expect("playback failed");

    assert_eq!(frame_numbers(controller.source()), [0, 5, 0]);
}

#[test]
fn huge_increment_ends_the_pass_instead_of_wrapping() {
    let config = PlaybackConfig::sequential("movie.mp4")
        .with_initial_frame(1)
        .with_frame_increment(u64::MAX);
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, FakeSource::new(101), RecordingSink::new(160, 90).quit_after(2))
            .with_sleeper(sleeper);

    let summary = controller.run().expect("playback failed");

    assert_eq!(frame_numbers(controller.source()), [1, 1]);
    assert_eq!(summary.iterations, 2);
}

#[test]
fn delay_is_waited_after_every_frame() {
    let config = PlaybackConfig::sequential("movie.mp4").with_delay(45);
    let (seconds, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, FakeSource::new(100), RecordingSink::new(160, 90).quit_after(3))
            .with_sleeper(sleeper);

    controller.run().expect("playback failed");

    // Two full waits, then the quit is seen on the first tick of the third.
    assert_eq!(seconds.get(), 2 * 45 + 1);
    assert_eq!(controller.sink().presented.len(), 3);
}

#[test]
fn quit_is_honoured_within_a_tick() {
    let config = PlaybackConfig::sequential("movie.mp4").with_delay(60);
    let (seconds, sleeper) = clock();
    let mut sink = RecordingSink::new(160, 90);
    sink.quit_at_second = Some((Rc::clone(&seconds), 3));
    let mut controller =
        PlaybackController::new(&config, FakeSource::new(100), sink).with_sleeper(sleeper);

    let summary = controller.run().expect("playback failed");

    assert!(seconds.get() <= 4, "took {} s to stop", seconds.get());
    assert_eq!(summary.frames_shown, 1);
}

#[test]
fn decode_failure_skips_and_advances() {
    let config = PlaybackConfig::sequential("movie.mp4")
        .with_initial_frame(1)
        .with_frame_increment(10);
    let mut source = FakeSource::new(31);
    source.failing_frames = vec![11];
    let (seconds, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, source, RecordingSink::new(160, 90).quit_after(3))
            .with_sleeper(sleeper);

    let summary = controller.run().expect("a bad frame must not stop playback");

    assert_eq!(frame_numbers(controller.source()), [1, 11, 21, 1]);
    assert_eq!(summary.frames_shown, 3);
    assert_eq!(summary.frames_skipped, 1);
    // The delay still runs after the skipped frame.
    assert_eq!(seconds.get(), 4);
}

#[test]
fn initial_frame_past_the_end_is_a_config_error() {
    let config = PlaybackConfig::sequential("movie.mp4").with_initial_frame(200);
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, FakeSource::new(101), RecordingSink::new(160, 90))
            .with_sleeper(sleeper);

    let result = controller.run();

    assert!(matches!(result, Err(SlowMovieError::Config(_))));
    assert!(controller.sink().presented.is_empty());
}

#[test]
fn unopenable_file_is_fatal_in_sequential_mode() {
    let config = PlaybackConfig::sequential("broken.mp4");
    let mut source = FakeSource::new(100);
    source.unopenable = true;
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, source, RecordingSink::new(160, 90)).with_sleeper(sleeper);

    assert!(matches!(controller.run(), Err(SlowMovieError::Open { .. })));
}

// ── Fitting ─────────────────────────────────────────────────────────

#[test]
fn scaled_frames_are_letterboxed_and_centred() {
    let config = PlaybackConfig::sequential("portrait.mp4");
    let mut source = FakeSource::new(100);
    source.frame_size = (60, 80);
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, source, RecordingSink::new(80, 60).quit_after(1))
            .with_sleeper(sleeper);

    controller.run().expect("playback failed");

    let presented = &controller.sink().presented[0];
    assert_eq!(presented.size, (45, 60));
    assert_eq!(presented.offset, (17, 0));
    assert_eq!(presented.background, LETTERBOX_COLOR);
}

#[test]
fn wide_frames_fill_the_width_at_the_top() {
    let config = PlaybackConfig::sequential("wide.mp4");
    let mut source = FakeSource::new(100);
    source.frame_size = (192, 108);
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, source, RecordingSink::new(80, 60).quit_after(1))
            .with_sleeper(sleeper);

    controller.run().expect("playback failed");

    let presented = &controller.sink().presented[0];
    assert_eq!(presented.size, (80, 45));
    assert_eq!(presented.offset, (0, 0));
}

#[test]
fn unscaled_frames_sit_at_the_origin_on_red() {
    let config = PlaybackConfig::sequential("movie.mp4").with_scaling(false);
    let mut source = FakeSource::new(100);
    source.frame_size = (32, 18);
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, source, RecordingSink::new(160, 90).quit_after(1))
            .with_sleeper(sleeper);

    controller.run().expect("playback failed");

    let presented = &controller.sink().presented[0];
    assert_eq!(presented.size, (32, 18));
    assert_eq!(presented.offset, (0, 0));
    assert_eq!(presented.background, NO_SCALE_COLOR);
}

// ── Random mode ─────────────────────────────────────────────────────

#[test]
fn random_mode_shows_one_frame_per_pick() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let long = directory.path().join("long.mp4");
    let short = directory.path().join("short.mkv");
    for path in [&long, &short] {
        fs::write(path, b"").expect("Failed to write file");
    }
    fs::write(directory.path().join("notes.txt"), b"").expect("Failed to write file");

    let mut source = FakeSource::new(0);
    source.totals.insert(long.clone(), 200_000);
    source.totals.insert(short.clone(), 50);

    let config = PlaybackConfig::random(directory.path()).with_delay(5);
    let (seconds, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, source, RecordingSink::new(160, 90).quit_after(20))
            .with_sleeper(sleeper)
            .with_rng(StdRng::seed_from_u64(17));

    let summary = controller.run().expect("playback failed");

    assert_eq!(summary.iterations, 20);
    assert_eq!(summary.frames_shown, 20);
    for (path, frame) in &controller.source().decoded {
        if *path == long {
            assert!((7_200..=192_800).contains(frame), "frame {frame} of long.mp4");
        } else {
            assert_eq!(*path, short);
            assert!((1..=49).contains(frame), "frame {frame} of short.mkv");
        }
    }
    assert_eq!(seconds.get(), 19 * 5 + 1);
}

#[test]
fn random_mode_skips_unopenable_files() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(directory.path().join("broken.mp4"), b"").expect("Failed to write file");

    let mut source = FakeSource::new(100);
    source.unopenable = true;
    let config = PlaybackConfig::random(directory.path()).with_delay(2);
    let (seconds, sleeper) = clock();
    let mut sink = RecordingSink::new(160, 90);
    sink.quit_at_second = Some((Rc::clone(&seconds), 6));
    let mut controller = PlaybackController::new(&config, source, sink)
        .with_sleeper(sleeper)
        .with_rng(StdRng::seed_from_u64(2));

    let summary = controller.run().expect("random mode keeps going");

    assert_eq!(summary.frames_shown, 0);
    assert_eq!(summary.frames_skipped, 3);
}

#[test]
fn random_mode_with_no_videos_fails() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let config = PlaybackConfig::random(directory.path());
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, FakeSource::new(100), RecordingSink::new(160, 90))
            .with_sleeper(sleeper);

    assert!(matches!(controller.run(), Err(SlowMovieError::NoCandidates { .. })));
}

// ── Cancellation ────────────────────────────────────────────────────

#[test]
fn cancelled_token_stops_before_the_first_frame() {
    let config = PlaybackConfig::sequential("movie.mp4");
    let token = CancellationToken::new();
    token.cancel();
    let (_, sleeper) = clock();
    let mut controller =
        PlaybackController::new(&config, FakeSource::new(100), RecordingSink::new(160, 90))
            .with_sleeper(sleeper)
            .with_cancellation(token);

    let summary = controller.run().expect("playback failed");

    assert_eq!(summary.iterations, 0);
    assert!(controller.sink().presented.is_empty());
}

#[test]
fn external_cancel_ends_the_wait() {
    let config = PlaybackConfig::sequential("movie.mp4").with_delay(30);
    let token = CancellationToken::new();
    let mut sink = RecordingSink::new(160, 90);
    sink.cancel_token_after_frames = Some((token.clone(), 2));
    let (seconds, sleeper) = clock();
    let mut controller = PlaybackController::new(&config, FakeSource::new(100), sink)
        .with_sleeper(sleeper)
        .with_cancellation(token);

    let summary = controller.run().expect("playback failed");

    assert_eq!(summary.frames_shown, 2);
    assert!(controller.cancellation_token().is_cancelled());
    assert_eq!(seconds.get(), 31);
}
