//! Random-mode selection policy.
//!
//! In random mode every outer iteration shows one frame picked from a random
//! video in a directory. Long videos skip their opening and closing minutes
//! so title and credit sequences are not shown.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rand::Rng;

use crate::error::SlowMovieError;

/// Frames skipped at each end of a long video: five minutes at 24 fps.
pub const GUARD_BAND_FRAMES: u64 = 5 * 60 * 24;

/// Extra frames a video needs beyond both guard bands before they apply.
const GUARD_BAND_MARGIN: u64 = 100;

/// File extensions (lowercase) treated as playable video.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mkv", "mov", "avi", "webm", "wmv", "flv", "mpg", "mpeg", "ts", "ogv",
];

/// Returns `true` if `path` has one of the [`VIDEO_EXTENSIONS`].
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
}

/// List the video files directly inside `directory`, sorted by path.
///
/// # Errors
///
/// [`SlowMovieError::Io`] if the directory cannot be read.
pub fn video_candidates(directory: &Path) -> Result<Vec<PathBuf>, SlowMovieError> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && is_video_file(&path) {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates)
}

/// Pick a random video file from `directory`.
///
/// # Errors
///
/// [`SlowMovieError::NoCandidates`] if the directory holds no video files,
/// [`SlowMovieError::Io`] if it cannot be read.
pub fn select_random_source<R: Rng + ?Sized>(
    directory: &Path,
    rng: &mut R,
) -> Result<PathBuf, SlowMovieError> {
    let mut candidates = video_candidates(directory)?;
    if candidates.is_empty() {
        return Err(SlowMovieError::NoCandidates {
            directory: directory.to_path_buf(),
        });
    }
    let index = rng.gen_range(0..candidates.len());
    log::debug!(
        "Picked {} of {} candidates in {}",
        index + 1,
        candidates.len(),
        directory.display()
    );
    Ok(candidates.swap_remove(index))
}

/// Pick a random frame index for a video with `total_frames` frames.
///
/// Videos longer than two guard bands plus a margin draw from
/// `[GUARD_BAND_FRAMES, total_frames - GUARD_BAND_FRAMES]`; shorter ones from
/// `[1, total_frames - 1]`. A video with one frame (or none) yields 0.
///
/// # Example
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use slow_movie::select_random_frame_index;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let index = select_random_frame_index(50, &mut rng);
/// assert!((1..=49).contains(&index));
/// ```
pub fn select_random_frame_index<R: Rng + ?Sized>(total_frames: u64, rng: &mut R) -> u64 {
    if total_frames > 2 * GUARD_BAND_FRAMES + GUARD_BAND_MARGIN {
        rng.gen_range(GUARD_BAND_FRAMES..=total_frames - GUARD_BAND_FRAMES)
    } else if total_frames > 1 {
        rng.gen_range(1..total_frames)
    } else {
        0
    }
}
