//! Per-frame status text.
//!
//! The same messages go to the console log and, in debug mode, onto the
//! frame itself.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::estimate::group_thousands;

/// Where playback stands for the frame being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStatus {
    /// How many times playback has (re)started, counting from 1.
    pub iteration: u64,
    /// Frame index being shown.
    pub frame_number: u64,
    /// Frames in the current video.
    pub total_frames: u64,
}

impl FrameStatus {
    /// Integer percentage of the video reached, `frame / total × 100` truncated.
    pub fn percent_played(&self) -> u64 {
        if self.total_frames == 0 {
            return 0;
        }
        (self.frame_number as f64 / self.total_frames as f64 * 100.0) as u64
    }
}

impl Display for FrameStatus {
    /// Formats as `"Playback 1 Frame 1,001 of 86,400 (1%)"`.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "Playback {} Frame {} of {} ({}%)",
            group_thousands(self.iteration),
            group_thousands(self.frame_number),
            group_thousands(self.total_frames),
            self.percent_played()
        )
    }
}
