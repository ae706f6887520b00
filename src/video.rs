//! FFmpeg-backed video access.
//!
//! [`VideoFile`] opens a container, locates its best video stream, works out
//! how many frames it holds, and decodes any single frame to RGB on request.
//! Each decode builds a fresh decoder, seeks to the nearest keyframe before
//! the target and decodes forward, so calls are independent of each other.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{conversion, error::SlowMovieError};

/// An opened, seekable video file.
///
/// # Example
///
/// ```no_run
/// use slow_movie::VideoFile;
///
/// let mut video = VideoFile::open("movie.mp4")?;
/// println!("{} frames", video.frame_count());
/// let frame = video.frame(1_000)?;
/// frame.save("frame_1000.png")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct VideoFile {
    input_context: Input,
    path: PathBuf,
    stream_index: usize,
    width: u32,
    height: u32,
    frames_per_second: f64,
    frame_count: u64,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("path", &self.path)
            .field("stream_index", &self.stream_index)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frames_per_second", &self.frames_per_second)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file and read its stream parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SlowMovieError::Open`] if FFmpeg cannot open the file, it
    /// has no video stream, or the stream reports no frames.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SlowMovieError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |reason: String| SlowMovieError::Open {
            path: path.clone(),
            reason,
        };

        log::debug!("Opening video file: {}", path.display());

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or_else(|| open_error("no video stream".to_string()))?;
        let stream_index = stream.index();

        let decoder = CodecContext::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|error| open_error(format!("cannot create video decoder: {error}")))?;
        let width = decoder.width();
        let height = decoder.height();

        let frames_per_second = conversion::rational_to_fps(stream.avg_frame_rate())
            .or_else(|| conversion::rational_to_fps(stream.rate()))
            .unwrap_or(0.0);

        // Prefer the container's frame tally; fall back to duration × rate.
        let frame_count = if stream.frames() > 0 {
            stream.frames() as u64
        } else {
            let duration_microseconds = input_context.duration().max(0);
            (duration_microseconds as f64 / 1_000_000.0 * frames_per_second) as u64
        };

        if frame_count == 0 {
            return Err(open_error("video stream reports no frames".to_string()));
        }
        if width == 0 || height == 0 {
            return Err(open_error(format!("invalid frame size {width}x{height}")));
        }

        log::debug!(
            "{}: {}x{} @ {:.3} fps, {} frames",
            path.display(),
            width,
            height,
            frames_per_second,
            frame_count
        );

        Ok(Self {
            input_context,
            path,
            stream_index,
            width,
            height,
            frames_per_second,
            frame_count,
        })
    }

    /// Total number of frames in the video stream.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frame size as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Average frame rate.
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode frame `frame_number` (0-indexed) as packed RGB.
    ///
    /// Pixels are always delivered in RGB order whatever the stream's native
    /// pixel format.
    ///
    /// # Errors
    ///
    /// - [`SlowMovieError::FrameOutOfRange`] if `frame_number >= frame_count()`.
    /// - [`SlowMovieError::Decode`] if seeking, decoding or conversion fails,
    ///   or the stream ends before the frame is reached.
    pub fn frame(&mut self, frame_number: u64) -> Result<RgbImage, SlowMovieError> {
        if frame_number >= self.frame_count {
            return Err(SlowMovieError::FrameOutOfRange {
                path: self.path.clone(),
                frame_number,
                total_frames: self.frame_count,
            });
        }

        let path = self.path.clone();
        let decode_error = |error: ffmpeg_next::Error| SlowMovieError::Decode {
            path: path.clone(),
            frame_number,
            reason: error.to_string(),
        };

        let stream = self
            .input_context
            .stream(self.stream_index)
            .ok_or_else(|| SlowMovieError::Decode {
                path: self.path.clone(),
                frame_number,
                reason: "video stream disappeared".to_string(),
            })?;
        let time_base = stream.time_base();
        let mut decoder = CodecContext::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(decode_error)?;

        // Source pixel format -> RGB24 at native size.
        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            self.width,
            self.height,
            ScalingFlags::BILINEAR,
        )
        .map_err(decode_error)?;

        let target = conversion::frame_number_to_seek_timestamp(frame_number, self.frames_per_second);
        self.input_context
            .seek(target, ..target)
            .map_err(decode_error)?;

        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();
        let frames_per_second = self.frames_per_second;
        let reached = |frame: &VideoFrame| {
            let pts = frame.timestamp().or(frame.pts()).unwrap_or(0);
            conversion::pts_to_frame_number(pts, time_base, frames_per_second) >= frame_number
        };

        for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.stream_index {
                continue;
            }

            decoder.send_packet(&packet).map_err(decode_error)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                if reached(&decoded_frame) {
                    scaler.run(&decoded_frame, &mut rgb_frame).map_err(decode_error)?;
                    return rgb_frame_to_image(&rgb_frame, self.width, self.height, &self.path, frame_number);
                }
            }
        }

        decoder.send_eof().map_err(decode_error)?;
        let mut last_frame = None;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            if reached(&decoded_frame) {
                scaler.run(&decoded_frame, &mut rgb_frame).map_err(decode_error)?;
                return rgb_frame_to_image(&rgb_frame, self.width, self.height, &self.path, frame_number);
            }
            last_frame = Some(decoded_frame.clone());
        }

        // Frame counts taken from the container can overshoot by a frame or
        // two; show the final decodable frame instead of failing.
        if let Some(frame) = last_frame {
            scaler.run(&frame, &mut rgb_frame).map_err(decode_error)?;
            return rgb_frame_to_image(&rgb_frame, self.width, self.height, &self.path, frame_number);
        }

        Err(SlowMovieError::Decode {
            path: self.path.clone(),
            frame_number,
            reason: "stream ended before the frame was reached".to_string(),
        })
    }
}

fn rgb_frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
    path: &Path,
    frame_number: u64,
) -> Result<RgbImage, SlowMovieError> {
    let buffer = conversion::frame_to_rgb_buffer(rgb_frame, width, height);
    RgbImage::from_raw(width, height, buffer).ok_or_else(|| SlowMovieError::Decode {
        path: path.to_path_buf(),
        frame_number,
        reason: "decoded buffer does not match the frame size".to_string(),
    })
}
