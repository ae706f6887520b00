//! Pixel and timestamp helpers for the FFmpeg decoder.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Bytes per pixel of the RGB24 frames handed to callers.
pub(crate) const RGB_BYTES_PER_PIXEL: usize = 3;

/// Copy an RGB24 FFmpeg frame into a tightly-packed buffer.
///
/// Decoded planes frequently carry per-row padding (stride > width × 3);
/// the padding is dropped so the result feeds straight into
/// [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_bytes = (width as usize) * RGB_BYTES_PER_PIXEL;
    let data = video_frame.data(0);

    if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    }
}

/// Convert a frame number to a container seek target in AV_TIME_BASE
/// (microseconds), as expected by `Input::seek`.
pub(crate) fn frame_number_to_seek_timestamp(frame_number: u64, frames_per_second: f64) -> i64 {
    if frames_per_second <= 0.0 {
        return 0;
    }
    let seconds = frame_number as f64 / frames_per_second;
    (seconds * 1_000_000.0) as i64
}

/// Rescale a PTS value in `time_base` to a frame number.
pub(crate) fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts as f64 * time_base.numerator() as f64 / time_base.denominator().max(1) as f64;
    (seconds * frames_per_second).round().max(0.0) as u64
}

/// Frames per second from a stream rate, or `None` for an unset `0/0` rate.
pub(crate) fn rational_to_fps(rate: Rational) -> Option<f64> {
    if rate.numerator() > 0 && rate.denominator() > 0 {
        Some(rate.numerator() as f64 / rate.denominator() as f64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::{
        format::Pixel,
        software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    };

    use super::*;

    /// A `width × height` packed 24-bit frame whose pixel at (x, y) holds
    /// `[x, y, x + y]` in memory order; row padding is filled with `0xAA`.
    fn patterned_frame(format: Pixel, width: u32, height: u32) -> VideoFrame {
        let mut frame = VideoFrame::new(format, width, height);
        let stride = frame.stride(0);
        let data = frame.data_mut(0);
        data.fill(0xAA);
        for y in 0..height as usize {
            for x in 0..width as usize {
                let offset = y * stride + x * RGB_BYTES_PER_PIXEL;
                data[offset..offset + 3].copy_from_slice(&[x as u8, y as u8, (x + y) as u8]);
            }
        }
        frame
    }

    #[test]
    fn row_padding_is_dropped() {
        let (width, height) = (5, 3);
        let frame = patterned_frame(Pixel::RGB24, width, height);
        assert!(frame.stride(0) > width as usize * RGB_BYTES_PER_PIXEL);

        let buffer = frame_to_rgb_buffer(&frame, width, height);

        assert_eq!(buffer.len(), (width * height) as usize * RGB_BYTES_PER_PIXEL);
        let expected: Vec<u8> = (0..height as u8)
            .flat_map(|y| (0..width as u8).flat_map(move |x| [x, y, x + y]))
            .collect();
        assert_eq!(buffer, expected);
        assert!(!buffer.contains(&0xAA));
    }

    #[test]
    fn bgr_frames_come_out_in_rgb_order() {
        let (width, height) = (4, 2);
        // In BGR memory order each pixel is blue x, green y, red x + y.
        let bgr = patterned_frame(Pixel::BGR24, width, height);

        let mut scaler = ScalingContext::get(
            Pixel::BGR24,
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::POINT,
        )
        .expect("Failed to create scaler");
        let mut rgb = VideoFrame::empty();
        scaler.run(&bgr, &mut rgb).expect("Failed to convert frame");

        let buffer = frame_to_rgb_buffer(&rgb, width, height);
        let expected: Vec<u8> = (0..height as u8)
            .flat_map(|y| (0..width as u8).flat_map(move |x| [x + y, y, x]))
            .collect();
        assert_eq!(buffer, expected);
    }

    #[test]
    fn seek_timestamp_is_in_microseconds() {
        assert_eq!(frame_number_to_seek_timestamp(50, 25.0), 2_000_000);
        assert_eq!(frame_number_to_seek_timestamp(50, 0.0), 0);
    }

    #[test]
    fn pts_maps_back_to_frame_number() {
        let time_base = Rational::new(1, 12_800);
        // Frame 48 at 25 fps sits at 1.92 s = 24_576 ticks.
        assert_eq!(pts_to_frame_number(24_576, time_base, 25.0), 48);
    }

    #[test]
    fn unset_rate_has_no_fps() {
        assert_eq!(rational_to_fps(Rational::new(0, 0)), None);
        assert_eq!(rational_to_fps(Rational::new(30_000, 1001)).map(|fps| fps.round()), Some(30.0));
    }
}
