//! Frame fitting tests.

use image::{Rgb, RgbImage};
use slow_movie::{FitAxis, LETTERBOX_COLOR, NO_SCALE_COLOR, Placement, background_color, scale_frame};

#[test]
fn widescreen_on_four_by_three_fits_by_width() {
    let placement = Placement::fit(1920, 1080, 800, 600);
    assert_eq!(placement.fit_axis, Some(FitAxis::Width));
    assert!((placement.scale_factor - 800.0 / 1920.0).abs() < 1e-12);
    assert!((placement.scaled_width - 800.0).abs() < 1e-9);
    assert!((placement.scaled_height - 450.0).abs() < 1e-9);
    assert_eq!(placement.offset_x, 0);
    assert_eq!(placement.offset_y, 0);
}

#[test]
fn portrait_fits_by_height_and_centres() {
    let placement = Placement::fit(600, 800, 800, 600);
    assert_eq!(placement.fit_axis, Some(FitAxis::Height));
    assert!((placement.scale_factor - 0.75).abs() < 1e-12);
    assert!((placement.scaled_width - 450.0).abs() < 1e-9);
    assert!((placement.scaled_height - 600.0).abs() < 1e-9);
    assert_eq!(placement.offset_x, 175);
    assert_eq!(placement.offset_y, 0);
}

#[test]
fn equal_aspect_fits_by_height() {
    let placement = Placement::fit(1280, 720, 1920, 1080);
    assert_eq!(placement.fit_axis, Some(FitAxis::Height));
    assert_eq!(placement.pixel_size(), (1920, 1080));
    assert_eq!(placement.offset_x, 0);
}

#[test]
fn odd_margin_truncates() {
    // 4:3 on 1921×1080: scaled width 1440, margin 481 → offset 240.
    let placement = Placement::fit(640, 480, 1921, 1080);
    assert_eq!(placement.offset_x, 240);
}

#[test]
fn aspect_ratio_is_preserved() {
    for &(width, height) in &[(1920, 1080), (720, 576), (1080, 1920), (4096, 1716), (3, 2)] {
        let placement = Placement::fit(width, height, 1366, 768);
        let source_aspect = width as f64 / height as f64;
        let scaled_aspect = placement.scaled_width / placement.scaled_height;
        assert!((source_aspect - scaled_aspect).abs() < 1e-9);
        assert!(placement.scaled_width <= 1366.0 + 1e-9);
        assert!(placement.scaled_height <= 768.0 + 1e-9);
    }
}

#[test]
fn fitting_is_pure() {
    assert_eq!(Placement::fit(1920, 1080, 800, 600), Placement::fit(1920, 1080, 800, 600));
}

#[test]
fn identity_is_unscaled_at_origin() {
    let placement = Placement::identity(640, 480);
    assert_eq!(placement.scale_factor, 1.0);
    assert_eq!(placement.fit_axis, None);
    assert_eq!((placement.offset_x, placement.offset_y), (0, 0));
    assert_eq!(placement.pixel_size(), (640, 480));
}

#[test]
fn background_signals_scaling_mode() {
    assert_eq!(background_color(true), LETTERBOX_COLOR);
    assert_eq!(background_color(false), NO_SCALE_COLOR);
    assert_eq!(NO_SCALE_COLOR, Rgb([255, 0, 0]));
}

#[test]
fn scaled_frame_matches_placement() {
    let frame = RgbImage::from_pixel(192, 108, Rgb([200, 100, 50]));
    let placement = Placement::fit(192, 108, 80, 60);
    let scaled = scale_frame(&frame, &placement);
    assert_eq!(scaled.dimensions(), (80, 45));
    assert_eq!(*scaled.get_pixel(40, 20), Rgb([200, 100, 50]));
}
