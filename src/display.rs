//! SDL2 fullscreen display.
//!
//! Opens a borderless fullscreen window at the desktop's native resolution,
//! streams each composed RGB frame into a texture, and watches the event
//! queue for a window close or the Escape key.

use image::{Rgb, RgbImage};
use sdl2::{
    EventPump, Sdl,
    event::Event,
    keyboard::Keycode,
    pixels::{Color, PixelFormatEnum},
    rect::Rect,
    render::{Canvas, TextureCreator},
    video::{Window, WindowContext},
};

use crate::{error::SlowMovieError, sink::PresentationSink};

/// Fullscreen SDL2 presentation surface.
///
/// The window and SDL context are released when this value is dropped, which
/// happens on every exit path including unwinding.
pub struct Sdl2Display {
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    event_pump: EventPump,
    width: u32,
    height: u32,
    _context: Sdl,
}

impl Sdl2Display {
    /// Create a fullscreen window covering the primary display.
    ///
    /// # Errors
    ///
    /// [`SlowMovieError::Display`] if SDL2 cannot initialise video output or
    /// create the window.
    pub fn fullscreen(title: &str) -> Result<Self, SlowMovieError> {
        log::info!("Setting up the display...");
        let context = sdl2::init().map_err(SlowMovieError::Display)?;
        let video = context.video().map_err(SlowMovieError::Display)?;

        let mode = video
            .desktop_display_mode(0)
            .map_err(SlowMovieError::Display)?;
        let window = video
            .window(title, mode.w.max(1) as u32, mode.h.max(1) as u32)
            .fullscreen_desktop()
            .build()
            .map_err(|error| SlowMovieError::Display(error.to_string()))?;
        context.mouse().show_cursor(false);

        let canvas = window
            .into_canvas()
            .build()
            .map_err(|error| SlowMovieError::Display(error.to_string()))?;
        let (width, height) = canvas.output_size().map_err(SlowMovieError::Display)?;
        let texture_creator = canvas.texture_creator();
        let event_pump = context.event_pump().map_err(SlowMovieError::Display)?;

        log::info!("Screen width: {width} height: {height}");

        Ok(Self {
            canvas,
            texture_creator,
            event_pump,
            width,
            height,
            _context: context,
        })
    }
}

impl PresentationSink for Sdl2Display {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, image: &RgbImage, x: i32, y: i32, background: Rgb<u8>) -> Result<(), SlowMovieError> {
        let (image_width, image_height) = image.dimensions();
        let [red, green, blue] = background.0;

        let mut texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::RGB24, image_width, image_height)
            .map_err(|error| SlowMovieError::Display(error.to_string()))?;
        texture
            .update(None, image.as_raw(), (image_width * 3) as usize)
            .map_err(|error| SlowMovieError::Display(error.to_string()))?;

        self.canvas.set_draw_color(Color::RGB(red, green, blue));
        self.canvas.clear();
        self.canvas
            .copy(&texture, None, Some(Rect::new(x, y, image_width, image_height)))
            .map_err(SlowMovieError::Display)?;
        self.canvas.present();
        Ok(())
    }

    fn poll_cancel(&mut self) -> bool {
        let mut quit = false;
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    log::info!("Quit event received");
                    quit = true;
                }
                Event::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => {
                    log::info!("Escape pressed");
                    quit = true;
                }
                _ => {}
            }
        }
        quit
    }
}

impl Drop for Sdl2Display {
    fn drop(&mut self) {
        log::debug!("Releasing the display");
    }
}
