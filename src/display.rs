//! Frame presentation.
//!
//! `Display` shows annotated frames in a desktop window (feature:
//! display-minifb) and reports the user's quit intent, polled once per loop
//! iteration. A headless backend is always available for tests and
//! display-less machines; it presents nothing and never requests quit.
//!
//! The window is created lazily from the first presented frame's dimensions
//! and recreated if the capture size changes, so presentation always matches
//! the frames actually produced.

use anyhow::Result;

use crate::frame::Frame;

/// Configuration for the presentation layer.
#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub window_title: String,
    /// Skip windowing entirely; frames are consumed without being shown.
    pub headless: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: "centermark".to_string(),
            headless: false,
        }
    }
}

/// Frame presenter.
pub struct Display {
    backend: DisplayBackend,
}

enum DisplayBackend {
    Headless(HeadlessDisplay),
    #[cfg(feature = "display-minifb")]
    Window(WindowDisplay),
}

impl Display {
    pub fn new(config: DisplayConfig) -> Result<Self> {
        if config.headless {
            return Ok(Self {
                backend: DisplayBackend::Headless(HeadlessDisplay::default()),
            });
        }
        #[cfg(feature = "display-minifb")]
        {
            Ok(Self {
                backend: DisplayBackend::Window(WindowDisplay::new(config)),
            })
        }
        #[cfg(not(feature = "display-minifb"))]
        {
            log::warn!("display-minifb feature disabled; running headless");
            Ok(Self {
                backend: DisplayBackend::Headless(HeadlessDisplay::default()),
            })
        }
    }

    /// Present one annotated frame.
    pub fn present(&mut self, frame: &Frame) -> Result<()> {
        match &mut self.backend {
            DisplayBackend::Headless(display) => display.present(frame),
            #[cfg(feature = "display-minifb")]
            DisplayBackend::Window(display) => display.present(frame),
        }
    }

    /// Poll the user's quit intent: quit key pressed or window closed.
    pub fn quit_requested(&self) -> bool {
        match &self.backend {
            DisplayBackend::Headless(_) => false,
            #[cfg(feature = "display-minifb")]
            DisplayBackend::Window(display) => display.quit_requested(),
        }
    }

    /// Frames presented so far.
    pub fn presented(&self) -> u64 {
        match &self.backend {
            DisplayBackend::Headless(display) => display.presented,
            #[cfg(feature = "display-minifb")]
            DisplayBackend::Window(display) => display.presented,
        }
    }
}

// ----------------------------------------------------------------------------
// Headless backend
// ----------------------------------------------------------------------------

#[derive(Default)]
struct HeadlessDisplay {
    presented: u64,
}

impl HeadlessDisplay {
    fn present(&mut self, _frame: &Frame) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// minifb window backend
// ----------------------------------------------------------------------------

#[cfg(feature = "display-minifb")]
struct WindowDisplay {
    config: DisplayConfig,
    window: Option<minifb::Window>,
    buffer: Vec<u32>,
    presented: u64,
}

#[cfg(feature = "display-minifb")]
impl WindowDisplay {
    fn new(config: DisplayConfig) -> Self {
        Self {
            config,
            window: None,
            buffer: Vec::new(),
            presented: 0,
        }
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let width = frame.width() as usize;
        let height = frame.height() as usize;

        let recreate = match &self.window {
            Some(window) => window.get_size() != (width, height),
            None => true,
        };
        if recreate {
            let window = minifb::Window::new(
                &self.config.window_title,
                width,
                height,
                minifb::WindowOptions::default(),
            )
            .map_err(|err| anyhow::Error::new(err).context("create display window"))?;
            self.window = Some(window);
        }

        self.buffer.clear();
        self.buffer.extend(frame.image.pixels().map(|pixel| {
            ((pixel[0] as u32) << 16) | ((pixel[1] as u32) << 8) | pixel[2] as u32
        }));

        if let Some(window) = self.window.as_mut() {
            window
                .update_with_buffer(&self.buffer, width, height)
                .map_err(|err| anyhow::Error::new(err).context("present frame"))?;
            self.presented += 1;
        }
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        match &self.window {
            Some(window) => {
                !window.is_open()
                    || window.is_key_down(minifb::Key::Q)
                    || window.is_key_down(minifb::Key::Escape)
            }
            // No window yet: nothing to quit from.
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn headless_display_counts_frames_and_never_quits() -> Result<()> {
        let mut display = Display::new(DisplayConfig {
            headless: true,
            ..DisplayConfig::default()
        })?;

        let frame = Frame::new(RgbImage::new(32, 24), 1);
        display.present(&frame)?;
        display.present(&frame)?;

        assert_eq!(display.presented(), 2);
        assert!(!display.quit_requested());
        Ok(())
    }
}
