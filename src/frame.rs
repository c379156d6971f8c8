//! Captured frames.
//!
//! A `Frame` is one RGB raster captured from an ingestion source, plus its
//! capture sequence number. Dimensions are taken from the frame actually
//! delivered by the source, never from the configuration request, so the
//! center point is recomputed every frame.

use anyhow::{anyhow, Result};
use image::RgbImage;

/// One captured RGB frame.
pub struct Frame {
    pub image: RgbImage,
    /// Capture sequence number, starting at 1.
    pub index: u64,
}

impl Frame {
    pub fn new(image: RgbImage, index: u64) -> Self {
        Self { image, index }
    }

    /// Build a frame from a raw interleaved RGB buffer.
    ///
    /// Fails when the buffer length does not match `width * height * 3`,
    /// which indicates a malformed capture.
    pub fn from_raw_rgb(data: Vec<u8>, width: u32, height: u32, index: u64) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if data.len() != expected {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                data.len()
            ));
        }
        let image = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| anyhow!("raw buffer rejected for {}x{} frame", width, height))?;
        Ok(Self { image, index })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Center pixel `(width / 2, height / 2)`, truncating integer division.
    pub fn center(&self) -> (i32, i32) {
        ((self.width() / 2) as i32, (self.height() / 2) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_uses_truncating_division() {
        let frame = Frame::new(RgbImage::new(640, 480), 1);
        assert_eq!(frame.center(), (320, 240));

        let odd = Frame::new(RgbImage::new(7, 5), 2);
        assert_eq!(odd.center(), (3, 2));
    }

    #[test]
    fn from_raw_rgb_rejects_short_buffers() {
        let err = Frame::from_raw_rgb(vec![0u8; 10], 4, 4, 1);
        assert!(err.is_err());
    }

    #[test]
    fn from_raw_rgb_accepts_exact_buffers() {
        let frame = Frame::from_raw_rgb(vec![7u8; 4 * 4 * 3], 4, 4, 3).unwrap();
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.index, 3);
    }
}
