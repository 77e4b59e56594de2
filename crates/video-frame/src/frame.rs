//! Video frame types and processing

use image::RgbImage;

use crate::FrameError;

/// Bytes per RGB24 pixel
pub const CHANNELS: usize = 3;

/// Decoded RGB video frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        timestamp_ns: u64,
        sequence: u32,
    ) -> Result<Self, FrameError> {
        let frame = Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Check the buffer still matches the dimensions
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::Dimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.width as usize * self.height as usize * CHANNELS;
        if self.data.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Create a black frame of the given size
    pub fn blank(width: u32, height: u32) -> Result<Self, FrameError> {
        let len = width as usize * height as usize * CHANNELS;
        Self::new(vec![0; len], width, height, 0, 0)
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = self.data.get(idx..idx + CHANNELS)?;
        Some([px[0], px[1], px[2]])
    }

    /// Frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Move the pixel buffer into an `image` buffer for drawing.
    ///
    /// Timestamp and sequence are returned alongside so the frame can be
    /// rebuilt with [`VideoFrame::from_rgb_image`].
    pub fn into_rgb_image(self) -> Result<(RgbImage, u64, u32), FrameError> {
        let (width, height) = (self.width, self.height);
        let actual = self.data.len();
        match RgbImage::from_raw(width, height, self.data) {
            Some(img) => Ok((img, self.timestamp_ns, self.sequence)),
            None => Err(FrameError::BufferSize {
                expected: width as usize * height as usize * CHANNELS,
                actual,
            }),
        }
    }

    /// Rebuild a frame from an `image` buffer
    pub fn from_rgb_image(img: RgbImage, timestamp_ns: u64, sequence: u32) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }
}
