use image::{ImageBuffer, Rgb, RgbImage};
use std::path::PathBuf;

/// A single decoded rgb24 video frame
///
/// This is a thin wrapper around an RGB image buffer. Frames only exist in this
/// process on the convolution blur path; otherwise the collaborator keeps them.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.buffer.put_pixel(x, y, Rgb(color));
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Number of bytes one rgb24 frame of this size occupies
    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Create a frame from raw RGB bytes
    pub fn from_rgb_bytes(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        ImageBuffer::from_raw(width, height, data).map(|buffer| Self { buffer })
    }

    /// Consume the frame, returning its raw RGB bytes
    pub fn into_rgb_bytes(self) -> Vec<u8> {
        self.buffer.into_raw()
    }
}

/// A probed input video
///
/// The collaborator owns the decoded data; this only carries what the layout
/// and render steps need to know about it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceClip {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,

    /// Duration in seconds, when the container reports one
    pub duration: Option<f64>,

    /// Frames per second
    pub fps: f64,

    pub has_audio: bool,
}

impl SourceClip {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_raw_roundtrip_keeps_pixels() {
        let mut frame = Frame::new_filled(3, 2, [1, 2, 3]);
        frame.set_pixel(2, 1, [9, 8, 7]);

        let bytes = frame.into_rgb_bytes();
        assert_eq!(bytes.len(), Frame::byte_len(3, 2));

        let restored = Frame::from_rgb_bytes(3, 2, bytes).unwrap();
        assert_eq!(restored.get_pixel(0, 0), [1, 2, 3]);
        assert_eq!(restored.get_pixel(2, 1), [9, 8, 7]);
    }

    #[test]
    fn test_frame_from_short_buffer_fails() {
        assert!(Frame::from_rgb_bytes(4, 4, vec![0; 5]).is_none());
    }

    #[test]
    fn test_source_clip_dimensions() {
        let clip = SourceClip {
            path: PathBuf::from("clip.mp4"),
            width: 1920,
            height: 1080,
            duration: Some(12.0),
            fps: 30.0,
            has_audio: true,
        };
        assert_eq!(clip.dimensions(), (1920, 1080));
    }
}
