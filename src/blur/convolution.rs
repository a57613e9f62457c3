use image::imageops;

use crate::error::{Result, VideoError};
use crate::video::types::Frame;

/// Gaussian-style blur applied to decoded frames in this process
///
/// Used when the collaborator cannot blur on its own. Each call convolves one
/// frame; the caller streams frames through it.
#[derive(Debug, Clone, Copy)]
pub struct FrameBlur {
    sigma: f32,
}

impl FrameBlur {
    pub fn new(sigma: f32) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(VideoError::FrameProcessingFailed {
                reason: format!("blur sigma must be positive, got {}", sigma),
            }
            .into());
        }
        Ok(Self { sigma })
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Blur a frame, keeping its dimensions
    pub fn apply(&self, frame: &Frame) -> Frame {
        Frame::new(imageops::fast_blur(frame.as_image(), self.sigma))
    }

    /// Blur a raw rgb24 buffer of the given size in place of a decoded frame
    pub fn apply_raw(&self, width: u32, height: u32, data: Vec<u8>) -> Result<Vec<u8>> {
        let len = data.len();
        let frame = Frame::from_rgb_bytes(width, height, data).ok_or_else(|| {
            VideoError::FrameProcessingFailed {
                reason: format!("buffer of {} bytes is not a {}x{} rgb24 frame", len, width, height),
            }
        })?;

        Ok(self.apply(&frame).into_rgb_bytes())
    }
}
