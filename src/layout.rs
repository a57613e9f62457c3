//! # Layout
//!
//! Geometry of the vertical canvas: where the proportionally scaled foreground
//! lands and how much blurred background shows above and below it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CompositionError, Result};

/// A fixed-size output frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// 1080x1920, the 9:16 frame used by short-form vertical video platforms
    pub const VERTICAL_HD: Canvas = Canvas { width: 1080, height: 1920 };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CompositionError::InvalidCanvas {
                details: format!("{}x{}", self.width, self.height),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::VERTICAL_HD
    }
}

/// Placement of the foreground layer on the canvas
///
/// `scaled_width` always equals the canvas width. When the scaled source is
/// shorter than the canvas, `top_pad + scaled_height + bottom_pad` equals the
/// canvas height and the bottom pad takes the odd pixel. When it is as tall or
/// taller, both pads are zero and the foreground is top-aligned; whatever
/// extends past the canvas is clipped by the compositor, not cropped here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPlan {
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub top_pad: u32,
    pub bottom_pad: u32,
}

impl LayoutPlan {
    /// Where the foreground's top-left corner sits on the canvas
    pub fn foreground_position(&self) -> (u32, u32) {
        (0, self.top_pad)
    }

    /// True when blurred background is visible above or below the foreground
    pub fn is_padded(&self) -> bool {
        self.top_pad + self.bottom_pad > 0
    }

    /// Rows of foreground that fall below the canvas edge
    pub fn overflow(&self, canvas: Canvas) -> u32 {
        self.scaled_height.saturating_sub(canvas.height)
    }
}

/// Scale the source to the target width and split the leftover height into pads
pub fn compute_layout(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
) -> Result<LayoutPlan> {
    if source_width == 0 || source_height == 0 {
        return Err(CompositionError::InvalidDimensions {
            width: source_width,
            height: source_height,
        }
        .into());
    }
    Canvas::new(target_width, target_height).validate()?;

    let scaled = u64::from(source_height) * u64::from(target_width) / u64::from(source_width);
    let scaled_height = u32::try_from(scaled).unwrap_or(u32::MAX);

    let (top_pad, bottom_pad) = if scaled_height < target_height {
        let total_pad = target_height - scaled_height;
        let top = total_pad / 2;
        (top, total_pad - top)
    } else {
        (0, 0)
    };

    let plan = LayoutPlan {
        scaled_width: target_width,
        scaled_height,
        top_pad,
        bottom_pad,
    };

    debug!(
        "Layout {}x{} -> {}x{} (pad top {}, bottom {})",
        source_width, source_height, plan.scaled_width, plan.scaled_height, top_pad, bottom_pad
    );

    Ok(plan)
}
