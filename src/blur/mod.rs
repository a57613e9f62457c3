//! # Background Blur
//!
//! The background layer is blurred either by the collaborator's own Gaussian
//! filter or, when the installed collaborator lacks one, by convolving each
//! decoded frame in-process. The choice is made once per run from the
//! collaborator's declared capabilities.

pub mod strategy;
pub mod convolution;

pub use strategy::{select_blur_strategy, BlurMode, BlurStrategy};
pub use convolution::FrameBlur;
