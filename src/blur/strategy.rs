use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, VideoError};
use crate::video::BackendCapabilities;

/// Requested blur implementation, as written in the configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurMode {
    /// Use the collaborator's Gaussian filter when it has one
    #[default]
    Auto,
    /// Require the collaborator's Gaussian filter
    Gaussian,
    /// Always blur decoded frames in-process
    Convolution,
}

/// The blur implementation chosen for this run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlurStrategy {
    /// Collaborator-side Gaussian blur, applied inside the filter graph
    Gaussian { sigma: f32 },

    /// In-process image convolution over every decoded background frame
    FrameConvolution { sigma: f32 },
}

impl BlurStrategy {
    pub fn sigma(&self) -> f32 {
        match self {
            Self::Gaussian { sigma } | Self::FrameConvolution { sigma } => *sigma,
        }
    }

    /// Filter graph fragment for strategies the collaborator applies itself
    pub fn filter(&self) -> Option<String> {
        match self {
            Self::Gaussian { sigma } => Some(format!("gblur=sigma={}", sigma)),
            Self::FrameConvolution { .. } => None,
        }
    }

    /// True when the background frames must round-trip through this process
    pub fn needs_frame_pipe(&self) -> bool {
        matches!(self, Self::FrameConvolution { .. })
    }
}

impl fmt::Display for BlurStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gaussian { sigma } => write!(f, "gaussian (sigma {})", sigma),
            Self::FrameConvolution { sigma } => write!(f, "frame convolution (sigma {})", sigma),
        }
    }
}

/// Pick the blur implementation from the configured mode and what the backend declares
pub fn select_blur_strategy(
    mode: BlurMode,
    sigma: f32,
    capabilities: &BackendCapabilities,
) -> Result<BlurStrategy> {
    let strategy = match mode {
        BlurMode::Auto if capabilities.gaussian_blur => BlurStrategy::Gaussian { sigma },
        BlurMode::Auto => {
            warn!("Gaussian blur filter not available in backend, falling back to frame convolution");
            BlurStrategy::FrameConvolution { sigma }
        }
        BlurMode::Gaussian if capabilities.gaussian_blur => BlurStrategy::Gaussian { sigma },
        BlurMode::Gaussian => {
            return Err(VideoError::UnsupportedCapability {
                capability: "gaussian blur filter".to_string(),
            }
            .into());
        }
        BlurMode::Convolution => BlurStrategy::FrameConvolution { sigma },
    };

    info!("Using {} background blur", strategy);
    Ok(strategy)
}
