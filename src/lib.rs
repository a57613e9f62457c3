//! # Vertical-Composer
//!
//! Reformat any video onto a vertical 9:16 canvas, filling the space above and
//! below the picture with a blurred, stretched copy of the same video instead
//! of black bars.
//!
//! Decoding, scaling, blurring and encoding are delegated to an external
//! collaborator behind the [`VideoBackend`](video::VideoBackend) trait; the
//! bundled binding drives the `ffmpeg` and `ffprobe` executables.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vertical_composer::{
//!     composition::{Composer, RunOutcome},
//!     config::Config,
//!     video::FfmpegBackend,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let backend = FfmpegBackend::from_config(&config.encoding);
//!
//! match Composer::new(config, backend).run().await? {
//!     RunOutcome::NoInput { directory } => println!("nothing in {:?}", directory),
//!     RunOutcome::Rendered { output, .. } => println!("wrote {:?}", output),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`layout`] - Foreground scaling and padding geometry
//! - [`blur`] - Background blur strategy selection and the in-process fallback
//! - [`composition`] - Layered composite requests and the run pipeline
//! - [`video`] - Input discovery, probing, and the ffmpeg binding
//! - [`config`] - Configuration management
//! - [`tools`] - Companion utilities (user age filter, word count)

pub mod blur;
pub mod composition;
pub mod config;
pub mod error;
pub mod layout;
pub mod tools;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{Composer, RunOutcome},
    config::Config,
    error::{ComposerError, Result},
    layout::{compute_layout, Canvas, LayoutPlan},
    video::{FfmpegBackend, VideoBackend},
};
