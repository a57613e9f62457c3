//! # Video Module
//!
//! Input discovery, probing, and the binding to the external video collaborator.

pub mod types;
pub mod backend;
pub mod discovery;
pub mod filter_graph;
pub mod probe;

mod ffmpeg;

pub use types::{Frame, SourceClip};
pub use backend::{BackendCapabilities, CodecPair, RenderJob, VideoBackend};
pub use discovery::{derive_output_path, ensure_directories, has_supported_extension, locate_input};
pub use ffmpeg::{filter_listed, FfmpegBackend};
