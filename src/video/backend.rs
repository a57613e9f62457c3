use std::path::Path;

use crate::composition::CompositeRequest;
use crate::error::Result;
use crate::video::types::SourceClip;

/// What the installed collaborator declares it can do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// A Gaussian blur transform is available inside the filter graph
    pub gaussian_blur: bool,

    /// Version banner, when the collaborator reports one
    pub version: Option<String>,
}

/// Codecs the render is encoded with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecPair {
    pub video: String,
    pub audio: String,
}

/// Everything a backend needs to produce one output file
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    pub source: &'a SourceClip,
    pub request: &'a CompositeRequest,
    pub codecs: &'a CodecPair,
    pub output: &'a Path,
}

/// The external video-processing collaborator
///
/// Decoding, resizing, blurring, compositing and encoding all happen behind
/// this seam. Implementations do not retry and do not clean up after a failed
/// render; whatever the collaborator leaves on disk stays there.
#[allow(async_fn_in_trait)]
pub trait VideoBackend {
    /// Report what this collaborator supports. Called once per run.
    async fn capabilities(&self) -> Result<BackendCapabilities>;

    /// Read dimensions, frame rate and streams of a video file
    async fn probe(&self, path: &Path) -> Result<SourceClip>;

    /// Composite the request's layers and encode them to `job.output`
    ///
    /// Blocks until the collaborator has finished writing the file.
    async fn render(&self, job: RenderJob<'_>) -> Result<()>;
}
