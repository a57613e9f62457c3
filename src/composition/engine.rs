use std::path::PathBuf;
use tracing::{debug, info};

use crate::{
    blur::{select_blur_strategy, BlurStrategy},
    composition::request::{build_background_layer, build_foreground_layer, compose, CompositeRequest},
    config::Config,
    error::Result,
    layout::{compute_layout, LayoutPlan},
    video::{
        derive_output_path, ensure_directories, locate_input, CodecPair, RenderJob, SourceClip, VideoBackend,
    },
};

/// Everything decided before the collaborator starts encoding
#[derive(Debug, Clone)]
pub struct PreparedRender {
    pub source: SourceClip,
    pub plan: LayoutPlan,
    pub blur: BlurStrategy,
    pub request: CompositeRequest,
    pub output: PathBuf,
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Nothing to process; not an error
    NoInput { directory: PathBuf },

    Rendered {
        input: PathBuf,
        output: PathBuf,
        plan: LayoutPlan,
        blur: BlurStrategy,
    },
}

/// Main engine that turns one input video into one vertical render
///
/// The pipeline is linear:
/// 1. Ensure the input and output directories exist
/// 2. Locate the input video (a missing input ends the run early)
/// 3. Select the blur strategy from the backend's capabilities
/// 4. Probe the source and compute the layout
/// 5. Build the background and foreground layers and compose them
/// 6. Hand the request to the backend to render
pub struct Composer<B> {
    config: Config,
    backend: B,
}

impl<B: VideoBackend> Composer<B> {
    pub fn new(config: Config, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run steps 1 through 5. Returns `None` when there is no input video.
    pub async fn prepare(&self) -> Result<Option<PreparedRender>> {
        self.config.validate()?;

        let paths = &self.config.paths;
        ensure_directories(&paths.input_dir, &paths.output_dir)?;

        let Some(input) = locate_input(&paths.input_dir, &self.config.input.extensions)? else {
            info!("No input video in {:?}", paths.input_dir);
            return Ok(None);
        };

        let capabilities = self.backend.capabilities().await?;
        let blur = select_blur_strategy(self.config.blur.mode, self.config.blur.sigma, &capabilities)?;

        let source = self.backend.probe(&input).await?;
        let canvas = self.config.canvas;
        let (source_width, source_height) = source.dimensions();
        let plan = compute_layout(source_width, source_height, canvas.width, canvas.height)?;

        if plan.is_padded() {
            debug!(
                "Foreground {}x{} padded {}px above and {}px below",
                plan.scaled_width, plan.scaled_height, plan.top_pad, plan.bottom_pad
            );
        } else if plan.overflow(canvas) > 0 {
            debug!(
                "Scaled source is {}px taller than the canvas; it is top-aligned and clipped",
                plan.overflow(canvas)
            );
        }

        let background = build_background_layer(&source, canvas, blur);
        let foreground = build_foreground_layer(&source, &plan);
        let request = compose(background, foreground, &plan, canvas);

        let output = derive_output_path(&input, &paths.output_dir, &self.config.encoding.output_suffix);

        Ok(Some(PreparedRender { source, plan, blur, request, output }))
    }

    /// Step 6: encode and write the prepared composite
    pub async fn render(&self, prepared: &PreparedRender) -> Result<()> {
        let codecs = CodecPair {
            video: self.config.encoding.video_codec.clone(),
            audio: self.config.encoding.audio_codec.clone(),
        };

        info!(
            "Rendering {:?} -> {:?} ({} / {})",
            prepared.source.path, prepared.output, codecs.video, codecs.audio
        );

        self.backend
            .render(RenderJob {
                source: &prepared.source,
                request: &prepared.request,
                codecs: &codecs,
                output: &prepared.output,
            })
            .await?;

        info!("Render complete: {:?}", prepared.output);
        Ok(())
    }

    /// Prepare and render in one go
    pub async fn run(&self) -> Result<RunOutcome> {
        let Some(prepared) = self.prepare().await? else {
            return Ok(RunOutcome::NoInput {
                directory: self.config.paths.input_dir.clone(),
            });
        };

        self.render(&prepared).await?;

        Ok(RunOutcome::Rendered {
            input: prepared.source.path,
            output: prepared.output,
            plan: prepared.plan,
            blur: prepared.blur,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blur::BlurMode,
        composition::LayerRole,
        error::{ComposerError, VideoError},
        layout::Canvas,
        video::BackendCapabilities,
    };
    use std::cell::{Cell, RefCell};
    use std::path::Path;
    use tempfile::tempdir;

    /// In-memory backend that records what it was asked to do
    struct RecordingBackend {
        gaussian_blur: bool,
        dimensions: (u32, u32),
        fail_render: bool,
        probes: Cell<usize>,
        renders: RefCell<Vec<(PathBuf, CompositeRequest, CodecPair)>>,
    }

    impl RecordingBackend {
        fn new(gaussian_blur: bool, dimensions: (u32, u32)) -> Self {
            Self {
                gaussian_blur,
                dimensions,
                fail_render: false,
                probes: Cell::new(0),
                renders: RefCell::new(Vec::new()),
            }
        }
    }

    impl VideoBackend for RecordingBackend {
        async fn capabilities(&self) -> Result<BackendCapabilities> {
            Ok(BackendCapabilities {
                gaussian_blur: self.gaussian_blur,
                version: Some("recording".to_string()),
            })
        }

        async fn probe(&self, path: &Path) -> Result<SourceClip> {
            self.probes.set(self.probes.get() + 1);
            Ok(SourceClip {
                path: path.to_path_buf(),
                width: self.dimensions.0,
                height: self.dimensions.1,
                duration: Some(10.0),
                fps: 30.0,
                has_audio: true,
            })
        }

        async fn render(&self, job: RenderJob<'_>) -> Result<()> {
            if self.fail_render {
                return Err(VideoError::EncodingFailed {
                    reason: "exit status 1".to_string(),
                }
                .into());
            }
            self.renders.borrow_mut().push((
                job.output.to_path_buf(),
                job.request.clone(),
                job.codecs.clone(),
            ));
            Ok(())
        }
    }

    fn config_in(root: &Path) -> Config {
        let mut config = Config::default();
        config.paths.input_dir = root.join("initialVideo");
        config.paths.output_dir = root.join("outputFolder");
        config
    }

    #[tokio::test]
    async fn test_no_input_ends_run_without_rendering() {
        let root = tempdir().unwrap();
        let config = config_in(root.path());
        let composer = Composer::new(config.clone(), RecordingBackend::new(true, (1920, 1080)));

        let outcome = composer.run().await.unwrap();

        assert!(matches!(outcome, RunOutcome::NoInput { ref directory } if *directory == config.paths.input_dir));
        assert!(config.paths.input_dir.is_dir());
        assert!(config.paths.output_dir.is_dir());
        assert_eq!(composer.backend().probes.get(), 0);
        assert!(composer.backend().renders.borrow().is_empty());
        assert_eq!(std::fs::read_dir(&config.paths.output_dir).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_video_less_directory_is_no_input() {
        let root = tempdir().unwrap();
        let config = config_in(root.path());
        std::fs::create_dir_all(&config.paths.input_dir).unwrap();
        std::fs::write(config.paths.input_dir.join("notes.txt"), b"hello").unwrap();

        let composer = Composer::new(config, RecordingBackend::new(true, (1920, 1080)));
        assert!(composer.prepare().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_landscape_run_renders_padded_composite() {
        let root = tempdir().unwrap();
        let config = config_in(root.path());
        std::fs::create_dir_all(&config.paths.input_dir).unwrap();
        std::fs::write(config.paths.input_dir.join("notes.txt"), b"").unwrap();
        std::fs::write(config.paths.input_dir.join("clip2.mov"), b"").unwrap();
        std::fs::write(config.paths.input_dir.join("clip1.MP4"), b"").unwrap();

        let composer = Composer::new(config.clone(), RecordingBackend::new(true, (1920, 1080)));
        let outcome = composer.run().await.unwrap();

        let RunOutcome::Rendered { input, output, plan, blur } = outcome else {
            panic!("expected a render");
        };
        assert_eq!(input, config.paths.input_dir.join("clip1.MP4"));
        assert_eq!(output, config.paths.output_dir.join("clip1_tiktok.MP4"));
        assert_eq!((plan.top_pad, plan.bottom_pad), (656, 657));
        assert_eq!(blur, BlurStrategy::Gaussian { sigma: 50.0 });

        let renders = composer.backend().renders.borrow();
        assert_eq!(renders.len(), 1);
        let (rendered_to, request, codecs) = &renders[0];
        assert_eq!(rendered_to, &output);
        assert_eq!(codecs, &CodecPair { video: "libx264".to_string(), audio: "aac".to_string() });
        assert_eq!(request.canvas(), Canvas::VERTICAL_HD);
        assert_eq!(request.layers()[0].role, LayerRole::Background);
        assert_eq!(request.background().unwrap().size(), (1080, 1920));
        assert_eq!(request.foreground().unwrap().position, (0, 656));
    }

    #[tokio::test]
    async fn test_backend_without_gaussian_uses_frame_convolution() {
        let root = tempdir().unwrap();
        let config = config_in(root.path());
        std::fs::create_dir_all(&config.paths.input_dir).unwrap();
        std::fs::write(config.paths.input_dir.join("clip.avi"), b"").unwrap();

        let composer = Composer::new(config, RecordingBackend::new(false, (640, 480)));
        let prepared = composer.prepare().await.unwrap().unwrap();

        assert_eq!(prepared.blur, BlurStrategy::FrameConvolution { sigma: 50.0 });
        assert_eq!(prepared.request.blur(), Some(prepared.blur));
        assert_eq!(prepared.plan.scaled_height, 810);
    }

    #[tokio::test]
    async fn test_forced_gaussian_without_capability_fails_before_probe() {
        let root = tempdir().unwrap();
        let mut config = config_in(root.path());
        config.blur.mode = BlurMode::Gaussian;
        std::fs::create_dir_all(&config.paths.input_dir).unwrap();
        std::fs::write(config.paths.input_dir.join("clip.mp4"), b"").unwrap();

        let composer = Composer::new(config, RecordingBackend::new(false, (1920, 1080)));
        assert!(composer.run().await.is_err());
        assert_eq!(composer.backend().probes.get(), 0);
    }

    #[tokio::test]
    async fn test_render_failure_propagates() {
        let root = tempdir().unwrap();
        let config = config_in(root.path());
        std::fs::create_dir_all(&config.paths.input_dir).unwrap();
        std::fs::write(config.paths.input_dir.join("clip.mp4"), b"").unwrap();

        let mut backend = RecordingBackend::new(true, (1920, 1080));
        backend.fail_render = true;
        let composer = Composer::new(config, backend);

        let err = composer.run().await.unwrap_err();
        assert!(matches!(err, ComposerError::Video(VideoError::EncodingFailed { .. })));
        assert!(err.is_collaborator_failure());
    }
}
