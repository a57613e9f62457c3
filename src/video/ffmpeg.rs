use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::blur::FrameBlur;
use crate::config::EncodingConfig;
use crate::error::{Result, VideoError};
use crate::video::backend::{BackendCapabilities, RenderJob, VideoBackend};
use crate::video::filter_graph::{self, GraphInputs, OUTPUT_LABEL};
use crate::video::probe::parse_probe_output;
use crate::video::types::{Frame, SourceClip};

/// Collaborator binding that drives the `ffmpeg` and `ffprobe` executables
pub struct FfmpegBackend {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegBackend {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(ffmpeg: P, ffprobe: Q) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    pub fn from_config(config: &EncodingConfig) -> Self {
        Self::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone())
    }

    fn unavailable(program: &Path, e: std::io::Error) -> VideoError {
        VideoError::BackendUnavailable {
            program: program.display().to_string(),
            reason: e.to_string(),
        }
    }

    async fn ffmpeg_stdout(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.ffmpeg)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::unavailable(&self.ffmpeg, e))?;

        if !output.status.success() {
            return Err(VideoError::BackendUnavailable {
                program: self.ffmpeg.display().to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Single pass: the collaborator resizes, blurs, overlays and encodes
    async fn render_in_graph(&self, job: RenderJob<'_>) -> Result<()> {
        let graph = filter_graph::compile(job.request, GraphInputs::source_only());
        debug!("Filter graph: {}", graph);

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-nostdin", "-y", "-i"]).arg(&job.source.path);
        cmd.args(["-filter_complex", graph.as_str()]);
        cmd.args(encode_args(job, 0));
        cmd.arg(job.output).stdin(Stdio::null());

        let status = cmd.status().await.map_err(|e| Self::unavailable(&self.ffmpeg, e))?;
        check_status("ffmpeg encode", status, true)
    }

    /// Two processes: background frames are decoded, blurred here, and streamed
    /// into the encoder, which overlays the foreground from the source file.
    async fn render_with_frame_pipe(&self, job: RenderJob<'_>, blur: FrameBlur) -> Result<()> {
        let canvas = job.request.canvas();
        let frame_len = Frame::byte_len(canvas.width, canvas.height);

        let mut decoder = self.spawn_background_decoder(job)?;
        let mut encoder = self.spawn_overlay_encoder(job)?;

        let mut reader = decoder.stdout.take().ok_or_else(|| VideoError::DecodingFailed {
            reason: "decoder stdout not captured".to_string(),
        })?;
        let mut writer = encoder.stdin.take().ok_or_else(|| VideoError::EncodingFailed {
            reason: "encoder stdin not captured".to_string(),
        })?;

        let mut frames = 0u64;
        loop {
            let mut buffer = vec![0u8; frame_len];
            match reader.read_exact(&mut buffer).await {
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    return Err(VideoError::DecodingFailed {
                        reason: format!("reading background frame {}: {}", frames, e),
                    }
                    .into());
                }
            }

            let blurred = blur.apply_raw(canvas.width, canvas.height, buffer)?;
            writer.write_all(&blurred).await.map_err(|e| VideoError::EncodingFailed {
                reason: format!("writing background frame {}: {}", frames, e),
            })?;

            frames += 1;
            if frames % 300 == 0 {
                debug!("Blurred {} background frames", frames);
            }
        }

        writer.shutdown().await.map_err(|e| VideoError::EncodingFailed {
            reason: format!("closing encoder input: {}", e),
        })?;
        drop(writer);

        let decoded = decoder.wait().await.map_err(|e| VideoError::DecodingFailed { reason: e.to_string() })?;
        check_status("ffmpeg decode", decoded, false)?;
        let encoded = encoder.wait().await.map_err(|e| VideoError::EncodingFailed { reason: e.to_string() })?;
        check_status("ffmpeg encode", encoded, true)?;

        info!("Streamed {} blurred background frames", frames);
        Ok(())
    }

    fn spawn_background_decoder(&self, job: RenderJob<'_>) -> Result<Child> {
        let canvas = job.request.canvas();
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-nostdin", "-v", "error", "-i"])
            .arg(&job.source.path)
            .args(["-an", "-vf"])
            .arg(format!("scale={}:{},setsar=1", canvas.width, canvas.height))
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true);

        cmd.spawn().map_err(|e| Self::unavailable(&self.ffmpeg, e).into())
    }

    fn spawn_overlay_encoder(&self, job: RenderJob<'_>) -> Result<Child> {
        let canvas = job.request.canvas();
        let graph = filter_graph::compile(
            job.request,
            GraphInputs { source: 1, prerendered_background: Some(0) },
        );
        debug!("Filter graph: {}", graph);

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(["-hide_banner", "-y", "-f", "rawvideo", "-pix_fmt", "rgb24", "-s"])
            .arg(format!("{}x{}", canvas.width, canvas.height))
            .arg("-r")
            .arg(job.source.fps.to_string())
            .args(["-i", "-", "-i"])
            .arg(&job.source.path)
            .args(["-filter_complex", graph.as_str()])
            .args(encode_args(job, 1))
            .arg(job.output)
            .stdin(Stdio::piped())
            .kill_on_drop(true);

        cmd.spawn().map_err(|e| Self::unavailable(&self.ffmpeg, e).into())
    }
}

/// Output mapping and codec arguments shared by both render paths
fn encode_args(job: RenderJob<'_>, source_input: usize) -> Vec<String> {
    let mut args = vec!["-map".to_string(), format!("[{}]", OUTPUT_LABEL)];
    if job.source.has_audio {
        args.extend(["-map".to_string(), format!("{}:a?", source_input)]);
    }
    args.extend([
        "-c:v".to_string(),
        job.codecs.video.clone(),
        "-c:a".to_string(),
        job.codecs.audio.clone(),
    ]);
    args
}

fn check_status(stage: &str, status: ExitStatus, encoding: bool) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    let reason = format!("{} exited with {}", stage, status);
    let error = if encoding {
        VideoError::EncodingFailed { reason }
    } else {
        VideoError::DecodingFailed { reason }
    };
    Err(error.into())
}

/// Whether `ffmpeg -filters` output lists a filter by name
///
/// Rows look like ` TSC gblur             V->V       Apply Gaussian Blur filter.`
pub fn filter_listed(filters_output: &str, name: &str) -> bool {
    filters_output.lines().any(|line| {
        let mut columns = line.split_whitespace();
        matches!((columns.next(), columns.next()), (Some(_), Some(filter)) if filter == name)
    })
}

impl VideoBackend for FfmpegBackend {
    async fn capabilities(&self) -> Result<BackendCapabilities> {
        let version = self.ffmpeg_stdout(&["-hide_banner", "-version"]).await?;
        let filters = self.ffmpeg_stdout(&["-hide_banner", "-filters"]).await?;

        let capabilities = BackendCapabilities {
            gaussian_blur: filter_listed(&filters, "gblur"),
            version: version.lines().next().map(|l| l.trim().to_string()),
        };

        info!(
            "Video backend: {} (gaussian blur: {})",
            capabilities.version.as_deref().unwrap_or("ffmpeg, unknown version"),
            capabilities.gaussian_blur
        );
        Ok(capabilities)
    }

    async fn probe(&self, path: &Path) -> Result<SourceClip> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "error", "-print_format", "json", "-show_streams", "-show_format"])
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::unavailable(&self.ffprobe, e))?;

        if !output.status.success() {
            return Err(VideoError::ProbeFailed {
                path: path.display().to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        parse_probe_output(path, &String::from_utf8_lossy(&output.stdout))
    }

    async fn render(&self, job: RenderJob<'_>) -> Result<()> {
        match job.request.blur() {
            Some(strategy) if strategy.needs_frame_pipe() => {
                let blur = FrameBlur::new(strategy.sigma())?;
                self.render_with_frame_pipe(job, blur).await
            }
            _ => self.render_in_graph(job).await,
        }
    }
}
