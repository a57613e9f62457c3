use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, VideoError};
use crate::video::types::SourceClip;

const FALLBACK_FPS: f64 = 30.0;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    side_data_list: Vec<SideData>,
}

#[derive(Debug, Deserialize)]
struct SideData {
    rotation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

impl ProbeStream {
    fn is_video(&self) -> bool {
        self.codec_type.as_deref() == Some("video")
    }

    fn is_audio(&self) -> bool {
        self.codec_type.as_deref() == Some("audio")
    }

    /// Rotation the decoder will apply, in degrees
    fn rotation(&self) -> i64 {
        let side_data = self.side_data_list.iter().find_map(|d| d.rotation);
        let tag = self.tags.get("rotate").and_then(|r| r.trim().parse::<f64>().ok());
        side_data.or(tag).map(|r| r.round() as i64).unwrap_or(0)
    }
}

/// Parse an ffprobe rate such as `30000/1001` or `25`
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };

    (value.is_finite() && value > 0.0).then_some(value)
}

/// Build a [`SourceClip`] from `ffprobe -print_format json -show_streams -show_format` output
///
/// Width and height are reported as displayed: a stream carrying a quarter-turn
/// rotation has them swapped, since the decoder rotates frames on the way out.
pub fn parse_probe_output(path: &Path, json: &str) -> Result<SourceClip> {
    let probe_failed = |reason: String| VideoError::ProbeFailed {
        path: path.display().to_string(),
        reason,
    };

    let output: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| probe_failed(format!("invalid ffprobe output: {}", e)))?;

    let video = output
        .streams
        .iter()
        .find(|s| s.is_video())
        .ok_or_else(|| probe_failed("no video stream".to_string()))?;

    let (width, height) = match (video.width, video.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(probe_failed("video stream has no dimensions".to_string()).into()),
    };

    let (width, height) = if video.rotation().rem_euclid(180) == 90 {
        (height, width)
    } else {
        (width, height)
    };

    let fps = video
        .avg_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .or_else(|| video.r_frame_rate.as_deref().and_then(parse_frame_rate))
        .unwrap_or_else(|| {
            warn!("No usable frame rate for {}, assuming {} fps", path.display(), FALLBACK_FPS);
            FALLBACK_FPS
        });

    let duration = video
        .duration
        .as_deref()
        .or_else(|| output.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|d| d.trim().parse::<f64>().ok());

    let has_audio = output.streams.iter().any(|s| s.is_audio());

    info!(
        "Video metadata: {}x{} @ {:.2}fps, {:.1}s, audio: {}",
        width, height, fps, duration.unwrap_or(0.0), has_audio
    );

    Ok(SourceClip {
        path: path.to_path_buf(),
        width,
        height,
        duration,
        fps,
        has_audio,
    })
}
