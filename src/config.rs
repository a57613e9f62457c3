use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    blur::BlurMode,
    error::{ConfigError, Result},
    layout::Canvas,
};

/// Main configuration for the vertical composer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations
    pub paths: PathsConfig,

    /// Output canvas size
    pub canvas: Canvas,

    /// Background blur settings
    pub blur: BlurConfig,

    /// Encoder and collaborator settings
    pub encoding: EncodingConfig,

    /// Input discovery settings
    pub input: InputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            other => other?,
        };

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.canvas.validate().map_err(|_| ConfigError::InvalidValue {
            key: "canvas".to_string(),
            value: format!("{}x{}", self.canvas.width, self.canvas.height),
        })?;
        self.blur.validate()?;
        self.encoding.validate()?;
        self.input.validate()?;
        Ok(())
    }
}

/// Where to look for input and where to write output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("initialVideo"),
            output_dir: PathBuf::from("outputFolder"),
        }
    }
}

/// Background blur configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// How the blur implementation is chosen
    pub mode: BlurMode,

    /// Gaussian standard deviation, in output pixels
    pub sigma: f32,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            mode: BlurMode::Auto,
            sigma: 50.0,
        }
    }
}

impl BlurConfig {
    fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "blur.sigma".to_string(),
                value: self.sigma.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Encoder settings and collaborator executables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub video_codec: String,
    pub audio_codec: String,

    /// Appended to the input file stem to name the output
    pub output_suffix: String,

    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            output_suffix: "_tiktok".to_string(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
        }
    }
}

impl EncodingConfig {
    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("encoding.video_codec", &self.video_codec),
            ("encoding.audio_codec", &self.audio_codec),
            ("encoding.output_suffix", &self.output_suffix),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Input discovery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Accepted file extensions, without the dot; matched case-insensitively
    pub extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["mp4".to_string(), "mov".to_string(), "avi".to_string()],
        }
    }
}

impl InputConfig {
    fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() || self.extensions.iter().any(|ext| ext.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "input.extensions".to_string(),
                value: format!("{:?}", self.extensions),
            }
            .into());
        }
        Ok(())
    }
}
