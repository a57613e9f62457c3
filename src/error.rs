use thiserror::Error;

/// Main error type for the vertical composer library
#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by (or while talking to) the external video collaborator
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Video backend unavailable: {program} - {reason}")]
    BackendUnavailable { program: String, reason: String },

    #[error("Failed to probe video file: {path} - {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("Video decoding failed: {reason}")]
    DecodingFailed { reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Frame processing failed: {reason}")]
    FrameProcessingFailed { reason: String },

    #[error("Backend does not support capability: {capability}")]
    UnsupportedCapability { capability: String },
}

/// Layout and composite request errors
#[derive(Error, Debug)]
pub enum CompositionError {
    #[error("Invalid source dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid canvas: {details}")]
    InvalidCanvas { details: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path} - {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Errors from the companion command-line tools
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Input file does not exist: {path}")]
    InputMissing { path: String },

    #[error("Error parsing JSON: {reason}")]
    MalformedJson { reason: String },

    #[error("Error reading file: {path} - {reason}")]
    Unreadable { path: String, reason: String },
}

/// Convenience type alias for Results using ComposerError
pub type Result<T> = std::result::Result<T, ComposerError>;

impl ComposerError {
    /// Whether the failure came from the external collaborator rather than from us
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::Video(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Video(VideoError::BackendUnavailable { program, .. }) => {
                format!("Could not run '{}'. Please check FFmpeg is installed and on PATH.", program)
            }
            Self::Video(VideoError::ProbeFailed { path, .. }) => {
                format!("Could not read video file '{}'. Please check it is a valid video.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Tool(ToolError::InputMissing { path }) => {
                format!("Error: File '{}' does not exist.", path)
            }
            _ => self.to_string(),
        }
    }
}
