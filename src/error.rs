use thiserror::Error;

/// Reasons a caller-supplied source is rejected before ffprobe is spawned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Path is undefined")]
    Undefined,

    #[error("Path is null")]
    Null,

    #[error("Path is empty")]
    Empty,

    #[error("Path is whitespace")]
    Whitespace,

    #[error("Path does not exist: {0}")]
    PathNotFound(String),
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Invalid source: {0}")]
    Source(#[from] SourceError),

    /// ffprobe wrote to stderr; the text is kept exactly as received.
    #[error("ffprobe error: {0}")]
    Tool(String),

    #[error("Malformed duration string: {0:?}")]
    MalformedDuration(String),

    #[error("Malformed JSON output: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Probe task failed: {0}")]
    Task(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
