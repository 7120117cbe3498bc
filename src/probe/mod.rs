// Probe facade
//
// This module exposes the public probing contract:
// - MediaProbe: async trait with one method per probe operation
// - Prober: ffprobe-backed implementation composing validation, command
//   building, process execution and output parsing

pub mod prober;

use async_trait::async_trait;
use std::sync::Arc;

pub use prober::*;

use crate::command::ProbeArg;
use crate::config::ProbeConfig;
use crate::error::Result;
use crate::parser::{self, CodecTypeSet, DurationUnits, MediaInfo};
use crate::source::SourceArg;

/// Main trait for media probing operations.
///
/// Every operation returns either a value or a [`crate::error::ProbeError`];
/// invalid sources are rejected before any process is spawned.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Codec types present in the source
    async fn codec_types(&self, src: SourceArg<'_>) -> Result<CodecTypeSet>;

    /// Duration as printed by ffprobe, e.g. `0:03:25.120000`
    async fn duration_string(&self, src: SourceArg<'_>) -> Result<String>;

    /// Full format and stream metadata
    async fn media_info(&self, src: SourceArg<'_>) -> Result<MediaInfo>;

    /// Run ffprobe with caller-supplied arguments and return its stdout
    async fn run_raw_probe(&self, args: &[ProbeArg]) -> Result<String>;

    /// Check if ffprobe can be executed
    async fn check_availability(&self) -> Result<()>;

    /// Get ffprobe version information
    async fn version_info(&self) -> Result<String>;

    /// True if any stream is a video stream
    async fn is_video(&self, src: SourceArg<'_>) -> Result<bool> {
        Ok(self.codec_types(src).await?.is_video())
    }

    /// True if there are audio streams and no video stream
    async fn is_audio(&self, src: SourceArg<'_>) -> Result<bool> {
        Ok(self.codec_types(src).await?.is_audio())
    }

    /// Duration split into hours, minutes and seconds
    async fn duration_units(&self, src: SourceArg<'_>) -> Result<DurationUnits> {
        let duration = self.duration_string(src).await?;
        parser::parse_duration_units(&duration)
    }

    /// Duration in seconds
    async fn duration_seconds(&self, src: SourceArg<'_>) -> Result<f64> {
        let duration = self.duration_string(src).await?;
        parser::parse_duration_seconds(&duration)
    }
}

/// Factory for creating media probe instances
pub struct ProberFactory;

impl ProberFactory {
    /// Create the default prober (ffprobe via tokio processes)
    pub fn create_prober(config: ProbeConfig) -> Box<dyn MediaProbe> {
        Box::new(FfprobeProber::new(config))
    }

    /// Create a prober that can be shared across concurrent tasks
    pub fn create_shared(config: ProbeConfig) -> Arc<dyn MediaProbe> {
        Arc::new(FfprobeProber::new(config))
    }
}
