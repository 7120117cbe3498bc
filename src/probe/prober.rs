use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::command::{ProbeArg, ProbeCommandBuilder, ProbeKind};
use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result, SourceError};
use crate::parser::{self, CodecTypeSet, MediaInfo};
use crate::runner::{ProcessOutput, ProcessRunner, TokioProcessRunner};
use crate::source::{validate_source, FsPathExistence, PathExistence, SourceArg};
use super::MediaProbe;

/// ffprobe-backed implementation of [`MediaProbe`].
///
/// Holds no per-call state, so one instance can serve any number of
/// concurrent probes.
pub struct FfprobeProber {
    command_builder: ProbeCommandBuilder,
    runner: Arc<dyn ProcessRunner>,
    existence: Option<Arc<dyn PathExistence>>,
}

impl FfprobeProber {
    /// Create a prober using tokio processes and, if enabled, the
    /// filesystem existence check
    pub fn new(config: ProbeConfig) -> Self {
        let existence: Option<Arc<dyn PathExistence>> = if config.verify_path_exists {
            Some(Arc::new(FsPathExistence))
        } else {
            None
        };

        Self::with_collaborators(config.binary_path, Arc::new(TokioProcessRunner::new()), existence)
    }

    /// Create a prober with explicit collaborators
    pub fn with_collaborators<S: Into<String>>(
        binary_path: S,
        runner: Arc<dyn ProcessRunner>,
        existence: Option<Arc<dyn PathExistence>>,
    ) -> Self {
        Self {
            command_builder: ProbeCommandBuilder::new(binary_path),
            runner,
            existence,
        }
    }

    /// Validate the source and, when configured, make sure it exists
    async fn prepare_source(&self, src: SourceArg<'_>) -> Result<String> {
        let src = validate_source(&src)?;

        if let Some(existence) = &self.existence {
            if !existence.exists(&src).await {
                warn!("Source does not exist: {}", src);
                return Err(SourceError::PathNotFound(src).into());
            }
        }

        Ok(src)
    }

    /// Run one preset probe and hand back stdout
    async fn probe(&self, kind: ProbeKind, src: SourceArg<'_>) -> Result<String> {
        let src = self.prepare_source(src).await?;
        info!("Probing {} of {}", kind, src);

        let command = self.command_builder.build(kind, &src);
        let output = command.run(self.runner.as_ref()).await;

        stdout_or_tool_error(output)
    }
}

/// Anything on stderr fails the probe, even with a zero exit code.
fn stdout_or_tool_error(output: ProcessOutput) -> Result<String> {
    if output.has_error_output() {
        debug!("ffprobe exited with code {} and wrote to stderr", output.exit_code);
        return Err(ProbeError::Tool(output.stderr));
    }
    Ok(output.stdout)
}

#[async_trait]
impl MediaProbe for FfprobeProber {
    async fn codec_types(&self, src: SourceArg<'_>) -> Result<CodecTypeSet> {
        let stdout = self.probe(ProbeKind::CodecTypes, src).await?;
        let types = parser::parse_codec_types(&stdout);
        debug!("Codec types: {:?}", types);
        Ok(types)
    }

    async fn duration_string(&self, src: SourceArg<'_>) -> Result<String> {
        let stdout = self.probe(ProbeKind::Duration, src).await?;
        Ok(parser::parse_duration_string(&stdout))
    }

    async fn media_info(&self, src: SourceArg<'_>) -> Result<MediaInfo> {
        let stdout = self.probe(ProbeKind::Info, src).await?;
        let info = parser::parse_info(&stdout)?;
        debug!("Parsed {} streams", info.streams.len());
        Ok(info)
    }

    async fn run_raw_probe(&self, args: &[ProbeArg]) -> Result<String> {
        info!("Executing raw probe with {} arguments", args.len());

        let command = self.command_builder.raw(args);
        let output = command.run(self.runner.as_ref()).await;

        stdout_or_tool_error(output)
    }

    async fn check_availability(&self) -> Result<()> {
        let output = self.command_builder.version_check().run(self.runner.as_ref()).await;

        if output.exit_code == 0 && !output.has_error_output() {
            info!("ffprobe is available");
            Ok(())
        } else if output.has_error_output() {
            Err(ProbeError::Tool(output.stderr))
        } else {
            Err(ProbeError::Tool(format!(
                "ffprobe version check failed with exit code {}",
                output.exit_code
            )))
        }
    }

    async fn version_info(&self) -> Result<String> {
        debug!("Getting ffprobe version information");

        let stdout = stdout_or_tool_error(self.command_builder.version_check().run(self.runner.as_ref()).await)?;
        // The first line carries the version
        let first_line = stdout.lines().next().unwrap_or("Unknown version");
        Ok(first_line.to_string())
    }
}
