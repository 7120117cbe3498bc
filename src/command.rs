use std::fmt;
use tracing::debug;

use crate::runner::{ProcessOutput, ProcessRunner};

/// The probe presets the facade knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// One `codec_type=...` line per stream
    CodecTypes,
    /// Container duration in `HH:MM:SS.ffffff` form
    Duration,
    /// Full format and stream sections as JSON
    Info,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeKind::CodecTypes => write!(f, "codec types"),
            ProbeKind::Duration => write!(f, "duration"),
            ProbeKind::Info => write!(f, "info"),
        }
    }
}

/// One argument for a raw probe, either text or a number
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeArg(String);

impl ProbeArg {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProbeArg {
    fn from(value: &str) -> Self {
        ProbeArg(value.to_string())
    }
}

impl From<String> for ProbeArg {
    fn from(value: String) -> Self {
        ProbeArg(value)
    }
}

impl From<&String> for ProbeArg {
    fn from(value: &String) -> Self {
        ProbeArg(value.clone())
    }
}

macro_rules! probe_arg_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ProbeArg {
                fn from(value: $t) -> Self {
                    ProbeArg(value.to_string())
                }
            }
        )*
    };
}

probe_arg_from_number!(i32, i64, u32, u64, usize, f32, f64);

/// Abstract ffprobe command representation
#[derive(Debug, Clone)]
pub struct ProbeCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl ProbeCommand {
    /// Create a new probe command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file via `-i`
    pub fn input<S: Into<String>>(self, src: S) -> Self {
        self.arg("-i").arg(src)
    }

    /// Add the source as a positional argument
    pub fn source<S: Into<String>>(self, src: S) -> Self {
        self.arg(src)
    }

    /// Set log verbosity (`quiet`, `error`, ...)
    pub fn verbosity<S: Into<String>>(self, level: S) -> Self {
        self.arg("-v").arg(level)
    }

    /// Select entries to print, e.g. `stream=codec_type`
    pub fn show_entries<S: Into<String>>(self, entries: S) -> Self {
        self.arg("-show_entries").arg(entries)
    }

    /// Set writer and writer options via `-of`
    pub fn output_format<S: Into<String>>(self, format: S) -> Self {
        self.arg("-of").arg(format)
    }

    /// Set writer via `-print_format`
    pub fn print_format<S: Into<String>>(self, format: S) -> Self {
        self.arg("-print_format").arg(format)
    }

    /// Print the container section
    pub fn show_format(self) -> Self {
        self.arg("-show_format")
    }

    /// Print one section per stream
    pub fn show_streams(self) -> Self {
        self.arg("-show_streams")
    }

    /// Print time values as `HH:MM:SS.ffffff`
    pub fn sexagesimal(self) -> Self {
        self.arg("-sexagesimal")
    }

    /// Run the command through the given runner
    pub async fn run(&self, runner: &dyn ProcessRunner) -> ProcessOutput {
        debug!("Executing probe command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        runner.run(&self.binary_path, &self.args).await
    }
}

/// Builder for the probe presets.
///
/// Argument order matters to ffprobe; every call site goes through here.
#[derive(Debug, Clone)]
pub struct ProbeCommandBuilder {
    binary_path: String,
}

impl ProbeCommandBuilder {
    /// Create a new command builder
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build the preset for `kind` against an already validated source
    pub fn build(&self, kind: ProbeKind, src: &str) -> ProbeCommand {
        match kind {
            ProbeKind::CodecTypes => self.codec_types(src),
            ProbeKind::Duration => self.duration(src),
            ProbeKind::Info => self.info(src),
        }
    }

    /// `-v error -show_entries stream=codec_type -of default=nw=1 <src>`
    pub fn codec_types(&self, src: &str) -> ProbeCommand {
        ProbeCommand::new(&self.binary_path, "Codec type listing")
            .verbosity("error")
            .show_entries("stream=codec_type")
            .output_format("default=nw=1")
            .source(src)
    }

    /// `-i <src> -v error -show_entries format=duration -of default=noprint_wrappers=1:nokey=1 -sexagesimal`
    pub fn duration(&self, src: &str) -> ProbeCommand {
        ProbeCommand::new(&self.binary_path, "Duration")
            .input(src)
            .verbosity("error")
            .show_entries("format=duration")
            .output_format("default=noprint_wrappers=1:nokey=1")
            .sexagesimal()
    }

    /// `-v quiet -print_format json -show_format -show_streams <src>`
    pub fn info(&self, src: &str) -> ProbeCommand {
        ProbeCommand::new(&self.binary_path, "Media info")
            .verbosity("quiet")
            .print_format("json")
            .show_format()
            .show_streams()
            .source(src)
    }

    /// Build version check command
    pub fn version_check(&self) -> ProbeCommand {
        ProbeCommand::new(&self.binary_path, "Version check").arg("-version")
    }

    /// Pass arguments through verbatim
    pub fn raw(&self, args: &[ProbeArg]) -> ProbeCommand {
        ProbeCommand::new(&self.binary_path, "Raw probe")
            .args(args.iter().map(|a| a.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ProbeCommandBuilder {
        ProbeCommandBuilder::new("ffprobe")
    }

    #[test]
    fn test_codec_types_args() {
        let cmd = builder().build(ProbeKind::CodecTypes, "/media/a b.mkv");
        assert_eq!(cmd.binary_path, "ffprobe");
        assert_eq!(
            cmd.args,
            vec!["-v", "error", "-show_entries", "stream=codec_type", "-of", "default=nw=1", "/media/a b.mkv"]
        );
    }

    #[test]
    fn test_duration_args() {
        let cmd = builder().build(ProbeKind::Duration, "clip.mp4");
        assert_eq!(
            cmd.args,
            vec![
                "-i",
                "clip.mp4",
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                "-sexagesimal",
            ]
        );
    }

    #[test]
    fn test_info_args() {
        let cmd = builder().build(ProbeKind::Info, "song.flac");
        assert_eq!(
            cmd.args,
            vec!["-v", "quiet", "-print_format", "json", "-show_format", "-show_streams", "song.flac"]
        );
    }

    #[test]
    fn test_raw_args_accept_numbers() {
        let args: Vec<ProbeArg> = vec!["-read_intervals".into(), "%+5".into(), "-threads".into(), 2u32.into(), 0.5f64.into()];
        let cmd = builder().raw(&args);
        assert_eq!(cmd.args, vec!["-read_intervals", "%+5", "-threads", "2", "0.5"]);
    }

    #[test]
    fn test_custom_binary_path() {
        let cmd = ProbeCommandBuilder::new("/opt/ffmpeg/bin/ffprobe").version_check();
        assert_eq!(cmd.binary_path, "/opt/ffmpeg/bin/ffprobe");
        assert_eq!(cmd.args, vec!["-version"]);
    }
}
