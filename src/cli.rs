use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the codec types (video, audio) present in a media file
    CodecTypes {
        /// Input media file
        #[arg(short, long)]
        input: String,
    },

    /// Print whether the media file has a video stream
    IsVideo {
        /// Input media file
        #[arg(short, long)]
        input: String,
    },

    /// Print whether the media file is audio only
    IsAudio {
        /// Input media file
        #[arg(short, long)]
        input: String,
    },

    /// Print the duration of a media file
    Duration {
        /// Input media file
        #[arg(short, long)]
        input: String,

        /// Output representation
        #[arg(short, long, value_enum, default_value_t = DurationFormat::String)]
        format: DurationFormat,
    },

    /// Print format and stream metadata as JSON
    Info {
        /// Input media file
        #[arg(short, long)]
        input: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Run ffprobe with the given arguments, passed through verbatim
    Raw {
        /// Arguments for ffprobe
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },

    /// Probe all media files in a directory
    Batch {
        /// Input directory containing media files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Maximum number of probes running at once
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print results as JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the ffprobe version in use
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DurationFormat {
    /// As printed by ffprobe, HH:MM:SS.ffffff
    String,
    /// Hours, minutes and seconds as JSON
    Units,
    /// Total seconds
    Seconds,
}
