//! Sonde - typed async facade over ffprobe
//!
//! Runs ffprobe against local media files and turns its output into typed
//! results: the codec types present, the duration in three representations
//! and the full format/stream metadata.
//!
//! ```rust,no_run
//! use sonde::config::ProbeConfig;
//! use sonde::probe::ProberFactory;
//!
//! # async fn run() -> sonde::error::Result<()> {
//! let prober = ProberFactory::create_prober(ProbeConfig::default());
//! if prober.is_audio("song.flac".into()).await? {
//!     let seconds = prober.duration_seconds("song.flac".into()).await?;
//!     println!("{seconds:.2}s of audio");
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod parser;
pub mod probe;
pub mod runner;
pub mod source;

pub use error::{ProbeError, Result, SourceError};
pub use parser::{CodecType, CodecTypeSet, DurationUnits, MediaInfo};
pub use probe::{FfprobeProber, MediaProbe, ProberFactory};
pub use source::SourceArg;
