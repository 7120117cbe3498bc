//! Sonde - typed ffprobe facade
//!
//! Command line entry point exposing each probe operation as a subcommand.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use sonde::batch::BatchProber;
use sonde::cli::{Args, Commands, DurationFormat};
use sonde::command::ProbeArg;
use sonde::config::{Config, LoggingConfig};
use sonde::probe::ProberFactory;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = setup_logging(args.verbose, &config.logging)?;

    let prober = ProberFactory::create_prober(config.probe.clone());

    match args.command {
        Commands::CodecTypes { input } => {
            prober.check_availability().await?;
            let types = prober.codec_types(input.as_str().into()).await?;
            println!("{}", serde_json::to_string(&types)?);
        }
        Commands::IsVideo { input } => {
            prober.check_availability().await?;
            println!("{}", prober.is_video(input.as_str().into()).await?);
        }
        Commands::IsAudio { input } => {
            prober.check_availability().await?;
            println!("{}", prober.is_audio(input.as_str().into()).await?);
        }
        Commands::Duration { input, format } => {
            prober.check_availability().await?;
            match format {
                DurationFormat::String => {
                    println!("{}", prober.duration_string(input.as_str().into()).await?);
                }
                DurationFormat::Units => {
                    let units = prober.duration_units(input.as_str().into()).await?;
                    println!("{}", serde_json::to_string(&units)?);
                }
                DurationFormat::Seconds => {
                    println!("{}", prober.duration_seconds(input.as_str().into()).await?);
                }
            }
        }
        Commands::Info { input, pretty } => {
            prober.check_availability().await?;
            let media_info = prober.media_info(input.as_str().into()).await?;
            if pretty {
                println!("{}", serde_json::to_string_pretty(&media_info)?);
            } else {
                println!("{}", serde_json::to_string(&media_info)?);
            }
        }
        Commands::Raw { args } => {
            let args: Vec<ProbeArg> = args.iter().map(ProbeArg::from).collect();
            print!("{}", prober.run_raw_probe(&args).await?);
        }
        Commands::Batch { input_dir, jobs, json } => {
            prober.check_availability().await?;
            info!("Probing directory: {}", input_dir.display());

            let mut batch_config = config.batch.clone();
            if let Some(jobs) = jobs {
                batch_config.max_concurrent = jobs.max(1);
            }

            let batch = BatchProber::new(ProberFactory::create_shared(config.probe.clone()), batch_config);
            let entries = batch.probe_directory(&input_dir, !json).await?;

            if json {
                for entry in &entries {
                    let line = match &entry.outcome {
                        Ok(summary) => serde_json::json!({ "path": entry.display_path, "result": summary }),
                        Err(e) => serde_json::json!({ "path": entry.display_path, "error": e.to_string() }),
                    };
                    println!("{}", line);
                }
            } else {
                println!("\n{:<50} {:<15} {:>14}", "File", "Codec types", "Duration (s)");
                println!("{}", "-".repeat(81));
                for entry in &entries {
                    match &entry.outcome {
                        Ok(summary) => {
                            let types = summary
                                .codec_types
                                .iter()
                                .map(|t| t.as_str())
                                .collect::<Vec<_>>()
                                .join(",");
                            println!("{:<50} {:<15} {:>14.2}", entry.display_path, types, summary.duration_seconds);
                        }
                        Err(e) => println!("{:<50} error: {}", entry.display_path, e),
                    }
                }
            }

            let failed = entries.iter().filter(|e| e.outcome.is_err()).count();
            if failed > 0 {
                warn!("{} of {} files could not be probed", failed, entries.len());
            }
        }
        Commands::Version => {
            println!("{}", prober.version_info().await?);
        }
    }

    Ok(())
}

/// Setup logging to stderr and, if enabled, a daily-rotated file
fn setup_logging(verbose: bool, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // stdout carries probe results, so the console layer writes to stderr
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let (file_layer, guard) = if logging.file_logging {
        std::fs::create_dir_all(&logging.log_dir)?;

        let file_appender = rolling::daily(&logging.log_dir, "sonde.log");
        let (non_blocking_file, guard) = non_blocking(file_appender);

        let layer = fmt::layer()
            .with_writer(non_blocking_file)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false) // No ANSI colors in file
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if logging.file_logging {
        info!(
            "Logging initialized - console: {}, file: {}",
            log_level,
            logging.log_dir.join("sonde.log").display()
        );
    }

    Ok(guard)
}
