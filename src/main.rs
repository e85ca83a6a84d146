//! Gunshot - anechoic gunshot synthesizer
//!
//! Renders the dry recording of a single shot described by a JSON file.
//!
//! # Usage
//!
//! ```bash
//! gunshot rifle.json -o rifle.wav
//! gunshot rifle.json --raw | ffmpeg -f f32le -ac 1 -ar 96000 -i - rifle.flac
//! ```

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use tracing::info;

use gunshot_core::{
    audio::{write_wav, AudioOutput},
    error::Result,
    logging::{init_logging, LogLevel},
    synthesize, ShotFile,
};

/// Anechoic gunshot synthesizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the shot description file (.json)
    #[arg(value_name = "SHOT_FILE")]
    shot_file: PathBuf,

    /// Output WAV file [default: SHOT_FILE with a .wav extension]
    #[arg(short, long, value_name = "FILE", conflicts_with = "raw")]
    output: Option<PathBuf>,

    /// Sample rate in Hz (overrides the shot file)
    #[arg(short, long)]
    sample_rate: Option<u32>,

    /// Speed of sound in m/s (overrides the shot file)
    #[arg(short = 'c', long)]
    speed_of_sound: Option<f64>,

    /// Fixed output length in seconds
    #[arg(short, long)]
    window: Option<f64>,

    /// Disable the air-absorption low-pass
    #[arg(long)]
    no_air_absorption: bool,

    /// Write raw little-endian f32 PCM to stdout instead of a WAV file
    #[arg(long)]
    raw: bool,

    /// Also write the shock-wave and muzzle-blast components as separate files
    #[arg(long, conflicts_with = "raw")]
    components: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn component_path(output: &Path, component: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gunshot".to_string());
    output.with_file_name(format!("{stem}_{component}.wav"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = LogLevel::from_flags(args.verbose, args.quiet);
    init_logging(level, args.verbose > 0 || args.quiet);

    // Load the shot and apply command-line overrides
    let shot_file = ShotFile::load(&args.shot_file)?;
    let mut config = shot_file.synthesis.clone();
    if let Some(sample_rate) = args.sample_rate {
        config = config.with_sample_rate(sample_rate);
    }
    if let Some(speed_of_sound) = args.speed_of_sound {
        config = config.with_speed_of_sound(speed_of_sound);
    }
    if let Some(window) = args.window {
        config = config.with_window(window);
    }
    if args.no_air_absorption {
        config = config.with_air_absorption(false);
    }

    let gunshot = synthesize(&shot_file.ballistics, &shot_file.geometry, &config)?;

    if args.raw {
        AudioOutput::stdout().write_signal(&gunshot.signal)?;
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| args.shot_file.with_extension("wav"));
    write_wav(&output, &gunshot.signal)?;

    if args.components {
        write_wav(&component_path(&output, "shock"), &gunshot.shock_track)?;
        write_wav(&component_path(&output, "blast"), &gunshot.blast_track)?;
    }

    for arrival in &gunshot.arrivals {
        info!(
            kind = %arrival.kind,
            arrival_ms = arrival.arrival_time * 1e3,
            distance_m = arrival.distance,
            peak_pa = arrival.peak_pressure,
            "Arrival"
        );
    }
    info!(
        path = %output.display(),
        label = shot_file.label.as_deref().unwrap_or("-"),
        "Wrote gunshot"
    );

    Ok(())
}
