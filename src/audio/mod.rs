//! Audio output for the CLI frontend.
//!
//! Rendered signals are written either as a mono 32-bit float WAV file or as
//! raw little-endian `f32` PCM for piping into other tools.

use std::fs::File;
use std::io::{self, BufWriter, Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

use crate::error::{GunshotError, Result};
use crate::render::RenderedSignal;

/// Buffer size for raw output (in samples).
pub const BUFFER_SIZE: usize = 256;

/// Raw little-endian `f32` PCM writer.
pub struct AudioOutput<W: Write> {
    sink: W,
    buffer: Vec<u8>,
}

impl AudioOutput<io::Stdout> {
    /// Writer to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AudioOutput<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            buffer: Vec::with_capacity(BUFFER_SIZE * 4),
        }
    }

    /// Write a block of samples.
    pub fn write_block(&mut self, samples: &[f32]) -> Result<()> {
        self.buffer.clear();
        for sample in samples {
            self.buffer.extend_from_slice(&sample.to_le_bytes());
        }
        self.sink
            .write_all(&self.buffer)
            .map_err(|e| GunshotError::audio_output(e.to_string()))
    }

    /// Write a whole signal in `BUFFER_SIZE` blocks and flush.
    pub fn write_signal(&mut self, signal: &RenderedSignal) -> Result<()> {
        for block in signal.samples.chunks(BUFFER_SIZE) {
            self.write_block(block)?;
        }
        self.flush()
    }

    /// Flush the output stream.
    pub fn flush(&mut self) -> Result<()> {
        self.sink
            .flush()
            .map_err(|e| GunshotError::audio_output(e.to_string()))
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

/// Write a signal as mono 32-bit float WAV into any seekable sink.
pub fn write_wav_to<W: Write + Seek>(sink: W, signal: &RenderedSignal) -> Result<()> {
    let mut writer = WavWriter::new(sink, wav_spec(signal.sample_rate))
        .map_err(|e| GunshotError::audio_output(e.to_string()))?;
    for &sample in &signal.samples {
        writer
            .write_sample(sample)
            .map_err(|e| GunshotError::audio_output(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| GunshotError::audio_output(e.to_string()))
}

/// Write a signal to a WAV file at `path`.
pub fn write_wav(path: &Path, signal: &RenderedSignal) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        GunshotError::audio_output(format!("cannot create '{}': {e}", path.display()))
    })?;
    write_wav_to(BufWriter::new(file), signal)?;

    debug!(path = %path.display(), samples = signal.samples.len(), "Wrote WAV file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn signal() -> RenderedSignal {
        RenderedSignal::new(44_100, vec![0.0, 0.5, -1.0, 0.25])
    }

    #[test]
    fn test_raw_output_is_little_endian_f32() {
        let mut output = AudioOutput::new(Vec::new());
        output.write_signal(&signal()).unwrap();
        let bytes = output.into_inner();

        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[4..8], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[8..12], &(-1.0f32).to_le_bytes());
    }

    #[test]
    fn test_wav_round_trip() {
        let mut cursor = Cursor::new(Vec::new());
        write_wav_to(&mut cursor, &signal()).unwrap();

        cursor.set_position(0);
        let mut reader = hound::WavReader::new(cursor).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44_100);
        assert_eq!(spec.sample_format, SampleFormat::Float);

        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, signal().samples);
    }

    #[test]
    fn test_wav_to_missing_directory_fails() {
        let path = Path::new("/nonexistent-dir/shot.wav");
        let err = write_wav(path, &signal()).unwrap_err();
        assert!(matches!(err, GunshotError::AudioOutput { .. }));
        assert!(err.to_string().contains("/nonexistent-dir/shot.wav"));
    }
}
