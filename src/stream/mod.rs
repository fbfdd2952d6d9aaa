//! Sample streams for driving the chip offline.
//!
//! Input and output are raw mono little-endian `f32` samples, one sample per
//! tick. With the default 1000 us tick period that is a 1 kHz stream:
//!
//! ```bash
//! ffmpeg -i pwm.wav -f f32le -ac 1 -ar 1000 - | rcfilter -R 10k -C 100n | ffmpeg -f f32le -ac 1 -ar 1000 -i - out.wav
//! ```

mod driver;

use std::io::{ErrorKind, Read, Write};

use log::warn;

use crate::error::{RcFilterError, Result};

pub use driver::ChipDriver;

/// Buffer size for stream processing (in samples).
pub const BUFFER_SIZE: usize = 256;

const SAMPLE_BYTES: usize = 4;

/// Reader of little-endian `f32` samples.
///
/// Bytes of a sample split across two reads are kept until the rest
/// arrives; a trailing partial sample at end of stream is dropped.
pub struct SampleInput<R> {
    reader: R,
    buffer: Vec<u8>,
    /// Bytes at the front of `buffer` not yet decoded
    pending: usize,
}

impl<R: Read> SampleInput<R> {
    /// Create a new sample reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: vec![0u8; BUFFER_SIZE * SAMPLE_BYTES],
            pending: 0,
        }
    }

    /// Read a block of samples.
    /// Returns the number of samples read, or 0 on end of stream.
    pub fn read_block(&mut self, samples: &mut [f32]) -> Result<usize> {
        if samples.is_empty() {
            return Ok(0);
        }

        let bytes_wanted = samples.len() * SAMPLE_BYTES;
        if self.buffer.len() < bytes_wanted {
            self.buffer.resize(bytes_wanted, 0);
        }

        while self.pending < SAMPLE_BYTES {
            let bytes_read = match self.reader.read(&mut self.buffer[self.pending..bytes_wanted]) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(RcFilterError::StreamInput {
                        message: e.to_string(),
                    })
                }
            };

            if bytes_read == 0 {
                if self.pending > 0 {
                    warn!("dropping {} trailing bytes of a partial sample", self.pending);
                    self.pending = 0;
                }
                return Ok(0);
            }
            self.pending += bytes_read;
        }

        let count = self.pending / SAMPLE_BYTES;
        let used = count * SAMPLE_BYTES;
        for (sample, bytes) in samples.iter_mut().zip(self.buffer[..used].chunks_exact(SAMPLE_BYTES)) {
            *sample = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        self.buffer.copy_within(used..self.pending, 0);
        self.pending -= used;

        Ok(count)
    }
}

/// Writer of little-endian `f32` samples.
pub struct SampleOutput<W> {
    writer: W,
    buffer: Vec<u8>,
}

impl<W: Write> SampleOutput<W> {
    /// Create a new sample writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buffer: Vec::with_capacity(BUFFER_SIZE * SAMPLE_BYTES),
        }
    }

    /// Write a block of samples.
    pub fn write_block(&mut self, samples: &[f32]) -> Result<()> {
        self.buffer.clear();
        for sample in samples {
            self.buffer.extend_from_slice(&sample.to_le_bytes());
        }

        self.writer
            .write_all(&self.buffer)
            .map_err(|e| RcFilterError::StreamOutput {
                message: e.to_string(),
            })
    }

    /// Flush the output stream.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| RcFilterError::StreamOutput {
            message: e.to_string(),
        })
    }

    /// Recover the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Feed every sample from `reader` through the chip, one tick per sample,
/// and write the output voltage after each tick to `writer`.
///
/// Returns the number of ticks run.
pub fn process_stream<R: Read, W: Write>(driver: &mut ChipDriver, reader: R, writer: W) -> Result<u64> {
    let mut input = SampleInput::new(reader);
    let mut output = SampleOutput::new(writer);

    let mut in_samples = vec![0.0f32; BUFFER_SIZE];
    let mut out_samples = vec![0.0f32; BUFFER_SIZE];
    let mut ticks = 0u64;

    loop {
        let samples_read = input.read_block(&mut in_samples)?;

        if samples_read == 0 {
            break;
        }

        driver.process_block(&in_samples[..samples_read], &mut out_samples[..samples_read])?;
        output.write_block(&out_samples[..samples_read])?;
        ticks += samples_read as u64;
    }

    output.flush()?;
    Ok(ticks)
}
