//! Workout-file encoding.
//!
//! An encoded file is laid out as: 14-byte header, a File-Identity
//! definition/data pair, a Workout definition/data pair, one Step
//! definition followed by a data record per flattened step, and a 2-byte
//! checksum over everything before it.
//!
//! Two backends produce that layout. [`BufferedEncoder`] assembles the
//! whole file in memory; [`StreamingEncoder`] writes record by record
//! through a checksum-accumulating writer. Their output is identical, only
//! the sink handling differs.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EncodeError, Result};
use crate::models::StructuredWorkout;

pub mod crc;
pub mod header;
pub mod messages;
pub mod profile;
pub mod records;
pub mod steps;

use self::crc::Crc16;
use self::header::{FileHeader, HEADER_LEN, TRAILER_LEN};

/// Encoder configuration.
///
/// The defaults identify the file as coming from a development
/// manufacturer. `time_created` is the one time-varying field in an encoded
/// file; fixing it makes output fully reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Manufacturer id written to File-Identity
    pub manufacturer: u16,

    /// Product id written to File-Identity
    pub product: u16,

    /// Device serial written to File-Identity
    pub serial_number: u32,

    /// Creation timestamp; None means the current time at encode
    pub time_created: Option<DateTime<Utc>>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            manufacturer: profile::MANUFACTURER_DEVELOPMENT,
            product: 1,
            serial_number: 1,
            time_created: None,
        }
    }
}

/// A workout-file encoder backend.
///
/// Backends differ in how bytes reach the sink, never in the bytes
/// themselves.
pub trait WorkoutEncoder {
    /// Encode a complete workout file into memory.
    fn encode(&self, workout: &StructuredWorkout, options: &EncodeOptions) -> Result<Vec<u8>>;

    /// Encode a complete workout file into a writer.
    fn encode_to_writer(
        &self,
        workout: &StructuredWorkout,
        options: &EncodeOptions,
        sink: &mut dyn Write,
    ) -> Result<()> {
        let bytes = self.encode(workout, options)?;
        sink.write_all(&bytes)?;
        Ok(())
    }

    /// Backend name for diagnostics.
    fn backend_name(&self) -> &'static str;
}

/// Assembles the whole file in one buffer: payload records first, then the
/// header sized from them, then the trailing checksum.
pub struct BufferedEncoder;

impl WorkoutEncoder for BufferedEncoder {
    fn encode(&self, workout: &StructuredWorkout, options: &EncodeOptions) -> Result<Vec<u8>> {
        let chunks = messages::build_records(workout, options)?;
        let payload_len: usize = chunks.iter().map(|c| c.len()).sum();

        let mut buf = Vec::with_capacity(HEADER_LEN + payload_len + TRAILER_LEN);
        buf.extend_from_slice(&FileHeader::new(payload_len as u32).encode());
        for chunk in &chunks {
            buf.extend_from_slice(chunk);
        }

        let trailer = crc::checksum(&buf);
        buf.extend_from_slice(&trailer.to_le_bytes());

        debug!("Encoded {} byte workout file ({} payload bytes)", buf.len(), payload_len);
        Ok(buf)
    }

    fn backend_name(&self) -> &'static str {
        "buffered"
    }
}

/// Streams records to the sink as they are encoded, keeping only a running
/// checksum. The header still goes first; its payload length is summed from
/// the built records before anything is written.
pub struct StreamingEncoder;

impl WorkoutEncoder for StreamingEncoder {
    fn encode(&self, workout: &StructuredWorkout, options: &EncodeOptions) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_to_writer(workout, options, &mut buf)?;
        Ok(buf)
    }

    fn encode_to_writer(
        &self,
        workout: &StructuredWorkout,
        options: &EncodeOptions,
        sink: &mut dyn Write,
    ) -> Result<()> {
        let chunks = messages::build_records(workout, options)?;
        let payload_len: usize = chunks.iter().map(|c| c.len()).sum();

        let mut writer = CrcWriter::new(sink);
        writer.write_all(&FileHeader::new(payload_len as u32).encode())?;
        for chunk in &chunks {
            writer.write_all(chunk)?;
        }
        writer.finish()?;

        debug!("Streamed {} byte workout file", HEADER_LEN + payload_len + TRAILER_LEN);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "streaming"
    }
}

/// Writer adapter that folds everything written through it into a CRC-16,
/// so the trailer can be emitted without revisiting earlier bytes.
struct CrcWriter<'a> {
    crc: Crc16,
    sink: &'a mut dyn Write,
}

impl<'a> CrcWriter<'a> {
    fn new(sink: &'a mut dyn Write) -> Self {
        CrcWriter {
            crc: Crc16::new(),
            sink,
        }
    }

    /// Write the accumulated checksum as the trailer and flush.
    fn finish(self) -> std::io::Result<()> {
        let trailer = self.crc.value();
        self.sink.write_u16::<LittleEndian>(trailer)?;
        self.sink.flush()
    }
}

impl Write for CrcWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.sink.write(buf)?;
        self.crc.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.sink.flush()
    }
}

/// Available encoder backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncoderBackend {
    /// Whole file assembled in one in-memory buffer
    Buffered,
    /// Records streamed to the sink with a running checksum
    Streaming,
}

/// Build the encoder for a backend.
pub fn encoder_for(backend: EncoderBackend) -> Box<dyn WorkoutEncoder> {
    match backend {
        EncoderBackend::Buffered => Box::new(BufferedEncoder),
        EncoderBackend::Streaming => Box::new(StreamingEncoder),
    }
}

fn default_encoder() -> Box<dyn WorkoutEncoder> {
    encoder_for(EncoderBackend::Buffered)
}

/// Encode a workout file with default options.
pub fn encode(workout: &StructuredWorkout) -> Result<Vec<u8>> {
    encode_with_options(workout, &EncodeOptions::default())
}

/// Encode a workout file.
pub fn encode_with_options(
    workout: &StructuredWorkout,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    default_encoder().encode(workout, options)
}

/// Encode a workout file and write it to `path`. The workout is encoded
/// before the file is created, so mapping failures leave nothing behind.
pub fn encode_to_file<P: AsRef<Path>>(workout: &StructuredWorkout, path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let bytes = encode(workout)?;

    let mut file = File::create(path)?;
    file.write_all(&bytes)?;

    info!("Wrote {} byte workout file to {}", bytes.len(), path.display());
    Ok(path.to_path_buf())
}

/// Encode a workout file into a uniquely named temporary file and return
/// its path. The caller owns the file and its cleanup. Encoding streams
/// straight into the temp file; on failure the file is removed with the
/// temp handle.
pub fn encode_to_temp_file(workout: &StructuredWorkout) -> Result<PathBuf> {
    let mut tmp = tempfile::Builder::new()
        .prefix("fitforge-")
        .suffix(".fit")
        .tempfile()?;

    encoder_for(EncoderBackend::Streaming).encode_to_writer(
        workout,
        &EncodeOptions::default(),
        tmp.as_file_mut(),
    )?;

    let (_file, path) = tmp.keep().map_err(|e| EncodeError::Io(e.error))?;
    info!("Wrote workout file to {}", path.display());
    Ok(path)
}
