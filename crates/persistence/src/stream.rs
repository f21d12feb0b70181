//! Typed record streams.
//!
//! Layout: one [`StreamHeader`], then frames of
//! `[seq u64][payload_len u32][crc64 u64][payload]`, all little-endian.
//! The checksum covers seq, length and payload. Payloads are bincode
//! (serde, standard config) encodings of one record.

use crate::error::{PersistenceError, Result};
use crate::header::{StreamHeader, StreamKind};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc64fast::Digest;
use evplane_kernel::event::RawEvent;
use evplane_kernel::record::{CandidateRecord, EventPlaneAngles, EventPlaneRecord, MatchedRecord};
use evplane_kernel::sink::RecordSink;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::marker::PhantomData;
use std::path::Path;

/// A record type with a fixed stream kind.
pub trait StreamRecord: Serialize + DeserializeOwned {
    const KIND: StreamKind;
}

impl StreamRecord for RawEvent {
    const KIND: StreamKind = StreamKind::RawEvents;
}

impl StreamRecord for EventPlaneRecord {
    const KIND: StreamKind = StreamKind::EventPlanes;
}

impl StreamRecord for EventPlaneAngles {
    const KIND: StreamKind = StreamKind::EventPlaneAngles;
}

impl StreamRecord for CandidateRecord {
    const KIND: StreamKind = StreamKind::Candidates;
}

impl StreamRecord for MatchedRecord {
    const KIND: StreamKind = StreamKind::Matched;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub seq: u64,
    pub payload_len: u32,
    pub checksum: u64,
}

impl FrameHeader {
    pub const SIZE: usize = 8 + 4 + 8; // 20 bytes
    /// Largest payload accepted on read or write.
    pub const MAX_PAYLOAD: u32 = 64 * 1024 * 1024;

    pub fn for_payload(seq: u64, payload: &[u8]) -> Result<Self> {
        let payload_len = u32::try_from(payload.len())
            .ok()
            .filter(|&len| len <= Self::MAX_PAYLOAD)
            .ok_or_else(|| PersistenceError::InvalidFormat(format!("payload of {} bytes too large", payload.len())))?;
        Ok(Self {
            seq,
            payload_len,
            checksum: checksum(seq, payload_len, payload),
        })
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.seq)?;
        writer.write_u32::<LittleEndian>(self.payload_len)?;
        writer.write_u64::<LittleEndian>(self.checksum)?;
        Ok(())
    }

    /// `Ok(None)` on a clean end of stream, an error on a torn header.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Option<Self>> {
        let mut buf = [0u8; Self::SIZE];
        let mut filled = 0;
        while filled < Self::SIZE {
            match reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        match filled {
            0 => return Ok(None),
            Self::SIZE => {}
            n => {
                return Err(PersistenceError::InvalidFormat(format!(
                    "truncated frame header ({n} of {} bytes)",
                    Self::SIZE
                )))
            }
        }

        let mut cursor = &buf[..];
        Ok(Some(Self {
            seq: cursor.read_u64::<LittleEndian>()?,
            payload_len: cursor.read_u32::<LittleEndian>()?,
            checksum: cursor.read_u64::<LittleEndian>()?,
        }))
    }
}

fn checksum(seq: u64, payload_len: u32, payload: &[u8]) -> u64 {
    let mut digest = Digest::new();
    digest.write(&seq.to_le_bytes());
    digest.write(&payload_len.to_le_bytes());
    digest.write(payload);
    digest.sum64()
}

pub struct Frame {
    pub header: FrameHeader,
    pub payload: Vec<u8>,
}

/// Checksummed frames of any stream, without decoding payloads.
pub struct FrameReader {
    header: StreamHeader,
    reader: BufReader<File>,
}

impl FrameReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let header = StreamHeader::read_from(&mut reader)?;
        Ok(Self { header, reader })
    }

    pub fn header(&self) -> &StreamHeader {
        &self.header
    }
}

impl Iterator for FrameReader {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = match FrameHeader::read_from(&mut self.reader) {
            Ok(Some(h)) => h,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };
        if header.payload_len > FrameHeader::MAX_PAYLOAD {
            return Some(Err(PersistenceError::InvalidFormat(format!(
                "frame {} claims {} payload bytes",
                header.seq, header.payload_len
            ))));
        }

        let mut payload = vec![0u8; header.payload_len as usize];
        if let Err(e) = self.reader.read_exact(&mut payload) {
            return Some(Err(PersistenceError::IoError(e)));
        }

        let found = checksum(header.seq, header.payload_len, &payload);
        if found != header.checksum {
            return Some(Err(PersistenceError::ChecksumMismatch {
                seq: header.seq,
                expected: header.checksum,
                found,
            }));
        }

        Some(Ok(Frame { header, payload }))
    }
}

/// Decoded records of one stream kind.
pub struct StreamReader<T> {
    frames: FrameReader,
    _record: PhantomData<fn() -> T>,
}

impl<T: StreamRecord> StreamReader<T> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let frames = FrameReader::open(path)?;
        let found = frames.header().kind;
        if found != T::KIND {
            return Err(PersistenceError::KindMismatch {
                expected: T::KIND.name(),
                found: found.name().to_string(),
            });
        }
        Ok(Self {
            frames,
            _record: PhantomData,
        })
    }

    pub fn header(&self) -> &StreamHeader {
        self.frames.header()
    }
}

impl<T: StreamRecord> Iterator for StreamReader<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = match self.frames.next()? {
            Ok(f) => f,
            Err(e) => return Some(Err(e)),
        };
        Some(
            bincode::serde::decode_from_slice(&frame.payload, bincode::config::standard())
                .map(|(record, _)| record)
                .map_err(PersistenceError::from),
        )
    }
}

pub struct StreamWriter<T> {
    writer: BufWriter<File>,
    next_seq: u64,
    _record: PhantomData<fn(T)>,
}

impl<T: StreamRecord> StreamWriter<T> {
    /// Creates (or truncates) `path` and writes the stream header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let created = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&StreamHeader::new(T::KIND, created).to_bytes())?;
        Ok(Self {
            writer,
            next_seq: 0,
            _record: PhantomData,
        })
    }

    pub fn write(&mut self, record: &T) -> Result<()> {
        let payload = bincode::serde::encode_to_vec(record, bincode::config::standard())?;
        FrameHeader::for_payload(self.next_seq, &payload)?.write_to(&mut self.writer)?;
        self.writer.write_all(&payload)?;
        self.next_seq += 1;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.next_seq
    }

    /// Flushes and syncs; returns the number of records written.
    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        Ok(self.next_seq)
    }
}

impl<T: StreamRecord> RecordSink<T> for StreamWriter<T> {
    type Error = PersistenceError;

    fn append(&mut self, record: T) -> Result<()> {
        self.write(&record)
    }
}

pub fn read_stream<T: StreamRecord>(path: impl AsRef<Path>) -> Result<StreamReader<T>> {
    StreamReader::open(path)
}

pub fn read_all<T: StreamRecord>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    read_stream(path)?.collect()
}

pub fn write_all<'a, T: StreamRecord + 'a>(path: impl AsRef<Path>, records: impl IntoIterator<Item = &'a T>) -> Result<u64> {
    let mut writer = StreamWriter::create(path)?;
    for record in records {
        writer.write(record)?;
    }
    writer.finish()
}
