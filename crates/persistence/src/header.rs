use crate::error::{PersistenceError, Result};
use std::fmt;
use std::io::Read;

/// Content of a record stream, stored in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StreamKind {
    RawEvents = 1,
    EventPlanes = 2,
    EventPlaneAngles = 3,
    Candidates = 4,
    Matched = 5,
}

impl StreamKind {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(StreamKind::RawEvents),
            2 => Some(StreamKind::EventPlanes),
            3 => Some(StreamKind::EventPlaneAngles),
            4 => Some(StreamKind::Candidates),
            5 => Some(StreamKind::Matched),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StreamKind::RawEvents => "raw-events",
            StreamKind::EventPlanes => "event-planes",
            StreamKind::EventPlaneAngles => "event-plane-angles",
            StreamKind::Candidates => "candidates",
            StreamKind::Matched => "matched",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub kind: StreamKind,
    pub flags: u32,
    pub created: u64,
    pub reserved: [u8; 16],
}

impl StreamHeader {
    pub const SIZE: usize = 4 + 4 + 4 + 4 + 8 + 16; // 40 bytes
    pub const MAGIC: [u8; 4] = *b"EVPS";
    pub const VERSION: u32 = 1;

    pub fn new(kind: StreamKind, created: u64) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            kind,
            flags: 0,
            created,
            reserved: [0; 16],
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.magic);
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        buf[8..12].copy_from_slice(&(self.kind as u32).to_le_bytes());
        buf[12..16].copy_from_slice(&self.flags.to_le_bytes());
        buf[16..24].copy_from_slice(&self.created.to_le_bytes());
        buf[24..40].copy_from_slice(&self.reserved);
        buf
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf)?;

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[0..4]);
        if magic != Self::MAGIC {
            return Err(PersistenceError::InvalidMagic);
        }

        let word = |at: usize| u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        let version = word(4);
        if version != Self::VERSION {
            return Err(PersistenceError::UnsupportedVersion(version));
        }
        let raw_kind = word(8);
        let kind = StreamKind::from_u32(raw_kind)
            .ok_or_else(|| PersistenceError::InvalidFormat(format!("unknown stream kind {raw_kind}")))?;
        let flags = word(12);

        let mut created = [0u8; 8];
        created.copy_from_slice(&buf[16..24]);
        let mut reserved = [0u8; 16];
        reserved.copy_from_slice(&buf[24..40]);

        Ok(Self {
            magic,
            version,
            kind,
            flags,
            created: u64::from_le_bytes(created),
            reserved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_header_serialization() {
        let header = StreamHeader::new(StreamKind::EventPlanes, 1234567890);
        let bytes = header.to_bytes();

        let mut reader = &bytes[..];
        let decoded = StreamHeader::read_from(&mut reader).unwrap();

        assert_eq!(header, decoded);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = StreamHeader::new(StreamKind::Matched, 0).to_bytes();
        bytes[0..4].copy_from_slice(b"BADM");
        let mut reader = &bytes[..];
        let result = StreamHeader::read_from(&mut reader);
        assert!(matches!(result, Err(PersistenceError::InvalidMagic)));
    }

    #[test]
    fn test_unknown_kind_and_version() {
        let mut bytes = StreamHeader::new(StreamKind::Candidates, 0).to_bytes();
        bytes[8..12].copy_from_slice(&99u32.to_le_bytes());
        assert!(matches!(
            StreamHeader::read_from(&bytes[..]),
            Err(PersistenceError::InvalidFormat(_))
        ));

        let mut bytes = StreamHeader::new(StreamKind::Candidates, 0).to_bytes();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(
            StreamHeader::read_from(&bytes[..]),
            Err(PersistenceError::UnsupportedVersion(2))
        ));
    }
}
