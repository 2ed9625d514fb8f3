//! FIT file header.
//!
//! Fixed 14-byte layout: size, protocol version, profile version (LE u16),
//! payload length (LE u32), the ".FIT" signature, and a CRC-16 over the
//! first 12 bytes. The header length field counts payload bytes only, never
//! the header itself or the trailing checksum.

use crate::fit::crc;

/// Header length in bytes.
pub const HEADER_LEN: usize = 14;

/// Trailing checksum length in bytes.
pub const TRAILER_LEN: usize = 2;

/// Protocol version 2.0, encoded with the major version in the high nibble.
pub const PROTOCOL_VERSION: u8 = 0x20;

/// Profile version 21.32.
pub const PROFILE_VERSION: u16 = 2132;

/// File type signature, ".FIT" in ASCII.
pub const DATA_TYPE: [u8; 4] = [0x2E, 0x46, 0x49, 0x54];

/// The 14-byte file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Payload length in bytes (definition and data records only).
    pub payload_len: u32,
}

impl FileHeader {
    pub fn new(payload_len: u32) -> Self {
        FileHeader { payload_len }
    }

    /// Encode the header, including its own CRC over the first 12 bytes.
    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0] = HEADER_LEN as u8;
        buf[1] = PROTOCOL_VERSION;
        buf[2..4].copy_from_slice(&PROFILE_VERSION.to_le_bytes());
        buf[4..8].copy_from_slice(&self.payload_len.to_le_bytes());
        buf[8..12].copy_from_slice(&DATA_TYPE);
        let header_crc = crc::checksum(&buf[..12]);
        buf[12..14].copy_from_slice(&header_crc.to_le_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_header() {
        let bytes = FileHeader::new(0).encode();
        assert_eq!(
            bytes,
            [
                0x0E, 0x20, 0x54, 0x08, 0x00, 0x00, 0x00, 0x00, 0x2E, 0x46, 0x49, 0x54,
                0xB9, 0xD1,
            ]
        );
    }

    #[test]
    fn test_payload_length_little_endian() {
        let bytes = FileHeader::new(381).encode();
        assert_eq!(&bytes[4..8], &[0x7D, 0x01, 0x00, 0x00]);
        assert_eq!(&bytes[8..12], b".FIT");
    }

    #[test]
    fn test_header_crc_covers_first_twelve_bytes() {
        let bytes = FileHeader::new(372).encode();
        let stored = u16::from_le_bytes([bytes[12], bytes[13]]);
        assert_eq!(stored, crc::checksum(&bytes[..12]));
        assert_eq!(stored, 0xC6AF);
    }
}
