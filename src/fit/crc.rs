//! CRC-16 checksum used by the FIT container.
//!
//! The format checks integrity in two places: a header self-check over the
//! first 12 header bytes, and a trailing checksum over header plus payload.
//! Both use the same table-driven CRC-16, folding each byte in low nibble
//! first from a starting value of zero.

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401,
    0xA001, 0x6C00, 0x7800, 0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

/// Incremental CRC-16 accumulator.
///
/// The streaming encoder feeds bytes through this as it writes them so the
/// trailer can be emitted without buffering the whole file.
#[derive(Debug, Clone, Default)]
pub struct Crc16 {
    sum: u16,
}

impl Crc16 {
    pub fn new() -> Self {
        Crc16 { sum: 0 }
    }

    /// Fold one byte into the running checksum, low nibble first.
    pub fn update_byte(&mut self, byte: u8) {
        let mut tmp = CRC_TABLE[(self.sum & 0x0F) as usize];
        self.sum = (self.sum >> 4) & 0x0FFF;
        self.sum ^= tmp ^ CRC_TABLE[(byte & 0x0F) as usize];

        tmp = CRC_TABLE[(self.sum & 0x0F) as usize];
        self.sum = (self.sum >> 4) & 0x0FFF;
        self.sum ^= tmp ^ CRC_TABLE[(byte >> 4) as usize];
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.update_byte(*byte);
        }
    }

    /// Current checksum value.
    pub fn value(&self) -> u16 {
        self.sum
    }
}

/// One-shot CRC-16 over a byte slice.
pub fn checksum(bytes: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(bytes);
    crc.value()
}
