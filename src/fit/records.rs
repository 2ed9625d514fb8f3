//! Definition and data record encoding.
//!
//! The payload of a workout file is a sequence of record pairs: a definition
//! record declaring the field layout for a local message id, immediately
//! followed by the data records that use it. All multi-byte values are
//! little-endian.

/// Record header bit marking a definition record.
const DEFINITION_HEADER: u8 = 0x40;

/// Architecture byte for little-endian definitions.
const ARCH_LITTLE_ENDIAN: u8 = 0x00;

/// Base types used by workout files.
///
/// The wire code carries the endian-ability bit (0x80) for multi-byte types,
/// matching what the official SDK writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Enum,
    UInt8,
    String,
    UInt16,
    UInt32,
    UInt32z,
}

impl BaseType {
    /// Wire code for the definition record's base-type byte.
    pub fn code(&self) -> u8 {
        match self {
            BaseType::Enum => 0x00,
            BaseType::UInt8 => 0x02,
            BaseType::String => 0x07,
            BaseType::UInt16 => 0x84,
            BaseType::UInt32 => 0x86,
            BaseType::UInt32z => 0x8C,
        }
    }

    /// Natural encoded size in bytes. Strings are sized per field, so their
    /// natural size is a single terminator byte.
    pub fn fixed_size(&self) -> u8 {
        match self {
            BaseType::Enum | BaseType::UInt8 => 1,
            BaseType::String => 1,
            BaseType::UInt16 => 2,
            BaseType::UInt32 | BaseType::UInt32z => 4,
        }
    }
}

/// One field declaration inside a definition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub number: u8,
    pub size: u8,
    pub base_type: BaseType,
}

impl FieldDefinition {
    /// Field with its base type's natural size.
    pub fn new(number: u8, base_type: BaseType) -> Self {
        FieldDefinition {
            number,
            size: base_type.fixed_size(),
            base_type,
        }
    }

    /// Field with an explicit size, used for string fields.
    pub fn with_size(number: u8, size: u8, base_type: BaseType) -> Self {
        FieldDefinition {
            number,
            size,
            base_type,
        }
    }

    /// The three-byte declaration: field number, size, base-type code.
    pub fn encode(&self) -> [u8; 3] {
        [self.number, self.size, self.base_type.code()]
    }
}

/// A definition record: local id, global message number and field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRecord {
    pub local_id: u8,
    pub global_mesg: u16,
    pub fields: Vec<FieldDefinition>,
}

impl DefinitionRecord {
    pub fn new(local_id: u8, global_mesg: u16, fields: Vec<FieldDefinition>) -> Self {
        DefinitionRecord {
            local_id,
            global_mesg,
            fields,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(6 + 3 * self.fields.len());
        buf.push(DEFINITION_HEADER | (self.local_id & 0x0F));
        buf.push(0x00);
        buf.push(ARCH_LITTLE_ENDIAN);
        buf.extend_from_slice(&self.global_mesg.to_le_bytes());
        buf.push(self.fields.len() as u8);
        for field in &self.fields {
            buf.extend_from_slice(&field.encode());
        }
        buf
    }

    /// Total byte length of the data records this definition describes,
    /// including the one-byte record header.
    pub fn data_record_len(&self) -> usize {
        1 + self.fields.iter().map(|f| f.size as usize).sum::<usize>()
    }
}

/// A data record under construction. Field values must be pushed in the
/// exact order the matching definition declares them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    bytes: Vec<u8>,
}

impl DataRecord {
    pub fn new(local_id: u8) -> Self {
        DataRecord {
            bytes: vec![local_id & 0x0F],
        }
    }

    pub fn push_enum(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn push_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn push_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn push_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Push a string field of `declared_size` bytes: up to `declared_size - 1`
    /// UTF-8 bytes cut at a character boundary, zero-padded to the declared
    /// size. The padding doubles as the terminator.
    pub fn push_string(&mut self, value: &str, declared_size: u8) {
        let usable = declared_size as usize - 1;
        let cut = truncate_utf8(value, usable);
        self.bytes.extend_from_slice(cut.as_bytes());
        for _ in cut.len()..declared_size as usize {
            self.bytes.push(0x00);
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Cut a string at the largest character boundary within `max_bytes`.
pub fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
