//! TASTy encoding primitives
//!
//! The inverse of [`TastyReader`](crate::reader::TastyReader). Length-framed
//! payloads are built in a nested writer and copied behind their length, so
//! no length field ever needs patching.

use crate::format::{NameTag, TastyVersion, MAGIC, UUID_LEN};

/// TASTy writer
///
/// Provides methods for emitting naturals, integers, names and sections
/// into a binary buffer.
pub struct TastyWriter {
    /// Internal buffer containing the encoded bytes
    pub(crate) buffer: Vec<u8>,
}

impl TastyWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a new writer with capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Get the current buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get the current offset (length of the buffer)
    pub fn offset(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    // ===== Basic Emission =====

    /// Emit a raw byte
    pub fn emit_byte(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Emit raw bytes
    pub fn emit_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Emit a natural number (big-endian base-128, stop bit on the last byte)
    pub fn emit_long_nat(&mut self, value: u64) {
        let mut groups = vec![(value & 0x7F) as u8 | 0x80];
        let mut rest = value >> 7;
        while rest != 0 {
            groups.push((rest & 0x7F) as u8);
            rest >>= 7;
        }
        groups.reverse();
        self.buffer.extend_from_slice(&groups);
    }

    /// Emit a 32-bit natural number
    pub fn emit_nat(&mut self, value: u32) {
        self.emit_long_nat(u64::from(value));
    }

    /// Emit a signed integer
    ///
    /// Adds leading groups until bit 6 of the first byte carries the sign.
    pub fn emit_long_int(&mut self, value: i64) {
        let mut groups = vec![(value & 0x7F) as u8 | 0x80];
        let mut rest = value >> 7;
        loop {
            let top = groups[groups.len() - 1] & 0x7F;
            let sign_bit = top & 0x40 != 0;
            if (rest == 0 && !sign_bit) || (rest == -1 && sign_bit) {
                break;
            }
            groups.push((rest & 0x7F) as u8);
            rest >>= 7;
        }
        groups.reverse();
        self.buffer.extend_from_slice(&groups);
    }

    /// Emit a 32-bit signed integer
    pub fn emit_int(&mut self, value: i32) {
        self.emit_long_int(i64::from(value));
    }

    /// Emit a length-prefixed UTF-8 string
    pub fn emit_utf8(&mut self, text: &str) {
        self.emit_long_nat(text.len() as u64);
        self.emit_bytes(text.as_bytes());
    }

    // ===== Framing =====

    /// Emit the length of the payload produced by `build`, then the payload
    pub fn emit_framed(&mut self, build: impl FnOnce(&mut TastyWriter)) {
        let mut payload = TastyWriter::new();
        build(&mut payload);
        self.emit_long_nat(payload.offset() as u64);
        self.buffer.extend_from_slice(&payload.buffer);
    }

    /// Emit one name record: tag byte, length, payload
    pub fn emit_name_record(&mut self, tag: NameTag, build: impl FnOnce(&mut TastyWriter)) {
        self.emit_byte(tag.to_u8());
        self.emit_framed(build);
    }

    /// Emit a UTF8 name record
    pub fn emit_utf8_name(&mut self, text: &str) {
        self.emit_name_record(NameTag::Utf8, |w| w.emit_bytes(text.as_bytes()));
    }

    /// Emit a section: label name ref, length, payload
    pub fn emit_section(&mut self, label_ref: u32, payload: &[u8]) {
        self.emit_nat(label_ref);
        self.emit_long_nat(payload.len() as u64);
        self.emit_bytes(payload);
    }

    /// Emit a file header
    pub fn emit_header(&mut self, version: TastyVersion, tooling: &str, uuid: [u8; UUID_LEN]) {
        self.emit_bytes(&MAGIC);
        self.emit_nat(version.major);
        self.emit_nat(version.minor);
        self.emit_nat(version.experimental);
        self.emit_utf8(tooling);
        self.emit_bytes(&uuid);
    }
}

impl Default for TastyWriter {
    fn default() -> Self {
        Self::new()
    }
}
