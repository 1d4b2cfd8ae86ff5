//! Positioned reader over a TASTy buffer
//!
//! Addresses are absolute offsets into the shared buffer, so a sub-reader
//! created for one section reports the same addresses the file-level reader
//! would.

use crate::format::UUID_LEN;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while reading primitive values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Read past the end of the readable range
    #[error("Unexpected end of input at address {0}")]
    UnexpectedEnd(Addr),

    /// Invalid UTF-8 string
    #[error("Invalid UTF-8 string at address {0}")]
    InvalidUtf8(Addr),

    /// Natural number or integer does not fit its target width
    #[error("Number overflow at address {0}")]
    NatOverflow(Addr),

    /// Address outside the readable range
    #[error("Address {addr} outside of readable range [{start}, {end})")]
    AddressOutOfRange {
        /// Requested address
        addr: Addr,
        /// Start of the readable range
        start: Addr,
        /// End of the readable range
        end: Addr,
    },
}

/// Absolute byte address within a TASTy buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Addr(pub usize);

impl Addr {
    /// Address as a buffer index
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// Address `n` bytes further
    #[inline]
    pub fn offset(self, n: usize) -> Addr {
        Addr(self.0 + n)
    }

    /// Address `n` bytes further, or None if it does not fit
    #[inline]
    pub fn checked_offset(self, n: usize) -> Option<Addr> {
        self.0.checked_add(n).map(Addr)
    }

    /// Distance from `earlier` to this address
    #[inline]
    pub fn distance_from(self, earlier: Addr) -> usize {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// TASTy reader
///
/// Reads naturals, integers and raw bytes from `[start, end)` of a borrowed
/// buffer. Naturals are big-endian base-128 with the high bit set on the
/// last byte.
#[derive(Debug, Clone)]
pub struct TastyReader<'a> {
    bytes: &'a [u8],
    start: Addr,
    end: Addr,
    current: Addr,
}

impl<'a> TastyReader<'a> {
    /// Create a reader over the whole buffer
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            start: Addr(0),
            end: Addr(bytes.len()),
            current: Addr(0),
        }
    }

    /// Create a reader over `[start, end)` of this reader's range
    ///
    /// The new reader starts at `start` and shares the underlying buffer.
    pub fn sub_reader(&self, start: Addr, end: Addr) -> Result<TastyReader<'a>, DecodeError> {
        self.check_addr(start)?;
        self.check_addr(end)?;
        if start > end {
            return Err(DecodeError::AddressOutOfRange {
                addr: start,
                start: self.start,
                end,
            });
        }
        Ok(Self {
            bytes: self.bytes,
            start,
            end,
            current: start,
        })
    }

    /// First readable address
    pub fn start_addr(&self) -> Addr {
        self.start
    }

    /// Address one past the last readable byte
    pub fn end_addr(&self) -> Addr {
        self.end
    }

    /// Get the current address
    pub fn current_addr(&self) -> Addr {
        self.current
    }

    /// Move to `addr`, which must lie within `[start, end]`
    pub fn go_to(&mut self, addr: Addr) -> Result<(), DecodeError> {
        self.check_addr(addr)?;
        self.current = addr;
        Ok(())
    }

    /// Check if the reader is at the end of its range
    pub fn is_at_end(&self) -> bool {
        self.current >= self.end
    }

    /// Get the number of bytes left in the range
    pub fn remaining(&self) -> usize {
        self.end.distance_from(self.current)
    }

    /// The whole readable range as a slice
    pub fn as_slice(&self) -> &'a [u8] {
        &self.bytes[self.start.index()..self.end.index()]
    }

    fn check_addr(&self, addr: Addr) -> Result<(), DecodeError> {
        if addr < self.start || addr > self.end {
            return Err(DecodeError::AddressOutOfRange {
                addr,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    // ===== Basic Reading =====

    /// Read a single byte
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        if self.current >= self.end {
            return Err(DecodeError::UnexpectedEnd(self.current));
        }
        let value = self.bytes[self.current.index()];
        self.current = self.current.offset(1);
        Ok(value)
    }

    /// Read a fixed number of bytes
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], DecodeError> {
        if count > self.remaining() {
            return Err(DecodeError::UnexpectedEnd(self.current));
        }
        let from = self.current.index();
        self.current = self.current.offset(count);
        Ok(&self.bytes[from..from + count])
    }

    /// Read `count` bytes as UTF-8 text
    pub fn read_utf8(&mut self, count: usize) -> Result<&'a str, DecodeError> {
        let at = self.current;
        let bytes = self.read_bytes(count)?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(at))
    }

    /// Read the 16-byte UUID of the header
    pub fn read_uuid(&mut self) -> Result<[u8; UUID_LEN], DecodeError> {
        let bytes = self.read_bytes(UUID_LEN)?;
        let mut uuid = [0u8; UUID_LEN];
        uuid.copy_from_slice(bytes);
        Ok(uuid)
    }

    // ===== Variable-length Numbers =====

    /// Read a natural number that fits in 64 bits
    pub fn read_long_nat(&mut self) -> Result<u64, DecodeError> {
        let at = self.current;
        let mut value: u64 = 0;
        loop {
            let byte = self.read_byte()?;
            if value > (u64::MAX >> 7) {
                return Err(DecodeError::NatOverflow(at));
            }
            value = (value << 7) | u64::from(byte & 0x7F);
            if byte & 0x80 != 0 {
                return Ok(value);
            }
        }
    }

    /// Read a natural number that fits in 32 bits
    pub fn read_nat(&mut self) -> Result<u32, DecodeError> {
        let at = self.current;
        let value = self.read_long_nat()?;
        u32::try_from(value).map_err(|_| DecodeError::NatOverflow(at))
    }

    /// Read a natural number used as a length or count
    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        let at = self.current;
        let value = self.read_long_nat()?;
        usize::try_from(value).map_err(|_| DecodeError::NatOverflow(at))
    }

    /// Read a signed integer that fits in 64 bits
    ///
    /// The seven payload bits of the first byte are sign-extended.
    pub fn read_long_int(&mut self) -> Result<i64, DecodeError> {
        let at = self.current;
        let mut byte = self.read_byte()?;
        let mut value = i64::from(((byte << 1) as i8) >> 1);
        while byte & 0x80 == 0 {
            byte = self.read_byte()?;
            if value > (i64::MAX >> 7) || value < (i64::MIN >> 7) {
                return Err(DecodeError::NatOverflow(at));
            }
            value = (value << 7) | i64::from(byte & 0x7F);
        }
        Ok(value)
    }

    /// Read a signed integer that fits in 32 bits
    pub fn read_int(&mut self) -> Result<i32, DecodeError> {
        let at = self.current;
        let value = self.read_long_int()?;
        i32::try_from(value).map_err(|_| DecodeError::NatOverflow(at))
    }

    /// Read a length and turn it into the end address of what follows
    pub fn read_end(&mut self) -> Result<Addr, DecodeError> {
        let at = self.current;
        let len = self.read_len()?;
        self.current.checked_offset(len).ok_or(DecodeError::NatOverflow(at))
    }

    // ===== Bounded Iteration =====

    /// Apply `op` repeatedly while the reader is before `end`
    ///
    /// Framing is left to the caller: a step that overshoots `end` ends the
    /// loop without an error.
    pub fn until<T, E>(
        &mut self,
        end: Addr,
        mut op: impl FnMut(&mut Self) -> Result<T, E>,
    ) -> Result<Vec<T>, E> {
        let mut items = Vec::new();
        while self.current < end {
            items.push(op(self)?);
        }
        Ok(items)
    }
}
