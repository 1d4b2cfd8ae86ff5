//! TASTy file header
//!
//! Format:
//! - magic (4 bytes)
//! - major, minor, experimental version (Nat each)
//! - tooling version (Nat length + UTF-8)
//! - UUID (16 bytes)

use crate::format::{TastyVersion, MAGIC, UUID_LEN};
use crate::reader::{DecodeError, TastyReader};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Decode error
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Invalid magic number
    #[error("Invalid magic number: {0:02x?}")]
    InvalidMagic([u8; 4]),

    /// The file was written by an incompatible compiler
    #[error("Incompatible TASTy version {file} (reader: {reader})")]
    IncompatibleVersion {
        /// Version recorded in the file
        file: TastyVersion,
        /// Version of this reader
        reader: TastyVersion,
    },
}

/// Decoded file header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TastyHeader {
    /// Format version of the file
    pub version: TastyVersion,
    /// Free-form version of the tool that wrote the file
    pub tooling_version: String,
    /// Unique identifier of the file
    pub uuid: [u8; UUID_LEN],
}

/// Read and validate the header at the reader's current address
///
/// On success the reader is left on the first byte after the header.
pub fn check_header(
    reader: &mut TastyReader<'_>,
    expected: TastyVersion,
) -> Result<TastyHeader, HeaderError> {
    let magic = reader.read_bytes(MAGIC.len())?;
    if magic != MAGIC {
        let mut got = [0u8; 4];
        got.copy_from_slice(magic);
        return Err(HeaderError::InvalidMagic(got));
    }

    let version = TastyVersion::new(reader.read_nat()?, reader.read_nat()?, reader.read_nat()?);
    if !expected.accepts(&version) {
        return Err(HeaderError::IncompatibleVersion {
            file: version,
            reader: expected,
        });
    }

    let tooling_len = reader.read_len()?;
    let tooling_version = reader.read_utf8(tooling_len)?.to_string();
    let uuid = reader.read_uuid()?;

    Ok(TastyHeader {
        version,
        tooling_version,
        uuid,
    })
}
