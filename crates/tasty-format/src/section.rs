//! Named sections and the plugin contract for decoding them

use crate::name_table::NameTable;
use crate::reader::{Addr, TastyReader};
use crate::unpickler::UnpickleError;
use std::ops::Range;

/// A named, length-framed region of the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section label, resolved from the name table
    pub label: String,
    /// Payload bytes, as absolute addresses
    pub range: Range<Addr>,
}

impl Section {
    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.range.end.distance_from(self.range.start)
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.range.start == self.range.end
    }
}

/// Decoder for one kind of section
///
/// The unpickler matches plugins to sections by exact label equality and
/// hands them a reader bounded to the section payload plus the name table.
pub trait SectionPlugin {
    /// Decoded form of the section
    type Output;

    /// Label of the section this plugin decodes
    fn label(&self) -> &str;

    /// Decode the section payload
    fn decode(&self, reader: TastyReader<'_>, names: &NameTable) -> Result<Self::Output, UnpickleError>;
}

/// Plugin returning the payload bytes of any section unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    label: String,
}

impl RawSection {
    /// Raw access to the section called `label`
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl SectionPlugin for RawSection {
    type Output = Vec<u8>;

    fn label(&self) -> &str {
        &self.label
    }

    fn decode(&self, reader: TastyReader<'_>, _names: &NameTable) -> Result<Vec<u8>, UnpickleError> {
        Ok(reader.as_slice().to_vec())
    }
}
