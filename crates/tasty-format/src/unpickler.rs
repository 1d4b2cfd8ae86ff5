//! TASTy unpickler
//!
//! Validates the header, decodes the name section into a [`NameTable`] and
//! indexes the remaining sections by label. Section payloads are decoded on
//! demand by [`SectionPlugin`]s.
//!
//! Layout after the header:
//! - name section: length, then name records up to that length
//! - sections until end of input: label name ref, length, payload

use crate::format::{NameTag, TastyVersion};
use crate::header::{check_header, HeaderError, TastyHeader};
use crate::name_table::{NameRef, NameTable, NameTableError};
use crate::names::{Name, ParamSig, QualifiedName, Signature, SimpleName};
use crate::reader::{Addr, DecodeError, TastyReader};
use crate::section::{Section, SectionPlugin};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Unpickling errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnpickleError {
    /// Header check failed
    #[error("Invalid header: {0}")]
    HeaderInvalid(#[from] HeaderError),

    /// Decode error
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A record or section did not end where its length said it would
    #[error("Framing corruption in {context}: expected end at {expected}, reached {actual}")]
    FramingCorruption {
        /// What was being decoded
        context: String,
        /// Declared end address
        expected: Addr,
        /// Address actually reached
        actual: Addr,
    },

    /// Unknown name record tag
    #[error("Unsupported name tag {tag} at address {addr}")]
    UnsupportedTag {
        /// Tag byte
        tag: u8,
        /// Address of the record
        addr: Addr,
    },

    /// A name ref points at an entry not decoded yet
    #[error("Name reference {name_ref} at address {addr} is not backward (only {decoded} names decoded)")]
    DanglingNameRef {
        /// Offending reference
        name_ref: NameRef,
        /// Address the reference was read from
        addr: Addr,
        /// Number of names decoded so far
        decoded: usize,
    },

    /// Name table lookup failed
    #[error("Name error: {0}")]
    Name(#[from] NameTableError),

    /// A section extends past the end of the file
    #[error("Section {label} ends at {end}, past the end of input at {limit}")]
    SectionOutOfBounds {
        /// Section label
        label: String,
        /// Declared end address
        end: Addr,
        /// End of the input
        limit: Addr,
    },

    /// A section payload is malformed
    #[error("Invalid section {label}: {reason}")]
    InvalidSection {
        /// Section label
        label: String,
        /// What is wrong with it
        reason: String,
    },
}

/// A decoded TASTy file
///
/// Construction either succeeds with the complete name table and section
/// index or fails; nothing is exposed from a failed decode.
#[derive(Debug, Clone)]
pub struct Unpickler<'a> {
    bytes: &'a [u8],
    header: TastyHeader,
    names: NameTable,
    sections: Vec<Section>,
    index: FxHashMap<String, usize>,
}

impl<'a> Unpickler<'a> {
    /// Decode a file written for the current format version
    pub fn new(bytes: &'a [u8]) -> Result<Self, UnpickleError> {
        Self::with_version(bytes, TastyVersion::default())
    }

    /// Decode a file, accepting the versions `version` can read
    pub fn with_version(bytes: &'a [u8], version: TastyVersion) -> Result<Self, UnpickleError> {
        let mut reader = TastyReader::new(bytes);

        let header = check_header(&mut reader, version)?;
        let names = read_name_section(&mut reader)?;
        let sections = read_sections(&mut reader, &names)?;

        // Later sections shadow earlier ones with the same label
        let mut index = FxHashMap::default();
        for (i, section) in sections.iter().enumerate() {
            index.insert(section.label.clone(), i);
        }

        log::debug!(
            "unpickled TASTy {} ({}): {} names, {} sections",
            header.version,
            header.tooling_version,
            names.len(),
            sections.len()
        );

        Ok(Self {
            bytes,
            header,
            names,
            sections,
            index,
        })
    }

    /// Get the file header
    pub fn header(&self) -> &TastyHeader {
        &self.header
    }

    /// Get the decoded name table
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Get all sections in file order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get the section called `label`
    pub fn section(&self, label: &str) -> Option<&Section> {
        self.index.get(label).map(|&i| &self.sections[i])
    }

    /// Decode the section `plugin` is registered for
    ///
    /// Returns `Ok(None)` when the file has no such section. Each call
    /// decodes afresh from the immutable buffer.
    pub fn lookup<P: SectionPlugin>(&self, plugin: &P) -> Result<Option<P::Output>, UnpickleError> {
        let Some(section) = self.section(plugin.label()) else {
            return Ok(None);
        };
        let reader = TastyReader::new(self.bytes).sub_reader(section.range.start, section.range.end)?;
        plugin.decode(reader, &self.names).map(Some)
    }
}

/// Decode the name section at the reader's position
fn read_name_section(reader: &mut TastyReader<'_>) -> Result<NameTable, UnpickleError> {
    let start = reader.current_addr();
    let end = reader.read_end()?;
    if end < start || end > reader.end_addr() {
        return Err(UnpickleError::SectionOutOfBounds {
            label: "names".to_string(),
            end,
            limit: reader.end_addr(),
        });
    }

    let mut names = NameTable::new();
    while reader.current_addr() < end {
        let name = read_name(reader, &names, end)?;
        log::trace!("name {}: {}", names.next_ref(), name);
        names.add(name);
    }

    if reader.current_addr() != end {
        return Err(UnpickleError::FramingCorruption {
            context: "name section".to_string(),
            expected: end,
            actual: reader.current_addr(),
        });
    }
    Ok(names)
}

/// Index the sections following the name section
fn read_sections(reader: &mut TastyReader<'_>, names: &NameTable) -> Result<Vec<Section>, UnpickleError> {
    let mut sections = Vec::new();
    while !reader.is_at_end() {
        let label_ref = read_name_ref(reader, names)?;
        let label = names.lookup_either(label_ref)?.to_string();
        let end = reader.read_end()?;
        let start = reader.current_addr();
        if end < start || end > reader.end_addr() {
            return Err(UnpickleError::SectionOutOfBounds {
                label,
                end,
                limit: reader.end_addr(),
            });
        }

        log::trace!("section {} at [{}, {})", label, start, end);
        sections.push(Section {
            label,
            range: start..end,
        });
        reader.go_to(end)?;
    }
    Ok(sections)
}

/// Decode one name record
///
/// `limit` is the end of the enclosing name section; a record may not claim
/// bytes past it.
fn read_name(reader: &mut TastyReader<'_>, names: &NameTable, limit: Addr) -> Result<Name, UnpickleError> {
    let start = reader.current_addr();
    let tag_byte = reader.read_byte()?;
    let tag = NameTag::from_u8(tag_byte).ok_or(UnpickleError::UnsupportedTag {
        tag: tag_byte,
        addr: start,
    })?;
    let end = reader.read_end()?;
    if end < reader.current_addr() || end > limit {
        return Err(UnpickleError::FramingCorruption {
            context: format!("{} record at {}", tag, start),
            expected: limit,
            actual: end,
        });
    }

    let name = match tag {
        NameTag::Utf8 => {
            let len = end.distance_from(reader.current_addr());
            Name::Simple(SimpleName::term(reader.read_utf8(len)?))
        }
        NameTag::Qualified => {
            let qualifier = read_qualified(reader, names)?;
            let item = read_simple(reader, names)?;
            Name::Qualified(qualifier.select(item))
        }
        NameTag::Expanded | NameTag::ExpandPrefix => {
            let prefix = read_simple(reader, names)?;
            let name = read_simple(reader, names)?;
            Name::Simple(SimpleName::Expanded {
                tag,
                prefix: Box::new(prefix),
                name: Box::new(name),
            })
        }
        NameTag::Unique => {
            let separator = read_simple(reader, names)?.to_string();
            let num = reader.read_long_nat()?;
            let originals = reader.until(end, |r| read_simple(r, names))?;
            let underlying = originals.into_iter().next().unwrap_or_else(SimpleName::empty);
            Name::Simple(SimpleName::Unique {
                separator,
                underlying: Box::new(underlying),
                num,
            })
        }
        NameTag::DefaultGetter => {
            let underlying = read_simple(reader, names)?;
            let index = reader.read_long_nat()?;
            Name::Simple(SimpleName::DefaultGetter {
                underlying: Box::new(underlying),
                index,
            })
        }
        NameTag::Signed | NameTag::TargetSigned => {
            let original = read_simple(reader, names)?;
            let target = if tag == NameTag::TargetSigned {
                read_simple(reader, names)?
            } else {
                original.clone()
            };
            let result = read_qualified(reader, names)?.map_last(SimpleName::to_type_name);
            let params = reader.until(end, |r| read_param_sig(r, names))?;
            Name::Simple(SimpleName::Signed {
                underlying: Box::new(original),
                sig: Signature::new(params, result),
                target: Box::new(target),
            })
        }
        NameTag::SuperAccessor | NameTag::InlineAccessor => Name::Simple(SimpleName::Prefixed {
            tag,
            underlying: Box::new(read_simple(reader, names)?),
        }),
        NameTag::BodyRetainer => Name::Simple(SimpleName::Suffixed {
            tag,
            underlying: Box::new(read_simple(reader, names)?),
        }),
        NameTag::ObjectClass => {
            let name_ref = read_name_ref(reader, names)?;
            match names.lookup_either(name_ref)? {
                Name::Simple(name) => Name::Simple(name.clone().with_object_suffix()),
                Name::Qualified(path) => Name::Qualified(path.clone().map_last(SimpleName::with_object_suffix)),
            }
        }
    };

    if reader.current_addr() != end {
        return Err(UnpickleError::FramingCorruption {
            context: format!("{} record at {}", tag, start),
            expected: end,
            actual: reader.current_addr(),
        });
    }
    Ok(name)
}

/// Read a name ref, rejecting refs to names not decoded yet
fn read_name_ref(reader: &mut TastyReader<'_>, names: &NameTable) -> Result<NameRef, UnpickleError> {
    let addr = reader.current_addr();
    let name_ref = NameRef(reader.read_nat()?);
    if name_ref >= names.next_ref() {
        return Err(UnpickleError::DanglingNameRef {
            name_ref,
            addr,
            decoded: names.len(),
        });
    }
    Ok(name_ref)
}

fn read_simple(reader: &mut TastyReader<'_>, names: &NameTable) -> Result<SimpleName, UnpickleError> {
    let name_ref = read_name_ref(reader, names)?;
    Ok(names.lookup_simple(name_ref)?.clone())
}

fn read_qualified(reader: &mut TastyReader<'_>, names: &NameTable) -> Result<QualifiedName, UnpickleError> {
    let name_ref = read_name_ref(reader, names)?;
    Ok(names.lookup_qualified(name_ref)?)
}

/// Negative values encode type parameter clauses, others term parameter types
fn read_param_sig(reader: &mut TastyReader<'_>, names: &NameTable) -> Result<ParamSig, UnpickleError> {
    let addr = reader.current_addr();
    let value = reader.read_int()?;
    if value < 0 {
        return Ok(ParamSig::TypeLen(u64::from(value.unsigned_abs())));
    }

    let name_ref = NameRef(value as u32);
    if name_ref >= names.next_ref() {
        return Err(UnpickleError::DanglingNameRef {
            name_ref,
            addr,
            decoded: names.len(),
        });
    }
    let type_name = names.lookup_qualified(name_ref)?.map_last(SimpleName::to_type_name);
    Ok(ParamSig::Term(type_name))
}
