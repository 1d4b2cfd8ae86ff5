//! The attributes section
//!
//! A flat list of attribute tags. Tags below 128 are flags without payload;
//! tags from 128 on are followed by the name ref of a UTF-8 string.

use crate::format::{attr, ATTRIBUTES_SECTION};
use crate::name_table::{NameRef, NameTable};
use crate::reader::TastyReader;
use crate::section::SectionPlugin;
use crate::unpickler::UnpickleError;

/// Decoded file attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Compiled as part of the Scala 2 standard library
    pub scala2_standard_library: bool,
    /// Compiled with explicit nulls
    pub explicit_nulls: bool,
    /// Compiled with capture checking
    pub capture_checked: bool,
    /// Compiled with pure function types
    pub with_pure_funs: bool,
    /// Decoded from a Java source
    pub java: bool,
    /// Signature-only pickle
    pub outline: bool,
    /// Source file the pickle was produced from
    pub source_file: Option<String>,
}

/// Plugin decoding the `Attributes` section
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributesSection;

impl SectionPlugin for AttributesSection {
    type Output = Attributes;

    fn label(&self) -> &str {
        ATTRIBUTES_SECTION
    }

    fn decode(&self, mut reader: TastyReader<'_>, names: &NameTable) -> Result<Attributes, UnpickleError> {
        let mut attributes = Attributes::default();

        while !reader.is_at_end() {
            let at = reader.current_addr();
            let tag = reader.read_byte()?;
            match tag {
                attr::SCALA2_STANDARD_LIBRARY => attributes.scala2_standard_library = true,
                attr::EXPLICIT_NULLS => attributes.explicit_nulls = true,
                attr::CAPTURE_CHECKED => attributes.capture_checked = true,
                attr::WITH_PURE_FUNS => attributes.with_pure_funs = true,
                attr::JAVA => attributes.java = true,
                attr::OUTLINE => attributes.outline = true,
                attr::SOURCE_FILE => {
                    let name_ref = NameRef(reader.read_nat()?);
                    attributes.source_file = Some(names.lookup_simple(name_ref)?.to_string());
                }
                _ => {
                    return Err(UnpickleError::InvalidSection {
                        label: ATTRIBUTES_SECTION.to_string(),
                        reason: format!("unknown attribute tag {} at address {}", tag, at),
                    });
                }
            }
        }

        log::trace!("decoded attributes: {:?}", attributes);
        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::SimpleName;
    use crate::reader::TastyReader;

    #[test]
    fn test_flags_and_source_file() {
        let mut names = NameTable::new();
        names.add(SimpleName::term("Foo.scala"));

        let bytes = vec![attr::EXPLICIT_NULLS, attr::SOURCE_FILE, 0x80, attr::OUTLINE];
        let attributes = AttributesSection.decode(TastyReader::new(&bytes), &names).unwrap();

        assert!(attributes.explicit_nulls);
        assert!(attributes.outline);
        assert!(!attributes.java);
        assert_eq!(attributes.source_file.as_deref(), Some("Foo.scala"));
    }

    #[test]
    fn test_empty_section() {
        let names = NameTable::new();
        let attributes = AttributesSection.decode(TastyReader::new(&[]), &names).unwrap();
        assert_eq!(attributes, Attributes::default());
    }

    #[test]
    fn test_unknown_attribute() {
        let names = NameTable::new();
        let bytes = vec![attr::JAVA, 77];
        let result = AttributesSection.decode(TastyReader::new(&bytes), &names);
        assert!(matches!(result, Err(UnpickleError::InvalidSection { .. })));
    }

    #[test]
    fn test_source_file_dangling_ref() {
        let names = NameTable::new();
        let bytes = vec![attr::SOURCE_FILE, 0x85];
        let result = AttributesSection.decode(TastyReader::new(&bytes), &names);
        assert!(matches!(result, Err(UnpickleError::Name(_))));
    }
}
