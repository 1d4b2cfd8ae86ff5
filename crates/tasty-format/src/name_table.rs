//! Append-only table of decoded names
//!
//! Names are stored in decode order and referred to by small integer
//! handles. Entries never change once added.

use crate::names::{Name, QualifiedName, SimpleName};
use std::fmt;
use thiserror::Error;

/// Index of an entry in a [`NameTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameRef(pub u32);

impl NameRef {
    /// Get the raw index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameRef({})", self.0)
    }
}

/// Name table lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameTableError {
    /// A simple name was requested but a qualified path is stored
    #[error("Expected a simple name at {name_ref}, found {debug}")]
    TypeMismatch {
        /// Offending entry
        name_ref: NameRef,
        /// Debug text of the stored name
        debug: String,
    },

    /// The handle does not address a stored entry
    #[error("Invalid name reference {name_ref} (table has {len} entries)")]
    InvalidRef {
        /// Requested entry
        name_ref: NameRef,
        /// Number of entries in the table
        len: usize,
    },
}

/// Names decoded from the name section, in decode order
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: Vec<Name>,
}

impl NameTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Create a new table with preallocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
        }
    }

    /// Append a name; its handle is its position
    pub fn add(&mut self, name: impl Into<Name>) {
        self.names.push(name.into());
    }

    /// Handle the next added name will receive
    pub fn next_ref(&self) -> NameRef {
        NameRef(self.names.len() as u32)
    }

    /// Get the stored entry, whatever its shape
    pub fn lookup_either(&self, name_ref: NameRef) -> Result<&Name, NameTableError> {
        self.names
            .get(name_ref.index())
            .ok_or(NameTableError::InvalidRef {
                name_ref,
                len: self.names.len(),
            })
    }

    /// Get a simple name
    ///
    /// Fails with [`NameTableError::TypeMismatch`] if a qualified path is
    /// stored at `name_ref`.
    pub fn lookup_simple(&self, name_ref: NameRef) -> Result<&SimpleName, NameTableError> {
        match self.lookup_either(name_ref)? {
            Name::Simple(name) => Ok(name),
            qualified @ Name::Qualified(_) => Err(NameTableError::TypeMismatch {
                name_ref,
                debug: format!("{:?}", qualified),
            }),
        }
    }

    /// Get a qualified path, wrapping a stored simple name in a one-element path
    pub fn lookup_qualified(&self, name_ref: NameRef) -> Result<QualifiedName, NameTableError> {
        Ok(self.lookup_either(name_ref)?.to_qualified())
    }

    /// Get the number of stored names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over entries with their handles, in decode order
    pub fn iter(&self) -> impl Iterator<Item = (NameRef, &Name)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (NameRef(i as u32), name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_ascending_refs() {
        let mut table = NameTable::new();
        assert_eq!(table.next_ref(), NameRef(0));

        table.add(SimpleName::term("Foo"));
        table.add(QualifiedName::from_dotted("scala.Int"));
        assert_eq!(table.next_ref(), NameRef(2));
        assert_eq!(table.len(), 2);

        let refs: Vec<_> = table.iter().map(|(r, _)| r).collect();
        assert_eq!(refs, vec![NameRef(0), NameRef(1)]);
    }

    #[test]
    fn test_lookup_simple() {
        let mut table = NameTable::new();
        table.add(SimpleName::term("Foo"));

        assert_eq!(table.lookup_simple(NameRef(0)).unwrap(), &SimpleName::term("Foo"));
    }

    #[test]
    fn test_lookup_simple_on_qualified_is_mismatch() {
        let mut table = NameTable::new();
        table.add(QualifiedName::from_dotted("a.b"));

        match table.lookup_simple(NameRef(0)) {
            Err(NameTableError::TypeMismatch { name_ref, debug }) => {
                assert_eq!(name_ref, NameRef(0));
                assert!(debug.contains("Qualified"));
                assert!(debug.contains("\"b\""));
            }
            other => panic!("expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_qualified_coerces_simple() {
        let mut table = NameTable::new();
        table.add(SimpleName::term("Foo"));
        table.add(QualifiedName::from_dotted("a.b"));

        assert_eq!(table.lookup_qualified(NameRef(0)).unwrap().path(), &[SimpleName::term("Foo")]);
        assert_eq!(table.lookup_qualified(NameRef(1)).unwrap().to_string(), "a.b");
    }

    #[test]
    fn test_lookup_out_of_range() {
        let table = NameTable::new();
        assert_eq!(
            table.lookup_either(NameRef(0)),
            Err(NameTableError::InvalidRef {
                name_ref: NameRef(0),
                len: 0,
            })
        );
        assert!(table.lookup_qualified(NameRef(3)).is_err());
        assert!(table.is_empty());
    }
}
