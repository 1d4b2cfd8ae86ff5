//! TASTy File Decoding
//!
//! This crate reads the container layer of TASTy typed-AST files: the
//! versioned header, the name table every other part of the file refers
//! to, and the index of labelled sections that section plugins decode.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod format;
pub mod reader;
pub mod writer;
pub mod header;
pub mod names;
pub mod name_table;
pub mod section;
pub mod attributes;
pub mod unpickler;

pub use format::{NameTag, TastyVersion};
pub use reader::{Addr, DecodeError, TastyReader};
pub use writer::TastyWriter;
pub use header::{check_header, HeaderError, TastyHeader};
pub use names::{Name, ParamSig, QualifiedName, Signature, SimpleName};
pub use name_table::{NameRef, NameTable, NameTableError};
pub use section::{RawSection, Section, SectionPlugin};
pub use attributes::{Attributes, AttributesSection};
pub use unpickler::{UnpickleError, Unpickler};
