//! TASTy format constants
//!
//! Magic number, format version and the tag numbering of name records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Magic number opening every TASTy file
pub const MAGIC: [u8; 4] = [0x5C, 0xA1, 0xAB, 0x1F];

/// Length of the UUID stored at the end of the header
pub const UUID_LEN: usize = 16;

/// Label of the section holding pickled trees
pub const ASTS_SECTION: &str = "ASTs";

/// Label of the section holding source positions
pub const POSITIONS_SECTION: &str = "Positions";

/// Label of the section holding doc comments
pub const COMMENTS_SECTION: &str = "Comments";

/// Label of the section holding file attributes
pub const ATTRIBUTES_SECTION: &str = "Attributes";

/// A TASTy format version
///
/// The version a reader understands is its configuration: files are only
/// accepted when [`TastyVersion::accepts`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TastyVersion {
    /// Major version, must match exactly
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Experimental version (0 for stable releases)
    pub experimental: u32,
}

impl TastyVersion {
    /// Version produced by the current compiler release
    pub const CURRENT: TastyVersion = TastyVersion::new(28, 3, 0);

    /// Create a version triple
    pub const fn new(major: u32, minor: u32, experimental: u32) -> Self {
        Self {
            major,
            minor,
            experimental,
        }
    }

    /// Is this an experimental (unstable) version?
    pub fn is_experimental(&self) -> bool {
        self.experimental != 0
    }

    /// Can a reader at version `self` decode a file written at `file`?
    ///
    /// Stable files are readable by any reader of the same major version
    /// with a newer minor version, or the same minor version if the reader
    /// is stable too. Experimental files are only readable by the exact
    /// same version.
    pub fn accepts(&self, file: &TastyVersion) -> bool {
        if file.major != self.major {
            return false;
        }
        if file.is_experimental() {
            file.minor == self.minor && file.experimental == self.experimental
        } else {
            file.minor < self.minor || (file.minor == self.minor && !self.is_experimental())
        }
    }
}

impl Default for TastyVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for TastyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.is_experimental() {
            write!(f, "-experimental-{}", self.experimental)?;
        }
        Ok(())
    }
}

/// Tag byte opening a record of the name section
///
/// Tags are grouped the way the format groups them:
/// - 1-4: plain and path-like names
/// - 10-11: numbered names
/// - 20-23: prefix/suffix wrappers
/// - 62-63: signed names
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameTag {
    /// UTF-8 encoded identifier (payload: raw bytes)
    Utf8 = 1,
    /// Qualified path `qualifier.selector`
    Qualified = 2,
    /// Expanded name `prefix$$name`
    Expanded = 3,
    /// Expanded prefix `prefix$name`
    ExpandPrefix = 4,

    /// Unique name `underlying{separator}{num}`
    Unique = 10,
    /// Default getter for parameter `index`
    DefaultGetter = 11,

    /// `super$` accessor
    SuperAccessor = 20,
    /// `inline$` accessor
    InlineAccessor = 21,
    /// Retained body of an inline method
    BodyRetainer = 22,
    /// Module class of an object
    ObjectClass = 23,

    /// Signed name with an explicit target name
    TargetSigned = 62,
    /// Signed name (overload disambiguation)
    Signed = 63,
}

impl NameTag {
    /// Convert byte to tag
    ///
    /// Returns None if the byte is not a name tag of this format version.
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Utf8),
            2 => Some(Self::Qualified),
            3 => Some(Self::Expanded),
            4 => Some(Self::ExpandPrefix),
            10 => Some(Self::Unique),
            11 => Some(Self::DefaultGetter),
            20 => Some(Self::SuperAccessor),
            21 => Some(Self::InlineAccessor),
            22 => Some(Self::BodyRetainer),
            23 => Some(Self::ObjectClass),
            62 => Some(Self::TargetSigned),
            63 => Some(Self::Signed),
            _ => None,
        }
    }

    /// Convert tag to byte
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Tag name as written in the format description
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF8",
            Self::Qualified => "QUALIFIED",
            Self::Expanded => "EXPANDED",
            Self::ExpandPrefix => "EXPANDPREFIX",
            Self::Unique => "UNIQUE",
            Self::DefaultGetter => "DEFAULTGETTER",
            Self::SuperAccessor => "SUPERACCESSOR",
            Self::InlineAccessor => "INLINEACCESSOR",
            Self::BodyRetainer => "BODYRETAINER",
            Self::ObjectClass => "OBJECTCLASS",
            Self::TargetSigned => "TARGETSIGNED",
            Self::Signed => "SIGNED",
        }
    }

    /// Check if this tag wraps a name behind a prefix
    pub fn is_prefix(self) -> bool {
        matches!(self, Self::SuperAccessor | Self::InlineAccessor)
    }

    /// Check if this tag wraps a name in front of a suffix
    pub fn is_suffix(self) -> bool {
        matches!(self, Self::BodyRetainer)
    }
}

impl fmt::Display for NameTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute tags of the attributes section
pub mod attr {
    /// Compiled as part of the Scala 2 standard library
    pub const SCALA2_STANDARD_LIBRARY: u8 = 1;
    /// Compiled with explicit nulls
    pub const EXPLICIT_NULLS: u8 = 2;
    /// Compiled with capture checking
    pub const CAPTURE_CHECKED: u8 = 3;
    /// Compiled with pure function types
    pub const WITH_PURE_FUNS: u8 = 4;
    /// Decoded from a Java source
    pub const JAVA: u8 = 5;
    /// Outline (signature-only) pickle
    pub const OUTLINE: u8 = 6;

    /// Source file name (payload: UTF-8 name ref)
    pub const SOURCE_FILE: u8 = 128;
}
