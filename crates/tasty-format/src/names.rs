//! Decoded names
//!
//! A name table entry is either a [`SimpleName`] or a [`QualifiedName`]
//! (a dotted path of simple names). Derived names keep their structure so
//! later phases can tell `foo$default$1` from a user identifier that happens
//! to be spelled the same way.

use crate::format::NameTag;
use std::fmt;

/// A single name segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimpleName {
    /// Plain identifier text
    Term(String),

    /// Expanded name `prefix$$name` (or `prefix$name` for EXPANDPREFIX)
    Expanded {
        /// EXPANDED or EXPANDPREFIX
        tag: NameTag,
        /// Outer name
        prefix: Box<SimpleName>,
        /// Inner name
        name: Box<SimpleName>,
    },

    /// Compiler-generated unique name
    Unique {
        /// Separator placed before the number
        separator: String,
        /// Original name, empty when the record carried none
        underlying: Box<SimpleName>,
        /// Discriminator
        num: u64,
    },

    /// Default getter of parameter `index` of `underlying`
    DefaultGetter {
        /// Method name
        underlying: Box<SimpleName>,
        /// Zero-based parameter index
        index: u64,
    },

    /// Overloaded name disambiguated by its signature
    Signed {
        /// Original name
        underlying: Box<SimpleName>,
        /// Parameter and result shape
        sig: Signature,
        /// Name the definition is emitted under
        target: Box<SimpleName>,
    },

    /// Name behind a prefix (`super$`, `inline$`)
    Prefixed {
        /// SUPERACCESSOR or INLINEACCESSOR
        tag: NameTag,
        /// Wrapped name
        underlying: Box<SimpleName>,
    },

    /// Name in front of a suffix (`$retainedBody`)
    Suffixed {
        /// BODYRETAINER
        tag: NameTag,
        /// Wrapped name
        underlying: Box<SimpleName>,
    },

    /// Module class name of an object (`name$`)
    ObjectClass(Box<SimpleName>),

    /// Type-namespace view of a name
    Type(Box<SimpleName>),
}

impl SimpleName {
    /// Create a plain identifier
    pub fn term(text: impl Into<String>) -> Self {
        SimpleName::Term(text.into())
    }

    /// The empty name, used when a record omits an optional name
    pub fn empty() -> Self {
        SimpleName::Term(String::new())
    }

    /// Check if this is the empty name
    pub fn is_empty(&self) -> bool {
        matches!(self, SimpleName::Term(text) if text.is_empty())
    }

    /// Move this name into the type namespace
    ///
    /// Names already in the type namespace are returned unchanged.
    pub fn to_type_name(self) -> Self {
        match self {
            SimpleName::Type(_) => self,
            other => SimpleName::Type(Box::new(other)),
        }
    }

    /// Check if this name lives in the type namespace
    pub fn is_type_name(&self) -> bool {
        matches!(self, SimpleName::Type(_))
    }

    /// Append the object marker
    pub fn with_object_suffix(self) -> Self {
        match self {
            // The marker goes inside the namespace wrapper
            SimpleName::Type(inner) => SimpleName::Type(Box::new(inner.with_object_suffix())),
            other => SimpleName::ObjectClass(Box::new(other)),
        }
    }

    /// The underlying plain text, if this is a plain identifier
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SimpleName::Term(text) => Some(text),
            SimpleName::Type(inner) => inner.as_text(),
            _ => None,
        }
    }
}

impl fmt::Display for SimpleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleName::Term(text) => f.write_str(text),
            SimpleName::Expanded { tag, prefix, name } => {
                let separator = if *tag == NameTag::ExpandPrefix { "$" } else { "$$" };
                write!(f, "{}{}{}", prefix, separator, name)
            }
            SimpleName::Unique {
                separator,
                underlying,
                num,
            } => write!(f, "{}{}{}", underlying, separator, num),
            SimpleName::DefaultGetter { underlying, index } => {
                write!(f, "{}$default${}", underlying, index.saturating_add(1))
            }
            SimpleName::Signed { underlying, sig, .. } => write!(f, "{}[{}]", underlying, sig),
            SimpleName::Prefixed { tag, underlying } => match tag {
                NameTag::InlineAccessor => write!(f, "inline${}", underlying),
                _ => write!(f, "super${}", underlying),
            },
            SimpleName::Suffixed { underlying, .. } => write!(f, "{}$retainedBody", underlying),
            SimpleName::ObjectClass(underlying) => write!(f, "{}$", underlying),
            SimpleName::Type(underlying) => write!(f, "{}", underlying),
        }
    }
}

/// A non-empty dotted path of simple names
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    path: Vec<SimpleName>,
}

impl QualifiedName {
    /// A one-segment path
    pub fn single(name: SimpleName) -> Self {
        Self { path: vec![name] }
    }

    /// Build a path from segments
    ///
    /// Returns None for an empty segment list.
    pub fn from_path(path: Vec<SimpleName>) -> Option<Self> {
        if path.is_empty() {
            None
        } else {
            Some(Self { path })
        }
    }

    /// Build a path from dot-separated plain identifiers
    pub fn from_dotted(text: &str) -> Self {
        Self {
            path: text.split('.').map(SimpleName::term).collect(),
        }
    }

    /// Path segments, outermost first
    pub fn path(&self) -> &[SimpleName] {
        &self.path
    }

    /// Last segment
    pub fn last(&self) -> &SimpleName {
        // Non-empty by construction
        &self.path[self.path.len() - 1]
    }

    /// Append a segment
    pub fn select(mut self, item: SimpleName) -> Self {
        self.path.push(item);
        self
    }

    /// Rewrite the last segment
    pub fn map_last(mut self, op: impl FnOnce(SimpleName) -> SimpleName) -> Self {
        if let Some(last) = self.path.pop() {
            self.path.push(op(last));
        }
        self
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// A name table entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    /// Single segment
    Simple(SimpleName),
    /// Dotted path
    Qualified(QualifiedName),
}

impl Name {
    /// View this entry as a path, wrapping a simple name in a one-element path
    pub fn to_qualified(&self) -> QualifiedName {
        match self {
            Name::Simple(name) => QualifiedName::single(name.clone()),
            Name::Qualified(path) => path.clone(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Simple(name) => write!(f, "{}", name),
            Name::Qualified(path) => write!(f, "{}", path),
        }
    }
}

impl From<SimpleName> for Name {
    fn from(name: SimpleName) -> Self {
        Name::Simple(name)
    }
}

impl From<QualifiedName> for Name {
    fn from(path: QualifiedName) -> Self {
        Name::Qualified(path)
    }
}

/// One parameter of a [`Signature`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamSig {
    /// Term parameter, by the erased fully qualified name of its type
    Term(QualifiedName),
    /// Type parameter clause of the given length
    TypeLen(u64),
}

impl fmt::Display for ParamSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamSig::Term(name) => write!(f, "{}", name),
            ParamSig::TypeLen(len) => write!(f, "{}", len),
        }
    }
}

/// Erased shape of a method, used to tell overloads apart
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Parameters in declaration order
    pub params: Vec<ParamSig>,
    /// Erased result type name
    pub result: QualifiedName,
}

impl Signature {
    /// Create a signature
    pub fn new(params: Vec<ParamSig>, result: QualifiedName) -> Self {
        Self { params, result }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, "){}", self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_display() {
        assert_eq!(SimpleName::term("Foo").to_string(), "Foo");
        assert_eq!(QualifiedName::from_dotted("scala.collection.Seq").to_string(), "scala.collection.Seq");
    }

    #[test]
    fn test_derived_display() {
        let foo = || Box::new(SimpleName::term("foo"));

        let unique = SimpleName::Unique {
            separator: "$".to_string(),
            underlying: foo(),
            num: 3,
        };
        assert_eq!(unique.to_string(), "foo$3");

        let getter = SimpleName::DefaultGetter {
            underlying: foo(),
            index: 0,
        };
        assert_eq!(getter.to_string(), "foo$default$1");

        let expanded = SimpleName::Expanded {
            tag: NameTag::Expanded,
            prefix: Box::new(SimpleName::term("Outer")),
            name: foo(),
        };
        assert_eq!(expanded.to_string(), "Outer$$foo");

        let accessor = SimpleName::Prefixed {
            tag: NameTag::InlineAccessor,
            underlying: foo(),
        };
        assert_eq!(accessor.to_string(), "inline$foo");

        let retained = SimpleName::Suffixed {
            tag: NameTag::BodyRetainer,
            underlying: foo(),
        };
        assert_eq!(retained.to_string(), "foo$retainedBody");

        assert_eq!(SimpleName::term("Foo").with_object_suffix().to_string(), "Foo$");
    }

    #[test]
    fn test_default_getter_max_index() {
        let getter = SimpleName::DefaultGetter {
            underlying: Box::new(SimpleName::term("f")),
            index: u64::MAX,
        };
        assert_eq!(getter.to_string(), format!("f$default${}", u64::MAX));
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature::new(
            vec![
                ParamSig::TypeLen(1),
                ParamSig::Term(QualifiedName::from_dotted("scala.Int")),
            ],
            QualifiedName::from_dotted("scala.Unit"),
        );
        let signed = SimpleName::Signed {
            underlying: Box::new(SimpleName::term("apply")),
            sig,
            target: Box::new(SimpleName::term("apply")),
        };
        assert_eq!(signed.to_string(), "apply[(1,scala.Int)scala.Unit]");
    }

    #[test]
    fn test_type_name_coercion() {
        let name = SimpleName::term("Int").to_type_name();
        assert!(name.is_type_name());
        assert_eq!(name.clone().to_type_name(), name);
        assert_eq!(name.as_text(), Some("Int"));
        assert_ne!(name, SimpleName::term("Int"));
    }

    #[test]
    fn test_object_suffix_inside_type_name() {
        let name = SimpleName::term("Foo").to_type_name().with_object_suffix();
        assert_eq!(
            name,
            SimpleName::Type(Box::new(SimpleName::ObjectClass(Box::new(SimpleName::term("Foo")))))
        );
    }

    #[test]
    fn test_qualified_path_ops() {
        assert!(QualifiedName::from_path(vec![]).is_none());

        let path = QualifiedName::single(SimpleName::term("scala"))
            .select(SimpleName::term("Predef"))
            .map_last(SimpleName::with_object_suffix);
        assert_eq!(path.to_string(), "scala.Predef$");
        assert_eq!(path.last(), &SimpleName::term("Predef").with_object_suffix());
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(SimpleName::empty().is_empty());
        assert!(!SimpleName::term("x").is_empty());
        assert_eq!(SimpleName::empty().to_string(), "");
    }
}
