//! Binder substitution
//!
//! Rewrites of parameter references. Both maps intercept `ParamRef` and leave
//! the rest of the tree to [`walk_type`]: named types get their prefix
//! rewritten, this-types pass through, applied types map constructor and
//! arguments.

use crate::error::TypeError;
use crate::ty::{Binder, Type, TypeRef};
use crate::type_map::{walk_type, TypeMap};
use std::convert::Infallible;

/// Re-points references to one binder at another
#[derive(Debug, Clone, Copy)]
pub struct Rebinder {
    from: Binder,
    to: Binder,
}

impl Rebinder {
    /// Create a rebinder from `from` to `to`
    pub fn new(from: Binder, to: Binder) -> Self {
        Self { from, to }
    }
}

impl TypeMap for Rebinder {
    type Error = Infallible;

    fn apply(&mut self, tp: &TypeRef) -> Result<TypeRef, Infallible> {
        match &**tp {
            Type::ParamRef { binder, index } if *binder == self.from => Ok(Type::param_ref(self.to, *index)),
            _ => walk_type(self, tp),
        }
    }
}

/// Replaces references to a binder's parameters with concrete types
#[derive(Debug, Clone, Copy)]
pub struct ParamSubstituter<'a> {
    from: Binder,
    replacements: &'a [TypeRef],
}

impl<'a> ParamSubstituter<'a> {
    /// Replace parameter `i` of `from` by `replacements[i]`
    pub fn new(from: Binder, replacements: &'a [TypeRef]) -> Self {
        Self { from, replacements }
    }
}

impl TypeMap for ParamSubstituter<'_> {
    type Error = TypeError;

    fn apply(&mut self, tp: &TypeRef) -> Result<TypeRef, TypeError> {
        match &**tp {
            Type::ParamRef { binder, index } if *binder == self.from => self
                .replacements
                .get(*index)
                .cloned()
                .ok_or(TypeError::SubstitutionIndexOutOfRange {
                    binder: self.from,
                    index: *index,
                    len: self.replacements.len(),
                }),
            _ => walk_type(self, tp),
        }
    }
}

/// Re-point every reference to `from` at `to`
///
/// References to other binders are left alone.
pub fn rebind(tp: &TypeRef, from: Binder, to: Binder) -> TypeRef {
    match Rebinder::new(from, to).apply(tp) {
        Ok(tp) => tp,
        Err(never) => match never {},
    }
}

/// Replace parameter `i` of `from` by `replacements[i]` throughout `tp`
pub fn substitute_params(tp: &TypeRef, from: Binder, replacements: &[TypeRef]) -> Result<TypeRef, TypeError> {
    log::trace!("substituting {} params of {} in {}", replacements.len(), from, tp);
    ParamSubstituter::new(from, replacements).apply(tp)
}
