//! TASTy Type Trees
//!
//! Type representation for decoded TASTy programs and the binder
//! substitutions used to instantiate and copy type lambdas.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod ty;
pub mod error;
pub mod type_map;
pub mod subst;

pub use ty::{Binder, Type, TypeBounds, TypeLambda, TypeRef};
pub use error::TypeError;
pub use type_map::{walk_type, TypeMap};
pub use subst::{rebind, substitute_params, ParamSubstituter, Rebinder};
