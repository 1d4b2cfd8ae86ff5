//! Core type definitions
//!
//! Types are immutable trees of shared nodes. Type lambdas own a [`Binder`]
//! and their parameters are referenced positionally through it, so two
//! lambdas never capture each other's parameters.

use crate::error::TypeError;
use crate::subst::{rebind, substitute_params};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tasty_format::{QualifiedName, SimpleName};

static NEXT_BINDER: AtomicU32 = AtomicU32::new(0);

/// Identity of a parameter-introducing type
///
/// Two binders are equal only if they come from the same call to
/// [`Binder::fresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binder(u32);

impl Binder {
    /// Mint a binder distinct from every other
    pub fn fresh() -> Self {
        Binder(NEXT_BINDER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw identifier
    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to a type node
pub type TypeRef = Arc<Type>;

/// Lower and upper bound of a type parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeBounds {
    /// Lower bound
    pub low: TypeRef,
    /// Upper bound
    pub high: TypeRef,
}

impl TypeBounds {
    /// Create bounds
    pub fn new(low: TypeRef, high: TypeRef) -> Self {
        Self { low, high }
    }

    /// `>: Nothing <: Any`
    pub fn unbounded() -> Self {
        Self::new(Type::nothing(), Type::any())
    }
}

/// Type lambda: `[X, Y] =>> R`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeLambda {
    /// Identity of this lambda's parameters
    pub binder: Binder,
    /// Parameter names, for display only
    pub param_names: Vec<SimpleName>,
    /// Parameter bounds, in parameter order
    pub param_bounds: Vec<TypeBounds>,
    /// Body
    pub result: TypeRef,
}

impl TypeLambda {
    /// Create a lambda over `param_names`
    ///
    /// `build` receives the new binder and returns the bounds and the body,
    /// which refer to the parameters through [`Type::param_ref`].
    pub fn new(
        param_names: Vec<SimpleName>,
        build: impl FnOnce(Binder) -> (Vec<TypeBounds>, TypeRef),
    ) -> Self {
        let binder = Binder::fresh();
        let (param_bounds, result) = build(binder);
        Self {
            binder,
            param_names,
            param_bounds,
            result,
        }
    }

    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.param_names.len()
    }

    /// Reference to parameter `index`
    pub fn param_ref(&self, index: usize) -> TypeRef {
        Type::param_ref(self.binder, index)
    }

    /// Apply the lambda to `args`, returning the body with parameters replaced
    pub fn instantiate(&self, args: &[TypeRef]) -> Result<TypeRef, TypeError> {
        if args.len() != self.arity() {
            return Err(TypeError::ArityMismatch {
                expected: self.arity(),
                actual: args.len(),
            });
        }
        substitute_params(&self.result, self.binder, args)
    }

    /// Copy of this lambda with a new binder
    pub fn fresh_copy(&self) -> Self {
        let binder = Binder::fresh();
        let param_bounds = self
            .param_bounds
            .iter()
            .map(|bounds| TypeBounds {
                low: rebind(&bounds.low, self.binder, binder),
                high: rebind(&bounds.high, self.binder, binder),
            })
            .collect();
        Self {
            binder,
            param_names: self.param_names.clone(),
            param_bounds,
            result: rebind(&self.result, self.binder, binder),
        }
    }
}

/// A type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Parameter `index` of the lambda owning `binder`
    ParamRef {
        /// Owning binder
        binder: Binder,
        /// Parameter position
        index: usize,
    },

    /// Named type, optionally selected from a prefix: `p.T`
    Named {
        /// Prefix the name is selected from
        prefix: Option<TypeRef>,
        /// Selected name
        name: SimpleName,
    },

    /// `C.this` for an enclosing class
    This(QualifiedName),

    /// Applied type constructor: `F[A, B]`
    Applied {
        /// Constructor
        tycon: TypeRef,
        /// Arguments
        args: Vec<TypeRef>,
    },

    /// Type lambda
    Lambda(TypeLambda),

    /// Bounds of an abstract type
    Bounds(TypeBounds),

    /// Intersection: `A & B`
    And(TypeRef, TypeRef),

    /// Union: `A | B`
    Or(TypeRef, TypeRef),

    /// Top type
    Any,

    /// Bottom type
    Nothing,
}

impl Type {
    /// Create a parameter reference
    pub fn param_ref(binder: Binder, index: usize) -> TypeRef {
        Arc::new(Type::ParamRef { binder, index })
    }

    /// Create a named type without prefix
    pub fn named(name: impl Into<String>) -> TypeRef {
        Arc::new(Type::Named {
            prefix: None,
            name: SimpleName::term(name).to_type_name(),
        })
    }

    /// Create a named type selected from `prefix`
    pub fn select(prefix: TypeRef, name: impl Into<String>) -> TypeRef {
        Arc::new(Type::Named {
            prefix: Some(prefix),
            name: SimpleName::term(name).to_type_name(),
        })
    }

    /// Create a this-type
    pub fn this(class: QualifiedName) -> TypeRef {
        Arc::new(Type::This(class))
    }

    /// Create an applied type
    pub fn applied(tycon: TypeRef, args: Vec<TypeRef>) -> TypeRef {
        Arc::new(Type::Applied { tycon, args })
    }

    /// Create an intersection
    pub fn and(left: TypeRef, right: TypeRef) -> TypeRef {
        Arc::new(Type::And(left, right))
    }

    /// Create a union
    pub fn or(left: TypeRef, right: TypeRef) -> TypeRef {
        Arc::new(Type::Or(left, right))
    }

    /// The top type
    pub fn any() -> TypeRef {
        Arc::new(Type::Any)
    }

    /// The bottom type
    pub fn nothing() -> TypeRef {
        Arc::new(Type::Nothing)
    }

    /// Check if `binder`'s parameters occur anywhere in this type
    pub fn references(&self, binder: Binder) -> bool {
        match self {
            Type::ParamRef { binder: b, .. } => *b == binder,
            Type::Named { prefix, .. } => prefix.as_ref().is_some_and(|p| p.references(binder)),
            Type::This(_) | Type::Any | Type::Nothing => false,
            Type::Applied { tycon, args } => {
                tycon.references(binder) || args.iter().any(|arg| arg.references(binder))
            }
            Type::Lambda(lambda) => {
                lambda
                    .param_bounds
                    .iter()
                    .any(|b| b.low.references(binder) || b.high.references(binder))
                    || lambda.result.references(binder)
            }
            Type::Bounds(bounds) => bounds.low.references(binder) || bounds.high.references(binder),
            Type::And(l, r) | Type::Or(l, r) => l.references(binder) || r.references(binder),
        }
    }
}

impl fmt::Display for TypeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">: {} <: {}", self.low, self.high)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::ParamRef { binder, index } => write!(f, "{}.{}", binder, index),
            Type::Named { prefix, name } => match prefix {
                Some(prefix) => write!(f, "{}.{}", prefix, name),
                None => write!(f, "{}", name),
            },
            Type::This(class) => write!(f, "{}.this", class),
            Type::Applied { tycon, args } => {
                write!(f, "{}[", tycon)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "]")
            }
            Type::Lambda(lambda) => {
                write!(f, "[")?;
                for (i, name) in lambda.param_names.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", name)?;
                }
                write!(f, "] =>> {}", lambda.result)
            }
            Type::Bounds(bounds) => write!(f, "{}", bounds),
            Type::And(l, r) => write!(f, "{} & {}", l, r),
            Type::Or(l, r) => write!(f, "{} | {}", l, r),
            Type::Any => write!(f, "Any"),
            Type::Nothing => write!(f, "Nothing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_binders_differ() {
        let a = Binder::fresh();
        let b = Binder::fresh();
        assert_ne!(a, b);
        assert_eq!(a, a);
        assert_ne!(Type::param_ref(a, 0), Type::param_ref(b, 0));
    }

    #[test]
    fn test_type_display() {
        let list = Type::select(Type::this(QualifiedName::from_dotted("scala")), "List");
        let ty = Type::applied(list, vec![Type::or(Type::named("Int"), Type::nothing())]);
        assert_eq!(ty.to_string(), "scala.this.List[Int | Nothing]");
        assert_eq!(TypeBounds::unbounded().to_string(), ">: Nothing <: Any");
    }

    #[test]
    fn test_references() {
        let lambda = TypeLambda::new(vec![SimpleName::term("X")], |binder| {
            (
                vec![TypeBounds::unbounded()],
                Type::applied(Type::named("List"), vec![Type::param_ref(binder, 0)]),
            )
        });
        assert!(lambda.result.references(lambda.binder));
        assert!(!lambda.result.references(Binder::fresh()));
        assert!(!Type::named("Int").references(lambda.binder));
    }

    #[test]
    fn test_instantiate() {
        let lambda = TypeLambda::new(vec![SimpleName::term("K"), SimpleName::term("V")], |binder| {
            (
                vec![TypeBounds::unbounded(), TypeBounds::unbounded()],
                Type::applied(
                    Type::named("Map"),
                    vec![Type::param_ref(binder, 0), Type::param_ref(binder, 1)],
                ),
            )
        });

        let result = lambda.instantiate(&[Type::named("String"), Type::named("Int")]).unwrap();
        assert_eq!(result.to_string(), "Map[String, Int]");
        assert!(!result.references(lambda.binder));
    }

    #[test]
    fn test_instantiate_arity_mismatch() {
        let lambda = TypeLambda::new(vec![SimpleName::term("X")], |binder| {
            (vec![TypeBounds::unbounded()], Type::param_ref(binder, 0))
        });

        assert_eq!(
            lambda.instantiate(&[]),
            Err(TypeError::ArityMismatch {
                expected: 1,
                actual: 0,
            })
        );
    }

    #[test]
    fn test_fresh_copy() {
        let lambda = TypeLambda::new(vec![SimpleName::term("X")], |binder| {
            (
                vec![TypeBounds::new(Type::nothing(), Type::param_ref(binder, 0))],
                Type::param_ref(binder, 0),
            )
        });
        let copy = lambda.fresh_copy();

        assert_ne!(copy.binder, lambda.binder);
        assert_eq!(copy.param_names, lambda.param_names);
        assert_eq!(copy.result, copy.param_ref(0));
        assert!(copy.param_bounds[0].high.references(copy.binder));
        assert!(!copy.result.references(lambda.binder));
    }
}
