//! Structural maps over type trees
//!
//! A [`TypeMap`] overrides [`TypeMap::apply`] for the node shapes it cares
//! about and hands every other node to [`walk_type`], which maps the
//! children and rebuilds the node. Nodes whose children all come back
//! pointer-equal are returned as-is, so unchanged subtrees stay shared.

use crate::ty::{Type, TypeBounds, TypeLambda, TypeRef};
use std::sync::Arc;

/// A rewrite of type trees
pub trait TypeMap {
    /// Error raised by the rewrite
    type Error;

    /// Map one node
    fn apply(&mut self, tp: &TypeRef) -> Result<TypeRef, Self::Error> {
        walk_type(self, tp)
    }
}

/// Map the children of `tp` with `map` and rebuild it
///
/// - leaves (`ParamRef`, `This`, `Any`, `Nothing`) are returned unchanged
/// - `Named` maps its prefix; a prefix-less name is returned unchanged
/// - `Applied` maps the constructor and every argument
/// - lambdas keep their binder and map bounds and body
pub fn walk_type<M: TypeMap + ?Sized>(map: &mut M, tp: &TypeRef) -> Result<TypeRef, M::Error> {
    match &**tp {
        Type::ParamRef { .. } | Type::This(_) | Type::Any | Type::Nothing => Ok(tp.clone()),

        Type::Named { prefix: None, .. } => Ok(tp.clone()),
        Type::Named {
            prefix: Some(prefix),
            name,
        } => {
            let new_prefix = map.apply(prefix)?;
            if Arc::ptr_eq(&new_prefix, prefix) {
                return Ok(tp.clone());
            }
            Ok(Arc::new(Type::Named {
                prefix: Some(new_prefix),
                name: name.clone(),
            }))
        }

        Type::Applied { tycon, args } => {
            let new_tycon = map.apply(tycon)?;
            let new_args = map_all(map, args)?;
            if Arc::ptr_eq(&new_tycon, tycon) && same_nodes(&new_args, args) {
                return Ok(tp.clone());
            }
            Ok(Arc::new(Type::Applied {
                tycon: new_tycon,
                args: new_args,
            }))
        }

        Type::Lambda(lambda) => {
            let mut changed = false;
            let mut param_bounds = Vec::with_capacity(lambda.param_bounds.len());
            for bounds in &lambda.param_bounds {
                let new_bounds = map_bounds(map, bounds)?;
                changed |= !same_bounds(&new_bounds, bounds);
                param_bounds.push(new_bounds);
            }
            let result = map.apply(&lambda.result)?;
            if !changed && Arc::ptr_eq(&result, &lambda.result) {
                return Ok(tp.clone());
            }
            Ok(Arc::new(Type::Lambda(TypeLambda {
                binder: lambda.binder,
                param_names: lambda.param_names.clone(),
                param_bounds,
                result,
            })))
        }

        Type::Bounds(bounds) => {
            let new_bounds = map_bounds(map, bounds)?;
            if same_bounds(&new_bounds, bounds) {
                return Ok(tp.clone());
            }
            Ok(Arc::new(Type::Bounds(new_bounds)))
        }

        Type::And(l, r) => {
            let (new_l, new_r) = (map.apply(l)?, map.apply(r)?);
            if Arc::ptr_eq(&new_l, l) && Arc::ptr_eq(&new_r, r) {
                return Ok(tp.clone());
            }
            Ok(Arc::new(Type::And(new_l, new_r)))
        }

        Type::Or(l, r) => {
            let (new_l, new_r) = (map.apply(l)?, map.apply(r)?);
            if Arc::ptr_eq(&new_l, l) && Arc::ptr_eq(&new_r, r) {
                return Ok(tp.clone());
            }
            Ok(Arc::new(Type::Or(new_l, new_r)))
        }
    }
}

fn map_all<M: TypeMap + ?Sized>(map: &mut M, tps: &[TypeRef]) -> Result<Vec<TypeRef>, M::Error> {
    tps.iter().map(|tp| map.apply(tp)).collect()
}

fn map_bounds<M: TypeMap + ?Sized>(map: &mut M, bounds: &TypeBounds) -> Result<TypeBounds, M::Error> {
    Ok(TypeBounds {
        low: map.apply(&bounds.low)?,
        high: map.apply(&bounds.high)?,
    })
}

fn same_nodes(a: &[TypeRef], b: &[TypeRef]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

fn same_bounds(a: &TypeBounds, b: &TypeBounds) -> bool {
    Arc::ptr_eq(&a.low, &b.low) && Arc::ptr_eq(&a.high, &b.high)
}
