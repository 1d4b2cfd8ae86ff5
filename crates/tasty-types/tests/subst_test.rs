use std::sync::Arc;
use tasty_format::{QualifiedName, SimpleName};
use tasty_types::{rebind, substitute_params, Binder, Type, TypeBounds, TypeError, TypeLambda, TypeRef};

/// `p.this.Outer[A.0, A.1 | Int] & A.0.Elem`
fn sample(a: Binder) -> TypeRef {
    let outer = Type::select(Type::this(QualifiedName::from_dotted("p")), "Outer");
    Type::and(
        Type::applied(outer, vec![Type::param_ref(a, 0), Type::or(Type::param_ref(a, 1), Type::named("Int"))]),
        Type::select(Type::param_ref(a, 0), "Elem"),
    )
}

/// A tree with no parameter references at all
fn closed() -> TypeRef {
    Type::applied(
        Type::select(Type::this(QualifiedName::from_dotted("scala.collection")), "Map"),
        vec![Type::named("String"), Type::and(Type::any(), Type::nothing())],
    )
}

#[test]
fn test_substitute_without_target_binder_is_identity() {
    let a = Binder::fresh();
    let unrelated = Binder::fresh();
    let tp = sample(a);

    let result = substitute_params(&tp, unrelated, &[Type::named("X")]).unwrap();
    assert_eq!(result, tp);

    let result = substitute_params(&closed(), a, &[]).unwrap();
    assert_eq!(result, closed());
}

#[test]
fn test_rebind_without_target_binder_is_identity() {
    let tp = closed();
    let result = rebind(&tp, Binder::fresh(), Binder::fresh());
    assert_eq!(result, tp);
    assert!(Arc::ptr_eq(&result, &tp));
}

#[test]
fn test_rebind_roundtrip() {
    let (a, b) = (Binder::fresh(), Binder::fresh());
    let tp = sample(a);

    let there = rebind(&tp, a, b);
    assert_ne!(there, tp);
    assert!(there.references(b));
    assert!(!there.references(a));

    let back = rebind(&there, b, a);
    assert_eq!(back, tp);
}

#[test]
fn test_substitute_sample() {
    let a = Binder::fresh();
    let result = substitute_params(&sample(a), a, &[Type::named("Node"), Type::named("String")]).unwrap();

    assert_eq!(result.to_string(), "p.this.Outer[Node, String | Int] & Node.Elem");
    assert!(!result.references(a));
}

#[test]
fn test_substitute_out_of_range() {
    let a = Binder::fresh();
    let tp = Type::applied(Type::named("F"), vec![Type::param_ref(a, 2)]);

    let result = substitute_params(&tp, a, &[Type::named("X"), Type::named("Y")]);
    assert!(matches!(
        result,
        Err(TypeError::SubstitutionIndexOutOfRange { index: 2, len: 2, .. })
    ));
}

#[test]
fn test_prefixless_named_unchanged() {
    let a = Binder::fresh();
    let tp = Type::named("Int");

    let result = substitute_params(&tp, a, &[Type::any()]).unwrap();
    assert!(Arc::ptr_eq(&tp, &result));
    assert!(Arc::ptr_eq(&rebind(&tp, a, Binder::fresh()), &tp));
}

#[test]
fn test_substitution_does_not_mutate_input() {
    let a = Binder::fresh();
    let tp = sample(a);
    let before = tp.to_string();

    let _ = substitute_params(&tp, a, &[Type::any(), Type::any()]).unwrap();
    let _ = rebind(&tp, a, Binder::fresh());
    assert_eq!(tp.to_string(), before);
}

#[test]
fn test_nested_lambda_keeps_inner_binder() {
    let outer = Binder::fresh();
    let inner = TypeLambda::new(vec![SimpleName::term("Y")], |binder| {
        (
            vec![TypeBounds::new(Type::nothing(), Type::param_ref(outer, 0))],
            Type::applied(Type::param_ref(outer, 0), vec![Type::param_ref(binder, 0)]),
        )
    });
    let inner_binder = inner.binder;
    let tp: TypeRef = Arc::new(Type::Lambda(inner));

    let result = substitute_params(&tp, outer, &[Type::named("List")]).unwrap();
    match &*result {
        Type::Lambda(lambda) => {
            assert_eq!(lambda.binder, inner_binder);
            assert_eq!(lambda.param_bounds[0].high, Type::named("List"));
            assert_eq!(lambda.result, Type::applied(Type::named("List"), vec![Type::param_ref(inner_binder, 0)]));
        }
        other => panic!("expected a lambda, got {}", other),
    }
}

#[test]
fn test_substitution_across_threads() {
    let a = Binder::fresh();
    let tp = sample(a);

    let handles: Vec<_> = ["A", "B", "C"]
        .into_iter()
        .map(|name| {
            let tp = tp.clone();
            std::thread::spawn(move || substitute_params(&tp, a, &[Type::named(name), Type::named(name)]))
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap().unwrap();
        assert!(!result.references(a));
    }
}
