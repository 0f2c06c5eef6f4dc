use faber_types::{is_assignable_to, types_equal, PrimitiveName, SemanticType};
use proptest::{
    prelude::{any, prop, BoxedStrategy, Just, Strategy},
    prop_oneof,
    test_runner::{Config, TestCaseError, TestRunner},
};

fn primitive_name() -> impl Strategy<Value = PrimitiveName> {
    prop_oneof![
        Just(PrimitiveName::Textus),
        Just(PrimitiveName::Numerus),
        Just(PrimitiveName::Bivalens),
        Just(PrimitiveName::Vacuum),
    ]
}

fn leaf() -> impl Strategy<Value = SemanticType> {
    prop_oneof![
        (primitive_name(), any::<bool>()).prop_map(|(n, nullable)| SemanticType::primitive(n).with_nullable(nullable)),
        Just(SemanticType::nihil()),
        Just(SemanticType::unknown()),
        (prop::sample::select(vec!["Persona", "Locus", "Res"]), any::<bool>())
            .prop_map(|(n, nullable)| SemanticType::user(n).with_nullable(nullable)),
    ]
}

fn semantic_type() -> BoxedStrategy<SemanticType> {
    leaf()
        .prop_recursive(3, 16, 3, |inner| {
            prop_oneof![
                (
                    prop::sample::select(vec!["lista", "copia", "promissum"]),
                    inner.clone(),
                    any::<bool>()
                )
                    .prop_map(|(n, p, nullable)| SemanticType::generic(n, vec![p]).with_nullable(nullable)),
                (prop::collection::vec(inner.clone(), 0..3), inner.clone(), any::<bool>())
                    .prop_map(|(ps, r, a)| SemanticType::function(ps, r, a)),
                prop::collection::vec(inner, 1..4).prop_map(SemanticType::union),
            ]
        })
        .boxed()
}

/// Types that are not unions or unknown, so the nullable rule is observable.
fn nominal_target() -> BoxedStrategy<SemanticType> {
    prop_oneof![
        (primitive_name(), any::<bool>()).prop_map(|(n, nullable)| SemanticType::primitive(n).with_nullable(nullable)),
        Just(SemanticType::nihil()),
        (prop::sample::select(vec!["Persona", "Locus"]), any::<bool>())
            .prop_map(|(n, nullable)| SemanticType::user(n).with_nullable(nullable)),
        (prop::sample::select(vec!["lista", "tabula"]), semantic_type(), any::<bool>())
            .prop_map(|(n, p, nullable)| SemanticType::generic(n, vec![p]).with_nullable(nullable)),
    ]
    .boxed()
}

fn runner() -> TestRunner {
    TestRunner::new(Config {
        cases: 256,
        ..Config::default()
    })
}

#[test]
fn unknown_absorbs_in_both_directions() {
    runner()
        .run(&semantic_type(), |t| {
            let unknown = SemanticType::unknown_because("unresolved");
            if !is_assignable_to(&unknown, &t) || !is_assignable_to(&t, &unknown) {
                return Err(TestCaseError::fail(format!("unknown not absorbed by {t}")));
            }
            Ok(())
        })
        .expect("property holds");
}

#[test]
fn nihil_assignable_iff_target_nullable() {
    runner()
        .run(&nominal_target(), |target| {
            let got = is_assignable_to(&SemanticType::nihil(), &target);
            if got != target.nullable() {
                return Err(TestCaseError::fail(format!(
                    "nihil -> {target}: got {got}, nullable {}",
                    target.nullable()
                )));
            }
            Ok(())
        })
        .expect("property holds");
}

#[test]
fn union_target_accepts_any_member() {
    let strat = (semantic_type(), semantic_type(), semantic_type());
    runner()
        .run(&strat, |(source, a, b)| {
            let target = SemanticType::Union {
                types: vec![a.clone(), b.clone()],
            };
            let expected = if source.is_unknown() || source.is_primitive(PrimitiveName::Nihil) {
                is_assignable_to(&source, &target)
            } else {
                is_assignable_to(&source, &a) || is_assignable_to(&source, &b)
            };
            if is_assignable_to(&source, &target) != expected {
                return Err(TestCaseError::fail(format!("{source} -> {target}")));
            }
            Ok(())
        })
        .expect("property holds");
}

#[test]
fn union_source_requires_every_member() {
    let strat = (semantic_type(), semantic_type(), nominal_target());
    runner()
        .run(&strat, |(a, b, target)| {
            let source = SemanticType::Union {
                types: vec![a.clone(), b.clone()],
            };
            let expected = is_assignable_to(&a, &target) && is_assignable_to(&b, &target);
            if is_assignable_to(&source, &target) != expected {
                return Err(TestCaseError::fail(format!("{source} -> {target}")));
            }
            Ok(())
        })
        .expect("property holds");
}

#[test]
fn types_equal_is_reflexive_and_implies_assignable() {
    runner()
        .run(&semantic_type(), |t| {
            if !types_equal(&t, &t.clone()) {
                return Err(TestCaseError::fail(format!("{t} not equal to itself")));
            }
            if !t.is_primitive(PrimitiveName::Nihil) && !is_assignable_to(&t, &t.clone()) {
                return Err(TestCaseError::fail(format!("{t} not assignable to itself")));
            }
            Ok(())
        })
        .expect("property holds");
}
