//! Tests for member classification.

use super::*;
use crate::semantic::well_known::{COLLECTIONS_NAMESPACE, dictionary_of, list_of};
use crate::semantic::{Accessibility, Compilation, NamedType, TypeKind};
use crate::test_support::*;
use rstest::{fixture, rstest};

fn plan(mocking: InterfaceStrategy, fixture: InterfaceStrategy) -> ConfigurationPlan {
    let mut plan = ConfigurationPlan::default();
    plan.mocking.strategy = mocking;
    plan.fixture.strategy = fixture;
    plan
}

fn collection_interface(name: &str, element: TypeRef) -> TypeRef {
    TypeRef::generic(COLLECTIONS_NAMESPACE, name, TypeKind::Interface, vec![element])
}

fn service() -> TypeRef {
    TypeRef::named("Shop", "IClock", TypeKind::Interface)
}

fn tags() -> TypeRef {
    TypeRef::named("Shop", "ITagSet", TypeKind::Interface)
}

/// Snapshot declaring `IClock`, `ITagSet : ISet<string>`,
/// `OrderLines : List<int>`, `Backlog : IEnumerable<int>` without `Add` and
/// `Batch : List<int>` without a parameterless constructor.
#[fixture]
fn model() -> Compilation {
    let tag_set = NamedType {
        interfaces: vec![collection_interface("ISet", string())],
        ..interface("Shop", "ITagSet")
    };
    let lines = NamedType {
        base_type: Some(list_of(int())),
        ..class("Shop", "OrderLines")
    };
    let backlog = NamedType {
        interfaces: vec![collection_interface("IEnumerable", int())],
        ..class("Shop", "Backlog")
    };
    let batch = NamedType {
        base_type: Some(list_of(int())),
        constructors: vec![ctor(Accessibility::Public, vec![param("size", int())])],
        ..class("Shop", "Batch")
    };
    Compilation::new(
        false,
        vec![],
        vec![interface("Shop", "IClock"), tag_set, lines, backlog, batch],
    )
}

#[rstest]
#[case::none(InterfaceStrategy::None, service(), false)]
#[case::all_plain(InterfaceStrategy::All, service(), true)]
#[case::all_sequence(InterfaceStrategy::All, collection_interface("IList", int()), true)]
#[case::without_plain(InterfaceStrategy::WithoutGenericCollection, service(), true)]
#[case::without_sequence(
    InterfaceStrategy::WithoutGenericCollection,
    collection_interface("IList", int()),
    false
)]
#[case::without_user_set(InterfaceStrategy::WithoutGenericCollection, tags(), false)]
#[case::class(InterfaceStrategy::All, string(), false)]
fn mockability_follows_strategy(
    model: Compilation,
    #[case] strategy: InterfaceStrategy,
    #[case] ty: TypeRef,
    #[case] expected: bool,
) {
    let classification = classify(&model, &ty, &plan(strategy, InterfaceStrategy::None));
    assert_eq!(classification.mockable, expected);
}

#[rstest]
fn mocking_takes_precedence_over_faking(model: Compilation) {
    let classification = classify(
        &model,
        &service(),
        &plan(InterfaceStrategy::All, InterfaceStrategy::All),
    );
    assert!(classification.mockable);
    assert!(!classification.fakeable);
    assert!(!classification.needs_explicit_default);
}

#[rstest]
#[case::plain_value(int(), InterfaceStrategy::All, true)]
#[case::sequence_all(collection_interface("IEnumerable", int()), InterfaceStrategy::All, true)]
#[case::sequence_without(
    collection_interface("IEnumerable", int()),
    InterfaceStrategy::WithoutGenericCollection,
    false
)]
#[case::concrete_list_without(list_of(int()), InterfaceStrategy::WithoutGenericCollection, true)]
#[case::disabled(int(), InterfaceStrategy::None, false)]
fn fakeability_is_evaluated_independently(
    model: Compilation,
    #[case] ty: TypeRef,
    #[case] strategy: InterfaceStrategy,
    #[case] expected: bool,
) {
    let classification = classify(&model, &ty, &plan(InterfaceStrategy::None, strategy));
    assert_eq!(classification.fakeable, expected);
    assert_eq!(classification.needs_explicit_default, !expected);
}

#[rstest]
fn string_is_not_a_sequence(model: Compilation) {
    let classification = classify(&model, &string(), &ConfigurationPlan::default());
    assert_eq!(classification.collection, None);
    assert!(classification.needs_explicit_default);
}

#[rstest]
#[case::interface_list(
    collection_interface("IReadOnlyList", string()),
    CollectionKind::InterfaceSequence { element: string(), set_like: false }
)]
#[case::interface_set(
    collection_interface("ISet", int()),
    CollectionKind::InterfaceSequence { element: int(), set_like: true }
)]
#[case::user_set(tags(), CollectionKind::InterfaceSequence { element: string(), set_like: true })]
#[case::concrete_list(list_of(int()), CollectionKind::ConcreteSequence { element: int() })]
#[case::derived_list(
    TypeRef::named("Shop", "OrderLines", TypeKind::Class),
    CollectionKind::ConcreteSequence { element: int() }
)]
#[case::array(TypeRef::array_of(string()), CollectionKind::Array { element: string() })]
#[case::interface_map(
    TypeRef::generic(COLLECTIONS_NAMESPACE, "IReadOnlyDictionary", TypeKind::Interface, vec![string(), int()]),
    CollectionKind::InterfaceMap { key: string(), value: int() }
)]
#[case::concrete_map(
    dictionary_of(int(), string()),
    CollectionKind::ConcreteMap { key: int(), value: string() }
)]
fn collections_are_detected(
    model: Compilation,
    #[case] ty: TypeRef,
    #[case] expected: CollectionKind,
) {
    let classification = classify(&model, &ty, &ConfigurationPlan::default());
    assert_eq!(classification.collection, Some(expected));
}

#[rstest]
#[case::without_add(TypeRef::named("Shop", "Backlog", TypeKind::Class))]
#[case::without_parameterless_constructor(TypeRef::named("Shop", "Batch", TypeKind::Class))]
fn concrete_sequences_need_add_and_a_parameterless_constructor(
    model: Compilation,
    #[case] ty: TypeRef,
) {
    let classification = classify(&model, &ty, &ConfigurationPlan::default());
    assert_eq!(classification.collection, None);
    assert!(classification.needs_explicit_default);
}

#[rstest]
fn nullable_annotation_does_not_hide_collections(model: Compilation) {
    let ty = collection_interface("IList", int()).into_nullable();
    let classification = classify(&model, &ty, &ConfigurationPlan::default());
    assert_eq!(
        classification.collection,
        Some(CollectionKind::InterfaceSequence {
            element: int(),
            set_like: false
        })
    );
}

#[test]
fn backing_types_match_the_declared_shape() {
    let set = CollectionKind::InterfaceSequence {
        element: int(),
        set_like: true,
    };
    assert_eq!(
        set.backing_type(&collection_interface("ISet", int())).simple_display(),
        "HashSet<int>"
    );
    let map = CollectionKind::InterfaceMap {
        key: string(),
        value: int(),
    };
    assert_eq!(map.backing_type(&service()).simple_display(), "Dictionary<string, int>");
    assert_eq!(map.item_type().simple_display(), "KeyValuePair<string, int>");
    let concrete = CollectionKind::ConcreteSequence { element: int() };
    assert_eq!(
        concrete.backing_type(&list_of(int()).into_nullable()).simple_display(),
        "List<int>"
    );
}

#[rstest]
fn classification_is_repeatable(model: Compilation) {
    let plan = plan(
        InterfaceStrategy::WithoutGenericCollection,
        InterfaceStrategy::All,
    );
    let first = classify(&model, &tags(), &plan);
    let second = classify(&model, &tags(), &plan);
    assert_eq!(first, second);
}
