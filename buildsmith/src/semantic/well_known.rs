//! Built-in knowledge of the base-library collection family.
//!
//! Snapshots rarely include framework types, yet collection detection has
//! to walk their interface graph. These synthetic definitions stand in for
//! the framework declarations whenever the snapshot lacks them.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{Method, NamedType, Parameter, TypeKind, TypeParameter, TypeRef};

/// Namespace of the generic collection types.
pub const COLLECTIONS_NAMESPACE: &str = "System.Collections.Generic";

/// Namespace of `Collection<T>`.
const OBJECT_MODEL_NAMESPACE: &str = "System.Collections.ObjectModel";

/// Name of the method that appends one item to a concrete sequence.
pub const ADD_METHOD: &str = "Add";

/// Definition key of `IEnumerable<T>`.
pub const ENUMERABLE_KEY: &str = "System.Collections.Generic.IEnumerable`1";

/// Definition keys of the set-like interfaces.
pub const SET_KEYS: [&str; 2] = [
    "System.Collections.Generic.ISet`1",
    "System.Collections.Generic.IReadOnlySet`1",
];

/// Definition keys of the keyed-map interfaces.
pub const MAP_KEYS: [&str; 2] = [
    "System.Collections.Generic.IDictionary`2",
    "System.Collections.Generic.IReadOnlyDictionary`2",
];

static DEFINITIONS: LazyLock<HashMap<String, NamedType>> = LazyLock::new(|| {
    let t = || vec![TypeRef::type_parameter("T")];
    let kv = || {
        vec![
            TypeRef::type_parameter("TKey"),
            TypeRef::type_parameter("TValue"),
        ]
    };
    let pair = || {
        vec![TypeRef::generic(
            COLLECTIONS_NAMESPACE,
            "KeyValuePair",
            TypeKind::Struct,
            kv(),
        )]
    };
    let iface = |name: &str, args: Vec<TypeRef>| {
        TypeRef::generic(COLLECTIONS_NAMESPACE, name, TypeKind::Interface, args)
    };

    let definitions = [
        interface("IEnumerable", &["T"], vec![]),
        interface("ICollection", &["T"], vec![iface("IEnumerable", t())]),
        interface("IList", &["T"], vec![iface("ICollection", t())]),
        interface(
            "IReadOnlyCollection",
            &["T"],
            vec![iface("IEnumerable", t())],
        ),
        interface(
            "IReadOnlyList",
            &["T"],
            vec![iface("IReadOnlyCollection", t())],
        ),
        interface("ISet", &["T"], vec![iface("ICollection", t())]),
        interface(
            "IReadOnlySet",
            &["T"],
            vec![iface("IReadOnlyCollection", t())],
        ),
        interface(
            "IDictionary",
            &["TKey", "TValue"],
            vec![iface("ICollection", pair())],
        ),
        interface(
            "IReadOnlyDictionary",
            &["TKey", "TValue"],
            vec![iface("IReadOnlyCollection", pair())],
        ),
        appendable(class(
            COLLECTIONS_NAMESPACE,
            "List",
            &["T"],
            vec![iface("IList", t()), iface("IReadOnlyList", t())],
        )),
        appendable(class(
            COLLECTIONS_NAMESPACE,
            "HashSet",
            &["T"],
            vec![iface("ISet", t()), iface("IReadOnlySet", t())],
        )),
        appendable(class(
            COLLECTIONS_NAMESPACE,
            "SortedSet",
            &["T"],
            vec![iface("ISet", t()), iface("IReadOnlySet", t())],
        )),
        appendable(class(
            OBJECT_MODEL_NAMESPACE,
            "Collection",
            &["T"],
            vec![iface("IList", t()), iface("IReadOnlyList", t())],
        )),
        class(
            COLLECTIONS_NAMESPACE,
            "Dictionary",
            &["TKey", "TValue"],
            vec![iface("IDictionary", kv()), iface("IReadOnlyDictionary", kv())],
        ),
        class(
            COLLECTIONS_NAMESPACE,
            "SortedDictionary",
            &["TKey", "TValue"],
            vec![iface("IDictionary", kv()), iface("IReadOnlyDictionary", kv())],
        ),
    ];
    definitions.into_iter().map(|ty| (ty.key(), ty)).collect()
});

fn params(names: &[&str]) -> Vec<TypeParameter> {
    names
        .iter()
        .map(|name| TypeParameter {
            name: (*name).to_owned(),
            ..TypeParameter::default()
        })
        .collect()
}

fn interface(name: &str, type_params: &[&str], interfaces: Vec<TypeRef>) -> NamedType {
    NamedType {
        name: name.to_owned(),
        namespace: COLLECTIONS_NAMESPACE.to_owned(),
        kind: TypeKind::Interface,
        is_abstract: true,
        type_parameters: params(type_params),
        interfaces,
        ..NamedType::default()
    }
}

/// Adds the `Add(T item)` instance method of the sequence classes.
fn appendable(mut ty: NamedType) -> NamedType {
    ty.methods.push(Method {
        name: ADD_METHOD.to_owned(),
        parameters: vec![Parameter {
            name: "item".to_owned(),
            type_ref: TypeRef::type_parameter("T"),
        }],
        is_static: false,
        location: None,
    });
    ty
}

fn class(namespace: &str, name: &str, type_params: &[&str], interfaces: Vec<TypeRef>) -> NamedType {
    NamedType {
        name: name.to_owned(),
        namespace: namespace.to_owned(),
        kind: TypeKind::Class,
        type_parameters: params(type_params),
        interfaces,
        ..NamedType::default()
    }
}

/// Synthetic framework definition for `key`, if one is known.
#[must_use]
pub fn definition(key: &str) -> Option<&'static NamedType> {
    DEFINITIONS.get(key)
}

/// `List<element>`.
#[must_use]
pub fn list_of(element: TypeRef) -> TypeRef {
    TypeRef::generic(COLLECTIONS_NAMESPACE, "List", TypeKind::Class, vec![element])
}

/// `HashSet<element>`.
#[must_use]
pub fn hash_set_of(element: TypeRef) -> TypeRef {
    TypeRef::generic(COLLECTIONS_NAMESPACE, "HashSet", TypeKind::Class, vec![element])
}

/// `Dictionary<key, value>`.
#[must_use]
pub fn dictionary_of(key: TypeRef, value: TypeRef) -> TypeRef {
    TypeRef::generic(
        COLLECTIONS_NAMESPACE,
        "Dictionary",
        TypeKind::Class,
        vec![key, value],
    )
}

/// `KeyValuePair<key, value>`.
#[must_use]
pub fn key_value_pair_of(key: TypeRef, value: TypeRef) -> TypeRef {
    TypeRef::generic(
        COLLECTIONS_NAMESPACE,
        "KeyValuePair",
        TypeKind::Struct,
        vec![key, value],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_reaches_enumerable_through_its_interfaces() {
        let list = definition("System.Collections.Generic.List`1");
        let direct: Vec<String> = list
            .map(|ty| ty.interfaces.iter().map(TypeRef::definition_key).collect())
            .unwrap_or_default();
        assert_eq!(
            direct,
            vec![
                "System.Collections.Generic.IList`1",
                "System.Collections.Generic.IReadOnlyList`1"
            ]
        );
    }

    #[test]
    fn dictionary_family_is_registered() {
        for key in MAP_KEYS {
            assert!(definition(key).is_some(), "{key} missing");
        }
        assert!(definition("System.Collections.Generic.Dictionary`1").is_none());
    }

    #[test]
    fn sequence_classes_expose_add() {
        let adds = |key: &str| {
            definition(key).is_some_and(|ty| ty.methods.iter().any(|m| m.name == ADD_METHOD))
        };
        assert!(adds("System.Collections.Generic.List`1"));
        assert!(adds("System.Collections.ObjectModel.Collection`1"));
        assert!(!adds("System.Collections.Generic.IList`1"));
    }
}
