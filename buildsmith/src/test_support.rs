//! Snapshot fixtures shared by the unit tests.

use crate::semantic::{
    Accessibility, AttributeData, AttributeValue, Constructor, Field, Method, NamedType, Parameter,
    Property, TypeKind, TypeRef,
};

pub fn int() -> TypeRef {
    TypeRef::keyword("int")
}

pub fn string() -> TypeRef {
    TypeRef::keyword("string")
}

pub fn class(namespace: &str, name: &str) -> NamedType {
    NamedType {
        name: name.to_owned(),
        namespace: namespace.to_owned(),
        kind: TypeKind::Class,
        ..NamedType::default()
    }
}

pub fn interface(namespace: &str, name: &str) -> NamedType {
    NamedType {
        kind: TypeKind::Interface,
        is_abstract: true,
        ..class(namespace, name)
    }
}

pub fn param(name: &str, type_ref: TypeRef) -> Parameter {
    Parameter {
        name: name.to_owned(),
        type_ref,
    }
}

pub fn ctor(accessibility: Accessibility, parameters: Vec<Parameter>) -> Constructor {
    Constructor {
        accessibility,
        parameters,
        location: None,
    }
}

pub fn settable(name: &str, type_ref: TypeRef) -> Property {
    Property {
        name: name.to_owned(),
        type_ref,
        getter: Some(Accessibility::Public),
        setter: Some(Accessibility::Public),
        is_static: false,
        is_computed: false,
        is_indexer: false,
    }
}

pub fn read_only(name: &str, type_ref: TypeRef) -> Property {
    Property {
        setter: None,
        ..settable(name, type_ref)
    }
}

pub fn computed(name: &str, type_ref: TypeRef) -> Property {
    Property {
        is_computed: true,
        ..read_only(name, type_ref)
    }
}

pub fn method(name: &str, parameters: Vec<Parameter>) -> Method {
    Method {
        name: name.to_owned(),
        parameters,
        is_static: false,
        location: None,
    }
}

pub fn field(name: &str, type_ref: TypeRef) -> Field {
    Field {
        name: name.to_owned(),
        type_ref,
        is_const: false,
        is_static: false,
    }
}

pub fn make_builder(entity: TypeRef, arguments: Vec<Option<AttributeValue>>) -> AttributeData {
    let mut all = vec![Some(AttributeValue::Type(entity))];
    all.extend(arguments);
    AttributeData {
        name: "MakeBuilder".to_owned(),
        arguments: all,
        location: None,
    }
}

pub fn attribute(name: &str, arguments: Vec<Option<AttributeValue>>) -> AttributeData {
    AttributeData {
        name: name.to_owned(),
        arguments,
        location: None,
    }
}

pub fn text(value: &str) -> Option<AttributeValue> {
    Some(AttributeValue::Str(value.to_owned()))
}

pub fn flag(value: bool) -> Option<AttributeValue> {
    Some(AttributeValue::Bool(value))
}

pub fn number(value: i64) -> Option<AttributeValue> {
    Some(AttributeValue::Int(value))
}

/// `Geometry.Point(int x, string label)` with matching read-only properties.
pub fn point() -> NamedType {
    NamedType {
        constructors: vec![ctor(
            Accessibility::Public,
            vec![param("x", int()), param("label", string())],
        )],
        properties: vec![read_only("X", int()), read_only("Label", string())],
        ..class("Geometry", "Point")
    }
}

/// `Geometry.PointBuilder` declaring `[MakeBuilder(typeof(Point), ...)]`.
pub fn point_builder(arguments: Vec<Option<AttributeValue>>) -> NamedType {
    NamedType {
        attributes: vec![make_builder(point().self_ref(), arguments)],
        ..class("Geometry.Tests", "PointBuilder")
    }
}
