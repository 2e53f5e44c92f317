//! Fluent constructors for semantic snapshot fixtures.
//!
//! Integration and behavioural tests describe C# declarations with these
//! builders instead of spelling out every struct field.
//!
//! ```
//! use buildsmith_test_helpers::snapshot::{TypeFixture, int};
//!
//! let point = TypeFixture::class("Geometry", "Point")
//!     .public_constructor(&[("x", int())])
//!     .read_only("X", int())
//!     .build();
//! assert_eq!(point.properties.len(), 1);
//! ```

use buildsmith::Compilation;
use buildsmith::semantic::{
    Accessibility, AttributeData, AttributeValue, Constructor, Field, Location, Method, NamedType,
    Parameter, Property, TypeKind, TypeRef,
};

/// `int`.
#[must_use]
pub fn int() -> TypeRef {
    TypeRef::keyword("int")
}

/// `string`.
#[must_use]
pub fn string() -> TypeRef {
    TypeRef::keyword("string")
}

/// A string attribute argument.
#[must_use]
pub fn text(value: &str) -> Option<AttributeValue> {
    Some(AttributeValue::Str(value.to_owned()))
}

/// A boolean attribute argument.
#[must_use]
pub const fn flag(value: bool) -> Option<AttributeValue> {
    Some(AttributeValue::Bool(value))
}

/// An integral attribute argument.
#[must_use]
pub const fn number(value: i64) -> Option<AttributeValue> {
    Some(AttributeValue::Int(value))
}

/// An attribute application with positional arguments.
#[must_use]
pub fn attribute(name: &str, arguments: Vec<Option<AttributeValue>>) -> AttributeData {
    AttributeData {
        name: name.to_owned(),
        arguments,
        location: None,
    }
}

/// A snapshot holding `types`, with nullable annotations disabled.
#[must_use]
pub fn compilation(types: Vec<NamedType>) -> Compilation {
    Compilation::new(false, Vec::new(), types)
}

fn parameters(list: &[(&str, TypeRef)]) -> Vec<Parameter> {
    list.iter()
        .map(|(name, type_ref)| Parameter {
            name: (*name).to_owned(),
            type_ref: type_ref.clone(),
        })
        .collect()
}

/// Builder for a [`NamedType`] declaration.
#[derive(Clone, Debug)]
pub struct TypeFixture {
    ty: NamedType,
}

impl TypeFixture {
    /// A non-generic class.
    #[must_use]
    pub fn class(namespace: &str, name: &str) -> Self {
        Self {
            ty: NamedType {
                name: name.to_owned(),
                namespace: namespace.to_owned(),
                kind: TypeKind::Class,
                ..NamedType::default()
            },
        }
    }

    /// An interface.
    #[must_use]
    pub fn interface(namespace: &str, name: &str) -> Self {
        let mut fixture = Self::class(namespace, name);
        fixture.ty.kind = TypeKind::Interface;
        fixture.ty.is_abstract = true;
        fixture
    }

    /// Mark the class `abstract`.
    #[must_use]
    pub const fn abstract_class(mut self) -> Self {
        self.ty.is_abstract = true;
        self
    }

    /// Add a constructor with the given accessibility.
    #[must_use]
    pub fn constructor(mut self, accessibility: Accessibility, params: &[(&str, TypeRef)]) -> Self {
        self.ty.constructors.push(Constructor {
            accessibility,
            parameters: parameters(params),
            location: None,
        });
        self
    }

    /// Add a public constructor.
    #[must_use]
    pub fn public_constructor(self, params: &[(&str, TypeRef)]) -> Self {
        self.constructor(Accessibility::Public, params)
    }

    /// Add a property with a public getter and public setter.
    #[must_use]
    pub fn settable(mut self, name: &str, type_ref: TypeRef) -> Self {
        self.ty.properties.push(Property {
            name: name.to_owned(),
            type_ref,
            getter: Some(Accessibility::Public),
            setter: Some(Accessibility::Public),
            is_static: false,
            is_computed: false,
            is_indexer: false,
        });
        self
    }

    /// Add a get-only auto-property.
    #[must_use]
    pub fn read_only(mut self, name: &str, type_ref: TypeRef) -> Self {
        self.ty.properties.push(Property {
            name: name.to_owned(),
            type_ref,
            getter: Some(Accessibility::Public),
            setter: None,
            is_static: false,
            is_computed: false,
            is_indexer: false,
        });
        self
    }

    /// Set the base class.
    #[must_use]
    pub fn extends(mut self, base: TypeRef) -> Self {
        self.ty.base_type = Some(base);
        self
    }

    /// Add a directly implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.ty.interfaces.push(interface);
        self
    }

    /// Add an instance method.
    #[must_use]
    pub fn method(mut self, name: &str, params: &[(&str, TypeRef)]) -> Self {
        self.ty.methods.push(Method {
            name: name.to_owned(),
            parameters: parameters(params),
            is_static: false,
            location: None,
        });
        self
    }

    /// Add an instance field.
    #[must_use]
    pub fn field(mut self, name: &str, type_ref: TypeRef) -> Self {
        self.ty.fields.push(Field {
            name: name.to_owned(),
            type_ref,
            is_const: false,
            is_static: false,
        });
        self
    }

    /// Apply an attribute to the declaration.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.ty.attributes.push(attribute);
        self
    }

    /// Apply `[MakeBuilder(typeof(entity), arguments...)]`.
    #[must_use]
    pub fn make_builder(self, entity: TypeRef, arguments: Vec<Option<AttributeValue>>) -> Self {
        let mut all = vec![Some(AttributeValue::Type(entity))];
        all.extend(arguments);
        self.attribute(attribute("MakeBuilder", all))
    }

    /// Record the declaration site.
    #[must_use]
    pub fn located(mut self, file: &str, line: u32) -> Self {
        self.ty.location = Some(Location {
            file: file.to_owned(),
            line,
            column: 1,
        });
        self
    }

    /// Reference to the declared type.
    #[must_use]
    pub fn reference(&self) -> TypeRef {
        self.ty.self_ref()
    }

    /// Finish the declaration.
    #[must_use]
    pub fn build(self) -> NamedType {
        self.ty
    }
}
