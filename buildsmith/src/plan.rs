//! Hand-written members of the partial builder class.
//!
//! The synthesiser consults a [`BuilderPlan`] before emitting each member
//! so that nothing the user already declared is generated a second time.

use std::collections::BTreeMap;

use crate::semantic::{Field, Location, Method, NamedType, NameStyle, TypeRef};

/// Method names with special meaning to the generator.
pub mod names {
    /// Entity construction.
    pub const BUILD: &str = "Build";
    /// Lazy sequence of built entities.
    pub const BUILD_MANY: &str = "BuildMany";
    /// Static one-shot construction.
    pub const BUILD_DEFAULT: &str = "BuildDefault";
    /// Hook run at the end of the generated constructor.
    pub const PRE_BUILD: &str = "PreBuild";
    /// Hook run on the entity before `Build` returns it.
    pub const POST_BUILD: &str = "PostBuild";
    /// Field holding the fixture instance.
    pub const FIXTURE_FIELD: &str = "_fixture";
    /// Prefix of user-declared default values.
    pub const DEFAULT_PREFIX: &str = "Default";
    /// Prefix of collection append helpers.
    pub const ADD_TO_PREFIX: &str = "AddTo";
}

/// Snapshot of the builder's hand-written members.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BuilderPlan {
    /// Builder name without type parameters.
    pub name: String,
    /// Builder namespace; empty for the global namespace.
    pub namespace: String,
    /// Location of the builder declaration.
    pub location: Option<Location>,
    /// Overloads per method name, in declaration order.
    pub methods: BTreeMap<String, Vec<Method>>,
    /// Fields by name.
    pub fields: BTreeMap<String, Field>,
    /// Declared property names.
    pub properties: Vec<String>,
    /// A zero-argument constructor exists.
    pub has_default_constructor: bool,
    /// Location of that constructor, when known.
    pub default_constructor_location: Option<Location>,
    /// A parameterless instance `Build()` exists.
    pub has_build: bool,
    /// Any `BuildMany` overload exists.
    pub has_build_many: bool,
    /// A static `BuildDefault` exists.
    pub has_build_default: bool,
    /// A `PreBuild()` hook exists.
    pub has_pre_build: bool,
    /// A single-argument `PostBuild` hook exists.
    pub has_post_build: bool,
}

impl BuilderPlan {
    /// Capture the hand-written members of `builder`.
    #[must_use]
    pub fn from_declaration(builder: &NamedType) -> Self {
        let mut methods: BTreeMap<String, Vec<Method>> = BTreeMap::new();
        for method in &builder.methods {
            methods
                .entry(method.name.clone())
                .or_default()
                .push(method.clone());
        }
        let default_constructor = builder
            .constructors
            .iter()
            .find(|ctor| ctor.parameters.is_empty());
        let overloads = |name: &str| methods.get(name).map(Vec::as_slice).unwrap_or_default();
        let has_build = overloads(names::BUILD)
            .iter()
            .any(|method| !method.is_static && method.parameters.is_empty());
        let has_build_many = !overloads(names::BUILD_MANY).is_empty();
        let has_build_default = overloads(names::BUILD_DEFAULT)
            .iter()
            .any(|method| method.is_static);
        let has_pre_build = overloads(names::PRE_BUILD)
            .iter()
            .any(|method| method.parameters.is_empty());
        let has_post_build = overloads(names::POST_BUILD)
            .iter()
            .any(|method| method.parameters.len() == 1);

        Self {
            name: builder.name.clone(),
            namespace: builder.namespace.clone(),
            location: builder.location.clone(),
            fields: builder
                .fields
                .iter()
                .map(|field| (field.name.clone(), field.clone()))
                .collect(),
            properties: builder
                .properties
                .iter()
                .map(|prop| prop.name.clone())
                .collect(),
            has_default_constructor: default_constructor.is_some(),
            default_constructor_location: default_constructor.and_then(|ctor| ctor.location.clone()),
            has_build,
            has_build_many,
            has_build_default,
            has_pre_build,
            has_post_build,
            methods,
        }
    }

    /// Whether a member named `name` exists in any form.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.methods.contains_key(name)
            || self.fields.contains_key(name)
            || self.properties.iter().any(|prop| prop == name)
    }

    /// Whether a method `name` taking exactly `parameters` exists.
    ///
    /// Parameter types match when their rendered names agree in either
    /// namespace-qualified or simple form.
    #[must_use]
    pub fn has_overload(&self, name: &str, parameters: &[TypeRef]) -> bool {
        self.methods.get(name).is_some_and(|overloads| {
            overloads.iter().any(|method| {
                method.parameters.len() == parameters.len()
                    && method
                        .parameters
                        .iter()
                        .zip(parameters)
                        .all(|(declared, wanted)| same_type_name(&declared.type_ref, wanted))
            })
        })
    }

    /// Location of the first overload of `name`, else of the builder.
    #[must_use]
    pub fn location_of(&self, name: &str) -> Option<Location> {
        self.methods
            .get(name)
            .and_then(|overloads| overloads.iter().find_map(|method| method.location.clone()))
            .or_else(|| self.location.clone())
    }

    /// Field named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// The user-declared `Default{pascal_name}` field, if any.
    ///
    /// The match is case-sensitive. Only `const` and `static` fields count:
    /// the value initialises an instance field, which may not read another
    /// instance member.
    #[must_use]
    pub fn default_value_field(&self, pascal_name: &str) -> Option<&Field> {
        self.fields
            .get(&format!("{}{pascal_name}", names::DEFAULT_PREFIX))
            .filter(|field| field.is_const || field.is_static)
    }
}

/// Compare type names in full or namespace-less form.
#[must_use]
pub fn same_type_name(lhs: &TypeRef, rhs: &TypeRef) -> bool {
    lhs.same_type(rhs)
        || lhs.render(NameStyle::Simple) == rhs.render(NameStyle::Simple)
        || lhs.render(NameStyle::Full) == rhs.render(NameStyle::Full)
}
