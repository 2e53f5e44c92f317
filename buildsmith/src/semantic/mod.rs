//! Semantic snapshot consumed from the host compiler.
//!
//! The host exports its view of the compilation (declared types, their
//! members, attribute applications and the nullable-context flag) as plain
//! data. Everything the generator knows about the code under generation
//! flows through the types in this module and the [`SemanticModel`] trait.

mod type_ref;
pub mod well_known;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{GenerationError, GenerationResult};

pub use type_ref::{NameStyle, TypeKind, TypeRef, definition_key};

/// Declared accessibility, ordered from least to most visible.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// `private`.
    #[default]
    Private,
    /// `private protected`.
    PrivateProtected,
    /// `protected`.
    Protected,
    /// `internal`.
    Internal,
    /// `protected internal`.
    ProtectedInternal,
    /// `public`.
    Public,
}

impl Accessibility {
    /// Whether code in the same assembly, outside the type hierarchy, can
    /// call a member with this accessibility.
    #[must_use]
    pub const fn is_assembly_visible(self) -> bool {
        matches!(self, Self::Internal | Self::ProtectedInternal | Self::Public)
    }
}

/// Source position reported alongside diagnostics.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Path of the file containing the declaration.
    pub file: String,
    /// One-based line.
    pub line: u32,
    /// One-based column.
    pub column: u32,
}

/// A single positional attribute argument.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// `true` / `false`.
    Bool(bool),
    /// Integral constants, including enum values.
    Int(i64),
    /// String constants, or enum member names.
    Str(String),
    /// `typeof(...)` arguments.
    Type(TypeRef),
}

/// One attribute application with its ordered constructor arguments.
///
/// `None` marks an argument the user did not provide (the sentinel), which
/// the configuration cascade treats differently from an explicit default.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AttributeData {
    /// Attribute class name, with or without the `Attribute` suffix.
    pub name: String,
    /// Positional arguments.
    #[serde(default)]
    pub arguments: Vec<Option<AttributeValue>>,
    /// Where the attribute was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl AttributeData {
    /// Returns `true` if this attribute is `name` or `{name}Attribute`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name
            .strip_suffix("Attribute")
            .unwrap_or(&self.name)
            .rsplit('.')
            .next()
            .is_some_and(|short| short == name)
    }

    /// Positional argument at `index`, `None` when unset or absent.
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&AttributeValue> {
        self.arguments.get(index).and_then(Option::as_ref)
    }
}

/// A generic type parameter declaration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TypeParameter {
    /// Parameter name, e.g. `T`.
    pub name: String,
    /// Type constraints (`where T : IComparable<T>`).
    #[serde(default)]
    pub constraint_types: Vec<TypeRef>,
    /// `where T : class`.
    #[serde(default)]
    pub reference_type: bool,
    /// `where T : struct`.
    #[serde(default)]
    pub value_type: bool,
    /// `where T : new()`.
    #[serde(default)]
    pub constructor: bool,
}

/// Method or constructor parameter.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Declared name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

/// Instance constructor.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    /// Declared accessibility.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Ordered parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Declaration site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Property declaration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Declared name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Getter accessibility, `None` when the property has no getter.
    #[serde(default)]
    pub getter: Option<Accessibility>,
    /// Setter (or `init`) accessibility, `None` when there is no setter.
    #[serde(default)]
    pub setter: Option<Accessibility>,
    /// Static properties are never collected.
    #[serde(default)]
    pub is_static: bool,
    /// Expression-bodied or otherwise computed: no backing storage.
    #[serde(default)]
    pub is_computed: bool,
    /// Indexers are never collected.
    #[serde(default)]
    pub is_indexer: bool,
}

impl Property {
    /// Public getter and public setter.
    #[must_use]
    pub fn is_publicly_settable(&self) -> bool {
        self.getter == Some(Accessibility::Public) && self.setter == Some(Accessibility::Public)
    }

    /// Public getter without a public setter.
    #[must_use]
    pub fn is_publicly_read_only(&self) -> bool {
        self.getter == Some(Accessibility::Public) && self.setter != Some(Accessibility::Public)
    }
}

/// Field declaration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Declared name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// `const` fields.
    #[serde(default)]
    pub is_const: bool,
    /// `static` fields.
    #[serde(default)]
    pub is_static: bool,
}

/// Method declaration (ordinary methods and user-defined operators).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// Metadata name, e.g. `Build` or `op_Implicit`.
    pub name: String,
    /// Ordered parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Static methods.
    #[serde(default)]
    pub is_static: bool,
    /// Declaration site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// A type declared in (or referenced by) the compilation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NamedType {
    /// Simple name without arity.
    pub name: String,
    /// Containing namespace; empty for the global namespace.
    #[serde(default)]
    pub namespace: String,
    /// Type shape.
    #[serde(default)]
    pub kind: TypeKind,
    /// `abstract` classes (and interfaces).
    #[serde(default)]
    pub is_abstract: bool,
    /// Generic parameters of the definition.
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    /// Direct base class, expressed in terms of this type's parameters.
    #[serde(default)]
    pub base_type: Option<TypeRef>,
    /// Directly implemented or extended interfaces.
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    /// Instance constructors, in declaration order.
    #[serde(default)]
    pub constructors: Vec<Constructor>,
    /// Declared properties, in declaration order.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Declared methods.
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Attribute applications on the declaration.
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
    /// Declaration site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl NamedType {
    /// Lookup key for this definition.
    #[must_use]
    pub fn key(&self) -> String {
        definition_key(&self.namespace, &self.name, self.type_parameters.len())
    }

    /// Namespace-qualified name without type arguments.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Reference to this definition with its own parameters as arguments.
    #[must_use]
    pub fn self_ref(&self) -> TypeRef {
        TypeRef::generic(
            &self.namespace,
            &self.name,
            self.kind,
            self.type_parameters
                .iter()
                .map(|param| TypeRef::type_parameter(&param.name))
                .collect(),
        )
    }

    /// Bind this definition's parameters to the arguments of `reference`.
    ///
    /// Open references (unbound `typeof(Entity<>)`) bind each parameter to
    /// itself.
    #[must_use]
    pub fn bindings_for(&self, reference: &TypeRef) -> HashMap<String, TypeRef> {
        self.type_parameters
            .iter()
            .zip(&reference.type_arguments)
            .filter(|(param, arg)| {
                !(arg.kind == TypeKind::TypeParameter && arg.name == param.name)
            })
            .map(|(param, arg)| (param.name.clone(), arg.clone()))
            .collect()
    }

    /// First attribute application named `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeData> {
        self.attributes.iter().find(|attr| attr.is(name))
    }
}

/// Read access to the host compiler's semantic view.
pub trait SemanticModel: Sync {
    /// Look up a declared type by its definition key.
    fn named_type(&self, key: &str) -> Option<&NamedType>;

    /// Whether nullable annotations are enabled for the whole compilation.
    fn nullable_enabled(&self) -> bool;

    /// Attributes applied at assembly level.
    fn assembly_attributes(&self) -> &[AttributeData];

    /// Every declared type, in snapshot order.
    fn types(&self) -> &[NamedType];

    /// Resolve the declaration behind `reference`.
    fn resolve(&self, reference: &TypeRef) -> Option<&NamedType> {
        self.named_type(&reference.definition_key())
    }
}

/// Serialised form of a [`Compilation`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
struct Snapshot {
    #[serde(default)]
    nullable_enabled: bool,
    #[serde(default)]
    assembly_attributes: Vec<AttributeData>,
    #[serde(default)]
    types: Vec<NamedType>,
}

/// In-memory compilation snapshot indexed by definition key.
#[derive(Clone, Debug, Default)]
pub struct Compilation {
    nullable_enabled: bool,
    assembly_attributes: Vec<AttributeData>,
    types: Vec<NamedType>,
    index: HashMap<String, usize>,
}

impl Compilation {
    /// Build a compilation from its parts.
    ///
    /// When two declarations share a key the first one wins.
    #[must_use]
    pub fn new(
        nullable_enabled: bool,
        assembly_attributes: Vec<AttributeData>,
        types: Vec<NamedType>,
    ) -> Self {
        let mut index = HashMap::with_capacity(types.len());
        for (position, ty) in types.iter().enumerate() {
            index.entry(ty.key()).or_insert(position);
        }
        Self {
            nullable_enabled,
            assembly_attributes,
            types,
            index,
        }
    }

    /// Parse a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Snapshot`] when the JSON is malformed.
    pub fn from_json(json: &str) -> GenerationResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(GenerationError::Snapshot)?;
        Ok(Self::new(
            snapshot.nullable_enabled,
            snapshot.assembly_attributes,
            snapshot.types,
        ))
    }

    /// Serialise the compilation back to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Snapshot`] when serialisation fails.
    pub fn to_json(&self) -> GenerationResult<String> {
        let snapshot = Snapshot {
            nullable_enabled: self.nullable_enabled,
            assembly_attributes: self.assembly_attributes.clone(),
            types: self.types.clone(),
        };
        serde_json::to_string_pretty(&snapshot).map_err(GenerationError::Snapshot)
    }
}

impl SemanticModel for Compilation {
    fn named_type(&self, key: &str) -> Option<&NamedType> {
        self.index.get(key).and_then(|&position| self.types.get(position))
    }

    fn nullable_enabled(&self) -> bool {
        self.nullable_enabled
    }

    fn assembly_attributes(&self) -> &[AttributeData] {
        &self.assembly_attributes
    }

    fn types(&self) -> &[NamedType] {
        &self.types
    }
}
