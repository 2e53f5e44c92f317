//! Member resolution: the constructor and properties an entity exposes.
//!
//! The resolver turns a reference to the entity into an [`EntityShape`]:
//! the parameters of the widest accessible constructor plus the settable and
//! read-only properties reachable through the inheritance chain, each
//! represented once by its most-derived declaration.

mod levels;

use tracing::debug;

use crate::naming::{field_name, pascal_case};
use crate::semantic::{
    Constructor, NamedType, Property, SemanticModel, TypeKind, TypeParameter, TypeRef,
};
use crate::{GenerationError, GenerationResult};

pub(crate) use levels::lookup;
use levels::{TypeLevel, distinct_by_name, type_levels};

/// How a member reaches the entity.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MemberKind {
    /// Passed to the selected constructor.
    ConstructorParameter,
    /// Assigned through a public setter.
    SettableProperty,
    /// Exposed only through a public getter.
    ReadOnlyProperty,
}

/// A resolved constructor parameter or property.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypedMember {
    /// Declared name.
    pub name: String,
    /// Name with the first character upper-cased.
    pub pascal_name: String,
    /// Backing-field name in the builder.
    pub field_name: String,
    /// Declared type, with type arguments of the entity applied.
    pub type_ref: TypeRef,
    /// Membership kind.
    pub kind: MemberKind,
}

impl TypedMember {
    /// Create a member, deriving its pascal and field names.
    #[must_use]
    pub fn new(name: &str, type_ref: TypeRef, kind: MemberKind) -> Self {
        Self {
            name: name.to_owned(),
            pascal_name: pascal_case(name),
            field_name: field_name(name),
            type_ref,
            kind,
        }
    }
}

/// Analysed shape of the entity a builder constructs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityShape {
    /// Simple name of the entity declaration.
    pub name: String,
    /// Namespace of the entity declaration; empty for the global namespace.
    pub namespace: String,
    /// Reference used in generated code (`Order`, `Box<T>`, `Box<int>`).
    pub type_ref: TypeRef,
    /// Type parameters left open; the builder redeclares them.
    pub open_type_parameters: Vec<TypeParameter>,
    /// Namespaces of the open parameters' constraint types.
    pub constraint_namespaces: Vec<String>,
    /// Abstract classes and interfaces cannot be built.
    pub is_abstract: bool,
    /// Parameters of the selected constructor, `None` when no constructor is
    /// accessible.
    pub constructor_parameters: Option<Vec<TypedMember>>,
    /// Publicly settable properties, most-derived declaration first.
    pub settable_properties: Vec<TypedMember>,
    /// Publicly readable, not publicly settable properties.
    pub read_only_properties: Vec<TypedMember>,
}

impl EntityShape {
    /// Namespace-qualified name with type arguments.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.type_ref.display()
    }

    /// Name with type arguments but no namespace, as used inside the builder.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.type_ref.simple_display()
    }

    /// Full name followed by its `where` clauses, if any.
    #[must_use]
    pub fn full_name_with_constraints(&self) -> String {
        let clauses = self.constraint_clauses();
        if clauses.is_empty() {
            self.full_name()
        } else {
            format!("{} {}", self.full_name(), clauses.join(" "))
        }
    }

    /// `where T : ...` clauses for the open type parameters.
    #[must_use]
    pub fn constraint_clauses(&self) -> Vec<String> {
        self.open_type_parameters
            .iter()
            .filter_map(constraint_clause)
            .collect()
    }

    /// Constructor parameters, or an empty slice.
    #[must_use]
    pub fn parameters(&self) -> &[TypedMember] {
        self.constructor_parameters.as_deref().unwrap_or_default()
    }

    /// Whether `pascal_name` is covered by a constructor parameter.
    #[must_use]
    pub fn is_constructor_parameter(&self, pascal_name: &str) -> bool {
        self.parameters()
            .iter()
            .any(|param| param.pascal_name == pascal_name)
    }

    /// Settable properties not represented as constructor parameters.
    pub fn settable_for_generation(&self) -> impl Iterator<Item = &TypedMember> {
        self.settable_properties
            .iter()
            .filter(|prop| !self.is_constructor_parameter(&prop.pascal_name))
    }

    /// Read-only properties not represented as constructor parameters.
    pub fn read_only_for_generation(&self) -> impl Iterator<Item = &TypedMember> {
        self.read_only_properties
            .iter()
            .filter(|prop| !self.is_constructor_parameter(&prop.pascal_name))
    }
}

fn constraint_clause(param: &TypeParameter) -> Option<String> {
    let mut parts = Vec::new();
    if param.reference_type {
        parts.push("class".to_owned());
    }
    if param.value_type {
        parts.push("struct".to_owned());
    }
    parts.extend(param.constraint_types.iter().map(TypeRef::display));
    if param.constructor && !param.value_type {
        parts.push("new()".to_owned());
    }
    (!parts.is_empty()).then(|| format!("where {} : {}", param.name, parts.join(", ")))
}

/// Resolve the shape of the entity referenced by `entity`.
///
/// # Errors
///
/// Returns [`GenerationError::UnresolvedType`] when the snapshot does not
/// declare the entity.
pub fn resolve_entity<M: SemanticModel + ?Sized>(
    model: &M,
    entity: &TypeRef,
) -> GenerationResult<EntityShape> {
    let declaration = find_definition(model, entity).ok_or_else(|| {
        GenerationError::UnresolvedType {
            name: entity.display(),
        }
    })?;
    let type_ref = if entity.type_arguments.len() == declaration.type_parameters.len() {
        TypeRef {
            kind: declaration.kind,
            nullable: false,
            ..entity.clone()
        }
    } else {
        declaration.self_ref()
    };
    let bindings = declaration.bindings_for(&type_ref);
    let open_type_parameters: Vec<TypeParameter> = declaration
        .type_parameters
        .iter()
        .filter(|param| !bindings.contains_key(&param.name))
        .cloned()
        .collect();
    let mut constraint_namespaces = Vec::new();
    for param in &open_type_parameters {
        for constraint in &param.constraint_types {
            constraint.collect_namespaces(&mut constraint_namespaces);
        }
    }

    let constructor_parameters = select_constructor(&declaration.constructors).map(|ctor| {
        ctor.parameters
            .iter()
            .map(|param| {
                TypedMember::new(
                    &param.name,
                    param.type_ref.substitute(&bindings),
                    MemberKind::ConstructorParameter,
                )
            })
            .collect::<Vec<_>>()
    });

    let levels = type_levels(model, declaration, bindings);
    let parameter_names: Vec<String> = constructor_parameters
        .iter()
        .flatten()
        .map(|param| param.pascal_name.clone())
        .collect();
    let settable_properties = collect_properties(&levels, MemberKind::SettableProperty, |prop| {
        prop.is_publicly_settable()
    });
    let read_only_properties = collect_properties(&levels, MemberKind::ReadOnlyProperty, |prop| {
        prop.is_publicly_read_only()
            && (!prop.is_computed || parameter_names.iter().any(|name| *name == prop.name))
    });

    debug!(
        entity = %type_ref.display(),
        levels = levels.len(),
        parameters = constructor_parameters.as_ref().map(Vec::len),
        settable = settable_properties.len(),
        read_only = read_only_properties.len(),
        "resolved entity shape"
    );

    Ok(EntityShape {
        name: declaration.name.clone(),
        namespace: declaration.namespace.clone(),
        type_ref,
        open_type_parameters,
        constraint_namespaces,
        is_abstract: declaration.is_abstract || declaration.kind == TypeKind::Interface,
        constructor_parameters,
        settable_properties,
        read_only_properties,
    })
}

/// Find the declaration for `entity`, accepting unbound generic references
/// (`typeof(Box<>)`) that carry no type arguments.
fn find_definition<'a, M: SemanticModel + ?Sized>(
    model: &'a M,
    entity: &TypeRef,
) -> Option<&'a NamedType> {
    model.resolve(entity).or_else(|| {
        let namespace = entity.namespace.as_deref().unwrap_or_default();
        model
            .types()
            .iter()
            .find(|ty| ty.name == entity.name && ty.namespace == namespace)
    })
}

/// The assembly-visible constructor with the most parameters; the first
/// declared wins ties.
fn select_constructor(constructors: &[Constructor]) -> Option<&Constructor> {
    constructors
        .iter()
        .filter(|ctor| ctor.accessibility.is_assembly_visible())
        .fold(None, |best: Option<&Constructor>, ctor| match best {
            Some(current) if current.parameters.len() >= ctor.parameters.len() => Some(current),
            _ => Some(ctor),
        })
}

fn collect_properties<F>(levels: &[TypeLevel<'_>], kind: MemberKind, keep: F) -> Vec<TypedMember>
where
    F: Fn(&Property) -> bool,
{
    let per_level = levels.iter().map(|level| {
        level
            .declaration
            .properties
            .iter()
            .filter(|prop| !prop.is_static && !prop.is_indexer && keep(prop))
            .map(|prop| TypedMember::new(&prop.name, prop.type_ref.substitute(&level.bindings), kind))
            .collect::<Vec<_>>()
    });
    distinct_by_name(per_level, |member| member.name.as_str())
}
