//! Member classification: mockable, fakeable, collection-like or plain.
//!
//! Classification is a pure function of a member's declared type and the
//! resolved [`ConfigurationPlan`]. It never depends on the order in which
//! members are generated, so the synthesiser may re-derive it at will.

mod interfaces;

use std::collections::HashSet;

use crate::config::{ConfigurationPlan, InterfaceStrategy};
use crate::resolver::lookup;
use crate::semantic::well_known::{self, ADD_METHOD, ENUMERABLE_KEY, MAP_KEYS, SET_KEYS};
use crate::semantic::{NamedType, SemanticModel, TypeRef};

pub use interfaces::implemented_interfaces;

/// Collection family detected for a member type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CollectionKind {
    /// An interface extending `IEnumerable<T>`; set-like interfaces are
    /// backed by `HashSet<T>`, the others by `List<T>`.
    InterfaceSequence {
        /// Element type.
        element: TypeRef,
        /// Whether the interface belongs to the `ISet<T>` family.
        set_like: bool,
    },
    /// A concrete class implementing `IEnumerable<T>` that can be created
    /// with `new T()` and filled through `Add(item)`.
    ConcreteSequence {
        /// Element type.
        element: TypeRef,
    },
    /// A single-dimensional array.
    Array {
        /// Element type.
        element: TypeRef,
    },
    /// An interface of the dictionary family, backed by `Dictionary<K, V>`.
    InterfaceMap {
        /// Key type.
        key: TypeRef,
        /// Value type.
        value: TypeRef,
    },
    /// A constructible class implementing the dictionary family.
    ConcreteMap {
        /// Key type.
        key: TypeRef,
        /// Value type.
        value: TypeRef,
    },
}

impl CollectionKind {
    /// Returns `true` for the keyed-map variants.
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::InterfaceMap { .. } | Self::ConcreteMap { .. })
    }

    /// Type of one appended item: the element, or `KeyValuePair<K, V>`.
    #[must_use]
    pub fn item_type(&self) -> TypeRef {
        match self {
            Self::InterfaceSequence { element, .. }
            | Self::ConcreteSequence { element }
            | Self::Array { element } => element.clone(),
            Self::InterfaceMap { key, value } | Self::ConcreteMap { key, value } => {
                well_known::key_value_pair_of(key.clone(), value.clone())
            }
        }
    }

    /// Concrete type instantiated when the collection is materialised.
    ///
    /// `declared` is the member's own type; concrete collections are
    /// instantiated as themselves.
    #[must_use]
    pub fn backing_type(&self, declared: &TypeRef) -> TypeRef {
        match self {
            Self::InterfaceSequence { element, set_like } => {
                if *set_like {
                    well_known::hash_set_of(element.clone())
                } else {
                    well_known::list_of(element.clone())
                }
            }
            Self::InterfaceMap { key, value } => {
                well_known::dictionary_of(key.clone(), value.clone())
            }
            Self::Array { element } => TypeRef::array_of(element.clone()),
            Self::ConcreteSequence { .. } | Self::ConcreteMap { .. } => TypeRef {
                nullable: false,
                ..declared.clone()
            },
        }
    }
}

/// How a member is initialised and assigned by the builder.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Classification {
    /// Backed by a mock wrapper.
    pub mockable: bool,
    /// Defaulted through the fixture's create expression.
    pub fakeable: bool,
    /// Collection family, when the type is collection-like.
    pub collection: Option<CollectionKind>,
    /// Neither mocked nor faked: defaults to `Default{Name}` or the zero value.
    pub needs_explicit_default: bool,
}

/// Classify `ty` under `plan`.
///
/// Mocking takes precedence: a type that would be both mocked and faked is
/// only mocked. `string` is never treated as a sequence of characters.
#[must_use]
pub fn classify<M: SemanticModel + ?Sized>(
    model: &M,
    ty: &TypeRef,
    plan: &ConfigurationPlan,
) -> Classification {
    let bare = TypeRef {
        nullable: false,
        ..ty.clone()
    };
    let closure = if bare.is_string() {
        Vec::new()
    } else {
        implemented_interfaces(model, &bare)
    };
    let generic_sequence = bare.is_interface()
        && closure
            .iter()
            .any(|iface| iface.definition_key() == ENUMERABLE_KEY);

    let mockable = bare.is_interface()
        && match plan.mocking.strategy {
            InterfaceStrategy::None => false,
            InterfaceStrategy::All => true,
            InterfaceStrategy::WithoutGenericCollection => !generic_sequence,
        };
    let fakeable = !mockable
        && match plan.fixture.strategy {
            InterfaceStrategy::None => false,
            InterfaceStrategy::All => true,
            InterfaceStrategy::WithoutGenericCollection => !generic_sequence,
        };

    Classification {
        mockable,
        fakeable,
        collection: detect_collection(model, &bare, &closure),
        needs_explicit_default: !mockable && !fakeable,
    }
}

fn detect_collection<M: SemanticModel + ?Sized>(
    model: &M,
    ty: &TypeRef,
    closure: &[TypeRef],
) -> Option<CollectionKind> {
    if let Some(element) = ty.array_element() {
        return Some(CollectionKind::Array {
            element: element.clone(),
        });
    }
    if ty.is_string() {
        return None;
    }
    let interface = ty.is_interface();
    if let Some(map) = closure
        .iter()
        .find(|iface| MAP_KEYS.contains(&iface.definition_key().as_str()))
    {
        let [key_type, value_type] = map.type_arguments.as_slice() else {
            return None;
        };
        let (key, value) = (key_type.clone(), value_type.clone());
        if interface {
            return Some(CollectionKind::InterfaceMap { key, value });
        }
        return lookup(model, ty)
            .is_some_and(is_constructible)
            .then_some(CollectionKind::ConcreteMap { key, value });
    }
    let element = closure
        .iter()
        .find(|iface| iface.definition_key() == ENUMERABLE_KEY)
        .and_then(|iface| iface.type_arguments.first())?
        .clone();
    if interface {
        let set_like = closure
            .iter()
            .any(|iface| SET_KEYS.contains(&iface.definition_key().as_str()));
        return Some(CollectionKind::InterfaceSequence { element, set_like });
    }
    is_appendable(model, ty).then_some(CollectionKind::ConcreteSequence { element })
}

/// Whether `new T()` followed by `Add(item)` is valid for the class `ty`.
///
/// Types missing from both the snapshot and the framework table are not.
fn is_appendable<M: SemanticModel + ?Sized>(model: &M, ty: &TypeRef) -> bool {
    lookup(model, ty)
        .is_some_and(|declaration| is_constructible(declaration) && declares_add(model, declaration))
}

/// A non-abstract class with an implicit or visible parameterless constructor.
fn is_constructible(declaration: &NamedType) -> bool {
    !declaration.is_abstract
        && (declaration.constructors.is_empty()
            || declaration.constructors.iter().any(|ctor| {
                ctor.parameters.is_empty() && ctor.accessibility.is_assembly_visible()
            }))
}

/// Walk the base chain looking for an instance `Add` with one parameter.
fn declares_add<'a, M: SemanticModel + ?Sized>(model: &'a M, start: &'a NamedType) -> bool {
    let mut visited = HashSet::new();
    let mut current = Some(start);
    while let Some(declaration) = current.take() {
        if !visited.insert(declaration.key()) {
            break;
        }
        let adds = declaration.methods.iter().any(|method| {
            method.name == ADD_METHOD && !method.is_static && method.parameters.len() == 1
        });
        if adds {
            return true;
        }
        current = declaration
            .base_type
            .as_ref()
            .and_then(|base| lookup(model, base));
    }
    false
}

#[cfg(test)]
mod tests;
