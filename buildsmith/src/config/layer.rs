//! Partial configuration layers and their composition.
//!
//! Every option is an [`Option`] in every layer: `None` means "not provided
//! at this scope" and lets the next-outer scope supply the value. Layers are
//! pushed from least to most specific and folded so that the most specific
//! explicit value wins.

use tracing::debug;

use super::{InterfaceStrategy, NullableStrategy};

/// Scope a configuration layer was read from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[non_exhaustive]
pub enum ConfigProvenance {
    /// Attributes applied to the whole assembly.
    Assembly,
    /// Attributes applied to the builder declaration.
    Type,
    /// Arguments of the attribute that requested generation.
    Invocation,
}

/// Fields of a partial option set that can be overlaid.
pub trait Overlay {
    /// Combine `self` (outer scope) with `over` (inner scope); values set in
    /// `over` win.
    #[must_use]
    fn overlay(self, over: Self) -> Self;

    /// Whether no option is set.
    fn is_empty(&self) -> bool;
}

macro_rules! overlay_options {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl Overlay for $ty {
            fn overlay(self, over: Self) -> Self {
                Self {
                    $($field: over.$field.or(self.$field),)+
                }
            }

            fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())+
            }
        }
    };
}

/// Builder-domain options as provided at one scope.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BuilderOptions {
    /// Prefix of the fluent setter methods.
    pub method_prefix: Option<String>,
    /// Emit the static `BuildDefault` method.
    pub default_static_creator: Option<bool>,
    /// Nullable-annotation strategy for the generated file.
    pub nullable_strategy: Option<NullableStrategy>,
    /// Generate setters for read-only properties without constructor match.
    pub generate_methods_for_unreachable_properties: Option<bool>,
    /// Emit an implicit conversion from the builder to the entity.
    pub implicit_cast: Option<bool>,
    /// Name of the static factory method, if any.
    pub static_factory_method_name: Option<String>,
    /// Emit a static property returning a fresh builder.
    pub generate_static_property_for_builder_creation: Option<bool>,
    /// Initialise collection members with empty collections.
    pub initialize_collections_with_empty: Option<bool>,
}

overlay_options!(BuilderOptions {
    method_prefix,
    default_static_creator,
    nullable_strategy,
    generate_methods_for_unreachable_properties,
    implicit_cast,
    static_factory_method_name,
    generate_static_property_for_builder_creation,
    initialize_collections_with_empty,
});

/// Mocking-domain options as provided at one scope.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MockingOptions {
    /// Which interface-typed members become mocks.
    pub strategy: Option<InterfaceStrategy>,
    /// Field type format, `{0}` = mocked type.
    pub type_declaration_format: Option<String>,
    /// Field initialiser format, `{0}` = mocked type.
    pub field_default_value_format: Option<String>,
    /// Expression yielding the mocked object, `{0}` = field name.
    pub return_object_format: Option<String>,
    /// Comma-separated namespaces required by the mocking library.
    pub additional_namespaces: Option<String>,
}

overlay_options!(MockingOptions {
    strategy,
    type_declaration_format,
    field_default_value_format,
    return_object_format,
    additional_namespaces,
});

/// Fixture-domain options as provided at one scope.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FixtureOptions {
    /// Which members get auto-generated values.
    pub strategy: Option<InterfaceStrategy>,
    /// Type of the fixture field.
    pub fixture_type_name: Option<String>,
    /// Single-value creation format, `{0}` = fixture field, `{1}` = type.
    pub create_single_format: Option<String>,
    /// Arguments passed to the fixture constructor.
    pub constructor_parameters: Option<String>,
    /// Statement run after the fixture is created, `{0}` = fixture field.
    pub additional_configuration: Option<String>,
    /// Comma-separated namespaces required by the fixture library.
    pub additional_namespaces: Option<String>,
}

overlay_options!(FixtureOptions {
    strategy,
    fixture_type_name,
    create_single_format,
    constructor_parameters,
    additional_configuration,
    additional_namespaces,
});

/// One scope's worth of options across all three domains.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigLayer {
    provenance: ConfigProvenance,
    /// Builder-domain options.
    pub builder: BuilderOptions,
    /// Mocking-domain options.
    pub mocking: MockingOptions,
    /// Fixture-domain options.
    pub fixture: FixtureOptions,
}

impl ConfigLayer {
    /// An empty layer for `provenance`.
    #[must_use]
    pub fn new(provenance: ConfigProvenance) -> Self {
        Self {
            provenance,
            builder: BuilderOptions::default(),
            mocking: MockingOptions::default(),
            fixture: FixtureOptions::default(),
        }
    }

    /// Scope this layer was read from.
    #[must_use]
    pub const fn provenance(&self) -> ConfigProvenance {
        self.provenance
    }

    /// Whether the layer sets nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builder.is_empty() && self.mocking.is_empty() && self.fixture.is_empty()
    }
}

/// Accumulates layers from least to most specific.
#[derive(Debug, Default)]
pub struct ConfigComposer {
    layers: Vec<ConfigLayer>,
}

impl ConfigComposer {
    /// Create an empty composer.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Push the next, more specific, layer.
    pub fn push_layer(&mut self, layer: ConfigLayer) {
        self.layers.push(layer);
    }

    /// The accumulated layers, in push order.
    #[must_use]
    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }

    /// Fold every layer into a single set of options per domain.
    #[must_use]
    pub fn merged(&self) -> (BuilderOptions, MockingOptions, FixtureOptions) {
        self.layers.iter().fold(
            (
                BuilderOptions::default(),
                MockingOptions::default(),
                FixtureOptions::default(),
            ),
            |(builder, mocking, fixture), layer| {
                if !layer.is_empty() {
                    debug!(provenance = ?layer.provenance(), "applying configuration layer");
                }
                (
                    builder.overlay(layer.builder.clone()),
                    mocking.overlay(layer.mocking.clone()),
                    fixture.overlay(layer.fixture.clone()),
                )
            },
        )
    }
}
