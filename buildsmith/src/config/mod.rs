//! Configuration cascade.
//!
//! Three independent domains (builder behaviour, mocking, fixture values)
//! are resolved with the same rule: the nearest scope that sets an option
//! wins, otherwise the next-outer scope, otherwise a hard default. Scopes,
//! from outermost: assembly attributes, attributes on the builder
//! declaration, arguments of the `MakeBuilder` application.

pub mod attributes;
mod layer;

use tracing::debug;

use crate::semantic::{AttributeData, NamedType, SemanticModel};
use crate::{GenerationError, GenerationResult};

pub use layer::{
    BuilderOptions, ConfigComposer, ConfigLayer, ConfigProvenance, FixtureOptions, MockingOptions,
    Overlay,
};

/// Nullable-annotation context for the generated file.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NullableStrategy {
    /// Inherit the project's setting; no directive is emitted.
    #[default]
    Default,
    /// Emit `#nullable disable`.
    Disabled,
    /// Emit `#nullable enable`.
    Enabled,
}

/// Which members a mocking or fixture library should handle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InterfaceStrategy {
    /// Handle nothing.
    #[default]
    None,
    /// Handle every eligible member.
    All,
    /// Handle every eligible member except interfaces extending a generic
    /// sequence.
    WithoutGenericCollection,
}

/// Resolved builder-domain settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuilderSettings {
    /// Prefix of the fluent setters, never empty.
    pub method_prefix: String,
    /// Emit `BuildDefault`.
    pub default_static_creator: bool,
    /// Resolved nullable strategy (after the compilation-wide upgrade).
    pub nullable_strategy: NullableStrategy,
    /// Generate setters for unreachable read-only properties.
    pub generate_methods_for_unreachable_properties: bool,
    /// Emit an implicit conversion to the entity.
    pub implicit_cast: bool,
    /// Static factory method name, `None` when disabled.
    pub static_factory_method_name: Option<String>,
    /// Emit a static property creating a builder.
    pub generate_static_property_for_builder_creation: bool,
    /// Initialise collection members with empty collections.
    pub initialize_collections_with_empty: bool,
}

/// Resolved mocking-domain settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MockingSettings {
    /// Mocking strategy.
    pub strategy: InterfaceStrategy,
    /// Field type format, `{0}` = mocked type.
    pub type_declaration_format: String,
    /// Field initialiser format, `{0}` = mocked type.
    pub field_default_value_format: String,
    /// Mocked-object expression format, `{0}` = field name.
    pub return_object_format: String,
    /// Extra namespaces, already split.
    pub additional_namespaces: Vec<String>,
}

/// Resolved fixture-domain settings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FixtureSettings {
    /// Fixture strategy.
    pub strategy: InterfaceStrategy,
    /// Type of the fixture field.
    pub fixture_type_name: String,
    /// Single-value creation format, `{0}` = fixture field, `{1}` = type.
    pub create_single_format: String,
    /// Arguments for the fixture constructor.
    pub constructor_parameters: Option<String>,
    /// Post-construction statement, `{0}` = fixture field.
    pub additional_configuration: Option<String>,
    /// Extra namespaces, already split.
    pub additional_namespaces: Vec<String>,
}

/// Fully merged configuration for one builder.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigurationPlan {
    /// Builder behaviour.
    pub builder: BuilderSettings,
    /// Mocking strategy and formats.
    pub mocking: MockingSettings,
    /// Fixture strategy and formats.
    pub fixture: FixtureSettings,
}

impl Default for ConfigurationPlan {
    fn default() -> Self {
        finish(
            BuilderOptions::default(),
            MockingOptions::default(),
            FixtureOptions::default(),
            false,
        )
    }
}

const DEFAULT_PREFIX: &str = "With";
const DEFAULT_MOCK_TYPE_FORMAT: &str = "Mock<{0}>";
const DEFAULT_MOCK_VALUE_FORMAT: &str = "new Mock<{0}>()";
const DEFAULT_MOCK_RETURN_FORMAT: &str = "{0}.Object";
const DEFAULT_FIXTURE_TYPE: &str = "Fixture";
const DEFAULT_FIXTURE_CREATE_FORMAT: &str = "{0}.Create<{1}>()";

/// Resolve the configuration for `builder`, generated through `invocation`.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidConfiguration`] when an attribute
/// argument is malformed or a required option resolves to an empty value.
pub fn resolve_configuration<M: SemanticModel + ?Sized>(
    model: &M,
    builder: &NamedType,
    invocation: &AttributeData,
) -> GenerationResult<ConfigurationPlan> {
    let mut composer = ConfigComposer::new();
    composer.push_layer(attributes::read_layer(
        ConfigProvenance::Assembly,
        model.assembly_attributes(),
    )?);
    composer.push_layer(attributes::read_layer(
        ConfigProvenance::Type,
        &builder.attributes,
    )?);
    composer.push_layer(attributes::read_invocation(invocation)?);
    resolve_layers(&composer, model.nullable_enabled())
}

/// Resolve an already-composed set of layers.
///
/// This is a pure function of the layers and the compilation-wide nullable
/// flag.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidConfiguration`] when a required option
/// resolves to an empty value.
pub fn resolve_layers(
    composer: &ConfigComposer,
    nullable_enabled: bool,
) -> GenerationResult<ConfigurationPlan> {
    let (builder, mocking, fixture) = composer.merged();
    let plan = finish(builder, mocking, fixture, nullable_enabled);
    validate(&plan)?;
    debug!(
        prefix = %plan.builder.method_prefix,
        nullable = ?plan.builder.nullable_strategy,
        mocking = ?plan.mocking.strategy,
        fixture = ?plan.fixture.strategy,
        "resolved configuration plan"
    );
    Ok(plan)
}

fn finish(
    builder: BuilderOptions,
    mocking: MockingOptions,
    fixture: FixtureOptions,
    nullable_enabled: bool,
) -> ConfigurationPlan {
    let nullable_strategy = match builder.nullable_strategy.unwrap_or_default() {
        NullableStrategy::Default if nullable_enabled => NullableStrategy::Enabled,
        other => other,
    };
    ConfigurationPlan {
        builder: BuilderSettings {
            method_prefix: builder
                .method_prefix
                .unwrap_or_else(|| DEFAULT_PREFIX.to_owned()),
            default_static_creator: builder.default_static_creator.unwrap_or(true),
            nullable_strategy,
            generate_methods_for_unreachable_properties: builder
                .generate_methods_for_unreachable_properties
                .unwrap_or(false),
            implicit_cast: builder.implicit_cast.unwrap_or(false),
            static_factory_method_name: builder
                .static_factory_method_name
                .filter(|name| !name.trim().is_empty()),
            generate_static_property_for_builder_creation: builder
                .generate_static_property_for_builder_creation
                .unwrap_or(false),
            initialize_collections_with_empty: builder
                .initialize_collections_with_empty
                .unwrap_or(false),
        },
        mocking: MockingSettings {
            strategy: mocking.strategy.unwrap_or_default(),
            type_declaration_format: mocking
                .type_declaration_format
                .unwrap_or_else(|| DEFAULT_MOCK_TYPE_FORMAT.to_owned()),
            field_default_value_format: mocking
                .field_default_value_format
                .unwrap_or_else(|| DEFAULT_MOCK_VALUE_FORMAT.to_owned()),
            return_object_format: mocking
                .return_object_format
                .unwrap_or_else(|| DEFAULT_MOCK_RETURN_FORMAT.to_owned()),
            additional_namespaces: split_namespaces(mocking.additional_namespaces.as_deref()),
        },
        fixture: FixtureSettings {
            strategy: fixture.strategy.unwrap_or_default(),
            fixture_type_name: fixture
                .fixture_type_name
                .unwrap_or_else(|| DEFAULT_FIXTURE_TYPE.to_owned()),
            create_single_format: fixture
                .create_single_format
                .unwrap_or_else(|| DEFAULT_FIXTURE_CREATE_FORMAT.to_owned()),
            constructor_parameters: fixture
                .constructor_parameters
                .filter(|params| !params.trim().is_empty()),
            additional_configuration: fixture
                .additional_configuration
                .filter(|config| !config.trim().is_empty()),
            additional_namespaces: split_namespaces(fixture.additional_namespaces.as_deref()),
        },
    }
}

fn split_namespaces(value: Option<&str>) -> Vec<String> {
    value
        .map(|list| crate::naming::split_list(list).map(str::to_owned).collect())
        .unwrap_or_default()
}

fn validate(plan: &ConfigurationPlan) -> GenerationResult<()> {
    let prefix = &plan.builder.method_prefix;
    if prefix.trim().is_empty() {
        return Err(GenerationError::invalid(
            "buildingMethodsPrefix",
            "the setter prefix must not be empty",
        ));
    }
    if prefix.chars().any(|ch| !(ch.is_alphanumeric() || ch == '_')) {
        return Err(GenerationError::invalid(
            "buildingMethodsPrefix",
            format!("'{prefix}' is not a valid identifier prefix"),
        ));
    }
    if plan.mocking.strategy != InterfaceStrategy::None {
        for (key, value) in [
            ("typeDeclarationFormat", &plan.mocking.type_declaration_format),
            (
                "fieldDefaultValueAssignmentFormat",
                &plan.mocking.field_default_value_format,
            ),
            ("returnObjectFormat", &plan.mocking.return_object_format),
        ] {
            require_non_empty(key, value)?;
        }
    }
    if plan.fixture.strategy != InterfaceStrategy::None {
        require_non_empty("fixtureTypeName", &plan.fixture.fixture_type_name)?;
        require_non_empty("createSingleFormat", &plan.fixture.create_single_format)?;
    }
    Ok(())
}

fn require_non_empty(key: &str, value: &str) -> GenerationResult<()> {
    if value.trim().is_empty() {
        Err(GenerationError::invalid(key, "a non-empty value is required"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests;
