//! Decoding of configuration attributes into partial option sets.
//!
//! Arguments are read by fixed constructor position; an unset (sentinel)
//! argument stays `None` so the cascade can tell it apart from an explicit
//! default.

use crate::semantic::{AttributeData, AttributeValue, TypeRef};
use crate::{GenerationError, GenerationResult};

use super::layer::{BuilderOptions, ConfigLayer, ConfigProvenance, FixtureOptions, MockingOptions};
use super::{InterfaceStrategy, NullableStrategy};

/// Attribute requesting builder generation.
pub const MAKE_BUILDER: &str = "MakeBuilder";
/// Builder-domain configuration at assembly or type level.
pub const BUILDER_CONFIGURATION: &str = "BuilderConfiguration";
/// Generic mocking configuration.
pub const MOCKING_CONFIGURATION: &str = "MockingConfiguration";
/// Mocking configuration pre-filled for Moq.
pub const MOQ_CONFIGURATION: &str = "MoqConfiguration";
/// Generic fixture configuration.
pub const FIXTURE_CONFIGURATION: &str = "FixtureConfiguration";
/// Fixture configuration pre-filled for AutoFixture.
pub const AUTO_FIXTURE_CONFIGURATION: &str = "AutoFixtureConfiguration";

/// Read a layer from every configuration attribute in `attributes`.
///
/// Attributes are applied in declaration order, so a later attribute of the
/// same domain overrides an earlier one at the same scope.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidConfiguration`] when an argument has the
/// wrong shape.
pub fn read_layer(
    provenance: ConfigProvenance,
    attributes: &[AttributeData],
) -> GenerationResult<ConfigLayer> {
    use super::layer::Overlay as _;

    let mut layer = ConfigLayer::new(provenance);
    for attribute in attributes {
        if attribute.is(BUILDER_CONFIGURATION) {
            layer.builder = layer.builder.overlay(builder_options(attribute, 0)?);
        } else if attribute.is(MOCKING_CONFIGURATION) {
            layer.mocking = layer.mocking.overlay(mocking_options(attribute)?);
        } else if attribute.is(MOQ_CONFIGURATION) {
            let preset = moq_preset().overlay(mocking_options(attribute)?);
            layer.mocking = layer.mocking.overlay(preset);
        } else if attribute.is(FIXTURE_CONFIGURATION) {
            layer.fixture = layer.fixture.overlay(fixture_options(attribute)?);
        } else if attribute.is(AUTO_FIXTURE_CONFIGURATION) {
            let preset = auto_fixture_preset().overlay(fixture_options(attribute)?);
            layer.fixture = layer.fixture.overlay(preset);
        }
    }
    Ok(layer)
}

/// Read the invocation layer from a `MakeBuilder` application.
///
/// # Errors
///
/// Returns [`GenerationError::InvalidConfiguration`] when an argument has the
/// wrong shape.
pub fn read_invocation(make_builder: &AttributeData) -> GenerationResult<ConfigLayer> {
    let mut layer = ConfigLayer::new(ConfigProvenance::Invocation);
    layer.builder = builder_options(make_builder, 1)?;
    Ok(layer)
}

/// The entity type named by a `MakeBuilder` application.
#[must_use]
pub fn entity_argument(make_builder: &AttributeData) -> Option<&TypeRef> {
    match make_builder.argument(0)? {
        AttributeValue::Type(ty) => Some(ty),
        AttributeValue::Bool(_) | AttributeValue::Int(_) | AttributeValue::Str(_) => None,
    }
}

fn builder_options(attribute: &AttributeData, offset: usize) -> GenerationResult<BuilderOptions> {
    let arg = |index: usize| attribute.argument(offset + index);
    Ok(BuilderOptions {
        method_prefix: string_arg(attribute, "buildingMethodsPrefix", arg(0))?,
        default_static_creator: bool_arg(attribute, "defaultStaticCreator", arg(1))?,
        nullable_strategy: arg(2)
            .map(|value| enum_arg(attribute, "nullableStrategy", value))
            .transpose()?,
        generate_methods_for_unreachable_properties: bool_arg(
            attribute,
            "generateMethodsForUnreachableProperties",
            arg(3),
        )?,
        implicit_cast: bool_arg(attribute, "implicitCast", arg(4))?,
        static_factory_method_name: string_arg(attribute, "staticFactoryMethodName", arg(5))?,
        generate_static_property_for_builder_creation: bool_arg(
            attribute,
            "generateStaticPropertyForBuilderCreation",
            arg(6),
        )?,
        initialize_collections_with_empty: bool_arg(
            attribute,
            "initializeCollectionsWithEmpty",
            arg(7),
        )?,
    })
}

fn mocking_options(attribute: &AttributeData) -> GenerationResult<MockingOptions> {
    Ok(MockingOptions {
        strategy: attribute
            .argument(0)
            .map(|value| enum_arg(attribute, "strategy", value))
            .transpose()?,
        type_declaration_format: string_arg(attribute, "typeDeclarationFormat", attribute.argument(1))?,
        field_default_value_format: string_arg(
            attribute,
            "fieldDefaultValueAssignmentFormat",
            attribute.argument(2),
        )?,
        return_object_format: string_arg(attribute, "returnObjectFormat", attribute.argument(3))?,
        additional_namespaces: string_arg(attribute, "additionalNamespaces", attribute.argument(4))?,
    })
}

fn fixture_options(attribute: &AttributeData) -> GenerationResult<FixtureOptions> {
    Ok(FixtureOptions {
        strategy: attribute
            .argument(0)
            .map(|value| enum_arg(attribute, "strategy", value))
            .transpose()?,
        fixture_type_name: string_arg(attribute, "fixtureTypeName", attribute.argument(1))?,
        create_single_format: string_arg(attribute, "createSingleFormat", attribute.argument(2))?,
        constructor_parameters: string_arg(
            attribute,
            "constructorParameters",
            attribute.argument(3),
        )?,
        additional_configuration: string_arg(
            attribute,
            "additionalConfiguration",
            attribute.argument(4),
        )?,
        additional_namespaces: string_arg(attribute, "additionalNamespaces", attribute.argument(5))?,
    })
}

fn moq_preset() -> MockingOptions {
    MockingOptions {
        strategy: Some(InterfaceStrategy::WithoutGenericCollection),
        type_declaration_format: Some("Mock<{0}>".to_owned()),
        field_default_value_format: Some("new Mock<{0}>()".to_owned()),
        return_object_format: Some("{0}.Object".to_owned()),
        additional_namespaces: Some("Moq".to_owned()),
    }
}

fn auto_fixture_preset() -> FixtureOptions {
    FixtureOptions {
        strategy: Some(InterfaceStrategy::WithoutGenericCollection),
        fixture_type_name: Some("AutoFixture.Fixture".to_owned()),
        create_single_format: Some("{0}.Create<{1}>()".to_owned()),
        constructor_parameters: None,
        additional_configuration: None,
        additional_namespaces: Some("AutoFixture".to_owned()),
    }
}

fn key(attribute: &AttributeData, option: &str) -> String {
    format!("{}.{option}", attribute.name)
}

fn string_arg(
    attribute: &AttributeData,
    option: &str,
    value: Option<&AttributeValue>,
) -> GenerationResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(AttributeValue::Str(text)) => Ok(Some(text.clone())),
        Some(other) => Err(GenerationError::invalid(
            key(attribute, option),
            format!("expected a string, found {other:?}"),
        )),
    }
}

fn bool_arg(
    attribute: &AttributeData,
    option: &str,
    value: Option<&AttributeValue>,
) -> GenerationResult<Option<bool>> {
    match value {
        None => Ok(None),
        Some(AttributeValue::Bool(flag)) => Ok(Some(*flag)),
        Some(other) => Err(GenerationError::invalid(
            key(attribute, option),
            format!("expected a boolean, found {other:?}"),
        )),
    }
}

/// Enumerations that can be read from an integral value or a member name.
pub(super) trait AttributeEnum: Sized {
    fn from_ordinal(value: i64) -> Option<Self>;
    fn from_name(name: &str) -> Option<Self>;
}

fn enum_arg<E: AttributeEnum>(
    attribute: &AttributeData,
    option: &str,
    value: &AttributeValue,
) -> GenerationResult<E> {
    let decoded = match value {
        AttributeValue::Int(ordinal) => E::from_ordinal(*ordinal),
        AttributeValue::Str(name) => E::from_name(name.rsplit('.').next().unwrap_or(name)),
        AttributeValue::Bool(_) | AttributeValue::Type(_) => None,
    };
    decoded.ok_or_else(|| {
        GenerationError::invalid(
            key(attribute, option),
            format!("unsupported value {value:?}"),
        )
    })
}

impl AttributeEnum for NullableStrategy {
    fn from_ordinal(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Default),
            1 => Some(Self::Disabled),
            2 => Some(Self::Enabled),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "Default" => Some(Self::Default),
            "Disabled" => Some(Self::Disabled),
            "Enabled" => Some(Self::Enabled),
            _ => None,
        }
    }
}

impl AttributeEnum for InterfaceStrategy {
    fn from_ordinal(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::All),
            2 => Some(Self::WithoutGenericCollection),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(Self::None),
            "All" => Some(Self::All),
            "WithoutGenericCollection" => Some(Self::WithoutGenericCollection),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::TypeKind;

    fn attribute(name: &str, arguments: Vec<Option<AttributeValue>>) -> AttributeData {
        AttributeData {
            name: name.to_owned(),
            arguments,
            location: None,
        }
    }

    fn text(value: &str) -> Option<AttributeValue> {
        Some(AttributeValue::Str(value.to_owned()))
    }

    #[test]
    fn make_builder_arguments_are_read_by_position() -> anyhow::Result<()> {
        let entity = TypeRef::named("Shop", "Order", TypeKind::Class);
        let make = attribute(
            "MakeBuilderAttribute",
            vec![
                Some(AttributeValue::Type(entity.clone())),
                text("Having"),
                None,
                Some(AttributeValue::Int(2)),
                None,
                Some(AttributeValue::Bool(true)),
            ],
        );
        let layer = read_invocation(&make)?;
        anyhow::ensure!(entity_argument(&make) == Some(&entity), "entity mismatch");
        anyhow::ensure!(
            layer.builder.method_prefix.as_deref() == Some("Having"),
            "prefix mismatch"
        );
        anyhow::ensure!(layer.builder.default_static_creator.is_none(), "unset expected");
        anyhow::ensure!(
            layer.builder.nullable_strategy == Some(NullableStrategy::Enabled),
            "nullable mismatch"
        );
        anyhow::ensure!(layer.builder.implicit_cast == Some(true), "cast mismatch");
        anyhow::ensure!(
            layer.builder.initialize_collections_with_empty.is_none(),
            "missing trailing arguments stay unset"
        );
        Ok(())
    }

    #[test]
    fn presets_sit_beneath_explicit_arguments() -> anyhow::Result<()> {
        let moq = attribute("MoqConfiguration", vec![text("All")]);
        let layer = read_layer(ConfigProvenance::Assembly, &[moq])?;
        anyhow::ensure!(
            layer.mocking.strategy == Some(InterfaceStrategy::All),
            "explicit strategy should win over the preset"
        );
        anyhow::ensure!(
            layer.mocking.return_object_format.as_deref() == Some("{0}.Object"),
            "preset format expected"
        );
        Ok(())
    }

    #[test]
    fn wrongly_typed_arguments_are_rejected() {
        let broken = attribute("BuilderConfiguration", vec![Some(AttributeValue::Bool(true))]);
        let err = read_layer(ConfigProvenance::Type, &[broken]);
        assert!(matches!(
            err,
            Err(GenerationError::InvalidConfiguration { ref key, .. })
                if key == "BuilderConfiguration.buildingMethodsPrefix"
        ));
    }

    #[test]
    fn enum_members_are_accepted_by_qualified_name() -> anyhow::Result<()> {
        let mocking = attribute(
            "MockingConfiguration",
            vec![text("MockingInterfacesStrategy.WithoutGenericCollection")],
        );
        let layer = read_layer(ConfigProvenance::Type, &[mocking])?;
        anyhow::ensure!(
            layer.mocking.strategy == Some(InterfaceStrategy::WithoutGenericCollection),
            "strategy mismatch: {:?}",
            layer.mocking.strategy
        );
        Ok(())
    }

    #[test]
    fn unrelated_attributes_are_ignored() -> anyhow::Result<()> {
        let layer = read_layer(
            ConfigProvenance::Assembly,
            &[attribute("Obsolete", vec![text("old")])],
        )?;
        anyhow::ensure!(layer.is_empty(), "layer should be empty");
        Ok(())
    }
}
