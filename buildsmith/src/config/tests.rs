//! Tests for configuration cascade resolution.

use super::*;
use crate::semantic::{AttributeValue, Compilation, TypeKind, TypeRef};
use anyhow::{Result, ensure};
use rstest::rstest;

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

fn make_builder(arguments: Vec<Option<AttributeValue>>) -> AttributeData {
    let mut all = vec![Some(AttributeValue::Type(TypeRef::named(
        "Shop",
        "Order",
        TypeKind::Class,
    )))];
    all.extend(arguments);
    attribute("MakeBuilder", all)
}

fn builder_with(attributes: Vec<AttributeData>) -> NamedType {
    NamedType {
        name: "OrderBuilder".to_owned(),
        namespace: "Shop.Tests".to_owned(),
        attributes,
        ..NamedType::default()
    }
}

#[test]
fn defaults_apply_when_nothing_is_configured() -> Result<()> {
    let model = Compilation::default();
    let plan = resolve_configuration(&model, &builder_with(vec![]), &make_builder(vec![]))?;
    ensure!(plan == ConfigurationPlan::default(), "unexpected plan {plan:?}");
    ensure!(plan.builder.method_prefix == "With", "prefix should default");
    ensure!(plan.builder.default_static_creator, "BuildDefault is on by default");
    ensure!(plan.mocking.strategy == InterfaceStrategy::None, "no mocking");
    Ok(())
}

#[test]
fn type_level_override_inherits_unset_strategy_from_assembly() -> Result<()> {
    let assembly = attribute(
        "MockingConfiguration",
        vec![Some(AttributeValue::Int(1)), None, None, None, text("Outer.Mocks")],
    );
    let type_level = attribute(
        "MockingConfiguration",
        vec![None, None, None, None, text("Inner.Mocks, Extra")],
    );
    let model = Compilation::new(false, vec![assembly], vec![]);
    let plan = resolve_configuration(
        &model,
        &builder_with(vec![type_level]),
        &make_builder(vec![]),
    )?;
    ensure!(
        plan.mocking.strategy == InterfaceStrategy::All,
        "strategy should be inherited, got {:?}",
        plan.mocking.strategy
    );
    ensure!(
        plan.mocking.additional_namespaces == vec!["Inner.Mocks", "Extra"],
        "namespaces should be overridden, got {:?}",
        plan.mocking.additional_namespaces
    );
    Ok(())
}

#[test]
fn invocation_arguments_override_builder_configuration() -> Result<()> {
    let assembly = attribute(
        "BuilderConfiguration",
        vec![text("Having"), None, None, None, Some(AttributeValue::Bool(true))],
    );
    let model = Compilation::new(false, vec![assembly], vec![]);
    let plan = resolve_configuration(
        &model,
        &builder_with(vec![]),
        &make_builder(vec![text("Using")]),
    )?;
    ensure!(plan.builder.method_prefix == "Using", "invocation prefix wins");
    ensure!(plan.builder.implicit_cast, "assembly implicit cast inherited");
    Ok(())
}

#[rstest]
#[case::unset_upgrades(None, true, NullableStrategy::Enabled)]
#[case::explicit_default_upgrades(Some(0), true, NullableStrategy::Enabled)]
#[case::disabled_is_kept(Some(1), true, NullableStrategy::Disabled)]
#[case::no_upgrade_without_project_flag(None, false, NullableStrategy::Default)]
#[case::explicit_enabled(Some(2), false, NullableStrategy::Enabled)]
fn nullable_strategy_follows_compilation_flag(
    #[case] argument: Option<i64>,
    #[case] nullable_enabled: bool,
    #[case] expected: NullableStrategy,
) -> Result<()> {
    let model = Compilation::new(nullable_enabled, vec![], vec![]);
    let plan = resolve_configuration(
        &model,
        &builder_with(vec![]),
        &make_builder(vec![None, None, argument.map(AttributeValue::Int)]),
    )?;
    ensure!(
        plan.builder.nullable_strategy == expected,
        "expected {expected:?}, got {:?}",
        plan.builder.nullable_strategy
    );
    Ok(())
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[case::punctuation("With-")]
fn invalid_prefixes_fail_the_unit(#[case] prefix: &str) {
    let model = Compilation::default();
    let result = resolve_configuration(
        &model,
        &builder_with(vec![]),
        &make_builder(vec![text(prefix)]),
    );
    assert!(matches!(
        result,
        Err(GenerationError::InvalidConfiguration { ref key, .. }) if key == "buildingMethodsPrefix"
    ));
}

#[test]
fn enabled_fixture_requires_a_type_name() {
    let fixture = attribute(
        "FixtureConfiguration",
        vec![Some(AttributeValue::Int(1)), text("")],
    );
    let model = Compilation::new(false, vec![fixture], vec![]);
    let result = resolve_configuration(&model, &builder_with(vec![]), &make_builder(vec![]));
    assert!(matches!(
        result,
        Err(GenerationError::InvalidConfiguration { ref key, .. }) if key == "fixtureTypeName"
    ));
}

#[test]
fn resolution_is_deterministic() -> Result<()> {
    let model = Compilation::new(
        true,
        vec![attribute("AutoFixtureConfiguration", vec![])],
        vec![],
    );
    let builder = builder_with(vec![attribute("MoqConfiguration", vec![])]);
    let invocation = make_builder(vec![text("With")]);
    let first = resolve_configuration(&model, &builder, &invocation)?;
    let second = resolve_configuration(&model, &builder, &invocation)?;
    ensure!(first == second, "resolution must be pure");
    ensure!(
        first.fixture.fixture_type_name == "AutoFixture.Fixture",
        "preset fixture type expected"
    );
    ensure!(
        first.mocking.additional_namespaces == vec!["Moq"],
        "preset namespace expected"
    );
    Ok(())
}
