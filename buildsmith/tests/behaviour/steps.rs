//! Step definitions driving snapshot construction and generation.

use anyhow::{Result, anyhow, ensure};
use buildsmith::naming::pascal_case;
use buildsmith::semantic::{TypeKind, TypeRef};
use buildsmith::{Compilation, Diagnostic, GenerationReport, generate_all};
use rstest_bdd_macros::{given, then, when};
use test_helpers::snapshot::{TypeFixture, attribute, text};
use test_helpers::text::{has_line, normalize_scalar};

use crate::fixtures::GenerationContext;

/// Namespace holding every entity declared by the scenarios.
const MODEL_NAMESPACE: &str = "Model";

fn entity_ref(name: &str) -> TypeRef {
    TypeRef::named(MODEL_NAMESPACE, name, TypeKind::Class)
}

fn declare(generation_context: &GenerationContext, fixture: TypeFixture) {
    let mut types = generation_context.types.take().unwrap_or_default();
    types.push(fixture.build());
    generation_context.types.set(types);
}

fn report(generation_context: &GenerationContext) -> Result<GenerationReport> {
    generation_context
        .report
        .get()
        .ok_or_else(|| anyhow!("builders have not been generated"))
}

#[given("an entity {name} constructed from {parameters}")]
fn entity_with_parameters(
    generation_context: &GenerationContext,
    name: String,
    parameters: String,
) -> Result<()> {
    let mut params = Vec::new();
    for pair in normalize_scalar(&parameters).split(',') {
        let (param, ty) = pair
            .split_once(':')
            .ok_or_else(|| anyhow!("expected name:type, got {pair:?}"))?;
        params.push((param.trim().to_owned(), TypeRef::keyword(ty.trim())));
    }
    let borrowed: Vec<(&str, TypeRef)> = params
        .iter()
        .map(|(param, ty)| (param.as_str(), ty.clone()))
        .collect();
    let fixture = params.iter().fold(
        TypeFixture::class(MODEL_NAMESPACE, &name).public_constructor(&borrowed),
        |fixture, (param, ty)| fixture.read_only(&pascal_case(param), ty.clone()),
    );
    declare(generation_context, fixture);
    Ok(())
}

#[given("an abstract entity {name}")]
fn abstract_entity(generation_context: &GenerationContext, name: String) {
    declare(
        generation_context,
        TypeFixture::class(MODEL_NAMESPACE, &name).abstract_class(),
    );
}

#[given("a builder {builder} in {namespace} for {entity}")]
fn builder_for(
    generation_context: &GenerationContext,
    builder: String,
    namespace: String,
    entity: String,
) {
    declare(
        generation_context,
        TypeFixture::class(&namespace, &builder).make_builder(entity_ref(&entity), vec![]),
    );
}

#[given("the builder {builder} in {namespace} for {entity} declares the method prefix {prefix}")]
fn builder_with_prefix(
    generation_context: &GenerationContext,
    builder: String,
    namespace: String,
    entity: String,
    prefix: String,
) {
    let fixture = TypeFixture::class(&namespace, &builder)
        .attribute(attribute(
            "BuilderConfiguration",
            vec![text(&normalize_scalar(&prefix))],
        ))
        .make_builder(entity_ref(&entity), vec![]);
    declare(generation_context, fixture);
}

#[given("the assembly sets the method prefix {prefix}")]
fn assembly_prefix(generation_context: &GenerationContext, prefix: String) {
    let mut attributes = generation_context
        .assembly_attributes
        .take()
        .unwrap_or_default();
    attributes.push(attribute(
        "BuilderConfiguration",
        vec![text(&normalize_scalar(&prefix))],
    ));
    generation_context.assembly_attributes.set(attributes);
}

#[given("the compilation enables nullable annotations")]
fn nullable_compilation(generation_context: &GenerationContext) {
    generation_context.nullable_enabled.set(true);
}

#[when("builders are generated")]
fn generate(generation_context: &GenerationContext) {
    let model = Compilation::new(
        generation_context.nullable_enabled.get().unwrap_or(false),
        generation_context
            .assembly_attributes
            .get()
            .unwrap_or_default(),
        generation_context.types.get().unwrap_or_default(),
    );
    generation_context.report.set(generate_all(&model));
}

#[then("the file {name} is generated")]
fn file_generated(generation_context: &GenerationContext, name: String) -> Result<()> {
    let report = report(generation_context)?;
    let wanted = normalize_scalar(&name);
    ensure!(
        report.file(&wanted).is_some(),
        "{wanted} missing; files: {:?}",
        report.files
    );
    Ok(())
}

#[then("the file {name} contains the line {line}")]
fn file_contains_line(
    generation_context: &GenerationContext,
    name: String,
    line: String,
) -> Result<()> {
    let report = report(generation_context)?;
    let wanted = normalize_scalar(&name);
    let file = report
        .file(&wanted)
        .ok_or_else(|| anyhow!("{wanted} was not generated"))?;
    let expected = normalize_scalar(&line);
    ensure!(
        has_line(&file.text, &expected),
        "{expected:?} not found in:\n{}",
        file.text
    );
    Ok(())
}

#[then("no file is generated")]
fn no_file(generation_context: &GenerationContext) -> Result<()> {
    let report = report(generation_context)?;
    ensure!(report.files.is_empty(), "unexpected files {:?}", report.files);
    Ok(())
}

#[then("the generated files are {names}")]
fn generated_files(generation_context: &GenerationContext, names: String) -> Result<()> {
    let report = report(generation_context)?;
    let expected: Vec<String> = normalize_scalar(&names)
        .split(',')
        .map(|name| name.trim().to_owned())
        .collect();
    let actual: Vec<String> = report.files.iter().map(|file| file.name.clone()).collect();
    ensure!(actual == expected, "expected {expected:?}, got {actual:?}");
    Ok(())
}

#[then("diagnostic {id} is reported")]
fn diagnostic_reported(generation_context: &GenerationContext, id: String) -> Result<()> {
    let report = report(generation_context)?;
    let wanted = normalize_scalar(&id);
    ensure!(
        report.diagnostics.iter().map(Diagnostic::id).any(|found| found == wanted),
        "{wanted} not reported; got {:?}",
        report.diagnostics
    );
    Ok(())
}

#[then("no diagnostics are reported")]
fn no_diagnostics(generation_context: &GenerationContext) -> Result<()> {
    let report = report(generation_context)?;
    ensure!(
        report.diagnostics.is_empty(),
        "unexpected diagnostics {:?}",
        report.diagnostics
    );
    Ok(())
}
