//! Generation driver: discovers builders and runs every unit.
//!
//! Units share nothing but the immutable semantic model, so they run in
//! parallel. A failing unit turns into a diagnostic; its siblings are
//! unaffected. Only the first `MakeBuilder` on a partial class is generated;
//! later ones fail, since both would declare the same members. File names are assigned afterwards in discovery order, so
//! the report is identical from run to run.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::attributes::{MAKE_BUILDER, entity_argument};
use crate::config::resolve_configuration;
use crate::diagnostics::{ABSTRACT_ENTITY, Diagnostic, DiagnosticSink, SourceSink, UNIT_FAILED};
use crate::output::FileNameAllocator;
use crate::plan::BuilderPlan;
use crate::resolver::resolve_entity;
use crate::semantic::{AttributeData, NamedType, SemanticModel, TypeRef};
use crate::synth::{SynthesisInput, synthesize};
use crate::{GenerationError, GenerationResult};

/// One `(builder declaration, MakeBuilder application)` pair.
#[derive(Clone, Copy, Debug)]
pub struct GenerationUnit<'a> {
    /// Partial class receiving the generated members.
    pub builder: &'a NamedType,
    /// The `MakeBuilder` application naming the entity.
    pub attribute: &'a AttributeData,
    /// The first `MakeBuilder` application on `builder`, when this is a
    /// later one.
    pub shadowed_by: Option<&'a AttributeData>,
}

/// Result of one unit before a file name is assigned.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnitOutput {
    /// Simple name of the builder.
    pub builder: String,
    /// Generated source; `None` when nothing may be emitted.
    pub source: Option<String>,
    /// Diagnostics raised by the unit.
    pub diagnostics: Vec<Diagnostic>,
}

/// A generated source file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedFile {
    /// Unique file name, e.g. `OrderBuilder.g.cs`.
    pub name: String,
    /// File contents.
    pub text: String,
}

/// Files and diagnostics of a whole run, in discovery order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GenerationReport {
    /// Generated files.
    pub files: Vec<GeneratedFile>,
    /// Diagnostics of every unit.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationReport {
    /// Returns `true` when any error-severity diagnostic was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Looks up a generated file by name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|file| file.name == name)
    }
}

impl SourceSink for GenerationReport {
    fn add_source(&mut self, name: String, text: String) {
        self.files.push(GeneratedFile { name, text });
    }
}

impl DiagnosticSink for GenerationReport {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Every `MakeBuilder` application in the model, in snapshot order.
#[must_use]
pub fn discover_units<M: SemanticModel + ?Sized>(model: &M) -> Vec<GenerationUnit<'_>> {
    model
        .types()
        .iter()
        .flat_map(|builder| {
            let mut applications = builder
                .attributes
                .iter()
                .filter(|attribute| attribute.is(MAKE_BUILDER));
            let first = applications.next();
            first
                .map(|attribute| GenerationUnit {
                    builder,
                    attribute,
                    shadowed_by: None,
                })
                .into_iter()
                .chain(applications.map(move |attribute| GenerationUnit {
                    builder,
                    attribute,
                    shadowed_by: first,
                }))
        })
        .collect()
}

/// Plan and synthesise one builder.
///
/// Abstract entities produce a [`ABSTRACT_ENTITY`] diagnostic and no source.
///
/// # Errors
///
/// Returns [`GenerationError::MissingEntityArgument`] when the attribute
/// names no type, [`GenerationError::InvalidConfiguration`] for unusable
/// configuration and [`GenerationError::UnresolvedType`] when the entity is
/// not declared.
pub fn generate_builder<M: SemanticModel + ?Sized>(
    model: &M,
    builder: &NamedType,
    attribute: &AttributeData,
) -> GenerationResult<UnitOutput> {
    let entity_ref =
        entity_argument(attribute).ok_or_else(|| GenerationError::MissingEntityArgument {
            builder: builder.name.clone(),
        })?;
    let config = resolve_configuration(model, builder, attribute)?;
    let entity = resolve_entity(model, entity_ref)?;
    if entity.is_abstract {
        return Ok(UnitOutput {
            builder: builder.name.clone(),
            source: None,
            diagnostics: vec![Diagnostic::new(
                &ABSTRACT_ENTITY,
                attribute.location.clone().or_else(|| builder.location.clone()),
                vec![builder.name.clone(), entity.full_name()],
            )],
        });
    }
    let plan = BuilderPlan::from_declaration(builder);
    let output = synthesize(
        model,
        SynthesisInput {
            entity: &entity,
            config: &config,
            builder: &plan,
        },
    );
    Ok(UnitOutput {
        builder: builder.name.clone(),
        source: Some(output.text),
        diagnostics: output.diagnostics,
    })
}

/// Run one unit, converting failure into a diagnostic.
fn run_unit<M: SemanticModel + ?Sized>(model: &M, unit: GenerationUnit<'_>) -> UnitOutput {
    let outcome = unit.shadowed_by.map_or_else(
        || generate_builder(model, unit.builder, unit.attribute),
        |first| {
            Err(GenerationError::DuplicateTarget {
                builder: unit.builder.name.clone(),
                first: entity_argument(first).map(TypeRef::display).unwrap_or_default(),
            })
        },
    );
    outcome.unwrap_or_else(|err| {
        warn!(builder = %unit.builder.name, error = %err, "builder generation failed");
        UnitOutput {
            builder: unit.builder.name.clone(),
            source: None,
            diagnostics: vec![Diagnostic::new(
                &UNIT_FAILED,
                unit.shadowed_by
                    .and(unit.attribute.location.clone())
                    .or_else(|| unit.builder.location.clone()),
                vec![unit.builder.name.clone(), err.to_string()],
            )],
        }
    })
}

/// Generate every builder declared in `model`.
#[must_use]
pub fn generate_all<M: SemanticModel + ?Sized>(model: &M) -> GenerationReport {
    let mut report = GenerationReport::default();
    generate_into(model, &mut report);
    report
}

/// Generate every builder declared in `model`, feeding `sink`.
pub fn generate_into<M, S>(model: &M, sink: &mut S)
where
    M: SemanticModel + ?Sized,
    S: SourceSink + DiagnosticSink,
{
    let units = discover_units(model);
    let outputs: Vec<UnitOutput> = units
        .par_iter()
        .map(|unit| run_unit(model, *unit))
        .collect();
    let allocator = FileNameAllocator::new();
    for output in outputs {
        if let Some(text) = output.source {
            let name = allocator.allocate(&output.builder);
            info!(file = %name, bytes = text.len(), "generated builder");
            sink.add_source(name, text);
        }
        for diagnostic in output.diagnostics {
            sink.report(diagnostic);
        }
    }
}
