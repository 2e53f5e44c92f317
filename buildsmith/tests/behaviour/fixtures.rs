//! Shared scenario state for the behavioural suite.

use buildsmith::GenerationReport;
use buildsmith::semantic::{AttributeData, NamedType};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Declarations collected by `Given` steps and the report of the run.
#[derive(Debug, Default, ScenarioState)]
pub struct GenerationContext {
    pub types: Slot<Vec<NamedType>>,
    pub assembly_attributes: Slot<Vec<AttributeData>>,
    pub nullable_enabled: Slot<bool>,
    pub report: Slot<GenerationReport>,
}

/// Creates an empty generation context.
#[fixture]
pub fn generation_context() -> GenerationContext {
    GenerationContext::default()
}
