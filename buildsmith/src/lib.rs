//! Builder source generator.
//!
//! `buildsmith` reads a compiler's semantic view of a C# compilation and,
//! for every partial class annotated with `[MakeBuilder(typeof(T))]`, emits
//! the body of a fluent test-data builder for `T`: tracked fields, `With*`
//! setters, `Build`, `BuildMany`, static helpers and optional mocking and
//! fixture wiring.
//!
//! The pipeline per builder is [`config::resolve_configuration`] →
//! [`resolver::resolve_entity`] → [`classify::classify`] →
//! [`synth::synthesize`]. [`generate_all`] runs it for every builder in
//! parallel and collects generated files alongside [`Diagnostic`]s.
//!
//! ```rust
//! use buildsmith::{Compilation, generate_all};
//!
//! let model = Compilation::from_json(r#"{ "types": [] }"#)?;
//! let report = generate_all(&model);
//! assert!(report.files.is_empty());
//! # Ok::<(), buildsmith::GenerationError>(())
//! ```

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod driver;
mod error;
pub mod naming;
pub mod output;
pub mod plan;
pub mod resolver;
pub mod semantic;
pub mod synth;

#[cfg(test)]
mod test_support;

pub use diagnostics::{Diagnostic, DiagnosticDescriptor, DiagnosticSink, Severity, SourceSink};
pub use driver::{
    GeneratedFile, GenerationReport, GenerationUnit, UnitOutput, discover_units, generate_all,
    generate_builder, generate_into,
};
pub use error::{GenerationError, GenerationResult};
pub use semantic::{Compilation, SemanticModel};
