//! Code synthesis: renders the partial builder class.
//!
//! The synthesiser is a pure function of the entity shape, the resolved
//! configuration, the builder's hand-written members and the semantic model
//! used for classification. Identical inputs give byte-identical text.
//!
//! Every generated field that is not mocked holds a `NullBox<T>?`: `null`
//! means "never assigned", a box means "assigned", even when the boxed value
//! is itself `null` or zero. `Build()` therefore distinguishes an explicit
//! `WithLabel(null)` from an untouched member.

mod build;
mod members;
mod namespaces;
mod setters;
mod writer;

use std::collections::HashSet;

use tracing::debug;

use crate::config::{ConfigurationPlan, InterfaceStrategy, NullableStrategy};
use crate::diagnostics::{
    BUILD_MANY_OVERRIDE, BUILD_OVERRIDE, DEFAULT_CONSTRUCTOR_OVERRIDE, Diagnostic,
    NO_ACCESSIBLE_CONSTRUCTOR,
};
use crate::plan::{BuilderPlan, names};
use crate::resolver::EntityShape;
use crate::semantic::{SemanticModel, TypeRef};

use members::{MemberPlan, plan_members};
use writer::SourceWriter;

pub use namespaces::{BASE_NAMESPACES, HELPERS_NAMESPACE, using_namespaces};

/// Everything the synthesiser needs for one builder.
#[derive(Clone, Copy, Debug)]
pub struct SynthesisInput<'a> {
    /// Shape of the entity under construction.
    pub entity: &'a EntityShape,
    /// Resolved configuration of the unit.
    pub config: &'a ConfigurationPlan,
    /// Hand-written members of the builder.
    pub builder: &'a BuilderPlan,
}

/// Generated text plus the diagnostics raised while producing it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SynthesisOutput {
    /// Complete source of the partial class.
    pub text: String,
    /// Diagnostics in emission order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Render the builder for `input`.
#[must_use]
pub fn synthesize<M: SemanticModel + ?Sized>(
    model: &M,
    input: SynthesisInput<'_>,
) -> SynthesisOutput {
    let plans = plan_members(model, input.entity, input.config, input.builder);
    let mut synth = Synth {
        entity: input.entity,
        config: input.config,
        builder: input.builder,
        members: plans.members,
        skipped: plans.skipped,
        builder_type: builder_type(input.builder, input.entity),
        entity_type: local_name(&input.entity.type_ref),
        diagnostics: plans.diagnostics,
    };
    let text = synth.render();
    debug!(
        builder = %synth.builder.name,
        members = synth.members.len(),
        diagnostics = synth.diagnostics.len(),
        "synthesised builder"
    );
    SynthesisOutput {
        text,
        diagnostics: synth.diagnostics,
    }
}

/// Builder name followed by the entity's open type parameters.
fn builder_type(builder: &BuilderPlan, entity: &EntityShape) -> String {
    if entity.open_type_parameters.is_empty() {
        builder.name.clone()
    } else {
        let params: Vec<&str> = entity
            .open_type_parameters
            .iter()
            .map(|param| param.name.as_str())
            .collect();
        format!("{}<{}>", builder.name, params.join(", "))
    }
}

/// Simple name with namespace-qualified type arguments.
fn local_name(ty: &TypeRef) -> String {
    TypeRef {
        namespace: None,
        ..ty.clone()
    }
    .display()
}

struct Synth<'a> {
    entity: &'a EntityShape,
    config: &'a ConfigurationPlan,
    builder: &'a BuilderPlan,
    members: Vec<MemberPlan<'a>>,
    skipped: HashSet<String>,
    builder_type: String,
    entity_type: String,
    diagnostics: Vec<Diagnostic>,
}

impl Synth<'_> {
    fn render(&mut self) -> String {
        let mut out = SourceWriter::new();
        out.line("// <auto-generated/>");
        out.line("#pragma warning disable CS1591");
        match self.config.builder.nullable_strategy {
            NullableStrategy::Enabled => out.line("#nullable enable"),
            NullableStrategy::Disabled => out.line("#nullable disable"),
            NullableStrategy::Default => {}
        }
        for namespace in using_namespaces(self.entity, self.config) {
            out.line(&format!("using {namespace};"));
        }
        out.line("");

        let namespaced = !self.builder.namespace.is_empty();
        if namespaced {
            out.line(&format!("namespace {}", self.builder.namespace));
            out.open();
        }
        self.render_class(&mut out);
        if namespaced {
            out.close();
        }

        if self.config.builder.nullable_strategy != NullableStrategy::Default {
            out.line("#nullable restore");
        }
        out.finish()
    }

    fn render_class(&mut self, out: &mut SourceWriter) {
        out.line(&format!("partial class {}", self.builder_type));
        let clauses = self.entity.constraint_clauses();
        out.indent();
        for clause in &clauses {
            out.line(clause);
        }
        out.outdent();
        out.open();

        self.render_fields(out);
        let constructor_generated = self.render_constructor(out);
        self.render_setters(out);

        let build_generated = self.render_build(out);
        let build_available = build_generated || self.builder.has_build;
        self.render_build_many(out, build_available);
        self.render_build_default(out);
        self.render_static_factory(out);
        self.render_static_property(out);
        if build_available {
            self.render_implicit_cast(out);
        }
        self.render_hooks(out, constructor_generated, build_generated);

        out.close();
    }

    fn render_fields(&self, out: &mut SourceWriter) {
        if self.fixture_field_needed() {
            let fixture = &self.config.fixture;
            out.line(&format!(
                "private readonly {0} {1} = new {0}({2});",
                fixture.fixture_type_name,
                names::FIXTURE_FIELD,
                fixture.constructor_parameters.as_deref().unwrap_or_default()
            ));
        }
        for plan in self.members.iter().filter(|plan| plan.declare_field) {
            let initializer = plan
                .default_value
                .as_ref()
                .map(|default| format!(" = new NullBox<{}>({default})", plan.type_text()))
                .unwrap_or_default();
            out.line(&format!(
                "private {} {}{initializer};",
                plan.field_type, plan.member.field_name
            ));
        }
    }

    fn fixture_field_needed(&self) -> bool {
        self.config.fixture.strategy != InterfaceStrategy::None
            && self.builder.field(names::FIXTURE_FIELD).is_none()
    }

    /// `default(T)`, with the null-forgiving operator in nullable contexts.
    fn default_of(&self, ty: &TypeRef) -> String {
        let suffix = if self.config.builder.nullable_strategy == NullableStrategy::Enabled {
            "!"
        } else {
            ""
        };
        format!("default({}){suffix}", ty.display())
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn report_overrides(&mut self) {
        if self.builder.has_build {
            self.report(Diagnostic::new(
                &BUILD_OVERRIDE,
                self.builder.location_of(names::BUILD),
                vec![self.builder.name.clone()],
            ));
        } else if self.entity.constructor_parameters.is_none() {
            self.report(Diagnostic::new(
                &NO_ACCESSIBLE_CONSTRUCTOR,
                self.builder.location.clone(),
                vec![self.entity.full_name(), self.builder.name.clone()],
            ));
        }
    }

    fn report_build_many_override(&mut self) {
        self.report(Diagnostic::new(
            &BUILD_MANY_OVERRIDE,
            self.builder.location_of(names::BUILD_MANY),
            vec![self.builder.name.clone()],
        ));
    }

    fn report_constructor_override(&mut self) {
        self.report(Diagnostic::new(
            &DEFAULT_CONSTRUCTOR_OVERRIDE,
            self.builder
                .default_constructor_location
                .clone()
                .or_else(|| self.builder.location.clone()),
            vec![self.builder.name.clone()],
        ));
    }
}
