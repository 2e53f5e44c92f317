//! Constructor, `Build` family, static helpers and hooks.

use tracing::debug;

use super::members::MemberPlan;
use super::writer::SourceWriter;
use super::Synth;
use crate::classify::CollectionKind;
use crate::config::InterfaceStrategy;
use crate::naming::{apply_format, escape_identifier};
use crate::plan::names;
use crate::resolver::{MemberKind, TypedMember};

/// Name of the reflection helper assigning unreachable properties.
const SET_UNREACHABLE: &str = "SetUnreachableProperty";

/// Name of the static creation property.
const STATIC_PROPERTY: &str = "Builder";

/// Metadata name of implicit conversion operators.
const IMPLICIT_OPERATOR: &str = "op_Implicit";

/// Default element count of `BuildMany`.
const BUILD_MANY_COUNT: usize = 3;

impl Synth<'_> {
    /// Emit the parameterless constructor; `false` when the user wrote one.
    pub(super) fn render_constructor(&mut self, out: &mut SourceWriter) -> bool {
        if self.builder.has_default_constructor {
            self.report_constructor_override();
            return false;
        }
        out.gap();
        out.line(&format!("public {}()", self.builder.name));
        out.open();
        for plan in &self.members {
            if let Some(init) = self.initial_value(plan) {
                out.line(&format!("{} = {init};", plan.member.field_name));
            }
        }
        if let Some(config) = self.fixture_configuration() {
            out.line(&config);
        }
        out.line(&format!("{}();", names::PRE_BUILD));
        out.close();
        true
    }

    fn initial_value(&self, plan: &MemberPlan<'_>) -> Option<String> {
        let bare = plan.bare_type.display();
        if plan.mockable() {
            return Some(apply_format(
                &self.config.mocking.field_default_value_format,
                &[&bare],
            ));
        }
        let value = if plan.classification.fakeable {
            apply_format(
                &self.config.fixture.create_single_format,
                &[names::FIXTURE_FIELD, &bare],
            )
        } else {
            let collection = plan
                .collection()
                .filter(|_| self.config.builder.initialize_collections_with_empty)
                .filter(|_| plan.default_value.is_none())?;
            empty_collection(plan, collection)
        };
        Some(format!("new NullBox<{}>({value})", plan.type_text()))
    }

    fn fixture_configuration(&self) -> Option<String> {
        if self.config.fixture.strategy == InterfaceStrategy::None {
            return None;
        }
        let snippet = self.config.fixture.additional_configuration.as_deref()?.trim();
        if snippet.is_empty() {
            return None;
        }
        let statement = apply_format(snippet, &[names::FIXTURE_FIELD]);
        Some(if statement.ends_with(';') || statement.ends_with('}') {
            statement
        } else {
            format!("{statement};")
        })
    }

    /// Emit `Build()`; `false` when it is hand-written or cannot be built.
    pub(super) fn render_build(&mut self, out: &mut SourceWriter) -> bool {
        self.report_overrides();
        if self.builder.has_build {
            return false;
        }
        let Some(parameters) = self.entity.constructor_parameters.as_ref() else {
            debug!(entity = %self.entity.full_name(), "no accessible constructor");
            return false;
        };
        let arguments: Vec<String> = parameters
            .iter()
            .map(|param| self.value_of(param))
            .collect();
        let initializers: Vec<String> = self
            .entity
            .settable_for_generation()
            .filter(|prop| !self.skipped.contains(&prop.pascal_name))
            .map(|prop| format!("{} = {},", prop.name, self.value_of(prop)))
            .collect();

        out.gap();
        out.line(&format!("public {} {}()", self.entity_type, names::BUILD));
        out.open();
        let terminator = if initializers.is_empty() { ";" } else { "" };
        if arguments.is_empty() {
            out.line(&format!("var result = new {}(){terminator}", self.entity_type));
        } else {
            out.line(&format!("var result = new {}(", self.entity_type));
            out.indent();
            let last = arguments.len() - 1;
            for (index, argument) in arguments.iter().enumerate() {
                if index == last {
                    out.line(&format!("{argument}){terminator}"));
                } else {
                    out.line(&format!("{argument},"));
                }
            }
            out.outdent();
        }
        if !initializers.is_empty() {
            out.open();
            out.lines(initializers.iter().map(String::as_str));
            out.close_with(";");
        }
        for plan in self.unreachable_members() {
            let field = &plan.member.field_name;
            let name = &plan.member.name;
            if plan.mockable() {
                let value = apply_format(&self.config.mocking.return_object_format, &[field]);
                out.line(&format!("{SET_UNREACHABLE}(result, \"{name}\", {value});"));
            } else {
                out.line(&format!("if ({field}.HasValue)"));
                out.open();
                out.line(&format!(
                    "{SET_UNREACHABLE}(result, \"{name}\", {field}.Value.Object);"
                ));
                out.close();
            }
        }
        out.line(&format!("{}(result);", names::POST_BUILD));
        out.line("return result;");
        out.close();
        true
    }

    /// Expression producing the current value of `member` inside `Build()`.
    fn value_of(&self, member: &TypedMember) -> String {
        let plan = self
            .members
            .iter()
            .find(|plan| plan.member.pascal_name == member.pascal_name);
        match plan {
            Some(plan) if plan.mockable() => apply_format(
                &self.config.mocking.return_object_format,
                &[&plan.member.field_name],
            ),
            Some(plan) => {
                let field = &plan.member.field_name;
                format!(
                    "{field}.HasValue ? {field}.Value.Object : {}",
                    self.default_of(&member.type_ref)
                )
            }
            None => self.default_of(&member.type_ref),
        }
    }

    fn unreachable_members(&self) -> impl Iterator<Item = &MemberPlan<'_>> {
        self.members
            .iter()
            .filter(|plan| plan.kind() == MemberKind::ReadOnlyProperty)
    }

    pub(super) fn render_build_many(&mut self, out: &mut SourceWriter, build_available: bool) {
        if self.builder.has_build_many {
            self.report_build_many_override();
            return;
        }
        if !build_available {
            return;
        }
        out.gap();
        out.line(&format!(
            "public System.Collections.Generic.IEnumerable<{}> {}(int count = {BUILD_MANY_COUNT})",
            self.entity_type,
            names::BUILD_MANY
        ));
        out.open();
        out.line(&format!(
            "return Enumerable.Range(0, count).Select(_ => {}());",
            names::BUILD
        ));
        out.close();
    }

    pub(super) fn render_build_default(&self, out: &mut SourceWriter) {
        if !self.config.builder.default_static_creator || self.builder.has_build_default {
            return;
        }
        let Some(parameters) = self.entity.constructor_parameters.as_ref() else {
            return;
        };
        let declarations: Vec<String> = parameters
            .iter()
            .map(|param| {
                format!(
                    "{} {} = default({})",
                    param.type_ref.display(),
                    escape_identifier(&param.name),
                    param.type_ref.display()
                )
            })
            .collect();
        let arguments: Vec<String> = parameters
            .iter()
            .map(|param| escape_identifier(&param.name))
            .collect();
        out.gap();
        out.line(&format!(
            "public static {} {}({})",
            self.entity_type,
            names::BUILD_DEFAULT,
            declarations.join(", ")
        ));
        out.open();
        out.line(&format!(
            "return new {}({});",
            self.entity_type,
            arguments.join(", ")
        ));
        out.close();
    }

    pub(super) fn render_static_factory(&self, out: &mut SourceWriter) {
        let Some(name) = self.config.builder.static_factory_method_name.as_deref() else {
            return;
        };
        if self.builder.declares(name) {
            return;
        }
        out.gap();
        out.line(&format!("public static {} {name}()", self.builder_type));
        out.open();
        out.line(&format!("return new {}();", self.builder_type));
        out.close();
    }

    pub(super) fn render_static_property(&self, out: &mut SourceWriter) {
        if !self
            .config
            .builder
            .generate_static_property_for_builder_creation
            || self.builder.declares(STATIC_PROPERTY)
        {
            return;
        }
        out.gap();
        out.line(&format!(
            "public static {0} {STATIC_PROPERTY} => new {0}();",
            self.builder_type
        ));
    }

    pub(super) fn render_implicit_cast(&self, out: &mut SourceWriter) {
        if !self.config.builder.implicit_cast || self.builder.declares(IMPLICIT_OPERATOR) {
            return;
        }
        out.gap();
        out.line(&format!(
            "public static implicit operator {}({} builder)",
            self.entity_type, self.builder_type
        ));
        out.open();
        out.line(&format!("return builder.{}();", names::BUILD));
        out.close();
    }

    pub(super) fn render_hooks(
        &self,
        out: &mut SourceWriter,
        constructor_generated: bool,
        build_generated: bool,
    ) {
        if constructor_generated && !self.builder.has_pre_build {
            out.gap();
            out.line(&format!("public void {}()", names::PRE_BUILD));
            out.open();
            out.close();
        }
        if build_generated && !self.builder.has_post_build {
            out.gap();
            out.line(&format!(
                "public void {}({} entity)",
                names::POST_BUILD,
                self.entity_type
            ));
            out.open();
            out.close();
        }
        if build_generated
            && self.unreachable_members().next().is_some()
            && !self.builder.declares(SET_UNREACHABLE)
        {
            render_set_unreachable(out);
        }
    }
}

fn empty_collection(plan: &MemberPlan<'_>, collection: &CollectionKind) -> String {
    match collection {
        CollectionKind::Array { element } => {
            format!("System.Array.Empty<{}>()", element.display())
        }
        _ => format!("new {}()", collection.backing_type(&plan.bare_type).display()),
    }
}

/// Assign a property through its setter of any accessibility, else through
/// the compiler-generated backing field of an auto-property.
fn render_set_unreachable(out: &mut SourceWriter) {
    const FLAGS: &str = "System.Reflection.BindingFlags.Instance | System.Reflection.BindingFlags.Public | System.Reflection.BindingFlags.NonPublic";
    out.gap();
    out.line(&format!(
        "private static void {SET_UNREACHABLE}(object target, string name, object value)"
    ));
    out.open();
    out.line("var type = target.GetType();");
    out.line(&format!("var property = type.GetProperty(name, {FLAGS});"));
    out.line("if (property != null && property.CanWrite)");
    out.open();
    out.line("property.SetValue(target, value);");
    out.line("return;");
    out.close();
    out.line("for (var current = type; current != null; current = current.BaseType)");
    out.open();
    out.line(&format!(
        "var field = current.GetField(\"<\" + name + \">k__BackingField\", {FLAGS});"
    ));
    out.line("if (field != null)");
    out.open();
    out.line("field.SetValue(target, value);");
    out.line("return;");
    out.close();
    out.close();
    out.close();
}
