//! Fluent `With*` setters and `AddTo*` collection helpers.

use tracing::debug;

use super::members::MemberPlan;
use super::writer::SourceWriter;
use super::Synth;
use crate::classify::CollectionKind;
use crate::plan::names;
use crate::semantic::{TypeKind, TypeRef};

impl Synth<'_> {
    pub(super) fn render_setters(&self, out: &mut SourceWriter) {
        for plan in &self.members {
            self.render_setter(out, plan);
            if let Some(collection) = plan.collection().filter(|_| !plan.mockable()) {
                self.render_add_to(out, plan, collection);
            }
        }
    }

    fn render_setter(&self, out: &mut SourceWriter, plan: &MemberPlan<'_>) {
        let name = format!(
            "{}{}",
            self.config.builder.method_prefix, plan.member.pascal_name
        );
        let field = &plan.member.field_name;
        if plan.mockable() {
            if self.has_delegate_overload(&name) {
                debug!(method = %name, "setter already declared");
                return;
            }
            out.gap();
            out.line(&format!(
                "public {} {name}(System.Action<{}> setup)",
                self.builder_type, plan.field_type
            ));
            out.open();
            out.line(&format!("setup({field});"));
            out.line("return this;");
            out.close();
        } else {
            if self
                .builder
                .has_overload(&name, std::slice::from_ref(&plan.member.type_ref))
            {
                debug!(method = %name, "setter already declared");
                return;
            }
            out.gap();
            out.line(&format!(
                "public {} {name}({} value)",
                self.builder_type,
                plan.type_text()
            ));
            out.open();
            out.line(&format!(
                "{field} = new NullBox<{}>(value);",
                plan.type_text()
            ));
            out.line("return this;");
            out.close();
        }
    }

    /// A single-parameter overload taking a delegate, such as a mock setup.
    fn has_delegate_overload(&self, name: &str) -> bool {
        self.builder.methods.get(name).is_some_and(|overloads| {
            overloads.iter().any(|method| {
                matches!(method.parameters.as_slice(), [only]
                    if only.type_ref.kind == TypeKind::Delegate || only.type_ref.name == "Action")
            })
        })
    }

    fn render_add_to(&self, out: &mut SourceWriter, plan: &MemberPlan<'_>, collection: &CollectionKind) {
        let name = format!("{}{}", names::ADD_TO_PREFIX, plan.member.pascal_name);
        let item = collection.item_type();
        let items = TypeRef::array_of(item.clone());
        if self.builder.has_overload(&name, std::slice::from_ref(&items)) {
            debug!(method = %name, "collection helper already declared");
            return;
        }
        let field = &plan.member.field_name;
        let boxed = plan.type_text();
        let current = format!("{field}.HasValue && {field}.Value.Object != null");

        out.gap();
        out.line(&format!(
            "public {} {name}(params {} items)",
            self.builder_type,
            items.display()
        ));
        out.open();
        if let CollectionKind::Array { element } = collection {
            out.line(&format!(
                "var current = {current} ? {field}.Value.Object : System.Array.Empty<{}>();",
                element.display()
            ));
            out.line(&format!(
                "{field} = new NullBox<{boxed}>(current.Concat(items).ToArray());"
            ));
        } else {
            let add = if collection.is_map() {
                "collection[item.Key] = item.Value;"
            } else {
                "collection.Add(item);"
            };
            out.line(&format!(
                "var collection = new {}();",
                collection.backing_type(&plan.bare_type).display()
            ));
            out.line(&format!("if ({current})"));
            out.open();
            out.line(&format!("foreach (var item in {field}.Value.Object)"));
            out.open();
            out.line(add);
            out.close();
            out.close();
            out.line("foreach (var item in items)");
            out.open();
            out.line(add);
            out.close();
            out.line(&format!("{field} = new NullBox<{boxed}>(collection);"));
        }
        out.line("return this;");
        out.close();
    }
}
