//! Per-member generation decisions.

use std::collections::HashSet;

use tracing::debug;

use super::namespaces::HELPERS_NAMESPACE;
use crate::classify::{Classification, CollectionKind, classify};
use crate::config::ConfigurationPlan;
use crate::diagnostics::{Diagnostic, INCOMPATIBLE_FIELD};
use crate::naming::apply_format;
use crate::plan::{BuilderPlan, same_type_name};
use crate::resolver::{EntityShape, MemberKind, TypedMember};
use crate::semantic::{Field, NameStyle, SemanticModel, TypeKind, TypeRef};

/// A member the builder carries state for.
#[derive(Clone, Debug)]
pub(super) struct MemberPlan<'a> {
    pub(super) member: &'a TypedMember,
    pub(super) classification: Classification,
    /// Member type without its nullable annotation.
    pub(super) bare_type: TypeRef,
    /// Type of the backing field.
    pub(super) field_type: String,
    /// The field has to be declared; `false` when the user declared it.
    pub(super) declare_field: bool,
    /// A `Default{Name}` field boxed into the initializer.
    pub(super) default_value: Option<String>,
}

impl MemberPlan<'_> {
    pub(super) const fn kind(&self) -> MemberKind {
        self.member.kind
    }

    pub(super) const fn mockable(&self) -> bool {
        self.classification.mockable
    }

    pub(super) const fn collection(&self) -> Option<&CollectionKind> {
        self.classification.collection.as_ref()
    }

    /// Declared member type as written in parameter lists.
    pub(super) fn type_text(&self) -> String {
        self.member.type_ref.display()
    }
}

/// Members selected for generation plus the ones skipped over conflicts.
pub(super) struct MemberPlans<'a> {
    pub(super) members: Vec<MemberPlan<'a>>,
    /// Pascal names of members whose field is taken by an incompatible
    /// hand-written declaration.
    pub(super) skipped: HashSet<String>,
    pub(super) diagnostics: Vec<Diagnostic>,
}

/// Decide how each constructor parameter and property is backed.
///
/// Constructor parameters come first, then settable properties, then, when
/// unreachable properties are generated, read-only ones. A name already
/// taken by an earlier bucket is not repeated.
pub(super) fn plan_members<'a, M: SemanticModel + ?Sized>(
    model: &M,
    entity: &'a EntityShape,
    config: &ConfigurationPlan,
    builder: &BuilderPlan,
) -> MemberPlans<'a> {
    let read_only = entity
        .read_only_for_generation()
        .filter(|_| config.builder.generate_methods_for_unreachable_properties);
    let mut seen = HashSet::new();
    let mut plans = MemberPlans {
        members: Vec::new(),
        skipped: HashSet::new(),
        diagnostics: Vec::new(),
    };
    for member in entity
        .parameters()
        .iter()
        .chain(entity.settable_for_generation())
        .chain(read_only)
    {
        if !seen.insert(member.pascal_name.as_str()) {
            debug!(member = %member.name, "member already represented");
            continue;
        }
        let classification = classify(model, &member.type_ref, config);
        let bare_type = TypeRef {
            nullable: false,
            ..member.type_ref.clone()
        };
        let field_type = if classification.mockable {
            apply_format(&config.mocking.type_declaration_format, &[&bare_type.display()])
        } else {
            format!("NullBox<{}>?", member.type_ref.display())
        };
        let declare_field = match builder.field(&member.field_name) {
            None => true,
            Some(field) if field_is_compatible(field, member, &classification, config) => false,
            Some(field) => {
                plans.diagnostics.push(Diagnostic::new(
                    &INCOMPATIBLE_FIELD,
                    builder.location.clone(),
                    vec![
                        field.name.clone(),
                        builder.name.clone(),
                        field.type_ref.display(),
                        field_type.clone(),
                        member.name.clone(),
                    ],
                ));
                plans.skipped.insert(member.pascal_name.clone());
                continue;
            }
        };
        let default_value = (classification.needs_explicit_default && declare_field)
            .then(|| builder.default_value_field(&member.pascal_name))
            .flatten()
            .map(|field| field.name.clone());
        plans.members.push(MemberPlan {
            member,
            classification,
            bare_type,
            field_type,
            declare_field,
            default_value,
        });
    }
    plans
}

/// Mock fields must match the mock declaration format; tracked fields must be
/// exactly `NullBox<T>?`.
fn field_is_compatible(
    field: &Field,
    member: &TypedMember,
    classification: &Classification,
    config: &ConfigurationPlan,
) -> bool {
    if classification.mockable {
        let format = &config.mocking.type_declaration_format;
        let declared = [
            field.type_ref.render(NameStyle::Full),
            field.type_ref.render(NameStyle::Simple),
        ];
        let bare = TypeRef {
            nullable: false,
            ..member.type_ref.clone()
        };
        [NameStyle::Full, NameStyle::Simple].iter().any(|style| {
            let expected = apply_format(format, &[&bare.render(*style)]);
            declared.iter().any(|text| *text == expected)
        })
    } else {
        let boxed = TypeRef::generic(
            HELPERS_NAMESPACE,
            "NullBox",
            TypeKind::Struct,
            vec![member.type_ref.clone()],
        );
        field.type_ref.nullable && same_type_name(&field.type_ref, &boxed)
    }
}
