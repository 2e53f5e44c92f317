//! Type references as they appear in member signatures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Shape of a type, as reported by the host compiler.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A reference type declared with `class` (also `string` and `object`).
    #[default]
    Class,
    /// A value type.
    Struct,
    /// An interface.
    Interface,
    /// An enumeration.
    Enum,
    /// A delegate type.
    Delegate,
    /// A generic type parameter such as `T`.
    TypeParameter,
    /// A single-dimensional array; the element is the only type argument.
    Array,
}

/// Reference to a (possibly constructed) type.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Simple name without arity, e.g. `List` or the keyword `int`.
    pub name: String,
    /// Containing namespace, `None` for keywords, type parameters and arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Type shape.
    #[serde(default)]
    pub kind: TypeKind,
    /// Generic arguments, or the element type for arrays.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeRef>,
    /// Whether the reference carries a `?` annotation.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

/// Which flavour of name to render.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameStyle {
    /// Namespace-qualified names.
    Full,
    /// Names without namespaces.
    Simple,
}

impl TypeRef {
    /// Construct a non-generic named type.
    #[must_use]
    pub fn named(namespace: &str, name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_owned(),
            namespace: (!namespace.is_empty()).then(|| namespace.to_owned()),
            kind,
            type_arguments: Vec::new(),
            nullable: false,
        }
    }

    /// Construct a generic named type with the given arguments.
    #[must_use]
    pub fn generic(namespace: &str, name: &str, kind: TypeKind, args: Vec<Self>) -> Self {
        Self {
            type_arguments: args,
            ..Self::named(namespace, name, kind)
        }
    }

    /// Construct a keyword type such as `int` or `string`.
    #[must_use]
    pub fn keyword(name: &str) -> Self {
        let kind = if matches!(name, "string" | "object" | "dynamic") {
            TypeKind::Class
        } else {
            TypeKind::Struct
        };
        Self::named("", name, kind)
    }

    /// Construct a reference to the type parameter `name`.
    #[must_use]
    pub fn type_parameter(name: &str) -> Self {
        Self::named("", name, TypeKind::TypeParameter)
    }

    /// Construct an array of `element`.
    #[must_use]
    pub fn array_of(element: Self) -> Self {
        Self {
            name: String::new(),
            namespace: None,
            kind: TypeKind::Array,
            type_arguments: vec![element],
            nullable: false,
        }
    }

    /// Returns a copy carrying the `?` annotation.
    #[must_use]
    pub fn into_nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    /// Returns `true` for interface types.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Returns `true` for `string`, in keyword or `System.String` form.
    #[must_use]
    pub fn is_string(&self) -> bool {
        match self.namespace.as_deref() {
            None => self.name == "string",
            Some(ns) => ns == "System" && self.name == "String",
        }
    }

    /// The element type of an array.
    #[must_use]
    pub fn array_element(&self) -> Option<&Self> {
        if self.kind == TypeKind::Array {
            self.type_arguments.first()
        } else {
            None
        }
    }

    /// Key used to find the declaring [`super::NamedType`]: `Ns.Name`
    /// followed by `` `N `` for generic definitions.
    #[must_use]
    pub fn definition_key(&self) -> String {
        definition_key(
            self.namespace.as_deref().unwrap_or_default(),
            &self.name,
            self.type_arguments.len(),
        )
    }

    /// Render the type with namespace-qualified names.
    #[must_use]
    pub fn display(&self) -> String {
        self.render(NameStyle::Full)
    }

    /// Render the type without namespaces.
    #[must_use]
    pub fn simple_display(&self) -> String {
        self.render(NameStyle::Simple)
    }

    /// Render the type in the requested flavour.
    #[must_use]
    pub fn render(&self, flavour: NameStyle) -> String {
        let mut out = String::new();
        self.render_into(&mut out, flavour);
        out
    }

    fn render_into(&self, out: &mut String, flavour: NameStyle) {
        if let Some(element) = self.array_element() {
            element.render_into(out, flavour);
            out.push_str("[]");
        } else {
            if flavour == NameStyle::Full {
                if let Some(ns) = self.namespace.as_deref() {
                    out.push_str(ns);
                    out.push('.');
                }
            }
            out.push_str(&self.name);
            if !self.type_arguments.is_empty() {
                out.push('<');
                for (index, arg) in self.type_arguments.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    arg.render_into(out, flavour);
                }
                out.push('>');
            }
        }
        if self.nullable {
            out.push('?');
        }
    }

    /// Replace type-parameter references using `bindings`.
    ///
    /// Unbound parameters are left untouched so open generic entities keep
    /// their own parameter names.
    #[must_use]
    pub fn substitute(&self, bindings: &HashMap<String, Self>) -> Self {
        if self.kind == TypeKind::TypeParameter {
            if let Some(bound) = bindings.get(&self.name) {
                let mut replaced = bound.clone();
                replaced.nullable |= self.nullable;
                return replaced;
            }
            return self.clone();
        }
        Self {
            type_arguments: self
                .type_arguments
                .iter()
                .map(|arg| arg.substitute(bindings))
                .collect(),
            ..self.clone()
        }
    }

    /// Collect every namespace referenced by this type and its arguments.
    pub fn collect_namespaces(&self, out: &mut Vec<String>) {
        if let Some(ns) = self.namespace.as_deref() {
            if !out.iter().any(|seen| seen == ns) {
                out.push(ns.to_owned());
            }
        }
        for arg in &self.type_arguments {
            arg.collect_namespaces(out);
        }
    }

    /// Compare two references ignoring nullable annotations at any depth.
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        self.name == other.name
            && self.namespace == other.namespace
            && self.kind == other.kind
            && self.type_arguments.len() == other.type_arguments.len()
            && self
                .type_arguments
                .iter()
                .zip(&other.type_arguments)
                .all(|(lhs, rhs)| lhs.same_type(rhs))
    }
}

/// Build a definition key from its parts.
#[must_use]
pub fn definition_key(namespace: &str, name: &str, arity: usize) -> String {
    let mut key = String::new();
    if !namespace.is_empty() {
        key.push_str(namespace);
        key.push('.');
    }
    key.push_str(name);
    if arity > 0 {
        key.push('`');
        key.push_str(&arity.to_string());
    }
    key
}
