//! Diagnostics reported next to the generated source.
//!
//! Every diagnostic is an instance of a static [`DiagnosticDescriptor`] plus
//! the location it applies to and the arguments substituted into the
//! descriptor's message template.

use std::fmt;

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::naming::apply_format;
use crate::semantic::Location;

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational notice; generation proceeded.
    Info,
    /// Suspicious input; part of the builder was skipped.
    Warning,
    /// The builder is incomplete or missing.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Static description of a diagnostic kind.
#[derive(Debug, Eq, PartialEq)]
pub struct DiagnosticDescriptor {
    /// Stable identifier, e.g. `BSG001`.
    pub id: &'static str,
    /// Short title.
    pub title: &'static str,
    /// Message template with `{0}`-style placeholders.
    pub message_format: &'static str,
    /// Severity of every instance.
    pub severity: Severity,
}

/// The builder declares its own `Build()`.
pub static BUILD_OVERRIDE: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "BSG001",
    title: "Build method override",
    message_format: "Builder {0} declares Build(); the generated Build method is skipped and may be shadowed",
    severity: Severity::Info,
};

/// The builder declares its own parameterless constructor.
pub static DEFAULT_CONSTRUCTOR_OVERRIDE: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "BSG002",
    title: "Default constructor override",
    message_format: "Builder {0} declares a parameterless constructor; the generated constructor with its default values is skipped",
    severity: Severity::Info,
};

/// The builder declares its own `BuildMany`.
pub static BUILD_MANY_OVERRIDE: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "BSG003",
    title: "BuildMany method override",
    message_format: "Builder {0} declares BuildMany; the generated BuildMany method is skipped",
    severity: Severity::Info,
};

/// The entity has no accessible constructor and the builder no `Build()`.
pub static NO_ACCESSIBLE_CONSTRUCTOR: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "BSG004",
    title: "No accessible constructor",
    message_format: "Cannot generate a Build method for {0} because it has no accessible constructor; define Build() on {1} yourself",
    severity: Severity::Error,
};

/// The entity is abstract.
pub static ABSTRACT_ENTITY: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "BSG005",
    title: "Abstract entity",
    message_format: "Builder {0} cannot build {1} because it is abstract",
    severity: Severity::Error,
};

/// Planning the unit failed.
pub static UNIT_FAILED: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "BSG006",
    title: "Builder generation failed",
    message_format: "Generation of builder {0} failed: {1}",
    severity: Severity::Error,
};

/// A hand-written field occupies a generated name with another type.
pub static INCOMPATIBLE_FIELD: DiagnosticDescriptor = DiagnosticDescriptor {
    id: "BSG007",
    title: "Incompatible builder field",
    message_format: "Field {0} on builder {1} has type {2} but {3} is required; member {4} is not generated",
    severity: Severity::Warning,
};

/// A reported diagnostic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    /// Kind of diagnostic.
    pub descriptor: &'static DiagnosticDescriptor,
    /// Where it applies, when the snapshot carried a location.
    pub location: Option<Location>,
    /// Values substituted into the message template.
    pub arguments: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic from a descriptor.
    #[must_use]
    pub fn new(
        descriptor: &'static DiagnosticDescriptor,
        location: Option<Location>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            descriptor,
            location,
            arguments,
        }
    }

    /// Identifier of the descriptor.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.descriptor.id
    }

    /// Severity of the descriptor.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.descriptor.severity
    }

    /// Returns `true` for error-severity diagnostics.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    /// The message template with the arguments applied.
    #[must_use]
    pub fn message(&self) -> String {
        let args: Vec<&str> = self.arguments.iter().map(String::as_str).collect();
        apply_format(self.descriptor.message_format, &args)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity(), self.id(), self.message())?;
        if let Some(location) = &self.location {
            write!(
                f,
                " [at {}:{}:{}]",
                location.file, location.line, location.column
            )?;
        }
        Ok(())
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Diagnostic", 5)?;
        state.serialize_field("id", self.id())?;
        state.serialize_field("severity", &self.severity())?;
        state.serialize_field("title", self.descriptor.title)?;
        state.serialize_field("message", &self.message())?;
        state.serialize_field("location", &self.location)?;
        state.end()
    }
}

/// Receives diagnostics from the generator.
pub trait DiagnosticSink {
    /// Record `diagnostic`.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Receives generated source files.
pub trait SourceSink {
    /// Record the file `name` with contents `text`.
    fn add_source(&mut self, name: String, text: String);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_substitutes_arguments() {
        let diagnostic = Diagnostic::new(
            &NO_ACCESSIBLE_CONSTRUCTOR,
            None,
            vec!["Shop.Order".to_owned(), "OrderBuilder".to_owned()],
        );
        assert_eq!(
            diagnostic.message(),
            "Cannot generate a Build method for Shop.Order because it has no accessible constructor; define Build() on OrderBuilder yourself"
        );
        assert!(diagnostic.is_error());
    }

    #[test]
    fn display_includes_location() {
        let diagnostic = Diagnostic::new(
            &BUILD_OVERRIDE,
            Some(Location {
                file: "OrderBuilder.cs".to_owned(),
                line: 12,
                column: 5,
            }),
            vec!["OrderBuilder".to_owned()],
        );
        assert_eq!(
            diagnostic.to_string(),
            "info BSG001: Builder OrderBuilder declares Build(); the generated Build method is skipped and may be shadowed [at OrderBuilder.cs:12:5]"
        );
    }

    #[test]
    fn serialises_rendered_message() -> Result<(), serde_json::Error> {
        let diagnostic = Diagnostic::new(
            &UNIT_FAILED,
            None,
            vec!["OrderBuilder".to_owned(), "bad prefix".to_owned()],
        );
        let value = serde_json::to_value(&diagnostic)?;
        assert_eq!(value["id"], "BSG006");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["message"], "Generation of builder OrderBuilder failed: bad prefix");
        assert!(value["location"].is_null());
        Ok(())
    }

    #[test]
    fn descriptor_ids_are_unique() {
        let ids = [
            BUILD_OVERRIDE.id,
            DEFAULT_CONSTRUCTOR_OVERRIDE.id,
            BUILD_MANY_OVERRIDE.id,
            NO_ACCESSIBLE_CONSTRUCTOR.id,
            ABSTRACT_ENTITY.id,
            UNIT_FAILED.id,
            INCOMPATIBLE_FIELD.id,
        ];
        let unique: std::collections::BTreeSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }
}
