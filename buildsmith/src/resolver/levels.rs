//! Inheritance levels and most-derived-first member collection.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::semantic::{NamedType, SemanticModel, TypeRef, well_known};

/// One level of an inheritance chain with the bindings that close its
/// type parameters.
#[derive(Debug)]
pub struct TypeLevel<'a> {
    /// Declaration at this level.
    pub declaration: &'a NamedType,
    /// Type-parameter bindings valid at this level.
    pub bindings: HashMap<String, TypeRef>,
}

/// Look up a definition in the snapshot, falling back to the built-in
/// framework definitions.
pub fn lookup<'a, M: SemanticModel + ?Sized>(model: &'a M, ty: &TypeRef) -> Option<&'a NamedType> {
    model
        .resolve(ty)
        .or_else(|| well_known::definition(&ty.definition_key()))
}

/// Walk from `start` through its base classes.
///
/// The walk stops at the first base type the snapshot does not declare and
/// never revisits a declaration, so malformed cyclic snapshots terminate.
pub fn type_levels<'a, M: SemanticModel + ?Sized>(
    model: &'a M,
    start: &'a NamedType,
    bindings: HashMap<String, TypeRef>,
) -> Vec<TypeLevel<'a>> {
    let mut levels = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(TypeLevel {
        declaration: start,
        bindings,
    });
    while let Some(level) = current.take() {
        if !visited.insert(level.declaration.key()) {
            debug!(key = %level.declaration.key(), "inheritance cycle cut");
            break;
        }
        current = level.declaration.base_type.as_ref().and_then(|base| {
            let closed = base.substitute(&level.bindings);
            model.resolve(&closed).map(|declaration| TypeLevel {
                bindings: declaration.bindings_for(&closed),
                declaration,
            })
        });
        levels.push(level);
    }
    levels
}

/// Keep the first item for every name, walking most-derived level first.
pub fn distinct_by_name<T, F>(levels: impl IntoIterator<Item = Vec<T>>, name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen = HashSet::new();
    let mut collected = Vec::new();
    for level in levels {
        for item in level {
            if seen.insert(name(&item).to_owned()) {
                collected.push(item);
            }
        }
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_keeps_most_derived_entry() {
        let levels = vec![
            vec![("Name", 3), ("Age", 3)],
            vec![("Name", 2), ("Id", 2)],
            vec![("Id", 1), ("Created", 1)],
        ];
        let collected = distinct_by_name(levels, |item| item.0);
        assert_eq!(
            collected,
            vec![("Name", 3), ("Age", 3), ("Id", 2), ("Created", 1)]
        );
    }
}
