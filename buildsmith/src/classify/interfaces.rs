//! Transitive interface closure of a constructed type.

use std::collections::HashSet;

use crate::resolver::lookup;
use crate::semantic::{SemanticModel, TypeRef};

/// Every interface `ty` is or implements, closed over its type arguments.
///
/// Interfaces include themselves. Classes contribute the interfaces of their
/// base chain. Declarations absent from both the snapshot and the built-in
/// framework table end the walk along that edge. The result keeps first-seen
/// order and holds each constructed interface once.
#[must_use]
pub fn implemented_interfaces<M: SemanticModel + ?Sized>(model: &M, ty: &TypeRef) -> Vec<TypeRef> {
    let mut seen = HashSet::new();
    let mut closure = Vec::new();
    let mut pending = vec![ty.clone()];
    while let Some(current) = pending.pop() {
        if !seen.insert(current.display()) {
            continue;
        }
        if current.is_interface() {
            closure.push(current.clone());
        }
        let Some(declaration) = lookup(model, &current) else {
            continue;
        };
        let bindings = declaration.bindings_for(&current);
        let mut next: Vec<TypeRef> = declaration
            .interfaces
            .iter()
            .map(|iface| iface.substitute(&bindings))
            .collect();
        if let Some(base) = declaration.base_type.as_ref() {
            next.push(base.substitute(&bindings));
        }
        // Reverse so the first declared interface is visited first.
        pending.extend(next.into_iter().rev());
    }
    closure
}
