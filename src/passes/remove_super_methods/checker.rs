use super::matcher::{ForwardingCall, SuperReference};
use super::registry::MethodDefinition;
use super::{PassContext, Rejection};

/// Decide whether a forwarding override can be removed without changing
/// behavior.
///
/// The override must be free of suppressions and no-optimize markers, defined
/// exactly once, and forward to a method declared directly on its confirmed
/// immediate superclass with a structurally identical parameter list.
pub fn check(
    definition: &MethodDefinition<'_>,
    call: &ForwardingCall,
    context: &PassContext<'_>,
) -> Result<(), Rejection> {
    if let Some(doc) = definition.doc {
        if doc.wizaction {
            return Err(Rejection::NoOptimizeMarker);
        }
        if doc.has_suppressions() {
            return Err(Rejection::Suppressed);
        }
    }
    if context.methods.is_duplicate(definition) {
        return Err(Rejection::DuplicateDefinition);
    }

    let parent = context
        .hierarchy
        .immediate_superclass(&definition.owner)
        .ok_or(Rejection::NoConfirmedSuperclass)?;
    let refers_to_parent = match &call.super_ref {
        SuperReference::SuperClassProperty { class } => *class == definition.owner,
        SuperReference::Prototype { class } => class == parent,
    };
    if !refers_to_parent {
        return Err(Rejection::NotImmediateSuperclass);
    }

    let super_method = context
        .methods
        .single(parent, definition.name)
        .ok_or(Rejection::SuperMethodNotFound)?;
    if super_method.param_kinds() != definition.param_kinds() {
        return Err(Rejection::SignatureMismatch);
    }
    if !call.returns_result && super_method.returns_value() {
        return Err(Rejection::DiscardsReturnValue);
    }

    Ok(())
}
