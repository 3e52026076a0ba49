//! Attribute driven guard injection.
//!
//! Guard attributes are recognised by the full name of their type in the context's attribute
//! namespace, e.g. `Mirror.ServerAttribute` or `Mirror.LocalPlayerCallbackAttribute`. Failures
//! are reported to [`Diagnostics`] so one bad method does not stop the rest of a pass.

use log::{trace, warn};

use crate::{
    metadata::{
        diagnostics::{DiagnosticCategory, Diagnostics},
        method::{MethodDefinition, TypeDefinition},
    },
    weaver::{inject_guard, GuardContext, GuardKind},
};

/// Guard kinds requested by the attributes of `method`, in declaration order
pub fn guard_kinds<C: GuardContext + ?Sized>(context: &C, method: &MethodDefinition) -> Vec<GuardKind> {
    let namespace = context.attribute_namespace();
    method
        .custom_attributes
        .iter()
        .filter_map(|attribute| GuardKind::from_attribute(namespace, attribute))
        .collect()
}

/// Inject one guard per recognised guard attribute on `method`.
///
/// Guards are injected in attribute order; a later guard is placed in front of the earlier
/// ones. Failed injections are reported as [`DiagnosticCategory::Guard`] errors carrying the
/// method's token. Guards on static methods check their first argument instead of `this` and
/// are reported as [`DiagnosticCategory::Method`] warnings. Returns the number of guards
/// injected.
pub fn process_method_attributes<C: GuardContext + ?Sized>(
    context: &C,
    owner: &TypeDefinition,
    method: &mut MethodDefinition,
    diagnostics: &Diagnostics,
) -> usize {
    let kinds = guard_kinds(context, method);
    if !kinds.is_empty() && method.is_static() {
        let message = format!(
            "Static method {} is guarded on its first argument instead of an instance",
            method.full_name()
        );
        warn!("{message}");
        diagnostics.warning(DiagnosticCategory::Method, message, method.token);
    }

    let mut injected = 0;
    for kind in kinds {
        trace!(
            "Found {} attribute on {}::{}",
            kind,
            method.declaring_type,
            method.name
        );

        let predicate = context.role_predicate(kind.role);
        match inject_guard(context, owner, method, kind, predicate) {
            Ok(()) => injected += 1,
            Err(error) => diagnostics.report(DiagnosticCategory::Guard, &error, method.token),
        }
    }

    injected
}

/// Run [`process_method_attributes`] over every method declared by `owner`.
///
/// Returns the total number of guards injected.
pub fn process_type<C: GuardContext + ?Sized>(
    context: &C,
    owner: &TypeDefinition,
    methods: &mut [MethodDefinition],
    diagnostics: &Diagnostics,
) -> usize {
    methods
        .iter_mut()
        .map(|method| process_method_attributes(context, owner, method, diagnostics))
        .sum()
}
