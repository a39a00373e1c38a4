//! Removal of `@override` methods that only forward to their super method.
//!
//! A Closure-style override such as
//!
//! ```text
//! /** @override */
//! Foo.prototype.bar = function(a, b) {
//!   return Foo.superClass_.bar.call(this, a, b);
//! };
//! ```
//!
//! behaves exactly like the inherited `FooBase.prototype.bar`, so the whole
//! definition can be deleted. The pass runs in four stages: the
//! [`ClassHierarchy`] and [`MethodRegistry`] are built from the program, every
//! override is classified by [`match_forwarding_call`], the survivors are
//! validated by [`checker::check`], and the accepted definitions are finally
//! deleted by the rewriter.

mod checker;
#[cfg(test)]
mod fixtures;
mod hierarchy;
mod matcher;
mod registry;
mod rewriter;

use std::collections::HashSet;
use std::fmt::{self, Display};

use hierarchy::ClassHierarchy;
use matcher::match_forwarding_call;
use registry::{MethodDefinition, MethodRegistry};

use super::Pass;
use crate::config::{LogLevel, PassName};
use crate::js::{AnnotationMap, JsProgram, NodeId};
use crate::{log_debug, log_info};

/// Why an override was kept. Only ever reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotOverride,
    NotSingleStatement,
    NotCallStatement,
    NotDotCall,
    NotSuperReference,
    MethodNameMismatch,
    ReceiverNotThis,
    ArgumentCountMismatch,
    ArgumentMismatch,
    NoOptimizeMarker,
    Suppressed,
    DuplicateDefinition,
    NoConfirmedSuperclass,
    NotImmediateSuperclass,
    SuperMethodNotFound,
    SignatureMismatch,
    DiscardsReturnValue,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NotOverride => "not_override",
            Rejection::NotSingleStatement => "not_single_statement",
            Rejection::NotCallStatement => "not_call_statement",
            Rejection::NotDotCall => "not_dot_call",
            Rejection::NotSuperReference => "not_super_reference",
            Rejection::MethodNameMismatch => "method_name_mismatch",
            Rejection::ReceiverNotThis => "receiver_not_this",
            Rejection::ArgumentCountMismatch => "argument_count_mismatch",
            Rejection::ArgumentMismatch => "argument_mismatch",
            Rejection::NoOptimizeMarker => "no_optimize_marker",
            Rejection::Suppressed => "suppressed",
            Rejection::DuplicateDefinition => "duplicate_definition",
            Rejection::NoConfirmedSuperclass => "no_confirmed_superclass",
            Rejection::NotImmediateSuperclass => "not_immediate_superclass",
            Rejection::SuperMethodNotFound => "super_method_not_found",
            Rejection::SignatureMismatch => "signature_mismatch",
            Rejection::DiscardsReturnValue => "discards_return_value",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only facts about the program, gathered once per run.
pub struct PassContext<'a> {
    pub hierarchy: ClassHierarchy,
    pub methods: MethodRegistry<'a>,
}

impl<'a> PassContext<'a> {
    pub fn build(program: &'a JsProgram, annotations: &'a AnnotationMap) -> Self {
        PassContext {
            hierarchy: ClassHierarchy::build(program, annotations),
            methods: MethodRegistry::build(program, annotations),
        }
    }
}

/// Deletes `@override` prototype methods whose body is nothing but an exact
/// forwarding call to the same method on the immediate superclass.
#[derive(Debug, Default)]
pub struct RemoveSuperMethodsPass {
    log_level: LogLevel,
}

impl RemoveSuperMethodsPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_level(log_level: LogLevel) -> Self {
        RemoveSuperMethodsPass { log_level }
    }

    /// Ids of the definitions to delete, and the number of overrides examined
    fn collect_removable(&self, context: &PassContext<'_>) -> (HashSet<NodeId>, usize) {
        let mut removable = HashSet::new();
        let mut candidates = 0;

        for definition in context.methods.definitions() {
            let decision = match_forwarding_call(definition)
                .and_then(|call| checker::check(definition, &call, context));
            if decision == Err(Rejection::NotOverride) {
                continue;
            }
            candidates += 1;
            if self.log_level >= LogLevel::Debug {
                self.log_decision(definition, decision, context);
            }
            if decision.is_ok() {
                removable.insert(definition.statement_id);
            }
        }

        (removable, candidates)
    }

    fn log_decision(
        &self,
        definition: &MethodDefinition<'_>,
        decision: Result<(), Rejection>,
        context: &PassContext<'_>,
    ) {
        let tag = PassName::RemoveSuperMethods.as_str();
        match decision {
            Ok(()) => log_debug!(tag, method = definition.signature(), decision = "removed"),
            Err(Rejection::DuplicateDefinition) => {
                let (units, suppressed) = context
                    .methods
                    .occurrence(definition)
                    .map(|occurrence| (occurrence.units.len(), occurrence.suppressed_duplicate))
                    .unwrap_or_default();
                log_debug!(
                    tag,
                    method = definition.signature(),
                    decision = "kept",
                    reason = Rejection::DuplicateDefinition,
                    units = units,
                    suppressed_duplicate = suppressed
                )
            }
            Err(reason) => log_debug!(
                tag,
                method = definition.signature(),
                decision = "kept",
                reason = reason
            ),
        }
    }
}

impl Pass for RemoveSuperMethodsPass {
    fn name(&self) -> &'static str {
        PassName::RemoveSuperMethods.as_str()
    }

    fn run(&mut self, program: &mut JsProgram, annotations: &AnnotationMap) -> usize {
        let (removable, candidates) = {
            let context = PassContext::build(program, annotations);
            self.collect_removable(&context)
        };
        let removed = rewriter::remove_statements(program, &removable);

        if self.log_level >= LogLevel::Info {
            log_info!(self.name(), candidates = candidates, removed = removed);
        }
        removed
    }
}
