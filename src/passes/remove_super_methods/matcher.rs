use super::Rejection;
use super::registry::MethodDefinition;
use crate::js::symbols::QualifiedName;
use crate::js::syntax::ast::{JsExpr, JsStatement};

/// How a forwarding call names the superclass prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuperReference {
    /// `Class.superClass_`
    SuperClassProperty { class: QualifiedName },
    /// `Base.prototype`
    Prototype { class: QualifiedName },
}

impl SuperReference {
    fn from_expr(expr: &JsExpr) -> Option<Self> {
        let JsExpr::GetProp {
            object, property, ..
        } = expr
        else {
            return None;
        };
        let class = object.qualified_name()?;
        match property.as_str() {
            "superClass_" => Some(SuperReference::SuperClassProperty { class }),
            "prototype" => Some(SuperReference::Prototype { class }),
            _ => None,
        }
    }
}

/// The shape of an override body that only forwards to its super method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingCall {
    pub super_ref: SuperReference,
    /// `return <call>;` rather than a bare `<call>;`
    pub returns_result: bool,
}

/// Classify the body of an `@override` method definition.
///
/// Succeeds only for a body of exactly one statement,
/// `[return] <SuperReference>.<name>.call(this, <params...>);`, where the
/// forwarded arguments restate the method's own parameters in order.
pub fn match_forwarding_call(
    definition: &MethodDefinition<'_>,
) -> Result<ForwardingCall, Rejection> {
    if !definition.is_override() {
        return Err(Rejection::NotOverride);
    }

    let [statement] = definition.body else {
        return Err(Rejection::NotSingleStatement);
    };
    let (callee, args, returns_result) = match statement {
        JsStatement::Expr {
            expr: JsExpr::Call { callee, args, .. },
            ..
        } => (callee, args, false),
        JsStatement::Return {
            value: Some(JsExpr::Call { callee, args, .. }),
            ..
        } => (callee, args, true),
        _ => return Err(Rejection::NotCallStatement),
    };

    let JsExpr::GetProp {
        object: super_method,
        property,
        ..
    } = callee.as_ref()
    else {
        return Err(Rejection::NotDotCall);
    };
    if property != "call" {
        return Err(Rejection::NotDotCall);
    }

    let JsExpr::GetProp {
        object: super_ref,
        property: method_name,
        ..
    } = super_method.as_ref()
    else {
        return Err(Rejection::NotSuperReference);
    };
    if method_name != definition.name {
        return Err(Rejection::MethodNameMismatch);
    }
    let super_ref = SuperReference::from_expr(super_ref).ok_or(Rejection::NotSuperReference)?;

    let Some((JsExpr::This { .. }, forwarded)) = args.split_first() else {
        return Err(Rejection::ReceiverNotThis);
    };
    if forwarded.len() != definition.params.len() {
        return Err(Rejection::ArgumentCountMismatch);
    }
    for (arg, param) in forwarded.iter().zip(definition.params) {
        match arg {
            JsExpr::Name { name, .. } if name == param => {}
            _ => return Err(Rejection::ArgumentMismatch),
        }
    }

    Ok(ForwardingCall {
        super_ref,
        returns_result,
    })
}
