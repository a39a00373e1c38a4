use std::collections::{BTreeSet, HashMap};

use crate::js::annotations::AnnotationMap;
use crate::js::symbols::QualifiedName;
use crate::js::syntax::ast::{JsExpr, JsProgram, JsStatement};

/// A superclass claim for one class, merged over every place that makes it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Link {
    To(QualifiedName),
    /// Claims disagree; no superclass can be trusted
    Conflicting,
}

impl Link {
    fn merge(links: &mut HashMap<QualifiedName, Link>, class: QualifiedName, base: QualifiedName) {
        links
            .entry(class)
            .and_modify(|link| {
                if *link != Link::To(base.clone()) {
                    *link = Link::Conflicting;
                }
            })
            .or_insert_with(|| Link::To(base.clone()));
    }
}

/// Class hierarchy information for Closure-style classes.
///
/// A class is a `@constructor`-annotated function bound to a qualified name.
/// Its superclass is known from two independent claims: the `@extends {Base}`
/// annotation and the `Sub.superClass_ = Base.prototype` statement.
#[derive(Debug, Default)]
pub struct ClassHierarchy {
    /// Names bound to `@constructor` functions
    classes: BTreeSet<QualifiedName>,
    /// class -> base named by `@extends`
    extends: HashMap<QualifiedName, Link>,
    /// class -> base named by `Sub.superClass_ = Base.prototype`
    superclass_links: HashMap<QualifiedName, Link>,
}

impl ClassHierarchy {
    /// Build the hierarchy by scanning every statement of every unit
    pub fn build(program: &JsProgram, annotations: &AnnotationMap) -> Self {
        let mut hierarchy = ClassHierarchy::default();

        program.traverse(&mut |_, stmt| {
            if let Some(class) = constructor_name(stmt)
                && let Some(doc) = annotations.get(stmt.id())
                && doc.constructor
            {
                if let Some(base) = &doc.extends {
                    Link::merge(&mut hierarchy.extends, class.clone(), base.clone());
                }
                hierarchy.classes.insert(class);
            }

            if let Some((class, base)) = superclass_link(stmt) {
                Link::merge(&mut hierarchy.superclass_links, class, base);
            }
        });

        hierarchy
    }

    pub fn is_class(&self, name: &QualifiedName) -> bool {
        self.classes.contains(name)
    }

    /// The confirmed immediate superclass of `class`.
    ///
    /// Both the `@extends` annotation and the `superClass_` link must exist and
    /// name the same base; anything else means the superclass is unknown.
    pub fn immediate_superclass(&self, class: &QualifiedName) -> Option<&QualifiedName> {
        if !self.is_class(class) {
            return None;
        }
        match (self.extends.get(class)?, self.superclass_links.get(class)?) {
            (Link::To(declared), Link::To(linked)) if declared == linked => Some(declared),
            _ => None,
        }
    }
}

/// The name bound to a function literal, by `var Foo = function() {}` or
/// `ns.Foo = function() {}`.
fn constructor_name(stmt: &JsStatement) -> Option<QualifiedName> {
    match stmt {
        JsStatement::Var {
            name,
            init: Some(JsExpr::Function { .. }),
            ..
        } => QualifiedName::new(name).ok(),
        JsStatement::Expr {
            expr: JsExpr::Assign { target, value, .. },
            ..
        } if matches!(value.as_ref(), JsExpr::Function { .. }) => target.qualified_name(),
        _ => None,
    }
}

/// `(Sub, Base)` for a statement `Sub.superClass_ = Base.prototype`
fn superclass_link(stmt: &JsStatement) -> Option<(QualifiedName, QualifiedName)> {
    let JsStatement::Expr {
        expr: JsExpr::Assign { target, value, .. },
        ..
    } = stmt
    else {
        return None;
    };
    let JsExpr::GetProp {
        object: sub,
        property,
        ..
    } = target.as_ref()
    else {
        return None;
    };
    if property != "superClass_" {
        return None;
    }
    let JsExpr::GetProp {
        object: base,
        property,
        ..
    } = value.as_ref()
    else {
        return None;
    };
    if property != "prototype" {
        return None;
    }
    Some((sub.qualified_name()?, base.qualified_name()?))
}
