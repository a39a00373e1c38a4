use std::collections::{BTreeSet, HashMap};

use crate::js::annotations::{AnnotationMap, JsDocInfo, ParamKind, Suppression};
use crate::js::symbols::QualifiedName;
use crate::js::syntax::ast::{JsExpr, JsProgram, JsStatement, NodeId};

/// A prototype method definition, `Owner.prototype.name = function(...) {...};`
#[derive(Debug)]
pub struct MethodDefinition<'a> {
    /// The expression statement holding the assignment
    pub statement_id: NodeId,
    /// Index of the compilation unit that contains the definition
    pub unit: usize,
    pub owner: QualifiedName,
    pub name: &'a str,
    pub params: &'a [String],
    pub body: &'a [JsStatement],
    pub doc: Option<&'a JsDocInfo>,
}

impl<'a> MethodDefinition<'a> {
    fn from_statement(
        stmt: &'a JsStatement,
        unit: usize,
        annotations: &'a AnnotationMap,
    ) -> Option<Self> {
        let JsStatement::Expr {
            id,
            expr: JsExpr::Assign { target, value, .. },
        } = stmt
        else {
            return None;
        };
        let JsExpr::Function { params, body, .. } = value.as_ref() else {
            return None;
        };
        let JsExpr::GetProp {
            object: prototype,
            property: name,
            ..
        } = target.as_ref()
        else {
            return None;
        };
        let JsExpr::GetProp {
            object: owner,
            property,
            ..
        } = prototype.as_ref()
        else {
            return None;
        };
        if property != "prototype" {
            return None;
        }

        Some(MethodDefinition {
            statement_id: *id,
            unit,
            owner: owner.qualified_name()?,
            name,
            params,
            body,
            doc: annotations.get(*id),
        })
    }

    pub fn is_override(&self) -> bool {
        self.doc.is_some_and(|doc| doc.is_override)
    }

    /// `Owner.prototype.name`, the key of the duplicate guard
    pub fn signature(&self) -> String {
        format!("{}.prototype.{}", self.owner, self.name)
    }

    pub fn param_kinds(&self) -> Vec<ParamKind> {
        self.params
            .iter()
            .map(|param| ParamKind::resolve(param, self.doc))
            .collect()
    }

    /// Whether calling this method can produce a value other than `undefined`
    pub fn returns_value(&self) -> bool {
        if self.doc.is_some_and(|doc| doc.returns.is_some()) {
            return true;
        }
        let mut returns_value = false;
        for stmt in self.body {
            stmt.traverse(&mut |s| {
                if let JsStatement::Return { value: Some(_), .. } = s {
                    returns_value = true;
                }
            });
        }
        returns_value
    }
}

/// Occurrences of one method signature across all compilation units.
///
/// Every assignment to `Owner.prototype.name` counts, whatever its value and
/// however deeply it is nested, including inside function literals.
#[derive(Debug, Default)]
pub struct Occurrence {
    pub assignments: usize,
    pub units: BTreeSet<usize>,
    /// Some definition was marked `@suppress {duplicate}`
    pub suppressed_duplicate: bool,
}

/// All prototype method definitions of a program, indexed by owner and name,
/// together with the duplicate-definition record for each signature.
#[derive(Debug, Default)]
pub struct MethodRegistry<'a> {
    definitions: Vec<MethodDefinition<'a>>,
    by_signature: HashMap<String, Vec<usize>>,
    occurrences: HashMap<String, Occurrence>,
}

impl<'a> MethodRegistry<'a> {
    pub fn build(program: &'a JsProgram, annotations: &'a AnnotationMap) -> Self {
        let mut registry = MethodRegistry::default();
        for (unit, compilation_unit) in program.units.iter().enumerate() {
            for stmt in &compilation_unit.body {
                stmt.traverse(&mut |s| {
                    if let Some(definition) = MethodDefinition::from_statement(s, unit, annotations)
                    {
                        registry.add(definition);
                    }
                });
                stmt.walk_exprs(&mut |expr| {
                    if let Some(signature) = prototype_assignment(expr) {
                        let occurrence = registry.occurrences.entry(signature).or_default();
                        occurrence.assignments += 1;
                        occurrence.units.insert(unit);
                    }
                });
            }
        }
        registry
    }

    fn add(&mut self, definition: MethodDefinition<'a>) {
        let signature = definition.signature();
        if definition
            .doc
            .is_some_and(|doc| doc.suppresses(&Suppression::Duplicate))
        {
            self.occurrences
                .entry(signature.clone())
                .or_default()
                .suppressed_duplicate = true;
        }

        self.by_signature
            .entry(signature)
            .or_default()
            .push(self.definitions.len());
        self.definitions.push(definition);
    }

    pub fn definitions(&self) -> &[MethodDefinition<'a>] {
        &self.definitions
    }

    pub fn occurrence(&self, definition: &MethodDefinition<'_>) -> Option<&Occurrence> {
        self.occurrences.get(&definition.signature())
    }

    /// Whether the signature is assigned more than once anywhere in the program.
    ///
    /// `@suppress {duplicate}` is recorded but does not lift the guard.
    pub fn is_duplicate(&self, definition: &MethodDefinition<'_>) -> bool {
        self.occurrence(definition)
            .is_some_and(|occurrence| occurrence.assignments > 1)
    }

    /// The definition of `owner.prototype.name`, if that is the only
    /// assignment to it in the program
    pub fn single(&self, owner: &QualifiedName, name: &str) -> Option<&MethodDefinition<'a>> {
        let signature = format!("{}.prototype.{}", owner, name);
        if self
            .occurrences
            .get(&signature)
            .is_none_or(|occurrence| occurrence.assignments != 1)
        {
            return None;
        }
        match self.by_signature.get(&signature)?.as_slice() {
            [index] => self.definitions.get(*index),
            _ => None,
        }
    }
}

/// `Owner.prototype.name` for an assignment to that target, whatever its value
fn prototype_assignment(expr: &JsExpr) -> Option<String> {
    let JsExpr::Assign { target, .. } = expr else {
        return None;
    };
    let JsExpr::GetProp {
        object: prototype,
        property: name,
        ..
    } = target.as_ref()
    else {
        return None;
    };
    let JsExpr::GetProp {
        object: owner,
        property,
        ..
    } = prototype.as_ref()
    else {
        return None;
    };
    if property != "prototype" {
        return None;
    }
    Some(format!("{}.prototype.{}", owner.qualified_name()?, name))
}
