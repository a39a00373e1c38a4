use std::fmt;

use pretty::BoxDoc;

use crate::js::annotations::AnnotationMap;
use crate::js::symbols::QualifiedName;

/// Unique identifier for each statement and expression in a program
pub type NodeId = u32;

#[derive(Debug, Clone, PartialEq)]
pub struct JsProgram {
    pub units: Vec<CompilationUnit>,
}

/// A single source file, as handed to the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    /// File name (e.g. file1.js)
    pub name: String,
    pub body: Vec<JsStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsStatement {
    /// An expression evaluated for its effect, e.g. `foo.bar(1);`
    Expr { id: NodeId, expr: JsExpr },

    /// `return;` or `return value;`
    Return { id: NodeId, value: Option<JsExpr> },

    /// `var name = init;`
    Var {
        id: NodeId,
        name: String,
        init: Option<JsExpr>,
    },

    /// `if (condition) { ... } else { ... }`
    If {
        id: NodeId,
        condition: JsExpr,
        body: Vec<JsStatement>,
        else_body: Option<Vec<JsStatement>>,
    },

    /// A bare block `{ ... }`
    Block { id: NodeId, body: Vec<JsStatement> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsExpr {
    /// An identifier, e.g. foo
    Name { name: String, id: NodeId },

    /// The `this` keyword
    This { id: NodeId },

    /// A property access, e.g. foo.bar
    GetProp {
        object: Box<JsExpr>,
        property: String,
        id: NodeId,
    },

    /// A call, e.g. foo.bar(1, 2)
    Call {
        callee: Box<JsExpr>,
        args: Vec<JsExpr>,
        id: NodeId,
    },

    /// An assignment, e.g. Foo.prototype.bar = function() {}
    Assign {
        target: Box<JsExpr>,
        value: Box<JsExpr>,
        id: NodeId,
    },

    /// A function literal, e.g. function(a, b) { ... }
    Function {
        params: Vec<String>,
        body: Vec<JsStatement>,
        id: NodeId,
    },

    /// An object literal, e.g. {a: 1, b: 2}
    Object {
        properties: Vec<(String, JsExpr)>,
        id: NodeId,
    },

    /// A number literal, e.g. 2
    Number { value: f64, id: NodeId },

    /// A string literal, e.g. "foo"
    String { value: String, id: NodeId },

    Binary {
        op: BinaryOp,
        left: Box<JsExpr>,
        right: Box<JsExpr>,
        id: NodeId,
    },

    /// A spread argument, e.g. ...args
    Spread { argument: Box<JsExpr>, id: NodeId },
}

impl JsProgram {
    /// Visit every statement of every unit, together with the index of its unit
    pub fn traverse<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(usize, &'a JsStatement),
    {
        for (index, unit) in self.units.iter().enumerate() {
            for stmt in &unit.body {
                stmt.traverse(&mut |s| f(index, s));
            }
        }
    }

    /// Keep only the statements for which `keep` returns true, at every level
    /// reachable by [`JsStatement::traverse`].
    pub fn retain_statements<F>(&mut self, keep: &mut F)
    where
        F: FnMut(&JsStatement) -> bool,
    {
        for unit in &mut self.units {
            retain_statements(&mut unit.body, keep);
        }
    }

    pub fn display<'a>(&'a self, annotations: &'a AnnotationMap) -> ProgramDisplay<'a> {
        ProgramDisplay {
            program: self,
            annotations,
        }
    }
}

fn retain_statements<F>(statements: &mut Vec<JsStatement>, keep: &mut F)
where
    F: FnMut(&JsStatement) -> bool,
{
    statements.retain(|stmt| keep(stmt));
    for stmt in statements.iter_mut() {
        match stmt {
            JsStatement::If {
                body, else_body, ..
            } => {
                retain_statements(body, keep);
                if let Some(else_stmts) = else_body {
                    retain_statements(else_stmts, keep);
                }
            }
            JsStatement::Block { body, .. } => retain_statements(body, keep),
            JsStatement::Expr { .. } | JsStatement::Return { .. } | JsStatement::Var { .. } => {}
        }
    }
}

impl JsStatement {
    pub fn id(&self) -> NodeId {
        match self {
            JsStatement::Expr { id, .. }
            | JsStatement::Return { id, .. }
            | JsStatement::Var { id, .. }
            | JsStatement::If { id, .. }
            | JsStatement::Block { id, .. } => *id,
        }
    }

    /// Traverse this statement and all nested statements with a closure.
    ///
    /// Function literals are not entered: their bodies belong to another scope.
    pub fn traverse<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a JsStatement),
    {
        f(self);
        match self {
            JsStatement::Expr { .. } | JsStatement::Return { .. } | JsStatement::Var { .. } => {}
            JsStatement::If {
                body, else_body, ..
            } => {
                for stmt in body {
                    stmt.traverse(f);
                }
                if let Some(else_stmts) = else_body {
                    for stmt in else_stmts {
                        stmt.traverse(f);
                    }
                }
            }
            JsStatement::Block { body, .. } => {
                for stmt in body {
                    stmt.traverse(f);
                }
            }
        }
    }

    /// Visit every expression in this statement, its nested statements and
    /// the bodies of any function literals it contains.
    pub fn walk_exprs<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a JsExpr),
    {
        match self {
            JsStatement::Expr { expr, .. } => expr.walk(f),
            JsStatement::Return { value, .. } | JsStatement::Var { init: value, .. } => {
                if let Some(value) = value {
                    value.walk(f);
                }
            }
            JsStatement::If {
                condition,
                body,
                else_body,
                ..
            } => {
                condition.walk(f);
                for stmt in body.iter().chain(else_body.iter().flatten()) {
                    stmt.walk_exprs(f);
                }
            }
            JsStatement::Block { body, .. } => {
                for stmt in body {
                    stmt.walk_exprs(f);
                }
            }
        }
    }

    pub fn to_doc<'a>(&'a self, annotations: &'a AnnotationMap) -> BoxDoc<'a> {
        let doc = match self {
            JsStatement::Expr { expr, .. } => expr.to_doc(annotations).append(BoxDoc::text(";")),
            JsStatement::Return { value, .. } => match value {
                Some(value) => BoxDoc::text("return ")
                    .append(value.to_doc(annotations))
                    .append(BoxDoc::text(";")),
                None => BoxDoc::text("return;"),
            },
            JsStatement::Var { name, init, .. } => {
                let doc = BoxDoc::text("var ").append(BoxDoc::text(name.as_str()));
                match init {
                    Some(init) => doc
                        .append(BoxDoc::text(" = "))
                        .append(init.to_doc(annotations))
                        .append(BoxDoc::text(";")),
                    None => doc.append(BoxDoc::text(";")),
                }
            }
            JsStatement::If {
                condition,
                body,
                else_body,
                ..
            } => {
                let doc = BoxDoc::text("if (")
                    .append(condition.to_doc(annotations))
                    .append(BoxDoc::text(") "))
                    .append(block_to_doc(body, annotations));
                match else_body {
                    Some(else_stmts) => doc
                        .append(BoxDoc::text(" else "))
                        .append(block_to_doc(else_stmts, annotations)),
                    None => doc,
                }
            }
            JsStatement::Block { body, .. } => block_to_doc(body, annotations),
        };

        match annotations.get(self.id()) {
            Some(info) => BoxDoc::text(format!("/** {} */", info))
                .append(BoxDoc::line())
                .append(doc),
            None => doc,
        }
    }
}

fn block_to_doc<'a>(body: &'a [JsStatement], annotations: &'a AnnotationMap) -> BoxDoc<'a> {
    if body.is_empty() {
        return BoxDoc::text("{}");
    }
    BoxDoc::text("{")
        .append(
            BoxDoc::line()
                .append(BoxDoc::intersperse(
                    body.iter().map(|stmt| stmt.to_doc(annotations)),
                    BoxDoc::line(),
                ))
                .nest(2),
        )
        .append(BoxDoc::line())
        .append(BoxDoc::text("}"))
}

impl JsExpr {
    pub fn id(&self) -> NodeId {
        match self {
            JsExpr::Name { id, .. }
            | JsExpr::This { id }
            | JsExpr::GetProp { id, .. }
            | JsExpr::Call { id, .. }
            | JsExpr::Assign { id, .. }
            | JsExpr::Function { id, .. }
            | JsExpr::Object { id, .. }
            | JsExpr::Number { id, .. }
            | JsExpr::String { id, .. }
            | JsExpr::Binary { id, .. }
            | JsExpr::Spread { id, .. } => *id,
        }
    }

    /// Visit this expression and every expression nested in it, including
    /// the statements of function literal bodies.
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a JsExpr),
    {
        f(self);
        match self {
            JsExpr::Name { .. }
            | JsExpr::This { .. }
            | JsExpr::Number { .. }
            | JsExpr::String { .. } => {}
            JsExpr::GetProp { object, .. } => object.walk(f),
            JsExpr::Call { callee, args, .. } => {
                callee.walk(f);
                for arg in args {
                    arg.walk(f);
                }
            }
            JsExpr::Assign { target, value, .. } => {
                target.walk(f);
                value.walk(f);
            }
            JsExpr::Function { body, .. } => {
                for stmt in body {
                    stmt.walk_exprs(f);
                }
            }
            JsExpr::Object { properties, .. } => {
                for (_, value) in properties {
                    value.walk(f);
                }
            }
            JsExpr::Binary { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
            JsExpr::Spread { argument, .. } => argument.walk(f),
        }
    }

    /// The dotted name this expression spells out, if it is a chain of
    /// property accesses rooted at an identifier (e.g. `ns.Foo.prototype`).
    pub fn qualified_name(&self) -> Option<QualifiedName> {
        match self {
            JsExpr::Name { name, .. } => QualifiedName::new(name).ok(),
            JsExpr::GetProp {
                object, property, ..
            } => object.qualified_name()?.child(property).ok(),
            _ => None,
        }
    }

    pub fn to_doc<'a>(&'a self, annotations: &'a AnnotationMap) -> BoxDoc<'a> {
        match self {
            JsExpr::Name { name, .. } => BoxDoc::text(name.as_str()),
            JsExpr::This { .. } => BoxDoc::text("this"),
            JsExpr::GetProp {
                object, property, ..
            } => object
                .to_doc(annotations)
                .append(BoxDoc::text("."))
                .append(BoxDoc::text(property.as_str())),
            JsExpr::Call { callee, args, .. } => callee
                .to_doc(annotations)
                .append(BoxDoc::text("("))
                .append(BoxDoc::intersperse(
                    args.iter().map(|arg| arg.to_doc(annotations)),
                    BoxDoc::text(", "),
                ))
                .append(BoxDoc::text(")")),
            JsExpr::Assign { target, value, .. } => target
                .to_doc(annotations)
                .append(BoxDoc::text(" = "))
                .append(value.to_doc(annotations)),
            JsExpr::Function { params, body, .. } => BoxDoc::text("function(")
                .append(BoxDoc::text(params.join(", ")))
                .append(BoxDoc::text(") "))
                .append(block_to_doc(body, annotations)),
            JsExpr::Object { properties, .. } => BoxDoc::text("{")
                .append(BoxDoc::intersperse(
                    properties.iter().map(|(key, value)| {
                        BoxDoc::text(key.as_str())
                            .append(BoxDoc::text(": "))
                            .append(value.to_doc(annotations))
                    }),
                    BoxDoc::text(", "),
                ))
                .append(BoxDoc::text("}")),
            JsExpr::Number { value, .. } => BoxDoc::as_string(value),
            JsExpr::String { value, .. } => BoxDoc::text(format!("{:?}", value)),
            JsExpr::Binary {
                op, left, right, ..
            } => operand_to_doc(left, annotations)
                .append(BoxDoc::text(" "))
                .append(BoxDoc::text(op.as_str()))
                .append(BoxDoc::text(" "))
                .append(operand_to_doc(right, annotations)),
            JsExpr::Spread { argument, .. } => {
                BoxDoc::text("...").append(argument.to_doc(annotations))
            }
        }
    }
}

fn operand_to_doc<'a>(operand: &'a JsExpr, annotations: &'a AnnotationMap) -> BoxDoc<'a> {
    match operand {
        JsExpr::Binary { .. } | JsExpr::Assign { .. } => BoxDoc::text("(")
            .append(operand.to_doc(annotations))
            .append(BoxDoc::text(")")),
        _ => operand.to_doc(annotations),
    }
}

/// Renders a program together with its annotations, one `// <unit>` header
/// per compilation unit.
pub struct ProgramDisplay<'a> {
    program: &'a JsProgram,
    annotations: &'a AnnotationMap,
}

impl fmt::Display for ProgramDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.program.units {
            writeln!(f, "// {}", unit.name)?;
            for stmt in &unit.body {
                writeln!(f, "{}", stmt.to_doc(self.annotations).pretty(80))?;
            }
        }
        Ok(())
    }
}
