use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::js::annotations::{AnnotationMap, JsDocInfo};
use crate::js::symbols::QualifiedName;
use crate::js::syntax::ast::{BinaryOp, CompilationUnit, JsExpr, JsProgram, JsStatement, NodeId};

/// Build a program from one or more compilation units.
pub fn build_program<F>(body_fn: F) -> (JsProgram, AnnotationMap)
where
    F: FnOnce(&mut ProgramBuilder),
{
    let mut builder = ProgramBuilder {
        next_id: Rc::new(Cell::new(1)),
        annotations: Rc::new(RefCell::new(AnnotationMap::new())),
        units: Vec::new(),
    };
    body_fn(&mut builder);
    let annotations = builder.annotations.borrow().clone();
    (
        JsProgram {
            units: builder.units,
        },
        annotations,
    )
}

/// Build a program consisting of a single compilation unit.
pub fn build_unit<F>(name: &str, body_fn: F) -> (JsProgram, AnnotationMap)
where
    F: FnOnce(&mut JsBuilder),
{
    build_program(|p| p.unit(name, body_fn))
}

pub struct ProgramBuilder {
    next_id: Rc<Cell<NodeId>>,
    annotations: Rc<RefCell<AnnotationMap>>,
    units: Vec<CompilationUnit>,
}

impl ProgramBuilder {
    pub fn unit<F>(&mut self, name: &str, body_fn: F)
    where
        F: FnOnce(&mut JsBuilder),
    {
        let mut builder = JsBuilder {
            next_id: self.next_id.clone(),
            annotations: self.annotations.clone(),
            pending_doc: None,
            statements: Vec::new(),
        };
        body_fn(&mut builder);
        self.units.push(CompilationUnit {
            name: name.to_string(),
            body: builder.finish(),
        });
    }
}

pub struct JsBuilder {
    next_id: Rc<Cell<NodeId>>,
    annotations: Rc<RefCell<AnnotationMap>>,
    pending_doc: Option<JsDocInfo>,
    statements: Vec<JsStatement>,
}

impl JsBuilder {
    fn new_scoped(&self) -> Self {
        Self {
            next_id: self.next_id.clone(),
            annotations: self.annotations.clone(),
            pending_doc: None,
            statements: Vec::new(),
        }
    }

    fn finish(self) -> Vec<JsStatement> {
        if let Some(doc) = self.pending_doc {
            panic!("JSDoc '{}' is not followed by a statement", doc);
        }
        self.statements
    }

    fn next_id(&self) -> NodeId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    fn push(&mut self, stmt: JsStatement) {
        if let Some(doc) = self.pending_doc.take() {
            self.annotations.borrow_mut().insert(stmt.id(), doc);
        }
        self.statements.push(stmt);
    }

    /// Attach a JSDoc comment to the next statement
    pub fn doc(&mut self, text: &str) {
        let info = JsDocInfo::parse(text)
            .unwrap_or_else(|err| panic!("Invalid JSDoc '{}' in test builder: {}", text, err));
        self.pending_doc = Some(info);
    }

    // Statement builders
    pub fn expr_stmt(&mut self, expr: JsExpr) {
        let stmt = JsStatement::Expr {
            id: self.next_id(),
            expr,
        };
        self.push(stmt);
    }

    pub fn assign_stmt(&mut self, target: JsExpr, value: JsExpr) {
        let expr = self.assign(target, value);
        self.expr_stmt(expr);
    }

    pub fn var(&mut self, name: &str, init: JsExpr) {
        let stmt = JsStatement::Var {
            id: self.next_id(),
            name: name.to_string(),
            init: Some(init),
        };
        self.push(stmt);
    }

    pub fn ret(&mut self, value: JsExpr) {
        let stmt = JsStatement::Return {
            id: self.next_id(),
            value: Some(value),
        };
        self.push(stmt);
    }

    pub fn ret_void(&mut self) {
        let stmt = JsStatement::Return {
            id: self.next_id(),
            value: None,
        };
        self.push(stmt);
    }

    pub fn if_stmt<F>(&mut self, condition: JsExpr, body_fn: F)
    where
        F: FnOnce(&mut Self),
    {
        let mut inner = self.new_scoped();
        body_fn(&mut inner);
        let stmt = JsStatement::If {
            id: self.next_id(),
            condition,
            body: inner.finish(),
            else_body: None,
        };
        self.push(stmt);
    }

    pub fn block<F>(&mut self, body_fn: F)
    where
        F: FnOnce(&mut Self),
    {
        let mut inner = self.new_scoped();
        body_fn(&mut inner);
        let stmt = JsStatement::Block {
            id: self.next_id(),
            body: inner.finish(),
        };
        self.push(stmt);
    }

    // Expression builders
    pub fn name(&self, name: &str) -> JsExpr {
        JsExpr::Name {
            name: name.to_string(),
            id: self.next_id(),
        }
    }

    pub fn this(&self) -> JsExpr {
        JsExpr::This { id: self.next_id() }
    }

    /// A dotted path such as `Foo.superClass_.bar.call`
    pub fn path(&self, path: &str) -> JsExpr {
        let name = QualifiedName::new(path)
            .unwrap_or_else(|err| panic!("Invalid path '{}' in test builder: {}", path, err));
        let mut segments = name.segments();
        let root = segments
            .next()
            .expect("Qualified names have at least one segment");
        segments.fold(self.name(root), |object, segment| {
            self.get_prop(object, segment)
        })
    }

    pub fn get_prop(&self, object: JsExpr, property: &str) -> JsExpr {
        JsExpr::GetProp {
            object: Box::new(object),
            property: property.to_string(),
            id: self.next_id(),
        }
    }

    pub fn call(&self, callee: JsExpr, args: Vec<JsExpr>) -> JsExpr {
        JsExpr::Call {
            callee: Box::new(callee),
            args,
            id: self.next_id(),
        }
    }

    pub fn assign(&self, target: JsExpr, value: JsExpr) -> JsExpr {
        JsExpr::Assign {
            target: Box::new(target),
            value: Box::new(value),
            id: self.next_id(),
        }
    }

    pub fn function<F>(&self, params: &[&str], body_fn: F) -> JsExpr
    where
        F: FnOnce(&mut Self),
    {
        let mut inner = self.new_scoped();
        body_fn(&mut inner);
        JsExpr::Function {
            params: params.iter().map(|p| p.to_string()).collect(),
            body: inner.finish(),
            id: self.next_id(),
        }
    }

    pub fn object(&self, properties: Vec<(&str, JsExpr)>) -> JsExpr {
        JsExpr::Object {
            properties: properties
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            id: self.next_id(),
        }
    }

    pub fn num(&self, value: f64) -> JsExpr {
        JsExpr::Number {
            value,
            id: self.next_id(),
        }
    }

    pub fn str(&self, value: &str) -> JsExpr {
        JsExpr::String {
            value: value.to_string(),
            id: self.next_id(),
        }
    }

    pub fn add(&self, left: JsExpr, right: JsExpr) -> JsExpr {
        JsExpr::Binary {
            op: BinaryOp::Add,
            left: Box::new(left),
            right: Box::new(right),
            id: self.next_id(),
        }
    }

    pub fn spread(&self, argument: JsExpr) -> JsExpr {
        JsExpr::Spread {
            argument: Box::new(argument),
            id: self.next_id(),
        }
    }

    /// `<callee>.call(this, <args>)` where every argument is an identifier
    pub fn call_with_this(&self, callee: &str, args: &[&str]) -> JsExpr {
        let mut call_args = vec![self.this()];
        call_args.extend(args.iter().map(|arg| self.name(arg)));
        self.call(self.path(&format!("{}.call", callee)), call_args)
    }
}
