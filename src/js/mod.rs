pub mod annotations;
pub mod symbols;
pub mod syntax;

pub use annotations::{AnnotationMap, JsDocInfo, ParamKind, Suppression};
pub use symbols::QualifiedName;
pub use syntax::ast::{CompilationUnit, JsExpr, JsProgram, JsStatement, NodeId};
