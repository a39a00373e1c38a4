pub mod qualified_name;

pub use qualified_name::{InvalidQualifiedNameError, QualifiedName};
