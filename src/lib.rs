//! Optimization passes over Closure-style JavaScript programs.
//!
//! Programs arrive as a [`JsProgram`](js::JsProgram) tree together with the
//! JSDoc [`AnnotationMap`](js::AnnotationMap) produced by earlier stages, and
//! are rewritten in place by the passes of an [`Optimizer`].

pub mod config;
pub mod js;
pub mod log;
pub mod optimizer;
pub mod passes;

pub use optimizer::{Optimizer, optimize};
