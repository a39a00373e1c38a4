mod remove_super_methods;

pub use remove_super_methods::RemoveSuperMethodsPass;

use crate::js::{AnnotationMap, JsProgram};

/// Trait for optimization passes over a whole program
///
/// Passes mutate the program in place and treat the annotations as
/// read-only input produced by earlier compiler stages.
pub trait Pass {
    fn name(&self) -> &'static str;

    /// Run the pass, returning the number of statements it removed or rewrote
    fn run(&mut self, program: &mut JsProgram, annotations: &AnnotationMap) -> usize;
}
