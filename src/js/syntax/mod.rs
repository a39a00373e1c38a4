pub mod ast;
#[cfg(test)]
pub mod builder;
