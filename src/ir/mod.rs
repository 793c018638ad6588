//! IR module
//! Contains everything the parser produces for the translator
//!
//! Submodules:
//! - program: scopes, variables, functions and the global program arena
//! - instructions: the closed set of statement-level instructions
//! - types: inferred value types
pub mod instructions;
pub mod program;
pub mod types;

#[cfg(test)]
mod tests;
