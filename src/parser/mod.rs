//! Parser module that lowers a token stream straight into the instruction IR.
//!
//! Statements are dispatched on their leading token through a lookup table
//! and parsed by recursive descent. Expressions go through two shunting-yard
//! sub-parsers that produce postfix output and infer types on the way:
//!
//! - Arithmetic expressions for assignments, call arguments and returns
//! - Logical expressions for `if` conditions
//!
//! Names are resolved against the scope arena as soon as they are read, so
//! a successful parse is also a successful semantic check.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
