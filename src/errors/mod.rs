//! Error types and error handling for the front end.
//!
//! This module defines the diagnostics raised while tokenizing and parsing:
//!
//! - Error structures with source line information and a severity
//! - Specific error variants, grouped into an inspectable `ErrorKind`
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;
