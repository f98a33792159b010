//! Diagnostics for the wiregen schema engine.
//!
//! Warnings never stop a run: a declaration, field or directive that cannot
//! be handled is dropped and reported here, and the run goes on. Each
//! diagnostic carries:
//! - An [`ErrorCode`] for searchability
//! - A [`Severity`]
//! - A message and the subject (declaration, field, identifier or
//!   directive) it concerns
//!
//! The [`Diagnostics`] collector gathers them in report order and mirrors
//! each one to `tracing`.

mod collector;
mod diagnostic;
mod error_code;

pub use collector::Diagnostics;
pub use diagnostic::{
    directive_failure, extension_mismatch, ignored_field, unresolved_identifier,
    unsupported_declaration, Diagnostic, Severity,
};
pub use error_code::ErrorCode;
