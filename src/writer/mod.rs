//! Templating sink for generated source
//!
//! [`CodeWriter`] takes templates with placeholders and a list of values to
//! substitute. References written through it are resolved and their
//! dependencies recorded on the writer's manifest as a side effect.

mod code;
mod template;
mod writable;

pub use code::CodeWriter;
pub use writable::{TemplateArg, Writable};
