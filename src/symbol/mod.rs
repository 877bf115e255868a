//! References to external and generated entities
//!
//! A [`Reference`] names something generated code mentions: a type, a
//! function, or a module. It carries the namespace to qualify it with and the
//! dependency required to use it. The [`runtime`] module builds references to
//! the support libraries for a given [`RuntimeConfig`](crate::RuntimeConfig).

mod dependency;
mod reference;
pub mod runtime;

pub use dependency::{
    CargoDependency, Dependency, DependencyKey, DependencyScope, InlineDependency,
    InlineRenderer, Location,
};
pub use reference::{Reference, Resolved, LOCAL_ROOT};
