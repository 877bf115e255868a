//! Section-based extension points
//!
//! A generation point (the service config, an operation) declares a closed
//! enum of sections. Each registered [`Customization`] is asked for every
//! section and answers with a [`Writable`], possibly empty. The generation
//! point writes the contributions of all customizations in registration
//! order.
//!
//! Customizations `match` on the section enum without a wildcard arm, so a
//! section added to a generation point fails to compile until every
//! customization handles it.

pub mod config;
pub mod operation;

pub use config::{ServiceConfig, ServiceConfigGenerator};
pub use operation::{OperationGenerator, OperationSection};

use std::fmt::Debug;

use crate::writer::Writable;

/// One slot of a generation point
pub trait Section: Debug {
    /// Every slot of the generation point, in emission order
    fn all() -> Vec<Self>
    where
        Self: Sized;

    fn name(&self) -> &'static str;
}

/// A pluggable contributor to the sections of one generation point
pub trait Customization<S: Section>: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Output for `section`, or [`Writable::empty`] for no contribution
    fn section(&self, section: &S) -> Writable<'_>;
}

/// Registered customizations of one generation point, in registration order
pub type Customizations<S> = Vec<Box<dyn Customization<S>>>;

/// Combine the contributions of every customization to `section`
///
/// Contributions are written back to back in registration order with nothing
/// in between. Errors raised while writing them propagate unchanged.
pub fn dispatch<'c, S: Section>(
    customizations: &'c [Box<dyn Customization<S>>],
    section: &S,
) -> Writable<'c> {
    let parts: Vec<Writable<'c>> = customizations
        .iter()
        .map(|c| c.section(section))
        .collect();

    tracing::trace!(
        section = section.name(),
        contributions = parts.iter().filter(|p| !p.is_empty()).count(),
        "dispatched section"
    );
    Writable::concat(parts)
}
