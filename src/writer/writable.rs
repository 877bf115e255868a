//! Deferred chunks of output and template arguments

use std::borrow::Cow;
use std::fmt;

use crate::error::CodegenError;
use crate::symbol::Reference;

use super::CodeWriter;

type WriteFn<'a> = dyn Fn(&mut CodeWriter) -> Result<(), CodegenError> + 'a;

/// A piece of output that is written when handed a [`CodeWriter`]
///
/// The empty writable is a real value: it is what a customization returns
/// for a section it does not contribute to.
pub struct Writable<'a> {
    inner: Option<Box<WriteFn<'a>>>,
}

impl<'a> Writable<'a> {
    pub fn new(f: impl Fn(&mut CodeWriter) -> Result<(), CodegenError> + 'a) -> Self {
        Self {
            inner: Some(Box::new(f)),
        }
    }

    /// Writes nothing
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// A fixed template without arguments
    pub fn text(template: &'a str) -> Self {
        Self::new(move |w| {
            w.write(template, &[])?;
            Ok(())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    pub fn write_to(&self, writer: &mut CodeWriter) -> Result<(), CodegenError> {
        match &self.inner {
            Some(f) => f(writer),
            None => Ok(()),
        }
    }

    /// Write `parts` back to back, skipping empty ones
    ///
    /// The result is empty if every part is.
    pub fn concat(parts: Vec<Writable<'a>>) -> Self {
        let parts: Vec<_> = parts.into_iter().filter(|p| !p.is_empty()).collect();
        if parts.is_empty() {
            return Self::empty();
        }
        Self::new(move |w| {
            for part in &parts {
                part.write_to(w)?;
            }
            Ok(())
        })
    }
}

impl Default for Writable<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Writable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Writable(empty)")
        } else {
            f.write_str("Writable(..)")
        }
    }
}

/// A value substituted for a template placeholder
#[derive(Debug)]
pub enum TemplateArg<'a> {
    /// Resolved at the use site; its dependency is registered
    Reference(Reference),
    /// Inserted verbatim
    Text(Cow<'a, str>),
    /// Rendered in place
    Writable(Writable<'a>),
}

impl From<Reference> for TemplateArg<'_> {
    fn from(r: Reference) -> Self {
        TemplateArg::Reference(r)
    }
}

impl From<&Reference> for TemplateArg<'_> {
    fn from(r: &Reference) -> Self {
        TemplateArg::Reference(r.clone())
    }
}

impl<'a> From<&'a str> for TemplateArg<'a> {
    fn from(s: &'a str) -> Self {
        TemplateArg::Text(Cow::Borrowed(s))
    }
}

impl From<String> for TemplateArg<'_> {
    fn from(s: String) -> Self {
        TemplateArg::Text(Cow::Owned(s))
    }
}

impl<'a> From<Writable<'a>> for TemplateArg<'a> {
    fn from(w: Writable<'a>) -> Self {
        TemplateArg::Writable(w)
    }
}
