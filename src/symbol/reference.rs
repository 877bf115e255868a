//! References to nameable entities in generated code

use std::fmt;

use crate::error::CodegenError;

use super::dependency::Dependency;

/// First path segment of modules inside the generated crate
pub const LOCAL_ROOT: &str = "crate";

/// A nameable entity that generated code may mention
///
/// Two references are equal when name, dependency and namespace are all
/// equal. References are never mutated; builder methods return new values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    name: Option<String>,
    dependency: Option<Dependency>,
    namespace: String,
}

/// Result of resolving a reference at a use site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Text to emit in place of the reference
    pub display_text: String,
    /// Dependency to register on the enclosing unit, if any
    pub dependency: Option<Dependency>,
}

impl Reference {
    /// A reference from its three parts; `name` is `None` for a module
    pub fn new(
        name: Option<String>,
        dependency: Option<Dependency>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            name,
            dependency,
            namespace: namespace.into(),
        }
    }

    /// A named item
    pub fn named(
        name: impl Into<String>,
        dependency: Option<Dependency>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::new(Some(name.into()), dependency, namespace)
    }

    /// A module imported for its own sake rather than one of its items
    pub fn module(namespace: impl Into<String>, dependency: Option<Dependency>) -> Self {
        Self::new(None, dependency, namespace)
    }

    /// An item of the generated crate at `crate::{module_path}::{name}`
    pub fn local(module_path: &str, name: impl Into<String>) -> Self {
        let namespace = if module_path.is_empty() {
            LOCAL_ROOT.to_string()
        } else {
            format!("{}::{}", LOCAL_ROOT, module_path)
        };
        Self::named(name, None, namespace)
    }

    /// Resolves to nothing when written from `module`
    pub fn placeholder(module: impl Into<String>) -> Self {
        Self::new(None, None, module)
    }

    /// Same reference, carrying `dependency`
    pub fn with_dependency(&self, dependency: impl Into<Dependency>) -> Self {
        Self {
            dependency: Some(dependency.into()),
            ..self.clone()
        }
    }

    /// An item nested under this reference's full path
    ///
    /// `Reference(namespace = "smithy_types", name = "instant").member("Format")`
    /// is `smithy_types::instant::Format`, with the same dependency.
    pub fn member(&self, name: impl Into<String>) -> Self {
        let namespace = match &self.name {
            Some(own) => format!("{}::{}", self.namespace, own),
            None => self.namespace.clone(),
        };
        Self::new(Some(name.into()), self.dependency.clone(), namespace)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dependency(&self) -> Option<&Dependency> {
        self.dependency.as_ref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Whether the namespace lives inside the generated crate
    pub fn is_local(&self) -> bool {
        self.namespace.split("::").next() == Some(LOCAL_ROOT)
    }

    /// Fully qualified path as it should appear in source
    ///
    /// Paths into the generated crate start with `crate`; everything else gets
    /// a leading `::` so nested modules never shadow an external crate.
    pub fn fully_qualified_name(&self) -> String {
        let prefix = if self.is_local() { "" } else { "::" };
        match &self.name {
            Some(name) => format!("{}{}::{}", prefix, self.namespace, name),
            None => format!("{}{}", prefix, self.namespace),
        }
    }

    /// Resolve for a use site inside `current_module`
    pub fn resolve(&self, current_module: &str) -> Result<Resolved, CodegenError> {
        if self.namespace.is_empty() {
            return Err(CodegenError::EmptyNamespace {
                name: self.name.clone().unwrap_or_default(),
            });
        }

        if self.name.is_none() && self.dependency.is_none() && self.namespace == current_module {
            return Ok(Resolved {
                display_text: String::new(),
                dependency: None,
            });
        }

        Ok(Resolved {
            display_text: self.fully_qualified_name(),
            dependency: self.dependency.clone(),
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::CargoDependency;

    #[test]
    fn test_local_namespace_has_no_leading_separator() {
        let r = Reference::named("Config", None, "crate::config");
        assert_eq!(r.fully_qualified_name(), "crate::config::Config");

        let root = Reference::named("Error", None, "crate");
        assert_eq!(root.fully_qualified_name(), "crate::Error");
    }

    #[test]
    fn test_external_namespace_has_leading_separator() {
        let r = Reference::named("HashMap", None, "std::collections");
        assert_eq!(r.fully_qualified_name(), "::std::collections::HashMap");
    }

    #[test]
    fn test_crate_prefix_is_a_segment_match() {
        let r = Reference::named("Thing", None, "crates_io::index");
        assert_eq!(r.fully_qualified_name(), "::crates_io::index::Thing");
    }

    #[test]
    fn test_unnamed_reference_is_namespace_only() {
        let r = Reference::module("http", Some(CargoDependency::crates_io("http", "0.2").into()));
        let resolved = r.resolve("crate::operation").unwrap();
        assert_eq!(resolved.display_text, "::http");
        assert!(resolved.dependency.is_some());
    }

    #[test]
    fn test_placeholder_resolves_to_empty() {
        let r = Reference::placeholder("crate::model");
        let resolved = r.resolve("crate::model").unwrap();
        assert_eq!(resolved.display_text, "");
        assert_eq!(resolved.dependency, None);

        // From another module it is a plain module path
        assert_eq!(r.resolve("crate::input").unwrap().display_text, "crate::model");
    }

    #[test]
    fn test_empty_namespace_is_error() {
        let r = Reference::named("Orphan", None, "");
        assert!(matches!(
            r.resolve("crate"),
            Err(CodegenError::EmptyNamespace { ref name }) if name == "Orphan"
        ));
    }

    #[test]
    fn test_value_equality() {
        let a = Reference::local("model", "Shape");
        let b = Reference::local("model", "Shape");
        let c = Reference::local("input", "Shape");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_member_extends_path() {
        let instant = Reference::named("instant", None, "smithy_types");
        let format = instant.member("Format");
        assert_eq!(format.namespace(), "smithy_types::instant");
        assert_eq!(format.to_string(), "::smithy_types::instant::Format");
    }
}
