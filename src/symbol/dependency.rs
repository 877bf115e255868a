//! Dependency descriptors attached to references

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::CodegenError;
use crate::writer::CodeWriter;

use super::reference::{Reference, LOCAL_ROOT};

/// Generator for the source of an inline module
///
/// It writes into a [`CodeWriter`] bound to the inline module, so any
/// reference it writes registers its own dependencies.
pub type InlineRenderer = fn(&mut CodeWriter) -> Result<(), CodegenError>;

/// Something a generated unit needs in order to compile
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// A crate declared in the generated crate's manifest
    Cargo(CargoDependency),
    /// A module whose source is emitted into the generated crate itself
    Inline(InlineDependency),
}

impl Dependency {
    /// Identity used for deduplication
    pub fn key(&self) -> DependencyKey {
        match self {
            Dependency::Cargo(c) => DependencyKey::Cargo(c.name.clone()),
            Dependency::Inline(i) => DependencyKey::Inline {
                module: i.module.clone(),
                name: i.name.clone(),
            },
        }
    }
}

impl From<CargoDependency> for Dependency {
    fn from(dep: CargoDependency) -> Self {
        Dependency::Cargo(dep)
    }
}

impl From<InlineDependency> for Dependency {
    fn from(dep: InlineDependency) -> Self {
        Dependency::Inline(dep)
    }
}

/// Deduplication key of a dependency
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DependencyKey {
    Cargo(String),
    Inline { module: String, name: String },
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyKey::Cargo(name) => write!(f, "{}", name),
            DependencyKey::Inline { module, name } => write!(f, "{}::{}", module, name),
        }
    }
}

/// Where a crate is fetched from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    CratesIo { version: String },
    Local { path: String },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::CratesIo { version } => write!(f, "version {}", version),
            Location::Local { path } => write!(f, "path {}", path),
        }
    }
}

/// Manifest section a crate is declared in; `Compile` sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DependencyScope {
    #[default]
    Compile,
    Dev,
}

/// A crate coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CargoDependency {
    name: String,
    location: Location,
    scope: DependencyScope,
    features: BTreeSet<String>,
}

impl CargoDependency {
    /// A compile-scope dependency without features
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
            scope: DependencyScope::Compile,
            features: BTreeSet::new(),
        }
    }

    /// A crates.io dependency
    pub fn crates_io(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(
            name,
            Location::CratesIo {
                version: version.into(),
            },
        )
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.insert(feature.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn scope(&self) -> DependencyScope {
        self.scope
    }

    pub fn features(&self) -> &BTreeSet<String> {
        &self.features
    }

    /// Module path the crate is imported under (`-` becomes `_`)
    pub fn namespace(&self) -> String {
        self.name.replace('-', "_")
    }

    /// Reference to the crate root itself
    pub fn to_reference(&self) -> Reference {
        Reference::module(self.namespace(), Some(self.clone().into()))
    }

    /// Combine two declarations of the same crate
    ///
    /// Features are unioned and a compile-scope declaration wins over a
    /// dev-scope one. Declarations pointing at different locations conflict.
    pub(crate) fn merge(&mut self, other: &CargoDependency) -> Result<bool, CodegenError> {
        if self.location != other.location {
            return Err(CodegenError::ConflictingDependency {
                name: self.name.clone(),
                existing: self.location.to_string(),
                incoming: other.location.to_string(),
            });
        }

        let mut changed = false;
        for feature in &other.features {
            changed |= self.features.insert(feature.clone());
        }
        if other.scope < self.scope {
            self.scope = other.scope;
            changed = true;
        }
        Ok(changed)
    }
}

/// A module rendered into the generated crate on demand
#[derive(Clone)]
pub struct InlineDependency {
    name: String,
    module: String,
    extra_dependencies: Vec<Dependency>,
    renderer: InlineRenderer,
}

impl InlineDependency {
    /// An inline module `crate::{module}` rendered by `renderer`
    pub fn new(name: impl Into<String>, module: impl Into<String>, renderer: InlineRenderer) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            extra_dependencies: Vec::new(),
            renderer,
        }
    }

    /// Declare a dependency the rendered module needs regardless of what it writes
    pub fn with_dependency(mut self, dependency: impl Into<Dependency>) -> Self {
        self.extra_dependencies.push(dependency.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn extra_dependencies(&self) -> &[Dependency] {
        &self.extra_dependencies
    }

    pub fn renderer(&self) -> InlineRenderer {
        self.renderer
    }

    /// Namespace of the module inside the generated crate
    pub fn namespace(&self) -> String {
        format!("{}::{}", LOCAL_ROOT, self.module)
    }

    /// Reference to the inline module; using it pulls the module in
    pub fn to_reference(&self) -> Reference {
        Reference::module(self.namespace(), Some(self.clone().into()))
    }

    /// Reference to an item defined by the inline module
    pub fn member(&self, item: impl Into<String>) -> Reference {
        Reference::new(Some(item.into()), Some(self.clone().into()), self.namespace())
    }
}

// Identity is (module, name); the renderer is not compared.
impl PartialEq for InlineDependency {
    fn eq(&self, other: &Self) -> bool {
        self.module == other.module && self.name == other.name
    }
}

impl Eq for InlineDependency {}

impl Hash for InlineDependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.module.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Debug for InlineDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineDependency")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("extra_dependencies", &self.extra_dependencies)
            .finish_non_exhaustive()
    }
}
