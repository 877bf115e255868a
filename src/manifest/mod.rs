//! Dependency manifests of compilation units
//!
//! A [`Manifest`] is the deduplicated set of dependencies one generated unit
//! needs. Each unit owns its manifest; manifests are merged, never shared
//! mutably, except through [`SharedManifest`] when several passes insert
//! concurrently.

mod inline;

pub use inline::{materialize_inline, InlineModule, Materialized};

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::RuntimeConfig;
use crate::error::CodegenError;
use crate::symbol::{CargoDependency, Dependency, DependencyKey, InlineDependency};

/// Deduplicated dependencies of a compilation unit, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<DependencyKey, Dependency>,
}

impl Manifest {
    /// An empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dependency
    ///
    /// Returns `true` if the manifest changed. Registering an equal dependency
    /// again has no effect. Inline dependencies bring their declared extra
    /// dependencies with them.
    pub fn register(&mut self, dependency: Dependency) -> Result<bool, CodegenError> {
        let key = dependency.key();
        let changed = match self.entries.get_mut(&key) {
            Some(Dependency::Cargo(existing)) => match &dependency {
                Dependency::Cargo(incoming) => {
                    let merged = existing.merge(incoming)?;
                    if merged {
                        tracing::debug!(dependency = %key, "merged cargo dependency");
                    }
                    merged
                }
                Dependency::Inline(_) => false,
            },
            Some(Dependency::Inline(_)) => false,
            None => {
                tracing::debug!(dependency = %key, "registered dependency");
                if let Dependency::Inline(inline) = &dependency {
                    for extra in inline.extra_dependencies() {
                        self.register(extra.clone())?;
                    }
                }
                self.entries.insert(key, dependency);
                true
            }
        };
        Ok(changed)
    }

    /// Register every dependency of `other`
    ///
    /// All or nothing: on a conflict `self` is left as it was.
    pub fn merge(&mut self, other: Manifest) -> Result<(), CodegenError> {
        let mut merged = self.clone();
        for dependency in other.entries.into_values() {
            merged.register(dependency)?;
        }
        *self = merged;
        Ok(())
    }

    pub fn contains(&self, key: &DependencyKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &DependencyKey) -> Option<&Dependency> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All dependencies in key order
    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &DependencyKey> {
        self.entries.keys()
    }

    pub fn cargo_dependencies(&self) -> impl Iterator<Item = &CargoDependency> {
        self.entries.values().filter_map(|d| match d {
            Dependency::Cargo(c) => Some(c),
            Dependency::Inline(_) => None,
        })
    }

    pub fn inline_dependencies(&self) -> impl Iterator<Item = &InlineDependency> {
        self.entries.values().filter_map(|d| match d {
            Dependency::Inline(i) => Some(i),
            Dependency::Cargo(_) => None,
        })
    }

    /// Render every inline dependency and flatten everything they require
    pub fn materialize(&self, config: &Arc<RuntimeConfig>) -> Result<Materialized, CodegenError> {
        inline::Materializer::new(config.clone()).run(self.iter())
    }
}

/// A manifest that several passes may insert into concurrently
#[derive(Debug, Default)]
pub struct SharedManifest {
    inner: Mutex<Manifest>,
}

impl SharedManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, dependency: Dependency) -> Result<bool, CodegenError> {
        self.inner.lock().register(dependency)
    }

    pub fn merge(&self, other: Manifest) -> Result<(), CodegenError> {
        self.inner.lock().merge(other)
    }

    /// Copy of the current contents
    pub fn snapshot(&self) -> Manifest {
        self.inner.lock().clone()
    }

    pub fn into_inner(self) -> Manifest {
        self.inner.into_inner()
    }
}
