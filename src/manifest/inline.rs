//! Materialization of inline dependencies
//!
//! Inline dependencies are modules rendered into the generated crate. Their
//! generators may write references that require further inline modules, so
//! rendering is a depth-first walk over that graph with cycle detection.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::RuntimeConfig;
use crate::error::CodegenError;
use crate::symbol::{Dependency, DependencyKey, InlineDependency};
use crate::writer::CodeWriter;

use super::Manifest;

/// Source of one rendered inline dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineModule {
    /// Module name inside the generated crate (`idempotency_token`)
    pub module: String,
    /// Name of the dependency that produced this source
    pub name: String,
    pub source: String,
}

/// Output of materialization: rendered modules plus the flattened manifest
#[derive(Debug, Clone, Default)]
pub struct Materialized {
    /// Rendered modules, dependencies before their dependents
    pub modules: Vec<InlineModule>,
    /// Every cargo and inline dependency reachable, each exactly once
    pub manifest: Manifest,
}

/// Render a single inline dependency and everything it requires
pub fn materialize_inline(
    dependency: &InlineDependency,
    config: Arc<RuntimeConfig>,
) -> Result<Materialized, CodegenError> {
    let root = Dependency::Inline(dependency.clone());
    Materializer::new(config).run(std::iter::once(&root))
}

pub(super) struct Materializer {
    config: Arc<RuntimeConfig>,
    /// Dependencies whose generator is currently running, outermost first
    in_progress: Vec<DependencyKey>,
    done: BTreeSet<DependencyKey>,
    output: Materialized,
}

impl Materializer {
    pub(super) fn new(config: Arc<RuntimeConfig>) -> Self {
        Self {
            config,
            in_progress: Vec::new(),
            done: BTreeSet::new(),
            output: Materialized::default(),
        }
    }

    pub(super) fn run<'d>(
        mut self,
        roots: impl Iterator<Item = &'d Dependency>,
    ) -> Result<Materialized, CodegenError> {
        for dependency in roots {
            self.visit(dependency)?;
        }
        Ok(self.output)
    }

    fn visit(&mut self, dependency: &Dependency) -> Result<(), CodegenError> {
        match dependency {
            Dependency::Cargo(_) => {
                self.output.manifest.register(dependency.clone())?;
                Ok(())
            }
            Dependency::Inline(inline) => self.visit_inline(inline, dependency.key()),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(module = inline.module(), name = inline.name()))]
    fn visit_inline(
        &mut self,
        inline: &InlineDependency,
        key: DependencyKey,
    ) -> Result<(), CodegenError> {
        if self.done.contains(&key) {
            return Ok(());
        }

        if let Some(start) = self.in_progress.iter().position(|k| *k == key) {
            let chain: Vec<String> = self.in_progress[start..]
                .iter()
                .chain(std::iter::once(&key))
                .map(|k| k.to_string())
                .collect();
            return Err(CodegenError::cyclic(&chain));
        }

        self.in_progress.push(key.clone());

        let mut writer = CodeWriter::new(self.config.clone(), inline.namespace());
        (inline.renderer())(&mut writer)?;
        let (source, written) = writer.finish();

        for extra in inline.extra_dependencies() {
            self.visit(extra)?;
        }
        for required in written.iter() {
            // A module naming its own items is not a cycle
            if required.key() == key {
                continue;
            }
            self.visit(required)?;
        }

        self.in_progress.pop();
        self.output
            .manifest
            .register(Dependency::Inline(inline.clone()))?;
        self.output.modules.push(InlineModule {
            module: inline.module().to_string(),
            name: inline.name().to_string(),
            source,
        });
        self.done.insert(key);
        Ok(())
    }
}
