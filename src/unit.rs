//! Compilation units and crate-wide generation
//!
//! A unit renders one module of the generated crate with its own
//! [`CodeWriter`]. After rendering, the inline dependencies the unit pulled in
//! are materialized and its manifest is flattened. Units share nothing but the
//! read-only [`RuntimeConfig`], so [`generate_all`] renders them in parallel.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::RuntimeConfig;
use crate::error::CodegenError;
use crate::manifest::{InlineModule, Manifest};
use crate::section::{OperationGenerator, ServiceConfigGenerator};
use crate::writer::CodeWriter;

type Render = Box<dyn Fn(&mut CodeWriter) -> Result<(), CodegenError> + Send + Sync>;

/// One module of the generated crate, not yet rendered
pub struct CompilationUnit {
    module: String,
    render: Render,
}

impl CompilationUnit {
    /// A unit for `module` (e.g. `crate::model`) rendered by `render`
    pub fn new(
        module: impl Into<String>,
        render: impl Fn(&mut CodeWriter) -> Result<(), CodegenError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            module: module.into(),
            render: Box::new(render),
        }
    }

    /// The `crate::config` unit
    pub fn service_config(generator: ServiceConfigGenerator) -> Self {
        Self::new("crate::config", move |w| generator.render(w))
    }

    /// The `crate::operation::{snake_name}` unit of one operation
    pub fn operation(generator: OperationGenerator) -> Self {
        let module = format!("crate::operation::{}", crate::customize::snake_case(generator.name()));
        Self::new(module, move |w| generator.render(w))
    }

    pub fn module(&self) -> &str {
        &self.module
    }
}

impl fmt::Debug for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilationUnit")
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

/// A rendered module and everything it needs
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub module: String,
    pub source: String,
    /// Inline modules this unit requires, dependencies first
    pub inline_modules: Vec<InlineModule>,
    /// Flattened manifest: every cargo and inline dependency reachable from
    /// the unit, each once
    pub manifest: Manifest,
}

/// A unit that could not be generated
#[derive(Debug)]
pub struct UnitFailure {
    pub module: String,
    pub error: CodegenError,
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.module, self.error)
    }
}

impl std::error::Error for UnitFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Output of [`generate_all`]
#[derive(Debug)]
pub struct CrateOutput {
    /// One entry per input unit, in input order
    pub units: Vec<Result<GeneratedUnit, UnitFailure>>,
    /// Union of the manifests of every successful unit
    pub manifest: Manifest,
}

impl CrateOutput {
    pub fn generated(&self) -> impl Iterator<Item = &GeneratedUnit> {
        self.units.iter().filter_map(|u| u.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &UnitFailure> {
        self.units.iter().filter_map(|u| u.as_ref().err())
    }
}

/// Render one unit and materialize the inline dependencies it uses
#[tracing::instrument(level = "debug", skip_all, fields(module = %unit.module))]
pub fn generate(unit: &CompilationUnit, config: Arc<RuntimeConfig>) -> Result<GeneratedUnit, CodegenError> {
    let mut writer = CodeWriter::new(config.clone(), unit.module.clone());
    (unit.render)(&mut writer)?;
    let (source, manifest) = writer.finish();

    let materialized = manifest.materialize(&config)?;
    tracing::debug!(
        dependencies = materialized.manifest.len(),
        inline_modules = materialized.modules.len(),
        "generated unit"
    );

    Ok(GeneratedUnit {
        module: unit.module.clone(),
        source,
        inline_modules: materialized.modules,
        manifest: materialized.manifest,
    })
}

/// Render every unit in parallel
///
/// Unit manifests are merged into the crate manifest afterwards, in input
/// order. A unit whose manifest conflicts with the units before it fails and
/// contributes nothing. A failing unit is reported in place and does not stop
/// the others.
pub fn generate_all(units: &[CompilationUnit], config: Arc<RuntimeConfig>) -> CrateOutput {
    let rendered: Vec<Result<GeneratedUnit, CodegenError>> = units
        .par_iter()
        .map(|unit| generate(unit, config.clone()))
        .collect();

    let mut manifest = Manifest::new();
    let results: Vec<Result<GeneratedUnit, UnitFailure>> = units
        .iter()
        .zip(rendered)
        .map(|(unit, generated)| {
            let generated = generated.and_then(|generated| {
                manifest.merge(generated.manifest.clone())?;
                Ok(generated)
            });
            generated.map_err(|error| {
                tracing::warn!(module = %unit.module, %error, "unit failed");
                UnitFailure {
                    module: unit.module.clone(),
                    error,
                }
            })
        })
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::error!(failed, total = units.len(), "crate generation incomplete");
    }

    CrateOutput {
        units: results,
        manifest,
    }
}
