//! rustgen - reference registry and section-based emission for a Rust code generator
//!
//! Generated code names types through [`Reference`]s. Writing a reference with
//! a [`CodeWriter`] produces the right path for the module being written and
//! records the dependency that path needs, so the manifest of a generated
//! crate is always exactly what its sources use. Generation points such as the
//! service config expose closed sets of [`Section`]s that [`Customization`]s
//! fill in.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rustgen::{runtime, CodeWriter, DependencyKey, RuntimeConfig};
//!
//! let config = Arc::new(RuntimeConfig::default().with_crate_prefix("acme"));
//! let mut writer = CodeWriter::new(config.clone(), "crate::model");
//! writer.write("pub data: #T,", &[runtime::blob(&config).into()])?;
//!
//! let (source, manifest) = writer.finish();
//! assert_eq!(source, "pub data: ::acme_types::Blob,\n");
//! assert!(manifest.contains(&DependencyKey::Cargo("acme-types".to_string())));
//! # Ok::<(), rustgen::CodegenError>(())
//! ```

pub mod config;
pub mod customize;
pub mod error;
pub mod manifest;
pub mod model;
pub mod section;
pub mod symbol;
pub mod unit;
pub mod writer;

pub use config::{ConfigError, RuntimeConfig};
pub use error::CodegenError;
pub use manifest::{InlineModule, Manifest, SharedManifest};
pub use model::{Model, ShapeId, StaticModel, TimestampFormat};
pub use section::{
    Customization, OperationGenerator, OperationSection, Section, ServiceConfig,
    ServiceConfigGenerator,
};
pub use symbol::{
    runtime, CargoDependency, Dependency, DependencyKey, DependencyScope, InlineDependency,
    Location, Reference,
};
pub use unit::{generate, generate_all, CompilationUnit, CrateOutput, GeneratedUnit, UnitFailure};
pub use writer::{CodeWriter, TemplateArg, Writable};
