//! Service configuration generation point

use crate::error::CodegenError;
use crate::writer::CodeWriter;

use super::{dispatch, Customization, Customizations, Section};

/// Sections of the generated `Config` and its `Builder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceConfig {
    /// Field declarations of `Config`
    ConfigStruct,
    /// Methods on `Config`
    ConfigImpl,
    /// Field declarations of `Builder`
    BuilderStruct,
    /// Methods on `Builder`
    BuilderImpl,
    /// Field initializers inside `Builder::build`
    BuilderBuild,
}

impl Section for ServiceConfig {
    fn all() -> Vec<Self> {
        vec![
            ServiceConfig::ConfigStruct,
            ServiceConfig::ConfigImpl,
            ServiceConfig::BuilderStruct,
            ServiceConfig::BuilderImpl,
            ServiceConfig::BuilderBuild,
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            ServiceConfig::ConfigStruct => "ConfigStruct",
            ServiceConfig::ConfigImpl => "ConfigImpl",
            ServiceConfig::BuilderStruct => "BuilderStruct",
            ServiceConfig::BuilderImpl => "BuilderImpl",
            ServiceConfig::BuilderBuild => "BuilderBuild",
        }
    }
}

/// Renders `Config` and `Builder` from the registered customizations
pub struct ServiceConfigGenerator {
    customizations: Customizations<ServiceConfig>,
}

impl ServiceConfigGenerator {
    pub fn new(customizations: Customizations<ServiceConfig>) -> Self {
        Self { customizations }
    }

    /// Append a customization; it contributes after those already registered
    pub fn with_customization(mut self, customization: impl Customization<ServiceConfig> + 'static) -> Self {
        self.customizations.push(Box::new(customization));
        self
    }

    pub fn customizations(&self) -> &[Box<dyn Customization<ServiceConfig>>] {
        &self.customizations
    }

    pub fn render(&self, writer: &mut CodeWriter) -> Result<(), CodegenError> {
        let section = |s: ServiceConfig| dispatch(&self.customizations, &s);

        writer.write_named(
            r#"
            /// Service configuration
            pub struct Config {
                #{ConfigStruct}
            }

            impl Config {
                pub fn builder() -> Builder {
                    Builder::default()
                }
                #{ConfigImpl}
            }

            /// Builder for [`Config`]
            #[derive(Default)]
            pub struct Builder {
                #{BuilderStruct}
            }

            impl Builder {
                pub fn new() -> Self {
                    Self::default()
                }
                #{BuilderImpl}
                pub fn build(self) -> Config {
                    Config {
                        #{BuilderBuild}
                    }
                }
            }
            "#,
            &[
                ("ConfigStruct", section(ServiceConfig::ConfigStruct).into()),
                ("ConfigImpl", section(ServiceConfig::ConfigImpl).into()),
                ("BuilderStruct", section(ServiceConfig::BuilderStruct).into()),
                ("BuilderImpl", section(ServiceConfig::BuilderImpl).into()),
                ("BuilderBuild", section(ServiceConfig::BuilderBuild).into()),
            ],
        )?;
        Ok(())
    }
}
