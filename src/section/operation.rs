//! Operation generation point

use crate::error::CodegenError;
use crate::symbol::{runtime, Reference};
use crate::writer::CodeWriter;

use super::{dispatch, Customization, Customizations, Section};

/// Local binding of the operation input inside `make_operation`
pub const INPUT_BINDING: &str = "self";
/// Local binding of the service config inside `make_operation`
pub const CONFIG_BINDING: &str = "_config";
/// Local binding of the request inside `make_operation`
pub const REQUEST_BINDING: &str = "request";

/// Sections of a generated operation
///
/// `MutateInput` is written before `Plugin`, so bindings a customization sets
/// up while mutating the input are visible to every plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationSection {
    /// Extra items inside `impl {Operation}`
    ImplBlock,
    /// Statements that adjust the input before the request is built
    MutateInput { input: String, config: String },
    /// Statements that configure the built request
    Plugin { operation: String, config: String },
}

impl OperationSection {
    fn mutate_input() -> Self {
        OperationSection::MutateInput {
            input: INPUT_BINDING.to_string(),
            config: CONFIG_BINDING.to_string(),
        }
    }

    fn plugin() -> Self {
        OperationSection::Plugin {
            operation: REQUEST_BINDING.to_string(),
            config: CONFIG_BINDING.to_string(),
        }
    }
}

impl Section for OperationSection {
    fn all() -> Vec<Self> {
        vec![
            OperationSection::ImplBlock,
            OperationSection::mutate_input(),
            OperationSection::plugin(),
        ]
    }

    fn name(&self) -> &'static str {
        match self {
            OperationSection::ImplBlock => "ImplBlock",
            OperationSection::MutateInput { .. } => "MutateInput",
            OperationSection::Plugin { .. } => "Plugin",
        }
    }
}

/// Renders one operation struct and its input's `make_operation`
pub struct OperationGenerator {
    /// Operation name, e.g. `PutItem`
    name: String,
    /// Service name reported in operation metadata
    service: String,
    customizations: Customizations<OperationSection>,
}

impl OperationGenerator {
    pub fn new(
        name: impl Into<String>,
        service: impl Into<String>,
        customizations: Customizations<OperationSection>,
    ) -> Self {
        Self {
            name: name.into(),
            service: service.into(),
            customizations,
        }
    }

    pub fn with_customization(
        mut self,
        customization: impl Customization<OperationSection> + 'static,
    ) -> Self {
        self.customizations.push(Box::new(customization));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, writer: &mut CodeWriter) -> Result<(), CodegenError> {
        let rc = writer.config().clone();
        let op = Reference::named(self.name.as_str(), None, writer.module());
        let section = |s: OperationSection| dispatch(&self.customizations, &s);

        writer.write_named(
            r#"
            #[derive(Debug, Default, Clone)]
            pub struct #{Name} {
                _private: (),
            }

            impl #{Name} {
                pub fn new() -> Self {
                    Self { _private: () }
                }
                #{ImplBlock}
            }

            impl #{Input} {
                pub fn make_operation(
                    mut self,
                    _config: &#{Config},
                ) -> Result<#{Operation}<#{Op}, ()>, #{BuildError}> {
                    #{MutateInput}
                    let body = self.build_body();
                    let mut request = #{OperationModule}::Request::new(
                        self.request_builder_base()?
                            .body(#{SdkBody}::from(body))
                            .expect("should be valid request"),
                    );
                    #{Plugin}
                    let op = #{Operation}::new(request, #{Op}::new())
                        .with_metadata(#{OperationModule}::Metadata::new(#{NameLit}, #{ServiceLit}));
                    Ok(op)
                }
            }
            "#,
            &[
                ("Name", self.name.as_str().into()),
                ("ImplBlock", section(OperationSection::ImplBlock).into()),
                ("Input", Reference::local("input", format!("{}Input", self.name)).into()),
                ("Config", Reference::local("config", "Config").into()),
                ("Operation", runtime::operation(&rc).into()),
                ("Op", op.into()),
                ("BuildError", runtime::build_error(&rc).into()),
                ("MutateInput", section(OperationSection::mutate_input()).into()),
                ("OperationModule", runtime::operation_module(&rc).into()),
                ("SdkBody", runtime::sdk_body(&rc).into()),
                ("Plugin", section(OperationSection::plugin()).into()),
                ("NameLit", format!("{:?}", self.name).into()),
                ("ServiceLit", format!("{:?}", self.service).into()),
            ],
        )?;
        Ok(())
    }
}
