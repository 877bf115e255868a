//! Region configuration
//!
//! Adds an optional `region` to the service config and inserts it into every
//! request's property bag.

use crate::section::{Customization, OperationSection, ServiceConfig};
use crate::symbol::runtime;
use crate::writer::Writable;

pub struct RegionCustomization;

impl Customization<ServiceConfig> for RegionCustomization {
    fn name(&self) -> &str {
        "region"
    }

    fn section(&self, section: &ServiceConfig) -> Writable<'_> {
        let template = match section {
            ServiceConfig::ConfigStruct => "pub(crate) region: Option<#T>,",
            ServiceConfig::ConfigImpl => {
                r#"
                pub fn region(&self) -> Option<&#T> {
                    self.region.as_ref()
                }
                "#
            }
            ServiceConfig::BuilderStruct => "region: Option<#T>,",
            ServiceConfig::BuilderImpl => {
                r#"
                pub fn region(mut self, region: impl Into<Option<#T>>) -> Self {
                    self.region = region.into();
                    self
                }
                "#
            }
            ServiceConfig::BuilderBuild => return Writable::text("region: self.region,"),
        };
        Writable::new(move |w| {
            let region = runtime::region(w.config());
            w.write(template, &[region.into()])?;
            Ok(())
        })
    }
}

impl Customization<OperationSection> for RegionCustomization {
    fn name(&self) -> &str {
        "region"
    }

    fn section(&self, section: &OperationSection) -> Writable<'_> {
        match section {
            OperationSection::ImplBlock => Writable::empty(),
            OperationSection::MutateInput { .. } => Writable::empty(),
            OperationSection::Plugin { operation, config } => {
                let (operation, config) = (operation.clone(), config.clone());
                Writable::new(move |w| {
                    w.write(
                        r#"
                        if let Some(region) = &#T.region {
                            #T.config_mut().insert(region.clone());
                        }
                        "#,
                        &[config.as_str().into(), operation.as_str().into()],
                    )?;
                    Ok(())
                })
            }
        }
    }
}
