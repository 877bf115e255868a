//! Retry configuration on the service config

use crate::section::{Customization, ServiceConfig};
use crate::symbol::runtime;
use crate::writer::Writable;

pub struct RetryConfigCustomization;

impl Customization<ServiceConfig> for RetryConfigCustomization {
    fn name(&self) -> &str {
        "retry_config"
    }

    fn section(&self, section: &ServiceConfig) -> Writable<'_> {
        let template = match section {
            ServiceConfig::ConfigStruct => "pub(crate) retry_config: Option<#T>,",
            ServiceConfig::ConfigImpl => {
                r#"
                pub fn retry_config(&self) -> Option<&#T> {
                    self.retry_config.as_ref()
                }
                "#
            }
            ServiceConfig::BuilderStruct => "retry_config: Option<#T>,",
            ServiceConfig::BuilderImpl => {
                r#"
                pub fn retry_config(mut self, retry_config: #T) -> Self {
                    self.retry_config = Some(retry_config);
                    self
                }
                "#
            }
            ServiceConfig::BuilderBuild => return Writable::text("retry_config: self.retry_config,"),
        };
        Writable::new(move |w| {
            let retry_config = runtime::retry_config(w.config());
            w.write(template, &[retry_config.into()])?;
            Ok(())
        })
    }
}
