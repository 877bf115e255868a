//! Idempotency tokens
//!
//! The service config carries a token provider. Operations whose input has a
//! member marked `@idempotencyToken` fill that member from the provider when
//! the caller left it unset.

use crate::model::{idempotency_token_member, Model, ShapeId};
use crate::section::{Customization, OperationSection, ServiceConfig};
use crate::symbol::runtime;
use crate::writer::Writable;

use super::snake_case;

#[derive(Debug, Default)]
pub struct IdempotencyTokenCustomization {
    /// Field name of the token member on the operation input
    token_field: Option<String>,
}

impl IdempotencyTokenCustomization {
    /// Customization for an operation with input shape `input`
    pub fn for_input(model: &dyn Model, input: &ShapeId) -> Self {
        let token_field = idempotency_token_member(model, input)
            .and_then(|member| member.member().map(snake_case));
        Self { token_field }
    }

    pub fn token_field(&self) -> Option<&str> {
        self.token_field.as_deref()
    }
}

impl Customization<ServiceConfig> for IdempotencyTokenCustomization {
    fn name(&self) -> &str {
        "idempotency_token"
    }

    fn section(&self, section: &ServiceConfig) -> Writable<'_> {
        let template = match section {
            ServiceConfig::ConfigStruct => "pub(crate) make_token: #T,",
            ServiceConfig::ConfigImpl => return Writable::empty(),
            ServiceConfig::BuilderStruct => "make_token: Option<#T>,",
            ServiceConfig::BuilderImpl => {
                r#"
                pub fn make_token(mut self, make_token: impl Into<#T>) -> Self {
                    self.make_token = Some(make_token.into());
                    self
                }
                "#
            }
            ServiceConfig::BuilderBuild => "make_token: self.make_token.unwrap_or_else(#T),",
        };
        let item = match section {
            ServiceConfig::BuilderBuild => "default_provider",
            _ => "IdempotencyTokenProvider",
        };
        Writable::new(move |w| {
            w.write(template, &[runtime::idempotency_token().member(item).into()])?;
            Ok(())
        })
    }
}

impl Customization<OperationSection> for IdempotencyTokenCustomization {
    fn name(&self) -> &str {
        "idempotency_token"
    }

    fn section(&self, section: &OperationSection) -> Writable<'_> {
        let field = match &self.token_field {
            Some(field) => field.as_str(),
            None => return Writable::empty(),
        };
        match section {
            OperationSection::ImplBlock => Writable::empty(),
            OperationSection::MutateInput { input, config } => {
                let (input, config) = (input.clone(), config.clone());
                Writable::new(move |w| {
                    w.write_named(
                        r#"
                        if #{input}.#{field}.is_none() {
                            #{input}.#{field} = Some(#{config}.make_token.make_idempotency_token());
                        }
                        "#,
                        &[
                            ("input", input.as_str().into()),
                            ("field", field.into()),
                            ("config", config.as_str().into()),
                        ],
                    )?;
                    Ok(())
                })
            }
            OperationSection::Plugin { .. } => Writable::empty(),
        }
    }
}
