//! Customizations shipped with the generator
//!
//! Each customization is independent of the others; it only knows the
//! sections of the generation points it contributes to.

mod idempotency;
mod region;
mod retry;

pub use idempotency::IdempotencyTokenCustomization;
pub use region::RegionCustomization;
pub use retry::RetryConfigCustomization;

use crate::section::{Customizations, OperationSection, ServiceConfig};

/// The default service config customizations, in registration order
pub fn service_config_customizations() -> Customizations<ServiceConfig> {
    vec![
        Box::new(RegionCustomization),
        Box::new(IdempotencyTokenCustomization::default()),
        Box::new(RetryConfigCustomization),
    ]
}

/// `camelCase` or `PascalCase` to `snake_case`
pub(crate) fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Operation customizations for one operation whose input is `input`
pub fn operation_customizations(
    model: &dyn crate::model::Model,
    input: &crate::model::ShapeId,
) -> Customizations<OperationSection> {
    vec![
        Box::new(IdempotencyTokenCustomization::for_input(model, input)),
        Box::new(RegionCustomization),
    ]
}
