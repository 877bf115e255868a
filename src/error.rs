//! Error types for reference resolution, templating and section dispatch

use thiserror::Error;

/// Errors that abort generation of a compilation unit
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The model declares a trait value this generator has no mapping for
    #[error("unsupported value '{value}' for trait {trait_id}")]
    UnsupportedTraitVariant { trait_id: String, value: String },

    /// An inline dependency requires itself through its own generator
    #[error("cyclic inline dependency: {chain}")]
    CyclicInlineDependency { chain: String },

    /// A reference was built without a module path
    #[error("reference '{name}' has an empty namespace")]
    EmptyNamespace { name: String },

    /// Two registrations of the same crate disagree on where it comes from
    #[error("conflicting declarations for dependency '{name}': {existing} vs {incoming}")]
    ConflictingDependency {
        name: String,
        existing: String,
        incoming: String,
    },

    /// Malformed template or mismatched template arguments
    #[error("template error: {message}")]
    Template { message: String },

    /// A customization asked for data its slot cannot supply
    #[error("customization '{customization}' failed in section {section}: {message}")]
    Section {
        section: String,
        customization: String,
        message: String,
    },
}

impl CodegenError {
    /// Create an unsupported trait variant error
    pub fn unsupported(trait_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnsupportedTraitVariant {
            trait_id: trait_id.into(),
            value: value.into(),
        }
    }

    /// Create a cyclic inline dependency error from the offending chain
    pub fn cyclic(chain: &[String]) -> Self {
        Self::CyclicInlineDependency {
            chain: chain.join(" -> "),
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create a section error raised by a customization
    pub fn section(
        section: impl Into<String>,
        customization: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Section {
            section: section.into(),
            customization: customization.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display() {
        let err = CodegenError::unsupported("smithy.api#timestampFormat", "unix-millis");
        assert_eq!(
            err.to_string(),
            "unsupported value 'unix-millis' for trait smithy.api#timestampFormat"
        );
    }

    #[test]
    fn test_cyclic_display() {
        let chain = vec!["a::x".to_string(), "b::y".to_string(), "a::x".to_string()];
        let err = CodegenError::cyclic(&chain);
        assert!(err.to_string().contains("a::x -> b::y -> a::x"));
    }

    #[test]
    fn test_section_display_names_customization() {
        let err = CodegenError::section("ConfigStruct", "region", "no operation in scope");
        let msg = err.to_string();
        assert!(msg.contains("region"));
        assert!(msg.contains("ConfigStruct"));
    }
}
