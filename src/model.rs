//! Queryable view of the input model
//!
//! The model parser lives outside this crate. Generators only need to ask
//! whether a shape carries a trait and what its value is, so the model is
//! consumed through the small [`Model`] trait.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::CodegenError;

/// Trait identifier for timestamp serialization formats
pub const TIMESTAMP_FORMAT_TRAIT: &str = "smithy.api#timestampFormat";

/// Trait identifier marking a member as an idempotency token
pub const IDEMPOTENCY_TOKEN_TRAIT: &str = "smithy.api#idempotencyToken";

/// Absolute shape identifier, e.g. `com.example#GetItem`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub String);

impl ShapeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The shape name without its namespace (`GetItem` for `com.example#GetItem`)
    pub fn name(&self) -> &str {
        match self.0.split_once('#') {
            Some((_, name)) => name.split('$').next().unwrap_or(name),
            None => &self.0,
        }
    }

    /// The member name, if this identifies a member (`token` for `a#B$token`)
    pub fn member(&self) -> Option<&str> {
        self.0.split_once('$').map(|(_, member)| member)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read access to shapes and their traits
pub trait Model {
    /// The value of `trait_id` on `shape`, if present
    fn trait_value(&self, shape: &ShapeId, trait_id: &str) -> Option<&str>;

    /// Member shapes of a structure, in declaration order
    fn members(&self, shape: &ShapeId) -> Vec<ShapeId>;

    /// Whether `shape` carries `trait_id`
    fn has_trait(&self, shape: &ShapeId, trait_id: &str) -> bool {
        self.trait_value(shape, trait_id).is_some()
    }
}

/// Timestamp wire formats with a support-library mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampFormat {
    EpochSeconds,
    DateTime,
    HttpDate,
}

impl TimestampFormat {
    /// Map a `timestampFormat` trait value
    ///
    /// Unknown values are a hard error; there is no default mapping.
    pub fn from_trait_value(value: &str) -> Result<Self, CodegenError> {
        match value {
            "epoch-seconds" => Ok(Self::EpochSeconds),
            "date-time" => Ok(Self::DateTime),
            "http-date" => Ok(Self::HttpDate),
            other => Err(CodegenError::unsupported(TIMESTAMP_FORMAT_TRAIT, other)),
        }
    }

    /// Variant name of the support library's `Format` enum
    pub fn variant_name(self) -> &'static str {
        match self {
            Self::EpochSeconds => "EpochSeconds",
            Self::DateTime => "DateTime",
            Self::HttpDate => "HttpDate",
        }
    }
}

/// Timestamp format of `shape`, or `default` when the trait is absent
pub fn timestamp_format(
    model: &dyn Model,
    shape: &ShapeId,
    default: TimestampFormat,
) -> Result<TimestampFormat, CodegenError> {
    match model.trait_value(shape, TIMESTAMP_FORMAT_TRAIT) {
        Some(value) => TimestampFormat::from_trait_value(value),
        None => Ok(default),
    }
}

/// The member of `structure` marked as an idempotency token, if any
pub fn idempotency_token_member(model: &dyn Model, structure: &ShapeId) -> Option<ShapeId> {
    model
        .members(structure)
        .into_iter()
        .find(|m| model.has_trait(m, IDEMPOTENCY_TOKEN_TRAIT))
}

/// In-memory model, mostly useful for tests and small drivers
#[derive(Debug, Clone, Default)]
pub struct StaticModel {
    traits: BTreeMap<(ShapeId, String), String>,
    members: BTreeMap<ShapeId, Vec<ShapeId>>,
}

impl StaticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a trait value to a shape
    pub fn with_trait(
        mut self,
        shape: impl Into<String>,
        trait_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.traits
            .insert((ShapeId::new(shape), trait_id.into()), value.into());
        self
    }

    /// Add a member to a structure; the member id is `{structure}${member}`
    pub fn with_member(mut self, structure: impl Into<String>, member: &str) -> Self {
        let structure = ShapeId::new(structure);
        let member_id = ShapeId::new(format!("{}${}", structure, member));
        self.members.entry(structure).or_default().push(member_id);
        self
    }
}

impl Model for StaticModel {
    fn trait_value(&self, shape: &ShapeId, trait_id: &str) -> Option<&str> {
        self.traits
            .get(&(shape.clone(), trait_id.to_string()))
            .map(String::as_str)
    }

    fn members(&self, shape: &ShapeId) -> Vec<ShapeId> {
        self.members.get(shape).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_id_parts() {
        let id = ShapeId::new("com.example#PutItemInput$token");
        assert_eq!(id.name(), "PutItemInput");
        assert_eq!(id.member(), Some("token"));
        assert_eq!(ShapeId::new("com.example#PutItem").member(), None);
    }

    #[test]
    fn test_timestamp_format_known_values() {
        assert_eq!(
            TimestampFormat::from_trait_value("http-date").unwrap(),
            TimestampFormat::HttpDate
        );
        assert_eq!(TimestampFormat::DateTime.variant_name(), "DateTime");
    }

    #[test]
    fn test_timestamp_format_unknown_is_error() {
        let result = TimestampFormat::from_trait_value("unix-millis");
        assert!(matches!(
            result,
            Err(CodegenError::UnsupportedTraitVariant { ref value, .. }) if value == "unix-millis"
        ));
    }

    #[test]
    fn test_timestamp_format_from_model() {
        let model = StaticModel::new().with_trait("a#Shape$ts", TIMESTAMP_FORMAT_TRAIT, "epoch-seconds");
        let shape = ShapeId::new("a#Shape$ts");
        let other = ShapeId::new("a#Shape$other");

        assert_eq!(
            timestamp_format(&model, &shape, TimestampFormat::DateTime).unwrap(),
            TimestampFormat::EpochSeconds
        );
        assert_eq!(
            timestamp_format(&model, &other, TimestampFormat::DateTime).unwrap(),
            TimestampFormat::DateTime
        );
    }

    #[test]
    fn test_idempotency_token_member() {
        let model = StaticModel::new()
            .with_member("a#Input", "name")
            .with_member("a#Input", "token")
            .with_trait("a#Input$token", IDEMPOTENCY_TOKEN_TRAIT, "");

        let member = idempotency_token_member(&model, &ShapeId::new("a#Input"));
        assert_eq!(member, Some(ShapeId::new("a#Input$token")));
        assert_eq!(idempotency_token_member(&model, &ShapeId::new("a#Other")), None);
    }
}
