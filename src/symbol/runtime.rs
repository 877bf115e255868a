//! Factories for references into the support libraries and std
//!
//! Every factory is a pure function of the [`RuntimeConfig`] and the entity it
//! names. Changing the configured crate prefix retargets every reference
//! produced here without touching the generators that use them.

use crate::config::RuntimeConfig;
use crate::error::CodegenError;
use crate::model::TimestampFormat;
use crate::writer::CodeWriter;

use super::dependency::{CargoDependency, Dependency, InlineDependency};
use super::reference::Reference;

// Support crates

pub fn smithy_types(rc: &RuntimeConfig) -> CargoDependency {
    rc.runtime_crate("types")
}

pub fn smithy_http(rc: &RuntimeConfig) -> CargoDependency {
    rc.runtime_crate("http")
}

pub fn smithy_json(rc: &RuntimeConfig) -> CargoDependency {
    rc.runtime_crate("json")
}

pub fn smithy_xml(rc: &RuntimeConfig) -> CargoDependency {
    rc.runtime_crate("xml")
}

pub fn smithy_query(rc: &RuntimeConfig) -> CargoDependency {
    rc.runtime_crate("query")
}

pub fn smithy_client(rc: &RuntimeConfig) -> CargoDependency {
    rc.runtime_crate("client")
}

/// AWS shared types; lives next to the support crates but keeps its own name
pub fn aws_types(rc: &RuntimeConfig) -> CargoDependency {
    let path = format!("{}/aws-types", rc.relative_path().trim_end_matches('/'));
    CargoDependency::new("aws-types", super::Location::Local { path })
}

// crates.io

pub fn http() -> CargoDependency {
    CargoDependency::crates_io("http", "0.2")
}

pub fn bytes() -> CargoDependency {
    CargoDependency::crates_io("bytes", "1")
}

pub fn fastrand() -> CargoDependency {
    CargoDependency::crates_io("fastrand", "1")
}

pub fn serde_json() -> CargoDependency {
    CargoDependency::crates_io("serde_json", "1")
}

pub fn tower() -> CargoDependency {
    CargoDependency::crates_io("tower", "0.4")
}

fn in_crate(name: &str, dep: CargoDependency, path: &str) -> Reference {
    let namespace = if path.is_empty() {
        dep.namespace()
    } else {
        format!("{}::{}", dep.namespace(), path)
    };
    Reference::named(name, Some(dep.into()), namespace)
}

// Support library types

pub fn instant(rc: &RuntimeConfig) -> Reference {
    in_crate("Instant", smithy_types(rc), "")
}

pub fn blob(rc: &RuntimeConfig) -> Reference {
    in_crate("Blob", smithy_types(rc), "")
}

pub fn document(rc: &RuntimeConfig) -> Reference {
    in_crate("Document", smithy_types(rc), "")
}

pub fn generic_error(rc: &RuntimeConfig) -> Reference {
    in_crate("Error", smithy_types(rc), "")
}

pub fn retry_kind(rc: &RuntimeConfig) -> Reference {
    in_crate("RetryKind", smithy_types(rc), "retry")
}

/// Variant of the support library's timestamp `Format` enum
pub fn timestamp_format(rc: &RuntimeConfig, format: TimestampFormat) -> Reference {
    in_crate(format.variant_name(), smithy_types(rc), "instant::Format")
}

pub fn base64_encode(rc: &RuntimeConfig) -> Reference {
    in_crate("encode", smithy_types(rc), "base64")
}

pub fn base64_decode(rc: &RuntimeConfig) -> Reference {
    in_crate("decode", smithy_types(rc), "base64")
}

pub fn sdk_body(rc: &RuntimeConfig) -> Reference {
    in_crate("SdkBody", smithy_http(rc), "body")
}

pub fn operation(rc: &RuntimeConfig) -> Reference {
    in_crate("Operation", smithy_http(rc), "operation")
}

pub fn operation_module(rc: &RuntimeConfig) -> Reference {
    let dep = smithy_http(rc);
    Reference::module(format!("{}::operation", dep.namespace()), Some(dep.into()))
}

pub fn parse_strict_response(rc: &RuntimeConfig) -> Reference {
    in_crate("ParseStrictResponse", smithy_http(rc), "response")
}

pub fn build_error(rc: &RuntimeConfig) -> Reference {
    in_crate("BuildError", smithy_http(rc), "operation")
}

pub fn retry_config(rc: &RuntimeConfig) -> Reference {
    in_crate("Config", smithy_client(rc), "retry")
}

pub fn region(rc: &RuntimeConfig) -> Reference {
    in_crate("Region", aws_types(rc), "region")
}

pub fn http_request_builder() -> Reference {
    in_crate("Builder", http(), "request")
}

pub fn http_response() -> Reference {
    in_crate("Response", http(), "")
}

// Standard library: always in scope, nothing to declare

fn std_item(name: &str, namespace: &str) -> Reference {
    Reference::named(name, None, namespace)
}

pub fn std_fmt() -> Reference {
    Reference::module("std::fmt", None)
}

pub fn std_error() -> Reference {
    std_item("Error", "std::error")
}

pub fn std_option() -> Reference {
    std_item("Option", "std::option")
}

pub fn std_string() -> Reference {
    std_item("String", "std::string")
}

pub fn std_vec() -> Reference {
    std_item("Vec", "std::vec")
}

pub fn std_hashmap() -> Reference {
    std_item("HashMap", "std::collections")
}

pub fn std_from() -> Reference {
    std_item("From", "std::convert")
}

pub fn std_default() -> Reference {
    std_item("Default", "std::default")
}

pub fn std_debug() -> Reference {
    std_item("Debug", "std::fmt")
}

pub fn std_arc() -> Reference {
    std_item("Arc", "std::sync")
}

pub fn std_mutex() -> Reference {
    std_item("Mutex", "std::sync")
}

// Inline modules

/// Idempotency token provider emitted as `crate::idempotency_token`
pub fn idempotency_token() -> InlineDependency {
    InlineDependency::new("idempotency_token", "idempotency_token", render_idempotency_token)
        .with_dependency(fastrand())
}

/// Wrapped-error parsing for restXml, emitted as `crate::rest_xml_wrapped_errors`
pub fn rest_xml_wrapped_errors(rc: &RuntimeConfig) -> InlineDependency {
    InlineDependency::new(
        "rest_xml_wrapped_errors",
        "rest_xml_wrapped_errors",
        render_rest_xml_wrapped_errors,
    )
    .with_dependency(smithy_xml(rc))
    .with_dependency(smithy_types(rc))
}

/// Conversion from `serde_json::Value` to the support library `Document`
pub fn doc_json(rc: &RuntimeConfig) -> InlineDependency {
    InlineDependency::new("doc_json", "doc_json", render_doc_json)
        .with_dependency(serde_json())
        .with_dependency(smithy_types(rc))
}

fn render_idempotency_token(writer: &mut CodeWriter) -> Result<(), CodegenError> {
    let rng = Reference::named("Rng", Some(Dependency::Cargo(fastrand())), "fastrand");
    writer.write_named(
        r#"
        /// Source of idempotency tokens for operations that need one
        pub struct IdempotencyTokenProvider {
            inner: Inner,
        }

        enum Inner {
            Static(&'static str),
            Random(#{Arc}<#{Mutex}<#{Rng}>>),
        }

        pub fn default_provider() -> IdempotencyTokenProvider {
            IdempotencyTokenProvider::random()
        }

        impl IdempotencyTokenProvider {
            pub fn random() -> Self {
                Self {
                    inner: Inner::Random(#{Arc}::new(#{Mutex}::new(#{Rng}::new()))),
                }
            }

            pub fn make_idempotency_token(&self) -> #{String} {
                match &self.inner {
                    Inner::Static(token) => token.to_string(),
                    Inner::Random(rng) => uuid_v4(rng.lock().unwrap().u128(..)),
                }
            }
        }

        impl From<&'static str> for IdempotencyTokenProvider {
            fn from(token: &'static str) -> Self {
                Self {
                    inner: Inner::Static(token),
                }
            }
        }

        pub(crate) fn uuid_v4(input: u128) -> #{String} {
            let mut out = #{String}::with_capacity(36);
            let bytes = (input & 0xffff_ffff_ffff_4fff_bfff_ffff_ffff_ffff | 0x4000_8000_0000_0000_0000).to_be_bytes();
            for (i, byte) in bytes.iter().enumerate() {
                if matches!(i, 4 | 6 | 8 | 10) {
                    out.push('-');
                }
                out.push_str(&format!("{:02x}", byte));
            }
            out
        }
        "#,
        &[
            ("Arc", std_arc().into()),
            ("Mutex", std_mutex().into()),
            ("Rng", rng.into()),
            ("String", std_string().into()),
        ],
    )?;
    Ok(())
}

fn render_rest_xml_wrapped_errors(writer: &mut CodeWriter) -> Result<(), CodegenError> {
    let rc = writer.config().clone();
    let xml = smithy_xml(&rc);
    let decode = Reference::module(format!("{}::decode", xml.namespace()), Some(xml.into()));
    writer.write_named(
        r#"
        pub fn body_is_error(body: &[u8]) -> Result<bool, #{decode}::XmlError> {
            let mut doc = #{decode}::Document::try_from(body)?;
            let scoped = doc.root_element()?;
            Ok(scoped.start_el().matches("ErrorResponse"))
        }

        pub fn parse_generic_error(body: &[u8]) -> Result<#{Error}, #{decode}::XmlError> {
            let mut doc = #{decode}::Document::try_from(body)?;
            let mut root = doc.root_element()?;
            let mut err = #{Error}::default();
            while let Some(mut tag) = root.next_tag() {
                match tag.start_el().local() {
                    "Error" => {
                        while let Some(mut field) = tag.next_tag() {
                            match field.start_el().local() {
                                "Code" => err.code = Some(String::from(#{decode}::try_data(&mut field)?)),
                                "Message" => err.message = Some(String::from(#{decode}::try_data(&mut field)?)),
                                _ => {}
                            }
                        }
                    }
                    "RequestId" => err.request_id = Some(String::from(#{decode}::try_data(&mut tag)?)),
                    _ => {}
                }
            }
            Ok(err)
        }
        "#,
        &[("decode", decode.into()), ("Error", generic_error(&rc).into())],
    )?;
    Ok(())
}

fn render_doc_json(writer: &mut CodeWriter) -> Result<(), CodegenError> {
    let rc = writer.config().clone();
    let value = Reference::named("Value", Some(serde_json().into()), "serde_json");
    writer.write_named(
        r#"
        pub fn json_to_doc(json: #{Value}) -> #{Document} {
            match json {
                #{Value}::Null => #{Document}::Null,
                #{Value}::Bool(b) => #{Document}::Bool(b),
                #{Value}::Number(n) => #{Document}::Number(n.as_f64().unwrap_or_default().into()),
                #{Value}::String(s) => #{Document}::String(s),
                #{Value}::Array(items) => #{Document}::Array(items.into_iter().map(json_to_doc).collect()),
                #{Value}::Object(map) => #{Document}::Object(map.into_iter().map(|(k, v)| (k, json_to_doc(v))).collect()),
            }
        }
        "#,
        &[("Value", value.into()), ("Document", document(&rc).into())],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_default_prefix() {
        let rc = RuntimeConfig::default();
        let blob = blob(&rc);
        assert_eq!(blob.namespace(), "smithy_types");
        assert_eq!(blob.name(), Some("Blob"));
        assert_eq!(blob.fully_qualified_name(), "::smithy_types::Blob");
    }

    #[test]
    fn test_blob_retargets_with_prefix() {
        let rc = RuntimeConfig::default().with_crate_prefix("acme");
        assert_eq!(blob(&rc).fully_qualified_name(), "::acme_types::Blob");
        match blob(&rc).dependency() {
            Some(Dependency::Cargo(dep)) => assert_eq!(dep.name(), "acme-types"),
            other => panic!("unexpected dependency: {:?}", other),
        }
    }

    #[test]
    fn test_timestamp_format_variants() {
        let rc = RuntimeConfig::default();
        assert_eq!(
            timestamp_format(&rc, TimestampFormat::EpochSeconds).fully_qualified_name(),
            "::smithy_types::instant::Format::EpochSeconds"
        );
        assert_eq!(
            timestamp_format(&rc, TimestampFormat::HttpDate).fully_qualified_name(),
            "::smithy_types::instant::Format::HttpDate"
        );
    }

    #[test]
    fn test_base64_functions() {
        let rc = RuntimeConfig::default();
        assert_eq!(base64_encode(&rc).fully_qualified_name(), "::smithy_types::base64::encode");
        assert_eq!(base64_decode(&rc).fully_qualified_name(), "::smithy_types::base64::decode");
    }

    #[test]
    fn test_std_references_have_no_dependency() {
        for r in [std_fmt(), std_error(), std_hashmap(), std_string(), std_arc()] {
            assert!(r.dependency().is_none(), "{} should not declare a dependency", r);
            assert!(r.fully_qualified_name().starts_with("::std::"));
        }
    }

    #[test]
    fn test_factories_are_pure() {
        let rc = RuntimeConfig::default();
        assert_eq!(instant(&rc), instant(&rc));
        assert_eq!(operation_module(&rc).fully_qualified_name(), "::smithy_http::operation");
    }

    #[test]
    fn test_inline_dependencies_declare_extras() {
        let rc = RuntimeConfig::default();
        let wrapped = rest_xml_wrapped_errors(&rc);
        assert_eq!(wrapped.extra_dependencies().len(), 2);
        assert_eq!(
            wrapped.member("parse_generic_error").fully_qualified_name(),
            "crate::rest_xml_wrapped_errors::parse_generic_error"
        );
    }
}
