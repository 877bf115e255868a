//! End-to-end generation of config and operation units

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rustgen::customize::{operation_customizations, service_config_customizations};
use rustgen::model::IDEMPOTENCY_TOKEN_TRAIT;
use rustgen::{
    generate, generate_all, runtime, CargoDependency, CodeWriter, CodegenError, CompilationUnit,
    DependencyKey, InlineDependency, Location, OperationGenerator, OperationSection, RuntimeConfig, Section,
    ServiceConfig, ServiceConfigGenerator, ShapeId, StaticModel,
};

fn config() -> Arc<RuntimeConfig> {
    Arc::new(RuntimeConfig::default())
}

fn model() -> StaticModel {
    StaticModel::new()
        .with_member("com.example#PutItemInput", "item")
        .with_member("com.example#PutItemInput", "clientToken")
        .with_trait("com.example#PutItemInput$clientToken", IDEMPOTENCY_TOKEN_TRAIT, "")
}

fn put_item() -> OperationGenerator {
    let customizations = operation_customizations(&model(), &ShapeId::new("com.example#PutItemInput"));
    OperationGenerator::new("PutItem", "Storage", customizations)
}

fn units() -> Vec<CompilationUnit> {
    vec![
        CompilationUnit::service_config(ServiceConfigGenerator::new(service_config_customizations())),
        CompilationUnit::operation(put_item()),
    ]
}

#[test]
fn test_service_config_with_default_customizations() {
    let unit = CompilationUnit::service_config(ServiceConfigGenerator::new(service_config_customizations()));
    let out = generate(&unit, config()).unwrap();

    insta::assert_snapshot!(out.source, @r###"
/// Service configuration
pub struct Config {
    pub(crate) region: Option<::aws_types::region::Region>,
    pub(crate) make_token: crate::idempotency_token::IdempotencyTokenProvider,
    pub(crate) retry_config: Option<::smithy_client::retry::Config>,
}

impl Config {
    pub fn builder() -> Builder {
        Builder::default()
    }
    pub fn region(&self) -> Option<&::aws_types::region::Region> {
        self.region.as_ref()
    }
    pub fn retry_config(&self) -> Option<&::smithy_client::retry::Config> {
        self.retry_config.as_ref()
    }
}

/// Builder for [`Config`]
#[derive(Default)]
pub struct Builder {
    region: Option<::aws_types::region::Region>,
    make_token: Option<crate::idempotency_token::IdempotencyTokenProvider>,
    retry_config: Option<::smithy_client::retry::Config>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn region(mut self, region: impl Into<Option<::aws_types::region::Region>>) -> Self {
        self.region = region.into();
        self
    }
    pub fn make_token(mut self, make_token: impl Into<crate::idempotency_token::IdempotencyTokenProvider>) -> Self {
        self.make_token = Some(make_token.into());
        self
    }
    pub fn retry_config(mut self, retry_config: ::smithy_client::retry::Config) -> Self {
        self.retry_config = Some(retry_config);
        self
    }
    pub fn build(self) -> Config {
        Config {
            region: self.region,
            make_token: self.make_token.unwrap_or_else(crate::idempotency_token::default_provider),
            retry_config: self.retry_config,
        }
    }
}
"###);

    let keys: Vec<String> = out.manifest.keys().map(|k| k.to_string()).collect();
    assert_eq!(
        keys,
        vec![
            "aws-types",
            "fastrand",
            "smithy-client",
            "idempotency_token::idempotency_token",
        ]
    );
    assert_eq!(out.inline_modules.len(), 1);
}

#[test]
fn test_operation_customizations_in_order() {
    let out = generate(&CompilationUnit::operation(put_item()), config()).unwrap();
    let source = out.source;

    let mutate = source
        .find("if self.client_token.is_none() {")
        .expect("token is filled in");
    let request = source.find("let mut request =").expect("request is built");
    let plugin = source
        .find("if let Some(region) = &_config.region {")
        .expect("region plugin");
    assert!(mutate < request && request < plugin);
    assert!(source.contains("            request.config_mut().insert(region.clone());\n"));
    assert!(source.contains(
        "            self.client_token = Some(_config.make_token.make_idempotency_token());\n"
    ));
}

#[test]
fn test_every_customization_answers_every_section() {
    let config = config();
    for customization in service_config_customizations() {
        for section in ServiceConfig::all() {
            let mut w = CodeWriter::new(config.clone(), "crate::config");
            customization
                .section(&section)
                .write_to(&mut w)
                .unwrap_or_else(|e| panic!("{} / {}: {}", customization.name(), section.name(), e));
        }
    }
    for customization in operation_customizations(&model(), &ShapeId::new("com.example#PutItemInput")) {
        for section in OperationSection::all() {
            let mut w = CodeWriter::new(config.clone(), "crate::operation");
            customization
                .section(&section)
                .write_to(&mut w)
                .unwrap_or_else(|e| panic!("{} / {}: {}", customization.name(), section.name(), e));
        }
    }
}

#[test]
fn test_generation_is_deterministic() {
    let first = generate_all(&units(), config());
    let second = generate_all(&units(), config());

    let sources = |out: &rustgen::CrateOutput| -> Vec<String> {
        out.generated().map(|u| u.source.clone()).collect()
    };
    assert_eq!(sources(&first), sources(&second));
    assert_eq!(first.manifest, second.manifest);
}

#[test]
fn test_failing_unit_does_not_stop_others() {
    let mut units = units();
    units.insert(
        1,
        CompilationUnit::new("crate::broken", |w| {
            w.write("#T #T", &[runtime::std_vec().into()])?;
            Ok(())
        }),
    );

    let out = generate_all(&units, config());
    let modules: Vec<&str> = out
        .units
        .iter()
        .map(|u| match u {
            Ok(g) => g.module.as_str(),
            Err(f) => f.module.as_str(),
        })
        .collect();
    assert_eq!(modules, vec!["crate::config", "crate::broken", "crate::operation::put_item"]);

    let failures: Vec<_> = out.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0].error, CodegenError::Template { .. }));
    assert_eq!(out.generated().count(), 2);

    for key in ["aws-types", "fastrand", "smithy-client", "smithy-http"] {
        assert!(out.manifest.contains(&DependencyKey::Cargo(key.to_string())), "{}", key);
    }
}

fn leaf() -> InlineDependency {
    InlineDependency::new("leaf", "leaf", |w| {
        w.write("pub fn leaf() {}", &[])?;
        Ok(())
    })
}

fn branch() -> InlineDependency {
    InlineDependency::new("branch", "branch", |w| {
        w.write("pub fn branch() { #T() }", &[leaf().member("leaf").into()])?;
        Ok(())
    })
}

#[test]
fn test_shared_inline_dependency_emitted_once() {
    let unit = CompilationUnit::new("crate::lib_body", |w| {
        w.write("#T();", &[branch().member("branch").into()])?;
        w.write("#T();", &[leaf().member("leaf").into()])?;
        Ok(())
    });
    let out = generate(&unit, config()).unwrap();

    let modules: Vec<&str> = out.inline_modules.iter().map(|m| m.module.as_str()).collect();
    assert_eq!(modules, vec!["leaf", "branch"]);
    assert_eq!(out.inline_modules[1].source, "pub fn branch() { crate::leaf::leaf() }\n");
}

fn ping() -> InlineDependency {
    InlineDependency::new("ping", "ping", |w| {
        w.write("pub fn ping() { #T() }", &[pong().member("pong").into()])?;
        Ok(())
    })
}

fn pong() -> InlineDependency {
    InlineDependency::new("pong", "pong", |w| {
        w.write("pub fn pong() { #T() }", &[ping().member("ping").into()])?;
        Ok(())
    })
}

#[test]
fn test_inline_cycle_fails_the_unit() {
    let units = vec![
        CompilationUnit::new("crate::game", |w| {
            w.write("#T();", &[ping().member("ping").into()])?;
            Ok(())
        }),
        CompilationUnit::new("crate::model", |w| {
            w.write("pub struct Empty;", &[])?;
            Ok(())
        }),
    ];
    let out = generate_all(&units, config());

    match &out.units[0] {
        Err(failure) => match &failure.error {
            CodegenError::CyclicInlineDependency { chain } => {
                assert_eq!(chain, "ping::ping -> pong::pong -> ping::ping");
            }
            other => panic!("unexpected error: {:?}", other),
        },
        Ok(_) => panic!("cycle was not detected"),
    }
    assert!(out.units[1].is_ok());
}

fn crate_user(module: &'static str, own: &'static str, http: CargoDependency) -> CompilationUnit {
    CompilationUnit::new(module, move |w| {
        let own_dep = CargoDependency::crates_io(own, "1");
        w.write("use #T;", &[own_dep.to_reference().into()])?;
        w.write("use #T;", &[http.to_reference().into()])?;
        Ok(())
    })
}

fn local_http() -> CargoDependency {
    CargoDependency::new("http", Location::Local { path: "../http".to_string() })
}

#[test]
fn test_conflicting_unit_fails_in_input_order() {
    let units = vec![
        crate_user("crate::a", "aaa-a", runtime::http()),
        crate_user("crate::b", "aaa-b", local_http()),
    ];

    for _ in 0..8 {
        let out = generate_all(&units, config());

        assert!(out.units[0].is_ok());
        match &out.units[1] {
            Err(failure) => {
                assert_eq!(failure.module, "crate::b");
                assert!(matches!(
                    failure.error,
                    CodegenError::ConflictingDependency { ref name, .. } if name == "http"
                ));
            }
            Ok(_) => panic!("conflict was not reported"),
        }

        let keys: Vec<String> = out.manifest.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["aaa-a", "http"]);
    }
}

#[test]
fn test_earlier_unit_wins_a_conflict() {
    let units = vec![
        crate_user("crate::b", "aaa-b", local_http()),
        crate_user("crate::a", "aaa-a", runtime::http()),
    ];
    let out = generate_all(&units, config());

    let failed: Vec<&str> = out.failures().map(|f| f.module.as_str()).collect();
    assert_eq!(failed, vec!["crate::a"]);
    let keys: Vec<String> = out.manifest.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["aaa-b", "http"]);
}

#[test]
fn test_operation_unit_names_its_own_struct() {
    let out = generate(&CompilationUnit::operation(put_item()), config()).unwrap();
    assert_eq!(out.module, "crate::operation::put_item");
    assert!(out.source.contains("pub struct PutItem {"));
    assert!(out.source.contains("Operation<crate::operation::put_item::PutItem, ()>"));
    assert!(!out.source.contains("crate::operation::PutItem"));
}
