//! 字段注入的集成测试

use std::error::Error;
use std::sync::Arc;
use wirebox::{injectable, ContainerError, ServiceContainer};

trait Mailer: Send + Sync {
    fn send(&self, to: &str) -> String;
}

struct SmtpMailer;

impl Mailer for SmtpMailer {
    fn send(&self, to: &str) -> String {
        format!("smtp -> {to}")
    }
}

struct Cache {
    region: String,
}

#[derive(Default)]
struct Signup {
    mailer: Option<Arc<dyn Mailer>>,
    cache: Option<Arc<Cache>>,
}

injectable!(Signup {
    mailer: "type",
    cache: "type",
});

#[derive(Default)]
struct Reporting {
    primary: Option<Arc<Cache>>,
    fallback: Option<Arc<Cache>>,
    archive: Option<Arc<Cache>>,
}

injectable!(Reporting {
    primary: "name",
    fallback: "eu, us",
    archive: "cold,type",
});

#[test]
fn test_fill_populates_then_fails_on_unregistered_field() {
    let container = ServiceContainer::new();
    container
        .singleton(|| Arc::new(SmtpMailer) as Arc<dyn Mailer>)
        .unwrap();

    let mut signup = Signup::default();
    let err = container.fill(&mut signup).unwrap_err();

    // 第一个字段已经赋值，不会回滚
    let mailer = signup.mailer.as_ref().unwrap();
    assert_eq!(mailer.send("bob"), "smtp -> bob");
    assert!(signup.cache.is_none());

    match &err {
        ContainerError::FieldInjectionFailure {
            field,
            type_name,
            candidates,
            reason,
        } => {
            assert_eq!(*field, "cache");
            assert!(type_name.contains("Cache"));
            assert_eq!(candidates, &vec![String::new()]);
            assert!(matches!(**reason, ContainerError::BindingNotFound { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("container: cannot make cache("));
    assert!(err.source().is_some());
}

#[test]
fn test_field_tags_select_qualifiers() {
    let container = ServiceContainer::new();
    container
        .singleton(|| {
            Arc::new(Cache {
                region: "default".to_string(),
            })
        })
        .unwrap();
    container
        .named_singleton("primary", || {
            Arc::new(Cache {
                region: "primary".to_string(),
            })
        })
        .unwrap();
    container
        .named_transient("us", || {
            Arc::new(Cache {
                region: "us".to_string(),
            })
        })
        .unwrap();

    let mut reporting = Reporting::default();
    container.fill(&mut reporting).unwrap();

    assert_eq!(reporting.primary.unwrap().region, "primary");
    assert_eq!(reporting.fallback.unwrap().region, "us");
    assert_eq!(reporting.archive.unwrap().region, "default");
}

#[test]
fn test_field_qualifier_mismatch_reports_all_candidates() {
    let container = ServiceContainer::new();
    container
        .named_singleton("primary", || {
            Arc::new(Cache {
                region: "primary".to_string(),
            })
        })
        .unwrap();

    let mut reporting = Reporting::default();
    let err = container.fill(&mut reporting).unwrap_err();
    assert!(reporting.primary.is_some());

    match err {
        ContainerError::FieldInjectionFailure {
            field,
            candidates,
            reason,
            ..
        } => {
            assert_eq!(field, "fallback");
            assert_eq!(candidates, vec!["eu".to_string(), "us".to_string()]);
            assert!(matches!(*reason, ContainerError::QualifierNotMatched { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_field_resolver_failure_is_wrapped() {
    let container = ServiceContainer::new();
    container
        .singleton(|| Arc::new(SmtpMailer) as Arc<dyn Mailer>)
        .unwrap();
    container
        .singleton(|| -> Result<Arc<Cache>, String> { Err("cache offline".to_string()) })
        .unwrap();

    let mut signup = Signup::default();
    let err = container.fill(&mut signup).unwrap_err();
    match err {
        ContainerError::FieldInjectionFailure { field, reason, .. } => {
            assert_eq!(field, "cache");
            assert!(matches!(*reason, ContainerError::ResolverFailed { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_fill_through_trait_object() {
    let container = ServiceContainer::new();
    container
        .singleton(|| Arc::new(SmtpMailer) as Arc<dyn Mailer>)
        .unwrap();
    container
        .singleton(|| {
            Arc::new(Cache {
                region: "x".to_string(),
            })
        })
        .unwrap();

    let mut signup = Signup::default();
    let target: &mut dyn wirebox::Injectable = &mut signup;
    container.fill(target).unwrap();
    assert!(signup.cache.is_some());
}
