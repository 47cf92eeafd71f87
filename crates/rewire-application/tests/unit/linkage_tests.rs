//! Call-site linkage tests

use std::sync::{Arc, Barrier};
use std::thread;

use rewire_application::{CallSite, InjectionRegistry, LinkageResolver};
use rewire_domain::ports::Configuration;
use rewire_domain::{Error, Value};

use crate::common::{ConstantConfig, SingletonConfig, registry_with};

#[test]
fn test_missing_provider_is_linkage_error() {
    let resolver = LinkageResolver::new(Arc::new(InjectionRegistry::new()));
    let site = CallSite::new("clock", "now");

    let err = site.invoke(&Value::Null, &resolver).unwrap_err();
    match &err {
        Error::Linkage { symbol, slot } => {
            assert_eq!(symbol, "clock");
            assert_eq!(slot, "now");
        }
        other => panic!("Expected Linkage error, got {other:?}"),
    }
    assert!(err.to_string().contains("'clock'"));
    assert!(!site.is_linked());
}

#[test]
fn test_failed_link_retries_once_provider_appears() {
    let registry = Arc::new(InjectionRegistry::new());
    let resolver = LinkageResolver::new(registry.clone());
    let site = CallSite::new("greeting", "greeting");

    assert!(site.link(&resolver).is_err());

    registry
        .register(&[Arc::new(ConstantConfig {
            provides: "greeting",
            value: "hello",
        }) as Arc<dyn Configuration>])
        .unwrap();
    assert_eq!(site.invoke(&Value::Null, &resolver).unwrap(), Value::from("hello"));
    assert!(site.is_linked());
}

#[test]
fn test_linked_site_ignores_later_replacement() {
    let config = SingletonConfig::shared();
    let registry = registry_with(vec![config.clone()]);
    let resolver = LinkageResolver::new(registry.clone());
    let site = CallSite::new("singleton", "singleton");

    assert_eq!(
        site.invoke(&Value::Null, &resolver).unwrap(),
        Value::from("singleton! 1")
    );

    registry.register(&[config.clone() as Arc<dyn Configuration>]).unwrap();
    assert_eq!(
        site.invoke(&Value::Null, &resolver).unwrap(),
        Value::from("singleton! 1")
    );

    // A site linked after the replacement sees the new provider
    let fresh = CallSite::new("singleton", "singleton");
    assert_eq!(
        fresh.invoke(&Value::Null, &resolver).unwrap(),
        Value::from("singleton! 2")
    );
}

#[test]
fn test_concurrent_first_execution_links_once() {
    let config = SingletonConfig::shared();
    let resolver = LinkageResolver::new(registry_with(vec![config.clone()]));
    let site = Arc::new(CallSite::new("singleton", "singleton"));
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let site = site.clone();
            let resolver = resolver.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                site.invoke(&Value::Null, &resolver).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Value::from("singleton! 1"));
    }
    assert_eq!(config.calls(), 1);
}

#[test]
fn test_call_site_debug_shows_link_state() {
    let site = CallSite::new("clock", "now");
    let rendered = format!("{site:?}");
    assert!(rendered.contains("linked: false"), "{rendered}");
}
