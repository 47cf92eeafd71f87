//! End-to-end injection: rewrite, load, link, replace

use std::sync::Arc;

use rewire_application::{Interpreter, LinkageResolver, ModuleLoader, ModuleRewriter};
use rewire_domain::module;
use rewire_domain::ports::Configuration;
use rewire_domain::Value;

use crate::common::{SingletonConfig, consumer_module, registry_with};

#[test]
fn test_singleton_replacement_scenario() {
    let config = SingletonConfig::shared();
    let registry = registry_with(vec![config.clone()]);

    assert_eq!(registry.get("singleton").unwrap(), Value::from("singleton! 1"));
    assert_eq!(registry.get("singleton").unwrap(), Value::from("singleton! 1"));

    registry.register(&[config.clone() as Arc<dyn Configuration>]).unwrap();

    assert_eq!(registry.get("singleton").unwrap(), Value::from("singleton! 2"));
    assert_eq!(registry.get("singleton").unwrap(), Value::from("singleton! 2"));
    assert_eq!(config.calls(), 2);
}

#[test]
fn test_rewritten_module_reads_from_provider() {
    let config = SingletonConfig::shared();
    let registry = registry_with(vec![config.clone()]);
    let vm = Interpreter::new(LinkageResolver::new(registry.clone()));

    let bytes = module::encode(&consumer_module()).unwrap();
    let (rewritten, summary) = ModuleRewriter::new().rewrite_bytes(&bytes).unwrap();
    assert!(summary.is_modified());
    let loaded = ModuleLoader::new().load_bytes(&rewritten).unwrap();
    let receiver = loaded.new_object();

    // Each execution of the same site returns the memoized value
    assert_eq!(
        vm.invoke(&loaded, "first", receiver.clone(), &[]).unwrap(),
        Value::from("singleton! 1")
    );
    assert_eq!(
        vm.invoke(&loaded, "first", receiver.clone(), &[]).unwrap(),
        Value::from("singleton! 1")
    );

    // Replace the provider: `first` is already linked to the old one
    registry.register(&[config.clone() as Arc<dyn Configuration>]).unwrap();
    assert_eq!(
        vm.invoke(&loaded, "first", receiver.clone(), &[]).unwrap(),
        Value::from("singleton! 1")
    );

    // `third` links now and picks up the replacement
    assert_eq!(
        vm.invoke(&loaded, "third", receiver.clone(), &[]).unwrap(),
        Value::from("singleton! 2")
    );
    assert_eq!(
        vm.invoke(&loaded, "third", receiver.clone(), &[]).unwrap(),
        Value::from("singleton! 2")
    );
    assert_eq!(registry.get("singleton").unwrap(), Value::from("singleton! 2"));
    assert_eq!(config.calls(), 2);
    assert_eq!(loaded.linked_call_sites(), 2);
}

#[test]
fn test_injected_and_plain_fields_coexist() {
    let registry = registry_with(vec![SingletonConfig::shared()]);
    let vm = Interpreter::new(LinkageResolver::new(registry));

    let mut consumer = consumer_module();
    ModuleRewriter::new().rewrite(&mut consumer).unwrap();
    let loaded = ModuleLoader::new().load(consumer).unwrap();

    let instance = loaded.instantiate();
    instance.set_field(1, Value::from("local")).unwrap();
    let receiver = Value::Object(instance);

    assert_eq!(
        vm.invoke(&loaded, "both", receiver.clone(), &[]).unwrap(),
        Value::from("singleton! 1:local")
    );
    assert_eq!(
        vm.invoke(&loaded, "plain", receiver, &[]).unwrap(),
        Value::from("local")
    );
}
