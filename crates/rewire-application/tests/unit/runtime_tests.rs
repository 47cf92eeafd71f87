//! Interpreter and loader tests

use std::sync::Arc;

use rewire_application::runtime::CallSiteId;
use rewire_application::{InjectionRegistry, Interpreter, LinkageResolver, ModuleLoader, ModuleRewriter};
use rewire_domain::module::{self, Module, ModuleBuilder};
use rewire_domain::{Error, Value};

use crate::common::{FailingConfig, consumer_module, registry_with};

fn interpreter() -> Interpreter {
    Interpreter::new(LinkageResolver::new(Arc::new(InjectionRegistry::new())))
}

fn calculator() -> Module {
    let mut builder = ModuleBuilder::new("Calculator");
    let memory = builder.field("memory").unwrap();
    builder
        .method("sum", 2, 0, |m| {
            m.load_local(1).load_local(2).add().ret();
        })
        .unwrap()
        .method("remember", 1, 0, |m| {
            m.load_local_self()
                .load_local(1)
                .put_field(memory)
                .push_null()
                .ret();
        })
        .unwrap()
        .method("recall", 0, 0, |m| {
            m.load_local_self().get_field(memory).ret();
        })
        .unwrap()
        .method("or_default", 1, 0, |m| {
            m.load_local(1)
                .dup()
                .jump_if_null(4)
                .ret()
                .pop()
                .push_str("default")
                .ret();
        })
        .unwrap()
        .method("swap_sum", 2, 1, |m| {
            m.load_local(1)
                .store_local(3)
                .load_local(2)
                .load_local(3)
                .add()
                .ret();
        })
        .unwrap()
        .method("spin", 0, 0, |m| {
            m.nop().jump(0);
        })
        .unwrap()
        .method("underflow", 0, 0, |m| {
            m.add().ret();
        })
        .unwrap()
        .method("no_return", 0, 0, |m| {
            m.push_int(1).pop();
        })
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn test_arithmetic_and_locals() {
    let loaded = ModuleLoader::new().load(calculator()).unwrap();
    let vm = interpreter();
    let receiver = loaded.new_object();

    let args = [Value::Int(2), Value::Int(40)];
    assert_eq!(vm.invoke(&loaded, "sum", receiver.clone(), &args).unwrap(), Value::Int(42));
    assert_eq!(vm.invoke(&loaded, "swap_sum", receiver, &args).unwrap(), Value::Int(42));
}

#[test]
fn test_fields_persist_on_the_instance() {
    let loaded = ModuleLoader::new().load(calculator()).unwrap();
    let vm = interpreter();
    let receiver = loaded.new_object();

    assert_eq!(vm.invoke(&loaded, "recall", receiver.clone(), &[]).unwrap(), Value::Null);
    vm.invoke(&loaded, "remember", receiver.clone(), &[Value::from("kept")])
        .unwrap();
    assert_eq!(vm.invoke(&loaded, "recall", receiver, &[]).unwrap(), Value::from("kept"));
}

#[test]
fn test_conditional_jump() {
    let loaded = ModuleLoader::new().load(calculator()).unwrap();
    let vm = interpreter();

    assert_eq!(
        vm.invoke(&loaded, "or_default", Value::Null, &[Value::Null]).unwrap(),
        Value::from("default")
    );
    assert_eq!(
        vm.invoke(&loaded, "or_default", Value::Null, &[Value::Int(3)]).unwrap(),
        Value::Int(3)
    );
}

#[test]
fn test_runtime_errors() {
    let loaded = ModuleLoader::new().load(calculator()).unwrap();
    let vm = interpreter().with_step_limit(100);
    let receiver = loaded.new_object();

    let cases = [
        ("sum", vec![Value::Int(1)], "expects 2 argument(s)"),
        ("sum", vec![Value::Int(1), Value::from("x")], "cannot add int and str"),
        ("sum", vec![Value::Int(i64::MAX), Value::Int(1)], "integer overflow"),
        ("spin", vec![], "step limit 100 exceeded"),
        ("underflow", vec![], "stack underflow"),
        ("no_return", vec![], "fell off the end"),
        ("missing", vec![], "no method 'missing'"),
    ];
    for (method, args, expected) in cases {
        let err = vm.invoke(&loaded, method, receiver.clone(), &args).unwrap_err();
        assert!(matches!(err, Error::Runtime { .. }), "{method}: {err:?}");
        assert!(err.to_string().contains(expected), "{method}: {err}");
    }
}

#[test]
fn test_field_access_checks_receiver() {
    let loaded = ModuleLoader::new().load(calculator()).unwrap();
    let other = ModuleLoader::new().load(consumer_module()).unwrap();
    let vm = interpreter();

    let err = vm.invoke(&loaded, "recall", Value::Int(1), &[]).unwrap_err();
    assert!(err.to_string().contains("int receiver"), "{err}");

    let err = vm
        .invoke(&loaded, "recall", other.new_object(), &[])
        .unwrap_err();
    assert!(err.to_string().contains("'Consumer' instance"), "{err}");
}

#[test]
fn test_unrewritten_injection_point_reads_plain_field() {
    let registry = registry_with(vec![crate::common::SingletonConfig::shared()]);
    let vm = Interpreter::new(LinkageResolver::new(registry));
    let loaded = ModuleLoader::new().load(consumer_module()).unwrap();

    assert!(loaded.call_sites().is_empty());
    assert_eq!(
        vm.invoke(&loaded, "first", loaded.new_object(), &[]).unwrap(),
        Value::Null
    );
}

#[test]
fn test_loader_creates_one_site_per_rewritten_read() {
    let bytes = module::encode(&consumer_module()).unwrap();
    let (rewritten, _) = ModuleRewriter::new().rewrite_bytes(&bytes).unwrap();
    let loaded = ModuleLoader::new().load_bytes(&rewritten).unwrap();

    let sites = loaded.call_sites();
    assert_eq!(sites.len(), 4);
    let first = loaded.method("first").unwrap().0;
    let site = loaded.call_site(CallSiteId { method: first, pc: 1 }).unwrap();
    assert_eq!(site.symbol(), "singleton");
    assert_eq!(site.slot(), "singleton");
    assert_eq!(loaded.linked_call_sites(), 0);
}

#[test]
fn test_provider_failure_propagates_through_call_site() {
    let mut builder = ModuleBuilder::new("Fragile");
    let backend = builder.inject_field("backend", "broken").unwrap();
    builder
        .method("read", 0, 0, |m| {
            m.load_local_self().get_field(backend).ret();
        })
        .unwrap();
    let mut module = builder.build().unwrap();
    ModuleRewriter::new().rewrite(&mut module).unwrap();

    let vm = Interpreter::new(LinkageResolver::new(registry_with(vec![Arc::new(FailingConfig)])));
    let loaded = ModuleLoader::new().load(module).unwrap();

    let err = vm.invoke(&loaded, "read", loaded.new_object(), &[]).unwrap_err();
    assert!(matches!(err, Error::Provider { .. }), "{err:?}");
    // Linkage itself succeeded; only the value computation failed
    assert_eq!(loaded.linked_call_sites(), 1);
}

#[test]
fn test_unlinked_site_reports_linkage_error() {
    let mut module = consumer_module();
    ModuleRewriter::new().rewrite(&mut module).unwrap();
    let loaded = ModuleLoader::new().load(module).unwrap();

    let err = interpreter()
        .invoke(&loaded, "first", loaded.new_object(), &[])
        .unwrap_err();
    assert!(err.is_linkage(), "{err:?}");
    assert_eq!(loaded.linked_call_sites(), 0);
}
