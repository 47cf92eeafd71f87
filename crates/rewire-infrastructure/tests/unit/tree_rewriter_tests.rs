//! Directory rewriting tests

use std::fs;
use std::path::Path;

use rewire_domain::module::{self, Instruction, Module, ModuleBuilder};
use rewire_infrastructure::{FileOutcome, RewriteReport, RewriterConfig, TreeRewriter};
use tempfile::TempDir;

fn injected_module(name: &str) -> Module {
    let mut builder = ModuleBuilder::new(name);
    let clock = builder.inject_field("clock", "clock").unwrap();
    builder
        .method("now", 0, 0, |m| {
            m.load_local_self().get_field(clock).ret();
        })
        .unwrap();
    builder.build().unwrap()
}

fn plain_module(name: &str) -> Module {
    let mut builder = ModuleBuilder::new(name);
    let value = builder.field("value").unwrap();
    builder
        .method("value", 0, 0, |m| {
            m.load_local_self().get_field(value).ret();
        })
        .unwrap();
    builder.build().unwrap()
}

fn write_module(path: &Path, module: &Module) -> Vec<u8> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let bytes = module::encode(module).unwrap();
    fs::write(path, &bytes).unwrap();
    bytes
}

fn is_rewritten(path: &Path) -> bool {
    let module = module::decode(&fs::read(path).unwrap()).unwrap();
    module.methods[0]
        .code
        .iter()
        .any(|insn| matches!(insn, Instruction::InvokeDynamic { .. }))
}

fn outcome_of<'a>(report: &'a RewriteReport, path: &Path) -> &'a FileOutcome {
    &report
        .files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("no outcome for {}", path.display()))
        .outcome
}

#[test]
fn test_rewrites_nested_modules() {
    let dir = TempDir::new().unwrap();
    let top = dir.path().join("Clock.rwm");
    let nested = dir.path().join("app/service/Scheduler.rwm");
    write_module(&top, &injected_module("Clock"));
    write_module(&nested, &injected_module("Scheduler"));

    let report = TreeRewriter::default().rewrite_tree(dir.path()).unwrap();

    assert!(report.is_success());
    assert_eq!(report.rewritten_count(), 2);
    assert_eq!(report.rewritten_sites(), 2);
    assert!(is_rewritten(&top));
    assert!(is_rewritten(&nested));
    match outcome_of(&report, &nested) {
        FileOutcome::Rewritten(summary) => assert_eq!(summary.module, "Scheduler"),
        other => panic!("Expected Rewritten, got {other:?}"),
    }
}

#[test]
fn test_unchanged_modules_are_not_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Plain.rwm");
    let original = write_module(&path, &plain_module("Plain"));
    let modified_before = fs::metadata(&path).unwrap().modified().unwrap();

    let report = TreeRewriter::default().rewrite_tree(dir.path()).unwrap();

    assert_eq!(report.unchanged_count(), 1);
    assert_eq!(fs::read(&path).unwrap(), original);
    assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified_before);
}

#[test]
fn test_other_files_are_ignored() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "not a module").unwrap();
    fs::write(dir.path().join("Clock.rwm.bak"), "stale").unwrap();
    fs::create_dir_all(dir.path().join("folder.rwm")).unwrap();

    let report = TreeRewriter::default().rewrite_tree(dir.path()).unwrap();
    assert!(report.files.is_empty());
    assert!(report.is_success());
}

#[test]
fn test_corrupt_module_is_reported_and_left_untouched() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("a_Broken.rwm");
    let good = dir.path().join("b_Clock.rwm");
    fs::write(&broken, b"RWM\0garbage").unwrap();
    write_module(&good, &injected_module("Clock"));

    let report = TreeRewriter::default().rewrite_tree(dir.path()).unwrap();

    assert!(!report.is_success());
    assert!(!report.aborted);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.rewritten_count(), 1);
    assert_eq!(fs::read(&broken).unwrap(), b"RWM\0garbage");
    assert!(is_rewritten(&good));
    match outcome_of(&report, &broken) {
        FileOutcome::Failed { error } => assert!(error.contains("a_Broken.rwm"), "{error}"),
        other => panic!("Expected Failed, got {other:?}"),
    }
    assert!(report.to_string().contains("1 failed"));
}

#[test]
fn test_fail_fast_stops_at_first_failure() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("a_Broken.rwm");
    let good = dir.path().join("b_Clock.rwm");
    fs::write(&broken, b"junk").unwrap();
    let original = write_module(&good, &injected_module("Clock"));

    let config = RewriterConfig {
        fail_fast: true,
        ..RewriterConfig::default()
    };
    let report = TreeRewriter::new(&config).rewrite_tree(dir.path()).unwrap();

    assert!(report.aborted);
    assert_eq!(report.files.len(), 1);
    assert_eq!(fs::read(&good).unwrap(), original);
}

#[test]
fn test_custom_extension_and_marker() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Wired.mod");
    let mut builder = ModuleBuilder::new("Wired");
    let f = builder.field_with_markers("db", &[("wire", "database")]).unwrap();
    builder
        .method("db", 0, 0, |m| {
            m.load_local_self().get_field(f).ret();
        })
        .unwrap();
    write_module(&path, &builder.build().unwrap());

    let config = RewriterConfig {
        extension: "mod".to_string(),
        inject_marker: "wire".to_string(),
        ..RewriterConfig::default()
    };
    let report = TreeRewriter::new(&config).rewrite_tree(dir.path()).unwrap();

    assert_eq!(report.rewritten_count(), 1);
    assert!(is_rewritten(&path));
}

#[test]
fn test_second_pass_leaves_files_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Clock.rwm");
    write_module(&path, &injected_module("Clock"));
    let rewriter = TreeRewriter::default();

    rewriter.rewrite_tree(dir.path()).unwrap();
    let once = fs::read(&path).unwrap();
    let report = rewriter.rewrite_tree(dir.path()).unwrap();

    assert_eq!(report.unchanged_count(), 1);
    assert_eq!(fs::read(&path).unwrap(), once);
}

#[test]
fn test_no_temporary_files_left_behind() {
    let dir = TempDir::new().unwrap();
    write_module(&dir.path().join("Clock.rwm"), &injected_module("Clock"));

    TreeRewriter::default().rewrite_tree(dir.path()).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("Clock.rwm")]);
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = TreeRewriter::default()
        .rewrite_tree(&dir.path().join("absent"))
        .unwrap_err();
    assert!(err.to_string().contains("not a directory"), "{err}");
}

#[test]
fn test_report_serializes() {
    let dir = TempDir::new().unwrap();
    write_module(&dir.path().join("Clock.rwm"), &injected_module("Clock"));

    let report = TreeRewriter::default().rewrite_tree(dir.path()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["files"][0]["outcome"]["status"], "rewritten");
    assert_eq!(json["files"][0]["outcome"]["rewritten_sites"], 1);
    assert_eq!(json["aborted"], false);
}
