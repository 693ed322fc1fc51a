//! Tests for task configuration resolution

use std::sync::Arc;

use serde_json::json;
use taskhook::core::models::{SchemaError, Task, TaskDeclaration};
use taskhook::core::services::{ResolveError, TaskConfigResolver, configure};

use crate::common::{MockTask, declarations, mock_registry, options};

fn resolver(entries: &[(&str, serde_json::Value)]) -> TaskConfigResolver {
    TaskConfigResolver::new(Arc::new(mock_registry()), declarations(entries))
}

#[test]
fn test_lists_names_in_declaration_order() {
    let resolver = resolver(&[("zeta", json!({})), ("alpha", json!({})), ("mid", json!({}))]);
    assert_eq!(resolver.list_available_task_names(), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_resolve_splits_metadata_from_options() {
    let resolver = resolver(&[("task1", json!({"foo": "hello", "metadata": {"priority": 1000}}))]);

    let config = resolver.resolve("task1").unwrap();
    assert_eq!(config.name(), "task1");
    assert_eq!(config.options(), &options(json!({"foo": "hello"})));
    assert_eq!(config.metadata().priority(), 1000);
    assert!(config.metadata().blocking());
}

#[test]
fn test_schema_defaults_fill_missing_options() {
    let resolver = resolver(&[("task1", json!({}))]);

    let schema = resolver.fetch_by_name("task1").unwrap();
    assert_eq!(schema.resolve(&options(json!({}))).unwrap(), options(json!({"foo": "bar"})));

    let config = resolver.resolve("task1").unwrap();
    assert_eq!(config.option("foo"), Some(&json!("bar")));
    assert_eq!(config.metadata().priority(), 0);
}

#[test]
fn test_unknown_name_fails() {
    let resolver = resolver(&[("task1", json!({}))]);
    assert_eq!(resolver.fetch_by_name("task2").unwrap_err(), ResolveError::UnknownTask("task2".to_string()));
    assert_eq!(resolver.resolve("task2").unwrap_err(), ResolveError::UnknownTask("task2".to_string()));
}

#[test]
fn test_unregistered_implementation_fails() {
    let mut table = declarations(&[]);
    table.insert("task1".to_string(), TaskDeclaration::new("NotATask", options(json!({}))));
    table.insert("task2".to_string(), TaskDeclaration::new("", options(json!({}))));
    let resolver = TaskConfigResolver::new(Arc::new(mock_registry()), table);

    assert_eq!(resolver.resolve("task1").unwrap_err(), ResolveError::UnknownClass("NotATask".to_string()));
    assert!(matches!(resolver.resolve("task2"), Err(ResolveError::UnknownClass(_))));
}

#[test]
fn test_resolution_is_idempotent() {
    let resolver = resolver(&[("task1", json!({"foo": "x", "metadata": {"label": "Task one"}}))]);
    assert_eq!(resolver.resolve("task1").unwrap(), resolver.resolve("task1").unwrap());
}

#[test]
fn test_undeclared_option_names_the_task() {
    let resolver = resolver(&[("task1", json!({"bar": 1}))]);
    let err = resolver.resolve("task1").unwrap_err();
    assert_eq!(err.task(), Some("task1"));
    assert!(matches!(
        err,
        ResolveError::InvalidOptions {
            source: SchemaError::UndefinedOption { .. },
            ..
        }
    ));
}

#[test]
fn test_invalid_metadata_is_reported() {
    let resolver = resolver(&[
        ("typed", json!({"metadata": {"priority": "high"}})),
        ("scalar", json!({"metadata": 3})),
    ]);
    assert!(matches!(resolver.resolve("typed"), Err(ResolveError::InvalidMetadata { .. })));
    assert!(matches!(
        resolver.resolve("scalar"),
        Err(ResolveError::InvalidMetadata {
            source: SchemaError::InvalidType { .. },
            ..
        })
    ));
}

#[test]
fn test_resolve_all_fails_as_a_whole() {
    let resolver = resolver(&[("good", json!({})), ("bad", json!({"nope": true}))]);
    assert!(resolver.resolve_all().is_err());

    let resolver = self::resolver(&[("a", json!({})), ("b", json!({}))]);
    let names: Vec<_> = resolver.resolve_all().unwrap().iter().map(|c| c.name().to_string()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_configure_leaves_prototype_untouched() {
    let resolver = resolver(&[("task1", json!({"foo": "hello"}))]);
    let prototype = MockTask::new();

    let configured = configure(&prototype, &resolver, "task1").unwrap();
    assert_eq!(configured.config().name(), "task1");
    assert_eq!(configured.config().option("foo"), Some(&json!("hello")));
    assert_eq!(prototype.config().name(), "mock");
    assert!(prototype.config().options().is_empty());
}
