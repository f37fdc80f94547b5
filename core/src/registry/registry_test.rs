//! Unit tests for registry construction and resolution.

use super::*;
use serde_json::json;

fn shout(args: &[Value]) -> Result<Value, RuntimeError> {
    let mut s = args[0].to_string().to_uppercase();
    s.push('!');
    Ok(Value::string(s))
}

fn fake_abs(_args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Int(42))
}

#[test]
fn test_default_registry_has_builtins() {
    let registry = default_registry();
    assert_eq!(registry.id(), DEFAULT_REGISTRY_ID);
    assert!(registry.resolve("abs").is_some());
    assert!(registry.resolve("concat").is_some());
    assert!(registry.resolve("frobnicate").is_none());
}

#[test]
fn test_custom_registry_extends_defaults() {
    let registry = Registry::builder()
        .plugin(NativeFunction::new("shout", Arity::Fixed(1), shout))
        .build();
    // Builtins survive alongside the plugin.
    assert!(registry.resolve("abs").is_some());
    let result = registry.eval("shout('hey')", &Value::from(json!({}))).unwrap();
    assert_eq!(result, Value::string("HEY!"));
}

#[test]
fn test_plugin_overrides_builtin_by_name() {
    let registry = Registry::builder()
        .plugin(NativeFunction::new("abs", Arity::Fixed(1), fake_abs))
        .build();
    let result = registry.eval("abs(-5)", &Value::from(json!({}))).unwrap();
    assert_eq!(result, Value::Int(42));
    // The default registry is untouched.
    let stock = default_registry()
        .eval("abs(-5)", &Value::from(json!({})))
        .unwrap();
    assert_eq!(stock, Value::Int(5));
}

#[test]
fn test_last_plugin_wins() {
    fn first(_args: &[Value]) -> Result<Value, RuntimeError> {
        Ok(Value::Int(1))
    }
    fn second(_args: &[Value]) -> Result<Value, RuntimeError> {
        Ok(Value::Int(2))
    }
    let registry = Registry::builder()
        .plugin(NativeFunction::new("pick", Arity::Fixed(0), first))
        .plugin(NativeFunction::new("pick", Arity::Fixed(0), second))
        .build();
    let result = registry.eval("pick()", &Value::from(json!({}))).unwrap();
    assert_eq!(result, Value::Int(2));
}

#[test]
fn test_custom_registries_get_unique_nonzero_ids() {
    let a = Registry::builder().build();
    let b = Registry::builder().build();
    assert_ne!(a.id(), b.id());
    assert_ne!(a.id(), DEFAULT_REGISTRY_ID);
    assert_ne!(b.id(), DEFAULT_REGISTRY_ID);
}

#[test]
fn test_cache_limit_is_at_least_one() {
    let registry = Registry::builder().cache_limit(0).build();
    assert_eq!(registry.cache_limit(), 1);
}

#[test]
fn test_registry_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Registry>();
}
