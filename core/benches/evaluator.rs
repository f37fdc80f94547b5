//! Criterion benchmarks: parse+compile, cached compile, and apply.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reckon_core::{Registry, Value};
use serde_json::json;

const INVOICE: &str = "price * quantity * (1 + tax_rate)";
const SPREAD: &str = "sum(orders[*].(qty * price))";

fn invoice_scope() -> Value {
    Value::from(json!({"price": 25.0, "quantity": 4, "tax_rate": 0.08}))
}

fn orders_scope() -> Value {
    Value::from(json!({"orders": [
        {"qty": 2, "price": 10},
        {"qty": 1, "price": 25},
        {"qty": 10, "price": 5}
    ]}))
}

fn bench_compile_uncached(c: &mut Criterion) {
    let registry = Registry::builder().cache_enabled(false).build();
    c.bench_function("compile/uncached", |b| {
        b.iter(|| registry.compile(black_box(INVOICE)).unwrap())
    });
}

fn bench_compile_cached(c: &mut Criterion) {
    let registry = Registry::builder().build();
    registry.compile(INVOICE).unwrap();
    c.bench_function("compile/cached", |b| {
        b.iter(|| registry.compile(black_box(INVOICE)).unwrap())
    });
}

fn bench_apply(c: &mut Criterion) {
    let registry = Registry::builder().build();
    let arithmetic = registry.compile(INVOICE).unwrap();
    let scope = invoice_scope();
    c.bench_function("apply/arithmetic", |b| {
        b.iter(|| arithmetic.apply(black_box(&scope)).unwrap())
    });

    let spread = registry.compile(SPREAD).unwrap();
    let orders = orders_scope();
    c.bench_function("apply/computed_spread", |b| {
        b.iter(|| spread.apply(black_box(&orders)).unwrap())
    });
}

fn bench_eval_end_to_end(c: &mut Criterion) {
    let registry = Registry::builder().build();
    let scope = invoice_scope();
    c.bench_function("eval/cached_end_to_end", |b| {
        b.iter(|| registry.eval(black_box(INVOICE), &scope).unwrap())
    });
}

criterion_group!(
    benches,
    bench_compile_uncached,
    bench_compile_cached,
    bench_apply,
    bench_eval_end_to_end
);
criterion_main!(benches);
