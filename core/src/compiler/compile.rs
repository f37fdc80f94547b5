//! Lowering IR into reusable closure trees.
//!
//! Each IR node becomes one boxed closure over the evaluation primitives.
//! All resolution work that can happen ahead of time does: function names
//! are resolved against the registry (unknown names and fixed-arity
//! mismatches fail here, not at apply time), literals are embedded as
//! constants, and short-circuit operators are lowered to dedicated
//! closures. The resulting tree holds no mutable state, so one compiled
//! expression can be applied from many threads at once.

use std::sync::Arc;

use crate::api::Error;
use crate::evaluator::access::{self, ResolvedStep};
use crate::evaluator::{operators, RuntimeError};
use crate::parser::{AccessKey, BinaryOp, Expr, PathStep};
use crate::registry::{Arity, Registry};
use crate::values::Value;

use super::error::CompileError;

type NodeFn = Box<dyn Fn(&Value) -> Result<Value, RuntimeError> + Send + Sync>;

/// A compiled, reusable expression.
///
/// Immutable and cheap to clone; a single instance may be applied
/// concurrently with distinct scopes. No state survives between
/// invocations.
#[derive(Clone)]
pub struct CompiledExpr {
    root: Arc<dyn Fn(&Value) -> Result<Value, RuntimeError> + Send + Sync>,
}

impl std::fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledExpr").finish_non_exhaustive()
    }
}

impl CompiledExpr {
    /// Evaluate against a scope.
    pub fn apply(&self, scope: &Value) -> Result<Value, Error> {
        (self.root)(scope).map_err(Error::from)
    }

    /// Whether two handles share one artifact. Used to observe cache hits.
    pub fn shares_artifact_with(&self, other: &CompiledExpr) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

/// Lower parsed IR against a registry.
pub fn compile(expr: &Expr, registry: &Registry) -> Result<CompiledExpr, CompileError> {
    let root = lower(expr, registry)?;
    Ok(CompiledExpr {
        root: Arc::from(root),
    })
}

fn lower(expr: &Expr, registry: &Registry) -> Result<NodeFn, CompileError> {
    match expr {
        Expr::Literal(value) => {
            let value = value.clone();
            Ok(Box::new(move |_| Ok(value.clone())))
        }

        Expr::GetVar(name) => {
            let name = name.clone();
            Ok(Box::new(move |scope| access::get_var(scope, &name)))
        }

        Expr::Access { target, key } => {
            let target = lower(target, registry)?;
            match key {
                AccessKey::Name(name) => {
                    let name = name.clone();
                    Ok(Box::new(move |scope| {
                        let value = target(scope)?;
                        access::access_name(&value, &name)
                    }))
                }
                AccessKey::Expr(key) => {
                    let key = lower(key, registry)?;
                    Ok(Box::new(move |scope| {
                        let value = target(scope)?;
                        let key = key(scope)?;
                        access::access_value(&value, &key)
                    }))
                }
            }
        }

        Expr::Call { name, args } => {
            let func = registry
                .resolve(name)
                .cloned()
                .ok_or_else(|| CompileError::UnknownFunction { name: name.clone() })?;
            if let Arity::Fixed(expected) = func.arity() {
                if args.len() != expected {
                    return Err(CompileError::ArityMismatch {
                        name: name.clone(),
                        expected,
                        actual: args.len(),
                    });
                }
            }
            let args = args
                .iter()
                .map(|arg| lower(arg, registry))
                .collect::<Result<Vec<_>, _>>()?;
            let name = name.clone();
            Ok(Box::new(move |scope| {
                let mut values = Vec::with_capacity(args.len());
                for arg in &args {
                    values.push(arg(scope)?);
                }
                func.invoke(&values).map_err(|e| e.in_function(&name))
            }))
        }

        Expr::Unary { op, operand } => {
            let op = *op;
            let operand = lower(operand, registry)?;
            Ok(Box::new(move |scope| {
                let value = operand(scope)?;
                operators::unary(op, &value)
            }))
        }

        Expr::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => {
            let left = lower(left, registry)?;
            let right = lower(right, registry)?;
            Ok(Box::new(move |scope| {
                if !left(scope)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(right(scope)?.is_truthy()))
            }))
        }

        Expr::Binary {
            op: BinaryOp::Or,
            left,
            right,
        } => {
            let left = lower(left, registry)?;
            let right = lower(right, registry)?;
            Ok(Box::new(move |scope| {
                if left(scope)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(right(scope)?.is_truthy()))
            }))
        }

        Expr::Binary { op, left, right } => {
            let op = *op;
            let left = lower(left, registry)?;
            let right = lower(right, registry)?;
            Ok(Box::new(move |scope| {
                let left = left(scope)?;
                let right = right(scope)?;
                operators::binary(op, &left, &right)
            }))
        }

        Expr::Factorial(operand) => {
            let operand = lower(operand, registry)?;
            Ok(Box::new(move |scope| {
                let value = operand(scope)?;
                operators::factorial(&value)
            }))
        }

        Expr::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            let cond = lower(cond, registry)?;
            let then_branch = lower(then_branch, registry)?;
            let else_branch = lower(else_branch, registry)?;
            Ok(Box::new(move |scope| {
                if cond(scope)?.is_truthy() {
                    then_branch(scope)
                } else {
                    else_branch(scope)
                }
            }))
        }

        Expr::Spread {
            target,
            tail,
            flatten,
        } => {
            let target = lower(target, registry)?;
            let tail = tail
                .iter()
                .map(|step| match step {
                    PathStep::Key(key) => Ok(TailStep::Key(key.clone())),
                    PathStep::Index(index) => lower(index, registry).map(TailStep::Index),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let flatten = *flatten;
            Ok(Box::new(move |scope| {
                let value = target(scope)?;
                let Some(items) = value.as_list() else {
                    return Err(RuntimeError::SpreadOnNonList {
                        actual: value.kind(),
                    });
                };
                // Tail indices resolve against the enclosing scope, once
                // per application; elements are not in scope here.
                let mut steps = Vec::with_capacity(tail.len());
                for step in &tail {
                    steps.push(match step {
                        TailStep::Key(key) => ResolvedStep::Key(key.clone()),
                        TailStep::Index(index) => ResolvedStep::Index(index(scope)?),
                    });
                }
                let mut out = Vec::with_capacity(items.len());
                for element in items {
                    collect(&mut out, access::walk_path(element, &steps), flatten);
                }
                Ok(Value::List(Arc::new(out)))
            }))
        }

        Expr::ComputedSpread {
            target,
            body,
            flatten,
        } => {
            let target = lower(target, registry)?;
            let body = lower(body, registry)?;
            let flatten = *flatten;
            Ok(Box::new(move |scope| {
                let value = target(scope)?;
                let Some(items) = value.as_list() else {
                    return Err(RuntimeError::SpreadOnNonList {
                        actual: value.kind(),
                    });
                };
                let mut out = Vec::with_capacity(items.len());
                for element in items {
                    // The element shadows the scope for the body.
                    collect(&mut out, body(element)?, flatten);
                }
                Ok(Value::List(Arc::new(out)))
            }))
        }
    }
}

enum TailStep {
    Key(String),
    Index(NodeFn),
}

/// Append one per-element result, splicing list children when flattening.
fn collect(out: &mut Vec<Value>, mapped: Value, flatten: bool) {
    match mapped {
        Value::List(items) if flatten => out.extend(items.iter().cloned()),
        other => out.push(other),
    }
}
