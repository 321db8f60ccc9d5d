//! Tree-walking evaluator
//!
//! Every call goes through the [`TargetContext`]: unqualified names to
//! [`TargetContext::invoke`], `ant.name(...)` straight to the task builder.
//! A closure evaluates to a [`Body`] sharing the closure's statements.

use std::rc::Rc;

use super::ast::{Block, Call, Expr, Segment, Statement, StatementKind};
use crate::core::models::{Attributes, Body, Value};
use crate::core::services::TargetContext;
use crate::error::GantError;

/// Run statements in order, returning the value of the last one
pub fn run_block(ctx: &mut TargetContext<'_>, block: &[Statement]) -> Result<Value, GantError> {
    let mut last = Value::Nil;
    for statement in block {
        last = execute(ctx, statement)?;
    }
    Ok(last)
}

/// Run one statement
pub fn execute(ctx: &mut TargetContext<'_>, statement: &Statement) -> Result<Value, GantError> {
    match &statement.kind {
        StatementKind::Assign { name, value } => {
            let value = evaluate(ctx, value)?;
            ctx.set_variable(name.clone(), value.clone());
            Ok(value)
        },
        StatementKind::Expr(expr) => evaluate(ctx, expr),
    }
}

fn evaluate(ctx: &mut TargetContext<'_>, expr: &Expr) -> Result<Value, GantError> {
    match expr {
        Expr::Null => Ok(Value::Nil),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Int(i) => Ok(Value::Int(*i)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Template(segments) => interpolate(ctx, segments).map(Value::Str),
        Expr::List(items) => {
            let values = items.iter().map(|item| evaluate(ctx, item)).collect::<Result<_, _>>()?;
            Ok(Value::List(values))
        },
        Expr::Map(entries) => evaluate_map(ctx, entries).map(Value::Map),
        Expr::Closure(block) => Ok(Value::Body(closure(block))),
        Expr::Variable(name) => ctx.variable(name),
        Expr::Property { receiver, name } => property(ctx, receiver, name),
        Expr::Call(call) => invoke(ctx, call),
    }
}

fn evaluate_map(
    ctx: &mut TargetContext<'_>,
    entries: &[(String, Expr)],
) -> Result<Attributes, GantError> {
    let mut map = Attributes::new();
    for (key, value) in entries {
        let value = evaluate(ctx, value)?;
        map.insert(key.clone(), value);
    }
    Ok(map)
}

fn interpolate(ctx: &TargetContext<'_>, segments: &[Segment]) -> Result<String, GantError> {
    let mut text = String::new();
    for segment in segments {
        match segment {
            Segment::Text(literal) => text.push_str(literal),
            Segment::Variable(name) => text.push_str(&ctx.variable(name)?.to_string()),
        }
    }
    Ok(text)
}

fn property(ctx: &mut TargetContext<'_>, receiver: &Expr, name: &str) -> Result<Value, GantError> {
    match evaluate(ctx, receiver)? {
        Value::Builder(builder) => builder
            .property(name)
            .map(Value::Str)
            .ok_or_else(|| GantError::MissingVariable(name.to_string())),
        Value::Map(map) => Ok(map.get(name).cloned().unwrap_or_default()),
        _ => Err(GantError::MissingVariable(name.to_string())),
    }
}

fn closure(block: &Block) -> Body {
    let block = Rc::clone(block);
    Body::new(move |ctx| run_block(ctx, &block))
}

/// Arguments in call order: the named-argument map, positionals, then the closure
fn arguments(ctx: &mut TargetContext<'_>, call: &Call) -> Result<Vec<Value>, GantError> {
    let mut args = Vec::with_capacity(call.positional.len() + 2);
    if !call.named.is_empty() {
        args.push(Value::Map(evaluate_map(ctx, &call.named)?));
    }
    for expr in &call.positional {
        args.push(evaluate(ctx, expr)?);
    }
    if let Some(block) = &call.closure {
        args.push(Value::Body(closure(block)));
    }
    Ok(args)
}

fn invoke(ctx: &mut TargetContext<'_>, call: &Call) -> Result<Value, GantError> {
    let Some(receiver) = &call.receiver else {
        let args = arguments(ctx, call)?;
        return ctx.invoke(&call.name, args);
    };

    match evaluate(ctx, receiver)? {
        Value::Builder(builder) => {
            let args = arguments(ctx, call)?;
            builder.invoke(ctx, &call.name, args)
        },
        other => {
            log::debug!("{} has no method {}", other.kind(), call.name);
            Err(GantError::MissingMethod(call.name.clone()))
        },
    }
}
