//=====================================================
// File: builtins/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Name-keyed registry of Glint builtin functions and variables
// Objective: Declare each builtin's category and arity, validate call arity,
//            and implement the catalogue over unevaluated argument nodes
//=====================================================

use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;
use once_cell::sync::Lazy;
use rand::Rng;

use crate::ast::{Node, NodeKind};
use crate::interpreter::errors::{EvalResult, RuntimeError};
use crate::interpreter::{Environment, Interpreter};

//=====================================================
// Section 1.0 - Descriptors
//=====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    /// Resolved to a value when the name is referenced (`pi`).
    Variable,
    /// Resolved to a builtin reference and invoked through dispatch.
    Function,
}

/// Declared argument count of a builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinArity {
    Exact(usize),
    Variadic,
}

impl BuiltinArity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            BuiltinArity::Exact(expected) => expected == count,
            BuiltinArity::Variadic => true,
        }
    }
}

/// Builtins receive their arguments unevaluated and evaluate them in `env`,
/// which lets each one decide ordering and laziness.
pub type BuiltinHandler = fn(&mut Interpreter, &Environment, usize, &[Node]) -> EvalResult;

#[derive(Clone)]
pub struct Builtin {
    pub name: &'static str,
    pub kind: BuiltinKind,
    pub arity: BuiltinArity,
    handler: BuiltinHandler,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .finish()
    }
}

static REGISTRY: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    use BuiltinArity::{Exact, Variadic};
    use BuiltinKind::{Function, Variable};

    let mut registry = HashMap::new();
    let mut register = |name, kind, arity, handler| {
        registry.insert(
            name,
            Builtin {
                name,
                kind,
                arity,
                handler,
            },
        );
    };
    register("len", Function, Exact(1), builtin_len as BuiltinHandler);
    register("unwrap", Function, Exact(2), builtin_unwrap);
    register("unwrap_all", Function, Exact(2), builtin_unwrap_all);
    register("slice", Function, Exact(3), builtin_slice);
    register("range", Function, Exact(2), builtin_range);
    register("random", Function, Exact(2), builtin_random);
    register("print", Function, Variadic, builtin_print);
    register("input", Function, Exact(1), builtin_input);
    register("is_success", Function, Exact(1), builtin_is_success);
    register("pi", Variable, Exact(0), builtin_pi);
    registry
});

//=====================================================
// Section 2.0 - Registry Queries
//=====================================================

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    REGISTRY.get(name)
}

pub fn is_builtin(name: &str) -> bool {
    REGISTRY.contains_key(name)
}

pub fn is_builtin_of_type(kind: BuiltinKind, name: &str) -> bool {
    lookup(name).is_some_and(|builtin| builtin.kind == kind)
}

/// Registered names in sorted order.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

//Function: dispatch
//Purpose: Validate arity, then run the named builtin over its argument nodes
//Inputs: interpreter, caller environment, call line, unevaluated arguments
//Returns: EvalResult
pub fn dispatch(
    interpreter: &mut Interpreter,
    env: &Environment,
    name: &str,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let builtin =
        lookup(name).ok_or_else(|| RuntimeError::undefined(line, name))?;
    if !builtin.arity.accepts(args.len()) {
        let expected = match builtin.arity {
            BuiltinArity::Exact(expected) => expected,
            BuiltinArity::Variadic => args.len(),
        };
        return Err(RuntimeError::arity(line, expected, args.len()).into());
    }
    debug!("dispatch builtin {name} at line {line} with {} argument(s)", args.len());
    (builtin.handler)(interpreter, env, line, args)
}

//=====================================================
// Section 3.0 - Argument Helpers
//=====================================================

fn expect_list(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    node: &Node,
) -> EvalResult<Vec<Node>> {
    let value = interpreter.evaluate_node(node, env)?;
    match value.kind {
        NodeKind::List(items) => Ok(items),
        _ => Err(RuntimeError::type_mismatch(line, "List", &value).into()),
    }
}

fn expect_integer(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    node: &Node,
    what: &str,
) -> EvalResult<i64> {
    let value = interpreter.evaluate_node(node, env)?;
    let Some(number) = value.as_number() else {
        return Err(RuntimeError::type_mismatch(line, "Number", &value).into());
    };
    if !number.is_finite() || number.fract() != 0.0 {
        return Err(RuntimeError::malformed(
            line,
            format!("{what} must be an integer, got {number}"),
        )
        .into());
    }
    Ok(number as i64)
}

/// Items of a monad: a List holding zero or one element.
fn monad_items(line: usize, value: &Node) -> Result<Option<&Node>, RuntimeError> {
    match &value.kind {
        NodeKind::List(items) if items.len() <= 1 => Ok(items.first()),
        NodeKind::List(items) => Err(RuntimeError::type_mismatch_message(
            line,
            format!(
                "expected a monad of length 0 or 1, got length {}",
                items.len()
            ),
        )),
        _ => Err(RuntimeError::type_mismatch(line, "List", value)),
    }
}

//=====================================================
// Section 4.0 - Catalogue
//=====================================================

fn builtin_len(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let value = interpreter.evaluate_node(&args[0], env)?;
    // Report at the call site, not where the value was produced.
    let length = value
        .length()
        .map_err(|err| RuntimeError::new(err.kind, line, err.message))?;
    Ok(Node::number(line, length as f64))
}

fn builtin_unwrap(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let monad = interpreter.evaluate_node(&args[0], env)?;
    match monad_items(line, &monad)? {
        Some(value) => Ok(value.clone()),
        // The default is only evaluated when it is needed.
        None => interpreter.evaluate_node(&args[1], env),
    }
}

fn builtin_unwrap_all(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let monads = expect_list(interpreter, env, line, &args[0])?;
    let mut unwrapped = Vec::with_capacity(monads.len());
    for monad in &monads {
        match monad_items(line, monad)? {
            Some(value) => unwrapped.push(value.clone()),
            None => unwrapped.push(interpreter.evaluate_node(&args[1], env)?),
        }
    }
    Ok(Node::list(line, unwrapped))
}

fn builtin_slice(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let collection = interpreter.evaluate_node(&args[0], env)?;
    let length = match &collection.kind {
        NodeKind::List(_) | NodeKind::String(_) => collection.length()?,
        _ => {
            return Err(
                RuntimeError::type_mismatch(line, "List or String", &collection).into(),
            );
        }
    };
    let start = expect_integer(interpreter, env, line, &args[1], "slice start")?;
    let end = expect_integer(interpreter, env, line, &args[2], "slice end")?;
    for index in [start, end] {
        if index < 0 || index as usize >= length {
            return Err(RuntimeError::range(
                line,
                format!("slice index {index} out of range for length {length}"),
            )
            .into());
        }
    }
    if start > end {
        return Err(RuntimeError::range(
            line,
            format!("slice start {start} is greater than end {end}"),
        )
        .into());
    }
    let (start, end) = (start as usize, end as usize);
    match collection.kind {
        NodeKind::List(items) => Ok(Node::list(line, items[start..=end].to_vec())),
        NodeKind::String(text) => {
            let sliced: String = text.chars().skip(start).take(end - start + 1).collect();
            Ok(Node::string(line, sliced))
        }
        _ => Err(RuntimeError::type_mismatch(line, "List or String", &collection).into()),
    }
}

fn builtin_range(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let start = expect_integer(interpreter, env, line, &args[0], "range start")?;
    let end = expect_integer(interpreter, env, line, &args[1], "range end")?;
    let items: Vec<Node> = if start <= end {
        (start..=end).map(|n| Node::number(line, n as f64)).collect()
    } else {
        (end..=start).rev().map(|n| Node::number(line, n as f64)).collect()
    };
    Ok(Node::list(line, items))
}

fn builtin_random(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let min = expect_integer(interpreter, env, line, &args[0], "random minimum")?;
    let max = expect_integer(interpreter, env, line, &args[1], "random maximum")?;
    if min > max {
        return Err(RuntimeError::range(
            line,
            format!("random minimum {min} is greater than maximum {max}"),
        )
        .into());
    }
    let value = interpreter.rng().gen_range(min..=max);
    Ok(Node::number(line, value as f64))
}

fn builtin_print(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(interpreter.evaluate_node(arg, env)?);
    }
    interpreter.write_line(line, &values)?;
    Ok(Node::empty(line))
}

fn builtin_input(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let prompt = interpreter.evaluate_node(&args[0], env)?;
    let NodeKind::String(prompt) = &prompt.kind else {
        return Err(RuntimeError::type_mismatch(line, "String", &prompt).into());
    };
    let text = interpreter.read_line(line, prompt)?;
    Ok(Node::string(line, text))
}

fn builtin_is_success(
    interpreter: &mut Interpreter,
    env: &Environment,
    line: usize,
    args: &[Node],
) -> EvalResult {
    let monad = interpreter.evaluate_node(&args[0], env)?;
    let present = monad_items(line, &monad)?.is_some();
    Ok(Node::boolean(line, present))
}

fn builtin_pi(_: &mut Interpreter, _: &Environment, line: usize, _: &[Node]) -> EvalResult {
    Ok(Node::number(line, PI))
}
