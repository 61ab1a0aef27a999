//=====================================================
// File: interpreter/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Glint tree-walking evaluator
// Objective: Walk parsed nodes, manage call frames and closures, thread
//            return/break/continue signals, and wrap function results in monads
//=====================================================

//=====================================================
// Section 1.0 - Imports & Modules
//=====================================================

pub mod environment;
pub mod errors;

use std::io::{self, BufRead, BufReader, Write};
use std::rc::Rc;

use log::{debug, trace};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ast::{BinaryOperator, Node, NodeKind, UnaryOperator, WhenCase, WhenSubject};
use crate::builtins::{self, BuiltinKind};
use crate::config::RuntimeConfig;

pub use environment::Environment;
pub use errors::{ErrorKind, EvalResult, RuntimeError, Signal};

//=====================================================
// Section 2.0 - Interpreter State
//=====================================================

pub struct Interpreter {
    globals: Environment,
    output: Box<dyn Write>,
    input: Box<dyn BufRead>,
    rng: StdRng,
    call_depth: usize,
}

impl Interpreter {
    //Function: new
    //Purpose: Construct an interpreter bound to process stdin/stdout
    //Inputs: None
    //Returns: Self
    pub fn new() -> Self {
        Self::with_config(&RuntimeConfig::default())
    }

    pub fn with_config(config: &RuntimeConfig) -> Self {
        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            globals: Environment::new(),
            output: Box::new(io::stdout()),
            input: Box::new(BufReader::new(io::stdin())),
            rng,
            call_depth: 0,
        }
    }

    /// Redirect everything `print` writes, including `input` prompts.
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    pub fn with_input(mut self, input: impl BufRead + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    //=================================================
    // Section 2.1 - Entry Points
    //=================================================

    //Function: evaluate
    //Purpose: Evaluate top-level statements in order in the global frame
    //Inputs: program: &[Node]
    //Returns: One value per statement, or the first error raised
    pub fn evaluate(&mut self, program: &[Node]) -> Result<Vec<Node>, RuntimeError> {
        let mut results = Vec::with_capacity(program.len());
        for statement in program {
            results.push(self.evaluate_statement(statement)?);
        }
        Ok(results)
    }

    pub fn evaluate_statement(&mut self, statement: &Node) -> Result<Node, RuntimeError> {
        trace!(
            "evaluate {} at line {}",
            statement.kind_name(),
            statement.line
        );
        let globals = self.globals.clone();
        self.eval(statement, &globals).map_err(Signal::into_error)
    }

    pub(crate) fn evaluate_node(&mut self, node: &Node, env: &Environment) -> EvalResult {
        self.eval(node, env)
    }

    pub(crate) fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    //=================================================
    // Section 2.2 - Standard Streams
    //=================================================

    pub(crate) fn write_line(&mut self, line: usize, values: &[Node]) -> Result<(), RuntimeError> {
        let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
        writeln!(self.output, "{}", rendered.join(" "))
            .and_then(|_| self.output.flush())
            .map_err(|err| RuntimeError::io(line, err))
    }

    pub(crate) fn read_line(&mut self, line: usize, prompt: &str) -> Result<String, RuntimeError> {
        write!(self.output, "{prompt}")
            .and_then(|_| self.output.flush())
            .map_err(|err| RuntimeError::io(line, err))?;
        let mut buffer = String::new();
        self.input
            .read_line(&mut buffer)
            .map_err(|err| RuntimeError::io(line, err))?;
        if buffer.ends_with('\n') {
            buffer.pop();
            if buffer.ends_with('\r') {
                buffer.pop();
            }
        }
        Ok(buffer)
    }

    //=================================================
    // Section 3.0 - Node Dispatch
    //=================================================

    fn eval(&mut self, node: &Node, env: &Environment) -> EvalResult {
        let line = node.line;
        match &node.kind {
            NodeKind::Number(_)
            | NodeKind::String(_)
            | NodeKind::Boolean(_)
            | NodeKind::BuiltinFunctionReference(_)
            | NodeKind::BlockStatementReturnValue => Ok(node.clone()),
            NodeKind::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, env)?);
                }
                Ok(Node::list(line, values))
            }
            NodeKind::Identifier(name) => self.resolve_identifier(name, line, env),
            NodeKind::BinaryExpression {
                left,
                operator,
                right,
            } => self.eval_binary(left, *operator, right, line, env),
            NodeKind::UnaryExpression { operator, operand } => {
                let operand = self.eval(operand, env)?;
                Ok(apply_unary(*operator, &operand, line)?)
            }
            NodeKind::Function {
                params,
                body,
                closure,
            } => match closure {
                Some(_) => Ok(node.clone()),
                None => Ok(Node::new(
                    line,
                    NodeKind::Function {
                        params: params.clone(),
                        body: Rc::clone(body),
                        closure: Some(env.clone()),
                    },
                )),
            },
            NodeKind::FunctionCall { callee, arguments } => {
                self.eval_call(callee, arguments, line, env)
            }
            NodeKind::Assignment { name, value } => {
                ensure_bindable(name, line)?;
                let value = self.eval(value, env)?;
                env.assign(name, value);
                Ok(Node::empty(line))
            }
            NodeKind::PrintStatement { arguments } => {
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.eval(argument, env)?);
                }
                self.write_line(line, &values)?;
                Ok(Node::empty(line))
            }
            NodeKind::IfStatement {
                condition,
                consequence,
                alternative,
            } => {
                if self.eval(condition, env)?.is_truthy() {
                    self.eval_block(consequence, env, line)
                } else if let Some(alternative) = alternative {
                    self.eval_block(alternative, env, line)
                } else {
                    Ok(Node::empty(line))
                }
            }
            NodeKind::WhenExpression {
                subject,
                cases,
                otherwise,
            } => self.eval_when(subject, cases, otherwise.as_deref(), line, env),
            NodeKind::WhileLoop { condition, body } => {
                self.eval_while(condition, body, line, env)
            }
            NodeKind::ForLoop {
                variable,
                iterable,
                body,
            } => self.eval_for(variable, iterable, body, line, env),
            NodeKind::BreakStatement => Err(Signal::Break { line }),
            NodeKind::ContinueStatement => Err(Signal::Continue { line }),
            NodeKind::ReturnStatement { value } => {
                let value = match value {
                    Some(expr) => Some(self.eval(expr, env)?),
                    None => None,
                };
                Err(Signal::Return { value, line })
            }
        }
    }

    /// Statements run in order in `env`; the last value is the block's value.
    fn eval_block(&mut self, body: &[Node], env: &Environment, line: usize) -> EvalResult {
        let mut last = Node::empty(line);
        for statement in body {
            last = self.eval(statement, env)?;
        }
        Ok(last)
    }

    fn resolve_identifier(&mut self, name: &str, line: usize, env: &Environment) -> EvalResult {
        if let Some(value) = env.lookup(name) {
            return Ok(value);
        }
        match builtins::lookup(name) {
            Some(builtin) if builtin.kind == BuiltinKind::Function => {
                Ok(Node::builtin_reference(line, name))
            }
            Some(_) => builtins::dispatch(self, env, name, line, &[]),
            None => Err(RuntimeError::undefined(line, name).into()),
        }
    }

    //=================================================
    // Section 4.0 - Calls
    //=================================================

    fn eval_binary(
        &mut self,
        left: &Node,
        operator: BinaryOperator,
        right: &Node,
        line: usize,
        env: &Environment,
    ) -> EvalResult {
        let left = self.eval(left, env)?;
        let right = self.eval(right, env)?;
        if operator != BinaryOperator::Send {
            return Ok(apply_binary(operator, &left, &right, line)?);
        }
        let arguments = match right.kind {
            NodeKind::List(items) => items,
            _ => return Err(RuntimeError::type_mismatch(line, "List", &right).into()),
        };
        match &left.kind {
            NodeKind::Function { .. } => self.call_function(&left, arguments, line),
            NodeKind::BuiltinFunctionReference(name) => {
                builtins::dispatch(self, env, name, line, &arguments)
            }
            _ => Err(RuntimeError::type_mismatch(line, "Function", &left).into()),
        }
    }

    fn eval_call(
        &mut self,
        callee: &Node,
        arguments: &[Node],
        line: usize,
        env: &Environment,
    ) -> EvalResult {
        let target = self.eval(callee, env)?;
        match &target.kind {
            // Builtins see the argument expressions, not their values.
            NodeKind::BuiltinFunctionReference(name) => {
                builtins::dispatch(self, env, name, line, arguments)
            }
            NodeKind::Function { .. } => {
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.eval(argument, env)?);
                }
                self.call_function(&target, values, line)
            }
            _ => Err(RuntimeError::type_mismatch(line, "Function", &target).into()),
        }
    }

    //Function: call_function
    //Purpose: Run a user function in a fresh frame chained to its closure
    //Inputs: function value, positional arguments, call line
    //Returns: A monad: empty List, or a List wrapping the produced value
    fn call_function(&mut self, function: &Node, arguments: Vec<Node>, line: usize) -> EvalResult {
        let NodeKind::Function {
            params,
            body,
            closure,
        } = &function.kind
        else {
            return Err(RuntimeError::type_mismatch(line, "Function", function).into());
        };
        let supplied = arguments.len();
        if supplied > params.len() {
            return Err(RuntimeError::arity(line, params.len(), supplied).into());
        }

        let parent = closure.clone().unwrap_or_else(|| self.globals.clone());
        let frame = Environment::enclosed(&parent);
        let mut arguments = arguments.into_iter();
        for param in params {
            ensure_bindable(&param.name, line)?;
            let value = match (arguments.next(), &param.default) {
                (Some(value), _) => value,
                (None, Some(default)) => self.eval(default, &frame)?,
                (None, None) => {
                    return Err(RuntimeError::arity(line, params.len(), supplied).into());
                }
            };
            frame.set_identifier(param.name.clone(), value);
        }

        self.call_depth += 1;
        debug!(
            "call function at line {line} (depth {}, {supplied} argument(s))",
            self.call_depth
        );
        let outcome = self.eval_block(body, &frame, line);
        debug!("leave function at line {line} (depth {})", self.call_depth);
        self.call_depth -= 1;

        match outcome {
            Ok(value) => Ok(monad(line, Some(value))),
            Err(Signal::Return { value, .. }) => Ok(monad(line, value)),
            Err(signal @ (Signal::Break { .. } | Signal::Continue { .. })) => {
                Err(signal.into_error().into())
            }
            Err(err) => Err(err),
        }
    }

    //=================================================
    // Section 5.0 - Conditionals & Loops
    //=================================================

    fn eval_when(
        &mut self,
        subject: &WhenSubject,
        cases: &[WhenCase],
        otherwise: Option<&[Node]>,
        line: usize,
        env: &Environment,
    ) -> EvalResult {
        let subject = match subject {
            WhenSubject::Implicit => Node::boolean(line, true),
            WhenSubject::Negated => Node::boolean(line, false),
            WhenSubject::Expression(expr) => self.eval(expr, env)?,
        };
        for case in cases {
            let candidate = self.eval(&case.pattern, env)?;
            if candidate == subject {
                return self.eval_block(&case.body, env, line);
            }
        }
        match otherwise {
            Some(block) => self.eval_block(block, env, line),
            None => Ok(Node::empty(line)),
        }
    }

    fn eval_while(
        &mut self,
        condition: &Node,
        body: &[Node],
        line: usize,
        env: &Environment,
    ) -> EvalResult {
        while self.eval(condition, env)?.is_truthy() {
            let frame = Environment::enclosed(env);
            match self.eval_block(body, &frame, line) {
                Ok(_) | Err(Signal::Continue { .. }) => {}
                Err(Signal::Break { .. }) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(Node::empty(line))
    }

    fn eval_for(
        &mut self,
        variable: &str,
        iterable: &Node,
        body: &[Node],
        line: usize,
        env: &Environment,
    ) -> EvalResult {
        ensure_bindable(variable, line)?;
        let iterable = self.eval(iterable, env)?;
        let items = match iterable.kind {
            NodeKind::List(items) => items,
            NodeKind::String(text) => text
                .chars()
                .map(|ch| Node::string(line, ch.to_string()))
                .collect(),
            _ => {
                return Err(RuntimeError::type_mismatch(line, "List or String", &iterable).into());
            }
        };
        for item in items {
            let frame = Environment::enclosed(env);
            frame.set_identifier(variable, item);
            match self.eval_block(body, &frame, line) {
                Ok(_) | Err(Signal::Continue { .. }) => {}
                Err(Signal::Break { .. }) => break,
                Err(other) => return Err(other),
            }
        }
        Ok(Node::empty(line))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

//=====================================================
// Section 6.0 - Operators
//=====================================================

/// Wrap a function outcome; the empty block-result means "no value".
fn monad(line: usize, value: Option<Node>) -> Node {
    let items = value
        .filter(|value| !value.is_empty_result())
        .into_iter()
        .collect();
    Node::list(line, items)
}

fn ensure_bindable(name: &str, line: usize) -> Result<(), RuntimeError> {
    if builtins::is_builtin(name) {
        return Err(RuntimeError::invalid(
            line,
            format!("cannot rebind builtin '{name}'"),
        ));
    }
    Ok(())
}

fn expect_number(value: &Node, line: usize) -> Result<f64, RuntimeError> {
    value
        .as_number()
        .ok_or_else(|| RuntimeError::type_mismatch(line, "Number", value))
}

fn numeric_operands(left: &Node, right: &Node, line: usize) -> Result<(f64, f64), RuntimeError> {
    Ok((expect_number(left, line)?, expect_number(right, line)?))
}

fn apply_binary(
    operator: BinaryOperator,
    left: &Node,
    right: &Node,
    line: usize,
) -> Result<Node, RuntimeError> {
    use BinaryOperator::*;

    let value = match operator {
        Add => match (&left.kind, &right.kind) {
            (NodeKind::String(a), NodeKind::String(b)) => Node::string(line, format!("{a}{b}")),
            (NodeKind::String(_), _) => {
                return Err(RuntimeError::type_mismatch(line, "String", right));
            }
            (NodeKind::List(a), NodeKind::List(b)) => {
                Node::list(line, a.iter().chain(b).cloned().collect())
            }
            (NodeKind::List(_), _) => {
                return Err(RuntimeError::type_mismatch(line, "List", right));
            }
            _ => {
                let (a, b) = numeric_operands(left, right, line)?;
                Node::number(line, a + b)
            }
        },
        Subtract => {
            let (a, b) = numeric_operands(left, right, line)?;
            Node::number(line, a - b)
        }
        Multiply => {
            let (a, b) = numeric_operands(left, right, line)?;
            Node::number(line, a * b)
        }
        Divide | Modulo => {
            let (a, b) = numeric_operands(left, right, line)?;
            if b == 0.0 {
                return Err(RuntimeError::invalid(line, "division by zero"));
            }
            let result = if operator == Divide { a / b } else { a % b };
            Node::number(line, result)
        }
        Equal => Node::boolean(line, left == right),
        NotEqual => Node::boolean(line, left != right),
        Less | Greater | LessEqual | GreaterEqual => {
            let ordering = match (&left.kind, &right.kind) {
                (NodeKind::String(a), NodeKind::String(b)) => a.cmp(b),
                (NodeKind::String(_), _) => {
                    return Err(RuntimeError::type_mismatch(line, "String", right));
                }
                _ => {
                    let (a, b) = numeric_operands(left, right, line)?;
                    a.partial_cmp(&b).ok_or_else(|| {
                        RuntimeError::invalid(line, format!("cannot compare {a} and {b}"))
                    })?
                }
            };
            let holds = match operator {
                Less => ordering.is_lt(),
                Greater => ordering.is_gt(),
                LessEqual => ordering.is_le(),
                _ => ordering.is_ge(),
            };
            Node::boolean(line, holds)
        }
        And => Node::boolean(line, left.is_truthy() && right.is_truthy()),
        Or => Node::boolean(line, left.is_truthy() || right.is_truthy()),
        Send => {
            return Err(RuntimeError::invalid(
                line,
                "the send operator needs a call context",
            ));
        }
    };
    Ok(value)
}

fn apply_unary(operator: UnaryOperator, operand: &Node, line: usize) -> Result<Node, RuntimeError> {
    match operator {
        UnaryOperator::Negate => Ok(Node::number(line, -expect_number(operand, line)?)),
        UnaryOperator::Not => Ok(Node::boolean(line, !operand.is_truthy())),
    }
}
