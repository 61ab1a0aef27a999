//=====================================================
// File: ast/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Glint node model shared by the parser and the evaluator
// Objective: Define the single tagged representation used for every AST node
//            and every runtime value, with rendering and length helpers
//=====================================================

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::interpreter::Environment;
use crate::interpreter::errors::RuntimeError;

//=====================================================
// Section 1.0 - Operators
//=====================================================

/// Binary operators, including the `<-` send operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
    Send,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Send => "<-",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => f.write_str("-"),
            UnaryOperator::Not => f.write_str("not "),
        }
    }
}

//=====================================================
// Section 2.0 - Node Payloads
//=====================================================

/// A function parameter with an optional default expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub default: Option<Node>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, default: Node) -> Self {
        Self {
            name: name.into(),
            default: Some(default),
        }
    }
}

/// Subject of a `when` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WhenSubject {
    /// `when { ... }` matches cases against `true`.
    Implicit,
    /// `when not { ... }` matches cases against `false`.
    Negated,
    Expression(Box<Node>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenCase {
    pub pattern: Node,
    pub body: Vec<Node>,
}

//=====================================================
// Section 3.0 - Node
//=====================================================

/// Every AST node and every runtime value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub line: usize,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    Number(f64),
    String(String),
    Boolean(bool),
    List(Vec<Node>),
    Identifier(String),
    BinaryExpression {
        left: Box<Node>,
        operator: BinaryOperator,
        right: Box<Node>,
    },
    UnaryExpression {
        operator: UnaryOperator,
        operand: Box<Node>,
    },
    Function {
        params: Vec<Parameter>,
        body: Rc<Vec<Node>>,
        /// Defining environment; `None` until the literal is evaluated.
        #[serde(skip)]
        closure: Option<Environment>,
    },
    FunctionCall {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    Assignment {
        name: String,
        value: Box<Node>,
    },
    PrintStatement {
        arguments: Vec<Node>,
    },
    IfStatement {
        condition: Box<Node>,
        consequence: Vec<Node>,
        alternative: Option<Vec<Node>>,
    },
    WhenExpression {
        subject: WhenSubject,
        cases: Vec<WhenCase>,
        otherwise: Option<Vec<Node>>,
    },
    WhileLoop {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    ForLoop {
        variable: String,
        iterable: Box<Node>,
        body: Vec<Node>,
    },
    BreakStatement,
    ContinueStatement,
    ReturnStatement {
        value: Option<Box<Node>>,
    },
    BuiltinFunctionReference(String),
    /// The empty block-result: "no value produced".
    BlockStatementReturnValue,
}

/// Structural equality, except that functions compare by identity: two
/// function values are equal only when they share one body and one closure.
impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        use NodeKind::*;

        match (self, other) {
            (Number(a), Number(b)) => a == b,
            (String(a), String(b)) | (Identifier(a), Identifier(b)) => a == b,
            (BuiltinFunctionReference(a), BuiltinFunctionReference(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (List(a), List(b)) => a == b,
            (
                BinaryExpression {
                    left: l1,
                    operator: o1,
                    right: r1,
                },
                BinaryExpression {
                    left: l2,
                    operator: o2,
                    right: r2,
                },
            ) => o1 == o2 && l1 == l2 && r1 == r2,
            (
                UnaryExpression {
                    operator: o1,
                    operand: a,
                },
                UnaryExpression {
                    operator: o2,
                    operand: b,
                },
            ) => o1 == o2 && a == b,
            (
                Function {
                    body: b1,
                    closure: c1,
                    ..
                },
                Function {
                    body: b2,
                    closure: c2,
                    ..
                },
            ) => Rc::ptr_eq(b1, b2) && c1 == c2,
            (
                FunctionCall {
                    callee: c1,
                    arguments: a1,
                },
                FunctionCall {
                    callee: c2,
                    arguments: a2,
                },
            ) => c1 == c2 && a1 == a2,
            (
                Assignment {
                    name: n1,
                    value: v1,
                },
                Assignment {
                    name: n2,
                    value: v2,
                },
            ) => n1 == n2 && v1 == v2,
            (PrintStatement { arguments: a }, PrintStatement { arguments: b }) => a == b,
            (
                IfStatement {
                    condition: c1,
                    consequence: t1,
                    alternative: e1,
                },
                IfStatement {
                    condition: c2,
                    consequence: t2,
                    alternative: e2,
                },
            ) => c1 == c2 && t1 == t2 && e1 == e2,
            (
                WhenExpression {
                    subject: s1,
                    cases: k1,
                    otherwise: o1,
                },
                WhenExpression {
                    subject: s2,
                    cases: k2,
                    otherwise: o2,
                },
            ) => s1 == s2 && k1 == k2 && o1 == o2,
            (
                WhileLoop {
                    condition: c1,
                    body: b1,
                },
                WhileLoop {
                    condition: c2,
                    body: b2,
                },
            ) => c1 == c2 && b1 == b2,
            (
                ForLoop {
                    variable: v1,
                    iterable: i1,
                    body: b1,
                },
                ForLoop {
                    variable: v2,
                    iterable: i2,
                    body: b2,
                },
            ) => v1 == v2 && i1 == i2 && b1 == b2,
            (ReturnStatement { value: a }, ReturnStatement { value: b }) => a == b,
            (BreakStatement, BreakStatement)
            | (ContinueStatement, ContinueStatement)
            | (BlockStatementReturnValue, BlockStatementReturnValue) => true,
            _ => false,
        }
    }
}

/// Values compare by content; source lines are ignored.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Node {
    pub fn new(line: usize, kind: NodeKind) -> Self {
        Self { line, kind }
    }

    pub fn number(line: usize, value: f64) -> Self {
        Self::new(line, NodeKind::Number(value))
    }

    pub fn string(line: usize, value: impl Into<String>) -> Self {
        Self::new(line, NodeKind::String(value.into()))
    }

    pub fn boolean(line: usize, value: bool) -> Self {
        Self::new(line, NodeKind::Boolean(value))
    }

    pub fn list(line: usize, items: Vec<Node>) -> Self {
        Self::new(line, NodeKind::List(items))
    }

    pub fn identifier(line: usize, name: impl Into<String>) -> Self {
        Self::new(line, NodeKind::Identifier(name.into()))
    }

    pub fn binary(line: usize, left: Node, operator: BinaryOperator, right: Node) -> Self {
        Self::new(
            line,
            NodeKind::BinaryExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
        )
    }

    pub fn unary(line: usize, operator: UnaryOperator, operand: Node) -> Self {
        Self::new(
            line,
            NodeKind::UnaryExpression {
                operator,
                operand: Box::new(operand),
            },
        )
    }

    pub fn function(line: usize, params: Vec<Parameter>, body: Vec<Node>) -> Self {
        Self::new(
            line,
            NodeKind::Function {
                params,
                body: Rc::new(body),
                closure: None,
            },
        )
    }

    pub fn call(line: usize, callee: Node, arguments: Vec<Node>) -> Self {
        Self::new(
            line,
            NodeKind::FunctionCall {
                callee: Box::new(callee),
                arguments,
            },
        )
    }

    pub fn assignment(line: usize, name: impl Into<String>, value: Node) -> Self {
        Self::new(
            line,
            NodeKind::Assignment {
                name: name.into(),
                value: Box::new(value),
            },
        )
    }

    pub fn print(line: usize, arguments: Vec<Node>) -> Self {
        Self::new(line, NodeKind::PrintStatement { arguments })
    }

    pub fn if_statement(
        line: usize,
        condition: Node,
        consequence: Vec<Node>,
        alternative: Option<Vec<Node>>,
    ) -> Self {
        Self::new(
            line,
            NodeKind::IfStatement {
                condition: Box::new(condition),
                consequence,
                alternative,
            },
        )
    }

    pub fn when(
        line: usize,
        subject: WhenSubject,
        cases: Vec<WhenCase>,
        otherwise: Option<Vec<Node>>,
    ) -> Self {
        Self::new(
            line,
            NodeKind::WhenExpression {
                subject,
                cases,
                otherwise,
            },
        )
    }

    pub fn while_loop(line: usize, condition: Node, body: Vec<Node>) -> Self {
        Self::new(
            line,
            NodeKind::WhileLoop {
                condition: Box::new(condition),
                body,
            },
        )
    }

    pub fn for_loop(line: usize, variable: impl Into<String>, iterable: Node, body: Vec<Node>) -> Self {
        Self::new(
            line,
            NodeKind::ForLoop {
                variable: variable.into(),
                iterable: Box::new(iterable),
                body,
            },
        )
    }

    pub fn break_statement(line: usize) -> Self {
        Self::new(line, NodeKind::BreakStatement)
    }

    pub fn continue_statement(line: usize) -> Self {
        Self::new(line, NodeKind::ContinueStatement)
    }

    pub fn return_statement(line: usize, value: Option<Node>) -> Self {
        Self::new(
            line,
            NodeKind::ReturnStatement {
                value: value.map(Box::new),
            },
        )
    }

    pub fn builtin_reference(line: usize, name: impl Into<String>) -> Self {
        Self::new(line, NodeKind::BuiltinFunctionReference(name.into()))
    }

    pub fn empty(line: usize) -> Self {
        Self::new(line, NodeKind::BlockStatementReturnValue)
    }

    //=================================================
    // Section 3.1 - Inspection
    //=================================================

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Number(_) => "Number",
            NodeKind::String(_) => "String",
            NodeKind::Boolean(_) => "Boolean",
            NodeKind::List(_) => "List",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::Function { .. } => "Function",
            NodeKind::FunctionCall { .. } => "FunctionCall",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::PrintStatement { .. } => "PrintStatement",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::WhenExpression { .. } => "WhenExpression",
            NodeKind::WhileLoop { .. } => "WhileLoop",
            NodeKind::ForLoop { .. } => "ForLoop",
            NodeKind::BreakStatement => "BreakStatement",
            NodeKind::ContinueStatement => "ContinueStatement",
            NodeKind::ReturnStatement { .. } => "ReturnStatement",
            NodeKind::BuiltinFunctionReference(_) => "BuiltinFunctionReference",
            NodeKind::BlockStatementReturnValue => "BlockStatementReturnValue",
        }
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self.kind, NodeKind::BlockStatementReturnValue)
    }

    /// Element count of a List, character count of a String.
    pub fn length(&self) -> Result<usize, RuntimeError> {
        match &self.kind {
            NodeKind::List(items) => Ok(items.len()),
            NodeKind::String(text) => Ok(text.chars().count()),
            _ => Err(RuntimeError::type_mismatch(self.line, "List or String", self)),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match &self.kind {
            NodeKind::Boolean(flag) => *flag,
            NodeKind::Number(value) => *value != 0.0,
            NodeKind::String(text) => !text.is_empty(),
            NodeKind::List(items) => !items.is_empty(),
            NodeKind::BlockStatementReturnValue => false,
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

//=====================================================
// Section 4.0 - Rendering
//=====================================================

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[Node], separator: &str) -> fmt::Result {
    for (index, node) in nodes.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

fn write_block(f: &mut fmt::Formatter<'_>, body: &[Node]) -> fmt::Result {
    f.write_str("{ ")?;
    for node in body {
        write!(f, "{node}; ")?;
    }
    f.write_str("}")
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default {
            Some(default) => write!(f, "{} = {}", self.name, default),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Number(value) => write!(f, "{value}"),
            NodeKind::String(text) => f.write_str(text),
            NodeKind::Boolean(flag) => write!(f, "{flag}"),
            NodeKind::List(items) => {
                f.write_str("(")?;
                write_joined(f, items, ", ")?;
                f.write_str(")")
            }
            NodeKind::Identifier(name) => f.write_str(name),
            NodeKind::BinaryExpression {
                left,
                operator,
                right,
            } => write!(f, "({left} {operator} {right})"),
            NodeKind::UnaryExpression { operator, operand } => write!(f, "{operator}{operand}"),
            NodeKind::Function { params, .. } => {
                f.write_str("func(")?;
                for (index, param) in params.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                f.write_str(")")
            }
            NodeKind::FunctionCall { callee, arguments } => {
                write!(f, "{callee}(")?;
                write_joined(f, arguments, ", ")?;
                f.write_str(")")
            }
            NodeKind::Assignment { name, value } => write!(f, "{name} = {value}"),
            NodeKind::PrintStatement { arguments } => {
                f.write_str("print ")?;
                write_joined(f, arguments, ", ")
            }
            NodeKind::IfStatement {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {condition} ")?;
                write_block(f, consequence)?;
                if let Some(alternative) = alternative {
                    f.write_str(" else ")?;
                    write_block(f, alternative)?;
                }
                Ok(())
            }
            NodeKind::WhenExpression {
                subject,
                cases,
                otherwise,
            } => {
                f.write_str("when ")?;
                match subject {
                    WhenSubject::Implicit => {}
                    WhenSubject::Negated => f.write_str("not ")?,
                    WhenSubject::Expression(expr) => write!(f, "{expr} ")?,
                }
                f.write_str("{ ")?;
                for case in cases {
                    write!(f, "is {} ", case.pattern)?;
                    write_block(f, &case.body)?;
                    f.write_str(" ")?;
                }
                if let Some(otherwise) = otherwise {
                    f.write_str("else ")?;
                    write_block(f, otherwise)?;
                    f.write_str(" ")?;
                }
                f.write_str("}")
            }
            NodeKind::WhileLoop { condition, body } => {
                write!(f, "while {condition} ")?;
                write_block(f, body)
            }
            NodeKind::ForLoop {
                variable,
                iterable,
                body,
            } => {
                write!(f, "for {variable} in {iterable} ")?;
                write_block(f, body)
            }
            NodeKind::BreakStatement => f.write_str("break"),
            NodeKind::ContinueStatement => f.write_str("continue"),
            NodeKind::ReturnStatement { value } => match value {
                Some(value) => write!(f, "return {value}"),
                None => f.write_str("return"),
            },
            NodeKind::BuiltinFunctionReference(name) => write!(f, "<builtin {name}>"),
            NodeKind::BlockStatementReturnValue => Ok(()),
        }
    }
}
