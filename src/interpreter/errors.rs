//=====================================================
// File: interpreter/errors.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Line-tagged runtime diagnostics for the Glint evaluator
// Objective: Provide the uniform error value raised by every evaluation layer,
//            plus the control-flow signals that unwind through nested blocks
//=====================================================

use thiserror::Error;

use crate::ast::Node;

//=====================================================
// Section 1.0 - Error Codes
//=====================================================

/// Broad classification of a runtime failure.
///
/// The rendered message is the same for every kind; the kind only exists so
/// hosts can branch on a failure without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UndefinedIdentifier,
    ArityMismatch,
    TypeMismatch,
    RangeError,
    MalformedLiteral,
    InvalidOperation,
    Io,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::UndefinedIdentifier => "E001",
            ErrorKind::ArityMismatch => "E002",
            ErrorKind::TypeMismatch => "E003",
            ErrorKind::RangeError => "E004",
            ErrorKind::MalformedLiteral => "E005",
            ErrorKind::InvalidOperation => "E006",
            ErrorKind::Io => "E007",
        }
    }
}

//=====================================================
// Section 2.0 - Runtime Error
//=====================================================

#[derive(Debug, Clone, PartialEq, Error)]
#[error("error at line {line}: {message}")]
pub struct RuntimeError {
    pub line: usize,
    pub kind: ErrorKind,
    pub message: String,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }

    pub fn undefined(line: usize, name: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedIdentifier,
            line,
            format!("undefined variable '{name}'"),
        )
    }

    pub fn arity(line: usize, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityMismatch,
            line,
            format!("incorrect number of arguments. expected {expected}, got {got}"),
        )
    }

    pub fn type_mismatch(line: usize, expected: &str, got: &Node) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            line,
            format!("expected {expected}, got {}", got.kind_name()),
        )
    }

    pub fn type_mismatch_message(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, line, message)
    }

    pub fn range(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeError, line, message)
    }

    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedLiteral, line, message)
    }

    pub fn invalid(line: usize, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation, line, message)
    }

    pub fn io(line: usize, err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, line, format!("i/o failure: {err}"))
    }

    pub fn code_str(&self) -> &'static str {
        self.kind.code()
    }
}

//=====================================================
// Section 3.0 - Evaluation Signals
//=====================================================

/// Non-value outcome of evaluating a node.
///
/// `Return`, `Break` and `Continue` travel outward until a function body or
/// loop intercepts them; `Error` always reaches the top-level caller.
#[derive(Debug, Clone)]
pub enum Signal {
    Return { value: Option<Node>, line: usize },
    Break { line: usize },
    Continue { line: usize },
    Error(RuntimeError),
}

impl Signal {
    /// Collapse a signal that escaped every handler into the error it represents.
    pub fn into_error(self) -> RuntimeError {
        match self {
            Signal::Error(err) => err,
            Signal::Break { line } => RuntimeError::invalid(line, "break outside of a loop"),
            Signal::Continue { line } => {
                RuntimeError::invalid(line, "continue outside of a loop")
            }
            Signal::Return { line, .. } => {
                RuntimeError::invalid(line, "return outside of a function")
            }
        }
    }
}

impl From<RuntimeError> for Signal {
    fn from(value: RuntimeError) -> Self {
        Signal::Error(value)
    }
}

pub type EvalResult<T = Node> = Result<T, Signal>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_renders_with_line_tag() {
        let err = RuntimeError::arity(7, 2, 3);
        assert_eq!(
            err.to_string(),
            "error at line 7: incorrect number of arguments. expected 2, got 3"
        );
        assert_eq!(err.code_str(), "E002");
    }

    #[test]
    fn loop_signals_become_errors_at_the_boundary() {
        let err = Signal::Break { line: 4 }.into_error();
        assert_eq!(err.to_string(), "error at line 4: break outside of a loop");
        assert_eq!(err.kind, ErrorKind::InvalidOperation);

        let err = Signal::Return {
            value: None,
            line: 2,
        }
        .into_error();
        assert_eq!(err.message, "return outside of a function");
    }
}
