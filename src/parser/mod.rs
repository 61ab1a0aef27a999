//=============================================
// File: parser/mod.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Glint recursive descent parser implementation
// Objective: Transform token streams into the node sequence consumed by the interpreter
//=============================================

//=============================================
//            Section 1: Imports
//=============================================

use crate::ast::{
    BinaryOperator, Node, Parameter, UnaryOperator, WhenCase, WhenSubject,
};
use crate::tokenizer::{Position, Token, TokenKind};

//=============================================
//            Section 2: Parse Errors
//=============================================

/// Parser error types
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        position: Position,
    },
    UnexpectedEndOfInput {
        expected: String,
        position: Position,
    },
    InvalidSyntax {
        message: String,
        position: Position,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEndOfInput { position, .. }
            | ParseError::InvalidSyntax { position, .. } => *position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnexpectedToken {
                expected,
                found,
                position,
            } => write!(
                f,
                "syntax error at line {}, column {}: expected {}, found {}",
                position.line, position.column, expected, found
            ),
            ParseError::UnexpectedEndOfInput { expected, position } => write!(
                f,
                "syntax error at line {}, column {}: unexpected end of input, expected {}",
                position.line, position.column, expected
            ),
            ParseError::InvalidSyntax { message, position } => write!(
                f,
                "syntax error at line {}, column {}: {}",
                position.line, position.column, message
            ),
        }
    }
}

impl std::error::Error for ParseError {}

type ParseResult<T> = Result<T, ParseError>;

//=============================================
//            Section 3: Parser State
//=============================================

/// Recursive descent parser for Glint
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

/// Limit on nested expressions, prefix operators and blocks combined.
const MAX_NESTING_DEPTH: usize = 256;

impl Parser {
    //Function: new
    //Purpose: Initialize parser with token stream and reset cursor
    //Inputs: tokens: Vec<Token>
    //Returns: Self
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let position = tokens
                .last()
                .map(|t| t.position)
                .unwrap_or(Position::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, position));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    //Function: parse
    //Purpose: Parse every top-level statement until end of input
    //Inputs: &mut self
    //Returns: ParseResult<Vec<Node>>
    pub fn parse(&mut self) -> ParseResult<Vec<Node>> {
        let mut statements = Vec::new();
        self.skip_semicolons();
        while !self.is_at_end() {
            statements.push(self.statement()?);
            self.skip_semicolons();
        }
        Ok(statements)
    }

    //=============================================
    //            Section 4: Token Navigation
    //=============================================

    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn peek_kind_at(&self, offset: usize) -> &TokenKind {
        let index = (self.current + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    /// Line of the most recently consumed token.
    fn previous_line(&self) -> usize {
        self.current
            .checked_sub(1)
            .map_or(1, |index| self.tokens[index].position.line)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(expected))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> ParseResult<(String, usize)> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let line = self.advance().position.line;
                Ok((name, line))
            }
            _ => Err(self.error_here(expected)),
        }
    }

    fn error_here(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if matches!(token.kind, TokenKind::Eof) {
            ParseError::UnexpectedEndOfInput {
                expected: expected.to_string(),
                position: token.position,
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.clone(),
                position: token.position,
            }
        }
    }

    fn skip_semicolons(&mut self) {
        while self.matches(&TokenKind::Semicolon) {}
    }

    //=============================================
    //            Section 5: Statements
    //=============================================

    fn statement(&mut self) -> ParseResult<Node> {
        let line = self.peek().position.line;
        match self.peek().kind.clone() {
            TokenKind::If => self.if_statement(),
            TokenKind::While => {
                self.advance();
                let condition = self.expression()?;
                let body = self.block()?;
                Ok(Node::while_loop(line, condition, body))
            }
            TokenKind::For => {
                self.advance();
                let (variable, _) = self.expect_identifier("loop variable")?;
                self.expect(&TokenKind::In, "'in'")?;
                let iterable = self.expression()?;
                let body = self.block()?;
                Ok(Node::for_loop(line, variable, iterable, body))
            }
            TokenKind::Break => {
                self.advance();
                Ok(Node::break_statement(line))
            }
            TokenKind::Continue => {
                self.advance();
                Ok(Node::continue_statement(line))
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.ends_statement() {
                    None
                } else {
                    Some(self.expression()?)
                };
                Ok(Node::return_statement(line, value))
            }
            TokenKind::Identifier(name) if name == "print" && self.starts_print_statement() => {
                self.advance();
                let mut arguments = Vec::new();
                if !self.ends_statement() && self.peek().position.line == line {
                    arguments.push(self.expression()?);
                    while self.matches(&TokenKind::Comma) {
                        arguments.push(self.expression()?);
                    }
                }
                Ok(Node::print(line, arguments))
            }
            TokenKind::Identifier(name) if self.peek_kind_at(1) == &TokenKind::Assign => {
                self.advance();
                self.advance();
                let value = self.expression()?;
                Ok(Node::assignment(line, name, value))
            }
            _ => self.expression(),
        }
    }

    /// `print` opens a statement only when what follows could not continue
    /// `print` as an expression (`print(..)`, `print <- ..`, `print == ..`).
    fn starts_print_statement(&self) -> bool {
        let index = (self.current + 1).min(self.tokens.len() - 1);
        let next = &self.tokens[index];
        if next.position.line != self.peek().position.line {
            return true;
        }
        matches!(
            next.kind,
            TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::Identifier(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Func
                | TokenKind::When
                | TokenKind::Minus
                | TokenKind::Not
                | TokenKind::Semicolon
                | TokenKind::RightBrace
                | TokenKind::Eof
        )
    }

    fn ends_statement(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
        )
    }

    fn if_statement(&mut self) -> ParseResult<Node> {
        let line = self.expect(&TokenKind::If, "'if'")?.position.line;
        let condition = self.expression()?;
        let consequence = self.block()?;
        let alternative = if self.matches(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                Some(vec![self.nested(Self::if_statement)?])
            } else {
                Some(self.block()?)
            }
        } else {
            None
        };
        Ok(Node::if_statement(line, condition, consequence, alternative))
    }

    fn block(&mut self) -> ParseResult<Vec<Node>> {
        self.nested(Self::block_body)
    }

    fn block_body(&mut self) -> ParseResult<Vec<Node>> {
        self.expect(&TokenKind::LeftBrace, "'{'")?;
        let mut statements = Vec::new();
        self.skip_semicolons();
        while !self.check(&TokenKind::RightBrace) {
            if self.is_at_end() {
                return Err(self.error_here("'}'"));
            }
            statements.push(self.statement()?);
            self.skip_semicolons();
        }
        self.advance();
        Ok(statements)
    }

    //=============================================
    //            Section 6: Expressions
    //=============================================

    fn expression(&mut self) -> ParseResult<Node> {
        self.nested(Self::send)
    }

    //Function: nested
    //Purpose: Run one level of recursive parsing under the shared depth limit
    //Inputs: parse: the rule to run one level deeper
    //Returns: ParseResult<T>
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::InvalidSyntax {
                message: "nesting too deep".to_string(),
                position: self.peek().position,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn send(&mut self) -> ParseResult<Node> {
        let mut expr = self.or()?;
        while self.check(&TokenKind::Send) {
            let line = self.advance().position.line;
            // `f <- (x)` always passes a one-element list, never a grouped value.
            let arguments = if self.check(&TokenKind::LeftParen) {
                let line = self.advance().position.line;
                let items = self.comma_list(&TokenKind::RightParen)?;
                Node::list(line, items)
            } else {
                self.or()?
            };
            expr = Node::binary(line, expr, BinaryOperator::Send, arguments);
        }
        Ok(expr)
    }

    fn binary_level(
        &mut self,
        operators: &[(TokenKind, BinaryOperator)],
        next: fn(&mut Self) -> ParseResult<Node>,
    ) -> ParseResult<Node> {
        let mut expr = next(self)?;
        'outer: loop {
            for (token, operator) in operators {
                if self.check(token) {
                    let line = self.advance().position.line;
                    let right = next(self)?;
                    expr = Node::binary(line, expr, *operator, right);
                    continue 'outer;
                }
            }
            return Ok(expr);
        }
    }

    fn or(&mut self) -> ParseResult<Node> {
        self.binary_level(&[(TokenKind::Or, BinaryOperator::Or)], Self::and)
    }

    fn and(&mut self) -> ParseResult<Node> {
        self.binary_level(&[(TokenKind::And, BinaryOperator::And)], Self::equality)
    }

    fn equality(&mut self) -> ParseResult<Node> {
        self.binary_level(
            &[
                (TokenKind::EqualEqual, BinaryOperator::Equal),
                (TokenKind::NotEqual, BinaryOperator::NotEqual),
            ],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> ParseResult<Node> {
        self.binary_level(
            &[
                (TokenKind::Less, BinaryOperator::Less),
                (TokenKind::Greater, BinaryOperator::Greater),
                (TokenKind::LessEqual, BinaryOperator::LessEqual),
                (TokenKind::GreaterEqual, BinaryOperator::GreaterEqual),
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> ParseResult<Node> {
        self.binary_level(
            &[
                (TokenKind::Plus, BinaryOperator::Add),
                (TokenKind::Minus, BinaryOperator::Subtract),
            ],
            Self::factor,
        )
    }

    fn factor(&mut self) -> ParseResult<Node> {
        self.binary_level(
            &[
                (TokenKind::Star, BinaryOperator::Multiply),
                (TokenKind::Slash, BinaryOperator::Divide),
                (TokenKind::Percent, BinaryOperator::Modulo),
            ],
            Self::unary,
        )
    }

    fn unary(&mut self) -> ParseResult<Node> {
        let line = self.peek().position.line;
        let operator = match self.peek().kind {
            TokenKind::Minus => UnaryOperator::Negate,
            TokenKind::Not => UnaryOperator::Not,
            _ => return self.call(),
        };
        self.advance();
        let operand = self.nested(Self::unary)?;
        Ok(Node::unary(line, operator, operand))
    }

    fn call(&mut self) -> ParseResult<Node> {
        let mut expr = self.primary()?;
        // A `(` on a later line starts a new statement rather than a call.
        while self.check(&TokenKind::LeftParen)
            && self.peek().position.line == self.previous_line()
        {
            let line = self.advance().position.line;
            let arguments = self.comma_list(&TokenKind::RightParen)?;
            expr = Node::call(line, expr, arguments);
        }
        Ok(expr)
    }

    /// Comma-separated expressions up to and including `close`; a trailing comma is allowed.
    fn comma_list(&mut self, close: &TokenKind) -> ParseResult<Vec<Node>> {
        let mut items = Vec::new();
        while !self.check(close) {
            items.push(self.expression()?);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close, &close.to_string())?;
        Ok(items)
    }

    fn primary(&mut self) -> ParseResult<Node> {
        let token = self.peek().clone();
        let line = token.position.line;
        match token.kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Node::number(line, value))
            }
            TokenKind::String(text) => {
                self.advance();
                Ok(Node::string(line, text))
            }
            TokenKind::True => {
                self.advance();
                Ok(Node::boolean(line, true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Node::boolean(line, false))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Node::identifier(line, name))
            }
            TokenKind::Func => self.function_literal(),
            TokenKind::When => self.when_expression(),
            TokenKind::LeftParen => self.parenthesized(),
            _ => Err(self.error_here("expression")),
        }
    }

    /// `()` is an empty list, `(x)` groups, `(x, ...)` builds a list.
    fn parenthesized(&mut self) -> ParseResult<Node> {
        let line = self.expect(&TokenKind::LeftParen, "'('")?.position.line;
        if self.matches(&TokenKind::RightParen) {
            return Ok(Node::list(line, Vec::new()));
        }
        let first = self.expression()?;
        if self.matches(&TokenKind::RightParen) {
            return Ok(first);
        }
        self.expect(&TokenKind::Comma, "',' or ')'")?;
        let mut items = vec![first];
        items.extend(self.comma_list(&TokenKind::RightParen)?);
        Ok(Node::list(line, items))
    }

    fn function_literal(&mut self) -> ParseResult<Node> {
        let line = self.expect(&TokenKind::Func, "'func'")?.position.line;
        self.expect(&TokenKind::LeftParen, "'('")?;
        let mut params: Vec<Parameter> = Vec::new();
        while !self.check(&TokenKind::RightParen) {
            let position = self.peek().position;
            let (name, _) = self.expect_identifier("parameter name")?;
            if params.iter().any(|param| param.name == name) {
                return Err(ParseError::InvalidSyntax {
                    message: format!("duplicate parameter '{name}'"),
                    position,
                });
            }
            let param = if self.matches(&TokenKind::Assign) {
                Parameter::with_default(name, self.expression()?)
            } else if params.iter().any(|param| param.default.is_some()) {
                return Err(ParseError::InvalidSyntax {
                    message: format!("parameter '{name}' without a default follows a defaulted one"),
                    position,
                });
            } else {
                Parameter::new(name)
            };
            params.push(param);
            if !self.matches(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen, "')'")?;
        let body = self.block()?;
        Ok(Node::function(line, params, body))
    }

    fn when_expression(&mut self) -> ParseResult<Node> {
        let line = self.expect(&TokenKind::When, "'when'")?.position.line;
        let subject = if self.check(&TokenKind::LeftBrace) {
            WhenSubject::Implicit
        } else if self.check(&TokenKind::Not) && self.peek_kind_at(1) == &TokenKind::LeftBrace {
            self.advance();
            WhenSubject::Negated
        } else {
            WhenSubject::Expression(Box::new(self.expression()?))
        };
        self.expect(&TokenKind::LeftBrace, "'{'")?;
        let mut cases = Vec::new();
        let mut otherwise = None;
        self.skip_semicolons();
        while !self.matches(&TokenKind::RightBrace) {
            if otherwise.is_none() && self.matches(&TokenKind::Is) {
                let pattern = self.expression()?;
                let body = self.block()?;
                cases.push(WhenCase { pattern, body });
            } else if otherwise.is_none() && self.matches(&TokenKind::Else) {
                otherwise = Some(self.block()?);
            } else if otherwise.is_some() {
                return Err(self.error_here("'}' after the else case"));
            } else {
                return Err(self.error_here("'is' or 'else'"));
            }
            self.skip_semicolons();
        }
        Ok(Node::when(line, subject, cases, otherwise))
    }
}
