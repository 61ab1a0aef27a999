//=====================================================
// File: tokenizer/mod.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Glint lexical tokenizer
// Objective: Turn source text into a flat token stream with line/column
//            positions for the parser and for diagnostics
//=====================================================

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents the position of a token in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// All token types in Glint
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    String(String),
    Identifier(String),

    // Keywords
    Func,
    If,
    Else,
    When,
    Is,
    Not,
    While,
    For,
    In,
    Break,
    Continue,
    Return,
    True,
    False,
    And,
    Or,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    EqualEqual,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Send,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::String(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::Eof => f.write_str("end of input"),
            other => {
                let text = match other {
                    TokenKind::Func => "func",
                    TokenKind::If => "if",
                    TokenKind::Else => "else",
                    TokenKind::When => "when",
                    TokenKind::Is => "is",
                    TokenKind::Not => "not",
                    TokenKind::While => "while",
                    TokenKind::For => "for",
                    TokenKind::In => "in",
                    TokenKind::Break => "break",
                    TokenKind::Continue => "continue",
                    TokenKind::Return => "return",
                    TokenKind::True => "true",
                    TokenKind::False => "false",
                    TokenKind::And => "and",
                    TokenKind::Or => "or",
                    TokenKind::Plus => "+",
                    TokenKind::Minus => "-",
                    TokenKind::Star => "*",
                    TokenKind::Slash => "/",
                    TokenKind::Percent => "%",
                    TokenKind::Assign => "=",
                    TokenKind::EqualEqual => "==",
                    TokenKind::NotEqual => "!=",
                    TokenKind::Less => "<",
                    TokenKind::Greater => ">",
                    TokenKind::LessEqual => "<=",
                    TokenKind::GreaterEqual => ">=",
                    TokenKind::Send => "<-",
                    TokenKind::LeftParen => "(",
                    TokenKind::RightParen => ")",
                    TokenKind::LeftBrace => "{",
                    TokenKind::RightBrace => "}",
                    TokenKind::Comma => ",",
                    TokenKind::Semicolon => ";",
                    _ => "?",
                };
                write!(f, "'{text}'")
            }
        }
    }
}

/// A token with its kind and position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenizeError {
    #[error("unexpected character '{found}' at line {}, column {}", .position.line, .position.column)]
    UnexpectedCharacter { found: char, position: Position },
    #[error("unterminated string starting at line {}, column {}", .position.line, .position.column)]
    UnterminatedString { position: Position },
    #[error("unknown escape '\\{found}' at line {}, column {}", .position.line, .position.column)]
    UnknownEscape { found: char, position: Position },
    #[error("'!' must be followed by '=' at line {}, column {}", .position.line, .position.column)]
    LoneBang { position: Position },
}

/// Tokenizer for Glint
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    keywords: HashMap<&'static str, TokenKind>,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        let keywords = HashMap::from([
            ("func", TokenKind::Func),
            ("if", TokenKind::If),
            ("else", TokenKind::Else),
            ("when", TokenKind::When),
            ("is", TokenKind::Is),
            ("not", TokenKind::Not),
            ("while", TokenKind::While),
            ("for", TokenKind::For),
            ("in", TokenKind::In),
            ("break", TokenKind::Break),
            ("continue", TokenKind::Continue),
            ("return", TokenKind::Return),
            ("true", TokenKind::True),
            ("false", TokenKind::False),
            ("and", TokenKind::And),
            ("or", TokenKind::Or),
        ]);
        Self {
            input: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords,
        }
    }

    //Function: tokenize
    //Purpose: Scan the whole input, always ending the stream with Eof
    //Inputs: &mut self
    //Returns: Result<Vec<Token>, TokenizeError>
    pub fn tokenize(&mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let start = Position::new(self.line, self.column);
            let Some(ch) = self.advance() else {
                tokens.push(Token::new(TokenKind::Eof, start));
                return Ok(tokens);
            };
            let kind = match ch {
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '=' if self.eat('=') => TokenKind::EqualEqual,
                '=' => TokenKind::Assign,
                '!' if self.eat('=') => TokenKind::NotEqual,
                '!' => return Err(TokenizeError::LoneBang { position: start }),
                '<' if self.eat('-') => TokenKind::Send,
                '<' if self.eat('=') => TokenKind::LessEqual,
                '<' => TokenKind::Less,
                '>' if self.eat('=') => TokenKind::GreaterEqual,
                '>' => TokenKind::Greater,
                '"' => self.string(start)?,
                c if c.is_ascii_digit() => self.number(c),
                c if c.is_alphabetic() || c == '_' => self.identifier(c),
                found => {
                    return Err(TokenizeError::UnexpectedCharacter {
                        found,
                        position: start,
                    });
                }
            };
            tokens.push(Token::new(kind, start));
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_next() == Some('/') {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn number(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            text.push(ch);
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            text.push('.');
            self.advance();
            while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
                text.push(ch);
                self.advance();
            }
        }
        // Digits with at most one interior '.' always parse.
        TokenKind::Number(text.parse().unwrap_or_default())
    }

    fn identifier(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        while let Some(ch) = self.peek().filter(|c| c.is_alphanumeric() || *c == '_') {
            text.push(ch);
            self.advance();
        }
        match self.keywords.get(text.as_str()) {
            Some(keyword) => keyword.clone(),
            None => TokenKind::Identifier(text),
        }
    }

    fn string(&mut self, start: Position) -> Result<TokenKind, TokenizeError> {
        let mut text = String::new();
        loop {
            let escape_position = Position::new(self.line, self.column);
            match self.advance() {
                None => return Err(TokenizeError::UnterminatedString { position: start }),
                Some('"') => return Ok(TokenKind::String(text)),
                Some('\\') => {
                    let escaped = match self.advance() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some(found) => {
                            return Err(TokenizeError::UnknownEscape {
                                found,
                                position: escape_position,
                            });
                        }
                        None => return Err(TokenizeError::UnterminatedString { position: start }),
                    };
                    text.push(escaped);
                }
                Some(ch) => text.push(ch),
            }
        }
    }
}
