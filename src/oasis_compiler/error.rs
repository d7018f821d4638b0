// Compiler Error Handling

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CompilerError {
    // Lexical errors
    LexicalError(String, usize), // message, line
    UnexpectedCharacter(char, usize),
    UnterminatedString(usize),

    // Parse errors
    ParseError(String, usize),
    ExpectedToken(String, String, usize), // expected, found, line

    // Configuration and IO errors
    ConfigError(String),
    IOError(String),
}

impl CompilerError {
    /// Lexical and parse errors are the ones counted as syntax errors
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            CompilerError::LexicalError(..)
                | CompilerError::UnexpectedCharacter(..)
                | CompilerError::UnterminatedString(..)
                | CompilerError::ParseError(..)
                | CompilerError::ExpectedToken(..)
        )
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompilerError::LexicalError(msg, line) => {
                write!(f, "Syntax error in line: {}: {}", line, msg)
            }
            CompilerError::UnexpectedCharacter(ch, line) => {
                write!(f, "Syntax error in line: {}: unexpected character '{}'", line, ch)
            }
            CompilerError::UnterminatedString(line) => {
                write!(f, "Syntax error in line: {}: unterminated string", line)
            }
            CompilerError::ParseError(msg, line) => {
                write!(f, "Syntax error in line: {}: {}", line, msg)
            }
            CompilerError::ExpectedToken(expected, found, line) => {
                write!(
                    f,
                    "Syntax error in line: {}: expected {} but found {}",
                    line, expected, found
                )
            }
            CompilerError::ConfigError(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            CompilerError::IOError(msg) => {
                write!(f, "IO error: {}", msg)
            }
        }
    }
}

impl std::error::Error for CompilerError {}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IOError(err.to_string())
    }
}

impl From<toml::de::Error> for CompilerError {
    fn from(err: toml::de::Error) -> Self {
        CompilerError::ConfigError(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    DuplicateSymbol,
    InvalidAddress,
    AddressInUse,
    InvalidConstant,
    UnresolvedIdentifier,
    OperandTypeMismatch,
    TypeMismatch,
    ArgumentTypeMismatch,
    UnknownCallee,
    ArityMismatch,
    UndefinedLabel,
    InvalidResourceId,
    JumpOutOfRange,
}

/// A recoverable error found while walking the syntax tree.
///
/// Errors tied to a statement carry its line and a compact rendering of the
/// offending source; whole-unit findings (undefined labels) carry neither.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub message: String,
    pub line: Option<usize>,
    pub context: String,
}

impl SemanticError {
    pub fn at_line(
        kind: SemanticErrorKind,
        message: impl Into<String>,
        line: usize,
        context: impl Into<String>,
    ) -> Self {
        SemanticError {
            kind,
            message: message.into(),
            line: Some(line),
            context: context.into(),
        }
    }

    pub fn unit_wide(kind: SemanticErrorKind, message: impl Into<String>) -> Self {
        SemanticError {
            kind,
            message: message.into(),
            line: None,
            context: String::new(),
        }
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "Error {} in line: {}: {}",
                self.message, line, self.context
            ),
            None => write!(f, "Error {}", self.message),
        }
    }
}

impl std::error::Error for SemanticError {}
