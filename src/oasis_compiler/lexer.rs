// OASIS Script Lexer
// Tokenizes OASIS script source into a stream of tokens

use crate::oasis_compiler::error::CompilerError;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    StringLiteral(String),
    NumberLiteral(u32),
    Identifier(String),

    // Keywords
    Script,
    ObjectCode,
    StringPack,
    Dialog,
    Bool,
    Byte,
    If,
    Else,
    While,
    Do,
    For,
    Goto,
    Export,
    True,
    False,
    Option,
    Active,
    Inactive,

    // Symbols
    LeftBrace,  // {
    RightBrace, // }
    LeftParen,  // (
    RightParen, // )
    Semicolon,  // ;
    Colon,      // :
    Comma,      // ,
    At,         // @
    Arrow,      // =>

    // Operators
    Equal,        // =
    EqualEqual,   // ==
    NotEqual,     // !=
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    And,          // &&
    Or,           // ||
    Not,          // !

    EOF,
}

impl TokenKind {
    /// Short human-readable form used in syntax error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::StringLiteral(s) => format!("string \"{}\"", s),
            TokenKind::NumberLiteral(n) => format!("number {}", n),
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::EOF => "end of input".to_string(),
            other => format!("{:?}", other),
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    current_char: Option<char>,
    errors: Vec<CompilerError>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Lexer {
            input: chars,
            position: 0,
            line: 1,
            column: 1,
            current_char,
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole input. Malformed input is recorded as a syntax
    /// error and skipped, so the token stream always ends with `EOF`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            match self.next_token() {
                Ok(token) => {
                    let at_end = token.kind == TokenKind::EOF;
                    tokens.push(token);
                    if at_end {
                        break;
                    }
                }
                Err(err) => {
                    log::debug!("LEXER: recovering from {}", err);
                    self.errors.push(err);
                }
            }
        }

        tokens
    }

    /// Syntax errors found by the last `tokenize` call
    pub fn errors(&self) -> &[CompilerError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<CompilerError> {
        std::mem::take(&mut self.errors)
    }

    fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_whitespace_and_comments()?;

        let start_line = self.line;
        let start_column = self.column;

        let ch = match self.current_char {
            None => {
                return Ok(Token {
                    kind: TokenKind::EOF,
                    line: start_line,
                    column: start_column,
                })
            }
            Some(ch) => ch,
        };

        let token_kind = match ch {
            // Single character tokens
            '{' => self.single(TokenKind::LeftBrace),
            '}' => self.single(TokenKind::RightBrace),
            '(' => self.single(TokenKind::LeftParen),
            ')' => self.single(TokenKind::RightParen),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '@' => self.single(TokenKind::At),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),

            // Multi-character operators
            '=' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    TokenKind::EqualEqual
                } else if self.current_char == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    TokenKind::NotEqual
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '&' => {
                self.advance();
                if self.current_char == Some('&') {
                    self.advance();
                    TokenKind::And
                } else {
                    return Err(CompilerError::UnexpectedCharacter('&', start_line));
                }
            }
            '|' => {
                self.advance();
                if self.current_char == Some('|') {
                    self.advance();
                    TokenKind::Or
                } else {
                    return Err(CompilerError::UnexpectedCharacter('|', start_line));
                }
            }

            // String literals
            '"' => {
                self.advance();
                TokenKind::StringLiteral(self.read_string(start_line)?)
            }

            // Numbers
            ch if ch.is_ascii_digit() => TokenKind::NumberLiteral(self.read_number()?),

            // Identifiers and keywords
            ch if ch.is_alphabetic() || ch == '_' => {
                let identifier = self.read_identifier();
                self.keyword_or_identifier(identifier)
            }

            // Unexpected character
            ch => {
                self.advance();
                return Err(CompilerError::UnexpectedCharacter(ch, start_line));
            }
        };

        Ok(Token {
            kind: token_kind,
            line: start_line,
            column: start_column,
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        if let Some('\n') = self.current_char {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), CompilerError> {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_next() == Some('/') {
                self.skip_line_comment();
            } else if ch == '/' && self.peek_next() == Some('*') {
                self.skip_block_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.current_char {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), CompilerError> {
        let start_line = self.line;
        // Consume "/*"
        self.advance();
        self.advance();

        while let Some(ch) = self.current_char {
            if ch == '*' && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(CompilerError::LexicalError(
            "unterminated block comment".to_string(),
            start_line,
        ))
    }

    fn read_string(&mut self, start_line: usize) -> Result<String, CompilerError> {
        let mut value = String::new();

        while let Some(ch) = self.current_char {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(value);
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    match self.current_char {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some(other) => value.push(other),
                        None => break,
                    }
                    self.advance();
                }
                ch => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        Err(CompilerError::UnterminatedString(start_line))
    }

    fn read_number(&mut self) -> Result<u32, CompilerError> {
        let line = self.line;
        let mut value = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        value
            .parse::<u32>()
            .map_err(|_| CompilerError::LexicalError(format!("invalid number {}", value), line))
    }

    fn read_identifier(&mut self) -> String {
        let mut value = String::new();

        while let Some(ch) = self.current_char {
            if ch.is_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        value
    }

    fn keyword_or_identifier(&self, identifier: String) -> TokenKind {
        match identifier.as_str() {
            "script" => TokenKind::Script,
            "objectcode" => TokenKind::ObjectCode,
            "stringpack" => TokenKind::StringPack,
            "dialog" => TokenKind::Dialog,
            "bool" => TokenKind::Bool,
            "byte" => TokenKind::Byte,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "goto" => TokenKind::Goto,
            "export" => TokenKind::Export,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "option" => TokenKind::Option,
            "active" => TokenKind::Active,
            "inactive" => TokenKind::Inactive,
            _ => TokenKind::Identifier(identifier),
        }
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
