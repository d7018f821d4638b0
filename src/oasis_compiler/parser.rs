// OASIS Script Recursive Descent Parser
//
// Syntax errors never stop the parse: each one is recorded and the parser
// resynchronises at the next statement or top-level unit, so a single run
// reports every syntax error and still hands a usable tree to the code
// generator.

use crate::oasis_compiler::ast::*;
use crate::oasis_compiler::error::CompilerError;
use crate::oasis_compiler::lexer::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<CompilerError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::EOF) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token {
                kind: TokenKind::EOF,
                line,
                column: 1,
            });
        }
        Parser {
            tokens,
            current: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(&mut self) -> Program {
        let mut items = Vec::new();

        while !self.is_at_end() {
            let start = self.current;
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(err) => {
                    log::debug!("PARSER: item-level error: {}", err);
                    self.errors.push(err);
                    self.synchronize_item(start);
                }
            }
        }

        Program { items }
    }

    /// Syntax errors recorded by the last `parse` call
    pub fn errors(&self) -> &[CompilerError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<CompilerError> {
        std::mem::take(&mut self.errors)
    }

    fn parse_item(&mut self) -> Result<Item, CompilerError> {
        match &self.peek().kind {
            TokenKind::Bool | TokenKind::Byte => Ok(Item::Global(self.parse_declaration(true)?)),
            TokenKind::Script => {
                self.advance();
                let id = self.consume_resource_id("script number")?;
                let body = self.parse_body()?;
                Ok(Item::Unit(Unit::Script(CodeUnit { id, body })))
            }
            TokenKind::ObjectCode => {
                self.advance();
                let id = self.consume_resource_id("object number")?;
                let body = self.parse_body()?;
                Ok(Item::Unit(Unit::ObjectCode(CodeUnit { id, body })))
            }
            TokenKind::StringPack => Ok(Item::Unit(Unit::StringPack(self.parse_string_pack()?))),
            TokenKind::Dialog => Ok(Item::Unit(Unit::Dialog(self.parse_dialog()?))),
            _ => Err(self.expected("declaration, script, objectcode, stringpack or dialog")),
        }
    }

    fn parse_declaration(&mut self, global: bool) -> Result<Declaration, CompilerError> {
        let line = self.peek().line;
        let decl_type = match self.peek().kind {
            TokenKind::Bool => DeclType::Bool,
            TokenKind::Byte => DeclType::Byte,
            _ => return Err(self.expected("'bool' or 'byte'")),
        };
        self.advance();

        let name = self.consume_identifier("variable name")?;

        let mut address = None;
        if global && self.check(&TokenKind::At) {
            self.advance();
            address = Some(self.consume_number("address")?);
        }

        self.consume(TokenKind::Semicolon, "';' after declaration")?;

        Ok(Declaration {
            name,
            decl_type,
            address,
            line,
        })
    }

    fn parse_body(&mut self) -> Result<UnitBody, CompilerError> {
        self.consume(TokenKind::LeftBrace, "'{'")?;

        let mut declarations = Vec::new();
        while self.check(&TokenKind::Bool) || self.check(&TokenKind::Byte) {
            let start = self.current;
            match self.parse_declaration(false) {
                Ok(decl) => declarations.push(decl),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize_statement(start);
                }
            }
        }

        let statements = self.parse_statement_list();
        self.consume(TokenKind::RightBrace, "'}'")?;

        Ok(UnitBody {
            declarations,
            statements,
        })
    }

    /// Statements up to (not including) the closing brace
    fn parse_statement_list(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            let start = self.current;

            if self.check(&TokenKind::Bool) || self.check(&TokenKind::Byte) {
                self.errors.push(CompilerError::ParseError(
                    "declarations must precede statements".to_string(),
                    self.peek().line,
                ));
                self.synchronize_statement(start);
                continue;
            }

            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    log::debug!("PARSER: statement-level error: {}", err);
                    self.errors.push(err);
                    self.synchronize_statement(start);
                }
            }
        }

        statements
    }

    fn parse_statement(&mut self) -> Result<Stmt, CompilerError> {
        let line = self.peek().line;

        match self.peek().kind.clone() {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Goto => {
                self.advance();
                let label = self.consume_identifier("label name after 'goto'")?;
                self.consume(TokenKind::Semicolon, "';' after goto")?;
                Ok(Stmt::Goto(GotoStmt { label, line }))
            }
            TokenKind::Export => {
                self.advance();
                let name = self.consume_identifier("label name after 'export'")?;
                self.consume(TokenKind::Colon, "':' after label")?;
                Ok(Stmt::Label(LabelDecl {
                    name,
                    exported: true,
                    line,
                }))
            }
            TokenKind::LeftBrace => {
                self.advance();
                let statements = self.parse_statement_list();
                self.consume(TokenKind::RightBrace, "'}' after block")?;
                Ok(Stmt::Block(statements))
            }
            TokenKind::Identifier(name) => match self.peek_next_kind() {
                TokenKind::Colon => {
                    self.advance();
                    self.advance();
                    Ok(Stmt::Label(LabelDecl {
                        name,
                        exported: false,
                        line,
                    }))
                }
                TokenKind::LeftParen => {
                    let call = self.parse_call()?;
                    self.consume(TokenKind::Semicolon, "';' after command")?;
                    Ok(Stmt::Command(call))
                }
                TokenKind::Equal => {
                    let assignment = self.parse_assignment()?;
                    self.consume(TokenKind::Semicolon, "';' after assignment")?;
                    Ok(Stmt::Assignment(assignment))
                }
                _ => {
                    self.advance();
                    Err(self.expected("'=', '(' or ':'"))
                }
            },
            _ => Err(self.expected("statement")),
        }
    }

    fn parse_if(&mut self) -> Result<Stmt, CompilerError> {
        let line = self.peek().line;
        self.consume(TokenKind::If, "'if'")?;
        let condition = self.parse_condition()?;
        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.check(&TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            line,
        }))
    }

    fn parse_while(&mut self) -> Result<Stmt, CompilerError> {
        let line = self.peek().line;
        self.consume(TokenKind::While, "'while'")?;
        let condition = self.parse_condition()?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While(WhileStmt {
            condition,
            body,
            line,
        }))
    }

    fn parse_do_while(&mut self) -> Result<Stmt, CompilerError> {
        let line = self.peek().line;
        self.consume(TokenKind::Do, "'do'")?;
        let body = Box::new(self.parse_statement()?);
        self.consume(TokenKind::While, "'while' after do body")?;
        let condition = self.parse_condition()?;
        self.consume(TokenKind::Semicolon, "';' after do-while")?;

        Ok(Stmt::DoWhile(DoWhileStmt {
            body,
            condition,
            line,
        }))
    }

    fn parse_for(&mut self) -> Result<Stmt, CompilerError> {
        let line = self.peek().line;
        self.consume(TokenKind::For, "'for'")?;
        self.consume(TokenKind::LeftParen, "'(' after 'for'")?;
        let init = self.parse_assignment()?;
        self.consume(TokenKind::Semicolon, "';' after for initializer")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::Semicolon, "';' after for condition")?;
        let increment = self.parse_assignment()?;
        self.consume(TokenKind::RightParen, "')' after for increment")?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For(ForStmt {
            init,
            condition,
            increment,
            body,
            line,
        }))
    }

    fn parse_condition(&mut self) -> Result<Expr, CompilerError> {
        self.consume(TokenKind::LeftParen, "'(' before condition")?;
        let condition = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "')' after condition")?;
        Ok(condition)
    }

    fn parse_assignment(&mut self) -> Result<Assignment, CompilerError> {
        let line = self.peek().line;
        let target = self.consume_identifier("variable name")?;
        self.consume(TokenKind::Equal, "'='")?;
        let value = self.parse_expression()?;

        Ok(Assignment {
            target,
            value,
            line,
        })
    }

    fn parse_call(&mut self) -> Result<Call, CompilerError> {
        let line = self.peek().line;
        let name = self.consume_identifier("command or function name")?;
        self.consume(TokenKind::LeftParen, "'('")?;

        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                args.push(self.parse_expression()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "')' after arguments")?;
        Ok(Call { name, args, line })
    }

    fn parse_string_pack(&mut self) -> Result<StringPackUnit, CompilerError> {
        self.consume(TokenKind::StringPack, "'stringpack'")?;
        let id = self.consume_resource_id("string pack number")?;
        self.consume(TokenKind::LeftBrace, "'{' after string pack number")?;

        let mut strings = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            strings.push(self.consume_string("string literal")?);
            if self.check(&TokenKind::Comma) {
                self.advance();
            }
        }

        self.consume(TokenKind::RightBrace, "'}' after string pack")?;
        Ok(StringPackUnit { id, strings })
    }

    fn parse_dialog(&mut self) -> Result<DialogUnit, CompilerError> {
        self.consume(TokenKind::Dialog, "'dialog'")?;
        let id = self.consume_resource_id("dialog number")?;
        self.consume(TokenKind::StringPack, "'stringpack' in dialog header")?;
        let string_pack = self.consume_resource_id("string pack number")?;
        self.consume(TokenKind::Script, "'script' in dialog header")?;
        let script = self.consume_resource_id("script number")?;
        self.consume(TokenKind::LeftBrace, "'{' after dialog header")?;

        let mut options = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.is_at_end() {
            options.push(self.parse_dialog_option()?);
        }

        self.consume(TokenKind::RightBrace, "'}' after dialog options")?;
        Ok(DialogUnit {
            id,
            string_pack,
            script,
            options,
        })
    }

    fn parse_dialog_option(&mut self) -> Result<DialogOption, CompilerError> {
        let line = self.peek().line;
        self.consume(TokenKind::Option, "'option'")?;
        let sentence = self.consume_string("option sentence")?;

        let active = match self.peek().kind {
            TokenKind::Active => true,
            TokenKind::Inactive => false,
            _ => return Err(self.expected("'active' or 'inactive'")),
        };
        self.advance();

        self.consume(TokenKind::Arrow, "'=>' before option label")?;
        let target_label = self.consume_identifier("option label")?;
        self.consume(TokenKind::Semicolon, "';' after dialog option")?;

        Ok(DialogOption {
            sentence,
            active,
            target_label,
            line,
        })
    }

    // Expressions, lowest precedence first

    fn parse_expression(&mut self) -> Result<Expr, CompilerError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, CompilerError> {
        let mut left = self.parse_and()?;
        while self.check(&TokenKind::Or) {
            let line = self.peek().line;
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right, line);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, CompilerError> {
        let mut left = self.parse_not()?;
        while self.check(&TokenKind::And) {
            let line = self.peek().line;
            self.advance();
            let right = self.parse_not()?;
            left = binary(BinaryOp::And, left, right, line);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, CompilerError> {
        if self.check(&TokenKind::Not) {
            let line = self.peek().line;
            self.advance();
            let operand = self.parse_not()?;
            return Ok(Expr::new(ExprKind::Not(Box::new(operand)), line));
        }
        self.parse_relational()
    }

    fn parse_relational(&mut self) -> Result<Expr, CompilerError> {
        let left = self.parse_additive()?;

        let op = match self.peek().kind {
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEqual => BinaryOp::LessEqual,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
            TokenKind::EqualEqual => BinaryOp::Equal,
            TokenKind::NotEqual => BinaryOp::NotEqual,
            _ => return Ok(left),
        };
        let line = self.peek().line;
        self.advance();
        let right = self.parse_additive()?;

        Ok(binary(op, left, right, line))
    }

    fn parse_additive(&mut self) -> Result<Expr, CompilerError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let line = self.peek().line;
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right, line);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, CompilerError> {
        let mut left = self.parse_primary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            let line = self.peek().line;
            self.advance();
            let right = self.parse_primary()?;
            left = binary(op, left, right, line);
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, CompilerError> {
        let line = self.peek().line;

        match self.peek().kind.clone() {
            TokenKind::NumberLiteral(n) => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(n), line))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::new(ExprKind::Boolean(true), line))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::new(ExprKind::Boolean(false), line))
            }
            TokenKind::Identifier(name) => {
                if self.peek_next_kind() == TokenKind::LeftParen {
                    let call = self.parse_call()?;
                    Ok(Expr::new(ExprKind::Call(call), line))
                } else {
                    self.advance();
                    Ok(Expr::new(ExprKind::Identifier(name), line))
                }
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.consume(TokenKind::RightParen, "')' after expression")?;
                Ok(Expr::new(ExprKind::Paren(Box::new(inner)), line))
            }
            _ => Err(self.expected("expression")),
        }
    }

    // Recovery

    /// Skip the rest of a broken statement: up to and including the next
    /// `;`, or up to (not including) the enclosing `}`.
    fn synchronize_statement(&mut self, start: usize) {
        if self.current == start && !self.is_at_end() {
            self.advance();
            if self.previous_kind() == Some(&TokenKind::Semicolon) {
                return;
            }
        }

        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RightBrace => return,
                _ => self.advance(),
            }
        }
    }

    /// Skip to the next token that can start a top-level item. A broken
    /// global declaration also ends at its own `;`; inside a broken unit
    /// body `bool`/`byte` are locals and do not stop the skip.
    fn synchronize_item(&mut self, start: usize) {
        let declaration = matches!(
            self.tokens.get(start).map(|t| &t.kind),
            Some(TokenKind::Bool | TokenKind::Byte)
        );
        if self.current == start && !self.is_at_end() {
            self.advance();
        }

        // Braces opened since the failing item began
        let mut depth: i32 = self.tokens[start..self.current]
            .iter()
            .map(|t| brace_delta(&t.kind))
            .sum();

        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::Script
                | TokenKind::ObjectCode
                | TokenKind::StringPack
                | TokenKind::Dialog => return,
                TokenKind::Bool | TokenKind::Byte if depth <= 0 => return,
                TokenKind::Semicolon if declaration && depth <= 0 => {
                    self.advance();
                    return;
                }
                _ => {
                    depth += brace_delta(&self.peek().kind);
                    self.advance();
                }
            }
        }
    }

    // Token helpers

    fn peek(&self) -> &Token {
        // `new` guarantees a trailing EOF, and `advance` never moves past it
        &self.tokens[self.current]
    }

    fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.current + 1)
            .map(|t| t.kind.clone())
            .unwrap_or(TokenKind::EOF)
    }

    fn previous_kind(&self) -> Option<&TokenKind> {
        self.current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| &t.kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::EOF
    }

    fn expected(&self, what: &str) -> CompilerError {
        let token = self.peek();
        CompilerError::ExpectedToken(what.to_string(), token.kind.describe(), token.line)
    }

    fn consume(&mut self, kind: TokenKind, what: &str) -> Result<(), CompilerError> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.expected(what))
        }
    }

    fn consume_identifier(&mut self, what: &str) -> Result<String, CompilerError> {
        if let TokenKind::Identifier(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.expected(what))
        }
    }

    fn consume_number(&mut self, what: &str) -> Result<u32, CompilerError> {
        if let TokenKind::NumberLiteral(n) = self.peek().kind {
            self.advance();
            Ok(n)
        } else {
            Err(self.expected(what))
        }
    }

    fn consume_resource_id(&mut self, what: &str) -> Result<ResourceId, CompilerError> {
        let line = self.peek().line;
        let value = self.consume_number(what)?;
        Ok(ResourceId { value, line })
    }

    fn consume_string(&mut self, what: &str) -> Result<String, CompilerError> {
        if let TokenKind::StringLiteral(s) = &self.peek().kind {
            let s = s.clone();
            self.advance();
            Ok(s)
        } else {
            Err(self.expected(what))
        }
    }
}

fn brace_delta(kind: &TokenKind) -> i32 {
    match kind {
        TokenKind::LeftBrace => 1,
        TokenKind::RightBrace => -1,
        _ => 0,
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr, line: usize) -> Expr {
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        line,
    )
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
