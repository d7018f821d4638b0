// Abstract Syntax Tree definitions for OASIS script

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Global(Declaration),
    Unit(Unit),
}

// Top-level units
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Script(CodeUnit),
    ObjectCode(CodeUnit),
    StringPack(StringPackUnit),
    Dialog(DialogUnit),
}

/// A resource number as written in the source, validated during code generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceId {
    pub value: u32,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeUnit {
    pub id: ResourceId,
    pub body: UnitBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitBody {
    pub declarations: Vec<Declaration>,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringPackUnit {
    pub id: ResourceId,
    pub strings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogUnit {
    pub id: ResourceId,
    pub string_pack: ResourceId,
    pub script: ResourceId,
    pub options: Vec<DialogOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogOption {
    pub sentence: String,
    pub active: bool,
    pub target_label: String,
    pub line: usize,
}

// Declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclType {
    Bool,
    Byte,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub decl_type: DeclType,
    /// Fixed address requested with `@ n` (globals only)
    pub address: Option<u32>,
    pub line: usize,
}

// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assignment(Assignment),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    Goto(GotoStmt),
    Label(LabelDecl),
    Command(Call),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub value: Expr,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Box<Stmt>,
    pub condition: Expr,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Assignment,
    pub condition: Expr,
    pub increment: Assignment,
    pub body: Box<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GotoStmt {
    pub label: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelDecl {
    pub name: String,
    pub exported: bool,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
    pub line: usize,
}

// Expressions
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(u32),
    Boolean(bool),
    Identifier(String),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Call(Call),
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind, line: usize) -> Self {
        Expr { kind, line }
    }
}

// Compact source renderings, without whitespace, used as diagnostic context
// and as trailing comments in the listing.

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => write!(f, "{}", n),
            ExprKind::Boolean(b) => write!(f, "{}", b),
            ExprKind::Identifier(name) => write!(f, "{}", name),
            ExprKind::Binary { op, left, right } => {
                write!(f, "{}{}{}", left, op.symbol(), right)
            }
            ExprKind::Not(inner) => write!(f, "!{}", inner),
            ExprKind::Call(call) => write!(f, "{}", call),
            ExprKind::Paren(inner) => write!(f, "({})", inner),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.target, self.value)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let keyword = match self.decl_type {
            DeclType::Bool => "bool",
            DeclType::Byte => "byte",
        };
        write!(f, "{} {}", keyword, self.name)?;
        if let Some(address) = self.address {
            write!(f, "@{}", address)?;
        }
        Ok(())
    }
}
