// Expression and assignment generation for OasisCodeGen
//
// Expressions are emitted in prefix order: operator first, then operands.
// Every visit returns the value type of the expression so the caller can
// check it.

use crate::oasis_compiler::ast::{Assignment, BinaryOp, Expr, ExprKind};
use crate::oasis_compiler::codegen::OasisCodeGen;
use crate::oasis_compiler::encoding::encode_number;
use crate::oasis_compiler::error::SemanticErrorKind;
use crate::oasis_compiler::symbols::ValueType;

/// Opcode text, its size, the operand type and the result type of an operator
fn operator_signature(op: BinaryOp) -> (&'static str, u32, ValueType, ValueType) {
    use ValueType::{Bool, Byte};
    match op {
        BinaryOp::Add => ("SF_ADD", 1, Byte, Byte),
        BinaryOp::Sub => ("SF_SUB", 1, Byte, Byte),
        BinaryOp::Mul => ("SF_MUL", 1, Byte, Byte),
        BinaryOp::Div => ("SF_DIV", 1, Byte, Byte),
        BinaryOp::Less => ("SF_LT", 1, Byte, Bool),
        BinaryOp::LessEqual => ("SF_LE", 1, Byte, Bool),
        BinaryOp::Greater => ("SF_GT", 1, Byte, Bool),
        BinaryOp::GreaterEqual => ("SF_GE", 1, Byte, Bool),
        BinaryOp::Equal => ("SF_EQ", 1, Byte, Bool),
        // There is no inequality opcode
        BinaryOp::NotEqual => ("SF_NOT, SF_EQ", 2, Byte, Bool),
        BinaryOp::And => ("SF_AND", 1, Bool, Bool),
        BinaryOp::Or => ("SF_OR", 1, Bool, Bool),
    }
}

fn operand_noun(operand_type: ValueType) -> &'static str {
    match operand_type {
        ValueType::Bool => "a boolean",
        _ => "a number",
    }
}

impl OasisCodeGen {
    pub(crate) fn generate_expression(&mut self, expr: &Expr) -> ValueType {
        match &expr.kind {
            ExprKind::Number(value) => {
                match encode_number(*value) {
                    Ok(encoded) => self.emit(format!(".byt {}", encoded), encoded.bytes),
                    Err(_) => self.report_at(
                        SemanticErrorKind::InvalidConstant,
                        "Invalid constant",
                        expr.line,
                        value.to_string(),
                    ),
                }
                ValueType::Byte
            }
            ExprKind::Boolean(value) => {
                self.emit(if *value { ".byt 1" } else { ".byt 0" }, 1);
                ValueType::Bool
            }
            ExprKind::Identifier(name) => self.generate_fetch(name, expr.line),
            ExprKind::Binary { op, left, right } => self.generate_binary(expr, *op, left, right),
            ExprKind::Not(operand) => {
                self.emit(".byt SF_NOT", 1);
                if self.generate_expression(operand) != ValueType::Bool {
                    self.report_at(
                        SemanticErrorKind::OperandTypeMismatch,
                        "Operand is not a boolean",
                        expr.line,
                        expr.to_string(),
                    );
                }
                ValueType::Bool
            }
            ExprKind::Call(call) => self.generate_function_call(call),
            ExprKind::Paren(inner) => self.generate_expression(inner),
        }
    }

    fn generate_binary(&mut self, expr: &Expr, op: BinaryOp, left: &Expr, right: &Expr) -> ValueType {
        let (opcode, size, operand_type, result_type) = operator_signature(op);
        self.emit(format!(".byt {}", opcode), size);

        for (side, operand) in [("Left", left), ("Right", right)] {
            if self.generate_expression(operand) != operand_type {
                self.report_at(
                    SemanticErrorKind::OperandTypeMismatch,
                    format!("{} side of operation is not {}", side, operand_noun(operand_type)),
                    expr.line,
                    expr.to_string(),
                );
            }
        }
        result_type
    }

    /// Read a variable: SF_GETVAL for bytes, SF_GETFLAG for flags
    fn generate_fetch(&mut self, name: &str, line: usize) -> ValueType {
        let (kind, address) = match self.symbols.resolve(name) {
            Some(symbol) => (symbol.kind, symbol.address),
            None => {
                self.report_at(
                    SemanticErrorKind::UnresolvedIdentifier,
                    format!("Variable not found: {}", name),
                    line,
                    name,
                );
                return ValueType::None;
            }
        };

        let opcode = if kind == ValueType::Bool {
            "SF_GETFLAG"
        } else {
            "SF_GETVAL"
        };
        let encoded = Self::encode_operand(address);
        let comment = self.source_comment(name);
        self.emit(format!(".byt {}, {}{}", opcode, encoded, comment), encoded.bytes + 1);
        kind
    }

    /// Store into a variable: SC_ASSIGN for bytes, SC_SETFLAG for flags.
    /// The store is emitted before the value, which is still emitted when its
    /// type disagrees.
    pub(crate) fn generate_assignment(&mut self, assignment: &Assignment) {
        let context = assignment.to_string();
        let (kind, address) = match self.symbols.resolve(&assignment.target) {
            Some(symbol) => (symbol.kind, symbol.address),
            None => {
                self.report_at(
                    SemanticErrorKind::UnresolvedIdentifier,
                    format!("Variable not found: {}", assignment.target),
                    assignment.line,
                    context,
                );
                return;
            }
        };

        let opcode = if kind == ValueType::Bool {
            "SC_SETFLAG"
        } else {
            "SC_ASSIGN"
        };
        let encoded = Self::encode_operand(address);
        let comment = self.source_comment(&context);
        self.emit(format!(".byt {}, {}{}", opcode, encoded, comment), encoded.bytes + 1);

        let value_type = self.generate_expression(&assignment.value);
        if value_type != kind {
            self.report_at(
                SemanticErrorKind::TypeMismatch,
                format!("Inconsistent types: {}", context),
                assignment.line,
                context,
            );
        }
    }

    /// Generate a loop or branch condition, which must be boolean
    pub(crate) fn generate_condition(&mut self, condition: &Expr, line: usize, context: &str) {
        let condition_type = self.generate_expression(condition);
        if condition_type != ValueType::Bool {
            self.report_at(
                SemanticErrorKind::TypeMismatch,
                format!("Condition is not a boolean: {}", condition),
                line,
                context,
            );
        }
    }
}
