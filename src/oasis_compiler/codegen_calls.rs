// Builtin command and function calls for OasisCodeGen

use crate::oasis_compiler::ast::{Call, ExprKind};
use crate::oasis_compiler::builtins::{lookup_command, lookup_function, Builtin};
use crate::oasis_compiler::codegen::OasisCodeGen;
use crate::oasis_compiler::error::SemanticErrorKind;
use crate::oasis_compiler::labels::LabelScope;
use crate::oasis_compiler::symbols::ValueType;

impl OasisCodeGen {
    /// A function call inside an expression. Returns the declared return type
    /// even when the arguments are wrong.
    pub(crate) fn generate_function_call(&mut self, call: &Call) -> ValueType {
        let Some(function) = lookup_function(&call.name) else {
            self.report_at(
                SemanticErrorKind::UnknownCallee,
                "Unknown function",
                call.line,
                call.to_string(),
            );
            return ValueType::None;
        };
        self.generate_builtin_call(call, function);
        function.return_type
    }

    /// A command used as a statement
    pub(crate) fn generate_command(&mut self, call: &Call) {
        let Some(command) = lookup_command(&call.name) else {
            self.report_at(
                SemanticErrorKind::UnknownCallee,
                "Unknown command",
                call.line,
                call.to_string(),
            );
            return;
        };
        self.generate_builtin_call(call, command);
    }

    fn generate_builtin_call(&mut self, call: &Call, builtin: &Builtin) {
        if call.args.len() != builtin.arity() {
            self.report_at(
                SemanticErrorKind::ArityMismatch,
                "Wrong number of arguments",
                call.line,
                call.to_string(),
            );
            return;
        }

        self.emit(format!(".byt {}", builtin.opcode), 1);

        for (position, (arg, param)) in call.args.iter().zip(&builtin.params).enumerate() {
            if *param == ValueType::Word {
                // Word parameters name a label of the current unit
                match &arg.kind {
                    ExprKind::Identifier(label) => {
                        self.reference_label(LabelScope::Unit, label);
                        self.emit(
                            format!(".word ({}-res_start)", LabelScope::Unit.render(label)),
                            2,
                        );
                    }
                    _ => self.report_argument_mismatch(call, position),
                }
            } else if self.generate_expression(arg) != *param {
                self.report_argument_mismatch(call, position);
            }
        }
    }

    fn report_argument_mismatch(&mut self, call: &Call, position: usize) {
        self.report_at(
            SemanticErrorKind::ArgumentTypeMismatch,
            format!("Argument at position {} has wrong type", position),
            call.line,
            call.to_string(),
        );
    }
}
