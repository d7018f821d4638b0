// Control flow generation for OasisCodeGen
//
// if/else uses relative jumps whose distances are measured before the
// branches are emitted. Loops use absolute offsets from the start of the
// resource: the back jump is known when it is emitted and the exit target
// is patched into a placeholder after the body.

use crate::oasis_compiler::ast::{DoWhileStmt, ForStmt, IfStmt, WhileStmt};
use crate::oasis_compiler::codegen::OasisCodeGen;
use crate::oasis_compiler::emitter::Placeholder;
use crate::oasis_compiler::encoding::{encoded_width, forward_jump_distance};
use log::debug;

impl OasisCodeGen {
    pub(crate) fn generate_if(&mut self, stmt: &IfStmt) {
        let context = format!("if({})", stmt.condition);
        let start = self.emitter.byte_offset();

        self.emit("; if", 0);
        self.emit(".byt SC_JUMP_REL_IF, SF_NOT", 2);
        self.generate_condition(&stmt.condition, stmt.line, &context);
        let condition_size = self.emitter.byte_offset() - start;

        let then_size = self.measure_statement(&stmt.then_branch);
        let else_size = stmt
            .else_branch
            .as_ref()
            .map(|branch| self.measure_statement(branch));

        // The else skip is SC_JUMP_REL plus its own distance operand
        let skip_else = else_size.map(|size| forward_jump_distance(1 + size));
        let mut span = condition_size + then_size;
        if let Some(distance) = skip_else {
            span += 1 + encoded_width(distance);
        }
        let skip_then = forward_jump_distance(span);

        debug!(
            "if at offset {}: condition {} then {} else {:?}, jumps {} / {:?}",
            start, condition_size, then_size, else_size, skip_then, skip_else
        );

        let encoded = self.encode_jump(skip_then, stmt.line, &context);
        self.emit(format!(".byt {}", encoded), encoded.bytes);
        self.emit("; then part", 0);
        self.generate_statement(&stmt.then_branch);

        if let (Some(else_branch), Some(distance)) = (&stmt.else_branch, skip_else) {
            let encoded = self.encode_jump(distance, stmt.line, &context);
            self.emit(format!(".byt SC_JUMP_REL, {}", encoded), encoded.bytes + 1);
            self.emit("; else part", 0);
            self.generate_statement(else_branch);
        }
    }

    pub(crate) fn generate_while(&mut self, stmt: &WhileStmt) {
        let context = format!("while({})", stmt.condition);
        let loop_start = self.emitter.byte_offset();

        self.emit("; while", 0);
        self.emit(".byt SC_JUMP_IF, SF_NOT", 2);
        self.generate_condition(&stmt.condition, stmt.line, &context);
        let exit = self.emitter.placeholder(2);

        self.generate_statement(&stmt.body);

        self.emit("; end while", 0);
        self.emit_back_jump(loop_start, stmt.line, &context);
        self.patch_exit(exit, stmt.line, &context);
    }

    pub(crate) fn generate_do_while(&mut self, stmt: &DoWhileStmt) {
        let context = format!("while({})", stmt.condition);
        let loop_start = self.emitter.byte_offset();

        self.emit("; do", 0);
        self.generate_statement(&stmt.body);
        self.emit("; while", 0);
        self.emit(".byt SC_JUMP_IF", 1);
        self.generate_condition(&stmt.condition, stmt.line, &context);
        self.absolute_offset(loop_start, stmt.line, &context);
        self.emit(format!(".word {}", loop_start), 2);
    }

    pub(crate) fn generate_for(&mut self, stmt: &ForStmt) {
        let context = format!("for({};{};{})", stmt.init, stmt.condition, stmt.increment);

        self.emit("; for", 0);
        self.emit("; Init part", 0);
        self.generate_assignment(&stmt.init);

        self.emit("; Condition", 0);
        let loop_start = self.emitter.byte_offset();
        self.emit(".byt SC_JUMP_IF, SF_NOT", 2);
        self.generate_condition(&stmt.condition, stmt.line, &context);
        let exit = self.emitter.placeholder(2);

        self.emit("; for body", 0);
        self.generate_statement(&stmt.body);

        self.emit("; Increment expression", 0);
        self.generate_assignment(&stmt.increment);

        self.emit("; end for", 0);
        self.emit_back_jump(loop_start, stmt.line, &context);
        self.patch_exit(exit, stmt.line, &context);
    }

    /// Unconditional jump to an absolute offset, operand as lo, hi
    fn emit_back_jump(&mut self, target: u32, line: usize, context: &str) {
        let (lo, hi) = self.absolute_offset(target, line, context);
        self.emit(
            format!(".byt SC_JUMP, {}, {}\t; jump to {}", lo, hi, target),
            3,
        );
    }

    /// Fill a loop's exit placeholder with the current offset
    fn patch_exit(&mut self, exit: Placeholder, line: usize, context: &str) {
        let exit_offset = self.emitter.byte_offset();
        self.absolute_offset(exit_offset, line, context);
        if !self.emitter.is_measuring() {
            debug!("loop exit patched to offset {}", exit_offset);
        }
        self.emitter.patch(exit, format!(".word {}", exit_offset));
    }
}
