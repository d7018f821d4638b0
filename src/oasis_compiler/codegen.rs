// OASIS Code Generator
//
// Walks the syntax tree once, checking types and resolving symbols while it
// appends sized fragments to the listing. Forward jump distances of if/else
// are found by generating the branch in measuring mode first; loops patch a
// placeholder once the exit offset is known.

use crate::oasis_compiler::ast::{Declaration, GotoStmt, Item, LabelDecl, Program, Stmt};
use crate::oasis_compiler::config::CompilerConfig;
use crate::oasis_compiler::diagnostics::Diagnostics;
use crate::oasis_compiler::emitter::Emitter;
use crate::oasis_compiler::encoding::{encode_number, split_offset, EncodedNumber, OutOfRange};
use crate::oasis_compiler::error::{SemanticError, SemanticErrorKind};
use crate::oasis_compiler::labels::{LabelRegistry, LabelScope};
use crate::oasis_compiler::symbols::{Symbol, SymbolScopes, ValueType, MAX_ADDRESS};
use log::debug;

/// One dialog option, collected while its dialog is compiled
#[derive(Debug, Clone, PartialEq)]
pub struct DlgEntry {
    pub sentence: String,
    pub target_label: String,
    pub active: bool,
}

pub struct OasisCodeGen {
    pub(crate) config: CompilerConfig,
    pub(crate) emitter: Emitter,
    pub(crate) symbols: SymbolScopes,
    pub(crate) labels: LabelRegistry,
    pub(crate) dialog_options: Vec<DlgEntry>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) total_size: u32,
}

impl OasisCodeGen {
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_diagnostics(config, Diagnostics::new())
    }

    /// Continue collecting into diagnostics that already hold front-end errors
    pub fn with_diagnostics(config: CompilerConfig, diagnostics: Diagnostics) -> Self {
        OasisCodeGen {
            symbols: SymbolScopes::new(config.global_address_base, config.local_address_base),
            config,
            emitter: Emitter::new(),
            labels: LabelRegistry::new(),
            dialog_options: Vec::new(),
            diagnostics,
            total_size: 0,
        }
    }

    /// Generate the whole program, then check exported labels
    pub fn generate(&mut self, program: &Program) {
        if self.config.banner {
            self.emit(";;;;;;;;;;;;;;;;;;;;;;;;;;;;;", 0);
            self.emit("; Generated by OASIS compiler", 0);
            self.emit(";;;;;;;;;;;;;;;;;;;;;;;;;;;;;", 0);
            self.emit("", 0);
        }

        for item in &program.items {
            match item {
                Item::Global(decl) => self.declare_global(decl),
                Item::Unit(unit) => self.generate_unit(unit),
            }
        }

        self.check_exported_labels();
    }

    /// Listing, diagnostics and total resource size
    pub fn finish(self) -> (String, Diagnostics, u32) {
        (self.emitter.into_listing(), self.diagnostics, self.total_size)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    // Helpers shared by the generator modules

    pub(crate) fn emit(&mut self, text: impl Into<String>, size: u32) {
        self.emitter.emit(text, size);
    }

    /// Record a semantic error; errors found while measuring are dropped
    /// because the real pass reports them again
    pub(crate) fn report(&mut self, error: SemanticError) {
        if self.emitter.is_measuring() {
            return;
        }
        self.diagnostics.semantic(error);
    }

    pub(crate) fn report_at(
        &mut self,
        kind: SemanticErrorKind,
        message: impl Into<String>,
        line: usize,
        context: impl Into<String>,
    ) {
        self.report(SemanticError::at_line(kind, message, line, context));
    }

    /// Encode an operand whose range has already been checked
    pub(crate) fn encode_operand(value: u32) -> EncodedNumber {
        encode_number(value).unwrap_or_else(|_| EncodedNumber::wide(value))
    }

    /// Encode a relative jump distance, reporting distances that do not fit
    pub(crate) fn encode_jump(&mut self, distance: u32, line: usize, context: &str) -> EncodedNumber {
        match encode_number(distance) {
            Ok(encoded) => encoded,
            Err(_) => {
                self.report_at(
                    SemanticErrorKind::JumpOutOfRange,
                    format!("Jump distance {} is out of range", distance),
                    line,
                    context,
                );
                EncodedNumber::wide(distance)
            }
        }
    }

    /// Absolute jump target as lo, hi. Targets past 16 bits are reported and
    /// still split so the listing keeps its size.
    pub(crate) fn absolute_offset(&mut self, offset: u32, line: usize, context: &str) -> (u32, u32) {
        split_offset(offset).unwrap_or_else(|OutOfRange(value)| {
            self.report_at(
                SemanticErrorKind::JumpOutOfRange,
                format!("Jump target {} is out of range", value),
                line,
                context,
            );
            (value % 256, value / 256)
        })
    }

    /// Trailing `; source` comment, when enabled
    pub(crate) fn source_comment(&self, source: &str) -> String {
        if self.config.source_comments {
            format!("\t; {}", source)
        } else {
            String::new()
        }
    }

    pub(crate) fn reference_label(&mut self, scope: LabelScope, name: &str) {
        if self.emitter.is_measuring() {
            return;
        }
        debug!("label reference {} ({:?})", name, scope);
        self.labels.reference(scope, name);
    }

    pub(crate) fn declare_label(&mut self, scope: LabelScope, name: &str) {
        if self.emitter.is_measuring() {
            return;
        }
        debug!("label declared {} ({:?}) at offset {}", name, scope, self.emitter.byte_offset());
        self.labels.declare(scope, name);
    }

    // Declarations

    pub(crate) fn declare_global(&mut self, decl: &Declaration) {
        let context = decl.to_string();
        if self.symbols.global.contains(&decl.name) {
            self.report_at(SemanticErrorKind::DuplicateSymbol, "Redefined variable", decl.line, context);
            return;
        }

        let kind = ValueType::from(decl.decl_type);
        let address = match decl.address {
            Some(requested) if requested > MAX_ADDRESS => {
                self.report_at(SemanticErrorKind::InvalidAddress, "Invalid address", decl.line, &context);
                self.allocate_address(false, kind, decl.line, &context)
            }
            Some(requested) if self.symbols.global.is_address_used(requested) => {
                self.report_at(SemanticErrorKind::AddressInUse, "Address is in use", decl.line, &context);
                self.allocate_address(false, kind, decl.line, &context)
            }
            Some(requested) => requested,
            None => self.allocate_address(false, kind, decl.line, &context),
        };

        debug!("global {} {} at {}", kind, decl.name, address);
        self.define(false, decl, kind, address);
    }

    pub(crate) fn declare_local(&mut self, decl: &Declaration) {
        // A rejected duplicate still consumes its address
        let kind = ValueType::from(decl.decl_type);
        let address = self.allocate_address(true, kind, decl.line, &decl.to_string());

        if self.symbols.global.contains(&decl.name) {
            self.report_at(
                SemanticErrorKind::DuplicateSymbol,
                "A global symbol with the same name already exists",
                decl.line,
                decl.name.clone(),
            );
            return;
        }
        if self.symbols.local.contains(&decl.name) {
            self.report_at(SemanticErrorKind::DuplicateSymbol, "Redefined variable", decl.line, decl.name.clone());
            return;
        }

        debug!("local {} {} at {}", kind, decl.name, address);
        self.define(true, decl, kind, address);
    }

    fn allocate_address(&mut self, local: bool, kind: ValueType, line: usize, context: &str) -> u32 {
        let table = if local {
            &mut self.symbols.local
        } else {
            &mut self.symbols.global
        };
        let address = table.allocate(kind);
        if address > MAX_ADDRESS {
            self.report_at(
                SemanticErrorKind::InvalidAddress,
                format!("No free {} address left", kind),
                line,
                context,
            );
        }
        address
    }

    fn define(&mut self, local: bool, decl: &Declaration, kind: ValueType, address: u32) {
        let table = if local {
            &mut self.symbols.local
        } else {
            &mut self.symbols.global
        };
        let symbol = Symbol {
            name: decl.name.clone(),
            kind,
            address,
        };
        // Both callers check for duplicates first
        if table.define(symbol).is_err() {
            log::warn!("symbol {} defined twice", decl.name);
        }
    }

    // Statements

    pub(crate) fn generate_statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assignment(assignment) => self.generate_assignment(assignment),
            Stmt::If(if_stmt) => self.generate_if(if_stmt),
            Stmt::While(while_stmt) => self.generate_while(while_stmt),
            Stmt::DoWhile(do_while) => self.generate_do_while(do_while),
            Stmt::For(for_stmt) => self.generate_for(for_stmt),
            Stmt::Goto(goto) => self.generate_goto(goto),
            Stmt::Label(label) => self.generate_label(label),
            Stmt::Command(call) => self.generate_command(call),
            Stmt::Block(statements) => {
                for statement in statements {
                    self.generate_statement(statement);
                }
            }
        }
    }

    /// Size in bytes of `stmt` without emitting anything or touching labels
    /// and diagnostics
    pub(crate) fn measure_statement(&mut self, stmt: &Stmt) -> u32 {
        let mark = self.emitter.begin_measure();
        self.generate_statement(stmt);
        self.emitter.end_measure(mark)
    }

    fn generate_goto(&mut self, goto: &GotoStmt) {
        self.reference_label(LabelScope::Unit, &goto.label);
        self.emit(".byt SC_JUMP", 1);
        self.emit(
            format!(".word ({}-res_start)", LabelScope::Unit.render(&goto.label)),
            2,
        );
    }

    fn generate_label(&mut self, label: &LabelDecl) {
        let scope = if label.exported {
            LabelScope::Exported
        } else {
            LabelScope::Unit
        };
        self.declare_label(scope, &label.name);
        self.emit(scope.render(&label.name), 0);
    }

    fn check_exported_labels(&mut self) {
        for name in self.labels.undeclared(LabelScope::Exported) {
            debug!("exported label {} never declared", name);
            self.diagnostics.undefined_export(name);
        }
    }
}

#[cfg(test)]
#[path = "codegen_tests.rs"]
mod tests;
