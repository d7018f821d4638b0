// Top-level unit generation for OasisCodeGen
//
// Every unit becomes one resource block:
//
//     .(
//     .byt RESOURCE_<KIND>[|$80]
//     .word (res_end-res_start +4)
//     .byt <id>
//     res_start
//     ...
//     res_end
//     .)
//
// The header lines count no bytes; the byte offset covers the body only.

use crate::oasis_compiler::ast::{CodeUnit, DialogOption, DialogUnit, ResourceId, Stmt, StringPackUnit, Unit, UnitBody};
use crate::oasis_compiler::builtins::verb_opcode;
use crate::oasis_compiler::codegen::{DlgEntry, OasisCodeGen};
use crate::oasis_compiler::error::{SemanticError, SemanticErrorKind};
use crate::oasis_compiler::labels::LabelScope;
use indexmap::IndexSet;
use log::debug;

/// Ids from this value up are flagged with the high bit of the kind byte
const HIGH_RESOURCE_ID: u32 = 200;
const MAX_RESOURCE_ID: u32 = 255;

impl OasisCodeGen {
    pub(crate) fn generate_unit(&mut self, unit: &Unit) {
        match unit {
            Unit::Script(script) => self.generate_script(script),
            Unit::ObjectCode(object) => self.generate_object_code(object),
            Unit::StringPack(pack) => self.generate_string_pack(pack),
            Unit::Dialog(dialog) => self.generate_dialog(dialog),
        }
    }

    fn generate_script(&mut self, unit: &CodeUnit) {
        let id = self.check_resource_id(unit.id, "Script", &format!("script {}", unit.id.value));
        debug!("script {} begins", id);

        self.emitter.reset_offset();
        self.emit_resource_header(format!("; Script {}", id), "RESOURCE_SCRIPT", id);
        // Dialogs address their option targets from here
        self.emit(format!("+script_{}_start", id), 0);

        self.generate_body(&unit.body);

        self.emit(".byt SC_STOP_SCRIPT", 1);
        self.emit_resource_end();
        self.finish_unit(&format!("script {}", id));
    }

    /// Object code starts with a response table mapping each verb label of
    /// the unit to its offset, terminated by $ff
    fn generate_object_code(&mut self, unit: &CodeUnit) {
        let id = self.check_resource_id(unit.id, "Object", &format!("objectcode {}", unit.id.value));
        debug!("object code {} begins", id);

        self.emitter.reset_offset();
        self.emit_resource_header(format!("; Object Code {}", id), "RESOURCE_OBJECTCODE", id);

        self.emit("; Response table", 0);
        for (verb, opcode) in collect_verb_labels(&unit.body.statements) {
            self.emit(
                format!(".byt {}\n.word ({}-res_start)", opcode, LabelScope::Unit.render(&verb)),
                3,
            );
        }
        self.emit(".byt $ff ; End of response table", 1);

        self.generate_body(&unit.body);

        self.emit(".byt SC_STOP_SCRIPT", 1);
        self.emit_resource_end();
        self.finish_unit(&format!("object code {}", id));
    }

    fn generate_string_pack(&mut self, pack: &StringPackUnit) {
        let id = self.check_resource_id(pack.id, "String pack", &format!("stringpack {}", pack.id.value));
        debug!("string pack {} with {} strings", id, pack.strings.len());

        self.emitter.reset_offset();
        self.emit_string_pack(format!("; String pack {}", id), id, &pack.strings);
        self.finish_unit(&format!("string pack {}", id));
    }

    /// A dialog resource followed by the string pack holding its sentences
    fn generate_dialog(&mut self, dialog: &DialogUnit) {
        let context = format!(
            "dialog {} stringpack {} script {}",
            dialog.id.value, dialog.string_pack.value, dialog.script.value
        );
        let id = self.check_resource_id(dialog.id, "Dialog", &context);
        let string_pack = self.check_resource_id(dialog.string_pack, "Stringpack", &context);
        let script = self.check_resource_id(dialog.script, "Script", &context);
        debug!("dialog {} with {} options", id, dialog.options.len());

        self.dialog_options.clear();
        self.emitter.reset_offset();
        self.emit_resource_header(format!("; Dialog {}", id), "RESOURCE_DIALOG", id);
        self.emit(format!(".byt {}\t; Stringpack with options", string_pack), 1);
        self.emit(format!(".byt {}\t; Script with response actions", script), 1);

        for option in &dialog.options {
            self.generate_dialog_option(option);
        }

        let count = self.dialog_options.len() as u32;
        let mut flags: Vec<&str> = self
            .dialog_options
            .iter()
            .map(|option| if option.active { "1" } else { "0" })
            .collect();
        flags.push("$ff");
        let flags_line = format!(".byt {}\t; Active flags", flags.join(","));
        self.emit(flags_line, count + 1);

        if count > 0 {
            let targets: Vec<String> = self
                .dialog_options
                .iter()
                .map(|option| {
                    format!(
                        "({}-script_{}_start)",
                        LabelScope::Unit.render(&option.target_label),
                        script
                    )
                })
                .collect();
            self.emit(format!(".word {}\t; Jump labels", targets.join(",")), count * 2);
        }

        self.emit_resource_end();
        self.finish_unit(&format!("dialog {}", id));

        let sentences: Vec<String> = self
            .dialog_options
            .iter()
            .map(|option| option.sentence.clone())
            .collect();
        self.emitter.reset_offset();
        self.emit_string_pack(format!("; String pack for dialog {}", id), string_pack, &sentences);
        self.finish_unit(&format!("string pack {}", string_pack));
    }

    /// The target label must be exported by some script
    fn generate_dialog_option(&mut self, option: &DialogOption) {
        self.reference_label(LabelScope::Exported, &option.target_label);
        self.dialog_options.push(DlgEntry {
            sentence: option.sentence.clone(),
            target_label: option.target_label.clone(),
            active: option.active,
        });
    }

    fn generate_body(&mut self, body: &UnitBody) {
        for decl in &body.declarations {
            self.declare_local(decl);
        }
        for stmt in &body.statements {
            self.generate_statement(stmt);
        }
    }

    fn emit_string_pack(&mut self, comment: String, id: u32, strings: &[String]) {
        self.emit_resource_header(comment, "RESOURCE_STRING", id);
        for (index, text) in strings.iter().enumerate() {
            let (literal, size) = asc_literal(text);
            self.emit(format!(".asc {},0 ; String {}", literal, index), size);
        }
        self.emit_resource_end();
    }

    fn emit_resource_header(&mut self, comment: String, kind: &str, id: u32) {
        self.emit("", 0);
        self.emit(comment, 0);
        self.emit(".(", 0);
        if id >= HIGH_RESOURCE_ID {
            self.emit(format!(".byt {}|$80", kind), 0);
        } else {
            self.emit(format!(".byt {}", kind), 0);
        }
        self.emit(".word (res_end-res_start +4)", 0);
        self.emit(format!(".byt {}", id), 0);
        self.emit("res_start", 0);
    }

    fn emit_resource_end(&mut self) {
        self.emit("res_end", 0);
        self.emit(".)", 0);
    }

    fn check_resource_id(&mut self, id: ResourceId, what: &str, context: &str) -> u32 {
        if id.value > MAX_RESOURCE_ID {
            self.report_at(
                SemanticErrorKind::InvalidResourceId,
                format!("Invalid {} ID", what),
                id.line,
                context,
            );
        }
        id.value
    }

    /// Close the current unit: add its size to the total, report unit labels
    /// never declared and forget everything local to the unit
    fn finish_unit(&mut self, unit_name: &str) {
        let unit_size = self.emitter.byte_offset();
        self.total_size += unit_size;
        debug!("{} ends: {} bytes, {} in total", unit_name, unit_size, self.total_size);

        for label in self.labels.undeclared(LabelScope::Unit) {
            self.report(SemanticError::unit_wide(
                SemanticErrorKind::UndefinedLabel,
                format!("Undefined label {} in {}", label, unit_name),
            ));
        }
        self.labels.clear_unit();
        self.symbols.clear_local();
    }
}

/// Verb labels declared anywhere in the unit, in declaration order, with
/// their opcodes. Exported labels are not part of the response table.
fn collect_verb_labels(statements: &[Stmt]) -> Vec<(String, &'static str)> {
    fn scan(stmt: &Stmt, found: &mut IndexSet<String>) {
        match stmt {
            Stmt::Label(label) if !label.exported && verb_opcode(&label.name).is_some() => {
                found.insert(label.name.clone());
            }
            Stmt::If(if_stmt) => {
                scan(&if_stmt.then_branch, found);
                if let Some(else_branch) = &if_stmt.else_branch {
                    scan(else_branch, found);
                }
            }
            Stmt::While(while_stmt) => scan(&while_stmt.body, found),
            Stmt::DoWhile(do_while) => scan(&do_while.body, found),
            Stmt::For(for_stmt) => scan(&for_stmt.body, found),
            Stmt::Block(inner) => {
                for stmt in inner {
                    scan(stmt, found);
                }
            }
            _ => {}
        }
    }

    let mut found = IndexSet::new();
    for stmt in statements {
        scan(stmt, &mut found);
    }
    found
        .into_iter()
        .filter_map(|name| verb_opcode(&name).map(|opcode| (name, opcode)))
        .collect()
}

/// Render `text` as the operand of `.asc`, returning it with its size in
/// bytes including the zero terminator. Double quotes and control
/// characters cannot appear inside an assembler string, so they are
/// written as numeric bytes between quoted runs.
fn asc_literal(text: &str) -> (String, u32) {
    let mut parts: Vec<String> = Vec::new();
    let mut run = String::new();
    for ch in text.chars() {
        if ch == '"' || ch.is_control() {
            if !run.is_empty() {
                parts.push(format!("\"{}\"", run));
                run.clear();
            }
            parts.push((ch as u32).to_string());
        } else {
            run.push(ch);
        }
    }
    if !run.is_empty() || parts.is_empty() {
        parts.push(format!("\"{}\"", run));
    }
    (parts.join(","), text.len() as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asc_literal_plain() {
        assert_eq!(asc_literal("Hello"), ("\"Hello\"".to_string(), 6));
        assert_eq!(asc_literal(""), ("\"\"".to_string(), 1));
    }

    #[test]
    fn test_asc_literal_quotes_and_newlines() {
        assert_eq!(
            asc_literal("Say \"hi\""),
            ("\"Say \",34,\"hi\",34".to_string(), 9)
        );
        assert_eq!(asc_literal("a\nb"), ("\"a\",10,\"b\"".to_string(), 4));
    }
}
