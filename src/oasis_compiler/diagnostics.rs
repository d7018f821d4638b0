// Diagnostics collector
//
// Nothing here aborts compilation. Errors are recorded in the order they are
// found and rendered to stderr by the caller.

use crate::oasis_compiler::error::{CompilerError, SemanticError};

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    syntax_errors: Vec<CompilerError>,
    semantic_errors: Vec<SemanticError>,
    undefined_exports: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn syntax(&mut self, error: CompilerError) {
        log::debug!("syntax error: {}", error);
        self.syntax_errors.push(error);
    }

    pub fn semantic(&mut self, error: SemanticError) {
        log::debug!("semantic error ({:?}): {}", error.kind, error);
        self.semantic_errors.push(error);
    }

    pub fn undefined_export(&mut self, name: impl Into<String>) {
        self.undefined_exports.push(name.into());
    }

    pub fn syntax_errors(&self) -> &[CompilerError] {
        &self.syntax_errors
    }

    pub fn semantic_errors(&self) -> &[SemanticError] {
        &self.semantic_errors
    }

    pub fn undefined_exports(&self) -> &[String] {
        &self.undefined_exports
    }

    pub fn error_count(&self) -> usize {
        self.syntax_errors.len() + self.semantic_errors.len() + self.undefined_exports.len()
    }

    /// Process exit status: the number of errors of every kind
    pub fn exit_status(&self) -> i32 {
        i32::try_from(self.error_count()).unwrap_or(i32::MAX)
    }

    /// One line per recorded error, syntax errors first
    pub fn messages(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.error_count());
        lines.extend(self.syntax_errors.iter().map(|e| e.to_string()));
        lines.extend(self.semantic_errors.iter().map(|e| e.to_string()));
        lines.extend(
            self.undefined_exports
                .iter()
                .map(|name| format!("Undefined global label {}", name)),
        );
        lines
    }

    pub fn summary(&self, total_size: u32) -> Vec<String> {
        vec![
            "=============".to_string(),
            format!("Syntax Errors: {}", self.syntax_errors.len()),
            format!("Semantic errors: {}", self.semantic_errors.len()),
            format!("Undefined symbols:{}", self.undefined_exports.len()),
            format!("Script bytecode size is: {} bytes", total_size),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oasis_compiler::error::SemanticErrorKind;

    #[test]
    fn test_counts_and_exit_status() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.error_count(), 0);
        assert_eq!(diagnostics.exit_status(), 0);

        diagnostics.syntax(CompilerError::ParseError("expected ';'".to_string(), 4));
        diagnostics.semantic(SemanticError::at_line(
            SemanticErrorKind::UnknownCallee,
            "Unknown command",
            7,
            "scFly()",
        ));
        diagnostics.undefined_export("greet");

        assert_eq!(diagnostics.exit_status(), 3);
    }

    #[test]
    fn test_messages_and_summary() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.semantic(SemanticError::unit_wide(
            SemanticErrorKind::UndefinedLabel,
            "Undefined label end in script 3",
        ));
        diagnostics.undefined_export("greet");

        assert_eq!(
            diagnostics.messages(),
            vec![
                "Error Undefined label end in script 3".to_string(),
                "Undefined global label greet".to_string(),
            ]
        );
        assert_eq!(
            diagnostics.summary(42),
            vec![
                "=============",
                "Syntax Errors: 0",
                "Semantic errors: 1",
                "Undefined symbols:1",
                "Script bytecode size is: 42 bytes",
            ]
        );
    }
}
