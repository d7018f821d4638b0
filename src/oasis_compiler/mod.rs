// OASIS Compiler Module
// Compiles OASIS adventure scripts to an assembler listing of engine bytecode

pub mod ast;
pub mod builtins;
pub mod codegen;
mod codegen_calls;
mod codegen_control;
mod codegen_expressions;
mod codegen_units;
pub mod config;
pub mod diagnostics;
pub mod emitter;
pub mod encoding;
pub mod error;
pub mod labels;
pub mod lexer;
pub mod parser;
pub mod symbols;

pub use config::CompilerConfig;
pub use diagnostics::Diagnostics;
pub use error::{CompilerError, SemanticError, SemanticErrorKind};

/// Result of compiling one source file. Compilation never stops at the first
/// error, so a listing is always produced.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub listing: String,
    pub diagnostics: Diagnostics,
    /// Bytes of every resource in the listing
    pub total_size: u32,
}

impl CompileOutput {
    pub fn exit_status(&self) -> i32 {
        self.diagnostics.exit_status()
    }

    /// Error lines followed by the summary block
    pub fn report(&self) -> Vec<String> {
        let mut lines = self.diagnostics.messages();
        lines.extend(self.diagnostics.summary(self.total_size));
        lines
    }
}

/// Main compiler structure
pub struct OasisCompiler {
    config: CompilerConfig,
}

impl Default for OasisCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl OasisCompiler {
    /// Create a compiler with the default configuration
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    pub fn with_config(config: CompilerConfig) -> Self {
        OasisCompiler { config }
    }

    /// Compile OASIS source to an assembler listing
    pub fn compile(&self, source: &str) -> CompileOutput {
        let mut diagnostics = Diagnostics::new();

        // Phase 1: Lexical Analysis
        let mut lexer = lexer::Lexer::new(source);
        let tokens = lexer.tokenize();
        for error in lexer.take_errors() {
            diagnostics.syntax(error);
        }
        log::debug!("lexed {} tokens", tokens.len());

        // Phase 2: Parsing, recovering from errors
        let mut parser = parser::Parser::new(tokens);
        let program = parser.parse();
        for error in parser.take_errors() {
            diagnostics.syntax(error);
        }
        log::debug!("parsed {} top-level items", program.items.len());

        // Phase 3: Checking and code generation
        let mut codegen = codegen::OasisCodeGen::with_diagnostics(self.config.clone(), diagnostics);
        codegen.generate(&program);
        let (listing, diagnostics, total_size) = codegen.finish();

        log::info!(
            "compiled {} bytes: {} syntax errors, {} semantic errors, {} undefined exported labels",
            total_size,
            diagnostics.syntax_errors().len(),
            diagnostics.semantic_errors().len(),
            diagnostics.undefined_exports().len()
        );

        CompileOutput {
            listing,
            diagnostics,
            total_size,
        }
    }
}
