// oasis-compiler - OASIS script compiler
// Reads a script from stdin, writes the assembler listing to stdout and the
// diagnostics to stderr. The exit status is the number of errors found.

use std::io::{self, Read};
use std::process;

use oasis::oasis_compiler::{CompilerConfig, OasisCompiler};

fn main() {
    // Initialize logging
    env_logger::init();

    let config = match CompilerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error reading standard input: {}", e);
        process::exit(1);
    }

    let compiler = OasisCompiler::with_config(config);
    let output = compiler.compile(&source);

    print!("{}", output.listing);
    for line in output.report() {
        eprintln!("{}", line);
    }

    process::exit(output.exit_status());
}
