use anyhow::{Context, Result};
use brainrot_core::executor::Interpreter;
use brainrot_core::lexer::tokenize;
use brainrot_core::parser::parse;
use brainrot_core::print::{StderrSink, StdoutSink};
use clap::Parser as ClapParser;

/// Runs a brainrot source file.
#[derive(ClapParser)]
struct Args {
    /// Path to a brainrot source file
    file_path: std::path::PathBuf,
}

fn main() -> Result<()> {
    let args: Args = Args::parse();

    let source = std::fs::read_to_string(&args.file_path)
        .with_context(|| format!("reading {}", args.file_path.display()))?;

    let tokens = match tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => return Err(e.into()),
    };

    let ast = match parse(tokens) {
        Ok(ast) => ast,
        Err(e) => return Err(e.into()),
    };

    let mut interpreter = Interpreter::new(Box::new(StdoutSink), Box::new(StderrSink));
    interpreter.run(&ast);

    Ok(())
}
