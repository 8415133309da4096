use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use zzz_compiler::diagnostics::Diagnostics;
use zzz_compiler::{compile, ir};

#[derive(Parser)]
#[command(name = "zzzc")]
#[command(about = "A compiler for the ZZZ language targeting MIPS assembly")]
struct Args {
    /// Path to the source file to compile
    file: PathBuf,

    /// Where the generated assembly is written
    #[arg(short, long, default_value = "a.out")]
    output: PathBuf,

    /// Print the three-address code after a successful compilation
    #[arg(long)]
    tac: bool,

    /// Print the syntax tree (debugging aid)
    #[arg(long)]
    tree: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let raw = fs::read_to_string(&args.file).with_context(|| {
        format!(
            "Bombastic side eye to your file ¬_¬: {}",
            args.file.display()
        )
    })?;
    let source = strip_comments(&raw);

    if args.tree {
        let mut diagnostics = Diagnostics::new();
        if let Ok(parsed) =
            zzz_compiler::frontend::parser::Parser::new(&source, &mut diagnostics).parse()
        {
            print!("{}", parsed.tree.render());
        }
    }

    match compile(&source) {
        Ok(compilation) => {
            println!("{}", compilation.diagnostics.wall());
            if args.tac {
                for line in ir::tac::to_lines(&compilation.tac) {
                    println!("{line}");
                }
            }
            fs::write(&args.output, compilation.assembly)
                .with_context(|| format!("failed to write {}", args.output.display()))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", err.diagnostics().wall());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Strip `//` line comments before lexing, preserving newlines so reported
/// source locations stay true.
fn strip_comments(source: &str) -> String {
    source
        .lines()
        .map(|line| match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
