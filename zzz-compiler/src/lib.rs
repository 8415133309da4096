pub mod backend;
pub mod diagnostics;
pub mod frontend;
pub mod ir;
pub mod symbols;
pub mod tree;

use diagnostics::Diagnostics;
use frontend::parser::Parser;
use frontend::semantic::SemanticAnalyser;
use ir::tac::TacEntry;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    /// The parser hit an unrecoverable mismatch; later stages never ran.
    #[error("{}", .diagnostics.wall())]
    Aborted { diagnostics: Diagnostics },

    /// Semantic errors were recorded, so code generation was suppressed.
    #[error("{}", .diagnostics.wall())]
    Rejected { diagnostics: Diagnostics },
}

impl CompileError {
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            CompileError::Aborted { diagnostics } => diagnostics,
            CompileError::Rejected { diagnostics } => diagnostics,
        }
    }
}

/// Position of a token in the original source text, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {} | Column {}", self.line, self.column)
    }
}

/// Everything produced by a successful run: the final assembly text, the
/// intermediate three-address code it came from, and any warnings collected
/// along the way.
#[derive(Debug)]
pub struct Compilation {
    pub assembly: String,
    pub tac: Vec<TacEntry>,
    pub diagnostics: Diagnostics,
}

/// Run the frontend and lowering stages only: parse, analyse, and produce
/// the TAC stream together with any warnings collected along the way. The
/// stages run strictly in order; any recorded error stops the pipeline
/// before intermediate code is generated.
pub fn compile_to_tac(source: &str) -> Result<(Vec<TacEntry>, Diagnostics), CompileError> {
    let mut diagnostics = Diagnostics::new();

    let parsed = Parser::new(source, &mut diagnostics).parse();
    let Ok(mut parsed) = parsed else {
        return Err(CompileError::Aborted { diagnostics });
    };

    SemanticAnalyser::new(&mut parsed.tree, &mut parsed.symbols, &mut diagnostics).analyse();

    if diagnostics.has_errors() {
        return Err(CompileError::Rejected { diagnostics });
    }

    let tac = ir::generator::lower(&parsed.tree, &mut parsed.symbols);
    Ok((tac, diagnostics))
}

/// Compile source text all the way to MIPS assembly.
pub fn compile(source: &str) -> Result<Compilation, CompileError> {
    let (tac, diagnostics) = compile_to_tac(source)?;
    let assembly = backend::mips::TargetCodeGenerator::new().generate(&tac);

    Ok(Compilation {
        assembly,
        tac,
        diagnostics,
    })
}
