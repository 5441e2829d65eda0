//! # Introduction
//!
//! `wwec` compiles WWE, a small line-oriented scripting language with
//! wrestling-flavoured keywords, into C and links the result with the native C
//! toolchain.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Token Stream → Parser (+ Symbol Table) → AST → C → cc
//! ```
//!
//! 1. [`parser::lexer`] groups characters into lexemes and classifies each one
//!    with the table-driven [`parser::automaton`].
//! 2. [`parser::Parser`] validates grammar and variable usage against the
//!    scope stack in [`symbols`] while building the [`parser::ast`] in the
//!    same pass. The first error aborts with a [`CompileError`].
//! 3. [`codegen`] walks the tree and emits one C unit that targets the
//!    embedded list runtime in [`codegen::runtime`].
//! 4. [`toolchain`] writes the unit and the runtime to a temporary directory
//!    and runs the C compiler over them.
//!
//! ## Example
//!
//! ```
//! let compilation = wwec::compile("raw\nnxt x\nx = 5\nanunciar -> x <-\nsmackdown\n").unwrap();
//! assert!(compilation.c_source.contains("x = 5.0;"));
//! ```

pub mod codegen;
pub mod error;
pub mod parser;
pub mod symbols;
pub mod toolchain;

pub use error::{CompileError, CompileResult};

use codegen::CodeGenerator;
use parser::ast::Program;
use parser::lexer::{Lexer, Token};
use parser::Parser;
use symbols::SymbolTable;
use tracing::debug;

/// Everything the frontend produced for one source file
#[derive(Debug, Clone)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    /// Symbol table after the parse; every scope is archived in its history
    pub symbols: SymbolTable,
    pub c_source: String,
}

/// Split source text into classified tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    let tokens = Lexer::new(source).tokenize();
    debug!(tokens = tokens.len(), "lexed source");
    tokens
}

/// Run the whole frontend: lex, parse and generate C
pub fn compile(source: &str) -> CompileResult<Compilation> {
    let tokens = tokenize(source);

    let mut parser = Parser::from_tokens(tokens);
    let program = parser.parse_program()?;

    let c_source = CodeGenerator::new().generate(&program);
    let (tokens, symbols) = parser.into_parts();

    Ok(Compilation {
        tokens,
        program,
        symbols,
        c_source,
    })
}
