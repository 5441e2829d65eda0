//! WWE source code parser
//!
//! This module transforms WWE source text into a statement tree:
//! - [`automaton`]: Table-driven classifier for single lexemes
//! - [`lexer`]: Line scanner and token types (source text → tokens)
//! - [`stream`]: Token vector with a backtracking cursor
//! - [`parse`]: Parser coordinator (tokens → [`ast::Program`])
//! - [`ast`]: Statement tree definitions
//!
//! # The WWE Language
//!
//! ```text
//! raw
//! nxt x
//! nexus L
//! x = promo
//! L <- x * 2
//! jeff L.last > 10
//!     anunciar -> "big" <-
//! matt
//!     anunciar -> L.last <-
//! hardy
//! smackdown
//! ```
//!
//! - Program framed by `raw` ... `smackdown`, one statement per line
//! - Scalars (`nxt`) hold floats; lists (`nexus`) are growable float arrays
//! - `promo` reads a number from standard input
//! - `jeff`/`matt`/`hardy` is if/else, `randy`/`orton` is while
//! - `#` starts a comment
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent; validation, symbol resolution and tree
//! construction happen in a single pass. The statement-level methods live in
//! `statements.rs` and the operand-level ones in `expressions.rs`.

pub mod ast;
pub mod automaton;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod stream;

pub use parse::Parser;
