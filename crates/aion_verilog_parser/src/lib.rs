//! Hand-rolled recursive descent parser for Verilog-2005.
//!
//! This crate provides a full Verilog-2005 parser with error recovery,
//! producing an AST with source spans for all nodes.

#![warn(missing_docs)]

pub mod ast;
mod decl;
mod expr;
mod lexer;
mod parser;
mod stmt;
mod token;

use aion_common::Interner;
use aion_diagnostics::DiagnosticSink;
use aion_source::{FileId, SourceDb};

pub use ast::VerilogSourceFile;
pub use parser::VerilogParser;

/// Lexes and parses the source text already loaded into `source_db` under
/// `file_id`, reporting lex and parse errors to `sink`.
pub fn parse_file(
    file_id: FileId,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> VerilogSourceFile {
    let source = &source_db.get_file(file_id).content;
    let tokens = lexer::lex(source, file_id, sink);
    let mut parser = VerilogParser::new(tokens, source, file_id, interner, sink);
    parser.parse_source_file()
}
