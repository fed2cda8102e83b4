//! Shared pipeline helpers for the `elaborate` command.
//!
//! Source file discovery, project root resolution, and the parse-all-files
//! step that feeds `aion_elaborate::elaborate`.

use std::path::{Path, PathBuf};

use aion_common::Interner;
use aion_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use aion_elaborate::ParsedDesign;
use aion_source::SourceDb;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `aion.toml`.
///
/// Returns the directory containing `aion.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("aion.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find aion.toml in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir → itself).
/// Otherwise walks up from the current directory looking for `aion.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Discovers Verilog-2001 source files (`.v`) in the given directory (recursive),
/// sorted by path.
pub fn discover_source_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

/// Recursively walks a directory collecting `.v` source files.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("v") {
            files.push(path);
        }
    }
    Ok(())
}

/// Loads and parses all source files into a `ParsedDesign`, registering each
/// file in `source_db` along the way.
pub fn parse_all_files(
    source_files: &[PathBuf],
    source_db: &mut SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Result<ParsedDesign, Box<dyn std::error::Error>> {
    let mut verilog_files = Vec::new();
    for path in source_files {
        let file_id = source_db.load_file(path)?;
        let ast = aion_verilog_parser::parse_file(file_id, source_db, interner, sink);
        verilog_files.push(ast);
    }
    Ok(ParsedDesign { verilog_files })
}

/// Renders all diagnostics from a sink to stderr using the terminal renderer.
///
/// Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, source_db: &SourceDb, color: bool) -> usize {
    let diagnostics = sink.diagnostics();
    let renderer = TerminalRenderer::new(color, 80);
    for diag in &diagnostics {
        eprintln!("{}", renderer.render(diag, source_db));
    }
    diagnostics.len()
}
