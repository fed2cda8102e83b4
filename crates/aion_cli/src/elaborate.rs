//! `aion elaborate` — parses and elaborates a Verilog-2001 project.
//!
//! 1. Find project root (walk up looking for `aion.toml`)
//! 2. Load config via `aion_config`
//! 3. Discover `.v` files in `src/`
//! 4. Parse each file with `aion_verilog_parser`
//! 5. Elaborate into the unified IR
//! 6. Render diagnostics and exit with `min(error_count, 1)`

use aion_common::Interner;
use aion_diagnostics::DiagnosticSink;
use aion_source::SourceDb;

use crate::pipeline::{
    discover_source_files, parse_all_files, render_diagnostics, resolve_project_root,
};
use crate::GlobalArgs;

/// Runs the `aion elaborate` command.
///
/// Returns exit code 0 if elaboration produced no errors, 1 otherwise.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let config = aion_config::load_config(&project_dir)?;

    if !global.quiet {
        eprintln!(
            "   Elaborating {} v{}",
            config.project.name, config.project.version
        );
    }

    let src_dir = project_dir.join("src");
    let source_files = if src_dir.is_dir() {
        discover_source_files(&src_dir)?
    } else {
        Vec::new()
    };

    if source_files.is_empty() {
        if !global.quiet {
            eprintln!(
                "warning: no Verilog source files found in {}",
                src_dir.display()
            );
        }
        return Ok(0);
    }

    let mut source_db = SourceDb::new();
    let interner = Interner::new();
    let sink = DiagnosticSink::new();

    let parsed = parse_all_files(&source_files, &mut source_db, &interner, &sink)?;
    let top = interner.get_or_intern(&config.project.top);
    let elaborated = aion_elaborate::elaborate(&parsed, &[top], &interner, &source_db, &sink);

    render_diagnostics(&sink, &source_db, global.color);

    if !global.quiet {
        eprintln!(
            "   Result: {} module(s) elaborated, {} error(s)",
            elaborated.design().module_count(),
            sink.error_count(),
        );
    }

    Ok(sink.error_count().min(1) as i32)
}
