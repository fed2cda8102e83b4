//! Module registry for scanning parsed Verilog ASTs and mapping module names
//! to declarations.
//!
//! The [`ModuleRegistry`] scans all parsed source files and builds a lookup
//! table from module name to declaration. Duplicate module names are
//! detected and reported.

use std::collections::HashMap;

use aion_common::{Ident, Interner};
use aion_diagnostics::DiagnosticSink;
use aion_source::Span;

use crate::errors;

/// A reference to a Verilog module declaration.
pub enum ModuleEntry<'a> {
    /// A Verilog-2001 module.
    Verilog(&'a aion_verilog_parser::ast::ModuleDecl),
}

/// Registry of all module declarations across all parsed source files.
///
/// Provides O(1) lookup by interned name and detects duplicate definitions.
pub struct ModuleRegistry<'a> {
    /// Verilog modules by name.
    verilog: HashMap<Ident, &'a aion_verilog_parser::ast::ModuleDecl>,
    /// Span of first occurrence for duplicate detection.
    first_span: HashMap<Ident, Span>,
}

impl<'a> ModuleRegistry<'a> {
    /// Builds a module registry from parsed Verilog source files.
    ///
    /// Emits `E202` diagnostics for duplicate module names.
    pub fn from_parsed_design(
        verilog_files: &'a [aion_verilog_parser::ast::VerilogSourceFile],
        interner: &Interner,
        sink: &DiagnosticSink,
    ) -> Self {
        let mut reg = Self {
            verilog: HashMap::new(),
            first_span: HashMap::new(),
        };

        for file in verilog_files {
            for item in &file.items {
                if let aion_verilog_parser::ast::VerilogItem::Module(decl) = item {
                    reg.register_verilog(decl, interner, sink);
                }
            }
        }

        reg
    }

    /// Registers a Verilog module, emitting a duplicate diagnostic if needed.
    fn register_verilog(
        &mut self,
        decl: &'a aion_verilog_parser::ast::ModuleDecl,
        interner: &Interner,
        sink: &DiagnosticSink,
    ) {
        let name = decl.name;
        if let Some(&prev_span) = self.first_span.get(&name) {
            sink.emit(errors::error_duplicate_module(
                interner.resolve(name),
                decl.span,
                prev_span,
            ));
        } else {
            self.verilog.insert(name, decl);
            self.first_span.insert(name, decl.span);
        }
    }

    /// Looks up a module by name.
    pub fn lookup(&self, name: Ident) -> Option<ModuleEntry<'a>> {
        self.verilog.get(&name).map(|decl| ModuleEntry::Verilog(decl))
    }

    /// Returns the source span of a module's declaration, if found.
    pub fn span_of(&self, name: Ident) -> Option<Span> {
        self.first_span.get(&name).copied()
    }

    /// Returns every registered module declaration, in registration order
    /// relative to the internal map (not source order).
    pub fn all_verilog(&self) -> impl Iterator<Item = &&'a aion_verilog_parser::ast::ModuleDecl> {
        self.verilog.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_common::Interner;
    use aion_diagnostics::DiagnosticSink;
    use aion_source::Span;

    #[test]
    fn empty_registry() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let reg = ModuleRegistry::from_parsed_design(&[], &interner, &sink);
        let unknown = interner.get_or_intern("unknown");
        assert!(reg.lookup(unknown).is_none());
        assert!(reg.span_of(unknown).is_none());
    }

    #[test]
    fn register_verilog_module() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let name = interner.get_or_intern("counter");
        let file = aion_verilog_parser::ast::VerilogSourceFile {
            items: vec![aion_verilog_parser::ast::VerilogItem::Module(
                aion_verilog_parser::ast::ModuleDecl {
                    name,
                    port_style: aion_verilog_parser::ast::PortStyle::Empty,
                    params: vec![],
                    ports: vec![],
                    port_names: vec![],
                    items: vec![],
                    span: Span::DUMMY,
                },
            )],
            span: Span::DUMMY,
        };
        let files = [file];
        let reg = ModuleRegistry::from_parsed_design(&files, &interner, &sink);
        assert!(reg.lookup(name).is_some());
        assert!(matches!(reg.lookup(name), Some(ModuleEntry::Verilog(_))));
    }

    #[test]
    fn duplicate_module_emits_diagnostic() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let name = interner.get_or_intern("dup");
        let file = aion_verilog_parser::ast::VerilogSourceFile {
            items: vec![
                aion_verilog_parser::ast::VerilogItem::Module(
                    aion_verilog_parser::ast::ModuleDecl {
                        name,
                        port_style: aion_verilog_parser::ast::PortStyle::Empty,
                        params: vec![],
                        ports: vec![],
                        port_names: vec![],
                        items: vec![],
                        span: Span::DUMMY,
                    },
                ),
                aion_verilog_parser::ast::VerilogItem::Module(
                    aion_verilog_parser::ast::ModuleDecl {
                        name,
                        port_style: aion_verilog_parser::ast::PortStyle::Empty,
                        params: vec![],
                        ports: vec![],
                        port_names: vec![],
                        items: vec![],
                        span: Span::DUMMY,
                    },
                ),
            ],
            span: Span::DUMMY,
        };
        let files = [file];
        let _reg = ModuleRegistry::from_parsed_design(&files, &interner, &sink);
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn lookup_miss_returns_none() {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let name = interner.get_or_intern("counter");
        let file = aion_verilog_parser::ast::VerilogSourceFile {
            items: vec![aion_verilog_parser::ast::VerilogItem::Module(
                aion_verilog_parser::ast::ModuleDecl {
                    name,
                    port_style: aion_verilog_parser::ast::PortStyle::Empty,
                    params: vec![],
                    ports: vec![],
                    port_names: vec![],
                    items: vec![],
                    span: Span::DUMMY,
                },
            )],
            span: Span::DUMMY,
        };
        let files = [file];
        let reg = ModuleRegistry::from_parsed_design(&files, &interner, &sink);
        let other = interner.get_or_intern("other");
        assert!(reg.lookup(other).is_none());
    }
}
