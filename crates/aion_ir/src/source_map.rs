//! Source mapping from IR entities back to their original source locations.
//!
//! The [`SourceMap`] records the source [`Span`] for every IR entity,
//! enabling precise error messages and diagnostics even after elaboration.

use crate::ids::{CellId, ModuleId, ProcessId, ScopeId, SignalId};
use aion_source::Span;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps IR entity IDs back to their original source spans.
///
/// Every module, scope, signal, cell, and process can be traced back to the
/// exact source location where it was declared or inferred.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMap {
    /// Module ID → source span.
    module_spans: HashMap<ModuleId, Span>,
    /// Scope ID → source span.
    scope_spans: HashMap<ScopeId, Span>,
    /// (Module, Signal) → source span.
    signal_spans: HashMap<(ModuleId, SignalId), Span>,
    /// (Module, Cell) → source span.
    cell_spans: HashMap<(ModuleId, CellId), Span>,
    /// (Module, Process) → source span.
    process_spans: HashMap<(ModuleId, ProcessId), Span>,
}

impl SourceMap {
    /// Creates a new, empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the source span for a module.
    pub fn insert_module(&mut self, id: ModuleId, span: Span) {
        self.module_spans.insert(id, span);
    }

    /// Records the source span for a scope.
    pub fn insert_scope(&mut self, id: ScopeId, span: Span) {
        self.scope_spans.insert(id, span);
    }

    /// Looks up the source span for a scope.
    pub fn get_scope(&self, id: ScopeId) -> Option<Span> {
        self.scope_spans.get(&id).copied()
    }

    /// Records the source span for a signal within a module.
    pub fn insert_signal(&mut self, module: ModuleId, signal: SignalId, span: Span) {
        self.signal_spans.insert((module, signal), span);
    }

    /// Records the source span for a cell within a module.
    pub fn insert_cell(&mut self, module: ModuleId, cell: CellId, span: Span) {
        self.cell_spans.insert((module, cell), span);
    }

    /// Records the source span for a process within a module.
    pub fn insert_process(&mut self, module: ModuleId, process: ProcessId, span: Span) {
        self.process_spans.insert((module, process), span);
    }

    /// Looks up the source span for a module.
    pub fn get_module(&self, id: ModuleId) -> Option<Span> {
        self.module_spans.get(&id).copied()
    }

    /// Looks up the source span for a signal within a module.
    pub fn get_signal(&self, module: ModuleId, signal: SignalId) -> Option<Span> {
        self.signal_spans.get(&(module, signal)).copied()
    }

    /// Looks up the source span for a cell within a module.
    pub fn get_cell(&self, module: ModuleId, cell: CellId) -> Option<Span> {
        self.cell_spans.get(&(module, cell)).copied()
    }

    /// Looks up the source span for a process within a module.
    pub fn get_process(&self, module: ModuleId, process: ProcessId) -> Option<Span> {
        self.process_spans.get(&(module, process)).copied()
    }
}
