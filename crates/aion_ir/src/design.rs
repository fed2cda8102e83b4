//! Top-level design container.
//!
//! A [`Design`] holds all modules, scopes, module-arrays, UDP definitions,
//! the type database, and the source map. It is the primary output of the
//! elaboration stage and input to downstream simulation, synthesis, or
//! analysis tools.

use crate::arena::Arena;
use crate::ids::{ModuleArrayId, ModuleId, ScopeId, UdpId};
use crate::module::{Module, ModuleArray};
use crate::scope::Scope;
use crate::source_map::SourceMap;
use crate::types::TypeDb;
use crate::udp::UdpDefn;
use serde::{Deserialize, Serialize};

/// A complete hardware design after elaboration.
///
/// This is the top-level AionIR structure containing all modules in the
/// design hierarchy, the scope tree, the shared type database, and source
/// location mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// All modules in the design, keyed by [`ModuleId`].
    pub modules: Arena<ModuleId, Module>,
    /// Every scope in the design (modules, generate blocks, named begins,
    /// task/function frames), keyed by [`ScopeId`].
    pub scopes: Arena<ScopeId, Scope>,
    /// Every module-array produced by an instance range or `generate for`
    /// expansion, keyed by [`ModuleArrayId`].
    pub module_arrays: Arena<ModuleArrayId, ModuleArray>,
    /// Every user-defined primitive definition, keyed by [`UdpId`].
    pub udps: Arena<UdpId, UdpDefn>,
    /// The modules that were never instantiated by another module — the
    /// roots of the instantiation forest. Order matches source declaration
    /// order.
    pub top_modules: Vec<ModuleId>,
    /// Global type definitions shared across all modules.
    pub types: TypeDb,
    /// Source mapping from IR entities to original source spans.
    pub source_map: SourceMap,
}

impl Design {
    /// Creates a new, empty design.
    pub fn new() -> Self {
        Self {
            modules: Arena::new(),
            scopes: Arena::new(),
            module_arrays: Arena::new(),
            udps: Arena::new(),
            top_modules: Vec::new(),
            types: TypeDb::new(),
            source_map: SourceMap::new(),
        }
    }

    /// Returns the list of top-level modules (modules never instantiated
    /// elsewhere), in source declaration order.
    pub fn topmodule_list(&self) -> &[ModuleId] {
        &self.top_modules
    }

    /// Returns the number of modules in the design.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}
