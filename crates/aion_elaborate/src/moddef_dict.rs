//! Module-definition dictionary (§4.2).
//!
//! Distinct from [`crate::registry::ModuleRegistry`], which indexes raw
//! parse-tree module/UDP templates once during Phase A. `ModDefDict` tracks,
//! per enclosing scope, which *elaborated* module definition a bare name
//! resolves to — consulted only by upward search (§4.1) when a hierarchical
//! prefix segment fails to resolve as an instance name.

use std::collections::HashMap;

use aion_common::Ident;
use aion_ir::ids::{ModuleId, ScopeId};

/// The resolution state of a module-definition name within a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModDefEntry {
    /// Exactly one module definition is visible under this name.
    Found(ModuleId),
    /// Two or more module definitions collide under this name; lookups
    /// silently return `None` from here on (never surfaced as a diagnostic,
    /// per §4.7/§7's `AmbiguousName`).
    Ambiguous,
}

/// Scope-keyed dictionary of module definition names.
#[derive(Debug, Default)]
pub struct ModDefDict {
    entries: HashMap<(ScopeId, Ident), ModDefEntry>,
}

impl ModDefDict {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `module` under `name` in `scope`. A second registration
    /// under the same key poisons the entry into `Ambiguous` rather than
    /// erroring.
    pub fn insert(&mut self, scope: ScopeId, name: Ident, module: ModuleId) {
        self.entries
            .entry((scope, name))
            .and_modify(|e| *e = ModDefEntry::Ambiguous)
            .or_insert(ModDefEntry::Found(module));
    }

    /// Looks up `name` in `scope`. Returns `None` for both "not found" and
    /// "ambiguous" — the two are indistinguishable to callers by design.
    pub fn lookup(&self, scope: ScopeId, name: Ident) -> Option<ModuleId> {
        match self.entries.get(&(scope, name))? {
            ModDefEntry::Found(m) => Some(*m),
            ModDefEntry::Ambiguous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_common::Interner;

    #[test]
    fn single_registration_resolves() {
        let interner = Interner::new();
        let name = interner.get_or_intern("counter");
        let mut dict = ModDefDict::new();
        dict.insert(ScopeId::from_raw(0), name, ModuleId::from_raw(1));
        assert_eq!(
            dict.lookup(ScopeId::from_raw(0), name),
            Some(ModuleId::from_raw(1))
        );
    }

    #[test]
    fn duplicate_registration_is_silently_ambiguous() {
        let interner = Interner::new();
        let name = interner.get_or_intern("counter");
        let mut dict = ModDefDict::new();
        dict.insert(ScopeId::from_raw(0), name, ModuleId::from_raw(1));
        dict.insert(ScopeId::from_raw(0), name, ModuleId::from_raw(2));
        assert_eq!(dict.lookup(ScopeId::from_raw(0), name), None);
    }

    #[test]
    fn missing_name_is_none() {
        let interner = Interner::new();
        let name = interner.get_or_intern("missing");
        let dict = ModDefDict::new();
        assert_eq!(dict.lookup(ScopeId::from_raw(0), name), None);
    }

    #[test]
    fn same_name_distinct_scopes_independent() {
        let interner = Interner::new();
        let name = interner.get_or_intern("counter");
        let mut dict = ModDefDict::new();
        dict.insert(ScopeId::from_raw(0), name, ModuleId::from_raw(1));
        dict.insert(ScopeId::from_raw(1), name, ModuleId::from_raw(2));
        assert_eq!(
            dict.lookup(ScopeId::from_raw(0), name),
            Some(ModuleId::from_raw(1))
        );
        assert_eq!(
            dict.lookup(ScopeId::from_raw(1), name),
            Some(ModuleId::from_raw(2))
        );
    }
}
