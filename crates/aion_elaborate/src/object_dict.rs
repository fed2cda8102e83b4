//! Per-scope object dictionary and tag index (§4.1).
//!
//! [`ObjectDict`] is the elaborator's name resolution table: every declared
//! object (signal, instance, task, function, ...) is registered under the
//! scope that lexically contains it, plus a per-tag ordered list for
//! enumeration (`by_tag`). This is distinct from [`crate::moddef_dict`],
//! which resolves module *definition* names during upward search.

use std::collections::HashMap;

use aion_common::Ident;
use aion_ir::ids::{CellId, FunctionId, GenvarId, ModuleArrayId, ScopeId, SignalId, TaskId};

use crate::moddef_dict::ModDefDict;

/// A reference to any named object reachable through the object dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectHandle {
    /// A nested lexical scope (generate block, named begin/fork, task, function).
    Scope(ScopeId),
    /// A net, reg, variable, parameter, localparam, or specparam.
    Signal(SignalId),
    /// A single module instance.
    ModuleInstance(CellId),
    /// A module array produced by an instance range or `generate for` expansion.
    ModuleArray(ModuleArrayId),
    /// A single gate/UDP primitive instance.
    Primitive(CellId),
    /// An array of gate/UDP primitive instances.
    PrimitiveArray(CellId),
    /// A task declaration.
    Task(TaskId),
    /// A function declaration.
    Function(FunctionId),
    /// The root scope of a `generate for` loop, indexable by iteration.
    GenerateForRoot(ScopeId),
    /// A genvar declaration.
    Genvar(GenvarId),
}

/// Per-scope enumeration tag, matching §4.1's tag list exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Net declarations (`wire`, `tri`, ...).
    Nets,
    /// `reg` declarations.
    Regs,
    /// Non-reg behavioral variables (`integer`, `real`, `time`).
    Variables,
    /// `parameter` declarations.
    Parameters,
    /// `specparam` declarations.
    Specparams,
    /// Named `event` declarations.
    NamedEvents,
    /// `defparam`-independent parameter value assignments (`#(...)`, named overrides).
    ParameterAssigns,
    /// Pending/resolved `defparam` directives.
    Defparams,
    /// Module arrays.
    ModuleArrays,
    /// Single module instances.
    Modules,
    /// Primitive arrays.
    PrimitiveArrays,
    /// Single primitive instances.
    Primitives,
    /// Task declarations.
    Tasks,
    /// Function declarations.
    Functions,
    /// Continuous assignments.
    ContinuousAssigns,
    /// `always`/`initial` processes.
    Processes,
    /// Nested internal scopes (generate blocks, named begin/fork).
    InternalScopes,
}

/// Per-scope name resolution table plus ordered tag enumeration.
#[derive(Debug, Default)]
pub struct ObjectDict {
    by_name: HashMap<(ScopeId, Ident), ObjectHandle>,
    by_tag: HashMap<(ScopeId, Tag), Vec<ObjectHandle>>,
    array_children: HashMap<ObjectHandle, Vec<ObjectHandle>>,
}

impl ObjectDict {
    /// Creates an empty object dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` under `name` in `scope`, and appends it to every
    /// tag list in `tags` (insertion order is preserved, never sorted).
    ///
    /// If `name` is already bound in `scope`, the existing binding wins —
    /// callers are expected to check `find` first and emit a duplicate
    /// diagnostic themselves.
    pub fn insert(&mut self, scope: ScopeId, name: Ident, handle: ObjectHandle, tags: &[Tag]) {
        self.by_name.entry((scope, name)).or_insert(handle);
        for tag in tags {
            self.by_tag.entry((scope, *tag)).or_default().push(handle);
        }
    }

    /// Looks up `name` directly in `scope`, without searching enclosing scopes.
    pub fn find(&self, scope: ScopeId, name: Ident) -> Option<ObjectHandle> {
        self.by_name.get(&(scope, name)).copied()
    }

    /// Returns the ordered list of objects tagged `tag` within `scope`.
    pub fn by_tag(&self, scope: ScopeId, tag: Tag) -> &[ObjectHandle] {
        self.by_tag
            .get(&(scope, tag))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Registers the ordered children of an array-like handle (module array,
    /// primitive array, or generate-for root), enabling `array_elem`.
    pub fn register_array_children(&mut self, handle: ObjectHandle, children: Vec<ObjectHandle>) {
        self.array_children.insert(handle, children);
    }

    /// Dereferences an array-like handle at `index` (0-based position within
    /// the array, not the declared Verilog range value — callers translate).
    pub fn array_elem(&self, handle: ObjectHandle, index: usize) -> Option<ObjectHandle> {
        self.array_children.get(&handle)?.get(index).copied()
    }
}

/// A single segment of a hierarchical name: a simple identifier with an
/// optional constant array index (`foo` or `foo[3]`).
#[derive(Debug, Clone, Copy)]
pub struct HierSegment {
    /// The segment's identifier.
    pub name: Ident,
    /// An optional array index, for segments that index into a module/
    /// primitive array or a generate-for root.
    pub index: Option<usize>,
}

/// Resolves a hierarchical name (§4.1 "Upward search").
///
/// Resolves each prefix segment starting at `base`, falling back to the
/// module-definition dictionary when a segment does not resolve as an
/// instance name, then looks up the final identifier at the resolved scope
/// and each enclosing scope up to and including `upper_limit`.
///
/// `scope_parent` provides the scope tree's parent links (typically
/// `&design.scopes`, queried via a closure so this stays decoupled from
/// `aion_ir::Arena`'s exact indexing API).
pub fn find_up(
    dict: &ObjectDict,
    _moddict: &ModDefDict,
    base: ScopeId,
    hier_name: &[HierSegment],
    upper_limit: ScopeId,
    scope_parent: impl Fn(ScopeId) -> Option<ScopeId>,
) -> Option<ObjectHandle> {
    let (prefix, last) = hier_name.split_at(hier_name.len().saturating_sub(1));
    let last = last.first()?;

    let mut cursor = base;
    for seg in prefix {
        let resolved = dict.find(cursor, seg.name)?;
        let resolved = match (resolved, seg.index) {
            (h, Some(idx)) => dict.array_elem(h, idx)?,
            (h, None) => h,
        };
        cursor = match resolved {
            ObjectHandle::Scope(s) => s,
            ObjectHandle::ModuleInstance(_) => return None,
            _ => return None,
        };
    }

    let mut search_scope = cursor;
    loop {
        if let Some(handle) = dict.find(search_scope, last.name) {
            return Some(handle);
        }
        if search_scope == upper_limit {
            return None;
        }
        search_scope = scope_parent(search_scope)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_common::Interner;

    fn scope(n: u32) -> ScopeId {
        ScopeId::from_raw(n)
    }

    #[test]
    fn insert_and_find_roundtrip() {
        let interner = Interner::new();
        let name = interner.get_or_intern("clk");
        let mut dict = ObjectDict::new();
        let sig = ObjectHandle::Signal(SignalId::from_raw(0));
        dict.insert(scope(0), name, sig, &[Tag::Nets]);
        assert_eq!(dict.find(scope(0), name), Some(sig));
    }

    #[test]
    fn by_tag_preserves_insertion_order() {
        let interner = Interner::new();
        let mut dict = ObjectDict::new();
        let a = interner.get_or_intern("a");
        let b = interner.get_or_intern("b");
        let sig_a = ObjectHandle::Signal(SignalId::from_raw(0));
        let sig_b = ObjectHandle::Signal(SignalId::from_raw(1));
        dict.insert(scope(0), a, sig_a, &[Tag::Nets]);
        dict.insert(scope(0), b, sig_b, &[Tag::Nets]);
        assert_eq!(dict.by_tag(scope(0), Tag::Nets), &[sig_a, sig_b]);
    }

    #[test]
    fn find_missing_is_none() {
        let interner = Interner::new();
        let name = interner.get_or_intern("missing");
        let dict = ObjectDict::new();
        assert!(dict.find(scope(0), name).is_none());
    }

    #[test]
    fn array_elem_dereferences_children() {
        let mut dict = ObjectDict::new();
        let arr = ObjectHandle::ModuleArray(ModuleArrayId::from_raw(0));
        let elem0 = ObjectHandle::ModuleInstance(CellId::from_raw(0));
        let elem1 = ObjectHandle::ModuleInstance(CellId::from_raw(1));
        dict.register_array_children(arr, vec![elem0, elem1]);
        assert_eq!(dict.array_elem(arr, 0), Some(elem0));
        assert_eq!(dict.array_elem(arr, 1), Some(elem1));
        assert_eq!(dict.array_elem(arr, 2), None);
    }

    #[test]
    fn find_up_walks_enclosing_scopes() {
        let interner = Interner::new();
        let name = interner.get_or_intern("counter_width");
        let mut dict = ObjectDict::new();
        let moddict = ModDefDict::new();
        // `name` is declared in the top scope (1), not the inner scope (2).
        dict.insert(
            scope(1),
            name,
            ObjectHandle::Signal(SignalId::from_raw(0)),
            &[Tag::Parameters],
        );
        let seg = HierSegment { name, index: None };
        let found = find_up(&dict, &moddict, scope(2), &[seg], scope(0), |s| {
            if s == scope(2) {
                Some(scope(1))
            } else {
                None
            }
        });
        assert!(found.is_some());
    }

    #[test]
    fn find_up_stops_at_upper_limit() {
        let interner = Interner::new();
        let name = interner.get_or_intern("unreachable");
        let dict = ObjectDict::new();
        let moddict = ModDefDict::new();
        let seg = HierSegment { name, index: None };
        let found = find_up(&dict, &moddict, scope(2), &[seg], scope(2), |_| None);
        assert!(found.is_none());
    }
}
