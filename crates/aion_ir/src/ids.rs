//! Opaque ID newtypes for all IR entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and `Serialize`/`Deserialize`.
//! IDs are created by [`Arena::alloc`](crate::arena::Arena::alloc) and used for O(1) lookup.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a module in the design.
    ModuleId
);

define_id!(
    /// Opaque, copyable ID for a signal within a module.
    SignalId
);

define_id!(
    /// Opaque, copyable ID for a cell (primitive or instantiation) within a module.
    CellId
);

define_id!(
    /// Opaque, copyable ID for a process/always block within a module.
    ProcessId
);

define_id!(
    /// Opaque, copyable ID for a port on a module.
    PortId
);

define_id!(
    /// Opaque, copyable ID for an interned type in the [`TypeDb`](crate::types::TypeDb).
    TypeId
);

define_id!(
    /// Opaque, copyable ID for a clock domain.
    ClockDomainId
);

define_id!(
    /// Opaque, copyable ID for a hierarchical scope (module instance, named
    /// block, generate block, task/function frame) in the elaborated design.
    ScopeId
);

define_id!(
    /// Opaque, copyable ID for an elaborated constant or behavioral function.
    FunctionId
);

define_id!(
    /// Opaque, copyable ID for an elaborated task.
    TaskId
);

define_id!(
    /// Opaque, copyable ID for a generate-loop genvar binding.
    GenvarId
);

define_id!(
    /// Opaque, copyable ID for an array of module instances produced by an
    /// instance range (`foo bar[3:0] (...)`) or a `generate for` loop.
    ModuleArrayId
);

define_id!(
    /// Opaque, copyable ID for an attribute instance (`(* ... *)`) attached
    /// to a design object.
    AttrId
);

define_id!(
    /// Opaque, copyable ID for a user-defined primitive (UDP) definition.
    UdpId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = ModuleId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn id_equality() {
        let a = SignalId::from_raw(7);
        let b = SignalId::from_raw(7);
        let c = SignalId::from_raw(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(CellId::from_raw(1));
        set.insert(CellId::from_raw(2));
        set.insert(CellId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = ProcessId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: ProcessId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn all_id_types_construct() {
        let _ = ModuleId::from_raw(0);
        let _ = SignalId::from_raw(0);
        let _ = CellId::from_raw(0);
        let _ = ProcessId::from_raw(0);
        let _ = PortId::from_raw(0);
        let _ = TypeId::from_raw(0);
        let _ = ClockDomainId::from_raw(0);
        let _ = ScopeId::from_raw(0);
        let _ = FunctionId::from_raw(0);
        let _ = TaskId::from_raw(0);
        let _ = GenvarId::from_raw(0);
        let _ = ModuleArrayId::from_raw(0);
        let _ = AttrId::from_raw(0);
        let _ = UdpId::from_raw(0);
    }

    #[test]
    fn new_id_types_roundtrip() {
        assert_eq!(ScopeId::from_raw(3).as_raw(), 3);
        assert_eq!(FunctionId::from_raw(4).as_raw(), 4);
        assert_eq!(TaskId::from_raw(5).as_raw(), 5);
        assert_eq!(GenvarId::from_raw(6).as_raw(), 6);
        assert_eq!(ModuleArrayId::from_raw(7).as_raw(), 7);
        assert_eq!(AttrId::from_raw(8).as_raw(), 8);
        assert_eq!(UdpId::from_raw(9).as_raw(), 9);
    }
}
