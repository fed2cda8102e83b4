//! Module definitions — the primary organizational unit of the IR.
//!
//! A [`Module`] contains ports, signals, cells, processes, and assignments
//! that collectively describe a piece of hardware. Modules form a hierarchy
//! through cell instantiations. A [`Module`] is also a [`Scope`](crate::scope::Scope):
//! its `scope` field is the node other scopes (generate blocks, named
//! begins, task/function frames) nest under.

use crate::arena::Arena;
use crate::ids::{
    CellId, ClockDomainId, ModuleArrayId, ModuleId, ProcessId, ScopeId, SignalId, TypeId,
};
use crate::port::Port;
use crate::process::{Edge, Process};
use crate::signal::SignalRef;
use crate::{cell::Cell, signal::Signal};
use aion_common::{ContentHash, Ident};
use aion_source::Span;
use serde::{Deserialize, Serialize};

use crate::const_value::ConstValue;
use crate::expr::Expr;

/// A module parameter (generic in VHDL, parameter in Verilog/SV).
///
/// Parameters are resolved to concrete values during elaboration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: Ident,
    /// The parameter type.
    pub ty: TypeId,
    /// The resolved value after elaboration.
    pub value: ConstValue,
    /// The source span of the parameter declaration.
    pub span: Span,
}

/// A direct combinational assignment (concurrent signal assignment).
///
/// Represents `assign` statements in Verilog or concurrent signal assignments
/// in VHDL that exist outside of processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// The target signal or signal slice.
    pub target: SignalRef,
    /// The value expression.
    pub value: Expr,
    /// The source span of the assignment.
    pub span: Span,
}

/// A clock domain annotation.
///
/// Groups signals that are clocked by the same clock signal and edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockDomain {
    /// The unique ID of this clock domain.
    pub id: ClockDomainId,
    /// The domain name (e.g., "clk_50", "sys_clk").
    pub name: Ident,
    /// The clock signal driving this domain.
    pub clock_signal: SignalId,
    /// The active clock edge.
    pub edge: Edge,
}

/// The net kind that an undeclared identifier implicitly resolves to.
///
/// `default_nettype none` disables implicit net creation entirely; any other
/// value names the net kind synthesized for an undeclared reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultNetType {
    /// Implicit nets are ordinary wires (the language default).
    Wire,
    /// Implicit nets are tri-state wires.
    Tri,
    /// Implicit nets are pulled to 0 when undriven.
    Supply0,
    /// Implicit nets are pulled to 1 when undriven.
    Supply1,
    /// Implicit net creation is disabled; an undeclared reference is an error.
    None,
}

/// The resolution policy for an unconnected input port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnconnectedDrive {
    /// Unconnected pull-up inputs resolve to 0.
    Pull0,
    /// Unconnected pull-up inputs resolve to 1.
    Pull1,
    /// No special pull policy; unconnected inputs read as `X`.
    None,
}

/// The default delay interpretation for gate-level primitives lacking an
/// explicit delay specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultDelayMode {
    /// No module-wide override; each primitive's own delay (or lack of one)
    /// applies.
    None,
    /// All delays collapse to a single simulation unit.
    Unit,
    /// All delays collapse to zero.
    Zero,
}

/// A single hardware module in the design.
///
/// Contains ports, signals, cells, behavioral processes, and concurrent
/// assignments. Modules form a hierarchy through [`CellKind::Instance`](crate::cell::CellKind::Instance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// The unique ID of this module in the design.
    pub id: ModuleId,
    /// The instance name (the top-level module's instance name equals its
    /// definition name).
    pub name: Ident,
    /// The name of the module definition this instance was elaborated from.
    pub def_name: Ident,
    /// This module's own scope node, the parent of any generate blocks,
    /// named begins, or task/function frames it directly contains.
    pub scope: ScopeId,
    /// The source span of the module declaration.
    pub span: Span,
    /// Module parameters (resolved after elaboration).
    pub params: Vec<Parameter>,
    /// The module's external port interface.
    pub ports: Vec<Port>,
    /// All signals declared within this module.
    pub signals: Arena<SignalId, Signal>,
    /// Primitive cells and module instantiations.
    pub cells: Arena<CellId, Cell>,
    /// Behavioral processes (lowered to cells during synthesis).
    pub processes: Arena<ProcessId, Process>,
    /// Direct combinational assignments.
    pub assignments: Vec<Assignment>,
    /// Clock domain annotations.
    pub clock_domains: Vec<ClockDomain>,
    /// Simulation time unit, as a power-of-ten exponent relative to one
    /// second (e.g. `-9` for `1ns`). `None` if not specified.
    pub time_unit: Option<i32>,
    /// Simulation time precision, same encoding as `time_unit`.
    pub time_precision: Option<i32>,
    /// The net kind synthesized for undeclared identifiers in this module.
    pub default_net_type: DefaultNetType,
    /// The pull policy for unconnected input ports.
    pub unconnected_drive: UnconnectedDrive,
    /// The default delay mode for primitives without an explicit delay.
    pub default_delay_mode: DefaultDelayMode,
    /// The default net decay time, in simulation time units, if declared.
    pub decay_time: Option<u32>,
    /// Config/library/cell declaration tags carried from the source's
    /// `config`/`library`/`celldefine` context, if any.
    pub config_tags: Vec<Ident>,
    /// `true` if this module was never instantiated by another module (a
    /// root of the instantiation forest).
    pub is_top: bool,
    /// If this instance was produced by an instance-array or a
    /// `generate for` loop, the owning [`ModuleArray`] and this module's
    /// index within it.
    pub array_parent: Option<(ModuleArrayId, u32)>,
    /// Content hash of this module's source inputs (for incremental compilation).
    pub content_hash: ContentHash,
}

/// An array of module instances sharing one template, produced by an
/// instance range (`foo bar[3:0] (...)`) or indexed `generate for`
/// expansion.
///
/// A module-array is a named object but, unlike [`Module`], it is not
/// itself a scope — name lookup passes through it to the individual
/// element modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleArray {
    /// The unique ID of this module array.
    pub id: ModuleArrayId,
    /// The array's declared name (the instance name shared by all elements).
    pub name: Ident,
    /// The declared index range, as written (`[left:right]`), not
    /// normalized to ascending order.
    pub range: (i64, i64),
    /// The contained module instances, in ascending index order.
    pub elements: Vec<ModuleId>,
    /// The source span of the instantiation.
    pub span: Span,
}

impl ModuleArray {
    /// The number of elements in this array (`|left - right| + 1`).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if this array has no elements (never constructed by
    /// elaboration, but kept for API symmetry).
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the module instance at the given declared index, if any.
    pub fn elem_by_index(&self, index: i64) -> Option<ModuleId> {
        let (lo, hi) = if self.range.0 <= self.range.1 {
            (self.range.0, self.range.1)
        } else {
            (self.range.1, self.range.0)
        };
        if index < lo || index > hi {
            return None;
        }
        let offset = if self.range.0 <= self.range.1 {
            index - self.range.0
        } else {
            self.range.0 - index
        };
        self.elements.get(offset as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    fn empty_module(id: u32, name: Ident) -> Module {
        Module {
            id: ModuleId::from_raw(id),
            name,
            def_name: name,
            scope: ScopeId::from_raw(id),
            span: Span::DUMMY,
            params: Vec::new(),
            ports: Vec::new(),
            signals: Arena::new(),
            cells: Arena::new(),
            processes: Arena::new(),
            assignments: Vec::new(),
            clock_domains: Vec::new(),
            time_unit: None,
            time_precision: None,
            default_net_type: DefaultNetType::Wire,
            unconnected_drive: UnconnectedDrive::None,
            default_delay_mode: DefaultDelayMode::None,
            decay_time: None,
            config_tags: Vec::new(),
            is_top: true,
            array_parent: None,
            content_hash: ContentHash::from_bytes(b"test"),
        }
    }

    #[test]
    fn module_construction() {
        let m = empty_module(0, Ident::from_raw(1));
        assert_eq!(m.id.as_raw(), 0);
        assert!(m.signals.is_empty());
        assert!(m.cells.is_empty());
        assert!(m.processes.is_empty());
        assert!(m.is_top);
    }

    #[test]
    fn module_with_signals() {
        let mut m = empty_module(0, Ident::from_raw(1));
        let sig = Signal {
            id: SignalId::from_raw(0),
            name: Ident::from_raw(2),
            ty: TypeId::from_raw(0),
            kind: crate::signal::SignalKind::Wire,
            init: None,
            clock_domain: None,
            scope: m.scope,
            unpacked_dims: Vec::new(),
            span: Span::DUMMY,
        };
        let sid = m.signals.alloc(sig);
        assert_eq!(m.signals.len(), 1);
        assert_eq!(m.signals[sid].name, Ident::from_raw(2));
    }

    #[test]
    fn module_with_assignment() {
        let mut m = empty_module(0, Ident::from_raw(1));
        m.assignments.push(Assignment {
            target: SignalRef::Signal(SignalId::from_raw(0)),
            value: Expr::Literal(aion_common::LogicVec::all_zero(8)),
            span: Span::DUMMY,
        });
        assert_eq!(m.assignments.len(), 1);
    }

    #[test]
    fn module_with_clock_domain() {
        let mut m = empty_module(0, Ident::from_raw(1));
        m.clock_domains.push(ClockDomain {
            id: ClockDomainId::from_raw(0),
            name: Ident::from_raw(5),
            clock_signal: SignalId::from_raw(0),
            edge: Edge::Posedge,
        });
        assert_eq!(m.clock_domains.len(), 1);
    }

    #[test]
    fn parameter_construction() {
        let param = Parameter {
            name: Ident::from_raw(1),
            ty: TypeId::from_raw(0),
            value: ConstValue::Int(256),
            span: Span::DUMMY,
        };
        assert_eq!(param.value, ConstValue::Int(256));
    }

    #[test]
    fn non_top_module_has_array_parent() {
        let mut m = empty_module(1, Ident::from_raw(2));
        m.is_top = false;
        m.array_parent = Some((ModuleArrayId::from_raw(0), 2));
        assert!(!m.is_top);
        assert_eq!(m.array_parent, Some((ModuleArrayId::from_raw(0), 2)));
    }

    #[test]
    fn default_net_type_none_distinct_from_wire() {
        assert_ne!(DefaultNetType::None, DefaultNetType::Wire);
    }

    #[test]
    fn module_array_ascending_range() {
        let arr = ModuleArray {
            id: ModuleArrayId::from_raw(0),
            name: Ident::from_raw(1),
            range: (0, 2),
            elements: vec![
                ModuleId::from_raw(0),
                ModuleId::from_raw(1),
                ModuleId::from_raw(2),
            ],
            span: Span::DUMMY,
        };
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.elem_by_index(0), Some(ModuleId::from_raw(0)));
        assert_eq!(arr.elem_by_index(2), Some(ModuleId::from_raw(2)));
        assert_eq!(arr.elem_by_index(3), None);
    }

    #[test]
    fn module_array_descending_range() {
        let arr = ModuleArray {
            id: ModuleArrayId::from_raw(1),
            name: Ident::from_raw(1),
            range: (2, 0),
            elements: vec![
                ModuleId::from_raw(0),
                ModuleId::from_raw(1),
                ModuleId::from_raw(2),
            ],
            span: Span::DUMMY,
        };
        assert_eq!(arr.len(), 3);
        // Descending range: index 2 is the first element (offset 0).
        assert_eq!(arr.elem_by_index(2), Some(ModuleId::from_raw(0)));
        assert_eq!(arr.elem_by_index(0), Some(ModuleId::from_raw(2)));
    }
}
