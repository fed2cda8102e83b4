//! Cell definitions for primitives and module instantiations.
//!
//! A [`Cell`] represents either a built-in-gate primitive, a UDP instance,
//! or an instantiation of another module — the structural building blocks
//! of an elaborated design's primitive graph.

use crate::ids::{CellId, ModuleId, UdpId};
use crate::port::PortDirection;
use crate::signal::SignalRef;
use aion_common::Ident;
use aion_source::Span;
use serde::{Deserialize, Serialize};

use crate::const_value::ConstValue;

/// The kind of a cell, distinguishing primitives from instantiations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CellKind {
    /// Instantiation of another module.
    Instance {
        /// The module being instantiated.
        module: ModuleId,
        /// Resolved parameter values.
        params: Vec<(Ident, ConstValue)>,
    },

    /// Bitwise AND gate.
    And {
        /// Operand width in bits.
        width: u32,
    },
    /// Bitwise OR gate.
    Or {
        /// Operand width in bits.
        width: u32,
    },
    /// Bitwise XOR gate.
    Xor {
        /// Operand width in bits.
        width: u32,
    },
    /// Bitwise NOT gate.
    Not {
        /// Operand width in bits.
        width: u32,
    },

    /// Black box (unresolved or errored module, or a gate kind with no
    /// direct `CellKind` counterpart).
    BlackBox {
        /// The port names of the black box.
        port_names: Vec<Ident>,
    },

    /// Instantiation of a user-defined primitive.
    Udp {
        /// The UDP definition being instantiated.
        defn: UdpId,
    },
}

/// A connection between a cell port and a signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// The name of the port on the cell.
    pub port_name: Ident,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// The signal or signal slice connected to this port.
    pub signal: SignalRef,
}

/// A cell in the netlist — either a primitive operation or a module instantiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// The unique ID of this cell within its module.
    pub id: CellId,
    /// The cell instance name.
    pub name: Ident,
    /// The kind of cell (primitive type or module instance).
    pub kind: CellKind,
    /// The port-to-signal connections.
    pub connections: Vec<Connection>,
    /// The source span where this cell was instantiated.
    pub span: Span,
}

impl Cell {
    /// Returns the [`TypeId`] if this is a `Const` cell kind, else `None`.
    ///
    /// This is a convenience for pattern matching on the cell kind.
    pub fn module_id(&self) -> Option<ModuleId> {
        match &self.kind {
            CellKind::Instance { module, .. } => Some(*module),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SignalId;

    fn dummy_cell(kind: CellKind) -> Cell {
        Cell {
            id: CellId::from_raw(0),
            name: Ident::from_raw(1),
            kind,
            connections: Vec::new(),
            span: Span::DUMMY,
        }
    }

    #[test]
    fn instance_cell() {
        let cell = dummy_cell(CellKind::Instance {
            module: ModuleId::from_raw(5),
            params: vec![],
        });
        assert_eq!(cell.module_id(), Some(ModuleId::from_raw(5)));
    }

    #[test]
    fn primitive_cell() {
        let cell = dummy_cell(CellKind::And { width: 8 });
        assert_eq!(cell.module_id(), None);
    }

    #[test]
    fn gate_cell_kinds() {
        assert!(matches!(
            dummy_cell(CellKind::Or { width: 1 }).kind,
            CellKind::Or { width: 1 }
        ));
        assert!(matches!(
            dummy_cell(CellKind::Xor { width: 1 }).kind,
            CellKind::Xor { width: 1 }
        ));
        assert!(matches!(
            dummy_cell(CellKind::Not { width: 1 }).kind,
            CellKind::Not { width: 1 }
        ));
    }

    #[test]
    fn cell_with_connections() {
        let cell = Cell {
            id: CellId::from_raw(0),
            name: Ident::from_raw(1),
            kind: CellKind::And { width: 1 },
            connections: vec![
                Connection {
                    port_name: Ident::from_raw(2),
                    direction: PortDirection::Input,
                    signal: SignalRef::Signal(SignalId::from_raw(0)),
                },
                Connection {
                    port_name: Ident::from_raw(3),
                    direction: PortDirection::Output,
                    signal: SignalRef::Signal(SignalId::from_raw(1)),
                },
            ],
            span: Span::DUMMY,
        };
        assert_eq!(cell.connections.len(), 2);
    }

    #[test]
    fn udp_cell() {
        let cell = dummy_cell(CellKind::Udp {
            defn: UdpId::from_raw(3),
        });
        if let CellKind::Udp { defn } = &cell.kind {
            assert_eq!(*defn, UdpId::from_raw(3));
        } else {
            panic!("expected Udp");
        }
        assert_eq!(cell.module_id(), None);
    }

    #[test]
    fn black_box_cell() {
        let cell = dummy_cell(CellKind::BlackBox {
            port_names: vec![Ident::from_raw(10), Ident::from_raw(11)],
        });
        if let CellKind::BlackBox { port_names } = &cell.kind {
            assert_eq!(port_names.len(), 2);
        } else {
            panic!("expected BlackBox");
        }
    }
}
