//! User-defined primitive (UDP) definitions.
//!
//! A [`UdpDefn`] is a named truth table describing a single-output primitive,
//! either purely combinational or sequential (with an internal state driven
//! by edges). Instances of a UDP appear as [`crate::cell::CellKind::Udp`]
//! cells; the definition itself is a top-level named object alongside module
//! definitions.

use crate::ids::UdpId;
use aion_common::Ident;
use aion_source::Span;
use serde::{Deserialize, Serialize};

/// A single level value usable in a UDP table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UdpLevel {
    /// Logic 0.
    Zero,
    /// Logic 1.
    One,
    /// Unknown.
    X,
}

/// A symbol appearing in an input column of a UDP table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UdpInputSymbol {
    /// An exact level match.
    Level(UdpLevel),
    /// `?` — matches 0, 1, or X.
    AnyLevel,
    /// `b` — matches 0 or 1 (not X).
    Binary,
    /// An edge transition, e.g. `(01)`, `r`, `f`, `p`, `n`.
    Edge {
        /// The level before the transition (`None` for `*`, any edge).
        from: Option<UdpLevel>,
        /// The level after the transition (`None` for `*`, any edge).
        to: Option<UdpLevel>,
    },
}

/// The output symbol of a UDP table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UdpOutputSymbol {
    /// An exact output level.
    Level(UdpLevel),
    /// `-` — no state change (sequential UDPs only).
    NoChange,
}

/// One row of a UDP truth table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UdpTableRow {
    /// The input-port symbols, in declared port order (excluding the output
    /// port and, for sequential UDPs, the current-state column).
    pub inputs: Vec<UdpInputSymbol>,
    /// The current-state symbol, for a sequential UDP's state column.
    /// `None` for combinational UDPs.
    pub state: Option<UdpInputSymbol>,
    /// The resulting output symbol.
    pub output: UdpOutputSymbol,
}

/// Whether a UDP is combinational or carries internal sequential state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UdpKind {
    /// Output is a pure function of the current inputs.
    Combinational,
    /// Output also depends on, and can update, an internal state register.
    Sequential {
        /// The `initial` statement's value, if declared.
        initial: Option<UdpLevel>,
    },
}

/// A user-defined primitive definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UdpDefn {
    /// The unique ID of this UDP definition.
    pub id: UdpId,
    /// The UDP's name.
    pub name: Ident,
    /// Whether this UDP is combinational or sequential.
    pub kind: UdpKind,
    /// Port names in declaration order; index 0 is always the output port.
    pub port_names: Vec<Ident>,
    /// The truth table rows, in source order.
    pub table: Vec<UdpTableRow>,
    /// The source span of the UDP definition.
    pub span: Span,
}

impl UdpDefn {
    /// The number of input ports (total ports minus the one output port).
    pub fn input_count(&self) -> usize {
        self.port_names.len().saturating_sub(1)
    }
}
