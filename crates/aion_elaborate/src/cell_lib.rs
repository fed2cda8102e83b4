//! Cell library interface (C10).
//!
//! [`CellLibrary`] answers "what are this primitive's pins?" for the
//! built-in Verilog-2001 gate-level primitives, independent of whether the
//! elaborator itself lowers a given gate type to a dedicated [`CellKind`]
//! variant or falls back to [`CellKind::BlackBox`](aion_ir::cell::CellKind::BlackBox).
//! Lint passes and the CLI's `build`/`sim` commands consult it to validate
//! gate instantiations without special-casing each gate keyword themselves.

use aion_ir::port::PortDirection;

/// A queryable handle to one cell type's pin interface.
///
/// Pin 0 is always the gate's output. `n`-input gates (`and`, `or`, `nand`,
/// `nor`, `xor`, `xnor`) accept two or more inputs in real Verilog, so their
/// handle reports `variadic_input = true` and `pin_count()` returns `None`;
/// every pin past the fixed ones is an input.
#[derive(Debug, Clone)]
pub struct CellHandle {
    directions: Vec<PortDirection>,
    variadic_input: bool,
}

impl CellHandle {
    fn fixed(directions: Vec<PortDirection>) -> Self {
        Self {
            directions,
            variadic_input: false,
        }
    }

    fn variadic(directions: Vec<PortDirection>) -> Self {
        Self {
            directions,
            variadic_input: true,
        }
    }

    /// The number of pins, or `None` if the gate accepts a variable number
    /// of inputs.
    pub fn pin_count(&self) -> Option<usize> {
        if self.variadic_input {
            None
        } else {
            Some(self.directions.len())
        }
    }

    /// The direction of the pin at `index`, or `None` if `index` is out of
    /// range for a fixed-arity cell.
    pub fn pin_direction(&self, index: usize) -> Option<PortDirection> {
        if index < self.directions.len() {
            Some(self.directions[index])
        } else if self.variadic_input {
            Some(PortDirection::Input)
        } else {
            None
        }
    }
}

/// Query-by-name interface to the built-in primitive gate library.
///
/// Holds no state beyond its static table; constructing one is free.
#[derive(Debug, Default, Clone, Copy)]
pub struct CellLibrary;

impl CellLibrary {
    /// Creates a new library handle.
    pub fn new() -> Self {
        Self
    }

    /// Looks up a built-in gate primitive by its keyword (`"and"`, `"nand"`,
    /// `"bufif1"`, ...). Returns `None` for any name the library doesn't
    /// recognize, including user module/UDP names (those aren't part of
    /// this library).
    pub fn find(&self, name: &str) -> Option<CellHandle> {
        use PortDirection::{Input, Output};
        let handle = match name {
            "and" | "or" | "xor" | "nand" | "nor" | "xnor" => {
                CellHandle::variadic(vec![Output, Input, Input])
            }
            "not" | "buf" => CellHandle::variadic(vec![Output, Input]),
            "bufif0" | "bufif1" | "notif0" | "notif1" => {
                CellHandle::fixed(vec![Output, Input, Input])
            }
            "pullup" | "pulldown" => CellHandle::fixed(vec![Output]),
            _ => return None,
        };
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_gate_is_variadic_with_output_first() {
        let lib = CellLibrary::new();
        let h = lib.find("and").unwrap();
        assert_eq!(h.pin_count(), None);
        assert_eq!(h.pin_direction(0), Some(PortDirection::Output));
        assert_eq!(h.pin_direction(1), Some(PortDirection::Input));
        assert_eq!(h.pin_direction(5), Some(PortDirection::Input));
    }

    #[test]
    fn not_gate_is_variadic_unary_fanout() {
        let lib = CellLibrary::new();
        let h = lib.find("not").unwrap();
        assert_eq!(h.pin_direction(0), Some(PortDirection::Output));
        assert_eq!(h.pin_direction(1), Some(PortDirection::Input));
    }

    #[test]
    fn bufif1_is_fixed_arity() {
        let lib = CellLibrary::new();
        let h = lib.find("bufif1").unwrap();
        assert_eq!(h.pin_count(), Some(3));
        assert_eq!(h.pin_direction(0), Some(PortDirection::Output));
        assert_eq!(h.pin_direction(2), Some(PortDirection::Input));
        assert_eq!(h.pin_direction(3), None);
    }

    #[test]
    fn pullup_has_single_output_pin() {
        let lib = CellLibrary::new();
        let h = lib.find("pullup").unwrap();
        assert_eq!(h.pin_count(), Some(1));
        assert_eq!(h.pin_direction(0), Some(PortDirection::Output));
    }

    #[test]
    fn unknown_name_is_none() {
        let lib = CellLibrary::new();
        assert!(lib.find("my_module").is_none());
        assert!(lib.find("").is_none());
    }
}
