//! Constant values for parameters, initial values, and compile-time expressions.
//!
//! [`ConstValue`] mirrors the value representation a Verilog constant
//! evaluator produces (`VlValue` in the elaborator literature): an untyped
//! union big enough to hold every literal and expression-evaluation result
//! the language can produce, from a plain integer to a 4-state bit vector.

use aion_common::{Logic, LogicVec};
use serde::{Deserialize, Serialize};

/// A resolved compile-time constant value.
///
/// Used for parameter values, initial/reset values, and constant expressions
/// that have been fully evaluated during elaboration. Distinct from
/// [`Type`](crate::types::Type) — a `ConstValue` is a *value*, a `Type` is
/// the shape a value is required to have in some context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstValue {
    /// A signed integer constant (`integer`, plain decimal literals).
    Int(i64),
    /// An unsigned integer constant (unsigned sized/based literals that fit
    /// in a machine word).
    UInt(u64),
    /// A single 4-state scalar (`reg`, a 1-bit net, the result of a
    /// reduction or comparison operator).
    Scalar(Logic),
    /// A real/floating-point constant.
    Real(f64),
    /// A simulation time value (`$time`-compatible constant), in simulator
    /// time units.
    Time(u64),
    /// A 4-state bit vector of known width, with its arithmetic signedness.
    BitVector {
        /// The bit pattern.
        bits: LogicVec,
        /// Whether arithmetic on this vector is signed.
        signed: bool,
    },
    /// A string constant.
    String(String),
    /// The result of an ill-typed or otherwise unevaluable constant
    /// expression. Propagates silently through further folding so a single
    /// root-cause diagnostic is not drowned out by derived ones.
    Error,
}

impl ConstValue {
    /// Returns `true` if this value is the error sentinel.
    pub fn is_error(&self) -> bool {
        matches!(self, ConstValue::Error)
    }

    /// Width in bits, for the variants that carry one. Scalars are 1 bit;
    /// `Int`/`UInt`/`Time` report their native machine width; `Real`,
    /// `String`, and `Error` have no fixed bit width.
    pub fn width(&self) -> Option<u32> {
        match self {
            ConstValue::Int(_) => Some(32),
            ConstValue::UInt(_) => Some(32),
            ConstValue::Scalar(_) => Some(1),
            ConstValue::Time(_) => Some(64),
            ConstValue::BitVector { bits, .. } => Some(bits.width()),
            ConstValue::Real(_) | ConstValue::String(_) | ConstValue::Error => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_value_variants() {
        let int = ConstValue::Int(42);
        let uint = ConstValue::UInt(42);
        let scalar = ConstValue::Scalar(Logic::One);
        let real = ConstValue::Real(1.5);
        let time = ConstValue::Time(100);
        let bv = ConstValue::BitVector {
            bits: LogicVec::all_zero(8),
            signed: false,
        };
        let string = ConstValue::String("hello".to_string());

        assert_eq!(int, ConstValue::Int(42));
        assert_ne!(int, uint);
        assert_eq!(scalar, ConstValue::Scalar(Logic::One));
        assert_eq!(real, ConstValue::Real(1.5));
        assert_eq!(time, ConstValue::Time(100));
        assert_ne!(
            bv,
            ConstValue::BitVector {
                bits: LogicVec::all_one(8),
                signed: false
            }
        );
        assert_eq!(string, ConstValue::String("hello".to_string()));
    }

    #[test]
    fn error_is_error() {
        assert!(ConstValue::Error.is_error());
        assert!(!ConstValue::Int(0).is_error());
    }

    #[test]
    fn width_reporting() {
        assert_eq!(ConstValue::Int(0).width(), Some(32));
        assert_eq!(ConstValue::Scalar(Logic::X).width(), Some(1));
        assert_eq!(
            ConstValue::BitVector {
                bits: LogicVec::all_zero(16),
                signed: true,
            }
            .width(),
            Some(16)
        );
        assert_eq!(ConstValue::Real(0.0).width(), None);
        assert_eq!(ConstValue::Error.width(), None);
    }

    #[test]
    fn const_value_serde_roundtrip() {
        let vals = vec![
            ConstValue::Int(-100),
            ConstValue::UInt(100),
            ConstValue::Scalar(Logic::Z),
            ConstValue::Real(9.81),
            ConstValue::Time(42),
            ConstValue::BitVector {
                bits: LogicVec::all_one(4),
                signed: true,
            },
            ConstValue::String("test".to_string()),
            ConstValue::Error,
        ];
        for val in vals {
            let json = serde_json::to_string(&val).unwrap();
            let restored: ConstValue = serde_json::from_str(&json).unwrap();
            assert_eq!(val, restored);
        }
    }
}
