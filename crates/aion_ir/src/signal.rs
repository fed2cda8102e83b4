//! Signal definitions and references.
//!
//! A [`Signal`] represents a named wire, register, variable, or parameter
//! within a scope. [`SignalRef`] provides a way to refer to a full signal, a
//! bit-slice, or a concatenation.

use crate::ids::{ClockDomainId, ScopeId, SignalId, TypeId};
use aion_common::{Ident, LogicVec};
use aion_source::Span;
use serde::{Deserialize, Serialize};

use crate::const_value::ConstValue;

/// The kind of a signal, determining its storage semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// A combinational signal (wire/net).
    Wire,
    /// A sequential signal (flip-flop output, `reg` written from an `always`).
    Reg,
    /// A latch output (usually a lint warning).
    Latch,
    /// A signal that backs a port.
    Port,
    /// A compile-time constant.
    Const,
    /// An `integer` declaration (32-bit signed, 2-state in the underlying
    /// language but modeled here with the design's normal 4-state storage).
    Integer,
    /// A `real`/`realtime` declaration.
    Real,
    /// A `time` declaration.
    Time,
    /// A `event` declaration.
    Event,
    /// A module `parameter`.
    Parameter,
    /// A `localparam`.
    Localparam,
    /// A `specparam`.
    Specparam,
}

/// A signal (wire, register, variable, or parameter) within a scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The unique ID of this signal within its module.
    pub id: SignalId,
    /// The signal name.
    pub name: Ident,
    /// The type of this signal.
    pub ty: TypeId,
    /// The storage kind (wire, reg, latch, etc.).
    pub kind: SignalKind,
    /// An optional initial/reset value.
    pub init: Option<ConstValue>,
    /// The clock domain this signal belongs to, if sequential.
    pub clock_domain: Option<ClockDomainId>,
    /// The scope in which this signal was declared.
    pub scope: ScopeId,
    /// Unpacked array dimensions, outermost first, as `(left, right)` bound
    /// pairs exactly as written (not normalized to msb/lsb). Empty for a
    /// scalar or purely-packed declaration.
    pub unpacked_dims: Vec<(i64, i64)>,
    /// The source span where this signal was declared.
    pub span: Span,
}

/// A reference to a signal or part of a signal.
///
/// Used in connections, assignments, and expressions to refer to
/// full signals, bit-slices, concatenations, or constant values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignalRef {
    /// A reference to a full signal.
    Signal(SignalId),
    /// A bit-slice of a signal.
    Slice {
        /// The signal being sliced.
        signal: SignalId,
        /// The high bit index (inclusive).
        high: u32,
        /// The low bit index (inclusive).
        low: u32,
    },
    /// A concatenation of signal references.
    Concat(Vec<SignalRef>),
    /// A constant value.
    Const(LogicVec),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_signal(kind: SignalKind) -> Signal {
        Signal {
            id: SignalId::from_raw(0),
            name: Ident::from_raw(1),
            ty: TypeId::from_raw(0),
            kind,
            init: None,
            clock_domain: None,
            scope: ScopeId::from_raw(0),
            unpacked_dims: Vec::new(),
            span: Span::DUMMY,
        }
    }

    #[test]
    fn signal_construction() {
        let sig = base_signal(SignalKind::Wire);
        assert_eq!(sig.kind, SignalKind::Wire);
        assert!(sig.init.is_none());
    }

    #[test]
    fn signal_with_init() {
        let mut sig = base_signal(SignalKind::Reg);
        sig.init = Some(ConstValue::Int(0));
        sig.clock_domain = Some(ClockDomainId::from_raw(0));
        assert_eq!(sig.kind, SignalKind::Reg);
        assert!(sig.init.is_some());
        assert!(sig.clock_domain.is_some());
    }

    #[test]
    fn signal_with_unpacked_dims() {
        let mut sig = base_signal(SignalKind::Reg);
        sig.unpacked_dims = vec![(7, 0), (3, 0)];
        assert_eq!(sig.unpacked_dims.len(), 2);
        assert_eq!(sig.unpacked_dims[0], (7, 0));
    }

    #[test]
    fn signal_kinds_distinct() {
        let kinds = [
            SignalKind::Wire,
            SignalKind::Reg,
            SignalKind::Latch,
            SignalKind::Port,
            SignalKind::Const,
            SignalKind::Integer,
            SignalKind::Real,
            SignalKind::Time,
            SignalKind::Event,
            SignalKind::Parameter,
            SignalKind::Localparam,
            SignalKind::Specparam,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for (j, b) in kinds.iter().enumerate() {
                if i == j {
                    assert_eq!(a, b);
                } else {
                    assert_ne!(a, b);
                }
            }
        }
    }

    #[test]
    fn signal_ref_full() {
        let r = SignalRef::Signal(SignalId::from_raw(5));
        assert_eq!(r, SignalRef::Signal(SignalId::from_raw(5)));
    }

    #[test]
    fn signal_ref_slice() {
        let r = SignalRef::Slice {
            signal: SignalId::from_raw(3),
            high: 7,
            low: 0,
        };
        if let SignalRef::Slice { high, low, .. } = r {
            assert_eq!(high, 7);
            assert_eq!(low, 0);
        } else {
            panic!("expected Slice variant");
        }
    }

    #[test]
    fn signal_ref_concat() {
        let r = SignalRef::Concat(vec![
            SignalRef::Signal(SignalId::from_raw(0)),
            SignalRef::Signal(SignalId::from_raw(1)),
        ]);
        if let SignalRef::Concat(refs) = r {
            assert_eq!(refs.len(), 2);
        } else {
            panic!("expected Concat variant");
        }
    }

    #[test]
    fn signal_ref_const() {
        let lv = LogicVec::all_zero(4);
        let r = SignalRef::Const(lv);
        if let SignalRef::Const(v) = r {
            assert_eq!(v.width(), 4);
        } else {
            panic!("expected Const variant");
        }
    }

    #[test]
    fn signal_serde_roundtrip() {
        let sig = base_signal(SignalKind::Parameter);
        let json = serde_json::to_string(&sig).unwrap();
        let restored: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.kind, sig.kind);
        assert_eq!(restored.scope, sig.scope);
    }
}
