//! Verilog type indications to IR [`TypeId`] resolution.
//!
//! Converts range/net-type pairs from the parsed AST into the unified
//! [`Type`] system via [`TypeDb::intern`].

use aion_common::Interner;
use aion_diagnostics::DiagnosticSink;
use aion_ir::types::{Type, TypeDb};
use aion_ir::TypeId;
use aion_source::SourceDb;

use crate::const_eval::{self, ConstEnv};

/// Resolves a Verilog type from an optional range and signed flag to a [`TypeId`].
///
/// No range produces [`Type::Bit`]. A range `[N:M]` produces
/// [`Type::BitVec`] with `width = |N - M| + 1`.
pub fn resolve_verilog_type(
    range: Option<&aion_verilog_parser::ast::Range>,
    signed: bool,
    types: &mut TypeDb,
    env: &ConstEnv,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> TypeId {
    match range {
        None => types.intern(Type::Bit),
        Some(r) => {
            if let Some((msb, lsb)) =
                const_eval::eval_verilog_range(r, source_db, interner, env, sink)
            {
                let width = (msb - lsb).unsigned_abs() as u32 + 1;
                types.intern(Type::BitVec { width, signed })
            } else {
                types.intern(Type::Error)
            }
        }
    }
}

/// Resolves a Verilog net type (`wire`, `reg`, `integer`, `real`) to a [`TypeId`].
#[allow(clippy::too_many_arguments)]
pub fn resolve_verilog_net_type(
    net_type: Option<&aion_verilog_parser::ast::NetType>,
    range: Option<&aion_verilog_parser::ast::Range>,
    signed: bool,
    types: &mut TypeDb,
    env: &ConstEnv,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> TypeId {
    use aion_verilog_parser::ast::NetType;
    match net_type {
        Some(NetType::Integer) => types.intern(Type::Integer),
        Some(NetType::Real) => types.intern(Type::Real),
        _ => resolve_verilog_type(range, signed, types, env, source_db, interner, sink),
    }
}
