//! Constant expression evaluation for elaboration.
//!
//! Evaluates compile-time constant Verilog expressions into [`ConstValue`]
//! results: literal parsing (including sized literals like `4'b1010`),
//! identifier lookup in a parameter environment, the full Verilog-2001
//! operator set (arithmetic, relational, case equality, logical, bitwise,
//! shifts), bit- and part-select, concat, replication, the x-propagating
//! ternary, and built-in functions such as `$clog2`/`$bits`/`$size`.
//!
//! User-defined constant-function calls are not evaluated here — that is
//! [`crate::const_func`]'s job, which calls back into this module to
//! evaluate the scalar expressions inside a function body.

use std::collections::HashMap;

use aion_common::{Ident, Interner, Logic, LogicVec};
use aion_diagnostics::DiagnosticSink;
use aion_ir::ConstValue;
use aion_source::SourceDb;
use aion_verilog_parser::ast as v_ast;

use crate::errors;

/// A mapping from interned identifiers to their constant values.
///
/// Used during elaboration to track parameter bindings and genvar values
/// so that constant expressions referencing parameters can be evaluated.
pub type ConstEnv = HashMap<Ident, ConstValue>;

/// Coerces a [`ConstValue`] to an `i64`, if the value can be represented as one.
///
/// - `Int`/`UInt`/`Time` convert directly.
/// - `Real(f)` truncates toward zero.
/// - `Scalar(Zero|One)` maps to `0`/`1`; `X`/`Z` have no integer value.
/// - `BitVector` converts if every bit is `0` or `1` and it fits in 64 bits.
/// - `String` and `Error` have no natural integer mapping.
pub fn const_to_i64(val: &ConstValue) -> Option<i64> {
    match val {
        ConstValue::Int(n) => Some(*n),
        ConstValue::UInt(n) => Some(*n as i64),
        ConstValue::Time(t) => Some(*t as i64),
        ConstValue::Real(f) => Some(*f as i64),
        ConstValue::Scalar(Logic::Zero) => Some(0),
        ConstValue::Scalar(Logic::One) => Some(1),
        ConstValue::Scalar(Logic::X) | ConstValue::Scalar(Logic::Z) => None,
        ConstValue::BitVector { bits, .. } => bits.to_u64().map(|u| u as i64),
        ConstValue::String(_) | ConstValue::Error => None,
    }
}

/// Coerces a value to its natural [`LogicVec`] representation for bitwise
/// operators: `Int`/`UInt` widen to 32 bits, `Time` to 64, `Scalar` to a
/// single bit, and `BitVector` passes through unchanged.
pub(crate) fn value_to_bitvector(val: &ConstValue) -> Option<LogicVec> {
    match val {
        ConstValue::Int(n) => Some(LogicVec::from_u64(*n as u64, 32)),
        ConstValue::UInt(n) => Some(LogicVec::from_u64(*n, 32)),
        ConstValue::Time(t) => Some(LogicVec::from_u64(*t, 64)),
        ConstValue::Scalar(l) => {
            let mut v = LogicVec::new(1);
            v.set(0, *l);
            Some(v)
        }
        ConstValue::BitVector { bits, .. } => Some(bits.clone()),
        ConstValue::Real(_) | ConstValue::String(_) | ConstValue::Error => None,
    }
}

/// Coerces a value to its three-state truth value: `Zero`/`One` for
/// definite falsy/truthy results, `X` if any bit is unknown. Returns `None`
/// only for values with no natural truth interpretation (`String`, `Error`).
pub(crate) fn value_truth(val: &ConstValue) -> Option<Logic> {
    match val {
        ConstValue::Real(f) => Some(if *f != 0.0 { Logic::One } else { Logic::Zero }),
        ConstValue::String(_) | ConstValue::Error => None,
        other => {
            let bv = value_to_bitvector(other)?;
            if bv.has_unknown() {
                Some(Logic::X)
            } else if bv.is_all_zero() {
                Some(Logic::Zero)
            } else {
                Some(Logic::One)
            }
        }
    }
}

/// Folds a [`LogicVec`] with a reduction operator, IEEE-1364 style: `x`
/// bits participate in the fold via [`Logic`]'s own truth tables, so e.g.
/// a reduction-AND with one `0` bit and one `x` bit is still `0`.
fn reduce_and(bv: &LogicVec) -> Logic {
    (0..bv.width()).map(|i| bv.get(i)).fold(Logic::One, |a, b| a & b)
}

fn reduce_or(bv: &LogicVec) -> Logic {
    (0..bv.width()).map(|i| bv.get(i)).fold(Logic::Zero, |a, b| a | b)
}

fn reduce_xor(bv: &LogicVec) -> Logic {
    (0..bv.width()).map(|i| bv.get(i)).fold(Logic::Zero, |a, b| a ^ b)
}

/// Builds a bit vector of the given width with every bit unknown, used as
/// the result of an out-of-range bit-/part-select (W202).
pub(crate) fn all_x(width: u32) -> LogicVec {
    let mut v = LogicVec::new(width);
    for i in 0..width {
        v.set(i, Logic::X);
    }
    v
}

/// Compares two bit vectors with Verilog's 4-state case-equality semantics:
/// `x` and `z` bits must match exactly, and operands are implicitly
/// zero-extended to the wider operand's width.
pub(crate) fn case_equal(l: &LogicVec, r: &LogicVec) -> bool {
    let width = l.width().max(r.width());
    for i in 0..width {
        let lb = if i < l.width() { l.get(i) } else { Logic::Zero };
        let rb = if i < r.width() { r.get(i) } else { Logic::Zero };
        if lb != rb {
            return false;
        }
    }
    true
}

/// Parses a Verilog/SystemVerilog numeric literal from its source text.
///
/// Handles plain decimal (`42`), sized binary (`4'b1010`), sized hex (`8'hFF`),
/// sized octal (`8'o17`), sized decimal (`32'd100`), unsized based literals
/// (`'b1`, `'hFF`), and underscore separators (`1_000`).
pub(crate) fn parse_verilog_literal(text: &str) -> Option<i64> {
    let text = text.replace('_', "");

    if let Some(tick_pos) = text.find('\'') {
        let after_tick = &text[tick_pos + 1..];
        if after_tick.is_empty() {
            return None;
        }

        // Skip optional 's'/'S' for signed base literals
        let after_sign = if after_tick.starts_with('s') || after_tick.starts_with('S') {
            &after_tick[1..]
        } else {
            after_tick
        };

        if after_sign.is_empty() {
            return None;
        }

        let base_char = after_sign.as_bytes()[0];
        let digits = &after_sign[1..];

        let radix = match base_char {
            b'b' | b'B' => 2,
            b'o' | b'O' => 8,
            b'd' | b'D' => 10,
            b'h' | b'H' => 16,
            _ => return None,
        };

        // Replace x/z/? with 0 for constant evaluation purposes
        let clean: String = digits
            .chars()
            .filter_map(|c| match c {
                'x' | 'X' | 'z' | 'Z' | '?' => Some('0'),
                '_' => None,
                other => Some(other),
            })
            .collect();

        return i64::from_str_radix(&clean, radix).ok();
    }

    text.parse::<i64>().ok()
}

/// Parses a sized or unsized Verilog numeric literal, also returning the
/// explicit bit width for sized forms (`8'hFF` → `(Some(8), 255)`).
/// Unsized literals (`42`) return `(None, 42)` — the caller infers a width.
pub(crate) fn parse_verilog_literal_with_width(text: &str) -> Option<(Option<u32>, i64)> {
    let cleaned = text.replace('_', "");

    if let Some(tick_pos) = cleaned.find('\'') {
        let width_str = &cleaned[..tick_pos];
        let width = if width_str.is_empty() {
            None
        } else {
            width_str.parse::<u32>().ok()
        };
        let val = parse_verilog_literal(text)?;
        Some((width, val))
    } else {
        let val = parse_verilog_literal(text)?;
        Some((None, val))
    }
}

/// Computes the ceiling of log-base-2 for a non-negative integer.
///
/// Follows the SystemVerilog `$clog2` semantics:
/// - `clog2(0) = 0`
/// - `clog2(1) = 0`
/// - `clog2(2) = 1`
/// - `clog2(3) = 2`
/// - `clog2(4) = 2`
fn clog2(n: i64) -> i64 {
    if n <= 1 {
        return 0;
    }
    let mut result = 0i64;
    let mut val = n - 1;
    while val > 0 {
        result += 1;
        val >>= 1;
    }
    result
}

/// Applies a binary arithmetic operation on two `i64` operands.
///
/// Returns `None` for division/modulo by zero, negative exponents, or
/// unsupported operator strings.
fn apply_binop_i64(op: &str, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        "+" => Some(lhs.wrapping_add(rhs)),
        "-" => Some(lhs.wrapping_sub(rhs)),
        "*" => Some(lhs.wrapping_mul(rhs)),
        "/" => {
            if rhs == 0 {
                None
            } else {
                Some(lhs / rhs)
            }
        }
        "%" => {
            if rhs == 0 {
                None
            } else {
                Some(lhs % rhs)
            }
        }
        "**" => {
            if rhs < 0 {
                Some(0)
            } else {
                Some(lhs.wrapping_pow(rhs as u32))
            }
        }
        _ => None,
    }
}

/// Evaluates a Verilog-2001 expression to a compile-time constant value.
///
/// This is the full evaluator: arithmetic, relational, case-equality,
/// logical and bitwise operators, shifts, reductions, bit-/part-selects,
/// concatenation, replication, the x-propagating ternary, and `$clog2`/
/// `$bits`/`$size`. Emits a diagnostic and returns `None` for anything that
/// cannot be evaluated at compile time (hierarchical names, user function
/// calls, unsupported system functions).
pub fn eval_value(
    expr: &v_ast::Expr,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<ConstValue> {
    match expr {
        v_ast::Expr::Literal { span } => {
            let text = source_db.snippet(*span);
            parse_verilog_literal(text).map(ConstValue::Int)
        }
        v_ast::Expr::RealLiteral { span } => {
            let text = source_db.snippet(*span).replace('_', "");
            text.parse::<f64>().ok().map(ConstValue::Real)
        }
        v_ast::Expr::StringLiteral { span } => {
            let text = source_db.snippet(*span);
            Some(ConstValue::String(text.trim_matches('"').to_string()))
        }
        v_ast::Expr::Identifier { name, span } => match env.get(name) {
            Some(val) => Some(val.clone()),
            None => {
                let name_str = interner.resolve(*name);
                sink.emit(errors::error_param_not_const(
                    &format!("unknown identifier `{name_str}`"),
                    *span,
                ));
                None
            }
        },
        v_ast::Expr::HierarchicalName { span, .. } => {
            sink.emit(errors::error_hier_name_in_const_expr(*span));
            None
        }
        v_ast::Expr::Index { base, index, span } => {
            let bv = value_to_bitvector(&eval_value(base, source_db, interner, env, sink)?)?;
            let idx = const_to_i64(&eval_value(index, source_db, interner, env, sink)?)?;
            if idx < 0 || idx as u32 >= bv.width() {
                sink.emit(errors::warn_out_of_range(*span));
                return Some(ConstValue::Scalar(Logic::X));
            }
            Some(ConstValue::Scalar(bv.get(idx as u32)))
        }
        v_ast::Expr::RangeSelect {
            base,
            msb,
            lsb,
            span,
        } => {
            let bv = value_to_bitvector(&eval_value(base, source_db, interner, env, sink)?)?;
            let msb = const_to_i64(&eval_value(msb, source_db, interner, env, sink)?)?;
            let lsb = const_to_i64(&eval_value(lsb, source_db, interner, env, sink)?)?;
            if msb < lsb {
                sink.emit(errors::error_range_order(*span));
                return None;
            }
            if lsb < 0 || msb as u32 >= bv.width() {
                sink.emit(errors::warn_out_of_range(*span));
                return Some(ConstValue::BitVector {
                    bits: all_x((msb - lsb + 1) as u32),
                    signed: false,
                });
            }
            Some(ConstValue::BitVector {
                bits: bv.slice(msb as u32, lsb as u32),
                signed: false,
            })
        }
        v_ast::Expr::PartSelect {
            base,
            index,
            ascending,
            width,
            span,
        } => {
            let bv = value_to_bitvector(&eval_value(base, source_db, interner, env, sink)?)?;
            let index = const_to_i64(&eval_value(index, source_db, interner, env, sink)?)?;
            let width = const_to_i64(&eval_value(width, source_db, interner, env, sink)?)?;
            if width <= 0 {
                sink.emit(errors::error_range_order(*span));
                return None;
            }
            let (low, high) = if *ascending {
                (index, index + width - 1)
            } else {
                (index - width + 1, index)
            };
            if low < 0 || high as u32 >= bv.width() {
                sink.emit(errors::warn_out_of_range(*span));
                return Some(ConstValue::BitVector {
                    bits: all_x(width as u32),
                    signed: false,
                });
            }
            Some(ConstValue::BitVector {
                bits: bv.slice(high as u32, low as u32),
                signed: false,
            })
        }
        v_ast::Expr::Concat { elements, span } => {
            if elements.is_empty() {
                sink.emit(errors::error_const_required(
                    "a concatenation operand",
                    *span,
                ));
                return None;
            }
            let mut parts = Vec::with_capacity(elements.len());
            for el in elements {
                parts.push(value_to_bitvector(&eval_value(
                    el, source_db, interner, env, sink,
                )?)?);
            }
            Some(ConstValue::BitVector {
                bits: LogicVec::concat(&parts),
                signed: false,
            })
        }
        v_ast::Expr::Repeat {
            count,
            elements,
            span,
        } => {
            let count = const_to_i64(&eval_value(count, source_db, interner, env, sink)?)?;
            if count < 0 {
                sink.emit(errors::error_const_required(
                    "a non-negative replication count",
                    *span,
                ));
                return None;
            }
            let mut parts = Vec::with_capacity(elements.len());
            for el in elements {
                parts.push(value_to_bitvector(&eval_value(
                    el, source_db, interner, env, sink,
                )?)?);
            }
            Some(ConstValue::BitVector {
                bits: LogicVec::concat(&parts).repeat(count as u32),
                signed: false,
            })
        }
        v_ast::Expr::Unary { op, operand, span } => {
            eval_unary(op, operand, *span, source_db, interner, env, sink)
        }
        v_ast::Expr::Binary {
            left,
            op,
            right,
            span,
        } => eval_binary(left, op, right, *span, source_db, interner, env, sink),
        v_ast::Expr::Ternary {
            condition,
            then_expr,
            else_expr,
            ..
        } => {
            let cond = eval_value(condition, source_db, interner, env, sink)?;
            let truth = value_truth(&cond)?;
            let then_val = eval_value(then_expr, source_db, interner, env, sink)?;
            let else_val = eval_value(else_expr, source_db, interner, env, sink)?;
            match truth {
                Logic::One => Some(then_val),
                Logic::Zero => Some(else_val),
                Logic::X | Logic::Z => {
                    let then_bv = value_to_bitvector(&then_val)?;
                    let else_bv = value_to_bitvector(&else_val)?;
                    let width = then_bv.width().max(else_bv.width());
                    let mut result = LogicVec::new(width);
                    for i in 0..width {
                        let a = if i < then_bv.width() {
                            then_bv.get(i)
                        } else {
                            Logic::Zero
                        };
                        let b = if i < else_bv.width() {
                            else_bv.get(i)
                        } else {
                            Logic::Zero
                        };
                        result.set(i, if a == b { a } else { Logic::X });
                    }
                    Some(ConstValue::BitVector {
                        bits: result,
                        signed: false,
                    })
                }
            }
        }
        v_ast::Expr::FuncCall { name, span, .. } => {
            let name_str = match name.as_ref() {
                v_ast::Expr::Identifier { name, .. } => interner.resolve(*name).to_string(),
                _ => "<expr>".to_string(),
            };
            sink.emit(errors::error_not_a_const_function(&name_str, *span));
            None
        }
        v_ast::Expr::SystemCall { name, args, span } => {
            eval_system_call(*name, args, *span, source_db, interner, env, sink)
        }
        v_ast::Expr::Paren { inner, .. } => eval_value(inner, source_db, interner, env, sink),
        v_ast::Expr::Error(_) => None,
    }
}

/// Backwards-compatible alias for [`eval_value`].
pub fn eval_verilog_expr(
    expr: &v_ast::Expr,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<ConstValue> {
    eval_value(expr, source_db, interner, env, sink)
}

fn eval_unary(
    op: &v_ast::UnaryOp,
    operand: &v_ast::Expr,
    span: aion_source::Span,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<ConstValue> {
    let val = eval_value(operand, source_db, interner, env, sink)?;
    match op {
        v_ast::UnaryOp::Plus => Some(val),
        v_ast::UnaryOp::Minus => {
            if let ConstValue::Real(f) = &val {
                return Some(ConstValue::Real(-f));
            }
            let n = const_to_i64(&val).or_else(|| {
                sink.emit(errors::error_int_required(span));
                None
            })?;
            Some(ConstValue::Int(-n))
        }
        v_ast::UnaryOp::LogNot => {
            let truth = value_truth(&val)?;
            Some(ConstValue::Scalar(!truth))
        }
        v_ast::UnaryOp::BitNot => {
            let bv = value_to_bitvector(&val).or_else(|| {
                sink.emit(errors::error_bitvector_required(span));
                None
            })?;
            let bits = (0..bv.width()).fold(LogicVec::new(bv.width()), |mut acc, i| {
                acc.set(i, !bv.get(i));
                acc
            });
            Some(ConstValue::BitVector {
                bits,
                signed: false,
            })
        }
        v_ast::UnaryOp::RedAnd | v_ast::UnaryOp::RedNand => {
            let bv = value_to_bitvector(&val)?;
            let r = reduce_and(&bv);
            Some(ConstValue::Scalar(if matches!(op, v_ast::UnaryOp::RedNand) {
                !r
            } else {
                r
            }))
        }
        v_ast::UnaryOp::RedOr | v_ast::UnaryOp::RedNor => {
            let bv = value_to_bitvector(&val)?;
            let r = reduce_or(&bv);
            Some(ConstValue::Scalar(if matches!(op, v_ast::UnaryOp::RedNor) {
                !r
            } else {
                r
            }))
        }
        v_ast::UnaryOp::RedXor | v_ast::UnaryOp::RedXnor => {
            let bv = value_to_bitvector(&val)?;
            let r = reduce_xor(&bv);
            Some(ConstValue::Scalar(
                if matches!(op, v_ast::UnaryOp::RedXnor) {
                    !r
                } else {
                    r
                },
            ))
        }
    }
}

fn eval_binary(
    left: &v_ast::Expr,
    op: &v_ast::BinaryOp,
    right: &v_ast::Expr,
    span: aion_source::Span,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<ConstValue> {
    use v_ast::BinaryOp::*;

    let lhs = eval_value(left, source_db, interner, env, sink)?;
    let rhs = eval_value(right, source_db, interner, env, sink)?;

    match op {
        Add | Sub | Mul | Div | Mod | Pow => {
            let op_str = match op {
                Add => "+",
                Sub => "-",
                Mul => "*",
                Div => "/",
                Mod => "%",
                Pow => "**",
                _ => unreachable!(),
            };
            let l = const_to_i64(&lhs)?;
            let r = const_to_i64(&rhs)?;
            match apply_binop_i64(op_str, l, r) {
                Some(result) => Some(ConstValue::Int(result)),
                None => {
                    sink.emit(errors::error_param_not_const(
                        "arithmetic overflow or unsupported operator",
                        span,
                    ));
                    None
                }
            }
        }
        Lt | Le | Gt | Ge => {
            let l = const_to_i64(&lhs)?;
            let r = const_to_i64(&rhs)?;
            let result = match op {
                Lt => l < r,
                Le => l <= r,
                Gt => l > r,
                Ge => l >= r,
                _ => unreachable!(),
            };
            Some(ConstValue::Scalar(if result {
                Logic::One
            } else {
                Logic::Zero
            }))
        }
        Eq | Neq => {
            let result = match (const_to_i64(&lhs), const_to_i64(&rhs)) {
                (Some(l), Some(r)) => {
                    if l == r {
                        Logic::One
                    } else {
                        Logic::Zero
                    }
                }
                _ => Logic::X,
            };
            Some(ConstValue::Scalar(if matches!(op, Neq) {
                !result
            } else {
                result
            }))
        }
        CaseEq | CaseNeq => {
            let l = value_to_bitvector(&lhs)?;
            let r = value_to_bitvector(&rhs)?;
            let eq = case_equal(&l, &r);
            let result = if matches!(op, CaseNeq) { !eq } else { eq };
            Some(ConstValue::Scalar(if result {
                Logic::One
            } else {
                Logic::Zero
            }))
        }
        LogAnd | LogOr => {
            let l = value_truth(&lhs)?;
            let r = value_truth(&rhs)?;
            let result = if matches!(op, LogAnd) { l & r } else { l | r };
            Some(ConstValue::Scalar(result))
        }
        BitAnd | BitOr | BitXor | BitXnor => {
            let l = value_to_bitvector(&lhs).or_else(|| {
                sink.emit(errors::error_bitvector_required(span));
                None
            })?;
            let r = value_to_bitvector(&rhs).or_else(|| {
                sink.emit(errors::error_bitvector_required(span));
                None
            })?;
            let width = l.width().max(r.width());
            let widen = |v: &LogicVec| {
                let mut out = LogicVec::new(width);
                for i in 0..width {
                    out.set(i, if i < v.width() { v.get(i) } else { Logic::Zero });
                }
                out
            };
            let (lw, rw) = (widen(&l), widen(&r));
            let mut bits = LogicVec::new(width);
            for i in 0..width {
                let (a, b) = (lw.get(i), rw.get(i));
                let v = match op {
                    BitAnd => a & b,
                    BitOr => a | b,
                    BitXor => a ^ b,
                    BitXnor => !(a ^ b),
                    _ => unreachable!(),
                };
                bits.set(i, v);
            }
            Some(ConstValue::BitVector {
                bits,
                signed: false,
            })
        }
        Shl | Shr | AShl | AShr => {
            let l = value_to_bitvector(&lhs).or_else(|| {
                sink.emit(errors::error_bitvector_required(span));
                None
            })?;
            let amount = const_to_i64(&rhs)?;
            if amount < 0 {
                sink.emit(errors::error_int_required(span));
                return None;
            }
            let amount = amount as u32;
            let bits = match op {
                Shl | AShl => l.shl(amount),
                Shr => l.lshr(amount),
                AShr => l.ashr(amount),
                _ => unreachable!(),
            };
            Some(ConstValue::BitVector {
                bits,
                signed: false,
            })
        }
    }
}

fn eval_system_call(
    name: Ident,
    args: &[v_ast::Expr],
    span: aion_source::Span,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<ConstValue> {
    let func_name = interner.resolve(name);
    match func_name {
        "$clog2" => {
            if args.len() != 1 {
                sink.emit(errors::error_argument_count_mismatch(1, args.len(), span));
                return None;
            }
            let arg_val = eval_value(&args[0], source_db, interner, env, sink)?;
            let n = const_to_i64(&arg_val)?;
            Some(ConstValue::Int(clog2(n)))
        }
        "$bits" | "$size" => {
            if args.len() != 1 {
                sink.emit(errors::error_argument_count_mismatch(1, args.len(), span));
                return None;
            }
            let arg_val = eval_value(&args[0], source_db, interner, env, sink)?;
            match arg_val.width() {
                Some(w) => Some(ConstValue::Int(w as i64)),
                None => {
                    sink.emit(errors::error_int_required(span));
                    None
                }
            }
        }
        _ => {
            sink.emit(errors::error_sys_func_in_const_expr(func_name, span));
            None
        }
    }
}

/// Evaluates an expression as a plain `i64`, failing on any non-integer result.
pub fn eval_int(
    expr: &v_ast::Expr,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<i64> {
    let val = eval_value(expr, source_db, interner, env, sink)?;
    const_to_i64(&val).or_else(|| {
        sink.emit(errors::error_int_required(expr.span()));
        None
    })
}

/// Evaluates an expression as a Rust `bool` (`0` is false, anything else true).
/// `x`/`z` results are treated as non-constant and return `None`.
pub fn eval_bool(
    expr: &v_ast::Expr,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<bool> {
    eval_int(expr, source_db, interner, env, sink).map(|n| n != 0)
}

/// Evaluates an expression to a single 4-state [`Logic`] value, collapsing
/// wider results to their truth value (`x` propagates).
pub fn eval_scalar(
    expr: &v_ast::Expr,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<Logic> {
    let val = eval_value(expr, source_db, interner, env, sink)?;
    value_truth(&val)
}

/// Evaluates an expression as a [`LogicVec`] bit vector.
pub fn eval_bitvector(
    expr: &v_ast::Expr,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<LogicVec> {
    let val = eval_value(expr, source_db, interner, env, sink)?;
    value_to_bitvector(&val).or_else(|| {
        sink.emit(errors::error_bitvector_required(expr.span()));
        None
    })
}

/// Best-effort evaluation that never emits diagnostics: returns `(value, true)`
/// if the expression is fully constant, `(0, false)` otherwise. Used in
/// contexts that tolerate a non-constant result without treating it as an
/// elaboration error (e.g. probing whether a defparam target is foldable yet).
pub fn eval_int_if_const(
    expr: &v_ast::Expr,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
) -> (i64, bool) {
    let quiet_sink = DiagnosticSink::new();
    match eval_int(expr, source_db, interner, env, &quiet_sink) {
        Some(n) => (n, true),
        None => (0, false),
    }
}

/// Evaluates a Verilog range to an `(msb, lsb)` pair of integer values.
///
/// Both the MSB and LSB expressions are evaluated as constants using the
/// given parameter environment.
pub fn eval_verilog_range(
    range: &v_ast::Range,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<(i64, i64)> {
    let msb = eval_int(&range.msb, source_db, interner, env, sink)?;
    let lsb = eval_int(&range.lsb, source_db, interner, env, sink)?;
    Some((msb, lsb))
}

/// Alias for [`eval_verilog_range`] matching the evaluator's named API.
pub fn eval_range(
    range: &v_ast::Range,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
) -> Option<(i64, i64)> {
    eval_verilog_range(range, source_db, interner, env, sink)
}
