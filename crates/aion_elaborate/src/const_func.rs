//! Constant-function interpreter (§4.4).
//!
//! Verilog `function`s referenced from a constant context (a parameter
//! default, a `localparam`, a range bound, a generate condition, ...) must be
//! interpretable at elaboration time without touching the simulation kernel.
//! This module provides that: it binds call arguments into a fresh variable
//! frame, runs the function body's statements against that frame, and reads
//! the result back out of the implicit same-named return variable.
//!
//! Expression evaluation within a function body is delegated to
//! [`crate::const_eval`] for everything except nested constant-function
//! calls, which this module resolves itself (see [`eval_expr`]) so that one
//! constant function can call another.

use std::cell::Cell;
use std::collections::HashMap;

use aion_common::{Ident, Interner, Logic, LogicVec};
use aion_diagnostics::DiagnosticSink;
use aion_ir::ConstValue;
use aion_source::SourceDb;
use aion_verilog_parser::ast as v_ast;

use crate::const_eval::{self, ConstEnv};
use crate::errors;

/// Caps the number of loop-body executions within a single top-level call,
/// guarding against runaway `for`/`while`/`forever` loops in malformed or
/// adversarial sources.
const MAX_LOOP_STEPS: u32 = 1_000_000;

/// Caps constant-function call nesting depth, independent of the recursion
/// check below (mutual recursion through several distinct functions would
/// otherwise never trip the single-function guard).
const MAX_CALL_DEPTH: u32 = 256;

/// Table of constant-evaluable function declarations, keyed by name.
///
/// Built once by the caller (typically by scanning a module's declarations)
/// and threaded through every nested call.
#[derive(Debug, Default)]
pub struct ConstFuncTable<'a> {
    funcs: HashMap<Ident, &'a v_ast::FunctionDecl>,
    in_use: HashMap<Ident, Cell<bool>>,
}

impl<'a> ConstFuncTable<'a> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function declaration under its own name.
    pub fn insert(&mut self, decl: &'a v_ast::FunctionDecl) {
        self.funcs.insert(decl.name, decl);
        self.in_use.insert(decl.name, Cell::new(false));
    }

    /// Looks up a declaration by name.
    pub fn get(&self, name: Ident) -> Option<&'a v_ast::FunctionDecl> {
        self.funcs.get(&name).copied()
    }
}

/// Control-flow result of executing a statement.
enum Flow {
    /// Fell through normally.
    Normal,
    /// A `disable` targeting the named block/task is unwinding; callers
    /// whose label matches swallow it, others propagate it upward.
    Disabled(Ident),
}

/// Evaluates a call to a constant function, returning its result value.
///
/// `args` are the already-evaluated argument values, in declaration order.
/// Emits [`errors::error_argument_count_mismatch`] on arity mismatch and
/// [`errors::error_recursive_const_function`] if `decl` is already on the
/// call stack.
pub fn call_function(
    decl: &v_ast::FunctionDecl,
    args: &[ConstValue],
    table: &ConstFuncTable<'_>,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
    depth: u32,
) -> Option<ConstValue> {
    let param_names: Vec<Ident> = decl
        .inputs
        .iter()
        .flat_map(|p| p.names.iter().copied())
        .collect();

    if args.len() != param_names.len() {
        sink.emit(errors::error_argument_count_mismatch(
            param_names.len(),
            args.len(),
            decl.span,
        ));
        return None;
    }

    if depth >= MAX_CALL_DEPTH {
        sink.emit(errors::error_recursive_const_function(
            interner.resolve(decl.name),
            decl.span,
        ));
        return None;
    }

    let guard = table.in_use.get(&decl.name);
    if let Some(g) = guard {
        if g.get() {
            sink.emit(errors::error_recursive_const_function(
                interner.resolve(decl.name),
                decl.span,
            ));
            return None;
        }
        g.set(true);
    }

    let result = run_body(decl, &param_names, args, table, source_db, interner, sink, depth);

    if let Some(g) = guard {
        g.set(false);
    }

    result
}

fn run_body(
    decl: &v_ast::FunctionDecl,
    param_names: &[Ident],
    args: &[ConstValue],
    table: &ConstFuncTable<'_>,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
    depth: u32,
) -> Option<ConstValue> {
    let mut env: ConstEnv = HashMap::new();

    for (name, val) in param_names.iter().zip(args.iter()) {
        env.insert(*name, val.clone());
    }

    for item in &decl.decls {
        bind_local_decl(item, &mut env, source_db, interner, sink);
    }

    // The implicit return variable shares the function's own name and width.
    let ret_width = decl.range.as_ref().and_then(|r| {
        let msb = const_eval::eval_int(&r.msb, source_db, interner, &env, sink)?;
        let lsb = const_eval::eval_int(&r.lsb, source_db, interner, &env, sink)?;
        Some((msb - lsb).unsigned_abs() as u32 + 1)
    });
    env.entry(decl.name).or_insert_with(|| match ret_width {
        Some(w) => ConstValue::BitVector {
            bits: const_eval::all_x(w),
            signed: decl.signed,
        },
        None => ConstValue::Scalar(Logic::X),
    });

    let mut steps = 0u32;
    for stmt in &decl.body {
        match exec_stmt(stmt, table, source_db, interner, &mut env, sink, depth, &mut steps)? {
            Flow::Normal => {}
            Flow::Disabled(_) => break,
        }
    }

    env.get(&decl.name).cloned()
}

fn bind_local_decl(
    item: &v_ast::ModuleItem,
    env: &mut ConstEnv,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    match item {
        v_ast::ModuleItem::RegDecl(reg) => {
            let width = reg
                .range
                .as_ref()
                .and_then(|r| {
                    let msb = const_eval::eval_int(&r.msb, source_db, interner, env, sink)?;
                    let lsb = const_eval::eval_int(&r.lsb, source_db, interner, env, sink)?;
                    Some((msb - lsb).unsigned_abs() as u32 + 1)
                })
                .unwrap_or(1);
            for decl_name in &reg.names {
                let value = match &decl_name.init {
                    Some(init_expr) => {
                        const_eval::eval_value(init_expr, source_db, interner, env, sink)
                            .unwrap_or(ConstValue::BitVector {
                                bits: const_eval::all_x(width),
                                signed: reg.signed,
                            })
                    }
                    None => ConstValue::BitVector {
                        bits: const_eval::all_x(width),
                        signed: reg.signed,
                    },
                };
                env.insert(decl_name.name, value);
            }
        }
        v_ast::ModuleItem::IntegerDecl(int_decl) => {
            for decl_name in &int_decl.names {
                env.insert(decl_name.name, ConstValue::Int(0));
            }
        }
        v_ast::ModuleItem::RealDecl(real_decl) => {
            for decl_name in &real_decl.names {
                env.insert(decl_name.name, ConstValue::Real(0.0));
            }
        }
        _ => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn exec_stmt(
    stmt: &v_ast::Statement,
    table: &ConstFuncTable<'_>,
    source_db: &SourceDb,
    interner: &Interner,
    env: &mut ConstEnv,
    sink: &DiagnosticSink,
    depth: u32,
    steps: &mut u32,
) -> Option<Flow> {
    match stmt {
        v_ast::Statement::Blocking { target, value, .. }
        | v_ast::Statement::NonBlocking { target, value, .. } => {
            let val = eval_expr(value, Some(table), source_db, interner, env, sink, depth)?;
            assign_lhs(target, val, source_db, interner, env, sink)?;
            Some(Flow::Normal)
        }
        v_ast::Statement::Block { label, stmts, .. } => {
            for s in stmts {
                match exec_stmt(s, table, source_db, interner, env, sink, depth, steps)? {
                    Flow::Normal => {}
                    Flow::Disabled(name) => {
                        if Some(name) == *label {
                            return Some(Flow::Normal);
                        }
                        return Some(Flow::Disabled(name));
                    }
                }
            }
            Some(Flow::Normal)
        }
        v_ast::Statement::If {
            condition,
            then_stmt,
            else_stmt,
            ..
        } => {
            let val = eval_expr(condition, Some(table), source_db, interner, env, sink, depth)?;
            let truth = const_eval::value_truth(&val)?;
            match truth {
                Logic::One => exec_stmt(then_stmt, table, source_db, interner, env, sink, depth, steps),
                _ => match else_stmt {
                    Some(e) => exec_stmt(e, table, source_db, interner, env, sink, depth, steps),
                    None => Some(Flow::Normal),
                },
            }
        }
        v_ast::Statement::Case {
            kind, expr, arms, ..
        } => {
            let scrutinee = eval_expr(expr, Some(table), source_db, interner, env, sink, depth)?;
            let scrutinee_bits = const_eval::value_to_bitvector(&scrutinee)?;
            let mut matched_arm = None;
            for arm in arms {
                if arm.is_default {
                    continue;
                }
                for pat in &arm.patterns {
                    let pat_val = eval_expr(pat, Some(table), source_db, interner, env, sink, depth)?;
                    let pat_bits = const_eval::value_to_bitvector(&pat_val)?;
                    if case_matches(*kind, &scrutinee_bits, &pat_bits) {
                        matched_arm = Some(arm);
                        break;
                    }
                }
                if matched_arm.is_some() {
                    break;
                }
            }
            let arm = matched_arm.or_else(|| arms.iter().find(|a| a.is_default));
            match arm {
                Some(a) => exec_stmt(&a.body, table, source_db, interner, env, sink, depth, steps),
                None => Some(Flow::Normal),
            }
        }
        v_ast::Statement::For {
            init,
            condition,
            step,
            body,
            ..
        } => {
            exec_stmt(init, table, source_db, interner, env, sink, depth, steps)?;
            loop {
                let cond_val = eval_expr(condition, Some(table), source_db, interner, env, sink, depth)?;
                if const_eval::value_truth(&cond_val)? != Logic::One {
                    break;
                }
                *steps += 1;
                if *steps > MAX_LOOP_STEPS {
                    sink.emit(errors::error_unsupported(
                        "constant function loop exceeded step limit",
                        stmt_span(stmt),
                    ));
                    return None;
                }
                match exec_stmt(body, table, source_db, interner, env, sink, depth, steps)? {
                    Flow::Normal => {}
                    d @ Flow::Disabled(_) => return Some(d),
                }
                exec_stmt(step, table, source_db, interner, env, sink, depth, steps)?;
            }
            Some(Flow::Normal)
        }
        v_ast::Statement::While {
            condition, body, ..
        } => {
            loop {
                let cond_val = eval_expr(condition, Some(table), source_db, interner, env, sink, depth)?;
                if const_eval::value_truth(&cond_val)? != Logic::One {
                    break;
                }
                *steps += 1;
                if *steps > MAX_LOOP_STEPS {
                    sink.emit(errors::error_unsupported(
                        "constant function loop exceeded step limit",
                        stmt_span(stmt),
                    ));
                    return None;
                }
                match exec_stmt(body, table, source_db, interner, env, sink, depth, steps)? {
                    Flow::Normal => {}
                    d @ Flow::Disabled(_) => return Some(d),
                }
            }
            Some(Flow::Normal)
        }
        v_ast::Statement::Repeat { count, body, .. } => {
            let count_val = eval_expr(count, Some(table), source_db, interner, env, sink, depth)?;
            let n = const_eval::const_to_i64(&count_val)?;
            for _ in 0..n.max(0) {
                *steps += 1;
                if *steps > MAX_LOOP_STEPS {
                    sink.emit(errors::error_unsupported(
                        "constant function loop exceeded step limit",
                        stmt_span(stmt),
                    ));
                    return None;
                }
                match exec_stmt(body, table, source_db, interner, env, sink, depth, steps)? {
                    Flow::Normal => {}
                    d @ Flow::Disabled(_) => return Some(d),
                }
            }
            Some(Flow::Normal)
        }
        v_ast::Statement::Forever { body, .. } => loop {
            *steps += 1;
            if *steps > MAX_LOOP_STEPS {
                sink.emit(errors::error_unsupported(
                    "constant function `forever` loop exceeded step limit",
                    stmt_span(stmt),
                ));
                return None;
            }
            match exec_stmt(body, table, source_db, interner, env, sink, depth, steps)? {
                Flow::Normal => {}
                d @ Flow::Disabled(_) => return Some(d),
            }
        },
        v_ast::Statement::Disable { name, .. } => Some(Flow::Disabled(*name)),
        v_ast::Statement::Null { .. } | v_ast::Statement::SystemTaskCall { .. } => {
            Some(Flow::Normal)
        }
        v_ast::Statement::TaskCall { span, .. }
        | v_ast::Statement::Wait { span, .. }
        | v_ast::Statement::EventControl { span, .. }
        | v_ast::Statement::Delay { span, .. } => {
            sink.emit(errors::error_unsupported(
                "timing/task control inside a constant function",
                *span,
            ));
            None
        }
        v_ast::Statement::Error(_) => None,
    }
}

fn stmt_span(stmt: &v_ast::Statement) -> aion_source::Span {
    use v_ast::Statement::*;
    match stmt {
        Blocking { span, .. }
        | NonBlocking { span, .. }
        | Block { span, .. }
        | If { span, .. }
        | Case { span, .. }
        | For { span, .. }
        | While { span, .. }
        | Forever { span, .. }
        | Repeat { span, .. }
        | Wait { span, .. }
        | EventControl { span, .. }
        | Delay { span, .. }
        | TaskCall { span, .. }
        | SystemTaskCall { span, .. }
        | Disable { span, .. }
        | Null { span } => *span,
        Error(s) => *s,
    }
}

/// Matches a case scrutinee against a pattern per `case`/`casex`/`casez`
/// don't-care rules: `casex` ignores `x`/`z` in either operand, `casez`
/// ignores only `z`.
fn case_matches(kind: v_ast::CaseKind, scrutinee: &LogicVec, pattern: &LogicVec) -> bool {
    let width = scrutinee.width().max(pattern.width());
    for i in 0..width {
        let s = if i < scrutinee.width() {
            scrutinee.get(i)
        } else {
            Logic::Zero
        };
        let p = if i < pattern.width() {
            pattern.get(i)
        } else {
            Logic::Zero
        };
        let dont_care = match kind {
            v_ast::CaseKind::Case => false,
            v_ast::CaseKind::Casex => matches!(s, Logic::X | Logic::Z) || matches!(p, Logic::X | Logic::Z),
            v_ast::CaseKind::Casez => matches!(s, Logic::Z) || matches!(p, Logic::Z),
        };
        if dont_care {
            continue;
        }
        if s != p {
            return false;
        }
    }
    true
}

/// Assigns `val` into the variable(s) named by an LHS expression, handling
/// whole-variable, bit-select, part-select, and concatenation targets.
fn assign_lhs(
    target: &v_ast::Expr,
    val: ConstValue,
    source_db: &SourceDb,
    interner: &Interner,
    env: &mut ConstEnv,
    sink: &DiagnosticSink,
) -> Option<()> {
    match target {
        v_ast::Expr::Identifier { name, .. } => {
            env.insert(*name, val);
            Some(())
        }
        v_ast::Expr::Index { base, index, span } => {
            let name = lhs_ident(base, sink)?;
            let mut bits = env
                .get(&name)
                .and_then(const_eval::value_to_bitvector)
                .unwrap_or_else(|| const_eval::all_x(1));
            let idx = const_eval::eval_int(index, source_db, interner, env, sink)?;
            if idx < 0 || idx as u32 >= bits.width() {
                sink.emit(errors::warn_out_of_range(*span));
                return Some(());
            }
            let bit = const_eval::value_truth(&val).unwrap_or(Logic::X);
            bits.set(idx as u32, bit);
            env.insert(name, ConstValue::BitVector { bits, signed: false });
            Some(())
        }
        v_ast::Expr::RangeSelect {
            base, msb, lsb, span,
        } => {
            let name = lhs_ident(base, sink)?;
            let mut bits = env
                .get(&name)
                .and_then(const_eval::value_to_bitvector)
                .unwrap_or_else(|| const_eval::all_x(1));
            let msb_v = const_eval::eval_int(msb, source_db, interner, env, sink)?;
            let lsb_v = const_eval::eval_int(lsb, source_db, interner, env, sink)?;
            if msb_v < lsb_v {
                sink.emit(errors::error_range_order(*span));
                return None;
            }
            let rhs_bits = const_eval::value_to_bitvector(&val)?;
            for (offset, i) in (lsb_v..=msb_v).enumerate() {
                if i < 0 || i as u32 >= bits.width() {
                    sink.emit(errors::warn_out_of_range(*span));
                    continue;
                }
                let bit = if (offset as u32) < rhs_bits.width() {
                    rhs_bits.get(offset as u32)
                } else {
                    Logic::Zero
                };
                bits.set(i as u32, bit);
            }
            env.insert(name, ConstValue::BitVector { bits, signed: false });
            Some(())
        }
        v_ast::Expr::Concat { elements, .. } => {
            let rhs_bits = const_eval::value_to_bitvector(&val)?;
            let mut offset = rhs_bits.width();
            for el in elements {
                let el_width = lhs_width(el, env).unwrap_or(1);
                offset = offset.saturating_sub(el_width);
                let mut slice = const_eval::all_x(el_width);
                for i in 0..el_width {
                    let bit = if offset + i < rhs_bits.width() {
                        rhs_bits.get(offset + i)
                    } else {
                        Logic::Zero
                    };
                    slice.set(i, bit);
                }
                assign_lhs(
                    el,
                    ConstValue::BitVector {
                        bits: slice,
                        signed: false,
                    },
                    source_db,
                    interner,
                    env,
                    sink,
                )?;
            }
            Some(())
        }
        _ => {
            sink.emit(errors::error_illegal_lhs(target.span()));
            None
        }
    }
}

fn lhs_ident(expr: &v_ast::Expr, sink: &DiagnosticSink) -> Option<Ident> {
    match expr {
        v_ast::Expr::Identifier { name, .. } => Some(*name),
        _ => {
            sink.emit(errors::error_illegal_lhs(expr.span()));
            None
        }
    }
}

fn lhs_width(expr: &v_ast::Expr, env: &ConstEnv) -> Option<u32> {
    match expr {
        v_ast::Expr::Identifier { name, .. } => {
            env.get(name).and_then(const_eval::value_to_bitvector).map(|b| b.width())
        }
        _ => None,
    }
}

/// Evaluates an expression within a constant-function body, resolving nested
/// constant-function calls directly and delegating everything else to
/// [`const_eval::eval_value`].
///
/// Only calls that appear as a whole argument, a parenthesized sub-call, or
/// the entire right-hand side of an assignment are resolved; a call buried
/// inside an arithmetic expression (`x = f(a) + 1;`) is not, and is reported
/// via [`errors::error_not_a_const_function`].
#[allow(clippy::too_many_arguments)]
fn eval_expr(
    expr: &v_ast::Expr,
    table: Option<&ConstFuncTable<'_>>,
    source_db: &SourceDb,
    interner: &Interner,
    env: &ConstEnv,
    sink: &DiagnosticSink,
    depth: u32,
) -> Option<ConstValue> {
    match expr {
        v_ast::Expr::Paren { inner, .. } => {
            eval_expr(inner, table, source_db, interner, env, sink, depth)
        }
        v_ast::Expr::FuncCall { name, args, span } => {
            let table = table?;
            let callee_name = match name.as_ref() {
                v_ast::Expr::Identifier { name, .. } => *name,
                _ => {
                    sink.emit(errors::error_not_a_const_function("<expr>", *span));
                    return None;
                }
            };
            let decl = table.get(callee_name).or_else(|| {
                sink.emit(errors::error_not_a_const_function(
                    interner.resolve(callee_name),
                    *span,
                ));
                None
            })?;
            let mut arg_vals = Vec::with_capacity(args.len());
            for a in args {
                arg_vals.push(eval_expr(a, Some(table), source_db, interner, env, sink, depth)?);
            }
            call_function(decl, &arg_vals, table, source_db, interner, sink, depth + 1)
        }
        other => {
            if contains_call(other) {
                sink.emit(errors::error_not_a_const_function(
                    "<nested call>",
                    other.span(),
                ));
                return None;
            }
            const_eval::eval_value(other, source_db, interner, env, sink)
        }
    }
}

fn contains_call(expr: &v_ast::Expr) -> bool {
    use v_ast::Expr::*;
    match expr {
        FuncCall { .. } => true,
        Index { base, index, .. } => contains_call(base) || contains_call(index),
        RangeSelect { base, msb, lsb, .. } => {
            contains_call(base) || contains_call(msb) || contains_call(lsb)
        }
        PartSelect {
            base, index, width, ..
        } => contains_call(base) || contains_call(index) || contains_call(width),
        Concat { elements, .. } => elements.iter().any(contains_call),
        Repeat { count, elements, .. } => {
            contains_call(count) || elements.iter().any(contains_call)
        }
        Unary { operand, .. } => contains_call(operand),
        Binary { left, right, .. } => contains_call(left) || contains_call(right),
        Ternary {
            condition,
            then_expr,
            else_expr,
            ..
        } => contains_call(condition) || contains_call(then_expr) || contains_call(else_expr),
        SystemCall { args, .. } => args.iter().any(contains_call),
        Paren { inner, .. } => contains_call(inner),
        Identifier { .. }
        | HierarchicalName { .. }
        | Literal { .. }
        | RealLiteral { .. }
        | StringLiteral { .. }
        | Error(_) => false,
    }
}
