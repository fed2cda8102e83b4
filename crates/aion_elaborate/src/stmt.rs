//! Verilog AST statement lowering to IR statements.
//!
//! Converts parsed procedural statements (blocking/non-blocking assigns,
//! `if`/`case`, loops, `$display`-family system tasks) into the unified
//! [`Statement`](aion_ir::stmt::Statement) representation.

use aion_common::Interner;
use aion_diagnostics::DiagnosticSink;
use aion_ir::stmt::{CaseArm as IrCaseArm, Statement as IrStmt};
use aion_source::SourceDb;

use crate::const_eval;
use crate::expr::{lower_to_signal_ref, lower_verilog_expr, SignalEnv};

/// Default timescale: 1 time unit = 1 ns = 1,000,000 fs.
///
/// Applied to delay literal values when no explicit `timescale` is specified.
const DEFAULT_TIMESCALE_FS: u64 = 1_000_000;

/// Lowers a Verilog AST statement to an IR statement.
pub fn lower_verilog_stmt(
    stmt: &aion_verilog_parser::ast::Statement,
    sig_env: &SignalEnv,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> IrStmt {
    use aion_verilog_parser::ast::Statement;
    match stmt {
        Statement::Blocking {
            target,
            value,
            span,
        } => {
            let tgt = lower_to_signal_ref(target, sig_env, source_db, interner, sink);
            let val = lower_verilog_expr(value, sig_env, source_db, interner, sink);
            IrStmt::Assign {
                target: tgt,
                value: val,
                blocking: true,
                span: *span,
            }
        }
        Statement::NonBlocking {
            target,
            value,
            span,
        } => {
            let tgt = lower_to_signal_ref(target, sig_env, source_db, interner, sink);
            let val = lower_verilog_expr(value, sig_env, source_db, interner, sink);
            IrStmt::Assign {
                target: tgt,
                value: val,
                blocking: false,
                span: *span,
            }
        }
        Statement::Block { stmts, span, .. } => {
            let ir_stmts: Vec<_> = stmts
                .iter()
                .map(|s| lower_verilog_stmt(s, sig_env, source_db, interner, sink))
                .collect();
            IrStmt::Block {
                stmts: ir_stmts,
                scope: None,
                span: *span,
            }
        }
        Statement::If {
            condition,
            then_stmt,
            else_stmt,
            span,
        } => {
            let cond = lower_verilog_expr(condition, sig_env, source_db, interner, sink);
            let then_body = lower_verilog_stmt(then_stmt, sig_env, source_db, interner, sink);
            let else_body = else_stmt
                .as_ref()
                .map(|s| Box::new(lower_verilog_stmt(s, sig_env, source_db, interner, sink)));
            IrStmt::If {
                condition: cond,
                then_body: Box::new(then_body),
                else_body,
                span: *span,
            }
        }
        Statement::Case {
            expr, arms, span, ..
        } => {
            let subject = lower_verilog_expr(expr, sig_env, source_db, interner, sink);
            let mut ir_arms = Vec::new();
            let mut default = None;
            for arm in arms {
                if arm.is_default {
                    default = Some(Box::new(lower_verilog_stmt(
                        &arm.body, sig_env, source_db, interner, sink,
                    )));
                } else {
                    let patterns: Vec<_> = arm
                        .patterns
                        .iter()
                        .map(|p| lower_verilog_expr(p, sig_env, source_db, interner, sink))
                        .collect();
                    let body = lower_verilog_stmt(&arm.body, sig_env, source_db, interner, sink);
                    ir_arms.push(IrCaseArm {
                        patterns,
                        body,
                        span: arm.span,
                    });
                }
            }
            IrStmt::Case {
                subject,
                arms: ir_arms,
                default,
                span: *span,
            }
        }
        Statement::For { body, .. } => {
            // For loops in behavioral blocks — lower the body only; the
            // loop bounds themselves are not modeled as an IR looping
            // construct, matching the simulation-free scope elsewhere.
            lower_verilog_stmt(body, sig_env, source_db, interner, sink)
        }
        Statement::While { body, .. } => {
            lower_verilog_stmt(body, sig_env, source_db, interner, sink)
        }
        Statement::Forever { body, span } => {
            let ir_body = lower_verilog_stmt(body, sig_env, source_db, interner, sink);
            IrStmt::Forever {
                body: Box::new(ir_body),
                span: *span,
            }
        }
        Statement::Repeat { body, .. } => {
            lower_verilog_stmt(body, sig_env, source_db, interner, sink)
        }
        Statement::Wait { span, .. } => IrStmt::Wait {
            duration: None,
            span: *span,
        },
        Statement::EventControl { body, .. } => {
            // Sensitivity is captured at the Process level; lower the body.
            lower_verilog_stmt(body, sig_env, source_db, interner, sink)
        }
        Statement::Delay {
            delay, body, span, ..
        } => {
            let ir_body = lower_verilog_stmt(body, sig_env, source_db, interner, sink);
            let duration_fs = eval_delay_expr_verilog(delay, source_db, interner, sink);
            IrStmt::Delay {
                duration_fs,
                body: Box::new(ir_body),
                span: *span,
            }
        }
        Statement::SystemTaskCall {
            name, args, span, ..
        } => {
            let task_name = interner.resolve(*name).to_lowercase();
            match task_name.as_str() {
                "$display" | "$write" | "$strobe" | "$monitor" => {
                    let format = if args.is_empty() {
                        String::new()
                    } else {
                        source_db.snippet(args[0].span()).to_string()
                    };
                    let ir_args: Vec<_> = args
                        .iter()
                        .skip(1)
                        .map(|a| lower_verilog_expr(a, sig_env, source_db, interner, sink))
                        .collect();
                    IrStmt::Display {
                        format,
                        args: ir_args,
                        span: *span,
                    }
                }
                "$finish" | "$stop" => IrStmt::Finish { span: *span },
                _ => IrStmt::Nop,
            }
        }
        Statement::TaskCall { .. } => IrStmt::Nop,
        Statement::Disable { .. } => IrStmt::Nop,
        Statement::Null { .. } => IrStmt::Nop,
        Statement::Error(_) => IrStmt::Nop,
    }
}

/// Evaluates a Verilog delay expression to femtoseconds.
///
/// Tries to const-evaluate the expression; if it resolves to an integer,
/// multiplies by [`DEFAULT_TIMESCALE_FS`] (1 ns). Falls back to 0 fs if the
/// expression cannot be evaluated.
fn eval_delay_expr_verilog(
    expr: &aion_verilog_parser::ast::Expr,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> u64 {
    let env = crate::const_eval::ConstEnv::default();
    if let Some(val) = const_eval::eval_verilog_expr(expr, source_db, interner, &env, sink) {
        if let Some(v) = const_eval::const_to_i64(&val) {
            return (v.unsigned_abs()) * DEFAULT_TIMESCALE_FS;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_common::Interner;
    use aion_diagnostics::DiagnosticSink;
    use aion_ir::expr::Expr as IrExpr;
    use aion_ir::ids::SignalId;
    use aion_source::{SourceDb, Span};

    fn setup() -> (SourceDb, Interner, DiagnosticSink, SignalEnv) {
        (
            SourceDb::new(),
            Interner::new(),
            DiagnosticSink::new(),
            SignalEnv::new(),
        )
    }

    #[test]
    fn blocking_assign() {
        let (sdb, interner, sink, mut env) = setup();
        let a = interner.get_or_intern("a");
        let b = interner.get_or_intern("b");
        env.insert(a, SignalId::from_raw(0));
        env.insert(b, SignalId::from_raw(1));

        let stmt = aion_verilog_parser::ast::Statement::Blocking {
            target: aion_verilog_parser::ast::Expr::Identifier {
                name: a,
                span: Span::DUMMY,
            },
            value: aion_verilog_parser::ast::Expr::Identifier {
                name: b,
                span: Span::DUMMY,
            },
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        assert!(matches!(ir, IrStmt::Assign { .. }));
    }

    #[test]
    fn non_blocking_assign() {
        let (sdb, interner, sink, mut env) = setup();
        let q = interner.get_or_intern("q");
        let d = interner.get_or_intern("d");
        env.insert(q, SignalId::from_raw(0));
        env.insert(d, SignalId::from_raw(1));

        let stmt = aion_verilog_parser::ast::Statement::NonBlocking {
            target: aion_verilog_parser::ast::Expr::Identifier {
                name: q,
                span: Span::DUMMY,
            },
            value: aion_verilog_parser::ast::Expr::Identifier {
                name: d,
                span: Span::DUMMY,
            },
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        assert!(matches!(ir, IrStmt::Assign { .. }));
    }

    #[test]
    fn if_stmt() {
        let (sdb, interner, sink, mut env) = setup();
        let c = interner.get_or_intern("c");
        env.insert(c, SignalId::from_raw(0));

        let stmt = aion_verilog_parser::ast::Statement::If {
            condition: aion_verilog_parser::ast::Expr::Identifier {
                name: c,
                span: Span::DUMMY,
            },
            then_stmt: Box::new(aion_verilog_parser::ast::Statement::Null { span: Span::DUMMY }),
            else_stmt: None,
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        assert!(matches!(ir, IrStmt::If { .. }));
    }

    #[test]
    fn case_stmt() {
        let (sdb, interner, sink, mut env) = setup();
        let sel = interner.get_or_intern("sel");
        env.insert(sel, SignalId::from_raw(0));

        let stmt = aion_verilog_parser::ast::Statement::Case {
            kind: aion_verilog_parser::ast::CaseKind::Case,
            expr: aion_verilog_parser::ast::Expr::Identifier {
                name: sel,
                span: Span::DUMMY,
            },
            arms: vec![aion_verilog_parser::ast::CaseArm {
                patterns: vec![],
                is_default: true,
                body: aion_verilog_parser::ast::Statement::Null { span: Span::DUMMY },
                span: Span::DUMMY,
            }],
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        assert!(matches!(ir, IrStmt::Case { .. }));
    }

    #[test]
    fn event_control_passes_through() {
        let (sdb, interner, sink, env) = setup();
        let stmt = aion_verilog_parser::ast::Statement::EventControl {
            sensitivity: aion_verilog_parser::ast::SensitivityList::Star,
            body: Box::new(aion_verilog_parser::ast::Statement::Null { span: Span::DUMMY }),
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        assert!(matches!(ir, IrStmt::Nop));
    }

    #[test]
    fn block_stmt() {
        let (sdb, interner, sink, env) = setup();
        let stmt = aion_verilog_parser::ast::Statement::Block {
            label: None,
            decls: vec![],
            stmts: vec![
                aion_verilog_parser::ast::Statement::Null { span: Span::DUMMY },
                aion_verilog_parser::ast::Statement::Null { span: Span::DUMMY },
            ],
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        if let IrStmt::Block { stmts, .. } = &ir {
            assert_eq!(stmts.len(), 2);
        } else {
            panic!("expected Block");
        }
    }

    #[test]
    fn delay_preserved() {
        let mut sdb = SourceDb::new();
        let file_id = sdb.add_source("test.v", "5".into());
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let env = SignalEnv::new();
        let lit_span = aion_source::Span {
            file: file_id,
            start: 0,
            end: 1,
        };
        let stmt = aion_verilog_parser::ast::Statement::Delay {
            delay: aion_verilog_parser::ast::Expr::Literal { span: lit_span },
            body: Box::new(aion_verilog_parser::ast::Statement::Null { span: Span::DUMMY }),
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        if let IrStmt::Delay {
            duration_fs, body, ..
        } = &ir
        {
            // 5 * 1_000_000 fs = 5_000_000 fs (5 ns)
            assert_eq!(*duration_fs, 5_000_000);
            assert!(matches!(**body, IrStmt::Nop));
        } else {
            panic!("expected Delay, got {:?}", ir);
        }
    }

    #[test]
    fn forever_preserved() {
        let (sdb, interner, sink, env) = setup();
        let stmt = aion_verilog_parser::ast::Statement::Forever {
            body: Box::new(aion_verilog_parser::ast::Statement::Null { span: Span::DUMMY }),
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        if let IrStmt::Forever { body, .. } = &ir {
            assert!(matches!(**body, IrStmt::Nop));
        } else {
            panic!("expected Forever, got {:?}", ir);
        }
    }

    #[test]
    fn display_call_lowered() {
        let mut sdb = SourceDb::new();
        let file_id = sdb.add_source("test.v", "\"hi\"".into());
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let env = SignalEnv::new();
        let name = interner.get_or_intern("$display");
        let lit_span = aion_source::Span {
            file: file_id,
            start: 0,
            end: 4,
        };
        let stmt = aion_verilog_parser::ast::Statement::SystemTaskCall {
            name,
            args: vec![aion_verilog_parser::ast::Expr::StringLiteral { span: lit_span }],
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        if let IrStmt::Display { format, args, .. } = &ir {
            assert_eq!(format, "\"hi\"");
            assert!(args.is_empty());
        } else {
            panic!("expected Display, got {:?}", ir);
        }
    }

    #[test]
    fn finish_call_lowered() {
        let (sdb, interner, sink, env) = setup();
        let name = interner.get_or_intern("$finish");
        let stmt = aion_verilog_parser::ast::Statement::SystemTaskCall {
            name,
            args: vec![],
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        assert!(matches!(ir, IrStmt::Finish { .. }));
    }

    #[test]
    fn unknown_expr_variant_does_not_panic() {
        // Exercises the Error expr arm via Expr::span().
        let (sdb, interner, sink, env) = setup();
        let stmt = aion_verilog_parser::ast::Statement::SystemTaskCall {
            name: interner.get_or_intern("$display"),
            args: vec![aion_verilog_parser::ast::Expr::Error(Span::DUMMY)],
            span: Span::DUMMY,
        };
        let ir = lower_verilog_stmt(&stmt, &env, &sdb, &interner, &sink);
        assert!(matches!(ir, IrStmt::Display { .. }));
        let _ = IrExpr::Literal(aion_common::LogicVec::all_zero(1));
    }
}
