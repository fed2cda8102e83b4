//! Behavioral statements for process bodies.
//!
//! [`Statement`] represents language-independent behavioral code inside
//! processes (VHDL processes, Verilog always blocks).

use crate::expr::Expr;
use crate::ids::{ScopeId, SignalId, TaskId};
use crate::signal::SignalRef;
use aion_common::Ident;
use aion_source::Span;
use serde::{Deserialize, Serialize};

/// The kind of assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssertionKind {
    /// An `assert` statement — aborts on failure.
    Assert,
    /// An `assume` statement — constrains formal verification.
    Assume,
    /// A `cover` statement — marks a reachability goal.
    Cover,
}

/// A case arm in a case/switch statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseArm {
    /// The pattern expressions to match against.
    pub patterns: Vec<Expr>,
    /// The body to execute when matched.
    pub body: Statement,
    /// Source location.
    pub span: Span,
}

/// A behavioral statement in the IR.
///
/// Statements appear inside [`Process`](crate::process::Process) bodies
/// and represent the behavioral description of hardware. During synthesis,
/// these are lowered into combinational cells and flip-flops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    /// A signal assignment (`target <= value` or `target = value`).
    Assign {
        /// The target signal or signal slice.
        target: SignalRef,
        /// The value expression.
        value: Expr,
        /// `true` for a blocking assignment (`=`), `false` for non-blocking (`<=`).
        blocking: bool,
        /// Source location.
        span: Span,
    },
    /// An if-else statement.
    If {
        /// The condition expression.
        condition: Expr,
        /// The body when condition is true.
        then_body: Box<Statement>,
        /// The optional body when condition is false.
        else_body: Option<Box<Statement>>,
        /// Source location.
        span: Span,
    },
    /// A case/switch statement.
    Case {
        /// The subject expression being matched.
        subject: Expr,
        /// The match arms.
        arms: Vec<CaseArm>,
        /// The default arm, if any.
        default: Option<Box<Statement>>,
        /// Source location.
        span: Span,
    },
    /// A block of sequential statements.
    ///
    /// `scope` is `Some` for a named `begin`/`fork` block that introduces
    /// its own lexical scope (and can be the target of `disable`).
    Block {
        /// The statements in execution order.
        stmts: Vec<Statement>,
        /// The scope this block introduces, if it was named.
        scope: Option<ScopeId>,
        /// Source location.
        span: Span,
    },
    /// A wait statement (simulation only, not synthesizable).
    Wait {
        /// The optional duration expression.
        duration: Option<Expr>,
        /// Source location.
        span: Span,
    },
    /// A condition-controlled loop (`while`).
    While {
        /// The loop condition, tested before each iteration.
        condition: Expr,
        /// The loop body.
        body: Box<Statement>,
        /// Source location.
        span: Span,
    },
    /// A fixed-count loop (`repeat`).
    Repeat {
        /// The number of iterations, evaluated once before the loop starts.
        count: Expr,
        /// The loop body.
        body: Box<Statement>,
        /// Source location.
        span: Span,
    },
    /// A counted loop (`for (init; condition; step) body`).
    For {
        /// The loop variable initializer, run once before the loop.
        init: Box<Statement>,
        /// The loop condition, tested before each iteration.
        condition: Expr,
        /// The step statement, run after each iteration.
        step: Box<Statement>,
        /// The loop body.
        body: Box<Statement>,
        /// Source location.
        span: Span,
    },
    /// An assertion statement.
    Assertion {
        /// The kind of assertion.
        kind: AssertionKind,
        /// The condition to check.
        condition: Expr,
        /// An optional message string.
        message: Option<String>,
        /// Source location.
        span: Span,
    },
    /// A display/report statement (`$display` / `report`).
    Display {
        /// The format string.
        format: String,
        /// The format arguments.
        args: Vec<Expr>,
        /// Source location.
        span: Span,
    },
    /// A simulation finish statement (`$finish` / `std.env.stop`).
    Finish {
        /// Source location.
        span: Span,
    },
    /// A time delay statement (`#5`, `wait for 10 ns`).
    ///
    /// Suspends process execution for `duration_fs` femtoseconds, then
    /// resumes with `body`. Used by initial blocks and testbenches.
    Delay {
        /// Delay duration in femtoseconds (pre-evaluated at elaboration time).
        duration_fs: u64,
        /// The statement to execute after the delay elapses.
        body: Box<Statement>,
        /// Source location.
        span: Span,
    },
    /// An infinite loop (`forever`) wrapping a body statement.
    ///
    /// Typically contains a delay to generate periodic signals (e.g. clocks).
    /// A forever loop without any delay inside is a simulation error.
    Forever {
        /// The loop body (usually contains a delay).
        body: Box<Statement>,
        /// Source location.
        span: Span,
    },
    /// Invocation of a user-defined task (`task_name(args)`).
    TaskEnable {
        /// The task being invoked.
        task: TaskId,
        /// The argument expressions.
        args: Vec<Expr>,
        /// Source location.
        span: Span,
    },
    /// Invocation of a system task not otherwise modeled (`$monitor`, `$strobe`, ...).
    SysTaskEnable {
        /// The system task name, including the leading `$`.
        name: Ident,
        /// The argument expressions.
        args: Vec<Expr>,
        /// Source location.
        span: Span,
    },
    /// A `disable` statement, terminating a named block or task early.
    Disable {
        /// The scope being disabled.
        target: ScopeId,
        /// Source location.
        span: Span,
    },
    /// A procedural continuous assignment (`assign target = value;` inside a process).
    ProceduralAssign {
        /// The target signal.
        target: SignalRef,
        /// The value expression.
        value: Expr,
        /// Source location.
        span: Span,
    },
    /// Ends a procedural continuous assignment (`deassign target;`).
    ProceduralDeassign {
        /// The target signal.
        target: SignalRef,
        /// Source location.
        span: Span,
    },
    /// A `force` statement, overriding a signal's driven value.
    Force {
        /// The target signal.
        target: SignalRef,
        /// The forced value expression.
        value: Expr,
        /// Source location.
        span: Span,
    },
    /// A `release` statement, undoing a prior `force`.
    Release {
        /// The target signal.
        target: SignalRef,
        /// Source location.
        span: Span,
    },
    /// An event trigger (`-> event_name;`).
    EventTrigger {
        /// The event signal being triggered.
        event: SignalId,
        /// Source location.
        span: Span,
    },
    /// A no-operation (placeholder for empty branches).
    Nop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_common::LogicVec;

    fn blocking_assign() -> Statement {
        Statement::Assign {
            target: SignalRef::Signal(SignalId::from_raw(0)),
            value: Expr::Literal(LogicVec::all_zero(8)),
            blocking: true,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn assign_statement() {
        let stmt = blocking_assign();
        assert!(matches!(stmt, Statement::Assign { .. }));
    }

    #[test]
    fn assign_blocking_vs_nonblocking() {
        let blocking = blocking_assign();
        let nonblocking = Statement::Assign {
            target: SignalRef::Signal(SignalId::from_raw(0)),
            value: Expr::Literal(LogicVec::all_zero(8)),
            blocking: false,
            span: Span::DUMMY,
        };
        if let (Statement::Assign { blocking: b1, .. }, Statement::Assign { blocking: b2, .. }) =
            (&blocking, &nonblocking)
        {
            assert!(*b1);
            assert!(!*b2);
        } else {
            unreachable!()
        }
    }

    #[test]
    fn if_statement() {
        let stmt = Statement::If {
            condition: Expr::Literal(LogicVec::all_one(1)),
            then_body: Box::new(Statement::Nop),
            else_body: Some(Box::new(Statement::Nop)),
            span: Span::DUMMY,
        };
        if let Statement::If { else_body, .. } = &stmt {
            assert!(else_body.is_some());
        } else {
            panic!("expected If");
        }
    }

    #[test]
    fn case_statement() {
        let arm = CaseArm {
            patterns: vec![Expr::Literal(LogicVec::all_zero(2))],
            body: Statement::Nop,
            span: Span::DUMMY,
        };
        let stmt = Statement::Case {
            subject: Expr::Signal(SignalRef::Signal(SignalId::from_raw(0))),
            arms: vec![arm],
            default: Some(Box::new(Statement::Nop)),
            span: Span::DUMMY,
        };
        if let Statement::Case { arms, default, .. } = &stmt {
            assert_eq!(arms.len(), 1);
            assert!(default.is_some());
        } else {
            panic!("expected Case");
        }
    }

    #[test]
    fn block_statement() {
        let stmt = Statement::Block {
            stmts: vec![Statement::Nop, Statement::Nop],
            scope: None,
            span: Span::DUMMY,
        };
        if let Statement::Block { stmts, scope, .. } = &stmt {
            assert_eq!(stmts.len(), 2);
            assert!(scope.is_none());
        } else {
            panic!("expected Block");
        }
    }

    #[test]
    fn named_block_carries_scope() {
        let stmt = Statement::Block {
            stmts: vec![Statement::Nop],
            scope: Some(ScopeId::from_raw(4)),
            span: Span::DUMMY,
        };
        if let Statement::Block { scope, .. } = &stmt {
            assert_eq!(*scope, Some(ScopeId::from_raw(4)));
        } else {
            panic!("expected Block");
        }
    }

    #[test]
    fn assertion_kinds_distinct() {
        assert_ne!(AssertionKind::Assert, AssertionKind::Assume);
        assert_ne!(AssertionKind::Assert, AssertionKind::Cover);
        assert_ne!(AssertionKind::Assume, AssertionKind::Cover);
    }

    #[test]
    fn delay_statement() {
        let stmt = Statement::Delay {
            duration_fs: 5_000_000,
            body: Box::new(blocking_assign()),
            span: Span::DUMMY,
        };
        if let Statement::Delay {
            duration_fs, body, ..
        } = &stmt
        {
            assert_eq!(*duration_fs, 5_000_000);
            assert!(matches!(**body, Statement::Assign { .. }));
        } else {
            panic!("expected Delay");
        }
    }

    #[test]
    fn forever_statement() {
        let stmt = Statement::Forever {
            body: Box::new(Statement::Delay {
                duration_fs: 5_000_000,
                body: Box::new(Statement::Nop),
                span: Span::DUMMY,
            }),
            span: Span::DUMMY,
        };
        if let Statement::Forever { body, .. } = &stmt {
            assert!(matches!(**body, Statement::Delay { .. }));
        } else {
            panic!("expected Forever");
        }
    }

    #[test]
    fn while_statement() {
        let stmt = Statement::While {
            condition: Expr::Literal(LogicVec::all_one(1)),
            body: Box::new(Statement::Nop),
            span: Span::DUMMY,
        };
        assert!(matches!(stmt, Statement::While { .. }));
    }

    #[test]
    fn repeat_statement() {
        let stmt = Statement::Repeat {
            count: Expr::Literal(LogicVec::from_u64(4, 8)),
            body: Box::new(Statement::Nop),
            span: Span::DUMMY,
        };
        assert!(matches!(stmt, Statement::Repeat { .. }));
    }

    #[test]
    fn for_statement() {
        let stmt = Statement::For {
            init: Box::new(blocking_assign()),
            condition: Expr::Literal(LogicVec::all_one(1)),
            step: Box::new(blocking_assign()),
            body: Box::new(Statement::Nop),
            span: Span::DUMMY,
        };
        if let Statement::For { init, step, .. } = &stmt {
            assert!(matches!(**init, Statement::Assign { .. }));
            assert!(matches!(**step, Statement::Assign { .. }));
        } else {
            panic!("expected For");
        }
    }

    #[test]
    fn display_statement() {
        let stmt = Statement::Display {
            format: "value = %d".to_string(),
            args: vec![Expr::Literal(LogicVec::all_zero(8))],
            span: Span::DUMMY,
        };
        if let Statement::Display { format, args, .. } = &stmt {
            assert_eq!(format, "value = %d");
            assert_eq!(args.len(), 1);
        } else {
            panic!("expected Display");
        }
    }

    #[test]
    fn task_enable_statement() {
        let stmt = Statement::TaskEnable {
            task: TaskId::from_raw(2),
            args: vec![Expr::Literal(LogicVec::all_zero(1))],
            span: Span::DUMMY,
        };
        if let Statement::TaskEnable { task, args, .. } = &stmt {
            assert_eq!(*task, TaskId::from_raw(2));
            assert_eq!(args.len(), 1);
        } else {
            panic!("expected TaskEnable");
        }
    }

    #[test]
    fn disable_statement() {
        let stmt = Statement::Disable {
            target: ScopeId::from_raw(7),
            span: Span::DUMMY,
        };
        if let Statement::Disable { target, .. } = &stmt {
            assert_eq!(*target, ScopeId::from_raw(7));
        } else {
            panic!("expected Disable");
        }
    }

    #[test]
    fn force_and_release_statements() {
        let target = SignalRef::Signal(SignalId::from_raw(1));
        let force = Statement::Force {
            target: target.clone(),
            value: Expr::Literal(LogicVec::all_one(1)),
            span: Span::DUMMY,
        };
        let release = Statement::Release {
            target,
            span: Span::DUMMY,
        };
        assert!(matches!(force, Statement::Force { .. }));
        assert!(matches!(release, Statement::Release { .. }));
    }

    #[test]
    fn procedural_assign_and_deassign() {
        let target = SignalRef::Signal(SignalId::from_raw(1));
        let assign = Statement::ProceduralAssign {
            target: target.clone(),
            value: Expr::Literal(LogicVec::all_zero(1)),
            span: Span::DUMMY,
        };
        let deassign = Statement::ProceduralDeassign {
            target,
            span: Span::DUMMY,
        };
        assert!(matches!(assign, Statement::ProceduralAssign { .. }));
        assert!(matches!(deassign, Statement::ProceduralDeassign { .. }));
    }

    #[test]
    fn event_trigger_statement() {
        let stmt = Statement::EventTrigger {
            event: SignalId::from_raw(3),
            span: Span::DUMMY,
        };
        if let Statement::EventTrigger { event, .. } = &stmt {
            assert_eq!(*event, SignalId::from_raw(3));
        } else {
            panic!("expected EventTrigger");
        }
    }
}
