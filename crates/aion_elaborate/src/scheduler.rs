//! Deferred-work scheduler for the five-phase elaboration pipeline (§4.6).
//!
//! Elaboration does not recurse module-body-to-module-body on the Rust call
//! stack. Instead, every cross-phase piece of work — an instantiation to
//! link, a `defparam` override to apply, a continuous assign or process body
//! to complete — is represented as an enum-tagged [`DeferredOp`] pushed onto
//! a per-phase [`VecDeque`]. [`Scheduler`] owns those queues and drains them
//! in the strict order phase 1 → phase 2 → defparam fixpoint → phase 3.
//!
//! Same-phase recursion into immediate substructure (walking an `if`'s
//! then/else subtree, say) still uses ordinary Rust recursion — only the
//! phase-crossing work described in §4.6 goes through these queues.

use std::collections::VecDeque;

use aion_common::Ident;
use aion_ir::ids::{ModuleId, ScopeId};
use aion_source::Span;

/// A queued module or primitive instantiation awaiting name resolution and
/// port binding (phase 2).
///
/// `ast_index` indexes into a caller-local side table of borrowed AST nodes
/// (e.g. `Vec<&Instantiation>`) — these items are deliberately data-only so
/// they stay constructible without a lifetime parameter; the caller's drain
/// closure is what ties `ast_index` back to the real parse-tree node.
#[derive(Debug, Clone)]
pub struct Phase1Item {
    /// The scope the instantiation's items are declared in.
    pub scope: ScopeId,
    /// The instantiated module/UDP's template name, as written.
    pub def_name: Ident,
    /// The instance name, as written.
    pub inst_name: Ident,
    /// Index into the caller's side table identifying the AST node and any
    /// already-evaluated data (parameter overrides) for this instantiation.
    pub ast_index: u32,
    /// The span of the instantiation statement.
    pub span: Span,
}

/// A queued port-binding/link step produced by draining a [`Phase1Item`]:
/// the definition has been resolved, low-conn signals still need binding.
#[derive(Debug, Clone)]
pub struct Phase2Item {
    /// The scope the instance lives in.
    pub scope: ScopeId,
    /// The resolved module definition.
    pub module: ModuleId,
    /// The instance name.
    pub inst_name: Ident,
    /// Index into the caller's side table, carried over from the
    /// originating [`Phase1Item`].
    pub ast_index: u32,
    /// The span of the instantiation statement.
    pub span: Span,
}

/// A queued `defparam` override, applied at the defparam fixpoint between
/// phase 1/2 and phase 3.
#[derive(Debug, Clone)]
pub struct DefparamStub {
    /// The scope the `defparam` statement was written in.
    pub scope: ScopeId,
    /// The dotted hierarchical path naming the target parameter, as written
    /// (e.g. `inst.sub.WIDTH`).
    pub path: Vec<Ident>,
    /// The span of the `defparam` assignment.
    pub span: Span,
    /// How many fixpoint passes this stub has already survived, purely for
    /// diagnostics/metrics — resolution itself is retried every pass
    /// regardless of this count.
    pub attempts: u32,
}

/// A queued piece of work that can only complete once every phase-1/2 name
/// in the design is known: continuous assigns, port high-conn expressions,
/// process bodies, and primitive terminal/array bindings.
#[derive(Debug, Clone)]
pub enum Phase3Item {
    /// A continuous assignment's LHS/RHS to lower and attach.
    ContinuousAssign {
        /// The owning scope.
        scope: ScopeId,
        /// Index into the caller's side table of pending assign AST nodes.
        ast_index: u32,
        /// The span of the `assign` statement.
        span: Span,
    },
    /// A module instance's port high-conn expressions to connect.
    PortConnect {
        /// The owning scope.
        scope: ScopeId,
        /// The instance being connected.
        inst_name: Ident,
        /// Index into the caller's side table identifying the resolved
        /// instance (definition module id, connections to bind).
        ast_index: u32,
        /// The span of the instantiation statement.
        span: Span,
    },
    /// An `always`/`initial` process body to lower.
    Process {
        /// The owning scope.
        scope: ScopeId,
        /// Index into the caller's side table of pending process AST nodes.
        ast_index: u32,
        /// The span of the process.
        span: Span,
    },
    /// A gate/UDP primitive's terminal connections to bind.
    PrimitiveTerminals {
        /// The owning scope.
        scope: ScopeId,
        /// The primitive instance name.
        inst_name: Ident,
        /// Index into the caller's side table of pending primitive AST nodes.
        ast_index: u32,
        /// The span of the instantiation statement.
        span: Span,
    },
}

/// A single deferred operation, tagged by which phase drains it.
///
/// Grouped here mainly for uniform logging/counting; each phase's drain loop
/// matches on its own item type rather than this wrapper, since a
/// [`Phase1Item`] pushed during phase 1 is resolved into a [`Phase2Item`]
/// before phase 2 ever sees it, and likewise phase 2 pushes land in the
/// phase-3 queue.
#[derive(Debug, Clone)]
pub enum DeferredOp {
    /// See [`Phase1Item`].
    Phase1(Phase1Item),
    /// See [`Phase2Item`].
    Phase2(Phase2Item),
    /// See [`DefparamStub`].
    Defparam(DefparamStub),
    /// See [`Phase3Item`].
    Phase3(Phase3Item),
}

/// The cap on defparam-fixpoint passes before giving up and silently
/// dropping whatever stubs remain, matching §4.6's "stubs left at
/// quiescence are silently dropped" rule. A full design graph converges in
/// far fewer passes than this; the cap exists only to bound pathological
/// hierarchies (a defparam chain longer than the design has scopes can't
/// legally resolve anyway).
const MAX_DEFPARAM_PASSES: u32 = 4096;

/// Owns the per-phase work queues and drains them in strict phase order.
///
/// Callers push work during phase 1 traversal (via [`Scheduler::push_phase1`]
/// etc.), then call [`Scheduler::drain_phase1`]/[`Scheduler::drain_phase2`]/
/// [`Scheduler::drain_defparams`]/[`Scheduler::drain_phase3`] in sequence,
/// each passing a closure that performs the actual elaboration step and
/// returns any follow-on items to push into the next queue.
#[derive(Debug, Default)]
pub struct Scheduler {
    phase1: VecDeque<Phase1Item>,
    phase2: VecDeque<Phase2Item>,
    defparams: VecDeque<DefparamStub>,
    phase3: VecDeque<Phase3Item>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a phase-1 instantiation to resolve.
    pub fn push_phase1(&mut self, item: Phase1Item) {
        self.phase1.push_back(item);
    }

    /// Queues a phase-2 port-binding step directly (used when phase 1
    /// resolution happens inline and only the link step needs deferring).
    pub fn push_phase2(&mut self, item: Phase2Item) {
        self.phase2.push_back(item);
    }

    /// Queues a `defparam` stub for fixpoint resolution.
    pub fn push_defparam(&mut self, stub: DefparamStub) {
        self.defparams.push_back(stub);
    }

    /// Queues a phase-3 completion step.
    pub fn push_phase3(&mut self, item: Phase3Item) {
        self.phase3.push_back(item);
    }

    /// `true` once every queue is empty.
    pub fn is_drained(&self) -> bool {
        self.phase1.is_empty()
            && self.phase2.is_empty()
            && self.defparams.is_empty()
            && self.phase3.is_empty()
    }

    /// Drains the phase-1 queue, calling `step` for each item. `step` may
    /// push new [`Phase1Item`]s back onto this same scheduler (generate
    /// expansion producing child items) — draining continues until the
    /// queue is empty, so such pushes are picked up in the same phase.
    pub fn drain_phase1(&mut self, mut step: impl FnMut(&mut Scheduler, Phase1Item)) {
        while let Some(item) = self.phase1.pop_front() {
            step(self, item);
        }
    }

    /// Drains the phase-2 queue. `step` resolves each item's module/UDP
    /// definition and binds low-conn signals; it receives `&mut Scheduler`
    /// so it can push the corresponding [`Phase3Item`]s for later connection.
    pub fn drain_phase2(&mut self, mut step: impl FnMut(&mut Scheduler, Phase2Item)) {
        while let Some(item) = self.phase2.pop_front() {
            step(self, item);
        }
    }

    /// Runs the `defparam` fixpoint: repeatedly attempts `try_resolve` on
    /// every stub currently in the queue. A stub returning `true` (resolved,
    /// or a hard error already reported) is dropped; `false` re-queues it
    /// for the next pass. Passes continue until a full pass resolves zero
    /// stubs, or [`MAX_DEFPARAM_PASSES`] is hit, at which point any
    /// remaining stubs are silently dropped per §4.6.
    pub fn drain_defparams(&mut self, mut try_resolve: impl FnMut(&DefparamStub) -> bool) {
        let mut pass = 0;
        loop {
            if self.defparams.is_empty() || pass >= MAX_DEFPARAM_PASSES {
                break;
            }
            let mut made_progress = false;
            let mut remaining = VecDeque::with_capacity(self.defparams.len());
            while let Some(mut stub) = self.defparams.pop_front() {
                if try_resolve(&stub) {
                    made_progress = true;
                } else {
                    stub.attempts += 1;
                    remaining.push_back(stub);
                }
            }
            self.defparams = remaining;
            pass += 1;
            tracing::trace!(pass, made_progress, "defparam pass");
            if !made_progress {
                break;
            }
        }
        self.defparams.clear();
    }

    /// Drains the phase-3 queue, completing continuous assigns, port
    /// connections, process bodies, and primitive terminal bindings.
    pub fn drain_phase3(&mut self, mut step: impl FnMut(Phase3Item)) {
        while let Some(item) = self.phase3.pop_front() {
            step(item);
        }
    }

    /// Runs all four stages in the strict order §4.6 requires: phase 1,
    /// phase 2, defparam fixpoint, phase 3. `phase1_step`/`phase2_step` take
    /// `&mut Scheduler` so they can enqueue follow-on work; `phase3_step`
    /// runs last, once every phase-1/2 name in the design is known, so it
    /// does not need scheduler access.
    pub fn run(
        &mut self,
        mut phase1_step: impl FnMut(&mut Scheduler, Phase1Item),
        mut phase2_step: impl FnMut(&mut Scheduler, Phase2Item),
        mut defparam_resolve: impl FnMut(&DefparamStub) -> bool,
        mut phase3_step: impl FnMut(Phase3Item),
    ) {
        {
            let _span = tracing::debug_span!("phase1").entered();
            while let Some(item) = self.phase1.pop_front() {
                tracing::trace!(def_name = ?item.def_name, inst_name = ?item.inst_name, "instantiate");
                phase1_step(self, item);
            }
        }
        {
            let _span = tracing::debug_span!("phase2").entered();
            while let Some(item) = self.phase2.pop_front() {
                phase2_step(self, item);
            }
        }
        {
            let _span = tracing::debug_span!("defparam_fixpoint").entered();
            self.drain_defparams(&mut defparam_resolve);
        }
        {
            let _span = tracing::debug_span!("phase3").entered();
            while let Some(item) = self.phase3.pop_front() {
                phase3_step(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_ident() -> Ident {
        Ident::from_raw(0)
    }

    #[test]
    fn new_scheduler_is_drained() {
        let sched = Scheduler::new();
        assert!(sched.is_drained());
    }

    #[test]
    fn push_and_drain_phase1_without_followups() {
        let mut sched = Scheduler::new();
        sched.push_phase1(Phase1Item {
            scope: ScopeId::from_raw(0),
            def_name: dummy_ident(),
            inst_name: dummy_ident(),
            ast_index: 0,
            span: Span::DUMMY,
        });
        let mut seen = 0;
        sched.drain_phase1(|_sched, _item| seen += 1);
        assert_eq!(seen, 1);
        assert!(sched.phase1.is_empty());
    }

    #[test]
    fn phase1_step_can_enqueue_more_phase1_work() {
        let mut sched = Scheduler::new();
        sched.push_phase1(Phase1Item {
            scope: ScopeId::from_raw(0),
            def_name: dummy_ident(),
            inst_name: dummy_ident(),
            ast_index: 0,
            span: Span::DUMMY,
        });
        let mut seen = 0;
        sched.drain_phase1(|s, item| {
            seen += 1;
            // Simulate a generate block expanding into exactly one child item.
            if item.scope.as_raw() == 0 {
                s.push_phase1(Phase1Item {
                    scope: ScopeId::from_raw(1),
                    def_name: item.def_name,
                    inst_name: item.inst_name,
                    ast_index: item.ast_index,
                    span: item.span,
                });
            }
        });
        assert_eq!(seen, 2);
    }

    #[test]
    fn drain_phase2_resolves_in_fifo_order() {
        let mut sched = Scheduler::new();
        for i in 0..3u32 {
            sched.push_phase2(Phase2Item {
                scope: ScopeId::from_raw(0),
                module: ModuleId::from_raw(i),
                inst_name: dummy_ident(),
                ast_index: 0,
                span: Span::DUMMY,
            });
        }
        let mut order = Vec::new();
        sched.drain_phase2(|_sched, item| order.push(item.module.as_raw()));
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn defparam_fixpoint_resolves_in_dependency_order() {
        // Stub 1 depends on stub 0 having resolved first; a single pass
        // cannot clear both, but the fixpoint loop keeps passing until it does.
        let mut sched = Scheduler::new();
        sched.push_defparam(DefparamStub {
            scope: ScopeId::from_raw(0),
            path: vec![dummy_ident()],
            span: Span::DUMMY,
            attempts: 0,
        });
        sched.push_defparam(DefparamStub {
            scope: ScopeId::from_raw(1),
            path: vec![dummy_ident()],
            span: Span::DUMMY,
            attempts: 0,
        });
        let mut zero_resolved = true;
        let mut one_resolved = false;
        sched.drain_defparams(|stub| {
            if stub.scope.as_raw() == 0 {
                zero_resolved = true;
                true
            } else if zero_resolved {
                one_resolved = true;
                true
            } else {
                false
            }
        });
        assert!(one_resolved);
        assert!(sched.defparams.is_empty());
    }

    #[test]
    fn defparam_stubs_left_at_quiescence_are_dropped() {
        let mut sched = Scheduler::new();
        sched.push_defparam(DefparamStub {
            scope: ScopeId::from_raw(0),
            path: vec![dummy_ident()],
            span: Span::DUMMY,
            attempts: 0,
        });
        sched.drain_defparams(|_stub| false);
        assert!(sched.defparams.is_empty());
    }

    #[test]
    fn drain_phase3_visits_every_item() {
        let mut sched = Scheduler::new();
        sched.push_phase3(Phase3Item::ContinuousAssign {
            scope: ScopeId::from_raw(0),
            ast_index: 0,
            span: Span::DUMMY,
        });
        sched.push_phase3(Phase3Item::Process {
            scope: ScopeId::from_raw(0),
            ast_index: 0,
            span: Span::DUMMY,
        });
        let mut count = 0;
        sched.drain_phase3(|_item| count += 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn run_executes_phases_in_strict_order() {
        let mut sched = Scheduler::new();
        sched.push_phase1(Phase1Item {
            scope: ScopeId::from_raw(0),
            def_name: dummy_ident(),
            inst_name: dummy_ident(),
            ast_index: 0,
            span: Span::DUMMY,
        });
        sched.push_defparam(DefparamStub {
            scope: ScopeId::from_raw(0),
            path: vec![dummy_ident()],
            span: Span::DUMMY,
            attempts: 0,
        });
        sched.push_phase3(Phase3Item::Process {
            scope: ScopeId::from_raw(0),
            ast_index: 0,
            span: Span::DUMMY,
        });

        let mut order = Vec::new();
        sched.run(
            |s, item| {
                order.push("phase1");
                s.push_phase2(Phase2Item {
                    scope: item.scope,
                    module: ModuleId::from_raw(0),
                    inst_name: item.inst_name,
                    ast_index: item.ast_index,
                    span: item.span,
                });
            },
            |_s, _item| order.push("phase2"),
            |_stub| {
                order.push("defparam");
                true
            },
            |_item| order.push("phase3"),
        );

        assert_eq!(order, vec!["phase1", "phase2", "defparam", "phase3"]);
    }
}
