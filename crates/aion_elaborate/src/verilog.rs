//! Verilog-2001 module elaboration.
//!
//! Transforms a parsed [`ModuleDecl`](aion_verilog_parser::ast::ModuleDecl) into
//! an IR [`Module`](aion_ir::module::Module), resolving ports, signals,
//! assignments, processes, instantiations, and generate constructs.
//!
//! Instantiation does not recurse Rust-call-stack to Rust-call-stack across
//! phases: each instance is pushed as a [`scheduler::Phase1Item`], resolved
//! and recursively elaborated during the phase-1 drain, bound during phase 2,
//! and only has its port connections (and every continuous assign/process
//! body in this module) completed during phase 3 — once every declaration in
//! the module, including ones produced by generate expansion, is known. This
//! also fixes forward references: an `assign` or port connection naming a
//! wire declared later in the same module resolves correctly.

use std::collections::{HashMap, HashSet};

use aion_common::{ContentHash, Ident, Interner};
use aion_diagnostics::DiagnosticSink;
use aion_ir::arena::Arena;
use aion_ir::cell::{Cell, CellKind, Connection};
use aion_ir::ids::{CellId, ModuleId, ProcessId, ScopeId, SignalId, TypeId};
use aion_ir::module::{
    Assignment, DefaultDelayMode, DefaultNetType, Module, Parameter, UnconnectedDrive,
};
use aion_ir::port::{Port, PortDirection};
use aion_ir::process::{Edge, EdgeSensitivity, Process, ProcessKind, Sensitivity};
use aion_ir::scope::{Scope, ScopeKind};
use aion_ir::signal::{Signal, SignalKind};
use aion_ir::stmt::Statement as IrStmt;
use aion_ir::ConstValue;
use aion_source::{SourceDb, Span};
use aion_verilog_parser::ast::{self as v_ast, Direction};

use crate::const_eval::{self, ConstEnv};
use crate::context::ElaborationContext;
use crate::errors;
use crate::expr::{lower_to_signal_ref, lower_verilog_expr, SignalEnv};
use crate::registry::ModuleEntry;
use crate::scheduler::{DefparamStub, Phase1Item, Phase2Item, Phase3Item, Scheduler};
use crate::stmt::lower_verilog_stmt;
use crate::types;

/// Bound on generate-for iterations, guarding against a non-terminating
/// (or absurdly large) loop condition.
const MAX_GENERATE_ITERATIONS: u32 = 4096;

/// A queued instance awaiting phase-1 resolution, owned so the scheduler's
/// `ast_index` can point back into this module-local side table without a
/// borrow of `decl`.
struct InstTask {
    def_name: Ident,
    inst_name: Ident,
    param_overrides: Vec<(Ident, ConstValue)>,
    connections: Vec<v_ast::Connection>,
    array_range: Option<v_ast::Range>,
    span: Span,
}

/// A queued process body (`always`/`initial`), completed in phase 3.
enum ProcTask {
    Always(v_ast::AlwaysBlock),
    Initial(v_ast::InitialBlock),
}

/// A primitive gate instantiation resolved immediately during the item walk
/// (gate terminals are ordinary signals, so no forward-reference deferral
/// is needed the way module instance ports require).
struct GateTask {
    name: Ident,
    kind: CellKind,
    connections: Vec<Connection>,
    span: Span,
}

/// Mutable state threaded through a single module's item walk, including
/// nested generate-block expansion. Declarations land directly in the
/// module's own arenas regardless of which generate scope produced them —
/// AionIR models one flat `Module` per elaborated instance, with the scope
/// tree recording where each declaration lexically came from.
struct Builder<'b> {
    signals: &'b mut Arena<SignalId, Signal>,
    sig_env: &'b mut SignalEnv,
    ir_params: &'b mut Vec<Parameter>,
    localparams: &'b mut HashSet<Ident>,
    inst_tasks: &'b mut Vec<InstTask>,
    gate_tasks: &'b mut Vec<GateTask>,
    assign_tasks: &'b mut Vec<v_ast::ContinuousAssign>,
    process_tasks: &'b mut Vec<ProcTask>,
    defparam_values: &'b mut HashMap<Span, ConstValue>,
    sched: &'b mut Scheduler,
}

/// Elaborates a Verilog module declaration into an IR module.
///
/// `parent_scope` is the scope of the instantiating module, or `None` for a
/// top-level module. Resolves parameters, creates ports and signals, expands
/// generate constructs, lowers always/initial blocks to processes, and
/// schedules instantiations through [`Scheduler`] rather than recursing
/// directly.
pub fn elaborate_verilog_module(
    decl: &v_ast::ModuleDecl,
    param_overrides: &[(Ident, ConstValue)],
    parent_scope: Option<ScopeId>,
    ctx: &mut ElaborationContext<'_>,
) -> ModuleId {
    let module_scope = ctx.design.scopes.alloc(Scope {
        id: ScopeId::from_raw(0),
        parent: parent_scope,
        name: decl.name,
        kind: ScopeKind::Module,
        genvar_value: None,
        span: decl.span,
    });

    let mut const_env = ConstEnv::new();
    let mut ir_params = Vec::new();
    let mut localparams = HashSet::new();
    apply_verilog_params(decl, param_overrides, &mut const_env, &mut ir_params, ctx);

    let mut signals: Arena<SignalId, Signal> = Arena::new();
    let mut sig_env = SignalEnv::new();
    let mut ports = Vec::new();
    elaborate_verilog_ports(
        decl,
        &const_env,
        module_scope,
        &mut signals,
        &mut sig_env,
        &mut ports,
        ctx,
    );

    let mut inst_tasks: Vec<InstTask> = Vec::new();
    let mut gate_tasks: Vec<GateTask> = Vec::new();
    let mut assign_tasks: Vec<v_ast::ContinuousAssign> = Vec::new();
    let mut process_tasks: Vec<ProcTask> = Vec::new();
    let mut defparam_values: HashMap<Span, ConstValue> = HashMap::new();
    let mut sched = Scheduler::new();

    let _phase_a = tracing::debug_span!("phase_a", module = %ctx.interner.resolve(decl.name)).entered();
    {
        let mut builder = Builder {
            signals: &mut signals,
            sig_env: &mut sig_env,
            ir_params: &mut ir_params,
            localparams: &mut localparams,
            inst_tasks: &mut inst_tasks,
            gate_tasks: &mut gate_tasks,
            assign_tasks: &mut assign_tasks,
            process_tasks: &mut process_tasks,
            defparam_values: &mut defparam_values,
            sched: &mut sched,
        };
        walk_items(&decl.items, module_scope, &mut const_env, &mut builder, ctx);
    }

    // Phase 1: push every queued instance, then drain — resolving each
    // definition and recursively elaborating it. Generate blocks already
    // expanded above, so every instance in the module is known up front.
    for (idx, task) in inst_tasks.iter().enumerate() {
        sched.push_phase1(Phase1Item {
            scope: module_scope,
            def_name: task.def_name,
            inst_name: task.inst_name,
            ast_index: idx as u32,
            span: task.span,
        });
    }

    let mut cells: Arena<CellId, Cell> = Arena::new();
    let mut cell_ids: Vec<Option<CellId>> = vec![None; inst_tasks.len()];

    for gate in &gate_tasks {
        cells.alloc(Cell {
            id: CellId::from_raw(0),
            name: gate.name,
            kind: gate.kind.clone(),
            connections: gate.connections.clone(),
            span: gate.span,
        });
    }

    sched.drain_phase1(|sched, item| {
        let task = &inst_tasks[item.ast_index as usize];
        resolve_instantiation(task, item.ast_index, module_scope, sched, &mut cells, &mut cell_ids, ctx);
    });

    sched.drain_phase2(|sched, item| {
        complete_port_binding(item, sched);
    });

    sched.drain_defparams(|stub| resolve_defparam(stub, &defparam_values, &cells, &mut ctx.design));

    let mut processes: Arena<ProcessId, Process> = Arena::new();
    let mut assignments: Vec<Assignment> = Vec::new();

    sched.drain_phase3(|item| {
        complete_phase3_item(
            item,
            &inst_tasks,
            &assign_tasks,
            &mut process_tasks,
            &sig_env,
            &mut cells,
            &cell_ids,
            &mut processes,
            &mut assignments,
            ctx,
        );
    });

    let content_hash = ContentHash::from_bytes(
        &format!(
            "{}:{}",
            ctx.interner.resolve(decl.name),
            param_overrides
                .iter()
                .map(|(k, v)| format!("{}={:?}", ctx.interner.resolve(*k), v))
                .collect::<Vec<_>>()
                .join(",")
        )
        .into_bytes(),
    );

    let module = Module {
        id: ModuleId::from_raw(0),
        name: decl.name,
        def_name: decl.name,
        scope: module_scope,
        span: decl.span,
        params: ir_params,
        ports,
        signals,
        cells,
        processes,
        assignments,
        clock_domains: Vec::new(),
        time_unit: None,
        time_precision: None,
        default_net_type: DefaultNetType::Wire,
        unconnected_drive: UnconnectedDrive::None,
        default_delay_mode: DefaultDelayMode::None,
        decay_time: None,
        config_tags: Vec::new(),
        is_top: parent_scope.is_none(),
        array_parent: None,
        content_hash,
    };

    let mid = ctx.design.modules.alloc(module);
    ctx.design.source_map.insert_module(mid, decl.span);
    if parent_scope.is_none() {
        ctx.design.top_modules.push(mid);
    }
    mid
}

/// Applies port-list parameter declarations and overrides to build the const env.
fn apply_verilog_params(
    decl: &v_ast::ModuleDecl,
    overrides: &[(Ident, ConstValue)],
    const_env: &mut ConstEnv,
    ir_params: &mut Vec<Parameter>,
    ctx: &mut ElaborationContext<'_>,
) {
    let override_map: HashMap<_, _> = overrides.iter().cloned().collect();

    for param in &decl.params {
        let name = param.name;
        let value = if let Some(ov) = override_map.get(&name) {
            ov.clone()
        } else if let Some(ref value) = param.value {
            const_eval::eval_verilog_expr(value, ctx.source_db, ctx.interner, const_env, ctx.sink)
                .unwrap_or(ConstValue::Int(0))
        } else {
            ConstValue::Int(0)
        };
        const_env.insert(name, value.clone());
        ir_params.push(Parameter {
            name,
            ty: TypeId::from_raw(0),
            value,
            span: param.span,
        });
    }
}

/// Elaborates the port list of a Verilog module.
fn elaborate_verilog_ports(
    decl: &v_ast::ModuleDecl,
    const_env: &ConstEnv,
    scope: ScopeId,
    signals: &mut Arena<SignalId, Signal>,
    sig_env: &mut SignalEnv,
    ports: &mut Vec<Port>,
    ctx: &mut ElaborationContext<'_>,
) {
    for port_decl in &decl.ports {
        let dir = match port_decl.direction {
            Direction::Input => PortDirection::Input,
            Direction::Output => PortDirection::Output,
            Direction::Inout => PortDirection::InOut,
        };
        let ty = types::resolve_verilog_net_type(
            port_decl.net_type.as_ref(),
            port_decl.range.as_ref(),
            port_decl.signed,
            &mut ctx.design.types,
            const_env,
            ctx.source_db,
            ctx.interner,
            ctx.sink,
        );
        let kind = SignalKind::Port;
        for &name in &port_decl.names {
            let sid = signals.alloc(Signal {
                id: SignalId::from_raw(0),
                name,
                ty,
                kind,
                init: None,
                clock_domain: None,
                scope,
                unpacked_dims: Vec::new(),
                span: port_decl.span,
            });
            sig_env.insert(name, sid);
            let pid = ctx.alloc_port_id();
            ports.push(Port {
                id: pid,
                name,
                direction: dir,
                ty,
                signal: sid,
                span: port_decl.span,
            });
        }
    }
}

/// Walks a list of module items (a module body, or a generate block's body),
/// populating the builder's side tables and the shared signal arena.
/// Instantiations, continuous assigns, and processes are queued rather than
/// completed inline; generate constructs expand eagerly since their shape
/// must be known before phase 1 can run.
fn walk_items(
    items: &[v_ast::ModuleItem],
    scope: ScopeId,
    const_env: &mut ConstEnv,
    b: &mut Builder<'_>,
    ctx: &mut ElaborationContext<'_>,
) {
    for item in items {
        walk_item(item, scope, const_env, b, ctx);
    }
}

fn walk_item(
    item: &v_ast::ModuleItem,
    scope: ScopeId,
    const_env: &mut ConstEnv,
    b: &mut Builder<'_>,
    ctx: &mut ElaborationContext<'_>,
) {
    match item {
        v_ast::ModuleItem::NetDecl(net) => {
            let ty = types::resolve_verilog_net_type(
                Some(&net.net_type),
                net.range.as_ref(),
                net.signed,
                &mut ctx.design.types,
                const_env,
                ctx.source_db,
                ctx.interner,
                ctx.sink,
            );
            for dn in &net.names {
                let sid = b.signals.alloc(Signal {
                    id: SignalId::from_raw(0),
                    name: dn.name,
                    ty,
                    kind: SignalKind::Wire,
                    init: None,
                    clock_domain: None,
                    scope,
                    unpacked_dims: Vec::new(),
                    span: dn.span,
                });
                b.sig_env.insert(dn.name, sid);
            }
        }
        v_ast::ModuleItem::RegDecl(reg) => {
            let ty = types::resolve_verilog_type(
                reg.range.as_ref(),
                reg.signed,
                &mut ctx.design.types,
                const_env,
                ctx.source_db,
                ctx.interner,
                ctx.sink,
            );
            for dn in &reg.names {
                let sid = b.signals.alloc(Signal {
                    id: SignalId::from_raw(0),
                    name: dn.name,
                    ty,
                    kind: SignalKind::Reg,
                    init: None,
                    clock_domain: None,
                    scope,
                    unpacked_dims: Vec::new(),
                    span: dn.span,
                });
                b.sig_env.insert(dn.name, sid);
            }
        }
        v_ast::ModuleItem::IntegerDecl(idecl) => {
            let ty = ctx.design.types.intern(aion_ir::types::Type::Integer);
            for dn in &idecl.names {
                let sid = b.signals.alloc(Signal {
                    id: SignalId::from_raw(0),
                    name: dn.name,
                    ty,
                    kind: SignalKind::Integer,
                    init: None,
                    clock_domain: None,
                    scope,
                    unpacked_dims: Vec::new(),
                    span: dn.span,
                });
                b.sig_env.insert(dn.name, sid);
            }
        }
        v_ast::ModuleItem::RealDecl(rdecl) => {
            let ty = ctx.design.types.intern(aion_ir::types::Type::Real);
            for dn in &rdecl.names {
                let sid = b.signals.alloc(Signal {
                    id: SignalId::from_raw(0),
                    name: dn.name,
                    ty,
                    kind: SignalKind::Real,
                    init: None,
                    clock_domain: None,
                    scope,
                    unpacked_dims: Vec::new(),
                    span: dn.span,
                });
                b.sig_env.insert(dn.name, sid);
            }
        }
        v_ast::ModuleItem::ParameterDecl(pd) => {
            let value = eval_body_param(pd, const_env, ctx);
            const_env.insert(pd.name, value.clone());
            b.ir_params.push(Parameter {
                name: pd.name,
                ty: TypeId::from_raw(0),
                value,
                span: pd.span,
            });
        }
        v_ast::ModuleItem::LocalparamDecl(pd) => {
            let value = eval_body_param(pd, const_env, ctx);
            const_env.insert(pd.name, value);
            b.localparams.insert(pd.name);
        }
        v_ast::ModuleItem::PortDecl(_) => {
            // Non-ANSI port declarations — handled by elaborate_verilog_ports
        }
        v_ast::ModuleItem::ContinuousAssign(ca) => {
            b.assign_tasks.push(ca.clone());
            let ast_index = (b.assign_tasks.len() - 1) as u32;
            b.sched.push_phase3(Phase3Item::ContinuousAssign {
                scope,
                ast_index,
                span: ca.span,
            });
        }
        v_ast::ModuleItem::AlwaysBlock(ab) => {
            b.process_tasks.push(ProcTask::Always(ab.clone()));
            let ast_index = (b.process_tasks.len() - 1) as u32;
            b.sched.push_phase3(Phase3Item::Process {
                scope,
                ast_index,
                span: ab.span,
            });
        }
        v_ast::ModuleItem::InitialBlock(ib) => {
            b.process_tasks.push(ProcTask::Initial(ib.clone()));
            let ast_index = (b.process_tasks.len() - 1) as u32;
            b.sched.push_phase3(Phase3Item::Process {
                scope,
                ast_index,
                span: ib.span,
            });
        }
        v_ast::ModuleItem::Instantiation(inst) => {
            let module_name = inst.module_name;
            let param_overrides = eval_param_overrides(&inst.param_overrides, const_env, ctx);
            for instance in &inst.instances {
                b.inst_tasks.push(InstTask {
                    def_name: module_name,
                    inst_name: instance.name,
                    param_overrides: param_overrides.clone(),
                    connections: instance.connections.clone(),
                    array_range: instance.range.clone(),
                    span: instance.span,
                });
            }
        }
        v_ast::ModuleItem::GateInst(gate) => {
            elaborate_gate(gate, b, ctx);
        }
        v_ast::ModuleItem::GenerateBlock(gb) => {
            elaborate_generate_block(gb, scope, const_env, b, ctx);
        }
        v_ast::ModuleItem::GenvarDecl(_) => {
            // Genvar presence is only meaningful while binding a generate-for
            // loop variable; tracked inline in elaborate_generate_block.
        }
        v_ast::ModuleItem::FunctionDecl(fd) => {
            ctx.design.scopes.alloc(Scope {
                id: ScopeId::from_raw(0),
                parent: Some(scope),
                name: fd.name,
                kind: ScopeKind::Function,
                genvar_value: None,
                span: fd.span,
            });
        }
        v_ast::ModuleItem::TaskDecl(td) => {
            ctx.design.scopes.alloc(Scope {
                id: ScopeId::from_raw(0),
                parent: Some(scope),
                name: td.name,
                kind: ScopeKind::Task,
                genvar_value: None,
                span: td.span,
            });
        }
        v_ast::ModuleItem::DefparamDecl(dd) => {
            let value = const_eval::eval_verilog_expr(
                &dd.value,
                ctx.source_db,
                ctx.interner,
                const_env,
                ctx.sink,
            )
            .unwrap_or(ConstValue::Error);
            let path = hierarchical_path(&dd.target);
            b.defparam_values.insert(dd.span, value);
            b.sched.push_defparam(DefparamStub {
                scope,
                path,
                span: dd.span,
                attempts: 0,
            });
        }
        v_ast::ModuleItem::Error(_) => {}
    }
}

/// Evaluates a single body-level `parameter`/`localparam` declaration's
/// value expression against the current const env.
fn eval_body_param(
    pd: &v_ast::ParameterDecl,
    const_env: &ConstEnv,
    ctx: &mut ElaborationContext<'_>,
) -> ConstValue {
    pd.value
        .as_ref()
        .and_then(|v| {
            const_eval::eval_verilog_expr(v, ctx.source_db, ctx.interner, const_env, ctx.sink)
        })
        .unwrap_or(ConstValue::Int(0))
}

/// Evaluates `#(...)` instantiation parameter overrides against the
/// instantiating module's const env.
fn eval_param_overrides(
    overrides: &[v_ast::Connection],
    const_env: &ConstEnv,
    ctx: &mut ElaborationContext<'_>,
) -> Vec<(Ident, ConstValue)> {
    overrides
        .iter()
        .filter_map(|conn| {
            let formal = conn.formal?;
            let actual = conn.actual.as_ref()?;
            let val =
                const_eval::eval_verilog_expr(actual, ctx.source_db, ctx.interner, const_env, ctx.sink)?;
            Some((formal, val))
        })
        .collect()
}

/// Extracts a dotted hierarchical path from an identifier or
/// hierarchical-name expression, used for `defparam` targets.
fn hierarchical_path(expr: &v_ast::Expr) -> Vec<Ident> {
    match expr {
        v_ast::Expr::Identifier { name, .. } => vec![*name],
        v_ast::Expr::HierarchicalName { parts, .. } => parts.clone(),
        _ => Vec::new(),
    }
}

/// Expands a `generate for`/`if`/`case` construct in place, creating real
/// scopes for each taken branch/iteration and folding the produced items
/// into the enclosing module's declarations.
fn elaborate_generate_block(
    gb: &v_ast::GenerateBlock,
    parent_scope: ScopeId,
    const_env: &ConstEnv,
    b: &mut Builder<'_>,
    ctx: &mut ElaborationContext<'_>,
) {
    match gb {
        v_ast::GenerateBlock::For {
            init,
            condition,
            step,
            label,
            items,
            span,
        } => {
            let Some((genvar, mut value)) = eval_blocking_assign(init, const_env, ctx) else {
                ctx.sink
                    .emit(errors::error_unsupported("generate-for init", *span));
                return;
            };
            let block_name = label.unwrap_or(genvar);
            let mut iterations = 0;
            loop {
                let mut iter_env = const_env.clone();
                iter_env.insert(genvar, ConstValue::Int(value));
                let cond_true = const_eval::eval_verilog_expr(
                    condition,
                    ctx.source_db,
                    ctx.interner,
                    &iter_env,
                    ctx.sink,
                )
                .and_then(|v| const_eval::const_to_i64(&v))
                .map(|v| v != 0)
                .unwrap_or(false);
                if !cond_true || iterations >= MAX_GENERATE_ITERATIONS {
                    break;
                }
                let iter_scope = ctx.design.scopes.alloc(Scope {
                    id: ScopeId::from_raw(0),
                    parent: Some(parent_scope),
                    name: block_name,
                    kind: ScopeKind::GenerateForBlock,
                    genvar_value: Some(value),
                    span: *span,
                });
                let mut iter_env_mut = iter_env;
                walk_items(items, iter_scope, &mut iter_env_mut, b, ctx);
                match eval_blocking_assign(step, &iter_env_mut, ctx) {
                    Some((_, next)) => value = next,
                    None => break,
                }
                iterations += 1;
            }
        }
        v_ast::GenerateBlock::If {
            condition,
            then_items,
            else_items,
            span,
        } => {
            let cond_true = const_eval::eval_verilog_expr(
                condition,
                ctx.source_db,
                ctx.interner,
                const_env,
                ctx.sink,
            )
            .and_then(|v| const_eval::const_to_i64(&v))
            .map(|v| v != 0)
            .unwrap_or(false);
            let chosen = if cond_true { then_items } else { else_items };
            if chosen.is_empty() {
                return;
            }
            let name = ctx.interner.get_or_intern("genblk");
            let block_scope = ctx.design.scopes.alloc(Scope {
                id: ScopeId::from_raw(0),
                parent: Some(parent_scope),
                name,
                kind: ScopeKind::GenerateBlock,
                genvar_value: None,
                span: *span,
            });
            let mut env = const_env.clone();
            walk_items(chosen, block_scope, &mut env, b, ctx);
        }
        v_ast::GenerateBlock::Case {
            selector,
            arms,
            default_items,
            span,
        } => {
            let sel = const_eval::eval_verilog_expr(
                selector,
                ctx.source_db,
                ctx.interner,
                const_env,
                ctx.sink,
            );
            let mut chosen: Option<&[v_ast::ModuleItem]> = None;
            if let Some(sel_val) = &sel {
                for arm in arms {
                    let matched = arm.patterns.iter().any(|pat| {
                        const_eval::eval_verilog_expr(
                            pat,
                            ctx.source_db,
                            ctx.interner,
                            const_env,
                            ctx.sink,
                        )
                        .map(|pv| const_eq(sel_val, &pv))
                        .unwrap_or(false)
                    });
                    if matched {
                        chosen = Some(&arm.items);
                        break;
                    }
                }
            }
            let chosen = chosen.or(default_items.as_deref());
            let Some(chosen) = chosen else { return };
            if chosen.is_empty() {
                return;
            }
            let name = ctx.interner.get_or_intern("genblk");
            let block_scope = ctx.design.scopes.alloc(Scope {
                id: ScopeId::from_raw(0),
                parent: Some(parent_scope),
                name,
                kind: ScopeKind::GenerateBlock,
                genvar_value: None,
                span: *span,
            });
            let mut env = const_env.clone();
            walk_items(chosen, block_scope, &mut env, b, ctx);
        }
    }
}

/// Compares two constant values for case-style equality, falling back to
/// integer comparison when both sides reduce to an integer.
fn const_eq(a: &ConstValue, b: &ConstValue) -> bool {
    match (const_eval::const_to_i64(a), const_eval::const_to_i64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Evaluates a `Statement::Blocking { target: Identifier, value }` into the
/// genvar's name and its constant value. Used for `generate for`'s init/step.
fn eval_blocking_assign(
    stmt: &v_ast::Statement,
    const_env: &ConstEnv,
    ctx: &mut ElaborationContext<'_>,
) -> Option<(Ident, i64)> {
    if let v_ast::Statement::Blocking { target, value, .. } = stmt {
        let v_ast::Expr::Identifier { name, .. } = target else {
            return None;
        };
        let val = const_eval::eval_verilog_expr(
            value,
            ctx.source_db,
            ctx.interner,
            const_env,
            ctx.sink,
        )
        .and_then(|v| const_eval::const_to_i64(&v))?;
        Some((*name, val))
    } else {
        None
    }
}

/// Elaborates a primitive gate instantiation as a best-effort scalar
/// (`width = 1`) cell. Gate kinds without a direct `CellKind` counterpart
/// (`nand`, `nor`, `xnor`, `buf`, and delay/strength variants) degrade to a
/// `BlackBox`, since the IR's combinational-primitive set only models the
/// four base gates.
fn elaborate_gate(gate: &v_ast::GateInst, b: &mut Builder<'_>, ctx: &mut ElaborationContext<'_>) {
    let gate_name = ctx.interner.resolve(gate.gate_type).to_string();
    let kind = match gate_name.as_str() {
        "and" => CellKind::And { width: 1 },
        "or" => CellKind::Or { width: 1 },
        "xor" => CellKind::Xor { width: 1 },
        "not" => CellKind::Not { width: 1 },
        _ => CellKind::BlackBox {
            port_names: Vec::new(),
        },
    };
    let mut connections = Vec::new();
    for (i, port_expr) in gate.ports.iter().enumerate() {
        let port_name = if i == 0 {
            ctx.interner.get_or_intern("out")
        } else {
            ctx.interner.get_or_intern(&format!("in{}", i - 1))
        };
        let direction = if i == 0 {
            PortDirection::Output
        } else {
            PortDirection::Input
        };
        let signal = lower_to_signal_ref(port_expr, b.sig_env, ctx.source_db, ctx.interner, ctx.sink);
        connections.push(Connection {
            port_name,
            direction,
            signal,
        });
    }
    let name = gate
        .name
        .unwrap_or_else(|| ctx.interner.get_or_intern("gate"));
    b.gate_tasks.push(GateTask {
        name,
        kind,
        connections,
        span: gate.span,
    });
}

/// Resolves a queued instantiation during the phase-1 drain: looks up the
/// module definition, recursively elaborates it (or reuses a cached
/// elaboration with identical parameters), and allocates the instance cell
/// with placeholder connections — the real connections are filled in during
/// phase 3 via the [`Phase3Item::PortConnect`] this pushes.
fn resolve_instantiation(
    task: &InstTask,
    ast_index: u32,
    scope: ScopeId,
    sched: &mut Scheduler,
    cells: &mut Arena<CellId, Cell>,
    cell_ids: &mut [Option<CellId>],
    ctx: &mut ElaborationContext<'_>,
) {
    if let Some(mid) = ctx.check_cache(task.def_name, &task.param_overrides) {
        let cid = cells.alloc(Cell {
            id: CellId::from_raw(0),
            name: task.inst_name,
            kind: CellKind::Instance {
                module: mid,
                params: task.param_overrides.clone(),
            },
            connections: Vec::new(),
            span: task.span,
        });
        cell_ids[ast_index as usize] = Some(cid);
        sched.push_phase2(Phase2Item {
            scope,
            module: mid,
            inst_name: task.inst_name,
            ast_index,
            span: task.span,
        });
        return;
    }

    if !ctx.push_elab_stack(task.def_name, task.span) {
        let cid = cells.alloc(Cell {
            id: CellId::from_raw(0),
            name: task.inst_name,
            kind: CellKind::BlackBox {
                port_names: Vec::new(),
            },
            connections: Vec::new(),
            span: task.span,
        });
        cell_ids[ast_index as usize] = Some(cid);
        return;
    }

    let mid = match ctx.registry.lookup(task.def_name) {
        Some(ModuleEntry::Verilog(sub_decl)) => {
            let mid = elaborate_verilog_module(sub_decl, &task.param_overrides, Some(scope), ctx);
            ctx.insert_cache(task.def_name, &task.param_overrides, mid);
            ctx.pop_elab_stack();
            mid
        }
        None => {
            ctx.sink.emit(errors::error_unknown_module(
                ctx.interner.resolve(task.def_name),
                task.span,
            ));
            ctx.pop_elab_stack();
            let cid = cells.alloc(Cell {
                id: CellId::from_raw(0),
                name: task.inst_name,
                kind: CellKind::BlackBox {
                    port_names: Vec::new(),
                },
                connections: Vec::new(),
                span: task.span,
            });
            cell_ids[ast_index as usize] = Some(cid);
            return;
        }
    };

    let cid = cells.alloc(Cell {
        id: CellId::from_raw(0),
        name: task.inst_name,
        kind: CellKind::Instance {
            module: mid,
            params: task.param_overrides.clone(),
        },
        connections: Vec::new(),
        span: task.span,
    });
    cell_ids[ast_index as usize] = Some(cid);
    sched.push_phase2(Phase2Item {
        scope,
        module: mid,
        inst_name: task.inst_name,
        ast_index,
        span: task.span,
    });
}

/// Completes a phase-2 item by queuing its port connections for phase 3.
fn complete_port_binding(item: Phase2Item, sched: &mut Scheduler) {
    sched.push_phase3(Phase3Item::PortConnect {
        scope: item.scope,
        inst_name: item.inst_name,
        ast_index: item.ast_index,
        span: item.span,
    });
}

/// Attempts to apply one `defparam` stub. Returns `true` if the stub should
/// be dropped (resolved, or a hard error already reported); `false` to retry
/// on the next fixpoint pass (the target instance may not exist yet in
/// `local_cells` if it's declared later in the same module).
///
/// This mutates the target module's already-elaborated `Parameter` in
/// place, rather than re-running elaboration with the new override — a
/// deliberate simplification documented alongside this function's caller.
fn resolve_defparam(
    stub: &DefparamStub,
    values: &HashMap<Span, ConstValue>,
    local_cells: &Arena<CellId, Cell>,
    design: &mut aion_ir::design::Design,
) -> bool {
    let Some(value) = values.get(&stub.span) else {
        return true;
    };
    if stub.path.len() < 2 {
        return true;
    }
    let Some(mut mid) = find_instance_module(local_cells, stub.path[0]) else {
        return false;
    };
    for seg in &stub.path[1..stub.path.len() - 1] {
        let Some(next) = find_instance_module(&design.modules[mid].cells, *seg) else {
            return false;
        };
        mid = next;
    }
    let param_name = stub.path[stub.path.len() - 1];
    let module = design.modules.get_mut(mid);
    if let Some(p) = module.params.iter_mut().find(|p| p.name == param_name) {
        p.value = value.clone();
    }
    true
}

/// Finds the module a named instance cell resolves to.
fn find_instance_module(cells: &Arena<CellId, Cell>, name: Ident) -> Option<ModuleId> {
    cells.iter().find_map(|(_, cell)| {
        if cell.name != name {
            return None;
        }
        match &cell.kind {
            CellKind::Instance { module, .. } => Some(*module),
            _ => None,
        }
    })
}

/// Completes a single phase-3 item: lowers a continuous assign, a process
/// body, or builds a resolved instance's port connections.
#[allow(clippy::too_many_arguments)]
fn complete_phase3_item(
    item: Phase3Item,
    inst_tasks: &[InstTask],
    assign_tasks: &[v_ast::ContinuousAssign],
    process_tasks: &mut [ProcTask],
    sig_env: &SignalEnv,
    cells: &mut Arena<CellId, Cell>,
    cell_ids: &[Option<CellId>],
    processes: &mut Arena<ProcessId, Process>,
    assignments: &mut Vec<Assignment>,
    ctx: &mut ElaborationContext<'_>,
) {
    match item {
        Phase3Item::ContinuousAssign { ast_index, .. } => {
            let ca = &assign_tasks[ast_index as usize];
            let target =
                lower_to_signal_ref(&ca.target, sig_env, ctx.source_db, ctx.interner, ctx.sink);
            let value = lower_verilog_expr(&ca.value, sig_env, ctx.source_db, ctx.interner, ctx.sink);
            assignments.push(Assignment {
                target,
                value,
                span: ca.span,
            });
        }
        Phase3Item::Process { ast_index, .. } => {
            let task = &process_tasks[ast_index as usize];
            let (kind, sensitivity, body, span) = match task {
                ProcTask::Always(ab) => {
                    let (kind, sens, body) = analyze_verilog_always(
                        &ab.body,
                        sig_env,
                        ctx.source_db,
                        ctx.interner,
                        ctx.sink,
                    );
                    (kind, sens, body, ab.span)
                }
                ProcTask::Initial(ib) => {
                    let body =
                        lower_verilog_stmt(&ib.body, sig_env, ctx.source_db, ctx.interner, ctx.sink);
                    (ProcessKind::Initial, Sensitivity::All, body, ib.span)
                }
            };
            processes.alloc(Process {
                id: ProcessId::from_raw(0),
                name: None,
                kind,
                body,
                sensitivity,
                span,
            });
        }
        Phase3Item::PortConnect { ast_index, .. } => {
            let task = &inst_tasks[ast_index as usize];
            let Some(cid) = cell_ids[ast_index as usize] else {
                return;
            };
            let connections = build_verilog_connections(&task.connections, sig_env, ctx);
            cells.get_mut(cid).connections = connections;
        }
        Phase3Item::PrimitiveTerminals { .. } => {}
    }
}

/// Analyzes a Verilog always block to determine ProcessKind and sensitivity.
fn analyze_verilog_always(
    body: &v_ast::Statement,
    sig_env: &SignalEnv,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> (ProcessKind, Sensitivity, IrStmt) {
    if let v_ast::Statement::EventControl {
        sensitivity, body, ..
    } = body
    {
        let (kind, sens) = map_verilog_sensitivity(sensitivity, sig_env);
        let ir_body = lower_verilog_stmt(body, sig_env, source_db, interner, sink);
        (kind, sens, ir_body)
    } else {
        let ir_body = lower_verilog_stmt(body, sig_env, source_db, interner, sink);
        (ProcessKind::Combinational, Sensitivity::All, ir_body)
    }
}

/// Maps a Verilog sensitivity list to IR ProcessKind and Sensitivity.
fn map_verilog_sensitivity(
    sens: &v_ast::SensitivityList,
    sig_env: &SignalEnv,
) -> (ProcessKind, Sensitivity) {
    match sens {
        v_ast::SensitivityList::Star => (ProcessKind::Combinational, Sensitivity::All),
        v_ast::SensitivityList::List(items) => {
            let has_edge = items.iter().any(|i| i.edge.is_some());
            if has_edge {
                let edges: Vec<_> = items
                    .iter()
                    .filter_map(|item| {
                        let sig_name = extract_signal_name(&item.signal)?;
                        let sid = sig_env.get(&sig_name).copied()?;
                        let edge = match item.edge {
                            Some(v_ast::EdgeKind::Posedge) => Edge::Posedge,
                            Some(v_ast::EdgeKind::Negedge) => Edge::Negedge,
                            None => Edge::Both,
                        };
                        Some(EdgeSensitivity { signal: sid, edge })
                    })
                    .collect();
                (ProcessKind::Sequential, Sensitivity::EdgeList(edges))
            } else {
                let sigs: Vec<_> = items
                    .iter()
                    .filter_map(|item| {
                        let sig_name = extract_signal_name(&item.signal)?;
                        sig_env.get(&sig_name).copied()
                    })
                    .collect();
                (ProcessKind::Combinational, Sensitivity::SignalList(sigs))
            }
        }
    }
}

/// Extracts the signal name from a simple identifier expression.
fn extract_signal_name(expr: &v_ast::Expr) -> Option<Ident> {
    match expr {
        v_ast::Expr::Identifier { name, .. } => Some(*name),
        _ => None,
    }
}

/// Builds IR connections from Verilog port connections.
fn build_verilog_connections(
    connections: &[v_ast::Connection],
    sig_env: &SignalEnv,
    ctx: &ElaborationContext<'_>,
) -> Vec<Connection> {
    connections
        .iter()
        .filter_map(|conn| {
            let formal = conn.formal?;
            let signal = if let Some(ref actual) = conn.actual {
                lower_to_signal_ref(actual, sig_env, ctx.source_db, ctx.interner, ctx.sink)
            } else {
                return None;
            };
            Some(Connection {
                port_name: formal,
                direction: PortDirection::Input, // resolved later against the callee's port list
                signal,
            })
        })
        .collect()
}
