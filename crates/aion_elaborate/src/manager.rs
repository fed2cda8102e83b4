//! Top-level elaboration entry point and post-elaboration query surface (C9).
//!
//! [`elaborate`] drives [`crate::verilog::elaborate_verilog_module`] once per
//! requested top module, then builds the name-resolution dictionaries
//! ([`ObjectDict`], [`ModDefDict`]) as a post-pass over the finished
//! [`Design`] — elaboration itself only allocates IR nodes and defers
//! cross-phase work to [`crate::scheduler::Scheduler`]; the dictionaries
//! only need to exist once a caller actually starts querying the result.
//! [`ElaboratedDesign`] is the resulting read-only view, exposing the
//! manager's query API.

use std::collections::HashMap;

use aion_common::{Ident, Interner};
use aion_diagnostics::DiagnosticSink;
use aion_ir::cell::CellKind;
use aion_ir::ids::{ModuleId, ScopeId};
use aion_ir::module::Assignment;
use aion_ir::process::Process;
use aion_ir::scope::ScopeKind;
use aion_ir::signal::SignalKind;
use aion_ir::udp::UdpDefn;
use aion_ir::Design;
use aion_source::SourceDb;
use aion_verilog_parser::ast::VerilogSourceFile;

use crate::attrs::{AttrEntry, AttributeIndex};
use crate::context::ElaborationContext;
use crate::errors;
use crate::moddef_dict::ModDefDict;
use crate::object_dict::{ObjectDict, ObjectHandle, Tag};
use crate::registry::{ModuleEntry, ModuleRegistry};
use crate::verilog::elaborate_verilog_module;

/// All parsed source files feeding one elaboration run.
#[derive(Debug, Default, Clone)]
pub struct ParsedDesign {
    /// Parsed Verilog-2001 source files.
    pub verilog_files: Vec<VerilogSourceFile>,
}

/// Whether a [`SystemTaskHandle`] names a task or a function, and if a
/// function, the kind of value it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTaskKind {
    /// A system task, called for its effect (`$display`, `$finish`, ...).
    Task,
    /// A system function returning an integer-like value.
    IntFunction,
    /// A system function returning a real value.
    RealFunction,
}

/// A single registered built-in system task or function.
#[derive(Debug, Clone, Copy)]
pub struct SystemTaskHandle {
    kind: SystemTaskKind,
}

impl SystemTaskHandle {
    /// `true` if this handle names a function rather than a task.
    pub fn is_function(&self) -> bool {
        !matches!(self.kind, SystemTaskKind::Task)
    }

    /// This function's return kind, or `None` for a task.
    pub fn return_kind(&self) -> Option<SystemTaskKind> {
        match self.kind {
            SystemTaskKind::Task => None,
            k => Some(k),
        }
    }
}

/// Name-keyed registry of built-in Verilog-2001 system tasks and functions.
#[derive(Debug, Clone)]
pub struct SystemTaskRegistry {
    table: HashMap<Ident, SystemTaskHandle>,
}

impl SystemTaskRegistry {
    /// Builds the standard registry, interning each task/function name with
    /// `interner`.
    pub fn standard(interner: &Interner) -> Self {
        let mut table = HashMap::new();
        for name in ["$display", "$write", "$strobe", "$monitor", "$finish", "$stop"] {
            table.insert(
                interner.get_or_intern(name),
                SystemTaskHandle {
                    kind: SystemTaskKind::Task,
                },
            );
        }
        for name in ["$signed", "$unsigned", "$bits", "$clog2", "$random"] {
            table.insert(
                interner.get_or_intern(name),
                SystemTaskHandle {
                    kind: SystemTaskKind::IntFunction,
                },
            );
        }
        table.insert(
            interner.get_or_intern("$realtime"),
            SystemTaskHandle {
                kind: SystemTaskKind::RealFunction,
            },
        );
        Self { table }
    }

    /// Looks up a system task/function by its interned name (including the
    /// leading `$`).
    pub fn find(&self, name: Ident) -> Option<&SystemTaskHandle> {
        self.table.get(&name)
    }
}

/// Read-only view of a completed elaboration: the finished [`Design`] plus
/// the name-resolution and attribute indices built over it.
pub struct ElaboratedDesign {
    design: Design,
    objects: ObjectDict,
    moddict: ModDefDict,
    attrs: AttributeIndex,
    systf: SystemTaskRegistry,
}

impl ElaboratedDesign {
    /// The underlying elaborated design.
    pub fn design(&self) -> &Design {
        &self.design
    }

    /// All user-defined primitive definitions (always empty today — the
    /// parser does not yet produce UDP declarations; see [`Design::udps`]).
    pub fn udp_list(&self) -> impl Iterator<Item = &UdpDefn> {
        self.design.udps.values()
    }

    /// The top-level modules, in source declaration order.
    pub fn topmodule_list(&self) -> &[ModuleId] {
        self.design.topmodule_list()
    }

    /// Looks up a UDP definition by name.
    pub fn find_udp(&self, name: Ident) -> Option<&UdpDefn> {
        self.design.udps.values().find(|u| u.name == name)
    }

    /// Looks up a built-in system task or function by name.
    pub fn find_user_systf(&self, name: Ident) -> Option<&SystemTaskHandle> {
        self.systf.find(name)
    }

    /// Resolves `name` directly within `parent` (no upward search).
    pub fn find_obj(&self, parent: ScopeId, name: Ident) -> Option<ObjectHandle> {
        self.objects.find(parent, name)
    }

    /// Resolves a module-definition name visible for upward search within
    /// `parent` (see [`ModDefDict`]).
    pub fn find_scope(&self, parent: ScopeId, name: Ident) -> Option<ModuleId> {
        self.moddict.lookup(parent, name)
    }

    /// Nested generate blocks and named begin/fork blocks declared directly
    /// within `parent`.
    pub fn list_internal_scopes(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::InternalScopes)
    }

    /// Declarations tagged `tag` within `parent` (nets, regs, variables,
    /// parameters, specparams, or named events).
    pub fn list_decls(&self, parent: ScopeId, tag: Tag) -> &[ObjectHandle] {
        self.objects.by_tag(parent, tag)
    }

    /// Arrayed declarations (memories) tagged `tag` within `parent`.
    ///
    /// Always empty: this IR has no memory-array representation distinct
    /// from a single [`aion_ir::signal::Signal`], so there is nothing to
    /// enumerate here yet.
    pub fn list_decl_arrays(&self, _parent: ScopeId, _tag: Tag) -> &[ObjectHandle] {
        &[]
    }

    /// Resolved `defparam` directives affecting `parent`.
    ///
    /// Always empty: `defparam` resolution mutates the target parameter's
    /// value in place during elaboration rather than materializing a
    /// separate directive object (see [`crate::scheduler::DefparamStub`]).
    pub fn list_defparams(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::Defparams)
    }

    /// Parameter-assignment directives (`#(...)`, named overrides) affecting
    /// `parent`.
    ///
    /// Always empty for the same reason as [`Self::list_defparams`]: only
    /// the resolved parameter value survives elaboration, tagged under
    /// [`Tag::Parameters`] via [`Self::list_decls`].
    pub fn list_param_assigns(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::ParameterAssigns)
    }

    /// Single module instances declared directly within `parent`.
    pub fn list_modules(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::Modules)
    }

    /// Module arrays declared directly within `parent`.
    ///
    /// Always empty: instance ranges and `generate for` module expansion
    /// are lowered to individually-named scalar instances, not a
    /// [`ModuleArray`](aion_ir::module::ModuleArray) object.
    pub fn list_module_arrays(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::ModuleArrays)
    }

    /// Single gate/UDP primitive instances declared directly within `parent`.
    pub fn list_primitives(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::Primitives)
    }

    /// Primitive arrays declared directly within `parent` (see
    /// [`Self::list_module_arrays`] — always empty for the same reason).
    pub fn list_primitive_arrays(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::PrimitiveArrays)
    }

    /// Task declarations visible directly within `parent`.
    pub fn list_tasks(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::Tasks)
    }

    /// Function declarations visible directly within `parent`.
    pub fn list_functions(&self, parent: ScopeId) -> &[ObjectHandle] {
        self.objects.by_tag(parent, Tag::Functions)
    }

    /// Continuous assignments in `module`.
    ///
    /// Keyed by [`ModuleId`] rather than [`ScopeId`] like the other `list_*`
    /// accessors: `assign` statements aren't named objects and the IR
    /// doesn't track which generate scope lexically contains each one, only
    /// which module's flat arena holds it.
    pub fn list_continuous_assigns(&self, module: ModuleId) -> &[Assignment] {
        &self.design.modules.get(module).assignments
    }

    /// Behavioral processes (`always`/`initial` blocks) in `module`. See
    /// [`Self::list_continuous_assigns`] for why this is module- rather than
    /// scope-keyed.
    pub fn list_processes(&self, module: ModuleId) -> impl Iterator<Item = &Process> {
        self.design.modules.get(module).processes.values()
    }

    /// Attribute entries attached to `obj` (definition-side if
    /// `definition_side`, else instance-side). Always empty today; see
    /// [`AttributeIndex`].
    pub fn find_attr(&self, obj: ObjectHandle, definition_side: bool) -> &[AttrEntry] {
        self.attrs.find_attr(obj, definition_side)
    }
}

/// Maps a [`aion_ir::signal::Signal`]'s storage kind to its enumeration tag.
fn signal_tag(kind: SignalKind) -> Tag {
    match kind {
        SignalKind::Wire | SignalKind::Port | SignalKind::Const => Tag::Nets,
        SignalKind::Reg | SignalKind::Latch => Tag::Regs,
        SignalKind::Integer | SignalKind::Real | SignalKind::Time => Tag::Variables,
        SignalKind::Event => Tag::NamedEvents,
        SignalKind::Parameter | SignalKind::Localparam => Tag::Parameters,
        SignalKind::Specparam => Tag::Specparams,
    }
}

/// Maps a [`aion_ir::scope::Scope`]'s kind to its enumeration tag within its
/// parent scope, or `None` for kinds that aren't separately name-enumerable
/// (module scopes surface as [`ObjectHandle::ModuleInstance`] via their
/// owning cell instead).
fn scope_tag(kind: ScopeKind) -> Option<Tag> {
    match kind {
        ScopeKind::Task => Some(Tag::Tasks),
        ScopeKind::Function => Some(Tag::Functions),
        ScopeKind::Module | ScopeKind::TopLevel => None,
        ScopeKind::GenerateBlock
        | ScopeKind::GenerateForBlock
        | ScopeKind::NamedBegin
        | ScopeKind::NamedFork
        | ScopeKind::Internal => Some(Tag::InternalScopes),
    }
}

/// Builds the object and module-definition dictionaries for a finished
/// design, in a single linear pass: every module's signals and cells, and
/// every scope's parent link.
fn build_dicts(design: &Design) -> (ObjectDict, ModDefDict) {
    let mut objects = ObjectDict::new();
    let mut moddict = ModDefDict::new();

    for (_mid, module) in design.modules.iter() {
        for (sig_id, sig) in module.signals.iter() {
            objects.insert(
                sig.scope,
                sig.name,
                ObjectHandle::Signal(sig_id),
                &[signal_tag(sig.kind)],
            );
        }

        for (cell_id, cell) in module.cells.iter() {
            match &cell.kind {
                CellKind::Instance { module: target, .. } => {
                    objects.insert(
                        module.scope,
                        cell.name,
                        ObjectHandle::ModuleInstance(cell_id),
                        &[Tag::Modules],
                    );
                    let target_module = design.modules.get(*target);
                    moddict.insert(module.scope, target_module.def_name, *target);
                }
                _ => {
                    objects.insert(
                        module.scope,
                        cell.name,
                        ObjectHandle::Primitive(cell_id),
                        &[Tag::Primitives],
                    );
                }
            }
        }
    }

    for (scope_id, scope) in design.scopes.iter() {
        let Some(parent) = scope.parent else {
            continue;
        };
        if let Some(tag) = scope_tag(scope.kind) {
            objects.insert(parent, scope.name, ObjectHandle::Scope(scope_id), &[tag]);
        }
    }

    (objects, moddict)
}

/// Elaborates every module named in `top_names` and everything it
/// transitively instantiates, returning the finished, queryable design.
///
/// Unknown top names emit `E2xx`-class diagnostics via `sink` rather than
/// panicking; the returned design simply omits them from
/// [`ElaboratedDesign::topmodule_list`].
pub fn elaborate(
    parsed: &ParsedDesign,
    top_names: &[Ident],
    interner: &Interner,
    source_db: &SourceDb,
    sink: &DiagnosticSink,
) -> ElaboratedDesign {
    let registry = ModuleRegistry::from_parsed_design(&parsed.verilog_files, interner, sink);
    let mut ctx = ElaborationContext::new(&registry, interner, source_db, sink);

    for &top in top_names {
        match registry.lookup(top) {
            Some(ModuleEntry::Verilog(decl)) => {
                elaborate_verilog_module(decl, &[], None, &mut ctx);
            }
            None => {
                sink.emit(errors::error_top_not_found(
                    interner.resolve(top),
                    aion_source::Span::DUMMY,
                ));
            }
        }
    }

    let design = ctx.design;
    let (objects, moddict) = build_dicts(&design);

    ElaboratedDesign {
        design,
        objects,
        moddict,
        attrs: AttributeIndex::new(),
        systf: SystemTaskRegistry::standard(interner),
    }
}
