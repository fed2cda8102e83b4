//! Diagnostic codes and helper functions for elaboration errors and warnings.
//!
//! Error codes `E200`--`E211` cover elaboration failures (unknown modules,
//! duplicate signals, type mismatches, etc.). Warning codes `W200`--`W201`
//! cover non-fatal issues (width mismatches, unconnected ports).

use aion_diagnostics::{Category, Diagnostic, DiagnosticCode};
use aion_source::Span;

/// Unknown module referenced in instantiation.
pub const E200: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 200,
};

/// Port count or name mismatch in instantiation.
pub const E201: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 201,
};

/// Duplicate module name across source files.
pub const E202: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 202,
};

/// Duplicate signal name within a module.
pub const E203: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 203,
};

/// Reference to an unknown signal.
pub const E204: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 204,
};

/// Type mismatch in assignment or connection.
pub const E205: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 205,
};

/// Top-level module not found in any source file.
pub const E206: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 206,
};

/// Circular instantiation detected.
pub const E207: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 207,
};

/// Unknown port name in instantiation connection.
pub const E208: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 208,
};

/// Parameter constant-expression evaluation failure.
pub const E209: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 209,
};

/// Unsupported construct (e.g., complex typedef in Phase 0).
pub const E210: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 210,
};

/// No architecture found for a VHDL entity.
pub const E211: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 211,
};

/// Name resolved, but not to the expected kind of object.
pub const E212: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 212,
};

/// A constant-required context saw a non-constant expression.
pub const E213: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 213,
};

/// An integer-required context saw a non-integer value.
pub const E214: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 214,
};

/// A bit-vector-required context saw a non-bit-vector value.
pub const E215: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 215,
};

/// A real operand was used where reals are not permitted.
pub const E216: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 216,
};

/// A part-select's bounds are ordered inconsistently with the declaration.
pub const E217: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 217,
};

/// An indexed reference supplied the wrong number of dimensions.
pub const E218: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 218,
};

/// A constant function called itself (directly or transitively) while still executing.
pub const E219: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 219,
};

/// A function used in constant context is not a constant function.
pub const E220: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 220,
};

/// An expression is not a valid assignment target.
pub const E221: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 221,
};

/// An illegal left-hand side for a `force` statement.
pub const E222: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 222,
};

/// An illegal left-hand side for a procedural continuous assignment.
pub const E223: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 223,
};

/// A hierarchical name was used inside a constant expression.
pub const E224: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 224,
};

/// A non-constant-foldable system function was called inside a constant expression.
pub const E225: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 225,
};

/// A call site supplied the wrong number of arguments.
pub const E226: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 226,
};

/// A call site supplied an argument of the wrong type.
pub const E227: DiagnosticCode = DiagnosticCode {
    category: Category::Error,
    number: 227,
};

/// Width mismatch in assignment or connection.
pub const W200: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 200,
};

/// Unconnected port in instantiation.
pub const W201: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 201,
};

/// Bit- or part-select out of range; the evaluated result is `x`.
pub const W202: DiagnosticCode = DiagnosticCode {
    category: Category::Warning,
    number: 202,
};

/// Creates a diagnostic for an unknown module in an instantiation.
pub fn error_unknown_module(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E200, format!("unknown module `{name}`"), span)
        .with_help("check that the module is defined in the source files")
}

/// Creates a diagnostic for a missing top-level module.
pub fn error_top_not_found(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E206, format!("top-level module `{name}` not found"), span)
        .with_help("set `project.top` in aion.toml to the name of an existing module")
}

/// Creates a diagnostic for a duplicate module name.
pub fn error_duplicate_module(name: &str, span: Span, prev_span: Span) -> Diagnostic {
    Diagnostic::error(E202, format!("duplicate module `{name}`"), span).with_label(
        aion_diagnostics::Label::secondary(prev_span, "previously defined here"),
    )
}

/// Creates a diagnostic for a duplicate signal name within a module.
pub fn error_duplicate_signal(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E203, format!("duplicate signal `{name}`"), span)
}

/// Creates a diagnostic for an unknown signal reference.
pub fn error_unknown_signal(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E204, format!("unknown signal `{name}`"), span)
}

/// Creates a diagnostic for a circular instantiation.
pub fn error_circular_instantiation(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E207,
        format!("circular instantiation of module `{name}`"),
        span,
    )
    .with_note("the module directly or indirectly instantiates itself")
}

/// Creates a diagnostic when a parameter cannot be constant-evaluated.
pub fn error_param_not_const(msg: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E209, format!("cannot evaluate parameter: {msg}"), span)
}

/// Creates a diagnostic for an unsupported construct.
pub fn error_unsupported(what: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E210, format!("unsupported construct: {what}"), span)
        .with_note("this will be supported in a future release")
}

/// Creates a diagnostic when no architecture is found for a VHDL entity.
pub fn error_no_architecture(entity_name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E211,
        format!("no architecture found for entity `{entity_name}`"),
        span,
    )
}

/// Creates a diagnostic for a port mismatch in instantiation.
pub fn error_port_mismatch(msg: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E201, msg.to_string(), span)
}

/// Creates a diagnostic for an unknown port in an instantiation.
pub fn error_unknown_port(port_name: &str, module_name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E208,
        format!("unknown port `{port_name}` on module `{module_name}`"),
        span,
    )
}

/// Creates a warning for a width mismatch.
pub fn warn_width_mismatch(msg: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(W200, msg.to_string(), span)
}

/// Creates a warning for an unconnected port.
pub fn warn_unconnected_port(port_name: &str, instance_name: &str, span: Span) -> Diagnostic {
    Diagnostic::warning(
        W201,
        format!("port `{port_name}` is unconnected on instance `{instance_name}`"),
        span,
    )
}

/// Creates an error for a name that resolved to the wrong kind of object.
pub fn error_wrong_kind(name: &str, expected: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E212,
        format!("`{name}` does not name a {expected}"),
        span,
    )
}

/// Creates an error for a non-constant expression in a constant-required context.
pub fn error_const_required(what: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E213, format!("{what} must be a constant expression"), span)
}

/// Creates an error for a value used where an integer was required.
pub fn error_int_required(span: Span) -> Diagnostic {
    Diagnostic::error(E214, "expected an integer value", span)
}

/// Creates an error for a value used where a bit-vector was required.
pub fn error_bitvector_required(span: Span) -> Diagnostic {
    Diagnostic::error(E215, "expected a bit-vector value", span)
}

/// Creates an error for a real operand used where reals are not allowed.
pub fn error_no_real_allowed(op: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E216, format!("real operand not allowed with `{op}`"), span)
}

/// Creates an error for a part-select whose bounds are ordered inconsistently.
pub fn error_range_order(span: Span) -> Diagnostic {
    Diagnostic::error(
        E217,
        "part-select bounds are ordered inconsistently with the declaration",
        span,
    )
}

/// Creates an error for an indexed reference with the wrong dimension count.
pub fn error_dimension_mismatch(expected: usize, found: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        E218,
        format!("expected {expected} index dimension(s), found {found}"),
        span,
    )
}

/// Creates an error for a constant function that recursed into itself.
pub fn error_recursive_const_function(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E219,
        format!("constant function `{name}` called recursively"),
        span,
    )
}

/// Creates an error for a non-constant function used in constant context.
pub fn error_not_a_const_function(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E220,
        format!("`{name}` is not a constant function"),
        span,
    )
}

/// Creates an error for an expression that is not a valid assignment target.
pub fn error_illegal_lhs(span: Span) -> Diagnostic {
    Diagnostic::error(E221, "not a valid assignment target", span)
}

/// Creates an error for an illegal `force` target.
pub fn error_illegal_in_force(span: Span) -> Diagnostic {
    Diagnostic::error(E222, "not a valid `force` target", span)
}

/// Creates an error for an illegal procedural continuous assignment target.
pub fn error_illegal_in_pca(span: Span) -> Diagnostic {
    Diagnostic::error(
        E223,
        "not a valid procedural continuous assignment target",
        span,
    )
}

/// Creates an error for a hierarchical name used inside a constant expression.
pub fn error_hier_name_in_const_expr(span: Span) -> Diagnostic {
    Diagnostic::error(
        E224,
        "hierarchical names are not allowed in constant expressions",
        span,
    )
}

/// Creates an error for a non-constant-foldable system function in constant context.
pub fn error_sys_func_in_const_expr(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        E225,
        format!("`{name}` is not allowed in a constant expression"),
        span,
    )
}

/// Creates an error for an argument-count mismatch at a call site.
pub fn error_argument_count_mismatch(expected: usize, found: usize, span: Span) -> Diagnostic {
    Diagnostic::error(
        E226,
        format!("expected {expected} argument(s), found {found}"),
        span,
    )
}

/// Creates an error for an argument-type mismatch at a call site.
pub fn error_argument_type_mismatch(msg: &str, span: Span) -> Diagnostic {
    Diagnostic::error(E227, format!("argument type mismatch: {msg}"), span)
}

/// Creates a warning for an out-of-range bit/part select (result is `x`).
pub fn warn_out_of_range(span: Span) -> Diagnostic {
    Diagnostic::warning(W202, "bit/part-select out of range, result is `x`", span)
}
