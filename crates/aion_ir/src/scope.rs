//! Hierarchical scopes — the backbone of name resolution.
//!
//! Every elaborated object lives inside a [`Scope`]. Scopes nest (module inside
//! module, generate block inside module, named block inside process) and form
//! the tree that upward/downward name search walks.

use crate::ids::ScopeId;
use aion_common::Ident;
use aion_source::Span;
use serde::{Deserialize, Serialize};

/// The lexical kind of a [`Scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeKind {
    /// The implicit root scope above all top-level modules.
    TopLevel,
    /// A module instance.
    Module,
    /// An unconditionally-present generate block (`generate ... endgenerate`,
    /// or one arm of `genif`/`gencase`).
    GenerateBlock,
    /// A single iteration of a `generate for` loop.
    GenerateForBlock,
    /// A named `begin : label ... end` block.
    NamedBegin,
    /// A named `fork : label ... join` block.
    NamedFork,
    /// A function invocation frame.
    Function,
    /// A task invocation frame.
    Task,
    /// Any other internally-created scope (e.g. a block with local decls but
    /// no user-visible label).
    Internal,
}

/// A node in the hierarchical scope tree.
///
/// Scopes never move once created — elaboration allocates them into
/// [`Design::scopes`](crate::design::Design::scopes) and refers to them by
/// stable [`ScopeId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    /// The unique ID of this scope.
    pub id: ScopeId,
    /// The enclosing scope, or `None` for the top-level scope.
    pub parent: Option<ScopeId>,
    /// The simple (unqualified) name of this scope.
    pub name: Ident,
    /// The lexical kind of this scope.
    pub kind: ScopeKind,
    /// For a [`ScopeKind::GenerateForBlock`], the genvar's value on the
    /// iteration that created this scope. `None` for every other kind.
    pub genvar_value: Option<i64>,
    /// The source span covering this scope's declaration.
    pub span: Span,
}

impl Scope {
    /// Returns `true` if this scope is a named block reachable by a
    /// `disable` statement naming it directly (named begin/fork, or a
    /// task/function frame).
    pub fn is_disable_target(&self) -> bool {
        matches!(
            self.kind,
            ScopeKind::NamedBegin | ScopeKind::NamedFork | ScopeKind::Task | ScopeKind::Function
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(id: u32, parent: Option<u32>, kind: ScopeKind) -> Scope {
        Scope {
            id: ScopeId::from_raw(id),
            parent: parent.map(ScopeId::from_raw),
            name: Ident::from_raw(1),
            kind,
            genvar_value: None,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn top_level_has_no_parent() {
        let s = scope(0, None, ScopeKind::TopLevel);
        assert!(s.parent.is_none());
    }

    #[test]
    fn module_scope_has_parent() {
        let s = scope(1, Some(0), ScopeKind::Module);
        assert_eq!(s.parent, Some(ScopeId::from_raw(0)));
    }

    #[test]
    fn generate_for_block_carries_genvar_value() {
        let mut s = scope(2, Some(1), ScopeKind::GenerateForBlock);
        s.genvar_value = Some(3);
        assert_eq!(s.genvar_value, Some(3));
    }

    #[test]
    fn disable_targets() {
        assert!(scope(0, None, ScopeKind::NamedBegin).is_disable_target());
        assert!(scope(0, None, ScopeKind::NamedFork).is_disable_target());
        assert!(scope(0, None, ScopeKind::Task).is_disable_target());
        assert!(scope(0, None, ScopeKind::Function).is_disable_target());
        assert!(!scope(0, None, ScopeKind::GenerateBlock).is_disable_target());
        assert!(!scope(0, None, ScopeKind::Module).is_disable_target());
        assert!(!scope(0, None, ScopeKind::Internal).is_disable_target());
    }

    #[test]
    fn scope_kinds_distinct() {
        let kinds = [
            ScopeKind::TopLevel,
            ScopeKind::Module,
            ScopeKind::GenerateBlock,
            ScopeKind::GenerateForBlock,
            ScopeKind::NamedBegin,
            ScopeKind::NamedFork,
            ScopeKind::Function,
            ScopeKind::Task,
            ScopeKind::Internal,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for (j, b) in kinds.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }

    #[test]
    fn scope_serde_roundtrip() {
        let s = scope(5, Some(2), ScopeKind::NamedBegin);
        let json = serde_json::to_string(&s).unwrap();
        let restored: Scope = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, s.id);
        assert_eq!(restored.kind, s.kind);
    }
}
