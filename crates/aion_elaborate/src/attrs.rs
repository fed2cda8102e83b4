//! Attribute index for `(* ... *)` attribute instances (§9).
//!
//! Associates elaborated objects with the attribute entries attached to the
//! declaration or instantiation that produced them, kept in separate
//! definition-side and instance-side buckets (a module definition and one of
//! its instances can each carry their own, independent attribute lists).
//!
//! The current parser does not yet produce attribute-instance nodes, so
//! nothing populates this index during elaboration today — [`find_attr`]
//! always returns an empty slice. The dedup/storage machinery is built out
//! fully so that wiring it up, once the parser grows attribute support, is a
//! matter of calling [`AttributeIndex::record`] from the item walk rather
//! than redesigning this module.

use std::collections::HashMap;

use aion_common::Ident;
use aion_ir::ConstValue;
use aion_source::Span;

use crate::object_dict::ObjectHandle;

/// One `name [= const_expr]` entry inside a `(* ... *)` attribute instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrEntry {
    /// The attribute's name.
    pub name: Ident,
    /// The attribute's value, or `None` for a bare name (implicit `1`).
    pub value: Option<ConstValue>,
}

/// Identity key for a source attribute-instance list: since the parse tree
/// here isn't `Rc`/pointer-shared, a repeated elaboration of the same
/// template reaches the same `(* ... *)` list through the same source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AttrKey(Span);

/// Maps elaborated objects to their attribute lists, deduplicated by source
/// attribute-instance identity.
#[derive(Debug, Default)]
pub struct AttributeIndex {
    definition_side: HashMap<ObjectHandle, Vec<AttrEntry>>,
    instance_side: HashMap<ObjectHandle, Vec<AttrEntry>>,
    cache: HashMap<AttrKey, Vec<AttrEntry>>,
}

impl AttributeIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `entries` (read from the attribute-instance list at `span`)
    /// against `obj`, in the definition-side bucket if `is_definition`,
    /// otherwise the instance-side bucket.
    ///
    /// Multiple objects elaborated from the same `(* ... *)` list (e.g. a
    /// module template instantiated many times) share one cached `Vec`
    /// rather than cloning per object.
    pub fn record(&mut self, obj: ObjectHandle, is_definition: bool, span: Span, entries: Vec<AttrEntry>) {
        let cached = self.cache.entry(AttrKey(span)).or_insert(entries).clone();
        let bucket = if is_definition {
            &mut self.definition_side
        } else {
            &mut self.instance_side
        };
        bucket.insert(obj, cached);
    }

    /// Returns the attribute entries attached to `obj`. `definition_side`
    /// selects which bucket to consult; an object with nothing recorded
    /// there returns an empty slice.
    pub fn find_attr(&self, obj: ObjectHandle, definition_side: bool) -> &[AttrEntry] {
        let bucket = if definition_side {
            &self.definition_side
        } else {
            &self.instance_side
        };
        bucket.get(&obj).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aion_ir::ids::SignalId;

    #[test]
    fn empty_index_has_no_attrs() {
        let idx = AttributeIndex::new();
        let obj = ObjectHandle::Signal(SignalId::from_raw(0));
        assert!(idx.find_attr(obj, true).is_empty());
        assert!(idx.find_attr(obj, false).is_empty());
    }

    #[test]
    fn record_and_find_roundtrip() {
        let mut idx = AttributeIndex::new();
        let obj = ObjectHandle::Signal(SignalId::from_raw(0));
        let entries = vec![AttrEntry {
            name: Ident::from_raw(1),
            value: None,
        }];
        idx.record(obj, true, Span::DUMMY, entries.clone());
        assert_eq!(idx.find_attr(obj, true), entries.as_slice());
        assert!(idx.find_attr(obj, false).is_empty());
    }

    #[test]
    fn definition_and_instance_buckets_are_independent() {
        let mut idx = AttributeIndex::new();
        let obj = ObjectHandle::Signal(SignalId::from_raw(0));
        idx.record(
            obj,
            true,
            Span::DUMMY,
            vec![AttrEntry {
                name: Ident::from_raw(1),
                value: None,
            }],
        );
        idx.record(
            obj,
            false,
            Span::DUMMY,
            vec![AttrEntry {
                name: Ident::from_raw(2),
                value: None,
            }],
        );
        assert_eq!(idx.find_attr(obj, true)[0].name, Ident::from_raw(1));
        assert_eq!(idx.find_attr(obj, false)[0].name, Ident::from_raw(2));
    }

    #[test]
    fn shared_span_reuses_cached_entries() {
        let mut idx = AttributeIndex::new();
        let a = ObjectHandle::Signal(SignalId::from_raw(0));
        let b = ObjectHandle::Signal(SignalId::from_raw(1));
        let span = Span::new(aion_source::FileId::from_raw(0), 0, 4);
        idx.record(
            a,
            true,
            span,
            vec![AttrEntry {
                name: Ident::from_raw(7),
                value: None,
            }],
        );
        idx.record(b, true, span, vec![]);
        assert_eq!(idx.find_attr(b, true)[0].name, Ident::from_raw(7));
    }
}
