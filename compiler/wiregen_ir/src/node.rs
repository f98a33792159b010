//! Type-graph nodes.
//!
//! The graph is a closed set of variants ([`TypeKind`]); every host-language
//! shape the engine accepts maps onto exactly one of them, and anything else
//! is rejected during translation. Child links are [`NodeId`] handles into
//! the owning [`TypeArena`](crate::TypeArena).

use smallvec::SmallVec;

use crate::{NodeId, Primitive};

/// The shape of a node.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    /// A primitive wire kind.
    Primitive(Primitive),

    /// A reference to another declared type by name.
    Identifier {
        name: String,
        /// The name was confirmed to be a declaration (or library builtin).
        resolved: bool,
    },

    /// Named fields in wire order.
    Struct(Vec<Field>),

    /// Fixed-length sequence. `size` is reproduced verbatim by the emitter.
    Array { size: String, elem: NodeId },

    /// Variable-length sequence.
    Slice(NodeId),

    /// String-keyed map.
    Map(NodeId),

    /// Nullable indirection.
    Ptr(NodeId),
}

/// One struct field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// The key written on the wire.
    pub wire_tag: String,
    /// The host-language field name.
    pub name: String,
    pub child: NodeId,
}

/// Conversion routines a shim node is encoded through.
///
/// A shimmed type is written on the wire as its base type; `to_base` and
/// `from_base` name the host functions converting between the two.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShimConversion {
    pub to_base: String,
    pub from_base: String,
    /// The conversion functions take the value by reference.
    pub needs_ref: bool,
}

/// A node in the type graph.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeNode {
    pub kind: TypeKind,
    /// Declaration this node was produced for, set on top-level nodes and
    /// carried along by copies.
    pub type_name: Option<String>,
    /// Transient variable name used by the emitter while walking the graph.
    pub varname: Option<String>,
    /// Set on nodes produced by a shim directive.
    pub shim: Option<ShimConversion>,
}

impl TypeNode {
    #[inline]
    pub fn new(kind: TypeKind) -> Self {
        TypeNode {
            kind,
            type_name: None,
            varname: None,
            shim: None,
        }
    }

    /// The name this node is known by: its declaration name if it has one,
    /// otherwise the name it references.
    pub fn type_name(&self) -> Option<&str> {
        match (&self.type_name, &self.kind) {
            (Some(name), _) => Some(name),
            (None, TypeKind::Identifier { name, .. }) => Some(name),
            (None, _) => None,
        }
    }

    /// The referenced name, if this node is an identifier.
    #[inline]
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TypeKind::Identifier { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl TypeKind {
    /// Direct children in traversal order.
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        match self {
            TypeKind::Primitive(_) | TypeKind::Identifier { .. } => SmallVec::new(),
            TypeKind::Struct(fields) => fields.iter().map(|f| f.child).collect(),
            TypeKind::Array { elem, .. }
            | TypeKind::Slice(elem)
            | TypeKind::Map(elem)
            | TypeKind::Ptr(elem) => smallvec::smallvec![*elem],
        }
    }

    /// Rebuild this kind with every child handle passed through `f`.
    pub fn map_children(&self, mut f: impl FnMut(NodeId) -> NodeId) -> TypeKind {
        match self {
            TypeKind::Primitive(_) | TypeKind::Identifier { .. } => self.clone(),
            TypeKind::Struct(fields) => TypeKind::Struct(
                fields
                    .iter()
                    .map(|field| Field {
                        wire_tag: field.wire_tag.clone(),
                        name: field.name.clone(),
                        child: f(field.child),
                    })
                    .collect(),
            ),
            TypeKind::Array { size, elem } => TypeKind::Array {
                size: size.clone(),
                elem: f(*elem),
            },
            TypeKind::Slice(elem) => TypeKind::Slice(f(*elem)),
            TypeKind::Map(value) => TypeKind::Map(f(*value)),
            TypeKind::Ptr(target) => TypeKind::Ptr(f(*target)),
        }
    }

    #[inline]
    pub fn is_struct(&self) -> bool {
        matches!(self, TypeKind::Struct(_))
    }
}
