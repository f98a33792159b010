//! Arena owning every node of a type graph.
//!
//! Nodes are never shared between parents: a handle appears as the child of
//! at most one node, and a declaration's entry is the root of its own tree.
//! Substitution overwrites a slot in place ([`TypeArena::overwrite_with_copy`])
//! instead of re-pointing the parent, so a replaced node keeps its handle and
//! its transient variable name. Slots orphaned by an overwrite stay allocated;
//! the arena lives for a single extraction run.

use wiregen_stack::ensure_sufficient_stack;

use crate::{NodeId, TypeKind, TypeNode};

/// Storage for type-graph nodes.
#[derive(Clone, Debug, Default)]
pub struct TypeArena {
    nodes: Vec<TypeNode>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its handle.
    pub fn alloc(&mut self, node: TypeNode) -> NodeId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "arena indices always fit u32"
        )]
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Allocate a fresh node of the given kind.
    #[inline]
    pub fn alloc_kind(&mut self, kind: TypeKind) -> NodeId {
        self.alloc(TypeNode::new(kind))
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut TypeNode {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &TypeKind {
        &self.nodes[id.index()].kind
    }

    /// Number of allocated slots, orphaned ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Set the transient variable name of a single node.
    pub fn set_varname(&mut self, id: NodeId, varname: impl Into<String>) {
        self.nodes[id.index()].varname = Some(varname.into());
    }

    /// Approximate number of nodes in the subtree rooted at `id`.
    ///
    /// Primitives and identifiers count 1; containers count 1 plus their
    /// element; structs count 1 plus every field's subtree. Recomputed on
    /// every call since inlining keeps growing subtrees.
    pub fn complexity(&self, id: NodeId) -> usize {
        ensure_sufficient_stack(|| match self.kind(id) {
            TypeKind::Primitive(_) | TypeKind::Identifier { .. } => 1,
            TypeKind::Struct(fields) => {
                1 + fields
                    .iter()
                    .map(|field| self.complexity(field.child))
                    .sum::<usize>()
            }
            TypeKind::Array { elem, .. }
            | TypeKind::Slice(elem)
            | TypeKind::Map(elem)
            | TypeKind::Ptr(elem) => 1 + self.complexity(*elem),
        })
    }

    /// Copy the subtree rooted at `id` into fresh slots.
    ///
    /// The copy shares no handles with the source, so later mutation of
    /// either side (a varname, a field order, a nested substitution) never
    /// shows through on the other.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let node = self.copy_node(id);
        self.alloc(node)
    }

    /// Replace the node at `target` with a deep copy of `source`, keeping
    /// `target`'s handle and transient variable name.
    ///
    /// The copy is taken before the slot is written, so `source` may be an
    /// ancestor of `target`.
    pub fn overwrite_with_copy(&mut self, target: NodeId, source: NodeId) {
        let mut node = self.copy_node(source);
        node.varname = self.nodes[target.index()].varname.take();
        self.nodes[target.index()] = node;
    }

    /// Clone the node at `id` with its children deep-copied.
    fn copy_node(&mut self, id: NodeId) -> TypeNode {
        ensure_sufficient_stack(|| {
            let original = self.get(id).clone();
            let kind = original.kind.map_children(|child| self.deep_copy(child));
            TypeNode { kind, ..original }
        })
    }

    /// Handles of every node reachable from `id`, including `id`, in
    /// pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            let children = self.kind(next).children();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Whether two subtrees have the same shape, names and annotations,
    /// regardless of where they live in the arena. Transient variable names
    /// are not compared.
    pub fn same_shape(&self, a: NodeId, b: NodeId) -> bool {
        ensure_sufficient_stack(|| {
            let (left, right) = (self.get(a), self.get(b));
            if left.type_name != right.type_name || left.shim != right.shim {
                return false;
            }
            match (&left.kind, &right.kind) {
                (TypeKind::Struct(lf), TypeKind::Struct(rf)) => {
                    lf.len() == rf.len()
                        && lf.iter().zip(rf).all(|(l, r)| {
                            l.name == r.name
                                && l.wire_tag == r.wire_tag
                                && self.same_shape(l.child, r.child)
                        })
                }
                (TypeKind::Array { size: ls, elem: le }, TypeKind::Array { size: rs, elem: re }) => {
                    ls == rs && self.same_shape(*le, *re)
                }
                (TypeKind::Slice(l), TypeKind::Slice(r))
                | (TypeKind::Map(l), TypeKind::Map(r))
                | (TypeKind::Ptr(l), TypeKind::Ptr(r)) => self.same_shape(*l, *r),
                (l, r) => l == r,
            }
        })
    }
}
