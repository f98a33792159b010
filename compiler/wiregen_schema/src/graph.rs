//! The Identities map and everything the stages attach to it.
//!
//! `SchemaGraph` owns the [`TypeArena`] together with the name → root handle
//! map that is the engine's output. Directives add per-declaration flags and
//! register shims here; the inlining pass consumes the shims.
//!
//! # Design
//!
//! - `FxHashMap` for name lookup; nothing depends on its iteration order
//! - Listings that feed a pass or the emitter (`entries`, `elems`) are sorted
//!   by name so repeated runs walk the graph identically

use bitflags::bitflags;
use rustc_hash::FxHashMap;
use wiregen_ir::{is_library_builtin, NodeId, TypeArena, TypeKind, TypeNode};

bitflags! {
    /// Emitter-facing switches set by directives. They never change the
    /// graph's shape.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DeclFlags: u8 {
        /// Encode struct fields positionally instead of as a keyed map.
        const TUPLE = 1 << 0;
        /// Generated encode routines take the value, not a reference.
        const VALUE_RECEIVER = 1 << 1;
    }
}

/// A replacement node bound to a type name by a directive.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Shim {
    /// The name whose references are replaced.
    pub name: String,
    /// Template node; every substitution site receives its own copy.
    pub node: NodeId,
}

/// One declaration as handed to the emitter.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct EmitEntry {
    pub name: String,
    pub node: NodeId,
    pub flags: DeclFlags,
}

/// Resolved type graph for one extraction run.
#[derive(Clone, Debug, Default)]
pub struct SchemaGraph {
    arena: TypeArena,
    identities: FxHashMap<String, NodeId>,
    flags: FxHashMap<String, DeclFlags>,
    shims: Vec<Shim>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an arena that already holds the nodes about to be inserted.
    pub fn with_arena(arena: TypeArena) -> Self {
        SchemaGraph {
            arena,
            ..Self::default()
        }
    }

    #[inline]
    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    #[inline]
    pub fn arena_mut(&mut self) -> &mut TypeArena {
        &mut self.arena
    }

    /// Root handle of the declaration `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.identities.get(name).copied()
    }

    /// Root node of the declaration `name`.
    pub fn node(&self, name: &str) -> Option<&TypeNode> {
        self.get(name).map(|id| self.arena.get(id))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.identities.contains_key(name)
    }

    /// Bind `name` to `root`, returning the previous binding.
    pub fn insert(&mut self, name: impl Into<String>, root: NodeId) -> Option<NodeId> {
        self.identities.insert(name.into(), root)
    }

    /// Drop the declaration `name` and its flags.
    pub fn remove(&mut self, name: &str) -> Option<NodeId> {
        self.flags.remove(name);
        self.identities.remove(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Declaration names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.identities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// `(name, root)` pairs sorted by name, detached from the map so a pass
    /// can mutate the arena while walking them.
    pub fn entries(&self) -> Vec<(String, NodeId)> {
        let mut entries: Vec<(String, NodeId)> = self
            .identities
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Flags set on `name` (empty if none).
    pub fn flags(&self, name: &str) -> DeclFlags {
        self.flags.get(name).copied().unwrap_or_default()
    }

    /// Add `flags` to the declaration `name`.
    pub fn insert_flags(&mut self, name: &str, flags: DeclFlags) {
        self.flags
            .entry(name.to_owned())
            .or_default()
            .insert(flags);
    }

    /// Register a shim for later substitution. Shims apply in registration
    /// order.
    pub fn register_shim(&mut self, name: impl Into<String>, node: NodeId) {
        self.shims.push(Shim {
            name: name.into(),
            node,
        });
    }

    #[inline]
    pub fn shims(&self) -> &[Shim] {
        &self.shims
    }

    /// Re-check every identifier reachable from a declaration against the
    /// current Identities. A name whose declaration was dropped or removed
    /// since translation becomes unresolved. Shim nodes are left as they
    /// are. Returns the number of identifiers that changed.
    pub fn refresh_resolution(&mut self) -> usize {
        let mut changed = 0;
        for (_, root) in self.entries() {
            for id in self.arena.descendants(root) {
                let node = self.arena.get(id);
                if node.shim.is_some() {
                    continue;
                }
                let TypeKind::Identifier { name, resolved } = &node.kind else {
                    continue;
                };
                let now = self.identities.contains_key(name) || is_library_builtin(name);
                if now != *resolved {
                    if let TypeKind::Identifier { resolved, .. } = &mut self.arena.get_mut(id).kind {
                        *resolved = now;
                    }
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Source-like rendering of the declaration `name`.
    pub fn format(&self, name: &str) -> Option<String> {
        self.get(name).map(|id| self.arena.format(id))
    }

    /// Every declaration, sorted by name, with its top-level node's
    /// transient variable name set to `varname`.
    pub fn elems(&mut self, varname: &str) -> Vec<EmitEntry> {
        let entries = self.entries();
        let mut out = Vec::with_capacity(entries.len());
        for (name, node) in entries {
            self.arena.set_varname(node, varname);
            out.push(EmitEntry {
                flags: self.flags(&name),
                name,
                node,
            });
        }
        out
    }
}
