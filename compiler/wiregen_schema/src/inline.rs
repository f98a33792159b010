//! Shim substitution and complexity-bounded inlining.
//!
//! Both passes walk every node reachable from every declaration and rewrite
//! identifier slots in place with [`TypeArena::overwrite_with_copy`], so each
//! site owns an independent copy and keeps its transient variable name.
//!
//! # Shims
//!
//! Every node known by a shimmed name is replaced by a copy of the shim
//! node, and so is the declaration entry of that name if there is one.
//! Complexity plays no part. Shims apply in registration order.
//!
//! # Inlining
//!
//! An identifier is replaced by a copy of the declaration it names when that
//! declaration's complexity is below [`SchemaConfig::max_complexity`]. The
//! copy is then walked again, so chains `A → B → C` collapse fully.
//!
//! A reference is never inlined into a subtree of the declaration it names.
//! Every declaration root and every inlined copy carries its declaration
//! name, and the walk keeps the names of all enclosing nodes in scope; an
//! identifier naming any of them stays. This keeps `A { next *A }` intact and
//! bounds every chase by the number of declarations. The scope is read back
//! from the tree itself, so a second run changes nothing.
//!
//! An alias declaration (`type Celsius Temp`) copies in as another
//! identifier, which is chased again at the same slot. References into a
//! cycle of aliases are left alone.
//!
//! Shim nodes are final and never replaced by inlining.
//!
//! Resolution is re-checked against the graph before the walk, so a
//! reference to a declaration that was dropped or removed by a directive is
//! reported as unresolved.

use wiregen_diagnostic::Diagnostics;
use wiregen_ir::{NodeId, TypeArena, TypeKind};
use wiregen_stack::ensure_sufficient_stack;

use crate::{SchemaConfig, SchemaError, SchemaGraph, Shim};

/// Counts reported by [`InlineOptimizer::run`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct InlineStats {
    /// Sites replaced by a shim copy, top-level entries included.
    pub shimmed: usize,
    /// Identifier sites replaced by a declaration copy.
    pub inlined: usize,
}

/// Runs shim substitution, then (if enabled) inlining.
#[derive(Copy, Clone, Debug)]
pub struct InlineOptimizer {
    max_complexity: usize,
    inline: bool,
}

impl InlineOptimizer {
    pub fn new(config: &SchemaConfig) -> Self {
        InlineOptimizer {
            max_complexity: config.max_complexity,
            inline: config.inline,
        }
    }

    /// Both passes over `graph`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InlineCycle`] if a reference site shares its handle
    /// with the declaration it names.
    #[tracing::instrument(level = "debug", skip_all, fields(declarations = graph.len()))]
    pub fn run(
        &self,
        graph: &mut SchemaGraph,
        diagnostics: &mut Diagnostics,
    ) -> Result<InlineStats, SchemaError> {
        let shimmed = substitute_shims(graph);
        let inlined = if self.inline {
            self.inline(graph, diagnostics)?
        } else {
            0
        };
        tracing::debug!(shimmed, inlined, "optimizer finished");
        Ok(InlineStats { shimmed, inlined })
    }

    /// Complexity-bounded inlining alone. Returns the number of sites
    /// replaced.
    pub fn inline(
        &self,
        graph: &mut SchemaGraph,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize, SchemaError> {
        let stale = graph.refresh_resolution();
        if stale > 0 {
            tracing::debug!(stale, "identifiers lost their declaration");
        }
        let mut inliner = Inliner {
            graph,
            diagnostics,
            max_complexity: self.max_complexity,
            scope: Vec::new(),
            inlined: 0,
        };
        for (name, root) in inliner.graph.entries() {
            // The root itself is never replaced, only what it contains.
            let children = inliner.graph.arena().kind(root).children();
            inliner.scope.clear();
            inliner.scope.push(name);
            for child in children {
                inliner.visit(child)?;
            }
        }
        Ok(inliner.inlined)
    }
}

/// Apply every registered shim. Returns the number of slots replaced.
pub fn substitute_shims(graph: &mut SchemaGraph) -> usize {
    let shims = graph.shims().to_vec();
    let roots: Vec<NodeId> = graph.entries().into_iter().map(|(_, root)| root).collect();
    let mut replaced = 0;
    for shim in &shims {
        tracing::debug!(name = %shim.name, "substituting shim");
        for &root in &roots {
            let children = graph.arena().kind(root).children();
            for child in children {
                replaced += substitute(graph.arena_mut(), child, shim);
            }
        }
        if let Some(root) = graph.get(&shim.name) {
            graph.arena_mut().overwrite_with_copy(root, shim.node);
            replaced += 1;
        }
    }
    replaced
}

fn substitute(arena: &mut TypeArena, id: NodeId, shim: &Shim) -> usize {
    ensure_sufficient_stack(|| {
        if arena.get(id).type_name() == Some(shim.name.as_str()) {
            arena.overwrite_with_copy(id, shim.node);
            return 1;
        }
        let children = arena.kind(id).children();
        children
            .into_iter()
            .map(|child| substitute(arena, child, shim))
            .sum()
    })
}

/// State of one inlining walk.
struct Inliner<'a> {
    graph: &'a mut SchemaGraph,
    diagnostics: &'a mut Diagnostics,
    max_complexity: usize,
    /// Declaration names of the enclosing nodes.
    scope: Vec<String>,
    inlined: usize,
}

impl Inliner<'_> {
    fn visit(&mut self, id: NodeId) -> Result<(), SchemaError> {
        ensure_sufficient_stack(|| {
            let node = self.graph.arena().get(id);
            if node.shim.is_some() {
                return Ok(());
            }
            if matches!(node.kind, TypeKind::Identifier { .. }) {
                return self.identifier(id);
            }
            let entered = node.type_name.clone();
            let children = node.kind.children();

            if let Some(name) = &entered {
                self.scope.push(name.clone());
            }
            let result = children.into_iter().try_for_each(|child| self.visit(child));
            if entered.is_some() {
                self.scope.pop();
            }
            result
        })
    }

    /// Inline the identifier at `id`, following alias declarations until
    /// the slot holds something other than an inlinable identifier.
    fn identifier(&mut self, id: NodeId) -> Result<(), SchemaError> {
        loop {
            let node = self.graph.arena().get(id);
            if node.shim.is_some() {
                return Ok(());
            }
            let TypeKind::Identifier { name, resolved } = &node.kind else {
                return self.visit(id);
            };
            let name = name.clone();
            let resolved = *resolved;
            if node.type_name.as_deref() == Some(name.as_str()) || self.scope.contains(&name) {
                return Ok(());
            }

            let Some(target) = self.graph.get(&name) else {
                if !resolved {
                    self.diagnostics.unresolved_identifier(&name);
                }
                return Ok(());
            };
            if self.graph.arena().complexity(target) >= self.max_complexity {
                return Ok(());
            }
            if target == id {
                return Err(SchemaError::InlineCycle { name });
            }
            if self.alias_cycle(&name) {
                return Ok(());
            }

            tracing::debug!(name = %name, "inlining");
            self.graph.arena_mut().overwrite_with_copy(id, target);
            self.inlined += 1;
        }
    }

    /// Whether following alias declarations from `name` comes back to a
    /// name already passed.
    fn alias_cycle(&self, name: &str) -> bool {
        let mut seen: Vec<&str> = Vec::new();
        let mut next = name;
        loop {
            if seen.contains(&next) {
                return true;
            }
            seen.push(next);
            let Some(root) = self.graph.get(next) else {
                return false;
            };
            let node = self.graph.arena().get(root);
            match &node.kind {
                TypeKind::Identifier { name, .. } if node.shim.is_none() => next = name,
                _ => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests;
