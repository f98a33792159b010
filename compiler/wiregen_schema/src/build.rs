//! Graph building: every declaration through the shape translator.

use rustc_hash::FxHashSet;
use wiregen_diagnostic::{unsupported_declaration, Diagnostics};
use wiregen_ir::{Declaration, TypeArena};

use crate::{SchemaError, SchemaGraph, ShapeTranslator};

/// Translate `decls` into a fresh [`SchemaGraph`].
///
/// Declarations whose shape is unsupported are reported and left out. The
/// only fatal case is an empty input. A later declaration with the same name
/// as an earlier one replaces it.
#[tracing::instrument(level = "debug", skip_all, fields(count = decls.len()))]
pub fn build_graph(
    decls: &[Declaration],
    diagnostics: &mut Diagnostics,
) -> Result<SchemaGraph, SchemaError> {
    if decls.is_empty() {
        return Err(SchemaError::NoDeclarations);
    }

    // Every input name counts as known here, including ones about to be
    // rejected. Inlining re-checks resolution against the final graph.
    let known: FxHashSet<String> = decls.iter().map(|d| d.name.clone()).collect();

    let mut arena = TypeArena::new();
    let mut roots = Vec::with_capacity(decls.len());
    {
        let mut translator = ShapeTranslator::new(&mut arena, &known, diagnostics);
        for decl in decls {
            match translator.translate_declaration(decl) {
                Some(root) => roots.push((decl.name.as_str(), root)),
                None => translator.report(unsupported_declaration(&decl.name, &decl.shape.text())),
            }
        }
    }

    let mut graph = SchemaGraph::with_arena(arena);
    for (name, root) in roots {
        graph.arena_mut().get_mut(root).type_name = Some(name.to_owned());
        if graph.insert(name, root).is_some() {
            tracing::debug!(name, "duplicate declaration replaced");
        }
    }
    tracing::debug!(
        declarations = graph.len(),
        nodes = graph.arena().len(),
        "graph built"
    );
    Ok(graph)
}
