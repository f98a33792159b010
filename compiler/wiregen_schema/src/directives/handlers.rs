//! Built-in directive handlers.
//!
//! ```text
//! shim <Type> as:<Base> using:<toBase>/<fromBase>
//! ignore <Type>...
//! tuple <Type>...
//! encode value [<Type>...]
//! ```

use wiregen_ir::{is_library_builtin, Primitive, ShimConversion, TypeKind, TypeNode};

use super::DirectiveError;
use crate::{DeclFlags, SchemaGraph};

/// Register a shim: every reference to `<Type>` is later replaced by a
/// `<Base>` node converted through the two named functions. A leading `*`
/// on `<Type>` means the conversions take the value by reference.
pub(super) fn shim(args: &[&str], graph: &mut SchemaGraph) -> Result<(), DirectiveError> {
    let [target, base, using] = args else {
        return Err(DirectiveError::ArgumentCount {
            directive: "shim",
            expected: "3",
            found: args.len(),
        });
    };

    let (name, needs_ref) = match target.strip_prefix('*') {
        Some(name) => (name, true),
        None => (*target, false),
    };
    if name.is_empty() {
        return Err(DirectiveError::malformed(target, "missing type name"));
    }

    let base_name = base
        .strip_prefix("as:")
        .filter(|b| !b.is_empty())
        .ok_or_else(|| DirectiveError::malformed(base, "expected `as:<Base>`"))?;

    let conversions = using
        .strip_prefix("using:")
        .ok_or_else(|| DirectiveError::malformed(using, "expected `using:<to>/<from>`"))?;
    let (to_base, from_base) = match conversions.split('/').collect::<Vec<_>>().as_slice() {
        [to, from] if !to.is_empty() && !from.is_empty() => ((*to).to_owned(), (*from).to_owned()),
        _ => {
            return Err(DirectiveError::malformed(
                using,
                "expected exactly two conversion functions",
            ))
        }
    };

    let kind = match Primitive::from_alias(base_name) {
        Some(prim) => TypeKind::Primitive(prim),
        None => TypeKind::Identifier {
            name: base_name.to_owned(),
            resolved: graph.contains(base_name) || is_library_builtin(base_name),
        },
    };
    let node = graph.arena_mut().alloc(TypeNode {
        type_name: Some(name.to_owned()),
        shim: Some(ShimConversion {
            to_base,
            from_base,
            needs_ref,
        }),
        ..TypeNode::new(kind)
    });
    tracing::debug!(name, base = base_name, "registered shim");
    graph.register_shim(name, node);
    Ok(())
}

/// Drop each named declaration from the output.
pub(super) fn ignore(args: &[&str], graph: &mut SchemaGraph) -> Result<(), DirectiveError> {
    require_targets("ignore", args)?;
    for_each_target(args, |name| {
        if graph.remove(name).is_none() {
            return Err(DirectiveError::UnknownTarget(name.to_owned()));
        }
        tracing::debug!(name, "ignoring declaration");
        Ok(())
    })
}

/// Encode each named struct positionally.
pub(super) fn tuple(args: &[&str], graph: &mut SchemaGraph) -> Result<(), DirectiveError> {
    require_targets("tuple", args)?;
    for_each_target(args, |name| {
        let node = graph
            .node(name)
            .ok_or_else(|| DirectiveError::UnknownTarget(name.to_owned()))?;
        if !node.kind.is_struct() {
            return Err(DirectiveError::NotAStruct(name.to_owned()));
        }
        graph.insert_flags(name, DeclFlags::TUPLE);
        Ok(())
    })
}

/// `encode value` switches generated encoders to value receivers, for the
/// named declarations or for all of them when none are named.
pub(super) fn encode(args: &[&str], graph: &mut SchemaGraph) -> Result<(), DirectiveError> {
    let Some((mode, targets)) = args.split_first() else {
        return Err(DirectiveError::ArgumentCount {
            directive: "encode",
            expected: "at least 1",
            found: 0,
        });
    };
    if *mode != "value" {
        return Err(DirectiveError::malformed(mode, "unknown encode mode"));
    }

    if targets.is_empty() {
        let names: Vec<String> = graph.names().into_iter().map(str::to_owned).collect();
        for name in &names {
            graph.insert_flags(name, DeclFlags::VALUE_RECEIVER);
        }
        return Ok(());
    }
    for_each_target(targets, |name| {
        if !graph.contains(name) {
            return Err(DirectiveError::UnknownTarget(name.to_owned()));
        }
        graph.insert_flags(name, DeclFlags::VALUE_RECEIVER);
        Ok(())
    })
}

fn require_targets(directive: &'static str, args: &[&str]) -> Result<(), DirectiveError> {
    if args.is_empty() {
        return Err(DirectiveError::ArgumentCount {
            directive,
            expected: "at least 1",
            found: 0,
        });
    }
    Ok(())
}

/// Run `f` on every target; a failing target does not stop the others.
/// The first failure is returned.
fn for_each_target(
    targets: &[&str],
    mut f: impl FnMut(&str) -> Result<(), DirectiveError>,
) -> Result<(), DirectiveError> {
    let mut first_err = None;
    for &target in targets {
        if let Err(err) = f(target) {
            first_err.get_or_insert(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}
