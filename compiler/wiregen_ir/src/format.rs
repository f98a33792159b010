//! Compact, source-like rendering of type-graph subtrees.
//!
//! Used in log lines and test assertions; not an emitter format.
//!
//! ```text
//! struct{X int32, Y int32}
//! map[string]*[4]Point
//! ```

use std::fmt::Write;

use wiregen_stack::ensure_sufficient_stack;

use crate::{NodeId, TypeArena, TypeKind};

impl TypeArena {
    /// Render the subtree rooted at `id`.
    ///
    /// Struct fields whose wire tag differs from their name are shown as
    /// `Name:tag`. Shim nodes are prefixed with the shimmed type name.
    pub fn format(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId) {
        ensure_sufficient_stack(|| {
            let node = self.get(id);
            if node.shim.is_some() {
                if let Some(name) = &node.type_name {
                    let _ = write!(out, "{name} as ");
                }
            }
            match &node.kind {
                TypeKind::Primitive(prim) => out.push_str(prim.alias()),
                TypeKind::Identifier { name, .. } => out.push_str(name),
                TypeKind::Struct(fields) => {
                    out.push_str("struct{");
                    for (i, field) in fields.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&field.name);
                        if field.wire_tag != field.name {
                            let _ = write!(out, ":{}", field.wire_tag);
                        }
                        out.push(' ');
                        self.write_node(out, field.child);
                    }
                    out.push('}');
                }
                TypeKind::Array { size, elem } => {
                    let _ = write!(out, "[{size}]");
                    self.write_node(out, *elem);
                }
                TypeKind::Slice(elem) => {
                    out.push_str("[]");
                    self.write_node(out, *elem);
                }
                TypeKind::Map(value) => {
                    out.push_str("map[string]");
                    self.write_node(out, *value);
                }
                TypeKind::Ptr(target) => {
                    out.push('*');
                    self.write_node(out, *target);
                }
            }
        });
    }
}
