//! Shape translation: one declaration's [`ShapeExpr`] into a type-graph tree.
//!
//! # Accepted shapes
//!
//! | Shape                    | Node                                   |
//! |--------------------------|----------------------------------------|
//! | `map[string]V`           | `Map(V)`                               |
//! | `name`, `pkg.Name`       | `Primitive` for aliases, else `Identifier` |
//! | `[]byte`                 | `Primitive(Bytes)`                     |
//! | `[]T`                    | `Slice(T)`                             |
//! | `[N]T`                   | `Array(N, T)`, `N` kept verbatim       |
//! | `*T`                     | `Ptr(T)`                               |
//! | `struct { ... }`         | `Struct(fields)`, at least one field   |
//! | `interface{}`            | `Primitive(Any)`                       |
//!
//! Everything else (non-string map keys, interfaces with methods, channels,
//! functions, computed array lengths) translates to `None`. Nested failures
//! propagate up to the enclosing field, which is then dropped with a warning.
//!
//! Identifiers are not chased here. An unknown name is reported and kept as
//! an unresolved `Identifier`; inlining decides later what to do with it.

use rustc_hash::FxHashSet;
use wiregen_diagnostic::{extension_mismatch, ignored_field, Diagnostic, Diagnostics};
use wiregen_ir::{
    is_library_builtin, Declaration, Field, FieldDecl, FieldTag, NodeId, Primitive, ShapeExpr,
    TypeArena, TypeKind,
};
use wiregen_stack::ensure_sufficient_stack;

/// Why a struct field was left out.
#[derive(Clone, Debug, Eq, PartialEq)]
enum FieldRejection {
    /// Tagged with the skip marker; dropped silently.
    Skipped,
    /// The field's shape did not translate.
    UnsupportedShape(String),
    /// An embedded field whose shape has no terminal name.
    NoEmbeddedName(String),
    /// `extension` requested on a shape that cannot carry it.
    ExtensionMismatch { field: String, shape: String },
}

/// Translates shapes into nodes allocated in a shared arena.
pub struct ShapeTranslator<'a> {
    arena: &'a mut TypeArena,
    known: &'a FxHashSet<String>,
    diagnostics: &'a mut Diagnostics,
    /// Declaration being translated, for field warnings.
    owner: String,
}

impl<'a> ShapeTranslator<'a> {
    /// `known` is the set of every declaration name in the input.
    pub fn new(
        arena: &'a mut TypeArena,
        known: &'a FxHashSet<String>,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        ShapeTranslator {
            arena,
            known,
            diagnostics,
            owner: String::new(),
        }
    }

    /// Translate a whole declaration. `None` means the shape is unsupported;
    /// the caller decides how to report it.
    pub fn translate_declaration(&mut self, decl: &Declaration) -> Option<NodeId> {
        self.owner.clone_from(&decl.name);
        self.translate(&decl.shape)
    }

    /// Translate one shape expression.
    pub fn translate(&mut self, shape: &ShapeExpr) -> Option<NodeId> {
        ensure_sufficient_stack(|| match shape {
            ShapeExpr::Map { key, value } => {
                if !is_string_key(key) {
                    return None;
                }
                let value = self.translate(value)?;
                Some(self.arena.alloc_kind(TypeKind::Map(value)))
            }

            ShapeExpr::Ident(name) => Some(self.identifier(name, true)),

            // Qualified names usually live in other packages; they are only
            // reported if they are still unresolved at inlining time.
            ShapeExpr::Selector { .. } => Some(self.identifier(&shape.text(), false)),

            ShapeExpr::Array { len: None, elem } if is_byte(elem) => {
                Some(self.arena.alloc_kind(TypeKind::Primitive(Primitive::Bytes)))
            }

            ShapeExpr::Array { len, elem } => {
                let size = match len {
                    Some(len) => Some(len.size_text()?),
                    None => None,
                };
                let elem = self.translate(elem)?;
                let kind = match size {
                    Some(size) => TypeKind::Array { size, elem },
                    None => TypeKind::Slice(elem),
                };
                Some(self.arena.alloc_kind(kind))
            }

            ShapeExpr::Pointer(target) => {
                let target = self.translate(target)?;
                Some(self.arena.alloc_kind(TypeKind::Ptr(target)))
            }

            ShapeExpr::Struct(decls) => {
                let fields = self.fields(decls);
                if fields.is_empty() {
                    return None;
                }
                Some(self.arena.alloc_kind(TypeKind::Struct(fields)))
            }

            ShapeExpr::Interface { methods } if methods.is_empty() => {
                Some(self.arena.alloc_kind(TypeKind::Primitive(Primitive::Any)))
            }

            ShapeExpr::Interface { .. } | ShapeExpr::Other(_) => None,
        })
    }

    /// Report a diagnostic against the shared collector.
    pub fn report(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    /// A primitive for recognised aliases, otherwise an identifier node.
    fn identifier(&mut self, name: &str, report_unknown: bool) -> NodeId {
        if let Some(prim) = Primitive::from_alias(name) {
            return self.arena.alloc_kind(TypeKind::Primitive(prim));
        }
        let resolved = self.known.contains(name) || is_library_builtin(name);
        if !resolved && report_unknown {
            self.diagnostics.unresolved_identifier(name);
        }
        self.arena.alloc_kind(TypeKind::Identifier {
            name: name.to_owned(),
            resolved,
        })
    }

    /// Translate a field list, dropping (and reporting) fields that fail.
    fn fields(&mut self, decls: &[FieldDecl]) -> Vec<Field> {
        let mut out = Vec::with_capacity(decls.len());
        for (index, decl) in decls.iter().enumerate() {
            match self.field(decl) {
                Ok(fields) => out.extend(fields),
                Err(FieldRejection::Skipped) => {}
                Err(FieldRejection::UnsupportedShape(shape)) => self.diagnostics.push(
                    ignored_field(&self.owner, index, format!("unsupported shape `{shape}`")),
                ),
                Err(FieldRejection::NoEmbeddedName(shape)) => {
                    self.diagnostics.push(ignored_field(
                        &self.owner,
                        index,
                        format!("`{shape}` cannot be embedded"),
                    ));
                }
                Err(FieldRejection::ExtensionMismatch { field, shape }) => {
                    self.diagnostics.push(extension_mismatch(&field, &shape));
                }
            }
        }
        out
    }

    /// Translate one field line into one or more fields.
    fn field(&mut self, decl: &FieldDecl) -> Result<Vec<Field>, FieldRejection> {
        let tag = decl.tag.as_deref().map(FieldTag::parse).unwrap_or_default();
        if tag.skip {
            return Err(FieldRejection::Skipped);
        }

        let child = self
            .translate(&decl.shape)
            .ok_or_else(|| FieldRejection::UnsupportedShape(decl.shape.text()))?;

        let fields = match decl.names.as_slice() {
            [] => {
                let name = decl
                    .shape
                    .embedded_name()
                    .ok_or_else(|| FieldRejection::NoEmbeddedName(decl.shape.text()))?
                    .to_owned();
                vec![Field {
                    wire_tag: tag.name.clone().unwrap_or_else(|| name.clone()),
                    name,
                    child,
                }]
            }
            [name] => vec![Field {
                wire_tag: tag.name.clone().unwrap_or_else(|| name.clone()),
                name: name.clone(),
                child,
            }],
            // A shared tag name would give every field the same wire key, so
            // grouped fields always go by their own names.
            names => {
                let mut fields = Vec::with_capacity(names.len());
                for (i, name) in names.iter().enumerate() {
                    let child = if i == 0 {
                        child
                    } else {
                        self.arena.deep_copy(child)
                    };
                    fields.push(Field {
                        wire_tag: name.clone(),
                        name: name.clone(),
                        child,
                    });
                }
                fields
            }
        };

        if tag.extension {
            for field in &fields {
                if !self.reclassify_extension(field.child) {
                    return Err(FieldRejection::ExtensionMismatch {
                        field: field.name.clone(),
                        shape: decl.shape.text(),
                    });
                }
            }
        }
        Ok(fields)
    }

    /// Turn a base node, bare or behind exactly one pointer, into an
    /// extension primitive. Identifiers keep their name as the node's type
    /// name so the emitter knows which extension type to use.
    fn reclassify_extension(&mut self, id: NodeId) -> bool {
        let target = match self.arena.kind(id) {
            TypeKind::Ptr(inner) => *inner,
            _ => id,
        };
        let node = self.arena.get_mut(target);
        match &node.kind {
            TypeKind::Primitive(_) => {}
            TypeKind::Identifier { name, .. } => node.type_name = Some(name.clone()),
            _ => return false,
        }
        node.kind = TypeKind::Primitive(Primitive::Extension);
        true
    }
}

fn is_string_key(key: &ShapeExpr) -> bool {
    matches!(key, ShapeExpr::Ident(name) if name == "string")
}

fn is_byte(elem: &ShapeExpr) -> bool {
    matches!(elem, ShapeExpr::Ident(name) if name == "byte")
}
