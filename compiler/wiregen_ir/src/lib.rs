//! wiregen IR - declaration shapes and the type graph
//!
//! This crate holds the data both ends of the schema engine agree on:
//! - Input: [`Declaration`]s whose [`ShapeExpr`] mirrors the host
//!   language's type syntax, plus [`FieldTag`] parsing for field tags
//! - Output: [`TypeNode`]s stored in a [`TypeArena`] and addressed by
//!   [`NodeId`] handles
//!
//! # Design
//!
//! - **Closed variants**: [`TypeKind`] is exhaustive; unknown host shapes are
//!   rejected at translation time rather than carried through
//! - **Handles, not boxes**: substitution rewrites a slot in place, and deep
//!   copies allocate fresh slots, so two call sites never alias one subtree

mod arena;
mod format;
mod node;
mod node_id;
mod primitive;
mod shape;
mod tag;

pub use arena::TypeArena;
pub use node::{Field, ShimConversion, TypeKind, TypeNode};
pub use node_id::NodeId;
pub use primitive::{is_library_builtin, Primitive};
pub use shape::{Declaration, FieldDecl, LenExpr, ShapeExpr};
pub use tag::{FieldTag, EXTENSION_OPTION, SKIP_MARKER};
