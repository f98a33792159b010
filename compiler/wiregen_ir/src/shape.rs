//! Declaration shapes as handed over by the source reader.
//!
//! A `ShapeExpr` mirrors the host language's type-expression syntax closely
//! enough that the reader can build it straight from its own AST. It is not
//! resolved in any way: identifiers are plain text, array lengths are kept
//! as written, and shapes the engine cannot encode are still representable
//! (as [`ShapeExpr::Other`] or an interface with methods) so the translator
//! can reject them with a warning instead of the reader dropping them.

/// A declared type name paired with its unparsed shape.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Declaration {
    pub name: String,
    pub shape: ShapeExpr,
}

impl Declaration {
    pub fn new(name: impl Into<String>, shape: ShapeExpr) -> Self {
        Declaration {
            name: name.into(),
            shape,
        }
    }
}

/// A host-language type expression.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ShapeExpr {
    /// A bare name: `int32`, `Point`.
    Ident(String),

    /// A package-qualified name: `time.Time`, `io.Writer`.
    Selector {
        package: String,
        name: String,
    },

    /// An indirection: `*T`.
    Pointer(Box<ShapeExpr>),

    /// A sequence: `[]T` when `len` is `None`, `[N]T` otherwise.
    Array {
        len: Option<LenExpr>,
        elem: Box<ShapeExpr>,
    },

    /// `map[K]V`.
    Map {
        key: Box<ShapeExpr>,
        value: Box<ShapeExpr>,
    },

    /// An aggregate with named (or embedded) fields, in source order.
    Struct(Vec<FieldDecl>),

    /// A dynamic-any shape; `methods` lists its required capabilities.
    Interface { methods: Vec<String> },

    /// Any other shape kind (channels, functions, ...), described for
    /// diagnostics only.
    Other(String),
}

/// The length part of a fixed-size array shape.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum LenExpr {
    /// A literal such as `16` or `0x10`.
    Literal(String),
    /// A named constant: `Size`.
    Named(String),
    /// A qualified constant: `pkg.Size`.
    Qualified { package: String, name: String },
    /// Any other expression (`N * 2`, `len(x)`), kept for diagnostics.
    Other(String),
}

/// One field line of a struct shape.
///
/// `names` is empty for an embedded field and holds several names for a
/// grouped declaration (`X, Y int32`). `tag` is the body of the field's
/// serialization tag (`name,extension` or `-`), if it has one.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub shape: ShapeExpr,
    pub tag: Option<String>,
}

impl ShapeExpr {
    #[inline]
    pub fn ident(name: impl Into<String>) -> Self {
        ShapeExpr::Ident(name.into())
    }

    #[inline]
    pub fn selector(package: impl Into<String>, name: impl Into<String>) -> Self {
        ShapeExpr::Selector {
            package: package.into(),
            name: name.into(),
        }
    }

    #[inline]
    pub fn pointer(target: ShapeExpr) -> Self {
        ShapeExpr::Pointer(Box::new(target))
    }

    /// `[]elem`
    #[inline]
    pub fn slice(elem: ShapeExpr) -> Self {
        ShapeExpr::Array {
            len: None,
            elem: Box::new(elem),
        }
    }

    /// `[len]elem`
    #[inline]
    pub fn array(len: LenExpr, elem: ShapeExpr) -> Self {
        ShapeExpr::Array {
            len: Some(len),
            elem: Box::new(elem),
        }
    }

    #[inline]
    pub fn map(key: ShapeExpr, value: ShapeExpr) -> Self {
        ShapeExpr::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    #[inline]
    pub fn structure(fields: Vec<FieldDecl>) -> Self {
        ShapeExpr::Struct(fields)
    }

    /// `interface{}`
    #[inline]
    pub fn any() -> Self {
        ShapeExpr::Interface {
            methods: Vec::new(),
        }
    }

    /// The terminal name an embedded field of this shape is known by.
    ///
    /// `T` and `*T` give `T`; `pkg.T` gives `T`. Other shapes cannot be
    /// embedded and give `None`.
    pub fn embedded_name(&self) -> Option<&str> {
        match self {
            ShapeExpr::Ident(name) | ShapeExpr::Selector { name, .. } => Some(name),
            ShapeExpr::Pointer(target) => target.embedded_name(),
            _ => None,
        }
    }

    /// Source-like text for this shape, used in diagnostics and to look up
    /// qualified primitive aliases.
    pub fn text(&self) -> String {
        match self {
            ShapeExpr::Ident(name) => name.clone(),
            ShapeExpr::Selector { package, name } => format!("{package}.{name}"),
            ShapeExpr::Pointer(target) => format!("*{}", target.text()),
            ShapeExpr::Array { len: None, elem } => format!("[]{}", elem.text()),
            ShapeExpr::Array {
                len: Some(len),
                elem,
            } => format!("[{}]{}", len.text(), elem.text()),
            ShapeExpr::Map { key, value } => format!("map[{}]{}", key.text(), value.text()),
            ShapeExpr::Struct(fields) => format!("struct{{ {} fields }}", fields.len()),
            ShapeExpr::Interface { methods } if methods.is_empty() => "interface{}".to_owned(),
            ShapeExpr::Interface { methods } => format!("interface{{ {} }}", methods.join("; ")),
            ShapeExpr::Other(desc) => desc.clone(),
        }
    }
}

impl LenExpr {
    #[inline]
    pub fn literal(text: impl Into<String>) -> Self {
        LenExpr::Literal(text.into())
    }

    #[inline]
    pub fn named(name: impl Into<String>) -> Self {
        LenExpr::Named(name.into())
    }

    /// The size text to reproduce verbatim, or `None` for expression forms
    /// that are not a literal or a (qualified) constant.
    pub fn size_text(&self) -> Option<String> {
        match self {
            LenExpr::Literal(text) | LenExpr::Named(text) => Some(text.clone()),
            LenExpr::Qualified { package, name } => Some(format!("{package}.{name}")),
            LenExpr::Other(_) => None,
        }
    }

    fn text(&self) -> String {
        match self {
            LenExpr::Other(text) => text.clone(),
            other => other.size_text().unwrap_or_default(),
        }
    }
}

impl FieldDecl {
    /// A field with a single name.
    pub fn named(name: impl Into<String>, shape: ShapeExpr) -> Self {
        FieldDecl {
            names: vec![name.into()],
            shape,
            tag: None,
        }
    }

    /// Several names sharing one shape: `X, Y int32`.
    pub fn group<I, S>(names: I, shape: ShapeExpr) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldDecl {
            names: names.into_iter().map(Into::into).collect(),
            shape,
            tag: None,
        }
    }

    /// An embedded (anonymous) field.
    pub fn embedded(shape: ShapeExpr) -> Self {
        FieldDecl {
            names: Vec::new(),
            shape,
            tag: None,
        }
    }

    /// Attach a serialization tag body.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}
