//! Primitive wire kinds and the host-language aliases that name them.

use std::fmt;

/// A primitive kind the emitter knows how to encode without a helper routine.
///
/// `Byte` is kept apart from `Uint8` so that an unsized sequence of bytes can
/// be recognised and collapsed into [`Primitive::Bytes`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Primitive {
    Bool,
    String,
    Byte,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    Complex64,
    Complex128,
    /// Variable-length byte sequence.
    Bytes,
    /// Timestamp (`time.Time`).
    Time,
    /// Opaque tagged binary payload.
    Extension,
    /// Dynamically typed value (an interface with no methods).
    Any,
}

/// Library types that are not primitives but never need a local declaration.
const LIBRARY_BUILTINS: &[&str] = &["msgp.Raw", "msgp.Number"];

impl Primitive {
    /// Look up the primitive named by a host-language alias.
    ///
    /// Qualified names are matched on their full dotted text, so
    /// `time.Time` resolves while a bare `Time` does not.
    pub fn from_alias(name: &str) -> Option<Self> {
        let prim = match name {
            "bool" => Primitive::Bool,
            "string" => Primitive::String,
            "byte" => Primitive::Byte,
            "int" => Primitive::Int,
            "int8" => Primitive::Int8,
            "int16" => Primitive::Int16,
            "int32" => Primitive::Int32,
            "int64" => Primitive::Int64,
            "uint" => Primitive::Uint,
            "uint8" => Primitive::Uint8,
            "uint16" => Primitive::Uint16,
            "uint32" => Primitive::Uint32,
            "uint64" => Primitive::Uint64,
            "float32" => Primitive::Float32,
            "float64" => Primitive::Float64,
            "complex64" => Primitive::Complex64,
            "complex128" => Primitive::Complex128,
            "[]byte" => Primitive::Bytes,
            "time.Time" => Primitive::Time,
            "msgp.Extension" => Primitive::Extension,
            "interface{}" => Primitive::Any,
            _ => return None,
        };
        Some(prim)
    }

    /// The host-language spelling of this primitive.
    pub const fn alias(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::String => "string",
            Primitive::Byte => "byte",
            Primitive::Int => "int",
            Primitive::Int8 => "int8",
            Primitive::Int16 => "int16",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Uint => "uint",
            Primitive::Uint8 => "uint8",
            Primitive::Uint16 => "uint16",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::Complex64 => "complex64",
            Primitive::Complex128 => "complex128",
            Primitive::Bytes => "[]byte",
            Primitive::Time => "time.Time",
            Primitive::Extension => "msgp.Extension",
            Primitive::Any => "interface{}",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}

/// Whether `name` is a library type that counts as resolved without a
/// local declaration.
pub fn is_library_builtin(name: &str) -> bool {
    LIBRARY_BUILTINS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aliases_round_trip_through_names() {
        for prim in [
            Primitive::Bool,
            Primitive::Byte,
            Primitive::Int32,
            Primitive::Uint64,
            Primitive::Float32,
            Primitive::Bytes,
            Primitive::Time,
            Primitive::Extension,
            Primitive::Any,
        ] {
            assert_eq!(Primitive::from_alias(prim.alias()), Some(prim));
        }
    }

    #[test]
    fn unknown_and_unqualified_names_are_not_primitives() {
        assert_eq!(Primitive::from_alias("Point"), None);
        assert_eq!(Primitive::from_alias("Time"), None);
        assert_eq!(Primitive::from_alias("msgp.Raw"), None);
    }

    #[test]
    fn library_builtins() {
        assert!(is_library_builtin("msgp.Raw"));
        assert!(is_library_builtin("msgp.Number"));
        assert!(!is_library_builtin("msgp.Extension"));
    }
}
