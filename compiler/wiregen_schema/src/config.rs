//! Tunables for an extraction run.

/// Inlining threshold: identifiers referring to declarations with a
/// complexity below this are replaced by a copy of the declaration.
pub const DEFAULT_MAX_COMPLEXITY: usize = 5;

/// Transient variable name given to every top-level node in the output.
pub const DEFAULT_TOP_LEVEL_VARNAME: &str = "z";

/// Configuration for [`SchemaExtractor`](crate::SchemaExtractor).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SchemaConfig {
    /// Complexity bound for inlining (exclusive).
    pub max_complexity: usize,
    /// Run complexity-bounded inlining. Shim substitution runs regardless.
    pub inline: bool,
    /// Variable name assigned to top-level nodes by
    /// [`SchemaGraph::elems`](crate::SchemaGraph::elems).
    pub top_level_varname: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        SchemaConfig {
            max_complexity: DEFAULT_MAX_COMPLEXITY,
            inline: true,
            top_level_varname: DEFAULT_TOP_LEVEL_VARNAME.to_owned(),
        }
    }
}

impl SchemaConfig {
    /// A config that leaves every identifier in place (shims still apply).
    pub fn no_inlining() -> Self {
        SchemaConfig {
            inline: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_complexity(mut self, max_complexity: usize) -> Self {
        self.max_complexity = max_complexity;
        self
    }
}
