//! Directive replay.
//!
//! A directive is a whitespace-separated string: the first token names a
//! handler, the rest are its arguments. Handlers live in an explicit
//! [`DirectiveTable`] built once per extractor, so tests can run the engine
//! against a table of fakes.
//!
//! Directives run in the order given. A handler error becomes a
//! `DirectiveFailure` warning and only that directive is skipped. Names with
//! no handler are ignored without a word, since unrelated tools share the
//! same comment channel.

mod handlers;

use rustc_hash::FxHashMap;
use wiregen_diagnostic::{directive_failure, Diagnostics};

use crate::SchemaGraph;

/// Why a handler rejected its directive.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum DirectiveError {
    #[error("{directive} expects {expected} arguments, found {found}")]
    ArgumentCount {
        directive: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error("malformed argument {argument:?}: {reason}")]
    MalformedArgument { argument: String, reason: String },

    #[error("no declaration named {0:?}")]
    UnknownTarget(String),

    #[error("{0:?} is not a struct")]
    NotAStruct(String),
}

impl DirectiveError {
    pub(crate) fn malformed(argument: &str, reason: impl Into<String>) -> Self {
        DirectiveError::MalformedArgument {
            argument: argument.to_owned(),
            reason: reason.into(),
        }
    }
}

/// A directive handler: arguments (the tokens after the name) and the graph.
pub type DirectiveHandler =
    Box<dyn Fn(&[&str], &mut SchemaGraph) -> Result<(), DirectiveError> + Send + Sync>;

/// Name → handler dispatch table.
#[derive(Default)]
pub struct DirectiveTable {
    handlers: FxHashMap<String, DirectiveHandler>,
}

impl DirectiveTable {
    /// An empty table. Every directive is ignored until handlers are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard handlers: `shim`, `ignore`, `tuple` and `encode`.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.register("shim", handlers::shim);
        table.register("ignore", handlers::ignore);
        table.register("tuple", handlers::tuple);
        table.register("encode", handlers::encode);
        table
    }

    /// Bind `name` to `handler`, replacing any earlier binding.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&[&str], &mut SchemaGraph) -> Result<(), DirectiveError> + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<&DirectiveHandler> {
        self.handlers.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for DirectiveTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveTable")
            .field("handlers", &self.names())
            .finish()
    }
}

/// Replays directives against a graph through a [`DirectiveTable`].
#[derive(Clone, Copy, Debug)]
pub struct DirectiveEngine<'t> {
    table: &'t DirectiveTable,
}

impl<'t> DirectiveEngine<'t> {
    pub fn new(table: &'t DirectiveTable) -> Self {
        DirectiveEngine { table }
    }

    /// Apply `directives` in order. Returns the number that ran without
    /// error.
    #[tracing::instrument(level = "debug", skip_all, fields(count = directives.len()))]
    pub fn apply<S: AsRef<str>>(
        &self,
        graph: &mut SchemaGraph,
        directives: &[S],
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let mut applied = 0;
        for directive in directives {
            let directive = directive.as_ref();
            let mut tokens = directive.split_whitespace();
            let Some(name) = tokens.next() else {
                continue;
            };
            let Some(handler) = self.table.get(name) else {
                continue;
            };
            let args: Vec<&str> = tokens.collect();
            match handler(&args, graph) {
                Ok(()) => {
                    tracing::debug!(directive, "directive applied");
                    applied += 1;
                }
                Err(err) => diagnostics.push(directive_failure(directive, err)),
            }
        }
        applied
    }
}
