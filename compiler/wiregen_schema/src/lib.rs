//! Schema extraction and type-graph simplification.
//!
//! Takes the declarations and raw directive strings read from a source
//! package and produces the resolved, simplified type graph that the code
//! emitter prints routines from.
//!
//! # Pipeline
//!
//! ```text
//! declarations ──► build_graph ──► DirectiveEngine ──► InlineOptimizer ──► SchemaGraph
//!                  (translate)      (shim/ignore/       (shims, then
//!                                    tuple/encode)       inlining)
//! ```
//!
//! Stages run strictly in sequence over one [`SchemaGraph`]. Recoverable
//! problems are collected as warnings in [`Diagnostics`]; the two fatal
//! conditions are [`SchemaError`] values.
//!
//! # Example
//!
//! ```text
//! let decls = vec![
//!     Declaration::new("Point", point_shape),
//!     Declaration::new("Line", line_shape),
//! ];
//! let out = SchemaExtractor::default().extract(&decls, &["tuple Point"])?;
//! for warning in out.diagnostics.iter() { /* report */ }
//! emit(out.graph);
//! ```

mod build;
mod config;
mod directives;
mod error;
mod graph;
mod inline;
mod translate;

use std::sync::Once;

use wiregen_diagnostic::Diagnostics;
use wiregen_ir::Declaration;

pub use build::build_graph;
pub use config::{SchemaConfig, DEFAULT_MAX_COMPLEXITY, DEFAULT_TOP_LEVEL_VARNAME};
pub use directives::{DirectiveEngine, DirectiveError, DirectiveHandler, DirectiveTable};
pub use error::SchemaError;
pub use graph::{DeclFlags, EmitEntry, SchemaGraph, Shim};
pub use inline::{substitute_shims, InlineOptimizer, InlineStats};
pub use translate::ShapeTranslator;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
/// `RUST_LOG=wiregen_schema=debug` shows each stage, every inlined name and
/// every shim substitution.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A host may already have installed its own subscriber.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

/// Runs the whole pipeline with one configuration and directive table.
#[derive(Debug)]
pub struct SchemaExtractor {
    config: SchemaConfig,
    directives: DirectiveTable,
}

impl Default for SchemaExtractor {
    fn default() -> Self {
        Self::new(SchemaConfig::default())
    }
}

impl SchemaExtractor {
    /// An extractor with the built-in directive handlers.
    pub fn new(config: SchemaConfig) -> Self {
        SchemaExtractor {
            config,
            directives: DirectiveTable::builtin(),
        }
    }

    /// Replace the directive table.
    #[must_use]
    pub fn with_directives(mut self, directives: DirectiveTable) -> Self {
        self.directives = directives;
        self
    }

    /// Build the graph from `decls`, apply `directives` in order, then run
    /// shim substitution and inlining.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NoDeclarations`] for empty input and
    /// [`SchemaError::InlineCycle`] if inlining meets a shared handle.
    #[tracing::instrument(level = "debug", skip_all, fields(
        declarations = decls.len(),
        directives = directives.len(),
    ))]
    pub fn extract<S: AsRef<str>>(
        &self,
        decls: &[Declaration],
        directives: &[S],
    ) -> Result<Extraction, SchemaError> {
        let mut diagnostics = Diagnostics::new();
        let mut graph = build_graph(decls, &mut diagnostics)?;
        DirectiveEngine::new(&self.directives).apply(&mut graph, directives, &mut diagnostics);
        let stats = InlineOptimizer::new(&self.config).run(&mut graph, &mut diagnostics)?;
        tracing::debug!(
            declarations = graph.len(),
            warnings = diagnostics.warning_count(),
            "extraction finished"
        );
        Ok(Extraction {
            graph,
            diagnostics,
            stats,
            top_level_varname: self.config.top_level_varname.clone(),
        })
    }
}

/// Result of [`SchemaExtractor::extract`].
#[derive(Debug)]
pub struct Extraction {
    pub graph: SchemaGraph,
    /// Every warning raised along the way, in report order.
    pub diagnostics: Diagnostics,
    pub stats: InlineStats,
    top_level_varname: String,
}

impl Extraction {
    /// Declarations in emit order, top-level nodes named for the emitter.
    pub fn elems(&mut self) -> Vec<EmitEntry> {
        self.graph.elems(&self.top_level_varname)
    }
}
