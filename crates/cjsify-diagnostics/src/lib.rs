//! Diagnostic infrastructure for cjsify.
//!
//! Everything the rewriter or the CLI wants to tell a user about a file goes
//! through this crate:
//! - byte spans tied to a file in a [`SourceCache`]
//! - coded diagnostics (`P001`, `M001`, ...) with labels and help text
//! - terminal, JSON-lines and one-line text emitters
//!
//! # Example
//!
//! ```
//! use cjsify_diagnostics::{
//!     Diagnostic, DiagnosticCode, DiagnosticEmitter, SimpleEmitter, SourceCache, Span,
//! };
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add_file("index.js", "export default a;\nexport const b = 1;".to_string());
//!
//! let diag = Diagnostic::new(DiagnosticCode::ExportConflict, "cannot mix default and named exports")
//!     .with_span(Span::new(file_id, 18, 37))
//!     .with_label(Span::new(file_id, 0, 17), "default export here")
//!     .build();
//!
//! let mut out = Vec::new();
//! SimpleEmitter::new(&mut out).emit(&diag, &cache).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("index.js:2:1: error"));
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod source_cache;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Diagnostics, Severity};
pub use emitter::{DiagnosticEmitter, JsonEmitter, SimpleEmitter, TerminalEmitter};
pub use source_cache::{SourceCache, SourceFile};
pub use span::{FileId, Label, LabelStyle, Location, Span};
