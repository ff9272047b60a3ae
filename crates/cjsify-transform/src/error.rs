//! Error types for the module rewrite.

use swc_common::Span;
use thiserror::Error;

/// Fatal, file-level rewrite failure.
///
/// The module passed to the rewriter is left partially rewritten; callers
/// are expected to discard it.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(
        "cannot mix `export default` with named exports in the same file: \
         `module.exports` would override every named export"
    )]
    ExportConflict {
        /// Last `export` statement seen before the conflict was detected
        span: Span,
        /// First statement that produced a default export
        default_span: Span,
        /// First statement that produced a named export
        named_span: Span,
    },
}

impl RewriteError {
    /// Location to report the error at.
    pub fn span(&self) -> Span {
        match self {
            RewriteError::ExportConflict { span, .. } => *span,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid interop pattern `{pattern}`: {source}")]
    InvalidInteropPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
