//! Parse and rewrite one file, turning every failure into diagnostics.

use cjsify_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, SourceCache};
use cjsify_parser::swc_ecma_ast::Module;
use cjsify_transform::{ModuleRewriter, RewriteError, RewriteReport};
use std::path::Path;

/// A successfully rewritten module.
pub struct Rewritten {
    pub module: Module,
    pub report: RewriteReport,
}

/// Parse `source` and rewrite it with `rewriter`.
///
/// Returns `None` when the file could not be rewritten; the reason is pushed
/// to `diagnostics` as a `P001` or `M001` error. Renamed reserved bindings
/// are pushed as `M002` hints.
pub fn rewrite_source(
    path: &Path,
    source: &str,
    rewriter: &ModuleRewriter,
    cache: &mut SourceCache,
    diagnostics: &mut Diagnostics,
) -> Option<Rewritten> {
    let filename = path.to_string_lossy();
    let mut parsed =
        match cjsify_parser::parse_module_with_cache(source, &filename, cache, diagnostics) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("{:#}", e);
                return None;
            }
        };
    diagnostics.extend(std::mem::take(&mut parsed.diagnostics));

    let report = match rewriter.rewrite(&mut parsed.module) {
        Ok(report) => report,
        Err(err) => {
            log::debug!("{}: {}", filename, err);
            let diagnostic = match &err {
                RewriteError::ExportConflict {
                    span,
                    default_span,
                    named_span,
                } => Diagnostic::error(DiagnosticCode::ExportConflict, err.to_string())
                    .with_span(parsed.span(*span))
                    .with_label(parsed.span(*default_span), "default export here")
                    .with_label(parsed.span(*named_span), "named export here")
                    .with_help(
                        "export an object from `export default`, or use only named exports",
                    ),
            };
            diagnostics.push(diagnostic.build());
            return None;
        }
    };

    for binding in &report.renamed {
        diagnostics.push(
            Diagnostic::hint(
                DiagnosticCode::ReservedBindingRenamed,
                format!(
                    "{} `{}` renamed to `{}`",
                    binding.kind.as_str(),
                    binding.original,
                    binding.renamed
                ),
            )
            .with_span(parsed.span(binding.span))
            .with_help(format!(
                "the rewritten module uses `{}` for the CommonJS binding",
                binding.original
            ))
            .build(),
        );
    }

    Some(Rewritten {
        module: parsed.module,
        report,
    })
}

/// Read `path` and rewrite it. Read failures become `I001` errors.
pub fn rewrite_file(
    path: &Path,
    rewriter: &ModuleRewriter,
    cache: &mut SourceCache,
    diagnostics: &mut Diagnostics,
) -> Option<Rewritten> {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticCode::InternalError,
                    format!("could not read {}: {}", path.display(), e),
                )
                .build(),
            );
            return None;
        }
    };
    rewrite_source(path, &source, rewriter, cache, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cjsify_diagnostics::Severity;
    use cjsify_transform::{ExportShape, RewriteOptions};

    fn run(filename: &str, source: &str) -> (Option<Rewritten>, Diagnostics, SourceCache) {
        let rewriter = ModuleRewriter::new(RewriteOptions::default()).unwrap();
        let mut cache = SourceCache::new();
        let mut diagnostics = Diagnostics::new();
        let result = rewrite_source(
            Path::new(filename),
            source,
            &rewriter,
            &mut cache,
            &mut diagnostics,
        );
        (result, diagnostics, cache)
    }

    #[test]
    fn test_clean_module_has_no_diagnostics() {
        let (result, diagnostics, _) = run("a.js", "import x from 'x';\nexport const y = x;\n");
        let rewritten = result.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(rewritten.report.export_shape, ExportShape::Named);
        assert_eq!(rewritten.report.sources.len(), 0);
        assert!(rewritten.module.body.len() >= 2);
    }

    #[test]
    fn test_export_conflict_is_reported_with_labels() {
        let source = "export const a = 1;\nexport default 2;\n";
        let (result, diagnostics, cache) = run("conflict.js", source);
        assert!(result.is_none());
        assert_eq!(diagnostics.error_count(), 1);

        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.code, DiagnosticCode::ExportConflict);
        assert_eq!(diagnostic.labels.len(), 2);

        let location = cache.location(diagnostic.span).unwrap();
        assert_eq!(location.line, 2);
        let named = cache.location(diagnostic.labels[1].span).unwrap();
        assert_eq!(named.line, 1);
    }

    #[test]
    fn test_parse_error_is_reported() {
        let (result, diagnostics, _) = run("broken.js", "import { from 'x';");
        assert!(result.is_none());
        assert!(diagnostics.has_errors());
        assert!(diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::ParseError));
    }

    #[test]
    fn test_renamed_bindings_become_hints() {
        let source = "var require = 1;\nexport default require;\n";
        let (result, diagnostics, cache) = run("renamed.js", source);
        assert!(result.is_some());
        assert_eq!(diagnostics.hint_count(), 1);

        let hint = diagnostics.iter().next().unwrap();
        assert_eq!(hint.code, DiagnosticCode::ReservedBindingRenamed);
        assert_eq!(hint.severity, Severity::Hint);
        assert_eq!(hint.message, "var `require` renamed to `_require`");
        assert_eq!(cache.location(hint.span).unwrap().line, 1);
    }

    #[test]
    fn test_unreadable_file_is_an_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let rewriter = ModuleRewriter::new(RewriteOptions::default()).unwrap();
        let mut cache = SourceCache::new();
        let mut diagnostics = Diagnostics::new();

        let missing = dir.path().join("missing.js");
        assert!(rewrite_file(&missing, &rewriter, &mut cache, &mut diagnostics).is_none());
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.code, DiagnosticCode::InternalError);
    }
}
