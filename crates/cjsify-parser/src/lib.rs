//! Module parser wrapper using SWC
//!
//! Turns source text into the `swc_ecma_ast::Module` tree the rewriter works
//! on, registering the file in a [`SourceCache`] so parse errors and later
//! rewrite errors can point at the original text.

use anyhow::Result;
use cjsify_diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, FileId, SourceCache, Span};
use std::path::Path;
use swc_common::{input::StringInput, sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, Syntax, TsSyntax};

// Re-export AST types for consumers that need to inspect the AST
pub use swc_ecma_ast;

// Re-export Spanned trait for getting spans from AST nodes
pub use swc_common::Spanned;

/// Which grammar a file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    JavaScript { jsx: bool },
    TypeScript { tsx: bool },
}

impl SourceKind {
    /// Pick the grammar from a file extension. Unknown extensions parse as
    /// plain JavaScript.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        match ext {
            "ts" | "mts" | "cts" => SourceKind::TypeScript { tsx: false },
            "tsx" => SourceKind::TypeScript { tsx: true },
            "jsx" => SourceKind::JavaScript { jsx: true },
            _ => SourceKind::JavaScript { jsx: false },
        }
    }

    fn syntax(self) -> Syntax {
        match self {
            SourceKind::JavaScript { jsx } => Syntax::Es(EsSyntax {
                jsx,
                export_default_from: true,
                ..Default::default()
            }),
            SourceKind::TypeScript { tsx } => Syntax::Typescript(TsSyntax {
                tsx,
                decorators: true,
                dts: false,
                no_early_errors: false,
                disallow_ambiguous_jsx_like: false,
            }),
        }
    }
}

/// Result of parsing one file.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed module
    pub module: Module,
    /// The file ID in the source cache
    pub file_id: FileId,
    /// Position SWC assigned to the first byte of this file
    pub base: u32,
    /// Recoverable parse errors, reported as warnings
    pub diagnostics: Diagnostics,
}

impl ParseResult {
    /// Convert a span of a node in `self.module` to a file-relative span.
    pub fn span(&self, swc_span: swc_common::Span) -> Span {
        swc_span_to_span(swc_span, self.file_id, self.base)
    }
}

/// Parse a module and register its text in `cache`.
///
/// A fatal parse error is pushed into `diagnostics` (so the caller can render
/// it against the cached source) and returned as `Err`.
pub fn parse_module_with_cache(
    source: &str,
    filename: &str,
    cache: &mut SourceCache,
    diagnostics: &mut Diagnostics,
) -> Result<ParseResult> {
    let file_id = cache.add_file(filename, source.to_string());
    let kind = SourceKind::from_path(filename);

    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );
    let base = source_file.start_pos.0;

    let lexer = Lexer::new(
        kind.syntax(),
        EsVersion::Es2022,
        StringInput::from(&*source_file),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| {
        let span = swc_span_to_span(e.span(), file_id, base);
        let message = e.kind().msg().to_string();
        diagnostics.push(
            Diagnostic::new(DiagnosticCode::ParseError, message.clone())
                .with_span(span)
                .build(),
        );
        anyhow::anyhow!("{}: parse error: {}", filename, message)
    })?;

    let mut recovered = Diagnostics::new();
    for error in parser.take_errors() {
        recovered.push(
            Diagnostic::warning(DiagnosticCode::ParseError, error.kind().msg().to_string())
                .with_span(swc_span_to_span(error.span(), file_id, base))
                .build(),
        );
    }
    log::debug!(
        "parsed {} as {:?}: {} top-level item(s), {} recovered error(s)",
        filename,
        kind,
        module.body.len(),
        recovered.len()
    );

    Ok(ParseResult {
        module,
        file_id,
        base,
        diagnostics: recovered,
    })
}

/// Parse a module without diagnostics bookkeeping.
///
/// The grammar is chosen from `filename`'s extension.
pub fn parse_module(source: &str, filename: &str) -> Result<Module> {
    let mut cache = SourceCache::new();
    let mut diagnostics = Diagnostics::new();
    parse_module_with_cache(source, filename, &mut cache, &mut diagnostics).map(|r| r.module)
}

/// Convert an SWC span to a file-relative diagnostics span.
pub fn swc_span_to_span(swc_span: swc_common::Span, file_id: FileId, base: u32) -> Span {
    if swc_span.is_dummy() {
        return Span::DUMMY;
    }
    Span::from_absolute(file_id, base, swc_span.lo.0, swc_span.hi.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_ecma_ast::{ModuleDecl, ModuleItem};

    #[test]
    fn test_parse_imports_and_exports() {
        let source = r#"
            import a, { b as c } from "a";
            import "side-effect";
            export const d = 1;
            export * from "e";
        "#;

        let module = parse_module(source, "index.js").unwrap();
        assert_eq!(module.body.len(), 4);
        assert!(matches!(
            module.body[0],
            ModuleItem::ModuleDecl(ModuleDecl::Import(_))
        ));
        assert!(matches!(
            module.body[3],
            ModuleItem::ModuleDecl(ModuleDecl::ExportAll(_))
        ));
    }

    #[test]
    fn test_parse_export_default_from() {
        let module = parse_module("export v from 'mod';", "index.js").unwrap();
        assert!(matches!(
            module.body[0],
            ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(_))
        ));
    }

    #[test]
    fn test_typescript_by_extension() {
        let source = "import type { A } from './a';\nexport interface B { a: A }";
        assert!(parse_module(source, "types.ts").is_ok());
        assert!(parse_module(source, "types.js").is_err());
    }

    #[test]
    fn test_source_kind_from_path() {
        assert_eq!(SourceKind::from_path("a.mts"), SourceKind::TypeScript { tsx: false });
        assert_eq!(SourceKind::from_path("a.tsx"), SourceKind::TypeScript { tsx: true });
        assert_eq!(SourceKind::from_path("a.jsx"), SourceKind::JavaScript { jsx: true });
        assert_eq!(SourceKind::from_path("a"), SourceKind::JavaScript { jsx: false });
    }

    #[test]
    fn test_spans_are_file_relative() {
        let source = "let x = 1;\nexport default x;";
        let mut cache = SourceCache::new();
        let mut diagnostics = Diagnostics::new();

        let result =
            parse_module_with_cache(source, "index.js", &mut cache, &mut diagnostics).unwrap();
        let span = result.span(result.module.body[1].span());

        assert_eq!(span.start, 11);
        assert_eq!(span.end, source.len() as u32);
        let loc = cache.location(span).unwrap();
        assert_eq!((loc.line, loc.column), (2, 1));
    }

    #[test]
    fn test_parse_error_is_recorded() {
        let mut cache = SourceCache::new();
        let mut diagnostics = Diagnostics::new();

        let result = parse_module_with_cache("import { from 'a';", "bad.js", &mut cache, &mut diagnostics);

        assert!(result.is_err());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.items[0].code, DiagnosticCode::ParseError);
        assert!(cache.get_id("bad.js").is_some());
    }
}
