//! Diagnostic emitters for different output formats.

use crate::diagnostic::{Diagnostic, Diagnostics, Severity};
use crate::source_cache::SourceCache;
use crate::span::LabelStyle;
use std::io::Write;

/// Renders diagnostics to some output.
pub trait DiagnosticEmitter {
    /// Write one diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()>;

    /// Write every diagnostic in order.
    fn emit_all(&mut self, diagnostics: &Diagnostics, cache: &SourceCache) -> std::io::Result<()> {
        for diag in diagnostics {
            self.emit(diag, cache)?;
        }
        Ok(())
    }

    /// Write the error, warning and hint counts.
    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()>;
}

/// Rich terminal output with colors and a caret-underlined snippet.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colored: bool,
}

impl<W: Write> TerminalEmitter<W> {
    /// Create a terminal emitter. With `colored` off every ANSI code is empty.
    pub fn new(writer: W, colored: bool) -> Self {
        Self { writer, colored }
    }

    /// `code` when coloring, otherwise nothing.
    fn paint(&self, code: &'static str) -> &'static str {
        if self.colored {
            code
        } else {
            ""
        }
    }

    /// ANSI color of a severity.
    fn severity_color(&self, severity: Severity) -> &'static str {
        self.paint(match severity {
            Severity::Error => "\x1b[31m",
            Severity::Warning => "\x1b[33m",
            Severity::Hint => "\x1b[34m",
        })
    }

    /// ANSI reset code.
    fn reset(&self) -> &'static str {
        self.paint("\x1b[0m")
    }

    /// ANSI bold code.
    fn bold(&self) -> &'static str {
        self.paint("\x1b[1m")
    }

    /// ANSI cyan code, used for the line-number gutter.
    fn cyan(&self) -> &'static str {
        self.paint("\x1b[36m")
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let color = self.severity_color(diagnostic.severity);
        let reset = self.reset();
        let bold = self.bold();
        let cyan = self.cyan();

        // error[M001]: message
        writeln!(
            self.writer,
            "{}{}{}[{}]{}: {}",
            bold,
            color,
            diagnostic.severity,
            diagnostic.code,
            reset,
            diagnostic.message
        )?;

        if let (Some(loc), Some(file)) = (
            cache.location(diagnostic.span),
            cache.get_file(diagnostic.span.file_id),
        ) {
            writeln!(self.writer, "  {}-->{} {}", cyan, reset, loc)?;

            if let Some(line_text) = file.line_text(loc.line) {
                let gutter = loc.line.to_string();
                let pad = " ".repeat(gutter.len());
                let indent = " ".repeat((loc.column - 1) as usize);
                // Multi-line spans are underlined up to the end of their first line
                let room = line_text.len().saturating_sub((loc.column - 1) as usize);
                let carets = "^".repeat((diagnostic.span.len() as usize).min(room).max(1));

                writeln!(self.writer, "{} {}|{}", pad, cyan, reset)?;
                writeln!(self.writer, "{}{} |{} {}", cyan, gutter, reset, line_text)?;
                writeln!(
                    self.writer,
                    "{} {}|{} {}{}{}{}",
                    pad, cyan, reset, indent, color, carets, reset
                )?;
            }
        }

        for label in &diagnostic.labels {
            if let Some(loc) = cache.location(label.span) {
                let label_color = match label.style {
                    LabelStyle::Primary => color,
                    LabelStyle::Secondary => cyan,
                };
                writeln!(
                    self.writer,
                    "  {}note{}: {} ({})",
                    label_color, reset, label.message, loc
                )?;
            }
        }

        if let Some(help) = &diagnostic.help {
            writeln!(self.writer, "  {}= help:{} {}", cyan, reset, help)?;
        }

        writeln!(self.writer)
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let errors = diagnostics.error_count();
        let warnings = diagnostics.warning_count();
        if errors == 0 && warnings == 0 {
            return Ok(());
        }

        let color = if errors > 0 {
            self.severity_color(Severity::Error)
        } else {
            self.severity_color(Severity::Warning)
        };
        let mut parts = Vec::new();
        if errors > 0 {
            parts.push(format!("{} error{}", errors, if errors == 1 { "" } else { "s" }));
        }
        if warnings > 0 {
            parts.push(format!(
                "{} warning{}",
                warnings,
                if warnings == 1 { "" } else { "s" }
            ));
        }
        writeln!(
            self.writer,
            "{}{} emitted{}",
            color,
            parts.join(" and "),
            self.reset()
        )
    }
}

/// One JSON object per line, for editors and CI.
pub struct JsonEmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonEmitter<W> {
    /// Create a JSON lines emitter.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let location = |span| {
            cache.location(span).map(|l| {
                serde_json::json!({
                    "file": l.file,
                    "line": l.line,
                    "column": l.column,
                })
            })
        };

        let json = serde_json::json!({
            "code": diagnostic.code.as_str(),
            "severity": diagnostic.severity.as_str(),
            "message": diagnostic.message,
            "location": location(diagnostic.span),
            "span": if diagnostic.span.is_dummy() {
                serde_json::Value::Null
            } else {
                serde_json::json!({
                    "start": diagnostic.span.start,
                    "end": diagnostic.span.end,
                })
            },
            "labels": diagnostic.labels.iter().map(|label| {
                serde_json::json!({
                    "message": label.message,
                    "location": location(label.span),
                })
            }).collect::<Vec<_>>(),
            "help": diagnostic.help,
        });

        serde_json::to_writer(&mut self.writer, &json)?;
        writeln!(self.writer)
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let summary = serde_json::json!({
            "type": "summary",
            "errors": diagnostics.error_count(),
            "warnings": diagnostics.warning_count(),
            "hints": diagnostics.hint_count(),
            "total": diagnostics.len(),
        });
        serde_json::to_writer(&mut self.writer, &summary)?;
        writeln!(self.writer)
    }
}

/// `file:line:col: severity: message [code]`, no colors.
pub struct SimpleEmitter<W: Write> {
    writer: W,
}

impl<W: Write> SimpleEmitter<W> {
    /// Create a one-line-per-diagnostic emitter.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for SimpleEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        if let Some(loc) = cache.location(diagnostic.span) {
            write!(self.writer, "{}: ", loc)?;
        }
        writeln!(
            self.writer,
            "{}: {} [{}]",
            diagnostic.severity, diagnostic.message, diagnostic.code
        )
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        writeln!(
            self.writer,
            "{} error(s), {} warning(s)",
            diagnostics.error_count(),
            diagnostics.warning_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use crate::span::Span;

    fn conflict(cache: &mut SourceCache) -> Diagnostic {
        let id = cache.add_file(
            "mixed.js",
            "export default a;\nexport const b = 1;\n".to_string(),
        );
        Diagnostic::new(DiagnosticCode::ExportConflict, "cannot mix export styles")
            .with_span(Span::new(id, 18, 37))
            .with_label(Span::new(id, 0, 17), "default export here")
            .with_help("use only named exports")
            .build()
    }

    #[test]
    fn test_terminal_snippet_without_color() {
        let mut cache = SourceCache::new();
        let diag = conflict(&mut cache);

        let mut out = Vec::new();
        TerminalEmitter::new(&mut out, false).emit(&diag, &cache).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("error[M001]: cannot mix export styles\n"));
        assert!(text.contains("--> mixed.js:2:1"));
        assert!(text.contains("2 | export const b = 1;"));
        assert!(text.contains("  | ^^^^^^^^^^^^^^^^^^^"));
        assert!(text.contains("note: default export here (mixed.js:1:1)"));
        assert!(text.contains("= help: use only named exports"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_json_lines() {
        let mut cache = SourceCache::new();
        let diag = conflict(&mut cache);

        let mut out = Vec::new();
        JsonEmitter::new(&mut out).emit(&diag, &cache).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["code"], "M001");
        assert_eq!(value["severity"], "error");
        assert_eq!(value["location"]["line"], 2);
        assert_eq!(value["labels"][0]["location"]["line"], 1);
    }

    #[test]
    fn test_simple_without_location() {
        let cache = SourceCache::new();
        let diag = Diagnostic::new(DiagnosticCode::InvalidConfig, "bad pattern").build();

        let mut out = Vec::new();
        SimpleEmitter::new(&mut out).emit(&diag, &cache).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "error: bad pattern [C001]\n");
    }

    #[test]
    fn test_summary_pluralization() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::new(DiagnosticCode::ParseError, "a").build());
        diags.push(Diagnostic::new(DiagnosticCode::ParseError, "b").build());
        diags.push(Diagnostic::warning(DiagnosticCode::InternalError, "c").build());

        let mut out = Vec::new();
        TerminalEmitter::new(&mut out, false).emit_summary(&diags).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 errors and 1 warning emitted\n");
    }
}
