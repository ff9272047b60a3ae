//! Explain command - explain diagnostic codes

use anyhow::{anyhow, Result};
use clap::Args;
use cjsify_diagnostics::DiagnosticCode;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Diagnostic code to explain (e.g., M001)
    pub code: String,
}

struct ErrorExplanation {
    code: &'static str,
    title: &'static str,
    description: &'static str,
    example: Option<&'static str>,
    suggestion: Option<&'static str>,
    related: &'static [&'static str],
}

const ERROR_EXPLANATIONS: &[ErrorExplanation] = &[
    ErrorExplanation {
        code: "P001",
        title: "Parse Error",
        description: "The file is not a valid ES module. The grammar is picked from the extension: \
                      .ts/.mts as TypeScript, .tsx as TypeScript with JSX, .jsx as JavaScript with JSX, \
                      everything else as plain JavaScript.",
        example: Some("import { a from 'x';  // Missing closing brace"),
        suggestion: Some("Fix the syntax error. A recovered error is reported as a warning and the file is still rewritten."),
        related: &[],
    },
    ErrorExplanation {
        code: "M001",
        title: "Default and Named Exports Mixed",
        description: "A CommonJS module has one export object. `export default` assigns `module.exports`, \
                      named exports assign properties of `exports`, and the later `module.exports` \
                      assignment would silently discard every named export. The file is not rewritten.",
        example: Some("export const version = 1;\nexport default function main() {}"),
        suggestion: Some("Export a single object instead:\n  export default { version, main };\nor use only named exports:\n  export function main() {}"),
        related: &["M002"],
    },
    ErrorExplanation {
        code: "M002",
        title: "Reserved Binding Renamed",
        description: "The rewritten module refers to `module`, `exports` and `require` as the CommonJS \
                      bindings. A top-level declaration with one of those names is renamed (for example \
                      to `_module`) along with every reference to it, so generated code cannot hit it. \
                      Exported names are kept unchanged.",
        example: Some("const require = createRequire(import.meta.url);  // becomes _require"),
        suggestion: Some("Nothing to do. Rename the binding yourself to keep the output name stable."),
        related: &["M001"],
    },
    ErrorExplanation {
        code: "C001",
        title: "Invalid Configuration",
        description: "`cjsify.toml` (or the file passed with --config) could not be read, is not valid TOML, \
                      has unknown keys, or lists an interop pattern that is not a valid regular expression.",
        example: Some("[rewrite]\ninterop_default_patterns = [\"@babel/runtime[\\\\/]\"]\nrename_reserved = true"),
        suggestion: Some("Only the [rewrite] table is recognised. Patterns use Rust `regex` syntax and are matched against the import source."),
        related: &[],
    },
    ErrorExplanation {
        code: "I001",
        title: "Internal Error",
        description: "Something unexpected happened while processing the file, such as the file becoming \
                      unreadable between discovery and rewriting.",
        example: None,
        suggestion: Some("Re-run with RUST_LOG=debug and report the output if the problem persists."),
        related: &[],
    },
];

pub fn run(args: ExplainArgs, format: OutputFormat, use_color: bool) -> Result<()> {
    let code = DiagnosticCode::parse(&args.code)
        .map(|code| code.as_str().to_string())
        .unwrap_or_else(|| args.code.to_uppercase());

    let explanation = ERROR_EXPLANATIONS
        .iter()
        .find(|e| e.code == code)
        .ok_or_else(|| anyhow!("Unknown error code: {}", code))?;

    match format {
        OutputFormat::Text => {
            if use_color {
                println!(
                    "\n{}: {}\n{}",
                    console::style(&code).bold().cyan(),
                    console::style(explanation.title).bold(),
                    "=".repeat(code.len() + explanation.title.len() + 2)
                );
            } else {
                println!(
                    "\n{}: {}\n{}",
                    code,
                    explanation.title,
                    "=".repeat(code.len() + explanation.title.len() + 2)
                );
            }

            println!("\n{}\n", explanation.description);

            if let Some(example) = explanation.example {
                if use_color {
                    println!("{}:", console::style("Example").bold());
                } else {
                    println!("Example:");
                }
                for line in example.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if let Some(suggestion) = explanation.suggestion {
                if use_color {
                    println!("{}:", console::style("Suggestion").bold().green());
                } else {
                    println!("Suggestion:");
                }
                for line in suggestion.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if !explanation.related.is_empty() {
                if use_color {
                    println!(
                        "{}: {}",
                        console::style("Related").dim(),
                        explanation.related.join(", ")
                    );
                } else {
                    println!("Related: {}", explanation.related.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "code": explanation.code,
                "title": explanation.title,
                "description": explanation.description,
                "example": explanation.example,
                "suggestion": explanation.suggestion,
                "related": explanation.related,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_is_explained() {
        for code in DiagnosticCode::ALL {
            assert!(
                ERROR_EXPLANATIONS.iter().any(|e| e.code == code.as_str()),
                "missing explanation for {}",
                code
            );
        }
    }

    #[test]
    fn test_related_codes_exist() {
        for explanation in ERROR_EXPLANATIONS {
            for related in explanation.related {
                assert!(DiagnosticCode::parse(related).is_some(), "{}", related);
            }
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let args = ExplainArgs {
            code: "m001".to_string(),
        };
        assert!(run(args, OutputFormat::Json, false).is_ok());

        let args = ExplainArgs {
            code: "X999".to_string(),
        };
        assert!(run(args, OutputFormat::Text, false).is_err());
    }
}
