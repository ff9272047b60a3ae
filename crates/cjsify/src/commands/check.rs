//! Check command - rewrites modules in memory and reports what would fail

use anyhow::{anyhow, Result};
use clap::Args;
use cjsify_diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticEmitter, Diagnostics, JsonEmitter, SimpleEmitter,
    SourceCache, TerminalEmitter,
};
use cjsify_transform::ModuleRewriter;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::load_rewriter;
use crate::pipeline::rewrite_file;
use crate::{Output, OutputFormat};

/// Extensions of files that are parsed as modules.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "jsx", "ts", "mts", "tsx"];

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Input files or directories
    #[arg(default_value = ".")]
    pub inputs: Vec<PathBuf>,

    /// Show all issues including hints
    #[arg(long)]
    pub all: bool,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// One line per diagnostic instead of source snippets
    #[arg(long)]
    pub short: bool,
}

fn is_source_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    if !SOURCE_EXTENSIONS.contains(&ext) {
        return false;
    }
    // Declaration files carry no runtime code
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    !(name.ends_with(".d.ts") || name.ends_with(".d.mts"))
}

/// Collect all module sources under `path`
pub fn collect_source_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_source_file(path) {
            files.push(path.to_path_buf());
        }
        return Ok(files);
    }

    if !path.exists() {
        return Err(anyhow!("{}: no such file or directory", path.display()));
    }

    for entry in WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        // Skip node_modules
        if path.components().any(|c| c.as_os_str() == "node_modules") {
            continue;
        }

        if path.is_file() && is_source_file(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Emit `diagnostics` in the requested format: terminal or one-line text on
/// stderr, JSON lines on stdout.
pub(crate) fn emit_diagnostics(
    diagnostics: &Diagnostics,
    cache: &SourceCache,
    output: Output,
    short: bool,
) -> Result<()> {
    match output.format {
        OutputFormat::Text if short => {
            let mut emitter = SimpleEmitter::new(std::io::stderr().lock());
            emitter.emit_all(diagnostics, cache)?;
        }
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(std::io::stderr().lock(), output.use_color);
            emitter.emit_all(diagnostics, cache)?;
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(std::io::stdout().lock());
            emitter.emit_all(diagnostics, cache)?;
        }
    }
    Ok(())
}

/// Build the rewriter, reporting configuration problems as `C001`.
pub(crate) fn rewriter_or_report(config: Option<&Path>, output: Output) -> Result<ModuleRewriter> {
    let e = match load_rewriter(config) {
        Ok(rewriter) => return Ok(rewriter),
        Err(e) => e,
    };

    let mut diagnostics = Diagnostics::new();
    diagnostics.push(
        Diagnostic::error(DiagnosticCode::InvalidConfig, format!("{:#}", e))
            .with_help("see `cjsify explain C001` for the configuration format")
            .build(),
    );
    emit_diagnostics(&diagnostics, &SourceCache::new(), output, true)?;
    Err(anyhow!("Invalid configuration"))
}

pub fn run(args: CheckArgs, output: Output, config: Option<&Path>) -> Result<()> {
    let rewriter = rewriter_or_report(config, output)?;

    let mut files = Vec::new();
    for input in &args.inputs {
        files.extend(collect_source_files(input)?);
    }

    if files.is_empty() {
        match output.format {
            OutputFormat::Text => {
                if !output.quiet {
                    println!("No module files found.");
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "type": "summary",
                        "success": true,
                        "files_checked": 0,
                        "errors": 0,
                        "warnings": 0,
                        "hints": 0,
                    })
                );
            }
        }
        return Ok(());
    }

    if matches!(output.format, OutputFormat::Text) && !output.quiet {
        println!("Checking {} file(s)...", files.len());
    }

    let mut source_cache = SourceCache::new();
    let mut all_diagnostics = Diagnostics::new();
    let mut checked_files = 0;
    let mut rewritten_files = 0;
    let mut visited = HashSet::new();

    for file in &files {
        let canonical = file.canonicalize().unwrap_or_else(|_| file.clone());
        if !visited.insert(canonical) {
            continue;
        }
        checked_files += 1;

        let Some(rewritten) =
            rewrite_file(file, &rewriter, &mut source_cache, &mut all_diagnostics)
        else {
            continue;
        };
        rewritten_files += 1;

        if output.verbose > 0 && matches!(output.format, OutputFormat::Text) {
            let report = &rewritten.report;
            println!(
                "  {}: {} source(s), {} side-effect import(s), exports {}",
                file.display(),
                report.sources.len(),
                report.side_effect_sources.len(),
                report.export_shape
            );
        }
    }

    let all_diagnostics = if args.all {
        all_diagnostics
    } else {
        all_diagnostics.without_hints()
    };

    emit_diagnostics(&all_diagnostics, &source_cache, output, args.short)?;

    let errors = all_diagnostics.error_count();
    let warnings = all_diagnostics.warning_count();
    let use_color = output.use_color;

    match output.format {
        OutputFormat::Text => {
            if !all_diagnostics.is_empty() {
                println!();
            }

            // Print summary
            if errors > 0 {
                if use_color {
                    println!(
                        "{}: {} error(s), {} warning(s)",
                        console::style("Check failed").red().bold(),
                        errors,
                        warnings
                    );
                } else {
                    println!("Check failed: {} error(s), {} warning(s)", errors, warnings);
                }
            } else if warnings > 0 && args.strict {
                if use_color {
                    println!(
                        "{}: {} warning(s) (strict mode)",
                        console::style("Check failed").yellow().bold(),
                        warnings
                    );
                } else {
                    println!("Check failed: {} warning(s) (strict mode)", warnings);
                }
            } else if warnings > 0 {
                if use_color {
                    println!(
                        "{}: {} warning(s)",
                        console::style("Check passed").yellow(),
                        warnings
                    );
                } else {
                    println!("Check passed: {} warning(s)", warnings);
                }
            } else if !output.quiet {
                if use_color {
                    println!(
                        "{} - {} file(s) rewritten",
                        console::style("All checks passed!").green().bold(),
                        rewritten_files
                    );
                } else {
                    println!("All checks passed! - {} file(s) rewritten", rewritten_files);
                }
            }
        }
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "type": "summary",
                "success": errors == 0 && (!args.strict || warnings == 0),
                "files_checked": checked_files,
                "files_rewritten": rewritten_files,
                "errors": errors,
                "warnings": warnings,
                "hints": all_diagnostics.hint_count(),
            });
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    let has_blocking_issues = errors > 0 || (args.strict && warnings > 0);

    if has_blocking_issues {
        Err(anyhow!("Check failed with errors"))
    } else {
        Ok(())
    }
}
