//! Inspect command - shows what the rewrite of one module hoists and exports

use anyhow::{anyhow, Result};
use clap::Args;
use cjsify_diagnostics::{Diagnostics, SourceCache};
use cjsify_transform::RewriteReport;
use std::path::{Path, PathBuf};

use super::check::{emit_diagnostics, rewriter_or_report};
use crate::pipeline::rewrite_file;
use crate::{Output, OutputFormat};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Module to inspect
    pub file: PathBuf,
}

pub fn run(args: InspectArgs, output: Output, config: Option<&Path>) -> Result<()> {
    let rewriter = rewriter_or_report(config, output)?;

    let mut source_cache = SourceCache::new();
    let mut diagnostics = Diagnostics::new();
    let rewritten = rewrite_file(&args.file, &rewriter, &mut source_cache, &mut diagnostics);

    emit_diagnostics(&diagnostics, &source_cache, output, false)?;

    let Some(rewritten) = rewritten else {
        return Err(anyhow!("Could not rewrite {}", args.file.display()));
    };

    match output.format {
        OutputFormat::Text => {
            print_report(
                &args.file,
                &rewritten.report,
                rewritten.module.body.len(),
                output.use_color,
            );
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "type": "report",
                "file": args.file.display().to_string(),
                "statements": rewritten.module.body.len(),
                "report": rewritten.report,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

fn heading(text: &str, use_color: bool) -> String {
    if use_color {
        console::style(text).bold().to_string()
    } else {
        text.to_string()
    }
}

fn print_report(file: &Path, report: &RewriteReport, statements: usize, use_color: bool) {
    println!("{}", heading(&file.display().to_string(), use_color));
    println!("  exports: {}", report.export_shape);
    println!("  statements after rewrite: {}", statements);

    println!("\n{}:", heading("Shared requires", use_color));
    if report.sources.is_empty() {
        println!("  (none)");
    }
    for record in &report.sources {
        println!("  var {} = require({:?});", record.binding, record.source);
    }

    if !report.side_effect_sources.is_empty() {
        println!("\n{}:", heading("Side-effect imports", use_color));
        for source in &report.side_effect_sources {
            println!("  require({:?});", source);
        }
    }

    if !report.renamed.is_empty() {
        println!("\n{}:", heading("Renamed bindings", use_color));
        for binding in &report.renamed {
            println!(
                "  {} {} -> {}",
                binding.kind.as_str(),
                binding.original,
                binding.renamed
            );
        }
    }
}
