//! Hoisted `require` bindings.

use crate::templates::{require_call, require_stmt, str_value, var_binding};
use crate::uid::UidGenerator;
use serde::Serialize;
use std::collections::HashMap;
use swc_ecma_ast::{Stmt, Str};

/// One shared `var <binding> = require(<source>)` emitted for a module
/// source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceRecord {
    pub source: String,
    pub binding: String,
}

/// Collects the statements that are hoisted to the top of the rewritten
/// module: per-source bindings and import bindings in encounter order,
/// followed by side-effect-only requires.
#[derive(Debug, Default)]
pub(crate) struct SourceCollector {
    hoisted: Vec<Stmt>,
    side_effects: Vec<Stmt>,
    bindings: HashMap<String, String>,
    records: Vec<SourceRecord>,
    side_effect_sources: Vec<String>,
}

impl SourceCollector {
    /// Binding holding `require(<source>)`, created on first use.
    pub fn add_source(&mut self, source: &Str, uids: &mut UidGenerator) -> String {
        let key = str_value(source);
        if let Some(binding) = self.bindings.get(&key) {
            log::trace!("reusing {} for {:?}", binding, key);
            return binding.clone();
        }

        let binding = uids.generate(&key);
        self.hoisted.push(var_binding(&binding, require_call(source)));
        self.bindings.insert(key.clone(), binding.clone());
        self.records.push(SourceRecord {
            source: key,
            binding: binding.clone(),
        });
        binding
    }

    /// Hoist an import binding such as `var a = _x.a;`.
    pub fn push_binding(&mut self, stmt: Stmt) {
        self.hoisted.push(stmt);
    }

    /// Record `import "<source>";`. Every such statement keeps its own
    /// require.
    pub fn add_side_effect(&mut self, source: &Str) {
        self.side_effects.push(require_stmt(source));
        self.side_effect_sources.push(str_value(source));
    }

    pub fn records(&self) -> &[SourceRecord] {
        &self.records
    }

    pub fn side_effect_sources(&self) -> &[String] {
        &self.side_effect_sources
    }

    /// Statements to prepend to the module, in emission order.
    pub fn into_prelude(self) -> Vec<Stmt> {
        let mut prelude = self.hoisted;
        prelude.extend(self.side_effects);
        prelude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::ident_expr;
    use swc_common::DUMMY_SP;

    fn source(value: &str) -> Str {
        Str {
            span: DUMMY_SP,
            value: value.into(),
            raw: None,
        }
    }

    #[test]
    fn test_add_source_dedups_by_source_string() {
        let mut uids = UidGenerator::default();
        let mut collector = SourceCollector::default();

        assert_eq!(collector.add_source(&source("a"), &mut uids), "_a");
        assert_eq!(collector.add_source(&source("./b"), &mut uids), "_b");
        assert_eq!(collector.add_source(&source("a"), &mut uids), "_a");

        assert_eq!(
            collector.records(),
            &[
                SourceRecord {
                    source: "a".to_string(),
                    binding: "_a".to_string()
                },
                SourceRecord {
                    source: "./b".to_string(),
                    binding: "_b".to_string()
                },
            ]
        );
        assert_eq!(collector.into_prelude().len(), 2);
    }

    #[test]
    fn test_side_effects_follow_bindings() {
        let mut uids = UidGenerator::default();
        let mut collector = SourceCollector::default();

        collector.add_side_effect(&source("polyfill"));
        collector.add_source(&source("a"), &mut uids);
        collector.add_side_effect(&source("polyfill"));
        collector.push_binding(var_binding("x", ident_expr("_a")));

        assert_eq!(collector.side_effect_sources(), &["polyfill", "polyfill"]);
        let prelude = collector.into_prelude();
        assert_eq!(prelude.len(), 4);
        assert!(matches!(prelude[0], Stmt::Decl(_)));
        assert!(matches!(prelude[1], Stmt::Decl(_)));
        assert!(matches!(prelude[2], Stmt::Expr(_)));
        assert!(matches!(prelude[3], Stmt::Expr(_)));
    }
}
