//! Compiled templates shared across market instances.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use tracing::trace;

use super::ast::NameAst;
use super::parser::parse;
use crate::error::TemplateError;

/// Templates compiled once per distinct text.
///
/// Markets with the same id share templates but differ in specifiers, so a
/// template is parsed the first time it is seen and reused afterwards.
/// Templates that fail to parse are not stored.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    compiled: DashMap<String, Arc<NameAst>>,
}

static GLOBAL: OnceLock<Arc<TemplateRegistry>> = OnceLock::new();

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry.
    pub fn global() -> Arc<TemplateRegistry> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(TemplateRegistry::new())))
    }

    pub fn get_or_parse(&self, template: &str) -> Result<Arc<NameAst>, TemplateError> {
        if let Some(ast) = self.compiled.get(template) {
            return Ok(Arc::clone(ast.value()));
        }

        let ast = Arc::new(parse(template)?);
        trace!(template, "Compiled name template");
        Ok(Arc::clone(
            self.compiled
                .entry(template.to_string())
                .or_insert(ast)
                .value(),
        ))
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_compiles_once() {
        let registry = TemplateRegistry::new();
        let a = registry.get_or_parse("{!setnr} set - winner").unwrap();
        let b = registry.get_or_parse("{!setnr} set - winner").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let registry = TemplateRegistry::new();
        assert!(registry.get_or_parse("{{!runnr}").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn global_is_shared() {
        let a = TemplateRegistry::global().get_or_parse("{$competitor1}").unwrap();
        let b = TemplateRegistry::global().get_or_parse("{$competitor1}").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
