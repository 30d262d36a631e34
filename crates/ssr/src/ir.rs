//! Intermediate Representation for SSR transforms
//!
//! SSR only builds strings: static parts interleaved with values that are
//! concatenated on every render.

use common::{CompiledProgram, CompileError, Diagnostic, Replacement, Result, TemplateTable, TransformOptions};
use indexmap::IndexSet;

/// The result of transforming a JSX node for SSR
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SsrResult {
    /// Static template parts (the strings between dynamic values)
    pub parts: Vec<String>,

    /// Values spliced between the parts, already escaped where needed
    pub values: Vec<String>,

    /// Statements that have to run before the render call
    pub hoisted: Vec<String>,
}

impl SsrResult {
    pub fn new() -> Self {
        Self { parts: vec![String::new()], values: Vec::new(), hoisted: Vec::new() }
    }

    /// Append static text to the template
    pub fn push_static(&mut self, text: &str) {
        match self.parts.last_mut() {
            Some(last) => last.push_str(text),
            None => self.parts.push(text.to_string()),
        }
    }

    /// Append a dynamic value
    pub fn push_dynamic(&mut self, code: String) {
        self.values.push(code);
        self.parts.push(String::new());
    }

    /// Every value sits between two parts
    pub fn check(&self) -> Result<()> {
        if self.parts.len() != self.values.len() + 1 {
            return Err(CompileError::invariant(format!(
                "ssr template has {} parts for {} values",
                self.parts.len(),
                self.values.len()
            )));
        }
        Ok(())
    }
}

/// Context for one SSR compile
pub struct SsrContext<'o> {
    pub options: &'o TransformOptions,

    pub templates: TemplateTable,

    /// Helper imports needed
    pub helpers: IndexSet<&'static str>,

    pub diagnostics: Vec<Diagnostic>,

    /// Variable counter for unique names
    var_counter: usize,
}

impl<'o> SsrContext<'o> {
    pub fn new(options: &'o TransformOptions) -> Self {
        Self {
            options,
            templates: TemplateTable::new(),
            helpers: IndexSet::new(),
            diagnostics: Vec::new(),
            var_counter: 0,
        }
    }

    /// Whether hydration markers are written into server output
    pub fn hydratable(&self) -> bool {
        self.options.emits_markers()
    }

    /// Generate a unique variable name
    pub fn generate_uid(&mut self, prefix: &str) -> String {
        self.var_counter += 1;
        format!("_{}${}", prefix, self.var_counter)
    }

    /// Register a helper import
    pub fn register_helper(&mut self, name: &'static str) {
        self.helpers.insert(name);
    }

    pub fn finish(self, replacements: Vec<Replacement>) -> CompiledProgram {
        CompiledProgram { replacements, helpers: self.helpers, templates: self.templates, epilogue: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_surround_values() {
        let mut result = SsrResult::new();
        result.push_static("<div>");
        result.push_dynamic("escape(a)".into());
        result.push_static("</div>");
        assert_eq!(result.parts, vec!["<div>", "</div>"]);
        assert!(result.check().is_ok());
    }

    #[test]
    fn test_adjacent_values_get_empty_parts() {
        let mut result = SsrResult::new();
        result.push_dynamic("a".into());
        result.push_dynamic("b".into());
        assert_eq!(result.parts, vec!["", "", ""]);
        assert!(result.check().is_ok());
    }
}
