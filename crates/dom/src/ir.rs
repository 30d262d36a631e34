//! Per-compile state shared by every root of a file

use common::{CompiledProgram, Diagnostic, Replacement, TemplateMarkup, TemplateTable, TransformOptions};
use indexmap::IndexSet;

/// State for one DOM compile. Dropped when the file is done, so nothing
/// leaks between compiles.
pub struct BlockContext<'o> {
    pub options: &'o TransformOptions,

    /// Templates collected at the file level
    pub templates: TemplateTable,

    /// Helper imports needed
    pub helpers: IndexSet<&'static str>,

    /// Delegated events
    pub delegates: IndexSet<String>,

    /// Diagnostics raised while planning attributes
    pub diagnostics: Vec<Diagnostic>,

    /// Variable counter for unique names
    var_counter: usize,
}

impl<'o> BlockContext<'o> {
    pub fn new(options: &'o TransformOptions) -> Self {
        Self {
            options,
            templates: TemplateTable::new(),
            helpers: IndexSet::new(),
            delegates: IndexSet::new(),
            diagnostics: Vec::new(),
            var_counter: 0,
        }
    }

    /// Generate a unique variable name, e.g. `_el$3`
    pub fn generate_uid(&mut self, prefix: &str) -> String {
        self.var_counter += 1;
        format!("_{}${}", prefix, self.var_counter)
    }

    /// Register a helper import
    pub fn register_helper(&mut self, name: &'static str) {
        self.helpers.insert(name);
    }

    /// Register a delegated event
    pub fn register_delegate(&mut self, event: &str) {
        self.delegates.insert(event.to_string());
    }

    /// Intern an HTML template and return the name this use-site refers to
    pub fn push_template(&mut self, html: String, is_svg: bool) -> String {
        self.register_helper("template");
        self.templates.intern(TemplateMarkup::Html { html, svg: is_svg })
    }

    pub fn finish(mut self, replacements: Vec<Replacement>) -> CompiledProgram {
        let mut epilogue = Vec::new();
        if !self.delegates.is_empty() {
            self.register_helper("delegateEvents");
            let events: Vec<String> = self.delegates.iter().map(|e| common::expression::js_string(e)).collect();
            epilogue.push(format!("delegateEvents([{}]);", events.join(", ")));
        }
        CompiledProgram { replacements, helpers: self.helpers, templates: self.templates, epilogue }
    }
}
