//! Per-compile template intern table

use indexmap::IndexMap;

use crate::expression::js_string;

/// Canonical markup of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateMarkup {
    /// One HTML string, parsed once and cloned per use
    Html { html: String, svg: bool },
    /// String parts concatenated with values on every render
    Parts(Vec<String>),
}

impl TemplateMarkup {
    /// The text two templates are compared by
    fn key(&self) -> String {
        match self {
            Self::Html { html, .. } => html.clone(),
            Self::Parts(parts) => serde_json::Value::from(parts.clone()).to_string(),
        }
    }

    fn initializer(&self) -> String {
        match self {
            Self::Html { html, svg: false } => format!("template({})", js_string(html)),
            Self::Html { html, svg: true } => format!("template({}, true)", js_string(html)),
            Self::Parts(parts) => {
                let parts: Vec<String> = parts.iter().map(|part| js_string(part)).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub markup: TemplateMarkup,
    /// Number of use-sites that share this template
    pub uses: usize,
}

/// Templates of one compiled file, interned by markup text.
///
/// The first use-site of a template refers to it by name. Every later
/// use-site gets its own alias, so each occurrence stays distinguishable
/// in the output while the markup is declared once.
#[derive(Debug, Default)]
pub struct TemplateTable {
    templates: IndexMap<String, Template>,
    aliases: Vec<(String, String)>,
    use_sites: usize,
}

impl TemplateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `markup` and return the identifier this use-site refers to
    pub fn intern(&mut self, markup: TemplateMarkup) -> String {
        self.use_sites += 1;
        let key = markup.key();
        if let Some(template) = self.templates.get_mut(&key) {
            template.uses += 1;
            let alias = format!("$$_templ_{}", self.use_sites);
            tracing::trace!(template = %template.name, alias = %alias, "reusing template");
            self.aliases.push((alias.clone(), template.name.clone()));
            return alias;
        }

        let name = match self.templates.len() {
            0 => "$$_templ".to_string(),
            n => format!("$$_templ{}", n + 1),
        };
        tracing::trace!(template = %name, "interned template");
        self.templates.insert(key, Template { name: name.clone(), markup, uses: 1 });
        name
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    /// `(alias, template name)` pairs in use-site order
    pub fn aliases(&self) -> &[(String, String)] {
        &self.aliases
    }

    /// Declarations for every template followed by every alias
    pub fn declarations(&self) -> Vec<String> {
        self.templates
            .values()
            .map(|t| format!("const {} = {};", t.name, t.markup.initializer()))
            .chain(self.aliases.iter().map(|(alias, name)| format!("const {alias} = {name};")))
            .collect()
    }
}
