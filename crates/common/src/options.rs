//! Transform options for the template compiler

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MODULE, DELEGATED_EVENTS};
use crate::error::Result;

/// Which kind of code the compiler emits
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    /// Build DOM nodes on the client by cloning templates
    #[default]
    Dom,
    /// Build DOM nodes that can adopt server-rendered markup
    HydratableDom,
    /// Render markup strings on the server
    Ssr,
}

/// Configuration options for the JSX transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// The module to import runtime helpers from
    pub module_name: String,

    pub target: Target,

    /// SSR only: emit hydration markers so the output can be hydrated
    pub hydratable: bool,

    /// Whether to delegate events
    pub delegate_events: bool,

    /// Extra event names treated as delegatable
    pub delegated_events: Vec<String>,

    /// Whether to generate source maps
    pub sourcemap: bool,

    /// Source filename, used for parsing, diagnostics and source maps
    pub filename: String,

    /// Comment marker that pins an expression to a one-time read
    pub static_marker: String,

    /// Comment marker that forces an expression to be tracked
    pub reactive_marker: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE.to_string(),
            target: Target::Dom,
            hydratable: false,
            delegate_events: false,
            delegated_events: vec![],
            sourcemap: false,
            filename: "input.jsx".to_string(),
            static_marker: "@once".to_string(),
            reactive_marker: "@reactive".to_string(),
        }
    }
}

impl TransformOptions {
    pub fn with_target(target: Target) -> Self {
        Self { target, ..Self::default() }
    }

    /// Parse options from a JSON object such as `{"target": "ssr"}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether hydration markers appear in emitted markup
    pub fn emits_markers(&self) -> bool {
        match self.target {
            Target::Dom => false,
            Target::HydratableDom => true,
            Target::Ssr => self.hydratable,
        }
    }

    /// Whether a listener for `event` goes through document-level delegation
    pub fn is_delegated(&self, event: &str) -> bool {
        self.delegate_events
            && (DELEGATED_EVENTS.contains(event) || self.delegated_events.iter().any(|e| e == event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let options = TransformOptions::from_json("{}").unwrap();
        assert_eq!(options, TransformOptions::default());
        assert_eq!(options.module_name, "templ/runtime");
        assert!(!options.delegate_events);
    }

    #[test]
    fn test_camel_case_keys() {
        let options = TransformOptions::from_json(
            r#"{"target": "hydratable-dom", "delegateEvents": true, "delegatedEvents": ["custom"], "sourcemap": true}"#,
        )
        .unwrap();
        assert_eq!(options.target, Target::HydratableDom);
        assert!(options.sourcemap);
        assert!(options.is_delegated("click"));
        assert!(options.is_delegated("custom"));
        assert!(!options.is_delegated("scroll"));
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        assert!(TransformOptions::from_json(r#"{"target": "universal"}"#).is_err());
    }

    #[test]
    fn test_markers_follow_target() {
        assert!(!TransformOptions::with_target(Target::Dom).emits_markers());
        assert!(TransformOptions::with_target(Target::HydratableDom).emits_markers());
        let ssr = TransformOptions { hydratable: true, ..TransformOptions::with_target(Target::Ssr) };
        assert!(ssr.emits_markers());
    }
}
