//! Templ JSX OXC Compiler
//!
//! Compiles JSX templates into imperative code for three targets: direct DOM
//! construction, DOM construction that adopts server markup (hydration), and
//! server-side string rendering.
//!
//! ## Usage
//!
//! ```rust
//! use templ_jsx_oxc::{transform, Target, TransformOptions};
//!
//! let source = r#"<div class="hello">{count()}</div>"#;
//! let options = TransformOptions::with_target(Target::Ssr);
//! let result = transform(source, Some(options)).unwrap();
//! println!("{}", result.code);
//! ```

pub use common::{
    CompileError, Diagnostic, DiagnosticKind, DiagnosticSeverity, DiagnosticSink, Result, Target, TransformOptions,
};
pub use oxc_sourcemap::SourceMap;

use common::{Lowering, Printer};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;

use dom::DomTransform;
use ssr::SsrTransform;

/// Result of a transform operation
#[derive(Debug)]
pub struct TransformOutput {
    /// The transformed code
    pub code: String,
    /// Source map (if enabled)
    pub map: Option<SourceMap>,
    /// Recoverable issues found while compiling
    pub diagnostics: Vec<Diagnostic>,
}

/// Transform JSX source code, collecting diagnostics into the output
pub fn transform(source: &str, options: Option<TransformOptions>) -> Result<TransformOutput> {
    let options = options.unwrap_or_default();
    let mut diagnostics = Vec::new();
    let (code, map) = transform_with_sink(source, &options, &mut diagnostics)?;
    Ok(TransformOutput { code, map, diagnostics })
}

/// Transform JSX source code, reporting diagnostics to `sink` as they are found
pub fn transform_with_sink(
    source: &str,
    options: &TransformOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<(String, Option<SourceMap>)> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(&options.filename)
        .unwrap_or(SourceType::tsx())
        .with_jsx(true);

    let parsed = Parser::new(&allocator, source, source_type).parse();
    if parsed.panicked || !parsed.errors.is_empty() {
        let message = parsed.errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        return Err(CompileError::Parse { filename: options.filename.clone(), message });
    }
    let program = parsed.program;

    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let roots = Lowering::new(source, options, &scoping, sink).collect_roots(&program);

    let compiled = match options.target {
        Target::Dom | Target::HydratableDom => DomTransform::new(options).transform(&roots, sink)?,
        Target::Ssr => SsrTransform::new(options).transform(&roots, sink)?,
    };
    tracing::debug!(
        filename = %options.filename,
        target = ?options.target,
        roots = roots.len(),
        templates = compiled.templates.len(),
        helpers = compiled.helpers.len(),
        "compiled jsx"
    );

    let output = Printer::new(source, options).print(compiled)?;
    Ok((output.code, output.map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_element() {
        let result = transform(r#"<div class="hello">world</div>"#, None).unwrap();
        assert!(result.code.contains(r#"template("<div class=\"hello\">world</div>")"#));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_typescript_filename_keeps_jsx() {
        let options = TransformOptions { filename: "view.tsx".into(), ..TransformOptions::default() };
        let result = transform("const a = <b>{x as string}</b>;", Some(options)).unwrap();
        assert!(result.code.contains("insert(_el$1, x as string)"));
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        let err = transform("<div>", None).unwrap_err();
        assert!(matches!(err, CompileError::Parse { .. }));
    }

    #[test]
    fn test_sink_receives_diagnostics() {
        let options = TransformOptions::default();
        let mut sink = Vec::new();
        let (code, map) = transform_with_sink("<div $foo:bar={x} />", &options, &mut sink).unwrap();
        assert!(code.contains(r#"setAttribute(_el$1, "bar", x)"#));
        assert!(map.is_none());
        assert_eq!(sink.len(), 1);
    }
}
