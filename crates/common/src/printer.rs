//! Final assembly of a compiled file
//!
//! Targets hand over one replacement per JSX root. The printer adds the
//! import statement and template declarations, splices the replacements into
//! the untouched source, and builds the source map.

use indexmap::IndexSet;
use oxc_sourcemap::{SourceMap, SourceMapBuilder};
use oxc_span::Span;

use crate::emit::Emitted;
use crate::error::{CompileError, Result};
use crate::expression::js_string;
use crate::options::TransformOptions;
use crate::template::TemplateTable;

/// Generated code standing in for the source text under `span`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub span: Span,
    pub code: Emitted,
}

/// Everything one target produced for a file
#[derive(Debug, Default)]
pub struct CompiledProgram {
    /// In source order
    pub replacements: Vec<Replacement>,
    /// Runtime helpers in first-use order
    pub helpers: IndexSet<&'static str>,
    pub templates: TemplateTable,
    /// Statements appended after the rewritten source
    pub epilogue: Vec<String>,
}

#[derive(Debug)]
pub struct PrintOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

pub struct Printer<'s> {
    source: &'s str,
    options: &'s TransformOptions,
}

impl<'s> Printer<'s> {
    pub fn new(source: &'s str, options: &'s TransformOptions) -> Self {
        Self { source, options }
    }

    pub fn print(&self, program: CompiledProgram) -> Result<PrintOutput> {
        let mut out = Emitted::new();

        if !program.helpers.is_empty() {
            let names: Vec<&str> = program.helpers.iter().copied().collect();
            out.push_str(&format!(
                "import {{ {} }} from {};\n",
                names.join(", "),
                js_string(&self.options.module_name)
            ));
        }
        for declaration in program.templates.declarations() {
            out.push_str(&declaration);
            out.push_str("\n");
        }

        let mut cursor = 0u32;
        for replacement in program.replacements {
            let span = replacement.span;
            if span.start < cursor || span.end < span.start {
                return Err(CompileError::invariant(format!(
                    "replacement at {}..{} overlaps earlier output",
                    span.start, span.end
                )));
            }
            self.copy_source(&mut out, cursor, span.start)?;
            out.append(replacement.code);
            cursor = span.end;
        }
        self.copy_source(&mut out, cursor, self.source.len() as u32)?;

        if !program.epilogue.is_empty() {
            if !out.code.ends_with('\n') {
                out.push_str("\n");
            }
            out.push_str(&program.epilogue.join("\n"));
            out.push_str("\n");
        }

        let map = self.options.sourcemap.then(|| self.source_map(&out));
        Ok(PrintOutput { code: out.code, map })
    }

    /// Copy source text unchanged, mapping the start of every line
    fn copy_source(&self, out: &mut Emitted, start: u32, end: u32) -> Result<()> {
        let text = self
            .source
            .get(start as usize..end as usize)
            .ok_or_else(|| CompileError::invariant(format!("span {start}..{end} is outside the source")))?;
        if text.is_empty() {
            return Ok(());
        }
        let mut origin = start;
        for line in text.split_inclusive('\n') {
            out.mark(origin);
            out.push_str(line);
            origin += line.len() as u32;
        }
        Ok(())
    }

    fn source_map(&self, out: &Emitted) -> SourceMap {
        let mut builder = SourceMapBuilder::default();
        let source_id = builder.set_source_and_content(&self.options.filename, self.source);
        let generated = LineIndex::new(&out.code);
        let original = LineIndex::new(self.source);
        for &(at, origin) in &out.marks {
            let (Some((dst_line, dst_col)), Some((src_line, src_col))) =
                (generated.position(at), original.position(origin as usize))
            else {
                continue;
            };
            builder.add_token(dst_line, dst_col, src_line, src_col, Some(source_id), None);
        }
        builder.into_sourcemap()
    }
}

/// Byte offsets to zero-based `(line, UTF-16 column)` pairs
struct LineIndex<'t> {
    text: &'t str,
    starts: Vec<usize>,
}

impl<'t> LineIndex<'t> {
    fn new(text: &'t str) -> Self {
        let starts = std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1)).collect();
        Self { text, starts }
    }

    fn position(&self, offset: usize) -> Option<(u32, u32)> {
        let line = self.starts.partition_point(|&start| start <= offset).checked_sub(1)?;
        let column = self.text.get(self.starts[line]..offset)?.encode_utf16().count();
        Some((line as u32, column as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateMarkup;

    fn program(start: u32, end: u32, code: &str) -> CompiledProgram {
        let mut program = CompiledProgram::default();
        program.helpers.insert("template");
        program.helpers.insert("clone");
        program.templates.intern(TemplateMarkup::Html { html: "<div></div>".into(), svg: false });
        program.replacements.push(Replacement { span: Span::new(start, end), code: Emitted::mapped(code, start) });
        program
    }

    #[test]
    fn test_prints_import_declarations_and_splices() {
        let source = "const a = <div></div>;\nexport default a;\n";
        let options = TransformOptions::default();
        let output = Printer::new(source, &options)
            .print(program(10, 21, "clone($$_templ)"))
            .unwrap();
        insta::assert_snapshot!(output.code.trim_end(), @r#"
        import { template, clone } from "templ/runtime";
        const $$_templ = template("<div></div>");
        const a = clone($$_templ);
        export default a;
        "#);
        assert!(output.map.is_none());
    }

    #[test]
    fn test_overlapping_replacements_are_rejected() {
        let source = "<a></a>";
        let options = TransformOptions::default();
        let mut compiled = CompiledProgram::default();
        compiled.replacements.push(Replacement { span: Span::new(0, 7), code: Emitted::mapped("x", 0) });
        compiled.replacements.push(Replacement { span: Span::new(3, 7), code: Emitted::mapped("y", 3) });
        let err = Printer::new(source, &options).print(compiled).unwrap_err();
        assert!(matches!(err, CompileError::Invariant(_)));
    }

    #[test]
    fn test_source_map_points_at_jsx() {
        let source = "let a;\nconst b = <div></div>;";
        let options = TransformOptions { sourcemap: true, ..TransformOptions::default() };
        let output = Printer::new(source, &options)
            .print(program(17, 28, "clone($$_templ)"))
            .unwrap();
        let map = output.map.unwrap();
        let json = map.to_json_string();
        assert!(json.contains("input.jsx"));
        // import + declaration lines, then `let a;`, then `const b = clone(...)`
        let token = map
            .get_tokens()
            .find(|token| token.get_dst_line() == 3 && token.get_dst_col() == 10)
            .unwrap();
        assert_eq!((token.get_src_line(), token.get_src_col()), (1, 10));
    }

    #[test]
    fn test_line_index_counts_utf16_columns() {
        let index = LineIndex::new("a\n€b");
        assert_eq!(index.position(0), Some((0, 0)));
        assert_eq!(index.position(2), Some((1, 0)));
        assert_eq!(index.position(5), Some((1, 1)));
    }
}
