pub mod attrs;
pub mod check;
pub mod children;
pub mod classify;
pub mod constants;
pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod expression;
pub mod hole;
pub mod jsx;
pub mod options;
pub mod printer;
pub mod props;
pub mod template;

pub use check::*;
pub use classify::{Classification, StaticValue};
pub use constants::*;
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSeverity, DiagnosticSink};
pub use emit::{EmitHost, Emitted};
pub use error::{CompileError, Result};
pub use hole::{Hole, HoleKind, HoleValue, MergeGroup, SpreadGroup};
pub use jsx::{JsxNode, Lowering};
pub use options::*;
pub use printer::{CompiledProgram, PrintOutput, Printer, Replacement};
pub use template::{TemplateMarkup, TemplateTable};
