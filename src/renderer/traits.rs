use crate::config::Members;
use crate::parser::{Forest, SourceLocation};
use crate::renderer::output::MarkupBuffer;
use crate::renderer::xref::CrossReferencer;

/// Columns added for each nested directive body.
pub const INDENT_STEP: usize = 3;

/// Per-invocation rendering switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub members: Members,
    pub title: bool,
}

/// State threaded through one recursive render call.
///
/// Indentation is carried here, never stored on doclets. `location` is the
/// source of the doclet currently being rendered; every line emitted through
/// the context, blank ones included, is tagged with it.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub forest: &'a Forest,
    pub options: &'a RenderOptions,
    pub xref: CrossReferencer<'a>,
    pub indent: usize,
    pub location: SourceLocation,
}

impl<'a> RenderContext<'a> {
    pub fn new(forest: &'a Forest, options: &'a RenderOptions) -> Self {
        Self {
            forest,
            options,
            xref: CrossReferencer::new(forest),
            indent: 0,
            location: SourceLocation::unknown(),
        }
    }

    pub fn with_indent(&self, indent: usize) -> Self {
        Self {
            indent,
            ..self.clone()
        }
    }

    /// One directive-body level deeper.
    pub fn nested(&self) -> Self {
        self.with_indent(self.indent + INDENT_STEP)
    }

    pub fn located(&self, location: SourceLocation) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }

    /// Append `text`, one indented line per line of input. Empty text emits
    /// nothing.
    pub fn emit(&self, out: &mut MarkupBuffer, text: &str) {
        let pad = " ".repeat(self.indent);
        for line in text.lines() {
            out.push(format!("{pad}{line}"), self.location.clone());
        }
    }

    pub fn blank(&self, out: &mut MarkupBuffer) {
        out.push(String::new(), self.location.clone());
    }
}

/// Core rendering trait for doclets and the records nested inside them.
pub trait Render {
    fn render(&self, context: &RenderContext<'_>, out: &mut MarkupBuffer);
}
