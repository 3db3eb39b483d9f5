use std::fmt::Write as _;
use std::io::{self, Write};

use crate::parser::SourceLocation;

/// Marker appended to every origin tag, identifying lines we synthesized.
pub const ORIGIN_MARKER: &str = "<autojsdoc>";

/// One line of generated markup and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupLine {
    pub text: String,
    pub source: SourceLocation,
    pub marker: &'static str,
}

impl MarkupLine {
    /// `path:line:<autojsdoc>`
    pub fn origin(&self) -> String {
        format!("{}:{}", self.source, self.marker)
    }
}

/// The ordered lines produced by one directive invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupBuffer {
    lines: Vec<MarkupLine>,
}

impl MarkupBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: String, source: SourceLocation) {
        self.lines.push(MarkupLine {
            text,
            source,
            marker: ORIGIN_MARKER,
        });
    }

    pub fn lines(&self) -> &[MarkupLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    /// The markup alone, newline terminated.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.text);
            text.push('\n');
        }
        text
    }

    /// Every line with its origin, for dumping into the log.
    pub fn pprint(&self) -> String {
        let mut dump = String::new();
        for line in &self.lines {
            let _ = writeln!(dump, "{}\t{}", line.origin(), line.text);
        }
        dump
    }
}

impl<'a> IntoIterator for &'a MarkupBuffer {
    type Item = &'a MarkupLine;
    type IntoIter = std::slice::Iter<'a, MarkupLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Whatever turns the generated markup into a document.
pub trait MarkupConsumer {
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    fn consume(&mut self, markup: &MarkupBuffer) -> Result<Self::Output, Self::Error>;
}

/// Writes markup lines to a stream, optionally prefixed with their origin.
pub struct LineWriter<W> {
    writer: W,
    origins: bool,
}

impl<W: Write> LineWriter<W> {
    pub fn new(writer: W, origins: bool) -> Self {
        Self { writer, origins }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MarkupConsumer for LineWriter<W> {
    type Output = usize;
    type Error = io::Error;

    fn consume(&mut self, markup: &MarkupBuffer) -> Result<usize, io::Error> {
        for line in markup {
            if self.origins {
                writeln!(self.writer, "{}\t{}", line.origin(), line.text)?;
            } else {
                writeln!(self.writer, "{}", line.text)?;
            }
        }
        self.writer.flush()?;
        Ok(markup.len())
    }
}
