use std::collections::HashSet;

use regex::Regex;

use crate::error::Error;
use crate::parser::*;
use crate::renderer::output::{MarkupBuffer, MarkupConsumer};
use crate::renderer::traits::*;

const DIRECTIVE_PREFIX: &str = "js:auto";

/// `js:automodule` -> `module`. Names without the prefix pass through.
pub fn strip_directive(name: &str) -> &str {
    name.strip_prefix(DIRECTIVE_PREFIX).unwrap_or(name)
}

/// Documents every doclet of one kind whose longname matches the given
/// patterns.
pub struct AutoDirective<'a> {
    forest: &'a Forest,
    kind: DocletKind,
    options: RenderOptions,
}

impl<'a> AutoDirective<'a> {
    pub fn new(forest: &'a Forest, kind: DocletKind, options: RenderOptions) -> Self {
        Self {
            forest,
            kind,
            options,
        }
    }

    /// Build from a directive name such as `js:autoclass` or plain `class`.
    pub fn from_name(forest: &'a Forest, name: &str, options: RenderOptions) -> Result<Self, Error> {
        match DocletKind::from_tag(Some(strip_directive(name))) {
            DocletKind::Other(_) | DocletKind::Untyped => Err(Error::UnknownDirective {
                name: name.to_string(),
            }),
            kind => Ok(Self::new(forest, kind, options)),
        }
    }

    pub fn kind(&self) -> &DocletKind {
        &self.kind
    }

    /// The doclets `run` would render, in render order.
    ///
    /// Each pattern contributes its matches sorted by longname. A doclet
    /// already matched by an earlier pattern is skipped, so a caller can list
    /// the main entity first and then sweep up the rest.
    pub fn select(&self, patterns: &[String]) -> Result<Vec<DocletId>, Error> {
        let regexes = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut visited: HashSet<&str> = HashSet::new();
        let mut selected = Vec::new();

        for regex in &regexes {
            let mut matches: Vec<(DocletId, &Doclet)> = self
                .forest
                .doclets()
                .filter(|(_, d)| {
                    d.kind == self.kind
                        && regex.is_match(&d.longname)
                        && !visited.contains(d.longname.as_str())
                })
                .collect();
            matches.sort_by(|(_, a), (_, b)| a.longname.cmp(&b.longname));

            for (id, doclet) in matches {
                visited.insert(&doclet.longname);
                selected.push(id);
            }
        }

        Ok(selected)
    }

    /// Render the selected doclets, depth first, into one buffer.
    pub fn run(&self, patterns: &[String]) -> Result<MarkupBuffer, Error> {
        let selected = self.select(patterns)?;
        let context = RenderContext::new(self.forest, &self.options);
        let mut out = MarkupBuffer::new();

        for id in selected {
            self.forest.get(id).render(&context, &mut out);
        }

        tracing::debug!(kind = %self.kind, lines = out.len(), "rendered directive");
        Ok(out)
    }
}

/// Hand the markup to its consumer. If the consumer rejects it, the whole
/// buffer goes to the log before the error is returned.
pub fn render_into<C: MarkupConsumer>(markup: &MarkupBuffer, consumer: &mut C) -> Result<C::Output, Error> {
    consumer.consume(markup).map_err(|e| {
        tracing::error!("{}", markup.pprint());
        Error::Markup(Box::new(e))
    })
}
