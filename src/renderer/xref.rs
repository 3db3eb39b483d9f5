use crate::parser::{DocletKind, Forest};
use crate::renderer::components::TypeRenderer;

/// The js-domain role used to cross-reference a doclet of `kind`, if any.
pub fn role_for(kind: &DocletKind) -> Option<&'static str> {
    match kind {
        DocletKind::Class => Some("js:class"),
        DocletKind::Constant => Some("js:data"),
        DocletKind::Function => Some("js:func"),
        DocletKind::Member => Some("js:attr"),
        DocletKind::Method => Some("js:meth"),
        DocletKind::Module => Some("js:mod"),
        _ => None,
    }
}

/// Turns type and entity names into cross-reference roles when they name a
/// documented doclet.
#[derive(Debug, Clone, Copy)]
pub struct CrossReferencer<'a> {
    forest: &'a Forest,
}

impl<'a> CrossReferencer<'a> {
    pub fn new(forest: &'a Forest) -> Self {
        Self { forest }
    }

    /// Short names win over longnames.
    pub fn role(&self, name: &str) -> Option<&'static str> {
        let doclet = self
            .forest
            .by_name(name)
            .or_else(|| self.forest.by_longname(name))?;
        role_for(&doclet.kind)
    }

    /// ``:js:class:`Name` `` for known entities, the bare name otherwise.
    pub fn xref(&self, name: &str) -> String {
        match self.role(name) {
            Some(role) => format!(":{role}:`{name}`"),
            None => name.to_string(),
        }
    }

    /// Cross-reference each member of a type union and join them with an
    /// escaped pipe.
    pub fn xref_union(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|name| match self.role(name) {
                Some(role) => format!(":{role}:`{}`", TypeRenderer::escape(name)),
                None => TypeRenderer::escape(name),
            })
            .collect::<Vec<_>>()
            .join(TypeRenderer::UNION_SEPARATOR)
    }
}
