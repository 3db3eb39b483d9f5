use std::collections::{BTreeSet, HashMap};

use crate::diagnostics::{Diagnostic, Severity};
use crate::error::Error;
use crate::parser::types::*;

/// The merged doclets of one structure file, linked into trees.
///
/// Doclets live in a single arena; parents and children are indexes into it.
/// The forest is never mutated once built.
#[derive(Debug, Default)]
pub struct Forest {
    doclets: Vec<Doclet>,
    names: HashMap<String, DocletId>,
    longnames: HashMap<String, DocletId>,
    diagnostics: Vec<Diagnostic>,
}

impl Forest {
    pub fn build(records: impl IntoIterator<Item = Record>) -> Self {
        merge_doclets(records)
    }

    /// Deserialize a structure file's contents and build the forest.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<Record> = serde_json::from_str(json)?;
        Ok(Self::build(records))
    }

    pub fn len(&self) -> usize {
        self.doclets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doclets.is_empty()
    }

    /// Panics if `id` was not handed out by this forest.
    pub fn get(&self, id: DocletId) -> &Doclet {
        &self.doclets[id.0]
    }

    /// Merged doclets in first-seen order.
    pub fn doclets(&self) -> impl Iterator<Item = (DocletId, &Doclet)> {
        self.doclets
            .iter()
            .enumerate()
            .map(|(index, doclet)| (DocletId(index), doclet))
    }

    pub fn roots(&self) -> impl Iterator<Item = (DocletId, &Doclet)> {
        self.doclets().filter(|(_, doclet)| doclet.parent.is_none())
    }

    pub fn id_by_longname(&self, longname: &str) -> Option<DocletId> {
        self.longnames.get(longname).copied()
    }

    pub fn id_by_name(&self, name: &str) -> Option<DocletId> {
        self.names.get(name).copied()
    }

    pub fn by_longname(&self, longname: &str) -> Option<&Doclet> {
        self.id_by_longname(longname).map(|id| self.get(id))
    }

    pub fn by_name(&self, name: &str) -> Option<&Doclet> {
        self.id_by_name(name).map(|id| self.get(id))
    }

    pub fn source_location(&self, id: DocletId) -> SourceLocation {
        self.get(id).source_location(self)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn report(&mut self, id: DocletId, severity: Severity, message: String) {
        let diagnostic = Diagnostic::new(severity, self.source_location(id), message);
        diagnostic.emit();
        self.diagnostics.push(diagnostic);
    }

    /// True if `candidate` is `id` or one of its ancestors.
    fn is_ancestor(&self, candidate: DocletId, id: DocletId) -> bool {
        let mut current = Some(id);
        while let Some(step) = current {
            if step == candidate {
                return true;
            }
            current = self.get(step).parent;
        }
        false
    }

    /// Parameters that are documented but not in the code, and the other way
    /// round.
    fn check_params(&self, id: DocletId) -> Vec<String> {
        let doclet = self.get(id);
        if !doclet.kind.is_callable() || !doclet.is_documented() {
            return Vec::new();
        }
        let Some(signature) = doclet.signature_param_names() else {
            return Vec::new();
        };

        let documented: BTreeSet<&str> = doclet
            .params
            .iter()
            .filter_map(|p| p.name.as_deref())
            .collect();
        let actual: BTreeSet<&str> = signature.iter().map(String::as_str).collect();

        let mut messages: Vec<String> = documented
            .difference(&actual)
            .map(|name| format!("Documented parameter {name} not found on signature"))
            .collect();
        messages.extend(
            actual
                .difference(&documented)
                .map(|name| format!("Undocumented parameter {name}")),
        );
        messages
    }

    /// Link every merged doclet to the doclet its `memberof` names.
    ///
    /// Runs only after merging, so every parent a doclet can name is already
    /// in the longname index. Unresolved doclets stay roots.
    fn make_forest(&mut self) {
        for index in 0..self.doclets.len() {
            let id = DocletId(index);
            let Some(memberof) = self.doclets[index].memberof.clone() else {
                continue;
            };

            match self.id_by_longname(&memberof) {
                Some(parent) if self.is_ancestor(id, parent) => {
                    if self.doclets[index].is_documented() {
                        let message = format!(
                            "Could not link up object {} to {}: it would become its own ancestor",
                            self.doclets[index].longname, memberof
                        );
                        self.report(id, Severity::Error, message);
                    }
                }
                Some(parent) => {
                    self.doclets[index].parent = Some(parent);
                    self.doclets[parent.0].children.push(id);
                }
                None => {
                    if !self.doclets[index].is_documented() {
                        continue;
                    }
                    let longname = &self.doclets[index].longname;
                    let message = if memberof == ANONYMOUS_SCOPE {
                        format!(
                            "Could not link up object {longname} to {memberof}. \
                             Try giving the anonymous object an @alias."
                        )
                    } else {
                        format!("Could not link up object {longname} to {memberof}")
                    };
                    self.report(id, Severity::Error, message);
                }
            }
        }

        self.link_package_files();
    }

    /// Resolve each package's `files` entries to the file doclets describing
    /// them, by source path or longname.
    fn link_package_files(&mut self) {
        let mut files: HashMap<String, DocletId> = HashMap::new();
        for (id, doclet) in self.doclets() {
            if doclet.kind != DocletKind::File {
                continue;
            }
            if let Some(path) = doclet.source_path() {
                files.entry(path).or_insert(id);
            }
            files.entry(doclet.longname.clone()).or_insert(id);
        }

        for doclet in &mut self.doclets {
            if doclet.kind != DocletKind::Package {
                continue;
            }
            let mut resolved = Vec::with_capacity(doclet.files.len());
            for path in &doclet.files {
                match files.get(path) {
                    Some(id) => resolved.push(*id),
                    None => tracing::debug!(package = %doclet.longname, file = %path, "no file doclet"),
                }
            }
            doclet.file_children = resolved;
        }
    }
}

/// Fold a later record for the same longname into the kept doclet.
///
/// Descriptions and comments are appended as-is, with no separator. The later
/// record's `meta` wins: JSDoc emits the code view after the comment view, and
/// the code view has the better line numbers and parameter names.
fn fold(kept: &mut Doclet, later: Doclet) {
    kept.undocumented &= later.undocumented;
    kept.comment.push_str(&later.comment);
    kept.description.push_str(&later.description);
    if later.meta.is_some() {
        kept.meta = later.meta;
    }
}

/// Merge all records sharing a longname into one doclet, then link the
/// survivors into a forest.
pub fn merge_doclets(records: impl IntoIterator<Item = Record>) -> Forest {
    let mut forest = Forest::default();
    // reported once linked, so locations can fall back to parents
    let mut mismatches: Vec<(DocletId, String)> = Vec::new();

    for record in records {
        let doclet = Doclet::from_record(record);
        match forest.longnames.get(&doclet.longname) {
            Some(&kept) => fold(&mut forest.doclets[kept.0], doclet),
            None => {
                let id = DocletId(forest.doclets.len());
                forest.longnames.insert(doclet.longname.clone(), id);
                if let Some(name) = &doclet.name {
                    forest.names.entry(name.clone()).or_insert(id);
                }
                forest.doclets.push(doclet);
                mismatches.extend(forest.check_params(id).into_iter().map(|m| (id, m)));
            }
        }
    }

    forest.make_forest();
    for (id, message) in mismatches {
        forest.report(id, Severity::Warning, message);
    }
    tracing::debug!(
        doclets = forest.len(),
        diagnostics = forest.diagnostics.len(),
        "built doclet forest"
    );
    forest
}

/// Load and build a forest from a structure file on disk.
pub fn load_forest(path: &std::path::Path) -> Result<Forest, Error> {
    let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Forest::from_json_str(&json).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}
