use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parser::forest::Forest;

/// `memberof` target JSDoc emits for unnamed scopes.
pub const ANONYMOUS_SCOPE: &str = "<anonymous>";

const MODULE_PREFIX: &str = "module:";

/// Replace all runs of whitespace with one space.
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index of a merged doclet inside its [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocletId(pub(crate) usize);

impl DocletId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The JSDoc `kind` tag, closed over the kinds we know how to render.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocletKind {
    Module,
    Class,
    Function,
    Method,
    /// JSDoc calls attributes and variables `member`.
    Member,
    Constant,
    File,
    Package,
    /// A kind tag we do not render specially (`typedef`, `event`, ...).
    Other(String),
    /// No kind tag at all.
    Untyped,
}

impl DocletKind {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            None => DocletKind::Untyped,
            Some("module") => DocletKind::Module,
            Some("class") => DocletKind::Class,
            Some("function") => DocletKind::Function,
            Some("method") => DocletKind::Method,
            Some("member") => DocletKind::Member,
            Some("constant") => DocletKind::Constant,
            Some("file") => DocletKind::File,
            Some("package") => DocletKind::Package,
            Some(other) => DocletKind::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            DocletKind::Module => Some("module"),
            DocletKind::Class => Some("class"),
            DocletKind::Function => Some("function"),
            DocletKind::Method => Some("method"),
            DocletKind::Member => Some("member"),
            DocletKind::Constant => Some("constant"),
            DocletKind::File => Some("file"),
            DocletKind::Package => Some("package"),
            DocletKind::Other(tag) => Some(tag),
            DocletKind::Untyped => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, DocletKind::Function | DocletKind::Method)
    }
}

impl fmt::Display for DocletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag().unwrap_or("<untyped>"))
    }
}

/// Where a doclet (or a line rendered for it) came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub path: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Sentinel for doclets with no location anywhere up their parent chain.
    pub fn unknown() -> Self {
        Self::new("<unknown>", 0)
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

// Raw records as they appear in the structure file

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    #[serde(default)]
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paramnames: Option<Vec<String>>,
}

/// The extractor's view of where a doclet lives in the JS sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeMeta>,
}

impl Meta {
    /// `path` joined with `filename`, or whichever of the two is present.
    pub fn source_path(&self) -> Option<String> {
        match (&self.path, &self.filename) {
            (Some(dir), Some(file)) => Some(Path::new(dir).join(file).display().to_string()),
            (None, Some(file)) => Some(file.clone()),
            (Some(dir), None) => Some(dir.clone()),
            (None, None) => None,
        }
    }

    /// False for a `meta` that only carries `code`.
    pub fn has_location(&self) -> bool {
        self.source_path().is_some() || self.lineno.is_some()
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(
            self.source_path().unwrap_or_else(|| "<unknown>".to_string()),
            self.lineno.unwrap_or(0),
        )
    }
}

/// Anything carrying a JSDoc type union.
pub trait Typed {
    fn type_names(&self) -> &[String];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnValue {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Throws {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

macro_rules! impl_typed {
    ($($ty:ty),*) => {
        $(impl Typed for $ty {
            fn type_names(&self) -> &[String] {
                self.type_spec.as_ref().map_or(&[], |t| t.names.as_slice())
            }
        })*
    };
}

impl_typed!(Param, ReturnValue, Throws, Doclet);

impl Param {
    pub fn describe(&self) -> String {
        normalize_space(self.description.as_deref().unwrap_or_default())
    }
}

impl ReturnValue {
    pub fn describe(&self) -> String {
        normalize_space(self.description.as_deref().unwrap_or_default())
    }
}

impl Throws {
    pub fn describe(&self) -> String {
        normalize_space(self.description.as_deref().unwrap_or_default())
    }
}

/// A `@see` entry: a link target followed by optional free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeeRef {
    pub link: String,
    pub description: String,
}

impl SeeRef {
    /// Split `"target some text"` or `"{@link target} some text"`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(rest) = raw.strip_prefix("{@link") {
            if let Some((inner, tail)) = rest.split_once('}') {
                let inner = inner.trim();
                let link = inner
                    .split(|c: char| c == '|' || c.is_whitespace())
                    .next()
                    .unwrap_or(inner);
                return Self {
                    link: link.to_string(),
                    description: normalize_space(tail),
                };
            }
        }
        match raw.split_once(char::is_whitespace) {
            Some((link, rest)) => Self {
                link: link.to_string(),
                description: normalize_space(rest),
            },
            None => Self {
                link: raw.to_string(),
                description: String::new(),
            },
        }
    }

    /// Protocol-qualified links are left alone by cross-referencing.
    pub fn is_external(&self) -> bool {
        self.link.contains("://")
    }

    fn to_raw(&self) -> String {
        if self.description.is_empty() {
            self.link.clone()
        } else {
            format!("{} {}", self.link, self.description)
        }
    }
}

/// One entry of the structure file, exactly as deserialized.
///
/// Keys we know about get explicit fields; anything else is preserved in
/// `extra` so that a record survives a round trip through [`Doclet`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub longname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memberof: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub undocumented: bool,
    #[serde(default)]
    pub ignore: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Param>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Vec<ReturnValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceptions: Option<Vec<Throws>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub see: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A documented JS entity, built from a [`Record`] and linked into a
/// [`Forest`].
#[derive(Debug, Clone)]
pub struct Doclet {
    pub kind: DocletKind,
    pub longname: String,
    pub name: Option<String>,
    pub memberof: Option<String>,
    pub description: String,
    pub comment: String,
    pub undocumented: bool,
    pub ignore: bool,
    pub meta: Option<Meta>,
    pub type_spec: Option<TypeSpec>,
    pub params: Vec<Param>,
    pub returns: Vec<ReturnValue>,
    pub exceptions: Vec<Throws>,
    pub see: Vec<SeeRef>,
    pub files: Vec<String>,
    pub extra: BTreeMap<String, Value>,
    pub(crate) parent: Option<DocletId>,
    pub(crate) children: Vec<DocletId>,
    pub(crate) file_children: Vec<DocletId>,
}

impl Doclet {
    /// Select the variant from the record's `kind` tag and take over its
    /// attributes.
    pub fn from_record(record: Record) -> Self {
        Self {
            kind: DocletKind::from_tag(record.kind.as_deref()),
            longname: record.longname,
            name: record.name,
            memberof: record.memberof,
            description: record.description.unwrap_or_default(),
            comment: record.comment.unwrap_or_default(),
            undocumented: record.undocumented,
            ignore: record.ignore,
            meta: record.meta,
            type_spec: record.type_spec,
            params: record.params.unwrap_or_default(),
            returns: record.returns.unwrap_or_default(),
            exceptions: record.exceptions.unwrap_or_default(),
            see: record
                .see
                .unwrap_or_default()
                .iter()
                .map(|raw| SeeRef::parse(raw))
                .collect(),
            files: record.files.unwrap_or_default(),
            extra: record.extra,
            parent: None,
            children: Vec::new(),
            file_children: Vec::new(),
        }
    }

    /// Inverse of [`Doclet::from_record`]. Tree links are not attributes and
    /// are not carried over.
    pub fn to_record(&self) -> Record {
        fn non_empty<T: Clone>(items: &[T]) -> Option<Vec<T>> {
            (!items.is_empty()).then(|| items.to_vec())
        }
        fn non_blank(text: &str) -> Option<String> {
            (!text.is_empty()).then(|| text.to_string())
        }

        Record {
            kind: self.kind.tag().map(str::to_string),
            longname: self.longname.clone(),
            name: self.name.clone(),
            memberof: self.memberof.clone(),
            description: non_blank(&self.description),
            comment: non_blank(&self.comment),
            undocumented: self.undocumented,
            ignore: self.ignore,
            meta: self.meta.clone(),
            type_spec: self.type_spec.clone(),
            params: non_empty(&self.params),
            returns: non_empty(&self.returns),
            exceptions: non_empty(&self.exceptions),
            see: (!self.see.is_empty()).then(|| self.see.iter().map(SeeRef::to_raw).collect()),
            files: non_empty(&self.files),
            extra: self.extra.clone(),
        }
    }

    pub fn is_documented(&self) -> bool {
        !self.undocumented
    }

    /// Attribute lookup for keys without a dedicated field.
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// The longname with JSDoc's `module:` prefix removed.
    pub fn module_name(&self) -> &str {
        self.longname
            .strip_prefix(MODULE_PREFIX)
            .unwrap_or(&self.longname)
    }

    pub fn describe(&self) -> String {
        normalize_space(&self.description)
    }

    /// `name (a, b)` with the documented parameters in declared order.
    pub fn signature(&self) -> String {
        let args: Vec<&str> = self
            .params
            .iter()
            .map(|p| p.name.as_deref().unwrap_or_default())
            .collect();
        format!("{} ({})", self.display_name(), args.join(", "))
    }

    /// Parameter names recovered from the code, if the extractor saw any.
    pub fn signature_param_names(&self) -> Option<&[String]> {
        self.meta
            .as_ref()?
            .code
            .as_ref()?
            .paramnames
            .as_deref()
    }

    /// The literal source of the value, for constants initialised from one.
    pub fn literal_value(&self) -> Option<String> {
        let value = self.meta.as_ref()?.code.as_ref()?.value.as_ref()?;
        match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn source_path(&self) -> Option<String> {
        self.meta.as_ref()?.source_path()
    }

    /// Location from this doclet's own `meta`, without consulting parents.
    pub fn own_location(&self) -> Option<SourceLocation> {
        self.meta
            .as_ref()
            .filter(|meta| meta.has_location())
            .map(Meta::location)
    }

    /// Own location, else the closest ancestor's, else the unknown sentinel.
    pub fn source_location(&self, forest: &Forest) -> SourceLocation {
        if let Some(location) = self.own_location() {
            return location;
        }
        let mut current = self.parent;
        // at most one step per doclet
        for _ in 0..forest.len() {
            let Some(id) = current else { break };
            let doclet = forest.get(id);
            if let Some(location) = doclet.own_location() {
                return location;
            }
            current = doclet.parent;
        }
        SourceLocation::unknown()
    }

    pub fn parent(&self) -> Option<DocletId> {
        self.parent
    }

    pub fn children(&self) -> &[DocletId] {
        &self.children
    }

    /// File doclets listed by a package, in the package's order.
    pub fn file_children(&self) -> &[DocletId] {
        &self.file_children
    }
}
