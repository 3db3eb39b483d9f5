use std::path::PathBuf;

/// Errors that fail a render request.
///
/// Problems inside the doclets themselves (dangling `memberof`, parameter
/// mismatches) are not errors; they are reported as diagnostics and the build
/// carries on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required option was given neither on the directive nor in the config.
    #[error(":{name}: option required in directive (or set {name} in autojsdoc.toml)")]
    MissingOption {
        /// Option name as spelled on the directive.
        name: &'static str,
    },

    /// The directive does not name a doclet kind we can select by.
    #[error("unknown directive: `{name}`")]
    UnknownDirective {
        /// Directive name as given, e.g. `js:autotypedef`.
        name: String,
    },

    /// A selection argument is not a valid regular expression.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The offending argument.
        pattern: String,
        /// The regex compiler's complaint.
        #[source]
        source: regex::Error,
    },

    /// Reading a structure or config file failed.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// The wrapped I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The structure file is not a JSON array of doclet records.
    #[error("malformed structure file {}: {source}", path.display())]
    Json {
        /// Structure file that failed to deserialize.
        path: PathBuf,
        /// The wrapped JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The config file exists but is not valid TOML for our schema.
    #[error("invalid config: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// The consumer of the rendered markup rejected it.
    #[error("markup parse failed: {0}")]
    Markup(#[source] Box<dyn std::error::Error + Send + Sync>),
}
