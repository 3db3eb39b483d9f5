use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;
use crate::renderer::RenderOptions;

/// Which children of a module get rendered along with it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawMembers")]
pub enum Members {
    All,
    #[default]
    None,
    /// Only children whose short name is listed.
    Only(Vec<String>),
}

impl Members {
    /// Parse the `members` option: `all`/`true` (or no value), `none`/`false`,
    /// or a comma separated list of names.
    pub fn parse(arg: &str) -> Self {
        match arg.trim() {
            "" | "all" | "true" => Members::All,
            "none" | "false" => Members::None,
            list => Members::Only(split_names(list)),
        }
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            Members::All => true,
            Members::None => false,
            Members::Only(names) => names.iter().any(|n| n == name),
        }
    }
}

fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMembers {
    Flag(bool),
    Names(Vec<String>),
    Text(String),
}

impl From<RawMembers> for Members {
    fn from(raw: RawMembers) -> Self {
        match raw {
            RawMembers::Flag(true) => Members::All,
            RawMembers::Flag(false) => Members::None,
            RawMembers::Names(names) => Members::Only(names),
            RawMembers::Text(text) => Members::parse(&text),
        }
    }
}

/// Project-wide defaults for directive options, read from `autojsdoc.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub structure_json: Option<PathBuf>,
    pub members: Members,
    pub title: bool,
}

impl Config {
    pub const FILE_NAME: &'static str = "autojsdoc.toml";

    /// Load an explicitly named config file. A missing file is an error here.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Look for `autojsdoc.toml` in `root`, then in the user config directory.
    ///
    /// Falls back to defaults if neither exists, but a file that exists and is
    /// malformed is always an error.
    pub fn discover(root: &Path) -> Result<Self, Error> {
        let user = dirs::config_dir().map(|dir| dir.join("autojsdoc").join("config.toml"));
        let candidates = std::iter::once(root.join(Self::FILE_NAME)).chain(user);

        for path in candidates {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    tracing::debug!(path = %path.display(), "loaded config");
                    return Self::from_toml_str(&content);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => return Err(Error::Io { path, source }),
            }
        }
        Ok(Self::default())
    }
}

/// Options given on one directive invocation. Unset options fall back to the
/// [`Config`].
#[derive(Debug, Clone, Default)]
pub struct DirectiveOptions {
    pub structure_json: Option<PathBuf>,
    pub members: Option<Members>,
    /// A flag: present means on, absent means use the config.
    pub title: bool,
}

/// Options after config fallback, ready for rendering.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub structure_json: PathBuf,
    pub render: RenderOptions,
}

impl DirectiveOptions {
    pub fn resolve(&self, config: &Config) -> Result<ResolvedOptions, Error> {
        let structure_json = self
            .structure_json
            .clone()
            .or_else(|| config.structure_json.clone())
            .ok_or(Error::MissingOption {
                name: "structure_json",
            })?;

        Ok(ResolvedOptions {
            structure_json,
            render: RenderOptions {
                members: self
                    .members
                    .clone()
                    .unwrap_or_else(|| config.members.clone()),
                title: self.title || config.title,
            },
        })
    }
}
