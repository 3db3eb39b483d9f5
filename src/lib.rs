//! # autojsdoc
//!
//! Renders the doclets of a JSDoc structure file (`jsdoc -X`) as Sphinx
//! js-domain markup.
//!
//! The structure file is a flat list of records. [`Forest::build`] merges the
//! records that describe the same entity and links each doclet to the one its
//! `memberof` names. [`AutoDirective`] then selects doclets by kind and
//! longname pattern and renders each selected tree into a [`MarkupBuffer`]
//! of lines tagged with the JS source they came from.
//!
//! ```no_run
//! use autojsdoc::{AutoDirective, RenderOptions, StructureCache};
//!
//! let forest = StructureCache::global().get_or_build("structure.json".as_ref())?;
//! let directive = AutoDirective::from_name(&forest, "js:automodule", RenderOptions::default())?;
//! let markup = directive.run(&["my/module".to_string()])?;
//! print!("{}", markup.to_text());
//! # Ok::<(), autojsdoc::Error>(())
//! ```

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod renderer;

pub use cache::{FsLoader, StructureCache, StructureLoader};
pub use config::{Config, DirectiveOptions, Members, ResolvedOptions};
pub use diagnostics::{Diagnostic, Severity};
pub use error::Error;
pub use parser::*;
pub use renderer::*;
