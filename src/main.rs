use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use autojsdoc::{
    render_into, AutoDirective, Config, DirectiveOptions, LineWriter, Members, StructureCache,
};
use clap::{value_parser, Arg, ArgAction, Command};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("autojsdoc")
        .about("Render JSDoc structure files as Sphinx js-domain markup")
        .arg(
            Arg::new("directive")
                .help("Directive to run, e.g. js:automodule, js:autoclass or just `class`")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("patterns")
                .help("Regular expressions matched against doclet longnames")
                .required(true)
                .num_args(1..)
                .index(2),
        )
        .arg(
            Arg::new("structure-json")
                .long("structure-json")
                .value_name("PATH")
                .help("Structure file produced by `jsdoc -X`")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("members")
                .long("members")
                .value_name("NAMES")
                .num_args(0..=1)
                .default_missing_value("all")
                .help("Module members to document: all, none, or a comma separated list"),
        )
        .arg(
            Arg::new("title")
                .long("title")
                .action(ArgAction::SetTrue)
                .help("Emit a section title for each module"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Config file (default: ./autojsdoc.toml)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("origins")
                .long("origins")
                .action(ArgAction::SetTrue)
                .help("Prefix each line with the JS source it was generated from"),
        )
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let matches = cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?,
    };

    let options = DirectiveOptions {
        structure_json: matches.get_one::<PathBuf>("structure-json").cloned(),
        members: matches
            .get_one::<String>("members")
            .map(|arg| Members::parse(arg)),
        title: matches.get_flag("title"),
    };
    let resolved = options.resolve(&config)?;

    let forest = StructureCache::global()
        .get_or_build(&resolved.structure_json)
        .with_context(|| format!("failed to load {}", resolved.structure_json.display()))?;

    let directive = matches
        .get_one::<String>("directive")
        .context("missing directive")?;
    let patterns: Vec<String> = matches
        .get_many::<String>("patterns")
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    let markup = AutoDirective::from_name(&forest, directive, resolved.render)?.run(&patterns)?;

    let stdout = io::stdout();
    let mut writer = LineWriter::new(stdout.lock(), matches.get_flag("origins"));
    render_into(&markup, &mut writer)?;

    Ok(())
}
