//! Command-line options.
//!
//! The net comes either from a file (`--net net.json|.ron|.toml`) or from the
//! three compact text fields `--places`, `--marking` and `--transitions`.
//! Flags override values from the TOML config (`--config`, default
//! `pn-cover.toml`, ignored when absent).

use anyhow::{Result, bail};
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

use crate::config::{CoverConfig, OutputFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetSource {
    File(PathBuf),
    Inline {
        places: String,
        marking: String,
        transitions: String,
    },
}

fn make_options_parser() -> Command {
    Command::new("pn-cover")
        .no_binary_name(true)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Karp-Miller coverability tree and boundedness analysis for Petri nets")
        .arg(
            Arg::new("net")
                .short('n')
                .long("net")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Net description file (.json, .ron or .toml)")
                .conflicts_with_all(["places", "marking", "transitions"]),
        )
        .arg(
            Arg::new("places")
                .short('p')
                .long("places")
                .help("Comma-separated place names, e.g. \"P0, P1\""),
        )
        .arg(
            Arg::new("marking")
                .short('m')
                .long("marking")
                .allow_hyphen_values(true)
                .help("Comma-separated initial token counts, e.g. \"1, 0\""),
        )
        .arg(
            Arg::new("transitions")
                .short('t')
                .long("transitions")
                .allow_hyphen_values(true)
                .help("Transitions, e.g. \"t1:P0=1->P1=1, t2:P1=1->P0=1\""),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .default_value("pn-cover.toml"),
        )
        .arg(
            Arg::new("max-nodes")
                .long("max-nodes")
                .value_parser(value_parser!(usize))
                .help("Abort once the tree would exceed this many nodes"),
        )
        .arg(
            Arg::new("max-millis")
                .long("max-millis")
                .value_parser(value_parser!(u64))
                .help("Abort after this many milliseconds"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_parser(["text", "json"]),
        )
        .arg(
            Arg::new("ascii")
                .long("ascii")
                .action(ArgAction::SetTrue)
                .help("Print ω as `w`"),
        )
        .arg(
            Arg::new("dot")
                .long("dot")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Also write the tree as a Graphviz file"),
        )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub source: NetSource,
    pub config: PathBuf,
    pub max_nodes: Option<usize>,
    pub max_millis: Option<u64>,
    pub format: Option<OutputFormat>,
    pub ascii: bool,
    pub dot: Option<PathBuf>,
}

impl Options {
    pub fn parse_from_args<I, T>(flags: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = make_options_parser().try_get_matches_from(flags)?;

        let inline = |name: &str| matches.get_one::<String>(name).cloned();
        let source = match (
            matches.get_one::<PathBuf>("net"),
            inline("places"),
            inline("marking"),
            inline("transitions"),
        ) {
            (Some(path), ..) => NetSource::File(path.clone()),
            (None, Some(places), Some(marking), transitions) => NetSource::Inline {
                places,
                marking,
                transitions: transitions.unwrap_or_default(),
            },
            _ => bail!("either --net FILE or both --places and --marking must be given"),
        };

        let format = match matches.get_one::<String>("format").map(String::as_str) {
            Some("json") => Some(OutputFormat::Json),
            Some("text") => Some(OutputFormat::Text),
            _ => None,
        };

        Ok(Options {
            source,
            config: matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("pn-cover.toml")),
            max_nodes: matches.get_one::<usize>("max-nodes").copied(),
            max_millis: matches.get_one::<u64>("max-millis").copied(),
            format,
            ascii: matches.get_flag("ascii"),
            dot: matches.get_one::<PathBuf>("dot").cloned(),
        })
    }

    /// Applies command-line overrides on top of a loaded config.
    pub fn apply(&self, mut config: CoverConfig) -> CoverConfig {
        if self.max_nodes.is_some() {
            config.max_nodes = self.max_nodes;
        }
        if self.max_millis.is_some() {
            config.max_millis = self.max_millis;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.ascii {
            config.omega_symbol = "w".to_string();
        }
        config
    }
}
