use anyhow::{Context, Result};
use log::debug;

use pn_cover::analysis::CoverabilityBuilder;
use pn_cover::config::{CoverConfig, OutputFormat};
use pn_cover::net::{NetDescription, io, parse};
use pn_cover::options::{NetSource, Options};
use pn_cover::report::{self, AnalysisReport};

fn load_description(source: &NetSource) -> Result<NetDescription> {
    match source {
        NetSource::File(path) => io::read_description(path)
            .with_context(|| format!("Failed to load net from {}", path.display())),
        NetSource::Inline {
            places,
            marking,
            transitions,
        } => Ok(parse::parse_description(places, marking, transitions)?),
    }
}

fn run(options: &Options) -> Result<()> {
    let config = options.apply(CoverConfig::load_from_file(&options.config)?);
    config.validate()?;
    debug!("effective config: {:?}", config);

    let net = load_description(&options.source)?.build()?;
    let tree = CoverabilityBuilder::new(&net)
        .with_limits(config.limits())
        .build()?;

    let render_options = config.render_options();
    if let Some(path) = &options.dot {
        report::write_dot(&tree, &render_options, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let analysis = AnalysisReport::new(&tree);
    match config.format {
        OutputFormat::Text => print!("{}", analysis.to_text(&render_options)),
        OutputFormat::Json => println!("{}", io::to_json_string(&analysis)?),
    }
    Ok(())
}

fn main() {
    if std::env::var("PN_LOG").is_ok() {
        let e = env_logger::Env::new()
            .filter("PN_LOG")
            .write_style("PN_LOG_STYLE");
        env_logger::init_from_env(e);
    }

    let options = match Options::parse_from_args(std::env::args_os().skip(1)) {
        Ok(options) => options,
        Err(err) => match err.downcast::<clap::Error>() {
            Ok(clap_err) => clap_err.exit(),
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(2);
            }
        },
    };
    debug!("options: {:?}", options);

    if let Err(err) = run(&options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
