use clap::{App, AppSettings, Arg, ArgMatches};
use log::Level;

use crate::tools;

const TEMPLATE: &str = "
{bin} {version}
{about}


USAGE:
    {usage}

SUBCOMMANDS:
{subcommands}

OPTIONS:
{unified}";

const ABOUT: &str = "
gpdtools flattens gene annotation files into per-transcript tables. Each
transcript is written as a single line listing its gene, span, strand, and
exon coordinates.";

/// Constructs a new `clap::App` for argument parsing.
pub fn build_cli() -> App<'static, 'static> {
    App::new("gpdtools")
        .version(crate_version!())
        .author(crate_authors!())
        .about(ABOUT)
        .template(TEMPLATE)
        .max_term_width(80)
        .settings(&[AppSettings::GlobalVersion,
                    AppSettings::SubcommandRequiredElseHelp,
                    AppSettings::DisableHelpSubcommand,
                    AppSettings::VersionlessSubcommands])
        .arg(Arg::with_name("verbose")
                 .short("v")
                 .long("verbose")
                 .help("Logs debug messages")
                 .conflicts_with("quiet"))
        .arg(Arg::with_name("quiet")
                 .short("q")
                 .long("quiet")
                 .help("Logs only warnings and errors"))
        .subcommand(tools::gff_to_gpd::build_cli())
        .subcommand(tools::stats::build_cli())
}

/// Returns the log level selected by the verbosity flags.
fn log_level(matches: &ArgMatches) -> Level {
    if matches.is_present("verbose") {
        Level::Debug
    } else if matches.is_present("quiet") {
        Level::Warn
    } else {
        Level::Info
    }
}

/// Runs the appropriate tool given the subcommand argument matches.
pub fn run(matches: ArgMatches) -> crate::Result<()> {
    simple_logger::init_with_level(log_level(&matches))?;
    match matches.subcommand() {
        (tools::stats::NAME, Some(m)) => tools::stats::run(m),
        (tools::gff_to_gpd::NAME, Some(m)) => tools::gff_to_gpd::run(m),
        // We should not reach this point since we already require
        // that subcommands must be present in the app settings.
        (other, _) => Err(crate::Error::Args(format!("unexpected subcommand: '{}'", other))),
    }
}
