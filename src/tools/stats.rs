use std::io::{self, Write};

use clap::{App, ArgMatches, SubCommand};
use gpd::AggregateStats;

use crate::tools::{convert_options, parsing_args, TEMPLATE_SUBCMD};
use crate::utils::resolve_reader;

pub const NAME: &str = "stats";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name(NAME)
        .about("Counts records, feature types, and transcripts")
        .template(TEMPLATE_SUBCMD)
        .args(&parsing_args())
}

pub fn run(args: &ArgMatches) -> crate::Result<()> {
    let input = args.value_of("input").unwrap_or(crate::utils::STREAM_ARG);
    let stats = gpd::collect_stats(resolve_reader(input)?, &convert_options(args))?;
    let stdout = io::stdout();
    write_stats(&stats, &mut stdout.lock())
}

/// Writes the counters as tab-separated key and value lines.
fn write_stats<W: Write>(stats: &AggregateStats, out: &mut W) -> crate::Result<()> {
    writeln!(out, "records\t{}", stats.num_records())?;
    writeln!(out, "transcripts\t{}", stats.num_transcripts())?;
    for (feature, count) in stats.feature_counts().iter() {
        writeln!(out, "feature:{}\t{}", feature, count)?;
    }
    Ok(())
}
