use std::io;

use clap::{App, Arg, ArgMatches, SubCommand};

use crate::tools::{convert_options, parsing_args, TEMPLATE_SUBCMD};
use crate::utils::{resolve_reader, STREAM_ARG};

pub const NAME: &str = "gff-to-gpd";


pub fn build_cli<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name(NAME)
        .about("Converts from the GFF3 or GTF format to a per-transcript table")
        .template(TEMPLATE_SUBCMD)
        .args(&parsing_args())
        .arg(Arg::with_name("output")
                .value_name("output")
                .help("Path to output table file or '-' for stdout")
                .takes_value(true)
                .required(true))
}

pub fn run(args: &ArgMatches) -> crate::Result<()> {
    let input = args.value_of("input").unwrap_or(STREAM_ARG);
    let output = args.value_of("output").unwrap_or(STREAM_ARG);
    let options = convert_options(args);
    debug!("converting {} to {} with {:?}", input, output, options);

    let stats = match (input, output) {
        (_, STREAM_ARG) => gpd::convert(resolve_reader(input)?, io::stdout(), &options)?,
        (STREAM_ARG, path) => gpd::convert_into_file(io::stdin(), path, &options)?,
        (in_path, out_path) => gpd::convert_file(in_path, out_path, &options)?,
    };
    info!("converted {} record(s) into {} transcript(s)",
          stats.num_records(), stats.num_transcripts());
    Ok(())
}
