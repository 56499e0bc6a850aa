//! Functions invoked by the subcommands.

use clap::{Arg, ArgMatches};

use gpd::{ConvertOptions, GffType};

pub mod gff_to_gpd;
pub mod stats;

const TEMPLATE_SUBCMD: &str = "
USAGE:
    {usage}

ARGS:
{positionals}

OPTIONS:
{unified}";


/// Arguments controlling how the input annotation is parsed.
fn parsing_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("input")
            .value_name("input")
            .help("Path to input annotation file or '-' for stdin")
            .takes_value(true)
            .required(true),
        Arg::with_name("gtf")
            .long("gtf")
            .help("Parses the input as GTF instead of GFF3"),
        Arg::with_name("gene_id_attr")
            .long("gene-id-attr")
            .value_name("key")
            .help("Attribute key of gene identifiers")
            .takes_value(true)
            .default_value("gene_id"),
        Arg::with_name("transcript_id_attr")
            .long("transcript-id-attr")
            .value_name("key")
            .help("Attribute key of transcript identifiers")
            .takes_value(true)
            .default_value("transcript_id"),
        Arg::with_name("seq_prefix")
            .long("seq-prefix")
            .value_name("prefix")
            .help("Prefix added to all sequence names")
            .takes_value(true),
        Arg::with_name("seq_lstrip")
            .long("seq-lstrip")
            .value_name("str")
            .help("String removed from the start of sequence names")
            .takes_value(true),
    ]
}

/// Creates conversion options from the parsing arguments.
fn convert_options(args: &ArgMatches) -> ConvertOptions {
    let defaults = ConvertOptions::default();
    ConvertOptions {
        gff_type: if args.is_present("gtf") { GffType::Gtf2 } else { GffType::Gff3 },
        gene_id_attr: args.value_of("gene_id_attr")
            .map(|v| v.to_owned())
            .unwrap_or(defaults.gene_id_attr),
        transcript_id_attr: args.value_of("transcript_id_attr")
            .map(|v| v.to_owned())
            .unwrap_or(defaults.transcript_id_attr),
        seq_name_prefix: args.value_of("seq_prefix").map(|v| v.to_owned()),
        seq_name_lstrip: args.value_of("seq_lstrip").map(|v| v.to_owned()),
    }
}
