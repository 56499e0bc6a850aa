/*! Aggregation of gene annotation features into per-transcript tables.

This crate reads feature-oriented annotation files (GFF3 or GTF), groups the features of each
transcript together, and writes one GPD-like row per transcript listing its gene, span, strand,
and exon boundaries.
*/
#![deny(
        trivial_casts, trivial_numeric_casts,
        unsafe_code,
        unstable_features,
        unused_import_braces)]
#![warn(unused_results)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;

use std::io;

use csv::Error as CsvError;
use regex::Error as RegexError;
use tempfile::PersistError;

mod io_gff;
pub use crate::io_gff::{Reader as GffReader, GffError, GffType, FeatureRecord,
                        FeatureRecordsStream, Attributes, Strand};

mod aggregate;
pub use crate::aggregate::{aggregate, AggregateError, AggregateStats, Aggregation,
                           TranscriptAggregator};

mod io_gpd;
pub use crate::io_gpd::{Writer as GpdWriter, GpdError, GpdRecord, GpdRow};

mod convert;
pub use crate::convert::{collect_stats, convert, convert_file, convert_into_file, ConvertOptions};


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Gff(err: GffError) {
            display("{}", err)
            from()
            cause(err)
        }
        Aggregate(err: AggregateError) {
            display("{}", err)
            from()
            cause(err)
        }
        Gpd(err: GpdError) {
            display("{}", err)
            from()
            cause(err)
        }
        Io(err: io::Error) {
            display("{}", err)
            from()
            cause(err)
        }
        Csv(err: CsvError) {
            display("{}", err)
            from()
            cause(err)
        }
        Regex(err: RegexError) {
            display("{}", err)
            from()
            cause(err)
        }
        Persist(err: PersistError) {
            display("could not move output file into place: {}", err)
            from()
            cause(err)
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;

// Crate-wide constants
mod consts {
    // Feature column values with special meaning to the aggregator.
    pub(crate) const TRANSCRIPT_STR: &str = "transcript";
    pub(crate) const EXON_STR: &str = "exon";

    // Value for unknown columns.
    pub(crate) const UNK_STR: &str = ".";
    pub(crate) const UNK_CHAR: char = '.';

    // Commonly-used attribute keys.
    pub(crate) const GENE_ID_STR: &str = "gene_id";
    pub(crate) const TRANSCRIPT_ID_STR: &str = "transcript_id";
}

// Generic utilities
mod utils {

    #[inline]
    pub(crate) fn update_seq_name(
        value: &mut String,
        prefix: Option<&str>,
        lstrip: Option<(&str, usize)>,
    ) {
        if let Some(pre) = prefix {
            value.insert_str(0, pre);
        }
        if let Some((lstr, lstr_len)) = lstrip {
            if value.starts_with(lstr) {
                let _ = value.drain(..lstr_len);
            }
        }
    }

}
