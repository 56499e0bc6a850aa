//! Conversion of GFF files into transcript tables.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{AggregateStats, GffReader, GffType, GpdWriter, TranscriptAggregator};
use crate::consts::{GENE_ID_STR, TRANSCRIPT_ID_STR};


/// Options for reading the input annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub gff_type: GffType,
    pub gene_id_attr: String,
    pub transcript_id_attr: String,
    pub seq_name_prefix: Option<String>,
    pub seq_name_lstrip: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> ConvertOptions {
        ConvertOptions {
            gff_type: GffType::default(),
            gene_id_attr: GENE_ID_STR.to_owned(),
            transcript_id_attr: TRANSCRIPT_ID_STR.to_owned(),
            seq_name_prefix: None,
            seq_name_lstrip: None,
        }
    }
}

impl ConvertOptions {

    fn configure<R: io::Read>(&self, reader: &mut GffReader<R>) {
        let _ = reader
            .seq_name_prefix(self.seq_name_prefix.as_ref())
            .seq_name_lstrip(self.seq_name_lstrip.as_ref());
    }

    fn aggregator(&self) -> TranscriptAggregator {
        TranscriptAggregator::new()
            .gene_id_attr(self.gene_id_attr.as_str())
            .transcript_id_attr(self.transcript_id_attr.as_str())
    }

    /// Reads all records of the reader and writes the aggregated table into the writer.
    fn run<R, W>(&self, mut reader: GffReader<R>, writer: W) -> crate::Result<(W, AggregateStats)>
        where R: io::Read, W: io::Write
    {
        self.configure(&mut reader);
        let aggregation = self.aggregator().aggregate(reader.records_stream()?)?;
        let (transcripts, stats) = aggregation.into_parts();

        let mut gpd_writer = GpdWriter::from_writer(writer);
        gpd_writer.write_records(&transcripts)?;
        let writer = gpd_writer.into_inner()?;
        Ok((writer, stats))
    }
}

/// Converts the annotation read from the given reader and writes the table into the writer.
///
/// Nothing is written when the input can not be aggregated.
pub fn convert<R, W>(reader: R, writer: W, options: &ConvertOptions) -> crate::Result<AggregateStats>
    where R: io::Read, W: io::Write
{
    let gff_reader = GffReader::from_reader(reader, options.gff_type);
    options.run(gff_reader, writer).map(|(_, stats)| stats)
}

/// Aggregates the annotation read from the given reader without writing any table.
pub fn collect_stats<R>(reader: R, options: &ConvertOptions) -> crate::Result<AggregateStats>
    where R: io::Read
{
    let mut gff_reader = GffReader::from_reader(reader, options.gff_type);
    options.configure(&mut gff_reader);
    let aggregation = options.aggregator().aggregate(gff_reader.records_stream()?)?;
    Ok(aggregation.into_parts().1)
}

/// Converts the annotation file at `input` into a table file at `output`.
///
/// A missing input file is reported before `output` is touched.
pub fn convert_file<P, Q>(input: P, output: Q, options: &ConvertOptions)
    -> crate::Result<AggregateStats>
    where P: AsRef<Path>, Q: AsRef<Path>
{
    let gff_reader = GffReader::from_file(input.as_ref(), options.gff_type)?;
    debug!("reading annotation from {}", input.as_ref().display());
    write_atomically(gff_reader, output.as_ref(), options)
}

/// Converts the annotation read from the given reader into a table file at `output`.
pub fn convert_into_file<R, Q>(reader: R, output: Q, options: &ConvertOptions)
    -> crate::Result<AggregateStats>
    where R: io::Read, Q: AsRef<Path>
{
    let gff_reader = GffReader::from_reader(reader, options.gff_type);
    write_atomically(gff_reader, output.as_ref(), options)
}

/// Writes the table into a temporary file next to `output`, which is then moved into place.
///
/// On failure the temporary file is removed and `output` is left untouched. An existing `output`
/// keeps its permissions, a new one gets the permissions of any newly created file.
fn write_atomically<R: io::Read>(
    gff_reader: GffReader<R>,
    output: &Path,
    options: &ConvertOptions,
) -> crate::Result<AggregateStats> {

    let out_dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let existing_perms = match fs::metadata(output) {
        Ok(meta) => Some(meta.permissions()),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(crate::Error::from(e)),
    };
    let tmp = create_temp_in(out_dir)?;
    debug!("writing table to temporary file {}", tmp.path().display());

    let (tmp, stats) = options.run(gff_reader, tmp)?;
    if let Some(perms) = existing_perms {
        tmp.as_file().set_permissions(perms)?;
    }
    tmp.as_file().sync_all()?;
    let _file = tmp.persist(output)?;

    info!("wrote {} transcript(s) to {}", stats.num_transcripts(), output.display());
    Ok(stats)
}

/// Creates a temporary file whose mode is 0666 minus the process umask.
#[cfg(unix)]
fn create_temp_in(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    tempfile::Builder::new()
        .prefix(".gpd")
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn create_temp_in(dir: &Path) -> io::Result<NamedTempFile> {
    tempfile::Builder::new().prefix(".gpd").tempfile_in(dir)
}
