/*! Writer for the GPD-like transcript table format.

The table is a transcript-oriented format in which each transcript is denoted in a single line,
similar to the [genePred](https://genome.ucsc.edu/FAQ/FAQformat.html#format9) layout. The
coding region columns are filled with the transcript span, as no coding features are considered.
*/
use std::io;

use itertools::Itertools;
use linked_hash_map::LinkedHashMap;

use crate::Strand;


quick_error! {
    /// Errors that occur when creating or writing table records.
    #[derive(Debug)]
    pub enum GpdError {
        /// Occurs when the number of exon start coordinates and the number of exon end
        /// coordinates are not the same.
        ExonCountMismatch(tid: String) {
            display("number of exon starts and number of exon ends are not equal, \
                     transcript ID: {}", tid)
        }
        /// Occurs when a record is written whose exon start is greater than its exon end.
        InvalidExonCoord(tid: String, start: u64, end: u64) {
            display("exon start {} is greater than exon end {}, transcript ID: {}",
                    start, end, tid)
        }
    }
}

/// Raw table row type.
///
/// Each tuple element represents a column:
///
/// 1.  transcript identifier
/// 2.  gene identifier
/// 3.  sequence name
/// 4.  strand
/// 5.  transcript start coordinate
/// 6.  transcript end coordinate
/// 7.  transcript start coordinate, repeated
/// 8.  transcript end coordinate, repeated
/// 9.  number of exons
/// 10. exon start coordinates (as a comma-separated string)
/// 11. exon end coordinates (as a comma-separated string)
///
/// Coordinates are written as they were read from the annotation: 1-based, inclusive.
pub type GpdRow = (String, String, String, char, u64, u64, u64, u64, usize, String, String);

/// Aggregated transcript record.
///
/// The number of exon start and end coordinates are guaranteed to be equal in this type, and the
/// exon coordinates are kept in the order they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct GpdRecord {
    transcript_id: String,
    gene_id: String,
    seq_name: String,
    strand: Strand,
    transcript_start: u64,
    transcript_end: u64,
    exon_starts: Vec<u64>,
    exon_ends: Vec<u64>,
}

impl GpdRecord {

    /// Creates a record without any exons.
    pub fn new<T, G, S>(
        transcript_id: T,
        gene_id: G,
        seq_name: S,
        strand: Strand,
        transcript_start: u64,
        transcript_end: u64,
    ) -> Self
        where T: Into<String>, G: Into<String>, S: Into<String>
    {
        GpdRecord {
            transcript_id: transcript_id.into(),
            gene_id: gene_id.into(),
            seq_name: seq_name.into(),
            strand,
            transcript_start,
            transcript_end,
            exon_starts: vec![],
            exon_ends: vec![],
        }
    }

    /// Returns the transcript identifier.
    pub fn transcript_id(&self) -> &str {
        self.transcript_id.as_str()
    }

    /// Returns the gene identifier.
    pub fn gene_id(&self) -> &str {
        self.gene_id.as_str()
    }

    /// Returns the sequence name.
    pub fn seq_name(&self) -> &str {
        self.seq_name.as_str()
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Returns the start coordinate of the transcript, as given by its own feature record.
    pub fn transcript_start(&self) -> u64 {
        self.transcript_start
    }

    /// Returns the end coordinate of the transcript, as given by its own feature record.
    pub fn transcript_end(&self) -> u64 {
        self.transcript_end
    }

    /// Returns the number of exons contained within the record.
    pub fn num_exons(&self) -> usize {
        self.exon_starts.len() // must be the same as exon_ends
    }

    /// Returns a slice of the exon start coordinates, in the order they were added.
    pub fn exon_starts(&self) -> &[u64] {
        self.exon_starts.as_slice()
    }

    /// Returns a slice of the exon end coordinates, in the order they were added.
    pub fn exon_ends(&self) -> &[u64] {
        self.exon_ends.as_slice()
    }

    /// Sets the exon coordinates of the record.
    ///
    /// An error type will be returned if the number of coordinates differ.
    pub fn set_exon_coords(
        &mut self,
        coord_starts: Vec<u64>,
        coord_ends: Vec<u64>,
    ) -> Result<(), GpdError> {
        if coord_starts.len() != coord_ends.len() {
            return Err(GpdError::ExonCountMismatch(self.transcript_id.clone()));
        }
        if let Some((s, e)) = coord_starts.iter().zip(coord_ends.iter()).find(|(s, e)| s > e) {
            return Err(GpdError::InvalidExonCoord(self.transcript_id.clone(), *s, *e));
        }
        self.exon_starts = coord_starts;
        self.exon_ends = coord_ends;
        Ok(())
    }

    /// Sets the exon coordinates of the record, consuming and returning it.
    pub fn with_exon_coords(
        mut self,
        coord_starts: Vec<u64>,
        coord_ends: Vec<u64>,
    ) -> Result<Self, GpdError> {
        self.set_exon_coords(coord_starts, coord_ends).map(|_| self)
    }

    /// Transforms the record into its raw row.
    pub fn to_row(&self) -> GpdRow {
        (self.transcript_id.clone(), self.gene_id.clone(), self.seq_name.clone(),
         self.strand.to_char(),
         self.transcript_start, self.transcript_end,
         self.transcript_start, self.transcript_end,
         self.num_exons(),
         self.exon_starts.iter().join(","), self.exon_ends.iter().join(","))
    }
}

/// Table writer.
pub struct Writer<W: io::Write> {
    inner: csv::Writer<W>,
}

impl<W: io::Write> Writer<W> {

    /// Creates a table writer from another writer.
    pub fn from_writer(in_writer: W) -> Writer<W> {
        Writer {
            inner: csv::WriterBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .quote_style(csv::QuoteStyle::Never)
                .from_writer(in_writer)
        }
    }

    /// Writes the given row.
    pub fn write(&mut self, row: &GpdRow) -> crate::Result<()> {
        self.inner
            .serialize((&row.0, &row.1, &row.2, row.3, row.4, row.5, row.6, row.7, row.8,
                        &row.9, &row.10))
            .map_err(crate::Error::from)
    }

    /// Writes the given record as a single row.
    pub fn write_record(&mut self, record: &GpdRecord) -> crate::Result<()> {
        self.write(&record.to_row())
    }

    /// Writes all records of the given mapping, in its iteration order.
    pub fn write_records(&mut self, records: &LinkedHashMap<String, GpdRecord>) -> crate::Result<()> {
        for record in records.values() {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Flushes buffered rows into the underlying writer.
    pub fn flush(&mut self) -> crate::Result<()> {
        self.inner.flush().map_err(crate::Error::from)
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> crate::Result<W> {
        self.flush()?;
        self.inner.into_inner()
            .map_err(|e| {
                let err = io::Error::new(e.error().kind(), e.error().to_string());
                crate::Error::from(err)
            })
    }
}

impl Writer<Vec<u8>> {

    /// Creates a table writer that writes to an in-memory buffer.
    ///
    /// The initial capacity of the buffer is 64 KiB.
    pub fn from_memory() -> Writer<Vec<u8>> {
        Writer::from_writer(Vec::with_capacity(1024 * 64))
    }

    /// Flushes and returns the values of the in-memory buffer as a string.
    pub fn into_string(self) -> crate::Result<String> {
        let buf = self.into_inner()?;
        String::from_utf8(buf)
            .map_err(|e| crate::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}
