/*! Reader for GFF format variants.

The GFF format is a feature-oriented format that is commonly used to store gene annotation data.
Each line denotes one genomic interval, such as a transcript or an exon, and carries a free-form
attribute column from which the gene and transcript identifiers are taken.

An unofficial specification of the formats can be found [here](http://mblab.wustl.edu/GTF22.html)
or [here](http://www.ensembl.org/info/website/upload/gff.html).
*/
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use multimap::MultiMap;
use regex::Regex;

use crate::consts::{UNK_CHAR, UNK_STR};
use crate::utils::update_seq_name;


/// Number of columns in a GFF record.
const NUM_COLUMNS: usize = 9;

/// Token pattern of GFF3 attributes, e.g. `gene_id=G1`.
const GFF3_ATTR_PAT: &str = r"^(?P<key>[^=\s]+)\s*=\s*(?P<value>.*)$";

/// Token pattern of GTF attributes, e.g. `gene_id "G1"`.
const GTF2_ATTR_PAT: &str = r#"^(?P<key>[^\s"]+)\s+(?:"(?P<qvalue>[^"]*)"|(?P<value>\S+))$"#;

quick_error! {
    /// Errors that occur when reading GFF file variants.
    #[derive(Debug)]
    pub enum GffError {
        /// Occurs when the input file does not exist.
        MissingInput(path: PathBuf) {
            display("input file not found: {}", path.display())
        }
        /// Occurs when a line can not be decoded into a feature record.
        MalformedRow { line: u64, reason: String } {
            display("malformed record at line {}: {}", line, reason)
        }
        /// Occurs when a record does not have any gene identifier attribute.
        MissingGeneId { line: u64 } {
            display("gene identifier attribute not found, line: {}", line)
        }
        /// Occurs when a record does not have an expected transcript identifier attribute.
        MissingTranscriptId { line: u64 } {
            display("transcript identifier attribute not found, line: {}", line)
        }
        /// Occurs when a record contains multiple transcript identifier attributes.
        MultipleTranscriptIds { line: u64 } {
            display("more than one transcript identifier found, line: {}", line)
        }
    }
}

impl GffError {

    fn malformed<T: Into<String>>(line: u64, reason: T) -> Self {
        GffError::MalformedRow { line, reason: reason.into() }
    }
}

/// Supported GFF variants.
///
/// The variants differ only in how the attribute column is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GffType {
    /// `key=value` attributes, multiple values separated by commas.
    Gff3,
    /// `key "value"` attributes.
    Gtf2,
}

impl Default for GffType {
    fn default() -> GffType {
        GffType::Gff3
    }
}

impl GffType {

    fn attribute_regex(self) -> Result<Regex, regex::Error> {
        match self {
            GffType::Gff3 => Regex::new(GFF3_ATTR_PAT),
            GffType::Gtf2 => Regex::new(GTF2_ATTR_PAT),
        }
    }
}

/// Strand of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
    Unknown,
}

impl Strand {

    /// Creates a strand from its column character.
    pub fn from_char(c: char) -> Option<Strand> {
        match c {
            '+' => Some(Strand::Forward),
            '-' => Some(Strand::Reverse),
            UNK_CHAR | '?' => Some(Strand::Unknown),
            _ => None,
        }
    }

    /// Returns the column character of the strand.
    pub fn to_char(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unknown => UNK_CHAR,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Attributes of a feature record, looked up by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    inner: MultiMap<String, String>,
}

impl Attributes {

    /// Parses the raw attribute column.
    ///
    /// Empty tokens are ignored. The first token not matching the given regex is returned as the
    /// error value.
    fn parse<'a>(raw: &'a str, gff_type: GffType, regex: &Regex) -> Result<Self, &'a str> {
        let mut inner = MultiMap::new();
        if raw == UNK_STR {
            return Ok(Attributes { inner });
        }
        for token in raw.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            let caps = regex.captures(token).ok_or(token)?;
            let key = caps.name("key").map(|m| m.as_str()).ok_or(token)?;
            let value = caps.name("value")
                .or_else(|| caps.name("qvalue"))
                .map(|m| m.as_str().trim())
                .ok_or(token)?;
            match gff_type {
                GffType::Gff3 => {
                    for item in value.split(',') {
                        inner.insert(key.to_owned(), item.to_owned());
                    }
                },
                GffType::Gtf2 => inner.insert(key.to_owned(), value.to_owned()),
            }
        }
        Ok(Attributes { inner })
    }

    /// Returns the first value of the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(|v| v.as_str())
    }

    /// Returns all values of the given key.
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.inner.get_vec(key).map(|v| v.as_slice())
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// A single GFF line.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    seq_name: String,
    source: String,
    feature: String,
    start: u64,
    end: u64,
    score: Option<f64>,
    strand: Strand,
    frame: Option<u8>,
    attributes: Attributes,
    line: u64,
}

impl FeatureRecord {

    /// Returns the sequence name.
    pub fn seq_name(&self) -> &str {
        self.seq_name.as_str()
    }

    /// Returns the source column.
    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    /// Returns the feature type, e.g. `transcript` or `exon`.
    pub fn feature(&self) -> &str {
        self.feature.as_str()
    }

    /// Returns the 1-based start coordinate.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Returns the 1-based, inclusive end coordinate.
    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn frame(&self) -> Option<u8> {
        self.frame
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the line number the record was read from.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns the gene identifier stored under the given attribute key.
    pub fn gene_id(&self, key: &str) -> Result<&str, GffError> {
        self.attributes.get(key)
            .ok_or(GffError::MissingGeneId { line: self.line })
    }

    /// Returns the transcript identifier stored under the given attribute key.
    ///
    /// An error is returned when the key is absent or has more than one value.
    pub fn transcript_id(&self, key: &str) -> Result<&str, GffError> {
        match self.attributes.get_all(key) {
            Some(values) if values.len() == 1 => Ok(values[0].as_str()),
            Some(values) if values.len() > 1 =>
                Err(GffError::MultipleTranscriptIds { line: self.line }),
            _ => Err(GffError::MissingTranscriptId { line: self.line }),
        }
    }

    /// Creates a record from the columns of a raw row.
    fn try_from_row(
        row: &csv::StringRecord,
        line: u64,
        gff_type: GffType,
        attr_regex: &Regex,
    ) -> Result<Self, GffError> {

        if row.len() != NUM_COLUMNS {
            let reason = format!("expected {} columns, found {}", NUM_COLUMNS, row.len());
            return Err(GffError::malformed(line, reason));
        }

        let parse_coord = |raw: &str| u64::from_str(raw)
            .map_err(|e| GffError::malformed(line, format!("invalid coordinate '{}': {}", raw, e)));
        let start = parse_coord(&row[3])?;
        let end = parse_coord(&row[4])?;
        if start > end {
            let reason = format!("start {} is greater than end {}", start, end);
            return Err(GffError::malformed(line, reason));
        }

        let score = match &row[5] {
            UNK_STR => None,
            raw => Some(f64::from_str(raw)
                .map_err(|_| GffError::malformed(line, format!("invalid score '{}'", raw)))?),
        };

        let mut strand_chars = row[6].chars();
        let strand = match (strand_chars.next(), strand_chars.next()) {
            (Some(c), None) => Strand::from_char(c),
            _ => None,
        }.ok_or_else(|| GffError::malformed(line, format!("invalid strand '{}'", &row[6])))?;

        let frame = match &row[7] {
            UNK_STR => None,
            "0" => Some(0),
            "1" => Some(1),
            "2" => Some(2),
            raw => return Err(GffError::malformed(line, format!("invalid frame '{}'", raw))),
        };

        let attributes = Attributes::parse(&row[8], gff_type, attr_regex)
            .map_err(|tok| GffError::malformed(line, format!("invalid attribute '{}'", tok)))?;

        Ok(FeatureRecord {
            seq_name: row[0].to_owned(),
            source: row[1].to_owned(),
            feature: row[2].to_owned(),
            start,
            end,
            score,
            strand,
            frame,
            attributes,
            line,
        })
    }
}

/// GFF reader.
pub struct Reader<R: io::Read> {
    inner: csv::Reader<R>,
    seq_name_prefix: Option<String>,
    seq_name_lstrip: Option<String>,
    gff_type: GffType,
}

impl<R: io::Read> Reader<R> {

    /// Creates a GFF reader of the given variant from another reader.
    pub fn from_reader(in_reader: R, gff_type: GffType) -> Reader<R> {
        Reader {
            inner: csv::ReaderBuilder::new()
                .delimiter(b'\t')
                .has_headers(false)
                .comment(Some(b'#'))
                .quoting(false)
                .flexible(true)
                .from_reader(in_reader),
            seq_name_prefix: None,
            seq_name_lstrip: None,
            gff_type,
        }
    }

    /// Sets the reader to add the given prefix to all sequence names.
    pub fn seq_name_prefix<T>(&mut self, prefix: Option<T>) -> &mut Self
        where T: Into<String>
    {
        self.seq_name_prefix = prefix.map(|v| v.into());
        self
    }

    /// Sets the reader to trim the given string from all sequence names if present at the
    /// beginning.
    pub fn seq_name_lstrip<T>(&mut self, lstrip: Option<T>) -> &mut Self
        where T: Into<String>
    {
        self.seq_name_lstrip = lstrip.map(|v| v.into());
        self
    }

    /// Creates an iterator of feature records, in file order.
    pub fn records_stream(&mut self) -> crate::Result<FeatureRecordsStream<R>> {
        let attr_regex = self.gff_type.attribute_regex()?;
        Ok(FeatureRecordsStream {
            inner: self.inner.records(),
            gff_type: self.gff_type,
            attr_regex,
            seq_name_prefix: self.seq_name_prefix.as_deref(),
            seq_name_lstrip: self.seq_name_lstrip.as_deref(),
        })
    }
}

impl Reader<fs::File> {

    /// Creates a GFF reader that reads from the given path.
    ///
    /// A missing file is reported immediately instead of at the first read.
    pub fn from_file<P: AsRef<Path>>(path: P, gff_type: GffType) -> crate::Result<Self> {
        let path = path.as_ref();
        match fs::File::open(path) {
            Ok(file) => Ok(Reader::from_reader(file, gff_type)),
            Err(ref e) if e.kind() == io::ErrorKind::NotFound =>
                Err(crate::Error::from(GffError::MissingInput(path.to_path_buf()))),
            Err(e) => Err(crate::Error::from(e)),
        }
    }
}

/// Iterator over GFF feature records.
pub struct FeatureRecordsStream<'a, R: 'a> where R: io::Read {
    inner: csv::StringRecordsIter<'a, R>,
    gff_type: GffType,
    attr_regex: Regex,
    seq_name_prefix: Option<&'a str>,
    seq_name_lstrip: Option<&'a str>,
}

impl<'a, R> Iterator for FeatureRecordsStream<'a, R> where R: io::Read {

    type Item = crate::Result<FeatureRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let lstrip = self.seq_name_lstrip.map(|v| (v, v.len()));
        let prefix = self.seq_name_prefix;
        let gff_type = self.gff_type;
        let attr_regex = &self.attr_regex;
        self.inner.next()
            .map(|row| -> crate::Result<FeatureRecord> {
                let row = row.map_err(crate::Error::from)?;
                let line = row.position().map(|p| p.line()).unwrap_or(0);
                let mut record = FeatureRecord::try_from_row(&row, line, gff_type, attr_regex)
                    .map_err(crate::Error::from)?;
                update_seq_name(&mut record.seq_name, prefix, lstrip);
                Ok(record)
            })
    }
}
