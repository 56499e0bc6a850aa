/*! Streaming aggregation of feature records into transcripts.

Records are consumed once, in file order. All records of a transcript are expected to be
contiguous in the input, so only the transcript currently being read (the pivot) is kept open.
It is committed into the output mapping when a record of another transcript is seen, or when
the input ends.
*/
use std::collections::HashSet;

use linked_hash_map::LinkedHashMap;

use crate::consts::{EXON_STR, GENE_ID_STR, TRANSCRIPT_ID_STR, TRANSCRIPT_STR};
use crate::{FeatureRecord, GpdRecord, Strand};


quick_error! {
    /// Errors that occur when grouping feature records into transcripts.
    #[derive(Debug)]
    pub enum AggregateError {
        /// Occurs when a transcript has no feature record of its own.
        ///
        /// Such a group has no source for its gene, sequence name, strand, and span. It is
        /// rejected instead of being written with the fields of the previous transcript.
        MissingTranscript(tid: String) {
            display("no 'transcript' feature present, transcript ID: {}", tid)
        }
        /// Occurs when records of an already committed transcript are seen again.
        NonContiguousTranscript { tid: String, line: u64 } {
            display("records of transcript '{}' are not contiguous, seen again at line {}",
                    tid, line)
        }
    }
}

/// Counters gathered while aggregating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateStats {
    num_records: usize,
    feature_counts: LinkedHashMap<String, usize>,
    num_transcripts: usize,
}

impl AggregateStats {

    /// Number of feature records consumed.
    pub fn num_records(&self) -> usize {
        self.num_records
    }

    /// Number of transcripts committed.
    pub fn num_transcripts(&self) -> usize {
        self.num_transcripts
    }

    /// Number of records of each feature type, in order of first appearance.
    pub fn feature_counts(&self) -> &LinkedHashMap<String, usize> {
        &self.feature_counts
    }

    /// Number of records of the given feature type.
    pub fn feature_count(&self, feature: &str) -> usize {
        self.feature_counts.get(feature).cloned().unwrap_or(0)
    }

    fn count(&mut self, feature: &str) {
        self.num_records += 1;
        if let Some(n) = self.feature_counts.get_mut(feature) {
            *n += 1;
            return;
        }
        let _ = self.feature_counts.insert(feature.to_owned(), 1);
    }
}

/// Result of a complete aggregation.
#[derive(Debug)]
pub struct Aggregation {
    transcripts: LinkedHashMap<String, GpdRecord>,
    stats: AggregateStats,
}

impl Aggregation {

    /// Aggregated transcripts keyed by their identifiers, in order of first appearance.
    pub fn transcripts(&self) -> &LinkedHashMap<String, GpdRecord> {
        &self.transcripts
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    pub fn into_parts(self) -> (LinkedHashMap<String, GpdRecord>, AggregateStats) {
        (self.transcripts, self.stats)
    }
}

/// Fields taken from the transcript's own feature record.
#[derive(Debug)]
struct Summary {
    gene_id: String,
    seq_name: String,
    strand: Strand,
    start: u64,
    end: u64,
}

/// State of the currently open transcript.
#[derive(Debug)]
struct Accumulator {
    pivot: String,
    summary: Option<Summary>,
    exon_starts: Vec<u64>,
    exon_ends: Vec<u64>,
}

impl Accumulator {

    fn open<T: Into<String>>(pivot: T) -> Self {
        Accumulator {
            pivot: pivot.into(),
            summary: None,
            exon_starts: vec![],
            exon_ends: vec![],
        }
    }

    /// Adds the record to the accumulator.
    ///
    /// Transcript records replace the summary fields, exon records extend the exon lists, and
    /// any other feature type leaves the accumulator untouched.
    fn apply(mut self, record: &FeatureRecord, gene_id_attr: &str) -> crate::Result<Self> {
        match record.feature() {
            TRANSCRIPT_STR => {
                let gene_id = record.gene_id(gene_id_attr)?;
                self.summary = Some(Summary {
                    gene_id: gene_id.to_owned(),
                    seq_name: record.seq_name().to_owned(),
                    strand: record.strand(),
                    start: record.start(),
                    end: record.end(),
                });
            },
            EXON_STR => {
                self.exon_starts.push(record.start());
                self.exon_ends.push(record.end());
            },
            _ => {},
        }
        Ok(self)
    }

    fn commit(self) -> crate::Result<GpdRecord> {
        let Accumulator { pivot, summary, exon_starts, exon_ends } = self;
        let summary = summary.ok_or_else(|| AggregateError::MissingTranscript(pivot.clone()))?;
        let record = GpdRecord::new(pivot, summary.gene_id, summary.seq_name, summary.strand,
                                    summary.start, summary.end)
            .with_exon_coords(exon_starts, exon_ends)?;
        Ok(record)
    }
}

/// Groups contiguous feature records into transcripts.
#[derive(Debug)]
pub struct TranscriptAggregator {
    gene_id_attr: String,
    transcript_id_attr: String,
    current: Option<Accumulator>,
    committed: HashSet<String>,
    transcripts: LinkedHashMap<String, GpdRecord>,
    stats: AggregateStats,
}

impl Default for TranscriptAggregator {
    fn default() -> TranscriptAggregator {
        TranscriptAggregator::new()
    }
}

impl TranscriptAggregator {

    pub fn new() -> TranscriptAggregator {
        TranscriptAggregator {
            gene_id_attr: GENE_ID_STR.to_owned(),
            transcript_id_attr: TRANSCRIPT_ID_STR.to_owned(),
            current: None,
            committed: HashSet::new(),
            transcripts: LinkedHashMap::new(),
            stats: AggregateStats::default(),
        }
    }

    /// Sets the attribute key used for getting gene identifiers.
    pub fn gene_id_attr<T>(mut self, gene_id_attr: T) -> Self
        where T: Into<String>
    {
        self.gene_id_attr = gene_id_attr.into();
        self
    }

    /// Sets the attribute key used for getting transcript identifiers.
    pub fn transcript_id_attr<T>(mut self, transcript_id_attr: T) -> Self
        where T: Into<String>
    {
        self.transcript_id_attr = transcript_id_attr.into();
        self
    }

    /// Consumes a single feature record.
    ///
    /// When the record belongs to a different transcript than the open one, the open transcript
    /// is committed first.
    pub fn push(&mut self, record: FeatureRecord) -> crate::Result<()> {
        self.stats.count(record.feature());
        let tid = record.transcript_id(&self.transcript_id_attr)?;

        let acc = match self.current.take() {
            None => Accumulator::open(tid),
            Some(acc) => {
                if acc.pivot == tid {
                    acc
                } else {
                    self.commit(acc)?;
                    if self.committed.contains(tid) {
                        let err = AggregateError::NonContiguousTranscript {
                            tid: tid.to_owned(),
                            line: record.line(),
                        };
                        return Err(crate::Error::from(err));
                    }
                    Accumulator::open(tid)
                }
            },
        };

        self.current = Some(acc.apply(&record, &self.gene_id_attr)?);
        Ok(())
    }

    /// Commits the open transcript, if any, and returns the aggregation result.
    pub fn finish(mut self) -> crate::Result<Aggregation> {
        if let Some(acc) = self.current.take() {
            self.commit(acc)?;
        }
        info!("aggregated {} transcript(s) from {} record(s)",
              self.stats.num_transcripts, self.stats.num_records);
        Ok(Aggregation { transcripts: self.transcripts, stats: self.stats })
    }

    /// Consumes all records of the given iterator and returns the aggregation result.
    ///
    /// The first error encountered, either from the records or from aggregation, is returned.
    pub fn aggregate<I>(mut self, records: I) -> crate::Result<Aggregation>
        where I: IntoIterator<Item = crate::Result<FeatureRecord>>
    {
        for record in records {
            self.push(record?)?;
        }
        self.finish()
    }

    fn commit(&mut self, acc: Accumulator) -> crate::Result<()> {
        let record = acc.commit()?;
        let tid = record.transcript_id().to_owned();
        debug!("committing transcript {} with {} exon(s)", tid, record.num_exons());
        let _ = self.committed.insert(tid.clone());
        let _ = self.transcripts.insert(tid, record);
        self.stats.num_transcripts += 1;
        Ok(())
    }
}

/// Aggregates the given records into transcripts using the default identifier attribute keys.
pub fn aggregate<I>(records: I) -> crate::Result<Aggregation>
    where I: IntoIterator<Item = crate::Result<FeatureRecord>>
{
    TranscriptAggregator::new().aggregate(records)
}
