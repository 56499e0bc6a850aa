#[macro_use]
extern crate matches;
extern crate gpd;

use gpd::{aggregate, AggregateError, Aggregation, Error, GffError, GffReader, GffType, Strand};


static SINGLE_TRANSCRIPT_GFF3: &str = include_str!("data/single_transcript.gff3");
static TWO_TRANSCRIPTS_GFF3: &str = include_str!("data/two_transcripts.gff3");
static MULT_TRANSCRIPTS_GFF3: &str = include_str!("data/mult_transcripts.gff3");
static MISSING_TRANSCRIPT_ID_GFF3: &str = include_str!("data/missing_transcript_id.gff3");
static UNSORTED_GFF3: &str = include_str!("data/unsorted.gff3");
static SINGLE_GENE_GTF: &str = include_str!("data/single_gene.gtf");


fn run(raw: &str, gff_type: GffType) -> gpd::Result<Aggregation> {
    let mut reader = GffReader::from_reader(raw.as_bytes(), gff_type);
    aggregate(reader.records_stream()?)
}

#[test]
fn aggregate_single_transcript() {
    let agg = run(SINGLE_TRANSCRIPT_GFF3, GffType::Gff3).expect("an aggregation");
    assert_eq!(agg.transcripts().len(), 1);

    let trx = &agg.transcripts()["T1"];
    assert_eq!(trx.transcript_id(), "T1");
    assert_eq!(trx.gene_id(), "G1");
    assert_eq!(trx.seq_name(), "chr1");
    assert_eq!(trx.strand(), Strand::Forward);
    assert_eq!(trx.transcript_start(), 100);
    assert_eq!(trx.transcript_end(), 500);
    assert_eq!(trx.num_exons(), 2);
    assert_eq!(trx.exon_starts(), &[100, 400]);
    assert_eq!(trx.exon_ends(), &[200, 500]);
}

#[test]
fn aggregate_two_transcripts() {
    let agg = run(TWO_TRANSCRIPTS_GFF3, GffType::Gff3).expect("an aggregation");
    assert_eq!(agg.transcripts().len(), 2);
    for trx in agg.transcripts().values() {
        assert_eq!(trx.num_exons(), 1);
    }
    assert_eq!(agg.transcripts()["T1"].gene_id(), "G1");
    assert_eq!(agg.transcripts()["T2"].gene_id(), "G2");
}

#[test]
fn aggregate_mult_transcripts_keys() {
    let agg = run(MULT_TRANSCRIPTS_GFF3, GffType::Gff3).expect("an aggregation");
    let keys: Vec<&str> = agg.transcripts().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["T1", "T2", "T3"]);
    assert_eq!(agg.stats().num_transcripts(), 3);
    assert_eq!(agg.stats().num_records(), 9);
    assert_eq!(agg.stats().feature_count("CDS"), 1);
    assert_eq!(agg.stats().feature_count("exon"), 5);
}

#[test]
fn aggregate_mult_transcripts_exon_counts() {
    let agg = run(MULT_TRANSCRIPTS_GFF3, GffType::Gff3).expect("an aggregation");
    for trx in agg.transcripts().values() {
        assert_eq!(trx.num_exons(), trx.exon_starts().len());
        assert_eq!(trx.num_exons(), trx.exon_ends().len());
    }
    // exons keep file order, not coordinate order
    let trx1 = &agg.transcripts()["T1"];
    assert_eq!(trx1.exon_starts(), &[1500, 1000]);
    assert_eq!(trx1.exon_ends(), &[1900, 1200]);
}

#[test]
fn aggregate_summary_from_transcript_record() {
    let agg = run(MULT_TRANSCRIPTS_GFF3, GffType::Gff3).expect("an aggregation");
    // T2 has an exon before its transcript record
    let trx2 = &agg.transcripts()["T2"];
    assert_eq!(trx2.seq_name(), "chr2");
    assert_eq!(trx2.strand(), Strand::Reverse);
    assert_eq!(trx2.transcript_start(), 2000);
    assert_eq!(trx2.transcript_end(), 2600);
    assert_eq!(trx2.exon_starts(), &[2000, 2400]);

    let trx3 = &agg.transcripts()["T3"];
    assert_eq!(trx3.seq_name(), "chr3");
    assert_eq!(trx3.gene_id(), "G8");
    assert_eq!(trx3.strand(), Strand::Forward);
}

#[test]
fn aggregate_gtf() {
    let agg = run(SINGLE_GENE_GTF, GffType::Gtf2).expect("an aggregation");
    assert_eq!(agg.transcripts().len(), 2);

    let trx1 = &agg.transcripts()["ENST00000331462"];
    assert_eq!(trx1.gene_id(), "ENSG00000128645");
    assert_eq!(trx1.transcript_start(), 176188578);
    assert_eq!(trx1.transcript_end(), 176190907);
    assert_eq!(trx1.exon_starts(), &[176188578, 176189808]);
    assert_eq!(trx1.exon_ends(), &[176189453, 176190907]);

    let trx2 = &agg.transcripts()["ENST00000465772"];
    assert_eq!(trx2.num_exons(), 1);
}

#[test]
fn aggregate_missing_transcript_id() {
    let res = run(MISSING_TRANSCRIPT_ID_GFF3, GffType::Gff3);
    assert_matches!(res, Err(Error::Gff(GffError::MissingTranscriptId { line: 2 })));
}

#[test]
fn aggregate_unsorted() {
    let res = run(UNSORTED_GFF3, GffType::Gff3);
    assert_matches!(res,
                    Err(Error::Aggregate(AggregateError::NonContiguousTranscript { line: 3, .. })));
}

#[test]
fn aggregate_wrong_gff_type() {
    // GFF3 attributes read as GTF do not match the token pattern
    let res = run(SINGLE_TRANSCRIPT_GFF3, GffType::Gtf2);
    assert_matches!(res, Err(Error::Gff(GffError::MalformedRow { .. })));
}
