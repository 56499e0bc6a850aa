#[macro_use]
extern crate matches;
extern crate gpd;
extern crate tempfile;

use std::fs;
use std::io::Write;

use gpd::{convert, convert_file, convert_into_file, ConvertOptions, Error, GffError, GffType};


static SINGLE_TRANSCRIPT_GFF3: &str = include_str!("data/single_transcript.gff3");
static MULT_TRANSCRIPTS_GFF3: &str = include_str!("data/mult_transcripts.gff3");
static MISSING_TRANSCRIPT_ID_GFF3: &str = include_str!("data/missing_transcript_id.gff3");
static SINGLE_GENE_GTF: &str = include_str!("data/single_gene.gtf");


fn write_input(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = fs::File::create(&path).expect("an input file");
    file.write_all(contents.as_bytes()).expect("written input");
    path
}

fn convert_str(raw: &str, options: &ConvertOptions) -> String {
    let mut out = vec![];
    let _ = convert(raw.as_bytes(), &mut out, options).expect("a conversion");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn convert_file_single_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "in.gff3", SINGLE_TRANSCRIPT_GFF3);
    let output = dir.path().join("out.gpd");

    let stats = convert_file(&input, &output, &ConvertOptions::default())
        .expect("a conversion");
    assert_eq!(stats.num_transcripts(), 1);
    assert_eq!(fs::read_to_string(&output).unwrap(),
               "T1\tG1\tchr1\t+\t100\t500\t100\t500\t2\t100,400\t200,500\n");
}

#[test]
fn convert_into_file_from_reader() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gpd");

    let stats = convert_into_file(SINGLE_TRANSCRIPT_GFF3.as_bytes(), &output,
                                  &ConvertOptions::default())
        .expect("a conversion");
    assert_eq!(stats.num_records(), 3);
    assert_eq!(fs::read_to_string(&output).unwrap(),
               "T1\tG1\tchr1\t+\t100\t500\t100\t500\t2\t100,400\t200,500\n");
    // only the output remains, no temporary files
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn convert_into_file_failure_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.gpd");

    let res = convert_into_file(MISSING_TRANSCRIPT_ID_GFF3.as_bytes(), &output,
                                &ConvertOptions::default());
    assert_matches!(res, Err(Error::Gff(GffError::MissingTranscriptId { .. })));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn convert_file_new_output_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "in.gff3", SINGLE_TRANSCRIPT_GFF3);
    let output = dir.path().join("out.gpd");
    let plain = write_input(&dir, "plain.txt", "");

    let _ = convert_file(&input, &output, &ConvertOptions::default()).expect("a conversion");
    let mode = |p: &std::path::Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&output), mode(&plain));
}

#[cfg(unix)]
#[test]
fn convert_file_keeps_existing_output_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "in.gff3", SINGLE_TRANSCRIPT_GFF3);
    let output = write_input(&dir, "out.gpd", "stale\n");
    fs::set_permissions(&output, fs::Permissions::from_mode(0o640)).unwrap();

    let _ = convert_file(&input, &output, &ConvertOptions::default()).expect("a conversion");
    assert_eq!(fs::metadata(&output).unwrap().permissions().mode() & 0o777, 0o640);
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 1);
}

#[test]
fn convert_file_overwrites_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "in.gff3", SINGLE_TRANSCRIPT_GFF3);
    let output = write_input(&dir, "out.gpd", "stale\ncontents\nfrom\nbefore\n");

    let _ = convert_file(&input, &output, &ConvertOptions::default()).expect("a conversion");
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 1);
}

#[test]
fn convert_file_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.gff3");
    let output = dir.path().join("out.gpd");

    let res = convert_file(&input, &output, &ConvertOptions::default());
    assert_matches!(res, Err(Error::Gff(GffError::MissingInput(_))));
    assert!(!output.exists());
}

#[test]
fn convert_file_malformed_leaves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "in.gff3", MISSING_TRANSCRIPT_ID_GFF3);
    let output = dir.path().join("out.gpd");

    let res = convert_file(&input, &output, &ConvertOptions::default());
    assert_matches!(res, Err(Error::Gff(GffError::MissingTranscriptId { .. })));
    assert!(!output.exists());
    // only the input remains, no temporary files
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn convert_column_layout() {
    let out = convert_str(MULT_TRANSCRIPTS_GFF3, &ConvertOptions::default());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines.iter() {
        let cols: Vec<&str> = line.split('\t').collect();
        assert_eq!(cols.len(), 11);
        assert_eq!(cols[4], cols[6]);
        assert_eq!(cols[5], cols[7]);
        let num_exons: usize = cols[8].parse().unwrap();
        assert_eq!(cols[9].split(',').count(), num_exons);
        assert_eq!(cols[10].split(',').count(), num_exons);
        assert!(!cols[9].contains(' ') && !cols[9].ends_with(','));
    }
    assert_eq!(lines[0], "T1\tG7\tchr2\t-\t1000\t1900\t1000\t1900\t2\t1500,1000\t1900,1200");
    assert_eq!(lines[1], "T2\tG7\tchr2\t-\t2000\t2600\t2000\t2600\t2\t2000,2400\t2100,2600");
    assert_eq!(lines[2], "T3\tG8\tchr3\t+\t50\t80\t50\t80\t1\t50\t80");
}

#[test]
fn convert_gtf_lstrip() {
    let options = ConvertOptions {
        gff_type: GffType::Gtf2,
        seq_name_lstrip: Some("chr".to_owned()),
        ..ConvertOptions::default()
    };
    let out = convert_str(SINGLE_GENE_GTF, &options);
    let mut lines = out.lines();
    assert_eq!(lines.next(),
               Some("ENST00000331462\tENSG00000128645\t2\t+\t176188578\t176190907\t\
                     176188578\t176190907\t2\t176188578,176189808\t176189453,176190907"));
    assert_eq!(lines.next(),
               Some("ENST00000465772\tENSG00000128645\t2\t+\t176188843\t176188901\t\
                     176188843\t176188901\t1\t176188843\t176188901"));
    assert_eq!(lines.next(), None);
}

#[test]
fn convert_custom_attribute_keys() {
    let raw = "chr1\tsrc\ttranscript\t1\t9\t.\t+\t.\tID=tx1;gene=g1\n\
               chr1\tsrc\texon\t1\t9\t.\t+\t.\tID=tx1;gene=g1\n";
    let options = ConvertOptions {
        gene_id_attr: "gene".to_owned(),
        transcript_id_attr: "ID".to_owned(),
        ..ConvertOptions::default()
    };
    assert_eq!(convert_str(raw, &options), "tx1\tg1\tchr1\t+\t1\t9\t1\t9\t1\t1\t9\n");
}
