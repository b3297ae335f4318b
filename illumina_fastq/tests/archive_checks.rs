use anyhow::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use illumina_fastq::{ArchiveParams, IlluminaFastq, IlluminaFastqError, Mismatch, ParseError};
use pretty_assertions::assert_eq;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const RUN_NAME: &str = "170323_M04734_0028_000000000-B2MVT";
const HEADER: &str = "@M04734:28:000000000-B2MVT:1:2106:17605:1940 1:N:0:TTTTTTTTTTTT+TCTTTCCCTACA";
const RECORD_BODY: &str = "\nGATTACAGATTACA\n+\nFFFFFFFFFFFFFF\n";

fn write_gz_fastq(dir: &Path, filename: &str, header: &str, records: usize) -> Result<PathBuf> {
    let path = dir.join(filename);
    let mut gz = GzEncoder::new(File::create(&path)?, Compression::default());
    for _ in 0..records {
        gz.write_all(header.as_bytes())?;
        gz.write_all(RECORD_BODY.as_bytes())?;
    }
    gz.finish()?;
    Ok(path)
}

fn run_dir(root: &Path) -> Result<PathBuf> {
    let dir = root
        .join("Miseq")
        .join(RUN_NAME)
        .join("Data/Intensities/BaseCalls");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[test]
fn test_gzipped_run_folder_file() -> Result<()> {
    let root = tempfile::tempdir()?;
    let dir = run_dir(root.path())?;
    let path = write_gz_fastq(&dir, "Undetermined_S0_L001_R1_001.fastq.gz", HEADER, 1)?;

    let mut fq = IlluminaFastq::open(&path)?;
    assert_eq!(fq.filepath(), path.to_string_lossy());
    assert_eq!(fq.run_name(), RUN_NAME);
    assert_eq!(fq.date(), "2017-03-23");
    assert_eq!(fq.machine_type(), Ok("Illumina-MiSeq"));
    assert!(fq.check_fp_vs_content());
    assert!(fq.check_index_read_exists());
    assert_eq!(fq.build_archive_dir(), format!("{RUN_NAME}_L001"));

    let size = (HEADER.len() + RECORD_BODY.len()) as u64;
    assert!(fq.check_file_size(50)?);
    assert!(!fq.check_file_size(size)?);
    assert!(!fq.check_file_size(50000)?);
    Ok(())
}

#[test]
fn test_file_next_to_bare_run_folder() -> Result<()> {
    let root = tempfile::tempdir()?;
    let dir = root.path().join(RUN_NAME);
    fs::create_dir_all(&dir)?;
    let path = write_gz_fastq(&dir, "small_Undetermined_S0_L001_R1_001.fastq.gz", HEADER, 200)?;

    let mut fq = IlluminaFastq::open(&path)?;
    assert!(fq.check_fp_vs_content());
    assert!(fq.check_file_size(50)?);
    assert!(!fq.check_file_size(50000)?);
    Ok(())
}

#[test]
fn test_plain_file_in_wrong_lane() -> Result<()> {
    let root = tempfile::tempdir()?;
    let dir = run_dir(root.path())?;
    let path = dir.join("Undetermined_S0_L002_R1_001.fastq");
    fs::write(&path, format!("{HEADER}{RECORD_BODY}"))?;

    let mut fq = IlluminaFastq::open(&path)?;
    assert_eq!(
        fq.compare_fp_vs_content(),
        vec![Mismatch::Lane {
            path: "2".to_string(),
            header: "1".to_string()
        }]
    );
    // The archive directory still comes from the path alone.
    assert_eq!(fq.build_archive_dir(), format!("{RUN_NAME}_L002"));

    let report = fq.validate(&ArchiveParams::default())?;
    assert!(!report.is_ok());
    assert!(report.large_enough);
    Ok(())
}

#[test]
fn test_batch_skips_malformed_files() -> Result<()> {
    let root = tempfile::tempdir()?;
    let dir = run_dir(root.path())?;
    let good = write_gz_fastq(&dir, "Undetermined_S0_L001_R1_001.fastq.gz", HEADER, 1)?;
    let bad_header = write_gz_fastq(&dir, "Undetermined_S0_L001_R2_001.fastq.gz", ">not a fastq", 1)?;
    let bad_name = write_gz_fastq(&dir, "Undetermined_S0_R1_001.fastq.gz", HEADER, 1)?;
    let missing = dir.join("Undetermined_S0_L001_I1_001.fastq.gz");

    let mut archive_dirs = Vec::new();
    let mut parse_failures = 0;
    let mut io_failures = 0;
    for path in [&good, &bad_header, &bad_name, &missing] {
        match IlluminaFastq::open(path) {
            Ok(fq) => archive_dirs.push(fq.build_archive_dir()),
            Err(e) if e.is_parse_error() => parse_failures += 1,
            Err(IlluminaFastqError::Io { .. }) => io_failures += 1,
            Err(e) => return Err(e.into()),
        }
    }
    assert_eq!(archive_dirs, vec![format!("{RUN_NAME}_L001")]);
    assert_eq!(parse_failures, 2);
    assert_eq!(io_failures, 1);

    let err = IlluminaFastq::open(&bad_name).unwrap_err();
    assert!(matches!(
        err,
        IlluminaFastqError::Parse(ParseError::MissingLane { .. })
    ));
    Ok(())
}
