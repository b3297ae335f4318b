//! Metadata encoded in the path of a FASTQ file written by bcl2fastq into an
//! Illumina run folder, e.g.
//! `Miseq/160511_M03543_0047_000000000-APE6Y/Data/Intensities/BaseCalls/Undetermined_S0_L001_R1_001.fastq.gz`

use crate::errors::ParseError;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref RUN_FOLDER_REGEX: Regex = Regex::new(r"^[0-9]{6}_[^_]+_[0-9]+_[^_]+$").unwrap();
    static ref LANE_REGEX: Regex = Regex::new(r"^L([0-9]{3})$").unwrap();
    static ref READ_REGEX: Regex = Regex::new(r"^([RI])([0-9])$").unwrap();
    static ref BCL2FASTQ_REGEX: Regex =
        Regex::new(r"^([A-Za-z0-9_.-]+)_S([0-9]+)_L[0-9]{3}_[RI][0-9]_([0-9]+)\.fastq(\.gz)?$").unwrap();
}

/// Whether a FASTQ file holds a sequencing read (`R`) or an index read (`I`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadKind {
    Read,
    Index,
}

/// The `R1`/`R2`/`I1`/`I2` token of a bcl2fastq filename.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadType {
    pub kind: ReadKind,
    pub number: u8,
}

impl fmt::Display for ReadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.kind {
            ReadKind::Read => 'R',
            ReadKind::Index => 'I',
        };
        write!(f, "{letter}{}", self.number)
    }
}

/// Sample fields of a standard `<sample>_S<n>_L<lane>_<read>_<chunk>.fastq[.gz]` name.
/// Absent when the filename carries the lane and read tokens but is otherwise
/// non-standard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleInfo {
    pub sample: String,
    pub s: usize,
    pub chunk: usize,
}

/// Metadata parsed from the run folder and the filename of a FASTQ path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunPathMetadata {
    pub run_name: String,
    pub date: NaiveDate,
    pub machine_id: String,
    pub run_number: String,
    pub flowcell_id: String,
    /// Lane number without zero padding, `L001` → `"1"`.
    pub lane: String,
    pub read_type: ReadType,
    pub sample_info: Option<SampleInfo>,
}

impl RunPathMetadata {
    /// Parse a FASTQ path. The run folder is the directory directly under one
    /// of `platform_dirs`; if no such directory is present, the nearest
    /// ancestor directory named like a run folder is used instead.
    pub fn parse(path: &str, platform_dirs: &[String]) -> Result<RunPathMetadata, ParseError> {
        let mut segments: Vec<&str> = path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
        let filename = segments.pop().ok_or_else(|| ParseError::NoRunFolder {
            path: path.to_string(),
        })?;

        let run_name = find_run_name(&segments, platform_dirs).ok_or_else(|| {
            ParseError::NoRunFolder {
                path: path.to_string(),
            }
        })?;
        let RunName {
            date,
            machine_id,
            run_number,
            flowcell_id,
        } = parse_run_name(run_name)?;
        let (lane, read_type) = parse_filename_tokens(filename)?;

        let sample_info = BCL2FASTQ_REGEX.captures(filename).map(|cap| SampleInfo {
            sample: cap[1].to_string(),
            s: cap[2].parse().unwrap_or_default(),
            chunk: cap[3].parse().unwrap_or_default(),
        });

        Ok(RunPathMetadata {
            run_name: run_name.to_string(),
            date,
            machine_id,
            run_number,
            flowcell_id,
            lane,
            read_type,
            sample_info,
        })
    }

    /// The run date as `YYYY-MM-DD`.
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

fn find_run_name<'a>(dirs: &[&'a str], platform_dirs: &[String]) -> Option<&'a str> {
    let under_platform = dirs.windows(2).rev().find_map(|w| {
        platform_dirs
            .iter()
            .any(|p| p.eq_ignore_ascii_case(w[0]))
            .then_some(w[1])
    });
    if under_platform.is_some() {
        return under_platform;
    }
    let by_name = dirs
        .iter()
        .rev()
        .find(|d| RUN_FOLDER_REGEX.is_match(d))
        .copied();
    if let Some(run_name) = by_name {
        debug!("run folder {run_name} is not under a known platform directory");
    }
    by_name
}

struct RunName {
    date: NaiveDate,
    machine_id: String,
    run_number: String,
    flowcell_id: String,
}

/// Split a run folder name `YYMMDD_<machine>_<run>_<flowcell>` into its fields.
fn parse_run_name(run_name: &str) -> Result<RunName, ParseError> {
    let date_str = run_name
        .get(..6)
        .ok_or_else(|| ParseError::RunNameTooShort {
            run_name: run_name.to_string(),
        })?;
    let date = parse_run_date(date_str).ok_or_else(|| ParseError::InvalidRunDate {
        run_name: run_name.to_string(),
    })?;

    let fields: Vec<&str> = run_name.split('_').collect();
    if fields.len() < 4 || fields[1..4].iter().any(|f| f.is_empty()) {
        return Err(ParseError::MalformedRunName {
            run_name: run_name.to_string(),
        });
    }
    let flowcell = fields[3];
    let flowcell_id = flowcell.rsplit('-').next().unwrap_or(flowcell);

    Ok(RunName {
        date,
        machine_id: fields[1].to_string(),
        run_number: fields[2].to_string(),
        flowcell_id: flowcell_id.to_string(),
    })
}

/// `YYMMDD`, always in the 2000s.
fn parse_run_date(yymmdd: &str) -> Option<NaiveDate> {
    if !yymmdd.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = yymmdd[0..2].parse().ok()?;
    let month: u32 = yymmdd[2..4].parse().ok()?;
    let day: u32 = yymmdd[4..6].parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

/// `name.fastq.gz` → `name`. Only the trailing extensions are removed, so a
/// sample name may itself contain dots.
fn strip_fastq_extension(filename: &str) -> &str {
    let name = filename.strip_suffix(".gz").unwrap_or(filename);
    name.strip_suffix(".fastq")
        .or_else(|| name.strip_suffix(".fq"))
        .unwrap_or(name)
}

/// Find the `L###` and `R#`/`I#` tokens among the `_`-separated parts of a
/// FASTQ filename.
fn parse_filename_tokens(filename: &str) -> Result<(String, ReadType), ParseError> {
    let stem = strip_fastq_extension(filename);
    let mut lane = None;
    let mut read_type = None;
    for token in stem.split('_') {
        if let Some(cap) = LANE_REGEX.captures(token) {
            lane = cap[1].parse::<u32>().ok().map(|l| l.to_string());
        } else if let Some(cap) = READ_REGEX.captures(token) {
            let kind = if &cap[1] == "R" {
                ReadKind::Read
            } else {
                ReadKind::Index
            };
            read_type = cap[2].parse().ok().map(|number| ReadType { kind, number });
        }
    }

    let lane = lane.ok_or_else(|| ParseError::MissingLane {
        filename: filename.to_string(),
    })?;
    let read_type = read_type.ok_or_else(|| ParseError::MissingReadType {
        filename: filename.to_string(),
    })?;
    Ok((lane, read_type))
}
