use crate::errors::{IlluminaFastqError, IoErrorExt, ParseError};
use crate::illumina_header_info::HeaderMetadata;
use crate::params::ArchiveParams;
use crate::run_folder::RunPathMetadata;
use crate::source::{FastqFile, FastqSource};
use log::debug;
use std::fmt;
use std::io::{BufRead, Read};
use std::path::Path;

/// Longest first line accepted as a header, not counting the newline.
const MAX_HEADER_LEN: usize = 64 * 1024;

/// One disagreement between the metadata in a FASTQ path and its first header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    Lane { path: String, header: String },
    Flowcell { path: String, header: String },
    Machine { path: String, header: String },
    /// Only the read number is compared, so `R1` and `I1` look the same.
    ReadNumber { path: String, header: String },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (what, path, header) = match self {
            Mismatch::Lane { path, header } => ("lane", path, header),
            Mismatch::Flowcell { path, header } => ("flowcell", path, header),
            Mismatch::Machine { path, header } => ("machine", path, header),
            Mismatch::ReadNumber { path, header } => ("read number", path, header),
        };
        write!(f, "{what} is {path:?} in the file path but {header:?} in the FASTQ header")
    }
}

/// Outcome of all archive checks on one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub mismatches: Vec<Mismatch>,
    pub has_index_read: bool,
    pub index_read_required: bool,
    pub large_enough: bool,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
            && self.large_enough
            && (self.has_index_read || !self.index_read_required)
    }
}

/// A FASTQ file from an Illumina run folder, with the metadata from its path
/// and from its first header line parsed up front.
///
/// Only the first line of the stream is read at construction. The stream is
/// owned for the lifetime of the value and handed back by [`into_inner`](Self::into_inner);
/// pass `&mut source` to keep ownership instead.
pub struct IlluminaFastq<S> {
    source: S,
    run_info: RunPathMetadata,
    header: HeaderMetadata,
}

impl IlluminaFastq<FastqFile> {
    /// Open a plain or gzipped FASTQ file on disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IlluminaFastqError> {
        let path = path.as_ref();
        let file = FastqFile::open(path).fastq_io_err(path)?;
        IlluminaFastq::new(file)
    }
}

impl<S: FastqSource> IlluminaFastq<S> {
    pub fn new(source: S) -> Result<Self, IlluminaFastqError> {
        IlluminaFastq::with_params(source, &ArchiveParams::default())
    }

    /// Like [`new`](Self::new), with run folders located using `params.platform_dirs`.
    pub fn with_params(mut source: S, params: &ArchiveParams) -> Result<Self, IlluminaFastqError> {
        let path = source.name().to_string();

        let mut line = Vec::new();
        let n = (&mut source)
            .take(MAX_HEADER_LEN as u64 + 1)
            .read_until(b'\n', &mut line)
            .fastq_io_err(Path::new(&path))?;
        if n == 0 {
            return Err(ParseError::EmptyFile { path }.into());
        }
        if line.len() > MAX_HEADER_LEN && line.last() != Some(&b'\n') {
            return Err(ParseError::HeaderTooLong {
                path,
                max_len: MAX_HEADER_LEN,
            }
            .into());
        }

        let run_info = RunPathMetadata::parse(&path, &params.platform_dirs)?;
        let header = HeaderMetadata::parse(&String::from_utf8_lossy(&line))?;
        debug!(
            "{path}: run {} lane {} read {}, header instrument {} flowcell {}",
            run_info.run_name, run_info.lane, run_info.read_type, header.instrument_id, header.flowcell_id
        );

        Ok(IlluminaFastq {
            source,
            run_info,
            header,
        })
    }

    /// Platform name derived from the header's instrument ID, e.g. `Illumina-MiSeq`.
    /// Fails for an instrument prefix that is not in the platform table; the
    /// other checks still work for such a file.
    pub fn machine_type(&self) -> Result<&'static str, ParseError> {
        self.header
            .machine_type
            .ok_or_else(|| ParseError::UnknownInstrument {
                instrument: self.header.instrument_id.clone(),
            })
    }

    /// Run date from the run folder name, `YYYY-MM-DD`.
    pub fn date(&self) -> String {
        self.run_info.iso_date()
    }

    /// Lane from the filename.
    pub fn lane(&self) -> &str {
        &self.run_info.lane
    }

    pub fn filepath(&self) -> &str {
        self.source.name()
    }

    pub fn run_name(&self) -> &str {
        &self.run_info.run_name
    }

    pub fn run_info(&self) -> &RunPathMetadata {
        &self.run_info
    }

    pub fn header_info(&self) -> &HeaderMetadata {
        &self.header
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Every field where the path and the header disagree.
    pub fn compare_fp_vs_content(&self) -> Vec<Mismatch> {
        let path = &self.run_info;
        let header = &self.header;
        let mut mismatches = Vec::new();

        if path.lane != header.lane {
            mismatches.push(Mismatch::Lane {
                path: path.lane.clone(),
                header: header.lane.clone(),
            });
        }
        if path.flowcell_id != header.flowcell_id {
            mismatches.push(Mismatch::Flowcell {
                path: path.flowcell_id.clone(),
                header: header.flowcell_id.clone(),
            });
        }
        if path.machine_id != header.instrument_id {
            mismatches.push(Mismatch::Machine {
                path: path.machine_id.clone(),
                header: header.instrument_id.clone(),
            });
        }
        let path_read = path.read_type.number.to_string();
        if path_read != header.read_number {
            mismatches.push(Mismatch::ReadNumber {
                path: path_read,
                header: header.read_number.clone(),
            });
        }
        mismatches
    }

    /// True if lane, flowcell, machine and read number in the path all agree
    /// with the header. An `R1` and an `I1` file are not told apart.
    pub fn check_fp_vs_content(&self) -> bool {
        let mismatches = self.compare_fp_vs_content();
        for m in &mismatches {
            debug!("{}: {m}", self.filepath());
        }
        mismatches.is_empty()
    }

    pub fn check_index_read_exists(&self) -> bool {
        self.header.has_index_read()
    }

    /// `<run name>_L<lane>` with the lane zero-padded to three digits. Uses
    /// only the path, so it is available for files that fail the content check.
    pub fn build_archive_dir(&self) -> String {
        format!("{}_L{:0>3}", self.run_info.run_name, self.run_info.lane)
    }

    /// True if the decompressed content is strictly larger than `min_size_bytes`.
    pub fn check_file_size(&mut self, min_size_bytes: u64) -> Result<bool, IlluminaFastqError> {
        let size = self
            .source
            .content_len()
            .fastq_io_err(Path::new(self.source.name()))?;
        debug!("{}: {size} bytes", self.source.name());
        Ok(size > min_size_bytes)
    }

    /// Run all archive checks with the thresholds in `params`.
    pub fn validate(&mut self, params: &ArchiveParams) -> Result<ValidationReport, IlluminaFastqError> {
        let mismatches = self.compare_fp_vs_content();
        for m in &mismatches {
            debug!("{}: {m}", self.filepath());
        }
        Ok(ValidationReport {
            mismatches,
            has_index_read: self.check_index_read_exists(),
            index_read_required: params.require_index_read,
            large_enough: self.check_file_size(params.min_file_size)?,
        })
    }
}

impl<S> fmt::Debug for IlluminaFastq<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IlluminaFastq")
            .field("run_info", &self.run_info)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}
