//! Error types returned while building an [`IlluminaFastq`](crate::IlluminaFastq).
//!
//! Malformed input (a path or header that does not have the expected shape)
//! is a [`ParseError`]; a failure of the underlying stream is an I/O error.
//! Well-formed files whose path and content disagree are not errors at all,
//! the `check_*` methods report those as `false`.

use std::path::PathBuf;

/// The ways a run-folder path or a FASTQ header can fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("No Illumina run folder (YYMMDD_<machine>_<run>_<flowcell>) found in path {path:?}")]
    NoRunFolder { path: String },

    #[error("Run folder name {run_name:?} is too short to contain a YYMMDD date")]
    RunNameTooShort { run_name: String },

    #[error("Run folder name {run_name:?} does not start with a valid YYMMDD date")]
    InvalidRunDate { run_name: String },

    #[error("Run folder name {run_name:?} does not have <date>_<machine>_<run>_<flowcell> fields")]
    MalformedRunName { run_name: String },

    #[error("FASTQ filename {filename:?} has no lane token (L###)")]
    MissingLane { filename: String },

    #[error("FASTQ filename {filename:?} has no read token (R# or I#)")]
    MissingReadType { filename: String },

    #[error("FASTQ stream {path:?} is empty, expected a header line")]
    EmptyFile { path: String },

    #[error("First line of FASTQ {path:?} is longer than {max_len} bytes, not a FASTQ header")]
    HeaderTooLong { path: String, max_len: usize },

    #[error("FASTQ header {header:?} does not start with '@'")]
    NotAHeader { header: String },

    #[error(
        "FASTQ header {header:?} has {found} colon-separated read name fields, expected at \
         least {expected}"
    )]
    TooFewReadNameFields {
        header: String,
        found: usize,
        expected: usize,
    },

    #[error("FASTQ header {header:?} is missing the <read>:<filter>:<control> comment fields")]
    MissingComment { header: String },

    /// Only raised when the platform name itself is asked for.
    #[error("Unknown Illumina instrument prefix in instrument ID {instrument:?}")]
    UnknownInstrument { instrument: String },
}

/// Any failure while constructing or querying an `IlluminaFastq`.
#[derive(Debug, thiserror::Error)]
pub enum IlluminaFastqError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error reading FASTQ {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IlluminaFastqError {
    /// True for malformed path/header input. A batch caller can skip the file
    /// and continue on these, while an I/O error usually means the run is unreadable.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, IlluminaFastqError::Parse(_))
    }
}

/// Attach the FASTQ path to an `io::Error`.
pub(crate) trait IoErrorExt<T> {
    fn fastq_io_err(self, path: &std::path::Path) -> Result<T, IlluminaFastqError>;
}

impl<T> IoErrorExt<T> for std::io::Result<T> {
    fn fastq_io_err(self, path: &std::path::Path) -> Result<T, IlluminaFastqError> {
        self.map_err(|source| IlluminaFastqError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
