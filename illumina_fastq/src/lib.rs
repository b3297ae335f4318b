//! Validation of Illumina FASTQ files before archiving.
//!
//! An [`IlluminaFastq`] is built from a FASTQ stream and the path it came from.
//! The run folder and bcl2fastq filename in the path, and the first header
//! line of the content, are parsed once; the two are then cross-checked so
//! that a mislabeled or misplaced file is caught before it is archived.
//!
//! ```no_run
//! use illumina_fastq::IlluminaFastq;
//!
//! let mut fq = IlluminaFastq::open(
//!     "Miseq/160511_M03543_0047_000000000-APE6Y/Data/Intensities/BaseCalls/\
//!      Undetermined_S0_L001_R1_001.fastq.gz",
//! )?;
//! if fq.check_fp_vs_content() && fq.check_file_size(50)? {
//!     println!("archive into {}", fq.build_archive_dir());
//! }
//! # Ok::<(), illumina_fastq::IlluminaFastqError>(())
//! ```
#![expect(missing_docs)]

pub mod errors;
mod illumina_fastq;
pub mod illumina_header_info;
pub mod machine_type;
pub mod params;
pub mod run_folder;
pub mod source;

pub use errors::{IlluminaFastqError, ParseError};
pub use illumina_fastq::{IlluminaFastq, Mismatch, ValidationReport};
pub use illumina_header_info::HeaderMetadata;
pub use params::ArchiveParams;
pub use run_folder::{ReadKind, ReadType, RunPathMetadata};
pub use source::{FastqFile, FastqSource, NamedReader};
