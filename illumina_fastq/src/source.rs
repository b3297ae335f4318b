//! Streams an `IlluminaFastq` can be built from: a readable FASTQ stream that
//! also knows its path and its total (decompressed) size.

use flate2::read::MultiGzDecoder;
use log::debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

const GZ_BUF_SIZE: usize = 1 << 20;
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// A FASTQ byte stream positioned at the start of the file content.
pub trait FastqSource: BufRead {
    /// The path the stream was opened from, passed through unmodified.
    fn name(&self) -> &str;

    /// Total size of the (decompressed) content in bytes, independent of how
    /// much has been read so far. May move the read position to the end of
    /// the stream.
    fn content_len(&mut self) -> io::Result<u64>;
}

impl<S: FastqSource + ?Sized> FastqSource for &mut S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn content_len(&mut self) -> io::Result<u64> {
        (**self).content_len()
    }
}

enum FileReader {
    Plain(BufReader<File>),
    Gzip(BufReader<MultiGzDecoder<File>>),
}

/// A plain or gzip-compressed FASTQ file on disk. Compression is detected from
/// the magic bytes at the start of the file, not from the extension.
pub struct FastqFile {
    name: String,
    reader: FileReader,
    /// Decompressed bytes handed out so far.
    position: u64,
}

impl FastqFile {
    pub fn open(path: impl AsRef<Path>) -> io::Result<FastqFile> {
        let path = path.as_ref();
        let mut file = File::open(path)?;

        let mut magic = Vec::with_capacity(GZIP_MAGIC.len());
        (&mut file).take(GZIP_MAGIC.len() as u64).read_to_end(&mut magic)?;
        file.rewind()?;

        let reader = if magic == GZIP_MAGIC {
            debug!("opening {} as gzipped FASTQ", path.display());
            FileReader::Gzip(BufReader::with_capacity(
                GZ_BUF_SIZE,
                MultiGzDecoder::new(file),
            ))
        } else {
            debug!("opening {} as plain FASTQ", path.display());
            FileReader::Plain(BufReader::with_capacity(32 * 1024, file))
        };

        Ok(FastqFile {
            name: path.to_string_lossy().into_owned(),
            reader,
            position: 0,
        })
    }

    pub fn is_gzipped(&self) -> bool {
        matches!(self.reader, FileReader::Gzip(_))
    }
}

impl Read for FastqFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = match &mut self.reader {
            FileReader::Plain(r) => r.read(buf)?,
            FileReader::Gzip(r) => r.read(buf)?,
        };
        self.position += n as u64;
        Ok(n)
    }
}

impl BufRead for FastqFile {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match &mut self.reader {
            FileReader::Plain(r) => r.fill_buf(),
            FileReader::Gzip(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        self.position += amt as u64;
        match &mut self.reader {
            FileReader::Plain(r) => r.consume(amt),
            FileReader::Gzip(r) => r.consume(amt),
        }
    }
}

impl FastqSource for FastqFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_len(&mut self) -> io::Result<u64> {
        match &mut self.reader {
            FileReader::Plain(r) => Ok(r.get_ref().metadata()?.len()),
            // A gzip stream has no index, so seeking to the end means
            // decompressing whatever is left.
            FileReader::Gzip(r) => {
                self.position += io::copy(r, &mut io::sink())?;
                Ok(self.position)
            }
        }
    }
}

/// Any seekable reader with a path-like name attached, e.g. an in-memory
/// `Cursor` standing in for a file.
#[derive(Debug)]
pub struct NamedReader<R> {
    name: String,
    inner: R,
}

impl<R: BufRead + Seek> NamedReader<R> {
    pub fn new(name: impl Into<String>, inner: R) -> NamedReader<R> {
        NamedReader {
            name: name.into(),
            inner,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> Read for NamedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: BufRead> BufRead for NamedReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
    }
}

impl<R: BufRead + Seek> FastqSource for NamedReader<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn content_len(&mut self) -> io::Result<u64> {
        let pos = self.inner.stream_position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.inner.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }
}
