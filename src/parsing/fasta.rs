//! FASTA input and output using noodles.
//!
//! The record label is the FASTA name, i.e. the definition line up to the
//! first whitespace; descriptions are dropped. Residues are kept byte for byte.
//!
//! Paths ending in `.gz` or `.bgz` are read through a multi-member gzip
//! decoder and written gzip-compressed. `-` means stdin/stdout.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use noodles::fasta;

use crate::core::record::{RecordSink, RecordSource, SequenceRecord};

/// Path standing for stdin or stdout
pub const STDIO_PATH: &str = "-";

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Drop the path when it stands for stdin/stdout
pub fn file_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.as_os_str() != STDIO_PATH)
}

/// Reads [`SequenceRecord`]s from FASTA.
///
/// A definition line without a name (a bare `>`) is rejected by noodles as
/// `InvalidData`, which fails the run like any other read error. Records
/// without a name in their annotation still need a non-empty FASTA name,
/// e.g. `>size=3`.
pub struct FastaSource<R> {
    reader: fasta::io::Reader<R>,
}

impl<R: BufRead> FastaSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: fasta::io::Reader::new(inner),
        }
    }
}

impl<R: BufRead + Send> RecordSource for FastaSource<R> {
    fn next_record(&mut self) -> io::Result<Option<SequenceRecord>> {
        let Some(record) = self.reader.records().next().transpose()? else {
            return Ok(None);
        };

        Ok(Some(SequenceRecord {
            label: String::from_utf8_lossy(record.name()).into_owned(),
            residues: record.sequence().as_ref().to_vec(),
        }))
    }
}

/// Open a FASTA input, decompressing `.gz`/`.bgz` files.
///
/// `None` or `-` reads stdin.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be opened.
pub fn open_input(path: Option<&Path>) -> io::Result<FastaSource<Box<dyn BufRead + Send>>> {
    let inner: Box<dyn BufRead + Send> = match file_path(path) {
        None => Box::new(BufReader::new(io::stdin())),
        Some(path) if is_gzipped(path) => {
            Box::new(BufReader::new(MultiGzDecoder::new(File::open(path)?)))
        }
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
    };

    Ok(FastaSource::new(inner))
}

/// Writes [`SequenceRecord`]s as FASTA, wrapping residues at 80 per line
pub struct FastaSink<W> {
    inner: W,
}

impl<W: Write> FastaSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RecordSink for FastaSink<W> {
    fn write_record(&mut self, record: &SequenceRecord) -> io::Result<()> {
        let definition = fasta::record::Definition::new(record.label.as_str(), None);
        let sequence = fasta::record::Sequence::from(record.residues.clone());
        let record = fasta::Record::new(definition, sequence);

        fasta::io::Writer::new(&mut self.inner).write_record(&record)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Destination stream for FASTA output
pub enum Output {
    Stdout(BufWriter<io::Stdout>),
    File(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Output {
    /// Flush and, for gzip, write the trailer.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the final flush.
    pub fn finish(self) -> io::Result<()> {
        match self {
            Self::Stdout(mut w) => w.flush(),
            Self::File(mut w) => w.flush(),
            Self::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(w) => w.write(buf),
            Self::File(w) => w.write(buf),
            Self::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
            Self::Gzip(w) => w.flush(),
        }
    }
}

/// Create a FASTA output, gzip-compressing `.gz`/`.bgz` paths.
///
/// `None` or `-` writes stdout.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be created.
pub fn create_output(path: Option<&Path>) -> io::Result<FastaSink<Output>> {
    let output = match file_path(path) {
        None => Output::Stdout(BufWriter::new(io::stdout())),
        Some(path) if is_gzipped(path) => Output::Gzip(GzEncoder::new(
            BufWriter::new(File::create(path)?),
            Compression::default(),
        )),
        Some(path) => Output::File(BufWriter::new(File::create(path)?)),
    };

    Ok(FastaSink::new(output))
}
