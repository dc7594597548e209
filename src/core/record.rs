use std::io;

/// A labelled sequence as read from or written to a FASTA file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Raw annotation string (the FASTA name)
    pub label: String,

    /// Residue symbols, byte for byte
    pub residues: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(label: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            residues: residues.into(),
        }
    }
}

/// Sequential supplier of records.
///
/// Sources are moved onto the reader thread, hence the `Send` bound.
pub trait RecordSource: Send {
    /// Read the next record, or `Ok(None)` once the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O or format error. Callers treat any error as
    /// fatal to the run.
    fn next_record(&mut self) -> io::Result<Option<SequenceRecord>>;
}

/// Consumer of output records
pub trait RecordSink {
    /// Write one record.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn write_record(&mut self, record: &SequenceRecord) -> io::Result<()>;

    /// Flush anything buffered. Called once after the last record.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory source yielding records in order
#[derive(Debug, Default)]
pub struct VecSource {
    records: std::vec::IntoIter<SequenceRecord>,
}

impl VecSource {
    pub fn new(records: Vec<SequenceRecord>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl RecordSource for VecSource {
    fn next_record(&mut self) -> io::Result<Option<SequenceRecord>> {
        Ok(self.records.next())
    }
}

impl RecordSink for Vec<SequenceRecord> {
    fn write_record(&mut self, record: &SequenceRecord) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}
