use crate::core::annotation::{Annotation, SIZE_KEY};
use crate::core::record::SequenceRecord;

/// A set of records sharing identical residues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Name parsed from the first record with these residues; never changes
    pub id: String,

    /// Summed abundance of every merged record
    pub size: u64,

    /// Residues shared by every merged record
    pub residues: Vec<u8>,

    /// Labels of every merged record, in arrival order
    pub merged: Vec<String>,
}

impl Cluster {
    /// Start a cluster from the first record carrying `residues`
    pub fn new(label: impl Into<String>, residues: Vec<u8>) -> Self {
        let label = label.into();
        let Annotation { name, size } = Annotation::parse(&label);

        Self {
            id: name,
            size,
            residues,
            merged: vec![label],
        }
    }

    /// Fold another record with the same residues into this cluster.
    ///
    /// The id is left untouched; the abundance saturates rather than wraps.
    pub fn absorb(&mut self, label: impl Into<String>) {
        let label = label.into();
        let size = Annotation::parse(&label).size;
        self.size = self.size.saturating_add(size);
        self.merged.push(label);
    }

    /// Label written on output: `{id};size={size}`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{};{SIZE_KEY}={}", self.id, self.size)
    }

    /// Number of records merged into this cluster
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.merged.len()
    }

    /// Convert into the record written on output
    #[must_use]
    pub fn into_record(self) -> SequenceRecord {
        SequenceRecord {
            label: self.label(),
            residues: self.residues,
        }
    }
}

impl From<SequenceRecord> for Cluster {
    fn from(record: SequenceRecord) -> Self {
        Self::new(record.label, record.residues)
    }
}
