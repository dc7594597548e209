use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::core::cluster::Cluster;
use crate::core::record::SequenceRecord;

/// Accumulates records into clusters keyed by exact residues.
///
/// Clusters are held in first-seen order. The index maps a hash of the
/// residues to the clusters carrying that hash, so each sequence is stored
/// once (in its cluster) and a lookup confirms the match against it. The
/// store is owned by a single consumer and needs no locking.
#[derive(Debug)]
pub struct ClusterStore {
    /// Clusters in the order their residues were first seen
    clusters: Vec<Cluster>,

    /// Index: residue hash -> positions in clusters with that hash
    hash_to_indices: HashMap<u64, Vec<usize>>,

    /// Hasher for residues
    hasher: RandomState,

    /// Whether records with identical residues are merged
    merge: bool,

    /// Number of records ingested
    records: usize,
}

impl Default for ClusterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterStore {
    /// Create an empty store that merges identical residues
    pub fn new() -> Self {
        Self {
            clusters: Vec::new(),
            hash_to_indices: HashMap::new(),
            hasher: RandomState::new(),
            merge: true,
            records: 0,
        }
    }

    /// Create an empty store where every record becomes its own cluster
    pub fn unmerged() -> Self {
        Self {
            merge: false,
            ..Self::new()
        }
    }

    /// Add a record, merging it into the existing cluster for its residues
    /// when there is one
    pub fn ingest(&mut self, record: SequenceRecord) {
        self.records += 1;

        if !self.merge {
            self.clusters.push(Cluster::from(record));
            return;
        }

        let hash = self.hasher.hash_one(record.residues.as_slice());
        self.merge_hashed(hash, record);
    }

    /// Merge `record` given the hash of its residues
    fn merge_hashed(&mut self, hash: u64, record: SequenceRecord) {
        if let Some(index) = self.find(hash, &record.residues) {
            self.clusters[index].absorb(record.label);
        } else {
            self.hash_to_indices
                .entry(hash)
                .or_default()
                .push(self.clusters.len());
            self.clusters.push(Cluster::from(record));
        }
    }

    /// Position of the cluster whose residues equal `residues`
    fn find(&self, hash: u64, residues: &[u8]) -> Option<usize> {
        self.hash_to_indices
            .get(&hash)?
            .iter()
            .copied()
            .find(|&idx| self.clusters[idx].residues == residues)
    }

    /// Look up the cluster holding `residues`
    pub fn get(&self, residues: &[u8]) -> Option<&Cluster> {
        if self.merge {
            let hash = self.hasher.hash_one(residues);
            self.find(hash, residues).map(|idx| &self.clusters[idx])
        } else {
            self.clusters.iter().find(|c| c.residues == residues)
        }
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of records ingested so far
    pub fn records_ingested(&self) -> usize {
        self.records
    }

    /// Hand over every cluster, ending the store's life.
    ///
    /// Clusters come out in first-seen order; callers that need a defined
    /// output order sort them afterwards.
    pub fn drain(self) -> Vec<Cluster> {
        self.clusters
    }
}
