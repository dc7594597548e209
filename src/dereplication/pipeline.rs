use std::io;
use std::thread;

use crossbeam_channel::{bounded, Sender};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::record::{RecordSink, RecordSource, SequenceRecord};
use crate::dereplication::filter::SizeFilter;
use crate::dereplication::ordering::sort_by_abundance;
use crate::dereplication::store::ClusterStore;

/// Capacity of the reader-to-store channel. Zero makes every send wait for
/// the matching receive, so the reader holds at most one unsent record.
const HANDOFF_CAPACITY: usize = 0;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input record: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write record '{label}': {source}")]
    Write {
        label: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to finish writing output: {0}")]
    Flush(#[source] io::Error),

    #[error("Record reader thread panicked")]
    ReaderPanicked,
}

/// Configuration for a run
#[derive(Debug, Clone, Serialize)]
pub struct DerepConfig {
    /// Abundance bounds applied after merging
    pub filter: SizeFilter,
    /// Emit by descending abundance, then id; otherwise first-seen order
    pub sort: bool,
    /// Merge records with identical residues; otherwise each record is its own cluster
    pub merge: bool,
}

impl Default for DerepConfig {
    fn default() -> Self {
        Self {
            filter: SizeFilter::default(),
            sort: true,
            merge: true,
        }
    }
}

/// Counts describing a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub records_read: usize,
    pub clusters: usize,
    pub clusters_written: usize,
    pub clusters_filtered: usize,
    pub total_abundance: u64,
    pub written_abundance: u64,
}

/// Reads records on a background thread, folds them into a [`ClusterStore`],
/// then filters, orders, and writes the clusters.
///
/// The reader hands records over a zero-capacity channel, so it is never
/// more than one record ahead of the store. Output starts only after the
/// input is exhausted since any later record may still grow a cluster.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: DerepConfig,
}

impl Pipeline {
    pub fn new(config: DerepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DerepConfig {
        &self.config
    }

    /// Execute one complete run.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Read` if the source fails (nothing is written in
    /// that case), `PipelineError::Write` or `PipelineError::Flush` if the
    /// sink fails, and `PipelineError::ReaderPanicked` if the reader thread
    /// panics. No step is retried.
    pub fn run<S, W>(&self, source: S, sink: &mut W) -> Result<RunSummary, PipelineError>
    where
        S: RecordSource,
        W: RecordSink + ?Sized,
    {
        let store = self.collect(source)?;
        self.emit(store, sink)
    }

    /// Ingest every record from `source` into a fresh store
    fn collect<S: RecordSource>(&self, source: S) -> Result<ClusterStore, PipelineError> {
        let (tx, rx) = bounded::<SequenceRecord>(HANDOFF_CAPACITY);

        let mut store = if self.config.merge {
            ClusterStore::new()
        } else {
            ClusterStore::unmerged()
        };

        thread::scope(|scope| {
            let reader = scope.spawn(move || produce(source, tx));

            // Ends once the reader drops its sender, on EOF or error
            for record in &rx {
                store.ingest(record);
            }

            match reader.join() {
                Ok(Ok(count)) => {
                    debug!("Reader finished after {count} records");
                    Ok(())
                }
                Ok(Err(e)) => Err(PipelineError::Read(e)),
                Err(_) => Err(PipelineError::ReaderPanicked),
            }
        })?;

        debug!(
            "Ingested {} records into {} clusters",
            store.records_ingested(),
            store.len()
        );

        Ok(store)
    }

    /// Drain, filter, order, and write
    fn emit<W>(&self, store: ClusterStore, sink: &mut W) -> Result<RunSummary, PipelineError>
    where
        W: RecordSink + ?Sized,
    {
        let records_read = store.records_ingested();
        let mut clusters = store.drain();

        let cluster_count = clusters.len();
        let total_abundance = clusters
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.size));

        let filter = self.config.filter;
        clusters.retain(|c| filter.passes(c));

        if clusters.is_empty() && cluster_count > 0 {
            warn!(
                "All {cluster_count} clusters were removed by the size filter (min={}, max={})",
                filter.min, filter.max
            );
        }

        if self.config.sort {
            sort_by_abundance(&mut clusters);
        }

        let clusters_written = clusters.len();
        let mut written_abundance = 0u64;

        for cluster in clusters {
            written_abundance = written_abundance.saturating_add(cluster.size);
            let record = cluster.into_record();
            sink.write_record(&record)
                .map_err(|source| PipelineError::Write {
                    label: record.label.clone(),
                    source,
                })?;
        }

        sink.finish().map_err(PipelineError::Flush)?;

        let summary = RunSummary {
            records_read,
            clusters: cluster_count,
            clusters_written,
            clusters_filtered: cluster_count - clusters_written,
            total_abundance,
            written_abundance,
        };

        info!(
            "Read {} records into {} clusters; wrote {} ({} filtered)",
            summary.records_read,
            summary.clusters,
            summary.clusters_written,
            summary.clusters_filtered
        );

        Ok(summary)
    }
}

/// Reader thread body: forward records until EOF, error, or the receiver hangs up
fn produce<S: RecordSource>(mut source: S, tx: Sender<SequenceRecord>) -> io::Result<usize> {
    let mut count = 0;

    while let Some(record) = source.next_record()? {
        if tx.send(record).is_err() {
            // Receiver dropped
            break;
        }
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::VecSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn record(label: &str, residues: &str) -> SequenceRecord {
        SequenceRecord::new(label, residues)
    }

    fn labels(records: &[SequenceRecord]) -> Vec<&str> {
        records.iter().map(|r| r.label.as_str()).collect()
    }

    /// Yields its records, then fails
    struct FailingSource {
        records: Vec<SequenceRecord>,
    }

    impl RecordSource for FailingSource {
        fn next_record(&mut self) -> io::Result<Option<SequenceRecord>> {
            if self.records.is_empty() {
                Err(io::Error::new(io::ErrorKind::InvalidData, "truncated record"))
            } else {
                Ok(Some(self.records.remove(0)))
            }
        }
    }

    struct PanickingSource;

    impl RecordSource for PanickingSource {
        fn next_record(&mut self) -> io::Result<Option<SequenceRecord>> {
            panic!("reader exploded");
        }
    }

    /// Counts every record it hands out
    struct CountingSource {
        produced: Arc<AtomicUsize>,
        remaining: usize,
    }

    impl RecordSource for CountingSource {
        fn next_record(&mut self) -> io::Result<Option<SequenceRecord>> {
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            self.produced.fetch_add(1, Ordering::SeqCst);
            Ok(Some(record("r;size=1", "ACGT")))
        }
    }

    /// Accepts `limit` records, then fails
    struct FailingSink {
        limit: usize,
        written: Vec<SequenceRecord>,
    }

    impl RecordSink for FailingSink {
        fn write_record(&mut self, record: &SequenceRecord) -> io::Result<()> {
            if self.written.len() == self.limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "disk full"));
            }
            self.written.push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn test_merges_identical_residues() {
        let source = VecSource::new(vec![
            record("foo;size=100", "ATTC"),
            record("bar;size=10", "ATTC"),
            record("size=4;spam", "ATTC"),
        ]);
        let mut sink = Vec::new();

        let summary = Pipeline::default().run(source, &mut sink).unwrap();

        assert_eq!(sink, vec![record("foo;size=114", "ATTC")]);
        assert_eq!(summary.records_read, 3);
        assert_eq!(summary.clusters, 1);
        assert_eq!(summary.total_abundance, 114);
        assert_eq!(summary.written_abundance, 114);
    }

    #[test]
    fn test_sorted_output() {
        let source = VecSource::new(vec![
            record("B;size=100", "AAAA"),
            record("small;size=2", "CCCC"),
            record("A;size=100", "GGGG"),
            record("big;size=500", "TTTT"),
        ]);
        let mut sink = Vec::new();

        Pipeline::default().run(source, &mut sink).unwrap();

        assert_eq!(
            labels(&sink),
            vec!["big;size=500", "A;size=100", "B;size=100", "small;size=2"]
        );
    }

    #[test]
    fn test_unsorted_output_in_first_seen_order() {
        let config = DerepConfig {
            sort: false,
            ..DerepConfig::default()
        };
        let source = VecSource::new(vec![
            record("small;size=2", "CCCC"),
            record("big;size=500", "TTTT"),
            record("dup;size=1", "CCCC"),
        ]);
        let mut sink = Vec::new();

        Pipeline::new(config).run(source, &mut sink).unwrap();

        assert_eq!(labels(&sink), vec!["small;size=3", "big;size=500"]);
    }

    #[test]
    fn test_min_filter_removes_everything() {
        let config = DerepConfig {
            filter: SizeFilter::new(100, SizeFilter::DISABLED),
            ..DerepConfig::default()
        };
        let source = VecSource::new(vec![record("a", "ACGT"), record("b", "TTTT")]);
        let mut sink = Vec::new();

        let summary = Pipeline::new(config).run(source, &mut sink).unwrap();

        assert!(sink.is_empty());
        assert_eq!(summary.clusters, 2);
        assert_eq!(summary.clusters_filtered, 2);
    }

    #[test]
    fn test_max_filter_boundary() {
        let config = DerepConfig {
            filter: SizeFilter::new(SizeFilter::DISABLED, 100),
            ..DerepConfig::default()
        };
        let source = VecSource::new(vec![
            record("over;size=101", "ACGT"),
            record("at;size=100", "TTTT"),
        ]);
        let mut sink = Vec::new();

        Pipeline::new(config).run(source, &mut sink).unwrap();

        assert_eq!(labels(&sink), vec!["at;size=100"]);
    }

    #[test]
    fn test_filter_applies_to_merged_size() {
        let config = DerepConfig {
            filter: SizeFilter::new(3, SizeFilter::DISABLED),
            ..DerepConfig::default()
        };
        let source = VecSource::new(vec![
            record("a", "ACGT"),
            record("b;size=2", "ACGT"),
            record("c;size=2", "GGGG"),
        ]);
        let mut sink = Vec::new();

        Pipeline::new(config).run(source, &mut sink).unwrap();

        assert_eq!(sink, vec![record("a;size=3", "ACGT")]);
    }

    #[test]
    fn test_unmerged_run_keeps_duplicates() {
        let config = DerepConfig {
            merge: false,
            ..DerepConfig::default()
        };
        let source = VecSource::new(vec![
            record("x;size=1", "ACGT"),
            record("y;size=9;sample=s2", "ACGT"),
        ]);
        let mut sink = Vec::new();

        let summary = Pipeline::new(config).run(source, &mut sink).unwrap();

        assert_eq!(labels(&sink), vec!["y;size=9", "x;size=1"]);
        assert_eq!(summary.clusters, 2);
    }

    #[test]
    fn test_empty_input() {
        let mut sink = Vec::new();
        let summary = Pipeline::default()
            .run(VecSource::default(), &mut sink)
            .unwrap();

        assert!(sink.is_empty());
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_read_error_is_fatal_and_writes_nothing() {
        let source = FailingSource {
            records: vec![record("a", "ACGT"), record("b", "ACGT")],
        };
        let mut sink = Vec::new();

        let result = Pipeline::default().run(source, &mut sink);

        assert!(matches!(result, Err(PipelineError::Read(_))));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_reader_panic_is_reported() {
        let mut sink = Vec::new();
        let result = Pipeline::default().run(PanickingSource, &mut sink);
        assert!(matches!(result, Err(PipelineError::ReaderPanicked)));
    }

    #[test]
    fn test_write_error_is_fatal() {
        let source = VecSource::new(vec![
            record("a;size=5", "AAAA"),
            record("b;size=4", "CCCC"),
            record("c;size=3", "GGGG"),
        ]);
        let mut sink = FailingSink {
            limit: 1,
            written: Vec::new(),
        };

        let result = Pipeline::default().run(source, &mut sink);

        match result {
            Err(PipelineError::Write { label, .. }) => assert_eq!(label, "b;size=4"),
            other => panic!("Expected write error, got {other:?}"),
        }
        assert_eq!(sink.written.len(), 1);
    }

    #[test]
    fn test_reader_stays_one_record_ahead() {
        let produced = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            produced: Arc::clone(&produced),
            remaining: 100,
        };
        let (tx, rx) = bounded(HANDOFF_CAPACITY);
        let reader = thread::spawn(move || produce(source, tx));

        for received in 1..=3 {
            rx.recv().unwrap();
            // Give the reader time to run ahead if the channel would let it
            thread::sleep(Duration::from_millis(50));
            let ahead = produced.load(Ordering::SeqCst);
            assert!(
                ahead <= received + 1,
                "Reader produced {ahead} records while only {received} were received"
            );
        }

        // The reader is blocked handing over record 4; hanging up releases it
        drop(rx);
        assert_eq!(reader.join().unwrap().unwrap(), 3);
        assert!(produced.load(Ordering::SeqCst) <= 4);
    }

    #[test]
    fn test_large_input_through_rendezvous() {
        let records: Vec<SequenceRecord> = (0..5_000)
            .map(|i| record(&format!("r{i};size=2"), ["AC", "GT", "TT"][i % 3]))
            .collect();
        let mut sink = Vec::new();

        let summary = Pipeline::default()
            .run(VecSource::new(records), &mut sink)
            .unwrap();

        assert_eq!(summary.records_read, 5_000);
        assert_eq!(
            labels(&sink),
            vec!["r0;size=3334", "r1;size=3334", "r2;size=3332"]
        );
    }
}
