//! # derep
//!
//! A library for dereplicating biological sequence records.
//!
//! Amplicon and metagenomic read sets often contain the same sequence many
//! times over, across reads and across samples. Before clustering or
//! alignment those copies are merged into one record whose abundance is the
//! sum of theirs.
//!
//! `derep` reads records whose labels are semicolon-delimited annotations
//! (`>otu1;sample=s1;size=12`), merges records with identical residues,
//! optionally drops clusters outside an abundance range, and writes the
//! survivors as `>{name};size={abundance}`, most abundant first.
//!
//! ## Features
//!
//! - **Exact merging**: Records are keyed by their residues byte for byte
//! - **Forgiving annotations**: Missing or malformed names and sizes fall back to defaults
//! - **Abundance filtering**: Inclusive `--min`/`--max` bounds, `0` disables a side
//! - **Deterministic output**: Descending abundance, ties broken by name
//! - **Bounded reading**: Input is read on a separate thread that stays one record ahead
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use derep::dereplication::pipeline::{DerepConfig, Pipeline};
//! use derep::parsing::fasta::{create_output, open_input};
//! use derep::SizeFilter;
//!
//! let source = open_input(Some(Path::new("reads.fasta"))).unwrap();
//! let mut sink = create_output(Some(Path::new("merged.fasta"))).unwrap();
//!
//! let config = DerepConfig {
//!     filter: SizeFilter::new(2, 0),
//!     ..DerepConfig::default()
//! };
//! let summary = Pipeline::new(config).run(source, &mut sink).unwrap();
//! sink.into_inner().finish().unwrap();
//!
//! println!("{} clusters written", summary.clusters_written);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Annotations, clusters, and the record source/sink traits
//! - [`dereplication`]: Cluster store, filter, ordering, and the pipeline
//! - [`parsing`]: FASTA input and output
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod dereplication;
pub mod parsing;

// Re-export commonly used types for convenience
pub use crate::core::annotation::Annotation;
pub use crate::core::cluster::Cluster;
pub use crate::core::record::{RecordSink, RecordSource, SequenceRecord};
pub use crate::dereplication::filter::SizeFilter;
pub use crate::dereplication::pipeline::{DerepConfig, Pipeline, PipelineError, RunSummary};
pub use crate::dereplication::store::ClusterStore;
