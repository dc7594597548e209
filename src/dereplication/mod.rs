//! The dereplication engine.
//!
//! Records flow from a [`RecordSource`](crate::core::record::RecordSource)
//! through these stages:
//!
//! 1. [`store`]: records are merged by exact residues into clusters whose
//!    abundance is the sum of the merged sizes
//! 2. [`filter`]: clusters outside the `[min, max]` abundance bounds are dropped
//! 3. [`ordering`]: survivors are sorted by descending abundance, then id
//! 4. [`pipeline`]: writes each cluster as `{id};size={size}`
//!
//! ## Example
//!
//! ```rust
//! use derep::core::record::{SequenceRecord, VecSource};
//! use derep::dereplication::pipeline::Pipeline;
//!
//! let source = VecSource::new(vec![
//!     SequenceRecord::new("foo;size=100", "ATTC"),
//!     SequenceRecord::new("bar;size=10", "ATTC"),
//!     SequenceRecord::new("size=4;spam", "ATTC"),
//! ]);
//! let mut output: Vec<SequenceRecord> = Vec::new();
//!
//! let summary = Pipeline::default().run(source, &mut output).unwrap();
//!
//! assert_eq!(summary.clusters, 1);
//! assert_eq!(output[0].label, "foo;size=114");
//! ```

pub mod filter;
pub mod ordering;
pub mod pipeline;
pub mod store;
