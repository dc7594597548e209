//! Core data types for dereplication.
//!
//! - [`Annotation`](annotation::Annotation): name and abundance parsed from a record label
//! - [`Cluster`](cluster::Cluster): records merged by identical residues
//! - [`SequenceRecord`](record::SequenceRecord): a labelled sequence, plus the
//!   [`RecordSource`](record::RecordSource) and [`RecordSink`](record::RecordSink)
//!   traits that connect the engine to a file format
//!
//! ## Annotation format
//!
//! Labels are semicolon-delimited lists of monads and `key=value` pairs:
//!
//! | Label | Name | Size |
//! |-------|------|------|
//! | `foo;size=100` | foo | 100 |
//! | `foo` | foo | 1 |
//! | `size=100` | sequence | 100 |
//! | `foo;size=-200` | foo | 1 |
//! | `foo;size=100;size=200` | foo | 200 |

pub mod annotation;
pub mod cluster;
pub mod record;
