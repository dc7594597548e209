//! File format bindings for the dereplication engine.
//!
//! - **FASTA** ([`fasta`]): plain or gzip-compressed, read and written with noodles

pub mod fasta;
