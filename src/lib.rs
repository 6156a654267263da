//! splice_graph_index
//!
//! Gene-level splice graphs for merging long-read transcript evidence into
//! a reference annotation. Coordinates are 0-based, half-open.
//!
//! A `Transcriptome` holds one `ChromosomeIndex` per chromosome; every
//! `Gene` owns a `SegmentGraph` built from all exon chains assigned to it.
//! Sample chains are classified against overlapping genes and either extend
//! the best one or found a novel gene.

pub mod annotation;
pub mod error;
pub mod index;
pub mod model;
pub mod transcriptome;
pub mod types;

pub use annotation::{ReferenceBuilder, ReferenceGene};
pub use error::{ChainDefect, Error, Result};
pub use index::ChromosomeIndex;
pub use transcriptome::{ImportSummary, MergeAction, MergeOutcome, Transcriptome};
pub use types::{Interval, RefBlock, SplicedRead, Strand};

pub use model::{ExonChain, Gene, MergeOptions, Overlap, OverlapClass, SegmentGraph};
