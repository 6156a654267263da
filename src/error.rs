use std::fmt;

/// What is wrong with a rejected exon chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainDefect {
    /// No exons at all.
    Empty,
    /// Exon `index` has `start >= end`.
    ZeroLength { index: usize },
    /// Exon `index` starts before exon `index - 1`.
    Unsorted { index: usize },
    /// Exon `index` overlaps or touches exon `index - 1` (no intron between them).
    Overlapping { index: usize },
}

impl fmt::Display for ChainDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainDefect::Empty => write!(f, "chain has no exons"),
            ChainDefect::ZeroLength { index } => write!(f, "exon {index} has zero length"),
            ChainDefect::Unsorted { index } => write!(f, "exon {index} is out of order"),
            ChainDefect::Overlapping { index } => {
                write!(f, "exon {index} overlaps or abuts the previous exon")
            }
        }
    }
}

/// Errors produced by the segment graph and transcriptome code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed exon chain: {0}")]
    MalformedChain(ChainDefect),

    #[error("invalid interval [{start}, {end})")]
    InvalidInterval { start: u32, end: u32 },

    #[error("segment graph consistency violation: {0}")]
    GraphConsistency(String),

    #[error("unknown chromosome: {0}")]
    UnknownChromosome(String),
}

impl Error {
    pub(crate) fn graph(detail: impl Into<String>) -> Self {
        Self::GraphConsistency(detail.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
