use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::chain::ExonChain;

/// Genomic strand/orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strand {
    Plus,
    Minus,
    Unknown,
}

impl Strand {
    #[inline]
    pub fn is_compatible_with(self, other: Strand) -> bool {
        // "Unknown" is treated as compatible with either.
        self == Strand::Unknown || other == Strand::Unknown || self == other
    }
}

impl TryFrom<char> for Strand {
    type Error = char;

    fn try_from(c: char) -> std::result::Result<Self, Self::Error> {
        match c {
            '+' => Ok(Strand::Plus),
            '-' => Ok(Strand::Minus),
            '.' | '?' => Ok(Strand::Unknown),
            other => Err(other),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
            Strand::Unknown => '.',
        };
        write!(f, "{c}")
    }
}

/// A contiguous exonic block.
/// Coordinates are 0-based, half-open: [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RefBlock {
    pub start: u32,
    pub end: u32,
}

impl RefBlock {
    /// Create a new block. Panics if start >= end.
    pub fn new(start: u32, end: u32) -> Self {
        assert!(start < end, "RefBlock requires start < end");
        Self { start, end }
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    #[inline]
    pub fn overlaps(self, other: RefBlock) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[inline]
    pub fn contains(self, other: RefBlock) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of bases shared with `other` (0 when disjoint).
    #[inline]
    pub fn overlap_len(self, other: RefBlock) -> u32 {
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
    }

    /// Introns between consecutive sorted blocks as `(donor, acceptor)` pairs.
    ///
    /// Gaps of at most `max_deletion` bp are alignment deletions, not introns;
    /// touching or overlapping neighbours never yield a junction.
    pub fn junctions_from_blocks(blocks: &[RefBlock], max_deletion: u32) -> Vec<(u32, u32)> {
        blocks
            .iter()
            .tuple_windows()
            .filter(|(a, b)| b.start > a.end && b.start - a.end > max_deletion)
            .map(|(a, b)| (a.end, b.start))
            .collect()
    }
}

/// A stranded genomic interval, 0-based half-open `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: u32,
    end: u32,
    strand: Strand,
}

#[derive(Deserialize)]
struct RawInterval {
    start: u32,
    end: u32,
    strand: Strand,
}

impl TryFrom<RawInterval> for Interval {
    type Error = Error;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end, raw.strand)
    }
}

impl Interval {
    pub fn new(start: u32, end: u32, strand: Strand) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidInterval { start, end });
        }
        Ok(Self { start, end, strand })
    }

    /// For callers that already guarantee `start < end`.
    pub(crate) fn from_bounds(start: u32, end: u32, strand: Strand) -> Self {
        debug_assert!(start < end);
        Self { start, end, strand }
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.end
    }

    #[inline]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Positional overlap only, strand ignored.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Positional overlap on compatible strands.
    #[inline]
    pub fn overlaps_stranded(&self, other: &Interval) -> bool {
        self.overlaps(other) && self.strand.is_compatible_with(other.strand)
    }

    #[inline]
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest interval covering both; keeps this interval's strand.
    pub fn hull(&self, other: &Interval) -> Interval {
        Interval {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            strand: self.strand,
        }
    }

    pub fn as_block(&self) -> RefBlock {
        RefBlock {
            start: self.start,
            end: self.end,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}({})", self.start, self.end, self.strand)
    }
}

/// One aligned read as handed over by the alignment collaborator.
///
/// Blocks are genomic (0-based, half-open) align blocks in chain order.
/// Short gaps between blocks are usually alignment deletions rather than
/// introns; `to_chain` fuses them before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplicedRead {
    pub chrom: String,
    pub strand: Strand,
    pub blocks: Vec<RefBlock>,
}

impl SplicedRead {
    pub fn new(chrom: impl Into<String>, strand: Strand, blocks: Vec<RefBlock>) -> Self {
        Self {
            chrom: chrom.into(),
            strand,
            blocks,
        }
    }

    /// Span of the read blocks (first start, last end).
    pub fn span(&self) -> Option<(u32, u32)> {
        let first = self.blocks.first()?;
        let last = self.blocks.last()?;
        Some((first.start, last.end))
    }

    /// Fuse gaps of at most `allowed_gap` bp and validate the result as an exon chain.
    ///
    /// Blocks are not re-sorted: unsorted or overlapping input is rejected.
    pub fn to_chain(&self, allowed_gap: u32) -> Result<ExonChain> {
        let mut fused: Vec<RefBlock> = Vec::with_capacity(self.blocks.len());
        for &b in &self.blocks {
            match fused.last_mut() {
                Some(cur) if b.start >= cur.end && b.start - cur.end <= allowed_gap => {
                    cur.end = cur.end.max(b.end);
                }
                _ => fused.push(b),
            }
        }
        ExonChain::new(self.strand, fused)
    }
}
