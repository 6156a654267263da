use serde::{Deserialize, Serialize};

use crate::error::{ChainDefect, Error, Result};
use crate::types::{Interval, RefBlock, Strand};

/// The exon structure of one transcript: sorted, disjoint exons with an
/// intron between every consecutive pair.
///
/// Chains are immutable once validated. They order and hash by
/// `(strand, exons)` so a set of chains has one canonical order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawChain")]
pub struct ExonChain {
    strand: Strand,
    exons: Vec<RefBlock>,
}

/// Unchecked wire shape; deserialized chains go through `ExonChain::new`.
#[derive(Deserialize)]
struct RawChain {
    strand: Strand,
    exons: Vec<RefBlock>,
}

impl TryFrom<RawChain> for ExonChain {
    type Error = Error;

    fn try_from(raw: RawChain) -> Result<Self> {
        ExonChain::new(raw.strand, raw.exons)
    }
}

impl ExonChain {
    /// Validate `exons` as a chain.
    ///
    /// Rejected (never repaired): empty chains, zero-length exons, exons out
    /// of order, and exons that overlap or touch their predecessor.
    pub fn new(strand: Strand, exons: Vec<RefBlock>) -> Result<Self> {
        if exons.is_empty() {
            return Err(Error::MalformedChain(ChainDefect::Empty));
        }
        for (index, exon) in exons.iter().enumerate() {
            if exon.start >= exon.end {
                return Err(Error::MalformedChain(ChainDefect::ZeroLength { index }));
            }
            if index == 0 {
                continue;
            }
            let prev = exons[index - 1];
            if exon.start < prev.start {
                return Err(Error::MalformedChain(ChainDefect::Unsorted { index }));
            }
            if exon.start <= prev.end {
                return Err(Error::MalformedChain(ChainDefect::Overlapping { index }));
            }
        }
        Ok(Self { strand, exons })
    }

    /// Convenience for `(start, end)` pairs.
    pub fn from_pairs(strand: Strand, pairs: &[(u32, u32)]) -> Result<Self> {
        Self::new(
            strand,
            pairs
                .iter()
                .map(|&(start, end)| RefBlock { start, end })
                .collect(),
        )
    }

    #[inline]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[inline]
    pub fn exons(&self) -> &[RefBlock] {
        &self.exons
    }

    #[inline]
    pub fn n_exons(&self) -> usize {
        self.exons.len()
    }

    #[inline]
    pub fn is_spliced(&self) -> bool {
        self.exons.len() > 1
    }

    pub fn start(&self) -> u32 {
        self.exons[0].start
    }

    pub fn end(&self) -> u32 {
        self.exons[self.exons.len() - 1].end
    }

    /// First exon start to last exon end, on the chain's strand.
    pub fn span(&self) -> Interval {
        Interval::from_bounds(self.start(), self.end(), self.strand)
    }

    /// Donor/acceptor pairs `(exon[i].end, exon[i+1].start)` in chain order.
    pub fn junctions(&self) -> Vec<(u32, u32)> {
        RefBlock::junctions_from_blocks(&self.exons, 0)
    }

    pub fn introns(&self) -> Vec<RefBlock> {
        self.junctions()
            .into_iter()
            .map(|(start, end)| RefBlock { start, end })
            .collect()
    }

    /// Total exonic bases.
    pub fn exonic_len(&self) -> u32 {
        self.exons.iter().map(|e| e.len()).sum()
    }

    /// Exonic bases shared with a sorted, disjoint list of regions.
    pub fn overlap_with(&self, regions: &[RefBlock]) -> u32 {
        let mut total = 0;
        let mut j = 0;
        for exon in &self.exons {
            while j < regions.len() && regions[j].end <= exon.start {
                j += 1;
            }
            let mut k = j;
            while k < regions.len() && regions[k].start < exon.end {
                total += exon.overlap_len(regions[k]);
                k += 1;
            }
        }
        total
    }
}
