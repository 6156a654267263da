use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::chain::ExonChain;
use crate::model::segment_graph::SegmentGraph;
use crate::model::types::Overlap;
use crate::types::{Interval, Strand};

/// A stranded genomic region with its reference isoforms, the sample
/// evidence assigned to it, and the segment graph pooling all of them.
///
/// Notes:
/// - `id` is unique within a transcriptome; `name` need not be.
/// - every distinct chain (reference or sample) contributes to the graph once;
///   repeated sample chains only increase their count.
/// - `attributes` holds auxiliary annotations that no algorithm depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub id: String,
    pub name: String,
    pub chrom: String,
    interval: Interval,
    annotated_interval: Option<Interval>,
    reference_chains: BTreeSet<ExonChain>,
    sample_chains: BTreeMap<String, BTreeMap<ExonChain, u32>>,
    segment_graph: SegmentGraph,
    pub attributes: BTreeMap<String, String>,
}

impl Gene {
    /// Gene from reference annotation. The interval is widened to cover every chain.
    pub fn from_reference(
        id: impl Into<String>,
        name: impl Into<String>,
        chrom: impl Into<String>,
        interval: Interval,
        chains: impl IntoIterator<Item = ExonChain>,
    ) -> Result<Self> {
        let reference_chains: BTreeSet<ExonChain> = chains.into_iter().collect();
        let segment_graph = SegmentGraph::build(interval.strand(), &reference_chains)?;
        let interval = reference_chains
            .iter()
            .fold(interval, |acc, c| acc.hull(&c.span()));

        Ok(Self {
            id: id.into(),
            name: name.into(),
            chrom: chrom.into(),
            interval,
            annotated_interval: Some(interval),
            reference_chains,
            sample_chains: BTreeMap::new(),
            segment_graph,
            attributes: BTreeMap::new(),
        })
    }

    /// Gene created from a single sample chain; its name is its id.
    pub fn novel(
        id: impl Into<String>,
        chrom: impl Into<String>,
        chain: ExonChain,
        sample: &str,
    ) -> Result<Self> {
        let id = id.into();
        let segment_graph = SegmentGraph::build(chain.strand(), std::iter::once(&chain))?;
        let interval = chain.span();

        let mut sample_chains = BTreeMap::new();
        sample_chains.insert(sample.to_string(), BTreeMap::from([(chain, 1)]));

        Ok(Self {
            name: id.clone(),
            id,
            chrom: chrom.into(),
            interval,
            annotated_interval: None,
            reference_chains: BTreeSet::new(),
            sample_chains,
            segment_graph,
            attributes: BTreeMap::new(),
        })
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn strand(&self) -> Strand {
        self.interval.strand()
    }

    pub fn start(&self) -> u32 {
        self.interval.start()
    }

    pub fn end(&self) -> u32 {
        self.interval.end()
    }

    pub fn segment_graph(&self) -> &SegmentGraph {
        &self.segment_graph
    }

    /// True if the gene has reference support.
    pub fn is_annotated(&self) -> bool {
        !self.reference_chains.is_empty()
    }

    pub fn reference_chains(&self) -> &BTreeSet<ExonChain> {
        &self.reference_chains
    }

    /// Chains observed in `sample`, with their read counts.
    pub fn sample_chains(&self, sample: &str) -> Option<&BTreeMap<ExonChain, u32>> {
        self.sample_chains.get(sample)
    }

    pub fn samples(&self) -> impl Iterator<Item = &str> {
        self.sample_chains.keys().map(|s| s.as_str())
    }

    pub fn sample_count(&self, sample: &str, chain: &ExonChain) -> u32 {
        self.sample_chains
            .get(sample)
            .and_then(|m| m.get(chain))
            .copied()
            .unwrap_or(0)
    }

    /// Reads assigned to this gene from `sample`.
    pub fn sample_total(&self, sample: &str) -> u32 {
        self.sample_chains
            .get(sample)
            .map(|m| m.values().sum())
            .unwrap_or(0)
    }

    /// Distinct chains in the order the segment graph indexes them.
    pub fn contributing_chains(&self) -> Vec<&ExonChain> {
        self.reference_chains
            .iter()
            .chain(self.sample_chains.values().flat_map(|m| m.keys()))
            .sorted()
            .dedup()
            .collect()
    }

    pub fn n_transcripts(&self) -> usize {
        self.segment_graph.n_chains()
    }

    fn has_chain(&self, chain: &ExonChain) -> bool {
        self.reference_chains.contains(chain)
            || self.sample_chains.values().any(|m| m.contains_key(chain))
    }

    /// Record one read of `chain` in `sample`.
    ///
    /// A chain not yet contributing triggers a rebuild of the segment graph
    /// from the full chain set and may widen the gene interval. The new graph
    /// is built before anything is committed, so on error the gene is
    /// unchanged. Returns whether the graph changed.
    pub fn add_sample_chain(&mut self, sample: &str, chain: ExonChain) -> Result<bool> {
        if self.has_chain(&chain) {
            *self
                .sample_chains
                .entry(sample.to_string())
                .or_default()
                .entry(chain)
                .or_insert(0) += 1;
            return Ok(false);
        }

        let graph = {
            let chains = self
                .contributing_chains()
                .into_iter()
                .chain(std::iter::once(&chain));
            SegmentGraph::build(self.strand(), chains)?
        };

        self.interval = self.interval.hull(&chain.span());
        self.segment_graph = graph;
        self.sample_chains
            .entry(sample.to_string())
            .or_default()
            .insert(chain, 1);
        Ok(true)
    }

    /// Compare `query` with this gene's segment graph.
    ///
    /// With `require_strand`, an incompatible strand yields `NoOverlap`.
    pub fn classify(&self, query: &ExonChain, require_strand: bool) -> Overlap {
        if require_strand && !self.strand().is_compatible_with(query.strand()) {
            return Overlap::none(query.exonic_len(), query.junctions().len());
        }
        self.segment_graph.get_overlap(query)
    }

    /// Copy of this gene without sample evidence; `None` for novel genes.
    pub fn reference_only(&self) -> Result<Option<Gene>> {
        let Some(interval) = self.annotated_interval else {
            return Ok(None);
        };
        let mut gene = Gene::from_reference(
            self.id.clone(),
            self.name.clone(),
            self.chrom.clone(),
            interval,
            self.reference_chains.iter().cloned(),
        )?;
        gene.attributes = self.attributes.clone();
        Ok(Some(gene))
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Gene {} ({}) {}:{} with {} transcripts ({} reference)",
            self.id,
            self.name,
            self.chrom,
            self.interval,
            self.n_transcripts(),
            self.reference_chains.len()
        )
    }
}
