use std::collections::{BTreeMap, HashSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::chain::ExonChain;
use crate::model::types::{Overlap, OverlapClass};
use crate::types::{Interval, RefBlock, Strand};

/// One node of a segment graph: a maximal piece of the gene footprint with no
/// exon boundary strictly inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
    covered_by: Vec<usize>,
}

impl Segment {
    pub fn block(&self) -> RefBlock {
        RefBlock {
            start: self.start,
            end: self.end,
        }
    }

    /// Indices of the contributing chains that have this segment as exon (ascending).
    pub fn covered_by(&self) -> &[usize] {
        &self.covered_by
    }

    /// True if at least one contributing chain is exonic here.
    pub fn is_exonic(&self) -> bool {
        !self.covered_by.is_empty()
    }
}

/// Adjacency of two nodes within at least one contributing chain.
///
/// `from < to` always holds (genomic order). When `junction` is false the
/// nodes touch (`nodes[from].end == nodes[to].start`); otherwise the edge
/// skips the intron `[nodes[from].end, nodes[to].start)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub junction: bool,
    /// Number of contributing chains realizing this edge.
    pub support: usize,
}

/// Pooled exon structure of all chains of one gene.
///
/// Nodes partition `[first exon start, last exon end)` without gaps. Node
/// boundaries are the exon starts and ends of the contributing chains, so a
/// chain either covers a node completely or not at all. Chains are
/// deduplicated and sorted before construction: chain index `i` refers to the
/// `i`-th distinct chain in ascending order, and the structure depends only
/// on the set of chains, never on their input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentGraph {
    strand: Strand,
    nodes: Vec<Segment>,
    edges: Vec<Edge>,
    paths: Vec<Vec<usize>>,
    /// Exons and junctions of each contributing chain, kept for overlap queries.
    chain_exons: Vec<Vec<RefBlock>>,
    chain_junctions: Vec<Vec<(u32, u32)>>,
}

impl SegmentGraph {
    /// Build the graph from a set of chains.
    ///
    /// The result is validated before it is returned; a violation is a bug and
    /// surfaces as `Error::GraphConsistency`.
    pub fn build<'a, I>(strand: Strand, chains: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ExonChain>,
    {
        let chains: Vec<&ExonChain> = chains.into_iter().sorted().dedup().collect();

        let boundaries: Vec<u32> = chains
            .iter()
            .flat_map(|c| c.exons().iter().flat_map(|e| [e.start, e.end]))
            .sorted_unstable()
            .dedup()
            .collect();

        let mut nodes: Vec<Segment> = boundaries
            .iter()
            .tuple_windows()
            .map(|(&start, &end)| Segment {
                start,
                end,
                covered_by: Vec::new(),
            })
            .collect();

        let mut paths: Vec<Vec<usize>> = Vec::with_capacity(chains.len());
        let mut edge_support: BTreeMap<(usize, usize), usize> = BTreeMap::new();

        for (ci, chain) in chains.iter().enumerate() {
            let mut path = Vec::new();
            for exon in chain.exons() {
                let first = node_starting_at(&boundaries, exon.start)?;
                let last = node_starting_at(&boundaries, exon.end)?;
                for ni in first..last {
                    nodes[ni].covered_by.push(ci);
                    path.push(ni);
                }
            }
            for (a, b) in path.iter().copied().tuple_windows() {
                *edge_support.entry((a, b)).or_insert(0) += 1;
            }
            paths.push(path);
        }

        let edges = edge_support
            .into_iter()
            .map(|((from, to), support)| Edge {
                from,
                to,
                junction: to > from + 1,
                support,
            })
            .collect();

        let graph = Self {
            strand,
            nodes,
            edges,
            paths,
            chain_exons: chains.iter().map(|c| c.exons().to_vec()).collect(),
            chain_junctions: chains.iter().map(|c| c.junctions()).collect(),
        };
        graph.validate(chains.iter().copied())?;
        Ok(graph)
    }

    /// Check the structural invariants against the chain set the graph was built from.
    pub fn validate<'a, I>(&self, chains: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ExonChain>,
    {
        let chains: Vec<&ExonChain> = chains.into_iter().sorted().dedup().collect();

        if chains.len() != self.paths.len() {
            return Err(Error::graph(format!(
                "{} chains but {} paths",
                chains.len(),
                self.paths.len()
            )));
        }

        let observed: HashSet<u32> = chains
            .iter()
            .flat_map(|c| c.exons().iter().flat_map(|e| [e.start, e.end]))
            .collect();

        for (i, node) in self.nodes.iter().enumerate() {
            if node.start >= node.end {
                return Err(Error::graph(format!("node {i} is empty")));
            }
            if !observed.contains(&node.start) || !observed.contains(&node.end) {
                return Err(Error::graph(format!(
                    "node {i} [{}, {}) has an unobserved boundary",
                    node.start, node.end
                )));
            }
            if let Some(next) = self.nodes.get(i + 1) {
                if next.start != node.end {
                    return Err(Error::graph(format!("gap or overlap after node {i}")));
                }
            }
        }

        for edge in &self.edges {
            if edge.from >= edge.to || edge.to >= self.nodes.len() {
                return Err(Error::graph(format!(
                    "edge {} -> {} is not ascending",
                    edge.from, edge.to
                )));
            }
        }

        for (ci, chain) in chains.iter().enumerate() {
            let cached = self.chain_exons.get(ci).map(Vec::as_slice);
            if self.reconstruct(ci) != chain.exons() || cached != Some(chain.exons()) {
                return Err(Error::graph(format!(
                    "chain {ci} cannot be reconstructed from its nodes"
                )));
            }
        }

        Ok(())
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn nodes(&self) -> &[Segment] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node indices covered by each contributing chain.
    pub fn paths(&self) -> &[Vec<usize>] {
        &self.paths
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn n_chains(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node start to last node end.
    pub fn span(&self) -> Option<Interval> {
        let first = self.nodes.first()?;
        let last = self.nodes.last()?;
        Some(Interval::from_bounds(first.start, last.end, self.strand))
    }

    /// Exons of contributing chain `chain_idx`, rebuilt from its nodes.
    pub fn reconstruct(&self, chain_idx: usize) -> Vec<RefBlock> {
        let Some(path) = self.paths.get(chain_idx) else {
            return Vec::new();
        };
        let mut out: Vec<RefBlock> = Vec::new();
        let mut prev: Option<usize> = None;
        for &ni in path {
            let node = &self.nodes[ni];
            match (out.last_mut(), prev) {
                (Some(block), Some(p)) if ni == p + 1 => block.end = node.end,
                _ => out.push(node.block()),
            }
            prev = Some(ni);
        }
        out
    }

    /// All distinct junctions realized by some contributing chain, ascending.
    pub fn junctions(&self) -> Vec<(u32, u32)> {
        self.edges
            .iter()
            .filter(|e| e.junction)
            .map(|e| (self.nodes[e.from].end, self.nodes[e.to].start))
            .collect()
    }

    /// Nodes following `node` in transcription direction.
    pub fn downstream(&self, node: usize) -> Vec<usize> {
        match self.strand {
            Strand::Minus => self.left_of(node),
            Strand::Plus | Strand::Unknown => self.right_of(node),
        }
    }

    /// Nodes preceding `node` in transcription direction.
    pub fn upstream(&self, node: usize) -> Vec<usize> {
        match self.strand {
            Strand::Minus => self.right_of(node),
            Strand::Plus | Strand::Unknown => self.left_of(node),
        }
    }

    fn right_of(&self, node: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter(|e| e.from == node)
            .map(|e| e.to)
            .collect()
    }

    fn left_of(&self, node: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter(|e| e.to == node)
            .map(|e| e.from)
            .collect()
    }

    /// For each `(donor, acceptor)` pair, whether some contributing chain
    /// splices exactly from `donor` to `acceptor`.
    ///
    /// Junctions are tested one by one against the pooled graph; the query
    /// chain itself does not need to be a contributing chain.
    pub fn find_splice_sites(&self, junctions: &[(u32, u32)]) -> Vec<bool> {
        junctions
            .iter()
            .map(|&(donor, acceptor)| self.has_junction(donor, acceptor))
            .collect()
    }

    fn has_junction(&self, donor: u32, acceptor: u32) -> bool {
        if donor >= acceptor {
            return false;
        }
        let Ok(from) = self.nodes.binary_search_by_key(&donor, |n| n.end) else {
            return false;
        };
        let Ok(to) = self.nodes.binary_search_by_key(&acceptor, |n| n.start) else {
            return false;
        };
        self.edges
            .binary_search_by_key(&(from, to), |e| (e.from, e.to))
            .is_ok()
    }

    /// Union of the exons of all contributing chains, as sorted disjoint regions.
    ///
    /// Exons of different chains that overlap or abut end up in one region.
    pub fn get_exonic_region(&self) -> Vec<RefBlock> {
        let mut out: Vec<RefBlock> = Vec::new();
        for node in self.nodes.iter().filter(|n| n.is_exonic()) {
            match out.last_mut() {
                // nodes are gapless, so touching means the previous node was exonic too
                Some(region) if region.end == node.start => region.end = node.end,
                _ => out.push(node.block()),
            }
        }
        out
    }

    /// Compare `query` with the graph.
    ///
    /// The exonic region union gives the coarse measure (`exonic_bp`);
    /// junction matching against the pooled graph and against each
    /// contributing chain refines it into an `OverlapClass`. Strand is not
    /// considered here.
    pub fn get_overlap(&self, query: &ExonChain) -> Overlap {
        let query_junctions = query.junctions();
        let query_len = query.exonic_len();

        let Some(span) = self.span() else {
            return Overlap::none(query_len, query_junctions.len());
        };
        if !span.overlaps(&query.span()) {
            return Overlap::none(query_len, query_junctions.len());
        }

        let exonic_bp = query.overlap_with(&self.get_exonic_region());
        let junction_hits = self.find_splice_sites(&query_junctions);

        let query_set: HashSet<(u32, u32)> = query_junctions.iter().copied().collect();
        let mut per_chain_bp = Vec::with_capacity(self.paths.len());
        // (exact, contains_all, shared junctions, shared bp, chain)
        let mut best: Option<(bool, bool, usize, u32, usize)> = None;

        for (ci, (exons, chain_junctions)) in
            self.chain_exons.iter().zip(&self.chain_junctions).enumerate()
        {
            let bp = query.overlap_with(exons);
            per_chain_bp.push(bp);

            let shared = chain_junctions
                .iter()
                .filter(|&j| query_set.contains(j))
                .count();
            if bp == 0 && shared == 0 {
                continue;
            }
            let exact = query.is_spliced() && *chain_junctions == query_junctions;
            let contains_all = shared == query_set.len();
            let key = (exact, contains_all, shared, bp, ci);
            let better = match best {
                None => true,
                // ties keep the lower chain index
                Some((e, c, s, b, _)) => (exact, contains_all, shared, bp) > (e, c, s, b),
            };
            if better {
                best = Some(key);
            }
        }

        let class = if exonic_bp == 0 {
            OverlapClass::Intronic
        } else if junction_hits.iter().any(|&h| !h) {
            OverlapClass::NovelJunction
        } else {
            match best {
                Some((true, _, _, _, _)) => OverlapClass::ExactJunctionChain,
                Some((false, true, _, _, _)) => OverlapClass::Compatible,
                _ => OverlapClass::NovelCombination,
            }
        };

        Overlap {
            class,
            exonic_bp,
            query_len,
            junction_hits,
            best_chain: best.map(|b| b.4),
            best_chain_junctions: best.map(|b| b.2).unwrap_or(0),
            per_chain_bp,
        }
    }
}

/// Index of the node starting at `pos`, given the sorted boundary list.
///
/// The last boundary has no node starting there, but its index is still the
/// exclusive end of the node range that reaches it.
fn node_starting_at(boundaries: &[u32], pos: u32) -> Result<usize> {
    boundaries
        .binary_search(&pos)
        .map_err(|_| Error::graph(format!("exon boundary {pos} missing from node boundaries")))
}
