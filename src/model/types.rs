use std::cmp::Ordering;
use std::fmt;

/// Classification of a query exon chain against a segment graph.
///
/// Variants are ordered by `rank()`; higher is a closer match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapClass {
    /// Junction chain equals that of a contributing chain.
    ExactJunctionChain,

    /// One contributing chain contains every query junction
    /// (always the case for an unspliced query with exonic overlap).
    Compatible,

    /// Every junction is known, but no single contributing chain has all of them.
    NovelCombination,

    /// At least one junction is absent from the graph.
    NovelJunction,

    /// Overlaps the gene footprint but not a single exonic base.
    Intronic,

    /// No positional overlap with the footprint, or incompatible strand.
    NoOverlap,
}

impl fmt::Display for OverlapClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OverlapClass::ExactJunctionChain => "ExactJunctionChain",
            OverlapClass::Compatible => "Compatible",
            OverlapClass::NovelCombination => "NovelCombination",
            OverlapClass::NovelJunction => "NovelJunction",
            OverlapClass::Intronic => "Intronic",
            OverlapClass::NoOverlap => "NoOverlap",
        };
        write!(f, "{s}")
    }
}

impl OverlapClass {
    /// Numeric ranking used for comparisons.
    /// Higher is better.
    pub fn rank(self) -> u8 {
        match self {
            OverlapClass::ExactJunctionChain => 5,
            OverlapClass::Compatible => 4,
            OverlapClass::NovelCombination => 3,
            OverlapClass::NovelJunction => 2,
            OverlapClass::Intronic => 1,
            OverlapClass::NoOverlap => 0,
        }
    }

    /// True when the query shares exonic sequence with the graph.
    pub fn is_exonic(self) -> bool {
        self.rank() >= OverlapClass::NovelJunction.rank()
    }
}

impl Ord for OverlapClass {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for OverlapClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of comparing a query chain with a segment graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub class: OverlapClass,
    /// Query bases inside the graph's exonic regions.
    pub exonic_bp: u32,
    /// Total exonic length of the query.
    pub query_len: u32,
    /// Per query junction: realized by some contributing chain.
    pub junction_hits: Vec<bool>,
    /// Index of the contributing chain agreeing best with the query.
    pub best_chain: Option<usize>,
    /// Query junctions shared with `best_chain`.
    pub best_chain_junctions: usize,
    /// Exonic bases shared with each contributing chain.
    pub per_chain_bp: Vec<u32>,
}

impl Overlap {
    pub fn none(query_len: u32, n_junctions: usize) -> Self {
        Self {
            class: OverlapClass::NoOverlap,
            exonic_bp: 0,
            query_len,
            junction_hits: vec![false; n_junctions],
            best_chain: None,
            best_chain_junctions: 0,
            per_chain_bp: Vec::new(),
        }
    }

    /// Fraction of query exonic bases covered by the graph's exonic regions.
    pub fn fraction(&self) -> f64 {
        if self.query_len == 0 {
            return 0.0;
        }
        self.exonic_bp as f64 / self.query_len as f64
    }

    pub fn n_known_junctions(&self) -> usize {
        self.junction_hits.iter().filter(|&&h| h).count()
    }
}

/// Options controlling how sample evidence is assigned to genes.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOptions {
    /// Minimum fraction of query exonic bases that must fall into a gene's
    /// exonic regions. Some exonic overlap is always required.
    pub min_exonic_fraction: f64,

    /// If true, candidate genes must be on a compatible strand.
    pub require_strand: bool,

    /// Prefix for ids of genes created from sample evidence.
    pub novel_gene_prefix: String,

    /// Gaps between read blocks up to this size are fused (alignment deletions).
    pub allowed_intronic_gap: u32,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            min_exonic_fraction: 0.0,
            require_strand: true,
            novel_gene_prefix: "novel_gene_".to_string(),
            allowed_intronic_gap: 0,
        }
    }
}

impl MergeOptions {
    pub fn min_exonic_fraction(mut self, fraction: f64) -> Self {
        self.min_exonic_fraction = fraction;
        self
    }

    pub fn require_strand(mut self, require: bool) -> Self {
        self.require_strand = require;
        self
    }

    pub fn novel_gene_prefix(mut self, prefix: &str) -> Self {
        self.novel_gene_prefix = prefix.to_string();
        self
    }

    pub fn allowed_intronic_gap(mut self, gap: u32) -> Self {
        self.allowed_intronic_gap = gap;
        self
    }

    /// Whether an overlap qualifies the gene as a merge target.
    pub fn accepts(&self, overlap: &Overlap) -> bool {
        overlap.exonic_bp > 0 && overlap.fraction() >= self.min_exonic_fraction
    }

    pub(crate) fn novel_id(&self, counter: u64) -> String {
        format!("{}{:06}", self.novel_gene_prefix, counter)
    }
}
