use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use rust_lapper::{Interval as Iv, Lapper};

use crate::model::gene::Gene;

/// Genes of one chromosome.
///
/// Genes live in an arena (`slot` = position in insertion order, stable for
/// the lifetime of the index). A `Lapper` over gene intervals answers range
/// queries; `ids`/`names` map identifiers to slots, last write wins.
///
/// Every mutation of a gene goes through `update`, which re-indexes the slot
/// afterwards, so the tree and identity maps never go stale.
#[derive(Debug, Clone)]
pub struct ChromosomeIndex {
    name: String,
    genes: Vec<Gene>,
    tree: Lapper<u32, usize>,
    ids: HashMap<String, usize>,
    names: HashMap<String, usize>,
}

impl ChromosomeIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            genes: Vec::new(),
            tree: Lapper::new(Vec::new()),
            ids: HashMap::new(),
            names: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Add a gene and return its slot. An id already present on this
    /// chromosome is logged; the new gene takes over the id lookup while the
    /// old one stays reachable through range queries.
    pub fn insert(&mut self, gene: Gene) -> usize {
        let slot = self.genes.len();
        self.tree.insert(Iv {
            start: gene.start(),
            stop: gene.end(),
            val: slot,
        });
        self.genes.push(gene);
        self.index_identity(slot);
        slot
    }

    pub fn get(&self, slot: usize) -> Option<&Gene> {
        self.genes.get(slot)
    }

    pub fn by_id(&self, id: &str) -> Option<&Gene> {
        self.ids.get(id).map(|&slot| &self.genes[slot])
    }

    pub fn by_name(&self, name: &str) -> Option<&Gene> {
        self.names.get(name).map(|&slot| &self.genes[slot])
    }

    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    /// Slots of genes overlapping `[start, end)`, in position order.
    pub fn overlapping(&self, start: u32, end: u32) -> Vec<usize> {
        if end <= start {
            return Vec::new();
        }
        self.tree
            .find(start, end)
            .map(|iv| iv.val)
            .sorted_by(|&a, &b| position_key(&self.genes[a]).cmp(&position_key(&self.genes[b])))
            .collect()
    }

    /// Genes overlapping `[start, end)`, in position order.
    pub fn genes_in_range(&self, start: u32, end: u32) -> Vec<&Gene> {
        self.overlapping(start, end)
            .into_iter()
            .map(|slot| &self.genes[slot])
            .collect()
    }

    /// All genes in position order (start, end, id).
    pub fn iter(&self) -> impl Iterator<Item = &Gene> {
        self.genes
            .iter()
            .sorted_by(|a, b| position_key(a).cmp(&position_key(b)))
    }

    /// Apply `f` to the gene in `slot`, then refresh the interval tree if the
    /// gene moved and the identity maps if it was renamed. Returns `None` for
    /// an unknown slot.
    pub fn update<R>(&mut self, slot: usize, f: impl FnOnce(&mut Gene) -> R) -> Option<R> {
        let gene = self.genes.get_mut(slot)?;
        let before = (gene.interval(), gene.id.clone(), gene.name.clone());
        let out = f(gene);

        let gene = &self.genes[slot];
        let moved = before.0 != gene.interval();
        let renamed = before.1 != gene.id || before.2 != gene.name;

        if moved {
            self.rebuild_tree();
        }
        // unchanged id/name: the slot's entries (or the colliding winner's) stay valid
        if renamed {
            self.rebuild_identity();
        }
        Some(out)
    }

    fn rebuild_tree(&mut self) {
        self.tree = Lapper::new(
            self.genes
                .iter()
                .enumerate()
                .map(|(slot, g)| Iv {
                    start: g.start(),
                    stop: g.end(),
                    val: slot,
                })
                .collect(),
        );
    }

    /// Recreate the id/name maps from the arena (slot order decides which of
    /// two colliding genes wins).
    pub fn rebuild_identity(&mut self) {
        self.ids.clear();
        self.names.clear();
        for slot in 0..self.genes.len() {
            self.index_identity(slot);
        }
    }

    fn index_identity(&mut self, slot: usize) {
        let gene = &self.genes[slot];
        if let Some(prev) = self.ids.insert(gene.id.clone(), slot) {
            if prev != slot {
                log::warn!(
                    "{}: gene id {} is ambiguous: {} vs {}",
                    self.name,
                    gene.id,
                    self.genes[prev],
                    gene
                );
            }
        }
        self.names.insert(gene.name.clone(), slot);
    }
}

fn position_key(g: &Gene) -> (u32, u32, &str) {
    (g.start(), g.end(), g.id.as_str())
}

impl fmt::Display for ChromosomeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n_transcripts: usize = self.genes.iter().map(|g| g.n_transcripts()).sum();
        let n_novel = self.genes.iter().filter(|g| !g.is_annotated()).count();
        write!(
            f,
            "{}: genes={}, novel_genes={}, transcripts={}",
            self.name,
            self.genes.len(),
            n_novel,
            n_transcripts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chain::ExonChain;
    use crate::types::{Interval, Strand};

    fn gene(id: &str, name: &str, pairs: &[(u32, u32)]) -> Gene {
        let chain = ExonChain::from_pairs(Strand::Plus, pairs).unwrap();
        let span = chain.span();
        Gene::from_reference(id, name, "chr1", span, [chain]).unwrap()
    }

    fn index() -> ChromosomeIndex {
        let mut idx = ChromosomeIndex::new("chr1");
        idx.insert(gene("G2", "Beta", &[(1000, 1100), (1200, 1300)]));
        idx.insert(gene("G1", "Alpha", &[(100, 200), (300, 400)]));
        idx.insert(gene("G3", "Gamma", &[(350, 380), (1050, 1080)]));
        idx
    }

    #[test]
    fn range_queries_are_position_ordered() {
        let idx = index();
        let ids: Vec<&str> = idx
            .genes_in_range(0, 2000)
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(ids, vec!["G1", "G3", "G2"]);

        let ids: Vec<&str> = idx
            .genes_in_range(390, 1000)
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(ids, vec!["G1", "G3"]);

        // half-open: G3 ends at 1080
        let ids: Vec<&str> = idx
            .genes_in_range(1085, 1100)
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(ids, vec!["G2"]);
        assert!(idx.genes_in_range(5000, 6000).is_empty());
        assert!(idx.genes_in_range(10, 10).is_empty());
    }

    #[test]
    fn identity_lookup() {
        let idx = index();
        assert_eq!(idx.by_id("G1").map(|g| g.name.as_str()), Some("Alpha"));
        assert_eq!(idx.by_name("Gamma").map(|g| g.id.as_str()), Some("G3"));
        assert!(idx.by_id("Alpha").is_none());
        let ordered: Vec<&str> = idx.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ordered, vec!["G1", "G3", "G2"]);
    }

    #[test]
    fn duplicate_id_last_write_wins_but_both_stay_in_tree() {
        let mut idx = index();
        idx.insert(gene("G1", "Alpha2", &[(5000, 5100)]));
        assert_eq!(idx.len(), 4);
        assert_eq!(idx.by_id("G1").map(|g| g.name.as_str()), Some("Alpha2"));
        assert_eq!(idx.genes_in_range(100, 150).len(), 1);
        assert_eq!(idx.genes_in_range(5000, 5001)[0].name, "Alpha2");
    }

    #[test]
    fn update_refreshes_interval_tree() {
        let mut idx = index();
        let slot = idx.slot_of("G1").unwrap();
        let ids = |idx: &ChromosomeIndex| -> Vec<String> {
            idx.genes_in_range(420, 450).iter().map(|g| g.id.clone()).collect()
        };
        assert_eq!(ids(&idx), vec!["G3"]);

        let chain = ExonChain::from_pairs(Strand::Plus, &[(100, 200), (300, 450)]).unwrap();
        let changed = idx
            .update(slot, |g| g.add_sample_chain("s1", chain))
            .unwrap()
            .unwrap();
        assert!(changed);
        assert_eq!(ids(&idx), vec!["G1", "G3"]);
        assert_eq!(
            idx.by_id("G1").unwrap().interval(),
            Interval::new(100, 450, Strand::Plus).unwrap()
        );
        assert!(idx.update(99, |_| ()).is_none());
    }

    #[test]
    fn extending_shadowed_duplicate_keeps_id_winner() {
        let mut idx = index();
        let newer = idx.insert(gene("G1", "Alpha2", &[(5000, 5100)]));
        let older = 1;
        assert_eq!(idx.slot_of("G1"), Some(newer));

        let chain = ExonChain::from_pairs(Strand::Plus, &[(100, 200), (300, 450)]).unwrap();
        idx.update(older, |g| g.add_sample_chain("s1", chain)).unwrap().unwrap();

        assert_eq!(idx.slot_of("G1"), Some(newer));
        assert_eq!(idx.by_id("G1").map(|g| g.start()), Some(5000));
        assert_eq!(idx.get(older).map(|g| g.end()), Some(450));
    }

    #[test]
    fn renaming_rebuilds_identity() {
        let mut idx = index();
        let slot = idx.slot_of("G3").unwrap();
        idx.update(slot, |g| g.name = "Delta".to_string());
        assert!(idx.by_name("Gamma").is_none());
        assert_eq!(idx.by_name("Delta").map(|g| g.id.as_str()), Some("G3"));
    }
}
