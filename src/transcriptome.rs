use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::annotation::ReferenceGene;
use crate::error::{Error, Result};
use crate::index::ChromosomeIndex;
use crate::model::chain::ExonChain;
use crate::model::gene::Gene;
use crate::model::types::{MergeOptions, Overlap};
use crate::types::SplicedRead;

/// What the merge driver did with an incoming chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeAction {
    /// The chain was added to an existing gene.
    ExtendGene,
    /// No candidate qualified; a new gene was created from the chain.
    NovelGene,
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeAction::ExtendGene => write!(f, "EXTEND_GENE"),
            MergeAction::NovelGene => write!(f, "NOVEL_GENE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub gene_id: String,
    pub action: MergeAction,
    /// Overlap with the selected gene before the chain was added (`None` for novel genes).
    pub overlap: Option<Overlap>,
}

/// Counters of one sample import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub reads: usize,
    pub extended: usize,
    pub novel: usize,
    pub malformed: usize,
    pub failed: usize,
}

impl ImportSummary {
    pub fn merge(mut self, other: ImportSummary) -> ImportSummary {
        self.reads += other.reads;
        self.extended += other.extended;
        self.novel += other.novel;
        self.malformed += other.malformed;
        self.failed += other.failed;
        self
    }

    fn record(&mut self, outcome: &Result<MergeOutcome>) {
        match outcome {
            Ok(o) if o.action == MergeAction::ExtendGene => self.extended += 1,
            Ok(_) => self.novel += 1,
            Err(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reads={}, extended={}, novel={}, malformed={}, failed={}",
            self.reads, self.extended, self.novel, self.malformed, self.failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GeneLoc {
    chrom: String,
    slot: usize,
}

/// All chromosome indexes plus the merge driver for sample evidence.
///
/// Notes:
/// - the novel-gene counter only ever grows; ids are never reused, not even
///   after `remove_chromosome`.
/// - gene ids are resolved through a global identity map (last write wins).
///   Collisions across chromosomes are logged.
#[derive(Debug)]
pub struct Transcriptome {
    options: MergeOptions,
    chromosomes: BTreeMap<String, ChromosomeIndex>,
    ids: HashMap<String, GeneLoc>,
    names: HashMap<String, GeneLoc>,
    novel_counter: AtomicU64,
    samples: BTreeSet<String>,
}

impl Transcriptome {
    pub fn new(options: MergeOptions) -> Self {
        Self {
            options,
            chromosomes: BTreeMap::new(),
            ids: HashMap::new(),
            names: HashMap::new(),
            novel_counter: AtomicU64::new(0),
            samples: BTreeSet::new(),
        }
    }

    /// Build from reference genes. Any gene whose graph cannot be built aborts the import.
    pub fn from_reference(
        options: MergeOptions,
        genes: impl IntoIterator<Item = ReferenceGene>,
    ) -> Result<Self> {
        let mut t = Self::new(options);
        for rg in genes {
            t.insert_gene(rg.into_gene()?);
        }
        log::info!("{t}");
        Ok(t)
    }

    /// Insert a fully built gene into its chromosome.
    pub fn insert_gene(&mut self, gene: Gene) {
        let chrom = gene.chrom.clone();
        let slot = self
            .chromosomes
            .entry(chrom.clone())
            .or_insert_with(|| ChromosomeIndex::new(chrom.clone()))
            .insert(gene);
        self.register(&chrom, slot);
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge one exon chain observed in `sample` on `chrom`.
    ///
    /// Candidate genes overlap the chain span (strand compatible if required)
    /// and must pass `MergeOptions::accepts`. The strongest candidate by
    /// exonic overlap, then known junctions, then class wins; equal
    /// strength goes to the smallest gene id.
    pub fn add_sample_transcript(
        &mut self,
        chrom: &str,
        chain: ExonChain,
        sample: &str,
    ) -> Result<MergeOutcome> {
        self.samples.insert(sample.to_string());
        let index = self
            .chromosomes
            .entry(chrom.to_string())
            .or_insert_with(|| ChromosomeIndex::new(chrom));
        let ids = &self.ids;
        let outcome = merge_chain(
            index,
            &self.options,
            &self.novel_counter,
            |id| ids.contains_key(id),
            chain,
            sample,
        )?;

        if outcome.action == MergeAction::NovelGene {
            if let Some(slot) = index.slot_of(&outcome.gene_id) {
                self.register(chrom, slot);
            }
        }
        Ok(outcome)
    }

    /// Import the reads of one sample, one at a time.
    ///
    /// Malformed reads and failed merges are logged and counted; the import
    /// carries on with the next read.
    pub fn add_sample(
        &mut self,
        sample: &str,
        reads: impl IntoIterator<Item = SplicedRead>,
    ) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for read in reads {
            summary.reads += 1;
            let chain = match read.to_chain(self.options.allowed_intronic_gap) {
                Ok(chain) => chain,
                Err(e) => {
                    log::warn!("{sample}: skipping read on {}: {e}", read.chrom);
                    summary.malformed += 1;
                    continue;
                }
            };
            let outcome = self.add_sample_transcript(&read.chrom, chain, sample);
            if let Err(e) = &outcome {
                log::error!("{sample}: merge failed on {}: {e}", read.chrom);
            }
            summary.record(&outcome);
        }
        log::info!("{sample}: {summary}");
        summary
    }

    /// Like `add_sample`, with chromosomes processed on the rayon pool.
    ///
    /// Reads are validated up front; only chromosomes with at least one
    /// valid chain are touched. Reads of one chromosome keep their relative
    /// order, so the outcome per chromosome is the same as for a sequential
    /// import. Novel ids are drawn from the shared atomic counter.
    pub fn add_sample_parallel(&mut self, sample: &str, reads: Vec<SplicedRead>) -> ImportSummary {
        let mut prepared = ImportSummary::default();
        let mut groups: BTreeMap<String, Vec<ExonChain>> = BTreeMap::new();
        for read in reads {
            prepared.reads += 1;
            match read.to_chain(self.options.allowed_intronic_gap) {
                Ok(chain) => groups.entry(read.chrom).or_default().push(chain),
                Err(e) => {
                    log::warn!("{sample}: skipping read on {}: {e}", read.chrom);
                    prepared.malformed += 1;
                }
            }
        }

        if !groups.is_empty() {
            self.samples.insert(sample.to_string());
        }
        for chrom in groups.keys() {
            self.chromosomes
                .entry(chrom.clone())
                .or_insert_with(|| ChromosomeIndex::new(chrom.clone()));
        }

        let taken: HashSet<String> = self.ids.keys().cloned().collect();
        let options = &self.options;
        let counter = &self.novel_counter;

        let work: Vec<(&mut ChromosomeIndex, Vec<ExonChain>)> = self
            .chromosomes
            .iter_mut()
            .filter_map(|(name, index)| groups.remove(name).map(|chains| (index, chains)))
            .collect();

        let summary = work
            .into_par_iter()
            .map(|(index, chains)| {
                let mut summary = ImportSummary::default();
                for chain in chains {
                    let outcome =
                        merge_chain(index, options, counter, |id| taken.contains(id), chain, sample);
                    if let Err(e) = &outcome {
                        log::error!("{sample}: merge failed on {}: {e}", index.name());
                    }
                    summary.record(&outcome);
                }
                summary
            })
            .reduce(ImportSummary::default, ImportSummary::merge)
            .merge(prepared);

        self.rebuild_identity();
        log::info!("{sample}: {summary}");
        summary
    }

    pub fn get(&self, chrom: &str, id: &str) -> Option<&Gene> {
        self.chromosomes.get(chrom)?.by_id(id)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Gene> {
        self.ids.get(id).and_then(|loc| self.resolve(loc))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Gene> {
        self.names.get(name).and_then(|loc| self.resolve(loc))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Genes overlapping `[start, end)` on `chrom`, in position order.
    pub fn genes_in_range(&self, chrom: &str, start: u32, end: u32) -> Vec<&Gene> {
        self.chromosomes
            .get(chrom)
            .map(|c| c.genes_in_range(start, end))
            .unwrap_or_default()
    }

    /// All genes, chromosome by chromosome, in position order.
    pub fn iter_genes(&self) -> impl Iterator<Item = &Gene> {
        self.chromosomes.values().flat_map(|c| c.iter())
    }

    pub fn chromosome(&self, name: &str) -> Option<&ChromosomeIndex> {
        self.chromosomes.get(name)
    }

    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.chromosomes.keys().map(|k| k.as_str())
    }

    pub fn n_genes(&self) -> usize {
        self.chromosomes.values().map(|c| c.len()).sum()
    }

    pub fn n_novel_genes(&self) -> usize {
        self.iter_genes().filter(|g| !g.is_annotated()).count()
    }

    pub fn n_transcripts(&self) -> usize {
        self.iter_genes().map(|g| g.n_transcripts()).sum()
    }

    /// Number of novel ids handed out so far.
    pub fn novel_counter(&self) -> u64 {
        self.novel_counter.load(Ordering::SeqCst)
    }

    pub fn samples(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.as_str())
    }

    /// Drop a chromosome and everything on it. The identity maps are rebuilt;
    /// the novel-gene counter is left alone.
    pub fn remove_chromosome(&mut self, name: &str) -> Result<ChromosomeIndex> {
        let index = self
            .chromosomes
            .remove(name)
            .ok_or_else(|| Error::UnknownChromosome(name.to_string()))?;
        self.rebuild_identity();
        log::info!("removed {index}");
        Ok(index)
    }

    /// Copy holding only annotated genes and their reference chains.
    pub fn reference_only(&self) -> Result<Transcriptome> {
        let mut t = Transcriptome::new(self.options.clone());
        t.novel_counter = AtomicU64::new(self.novel_counter());
        for gene in self.iter_genes() {
            if let Some(g) = gene.reference_only()? {
                t.insert_gene(g);
            }
        }
        Ok(t)
    }

    fn resolve(&self, loc: &GeneLoc) -> Option<&Gene> {
        self.chromosomes.get(&loc.chrom)?.get(loc.slot)
    }

    fn register(&mut self, chrom: &str, slot: usize) {
        let Some(gene) = self.chromosomes.get(chrom).and_then(|c| c.get(slot)) else {
            return;
        };
        let loc = GeneLoc {
            chrom: chrom.to_string(),
            slot,
        };
        if let Some(prev) = self.ids.insert(gene.id.clone(), loc.clone()) {
            // same-chromosome collisions are reported by the chromosome index
            if prev.chrom != chrom {
                log::warn!("gene id {} found on {} and {}", gene.id, prev.chrom, chrom);
            }
        }
        self.names.insert(gene.name.clone(), loc);
    }

    fn rebuild_identity(&mut self) {
        self.ids.clear();
        self.names.clear();
        let slots: Vec<(String, usize)> = self
            .chromosomes
            .iter()
            .flat_map(|(name, c)| (0..c.len()).map(move |slot| (name.clone(), slot)))
            .collect();
        for (chrom, slot) in slots {
            self.register(&chrom, slot);
        }
    }
}

impl fmt::Display for Transcriptome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ---- global summary ----
        write!(
            f,
            "Transcriptome: {} genes ({} novel), {} transcripts, {} chromosomes, {} samples",
            self.n_genes(),
            self.n_novel_genes(),
            self.n_transcripts(),
            self.chromosomes.len(),
            self.samples.len()
        )?;

        // ---- per-chromosome stats ----
        for index in self.chromosomes.values() {
            write!(f, "\n  - {index}")?;
        }
        Ok(())
    }
}

/// Run LOCATE → {EXTEND_GENE | NOVEL_GENE} for one chain on one chromosome.
fn merge_chain(
    index: &mut ChromosomeIndex,
    options: &MergeOptions,
    counter: &AtomicU64,
    id_taken: impl Fn(&str) -> bool,
    chain: ExonChain,
    sample: &str,
) -> Result<MergeOutcome> {
    let best = index
        .overlapping(chain.start(), chain.end())
        .into_iter()
        .filter_map(|slot| {
            let gene = index.get(slot)?;
            let overlap = gene.classify(&chain, options.require_strand);
            options.accepts(&overlap).then_some((slot, overlap))
        })
        .max_by(|(sa, a), (sb, b)| {
            strength(a).cmp(&strength(b)).then_with(|| {
                // equal strength: the smaller id is the larger element
                let ia = index.get(*sa).map(|g| g.id.as_str());
                let ib = index.get(*sb).map(|g| g.id.as_str());
                ib.cmp(&ia)
            })
        });

    if let Some((slot, overlap)) = best {
        let changed = index
            .update(slot, |g| g.add_sample_chain(sample, chain))
            .ok_or_else(|| Error::graph(format!("slot {slot} vanished from {}", index.name())))??;
        let gene_id = index.get(slot).map(|g| g.id.clone()).unwrap_or_default();
        log::debug!(
            "{sample}: {} -> {gene_id} ({}, {}/{} bp, graph changed: {changed})",
            index.name(),
            overlap.class,
            overlap.exonic_bp,
            overlap.query_len
        );
        return Ok(MergeOutcome {
            gene_id,
            action: MergeAction::ExtendGene,
            overlap: Some(overlap),
        });
    }

    let gene_id = loop {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        let id = options.novel_id(n);
        if !id_taken(&id) && index.slot_of(&id).is_none() {
            break id;
        }
    };
    let gene = Gene::novel(gene_id.clone(), index.name(), chain, sample)?;
    log::debug!("{sample}: {} -> new gene {gene}", index.name());
    index.insert(gene);

    Ok(MergeOutcome {
        gene_id,
        action: MergeAction::NovelGene,
        overlap: None,
    })
}

fn strength(o: &Overlap) -> (u32, usize, u8) {
    (o.exonic_bp, o.n_known_junctions(), o.class.rank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::OverlapClass;
    use crate::types::{Interval, RefBlock, Strand};

    fn chain(pairs: &[(u32, u32)]) -> ExonChain {
        ExonChain::from_pairs(Strand::Plus, pairs).unwrap()
    }

    fn reference(id: &str, chrom: &str, pairs: &[(u32, u32)]) -> ReferenceGene {
        let c = chain(pairs);
        ReferenceGene {
            id: id.to_string(),
            name: format!("{id}_name"),
            chrom: chrom.to_string(),
            interval: c.span(),
            chains: vec![c],
            attributes: BTreeMap::new(),
        }
    }

    fn transcriptome() -> Transcriptome {
        Transcriptome::from_reference(
            MergeOptions::default(),
            vec![
                reference("G", "chr1", &[(100, 200), (300, 400)]),
                reference("H", "chr2", &[(100, 200)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn extend_existing_gene() {
        let mut t = transcriptome();
        let out = t
            .add_sample_transcript("chr1", chain(&[(100, 200), (300, 420)]), "s1")
            .unwrap();
        assert_eq!(out.action, MergeAction::ExtendGene);
        assert_eq!(out.gene_id, "G");
        // same junction chain as the reference isoform, longer last exon
        assert_eq!(out.overlap.unwrap().class, OverlapClass::ExactJunctionChain);

        let g = t.get_by_id("G").unwrap();
        assert_eq!(g.end(), 420);
        // the widened interval is visible to range queries
        assert_eq!(t.genes_in_range("chr1", 410, 415).len(), 1);
    }

    #[test]
    fn novel_gene_gets_fresh_id() {
        let mut t = transcriptome();
        let out = t
            .add_sample_transcript("chr1", chain(&[(5000, 5100)]), "s1")
            .unwrap();
        assert_eq!(out.action, MergeAction::NovelGene);
        assert_eq!(out.gene_id, "novel_gene_000001");
        assert!(out.overlap.is_none());
        assert!(t.contains("novel_gene_000001"));
        assert_eq!(t.get_by_name("novel_gene_000001").unwrap().chrom, "chr1");
        assert_eq!(t.n_novel_genes(), 1);

        // unseen chromosome
        let out = t.add_sample_transcript("chrX", chain(&[(10, 20)]), "s1").unwrap();
        assert_eq!(out.gene_id, "novel_gene_000002");
        assert_eq!(t.chromosomes().collect::<Vec<_>>(), vec!["chr1", "chr2", "chrX"]);
    }

    #[test]
    fn novel_ids_skip_existing_ids() {
        let mut t = Transcriptome::from_reference(
            MergeOptions::default(),
            vec![reference("novel_gene_000001", "chr1", &[(100, 200)])],
        )
        .unwrap();
        let out = t.add_sample_transcript("chr1", chain(&[(900, 950)]), "s1").unwrap();
        assert_eq!(out.gene_id, "novel_gene_000002");
        assert_eq!(t.novel_counter(), 2);
    }

    #[test]
    fn intronic_or_opposite_strand_chain_is_novel() {
        let mut t = transcriptome();
        let intronic = t.add_sample_transcript("chr1", chain(&[(220, 280)]), "s1").unwrap();
        assert_eq!(intronic.action, MergeAction::NovelGene);

        let minus = ExonChain::from_pairs(Strand::Minus, &[(100, 200)]).unwrap();
        let out = t.add_sample_transcript("chr1", minus.clone(), "s1").unwrap();
        assert_eq!(out.action, MergeAction::NovelGene);

        let mut lax = Transcriptome::from_reference(
            MergeOptions::default().require_strand(false),
            vec![reference("G", "chr1", &[(100, 200), (300, 400)])],
        )
        .unwrap();
        let out = lax.add_sample_transcript("chr1", minus, "s1").unwrap();
        assert_eq!(out.action, MergeAction::ExtendGene);
    }

    #[test]
    fn threshold_rejects_weak_overlap() {
        let mut t = Transcriptome::from_reference(
            MergeOptions::default().min_exonic_fraction(0.8),
            vec![reference("G", "chr1", &[(100, 200)])],
        )
        .unwrap();
        // 50 of 100 bases exonic
        let out = t.add_sample_transcript("chr1", chain(&[(150, 250)]), "s1").unwrap();
        assert_eq!(out.action, MergeAction::NovelGene);
        let out = t.add_sample_transcript("chr1", chain(&[(110, 190)]), "s1").unwrap();
        assert_eq!(out.action, MergeAction::ExtendGene);
    }

    #[test]
    fn add_sample_counts_outcomes() {
        let mut t = transcriptome();
        let reads = vec![
            SplicedRead::new(
                "chr1",
                Strand::Plus,
                vec![RefBlock::new(120, 200), RefBlock::new(300, 350)],
            ),
            SplicedRead::new("chr2", Strand::Plus, vec![RefBlock::new(150, 180)]),
            SplicedRead::new("chr2", Strand::Plus, vec![RefBlock::new(8000, 8100)]),
            SplicedRead::new("chr2", Strand::Plus, Vec::new()),
        ];
        let summary = t.add_sample("s1", reads);
        assert_eq!(
            summary,
            ImportSummary {
                reads: 4,
                extended: 2,
                novel: 1,
                malformed: 1,
                failed: 0
            }
        );
        assert_eq!(t.samples().collect::<Vec<_>>(), vec!["s1"]);
        assert_eq!(t.get_by_id("H").unwrap().sample_total("s1"), 1);
    }

    #[test]
    fn duplicate_ids_resolve_the_same_way_everywhere() {
        let mut t = Transcriptome::from_reference(
            MergeOptions::default(),
            vec![
                reference("G1", "chr1", &[(100, 200)]),
                reference("G1", "chr1", &[(5000, 5100)]),
                reference("H", "chr2", &[(100, 200)]),
            ],
        )
        .unwrap();
        let start_of = |t: &Transcriptome| {
            (
                t.get("chr1", "G1").map(|g| g.start()),
                t.get_by_id("G1").map(|g| g.start()),
            )
        };
        assert_eq!(start_of(&t), (Some(5000), Some(5000)));

        // extends the shadowed gene at 100..200
        let out = t.add_sample_transcript("chr1", chain(&[(150, 250)]), "s1").unwrap();
        assert_eq!(out.action, MergeAction::ExtendGene);
        assert_eq!(t.genes_in_range("chr1", 220, 230)[0].end(), 250);
        assert_eq!(start_of(&t), (Some(5000), Some(5000)));

        t.remove_chromosome("chr2").unwrap();
        assert_eq!(start_of(&t), (Some(5000), Some(5000)));
    }

    #[test]
    fn parallel_import_ignores_chromosomes_without_valid_reads() {
        let reads = || vec![SplicedRead::new("chrZ", Strand::Plus, Vec::new())];

        let mut sequential = transcriptome();
        let mut parallel = transcriptome();
        let a = sequential.add_sample("s1", reads());
        let b = parallel.add_sample_parallel("s1", reads());

        assert_eq!(a, b);
        assert_eq!(b.malformed, 1);
        assert_eq!(
            parallel.chromosomes().collect::<Vec<_>>(),
            sequential.chromosomes().collect::<Vec<_>>()
        );
        assert_eq!(parallel.samples().count(), 0);
        assert_eq!(sequential.samples().count(), 0);
        assert_eq!(parallel.to_string(), sequential.to_string());
    }

    #[test]
    fn remove_chromosome_keeps_counter() {
        let mut t = transcriptome();
        t.add_sample_transcript("chr2", chain(&[(5000, 5100)]), "s1").unwrap();
        assert_eq!(t.novel_counter(), 1);

        let removed = t.remove_chromosome("chr2").unwrap();
        assert_eq!(removed.len(), 2);
        assert!(t.get_by_id("H").is_none());
        assert!(t.get_by_id("novel_gene_000001").is_none());
        assert!(t.get_by_id("G").is_some());
        assert!(matches!(
            t.remove_chromosome("chr2"),
            Err(Error::UnknownChromosome(_))
        ));

        let out = t.add_sample_transcript("chr2", chain(&[(5000, 5100)]), "s1").unwrap();
        assert_eq!(out.gene_id, "novel_gene_000002");
    }

    #[test]
    fn reference_only_drops_sample_evidence() {
        let mut t = transcriptome();
        t.add_sample_transcript("chr1", chain(&[(100, 200), (300, 420)]), "s1").unwrap();
        t.add_sample_transcript("chr1", chain(&[(5000, 5100)]), "s1").unwrap();

        let r = t.reference_only().unwrap();
        assert_eq!(r.n_genes(), 2);
        assert_eq!(r.n_novel_genes(), 0);
        assert_eq!(
            r.get_by_id("G").unwrap().interval(),
            Interval::new(100, 400, Strand::Plus).unwrap()
        );
        assert_eq!(r.novel_counter(), 1);
    }

    #[test]
    fn summary_lists_chromosomes() {
        let mut t = transcriptome();
        t.add_sample_transcript("chr1", chain(&[(5000, 5100)]), "s1").unwrap();
        let text = t.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Transcriptome: 3 genes (1 novel), 3 transcripts, 2 chromosomes, 1 samples"
        );
        assert_eq!(lines[1], "  - chr1: genes=2, novel_genes=1, transcripts=2");
        assert_eq!(lines[2], "  - chr2: genes=1, novel_genes=0, transcripts=1");
    }

    #[test]
    fn iteration_is_position_ordered() {
        let mut t = transcriptome();
        t.add_sample_transcript("chr1", chain(&[(10, 50)]), "s1").unwrap();
        let ids: Vec<&str> = t.iter_genes().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["novel_gene_000001", "G", "H"]);
        assert_eq!(t.n_transcripts(), 3);
    }
}
