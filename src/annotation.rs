use std::collections::{BTreeMap, HashMap};

use crate::error::Result;
use crate::model::chain::ExonChain;
use crate::model::gene::Gene;
use crate::types::{Interval, RefBlock, Strand};

/// One annotated gene as supplied by the reference import collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGene {
    pub id: String,
    pub name: String,
    pub chrom: String,
    pub interval: Interval,
    pub chains: Vec<ExonChain>,
    pub attributes: BTreeMap<String, String>,
}

impl ReferenceGene {
    pub fn into_gene(self) -> Result<Gene> {
        let mut gene = Gene::from_reference(self.id, self.name, self.chrom, self.interval, self.chains)?;
        gene.attributes = self.attributes;
        Ok(gene)
    }
}

#[derive(Debug)]
struct PendingGene {
    id: String,
    name: String,
    chrom: String,
    strand: Strand,
    transcripts: Vec<usize>,
    attributes: BTreeMap<String, String>,
}

#[derive(Debug)]
struct PendingTranscript {
    key: String,
    strand: Strand,
    exons: Vec<RefBlock>,
}

/// Collects exon-level annotation records into `ReferenceGene`s.
///
/// Workflow:
/// 1) `add_exon` for every exon feature (any order)
/// 2) `finish` sorts each transcript's exons and validates the chain
///
/// Notes:
/// - the first record of a gene decides its chromosome, strand and name.
/// - transcripts that do not form a valid chain are logged and skipped;
///   genes left without transcripts are dropped.
#[derive(Debug, Default)]
pub struct ReferenceBuilder {
    genes: Vec<PendingGene>,
    transcripts: Vec<PendingTranscript>,
    gene_key_to_id: HashMap<String, usize>,
    tx_key_to_id: HashMap<String, usize>,
}

impl ReferenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_exon(
        &mut self,
        chrom: &str,
        strand: Strand,
        gene_id: &str,
        gene_name: Option<&str>,
        transcript_id: &str,
        block: RefBlock,
    ) {
        let gid = self.intern_gene(chrom, strand, gene_id, gene_name);
        let tid = self.intern_tx(gid, strand, transcript_id);
        self.transcripts[tid].exons.push(block);
    }

    /// Attach an auxiliary annotation (e.g. biotype) to a gene seen before.
    pub fn gene_attribute(&mut self, gene_id: &str, key: &str, value: &str) {
        if let Some(&gid) = self.gene_key_to_id.get(gene_id) {
            self.genes[gid]
                .attributes
                .insert(key.to_string(), value.to_string());
        }
    }

    pub fn finish(mut self) -> Vec<ReferenceGene> {
        let mut out = Vec::with_capacity(self.genes.len());

        for gene in self.genes {
            let mut chains = Vec::with_capacity(gene.transcripts.len());
            for &tid in &gene.transcripts {
                let tx = &mut self.transcripts[tid];
                let mut exons = std::mem::take(&mut tx.exons);
                // annotations list minus-strand exons 3' to 5'
                exons.sort_unstable();
                match ExonChain::new(tx.strand, exons) {
                    Ok(chain) => chains.push(chain),
                    Err(e) => log::warn!("skipping transcript {} of {}: {}", tx.key, gene.id, e),
                }
            }

            let Some(interval) = chains
                .iter()
                .map(|c| Interval::from_bounds(c.start(), c.end(), gene.strand))
                .reduce(|a, b| a.hull(&b))
            else {
                log::warn!("skipping gene {} without valid transcripts", gene.id);
                continue;
            };

            out.push(ReferenceGene {
                id: gene.id,
                name: gene.name,
                chrom: gene.chrom,
                interval,
                chains,
                attributes: gene.attributes,
            });
        }

        out.sort_by(|a, b| {
            (&a.chrom, a.interval.start(), &a.id).cmp(&(&b.chrom, b.interval.start(), &b.id))
        });
        out
    }

    fn intern_gene(
        &mut self,
        chrom: &str,
        strand: Strand,
        gene_id: &str,
        gene_name: Option<&str>,
    ) -> usize {
        if let Some(&gid) = self.gene_key_to_id.get(gene_id) {
            return gid;
        }

        let gid = self.genes.len();
        self.genes.push(PendingGene {
            id: gene_id.to_string(),
            name: gene_name
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(gene_id)
                .to_string(),
            chrom: chrom.to_string(),
            strand,
            transcripts: Vec::new(),
            attributes: BTreeMap::new(),
        });
        self.gene_key_to_id.insert(gene_id.to_string(), gid);
        gid
    }

    fn intern_tx(&mut self, gene: usize, strand: Strand, tx_key: &str) -> usize {
        if let Some(&tid) = self.tx_key_to_id.get(tx_key) {
            return tid;
        }

        let tid = self.transcripts.len();
        self.transcripts.push(PendingTranscript {
            key: tx_key.to_string(),
            strand,
            exons: Vec::new(),
        });
        self.tx_key_to_id.insert(tx_key.to_string(), tid);
        self.genes[gene].transcripts.push(tid);
        tid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_exons_into_genes_and_chains() {
        let mut b = ReferenceBuilder::new();
        b.add_exon("chr1", Strand::Minus, "G1", Some("Alpha"), "T1", RefBlock::new(300, 400));
        b.add_exon("chr1", Strand::Minus, "G1", Some("Alpha"), "T1", RefBlock::new(100, 200));
        b.add_exon("chr1", Strand::Minus, "G1", None, "T2", RefBlock::new(150, 400));
        b.add_exon("chr1", Strand::Plus, "G0", None, "T3", RefBlock::new(5000, 5100));
        b.gene_attribute("G1", "gene_biotype", "lncRNA");

        let genes = b.finish();
        assert_eq!(genes.len(), 2);

        let g1 = &genes[0];
        assert_eq!(g1.id, "G1");
        assert_eq!(g1.name, "Alpha");
        assert_eq!(g1.interval, Interval::new(100, 400, Strand::Minus).unwrap());
        assert_eq!(g1.chains.len(), 2);
        assert_eq!(g1.chains[0].exons(), &[RefBlock::new(100, 200), RefBlock::new(300, 400)]);
        assert_eq!(g1.attributes.get("gene_biotype").map(String::as_str), Some("lncRNA"));

        // no name attribute: the id doubles as name
        assert_eq!(genes[1].name, "G0");
    }

    #[test]
    fn malformed_transcripts_are_skipped() {
        let mut b = ReferenceBuilder::new();
        b.add_exon("chr2", Strand::Plus, "G9", None, "bad", RefBlock::new(100, 200));
        b.add_exon("chr2", Strand::Plus, "G9", None, "bad", RefBlock::new(150, 250));
        b.add_exon("chr2", Strand::Plus, "G9", None, "good", RefBlock::new(100, 250));
        b.add_exon("chr2", Strand::Plus, "G8", None, "only_bad", RefBlock::new(10, 20));
        b.add_exon("chr2", Strand::Plus, "G8", None, "only_bad", RefBlock::new(20, 30));

        let genes = b.finish();
        assert_eq!(genes.len(), 1);
        assert_eq!(genes[0].id, "G9");
        assert_eq!(genes[0].chains.len(), 1);

        let gene = genes[0].clone().into_gene().unwrap();
        assert!(gene.is_annotated());
        assert_eq!(gene.n_transcripts(), 1);
    }
}
