use crate::genomics::GeneticConfig;
use crate::Innovation;

use ahash::RandomState;
use cellvolve::InnovationHistory;
use serde::{Deserialize, Serialize};

use std::collections::hash_map::{Entry, HashMap};
use std::num::NonZeroUsize;

/// A `History` keeps track of gene and node innovations in a
/// population, in order to make sure identical mutations
/// are assigned the same innovation numbers.
///
/// For gene innovations the input and output nodes are used to
/// identify identical mutations, and the corresponding innovation
/// number is recorded.
///
/// For node innovations the split gene is used to identify
/// identical mutations, and the innovation numbers for the
/// corresponding input gene, new node, and output gene are
/// recorded, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    next_gene_innovation: Innovation,
    next_node_innovation: Innovation,
    gene_innovations: HashMap<(Innovation, Innovation), Innovation, RandomState>,
    node_innovations: HashMap<Innovation, (Innovation, Innovation, Innovation), RandomState>,
}

impl InnovationHistory for History {
    type Config = GeneticConfig;

    fn new(input_count: NonZeroUsize, output_count: NonZeroUsize, _: &GeneticConfig) -> History {
        Self::new(input_count, output_count)
    }
}

impl History {
    /// Creates a new History for genomes of the specified shape.
    ///
    /// Initially generated genes are given the innovation number
    /// `o + i ⨯ output_count`, where `i` is the innovation number
    /// of their input node and `o` is the index of their output node.
    /// Thus, the next available gene innovation number starts at
    /// `input_count ⨯ output_count`.
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::History;
    /// use std::num::NonZeroUsize;
    ///
    /// let history = History::new(NonZeroUsize::new(3).unwrap(), NonZeroUsize::new(2).unwrap());
    ///
    /// assert_eq!(history.max_gene_innovation(), 5);
    /// assert_eq!(history.max_node_innovation(), 4);
    /// ```
    pub fn new(input_count: NonZeroUsize, output_count: NonZeroUsize) -> History {
        let (input_count, output_count) = (input_count.get(), output_count.get());
        let gene_innovations = (0..input_count)
            .flat_map(|i| (0..output_count).map(move |o| (i, o)))
            .map(|(i, o)| ((i, o + input_count), o + i * output_count))
            .collect();
        History {
            next_gene_innovation: input_count * output_count,
            next_node_innovation: input_count + output_count,
            gene_innovations,
            node_innovations: HashMap::default(),
        }
    }

    /// Returns the next gene innovation number, or the
    /// previously assigned number to the same gene mutation.
    pub(crate) fn next_gene_innovation(
        &self,
        input_id: Innovation,
        output_id: Innovation,
    ) -> Innovation {
        *self
            .gene_innovations
            .get(&(input_id, output_id))
            .unwrap_or(&self.next_gene_innovation)
    }

    /// Returns the next node and gene innovation numbers,
    /// or the previously assigned numbers to the same node mutation,
    /// in the format `(input gene, new node, output gene)`.
    ///
    /// If `duplicate` is `true`, the numbers are computed as if
    /// the mutation were new. Genomes that already split
    /// `split_gene` once must use this to avoid duplicate
    /// nodes and genes.
    pub(crate) fn next_node_innovation(
        &self,
        split_gene: Innovation,
        duplicate: bool,
    ) -> (Innovation, Innovation, Innovation) {
        match self.node_innovations.get(&split_gene) {
            Some(record) if !duplicate => *record,
            _ => (
                self.next_gene_innovation,
                self.next_node_innovation,
                self.next_gene_innovation + 1,
            ),
        }
    }

    /// Records a gene mutation, if it is new.
    pub(crate) fn add_gene_innovation(&mut self, input_id: Innovation, output_id: Innovation) {
        if let Entry::Vacant(entry) = self.gene_innovations.entry((input_id, output_id)) {
            entry.insert(self.next_gene_innovation);
            self.next_gene_innovation += 1;
        }
    }

    /// Records a node mutation splitting the gene `split_gene`
    /// between the `endpoints` nodes, if it is new or if
    /// `duplicate` is set. In the latter case the new record
    /// replaces the previous one.
    pub(crate) fn add_node_innovation(
        &mut self,
        split_gene: Innovation,
        endpoints: (Innovation, Innovation),
        duplicate: bool,
    ) {
        if self.node_innovations.contains_key(&split_gene) && !duplicate {
            return;
        }
        let new_node = self.next_node_innovation;
        self.next_node_innovation += 1;

        let new_input_gene = self.next_gene_innovation;
        self.gene_innovations
            .insert((endpoints.0, new_node), new_input_gene);
        let new_output_gene = new_input_gene + 1;
        self.gene_innovations
            .insert((new_node, endpoints.1), new_output_gene);
        self.next_gene_innovation += 2;

        self.node_innovations
            .insert(split_gene, (new_input_gene, new_node, new_output_gene));
    }

    /// Returns the highest gene innovation number generated.
    pub fn max_gene_innovation(&self) -> Innovation {
        self.next_gene_innovation.saturating_sub(1)
    }

    /// Returns the highest node innovation number generated.
    pub fn max_node_innovation(&self) -> Innovation {
        self.next_node_innovation.saturating_sub(1)
    }

    /// Returns an iterator over the complete record of
    /// gene innovations, in the format
    /// `((input node, output node), gene innovation)`.
    /// No ordering is guaranteed.
    pub fn gene_innovation_history(
        &self,
    ) -> impl Iterator<Item = (&(Innovation, Innovation), &Innovation)> {
        self.gene_innovations.iter()
    }

    /// Returns an iterator over the complete record of
    /// node innovations, in the format
    /// `(split gene, (input gene, new node, output gene))`.
    /// No ordering is guaranteed.
    pub fn node_innovation_history(
        &self,
    ) -> impl Iterator<Item = (&Innovation, &(Innovation, Innovation, Innovation))> {
        self.node_innovations.iter()
    }
}
