//! Genomes are the focus of evolution in NEAT.
//! They are a collection of genes and nodes that can be instantiated
//! as a phenotype (a neural network). Genomes can be progressively mutated,
//! thus adding complexity and functionality.

mod config;
mod errors;
mod genes;
mod history;
mod nodes;

pub use config::GeneticConfig;
pub use errors::{GeneValidityError, MutationError, NodeValidityError};
pub use genes::Gene;
pub use history::History;
pub use nodes::{ActivationType, Node, NodeType};

use crate::Innovation;

use cellvolve::Genome;
use rand::prelude::{IteratorRandom, Rng, SliceRandom};
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;

/// A mutable collection of genes and nodes,
/// keyed and ordered by innovation number.
///
/// Suports Serde for convenient genome saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct NNGenome {
    genes: BTreeMap<Innovation, Gene>,
    nodes: BTreeMap<Innovation, Node>,
    fitness: f32,
}

impl NNGenome {
    /// Create a new genome with `input_count` sensors
    /// and `output_count` actuators.
    ///
    /// Sensors are numbered `0..input_count` and actuators
    /// follow them. Each sensor-actuator pair is connected with
    /// probability [`initial_expression_chance`], by a gene with
    /// innovation number `o + i ⨯ output_count`, where `i` is the
    /// sensor's number and `o` the actuator's index.
    ///
    /// [`initial_expression_chance`]: crate::genomics::GeneticConfig::initial_expression_chance
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     initial_expression_chance: 1.0,
    ///     weight_bound: 5.0,
    ///     ..GeneticConfig::zero()
    /// };
    ///
    /// let genome = NNGenome::new(NonZeroUsize::new(3).unwrap(), NonZeroUsize::new(2).unwrap(), &config);
    ///
    /// assert_eq!(genome.nodes().filter(|n| n.node_type() == NodeType::Sensor).count(), 3);
    /// assert_eq!(genome.nodes().filter(|n| n.node_type() == NodeType::Actuator).count(), 2);
    ///
    /// // With an initial_expression_chance of 1, every sensor is connected to every actuator.
    /// assert_eq!(genome.genes().count(), 3 * 2);
    /// assert!(genome.genes().all(|g| g.weight().abs() <= config.weight_bound));
    /// ```
    pub fn new(
        input_count: NonZeroUsize,
        output_count: NonZeroUsize,
        config: &GeneticConfig,
    ) -> NNGenome {
        Self::new_with(input_count, output_count, config, &mut rand::thread_rng())
    }

    /// Like [`new`](NNGenome::new), drawing from the given
    /// random number generator.
    pub fn new_with<R: Rng + ?Sized>(
        input_count: NonZeroUsize,
        output_count: NonZeroUsize,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> NNGenome {
        let (input_count, output_count) = (input_count.get(), output_count.get());

        let mut nodes = BTreeMap::new();
        for i in 0..input_count {
            nodes.insert(i, Node::new(i, NodeType::Sensor, ActivationType::Identity));
        }
        for o in 0..output_count {
            let activation = config
                .output_activation_types
                .get(o)
                .copied()
                .unwrap_or(ActivationType::Sigmoid);
            nodes.insert(
                o + input_count,
                Node::new(o + input_count, NodeType::Actuator, activation),
            );
        }

        let mut genes = BTreeMap::new();
        for i in 0..input_count {
            for o in 0..output_count {
                if rng.gen::<f32>() < config.initial_expression_chance {
                    let id = o + i * output_count;
                    let weight = Gene::random_weight(config, rng);
                    genes.insert(id, Gene::new(id, i, o + input_count, weight));
                }
            }
        }

        NNGenome {
            genes,
            nodes,
            fitness: 0.0,
        }
    }

    /// Adds a new gene to the genome.
    /// Returns a reference to the new gene.
    ///
    /// # Errors
    /// Returns an error if a gene with the same innovation
    /// number or between the same nodes already exists, if
    /// either endpoint does not exist, or if the output
    /// endpoint is a sensor.
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::{GeneticConfig, GeneValidityError, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let mut genome = NNGenome::new(one, one, &GeneticConfig::zero());
    ///
    /// assert_eq!(genome.add_gene(7, 0, 1, 1.5).unwrap().weight(), 1.5);
    /// assert_eq!(
    ///     genome.add_gene(8, 0, 1, 1.0),
    ///     Err(GeneValidityError::DuplicateGeneWithEndpoints(0, 1))
    /// );
    /// assert_eq!(genome.add_gene(9, 1, 0, 1.0), Err(GeneValidityError::SensorEndpoint(0)));
    /// ```
    pub fn add_gene(
        &mut self,
        id: Innovation,
        input: Innovation,
        output: Innovation,
        weight: f32,
    ) -> Result<&Gene, GeneValidityError> {
        self.check_gene_viability(id, input, output)?;
        Ok(self.insert_gene(Gene::new(id, input, output, weight)))
    }

    fn check_gene_viability(
        &self,
        id: Innovation,
        input: Innovation,
        output: Innovation,
    ) -> Result<(), GeneValidityError> {
        if self.genes.contains_key(&id) {
            return Err(GeneValidityError::DuplicateGeneID(id));
        }
        let output_node = match (self.nodes.get(&input), self.nodes.get(&output)) {
            (Some(_), Some(output_node)) => output_node,
            _ => return Err(GeneValidityError::NonexistantEndpoints(input, output)),
        };
        if output_node.node_type() == NodeType::Sensor {
            return Err(GeneValidityError::SensorEndpoint(output));
        }
        if self.connects(input, output) {
            return Err(GeneValidityError::DuplicateGeneWithEndpoints(input, output));
        }
        Ok(())
    }

    fn insert_gene(&mut self, gene: Gene) -> &Gene {
        self.genes.entry(gene.innovation()).or_insert(gene)
    }

    /// Returns whether a gene, suppressed or not,
    /// exists between the specified nodes.
    fn connects(&self, input: Innovation, output: Innovation) -> bool {
        self.genes
            .values()
            .any(|g| g.endpoints() == (input, output))
    }

    /// Adds a new hidden node to the genome.
    /// Returns a reference to the new node.
    ///
    /// # Errors
    /// Returns an error if a node with the same
    /// innovation number already exists.
    pub fn add_node(
        &mut self,
        id: Innovation,
        activation_type: ActivationType,
    ) -> Result<&Node, NodeValidityError> {
        if self.nodes.contains_key(&id) {
            return Err(NodeValidityError::DuplicateNodeID(id));
        }
        Ok(&*self
            .nodes
            .entry(id)
            .or_insert(Node::new(id, NodeType::Neuron, activation_type)))
    }

    /// Mutates the genome's gene weights. Each weight is either
    /// reset, nudged, or left untouched.
    ///
    /// Older genes have a lower chance of being reset,
    /// as they have had more time to settle.
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     initial_expression_chance: 1.0,
    ///     weight_bound: 5.0,
    ///     weight_nudge_chance: 1.0,
    ///     weight_mutation_power: 0.5,
    ///     ..GeneticConfig::zero()
    /// };
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let mut genome = NNGenome::new(one, one, &config);
    /// let before = genome.genes().next().unwrap().weight();
    ///
    /// genome.mutate_weights(&config, &mut rand::thread_rng());
    ///
    /// let after = genome.genes().next().unwrap().weight();
    /// assert!((after - before).abs() <= 0.5);
    /// ```
    pub fn mutate_weights<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        let max_innovation = self.genes.keys().next_back().copied().unwrap_or_default().max(1) as f32;
        for gene in self.genes.values_mut() {
            let age_factor = ((gene.innovation() + 1) as f32 / max_innovation).powi(2);
            if rng.gen::<f32>() < config.weight_reset_chance * age_factor {
                gene.randomize_weight(config, rng);
            } else if rng.gen::<f32>() < config.weight_nudge_chance {
                gene.nudge_weight(config, rng);
            }
        }
    }

    /// Induces a _gene mutation_ in the genome, connecting
    /// a random pair of unconnected nodes.
    /// If successful, returns the newly added gene.
    ///
    /// Genes from a node to itself are only accepted with
    /// probability [`recursion_chance`].
    ///
    /// [`recursion_chance`]: crate::genomics::GeneticConfig::recursion_chance
    ///
    /// # Errors
    /// Returns an error if every possible gene already exists,
    /// or if [`max_gene_addition_mutation_attempts`] random
    /// pairs were tried without success.
    ///
    /// [`max_gene_addition_mutation_attempts`]: crate::genomics::GeneticConfig::max_gene_addition_mutation_attempts
    pub fn mutate_add_gene<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<&Gene, MutationError> {
        let inputs: Vec<Innovation> = self.nodes.keys().copied().collect();
        let outputs: Vec<Innovation> = self
            .nodes
            .values()
            .filter(|n| n.node_type() != NodeType::Sensor)
            .map(Node::innovation)
            .collect();
        if self.genes.len() >= inputs.len() * outputs.len() {
            return Err(MutationError::GenomeFullyConnected);
        }

        for _ in 0..config.max_gene_addition_mutation_attempts {
            let (input, output) = match (inputs.choose(rng), outputs.choose(rng)) {
                (Some(&input), Some(&output)) => (input, output),
                _ => break,
            };
            if self.connects(input, output)
                || (input == output && rng.gen::<f32>() >= config.recursion_chance)
            {
                continue;
            }
            let id = history.next_gene_innovation(input, output);
            if self.genes.contains_key(&id) {
                continue;
            }
            history.add_gene_innovation(input, output);
            let weight = Gene::random_weight(config, rng);
            return Ok(self.insert_gene(Gene::new(id, input, output, weight)));
        }

        Err(MutationError::NoInputOutputPairFound)
    }

    /// Induces a _node mutation_ in the genome, splitting a
    /// random expressed gene in two with a new hidden node in
    /// between. The split gene is suppressed; the gene into the
    /// new node gets a weight of 1 and the gene out of it
    /// inherits the split gene's weight.
    /// If successful, returns the new node's innovation number.
    ///
    /// # Errors
    /// Returns an error if the genome has no expressed genes.
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::{GeneticConfig, History, NNGenome, NodeType};
    /// use std::num::NonZeroUsize;
    ///
    /// let config = GeneticConfig {
    ///     initial_expression_chance: 1.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let mut history = History::new(one, one);
    /// let mut genome = NNGenome::new(one, one, &config);
    ///
    /// let node = genome.mutate_add_node(&mut history, &config, &mut rand::thread_rng()).unwrap();
    ///
    /// assert_eq!(node, 2);
    /// assert_eq!(genome.nodes().filter(|n| n.node_type() == NodeType::Neuron).count(), 1);
    /// assert_eq!(genome.genes().filter(|g| !g.suppressed()).count(), 2);
    /// ```
    pub fn mutate_add_node<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Result<Innovation, MutationError> {
        let (split_gene, endpoints, weight) = self
            .genes
            .values()
            .filter(|g| !g.suppressed())
            .choose(rng)
            .map(|g| (g.innovation(), g.endpoints(), g.weight()))
            .ok_or(MutationError::EmptyGenome)?;

        let mut duplicate = false;
        let mut triplet = history.next_node_innovation(split_gene, false);
        if self.nodes.contains_key(&triplet.1) {
            // This genome already split the same gene before.
            duplicate = true;
            triplet = history.next_node_innovation(split_gene, true);
        }
        history.add_node_innovation(split_gene, endpoints, duplicate);
        let (input_gene, new_node, output_gene) = triplet;

        if let Some(gene) = self.genes.get_mut(&split_gene) {
            gene.set_suppressed(true);
        }
        let activation = config
            .activation_types
            .choose(rng)
            .copied()
            .unwrap_or(ActivationType::Sigmoid);
        self.nodes
            .insert(new_node, Node::new(new_node, NodeType::Neuron, activation));
        self.genes
            .insert(input_gene, Gene::new(input_gene, endpoints.0, new_node, 1.0));
        self.genes.insert(
            output_gene,
            Gene::new(output_gene, new_node, endpoints.1, weight),
        );

        Ok(new_node)
    }

    /// Mates two genomes, returning their child.
    ///
    /// The child inherits the structure of the fitter parent,
    /// or of both if they are equally fit. Genes common to both
    /// parents have their weights either averaged or chosen at
    /// random, and are suppressed if suppressed in either parent.
    /// The child is then mutated with probability
    /// [`child_mutation_chance`], and its fitness is 0.
    ///
    /// [`child_mutation_chance`]: crate::genomics::GeneticConfig::child_mutation_chance
    pub fn mate(
        parent1: &NNGenome,
        parent2: &NNGenome,
        history: &mut History,
        config: &GeneticConfig,
    ) -> NNGenome {
        Self::mate_with(parent1, parent2, history, config, &mut rand::thread_rng())
    }

    /// Like [`mate`](NNGenome::mate), drawing from the given
    /// random number generator.
    pub fn mate_with<R: Rng + ?Sized>(
        parent1: &NNGenome,
        parent2: &NNGenome,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> NNGenome {
        let (fitter, other) = if parent1.fitness >= parent2.fitness {
            (parent1, parent2)
        } else {
            (parent2, parent1)
        };

        let mut child = fitter.clone();
        if (fitter.fitness - other.fitness).abs() < f32::EPSILON {
            child.add_noncommon_structure(other);
        }
        child.combine_common_genes(other, config, rng);
        if rng.gen::<f32>() < config.child_mutation_chance {
            child.mutate_all(history, config, rng);
        }
        child.reset_suppresseds(config, rng);
        child.fitness = 0.0;

        child
    }

    fn mutate_all<R: Rng + ?Sized>(
        &mut self,
        history: &mut History,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        self.mutate_weights(config, rng);
        if rng.gen::<f32>() < config.node_addition_mutation_chance {
            let _ = self.mutate_add_node(history, config, rng);
        }
        if rng.gen::<f32>() < config.gene_addition_mutation_chance {
            let _ = self.mutate_add_gene(history, config, rng);
        }
    }

    /// Adds all genes and nodes of `other` missing from `self`.
    fn add_noncommon_structure(&mut self, other: &NNGenome) {
        for (id, node) in &other.nodes {
            self.nodes.entry(*id).or_insert_with(|| node.clone());
        }
        for (id, gene) in &other.genes {
            if !self.genes.contains_key(id) && !self.connects(gene.input(), gene.output()) {
                self.genes.insert(*id, gene.clone());
            }
        }
    }

    fn combine_common_genes<R: Rng + ?Sized>(
        &mut self,
        other: &NNGenome,
        config: &GeneticConfig,
        rng: &mut R,
    ) {
        let averaging = rng.gen::<f32>() < config.mate_by_averaging_chance;
        for (id, others_gene) in &other.genes {
            if let Some(own_gene) = self.genes.get_mut(id) {
                if averaging {
                    own_gene.set_weight((own_gene.weight() + others_gene.weight()) / 2.0);
                } else if rng.gen::<bool>() {
                    own_gene.set_weight(others_gene.weight());
                }
                if others_gene.suppressed() {
                    own_gene.set_suppressed(true);
                }
            }
        }
    }

    /// Unsuppresses suppressed genes with probability `config.suppression_reset_chance`.
    fn reset_suppresseds<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        for gene in self.genes.values_mut() {
            if gene.suppressed() && rng.gen::<f32>() < config.suppression_reset_chance {
                gene.set_suppressed(false);
            }
        }
    }

    /// Calculates the _genetic distance_ between two genomes,
    /// weighting excess genes, disjoint genes, and the average
    /// weight difference of common genes as specified in `config`.
    ///
    /// Non-common genes with innovation numbers below the highest
    /// common innovation number are disjoint; the rest are excess.
    /// Genomes with no common genes have no weight difference.
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::{ActivationType, GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// const EXCESS_FACTOR: f32 = 1.5;
    /// const DISJOINT_FACTOR: f32 = 0.5;
    /// const WEIGHT_FACTOR: f32 = 0.25;
    ///
    /// let config = GeneticConfig {
    ///     excess_gene_factor: EXCESS_FACTOR,
    ///     disjoint_gene_factor: DISJOINT_FACTOR,
    ///     common_weight_factor: WEIGHT_FACTOR,
    ///     ..GeneticConfig::zero()
    /// };
    /// let (two, one) = (NonZeroUsize::new(2).unwrap(), NonZeroUsize::new(1).unwrap());
    ///
    /// let mut genome1 = NNGenome::new(two, one, &config);
    /// let mut genome2 = NNGenome::new(two, one, &config);
    /// genome1.add_node(3, ActivationType::Sigmoid).unwrap();
    /// genome2.add_node(3, ActivationType::Sigmoid).unwrap();
    ///
    /// // Common gene, weight difference of 2.0.
    /// genome1.add_gene(0, 0, 2, 1.0).unwrap();
    /// genome2.add_gene(0, 0, 2, -1.0).unwrap();
    /// // Disjoint genes.
    /// genome1.add_gene(1, 1, 2, 3.0).unwrap();
    /// genome2.add_gene(2, 1, 3, 1.0).unwrap();
    /// // Common gene, weight difference of 0.0.
    /// genome1.add_gene(3, 2, 3, 1.0).unwrap();
    /// genome2.add_gene(3, 2, 3, 1.0).unwrap();
    /// // Excess gene.
    /// genome1.add_gene(4, 2, 2, 3.0).unwrap();
    ///
    /// assert_eq!(
    ///     NNGenome::genetic_distance(&genome1, &genome2, &config),
    ///     DISJOINT_FACTOR * 2.0 + EXCESS_FACTOR * 1.0 + WEIGHT_FACTOR * (2.0 + 0.0) / 2.0
    /// );
    /// ```
    pub fn genetic_distance(first: &NNGenome, second: &NNGenome, config: &GeneticConfig) -> f32 {
        let mut common_count = 0;
        let mut weight_diff = 0.0;
        let mut common_max = None;
        for (id, gene) in &first.genes {
            if let Some(others_gene) = second.genes.get(id) {
                common_count += 1;
                weight_diff += (gene.weight() - others_gene.weight()).abs();
                common_max = Some(*id);
            }
        }
        let common_weight_diff = if common_count == 0 {
            0.0
        } else {
            weight_diff / common_count as f32
        };

        let (disjoint_first, excess_first) = first.count_noncommon_genes(second, common_max);
        let (disjoint_second, excess_second) = second.count_noncommon_genes(first, common_max);

        config.disjoint_gene_factor * (disjoint_first + disjoint_second) as f32
            + config.excess_gene_factor * (excess_first + excess_second) as f32
            + config.common_weight_factor * common_weight_diff
    }

    /// Returns the number of disjoint and excess genes of `self` relative to `other`.
    fn count_noncommon_genes(
        &self,
        other: &NNGenome,
        common_max: Option<Innovation>,
    ) -> (usize, usize) {
        self.genes
            .keys()
            .filter(|id| !other.genes.contains_key(id))
            .fold((0, 0), |(disjoint, excess), id| {
                if common_max.map_or(false, |max| *id < max) {
                    (disjoint + 1, excess)
                } else {
                    (disjoint, excess + 1)
                }
            })
    }

    /// Returns an iterator over the genome's genes,
    /// in innovation number order.
    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.genes.values()
    }

    /// Returns an iterator over the genome's nodes,
    /// in innovation number order: sensors, then
    /// actuators, then hidden nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns the gene with the specified innovation number, if any.
    pub fn gene(&self, id: Innovation) -> Option<&Gene> {
        self.genes.get(&id)
    }

    /// Returns the node with the specified innovation number, if any.
    pub fn node(&self, id: Innovation) -> Option<&Node> {
        self.nodes.get(&id)
    }
}

impl Genome for NNGenome {
    type Config = GeneticConfig;
    type InnovationHistory = History;

    fn new(input_count: NonZeroUsize, output_count: NonZeroUsize, config: &GeneticConfig) -> Self {
        NNGenome::new(input_count, output_count, config)
    }

    fn genetic_distance(first: &Self, second: &Self, config: &GeneticConfig) -> f32 {
        NNGenome::genetic_distance(first, second, config)
    }

    fn mate(parent1: &Self, parent2: &Self, history: &mut History, config: &GeneticConfig) -> Self {
        NNGenome::mate(parent1, parent2, history, config)
    }

    fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    fn fitness(&self) -> f32 {
        self.fitness
    }
}

impl fmt::Display for NNGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let genes: Vec<String> = self.genes.values().map(Gene::to_string).collect();
        let nodes: Vec<String> = self.nodes.values().map(Node::to_string).collect();
        f.debug_struct("NNGenome")
            .field("genes", &genes)
            .field("nodes", &nodes)
            .field("fitness", &self.fitness)
            .finish()
    }
}
