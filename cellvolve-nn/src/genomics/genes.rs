use crate::genomics::GeneticConfig;
use crate::Innovation;

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Genes are the principal components of genomes.
/// They are created between two nodes, and become
/// network connections in the genome's phenotype.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Gene {
    id: Innovation,
    input: Innovation,
    output: Innovation,
    weight: f32,
    suppressed: bool,
}

impl Gene {
    /// Returns a new _unsuppressed_ gene with the specified parameters.
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::Gene;
    ///
    /// let gene = Gene::new(42, 3, 9, 2.0);
    /// assert_eq!(gene.innovation(), 42);
    /// assert_eq!((gene.input(), gene.output()), (3, 9));
    /// assert!(!gene.suppressed());
    /// ```
    pub fn new(id: Innovation, input: Innovation, output: Innovation, weight: f32) -> Gene {
        Gene {
            id,
            input,
            output,
            weight,
            suppressed: false,
        }
    }

    /// Returns a weight drawn uniformly from ±`config.weight_bound`.
    pub(super) fn random_weight<R: Rng + ?Sized>(config: &GeneticConfig, rng: &mut R) -> f32 {
        let bound = config.weight_bound.abs();
        rng.gen_range(-bound..=bound)
    }

    /// Replaces the gene's weight with one drawn
    /// uniformly from ±[`weight_bound`].
    ///
    /// [`weight_bound`]: crate::genomics::GeneticConfig::weight_bound
    pub fn randomize_weight<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        self.weight = Self::random_weight(config, rng);
    }

    /// Nudges the gene's weight by an amount drawn uniformly
    /// from ±[`weight_mutation_power`], clamping the result
    /// to ±[`weight_bound`].
    ///
    /// [`weight_mutation_power`]: crate::genomics::GeneticConfig::weight_mutation_power
    /// [`weight_bound`]: crate::genomics::GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::{Gene, GeneticConfig};
    ///
    /// let config = GeneticConfig {
    ///     weight_mutation_power: 2.5,
    ///     weight_bound: 4.0,
    ///     ..GeneticConfig::zero()
    /// };
    /// let mut gene = Gene::new(42, 3, 9, 3.0);
    /// gene.nudge_weight(&config, &mut rand::thread_rng());
    ///
    /// assert!((gene.weight() - 3.0).abs() <= 2.5);
    /// assert!(gene.weight().abs() <= 4.0);
    /// ```
    pub fn nudge_weight<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        let power = config.weight_mutation_power.abs();
        let bound = config.weight_bound.abs();
        self.weight += rng.gen_range(-power..=power);
        self.weight = self.weight.clamp(-bound, bound);
    }

    /// Returns the gene's innovation number.
    pub fn innovation(&self) -> Innovation {
        self.id
    }

    /// Returns the gene's input node's innovation number.
    pub fn input(&self) -> Innovation {
        self.input
    }

    /// Returns the gene's output node's innovation number.
    pub fn output(&self) -> Innovation {
        self.output
    }

    /// Returns the gene's input and output node innovation numbers.
    pub fn endpoints(&self) -> (Innovation, Innovation) {
        (self.input, self.output)
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, w: f32) {
        self.weight = w;
    }

    /// Returns whether the gene is suppressed. Suppressed
    /// genes are kept for mating but are not expressed
    /// as network connections.
    pub fn suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn set_suppressed(&mut self, suppression: bool) {
        self.suppressed = suppression;
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:?}[{:?}->{:?}, {:.3}]{}",
            if self.suppressed { "(" } else { "" },
            self.id,
            self.input,
            self.output,
            self.weight,
            if self.suppressed { ")" } else { "" },
        )
    }
}
