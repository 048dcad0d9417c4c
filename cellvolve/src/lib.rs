//! A speciated, innovation-tracked neuroevolution engine in the style
//! of NEAT: <http://nn.cs.utexas.edu/keyword?stanley:ec02>
//!
//! Genomes are grouped into species by comparing them against each
//! species' _representative_ (its first member). Every generation the
//! species champions are carried over unchanged, the remaining offspring
//! are allotted proportionally to each species' best fitness, and species
//! which stop producing the population champion eventually go extinct.
//!
//! The genome representation is left to the user through the [`Genome`]
//! trait. A neural network-based genome is supplied by the `cellvolve-nn`
//! crate.
//!
//! # Example usage: Evolution of XOR function approximator, using `cellvolve-nn`
//! ```
//! use cellvolve::{Population, PopulationConfig};
//! use cellvolve_nn::{
//!     genomics::{GeneticConfig, NNGenome},
//!     networks::Network,
//! };
//! use std::num::NonZeroUsize;
//!
//! fn evaluate_xor(genome: &NNGenome) -> f32 {
//!     let network = Network::from(genome);
//!
//!     let values = [
//!         ([1.0, 0.0, 0.0], 0.0),
//!         ([1.0, 0.0, 1.0], 1.0),
//!         ([1.0, 1.0, 0.0], 1.0),
//!         ([1.0, 1.0, 1.0], 0.0),
//!     ];
//!
//!     let error: f32 = values
//!         .iter()
//!         .map(|(input, output)| (network.evaluate_at(input)[0] - output).abs())
//!         .sum();
//!
//!     (4.0 - error).powf(2.0)
//! }
//!
//! let genetic_config = GeneticConfig {
//!     child_mutation_chance: 0.65,
//!     mate_by_averaging_chance: 0.4,
//!     initial_expression_chance: 1.0,
//!     weight_bound: 5.0,
//!     weight_reset_chance: 0.2,
//!     weight_nudge_chance: 0.9,
//!     weight_mutation_power: 2.5,
//!     node_addition_mutation_chance: 0.03,
//!     gene_addition_mutation_chance: 0.05,
//!     max_gene_addition_mutation_attempts: 20,
//!     excess_gene_factor: 1.0,
//!     disjoint_gene_factor: 1.0,
//!     common_weight_factor: 0.4,
//!     ..GeneticConfig::zero()
//! };
//!
//! let population_config = PopulationConfig {
//!     size: NonZeroUsize::new(50).unwrap(),
//!     input_count: NonZeroUsize::new(3).unwrap(),
//!     output_count: NonZeroUsize::new(1).unwrap(),
//!     distance_threshold: 3.0,
//!     ..PopulationConfig::default()
//! };
//!
//! let mut population = Population::<_, _, NNGenome>::new(population_config, genetic_config).unwrap();
//! for _ in 0..10 {
//!     population.evaluate_fitness(evaluate_xor).unwrap();
//!     population.update_statistics().unwrap();
//!     population.evolve().unwrap();
//! }
//! assert_eq!(population.genomes().count(), 50);
//! ```

mod genome;
mod populations;

pub use genome::*;
pub use populations::*;
