use std::num::NonZeroUsize;

/// An interface for genomes that can be evolved by a [`Population`].
///
/// Cloning a genome must produce an independent deep copy;
/// parents are cloned before mating so that the originals
/// are never mutated.
///
/// [`Population`]: crate::Population
pub trait Genome: Clone {
    type Config;
    type InnovationHistory: InnovationHistory<Config = Self::Config>;

    /// Returns a randomized genome with the given shape.
    fn new(input_count: NonZeroUsize, output_count: NonZeroUsize, config: &Self::Config) -> Self;

    /// Returns the genetic distance between two genomes.
    ///
    /// The population always passes a species representative
    /// as `first` and the candidate member as `second`.
    fn genetic_distance(first: &Self, second: &Self, config: &Self::Config) -> f32;

    /// Combines two genomes and returns a "child" genome.
    ///
    /// The same `history` is lent to every call made during
    /// an epoch, across all species.
    fn mate(
        parent1: &Self,
        parent2: &Self,
        history: &mut Self::InnovationHistory,
        config: &Self::Config,
    ) -> Self;

    /// Sets the genome's fitness value.
    fn set_fitness(&mut self, fitness: f32);

    /// Returns the genome's fitness value.
    fn fitness(&self) -> f32;
}

/// An Innovation History keeps track of genetic
/// innovations throughout successive generations,
/// so that identical structural changes in different
/// genomes receive identical identifiers.
///
/// The exact function and utility of the
/// InnovationHistory is left to the implementor.
pub trait InnovationHistory {
    type Config;

    /// Returns a history seeded with the baseline structure
    /// of a genome of the given shape.
    fn new(input_count: NonZeroUsize, output_count: NonZeroUsize, config: &Self::Config) -> Self;
}
