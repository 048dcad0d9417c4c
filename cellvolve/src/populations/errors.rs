use super::SpeciesID;

use thiserror::Error;

/// An error type indicating an invalid [`PopulationConfig`].
///
/// [`PopulationConfig`]: crate::PopulationConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("distance threshold must be finite and non-negative, got {0}")]
    DistanceThreshold(f32),
    #[error("proportional share must be within [0, 1], got {0}")]
    ProportionalShare(f32),
}

/// An error type indicating the population can't
/// be aggregated or evolved in its current state.
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// A genome's fitness was negative, NaN or infinite.
    #[error("genome {index} of species {species} has invalid fitness {fitness}")]
    InvalidFitness {
        species: SpeciesID,
        index: usize,
        fitness: f32,
    },
    /// A species' fitness total is too large to represent.
    #[error("fitness total of species {0} overflows")]
    SpeciesFitnessOverflow(SpeciesID),
    /// The sum of the species' best fitnesses is too large to represent.
    #[error("total of species best fitnesses overflows")]
    PopulationFitnessOverflow,
    /// A species was found with no members.
    #[error("species {0} has no members")]
    EmptySpecies(SpeciesID),
    /// Evolution was attempted without aggregating
    /// the current generation's statistics first.
    #[error("attempted evolution before updating population statistics")]
    StaleStatistics,
}
