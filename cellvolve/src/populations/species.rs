use super::naming::{self, Color};
use super::EvolutionError;
use crate::Genome;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Species identifier. Specifies
/// the generation in which the species
/// was born, and the count of other species
/// born in the _same generation_ before
/// the one identified (i.e, if it was the
/// third species born in generation 5, it
/// will be species [5, 2]).
///
/// Successor species keep the identifier
/// of the species they descend from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpeciesID(pub usize, pub usize);

impl fmt::Display for SpeciesID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}

/// Fitness statistics of a species' members
/// for the current generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesStats {
    pub best_fitness: f32,
    pub worst_fitness: f32,
    pub average_fitness: f32,
    pub total_fitness: f32,
    /// Index of the best-performing member.
    /// Ties are resolved in favor of the earliest member.
    pub fittest: usize,
}

/// Species are collections of reproductively
/// compatible (within a certain [genetic distance])
/// genomes. Membership is determined by calculating
/// the genetic distance to the _representative_,
/// which is always the species' first member.
///
/// Every epoch a species is replaced by a successor
/// seeded with its champion, unless it has gone
/// [`stagnation_limit`] epochs without holding the
/// population's best fitness.
///
/// [genetic distance]: crate::PopulationConfig::distance_threshold
/// [`stagnation_limit`]: crate::PopulationConfig::stagnation_limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species<G> {
    id: SpeciesID,
    name: String,
    color: Color,
    pub(super) genomes: Vec<G>,
    generation: usize,
    stagnation: usize,
    stagnation_limit: usize,
    historical_best_fitness: f32,
    statistics: Option<SpeciesStats>,
    target_offspring: usize,
}

impl<G: Genome> Species<G> {
    /// Creates a new species with the specified ID,
    /// founded by `founder`, which becomes the species'
    /// representative. A random name and color are
    /// generated for the species.
    ///
    /// # Examples
    /// ```
    /// use cellvolve::{Genome, Species, SpeciesID};
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let species = Species::new(
    ///     SpeciesID(1, 0),
    ///     NNGenome::new(one, one, &GeneticConfig::zero()),
    ///     15,
    ///     &mut rand::thread_rng(),
    /// );
    ///
    /// assert_eq!(species.len(), 1);
    /// ```
    pub fn new<R: Rng + ?Sized>(
        id: SpeciesID,
        founder: G,
        stagnation_limit: usize,
        rng: &mut R,
    ) -> Species<G> {
        Species {
            id,
            name: naming::species_name(rng),
            color: Color::random(rng),
            genomes: vec![founder],
            generation: 0,
            stagnation: 0,
            stagnation_limit,
            historical_best_fitness: 0.0,
            statistics: None,
            target_offspring: 0,
        }
    }

    /// Returns the next generation's instance of this species,
    /// seeded with `elite` as its representative.
    pub(super) fn successor(&self, stagnation: usize, elite: G) -> Species<G> {
        Species {
            id: self.id,
            name: self.name.clone(),
            color: self.color,
            genomes: vec![elite],
            generation: self.generation + 1,
            stagnation,
            stagnation_limit: self.stagnation_limit,
            historical_best_fitness: self.historical_best_fitness,
            statistics: None,
            target_offspring: 0,
        }
    }

    /// Returns the species' ID.
    pub fn id(&self) -> SpeciesID {
        self.id
    }

    /// Returns the species' display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the species' display color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the species' representative,
    /// i.e. its first member.
    pub fn representative(&self) -> &G {
        &self.genomes[0]
    }

    /// Returns the genetic distance between the species'
    /// representative and `other`.
    pub fn genetic_distance(&self, other: &G, config: &G::Config) -> f32 {
        G::genetic_distance(self.representative(), other, config)
    }

    /// Adds a genome to the species.
    ///
    /// # Examples
    /// ```
    /// use cellvolve::{Genome, Species, SpeciesID};
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let config = GeneticConfig::zero();
    /// let founder = NNGenome::new(one, one, &config);
    /// let mut species = Species::new(SpeciesID(1, 0), founder.clone(), 15, &mut rand::thread_rng());
    ///
    /// let mut genome = NNGenome::new(one, one, &config);
    /// genome.set_fitness(3.0);
    /// species.add_genome(genome.clone());
    ///
    /// // The founder remains the representative.
    /// assert_eq!(species.representative(), &founder);
    /// assert!(species.genomes().any(|g| g == &genome));
    /// ```
    pub fn add_genome(&mut self, genome: G) {
        self.genomes.push(genome);
    }

    /// Recomputes the species' best, worst, average and total
    /// fitness from its members, and updates the species'
    /// historical best fitness.
    ///
    /// # Errors
    /// Returns an error if the species is empty, any member
    /// has a negative or non-finite fitness, or the fitness
    /// total overflows.
    pub fn update_statistics(&mut self) -> Result<SpeciesStats, EvolutionError> {
        self.statistics = None;
        let mut members = self.genomes.iter().map(G::fitness).enumerate();
        let (_, first) = members.next().ok_or(EvolutionError::EmptySpecies(self.id))?;
        check_fitness(self.id, 0, first)?;

        let mut stats = SpeciesStats {
            best_fitness: first,
            worst_fitness: first,
            average_fitness: 0.0,
            total_fitness: first,
            fittest: 0,
        };
        for (index, fitness) in members {
            check_fitness(self.id, index, fitness)?;
            if fitness > stats.best_fitness {
                stats.best_fitness = fitness;
                stats.fittest = index;
            }
            stats.worst_fitness = stats.worst_fitness.min(fitness);
            stats.total_fitness += fitness;
        }
        if !stats.total_fitness.is_finite() {
            return Err(EvolutionError::SpeciesFitnessOverflow(self.id));
        }
        stats.average_fitness = stats.total_fitness / self.genomes.len() as f32;

        self.historical_best_fitness = self.historical_best_fitness.max(stats.best_fitness);
        self.statistics = Some(stats);
        Ok(stats)
    }

    /// Clears the current generation's statistics.
    pub(super) fn reset_statistics(&mut self) {
        self.statistics = None;
    }

    /// Returns the current generation's statistics,
    /// or `None` if they haven't been computed since
    /// the species was created.
    pub fn statistics(&self) -> Option<&SpeciesStats> {
        self.statistics.as_ref()
    }

    /// Returns the current generation's best fitness,
    /// or 0 if statistics haven't been computed.
    pub fn best_fitness(&self) -> f32 {
        self.statistics.map_or(0.0, |s| s.best_fitness)
    }

    /// Returns the best fitness reached by any
    /// generation of this species.
    pub fn historical_best_fitness(&self) -> f32 {
        self.historical_best_fitness
    }

    /// Selects a member with probability proportional to its
    /// fitness. If all members have a fitness of 0, a member
    /// is chosen uniformly at random.
    ///
    /// # Examples
    /// ```
    /// use cellvolve::{Genome, Species, SpeciesID};
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let config = GeneticConfig::zero();
    /// let mut rng = rand::thread_rng();
    ///
    /// let mut species = Species::new(SpeciesID(0, 0), NNGenome::new(one, one, &config), 15, &mut rng);
    /// let mut fit = NNGenome::new(one, one, &config);
    /// fit.set_fitness(10.0);
    /// species.add_genome(fit);
    ///
    /// // The founder has no fitness, so it can never be selected.
    /// for _ in 0..100 {
    ///     assert_eq!(species.roulette(&mut rng).fitness(), 10.0);
    /// }
    /// ```
    pub fn roulette<R: Rng + ?Sized>(&self, rng: &mut R) -> &G {
        // Summed in f64 so that large f32 fitnesses can't overflow.
        let total: f64 = self.genomes.iter().map(|g| g.fitness() as f64).sum();
        if total > 0.0 && total.is_finite() {
            let slice = rng.gen_range(0.0..total);
            let mut accumulated = 0.0;
            for genome in &self.genomes {
                accumulated += genome.fitness() as f64;
                if accumulated > slice {
                    return genome;
                }
            }
            // Rounding may leave the slice just past the last
            // accumulated value; fall back to the last fit member.
            if let Some(genome) = self.genomes.iter().rev().find(|g| g.fitness() > 0.0) {
                return genome;
            }
        }
        self.genomes
            .choose(rng)
            .unwrap_or_else(|| panic!("empty species {} has no members to select", self.id))
    }

    /// Returns the currently best-performing genome.
    /// Uses the computed statistics if available.
    pub fn champion(&self) -> &G {
        match self.statistics {
            Some(stats) => &self.genomes[stats.fittest],
            None => self
                .genomes
                .iter()
                .reduce(|best, g| if g.fitness() > best.fitness() { g } else { best })
                .expect("empty species has no champion"),
        }
    }

    /// Returns the number of generations this
    /// species' lineage has lived through.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the number of epochs the species has
    /// gone without producing the population champion.
    pub fn time_stagnated(&self) -> usize {
        self.stagnation
    }

    /// Returns the number of stagnated epochs
    /// after which the species goes extinct.
    pub fn stagnation_limit(&self) -> usize {
        self.stagnation_limit
    }

    /// Returns the number of offspring (excluding the elite)
    /// allotted to the species in the epoch that created it.
    pub fn target_offspring(&self) -> usize {
        self.target_offspring
    }

    pub(super) fn set_target_offspring(&mut self, target: usize) {
        self.target_offspring = target;
    }

    #[cfg(test)]
    pub(super) fn set_stagnation(&mut self, stagnation: usize) {
        self.stagnation = stagnation;
    }

    /// Returns an iterator over the species' members.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.genomes.iter()
    }

    /// Returns the number of members in the species.
    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    /// Returns `true` if the species has no members,
    /// which never holds for species in a population.
    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }
}

pub(super) fn check_fitness(
    species: SpeciesID,
    index: usize,
    fitness: f32,
) -> Result<(), EvolutionError> {
    if fitness.is_finite() && fitness >= 0.0 {
        Ok(())
    } else {
        Err(EvolutionError::InvalidFitness {
            species,
            index,
            fitness,
        })
    }
}
