//! A Population is a collection of genomes.
//! These are grouped into species, which can
//! be evolved using externally assigned fitness
//! scores as the source of selective pressure.
mod config;
mod errors;
pub mod logging;
mod naming;
mod offspring_factory;
mod species;
#[cfg(test)]
mod test_genome;

use crate::{Genome, InnovationHistory};
pub use config::PopulationConfig;
pub use errors::{ConfigError, EvolutionError};
pub use naming::Color;
use offspring_factory::OffspringFactory;
pub use species::{Species, SpeciesID, SpeciesStats};

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Population-level fitness statistics,
/// aggregated over the species' best fitnesses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Highest species best fitness.
    pub best_fitness: f32,
    /// Lowest species best fitness.
    pub worst_fitness: f32,
    /// Mean of the species' best fitnesses.
    pub average_fitness: f32,
    /// Sum of the species' best fitnesses.
    pub total_best_fitness: f32,
    /// Index of the species holding the best fitness.
    /// Ties are resolved in favor of the earliest species.
    pub fittest_species: usize,
}

/// A population of genomes.
#[derive(Serialize, Deserialize)]
pub struct Population<C, H, G> {
    species: Vec<Species<G>>,
    history: H,
    generation: usize,
    statistics: Option<PopulationStats>,
    population_config: PopulationConfig,
    genetic_config: C,
}

impl<C, H, G> Population<C, H, G>
where
    H: InnovationHistory<Config = C>,
    G: Genome<InnovationHistory = H, Config = C>,
{
    /// Creates a new population using the passed configurations.
    ///
    /// Genomes are speciated as they are created: each joins
    /// the first species whose representative is closer than
    /// the [distance threshold], or founds a new species.
    ///
    /// The type of `genetic_config` depends on the implementation
    /// of [`Genome`], and is effectively opaque to the population.
    ///
    /// # Errors
    /// Returns an error if the population configuration is invalid.
    ///
    /// [distance threshold]: PopulationConfig::distance_threshold
    /// [`Genome`]: crate::Genome
    ///
    /// # Examples
    /// ```
    /// use cellvolve::{Population, PopulationConfig};
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    /// use std::num::NonZeroUsize;
    ///
    /// let population = Population::<_, _, NNGenome>::new(
    ///     PopulationConfig {
    ///         size: NonZeroUsize::new(10).unwrap(),
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::zero(),
    /// )
    /// .unwrap();
    ///
    /// // Unconnected genomes are all identical, so they share a species.
    /// assert_eq!(population.species().count(), 1);
    /// assert_eq!(population.genomes().count(), 10);
    /// ```
    pub fn new(
        population_config: PopulationConfig,
        genetic_config: C,
    ) -> Result<Population<C, H, G>, ConfigError> {
        Self::new_with(population_config, genetic_config, &mut rand::thread_rng())
    }

    /// Creates a new population as in [`new`], drawing
    /// species names and colors from `rng`.
    ///
    /// [`new`]: Population::new
    pub fn new_with<R: Rng + ?Sized>(
        population_config: PopulationConfig,
        genetic_config: C,
        rng: &mut R,
    ) -> Result<Population<C, H, G>, ConfigError> {
        population_config.validate()?;
        let (inputs, outputs) = (population_config.input_count, population_config.output_count);

        Ok(Population {
            species: initial_species(&population_config, &genetic_config, rng),
            history: H::new(inputs, outputs, &genetic_config),
            generation: 0,
            statistics: None,
            population_config,
            genetic_config,
        })
    }

    /// Evaluates the fitness of each genome in the
    /// population using the passed evaluator, and
    /// invalidates the current statistics.
    ///
    /// # Errors
    /// Returns an error, leaving the remaining genomes
    /// untouched, if the evaluator returns a negative
    /// or non-finite value.
    ///
    /// # Examples
    /// ```
    /// use cellvolve::{Genome, Population, PopulationConfig};
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut population =
    ///     Population::<_, _, NNGenome>::new(PopulationConfig::default(), GeneticConfig::zero())
    ///         .unwrap();
    ///
    /// population.evaluate_fitness(|g| g.genes().count() as f32 + 1.0).unwrap();
    /// assert!(population.genomes().all(|g| g.fitness() == 1.0));
    ///
    /// assert!(population.evaluate_fitness(|_| -1.0).is_err());
    /// ```
    pub fn evaluate_fitness<E>(&mut self, mut evaluator: E) -> Result<(), EvolutionError>
    where
        E: FnMut(&G) -> f32,
    {
        self.statistics = None;
        for species in &mut self.species {
            let id = species.id();
            for (index, genome) in species.genomes.iter_mut().enumerate() {
                let fitness = evaluator(genome);
                species::check_fitness(id, index, fitness)?;
                genome.set_fitness(fitness);
            }
        }
        Ok(())
    }

    /// Recomputes every species' statistics, then aggregates
    /// them into the population's statistics. Population
    /// statistics are computed over the species' _best_
    /// fitnesses: the average is that of the species champions.
    ///
    /// Must be called after fitness assignment and before
    /// [`evolve`].
    ///
    /// # Errors
    /// Returns an error if any genome has an invalid fitness,
    /// an empty species is found, or a fitness total overflows.
    ///
    /// [`evolve`]: Population::evolve
    pub fn update_statistics(&mut self) -> Result<PopulationStats, EvolutionError> {
        self.statistics = None;
        let mut aggregate: Option<PopulationStats> = None;
        for (index, species) in self.species.iter_mut().enumerate() {
            let best = species.update_statistics()?.best_fitness;
            aggregate = Some(match aggregate {
                None => PopulationStats {
                    best_fitness: best,
                    worst_fitness: best,
                    average_fitness: 0.0,
                    total_best_fitness: best,
                    fittest_species: index,
                },
                Some(mut stats) => {
                    if best > stats.best_fitness {
                        stats.best_fitness = best;
                        stats.fittest_species = index;
                    }
                    stats.worst_fitness = stats.worst_fitness.min(best);
                    stats.total_best_fitness += best;
                    stats
                }
            });
        }

        let mut stats = aggregate.ok_or(EvolutionError::EmptySpecies(SpeciesID(
            self.generation,
            0,
        )))?;
        if !stats.total_best_fitness.is_finite() {
            return Err(EvolutionError::PopulationFitnessOverflow);
        }
        stats.average_fitness = stats.total_best_fitness / self.species.len() as f32;
        self.statistics = Some(stats);
        Ok(stats)
    }

    /// Advances the population by one generation.
    ///
    /// Each species whose stagnation is below its limit is
    /// succeeded by a new species seeded with its champion
    /// (with fitness reset to 0) and its allotted offspring.
    /// Species holding the best fitness have their stagnation
    /// reset. Offspring are mated from roulette-selected
    /// parents, and placed into the first compatible species.
    /// Remaining places are filled with offspring of random
    /// species of the previous generation.
    ///
    /// The new species replace the old ones only once the
    /// whole generation has been built.
    ///
    /// # Errors
    /// Returns [`EvolutionError::StaleStatistics`] if
    /// [`update_statistics`] hasn't been called since the
    /// last fitness assignment or epoch.
    ///
    /// [`update_statistics`]: Population::update_statistics
    ///
    /// # Examples
    /// ```
    /// use cellvolve::{Population, PopulationConfig};
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut population =
    ///     Population::<_, _, NNGenome>::new(PopulationConfig::default(), GeneticConfig::zero())
    ///         .unwrap();
    ///
    /// population.evaluate_fitness(|_| 1.0).unwrap();
    /// assert!(population.evolve().is_err());
    ///
    /// population.update_statistics().unwrap();
    /// population.evolve().unwrap();
    /// assert_eq!(population.generation(), 1);
    /// assert_eq!(population.genomes().count(), 150);
    /// ```
    pub fn evolve(&mut self) -> Result<(), EvolutionError> {
        self.evolve_with(&mut rand::thread_rng())
    }

    /// Advances the population as in [`evolve`], drawing
    /// parent selections and species metadata from `rng`.
    ///
    /// [`evolve`]: Population::evolve
    pub fn evolve_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), EvolutionError> {
        let statistics = self.statistics.ok_or(EvolutionError::StaleStatistics)?;
        if statistics.total_best_fitness <= 0.0 {
            warn!(
                "Generation {} has no fitness; offspring are allotted at random.",
                self.generation
            );
        }

        let mut next_generation = OffspringFactory::new(
            &self.species,
            &mut self.history,
            &self.genetic_config,
            &self.population_config,
            self.generation,
        )
        .generate_offspring(&statistics, rng);

        next_generation.iter_mut().for_each(Species::reset_statistics);
        debug_assert_eq!(
            next_generation.iter().map(Species::len).sum::<usize>(),
            self.population_config.size.get()
        );

        info!(
            "Generation {}: best fitness {:.3}, average {:.3}, {} -> {} species.",
            self.generation,
            statistics.best_fitness,
            statistics.average_fitness,
            self.species.len(),
            next_generation.len()
        );

        self.species = next_generation;
        self.statistics = None;
        self.generation += 1;
        Ok(())
    }

    /// Resets the population to an initial randomized state.
    ///
    /// # Examples
    /// ```
    /// use cellvolve::{Population, PopulationConfig};
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut population =
    ///     Population::<_, _, NNGenome>::new(PopulationConfig::default(), GeneticConfig::zero())
    ///         .unwrap();
    ///
    /// population.update_statistics().unwrap();
    /// population.evolve().unwrap();
    /// population.reset();
    ///
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn reset(&mut self) {
        let inputs = self.population_config.input_count;
        let outputs = self.population_config.output_count;
        self.species = initial_species(
            &self.population_config,
            &self.genetic_config,
            &mut rand::thread_rng(),
        );
        self.history = H::new(inputs, outputs, &self.genetic_config);
        self.generation = 0;
        self.statistics = None;
    }

    /// Returns the currently best-performing genome.
    /// Ties are resolved in favor of the earliest genome.
    pub fn champion(&self) -> &G {
        self.genomes()
            .reduce(|best, g| if g.fitness() > best.fitness() { g } else { best })
            .expect("empty population has no champion")
    }

    /// Returns an iterator over all current genomes.
    pub fn genomes(&self) -> impl Iterator<Item = &G> {
        self.species.iter().flat_map(|s| &s.genomes)
    }

    /// Returns an iterator over all current species.
    pub fn species(&self) -> impl Iterator<Item = &Species<G>> {
        self.species.iter()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the statistics of the last aggregation,
    /// or `None` if they have been invalidated since.
    pub fn statistics(&self) -> Option<&PopulationStats> {
        self.statistics.as_ref()
    }

    /// Returns the population's innovation history.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Returns the population's configuration.
    pub fn config(&self) -> &PopulationConfig {
        &self.population_config
    }

    /// Returns the configuration passed on to genomes.
    pub fn genetic_config(&self) -> &C {
        &self.genetic_config
    }
}

/// Creates a population's worth of new genomes, speciating
/// each against the species created before it.
fn initial_species<G: Genome, R: Rng + ?Sized>(
    population_config: &PopulationConfig,
    genetic_config: &G::Config,
    rng: &mut R,
) -> Vec<Species<G>> {
    let (inputs, outputs) = (population_config.input_count, population_config.output_count);
    let mut species = vec![Species::new(
        SpeciesID(0, 0),
        G::new(inputs, outputs, genetic_config),
        population_config.stagnation_limit.get(),
        rng,
    )];
    for _ in 1..population_config.size.get() {
        let genome = G::new(inputs, outputs, genetic_config);
        let id = SpeciesID(0, species.len());
        speciate(&mut species, genome, id, genetic_config, population_config, rng);
    }
    species
}

/// Assigns a genome to the first species whose representative
/// is closer than the distance threshold, or founds a new species
/// with ID `new_species_id`. Returns whether a species was founded.
fn speciate<G: Genome, R: Rng + ?Sized>(
    species: &mut Vec<Species<G>>,
    genome: G,
    new_species_id: SpeciesID,
    genetic_config: &G::Config,
    population_config: &PopulationConfig,
    rng: &mut R,
) -> bool {
    for s in species.iter_mut() {
        if s.genetic_distance(&genome, genetic_config) < population_config.distance_threshold {
            s.add_genome(genome);
            return false;
        }
    }
    species.push(Species::new(
        new_species_id,
        genome,
        population_config.stagnation_limit.get(),
        rng,
    ));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_genome::{TestConfig, TestGenome, TestHistory};

    use rand::{rngs::StdRng, SeedableRng};
    use std::num::NonZeroUsize;

    type TestPopulation = Population<TestConfig, TestHistory, TestGenome>;

    fn population_config(size: usize) -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(size).unwrap(),
            distance_threshold: 1.0,
            stagnation_limit: NonZeroUsize::new(3).unwrap(),
            ..PopulationConfig::default()
        }
    }

    fn population(size: usize, config: TestConfig, rng: &mut StdRng) -> TestPopulation {
        Population::new_with(population_config(size), config, rng).unwrap()
    }

    /// Replaces the population's species with one species per
    /// group of member fitnesses, placed far enough apart to
    /// never be compatible.
    fn set_species(population: &mut TestPopulation, groups: &[&[f32]], rng: &mut StdRng) {
        population.species = groups
            .iter()
            .enumerate()
            .map(|(i, fitnesses)| {
                let mut members = fitnesses.iter().enumerate().map(|(tag, f)| {
                    let mut g = TestGenome::at(i as f32 * 100.0);
                    g.tag = tag;
                    g.set_fitness(*f);
                    g
                });
                let mut s = Species::new(SpeciesID(0, i), members.next().unwrap(), 3, rng);
                members.for_each(|g| s.add_genome(g));
                s
            })
            .collect();
    }

    fn member_count(population: &TestPopulation) -> usize {
        population.species().map(Species::len).sum()
    }

    #[test]
    fn new_single_species() {
        let mut rng = StdRng::seed_from_u64(0);
        let population = population(10, TestConfig::default(), &mut rng);
        assert_eq!(population.species().count(), 1);
        assert_eq!(population.species().next().unwrap().len(), 10);
        assert_eq!(population.generation(), 0);
        assert!(population.statistics().is_none());
        assert_eq!(population.history().shape, (1, 1));
    }

    #[test]
    fn new_speciates_by_representative() {
        let mut rng = StdRng::seed_from_u64(0);
        for size in 1..40 {
            let population = population(size, TestConfig { spread: 5.0, drift: 0.0 }, &mut rng);
            assert_eq!(member_count(&population), size);
            assert!(population.species().all(|s| !s.is_empty()));
            for s in population.species() {
                let representative = s.representative().position;
                assert!(s.genomes().all(|g| (g.position - representative).abs() < 1.0));
            }
            for (i, s) in population.species().enumerate() {
                assert_eq!(s.id(), SpeciesID(0, i));
            }
        }
    }

    #[test]
    fn new_rejects_invalid_config() {
        let result = TestPopulation::new(
            PopulationConfig {
                proportional_share: 2.0,
                ..PopulationConfig::default()
            },
            TestConfig::default(),
        );
        assert!(matches!(result, Err(ConfigError::ProportionalShare(_))));
    }

    #[test]
    fn statistics_of_species_champions() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut population = population(8, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[1.0, 4.0], &[9.0, 2.0, 9.0], &[3.0, 0.0, 3.0]], &mut rng);

        let stats = population.update_statistics().unwrap();
        assert_eq!(stats.best_fitness, 9.0);
        assert_eq!(stats.worst_fitness, 3.0);
        assert_eq!(stats.total_best_fitness, 16.0);
        assert_eq!(stats.average_fitness, 16.0 / 3.0);
        assert_eq!(stats.fittest_species, 1);
        assert_eq!(population.statistics(), Some(&stats));
    }

    #[test]
    fn statistics_ties_keep_earliest_species() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut population = population(4, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[5.0, 1.0], &[5.0, 5.0]], &mut rng);
        assert_eq!(population.update_statistics().unwrap().fittest_species, 0);
    }

    #[test]
    fn evaluate_fitness_rejects_invalid_values() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut population = population(5, TestConfig::default(), &mut rng);
        assert!(matches!(
            population.evaluate_fitness(|_| f32::NAN),
            Err(EvolutionError::InvalidFitness { index: 0, .. })
        ));
        population.evaluate_fitness(|_| 2.0).unwrap();
        population.update_statistics().unwrap();
        population.evaluate_fitness(|_| 3.0).unwrap();
        assert!(population.statistics().is_none());
    }

    #[test]
    fn evolve_requires_statistics() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut population = population(5, TestConfig::default(), &mut rng);
        assert!(matches!(
            population.evolve_with(&mut rng),
            Err(EvolutionError::StaleStatistics)
        ));
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();
        assert!(matches!(
            population.evolve_with(&mut rng),
            Err(EvolutionError::StaleStatistics)
        ));
    }

    #[test]
    fn evolve_keeps_population_size() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = TestConfig { spread: 4.0, drift: 0.8 };
        let mut population = population(30, config, &mut rng);
        for generation in 0..50 {
            population
                .evaluate_fitness(|g| (10.0 - g.position.abs()).max(0.0))
                .unwrap();
            population.update_statistics().unwrap();
            population.evolve_with(&mut rng).unwrap();

            assert_eq!(population.generation(), generation + 1);
            assert_eq!(member_count(&population), 30);
            assert!(population.species().all(|s| !s.is_empty()));
            assert!(population.statistics().is_none());
            assert!(population.species().all(|s| s.statistics().is_none()));
        }
        assert!(population.history().matings > 0);
    }

    #[test]
    fn evolve_with_zero_fitness() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut population = population(12, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[0.0, 0.0], &[0.0; 10]], &mut rng);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        assert_eq!(member_count(&population), 40);
        assert!(population.species().all(|s| s.target_offspring() == 0));
        assert!(population.species().all(|s| s.id() != SpeciesID(0, 1)));
    }

    #[test]
    fn evolve_allots_proportionally() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut population = population(20, TestConfig::default(), &mut rng);
        let mut a = vec![30.0];
        a.extend([1.0; 9]);
        let mut b = vec![10.0];
        b.extend([1.0; 9]);
        set_species(&mut population, &[&a[..], &b[..]], &mut rng);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        let species: Vec<_> = population.species().collect();
        assert_eq!(species.len(), 2);
        assert_eq!(species[0].id(), SpeciesID(0, 0));
        assert_eq!(species[0].target_offspring(), 11);
        assert_eq!(species[1].id(), SpeciesID(0, 1));
        assert_eq!(species[1].target_offspring(), 4);
        assert_eq!(member_count(&population), 20);
    }

    #[test]
    fn evolve_carries_elites() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut population = population(6, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[1.0, 7.0, 3.0], &[2.0, 5.0, 5.0]], &mut rng);
        population.update_statistics().unwrap();
        let elites: Vec<TestGenome> = population.species().map(|s| s.champion().clone()).collect();
        let names: Vec<String> = population.species().map(|s| s.name().to_owned()).collect();
        population.evolve_with(&mut rng).unwrap();

        for ((species, elite), name) in population.species().zip(&elites).zip(&names) {
            let representative = species.representative();
            assert_eq!(representative.position, elite.position);
            assert_eq!(representative.tag, elite.tag);
            assert_eq!(representative.fitness(), 0.0);
            assert_eq!(species.name(), name);
            assert_eq!(species.generation(), 1);
        }
        assert_eq!(elites[0].tag, 1);
        // The second species' champion is its earliest best member.
        assert_eq!(elites[1].tag, 1);
    }

    #[test]
    fn stagnation_is_reset_then_incremented() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut population = population(4, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[5.0, 1.0], &[2.0, 1.0]], &mut rng);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        let species: Vec<_> = population.species().collect();
        assert_eq!(species[0].time_stagnated(), 1);
        assert_eq!(species[1].time_stagnated(), 1);
    }

    #[test]
    fn stagnated_species_go_extinct() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut population = population(20, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[9.0; 10], &[1.0; 10]], &mut rng);

        // The weaker species survives until its stagnation reaches the limit of 3,
        // and is dropped by the following epoch.
        for epoch in 0..=3 {
            let weak = population
                .species()
                .find(|s| s.id() == SpeciesID(0, 1))
                .map(Species::time_stagnated);
            assert_eq!(weak, Some(epoch));
            population
                .evaluate_fitness(|g| if g.position < 50.0 { 9.0 } else { 1.0 })
                .unwrap();
            population.update_statistics().unwrap();
            population.evolve_with(&mut rng).unwrap();
            assert_eq!(member_count(&population), 20);
        }
        assert!(population.species().all(|s| s.id() != SpeciesID(0, 1)));
    }

    #[test]
    fn species_at_limit_contributes_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut population = population(10, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[4.0; 5], &[1.0; 5]], &mut rng);
        population.species[1].set_stagnation(3);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        assert!(population.species().all(|s| s.id() != SpeciesID(0, 1)));
        assert_eq!(member_count(&population), 10);
    }

    #[test]
    fn champion_species_escapes_extinction() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut population = population(10, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[4.0; 5], &[1.0; 5]], &mut rng);
        population.species[0].set_stagnation(3);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        let champion = population.species().find(|s| s.id() == SpeciesID(0, 0)).unwrap();
        assert_eq!(champion.time_stagnated(), 1);
    }

    #[test]
    fn new_species_are_numbered_by_generation() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = TestConfig { spread: 0.0, drift: 10.0 };
        let mut population = population(5, config, &mut rng);
        population.evaluate_fitness(|_| 1.0).unwrap();
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        let ids: Vec<_> = population.species().map(Species::id).collect();
        assert_eq!(ids[0], SpeciesID(0, 0));
        for (i, id) in ids[1..].iter().enumerate() {
            assert_eq!(*id, SpeciesID(1, i));
        }
    }

    #[test]
    fn crowded_generation_keeps_every_elite() {
        // Ten incompatible species of equal fitness are each
        // allotted one offspring, which would overfill a population
        // of ten; their elites take precedence.
        let mut rng = StdRng::seed_from_u64(10);
        let mut population = population(10, TestConfig::default(), &mut rng);
        let groups = vec![&[1.0f32][..]; 10];
        set_species(&mut population, &groups, &mut rng);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        assert_eq!(member_count(&population), 10);
        let ids: Vec<_> = population.species().map(Species::id).collect();
        assert_eq!(ids, (0..10).map(|i| SpeciesID(0, i)).collect::<Vec<_>>());
        assert!(population.species().all(|s| s.target_offspring() == 1 && s.len() == 1));
    }

    #[test]
    fn more_species_than_places() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut population = population(4, TestConfig::default(), &mut rng);
        let groups = vec![&[1.0f32][..]; 6];
        set_species(&mut population, &groups, &mut rng);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        assert_eq!(member_count(&population), 4);
        let ids: Vec<_> = population.species().map(Species::id).collect();
        assert_eq!(ids, (0..4).map(|i| SpeciesID(0, i)).collect::<Vec<_>>());
    }

    #[test]
    fn make_up_offspring_come_from_extinct_species_too() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut population = Population::new_with(
            PopulationConfig {
                proportional_share: 0.0,
                ..population_config(40)
            },
            TestConfig::default(),
            &mut rng,
        )
        .unwrap();
        set_species(&mut population, &[&[5.0; 6], &[1.0; 6]], &mut rng);
        population.species[1].set_stagnation(3);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();

        assert_eq!(member_count(&population), 40);
        assert!(population.species().all(|s| s.target_offspring() == 0));
        assert!(population.species().all(|s| s.id() != SpeciesID(0, 1)));
        // Children of the extinct species sit at its position, and
        // found a new species there.
        let descendants = population
            .species()
            .find(|s| s.representative().position == 100.0)
            .unwrap();
        assert_eq!(descendants.id().0, 1);
        assert!(descendants.genomes().all(|g| g.tag == usize::MAX));
    }

    #[test]
    fn statistics_reject_overflowing_total() {
        let mut rng = StdRng::seed_from_u64(15);
        let mut population = population(2, TestConfig::default(), &mut rng);
        set_species(&mut population, &[&[f32::MAX], &[f32::MAX]], &mut rng);
        assert!(matches!(
            population.update_statistics(),
            Err(EvolutionError::PopulationFitnessOverflow)
        ));
        assert!(matches!(
            population.evolve_with(&mut rng),
            Err(EvolutionError::StaleStatistics)
        ));
    }

    #[test]
    fn serializes() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut population = population(6, TestConfig { spread: 3.0, drift: 0.0 }, &mut rng);
        population.evaluate_fitness(|g| g.position).unwrap();
        population.update_statistics().unwrap();

        let json = serde_json::to_string(&population).unwrap();
        let restored: TestPopulation = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.generation(), population.generation());
        assert_eq!(restored.statistics(), population.statistics());
        assert_eq!(
            restored.genomes().collect::<Vec<_>>(),
            population.genomes().collect::<Vec<_>>()
        );
    }

    #[test]
    fn reset() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut population = population(7, TestConfig::default(), &mut rng);
        population.update_statistics().unwrap();
        population.evolve_with(&mut rng).unwrap();
        population.reset();
        assert_eq!(population.generation(), 0);
        assert_eq!(member_count(&population), 7);
        assert_eq!(population.history().matings, 0);
    }
}
