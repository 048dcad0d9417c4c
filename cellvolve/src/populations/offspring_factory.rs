use super::*;

use log::debug;

/// Auxiliary type for offspring generation.
/// Builds the next generation's species from the
/// previous generation's, placing every child into
/// the first species whose representative is
/// compatible with it.
pub(super) struct OffspringFactory<'a, G: Genome> {
    previous: &'a [Species<G>],
    history: &'a mut G::InnovationHistory,
    genetic_config: &'a G::Config,
    population_config: &'a PopulationConfig,
    generation: usize,
    next_generation: Vec<Species<G>>,
    placed: usize,
    spawned: usize,
}

impl<'a, G: Genome> OffspringFactory<'a, G> {
    pub(super) fn new(
        previous: &'a [Species<G>],
        history: &'a mut G::InnovationHistory,
        genetic_config: &'a G::Config,
        population_config: &'a PopulationConfig,
        generation: usize,
    ) -> OffspringFactory<'a, G> {
        OffspringFactory {
            previous,
            history,
            genetic_config,
            population_config,
            generation,
            next_generation: Vec::with_capacity(previous.len()),
            placed: 0,
            spawned: 0,
        }
    }

    /// Generates the next generation's species.
    ///
    /// Surviving species contribute their champion and their
    /// proportionally allotted offspring. Children are capped so
    /// that every surviving champion keeps a place; only when
    /// there are more surviving species than places are the
    /// later ones dropped, elite included. Any shortfall is then
    /// made up with offspring of randomly chosen species of the
    /// previous generation, extinct ones included.
    pub(super) fn generate_offspring<R: Rng + ?Sized>(
        mut self,
        statistics: &PopulationStats,
        rng: &mut R,
    ) -> Vec<Species<G>> {
        let size = self.population_config.size.get();

        let mut survivors = Vec::with_capacity(self.previous.len());
        for parent in self.previous {
            let mut stagnation = parent.time_stagnated();
            if parent.best_fitness() >= statistics.best_fitness {
                stagnation = 0;
            }
            if stagnation >= parent.stagnation_limit() {
                debug!(
                    "Species {} ({}) went extinct after {} stagnated epochs.",
                    parent.id(),
                    parent.name(),
                    stagnation
                );
                continue;
            }
            survivors.push((parent, stagnation + 1));
        }

        // One place is held back for every surviving elite
        // not yet seeded, so that children never crowd them out.
        let mut reserved = survivors.len();
        for (parent, stagnation) in survivors {
            reserved -= 1;
            if self.placed >= size {
                debug!(
                    "No room left for species {} ({}) in generation {}; it goes extinct.",
                    parent.id(),
                    parent.name(),
                    self.generation + 1
                );
                continue;
            }

            let target = allotted_offspring(
                parent.best_fitness(),
                statistics.total_best_fitness,
                self.population_config,
            );
            let mut elite = parent.champion().clone();
            elite.set_fitness(0.0);
            let mut successor = parent.successor(stagnation, elite);
            successor.set_target_offspring(target);
            self.next_generation.push(successor);
            self.placed += 1;

            let offspring = target.min(size.saturating_sub(self.placed + reserved));
            debug!(
                "Species {} ({}) allotted {} offspring, producing {}.",
                parent.id(),
                parent.name(),
                target,
                offspring
            );
            for _ in 0..offspring {
                let child = self.mate_within(parent, rng);
                self.place(child, rng);
            }
        }

        if self.placed < size {
            debug!(
                "Filling {} remaining places in generation {}.",
                size - self.placed,
                self.generation + 1
            );
        }
        while self.placed < size {
            let parent = match self.previous.choose(rng) {
                Some(parent) => parent,
                None => break,
            };
            let child = self.mate_within(parent, rng);
            self.place(child, rng);
        }

        self.next_generation
    }

    /// Selects two parents from `species` independently by
    /// roulette, and mates copies of them.
    fn mate_within<R: Rng + ?Sized>(&mut self, species: &Species<G>, rng: &mut R) -> G {
        let mother = species.roulette(rng).clone();
        let father = species.roulette(rng).clone();
        G::mate(&mother, &father, self.history, self.genetic_config)
    }

    /// Assigns a genome to the first species in the next
    /// generation whose representative is within the distance
    /// threshold, or to a new species if none is.
    fn place<R: Rng + ?Sized>(&mut self, genome: G, rng: &mut R) {
        self.placed += 1;
        let id = SpeciesID(self.generation + 1, self.spawned);
        if speciate(
            &mut self.next_generation,
            genome,
            id,
            self.genetic_config,
            self.population_config,
            rng,
        ) {
            self.spawned += 1;
        }
    }
}

/// Returns the number of offspring allotted to a species,
/// excluding its elite: its share of the best fitness total,
/// applied to the proportional share of the population.
///
/// Halfway cases are rounded to the nearest even number.
/// A zero total allots no offspring.
pub(super) fn allotted_offspring(
    best_fitness: f32,
    total_best_fitness: f32,
    config: &PopulationConfig,
) -> usize {
    if total_best_fitness <= 0.0 {
        return 0;
    }
    let share = best_fitness / total_best_fitness
        * config.size.get() as f32
        * config.proportional_share;
    share.round_ties_even().max(0.0) as usize
}
