//! Generational snapshots of a population,
//! for inspecting an evolution run after the fact.
use super::{Color, Population, PopulationStats, SpeciesID};

use crate::genome::{Genome, InnovationHistory};

use serde::{Deserialize, Serialize};

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllGenomes,
    /// Clones species and their champions.
    SpeciesChampions,
    /// Clones only the population champion.
    PopulationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A summary of a single species at the time of logging.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub id: SpeciesID,
    pub name: String,
    pub color: Color,
    pub size: usize,
    pub best_fitness: f32,
    pub historical_best_fitness: f32,
    pub time_stagnated: usize,
}

/// A snapshot of a population.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Log<G> {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord<G>,
    pub species_count: usize,
    pub statistics: Option<PopulationStats>,
    pub species: Vec<SpeciesSummary>,
    pub genome_stats: Vec<(String, Stats)>,
}

impl<G> fmt::Display for Log<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Log {{")?;
        writeln!(f, "\tgeneration_number: {:?}", self.generation_number)?;
        writeln!(f, "\tspecies_count: {:?}", self.species_count)?;
        if let Some(stats) = &self.statistics {
            writeln!(
                f,
                "\tfitness: best {:.3}, worst {:.3}, average {:.3}",
                stats.best_fitness, stats.worst_fitness, stats.average_fitness
            )?;
        }
        for s in &self.species {
            writeln!(
                f,
                "\t{} {} ({}): {} members, best {:.3}, stagnated {}",
                s.id, s.name, s.color, s.size, s.best_fitness, s.time_stagnated
            )?;
        }
        for (name, stats) in &self.genome_stats {
            writeln!(f, "\t{}: {:?}", name, stats)?;
        }
        write!(f, "}}")
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    /// An empty sequence yields all zeroes.
    ///
    /// # Examples
    /// ```
    /// use cellvolve::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Stats {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: 0.0,
                minimum: 0.0,
                mean: 0.0,
                median: 0.0,
            };
        }
        data.sort_unstable_by(f32::total_cmp);
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: data[data.len() - 1],
            minimum: data[0],
            mean: data.iter().sum::<f32>() / data.len() as f32,
            median,
        }
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GenerationMemberRecord<G> {
    /// Species IDs and genomes.
    Species(Vec<(SpeciesID, Vec<G>)>),
    /// Only species IDs and species champions.
    SpeciesChampions(Vec<(SpeciesID, G)>),
    /// Only population champion.
    PopulationChampion(G),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvolutionLogger<G> {
    reporting_level: ReportingLevel,
    logs: Vec<Log<G>>,
}

impl<G: Genome> EvolutionLogger<G> {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger<G> {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population.
    ///
    /// The `genome_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    ///
    /// Snapshots are best taken after [`update_statistics`],
    /// so that fitness values are current.
    ///
    /// [`update_statistics`]: crate::Population::update_statistics
    ///
    /// # Examples
    /// ```
    /// use cellvolve::{Genome, Population, PopulationConfig};
    /// use cellvolve::logging::{EvolutionLogger, ReportingLevel};
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
    /// let mut population =
    ///     Population::<_, _, NNGenome>::new(PopulationConfig::default(), GeneticConfig::zero())
    ///         .unwrap();
    ///
    /// population.evaluate_fitness(|_| 2.0).unwrap();
    /// population.update_statistics().unwrap();
    /// logger.log(&population, &|g| [g.fitness()], ["fitness"]);
    ///
    /// let log = logger.iter().next().unwrap();
    /// assert_eq!(log.genome_stats[0].1.mean, 2.0);
    /// ```
    pub fn log<C, H, GSE, const N: usize>(
        &mut self,
        population: &Population<C, H, G>,
        genome_stat_extractor: &GSE,
        stat_names: [&str; N],
    ) where
        H: InnovationHistory<Config = C>,
        G: Genome<InnovationHistory = H, Config = C>,
        GSE: Fn(&G) -> [f32; N],
    {
        let stats: Vec<[f32; N]> = population.genomes().map(genome_stat_extractor).collect();
        let genome_stats = stat_names
            .iter()
            .map(|name| String::from(*name))
            .zip(unzip_n_vecs(stats))
            .map(|(name, data)| (name, Stats::from(data.into_iter())))
            .collect();

        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => GenerationMemberRecord::Species(
                    population
                        .species()
                        .map(|s| (s.id(), s.genomes().cloned().collect()))
                        .collect(),
                ),
                ReportingLevel::SpeciesChampions => GenerationMemberRecord::SpeciesChampions(
                    population
                        .species()
                        .map(|s| (s.id(), s.champion().clone()))
                        .collect(),
                ),
                ReportingLevel::PopulationChampion => {
                    GenerationMemberRecord::PopulationChampion(population.champion().clone())
                }
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            species_count: population.species().count(),
            statistics: population.statistics().copied(),
            species: population
                .species()
                .map(|s| SpeciesSummary {
                    id: s.id(),
                    name: s.name().to_owned(),
                    color: s.color(),
                    size: s.len(),
                    best_fitness: s.best_fitness(),
                    historical_best_fitness: s.historical_best_fitness(),
                    time_stagnated: s.time_stagnated(),
                })
                .collect(),
            genome_stats,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log<G>> {
        self.logs.iter()
    }
}

fn unzip_n_vecs<T, const N: usize>(rows: Vec<[T; N]>) -> Vec<Vec<T>> {
    let mut columns: Vec<Vec<T>> = (0..N).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in rows {
        for (column, item) in columns.iter_mut().zip(row) {
            column.push(item);
        }
    }
    columns
}
