use cellvolve::logging::{EvolutionLogger, ReportingLevel, Stats};
use cellvolve::{EvolutionError, Genome, Population, PopulationConfig};
use cellvolve_nn::genomics::{ActivationType, GeneticConfig, History, NNGenome};
use cellvolve_nn::networks::Network;

use log::{error, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use std::error::Error;
use std::num::NonZeroUsize;
use std::{env, fs};

type XorPopulation = Population<GeneticConfig, History, NNGenome>;

const ERROR_MARGIN: f32 = 0.3;
const SOLVED_FITNESS: f32 = 16.0;

/// Experiment settings, loadable from a RON file
/// passed as the first command line argument.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct Experiment {
    population: PopulationConfig,
    genetic: GeneticConfig,
    runs: usize,
    max_generations: usize,
}

impl Default for Experiment {
    fn default() -> Experiment {
        Experiment {
            population: PopulationConfig {
                size: NonZeroUsize::new(150).unwrap(),
                input_count: NonZeroUsize::new(3).unwrap(),
                output_count: NonZeroUsize::new(1).unwrap(),
                distance_threshold: 3.0,
                ..PopulationConfig::default()
            },
            genetic: GeneticConfig {
                activation_types: vec![ActivationType::Sigmoid],
                output_activation_types: vec![ActivationType::Sigmoid],
                child_mutation_chance: 0.65,
                mate_by_averaging_chance: 0.4,
                suppression_reset_chance: 1.0,
                initial_expression_chance: 1.0,
                weight_bound: 5.0,
                weight_reset_chance: 0.2,
                weight_nudge_chance: 0.9,
                weight_mutation_power: 2.5,
                node_addition_mutation_chance: 0.03,
                gene_addition_mutation_chance: 0.05,
                max_gene_addition_mutation_attempts: 20,
                recursion_chance: 0.0,
                excess_gene_factor: 1.0,
                disjoint_gene_factor: 1.0,
                common_weight_factor: 0.4,
            },
            runs: 200,
            max_generations: 100,
        }
    }
}

fn evaluate_xor(genome: &NNGenome) -> f32 {
    let network = Network::from(genome);

    let values = [
        ([1.0, 0.0, 0.0], 0.0),
        ([1.0, 0.0, 1.0], 1.0),
        ([1.0, 1.0, 0.0], 1.0),
        ([1.0, 1.0, 1.0], 0.0),
    ];

    let error: f32 = values
        .iter()
        .map(|(input, output)| (network.evaluate_at(input)[0] - output).abs())
        .map(|e| if e < ERROR_MARGIN { 0.0 } else { e })
        .sum();

    (4.0 - error).powf(2.0)
}

fn solved(population: &XorPopulation) -> bool {
    (population.champion().fitness() - SOLVED_FITNESS).abs() < f32::EPSILON
}

/// Runs one evaluate/aggregate/evolve cycle per generation until
/// the task is solved. Returns the solving generation, if any.
fn run(
    population: &mut XorPopulation,
    max_generations: usize,
    mut logger: Option<&mut EvolutionLogger<NNGenome>>,
) -> Result<Option<usize>, EvolutionError> {
    for _ in 0..max_generations {
        population.evaluate_fitness(evaluate_xor)?;
        population.update_statistics()?;
        if let Some(logger) = logger.as_deref_mut() {
            logger.log(
                population,
                &|genome: &NNGenome| {
                    let expressed = genome.genes().filter(|g| !g.suppressed()).count();
                    [genome.fitness(), expressed as f32]
                },
                ["fitness", "expressed genes"],
            );
        }
        if solved(population) {
            return Ok(Some(population.generation()));
        }
        population.evolve()?;
    }
    Ok(None)
}

fn load_experiment() -> Result<Experiment, Box<dyn Error>> {
    match env::args().nth(1) {
        Some(path) => {
            info!("Loading experiment from {}", path);
            Ok(ron::from_str(&fs::read_to_string(path)?)?)
        }
        None => Ok(Experiment::default()),
    }
}

/// Evolves a single population with snapshot logging,
/// and prints the champion if one is found.
fn showcase(experiment: &Experiment) -> Result<(), Box<dyn Error>> {
    let mut logger = EvolutionLogger::new(ReportingLevel::PopulationChampion);
    let mut population =
        XorPopulation::new(experiment.population.clone(), experiment.genetic.clone())?;

    let solution = run(&mut population, experiment.max_generations, Some(&mut logger))?;
    if let Some(log) = logger.iter().last() {
        println!("{}", log);
    }
    match solution {
        Some(generation) => println!(
            "Solved at generation {}: {}",
            generation,
            ron::to_string(population.champion())?
        ),
        None => println!("No solution after {} generations", experiment.max_generations),
    }
    Ok(())
}

/// Evolves many independent populations in parallel,
/// reporting how quickly and how often they succeed.
fn stress_test(experiment: &Experiment) -> Result<(), Box<dyn Error>> {
    let generations = (0..experiment.runs)
        .into_par_iter()
        .map(|_| -> Result<Option<usize>, Box<dyn Error + Send + Sync>> {
            let mut population =
                XorPopulation::new(experiment.population.clone(), experiment.genetic.clone())?;
            Ok(run(&mut population, experiment.max_generations, None)?)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e as Box<dyn Error>)?;

    let failures = generations.iter().filter(|g| g.is_none()).count();
    println!(
        "Successful run generation count {:?}, {}% failure rate over {} runs",
        Stats::from(generations.iter().flatten().map(|g| *g as f32)),
        failures as f32 * 100.0 / experiment.runs.max(1) as f32,
        experiment.runs
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let result = load_experiment().and_then(|experiment| {
        showcase(&experiment)?;
        stress_test(&experiment)
    });
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
