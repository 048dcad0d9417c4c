//! A one-dimensional genome for exercising the population
//! without depending on any real genetic encoding.
use crate::{Genome, InnovationHistory};

use rand::Rng;
use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TestConfig {
    /// New genomes are placed uniformly in `[0, spread)`.
    pub spread: f32,
    /// Offset added to every child's position.
    pub drift: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TestHistory {
    pub shape: (usize, usize),
    pub matings: usize,
}

impl InnovationHistory for TestHistory {
    type Config = TestConfig;

    fn new(input_count: NonZeroUsize, output_count: NonZeroUsize, _: &TestConfig) -> TestHistory {
        TestHistory {
            shape: (input_count.get(), output_count.get()),
            matings: 0,
        }
    }
}

/// Genetic distance is the distance between positions,
/// and children sit halfway between their parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TestGenome {
    pub position: f32,
    pub tag: usize,
    fitness: f32,
}

impl TestGenome {
    pub(crate) fn at(position: f32) -> TestGenome {
        TestGenome {
            position,
            tag: 0,
            fitness: 0.0,
        }
    }
}

impl Genome for TestGenome {
    type Config = TestConfig;
    type InnovationHistory = TestHistory;

    fn new(_: NonZeroUsize, _: NonZeroUsize, config: &TestConfig) -> TestGenome {
        if config.spread > 0.0 {
            TestGenome::at(rand::thread_rng().gen_range(0.0..config.spread))
        } else {
            TestGenome::at(0.0)
        }
    }

    fn genetic_distance(first: &TestGenome, second: &TestGenome, _: &TestConfig) -> f32 {
        (first.position - second.position).abs()
    }

    fn mate(
        parent1: &TestGenome,
        parent2: &TestGenome,
        history: &mut TestHistory,
        config: &TestConfig,
    ) -> TestGenome {
        history.matings += 1;
        TestGenome {
            position: (parent1.position + parent2.position) / 2.0 + config.drift,
            tag: usize::MAX,
            fitness: 0.0,
        }
    }

    fn set_fitness(&mut self, fitness: f32) {
        self.fitness = fitness;
    }

    fn fitness(&self) -> f32 {
        self.fitness
    }
}
