//! Neural networks generated from [`NNGenome`]s,
//! used to evaluate them.
//!
//! [`NNGenome`]: crate::genomics::NNGenome

use crate::genomics::{ActivationType, NNGenome, NodeType};
use crate::Innovation;

use std::collections::HashMap;

/// A feed-forward evaluation of a genome's phenotype,
/// best suited for function approximation tasks.
///
/// Every expressed gene becomes a connection. Evaluation
/// activates all non-input nodes synchronously, once per
/// hidden node plus one, so that signals traverse every
/// acyclic path from the inputs to the outputs. Recurrent
/// connections read the previous pass' values.
#[derive(Clone, Debug)]
pub struct Network {
    input_count: usize,
    output_count: usize,
    activations: Vec<ActivationType>,
    /// Incoming `(source index, weight)` pairs, by node index.
    incoming: Vec<Vec<(usize, f32)>>,
    passes: usize,
}

impl From<&NNGenome> for Network {
    /// Generates a new network from the passed genome.
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::{GeneticConfig, NNGenome};
    /// use cellvolve_nn::networks::Network;
    /// use std::num::NonZeroUsize;
    ///
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let genome = NNGenome::new(one, one, &GeneticConfig::zero());
    /// let network = Network::from(&genome);
    ///
    /// assert_eq!(network.evaluate_at(&[1.0]), vec![0.5]);
    /// ```
    fn from(genome: &NNGenome) -> Network {
        let index: HashMap<Innovation, usize> = genome
            .nodes()
            .enumerate()
            .map(|(i, node)| (node.innovation(), i))
            .collect();
        let count_of = |node_type| {
            genome
                .nodes()
                .filter(|n| n.node_type() == node_type)
                .count()
        };

        let mut incoming = vec![vec![]; index.len()];
        for gene in genome.genes().filter(|g| !g.suppressed()) {
            if let (Some(&input), Some(&output)) =
                (index.get(&gene.input()), index.get(&gene.output()))
            {
                incoming[output].push((input, gene.weight()));
            }
        }

        Network {
            input_count: count_of(NodeType::Sensor),
            output_count: count_of(NodeType::Actuator),
            activations: genome.nodes().map(|n| n.activation_type()).collect(),
            incoming,
            passes: count_of(NodeType::Neuron) + 1,
        }
    }
}

impl From<NNGenome> for Network {
    fn from(genome: NNGenome) -> Network {
        Network::from(&genome)
    }
}

impl Network {
    /// Returns the network's output values
    /// for the values given by `inputs`.
    ///
    /// Missing inputs are treated as 0, and
    /// superfluous ones are ignored.
    ///
    /// # Examples
    /// ```
    /// use cellvolve_nn::genomics::{ActivationType, GeneticConfig, NNGenome};
    /// use cellvolve_nn::networks::Network;
    /// use std::num::NonZeroUsize;
    ///
    /// fn sigmoid(x: f32) -> f32 {
    ///     1.0 / (1.0 + (-4.9 * x).exp())
    /// }
    ///
    /// // Create a network with two chained sigmoid nodes.
    /// let one = NonZeroUsize::new(1).unwrap();
    /// let mut genome = NNGenome::new(one, one, &GeneticConfig::zero());
    /// genome.add_node(2, ActivationType::Sigmoid).unwrap();
    /// genome.add_gene(0, 0, 2, 1.0).unwrap();
    /// genome.add_gene(1, 2, 1, 1.0).unwrap();
    /// let network = Network::from(&genome);
    ///
    /// // The result is identical to double application of a sigmoid function.
    /// for input in -20..=20 {
    ///     let input = input as f32 / 10.0;
    ///     assert_eq!(network.evaluate_at(&[input])[0], sigmoid(sigmoid(input)));
    /// }
    /// ```
    pub fn evaluate_at(&self, inputs: &[f32]) -> Vec<f32> {
        let mut state = vec![0.0; self.activations.len()];
        for (value, input) in state.iter_mut().zip(inputs).take(self.input_count) {
            *value = *input;
        }

        let mut next = state.clone();
        for _ in 0..self.passes {
            for node in self.input_count..state.len() {
                let sum: f32 = self.incoming[node]
                    .iter()
                    .map(|(source, weight)| state[*source] * weight)
                    .sum();
                next[node] = self.activations[node].apply(sum);
            }
            state.copy_from_slice(&next);
        }

        state[self.input_count..self.input_count + self.output_count].to_vec()
    }

    /// Returns the number of inputs the network expects.
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Returns the number of outputs the network produces.
    pub fn output_count(&self) -> usize {
        self.output_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genomics::{GeneticConfig, History};
    use rand::{rngs::StdRng, SeedableRng};
    use std::num::NonZeroUsize;

    fn genome(inputs: usize, outputs: usize) -> NNGenome {
        NNGenome::new(
            NonZeroUsize::new(inputs).unwrap(),
            NonZeroUsize::new(outputs).unwrap(),
            &GeneticConfig::zero(),
        )
    }

    #[test]
    fn outputs_in_order() {
        let mut genome = genome(2, 2);
        genome.add_gene(0, 0, 2, 1.0).unwrap();
        genome.add_gene(3, 1, 3, -1.0).unwrap();
        let network = Network::from(&genome);

        let outputs = network.evaluate_at(&[1.0, 1.0]);
        assert_eq!(outputs.len(), 2);
        assert!(outputs[0] > 0.99);
        assert!(outputs[1] < 0.01);
    }

    #[test]
    fn suppressed_genes_are_not_expressed() {
        // Identity output and a small weight keep the
        // outputs away from saturation.
        let config = GeneticConfig {
            output_activation_types: vec![ActivationType::Identity],
            ..GeneticConfig::zero()
        };
        let one = NonZeroUsize::new(1).unwrap();
        let mut direct = NNGenome::new(one, one, &config);
        direct.add_gene(0, 0, 1, 0.5).unwrap();

        let mut split = direct.clone();
        let mut history = History::new(one, one);
        let new_node = split
            .mutate_add_node(&mut history, &config, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(new_node, 2);
        assert!(split.gene(0).unwrap().suppressed());

        // The same structure, without the suppressed gene.
        let mut expected = NNGenome::new(one, one, &config);
        expected.add_node(2, ActivationType::Sigmoid).unwrap();
        expected.add_gene(1, 0, 2, 1.0).unwrap();
        expected.add_gene(2, 2, 1, 0.5).unwrap();

        let (direct, split, expected) = (
            Network::from(&direct),
            Network::from(&split),
            Network::from(&expected),
        );
        for input in [-1.0, -0.25, 0.5, 2.0] {
            let output = split.evaluate_at(&[input]);
            assert_eq!(output, expected.evaluate_at(&[input]));
            assert_eq!(direct.evaluate_at(&[input]), vec![0.5 * input]);
            assert_ne!(output, vec![0.5 * input]);
        }
    }

    #[test]
    fn deep_chains_reach_outputs() {
        let mut genome = genome(1, 1);
        genome.add_node(2, ActivationType::Identity).unwrap();
        genome.add_node(3, ActivationType::Identity).unwrap();
        genome.add_node(4, ActivationType::Identity).unwrap();
        genome.add_gene(0, 0, 2, 2.0).unwrap();
        genome.add_gene(1, 2, 3, 2.0).unwrap();
        genome.add_gene(2, 3, 4, 2.0).unwrap();
        genome.add_gene(3, 4, 1, 1.0).unwrap();
        let network = Network::from(&genome);

        assert_eq!(network.evaluate_at(&[1.0]), vec![ActivationType::Sigmoid.apply(8.0)]);
    }

    #[test]
    fn missing_inputs_are_zero() {
        let mut genome = genome(2, 1);
        genome.add_gene(0, 0, 2, 1.0).unwrap();
        genome.add_gene(1, 1, 2, 1.0).unwrap();
        let network = Network::from(&genome);
        assert_eq!(network.input_count(), 2);
        assert_eq!(network.output_count(), 1);
        assert_eq!(network.evaluate_at(&[]), vec![0.5]);
        assert_eq!(network.evaluate_at(&[0.0, 0.0, 3.0]), vec![0.5]);
    }
}
