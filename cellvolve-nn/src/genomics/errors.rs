use crate::Innovation;

use thiserror::Error;

/// An error type indicating the gene being added is invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneValidityError {
    #[error("duplicate gene insertion with id {0}")]
    DuplicateGeneID(Innovation),
    #[error("gene insertion between nonexistant endpoint(s) {0} -> {1}")]
    NonexistantEndpoints(Innovation, Innovation),
    #[error("gene insertion with endpoints {0} -> {1} shadows gene with same endpoints")]
    DuplicateGeneWithEndpoints(Innovation, Innovation),
    #[error("gene insertion with sensor node as output with id {0}")]
    SensorEndpoint(Innovation),
}

/// An error type indicating the node being added is invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeValidityError {
    #[error("duplicate node insertion with id {0}")]
    DuplicateNodeID(Innovation),
}

/// An error type indicating a failure
/// to carry out a structural mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    #[error("gene mutation on fully-connected genome")]
    GenomeFullyConnected,
    #[error("no viable input-output pair found for gene mutation")]
    NoInputOutputPairFound,
    #[error("node mutation on genome with no expressed genes")]
    EmptyGenome,
}
