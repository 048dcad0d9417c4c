//! # cellvolve-nn
//! A neural network-based implementation of the `cellvolve` crate's `Genome` trait.
//!
//! Provides an [`NNGenome`] type usable in `cellvolve` `Population`s, its
//! shared innovation [`History`], and a [`Network`] which can be generated
//! from an [`NNGenome`] to score it.
//!
//! [`NNGenome`]: crate::genomics::NNGenome
//! [`History`]: crate::genomics::History
//! [`Network`]: crate::networks::Network

pub mod genomics;
pub mod networks;

/// Identifier type used to designate historically
/// identical mutations for the purposes of
/// genome comparison and genetic tracking.
pub type Innovation = usize;
