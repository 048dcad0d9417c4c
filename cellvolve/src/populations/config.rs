use super::ConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// `proportional_share` is a fraction in the range [0.0, 1.0],
/// and `distance_threshold` should be a finite, non-negative
/// value. Use [`validate`] to check a configuration loaded
/// from an external source.
///
/// [`validate`]: PopulationConfig::validate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Number of inputs of every genome.
    pub input_count: NonZeroUsize,
    /// Number of outputs of every genome.
    pub output_count: NonZeroUsize,
    /// Genetic distance threshold, at or beyond which
    /// genomes are considered as belonging to
    /// different species.
    pub distance_threshold: f32,
    /// Number of epochs a species may go without
    /// producing the population champion before
    /// it goes extinct.
    pub stagnation_limit: NonZeroUsize,
    /// Share of the population which is allotted to
    /// species in proportion to their best fitness.
    /// The rest is filled with offspring of randomly
    /// chosen species.
    pub proportional_share: f32,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of
    /// `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use cellvolve::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     proportional_share: 0.5,
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            input_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            distance_threshold: 0.0,
            stagnation_limit: NonZeroUsize::MIN,
            proportional_share: 0.0,
        }
    }

    /// Checks that all values are within their valid ranges.
    ///
    /// # Errors
    /// Returns an error naming the first invalid value found.
    ///
    /// # Examples
    /// ```
    /// use cellvolve::PopulationConfig;
    ///
    /// assert!(PopulationConfig::default().validate().is_ok());
    /// assert!(PopulationConfig {
    ///     proportional_share: 1.5,
    ///     ..PopulationConfig::default()
    /// }
    /// .validate()
    /// .is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(ConfigError::DistanceThreshold(self.distance_threshold));
        }
        if !(0.0..=1.0).contains(&self.proportional_share) {
            return Err(ConfigError::ProportionalShare(self.proportional_share));
        }
        Ok(())
    }
}

impl Default for PopulationConfig {
    fn default() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(150).unwrap_or(NonZeroUsize::MIN),
            distance_threshold: 0.5,
            stagnation_limit: NonZeroUsize::new(15).unwrap_or(NonZeroUsize::MIN),
            proportional_share: 0.75,
            ..PopulationConfig::zero()
        }
    }
}
