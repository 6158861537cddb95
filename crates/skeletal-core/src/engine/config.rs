use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BOND_LENGTH: f64 = 1.0;

const DEFAULT_MIN_SEPARATION_FACTOR: f64 = 0.5;
const DEFAULT_REPULSION_CUTOFF_FACTOR: f64 = 0.75;
const DEFAULT_RING_FORCE_MULTIPLIER: f64 = 0.25;
const DEFAULT_REFINEMENT_ITERATIONS: usize = 60;
const DEFAULT_CONVERGENCE_FACTOR: f64 = 1e-3;
const DEFAULT_COMPONENT_PADDING_FACTOR: f64 = 1.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// Tunable parameters of the coordinate generator.
///
/// All distance-like fields are expressed as factors of `bond_length`, so a
/// config scales uniformly with the chosen drawing unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Target length of every drawn bond, in output coordinate units.
    pub bond_length: f64,
    /// Two non-bonded vertices closer than this factor of `bond_length`
    /// count as colliding.
    pub min_separation_factor: f64,
    /// Non-bonded repulsion acts below this factor of `bond_length`.
    pub repulsion_cutoff_factor: f64,
    /// Scale applied to refinement displacements of ring vertices.
    pub ring_force_multiplier: f64,
    /// Upper bound on refinement iterations.
    pub refinement_iterations: usize,
    /// Refinement stops once the largest per-vertex displacement falls
    /// below this factor of `bond_length`.
    pub convergence_threshold_factor: f64,
    /// Gap between the bounding boxes of separately laid-out components,
    /// as a factor of `bond_length`.
    pub component_padding_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bond_length: DEFAULT_BOND_LENGTH,
            min_separation_factor: DEFAULT_MIN_SEPARATION_FACTOR,
            repulsion_cutoff_factor: DEFAULT_REPULSION_CUTOFF_FACTOR,
            ring_force_multiplier: DEFAULT_RING_FORCE_MULTIPLIER,
            refinement_iterations: DEFAULT_REFINEMENT_ITERATIONS,
            convergence_threshold_factor: DEFAULT_CONVERGENCE_FACTOR,
            component_padding_factor: DEFAULT_COMPONENT_PADDING_FACTOR,
        }
    }
}

impl LayoutConfig {
    pub fn builder() -> LayoutConfigBuilder {
        LayoutConfigBuilder::new()
    }

    pub fn min_separation(&self) -> f64 {
        self.min_separation_factor * self.bond_length
    }

    pub fn repulsion_cutoff(&self) -> f64 {
        self.repulsion_cutoff_factor * self.bond_length
    }

    pub fn convergence_threshold(&self) -> f64 {
        self.convergence_threshold_factor * self.bond_length
    }

    pub fn component_padding(&self) -> f64 {
        self.component_padding_factor * self.bond_length
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bond_length.is_finite() || self.bond_length <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "bond_length",
                reason: format!("must be finite and positive, got {}", self.bond_length),
            });
        }
        for (parameter, value) in [
            ("min_separation_factor", self.min_separation_factor),
            ("repulsion_cutoff_factor", self.repulsion_cutoff_factor),
            ("ring_force_multiplier", self.ring_force_multiplier),
            (
                "convergence_threshold_factor",
                self.convergence_threshold_factor,
            ),
            ("component_padding_factor", self.component_padding_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter {
                    parameter,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct LayoutConfigBuilder {
    bond_length: Option<f64>,
    min_separation_factor: Option<f64>,
    repulsion_cutoff_factor: Option<f64>,
    ring_force_multiplier: Option<f64>,
    refinement_iterations: Option<usize>,
    convergence_threshold_factor: Option<f64>,
    component_padding_factor: Option<f64>,
}

impl LayoutConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond_length(mut self, length: f64) -> Self {
        self.bond_length = Some(length);
        self
    }
    pub fn min_separation_factor(mut self, factor: f64) -> Self {
        self.min_separation_factor = Some(factor);
        self
    }
    pub fn repulsion_cutoff_factor(mut self, factor: f64) -> Self {
        self.repulsion_cutoff_factor = Some(factor);
        self
    }
    pub fn ring_force_multiplier(mut self, multiplier: f64) -> Self {
        self.ring_force_multiplier = Some(multiplier);
        self
    }
    pub fn refinement_iterations(mut self, iterations: usize) -> Self {
        self.refinement_iterations = Some(iterations);
        self
    }
    pub fn convergence_threshold_factor(mut self, factor: f64) -> Self {
        self.convergence_threshold_factor = Some(factor);
        self
    }
    pub fn component_padding_factor(mut self, factor: f64) -> Self {
        self.component_padding_factor = Some(factor);
        self
    }

    pub fn build(self) -> Result<LayoutConfig, ConfigError> {
        let config = LayoutConfig {
            bond_length: self
                .bond_length
                .ok_or(ConfigError::MissingParameter("bond_length"))?,
            min_separation_factor: self
                .min_separation_factor
                .unwrap_or(DEFAULT_MIN_SEPARATION_FACTOR),
            repulsion_cutoff_factor: self
                .repulsion_cutoff_factor
                .unwrap_or(DEFAULT_REPULSION_CUTOFF_FACTOR),
            ring_force_multiplier: self
                .ring_force_multiplier
                .unwrap_or(DEFAULT_RING_FORCE_MULTIPLIER),
            refinement_iterations: self
                .refinement_iterations
                .unwrap_or(DEFAULT_REFINEMENT_ITERATIONS),
            convergence_threshold_factor: self
                .convergence_threshold_factor
                .unwrap_or(DEFAULT_CONVERGENCE_FACTOR),
            component_padding_factor: self
                .component_padding_factor
                .unwrap_or(DEFAULT_COMPONENT_PADDING_FACTOR),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_bond_length() {
        let result = LayoutConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("bond_length")));
    }

    #[test]
    fn builder_fills_remaining_defaults() {
        let config = LayoutConfig::builder()
            .bond_length(1.5)
            .refinement_iterations(10)
            .build()
            .unwrap();
        assert_eq!(config.bond_length, 1.5);
        assert_eq!(config.refinement_iterations, 10);
        assert_eq!(
            config.min_separation_factor,
            LayoutConfig::default().min_separation_factor
        );
    }

    #[test]
    fn builder_rejects_non_positive_bond_length() {
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let result = LayoutConfig::builder().bond_length(bad).build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidParameter {
                    parameter: "bond_length",
                    ..
                })
            ));
        }
    }

    #[test]
    fn builder_rejects_negative_factors() {
        let result = LayoutConfig::builder()
            .bond_length(1.0)
            .ring_force_multiplier(-0.1)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                parameter: "ring_force_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn derived_distances_scale_with_bond_length() {
        let config = LayoutConfig::builder().bond_length(2.0).build().unwrap();
        assert_eq!(config.min_separation(), 2.0 * config.min_separation_factor);
        assert_eq!(
            config.component_padding(),
            2.0 * config.component_padding_factor
        );
    }
}
