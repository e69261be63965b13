/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use solar_farm_logic::{GridError, PanelRates};

use crate::Rng;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Simulation settings. Every field has a default, so a config file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Side length of the square grid.
    pub grid_size: usize,

    /// Steps per episode.
    pub max_steps: u32,

    /// Robots placed by a reset.
    pub initial_robots: usize,

    pub base_rate: f64,
    pub bonus_per_adjacent_panel: f64,

    /// Fraction of each step's panel output added to the score.
    pub electricity_score_scale: f64,

    /// Score for each collected resource.
    pub resource_score: f64,

    /// Resources a robot spends to build one panel.
    pub panel_cost: u32,

    pub seed: u64,
}

/// Largest accepted `grid_size`.
pub const MAX_GRID_SIZE: usize = u16::MAX as usize;

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            max_steps: 300,
            initial_robots: 2,
            base_rate: 1.0,
            bonus_per_adjacent_panel: 1.0,
            electricity_score_scale: 0.1,
            resource_score: 1.0,
            panel_cost: 0,
            seed: 42,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::Invalid(format!(
                "grid_size must be between 1 and {}, got {}",
                MAX_GRID_SIZE, self.grid_size
            )));
        }
        let rates = [
            ("base_rate", self.base_rate),
            ("bonus_per_adjacent_panel", self.bonus_per_adjacent_panel),
            ("electricity_score_scale", self.electricity_score_scale),
            ("resource_score", self.resource_score),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn panel_rates(&self) -> PanelRates {
        PanelRates {
            base_rate: self.base_rate,
            bonus_per_adjacent_panel: self.bonus_per_adjacent_panel,
        }
    }

    pub fn environment_rng(&self) -> Rng {
        Rng::seed_from_u64(self.seed)
    }

    // Offset so the agent does not replay the environment's random stream.
    pub fn agent_rng(&self) -> Rng {
        Rng::seed_from_u64(self.seed.wrapping_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            SimConfig::from_json_str(r#"{"grid_size": 12, "panel_cost": 2}"#).expect("parse");
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.panel_cost, 2);
        assert_eq!(config.max_steps, SimConfig::default().max_steps);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = SimConfig::from_json_str(r#"{"grid_sise": 12}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_zero_grid_size_is_rejected() {
        let result = SimConfig::from_json_str(r#"{"grid_size": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_huge_grid_size_is_rejected() {
        let result = SimConfig::from_json_str(r#"{"grid_size": 4294967296}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let config = SimConfig {
            grid_size: MAX_GRID_SIZE,
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let config = SimConfig {
            bonus_per_adjacent_panel: -1.0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimConfig::load(Some(Path::new("/nonexistent/solar-farm.json")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_without_path_is_default() {
        assert_eq!(SimConfig::load(None).expect("load"), SimConfig::default());
    }
}
