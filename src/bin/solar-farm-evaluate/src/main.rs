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

#![warn(missing_docs)]

//! Evaluate the random agent over many seeded solar farm episodes.

// Each episode gets its own seed, starting layout and agent. Record the score for each episode
// and report the average, spread and extremes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use peas::Simulation;
use rayon::prelude::*;
use solar_farm::{ConfigError, RandomAgent, SimConfig, SolarFarmEnvironment};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// JSON file with simulation settings. Flags below override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of episodes. Episode `i` uses seed `seed + i`.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    episodes: u64,

    /// Side length of the square grid.
    #[arg(long, value_name = "CELLS", value_parser = clap::value_parser!(u16).range(1..))]
    grid_size: Option<u16>,

    /// Seed of the first episode.
    #[arg(long)]
    seed: Option<u64>,

    /// Steps per episode.
    #[arg(long, value_name = "STEPS")]
    max_steps: Option<u32>,
}

impl CliArgs {
    fn sim_config(&self) -> Result<SimConfig> {
        let mut config = SimConfig::load(self.config.as_deref()).context("loading config")?;
        if let Some(grid_size) = self.grid_size {
            config.grid_size = usize::from(grid_size);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        Ok(config)
    }
}

fn run_episode(config: SimConfig) -> Result<f64, ConfigError> {
    let environment = SolarFarmEnvironment::new(config.clone(), config.environment_rng())?;
    let agent = RandomAgent::new(config.agent_rng());
    let time_steps = i32::try_from(config.max_steps).unwrap_or(i32::MAX);
    let mut simulation = Simulation::new(environment, agent, time_steps);
    simulation.run();
    Ok(simulation.score())
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScoreSummary {
    episodes: usize,
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

impl ScoreSummary {
    fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            episodes: scores.len(),
            mean,
            std_dev: variance.sqrt(),
            min: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

impl std::fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "episodes: {}, mean: {:.2}, std dev: {:.2}, min: {:.2}, max: {:.2}",
            self.episodes, self.mean, self.std_dev, self.min, self.max
        )
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = args.sim_config()?;
    info!(
        episodes = args.episodes,
        first_seed = config.seed,
        "evaluating random agent"
    );

    let scores = (0..args.episodes)
        .into_par_iter()
        .map(|offset| {
            run_episode(SimConfig {
                seed: config.seed.wrapping_add(offset),
                ..config.clone()
            })
        })
        .collect::<Result<Vec<f64>, ConfigError>>()
        .context("running episodes")?;

    let summary = ScoreSummary::from_scores(&scores).context("no episodes were run")?;
    println!("{}", summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_summary_of_known_scores() {
        let summary = ScoreSummary::from_scores(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
            .expect("summary");
        assert_eq!(summary.episodes, 8);
        assert_relative_eq!(summary.mean, 5.0);
        assert_relative_eq!(summary.std_dev, 2.0);
        assert_relative_eq!(summary.min, 2.0);
        assert_relative_eq!(summary.max, 9.0);
    }

    #[test]
    fn test_summary_of_nothing_is_none() {
        assert_eq!(ScoreSummary::from_scores(&[]), None);
    }

    #[test]
    fn test_same_seed_same_score() {
        let config = SimConfig {
            max_steps: 50,
            ..SimConfig::default()
        };
        let first = run_episode(config.clone()).expect("episode");
        let second = run_episode(config).expect("episode");
        assert_relative_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_fails_episode() {
        let config = SimConfig {
            grid_size: 0,
            ..SimConfig::default()
        };
        assert!(run_episode(config).is_err());
    }
}
