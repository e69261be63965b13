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

//! Run the random agent for a single solar farm episode and print the score.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use peas::Simulation;
use serde::Serialize;
use solar_farm::{RandomAgent, SimConfig, SolarFarmEnvironment};
use solar_farm_logic::{CellKind, Farm};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// JSON file with simulation settings. Flags below override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Side length of the square grid.
    #[arg(long, value_name = "CELLS", value_parser = clap::value_parser!(u16).range(1..))]
    grid_size: Option<u16>,

    /// Seed for the environment and the agent.
    #[arg(long)]
    seed: Option<u64>,

    /// Steps in the episode.
    #[arg(long, value_name = "STEPS")]
    max_steps: Option<u32>,

    /// Print a JSON summary, including the final farm, instead of the plain score.
    #[arg(long)]
    json: bool,
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

#[derive(Debug, Serialize)]
struct EpisodeSummary<'a> {
    config: &'a SimConfig,
    steps: i32,
    score: f64,
    panels: usize,
    farm: &'a Farm,
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
    info!(seed = config.seed, grid_size = config.grid_size, "starting episode");

    let environment = SolarFarmEnvironment::new(config.clone(), config.environment_rng())
        .context("creating environment")?;
    let agent = RandomAgent::new(config.agent_rng());

    let time_steps = i32::try_from(config.max_steps).unwrap_or(i32::MAX);
    let mut simulation = Simulation::new(environment, agent, time_steps);
    simulation.run();

    let environment = simulation.environment();
    let farm = environment.farm();
    if args.json {
        let summary = EpisodeSummary {
            config: environment.config(),
            steps: simulation.steps_taken(),
            score: simulation.score(),
            panels: farm.grid().count(CellKind::Panel),
            farm,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", farm);
        println!("score: {:.1}", simulation.score());
    }
    Ok(())
}
