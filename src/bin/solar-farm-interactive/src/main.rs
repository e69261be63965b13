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

//! Interactive solar farm. Watch the random agent play, or switch to edit mode and click to
//! place robots, obstacles, resources and panels.

mod controller;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use macroquad::prelude::{next_frame, Conf};
use solar_farm::{RandomAgent, SimConfig, SolarFarmEnvironment};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::controller::Controller;
use crate::render::Sprites;

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

    /// Steps per episode before the farm resets.
    #[arg(long, value_name = "STEPS")]
    max_steps: Option<u32>,

    /// Simulation steps per second in play mode.
    #[arg(
        long,
        value_name = "TICKS",
        default_value_t = 8,
        value_parser = clap::value_parser!(u32).range(1..=120)
    )]
    tick_rate: u32,

    /// Width and height of a cell in pixels.
    #[arg(
        long,
        value_name = "PIXELS",
        default_value_t = 64,
        value_parser = clap::value_parser!(u16).range(8..=256)
    )]
    cell_size: u16,

    /// Directory with robot.png, obstacle.png, resource.png, panel.png and sand.png.
    #[arg(long, value_name = "DIR")]
    sprites: Option<PathBuf>,
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

fn window_conf(columns: usize, rows: usize, cell_size: f32) -> Conf {
    Conf {
        window_title: "Interactive Solar Farm".to_owned(),
        window_width: (columns as f32 * cell_size) as i32,
        window_height: (rows as f32 * cell_size + render::STATUS_HEIGHT) as i32,
        window_resizable: false,
        ..Default::default()
    }
}

async fn run(mut controller: Controller, cell_size: f32, sprites_dir: Option<PathBuf>) {
    let sprites = Sprites::load(sprites_dir.as_deref()).await;
    loop {
        let input = render::gather_input();
        if controller.update(&input, cell_size).is_break() {
            break;
        }
        render::draw(&controller, &sprites, cell_size);
        next_frame().await;
    }
    info!(score = controller.environment().score(), "quitting");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let config = args.sim_config()?;
    info!(seed = config.seed, grid_size = config.grid_size, "starting solar farm");

    let environment = SolarFarmEnvironment::new(config.clone(), config.environment_rng())
        .context("creating environment")?;
    let agent = RandomAgent::new(config.agent_rng());
    let controller = Controller::new(environment, agent, args.tick_rate);

    let cell_size = f32::from(args.cell_size);
    let conf = window_conf(config.grid_size, config.grid_size, cell_size);
    macroquad::Window::from_config(conf, run(controller, cell_size, args.sprites));
    Ok(())
}
