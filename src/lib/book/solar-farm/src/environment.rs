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

use peas::Environment;
use rand::seq::SliceRandom;
use rand::Rng as _;
use solar_farm_logic::{
    Action, ActionOutcome, CellKind, Farm, Grid, GridError, PanelRates, Position, Robot, RobotId,
};
use tracing::{debug, trace, warn};

use crate::{ConfigError, Rng, SimConfig};

const MIN_RESOURCES: usize = 5;
const MAX_RESOURCES: usize = 8;

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Score earned by this step: collected resources plus scaled panel output.
    pub reward: f64,

    /// Whether the episode has reached its step limit.
    pub done: bool,
}

/// What an agent sees: a snapshot of the farm and what it costs to build.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    farm: Farm,
    panel_cost: u32,
    step_count: u32,
}

impl Observation {
    pub fn farm(&self) -> &Farm {
        &self.farm
    }

    pub fn robots(&self) -> &[Robot] {
        self.farm.robots()
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn legal_actions(&self, id: RobotId) -> Vec<Action> {
        self.farm.legal_actions(id, self.panel_cost)
    }
}

/// Grid world where robots collect resources and build solar panels. Owns the farm for its whole
/// lifetime; the grid dimensions never change after construction.
pub struct SolarFarmEnvironment {
    config: SimConfig,
    rates: PanelRates,
    farm: Farm,
    rng: Rng,
    step_count: u32,
    score: f64,
    last_reward: f64,
}

impl SolarFarmEnvironment {
    /// Create a `grid_size` x `grid_size` farm and reset it to a random starting layout drawn
    /// from `rng`.
    pub fn new(config: SimConfig, rng: Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::square(config.grid_size)?;
        let mut environment = Self::with_farm(config, Farm::new(grid), rng)?;
        environment.reset();
        Ok(environment)
    }

    /// Start from a hand-built farm instead of a random layout. `rng` is used by later resets.
    pub fn with_farm(config: SimConfig, farm: Farm, rng: Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rates: config.panel_rates(),
            config,
            farm,
            rng,
            step_count: 0,
            score: 0.0,
            last_reward: 0.0,
        })
    }

    /// Clear the farm and scatter robots, obstacles and resources over distinct random cells.
    /// Counts that do not fit the grid are truncated.
    pub fn reset(&mut self) {
        self.farm.clear();
        self.step_count = 0;
        self.score = 0.0;
        self.last_reward = 0.0;

        let grid = self.farm.grid();
        let side = grid.width().min(grid.height());
        let mut cells: Vec<Position> = grid.positions().collect();
        cells.shuffle(&mut self.rng);
        let mut free = cells.into_iter();

        for position in free.by_ref().take(self.config.initial_robots) {
            if let Err(error) = self.farm.place_robot(position) {
                warn!(%error, "could not place robot during reset");
            }
        }

        let obstacles = self.rng.gen_range(side / 3..=side / 2);
        for position in free.by_ref().take(obstacles) {
            if let Err(error) = self.farm.toggle_obstacle(position) {
                warn!(%error, "could not place obstacle during reset");
            }
        }

        let resources = self.rng.gen_range(MIN_RESOURCES..=MAX_RESOURCES);
        for position in free.by_ref().take(resources) {
            if let Err(error) = self.farm.place_resource(position) {
                warn!(%error, "could not place resource during reset");
            }
        }

        debug!(
            robots = self.farm.robots().len(),
            obstacles = self.farm.grid().count(CellKind::Obstacle),
            resources = self.farm.grid().count(CellKind::Resource),
            "reset environment"
        );
    }

    /// Apply one action per robot, in robot id order. Illegal actions are no-ops, extra actions
    /// are ignored and robots without an action stay put.
    pub fn step(&mut self, actions: &[Action]) -> StepOutcome {
        let panel_cost = self.config.panel_cost;
        let mut reward = 0.0;
        for (index, &action) in actions.iter().enumerate().take(self.farm.robots().len()) {
            let id = RobotId(index);
            match self.farm.apply(id, action, panel_cost) {
                ActionOutcome::Collected => reward += self.config.resource_score,
                ActionOutcome::Built => debug!(robot = %id, "built panel"),
                ActionOutcome::Moved { .. } | ActionOutcome::NoOp => {}
            }
        }

        let output = self.total_panel_output();
        reward += output * self.config.electricity_score_scale;

        self.step_count += 1;
        self.score += reward;
        self.last_reward = reward;
        trace!(step = self.step_count, output, reward, "stepped environment");

        StepOutcome {
            reward,
            done: self.is_done(),
        }
    }

    /// Output of the cell at `position`: base rate plus a bonus per orthogonally adjacent panel
    /// for a panel, zero for anything else.
    pub fn compute_panel_output(&self, position: Position) -> f64 {
        self.farm.grid().panel_output(position, &self.rates)
    }

    pub fn total_panel_output(&self) -> f64 {
        self.farm.grid().total_panel_output(&self.rates)
    }

    pub fn place_robot(&mut self, position: Position) -> Result<RobotId, GridError> {
        self.farm.place_robot(position)
    }

    pub fn toggle_obstacle(&mut self, position: Position) -> Result<CellKind, GridError> {
        self.farm.toggle_obstacle(position)
    }

    pub fn place_resource(&mut self, position: Position) -> Result<(), GridError> {
        self.farm.place_resource(position)
    }

    pub fn place_panel(&mut self, position: Position) -> Result<(), GridError> {
        self.farm.place_panel(position)
    }

    pub fn observation(&self) -> Observation {
        Observation {
            farm: self.farm.clone(),
            panel_cost: self.config.panel_cost,
            step_count: self.step_count,
        }
    }

    pub fn farm(&self) -> &Farm {
        &self.farm
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn max_steps(&self) -> u32 {
        self.config.max_steps
    }

    /// Cumulative score since the last reset.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn is_done(&self) -> bool {
        self.step_count >= self.config.max_steps
    }
}

impl Environment for SolarFarmEnvironment {
    type Action = Vec<Action>;
    type Percept = Observation;
    type Score = f64;

    fn percept(&self) -> Self::Percept {
        self.observation()
    }

    fn execute_action(&mut self, action: &Self::Action) {
        self.step(action);
    }

    fn score(&self) -> Self::Score {
        self.last_reward
    }

    fn is_terminal(&self) -> bool {
        self.is_done()
    }
}
