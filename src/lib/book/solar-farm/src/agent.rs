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

use peas::Agent;
use rand::seq::SliceRandom;
use solar_farm_logic::{Action, RobotId};

use crate::{Observation, Rng};

/// Picks a uniformly random legal action for every robot. When a robot has no legal action it
/// picks from the whole action set instead, which is then always a no-op.
pub struct RandomAgent {
    rng: Rng,
}

impl RandomAgent {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }

    pub fn choose(&mut self, observation: &Observation, id: RobotId) -> Action {
        let legal = observation.legal_actions(id);
        let candidates: &[Action] = if legal.is_empty() {
            &Action::ALL
        } else {
            &legal
        };
        *candidates.choose(&mut self.rng).unwrap_or(&Action::Collect)
    }
}

impl Agent for RandomAgent {
    type Action = Vec<Action>;
    type Percept = Observation;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        percept
            .robots()
            .iter()
            .map(|robot| self.choose(percept, robot.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use peas::Simulation;
    use rand::SeedableRng;
    use solar_farm_logic::{CellKind, Farm, Grid, Position};

    use super::*;
    use crate::{SimConfig, SolarFarmEnvironment};

    fn environment(config: SimConfig) -> SolarFarmEnvironment {
        SolarFarmEnvironment::new(config.clone(), config.environment_rng()).expect("environment")
    }

    #[test]
    fn test_one_action_per_robot() {
        let mut environment = environment(SimConfig::default());
        environment.place_robot(Position::new(0, 0)).ok();
        let observation = environment.observation();
        let mut agent = RandomAgent::new(Rng::seed_from_u64(1));
        assert_eq!(agent.act(&observation).len(), observation.robots().len());
    }

    #[test]
    fn test_only_legal_actions_when_available() {
        for seed in 0..50 {
            let config = SimConfig {
                seed,
                initial_robots: 4,
                ..SimConfig::default()
            };
            let mut environment = environment(config.clone());
            let mut agent = RandomAgent::new(config.agent_rng());
            for _ in 0..20 {
                let observation = environment.observation();
                let actions = agent.act(&observation);
                for (robot, action) in observation.robots().iter().zip(&actions) {
                    let legal = observation.legal_actions(robot.id);
                    if !legal.is_empty() {
                        assert!(legal.contains(action), "seed {}: {:?}", seed, action);
                    }
                }
                environment.step(&actions);
            }
        }
    }

    #[test]
    fn test_boxed_in_robot_still_gets_an_action() {
        let mut grid = Grid::square(1).expect("grid");
        grid.set_kind(Position::new(0, 0), CellKind::Panel).expect("panel");
        let mut farm = Farm::new(grid);
        let id = farm.place_robot(Position::new(0, 0)).expect("place");
        let config = SimConfig::default();
        let environment =
            SolarFarmEnvironment::with_farm(config.clone(), farm, config.environment_rng())
                .expect("environment");

        let mut agent = RandomAgent::new(config.agent_rng());
        let observation = environment.observation();
        assert!(observation.legal_actions(id).is_empty());
        let action = agent.choose(&observation, id);
        assert!(Action::ALL.contains(&action));
    }

    #[test]
    fn test_same_seed_same_actions() {
        let observation = environment(SimConfig::default()).observation();
        let mut first = RandomAgent::new(Rng::seed_from_u64(99));
        let mut second = RandomAgent::new(Rng::seed_from_u64(99));
        for _ in 0..10 {
            assert_eq!(first.act(&observation), second.act(&observation));
        }
    }

    #[test]
    fn test_simulation_runs_one_episode() {
        let config = SimConfig {
            max_steps: 40,
            ..SimConfig::default()
        };
        let environment = environment(config.clone());
        let agent = RandomAgent::new(config.agent_rng());
        let mut simulation = Simulation::new(environment, agent, 1000);
        simulation.run();

        assert_eq!(simulation.steps_taken(), 40);
        assert!(simulation.environment().is_done());
        assert_relative_eq!(
            simulation.score(),
            simulation.environment().score(),
            epsilon = 1e-9
        );
    }
}
