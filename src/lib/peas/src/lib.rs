/*
 * Copyright 2023 Asim Ihsan
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

// PEAS - Performance, Environment, Actuators, Sensors
//
// See:
// -  Chapter 2: Intelligent Agents, page 40

use num_traits::Zero;

/// An Agent acts in a Performance, Environment, Actuators, Sensors (PEAS) cycle.
/// For a given Percept, the Agent will return an Action.
///
/// A multi-robot Agent returns one joint Action per cycle, e.g. a `Vec` with one entry per robot.
///
/// Notice that the Agent is not aware of an Environment, its only interface is the Percept coming
/// in then the Action going out.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action;
}

/// An Environment runs Agents in a Performance, Environment, Actuators, Sensors (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action;
    type Percept;
    type Score: num_traits::NumAssign + Copy;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action);

    /// Returns the performance measure earned by the most recent time step. This is not
    /// cumulative; the Simulation keeps the running total.
    fn score(&self) -> Self::Score;

    /// Whether the episode is over. Environments without episodes never terminate.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// A Simulation runs an Agent in multiple Performance, Environment, Actuators, Sensors (PEAS)
/// cycles. The Agent's score (Performance) is continually kept up to date.
///
/// The Simulation is aware of both the Environment and the Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    time_steps: i32,
    steps_taken: i32,
    score: _Environment::Score,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, time_steps: i32) -> Self {
        Self {
            environment,
            agent,
            time_steps,
            steps_taken: 0,
            score: _Environment::Score::zero(),
        }
    }

    /// Runs up to `time_steps` cycles, stopping early once the Environment is terminal.
    pub fn run(&mut self) {
        for _ in 0..self.time_steps {
            if self.environment.is_terminal() {
                break;
            }
            let percept = self.environment.percept();
            let action = self.agent.act(&percept);
            self.environment.execute_action(&action);
            self.score += self.environment.score();
            self.steps_taken += 1;
        }
    }

    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.score
    }

    pub fn steps_taken(&self) -> i32 {
        self.steps_taken
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }
}
