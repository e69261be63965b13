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

//! Multi-robot solar farm environment and a random agent that plays it.

pub mod agent;
pub mod config;
pub mod environment;

pub use agent::RandomAgent;
pub use config::{ConfigError, SimConfig};
pub use environment::{Observation, SolarFarmEnvironment, StepOutcome};

pub type Rng = rand_pcg::Pcg64;
