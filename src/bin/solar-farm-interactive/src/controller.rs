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

//! Backend-neutral game control: what a frame's input does to the mode and the farm.

use std::ops::ControlFlow;

use peas::Agent;
use solar_farm::{RandomAgent, SolarFarmEnvironment};
use solar_farm_logic::{Grid, GridError, Position};
use tracing::{debug, info};

// Cap on catch-up ticks after a long frame, e.g. while the window was being dragged.
const MAX_TICKS_PER_FRAME: usize = 4;

/// Whether pointer input edits the farm or the agent plays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Play,
    Edit,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Play => Mode::Edit,
            Mode::Edit => Mode::Play,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Play => "PLAY",
            Mode::Edit => "EDIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// A pointer press at window pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    pub x: f32,
    pub y: f32,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

/// Everything that happened during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub toggle_mode: bool,
    pub quit: bool,
    pub clicks: Vec<Click>,

    /// Seconds since the previous frame.
    pub dt: f32,
}

/// Grid write requested by a click in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    PlaceRobot,
    ToggleObstacle,
    PlaceResource,
    PlacePanel,
}

impl EditCommand {
    /// Left places a robot, Ctrl+Left a panel, Shift+Left or Middle a resource and Right toggles
    /// an obstacle.
    pub fn from_click(button: PointerButton, modifiers: Modifiers) -> Self {
        match button {
            PointerButton::Left if modifiers.ctrl => EditCommand::PlacePanel,
            PointerButton::Left if modifiers.shift => EditCommand::PlaceResource,
            PointerButton::Left => EditCommand::PlaceRobot,
            PointerButton::Right => EditCommand::ToggleObstacle,
            PointerButton::Middle => EditCommand::PlaceResource,
        }
    }
}

/// The cell under window pixel (`x`, `y`) when cells are `cell_size` pixels wide.
pub fn cell_at(x: f32, y: f32, cell_size: f32, grid: &Grid) -> Option<Position> {
    if x < 0.0 || y < 0.0 || cell_size <= 0.0 {
        return None;
    }
    let position = Position::new((y / cell_size) as usize, (x / cell_size) as usize);
    grid.in_bounds(position).then_some(position)
}

pub struct Controller {
    environment: SolarFarmEnvironment,
    agent: RandomAgent,
    mode: Mode,
    tick_interval: f32,
    accumulator: f32,
}

impl Controller {
    /// Start in play mode, stepping the environment `tick_rate` times per second.
    pub fn new(environment: SolarFarmEnvironment, agent: RandomAgent, tick_rate: u32) -> Self {
        Self {
            environment,
            agent,
            mode: Mode::Play,
            tick_interval: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn environment(&self) -> &SolarFarmEnvironment {
        &self.environment
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.accumulator = 0.0;
        debug!(mode = self.mode.label(), "switched mode");
    }

    /// Handle one frame of input. Breaks when the player asked to quit.
    pub fn update(&mut self, input: &FrameInput, cell_size: f32) -> ControlFlow<()> {
        if input.quit {
            return ControlFlow::Break(());
        }
        if input.toggle_mode {
            self.toggle_mode();
        }
        if self.mode == Mode::Edit {
            for click in &input.clicks {
                self.handle_click(click, cell_size);
            }
        }
        self.advance(input.dt);
        ControlFlow::Continue(())
    }

    fn handle_click(&mut self, click: &Click, cell_size: f32) {
        let Some(position) = cell_at(click.x, click.y, cell_size, self.environment.farm().grid())
        else {
            debug!(x = click.x, y = click.y, "ignoring click outside the grid");
            return;
        };
        let command = EditCommand::from_click(click.button, click.modifiers);
        if let Err(error) = self.apply_edit(command, position) {
            debug!(%error, ?command, "edit rejected");
        }
    }

    pub fn apply_edit(
        &mut self,
        command: EditCommand,
        position: Position,
    ) -> Result<(), GridError> {
        match command {
            EditCommand::PlaceRobot => self.environment.place_robot(position).map(|_| ()),
            EditCommand::ToggleObstacle => self.environment.toggle_obstacle(position).map(|_| ()),
            EditCommand::PlaceResource => self.environment.place_resource(position),
            EditCommand::PlacePanel => self.environment.place_panel(position),
        }
    }

    /// Run however many ticks `dt` seconds are worth in play mode. Returns the number of ticks.
    pub fn advance(&mut self, dt: f32) -> usize {
        if self.mode != Mode::Play {
            return 0;
        }
        self.accumulator += dt.max(0.0);
        let mut ticks = 0;
        while self.accumulator >= self.tick_interval {
            if ticks == MAX_TICKS_PER_FRAME {
                self.accumulator = 0.0;
                break;
            }
            self.tick();
            self.accumulator -= self.tick_interval;
            ticks += 1;
        }
        ticks
    }

    /// One simulation step with an action for every robot. Starts a new episode once the
    /// current one is done.
    pub fn tick(&mut self) {
        let actions = self.agent.act(&self.environment.observation());
        let outcome = self.environment.step(&actions);
        if outcome.done {
            info!(score = self.environment.score(), "episode finished");
            self.environment.reset();
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            "MODE: {} (Space = toggle) | STEP: {}/{} | SCORE: {:.1} | [ESC] quit",
            self.mode.label(),
            self.environment.step_count(),
            self.environment.max_steps(),
            self.environment.score()
        )
    }
}
