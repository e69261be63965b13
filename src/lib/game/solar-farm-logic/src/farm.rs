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

use serde::Serialize;
use tracing::debug;

use crate::{Action, CellKind, Grid, GridError, Position, Robot, RobotId};

/// What happened when a robot tried an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The robot moved.
    Moved {
        /// Cell the robot left.
        from: Position,

        /// Cell the robot entered.
        to: Position,
    },

    /// The robot picked up a resource.
    Collected,

    /// The robot built a panel.
    Built,

    /// The action was illegal and nothing changed.
    NoOp,
}

/// A grid together with the robots standing on it.
///
/// The farm keeps the robot list and the grid's occupants in agreement: robot `i` is at `p` if
/// and only if the cell at `p` names robot `i` as its occupant. No robot ever stands on an
/// obstacle and no cell ever holds two robots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Farm {
    grid: Grid,
    robots: Vec<Robot>,
}

impl std::fmt::Display for Farm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.grid, f)
    }
}

impl Farm {
    /// Create a farm with no robots on `grid`.
    pub fn new(mut grid: Grid) -> Self {
        grid.clear_occupants();
        Self {
            grid,
            robots: Vec::new(),
        }
    }

    /// The grid, including robot occupants.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// All robots, indexed by `RobotId`.
    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    /// Get a robot.
    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id.0)
    }

    /// Remove every robot and reset every cell to empty ground.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.robots.clear();
    }

    /// Place a new robot at `position`. Fails if the cell is outside the grid, is an obstacle or
    /// already holds a robot.
    pub fn place_robot(&mut self, position: Position) -> Result<RobotId, GridError> {
        let cell = self
            .grid
            .get(position)
            .ok_or(GridError::OutOfBounds(position))?;
        if let Some(occupant) = cell.occupant {
            return Err(GridError::CellOccupied { position, occupant });
        }
        if cell.kind == CellKind::Obstacle {
            return Err(GridError::Obstacle(position));
        }

        let id = RobotId(self.robots.len());
        self.grid.set_occupant(position, Some(id))?;
        self.robots.push(Robot {
            id,
            position,
            carried: 0,
        });
        debug!(robot = %id, %position, "placed robot");
        Ok(id)
    }

    /// Turn the cell into an obstacle, or back into empty ground if it already is one. Returns
    /// the new terrain. Fails if a robot stands on the cell.
    pub fn toggle_obstacle(&mut self, position: Position) -> Result<CellKind, GridError> {
        let cell = self
            .grid
            .get(position)
            .ok_or(GridError::OutOfBounds(position))?;
        let kind = match (cell.kind, cell.occupant) {
            (CellKind::Obstacle, _) => CellKind::Empty,
            (_, Some(occupant)) => return Err(GridError::CellOccupied { position, occupant }),
            (_, None) => CellKind::Obstacle,
        };
        self.grid.set_kind(position, kind)?;
        Ok(kind)
    }

    /// Put a resource on the cell, replacing whatever terrain was there.
    pub fn place_resource(&mut self, position: Position) -> Result<(), GridError> {
        self.grid.set_kind(position, CellKind::Resource)
    }

    /// Put a panel on the cell, replacing whatever terrain was there.
    pub fn place_panel(&mut self, position: Position) -> Result<(), GridError> {
        self.grid.set_kind(position, CellKind::Panel)
    }

    fn move_target(&self, robot: &Robot, action: Action) -> Option<Position> {
        let direction = action.direction()?;
        let target = robot
            .position
            .step(direction, self.grid.height(), self.grid.width())?;
        let cell = self.grid.get(target)?;
        (cell.kind != CellKind::Obstacle && cell.occupant.is_none()).then_some(target)
    }

    /// Whether `action` would change anything for robot `id`. Building needs `panel_cost`
    /// carried resources.
    pub fn is_legal(&self, id: RobotId, action: Action, panel_cost: u32) -> bool {
        let Some(robot) = self.robot(id) else {
            return false;
        };
        match action {
            Action::MoveUp | Action::MoveDown | Action::MoveLeft | Action::MoveRight => {
                self.move_target(robot, action).is_some()
            }
            Action::Collect => self.grid.kind(robot.position) == Some(CellKind::Resource),
            Action::Build => {
                self.grid.kind(robot.position) == Some(CellKind::Empty)
                    && robot.carried >= panel_cost
            }
        }
    }

    /// The subset of the fixed action set that is legal for robot `id`, in `Action::ALL` order.
    pub fn legal_actions(&self, id: RobotId, panel_cost: u32) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| self.is_legal(id, action, panel_cost))
            .collect()
    }

    /// Apply one action for robot `id`. Illegal actions, including actions for robots that do
    /// not exist, leave the farm unchanged.
    pub fn apply(&mut self, id: RobotId, action: Action, panel_cost: u32) -> ActionOutcome {
        if !self.is_legal(id, action, panel_cost) {
            return ActionOutcome::NoOp;
        }
        let robot = self.robots[id.0];

        match action {
            Action::MoveUp | Action::MoveDown | Action::MoveLeft | Action::MoveRight => {
                let from = robot.position;
                let Some(to) = self.move_target(&robot, action) else {
                    return ActionOutcome::NoOp;
                };
                let Ok(()) = self.grid.move_occupant(from, to) else {
                    return ActionOutcome::NoOp;
                };
                self.robots[id.0].position = to;
                ActionOutcome::Moved { from, to }
            }
            Action::Collect => {
                let Ok(()) = self.grid.set_kind(robot.position, CellKind::Empty) else {
                    return ActionOutcome::NoOp;
                };
                self.robots[id.0].carried += 1;
                ActionOutcome::Collected
            }
            Action::Build => {
                let Ok(()) = self.grid.set_kind(robot.position, CellKind::Panel) else {
                    return ActionOutcome::NoOp;
                };
                self.robots[id.0].carried -= panel_cost;
                ActionOutcome::Built
            }
        }
    }
}
