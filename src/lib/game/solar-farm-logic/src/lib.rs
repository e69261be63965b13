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

//! Solar farm grid logic.
//!
//! Robots walk a fixed-size grid, collect resources and build solar panels. A panel produces a
//! base rate plus a bonus for every orthogonally adjacent panel. This library only knows about
//! the grid, the robots on it and the rules for a single robot action; episodes, scoring and
//! agents live elsewhere.

use serde::{Deserialize, Serialize};

mod farm;
mod grid;

pub use farm::{ActionOutcome, Farm};
pub use grid::Grid;

/// Solar farm grid error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Position lies outside the grid.
    #[error("position is out of bounds: {0}")]
    OutOfBounds(Position),

    /// Another robot already stands on the cell.
    #[error("cell is occupied by robot {occupant}: {position}")]
    CellOccupied {
        /// Where the placement was attempted.
        position: Position,

        /// The robot already standing there.
        occupant: RobotId,
    },

    /// Robots cannot stand on obstacles.
    #[error("cell is an obstacle: {0}")]
    Obstacle(Position),

    /// Grids need at least one row and one column.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested number of columns.
        width: usize,

        /// Requested number of rows.
        height: usize,
    },
}

/// Zero-based grid coordinate. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Row, counted from the top.
    pub row: usize,

    /// Column, counted from the left.
    pub col: usize,
}

impl Position {
    /// Create a new position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighboring position one cell away in `direction`, or `None` if that would leave a
    /// `height` x `width` grid.
    pub fn step(self, direction: Direction, height: usize, width: usize) -> Option<Position> {
        let (row, col) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row + 1, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col + 1),
        };
        (row < height && col < width).then_some(Position { row, col })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four orthogonal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0.
    Up,

    /// Away from row 0.
    Down,

    /// Towards column 0.
    Left,

    /// Away from column 0.
    Right,
}

impl Direction {
    /// All four orthogonal directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// What a cell contains, ignoring robots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    /// Bare ground. Panels can be built here.
    #[default]
    Empty,

    /// Impassable.
    Obstacle,

    /// A resource a robot can collect.
    Resource,

    /// A solar panel.
    Panel,
}

/// Robot identifier. Robots are numbered in placement order starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(pub usize);

impl std::fmt::Display for RobotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Solar farm cell. Part of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Terrain of the cell.
    pub kind: CellKind,

    /// Robot standing on the cell, if any.
    pub occupant: Option<RobotId>,
}

/// A robot on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Robot {
    /// Identifier, equal to the robot's index in the farm.
    pub id: RobotId,

    /// Current cell.
    pub position: Position,

    /// Number of resources collected and not yet spent.
    pub carried: u32,
}

/// An action a single robot can take in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move one row up.
    MoveUp,

    /// Move one row down.
    MoveDown,

    /// Move one column left.
    MoveLeft,

    /// Move one column right.
    MoveRight,

    /// Pick up the resource under the robot.
    Collect,

    /// Build a panel on the empty cell under the robot.
    Build,
}

impl Action {
    /// The fixed action set.
    pub const ALL: [Action; 6] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Collect,
        Action::Build,
    ];

    /// Direction of a move action, `None` for the others.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::Up),
            Action::MoveDown => Some(Direction::Down),
            Action::MoveLeft => Some(Direction::Left),
            Action::MoveRight => Some(Direction::Right),
            Action::Collect | Action::Build => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::MoveUp => "Up",
            Action::MoveDown => "Down",
            Action::MoveLeft => "Left",
            Action::MoveRight => "Right",
            Action::Collect => "Collect",
            Action::Build => "Build",
        };
        f.write_str(name)
    }
}

/// Panel production rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelRates {
    /// Output of a panel with no neighboring panels.
    pub base_rate: f64,

    /// Extra output per orthogonally adjacent panel.
    pub bonus_per_adjacent_panel: f64,
}

impl Default for PanelRates {
    fn default() -> Self {
        Self {
            base_rate: 1.0,
            bonus_per_adjacent_panel: 1.0,
        }
    }
}

impl PanelRates {
    /// Output of one panel with `adjacent_panels` orthogonal panel neighbors.
    pub fn output(&self, adjacent_panels: usize) -> f64 {
        self.base_rate + self.bonus_per_adjacent_panel * adjacent_panels as f64
    }
}
