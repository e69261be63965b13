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

use serde::{Deserialize, Serialize};

use crate::{Cell, CellKind, Direction, GridError, PanelRates, Position, RobotId};

/// Solar farm grid. Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

// print out cells, and row and column numbers which start at 0.
impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity((self.width * 2 + 4) * (self.height + 1));

        s.push_str("  ");
        for col in 0..self.width {
            s.push_str(&format!("{}", col % 10));
            if col == self.width - 1 {
                s.push('\n');
            } else {
                s.push(' ');
            }
        }

        for row in 0..self.height {
            s.push_str(&format!("{} ", row % 10));
            for col in 0..self.width {
                let cell = self.cells[row * self.width + col];
                let c = match (cell.occupant, cell.kind) {
                    (Some(_), _) => 'R',
                    (None, CellKind::Empty) => '.',
                    (None, CellKind::Obstacle) => '#',
                    (None, CellKind::Resource) => '*',
                    (None, CellKind::Panel) => 'P',
                };
                s.push(c);
                if col < self.width - 1 {
                    s.push(' ');
                }
            }
            if row < self.height - 1 {
                s.push('\n');
            }
        }
        write!(f, "{}", s)
    }
}

impl Grid {
    /// Create an empty grid with `width` columns and `height` rows.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let len = width.checked_mul(height).ok_or(invalid)?;
        Ok(Self {
            cells: vec![Cell::default(); len],
            width,
            height,
        })
    }

    /// Create an empty `size` x `size` grid.
    pub fn square(size: usize) -> Result<Self, GridError> {
        Self::new(size, size)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `position` lies inside the grid.
    pub fn in_bounds(&self, position: Position) -> bool {
        position.row < self.height && position.col < self.width
    }

    fn index(&self, position: Position) -> Result<usize, GridError> {
        if self.in_bounds(position) {
            Ok(position.row * self.width + position.col)
        } else {
            Err(GridError::OutOfBounds(position))
        }
    }

    /// Get a cell.
    pub fn get(&self, position: Position) -> Option<Cell> {
        self.index(position).ok().map(|index| self.cells[index])
    }

    /// Get the terrain of a cell.
    pub fn kind(&self, position: Position) -> Option<CellKind> {
        self.get(position).map(|cell| cell.kind)
    }

    /// Whether the cell at `position` is a panel. Out of bounds positions are not.
    pub fn is_panel(&self, position: Position) -> bool {
        self.kind(position) == Some(CellKind::Panel)
    }

    /// Overwrite the terrain of a cell. Robots standing on the cell are left alone.
    pub fn set_kind(&mut self, position: Position, kind: CellKind) -> Result<(), GridError> {
        let index = self.index(position)?;
        self.cells[index].kind = kind;
        Ok(())
    }

    pub(crate) fn set_occupant(
        &mut self,
        position: Position,
        occupant: Option<RobotId>,
    ) -> Result<(), GridError> {
        let index = self.index(position)?;
        self.cells[index].occupant = occupant;
        Ok(())
    }

    /// Move the occupant of `from` onto `to`. Both cells are checked before either is written,
    /// so a failed move changes nothing.
    pub(crate) fn move_occupant(&mut self, from: Position, to: Position) -> Result<(), GridError> {
        let from = self.index(from)?;
        let to = self.index(to)?;
        self.cells[to].occupant = self.cells[from].occupant.take();
        Ok(())
    }

    pub(crate) fn clear_occupants(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.occupant = None;
        }
    }

    /// Reset every cell to empty ground with no robots.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |col| Position::new(row, col)))
    }

    /// In-bounds orthogonal neighbors of `position`.
    pub fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| position.step(direction, self.height, self.width))
    }

    /// Number of cells of the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|cell| cell.kind == kind).count()
    }

    /// Number of orthogonal neighbors of `position` that are panels. Diagonals never count.
    pub fn adjacent_panels(&self, position: Position) -> usize {
        self.neighbors(position)
            .filter(|&neighbor| self.is_panel(neighbor))
            .count()
    }

    /// Electricity produced by the cell at `position`: the base rate plus a bonus per adjacent
    /// panel if the cell is a panel, zero otherwise.
    pub fn panel_output(&self, position: Position, rates: &PanelRates) -> f64 {
        if self.is_panel(position) {
            rates.output(self.adjacent_panels(position))
        } else {
            0.0
        }
    }

    /// Electricity produced by every panel on the grid.
    pub fn total_panel_output(&self, rates: &PanelRates) -> f64 {
        self.positions()
            .map(|position| self.panel_output(position, rates))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    const RATES: PanelRates = PanelRates {
        base_rate: 1.0,
        bonus_per_adjacent_panel: 0.5,
    };

    #[test]
    fn test_zero_sized_grid_is_rejected() {
        assert_eq!(
            Grid::new(0, 3),
            Err(GridError::InvalidDimensions {
                width: 0,
                height: 3
            })
        );
        assert!(Grid::square(0).is_err());
    }

    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        assert_eq!(
            Grid::new(usize::MAX, 2),
            Err(GridError::InvalidDimensions {
                width: usize::MAX,
                height: 2
            })
        );
        assert!(Grid::square(usize::MAX).is_err());
    }

    #[test]
    fn test_grid_starts_empty() {
        let grid = Grid::new(5, 3).expect("grid");
        assert_eq!(grid.positions().count(), 15);
        for position in grid.positions() {
            assert_eq!(grid.get(position), Some(Cell::default()), "{}", position);
        }
    }

    #[test]
    fn test_out_of_bounds_writes_are_errors() {
        let mut grid = Grid::square(2).expect("grid");
        let outside = Position::new(2, 0);
        assert_eq!(grid.get(outside), None);
        assert_eq!(
            grid.set_kind(outside, CellKind::Panel),
            Err(GridError::OutOfBounds(outside))
        );
    }

    #[test]
    fn test_corner_has_two_neighbors() {
        let grid = Grid::square(3).expect("grid");
        assert_eq!(grid.neighbors(Position::new(0, 0)).count(), 2);
        assert_eq!(grid.neighbors(Position::new(0, 1)).count(), 3);
        assert_eq!(grid.neighbors(Position::new(1, 1)).count(), 4);
    }

    #[test]
    fn test_isolated_panel_yields_base_rate() {
        let mut grid = Grid::square(5).expect("grid");
        let center = Position::new(2, 2);
        grid.set_kind(center, CellKind::Panel).expect("set");
        assert_relative_eq!(grid.panel_output(center, &RATES), RATES.base_rate);
    }

    #[test]
    fn test_surrounded_panel_yields_four_bonuses() {
        let mut grid = Grid::square(5).expect("grid");
        let center = Position::new(2, 2);
        grid.set_kind(center, CellKind::Panel).expect("set");
        for neighbor in grid.neighbors(center).collect::<Vec<_>>() {
            grid.set_kind(neighbor, CellKind::Panel).expect("set");
        }
        assert_eq!(grid.adjacent_panels(center), 4);
        assert_relative_eq!(
            grid.panel_output(center, &RATES),
            RATES.base_rate + 4.0 * RATES.bonus_per_adjacent_panel
        );
    }

    #[test]
    fn test_diagonal_panels_give_no_bonus() {
        let mut grid = Grid::square(3).expect("grid");
        let center = Position::new(1, 1);
        for position in [
            center,
            Position::new(0, 0),
            Position::new(0, 2),
            Position::new(2, 0),
            Position::new(2, 2),
        ] {
            grid.set_kind(position, CellKind::Panel).expect("set");
        }
        assert_eq!(grid.adjacent_panels(center), 0);
        assert_relative_eq!(grid.panel_output(center, &RATES), RATES.base_rate);
    }

    #[test]
    fn test_non_panel_cell_yields_nothing() {
        let mut grid = Grid::square(3).expect("grid");
        grid.set_kind(Position::new(0, 1), CellKind::Panel).expect("set");
        assert_relative_eq!(grid.panel_output(Position::new(0, 0), &RATES), 0.0);
    }

    #[test]
    fn test_total_output_of_two_adjacent_panels() {
        let mut grid = Grid::square(3).expect("grid");
        grid.set_kind(Position::new(0, 0), CellKind::Panel).expect("set");
        grid.set_kind(Position::new(0, 1), CellKind::Panel).expect("set");
        assert_relative_eq!(grid.total_panel_output(&RATES), 2.0 * 1.5);
    }

    #[test]
    fn test_move_occupant_out_of_bounds_keeps_occupant() {
        let mut grid = Grid::square(2).expect("grid");
        let from = Position::new(1, 1);
        grid.set_occupant(from, Some(RobotId(0))).expect("set");

        let outside = Position::new(1, 2);
        assert_eq!(grid.move_occupant(from, outside), Err(GridError::OutOfBounds(outside)));
        assert_eq!(grid.get(from).and_then(|cell| cell.occupant), Some(RobotId(0)));

        let to = Position::new(0, 1);
        assert_eq!(grid.move_occupant(from, to), Ok(()));
        assert_eq!(grid.get(from).and_then(|cell| cell.occupant), None);
        assert_eq!(grid.get(to).and_then(|cell| cell.occupant), Some(RobotId(0)));
    }

    #[test]
    fn test_display_marks_terrain_and_robots() {
        let mut grid = Grid::new(3, 2).expect("grid");
        grid.set_kind(Position::new(0, 0), CellKind::Obstacle).expect("set");
        grid.set_kind(Position::new(0, 1), CellKind::Resource).expect("set");
        grid.set_kind(Position::new(0, 2), CellKind::Panel).expect("set");
        grid.set_occupant(Position::new(1, 1), Some(RobotId(0))).expect("set");
        assert_eq!(format!("{}", grid), "  0 1 2\n0 # * P\n1 . R .");
    }

    proptest! {
        // Adding panels around a panel never lowers its output.
        #[test]
        fn test_panel_output_is_monotonic_in_adjacent_panels(
            neighbors in prop::collection::vec(any::<bool>(), 4),
            base_rate in 0.0..10.0f64,
            bonus in 0.0..10.0f64,
        ) {
            let rates = PanelRates { base_rate, bonus_per_adjacent_panel: bonus };
            let mut grid = Grid::square(3).expect("grid");
            let center = Position::new(1, 1);
            grid.set_kind(center, CellKind::Panel).expect("set");

            let mut previous = grid.panel_output(center, &rates);
            let around: Vec<Position> = grid.neighbors(center).collect();
            for (neighbor, build) in around.into_iter().zip(neighbors) {
                if !build {
                    continue;
                }
                grid.set_kind(neighbor, CellKind::Panel).expect("set");
                let current = grid.panel_output(center, &rates);
                prop_assert!(current >= previous);
                previous = current;
            }
        }

        #[test]
        fn test_panel_output_matches_formula(
            row in 0..6usize,
            col in 0..6usize,
            panels in prop::collection::vec(any::<bool>(), 36),
        ) {
            let mut grid = Grid::square(6).expect("grid");
            let positions: Vec<Position> = grid.positions().collect();
            for (position, is_panel) in positions.into_iter().zip(panels) {
                if is_panel {
                    grid.set_kind(position, CellKind::Panel).expect("set");
                }
            }
            let position = Position::new(row, col);
            grid.set_kind(position, CellKind::Panel).expect("set");
            let expected = RATES.base_rate
                + RATES.bonus_per_adjacent_panel * grid.adjacent_panels(position) as f64;
            prop_assert!((grid.panel_output(position, &RATES) - expected).abs() < 1e-9);
        }
    }
}
