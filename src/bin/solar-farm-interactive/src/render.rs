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

//! macroquad input polling and drawing.

use std::path::Path;

use macroquad::prelude::*;
use solar_farm_logic::CellKind;
use tracing::{info, warn};

use crate::controller::{Click, Controller, FrameInput, Mode, Modifiers, PointerButton};

/// Height of the status area below the grid, in pixels.
pub const STATUS_HEIGHT: f32 = 80.0;

const COLOR_BACKGROUND: Color = Color::new(30.0 / 255.0, 30.0 / 255.0, 30.0 / 255.0, 1.0);
const COLOR_GRID: Color = Color::new(200.0 / 255.0, 200.0 / 255.0, 200.0 / 255.0, 1.0);
const COLOR_ROBOT: Color = Color::new(1.0, 100.0 / 255.0, 100.0 / 255.0, 1.0);
const COLOR_OBSTACLE: Color = Color::new(70.0 / 255.0, 70.0 / 255.0, 70.0 / 255.0, 1.0);
const COLOR_RESOURCE: Color = Color::new(0.0, 1.0, 0.0, 1.0);
const COLOR_PANEL: Color = Color::new(1.0, 1.0, 100.0 / 255.0, 1.0);
const COLOR_SAND: Color = Color::new(180.0 / 255.0, 170.0 / 255.0, 120.0 / 255.0, 1.0);
const COLOR_TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);

const EDIT_HINT: &str =
    "Left: robot | Right: obstacle | Middle or Shift+Left: resource | Ctrl+Left: panel";

/// Optional textures. Any that are missing are drawn as colored squares.
#[derive(Default)]
pub struct Sprites {
    robot: Option<Texture2D>,
    obstacle: Option<Texture2D>,
    resource: Option<Texture2D>,
    panel: Option<Texture2D>,
    sand: Option<Texture2D>,
}

impl Sprites {
    /// Load `robot.png`, `obstacle.png`, `resource.png`, `panel.png` and `sand.png` from `dir`.
    pub async fn load(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::default();
        };
        let sprites = Self {
            robot: load_sprite(dir, "robot.png").await,
            obstacle: load_sprite(dir, "obstacle.png").await,
            resource: load_sprite(dir, "resource.png").await,
            panel: load_sprite(dir, "panel.png").await,
            sand: load_sprite(dir, "sand.png").await,
        };
        info!(dir = %dir.display(), "loaded sprites");
        sprites
    }
}

async fn load_sprite(dir: &Path, name: &str) -> Option<Texture2D> {
    let path = dir.join(name);
    match load_texture(&path.to_string_lossy()).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            Some(texture)
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "sprite not found, using a colored square");
            None
        }
    }
}

/// Poll keyboard and pointer state for this frame.
pub fn gather_input() -> FrameInput {
    let modifiers = Modifiers {
        ctrl: is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl),
        shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
    };
    let (x, y) = mouse_position();
    let clicks = [
        (MouseButton::Left, PointerButton::Left),
        (MouseButton::Right, PointerButton::Right),
        (MouseButton::Middle, PointerButton::Middle),
    ]
    .into_iter()
    .filter(|(mouse_button, _)| is_mouse_button_pressed(*mouse_button))
    .map(|(_, button)| Click {
        x,
        y,
        button,
        modifiers,
    })
    .collect();

    FrameInput {
        toggle_mode: is_key_pressed(KeyCode::Space),
        quit: is_key_pressed(KeyCode::Escape),
        clicks,
        dt: get_frame_time(),
    }
}

fn draw_tile(texture: Option<&Texture2D>, fallback: Color, x: f32, y: f32, size: f32) {
    match texture {
        Some(texture) => draw_texture_ex(
            texture,
            x,
            y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(size, size)),
                ..Default::default()
            },
        ),
        None => draw_rectangle(x, y, size, size, fallback),
    }
}

pub fn draw(controller: &Controller, sprites: &Sprites, cell_size: f32) {
    clear_background(COLOR_BACKGROUND);

    let environment = controller.environment();
    let farm = environment.farm();
    let grid = farm.grid();
    let origin = |row: usize, col: usize| (col as f32 * cell_size, row as f32 * cell_size);

    for position in grid.positions() {
        let (x, y) = origin(position.row, position.col);
        draw_tile(sprites.sand.as_ref(), COLOR_SAND, x, y, cell_size);
        match grid.kind(position) {
            Some(CellKind::Obstacle) => {
                draw_tile(sprites.obstacle.as_ref(), COLOR_OBSTACLE, x, y, cell_size)
            }
            Some(CellKind::Resource) => {
                draw_tile(sprites.resource.as_ref(), COLOR_RESOURCE, x, y, cell_size)
            }
            Some(CellKind::Panel) => {
                draw_tile(sprites.panel.as_ref(), COLOR_PANEL, x, y, cell_size);
                let output = environment.compute_panel_output(position);
                draw_text(
                    &format!("{:.1}", output),
                    x + 4.0,
                    y + cell_size - 6.0,
                    cell_size / 3.0,
                    BLACK,
                );
            }
            Some(CellKind::Empty) | None => {}
        }
    }

    for robot in farm.robots() {
        let (x, y) = origin(robot.position.row, robot.position.col);
        draw_tile(sprites.robot.as_ref(), COLOR_ROBOT, x, y, cell_size);
        if robot.carried > 0 {
            draw_text(
                &robot.carried.to_string(),
                x + 4.0,
                y + cell_size / 3.0,
                cell_size / 3.0,
                BLACK,
            );
        }
    }

    for position in grid.positions() {
        let (x, y) = origin(position.row, position.col);
        draw_rectangle_lines(x, y, cell_size, cell_size, 1.0, COLOR_GRID);
    }

    let status_top = grid.height() as f32 * cell_size;
    draw_text(
        &controller.status_line(),
        10.0,
        status_top + 28.0,
        20.0,
        COLOR_TEXT,
    );
    if controller.mode() == Mode::Edit {
        draw_text(EDIT_HINT, 10.0, status_top + 56.0, 18.0, COLOR_TEXT);
    }
}
