//! Scene and HUD drawing
//!
//! Everything is immediate-mode macroquad with flat colors: the
//! simulation hands over positions and sizes, this module decides how
//! they look on screen and nothing flows back the other way.

use macroquad::prelude::*;

use crate::player::EYE_HEIGHT;
use crate::session::{Session, EXIT_POS};
use crate::state::Outcome;

const FLOOR_COLOR: Color = Color::new(0.22, 0.21, 0.20, 1.0);
const WALL_COLOR: Color = Color::new(0.42, 0.42, 0.42, 1.0);
const BACKGROUND: Color = Color::new(0.04, 0.04, 0.05, 1.0);

/// Draw the 3D scene from the player's eyes
pub fn draw_scene(session: &Session, elapsed: f32) {
    clear_background(BACKGROUND);

    let p = &session.player;
    let eye = p.position + vec3(0.0, EYE_HEIGHT + p.bob_offset, 0.0);
    set_camera(&Camera3D {
        position: eye,
        target: eye + p.facing(),
        up: vec3(0.0, 1.0, 0.0),
        ..Default::default()
    });

    let half = session.tuning.chunk_size * 0.5;
    for chunk in session.world.chunks() {
        let center = chunk.coord.world_center(session.tuning.chunk_size);
        draw_plane(center, vec2(half, half), None, FLOOR_COLOR);
        for wall in &chunk.walls {
            draw_cube(wall.center, wall.size, None, WALL_COLOR);
            draw_cube_wires(wall.center, wall.size, Color::new(0.1, 0.1, 0.1, 1.0));
        }
    }

    for fragment in &session.world.fragments {
        let bob = (elapsed * 3.0).sin() * 0.2;
        let pos = fragment.position + vec3(0.0, bob, 0.0);
        let pulse = 0.7 + (elapsed * 5.0).sin() * 0.3;
        draw_cube(pos, vec3(0.3, 0.3, 0.3), None, Color::new(0.0, pulse, pulse, 1.0));
        draw_cube_wires(pos, vec3(0.55, 0.55, 0.55), Color::new(1.0, 1.0, 1.0, 0.4));
    }

    if let Some(exit) = session.world.exit {
        // Door frame with a glowing slab inside it
        draw_cube(exit + vec3(0.0, 2.5, 0.0), vec3(3.0, 5.0, 0.5), None, Color::new(0.07, 0.07, 0.07, 1.0));
        draw_cube(exit + vec3(0.0, 2.5, 0.3), vec3(2.5, 4.5, 0.1), None, WHITE);
        draw_line_3d(
            p.position + vec3(0.0, 0.5, 0.0),
            EXIT_POS + vec3(0.0, 0.5, 0.0),
            WHITE,
        );
    }

    draw_stalker(session);

    set_default_camera();
}

fn draw_stalker(session: &Session) {
    let s = &session.stalker;
    let breath = 1.0 + (s.time_alive * 4.0).sin() * 0.05;
    let mut body = s.position + vec3(0.0, 1.5, 0.0);
    if s.trembling {
        body.x += macroquad::rand::gen_range(-0.075, 0.075);
        body.z += macroquad::rand::gen_range(-0.075, 0.075);
    }
    draw_cube(
        body,
        vec3(1.0 * breath, 1.5 * breath, 1.0 * breath),
        None,
        Color::new(0.29, 0.0, 0.0, 1.0),
    );
    let head = s.position + vec3(0.0, 2.4, 0.0);
    draw_sphere(head, 0.35, None, Color::new(0.87, 0.87, 0.87, 1.0));
    // Eye glow sits on the side of the skull that faces its heading
    let facing = vec3(s.yaw.sin(), 0.0, s.yaw.cos());
    draw_sphere(head + facing * 0.3, 0.08, None, RED);
}

/// HUD pass, drawn after `draw_scene` under the default camera
pub fn draw_hud(session: &Session) {
    let sw = screen_width();
    let sh = screen_height();
    let state = &session.state;
    let t = &session.tuning;

    if !state.exit_spawned {
        let text = format!(
            "FRAGMENTS  {} / {}",
            state.fragments_collected, t.fragment_goal
        );
        draw_text(&text, 24.0, sh - 56.0, 28.0, Color::new(0.0, 0.9, 0.9, 0.9));
    } else {
        // Countdown, shaking once the clock gets short
        let panic = ((t.escape_time - state.time_left) / t.escape_time).clamp(0.0, 1.0);
        draw_rectangle(0.0, 0.0, sw, sh, Color::new(0.25, 0.0, 0.0, panic * 0.5));

        let text = format!("{:05.2}", state.time_left);
        let dims = measure_text(&text, None, 48, 1.0);
        let mut x = (sw - dims.width) * 0.5;
        let mut y = 72.0;
        if state.time_left < 20.0 {
            let shake = panic * 5.0;
            x += macroquad::rand::gen_range(-shake, shake);
            y += macroquad::rand::gen_range(-shake, shake);
        }
        draw_text(&text, x, y, 48.0, Color::new(1.0, 0.25, 0.25, 1.0));
    }

    // Stamina bar
    let bar_w = 220.0;
    let fill = session.player.stamina / 100.0;
    let color = if session.player.sprinting {
        Color::new(0.8, 0.33, 0.33, 0.9)
    } else {
        Color::new(0.47, 0.2, 0.2, 0.9)
    };
    draw_rectangle(24.0, sh - 40.0, bar_w, 10.0, Color::new(0.1, 0.1, 0.1, 0.8));
    draw_rectangle(24.0, sh - 40.0, bar_w * fill, 10.0, color);

    // Stalker proximity vignette
    let stress = session.pursuit_stress();
    if stress > 0.0 {
        draw_rectangle(0.0, 0.0, sw, sh, Color::new(0.1, 0.0, 0.0, stress * 0.25));
    }

}

/// Title overlay shown before the first click
pub fn draw_title() {
    let sw = screen_width();
    let sh = screen_height();
    draw_rectangle(0.0, 0.0, sw, sh, Color::new(0.0, 0.0, 0.0, 0.75));

    let title = "L I M I N A L";
    let dims = measure_text(title, None, 72, 1.0);
    draw_text(title, (sw - dims.width) * 0.5, sh * 0.4, 72.0, WHITE);

    for (i, line) in [
        "Collect 5 fragments. Find the exit. Do not be caught.",
        "WASD move - SHIFT sprint - mouse look",
        "CLICK TO DESCEND",
    ]
    .iter()
    .enumerate()
    {
        let dims = measure_text(line, None, 26, 1.0);
        draw_text(
            line,
            (sw - dims.width) * 0.5,
            sh * 0.5 + i as f32 * 36.0,
            26.0,
            Color::new(0.8, 0.8, 0.8, 0.9),
        );
    }
}

/// Terminal overlay once the session has resolved
pub fn draw_end_screen(outcome: Outcome) {
    let sw = screen_width();
    let sh = screen_height();
    let (backdrop, title, sub) = match outcome {
        Outcome::Won => (
            Color::new(0.0, 0.0, 0.0, 0.85),
            "SUBJECT RELEASED",
            "VITAL SIGNS STABLE. MEMORY WIPED.",
        ),
        Outcome::Lost => (
            Color::new(0.15, 0.0, 0.0, 0.9),
            "CONSUMED",
            "BIOLOGICAL MATERIAL RECYCLED.",
        ),
    };
    draw_rectangle(0.0, 0.0, sw, sh, backdrop);

    let dims = measure_text(title, None, 72, 1.0);
    draw_text(title, (sw - dims.width) * 0.5, sh * 0.45, 72.0, WHITE);
    let dims = measure_text(sub, None, 28, 1.0);
    draw_text(sub, (sw - dims.width) * 0.5, sh * 0.45 + 48.0, 28.0, Color::new(0.7, 0.7, 0.7, 1.0));
}
