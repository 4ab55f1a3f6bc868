//! Liminal: first-person survival horror in an endless maze
//!
//! An infinite concrete labyrinth streams in around the player while
//! something follows them through it:
//! - Chunk-streamed procedural maze (no persistent map)
//! - A single relentless pursuer with wall-sliding and stuck recovery
//! - Five fragments to collect, then a timed escape to the exit
//! - Procedural audio cues, no sound assets

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod audio;
mod collision;
mod config;
mod player;
mod render;
mod session;
mod stalker;
mod state;
mod world;

use macroquad::prelude::*;

use audio::AudioEngine;
use config::Tuning;
use player::MoveIntent;
use session::{FrameEvent, Session};

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Liminal v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Poll movement keys into a world-space intent.
/// ZQSD aliases keep AZERTY layouts playable.
fn gather_intent(session: &Session) -> MoveIntent {
    let mut local = Vec2::ZERO;
    if is_key_down(KeyCode::W) || is_key_down(KeyCode::Z) {
        local.y -= 1.0;
    }
    if is_key_down(KeyCode::S) {
        local.y += 1.0;
    }
    if is_key_down(KeyCode::A) || is_key_down(KeyCode::Q) {
        local.x -= 1.0;
    }
    if is_key_down(KeyCode::D) {
        local.x += 1.0;
    }
    let dir = if local.length_squared() > 0.0 {
        session.player.world_intent(local.normalize())
    } else {
        Vec2::ZERO
    };
    MoveIntent {
        dir,
        sprint: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    println!("=== Liminal v{} ===", VERSION);

    let tuning = match config::load_tuning("assets/tuning.ron") {
        Ok(t) => {
            println!("Loaded tuning overrides");
            t
        }
        Err(e) => {
            println!("Using default tuning ({})", e);
            Tuning::default()
        }
    };

    let audio = AudioEngine::new();
    let mut session = Session::new(tuning);
    let mut started = false;
    let mut cursor_released = false;
    let mut last_mouse = {
        let (x, y) = mouse_position();
        vec2(x, y)
    };

    loop {
        let elapsed = get_time() as f32;

        // Title screen until the first click; the click also unlocks
        // audio and grabs the cursor, matching what players expect
        // from a pointer-locked game
        if !started {
            render::draw_scene(&session, elapsed);
            render::draw_title();
            if is_mouse_button_pressed(MouseButton::Left) {
                started = true;
                set_cursor_grab(true);
                show_mouse(false);
                audio.start();
                let (x, y) = mouse_position();
                last_mouse = vec2(x, y);
            }
            next_frame().await;
            continue;
        }

        let dt = get_frame_time();

        let (mx, my) = mouse_position();
        let mouse = vec2(mx, my);
        let look_delta = mouse - last_mouse;
        last_mouse = mouse;
        if !session.state.is_over() {
            session
                .player
                .look(look_delta, session.tuning.mouse_sensitivity);
        }

        session.tick(gather_intent(&session), dt);
        audio.set_stress(session.pursuit_stress());

        for event in session.drain_events() {
            match event {
                FrameEvent::Footstep => audio.footstep(),
                FrameEvent::FragmentCollected => audio.fragment_collected(),
                FrameEvent::ExitSpawned => audio.exit_spawned(),
                FrameEvent::Lost => audio.captured(),
                FrameEvent::Won => audio.escaped(),
            }
        }

        if session.state.is_over() && !cursor_released {
            cursor_released = true;
            set_cursor_grab(false);
            show_mouse(true);
        }

        render::draw_scene(&session, elapsed);
        render::draw_hud(&session);
        if let Some(outcome) = session.state.outcome {
            render::draw_end_screen(outcome);
        }

        next_frame().await;
    }
}
