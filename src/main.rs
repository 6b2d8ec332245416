// Headless walk-mesh demo.
// Generates a level, then drives the player with scripted input at a fixed
// 60 Hz step. Set RUST_LOG=info (or debug) to follow the session.
//
//   CRATES_SEED    level and session seed (u64)
//   CRATES_FRAMES  number of frames to simulate (u32)

use std::str::FromStr;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crates_walk::engine::input::{InputState, MoveKey};
use crates_walk::{Game, GameConfig};

// ============================================================================
// CONSTANTS
// ============================================================================

const DEFAULT_SEED: u64 = 0;
const DEFAULT_FRAMES: u32 = 3600;
const FRAME_DT: f32 = 1.0 / 60.0;
const FRAMES_PER_SECOND: u32 = 60;
/// Scripted input picks a new key and mouse sweep this often.
const SCRIPT_INTERVAL: u32 = 45;
const WINDOW_HEIGHT: u32 = 720;

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring unparsable {name}={raw:?}");
            default
        }),
        Err(_) => default,
    }
}

/// Hold a random movement key and queue a small mouse turn.
fn script_input(input: &mut InputState, rng: &mut StdRng) {
    const KEYS: [MoveKey; 4] = [MoveKey::Forward, MoveKey::Backward, MoveKey::Left, MoveKey::Right];
    for key in KEYS {
        input.release(key);
    }
    // Mostly forward, like a player exploring.
    let key = if rng.gen_bool(0.6) { MoveKey::Forward } else { KEYS[rng.gen_range(0..KEYS.len())] };
    input.press(key);
    input.mouse_motion(rng.gen_range(-120.0..120.0), rng.gen_range(-20.0..20.0));
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();

    let seed = env_or("CRATES_SEED", DEFAULT_SEED);
    let frames = env_or("CRATES_FRAMES", DEFAULT_FRAMES);

    let mut game = match Game::new(GameConfig::default(), seed) {
        Ok(game) => game,
        Err(e) => {
            error!("failed to build level: {e}");
            std::process::exit(1);
        }
    };

    let mut input = InputState::new(WINDOW_HEIGHT);
    input.mouse_captured = true;
    let mut script = StdRng::seed_from_u64(seed.wrapping_add(1));

    for frame in 0..frames {
        if frame % SCRIPT_INTERVAL == 0 {
            script_input(&mut input, &mut script);
        }
        game.update(&input, FRAME_DT);
        input.end_frame();

        let status = game.status();
        if (frame + 1) % FRAMES_PER_SECOND == 0 {
            info!(
                "t={:>5.1}s | pos {:.2} | buttons {}/{}",
                (frame + 1) as f32 * FRAME_DT,
                game.player_position(),
                status.buttons_collected,
                status.buttons_total
            );
        }
        if status.lost {
            info!("caught after {} frames", frame + 1);
            return;
        }
        if status.won() {
            info!("all buttons collected after {} frames", frame + 1);
            return;
        }
    }

    let status = game.status();
    info!(
        "finished {frames} frames: {}/{} buttons, player at {:.2}",
        status.buttons_collected,
        status.buttons_total,
        game.player_position()
    );
}
