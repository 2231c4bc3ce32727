//! Cosmic Defender entry point
//!
//! Native builds run a headless session: an autopilot wanders the ship
//! across the arena with autofire on until the run ends or the frame limit
//! is reached. Browser builds export `web::WebGame` from the library,
//! which steps the session from `requestAnimationFrame`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cosmic_defender::audio::LoggingAudio;
    use cosmic_defender::persistence::JsonFileStore;
    use cosmic_defender::platform::{self, FrameLoop, LoopControl, SteppedClock};
    use cosmic_defender::sim::{Direction, GamePhase};
    use cosmic_defender::ui::{HudText, UiStatus};
    use cosmic_defender::{Session, Settings};

    platform::init_logging();
    log::info!("Cosmic Defender (native) starting...");

    let mut settings = Settings::load();
    if !Settings::path().exists() {
        settings.save();
    }
    // No touch controls here, always shoot
    settings.auto_fire = true;
    let max_frames: u64 = std::env::var("COSMIC_DEFENDER_FRAMES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60 * 60 * 5);

    let store = JsonFileStore::new(&settings.best_score_path);
    let mut session = Session::from_settings(&settings, Box::new(store), Some(Box::new(LoggingAudio)))
        .with_observer(|status: &UiStatus| {
            if status.phase == GamePhase::GameOver {
                log::info!(
                    "Final: wave {}, score {}, best {}",
                    status.wave,
                    status.score,
                    status.best_score
                );
            }
        });

    let input = session.input();
    let mut hud = HudText::default();
    let mut frames = FrameLoop::new(SteppedClock::default(), settings.frame_rate);
    let mut started = false;

    frames.start(|now| {
        if !started {
            session.start(now);
            started = true;
        }

        // Sweep left and right, reversing at the walls
        {
            let world = session.world();
            let mut input = input.borrow_mut();
            let x = world.player.pos.x;
            let heading_left = input.held.is_held(Direction::Left);
            let turn = if heading_left {
                x <= 0.0
            } else {
                x >= cosmic_defender::consts::ARENA_WIDTH - cosmic_defender::consts::PLAYER_WIDTH
            };
            let go_left = heading_left != turn;
            input.held.set(Direction::Left, go_left);
            input.held.set(Direction::Right, !go_left);
        }

        session.step(now);

        if session.frame() % 600 == 0 {
            session.present(&mut hud);
            log::info!("{}", hud.line);
        }
        if !session.world().is_playing() || session.frame() >= max_frames {
            LoopControl::Break
        } else {
            LoopControl::Continue
        }
    });

    session.present(&mut hud);
    log::info!("{}", hud.line);
    if session.skipped_ticks() > 0 {
        log::warn!("{} ticks were skipped", session.skipped_ticks());
    }
}

// The browser entry point is `#[wasm_bindgen(start)]` in the library
#[cfg(target_arch = "wasm32")]
fn main() {}
