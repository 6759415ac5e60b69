//! Billiard Table headless runner
//!
//! Sets up a table from settings, throws the first ball and runs the
//! simulation for a few seconds of frames, then prints the final ball state
//! as JSON for a renderer or for inspection.
//!
//! Usage: `billiard-table [settings.json] [seconds]`

use billiard_table::sim::DragController;
use billiard_table::{Settings, Simulation};

/// Frame time reported to the driver (a 60 Hz display)
const FRAME_TIME: f64 = 1.0 / 60.0;

fn main() {
    env_logger::init();
    log::info!("Billiard Table (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5.0);

    let mut sim = match Simulation::from_settings(&settings) {
        Ok(sim) => sim,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sim.spawn_ball("black") {
        log::warn!("{}", err);
    }

    throw_first_ball(&mut sim);

    let frames = (seconds / FRAME_TIME).round() as u64;
    for _ in 0..frames {
        sim.update(FRAME_TIME);
    }
    let table = sim.table();
    log::info!(
        "Ran {} ticks over {} frames on a {}x{} table",
        sim.ticks(),
        frames,
        table.width(),
        table.height()
    );

    match serde_json::to_string_pretty(&sim.table().snapshot()) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Failed to serialize table: {}", err),
    }
}

/// Drag the first ball a short way and let go, like a mouse flick
fn throw_first_ball(sim: &mut Simulation) {
    let Some(pos) = sim.table().balls().first().map(|b| b.pos) else {
        return;
    };

    let mut drag = DragController::new();
    if drag.press(sim.table(), pos.x, pos.y) {
        let table = sim.table_mut();
        drag.moved(table, pos.x + 10.0, pos.y + 4.0);
        let outcome = drag.release(table, pos.x + 18.0, pos.y + 9.0);
        log::info!("Flick: {:?}", outcome);
    }
}
