//! Fixed timestep driver
//!
//! Owns one table and advances it at a fixed tick rate from whatever frame
//! times the caller reports. UI edits go through the same owner, so they can
//! only happen between ticks.

use crate::consts::MAX_FRAME_TIME;
use crate::settings::{Settings, SettingsError};
use crate::sim::{Ball, Table, TableError};

/// A table plus the clock that ticks it
#[derive(Debug, Clone)]
pub struct Simulation {
    table: Table,
    tick_interval: f64,
    max_substeps: u32,
    accumulator: f64,
    ticks: u64,
    // Ball spawning
    min_radius: f64,
    max_radius: f64,
    friction: f64,
    next_radius: f64,
    next_id: u64,
}

impl Simulation {
    /// Build the table described by `settings` and place its starting balls.
    ///
    /// A starting ball that finds no room is skipped.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let mut table = match settings.seed {
            Some(seed) => Table::with_seed(settings.width, settings.height, seed),
            None => Table::new(settings.width, settings.height),
        };

        for spec in &settings.initial_balls {
            let radius = spec
                .radius
                .unwrap_or_else(|| table.random_radius(settings.min_radius, settings.max_radius));
            let ball = Ball::new(spec.id.clone(), 0.0, 0.0, spec.color.clone(), radius)
                .with_friction(settings.friction);
            if let Err(err) = table.add_ball(ball) {
                log::warn!("Skipping starting ball: {}", err);
            }
        }

        log::info!(
            "Simulation ready: {}x{} table, {} balls, {} ticks/s",
            table.width(),
            table.height(),
            table.len(),
            settings.ticks_per_second
        );

        Ok(Self {
            table,
            tick_interval: settings.tick_interval(),
            max_substeps: settings.max_substeps,
            accumulator: 0.0,
            ticks: 0,
            min_radius: settings.min_radius,
            max_radius: settings.max_radius,
            friction: settings.friction,
            next_radius: (settings.min_radius + settings.max_radius) / 2.0,
            next_id: settings.initial_balls.len() as u64,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// Total ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Radius the next spawned ball will get
    pub fn next_radius(&self) -> f64 {
        self.next_radius
    }

    /// Run one tick immediately
    pub fn tick(&mut self) {
        self.table.tick();
        self.ticks += 1;
    }

    /// Account for `elapsed` seconds of wall time and run the ticks now due.
    ///
    /// Long frames are clamped and at most `max_substeps` ticks run per call;
    /// the remainder carries over. Returns the number of ticks run.
    pub fn update(&mut self, elapsed: f64) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= self.tick_interval && substeps < self.max_substeps {
            self.tick();
            self.accumulator -= self.tick_interval;
            substeps += 1;
        }
        substeps
    }

    /// Add a ball of `color` with the next id and pending radius.
    ///
    /// The id is used up and a new pending radius is drawn whether or not the
    /// ball found room. Returns the new ball's id.
    pub fn spawn_ball(&mut self, color: &str) -> Result<String, TableError> {
        let id = self.next_id.to_string();
        self.next_id += 1;

        let ball =
            Ball::new(id.clone(), 0.0, 0.0, color, self.next_radius).with_friction(self.friction);
        let placed = self.table.add_ball(ball);
        self.next_radius = self.table.random_radius(self.min_radius, self.max_radius);

        placed.map(|pos| {
            log::info!("Spawned ball {} at ({:.1}, {:.1})", id, pos.x, pos.y);
            id
        })
    }
}
