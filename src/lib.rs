//! Billiard Table - balls bouncing and colliding on a rectangular table
//!
//! Core modules:
//! - `sim`: Ball physics, collisions, table placement and interaction
//! - `driver`: Fixed timestep scheduler that owns a table
//! - `settings`: Table dimensions, tick rate and starting balls

pub mod driver;
pub mod settings;
pub mod sim;

pub use driver::Simulation;
pub use settings::{BallSpec, Settings, SettingsError};
pub use sim::{Ball, BallView, DragController, DragOutcome, GeometryError, Table, TableError};

/// Simulation configuration constants
pub mod consts {
    /// Per-tick multiplicative speed decay
    pub const FRICTION: f64 = 0.995;

    /// Table dimensions
    pub const TABLE_WIDTH: f64 = 1200.0;
    pub const TABLE_HEIGHT: f64 = 600.0;

    /// Radius range for balls added without an explicit radius
    pub const MIN_BALL_RADIUS: f64 = 10.0;
    pub const MAX_BALL_RADIUS: f64 = 30.0;
    /// Most `2 * radius` grid steps placement may take along one table axis
    pub const MAX_PLACEMENT_STEPS: f64 = 10_000.0;

    /// Target tick rate
    pub const TICKS_PER_SECOND: u32 = 165;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will try to catch up on (seconds)
    pub const MAX_FRAME_TIME: f64 = 0.1;
}
