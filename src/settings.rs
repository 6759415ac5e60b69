//! Simulation settings
//!
//! Loaded from a JSON file; any field left out takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("table dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("invalid radius range {min}..{max}")]
    InvalidRadiusRange { min: f64, max: f64 },
    #[error("tick rate must be at least 1")]
    ZeroTickRate,
    #[error("max substeps must be at least 1")]
    ZeroSubsteps,
    #[error("friction must be in (0, 1], got {0}")]
    InvalidFriction(f64),
}

/// A ball placed when the table is set up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSpec {
    pub id: String,
    pub color: String,
    /// Random within the radius range when omitted
    #[serde(default)]
    pub radius: Option<f64>,
}

impl BallSpec {
    pub fn new(id: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            color: color.into(),
            radius: None,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Table ===
    pub width: f64,
    pub height: f64,

    // === Balls ===
    /// Radius range for balls without an explicit radius
    pub min_radius: f64,
    pub max_radius: f64,
    /// Per-tick speed decay
    pub friction: f64,
    /// Balls placed at startup, in order
    pub initial_balls: Vec<BallSpec>,

    // === Timing ===
    pub ticks_per_second: u32,
    pub max_substeps: u32,

    /// Placement seed; random when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: TABLE_WIDTH,
            height: TABLE_HEIGHT,

            min_radius: MIN_BALL_RADIUS,
            max_radius: MAX_BALL_RADIUS,
            friction: FRICTION,
            initial_balls: vec![BallSpec::new("0", "red"), BallSpec::new("1", "blue")],

            ticks_per_second: TICKS_PER_SECOND,
            max_substeps: MAX_SUBSTEPS,

            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SettingsError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.min_radius > 0.0 && self.max_radius >= self.min_radius) {
            return Err(SettingsError::InvalidRadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if self.ticks_per_second == 0 {
            return Err(SettingsError::ZeroTickRate);
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::ZeroSubsteps);
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(SettingsError::InvalidFriction(self.friction));
        }
        Ok(())
    }

    /// Seconds per tick
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.ticks_per_second as f64
    }
}
