//! Ball entity and its per-tick motion

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::{self, Contact};
use crate::consts::FRICTION;

/// Invalid geometry handed to a ball constructor
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("ball radius must be finite and positive, got {0}")]
    InvalidRadius(f64),
}

/// A ball on the table
///
/// Motion is split into a direction (`dir`) and a scalar `speed`; the
/// displacement per tick is `dir * speed`. `dir` starts out as a unit vector
/// (or zero) but collisions do not renormalize it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    id: String,
    pub pos: DVec2,
    pub dir: DVec2,
    pub speed: f64,
    radius: f64,
    color: String,
    friction: f64,
}

/// What a renderer needs to draw one ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
}

impl Ball {
    /// Create a resting ball. The radius is not checked; see [`Ball::try_new`].
    pub fn new(id: impl Into<String>, x: f64, y: f64, color: impl Into<String>, radius: f64) -> Self {
        Self {
            id: id.into(),
            pos: DVec2::new(x, y),
            dir: DVec2::ZERO,
            speed: 0.0,
            radius,
            color: color.into(),
            friction: FRICTION,
        }
    }

    /// Create a resting ball, rejecting a radius that is not finite and positive
    pub fn try_new(
        id: impl Into<String>,
        x: f64,
        y: f64,
        color: impl Into<String>,
        radius: f64,
    ) -> Result<Self, GeometryError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Self::new(id, x, y, color, radius))
    }

    /// Override the per-tick speed decay factor
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Velocity as a vector (`dir * speed`)
    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.dir * self.speed
    }

    pub fn change_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn view(&self) -> BallView {
        BallView {
            id: self.id.clone(),
            x: self.pos.x,
            y: self.pos.y,
            radius: self.radius,
            color: self.color.clone(),
        }
    }

    /// Move one step and reflect off the table edges, each axis on its own
    pub fn bounce_off_walls(&mut self, width: f64, height: f64) {
        let candidate = self.pos + self.velocity();
        let (x, dir_x) = collision::bounce_axis(candidate.x, self.dir.x, self.radius, width);
        let (y, dir_y) = collision::bounce_axis(candidate.y, self.dir.y, self.radius, height);
        self.pos = DVec2::new(x, y);
        self.dir = DVec2::new(dir_x, dir_y);
    }

    /// Contact with `other` if the two overlap
    pub fn contact_with(&self, other: &Ball) -> Option<Contact> {
        collision::circle_contact(self.pos, self.radius, other.pos, other.radius)
    }

    /// Resolve a collision where `self` is the ball being advanced.
    ///
    /// Both balls are pushed apart by the full overlap, directions change by
    /// an impulse scaled by each ball's own radius, and speed flows from
    /// `self` to `other` by radius share. Returns false and leaves both balls
    /// untouched when the centers coincide.
    pub fn collide_with(&mut self, other: &mut Ball, contact: &Contact) -> bool {
        if contact.is_degenerate() {
            log::debug!(
                "Balls {} and {} share a center, skipping collision",
                self.id,
                other.id
            );
            return false;
        }

        let correction = contact.separation();
        self.pos -= correction;
        other.pos += correction;

        let normal = contact.normal();
        let p = collision::impulse(self.dir, other.dir, normal, self.radius + other.radius);
        self.dir -= p * self.radius * normal;
        other.dir += p * other.radius * normal;

        let (lost, gained) = collision::speed_transfer(self.speed, self.radius, other.radius);
        other.speed += gained;
        self.speed -= lost;

        true
    }

    #[inline]
    pub fn apply_friction(&mut self) {
        self.speed *= self.friction;
    }
}

/// Advance `balls[index]` by one tick.
///
/// Wall bounce first, then the first overlapping ball in slice order (other
/// than itself) is resolved and the scan stops, then friction. Other balls
/// are read and written live, so balls advanced earlier in the same tick are
/// seen at their new positions.
pub fn advance(balls: &mut [Ball], index: usize, width: f64, height: f64) {
    let Some(ball) = balls.get_mut(index) else {
        return;
    };
    ball.bounce_off_walls(width, height);

    if let Some((other, contact)) = first_contact(balls, index) {
        let (this, other) = pair_mut(balls, index, other);
        this.collide_with(other, &contact);
    }

    balls[index].apply_friction();
}

/// First ball in slice order overlapping `balls[index]`
fn first_contact(balls: &[Ball], index: usize) -> Option<(usize, Contact)> {
    let this = &balls[index];
    balls
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .find_map(|(i, other)| this.contact_with(other).map(|contact| (i, contact)))
}

/// Two distinct mutable borrows out of one slice
fn pair_mut(balls: &mut [Ball], a: usize, b: usize) -> (&mut Ball, &mut Ball) {
    debug_assert_ne!(a, b);
    if a < b {
        let (head, tail) = balls.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = balls.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}
