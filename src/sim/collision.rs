//! Collision detection and response for balls on a rectangular table
//!
//! Everything here is pure math on positions, directions and radii. The ball
//! module decides when to apply it.

use glam::DVec2;

/// Contact between two overlapping circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Vector from the first center to the second
    pub delta: DVec2,
    /// Center distance (`delta.length()`)
    pub distance: f64,
    /// Penetration depth (sum of radii minus distance)
    pub overlap: f64,
}

impl Contact {
    /// Coincident centers have no usable normal
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.distance <= 0.0
    }

    /// Unit vector from the first center toward the second
    #[inline]
    pub fn normal(&self) -> DVec2 {
        self.delta / self.distance
    }

    /// Position correction pushing the two circles apart.
    ///
    /// The first circle moves by `-separation()` and the second by
    /// `+separation()`. Each gets the full overlap, so the pair ends up twice
    /// the overlap further apart than touching would need.
    #[inline]
    pub fn separation(&self) -> DVec2 {
        self.delta * (self.overlap / self.distance)
    }
}

/// True iff the circles overlap (center distance strictly below the sum of radii)
#[inline]
pub fn circles_overlap(a_pos: DVec2, a_radius: f64, b_pos: DVec2, b_radius: f64) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Contact info if the circles overlap
pub fn circle_contact(a_pos: DVec2, a_radius: f64, b_pos: DVec2, b_radius: f64) -> Option<Contact> {
    let delta = b_pos - a_pos;
    let distance = delta.length();
    let radius_sum = a_radius + b_radius;

    if distance < radius_sum {
        Some(Contact {
            delta,
            distance,
            overlap: radius_sum - distance,
        })
    } else {
        None
    }
}

/// True iff any part of the circle lies outside `[0, size.x] x [0, size.y]`
#[inline]
pub fn circle_outside_rect(pos: DVec2, radius: f64, size: DVec2) -> bool {
    pos.x - radius < 0.0
        || pos.x + radius > size.x
        || pos.y - radius < 0.0
        || pos.y + radius > size.y
}

/// Bounce one axis off the walls at `0` and `extent`.
///
/// Returns the new coordinate and direction component. When the candidate
/// would put the edge of the ball past a wall, the coordinate is clamped to
/// `[radius, extent - radius]` and the direction is inverted.
#[inline]
pub fn bounce_axis(candidate: f64, dir: f64, radius: f64, extent: f64) -> (f64, f64) {
    if candidate - radius < 0.0 || candidate + radius > extent {
        // min then max: a table narrower than the ball pins it at `radius`
        (candidate.min(extent - radius).max(radius), -dir)
    } else {
        (candidate, dir)
    }
}

/// Scalar impulse along the contact normal.
///
/// `p = 2 (dir_a . n - dir_b . n) / (r_a + r_b)`. Callers scale it by each
/// ball's own radius, not by a reduced mass.
#[inline]
pub fn impulse(dir_a: DVec2, dir_b: DVec2, normal: DVec2, radius_sum: f64) -> f64 {
    2.0 * (dir_a.dot(normal) - dir_b.dot(normal)) / radius_sum
}

/// Speed handed over when a moving ball strikes another.
///
/// Returns `(lost, gained)`: the striking ball loses its radius share of its
/// own speed, the struck ball gains the other share. Both come from the
/// striking ball's speed only.
#[inline]
pub fn speed_transfer(speed: f64, radius: f64, other_radius: f64) -> (f64, f64) {
    let total = radius + other_radius;
    (speed * (radius / total), speed * (other_radius / total))
}
