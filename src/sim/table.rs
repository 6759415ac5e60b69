//! The table: bounds, the ordered ball collection and placement
//!
//! Balls are kept in insertion order. That order decides which ball is
//! "this" in a collision and which overlap wins when several exist.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::ball::{self, Ball, BallView};
use super::collision;
use crate::consts::MAX_PLACEMENT_STEPS;

/// Why a ball could not be placed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("ball radius {0} is not a usable step on this table")]
    InvalidRadius(f64),
    #[error("table dimensions must be finite and positive, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    /// Carries the rejected ball so it can be placed elsewhere
    #[error("no free spot on the table for ball {}", .ball.id())]
    NoFreeSlot { ball: Box<Ball> },
}

impl TableError {
    /// The ball that found no room, if that is what went wrong
    pub fn into_ball(self) -> Option<Ball> {
        match self {
            TableError::NoFreeSlot { ball } => Some(*ball),
            _ => None,
        }
    }
}

/// A rectangular table holding balls
///
/// Dimensions are not checked on construction; `add_ball` reports
/// non-finite or non-positive ones as `TableError::InvalidDimensions`.
#[derive(Debug, Clone)]
pub struct Table {
    width: f64,
    height: f64,
    balls: Vec<Ball>,
    rng: Pcg32,
}

impl Table {
    /// Create an empty table with a randomly seeded placement source
    pub fn new(width: f64, height: f64) -> Self {
        let seed: u64 = rand::random();
        log::debug!("Table {}x{} seeded with {}", width, height, seed);
        Self::with_seed(width, height, seed)
    }

    /// Create an empty table whose placement is reproducible from `seed`
    pub fn with_seed(width: f64, height: f64, seed: u64) -> Self {
        Self {
            width,
            height,
            balls: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Balls in insertion order
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// First ball with the given id
    pub fn ball(&self, id: &str) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id() == id)
    }

    fn ball_mut(&mut self, id: &str) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id() == id)
    }

    /// Drawable state of every ball, in insertion order
    pub fn snapshot(&self) -> Vec<BallView> {
        self.balls.iter().map(Ball::view).collect()
    }

    /// Place `ball` on a free spot and append it.
    ///
    /// Scans a grid of `2 * radius` steps starting from a random point: along
    /// x to the right edge, then one row down with a fresh random x. The first
    /// spot inside the table that overlaps no other ball is taken. Returns the
    /// chosen position. When no spot is free the ball is not added and comes
    /// back inside `TableError::NoFreeSlot`.
    pub fn add_ball(&mut self, mut ball: Ball) -> Result<DVec2, TableError> {
        let usable = |extent: f64| extent.is_finite() && extent > 0.0;
        if !(usable(self.width) && usable(self.height)) {
            return Err(TableError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let radius = ball.radius();
        let step = 2.0 * radius;
        // Bounds the scan: a step far below the table size either cannot move
        // a coordinate at all or takes effectively forever to cross the table
        if !(radius.is_finite() && radius > 0.0)
            || self.width / step > MAX_PLACEMENT_STEPS
            || self.height / step > MAX_PLACEMENT_STEPS
        {
            return Err(TableError::InvalidRadius(radius));
        }

        let mut x = self.random_offset(self.width, radius);
        let mut y = self.random_offset(self.height, radius);

        while y < self.height - radius {
            while x < self.width - radius {
                ball.pos = DVec2::new(x, y);
                if !self.intersects_table(&ball)
                    && !self.balls.iter().any(|b| Self::intersects(b, &ball))
                {
                    log::debug!("Placed ball {} at ({:.1}, {:.1})", ball.id(), x, y);
                    let pos = ball.pos;
                    self.balls.push(ball);
                    return Ok(pos);
                }
                x += step;
            }
            x = self.random_offset(self.width, radius);
            y += step;
        }

        log::warn!("No free spot for ball {} (radius {})", ball.id(), radius);
        Err(TableError::NoFreeSlot {
            ball: Box::new(ball),
        })
    }

    /// Uniform coordinate in `[radius, extent - radius)`
    fn random_offset(&mut self, extent: f64, radius: f64) -> f64 {
        self.rng.random::<f64>() * (extent - 2.0 * radius) + radius
    }

    /// Uniform radius in `[min, max)`, or `min` for an empty range
    pub fn random_radius(&mut self, min: f64, max: f64) -> f64 {
        if max > min {
            self.rng.random_range(min..max)
        } else {
            min
        }
    }

    /// True iff the two balls overlap
    pub fn intersects(a: &Ball, b: &Ball) -> bool {
        collision::circles_overlap(a.pos, a.radius(), b.pos, b.radius())
    }

    /// True iff any part of the ball is off the table
    pub fn intersects_table(&self, ball: &Ball) -> bool {
        collision::circle_outside_rect(ball.pos, ball.radius(), DVec2::new(self.width, self.height))
    }

    /// First ball whose disc contains the point
    pub fn ball_at(&self, x: f64, y: f64) -> Option<&Ball> {
        let point = DVec2::new(x, y);
        self.balls
            .iter()
            .find(|b| b.pos.distance(point) < b.radius())
    }

    /// Recolor the first ball with `id`. Returns false if there is none.
    pub fn change_ball(&mut self, id: &str, color: &str) -> bool {
        match self.ball_mut(id) {
            Some(ball) => {
                ball.change_color(color);
                true
            }
            None => {
                log::debug!("change_ball: no ball {}", id);
                false
            }
        }
    }

    /// Move the first ball with `id` to `(x, y)`, throwing it.
    ///
    /// A non-zero displacement becomes the ball's direction (normalized) and
    /// speed (its length). The position is set either way. Returns false if
    /// there is no such ball.
    pub fn change_ball_position(&mut self, id: &str, x: f64, y: f64) -> bool {
        let Some(ball) = self.ball_mut(id) else {
            log::debug!("change_ball_position: no ball {}", id);
            return false;
        };

        let target = DVec2::new(x, y);
        let delta = target - ball.pos;
        let distance = delta.length();
        if distance > 0.0 {
            ball.speed = distance;
            ball.dir = delta / distance;
        }
        ball.pos = target;
        true
    }

    /// Advance every ball once, in insertion order
    pub fn tick(&mut self) {
        for index in 0..self.balls.len() {
            ball::advance(&mut self.balls, index, self.width, self.height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::with_seed(1200.0, 600.0, 42)
    }

    /// Table with balls at fixed spots, bypassing placement
    fn table_with(balls: &[(&str, f64, f64, &str, f64)]) -> Table {
        let mut table = table();
        for &(id, x, y, color, radius) in balls {
            table.balls.push(Ball::new(id, x, y, color, radius));
        }
        table
    }

    #[test]
    fn test_add_ball_places_inside_without_overlap() {
        let mut table = table();
        let mut placed = 0;
        for i in 0..40 {
            let radius = 10.0 + (i % 5) as f64 * 5.0;
            if let Ok(pos) = table.add_ball(Ball::new(i.to_string(), 0.0, 0.0, "red", radius)) {
                assert_eq!(table.balls()[placed].pos, pos);
                placed += 1;
            }
        }
        assert!(placed > 0);
        assert_eq!(table.len(), placed);

        for (i, a) in table.balls().iter().enumerate() {
            assert!(!table.intersects_table(a));
            for b in &table.balls()[i + 1..] {
                assert!(!Table::intersects(a, b), "{} overlaps {}", a.id(), b.id());
            }
        }
    }

    #[test]
    fn test_placement_is_deterministic_with_seed() {
        let radii = [10.0, 25.0, 13.5, 30.0, 18.0, 10.0, 22.0];
        let place = || {
            let mut table = Table::with_seed(1200.0, 600.0, 7);
            radii
                .iter()
                .enumerate()
                .map(|(i, &r)| table.add_ball(Ball::new(i.to_string(), 0.0, 0.0, "red", r)))
                .collect::<Vec<_>>()
        };
        assert_eq!(place(), place());
    }

    #[test]
    fn test_add_ball_reports_full_table() {
        // Every spot the scan can reach overlaps the first ball
        let mut table = Table::with_seed(40.0, 40.0, 1);
        assert!(table.add_ball(Ball::new("a", 0.0, 0.0, "red", 15.0)).is_ok());

        let err = table
            .add_ball(Ball::new("b", 0.0, 0.0, "green", 15.0))
            .unwrap_err();
        assert_eq!(err.to_string(), "no free spot on the table for ball b");
        assert_eq!(table.len(), 1);

        // The rejected ball comes back and fits on a bigger table
        let ball = err.into_ball().expect("ball returned");
        assert_eq!(ball.id(), "b");
        assert_eq!(ball.color(), "green");
        let mut bigger = Table::with_seed(400.0, 400.0, 1);
        assert!(bigger.add_ball(ball).is_ok());
        assert_eq!(bigger.ball("b").map(Ball::radius), Some(15.0));
    }

    #[test]
    fn test_add_ball_too_big_for_table() {
        let mut table = Table::with_seed(30.0, 30.0, 3);
        assert!(matches!(
            table.add_ball(Ball::new("a", 0.0, 0.0, "red", 20.0)),
            Err(TableError::NoFreeSlot { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_add_ball_rejects_degenerate_radius() {
        let mut table = table();
        assert_eq!(
            table.add_ball(Ball::new("a", 0.0, 0.0, "red", 0.0)),
            Err(TableError::InvalidRadius(0.0))
        );
        assert!(table.add_ball(Ball::new("b", 0.0, 0.0, "red", -5.0)).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_add_ball_rejects_radius_too_small_to_step() {
        // Almost every spot overlaps the big ball, and 2e-13 steps would
        // need ~1e14 tries to cross one row
        let mut table = Table::with_seed(100.0, 100.0, 8);
        table.balls.push(Ball::new("big", 50.0, 50.0, "red", 49.0));

        assert_eq!(
            table.add_ball(Ball::new("tiny", 0.0, 0.0, "red", 1e-13)),
            Err(TableError::InvalidRadius(1e-13))
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.balls()[0].id(), "big");
    }

    #[test]
    fn test_add_ball_small_radius_still_places() {
        // 5000 steps per axis is within the scan limit
        let mut table = Table::with_seed(100.0, 100.0, 8);
        assert!(table.add_ball(Ball::new("small", 0.0, 0.0, "red", 0.01)).is_ok());

        // 50_000 steps per axis is not
        assert_eq!(
            table.add_ball(Ball::new("smaller", 0.0, 0.0, "red", 0.001)),
            Err(TableError::InvalidRadius(0.001))
        );
    }

    #[test]
    fn test_add_ball_rejects_bad_dimensions() {
        for (width, height) in [(f64::NAN, 100.0), (-10.0, 100.0), (100.0, 0.0)] {
            let mut table = Table::with_seed(width, height, 0);
            assert!(matches!(
                table.add_ball(Ball::new("a", 0.0, 0.0, "red", 5.0)),
                Err(TableError::InvalidDimensions { .. })
            ));
            assert!(table.is_empty());
        }
    }

    #[test]
    fn test_dimensions() {
        let table = Table::with_seed(640.0, 480.0, 0);
        assert_eq!(table.width(), 640.0);
        assert_eq!(table.height(), 480.0);
    }

    #[test]
    fn test_intersection_predicates() {
        let table = Table::with_seed(100.0, 100.0, 0);
        let a = Ball::new("a", 50.0, 50.0, "red", 10.0);
        let b = Ball::new("b", 65.0, 50.0, "red", 10.0);
        let c = Ball::new("c", 70.0, 50.0, "red", 10.0);
        assert!(Table::intersects(&a, &b));
        assert!(!Table::intersects(&a, &c));

        assert!(!table.intersects_table(&a));
        assert!(table.intersects_table(&Ball::new("d", 5.0, 50.0, "red", 10.0)));
        assert!(table.intersects_table(&Ball::new("e", 50.0, 95.0, "red", 10.0)));
    }

    #[test]
    fn test_change_ball_color() {
        let mut table = table_with(&[
            ("0", 100.0, 100.0, "red", 10.0),
            ("1", 200.0, 200.0, "blue", 10.0),
        ]);

        assert!(table.change_ball("1", "green"));
        assert_eq!(table.ball("1").map(Ball::color), Some("green"));
        assert_eq!(table.ball("0").map(Ball::color), Some("red"));
    }

    #[test]
    fn test_change_missing_ball_is_noop() {
        let mut table = table_with(&[
            ("0", 100.0, 100.0, "red", 10.0),
            ("1", 200.0, 200.0, "black", 10.0),
        ]);
        let before = table.snapshot();

        assert!(!table.change_ball("missing-id", "blue"));
        assert!(!table.change_ball_position("missing-id", 5.0, 5.0));
        assert_eq!(table.snapshot(), before);
    }

    #[test]
    fn test_change_ball_position_throws_ball() {
        let mut table = table_with(&[("0", 100.0, 100.0, "red", 10.0)]);

        assert!(table.change_ball_position("0", 103.0, 96.0));

        let ball = table.ball("0").unwrap();
        assert_eq!(ball.pos, DVec2::new(103.0, 96.0));
        assert_eq!(ball.speed, 5.0);
        assert_eq!(ball.dir, DVec2::new(0.6, -0.8));
    }

    #[test]
    fn test_change_ball_position_to_same_spot_keeps_motion() {
        let mut table = table_with(&[("0", 100.0, 100.0, "red", 10.0)]);
        table.change_ball_position("0", 110.0, 100.0);

        assert!(table.change_ball_position("0", 110.0, 100.0));
        let ball = table.ball("0").unwrap();
        assert_eq!(ball.pos, DVec2::new(110.0, 100.0));
        assert_eq!(ball.dir, DVec2::X);
        assert_eq!(ball.speed, 10.0);
    }

    #[test]
    fn test_duplicate_ids_use_first_match() {
        let mut table = table_with(&[
            ("dup", 100.0, 100.0, "red", 10.0),
            ("dup", 200.0, 200.0, "blue", 10.0),
        ]);

        table.change_ball("dup", "white");
        assert_eq!(table.balls()[0].color(), "white");
        assert_eq!(table.balls()[1].color(), "blue");
    }

    #[test]
    fn test_ball_at() {
        let table = table_with(&[("0", 100.0, 100.0, "red", 20.0)]);
        assert_eq!(table.ball_at(105.0, 95.0).map(Ball::id), Some("0"));
        assert!(table.ball_at(120.0, 100.0).is_none());
    }

    #[test]
    fn test_random_radius_in_range() {
        let mut table = table();
        for _ in 0..100 {
            let r = table.random_radius(10.0, 30.0);
            assert!((10.0..30.0).contains(&r));
        }
        assert_eq!(table.random_radius(12.0, 12.0), 12.0);
    }

    #[test]
    fn test_tick_head_on_collision() {
        let mut table = table_with(&[
            ("a", 100.0, 100.0, "red", 10.0),
            ("b", 108.0, 100.0, "blue", 10.0),
        ]);
        table.balls[0].dir = DVec2::X;
        table.balls[0].speed = 5.0;

        table.tick();

        let a = table.ball("a").unwrap();
        let b = table.ball("b").unwrap();
        assert_eq!(a.speed, 2.5 * 0.995);
        assert_eq!(b.speed, 2.5 * 0.995);
        assert!(!Table::intersects(a, b));
    }

    #[test]
    fn test_tick_without_contact_only_moves() {
        let mut table = table_with(&[
            ("a", 100.0, 100.0, "red", 10.0),
            ("b", 300.0, 100.0, "blue", 10.0),
        ]);
        table.change_ball_position("a", 100.0, 110.0);

        table.tick();

        let a = table.ball("a").unwrap();
        assert_eq!(a.pos, DVec2::new(100.0, 120.0));
        assert_eq!(a.dir, DVec2::Y);
        assert_eq!(a.speed, 10.0 * 0.995);
        assert_eq!(table.ball("b").unwrap().pos, DVec2::new(300.0, 100.0));
    }

    #[test]
    fn test_tick_stays_finite() {
        let mut table = Table::with_seed(400.0, 300.0, 99);
        for i in 0..6 {
            let x = 50.0 + i as f64 * 50.0;
            table
                .balls
                .push(Ball::new(i.to_string(), x, 150.0, "red", 12.0));
        }
        table.change_ball_position("0", 90.0, 175.0);

        for _ in 0..500 {
            table.tick();
            assert!(table
                .balls()
                .iter()
                .all(|b| b.pos.is_finite() && b.speed.is_finite()));
        }
    }
}
