//! Ball physics on a rectangular table
//!
//! Everything here is synchronous and driven from outside:
//! - One `Table::tick` advances every ball once
//! - Placement randomness comes from the table's seeded RNG only
//! - Iteration follows insertion order, which decides collision outcomes
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod drag;
pub mod table;

pub use ball::{Ball, BallView, GeometryError, advance};
pub use collision::{Contact, circle_contact, circles_overlap};
pub use drag::{DragController, DragOutcome};
pub use table::{Table, TableError};
