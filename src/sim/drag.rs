//! Pointer interaction with balls on the table
//!
//! Press on a ball to grab it, move to drag it, release to let go. Dragging
//! goes through [`Table::change_ball_position`], so the last movement before
//! release is what the ball keeps as its throw velocity. A press and release
//! with no movement in between selects the ball instead (to recolor it).

use glam::DVec2;

use super::table::Table;

/// What a release did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing was grabbed
    None,
    /// Clicked without moving; the caller may ask for a new color
    Selected(String),
    /// Dragged and let go
    Thrown(String),
}

/// Drag state between pointer events
#[derive(Debug, Clone, Default)]
pub struct DragController {
    dragging: Option<String>,
    selected: Option<String>,
    press_pos: Option<DVec2>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the ball being dragged
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Id of the ball selected by the current press, until it moves
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Pointer pressed. Returns true if it landed on a ball.
    pub fn press(&mut self, table: &Table, x: f64, y: f64) -> bool {
        let Some(ball) = table.ball_at(x, y) else {
            return false;
        };
        log::debug!("Grabbed ball {}", ball.id());
        self.dragging = Some(ball.id().to_string());
        self.selected = Some(ball.id().to_string());
        self.press_pos = Some(DVec2::new(x, y));
        true
    }

    /// Pointer moved. Drags the grabbed ball if the pointer left the press point.
    pub fn moved(&mut self, table: &mut Table, x: f64, y: f64) {
        let (Some(id), Some(press_pos)) = (&self.dragging, self.press_pos) else {
            return;
        };
        if DVec2::new(x, y) != press_pos {
            self.selected = None;
            table.change_ball_position(id, x, y);
        }
    }

    /// Pointer released. Resets the drag state.
    pub fn release(&mut self, table: &mut Table, x: f64, y: f64) -> DragOutcome {
        let dragging = self.dragging.take();
        let selected = self.selected.take();
        self.press_pos = None;

        if let Some(id) = selected {
            DragOutcome::Selected(id)
        } else if let Some(id) = dragging {
            table.change_ball_position(&id, x, y);
            log::debug!("Released ball {} at ({:.1}, {:.1})", id, x, y);
            DragOutcome::Thrown(id)
        } else {
            DragOutcome::None
        }
    }
}
