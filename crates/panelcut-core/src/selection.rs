//! Panel selection state machine.
//!
//! The operator marks each panel by clicking its four corners. Points are
//! collected while the session is active; the fourth point commits a
//! [`Panel`] and collection starts over for the next one.
//!
//! ```text
//! Idle --begin--> Collecting(0) --point--> Collecting(1..3) --4th point--> commit, Collecting(0)
//!                     ^                                                          |
//!                     +----------------------------------------------------------+
//! Collecting(n) --finish--> Idle
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{normalize_corners, Point};

/// Points needed to commit a panel.
pub const CORNERS_PER_PANEL: usize = 4;

/// Fewest points a forced completion accepts.
pub const MIN_FORCED_POINTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Need at least 3 points to complete a panel, have {have}")]
    InsufficientPoints { have: usize },
}

/// Whether the session is accepting points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    Idle,
    Collecting,
}

/// A committed quadrilateral, corners in click order and image pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Zero-based position in the panel list.
    pub id: usize,
    pub corners: [Point; 4],
}

impl Panel {
    /// One-based number shown to the operator.
    pub fn number(&self) -> usize {
        self.id + 1
    }

    /// Corners as `[top_left, top_right, bottom_right, bottom_left]`.
    pub fn normalized_corners(&self) -> [Point; 4] {
        normalize_corners(&self.corners)
    }
}

/// What happened to a point handed to [`PanelSession::add_point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOutcome {
    /// The session is idle.
    Ignored,
    /// The point was stored; this many points are now pending.
    Pending(usize),
    /// The point completed a panel with this id.
    Committed(usize),
}

/// Corner the operator is expected to click next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    const ORDER: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomRight => "bottom-right",
            Corner::BottomLeft => "bottom-left",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Panels marked on one sheet plus the quad currently being entered.
#[derive(Debug, Clone, Default)]
pub struct PanelSession {
    state: SelectionState,
    panels: Vec<Panel>,
    pending: Vec<Point>,
}

impl PanelSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_collecting(&self) -> bool {
        self.state == SelectionState::Collecting
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn pending(&self) -> &[Point] {
        &self.pending
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Start a fresh selection pass, dropping every panel and pending point.
    pub fn begin(&mut self) {
        self.panels.clear();
        self.pending.clear();
        self.state = SelectionState::Collecting;
        log::debug!("Panel selection started");
    }

    /// Record a corner click. The fourth pending point commits a panel.
    pub fn add_point(&mut self, point: Point) -> PointOutcome {
        if self.state == SelectionState::Idle {
            return PointOutcome::Ignored;
        }

        self.pending.push(point);
        if self.pending.len() < CORNERS_PER_PANEL {
            return PointOutcome::Pending(self.pending.len());
        }

        PointOutcome::Committed(self.commit_pending())
    }

    /// Discard pending points, keeping committed panels.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Commit the pending quad early, padding it with copies of the last point.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::InsufficientPoints` with nothing changed when
    /// fewer than three points are pending.
    pub fn force_complete(&mut self) -> Result<usize, SelectionError> {
        let have = self.pending.len();
        if have < MIN_FORCED_POINTS {
            return Err(SelectionError::InsufficientPoints { have });
        }

        let last = self.pending[have - 1];
        self.pending.resize(CORNERS_PER_PANEL, last);
        Ok(self.commit_pending())
    }

    /// Remove the most recently committed panel.
    pub fn delete_last(&mut self) -> Option<Panel> {
        let removed = self.panels.pop();
        if let Some(panel) = &removed {
            log::debug!("Deleted panel {}", panel.number());
        }
        removed
    }

    /// Remove every panel and pending point.
    pub fn clear_all(&mut self) {
        self.panels.clear();
        self.pending.clear();
    }

    /// End the selection pass.
    ///
    /// Pending points are force-completed first. The session is idle
    /// afterwards whatever the result; when too few points were pending they
    /// are discarded and the error reports how many there were.
    pub fn finish(&mut self) -> Result<Option<usize>, SelectionError> {
        let result = if self.pending.is_empty() {
            Ok(None)
        } else {
            self.force_complete().map(Some)
        };

        if let Err(err) = &result {
            log::warn!("Discarding incomplete panel: {err}");
            self.pending.clear();
        }
        self.state = SelectionState::Idle;
        log::debug!("Panel selection finished with {} panels", self.panels.len());
        result
    }

    /// The corner expected next, or `None` while idle.
    pub fn next_corner_hint(&self) -> Option<Corner> {
        match self.state {
            SelectionState::Idle => None,
            SelectionState::Collecting => Corner::ORDER.get(self.pending.len()).copied(),
        }
    }

    fn commit_pending(&mut self) -> usize {
        let id = self.panels.len();
        let mut corners = [Point::default(); CORNERS_PER_PANEL];
        corners.copy_from_slice(&self.pending[..CORNERS_PER_PANEL]);
        self.pending.clear();

        log::debug!("Committed panel {} with corners {:?}", id + 1, corners);
        self.panels.push(Panel { id, corners });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn square(session: &mut PanelSession, origin: f64) -> PointOutcome {
        session.add_point(p(origin, origin));
        session.add_point(p(origin + 10.0, origin));
        session.add_point(p(origin + 10.0, origin + 10.0));
        session.add_point(p(origin, origin + 10.0))
    }

    #[test]
    fn test_idle_ignores_points() {
        let mut session = PanelSession::new();
        assert_eq!(session.add_point(p(1.0, 1.0)), PointOutcome::Ignored);
        assert_eq!(session.pending_count(), 0);
        assert_eq!(session.next_corner_hint(), None);
    }

    #[test]
    fn test_fourth_point_commits() {
        let mut session = PanelSession::new();
        session.begin();

        assert_eq!(session.add_point(p(0.0, 0.0)), PointOutcome::Pending(1));
        assert_eq!(session.add_point(p(5.0, 0.0)), PointOutcome::Pending(2));
        assert_eq!(session.add_point(p(5.0, 5.0)), PointOutcome::Pending(3));
        assert_eq!(session.add_point(p(0.0, 5.0)), PointOutcome::Committed(0));

        assert_eq!(session.panel_count(), 1);
        assert_eq!(session.pending_count(), 0);
        assert_eq!(
            session.panels()[0].corners,
            [p(0.0, 0.0), p(5.0, 0.0), p(5.0, 5.0), p(0.0, 5.0)]
        );
        assert!(session.is_collecting());
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut session = PanelSession::new();
        session.begin();
        assert_eq!(square(&mut session, 0.0), PointOutcome::Committed(0));
        assert_eq!(square(&mut session, 50.0), PointOutcome::Committed(1));
        assert_eq!(square(&mut session, 100.0), PointOutcome::Committed(2));

        session.delete_last();
        assert_eq!(square(&mut session, 150.0), PointOutcome::Committed(2));
        assert_eq!(session.panels()[2].number(), 3);
    }

    #[test]
    fn test_reset_clears_pending_only() {
        let mut session = PanelSession::new();
        session.begin();
        square(&mut session, 0.0);
        session.add_point(p(1.0, 1.0));
        session.add_point(p(2.0, 2.0));

        session.reset();
        assert_eq!(session.pending_count(), 0);
        assert_eq!(session.panel_count(), 1);
    }

    #[test]
    fn test_force_complete_pads_with_last_point() {
        let mut session = PanelSession::new();
        session.begin();
        session.add_point(p(0.0, 0.0));
        session.add_point(p(10.0, 0.0));
        session.add_point(p(10.0, 10.0));

        assert_eq!(session.force_complete(), Ok(0));
        assert_eq!(
            session.panels()[0].corners,
            [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(10.0, 10.0)]
        );
        assert_eq!(session.pending_count(), 0);
    }

    #[test]
    fn test_force_complete_with_two_points_commits_nothing() {
        let mut session = PanelSession::new();
        session.begin();
        session.add_point(p(0.0, 0.0));
        session.add_point(p(10.0, 0.0));

        assert_eq!(
            session.force_complete(),
            Err(SelectionError::InsufficientPoints { have: 2 })
        );
        assert_eq!(session.panel_count(), 0);
        assert_eq!(session.pending_count(), 2);
    }

    #[test]
    fn test_delete_last_on_empty_is_noop() {
        let mut session = PanelSession::new();
        assert_eq!(session.delete_last(), None);
        session.begin();
        assert_eq!(session.delete_last(), None);
        assert_eq!(session.panel_count(), 0);
    }

    #[test]
    fn test_delete_last_removes_newest() {
        let mut session = PanelSession::new();
        session.begin();
        square(&mut session, 0.0);
        square(&mut session, 50.0);

        let removed = session.delete_last().unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(session.panel_count(), 1);
        assert_eq!(session.panels()[0].id, 0);
    }

    #[test]
    fn test_clear_all() {
        let mut session = PanelSession::new();
        session.begin();
        square(&mut session, 0.0);
        session.add_point(p(3.0, 3.0));

        session.clear_all();
        assert_eq!(session.panel_count(), 0);
        assert_eq!(session.pending_count(), 0);
        assert!(session.is_collecting());
    }

    #[test]
    fn test_begin_starts_fresh() {
        let mut session = PanelSession::new();
        session.begin();
        square(&mut session, 0.0);
        session.add_point(p(3.0, 3.0));

        session.begin();
        assert_eq!(session.panel_count(), 0);
        assert_eq!(session.pending_count(), 0);
        assert_eq!(session.state(), SelectionState::Collecting);
    }

    #[test]
    fn test_finish_completes_pending() {
        let mut session = PanelSession::new();
        session.begin();
        session.add_point(p(0.0, 0.0));
        session.add_point(p(10.0, 0.0));
        session.add_point(p(10.0, 10.0));

        assert_eq!(session.finish(), Ok(Some(0)));
        assert_eq!(session.state(), SelectionState::Idle);
        assert_eq!(session.panel_count(), 1);
        assert_eq!(session.add_point(p(1.0, 1.0)), PointOutcome::Ignored);
    }

    #[test]
    fn test_finish_with_too_few_points_reports_and_goes_idle() {
        let mut session = PanelSession::new();
        session.begin();
        square(&mut session, 0.0);
        session.add_point(p(1.0, 1.0));

        assert_eq!(
            session.finish(),
            Err(SelectionError::InsufficientPoints { have: 1 })
        );
        assert_eq!(session.state(), SelectionState::Idle);
        assert_eq!(session.pending_count(), 0);
        assert_eq!(session.panel_count(), 1);
    }

    #[test]
    fn test_finish_without_pending() {
        let mut session = PanelSession::new();
        session.begin();
        assert_eq!(session.finish(), Ok(None));
    }

    #[test]
    fn test_next_corner_hint() {
        let mut session = PanelSession::new();
        session.begin();
        assert_eq!(session.next_corner_hint(), Some(Corner::TopLeft));
        session.add_point(p(0.0, 0.0));
        assert_eq!(session.next_corner_hint(), Some(Corner::TopRight));
        session.add_point(p(1.0, 0.0));
        session.add_point(p(1.0, 1.0));
        assert_eq!(session.next_corner_hint(), Some(Corner::BottomLeft));
        assert_eq!(Corner::BottomLeft.to_string(), "bottom-left");
    }

    #[test]
    fn test_normalized_corners_of_panel() {
        let panel = Panel {
            id: 0,
            corners: [p(10.0, 10.0), p(0.0, 10.0), p(0.0, 0.0), p(10.0, 0.0)],
        };
        assert_eq!(
            panel.normalized_corners(),
            [p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 10.0)]
        );
    }
}
