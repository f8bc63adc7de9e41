//! Conversion of session state into presentable scenes.

use anyhow::Result;
use rewind_rendering::{CellVisibility, Frame, Scene};
use rewind_system_session::Session;
use rewind_world::query;

/// Number of log chunks shown under the floor.
pub(crate) const RECENT_MESSAGES: usize = 6;

/// Captures the floor as the player perceives it, the player statistics and
/// the most recent log chunks.
pub(crate) fn capture(session: &Session) -> Result<Scene> {
    let floor = query::floor(session.state(), session.coordinates());
    let visibility = session.visibility();
    let frame = Frame::new(&floor, |coordinate| {
        if visibility.is_visible(coordinate) {
            CellVisibility::Visible
        } else if visibility.was_seen(coordinate) {
            CellVisibility::Remembered
        } else {
            CellVisibility::Hidden
        }
    })?;

    Ok(Scene::new(
        frame,
        session.stats(),
        session.log().recent(RECENT_MESSAGES),
    ))
}
