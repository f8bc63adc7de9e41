#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn loop that feeds key presses into the world one at a time.
//!
//! The session owns the authoritative [`State`] exclusively. Each call to
//! [`Session::handle`] runs to completion before the next key is accepted, so
//! turns are strictly sequential. The session also guards rewinding, keeps the
//! human-readable message log and refreshes the field of view after every
//! applied turn.

mod message_log;

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rewind_core::{Coordinate, Event};
use rewind_system_visibility::Visibility;
use rewind_world::{apply_key, query, reverse_turn, State};

pub use message_log::{Chunk, MessageLog};

/// Key that rewinds the most recent turn.
pub const REWIND_KEY: &str = "r";

/// Log line emitted when a rewind is requested without stored time.
pub const NO_TIME_MESSAGE: &str = "You cannot rewind with no time stored, you must go forward.";

/// Result of handling a single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A forward turn was applied.
    Advanced,
    /// The most recent turn was reversed.
    Rewound,
    /// A rewind was requested while the player had no stored time.
    Refused,
    /// The key is not part of the input vocabulary.
    Ignored,
}

/// Drives a single game from key presses.
#[derive(Debug)]
pub struct Session {
    state: State,
    coordinates: Vec<Vec<Coordinate>>,
    visibility: Visibility,
    log: MessageLog,
    rng: ChaCha8Rng,
    scratch: Vec<Event>,
}

impl Session {
    /// Starts a session for the provided world, seeding combat rolls with
    /// `rng_seed`. The field of view is computed immediately.
    #[must_use]
    pub fn new(state: State, rng_seed: u64) -> Self {
        let coordinates = query::coordinates(&state);
        let mut visibility = Visibility::new();
        visibility.refresh(&coordinates, &state);

        Self {
            state,
            coordinates,
            visibility,
            log: MessageLog::default(),
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            scratch: Vec::new(),
        }
    }

    /// Handles one key press.
    pub fn handle(&mut self, key: &str) -> TurnOutcome {
        let outcome = if key == REWIND_KEY {
            self.rewind()
        } else if apply_key(&mut self.state, key, &mut self.rng, &mut self.scratch) {
            TurnOutcome::Advanced
        } else {
            TurnOutcome::Ignored
        };

        if matches!(outcome, TurnOutcome::Advanced | TurnOutcome::Rewound) {
            for event in self.scratch.drain(..) {
                if let Some(message) = event.message() {
                    self.log.push(message);
                }
            }
            self.visibility.refresh(&self.coordinates, &self.state);
        }

        outcome
    }

    fn rewind(&mut self) -> TurnOutcome {
        let time = query::player(&self.state).map_or(0, |player| player.time());
        if time == 0 {
            info!("rewind refused: no stored time");
            self.log.push(NO_TIME_MESSAGE);
            return TurnOutcome::Refused;
        }

        reverse_turn(&mut self.state, &mut self.scratch);
        TurnOutcome::Rewound
    }

    /// Authoritative world state.
    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Every coordinate of the grid, row-major.
    #[must_use]
    pub fn coordinates(&self) -> &[Vec<Coordinate>] {
        &self.coordinates
    }

    /// Current and remembered field of view.
    #[must_use]
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Messages emitted so far.
    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Player statistics formatted for display.
    #[must_use]
    pub fn stats(&self) -> String {
        let (health, time) =
            query::player(&self.state).map_or((0, 0), |player| (player.health(), player.time()));
        format!("Health: {health}\nTime: {time} turn(s)")
    }
}
