#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rewind engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world and the pure systems. Adapters translate raw key
//! presses into [`InputSymbol`] values, the world applies them turn by turn
//! and records one [`Action`] per turn on the player's undo stack, and every
//! transition is broadcast as [`Event`] values that the session turns into
//! human-readable log lines.

use std::fmt;

use serde::Deserialize;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Rewind.";

/// Log line emitted when the player walks into a wall.
pub const BUMPED_WALL_MESSAGE: &str = "Bumped wall.";

/// Two-dimensional integer grid address.
///
/// Coordinates compare structurally, so they can be used directly as keys of
/// hashed and ordered containers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    row: i32,
    column: i32,
}

impl Coordinate {
    /// The origin, also used as the zero motion vector.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Translates the coordinate by the provided motion vector.
    #[must_use]
    pub const fn offset(self, motion: Coordinate) -> Self {
        Self::new(self.row + motion.row, self.column + motion.column)
    }

    /// Returns the coordinate scaled by `-1`.
    #[must_use]
    pub const fn negated(self) -> Self {
        Self::new(-self.row, -self.column)
    }

    /// Reports whether both components are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.row == 0 && self.column == 0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.column)
    }
}

/// Returns the canonical coordinate for the provided pair.
///
/// Structural equality already makes [`Coordinate`] a valid map key, so the
/// interner is a passthrough. Call sites still go through it so that every
/// grid address is produced the same way.
#[must_use]
pub const fn intern(row: i32, column: i32) -> Coordinate {
    Coordinate::new(row, column)
}

/// Abstract per-turn input accepted by the turn engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputSymbol {
    /// Step toward decreasing column indices (`h`).
    Left,
    /// Step toward increasing row indices (`j`).
    Down,
    /// Step toward decreasing row indices (`k`).
    Up,
    /// Step toward increasing column indices (`l`).
    Right,
    /// Spend the turn without moving.
    Rest,
}

impl InputSymbol {
    /// Every symbol that moves the player.
    pub const DIRECTIONS: [InputSymbol; 4] = [Self::Left, Self::Down, Self::Up, Self::Right];

    /// Decodes a key name into an input symbol.
    ///
    /// Returns `None` for keys outside the fixed vocabulary; such keys are
    /// ignored by the turn engine.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "h" => Some(Self::Left),
            "j" => Some(Self::Down),
            "k" => Some(Self::Up),
            "l" => Some(Self::Right),
            "." | "rest" | "space" => Some(Self::Rest),
            _ => None,
        }
    }

    /// Motion vector associated with the symbol.
    #[must_use]
    pub const fn motion(self) -> Coordinate {
        match self {
            Self::Left => Coordinate::new(0, -1),
            Self::Down => Coordinate::new(1, 0),
            Self::Up => Coordinate::new(-1, 0),
            Self::Right => Coordinate::new(0, 1),
            Self::Rest => Coordinate::ZERO,
        }
    }
}

/// Stable handle that identifies an entity within the world roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Discriminant of the entity variants inhabiting the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// The player character.
    Player,
    /// A static dire wolf monster.
    DireWolf,
}

impl EntityType {
    /// Human-readable name used in log messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::DireWolf => "dire wolf",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Entry of the player's undo log. Exactly one is recorded per forward turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// The player moved by the provided motion vector. A zero motion records
    /// a wall bump or a rest.
    Move {
        /// Motion vector applied to the player position.
        motion: Coordinate,
    },
    /// The player damaged another entity.
    Damage {
        /// Entity that received the damage.
        entity: EntityId,
        /// Amount of health removed from the entity.
        damage: i32,
        /// Cell the entity occupied when it was hit.
        position: Coordinate,
    },
}

/// Events broadcast by the world after applying or reversing a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The player relocated between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: Coordinate,
        /// Cell the player occupies after moving.
        to: Coordinate,
    },
    /// The player attempted to walk into a wall and stayed in place.
    BumpedWall {
        /// Wall cell that blocked the step.
        wall: Coordinate,
    },
    /// The player spent the turn resting.
    Rested,
    /// The player struck another entity.
    Hit {
        /// Entity that was struck.
        entity: EntityId,
        /// Type of the entity that was struck.
        target: EntityType,
        /// Damage dealt by the blow.
        damage: i32,
    },
    /// The struck entity died.
    Killed {
        /// Entity that died.
        entity: EntityId,
        /// Type of the entity that died.
        target: EntityType,
        /// Cell that now holds the corpse.
        position: Coordinate,
    },
    /// The player harvested time from a first kill.
    TimeHarvested {
        /// Amount of time granted.
        amount: u32,
    },
    /// A previously recorded move was undone.
    MoveReversed {
        /// Cell the player occupied before the undo.
        from: Coordinate,
        /// Cell the player occupies after the undo.
        to: Coordinate,
    },
    /// A previously recorded blow was undone.
    Healed {
        /// Entity whose health was restored.
        entity: EntityId,
        /// Type of the healed entity.
        target: EntityType,
        /// Amount of health restored.
        amount: i32,
    },
    /// Undoing a killing blow brought the entity back to life.
    Resurrected {
        /// Entity that returned to life.
        entity: EntityId,
        /// Type of the resurrected entity.
        target: EntityType,
        /// Cell the entity occupies again.
        position: Coordinate,
    },
}

impl Event {
    /// Human-readable log line for the event, if the log sink should show it.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::BumpedWall { .. } => Some(BUMPED_WALL_MESSAGE.to_owned()),
            Self::Hit { target, damage, .. } => Some(format!("Hit {target} for {damage} damage")),
            Self::Killed { target, .. } => Some(format!("You killed the {target}.")),
            Self::TimeHarvested { amount } => {
                Some(format!("You harvest {amount} turn(s) of time."))
            }
            Self::Resurrected { target, .. } => Some(format!("The {target} returns to life.")),
            Self::PlayerMoved { .. }
            | Self::Rested
            | Self::MoveReversed { .. }
            | Self::Healed { .. } => None,
        }
    }
}

/// Gameplay constants consumed by the map loader and the turn engine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Health assigned to the player when a map is loaded.
    pub player_health: i32,
    /// Stored time assigned to the player when a map is loaded.
    pub player_time: u32,
    /// Health assigned to every dire wolf when a map is loaded.
    pub dire_wolf_health: i32,
    /// Time granted the first time an entity dies.
    pub harvest_bonus: u32,
    /// Flat damage added to every blow.
    pub base_damage: i32,
    /// Upper bound of the uniform `1..=damage_roll_max` roll added to each blow.
    pub damage_roll_max: i32,
}

impl Rules {
    /// Smallest damage a single blow can deal. Blows roll uniformly between
    /// this and [`Rules::max_damage`].
    #[must_use]
    pub fn min_damage(&self) -> i32 {
        self.base_damage + 1
    }

    /// Largest damage a single blow can deal.
    #[must_use]
    pub fn max_damage(&self) -> i32 {
        self.base_damage + self.damage_roll_max.max(1)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            player_health: 100,
            player_time: 100,
            dire_wolf_health: 30,
            harvest_bonus: 30,
            base_damage: 5,
            damage_roll_max: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_symbols_map_to_cardinal_motions() {
        assert_eq!(InputSymbol::parse("h").map(InputSymbol::motion), Some(Coordinate::new(0, -1)));
        assert_eq!(InputSymbol::parse("j").map(InputSymbol::motion), Some(Coordinate::new(1, 0)));
        assert_eq!(InputSymbol::parse("k").map(InputSymbol::motion), Some(Coordinate::new(-1, 0)));
        assert_eq!(InputSymbol::parse("l").map(InputSymbol::motion), Some(Coordinate::new(0, 1)));
        assert_eq!(InputSymbol::parse("rest").map(InputSymbol::motion), Some(Coordinate::ZERO));
    }

    #[test]
    fn unknown_keys_are_not_symbols() {
        assert_eq!(InputSymbol::parse("x"), None);
        assert_eq!(InputSymbol::parse("r"), None);
        assert_eq!(InputSymbol::parse(""), None);
    }

    #[test]
    fn interning_is_structurally_stable() {
        assert_eq!(intern(3, 4), intern(3, 4));
        assert_ne!(intern(3, 4), intern(4, 3));
        assert_eq!(intern(2, 5).offset(Coordinate::new(-1, 1)), intern(1, 6));
        assert_eq!(intern(2, -5).negated(), intern(-2, 5));
    }

    #[test]
    fn default_damage_bounds_span_six_to_ten() {
        let rules = Rules::default();
        assert_eq!(rules.min_damage(), 6);
        assert_eq!(rules.max_damage(), 10);
    }

    #[test]
    fn partial_rules_fall_back_to_defaults() {
        let rules: Rules = toml::from_str("harvest_bonus = 12\nplayer_time = 3\n").expect("parse");

        assert_eq!(rules.harvest_bonus, 12);
        assert_eq!(rules.player_time, 3);
        assert_eq!(rules.dire_wolf_health, Rules::default().dire_wolf_health);
    }

    #[test]
    fn only_notable_events_produce_messages() {
        let hit = Event::Hit {
            entity: EntityId::new(1),
            target: EntityType::DireWolf,
            damage: 7,
        };
        assert_eq!(hit.message().as_deref(), Some("Hit dire wolf for 7 damage"));

        let killed = Event::Killed {
            entity: EntityId::new(1),
            target: EntityType::DireWolf,
            position: Coordinate::new(2, 2),
        };
        assert_eq!(killed.message().as_deref(), Some("You killed the dire wolf."));

        let bump = Event::BumpedWall {
            wall: Coordinate::new(0, 2),
        };
        assert_eq!(bump.message().as_deref(), Some("Bumped wall."));

        assert!(Event::Rested.message().is_none());
        assert!(Event::PlayerMoved {
            from: Coordinate::ZERO,
            to: Coordinate::new(0, 1),
        }
        .message()
        .is_none());
    }
}
