#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state and the reversible turn engine for Rewind.
//!
//! The world owns the grid model (walls, ground, live entities and corpses)
//! and exposes two entry points: [`apply_turn`] advances the simulation by one
//! input symbol and [`reverse_turn`] undoes the most recent turn by popping the
//! player's action log. Both report what happened through [`Event`] values so
//! adapters never need to diff the state themselves.

mod combat;
mod loader;

use std::collections::{BTreeSet, HashMap, HashSet};

use log::{debug, warn};
use rand::Rng;
use rewind_core::{Action, Coordinate, EntityId, EntityType, Event, InputSymbol, Rules};

pub use loader::MapError;

/// Represents the authoritative Rewind world state.
///
/// The state is mutated in place by the turn engine. Callers that need history
/// clone it before applying a turn.
#[derive(Clone, Debug)]
pub struct State {
    width: u32,
    height: u32,
    player: EntityId,
    player_position: Coordinate,
    wall_tiles: HashSet<Coordinate>,
    ground_tiles: HashSet<Coordinate>,
    entities: HashMap<Coordinate, EntityId>,
    dead_entities: HashMap<Coordinate, BTreeSet<EntityId>>,
    roster: Vec<Entity>,
    rules: Rules,
}

impl State {
    fn entity(&self, id: EntityId) -> Option<&Entity> {
        let index = usize::try_from(id.get()).ok()?;
        self.roster.get(index)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = usize::try_from(id.get()).ok()?;
        self.roster.get_mut(index)
    }

    fn player_mut(&mut self) -> Option<&mut Player> {
        let id = self.player;
        match self.entity_mut(id)?.kind_mut() {
            EntityKind::Player(player) => Some(player),
            EntityKind::DireWolf(_) => None,
        }
    }

    fn record(&mut self, action: Action) {
        if let Some(player) = self.player_mut() {
            player.actions.push(action);
        }
    }

    fn relocate_player(&mut self, destination: Coordinate) {
        let _ = self.entities.remove(&self.player_position);
        let _ = self.entities.insert(destination, self.player);
        self.player_position = destination;
    }
}

/// Entity occupying a grid cell, alive or dead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    alive: bool,
    time_has_been_harvested: bool,
    kind: EntityKind,
}

impl Entity {
    fn new(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            alive: true,
            time_has_been_harvested: false,
            kind,
        }
    }

    /// Identifier of the entity within the world roster.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Reports whether the entity is currently alive.
    #[must_use]
    pub const fn alive(&self) -> bool {
        self.alive
    }

    /// Reports whether the entity's death already granted time to the player.
    #[must_use]
    pub const fn time_has_been_harvested(&self) -> bool {
        self.time_has_been_harvested
    }

    /// Variant-specific state of the entity.
    #[must_use]
    pub const fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Discriminant of the entity variant.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self.kind {
            EntityKind::Player(_) => EntityType::Player,
            EntityKind::DireWolf(_) => EntityType::DireWolf,
        }
    }

    /// Current health of the entity. May be zero or negative once dead.
    #[must_use]
    pub const fn health(&self) -> i32 {
        match &self.kind {
            EntityKind::Player(player) => player.health,
            EntityKind::DireWolf(wolf) => wolf.health,
        }
    }

    fn kind_mut(&mut self) -> &mut EntityKind {
        &mut self.kind
    }

    fn health_mut(&mut self) -> &mut i32 {
        match &mut self.kind {
            EntityKind::Player(player) => &mut player.health,
            EntityKind::DireWolf(wolf) => &mut wolf.health,
        }
    }
}

/// Variant-specific entity state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// The player character.
    Player(Player),
    /// A dire wolf monster.
    DireWolf(DireWolf),
}

/// Player state, including the stored time and the undo log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    health: i32,
    time: u32,
    actions: Vec<Action>,
}

impl Player {
    /// Current health of the player.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Stored time available for rewinding.
    #[must_use]
    pub const fn time(&self) -> u32 {
        self.time
    }

    /// Actions recorded by forward turns, oldest first.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

/// Dire wolf state. Wolves never act on their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DireWolf {
    health: i32,
    motions: Vec<Coordinate>,
}

impl DireWolf {
    /// Current health of the wolf.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Motions performed by the wolf, oldest first.
    #[must_use]
    pub fn motions(&self) -> &[Coordinate] {
        &self.motions
    }
}

/// Decodes `key` and applies it as a turn, reporting whether a turn was taken.
/// Keys outside the input vocabulary leave the state untouched and record
/// nothing.
#[must_use]
pub fn apply_key<R>(
    state: &mut State,
    key: &str,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) -> bool
where
    R: Rng,
{
    let Some(symbol) = InputSymbol::parse(key) else {
        debug!("ignoring unrecognised key {key:?}");
        return false;
    };
    apply_turn(state, symbol, rng, out_events);
    true
}

/// Applies one input symbol to the world.
///
/// Every call records exactly one [`Action`] on the player's stack: a
/// [`Action::Move`] for movement, rests and wall bumps (with a zero motion for
/// the latter two) or an [`Action::Damage`] when the target cell holds another
/// living entity. Each turn costs one unit of stored time, floored at zero.
pub fn apply_turn<R>(
    state: &mut State,
    symbol: InputSymbol,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) where
    R: Rng,
{
    let Some(player) = state.player_mut() else {
        return;
    };
    player.time = player.time.saturating_sub(1);

    let motion = symbol.motion();
    let from = state.player_position;
    let target = from.offset(motion);
    debug!("applying {symbol:?} from {from} toward {target}");

    if state.wall_tiles.contains(&target) {
        state.record(Action::Move {
            motion: Coordinate::ZERO,
        });
        out_events.push(Event::BumpedWall { wall: target });
        return;
    }

    if let Some(&occupant) = state.entities.get(&target) {
        if occupant != state.player {
            combat::strike(state, occupant, target, rng, out_events);
            return;
        }
    }

    state.relocate_player(target);
    state.record(Action::Move { motion });
    if motion.is_zero() {
        out_events.push(Event::Rested);
    } else {
        out_events.push(Event::PlayerMoved { from, to: target });
    }
}

/// Undoes the most recent forward turn.
///
/// Reversing costs one unit of stored time as well. Callers must not reverse
/// while the player's time is zero: debug builds assert this precondition and
/// release builds log a warning and leave the state untouched. An empty action
/// log only spends the time.
pub fn reverse_turn(state: &mut State, out_events: &mut Vec<Event>) {
    let Some(player) = state.player_mut() else {
        return;
    };
    debug_assert!(player.time > 0, "reverse_turn requires stored time");
    let Some(time) = player.time.checked_sub(1) else {
        warn!("reverse_turn called without stored time, action log left intact");
        return;
    };
    player.time = time;

    let Some(action) = player.actions.pop() else {
        debug!("nothing to reverse");
        return;
    };
    debug!("reversing {action:?}");

    match action {
        Action::Move { motion } => {
            let from = state.player_position;
            let to = from.offset(motion.negated());
            state.relocate_player(to);
            out_events.push(Event::MoveReversed { from, to });
        }
        Action::Damage {
            entity,
            damage,
            position,
        } => combat::undo_strike(state, entity, damage, position, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use super::{Entity, EntityKind, Player, State};
    use rewind_core::{intern, Coordinate, EntityId, EntityType};

    /// Occupant drawn in the foreground of a tile.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Occupant {
        /// A living entity of the given type.
        Entity(EntityType),
        /// A wall.
        Wall,
    }

    /// Everything a renderer needs to know about a single cell.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TileFacts {
        /// Cell address.
        pub coordinate: Coordinate,
        /// Whether the cell has ground.
        pub ground: bool,
        /// Living entity or wall occupying the cell.
        pub occupant: Option<Occupant>,
        /// Types of the corpses accumulated on the cell.
        pub corpses: Vec<EntityType>,
    }

    /// Width and height of the grid, in cells.
    #[must_use]
    pub fn dimensions(state: &State) -> (u32, u32) {
        (state.width, state.height)
    }

    /// Current cell of the player.
    #[must_use]
    pub fn player_position(state: &State) -> Coordinate {
        state.player_position
    }

    /// Player state, if the roster holds one.
    #[must_use]
    pub fn player(state: &State) -> Option<&Player> {
        match state.entity(state.player)?.kind() {
            EntityKind::Player(player) => Some(player),
            EntityKind::DireWolf(_) => None,
        }
    }

    /// Looks up an entity by identifier, alive or dead.
    #[must_use]
    pub fn entity(state: &State, id: EntityId) -> Option<&Entity> {
        state.entity(id)
    }

    /// Living entity occupying the cell, if any.
    #[must_use]
    pub fn entity_at(state: &State, coordinate: Coordinate) -> Option<&Entity> {
        let id = state.entities.get(&coordinate)?;
        state.entity(*id)
    }

    /// Identifiers of the corpses accumulated on the cell.
    #[must_use]
    pub fn corpses_at(state: &State, coordinate: Coordinate) -> Option<&BTreeSet<EntityId>> {
        state.dead_entities.get(&coordinate)
    }

    /// Reports whether the cell holds a wall.
    #[must_use]
    pub fn is_wall(state: &State, coordinate: Coordinate) -> bool {
        state.wall_tiles.contains(&coordinate)
    }

    /// Reports whether the cell has ground.
    #[must_use]
    pub fn is_ground(state: &State, coordinate: Coordinate) -> bool {
        state.ground_tiles.contains(&coordinate)
    }

    /// Every coordinate of the grid, row-major.
    #[must_use]
    pub fn coordinates(state: &State) -> Vec<Vec<Coordinate>> {
        let rows = i32::try_from(state.height).unwrap_or(i32::MAX);
        let columns = i32::try_from(state.width).unwrap_or(i32::MAX);
        (0..rows)
            .map(|row| (0..columns).map(|column| intern(row, column)).collect())
            .collect()
    }

    /// Collects the renderer-facing facts of a single cell.
    #[must_use]
    pub fn tile_facts(state: &State, coordinate: Coordinate) -> TileFacts {
        let occupant = entity_at(state, coordinate)
            .map(|entity| Occupant::Entity(entity.entity_type()))
            .or_else(|| is_wall(state, coordinate).then_some(Occupant::Wall));
        let corpses = corpses_at(state, coordinate)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.entity(*id))
                    .map(Entity::entity_type)
                    .collect()
            })
            .unwrap_or_default();

        TileFacts {
            coordinate,
            ground: is_ground(state, coordinate),
            occupant,
            corpses,
        }
    }

    /// Collects the tile facts of every provided coordinate, preserving layout.
    #[must_use]
    pub fn floor(state: &State, coordinates: &[Vec<Coordinate>]) -> Vec<Vec<TileFacts>> {
        coordinates
            .iter()
            .map(|row| row.iter().map(|coordinate| tile_facts(state, *coordinate)).collect())
            .collect()
    }
}
