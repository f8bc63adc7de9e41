//! Builds the initial world state from a text map.

use std::collections::{HashMap, HashSet};

use rewind_core::{intern, Coordinate, EntityId, Rules};
use thiserror::Error;

use crate::{DireWolf, Entity, EntityKind, Player, State};

/// Errors that can occur while loading a text map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The map does not contain a `@` cell.
    #[error("map does not place the player (expected one '@')")]
    MissingPlayer,
    /// The map contains more than one `@` cell.
    #[error("map places the player twice, at {first} and {second}")]
    DuplicatePlayer {
        /// First player cell encountered while scanning.
        first: Coordinate,
        /// Second player cell encountered while scanning.
        second: Coordinate,
    },
}

impl State {
    /// Loads a rectangular text map.
    ///
    /// `@` places the player on ground, `#` a wall, `.` ground and `w` a dire
    /// wolf without ground. Other characters leave the cell empty. The width is
    /// the longest line and the height the number of `\n`-separated lines.
    pub fn from_map(map: &str, rules: &Rules) -> Result<Self, MapError> {
        let mut wall_tiles = HashSet::new();
        let mut ground_tiles = HashSet::new();
        let mut entities = HashMap::new();
        let mut roster = Vec::new();
        let mut player: Option<(EntityId, Coordinate)> = None;

        let lines: Vec<&str> = map
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        let width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        for (row, line) in (0_i32..).zip(&lines) {
            for (column, character) in (0_i32..).zip(line.chars()) {
                let coordinate = intern(row, column);
                match character {
                    '@' => {
                        if let Some((_, first)) = player {
                            return Err(MapError::DuplicatePlayer {
                                first,
                                second: coordinate,
                            });
                        }
                        let id = next_id(&roster);
                        roster.push(Entity::new(
                            id,
                            EntityKind::Player(Player {
                                health: rules.player_health,
                                time: rules.player_time,
                                actions: Vec::new(),
                            }),
                        ));
                        let _ = entities.insert(coordinate, id);
                        let _ = ground_tiles.insert(coordinate);
                        player = Some((id, coordinate));
                    }
                    '#' => {
                        let _ = wall_tiles.insert(coordinate);
                    }
                    '.' => {
                        let _ = ground_tiles.insert(coordinate);
                    }
                    'w' => {
                        let id = next_id(&roster);
                        roster.push(Entity::new(
                            id,
                            EntityKind::DireWolf(DireWolf {
                                health: rules.dire_wolf_health,
                                motions: Vec::new(),
                            }),
                        ));
                        let _ = entities.insert(coordinate, id);
                    }
                    _ => {}
                }
            }
        }

        let (player, player_position) = player.ok_or(MapError::MissingPlayer)?;

        Ok(Self {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(lines.len()).unwrap_or(u32::MAX),
            player,
            player_position,
            wall_tiles,
            ground_tiles,
            entities,
            dead_entities: HashMap::new(),
            roster,
            rules: rules.clone(),
        })
    }
}

fn next_id(roster: &[Entity]) -> EntityId {
    EntityId::new(u32::try_from(roster.len()).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query;
    use rewind_core::EntityType;

    #[test]
    fn loads_walls_ground_player_and_wolves() {
        let state = State::from_map("#####\n#@.w#\n#####", &Rules::default()).expect("map loads");

        assert_eq!(query::dimensions(&state), (5, 3));
        assert_eq!(query::player_position(&state), Coordinate::new(1, 1));
        assert!(query::is_ground(&state, Coordinate::new(1, 1)));
        assert!(query::is_ground(&state, Coordinate::new(1, 2)));
        assert!(query::is_wall(&state, Coordinate::new(0, 4)));

        let wolf = query::entity_at(&state, Coordinate::new(1, 3)).expect("wolf");
        assert_eq!(wolf.entity_type(), EntityType::DireWolf);
        assert_eq!(wolf.health(), 30);
        assert!(wolf.alive());
        assert!(!query::is_ground(&state, Coordinate::new(1, 3)));

        let player = query::player(&state).expect("player");
        assert_eq!(player.health(), 100);
        assert_eq!(player.time(), 100);
    }

    #[test]
    fn width_is_the_longest_line() {
        let state = State::from_map("\n  #.@.#\n#", &Rules::default()).expect("map loads");

        assert_eq!(query::dimensions(&state), (7, 3));
        assert_eq!(query::player_position(&state), Coordinate::new(1, 4));
    }

    #[test]
    fn missing_player_is_rejected() {
        let error = State::from_map("###\n#.#\n###", &Rules::default())
            .expect_err("map without player must be rejected");

        assert_eq!(error, MapError::MissingPlayer);
    }

    #[test]
    fn duplicate_player_is_rejected() {
        let error = State::from_map("#@@#", &Rules::default())
            .expect_err("map with two players must be rejected");

        assert_eq!(
            error,
            MapError::DuplicatePlayer {
                first: Coordinate::new(0, 1),
                second: Coordinate::new(0, 2),
            }
        );
    }

    #[test]
    fn rules_seed_entity_attributes() {
        let rules = Rules {
            player_health: 12,
            player_time: 4,
            dire_wolf_health: 9,
            ..Rules::default()
        };
        let state = State::from_map("@w", &rules).expect("map loads");

        let player = query::player(&state).expect("player");
        assert_eq!(player.health(), 12);
        assert_eq!(player.time(), 4);
        let wolf = query::entity_at(&state, Coordinate::new(0, 1)).expect("wolf");
        assert_eq!(wolf.health(), 9);
    }
}
