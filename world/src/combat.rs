//! Melee combat resolution and its exact inverse.

use log::debug;
use rand::Rng;
use rewind_core::{Action, Coordinate, EntityId, Event};

use crate::State;

/// Resolves a blow from the player against the living entity at `position`.
///
/// The player never moves on a combat turn. A killing blow moves the entity
/// into the corpse set of its cell and, on the entity's first death only,
/// grants the player the harvest bonus.
pub(crate) fn strike<R>(
    state: &mut State,
    target: EntityId,
    position: Coordinate,
    rng: &mut R,
    out_events: &mut Vec<Event>,
) where
    R: Rng,
{
    let damage = roll_damage(state, rng);
    let harvest_bonus = state.rules.harvest_bonus;

    let Some(entity) = state.entity_mut(target) else {
        return;
    };
    let health = entity.health_mut();
    *health -= damage;
    let remaining = *health;
    let target_type = entity.entity_type();

    state.record(Action::Damage {
        entity: target,
        damage,
        position,
    });
    out_events.push(Event::Hit {
        entity: target,
        target: target_type,
        damage,
    });
    debug!("hit {target_type} {} for {damage}, {remaining} left", target.get());

    if remaining > 0 {
        return;
    }

    let Some(entity) = state.entity_mut(target) else {
        return;
    };
    entity.alive = false;
    let first_death = !entity.time_has_been_harvested;
    entity.time_has_been_harvested = true;

    let _ = state.entities.remove(&position);
    let _ = state
        .dead_entities
        .entry(position)
        .or_default()
        .insert(target);
    out_events.push(Event::Killed {
        entity: target,
        target: target_type,
        position,
    });

    if first_death {
        if let Some(player) = state.player_mut() {
            player.time = player.time.saturating_add(harvest_bonus);
        }
        out_events.push(Event::TimeHarvested {
            amount: harvest_bonus,
        });
    }
}

/// Restores the health removed by a recorded blow, resurrecting the entity
/// when the blow was the one that killed it.
pub(crate) fn undo_strike(
    state: &mut State,
    target: EntityId,
    damage: i32,
    position: Coordinate,
    out_events: &mut Vec<Event>,
) {
    let Some(entity) = state.entity_mut(target) else {
        return;
    };
    let health = entity.health_mut();
    let before = *health;
    *health += damage;
    let after = *health;
    let target_type = entity.entity_type();
    out_events.push(Event::Healed {
        entity: target,
        target: target_type,
        amount: damage,
    });

    if before > 0 || after <= 0 {
        return;
    }

    entity.alive = true;
    if let Some(corpses) = state.dead_entities.get_mut(&position) {
        let _ = corpses.remove(&target);
        if corpses.is_empty() {
            let _ = state.dead_entities.remove(&position);
        }
    }
    let _ = state.entities.insert(position, target);
    debug!("{target_type} {} resurrected at {position}", target.get());
    out_events.push(Event::Resurrected {
        entity: target,
        target: target_type,
        position,
    });
}

fn roll_damage<R>(state: &State, rng: &mut R) -> i32
where
    R: Rng,
{
    rng.gen_range(state.rules.min_damage()..=state.rules.max_damage())
}
