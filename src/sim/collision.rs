//! Collision detection and response between actors
//!
//! Detection is a plain AABB test gated on `interactable`. Response runs as
//! three sequential passes over the actor list, each mutating actors in place
//! by index, so later resolutions in a tick see the effects of earlier ones:
//! 1. conveyors imprint their push on anything standing on them
//! 2. sliding grinders smash other enemies
//! 3. the player collides with everything else, in actor-list order

use glam::Vec2;

use super::actor::{ActorKind, Item};
use super::state::{Session, State, Status};
use super::Actor;

/// Strict overlap of two boxes given by top-left corner and size
#[inline]
pub fn boxes_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x + a_size.x > b_pos.x
        && a_pos.x < b_pos.x + b_size.x
        && a_pos.y + a_size.y > b_pos.y
        && a_pos.y < b_pos.y + b_size.y
}

/// Overlap test between two actors; consumed or dying actors never overlap
pub fn overlap(a: &Actor, b: &Actor) -> bool {
    a.interactable && b.interactable && boxes_overlap(a.pos, a.size(), b.pos, b.size())
}

/// Mark an actor for removal and take it out of further overlap tests
fn consume(actor: &mut Actor) {
    actor.remove = true;
    actor.interactable = false;
}

/// Imprint each conveyor's push on overlapping players and walking enemies
pub(crate) fn conveyor_pass(state: &mut State) {
    for c in 0..state.actors.len() {
        let Some(push) = state.actors[c].conveyor_push(&state.tuning) else {
            continue;
        };
        for i in 0..state.actors.len() {
            if i == c {
                continue;
            }
            let rider = &state.actors[i];
            if (rider.is_player() || rider.is_enemy()) && overlap(&state.actors[c], rider) {
                state.actors[i].carried = Some(push);
            }
        }
    }
}

/// Sliding grinders kill the enemies they run into
pub(crate) fn slide_pass(state: &mut State) {
    for s in 0..state.actors.len() {
        if !state.actors[s].is_sliding() {
            continue;
        }
        for o in 0..state.actors.len() {
            if o == s || !state.actors[o].is_enemy() {
                continue;
            }
            if !overlap(&state.actors[s], &state.actors[o]) {
                continue;
            }

            match state.actors[o].kind {
                ActorKind::Grinder { sliding: true, .. } => {
                    // Two sliding shells wreck each other; nobody scores
                    state.actors[s].kill_enemy();
                    state.actors[o].kill_enemy();
                    log::debug!("sliding grinders collided");
                }
                ActorKind::Grinder { .. } => {
                    let points = state.actors[o].point_value() / 2;
                    state.actors[o].kill_enemy();
                    state.score += points;
                    log::debug!("sliding grinder smashed grinder, +{}", points);
                }
                ActorKind::Patroller => {
                    let points = state.actors[o].point_value();
                    state.actors[o].kill_enemy();
                    state.score += points;
                    log::debug!("sliding grinder smashed patroller, +{}", points);
                }
                _ => {}
            }

            if !state.actors[s].interactable {
                break;
            }
        }
    }
}

/// Resolve the player against every other overlapping actor
pub(crate) fn player_pass(state: &mut State, session: &mut Session) {
    let Some(p) = state.player_index() else {
        return;
    };
    for i in 0..state.actors.len() {
        if i == p {
            continue;
        }
        if state.actors[p].dead {
            break;
        }
        if overlap(&state.actors[i], &state.actors[p]) {
            collide(state, session, i, p);
        }
    }
}

/// Per-variant response to the player touching actor `i`
fn collide(state: &mut State, session: &mut Session, i: usize, p: usize) {
    match state.actors[i].kind {
        ActorKind::Hazard { .. } => {
            log::debug!("player touched a hazard");
            kill_player(state, session, p);
        }
        ActorKind::Collectible { item, .. } => collect(state, session, i, item),
        ActorKind::PowerUp { .. } => {
            let points = state.actors[i].point_value();
            consume(&mut state.actors[i]);
            state.score += points;
            // A second power-up while powered takes the power away again
            let powered = !state.actors[p].is_powered();
            state.actors[p].set_powered(powered);
            log::debug!("power-up collected, powered={}", powered);
        }
        ActorKind::Patroller => {
            if stomped(state, i, p) {
                let points = state.actors[i].point_value();
                state.actors[i].kill_enemy();
                state.score += points;
                log::debug!("patroller stomped, +{}", points);
            } else {
                hit_by_enemy(state, session, i, p);
            }
        }
        ActorKind::Grinder { .. } => {
            if stomped(state, i, p) {
                if let ActorKind::Grinder { sliding, .. } = &mut state.actors[i].kind {
                    *sliding = true;
                }
                state.actors[p].vel.y = -state.tuning.jump_speed / 1.5;
                log::debug!("grinder stomped, now sliding");
            } else {
                hit_by_enemy(state, session, i, p);
            }
        }
        ActorKind::Conveyor { .. } | ActorKind::Player { .. } => {}
    }
}

/// Player's feet are above the enemy's top plus the stomp margin
fn stomped(state: &State, enemy: usize, p: usize) -> bool {
    state.actors[p].bottom() < state.actors[enemy].pos.y + state.tuning.stomp_margin
}

/// Side contact with a walking enemy: a powered player loses the power,
/// anyone else dies. The enemy is removed either way.
fn hit_by_enemy(state: &mut State, session: &mut Session, enemy: usize, p: usize) {
    if state.actors[p].is_powered() {
        state.actors[p].set_powered(false);
        log::debug!("player depowered by {}", state.actors[enemy].kind.name());
    } else {
        log::debug!("player killed by {}", state.actors[enemy].kind.name());
        kill_player(state, session, p);
    }
    consume(&mut state.actors[enemy]);
}

fn kill_player(state: &mut State, session: &mut Session, p: usize) {
    if state.actors[p].dead {
        return;
    }
    state.actors[p].kill_player();
    state.actors[p].interactable = false;
    session.record_death();
    state.status = Status::Lost;
}

fn collect(state: &mut State, session: &mut Session, i: usize, item: Item) {
    let points = item.points();
    consume(&mut state.actors[i]);
    state.score += points;
    if item == Item::Coin && session.record_coin(state.tuning.coins_per_life) {
        log::debug!("coin {} earned an extra life", session.coins);
    }
    if item.wins_level() {
        log::info!("{} collected, level won", state.actors[i].kind.name());
        state.status = Status::Won;
    }
}
