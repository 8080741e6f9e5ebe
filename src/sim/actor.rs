//! Actors and their per-tick update rules
//!
//! The set of actor variants is closed, so they are a single enum dispatched
//! by `match`. `Actor::update` is a pure function of the actor and the
//! previous tick's state; collision effects are applied afterwards by the
//! resolution passes in [`super::collision`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{Level, Tile};
use super::state::State;
use super::tick::TickInput;
use crate::consts::*;
use crate::tuning::Tuning;

/// Death animation of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeathPhase {
    /// Just died; the next update applies the death hop
    #[default]
    Start,
    /// Hopped, now falling through the level under double gravity
    Falling,
    /// Fell past the bottom of the level
    Gone,
}

/// How a moving hazard reacts when it runs into solid geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardMotion {
    /// Reverse velocity
    Bounce,
    /// Jump back to the anchor and keep going (drips, waterfalls)
    Drip { anchor: Vec2 },
}

/// Bobbing pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Coin,
    Fire,
    Water,
    Barley,
    Hops,
}

impl Item {
    pub fn points(self) -> u64 {
        match self {
            Item::Coin => COIN_POINTS,
            _ => ITEM_POINTS,
        }
    }

    /// Collecting this item completes the level
    pub fn wins_level(self) -> bool {
        !matches!(self, Item::Coin)
    }

    pub fn size(self) -> Vec2 {
        match self {
            Item::Coin => COIN_SIZE,
            _ => ITEM_SIZE,
        }
    }
}

/// Variant-specific actor data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    Player { powered: bool, death: DeathPhase },
    Hazard { motion: HazardMotion },
    Collectible { item: Item, base_pos: Vec2, wobble: f32 },
    PowerUp { base_pos: Vec2, wobble: f32 },
    /// Walks back and forth, dies when stomped
    Patroller,
    /// Walks like a patroller; stomping it makes it slide and smash other enemies
    Grinder { sliding: bool, boosted: bool },
    /// Stationary belt; `direction` is -1 (left) or +1 (right)
    Conveyor { direction: f32 },
}

impl ActorKind {
    /// Axis-aligned bounding box size
    pub fn size(&self) -> Vec2 {
        match self {
            ActorKind::Player { .. } => PLAYER_SIZE,
            ActorKind::Hazard { .. } => HAZARD_SIZE,
            ActorKind::Collectible { item, .. } => item.size(),
            ActorKind::PowerUp { .. } => POWER_UP_SIZE,
            ActorKind::Patroller => PATROLLER_SIZE,
            ActorKind::Grinder { .. } => GRINDER_SIZE,
            ActorKind::Conveyor { .. } => CONVEYOR_SIZE,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ActorKind::Player { .. } => "player",
            ActorKind::Hazard { .. } => "hazard",
            ActorKind::Collectible { item, .. } => match item {
                Item::Coin => "coin",
                Item::Fire => "fire",
                Item::Water => "water",
                Item::Barley => "barley",
                Item::Hops => "hops",
            },
            ActorKind::PowerUp { .. } => "power-up",
            ActorKind::Patroller => "patroller",
            ActorKind::Grinder { .. } => "grinder",
            ActorKind::Conveyor { .. } => "conveyor",
        }
    }
}

/// A simulated entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub kind: ActorKind,
    /// Top-left corner of the bounding box (tiles)
    pub pos: Vec2,
    pub vel: Vec2,
    pub dead: bool,
    /// Seconds since death (enemies only)
    pub dead_time: f32,
    /// Cleared once an actor is consumed or dying; gates every overlap test
    pub interactable: bool,
    /// Drop from the actor list at the next sweep
    #[serde(default)]
    pub remove: bool,
    /// Conveyor push imprinted by this tick's conveyor pass, used by the next update
    #[serde(default)]
    pub carried: Option<f32>,
}

impl Actor {
    pub fn new(kind: ActorKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            kind,
            pos,
            vel,
            dead: false,
            dead_time: 0.0,
            interactable: true,
            remove: false,
            carried: None,
        }
    }

    /// Player standing in the given cell
    pub fn player(cell: Vec2) -> Self {
        Self::new(
            ActorKind::Player {
                powered: false,
                death: DeathPhase::Start,
            },
            cell + TALL_SPAWN_OFFSET,
            Vec2::ZERO,
        )
    }

    pub fn patroller(cell: Vec2) -> Self {
        Self::new(ActorKind::Patroller, cell, Vec2::new(PATROL_SPEED, 0.0))
    }

    pub fn grinder(cell: Vec2) -> Self {
        Self::new(
            ActorKind::Grinder {
                sliding: false,
                boosted: false,
            },
            cell + TALL_SPAWN_OFFSET,
            Vec2::new(PATROL_SPEED, 0.0),
        )
    }

    pub fn collectible(item: Item, cell: Vec2, wobble: f32) -> Self {
        let base_pos = cell + PICKUP_OFFSET;
        Self::new(
            ActorKind::Collectible {
                item,
                base_pos,
                wobble,
            },
            base_pos,
            Vec2::ZERO,
        )
    }

    pub fn power_up(cell: Vec2, wobble: f32) -> Self {
        let base_pos = cell + PICKUP_OFFSET;
        Self::new(ActorKind::PowerUp { base_pos, wobble }, base_pos, Vec2::ZERO)
    }

    pub fn hazard(cell: Vec2, vel: Vec2, motion: HazardMotion) -> Self {
        Self::new(ActorKind::Hazard { motion }, cell, vel)
    }

    pub fn conveyor(cell: Vec2, direction: f32) -> Self {
        Self::new(ActorKind::Conveyor { direction }, cell, Vec2::ZERO)
    }

    /// Build the actor seeded by a plan character, if it is one
    pub fn from_plan_char(ch: char, cell: Vec2, rng: &mut Pcg32) -> Option<Actor> {
        let mut phase = || rng.random::<f32>() * std::f32::consts::TAU;
        let actor = match ch {
            '@' => Actor::player(cell),
            'o' => Actor::collectible(Item::Coin, cell, phase()),
            'x' => Actor::collectible(Item::Fire, cell, phase()),
            'w' => Actor::collectible(Item::Water, cell, phase()),
            'b' => Actor::collectible(Item::Barley, cell, phase()),
            'h' => Actor::collectible(Item::Hops, cell, phase()),
            '9' => Actor::power_up(cell, phase()),
            '=' => Actor::hazard(cell, Vec2::new(2.0, 0.0), HazardMotion::Bounce),
            '|' => Actor::hazard(cell, Vec2::new(0.0, 2.0), HazardMotion::Bounce),
            'v' => Actor::hazard(cell, Vec2::new(0.0, 3.0), HazardMotion::Drip { anchor: cell }),
            'm' => Actor::patroller(cell),
            'n' => Actor::grinder(cell),
            '<' => Actor::conveyor(cell, -1.0),
            '>' => Actor::conveyor(cell, 1.0),
            _ => return None,
        };
        Some(actor)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.kind.size()
    }

    /// Y coordinate of the bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size().y
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, ActorKind::Player { .. })
    }

    /// Walking enemies (patrollers and grinders)
    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, ActorKind::Patroller | ActorKind::Grinder { .. })
    }

    pub fn is_sliding(&self) -> bool {
        matches!(self.kind, ActorKind::Grinder { sliding: true, .. })
    }

    pub fn is_powered(&self) -> bool {
        matches!(self.kind, ActorKind::Player { powered: true, .. })
    }

    pub fn set_powered(&mut self, value: bool) {
        if let ActorKind::Player { powered, .. } = &mut self.kind {
            *powered = value;
        }
    }

    /// Points awarded for collecting or defeating this actor
    pub fn point_value(&self) -> u64 {
        match &self.kind {
            ActorKind::Collectible { item, .. } => item.points(),
            ActorKind::PowerUp { .. } => POWER_UP_POINTS,
            ActorKind::Patroller => PATROLLER_POINTS,
            ActorKind::Grinder { .. } => GRINDER_POINTS,
            _ => 0,
        }
    }

    /// Horizontal push a conveyor imparts, `None` for everything else
    pub fn conveyor_push(&self, tuning: &Tuning) -> Option<f32> {
        match self.kind {
            ActorKind::Conveyor { direction } => Some(direction * tuning.conveyor_speed),
            _ => None,
        }
    }

    /// Kill the player in place (death animation starts on the next update)
    pub fn kill_player(&mut self) {
        if let ActorKind::Player { powered, death } = &mut self.kind {
            *powered = false;
            *death = DeathPhase::Start;
        }
        self.dead = true;
    }

    /// Kill an enemy: it freezes and stops interacting, then despawns later
    pub fn kill_enemy(&mut self) {
        self.dead = true;
        self.interactable = false;
        self.vel.x = 0.0;
    }

    /// Advance this actor one step against the previous tick's state
    pub fn update(&self, dt: f32, state: &State, input: &TickInput) -> Actor {
        let mut next = self.clone();
        // Conveyor contact is per tick; the collision pass sets it again
        next.carried = None;

        match &self.kind {
            ActorKind::Player { .. } => self.update_player(next, dt, state, input),
            ActorKind::Hazard { motion } => {
                let candidate = self.pos + self.vel * dt;
                if !state.level.touches(candidate, self.size(), Tile::Wall) {
                    next.pos = candidate;
                } else {
                    match motion {
                        HazardMotion::Drip { anchor } => next.pos = *anchor,
                        HazardMotion::Bounce => next.vel = -self.vel,
                    }
                }
                next
            }
            ActorKind::Collectible { base_pos, wobble, .. }
            | ActorKind::PowerUp { base_pos, wobble } => {
                let wobble = wobble + dt * state.tuning.wobble_speed;
                next.pos = *base_pos + Vec2::new(0.0, wobble.sin() * state.tuning.wobble_dist);
                match &mut next.kind {
                    ActorKind::Collectible { wobble: w, .. } | ActorKind::PowerUp { wobble: w, .. } => {
                        *w = wobble
                    }
                    _ => {}
                }
                next
            }
            ActorKind::Patroller | ActorKind::Grinder { .. } => {
                self.update_walker(next, dt, &state.level, &state.tuning)
            }
            ActorKind::Conveyor { .. } => next,
        }
    }

    fn update_player(&self, mut next: Actor, dt: f32, state: &State, input: &TickInput) -> Actor {
        let level = &state.level;
        let tuning = &state.tuning;
        let size = self.size();

        let mut x_speed = 0.0;
        if !self.dead {
            if input.left {
                x_speed -= tuning.player_speed;
            }
            if input.right {
                x_speed += tuning.player_speed;
            }
        } else {
            next.interactable = false;
            if let ActorKind::Player { death, .. } = &mut next.kind {
                match *death {
                    DeathPhase::Start => {
                        next.vel.y = -tuning.jump_speed * 1.5;
                        *death = DeathPhase::Falling;
                    }
                    DeathPhase::Falling => {
                        if next.pos.y > level.height as f32 {
                            *death = DeathPhase::Gone;
                        }
                    }
                    DeathPhase::Gone => {}
                }
            }
        }

        if let Some(push) = self.carried {
            x_speed += push;
        }

        next.pos = level.move_actor(&next, Vec2::new(x_speed, 0.0), dt);

        let mut y_speed = next.vel.y;
        if !self.dead {
            y_speed = (y_speed + dt * tuning.gravity).min(tuning.max_fall_speed);
            if input.up_pressed && level.is_grounded(next.pos, size, tuning.ground_probe) {
                y_speed = -tuning.jump_speed;
                log::trace!("player jump at {:?}", next.pos);
            }
        } else {
            y_speed += dt * tuning.gravity * 2.0;
        }

        let moved = level.move_actor(&next, Vec2::new(0.0, y_speed), dt);
        if moved != next.pos {
            next.pos = moved;
            next.vel.y = y_speed;
        } else {
            // Landed or bumped a ceiling
            next.vel.y = 0.0;
        }
        next.vel.x = x_speed;

        if !self.dead && level.touches(next.pos, size, Tile::Lava) {
            log::debug!("player fell into lava at {:?}", next.pos);
            next.kill_player();
        }

        next
    }

    fn update_walker(&self, mut next: Actor, dt: f32, level: &Level, tuning: &Tuning) -> Actor {
        if self.dead {
            next.dead_time += dt;
            if next.dead_time > tuning.dead_despawn {
                next.remove = true;
            }
            return next;
        }

        if let ActorKind::Grinder {
            sliding: true,
            boosted,
        } = &mut next.kind
        {
            if !*boosted {
                next.vel.x *= tuning.slide_boost;
                *boosted = true;
            }
        }

        let mut x_speed = next.vel.x;
        let push = x_speed + self.carried.unwrap_or(0.0);
        let moved = level.move_actor(&next, Vec2::new(push, 0.0), dt);
        if moved == next.pos {
            if push != 0.0 {
                x_speed = -x_speed;
            }
        } else {
            next.pos = moved;
        }

        let mut y_speed = (next.vel.y + dt * tuning.gravity).min(tuning.max_fall_speed);
        let moved = level.move_actor(&next, Vec2::new(0.0, y_speed), dt);
        if moved == next.pos {
            y_speed = 0.0;
        } else {
            next.pos = moved;
        }

        next.vel = Vec2::new(x_speed, y_speed);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::State;
    use std::sync::Arc;

    fn state(plan: &str) -> State {
        State::start(Arc::new(Level::parse(plan).unwrap()), Arc::new(Tuning::default()))
    }

    fn find(state: &State, name: &str) -> usize {
        state
            .actors
            .iter()
            .position(|a| a.kind.name() == name)
            .unwrap()
    }

    #[test]
    fn test_player_walks_and_falls_onto_floor() {
        let state = state("......\n.@....\n......\n######");
        let player = &state.actors[0];
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        let mut p = player.clone();
        for _ in 0..30 {
            p = p.update(0.05, &state, &input);
        }
        assert!(p.pos.x > player.pos.x + 3.0);
        // Comes to rest on the floor at y=3
        assert!(p.bottom() <= 3.0 && p.bottom() > 2.5);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn test_jump_requires_ground_and_edge() {
        let state = state("....\n....\n.@..\n####");
        let grounded = state.actors[0].clone();
        let held = TickInput {
            up: true,
            ..Default::default()
        };
        // Holding up without a fresh press does nothing
        let p = grounded.update(0.01, &state, &held);
        assert!(p.vel.y >= 0.0);

        let pressed = TickInput {
            up: true,
            up_pressed: true,
            ..Default::default()
        };
        let p = grounded.update(0.01, &state, &pressed);
        assert_eq!(p.vel.y, -state.tuning.jump_speed);

        // Airborne press is ignored
        let mut airborne = grounded.clone();
        airborne.pos.y -= 1.0;
        let p = airborne.update(0.01, &state, &pressed);
        assert!(p.vel.y > 0.0);
    }

    #[test]
    fn test_lava_tile_kills_player() {
        let state = state("....\n.@..\n.++.\n####");
        let mut p = state.actors[0].clone();
        p.pos.y += 0.6;
        let p = p.update(0.01, &state, &TickInput::default());
        assert!(p.dead);
        assert!(!p.is_powered());
    }

    #[test]
    fn test_dead_player_hops_then_falls_through_floor() {
        let state = state("....\n.@..\n####\n....");
        let mut p = state.actors[0].clone();
        p.kill_player();
        let p = p.update(0.05, &state, &TickInput::default());
        assert!(!p.interactable);
        assert!(p.vel.y < 0.0);
        let mut p = p;
        for _ in 0..60 {
            p = p.update(0.05, &state, &TickInput::default());
        }
        assert!(p.pos.y > state.level.height as f32);
        assert!(matches!(
            p.kind,
            ActorKind::Player {
                death: DeathPhase::Gone,
                ..
            }
        ));
    }

    #[test]
    fn test_fall_speed_is_capped() {
        let state = state("...\n.@.\n...\n...\n...\n...\n...\n...\n...\n...\n###");
        let mut p = state.actors[0].clone();
        for _ in 0..8 {
            p = p.update(0.1, &state, &TickInput::default());
            assert!(p.vel.y <= state.tuning.max_fall_speed);
        }
        assert_eq!(p.vel.y, state.tuning.max_fall_speed);
    }

    #[test]
    fn test_bounce_hazard_reverses_and_drip_resets() {
        let state = state("#=.#\n@v..\n....\n.#..");
        let i = state
            .actors
            .iter()
            .position(|a| matches!(a.kind, ActorKind::Hazard { motion: HazardMotion::Bounce }))
            .unwrap();
        let mut lava = state.actors[i].clone();
        for _ in 0..20 {
            lava = lava.update(0.1, &state, &TickInput::default());
        }
        // Trapped between walls at x=0 and x=3, never inside either
        assert!(lava.pos.x >= 1.0 && lava.pos.x <= 2.0);

        let j = state
            .actors
            .iter()
            .position(|a| matches!(a.kind, ActorKind::Hazard { motion: HazardMotion::Drip { .. } }))
            .unwrap();
        let drip = state.actors[j].clone();
        let anchor = drip.pos;
        // Falls one step, then hits the wall below and snaps back
        let moved = drip.update(0.1, &state, &TickInput::default());
        assert!(moved.pos.y > anchor.y);
        let mut d = moved;
        for _ in 0..3 {
            d = d.update(0.1, &state, &TickInput::default());
        }
        assert_eq!(d.pos, anchor);
    }

    #[test]
    fn test_coin_bobs_around_base() {
        let state = state("....\n@o..\n####");
        let coin = &state.actors[find(&state, "coin")];
        let mut c = coin.clone();
        for _ in 0..50 {
            c = c.update(0.016, &state, &TickInput::default());
            let ActorKind::Collectible { base_pos, .. } = c.kind else {
                panic!("coin changed kind");
            };
            assert!((c.pos.y - base_pos.y).abs() <= state.tuning.wobble_dist + 1e-6);
            assert_eq!(c.pos.x, base_pos.x);
        }
    }

    #[test]
    fn test_patroller_turns_at_wall() {
        let state = state("#....#\n#@.m.#\n######");
        let mut m = state.actors[find(&state, "patroller")].clone();
        let mut saw_left = false;
        for _ in 0..40 {
            m = m.update(0.05, &state, &TickInput::default());
            saw_left |= m.vel.x < 0.0;
            assert!(!state.level.touches(m.pos, m.size(), Tile::Wall));
        }
        assert!(saw_left);
    }

    #[test]
    fn test_dead_enemy_despawns_after_timer() {
        let state = state("....\n@..m\n####");
        let mut m = state.actors[find(&state, "patroller")].clone();
        m.kill_enemy();
        let frozen = m.pos;
        for _ in 0..14 {
            m = m.update(0.1, &state, &TickInput::default());
        }
        assert_eq!(m.pos, frozen);
        assert!(!m.remove);
        for _ in 0..2 {
            m = m.update(0.1, &state, &TickInput::default());
        }
        assert!(m.remove);
    }

    #[test]
    fn test_sliding_grinder_boosts_once() {
        let state = state("#..........#\n#@...n.....#\n############");
        let mut g = state.actors[find(&state, "grinder")].clone();
        if let ActorKind::Grinder { sliding, .. } = &mut g.kind {
            *sliding = true;
        }
        let g1 = g.update(0.01, &state, &TickInput::default());
        assert_eq!(g1.vel.x.abs(), PATROL_SPEED * state.tuning.slide_boost);
        let g2 = g1.update(0.01, &state, &TickInput::default());
        assert_eq!(g2.vel.x.abs(), PATROL_SPEED * state.tuning.slide_boost);
    }

    #[test]
    fn test_carried_push_applies_for_one_update() {
        let state = state("#..........#\n#@...m.....#\n############");
        let mut m = state.actors[find(&state, "patroller")].clone();
        m.carried = Some(5.0);
        let pushed = m.update(0.1, &state, &TickInput::default());
        assert!((pushed.pos.x - (m.pos.x + 0.7)).abs() < 1e-4);
        assert_eq!(pushed.carried, None);
        // Own speed is unchanged by the push
        assert_eq!(pushed.vel.x, PATROL_SPEED);
    }
}
