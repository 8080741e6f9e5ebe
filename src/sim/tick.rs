//! Simulation step
//!
//! Advances one level attempt by a single frame. The previous `State` is never
//! touched; every actor updates against it, then the collision passes fold
//! over the new actor list in order.

use super::collision::{conveyor_pass, player_pass, slide_pass};
use super::level::Tile;
use super::state::{Session, State, Status};

/// Input snapshot for a single update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Up is held
    pub up: bool,
    /// Up went down since the previous snapshot (jump edge)
    pub up_pressed: bool,
}

impl State {
    /// Advance by `dt` seconds and return the next state
    ///
    /// `dt` is clamped to `tuning.max_step`. Once the status is Won or Lost
    /// actors keep animating but nothing can change the outcome, except a
    /// pending override on the session, which is applied once.
    pub fn update(&self, dt: f32, input: &TickInput, session: &mut Session) -> State {
        let dt = dt.clamp(0.0, self.tuning.max_step);

        let mut status = self.status;
        if let Some(forced) = session.take_override() {
            log::info!("Status forced to {:?}", forced);
            status = forced;
        }

        let was_alive = self.player().is_some_and(|p| !p.dead);

        let actors = self
            .actors
            .iter()
            .map(|actor| actor.update(dt, self, input))
            .filter(|actor| !actor.remove)
            .collect();

        let mut next = State {
            level: self.level.clone(),
            tuning: self.tuning.clone(),
            actors,
            status,
            score: self.score,
            exit_reached: self.exit_reached,
        };

        let Some(player) = next.player() else {
            return next;
        };
        let alive = !player.dead;
        let at_exit = alive && next.level.touches(player.pos, player.size(), Tile::Exit);

        // Lava tiles kill inside the player's own update; count that death here
        if was_alive && !alive && !next.status.is_terminal() {
            session.record_death();
        }

        if next.status.is_terminal() {
            return next;
        }

        if at_exit {
            log::info!("Exit reached, score {}", next.score);
            next.exit_reached = true;
            next.status = Status::Won;
            return next;
        }

        if !alive {
            next.status = Status::Lost;
            return next;
        }

        conveyor_pass(&mut next);
        slide_pass(&mut next);
        player_pass(&mut next, session);

        next.actors.retain(|actor| !actor.remove);
        log::trace!("tick: {} actors, status {:?}", next.actors.len(), next.status);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Actor, ActorKind, Level};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use std::sync::Arc;

    fn start(plan: &str) -> (State, Session) {
        let tuning = Arc::new(Tuning::default());
        let session = Session::new(&tuning);
        (State::start(Arc::new(Level::parse(plan).unwrap()), tuning), session)
    }

    fn player_mut(state: &mut State) -> &mut Actor {
        let i = state.player_index().unwrap();
        &mut state.actors[i]
    }

    fn right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_dt_is_clamped() {
        let (state, mut session) = start("#..........#\n#@.........#\n############");
        let x0 = state.player().unwrap().pos.x;
        let next = state.update(5.0, &right(), &mut session);
        let moved = next.player().unwrap().pos.x - x0;
        assert!((moved - state.tuning.max_step * state.tuning.player_speed).abs() < 1e-4);
    }

    #[test]
    fn test_forced_status_sticks_and_is_consumed_once() {
        let (mut state, mut session) = start("#.o...#\n#@..m.#\n#######");
        session.force_status(Status::Won);
        state = state.update(0.05, &TickInput::default(), &mut session);
        assert_eq!(state.status, Status::Won);
        assert_eq!(session.pending_override(), None);

        let before = state.actors.clone();
        for _ in 0..10 {
            state = state.update(0.05, &TickInput::default(), &mut session);
            assert_eq!(state.status, Status::Won);
        }
        // Actors keep animating after the level is decided
        assert_ne!(state.actors, before);

        // An override can still replace a decided status
        session.force_status(Status::Lost);
        state = state.update(0.05, &TickInput::default(), &mut session);
        assert_eq!(state.status, Status::Lost);
    }

    #[test]
    fn test_coin_collected_once() {
        let (mut state, mut session) = start("#......#\n#@o....#\n########");
        for _ in 0..10 {
            state = state.update(0.05, &right(), &mut session);
        }
        assert_eq!(state.score, crate::consts::COIN_POINTS);
        assert_eq!(session.coins, 1);
        assert!(state.actors.iter().all(|a| a.kind.name() != "coin"));
        assert_eq!(state.status, Status::Playing);
    }

    #[test]
    fn test_fiftieth_coin_grants_life() {
        let (mut state, mut session) = start("#......#\n#@o....#\n########");
        session.coins = 49;
        let lives = session.lives;
        for _ in 0..10 {
            state = state.update(0.05, &right(), &mut session);
        }
        assert_eq!(session.coins, 50);
        assert_eq!(session.lives, lives + 1);
    }

    #[test]
    fn test_stomp_kills_patroller() {
        let (mut state, mut session) = start("#......#\n#@.....#\n#...m..#\n########");
        let m = state.actors.iter().position(|a| a.kind.name() == "patroller").unwrap();
        let top = state.actors[m].pos;
        player_mut(&mut state).pos = Vec2::new(top.x, top.y - crate::consts::PLAYER_SIZE.y + 0.2);

        state = state.update(0.01, &TickInput::default(), &mut session);
        let patroller = state.actors.iter().find(|a| a.kind.name() == "patroller").unwrap();
        assert!(patroller.dead);
        assert!(!patroller.interactable);
        assert_eq!(patroller.vel.x, 0.0);
        assert_eq!(state.score, crate::consts::PATROLLER_POINTS);
        assert!(!state.player().unwrap().dead);
        assert_eq!(state.status, Status::Playing);
    }

    #[test]
    fn test_side_hit_kills_player() {
        let (mut state, mut session) = start("#.......#\n#@.m....#\n#########");
        let lives = session.lives;
        for _ in 0..20 {
            state = state.update(0.05, &right(), &mut session);
            if state.status != Status::Playing {
                break;
            }
        }
        assert_eq!(state.status, Status::Lost);
        assert!(state.player().unwrap().dead);
        assert_eq!(session.lives, lives - 1);
        assert_eq!(session.deaths, 1);
        assert!(state.actors.iter().all(|a| !a.is_enemy()));

        // Further ticks never count the death again
        for _ in 0..20 {
            state = state.update(0.05, &right(), &mut session);
        }
        assert_eq!(session.deaths, 1);
    }

    #[test]
    fn test_stomped_grinder_slides_into_patroller() {
        let plan = "#..........#\n#@.........#\n#..........#\n#...n...m..#\n############";
        let (mut state, mut session) = start(plan);
        let g = state.actors.iter().position(|a| a.kind.name() == "grinder").unwrap();
        let top = state.actors[g].pos;
        player_mut(&mut state).pos = Vec2::new(top.x, top.y - crate::consts::PLAYER_SIZE.y + 0.2);

        state = state.update(0.01, &TickInput::default(), &mut session);
        let grinder = state.actors.iter().find(|a| a.kind.name() == "grinder").unwrap();
        assert!(grinder.is_sliding());
        assert!(state.player().unwrap().vel.y < 0.0);
        assert_eq!(state.score, 0);

        // Park the player out of the way and let the shell travel
        let player = player_mut(&mut state);
        player.pos = Vec2::new(1.0, 2.5);
        player.vel = Vec2::ZERO;

        let mut smashed = false;
        for _ in 0..40 {
            state = state.update(0.05, &TickInput::default(), &mut session);
            if state.actors.iter().any(|a| a.kind.name() == "patroller" && a.dead) {
                smashed = true;
                break;
            }
        }
        assert!(smashed);
        assert_eq!(state.score, crate::consts::PATROLLER_POINTS);
        assert_eq!(state.status, Status::Playing);
    }

    #[test]
    fn test_conveyor_carries_player() {
        let (mut state, mut session) = start("#.......#\n#@.>>>..#\n#########");
        player_mut(&mut state).pos.x = 3.0;

        // First tick imprints the push, the second applies it
        state = state.update(0.1, &TickInput::default(), &mut session);
        assert_eq!(state.player().unwrap().carried, Some(state.tuning.conveyor_speed));
        let x0 = state.player().unwrap().pos.x;
        state = state.update(0.1, &TickInput::default(), &mut session);
        let x1 = state.player().unwrap().pos.x;
        assert!((x1 - x0 - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_lava_tile_death_counted_once() {
        let (mut state, mut session) = start("#.....#\n#@++..#\n#######");
        let lives = session.lives;
        state = state.update(0.05, &right(), &mut session);
        assert!(state.player().unwrap().dead);
        assert_eq!(state.status, Status::Lost);
        for _ in 0..40 {
            state = state.update(0.05, &right(), &mut session);
        }
        assert_eq!(session.lives, lives - 1);
        assert_eq!(session.deaths, 1);
        assert!(matches!(
            state.player().unwrap().kind,
            ActorKind::Player { powered: false, .. }
        ));
    }

    #[test]
    fn test_long_fall_lands_on_thin_floor() {
        let mut rows = vec!["....."; 32];
        rows[1] = ".@...";
        rows[26] = "#####";
        rows[31] = "#####";
        let (mut state, mut session) = start(&rows.join("\n"));

        for _ in 0..60 {
            state = state.update(0.1, &TickInput::default(), &mut session);
        }
        let player = state.player().unwrap();
        assert!(player.bottom() <= 26.0 + 1e-4, "fell through to {}", player.bottom());
        assert!(player.bottom() > 25.0);
        assert!(!player.dead);
        assert_eq!(state.status, Status::Playing);
    }

    #[test]
    fn test_exit_wins() {
        let (mut state, mut session) = start("#.....#\n#@..E.#\n#######");
        for _ in 0..20 {
            state = state.update(0.05, &right(), &mut session);
            if state.status.is_terminal() {
                break;
            }
        }
        assert_eq!(state.status, Status::Won);
        assert!(state.exit_reached);
    }

    #[test]
    fn test_same_inputs_same_states() {
        let plan = "#...........#\n#.o.9..x....#\n#@..m..n.>>.#\n#############";
        let inputs: Vec<TickInput> = (0..120)
            .map(|i| TickInput {
                right: i % 7 != 0,
                left: i % 13 == 0,
                up: i % 11 < 3,
                up_pressed: i % 11 == 0,
            })
            .collect();

        let run = || {
            let (mut state, mut session) = start(plan);
            let mut frames = Vec::new();
            for input in &inputs {
                state = state.update(1.0 / 60.0, input, &mut session);
                assert_eq!(state.player_count(), 1);
                frames.push(serde_json::to_string(&state).unwrap());
            }
            (frames, session)
        };

        let (a, session_a) = run();
        let (b, session_b) = run();
        assert_eq!(a, b);
        assert_eq!(session_a, session_b);
    }
}
