//! Frame driver
//!
//! Turns raw key events into per-frame input snapshots, runs one level attempt
//! until it is decided, and sequences attempts through a list of levels while
//! the session has lives left.

use std::sync::Arc;

use crate::error::LevelError;
use crate::sim::{Level, Session, State, Status, TickInput};
use crate::tuning::Tuning;

/// Keys the simulation cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
}

/// Held-key tracking with a one-shot latch for the jump edge
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    left: bool,
    right: bool,
    up: bool,
    up_latch: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Up => {
                // Auto-repeat keydowns while held do not re-arm the latch
                if !self.up {
                    self.up_latch = true;
                }
                self.up = true;
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Up => self.up = false,
        }
    }

    /// Input for the next frame; the Up press is reported at most once
    pub fn snapshot(&mut self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            up: self.up,
            up_pressed: std::mem::take(&mut self.up_latch),
        }
    }
}

/// One attempt at one level
#[derive(Debug, Clone)]
pub struct LevelRunner {
    state: State,
    /// Grace time left once the level is decided
    ending: Option<f32>,
}

impl LevelRunner {
    pub fn new(level: Arc<Level>, tuning: Arc<Tuning>, score: u64) -> Self {
        Self {
            state: State::start(level, tuning).with_score(score),
            ending: None,
        }
    }

    /// Latest state, for display
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Advance one frame. Returns the outcome once the level is decided and
    /// the ending grace has run out.
    pub fn frame(&mut self, dt: f32, input: &TickInput, session: &mut Session) -> Option<Status> {
        let dt = dt.clamp(0.0, self.state.tuning.max_step);
        self.state = self.state.update(dt, input, session);

        if !self.state.status.is_terminal() {
            return None;
        }
        let grace = self.state.tuning.ending_grace;
        let remaining = self.ending.get_or_insert(grace);
        *remaining -= dt;
        if *remaining > 0.0 {
            return None;
        }
        Some(self.state.status)
    }
}

/// Where a campaign stands after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    /// Level `index` was won; the next one has started
    LevelWon { index: usize },
    /// Level `index` was lost; it restarts
    LevelLost { index: usize },
    /// Every level won
    Completed,
    /// Out of lives
    GameOver,
}

impl Progress {
    pub fn is_finished(self) -> bool {
        matches!(self, Progress::Completed | Progress::GameOver)
    }
}

/// Ordered sequence of levels played with a shared session
#[derive(Debug, Clone)]
pub struct Campaign {
    levels: Vec<Arc<Level>>,
    tuning: Arc<Tuning>,
    session: Session,
    index: usize,
    runner: LevelRunner,
    finished: Option<Progress>,
}

impl Campaign {
    /// Parse every plan up front so a bad level fails before play starts
    pub fn new(plans: &[&str], tuning: Arc<Tuning>) -> Result<Self, LevelError> {
        let levels = plans
            .iter()
            .map(|plan| Level::parse(plan).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        let first = levels.first().cloned().ok_or(LevelError::Empty)?;
        let session = Session::new(&tuning);
        log::info!("Campaign of {} levels, {} lives", levels.len(), session.lives);
        Ok(Self {
            runner: LevelRunner::new(first, tuning.clone(), 0),
            levels,
            tuning,
            session,
            index: 0,
            finished: None,
        })
    }

    pub fn state(&self) -> &State {
        self.runner.state()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable session access for debug hooks such as `force_status`
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn level_index(&self) -> usize {
        self.index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn frame(&mut self, dt: f32, input: &TickInput) -> Progress {
        if let Some(done) = self.finished {
            return done;
        }

        let Some(outcome) = self.runner.frame(dt, input, &mut self.session) else {
            return Progress::Running;
        };
        // Points persist whether the attempt was won or lost
        self.session.score = self.runner.state().score;

        match outcome {
            Status::Won => {
                let won = self.index;
                self.index += 1;
                if self.index == self.levels.len() {
                    log::info!("Campaign completed, score {}", self.session.score);
                    return self.finish(Progress::Completed);
                }
                log::info!("Level {} won, starting level {}", won, self.index);
                self.restart();
                Progress::LevelWon { index: won }
            }
            Status::Lost | Status::Playing => {
                if self.session.is_game_over() {
                    log::info!("Game over at level {}, score {}", self.index, self.session.score);
                    return self.finish(Progress::GameOver);
                }
                log::info!("Level {} lost, {} lives left", self.index, self.session.lives);
                self.restart();
                Progress::LevelLost { index: self.index }
            }
        }
    }

    fn restart(&mut self) {
        self.runner = LevelRunner::new(
            self.levels[self.index].clone(),
            self.tuning.clone(),
            self.session.score,
        );
    }

    fn finish(&mut self, progress: Progress) -> Progress {
        self.finished = Some(progress);
        progress
    }
}
