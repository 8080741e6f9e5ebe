//! Tile grid geometry
//!
//! A level is an immutable grid of tiles parsed from a text plan, plus the
//! actors seeded by that plan. All solidity questions ("can this box move
//! here?", "is the player standing on something?", "is it in lava?") are
//! answered here so movement and hazard checks never disagree.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use crate::error::LevelError;

/// Seed used by [`Level::parse`] for pickup bob phases
pub const DEFAULT_LEVEL_SEED: u64 = 0x5eed_b4e3;

/// Tolerance when deciding whether a box rests on top of a bridge
const BRIDGE_EPSILON: f32 = 1e-4;

/// Pipe sprite pieces; all of them are solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipePiece {
    TopLeft,
    TopRight,
    BodyLeft,
    BodyRight,
    UpperCornerLeft,
    LowerCornerLeft,
    TopHorizontalUpper,
    TopHorizontalLower,
    BodyHorizontalUpper,
    BodyHorizontalLower,
}

/// Non-solid scenery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecalKind {
    TankSectionLeft,
    TankSectionRight,
    TankBottomRight,
    TankBottomLeft,
    TankTopLeft,
    TankTopRight,
    Valve1,
    Valve2,
    Barrier,
    Pedestal,
}

/// Static tile categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    Stone,
    Metal,
    InvisibleWall,
    /// Kills the player on contact
    Lava,
    /// One-way platform, solid only when landed on from above
    Bridge,
    Exit,
    Pipe(PipePiece),
    Decal(DecalKind),
}

impl Tile {
    /// Map a plan character to a static tile (`None` for actor seeds and unknown chars)
    pub fn from_plan_char(ch: char) -> Option<Tile> {
        use DecalKind::*;
        use PipePiece::*;

        let tile = match ch {
            '.' => Tile::Empty,
            '#' => Tile::Wall,
            '%' => Tile::Stone,
            '?' => Tile::Metal,
            'Z' => Tile::InvisibleWall,
            '+' => Tile::Lava,
            'E' => Tile::Exit,
            'B' => Tile::Bridge,
            'T' => Tile::Pipe(TopLeft),
            'U' => Tile::Pipe(TopRight),
            '[' => Tile::Pipe(BodyLeft),
            ']' => Tile::Pipe(BodyRight),
            'L' => Tile::Pipe(UpperCornerLeft),
            'R' => Tile::Pipe(LowerCornerLeft),
            'I' => Tile::Pipe(TopHorizontalUpper),
            'P' => Tile::Pipe(TopHorizontalLower),
            'Q' => Tile::Pipe(BodyHorizontalUpper),
            'S' => Tile::Pipe(BodyHorizontalLower),
            'G' => Tile::Decal(TankSectionLeft),
            'H' => Tile::Decal(TankSectionRight),
            'J' => Tile::Decal(TankBottomRight),
            'K' => Tile::Decal(TankBottomLeft),
            'F' => Tile::Decal(TankTopLeft),
            'W' => Tile::Decal(TankTopRight),
            '1' => Tile::Decal(Valve1),
            '2' => Tile::Decal(Valve2),
            '3' => Tile::Decal(Barrier),
            '4' => Tile::Decal(Pedestal),
            _ => return None,
        };
        Some(tile)
    }

    /// Blocks movement exactly like a plain wall
    pub fn is_wall_equivalent(self) -> bool {
        matches!(
            self,
            Tile::Wall | Tile::Stone | Tile::Metal | Tile::InvisibleWall | Tile::Pipe(_)
        )
    }

    /// Whether a cell holding `self` satisfies a query for `category`
    ///
    /// Querying `Wall` matches every wall-equivalent tile; any other category
    /// matches only itself.
    pub fn matches(self, category: Tile) -> bool {
        if category == Tile::Wall {
            self.is_wall_equivalent()
        } else {
            self == category
        }
    }
}

/// Immutable tile grid plus the actors seeded from the plan
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    pub width: usize,
    pub height: usize,
    /// Row-major tiles, `rows[y][x]`
    rows: Vec<Vec<Tile>>,
    /// Actors extracted from the plan, in plan order (left to right, top to bottom)
    start_actors: Vec<Actor>,
}

impl Level {
    /// Parse a level plan with the default pickup seed
    pub fn parse(plan: &str) -> Result<Self, LevelError> {
        Self::parse_seeded(plan, DEFAULT_LEVEL_SEED)
    }

    /// Parse a level plan; `seed` drives the pickups' initial bob phases
    pub fn parse_seeded(plan: &str, seed: u64) -> Result<Self, LevelError> {
        let lines: Vec<&str> = plan
            .trim_matches(|c| c == '\n' || c == '\r')
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .collect();
        if lines.is_empty() || lines[0].is_empty() {
            return Err(LevelError::Empty);
        }

        let width = lines[0].chars().count();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut start_actors = Vec::new();
        let mut rows = Vec::with_capacity(lines.len());

        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LevelError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            let mut row = Vec::with_capacity(width);
            for (x, ch) in line.chars().enumerate() {
                let cell = Vec2::new(x as f32, y as f32);
                if let Some(tile) = Tile::from_plan_char(ch) {
                    row.push(tile);
                } else if let Some(actor) = Actor::from_plan_char(ch, cell, &mut rng) {
                    start_actors.push(actor);
                    row.push(Tile::Empty);
                } else {
                    return Err(LevelError::UnknownChar { ch, x, y });
                }
            }
            rows.push(row);
        }

        match start_actors.iter().filter(|a| a.is_player()).count() {
            0 => return Err(LevelError::MissingPlayer),
            1 => {}
            count => return Err(LevelError::MultiplePlayers { count }),
        }

        // Tall seeds spawn half a tile up; on row 0 that is outside the grid
        if let Some(actor) = start_actors.iter().find(|a| a.pos.y < 0.0) {
            return Err(LevelError::TallSpawnOnTopRow {
                name: actor.kind.name(),
                x: actor.pos.x as usize,
            });
        }

        log::debug!(
            "Parsed level {}x{} with {} actors",
            width,
            rows.len(),
            start_actors.len()
        );

        Ok(Self {
            width,
            height: rows.len(),
            rows,
            start_actors,
        })
    }

    /// Actors seeded by the plan
    pub fn start_actors(&self) -> &[Actor] {
        &self.start_actors
    }

    /// Tile at a cell; anything outside the grid reads as `Wall`
    pub fn tile_at(&self, x: i32, y: i32) -> Tile {
        if x < 0 || y < 0 {
            return Tile::Wall;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(Tile::Wall)
    }

    /// Visit every cell overlapped by the box, stopping at the first `true`
    fn any_cell(&self, pos: Vec2, size: Vec2, mut f: impl FnMut(i32, Tile) -> bool) -> bool {
        let x_start = pos.x.floor() as i32;
        let x_end = (pos.x + size.x).ceil() as i32;
        let y_start = pos.y.floor() as i32;
        let y_end = (pos.y + size.y).ceil() as i32;

        for y in y_start..y_end {
            for x in x_start..x_end {
                if f(y, self.tile_at(x, y)) {
                    return true;
                }
            }
        }
        false
    }

    /// True if any cell overlapped by the box matches `category`
    pub fn touches(&self, pos: Vec2, size: Vec2, category: Tile) -> bool {
        self.any_cell(pos, size, |_, tile| tile.matches(category))
    }

    /// True if the box at `to` overlaps a bridge whose top is at or below the
    /// box's bottom edge while it sits at `from`
    fn bridge_below(&self, from: Vec2, to: Vec2, size: Vec2) -> bool {
        let bottom = from.y + size.y;
        self.any_cell(to, size, |y, tile| {
            tile == Tile::Bridge && bottom <= y as f32 + BRIDGE_EPSILON
        })
    }

    /// Whether a box moving from `from` to `to` would be stopped by geometry
    pub fn blocks(&self, from: Vec2, to: Vec2, size: Vec2) -> bool {
        self.touches(to, size, Tile::Wall) || self.bridge_below(from, to, size)
    }

    /// Attempt to move an actor by `velocity * dt`
    ///
    /// Returns the new position if the destination is clear, otherwise the
    /// actor's current position. Non-interactable actors ignore geometry.
    pub fn move_actor(&self, actor: &Actor, velocity: Vec2, dt: f32) -> Vec2 {
        let candidate = actor.pos + velocity * dt;
        if !actor.interactable {
            return candidate;
        }
        if self.blocks(actor.pos, candidate, actor.size()) {
            actor.pos
        } else {
            candidate
        }
    }

    /// Whether a box is resting on solid ground or the top of a bridge
    pub fn is_grounded(&self, pos: Vec2, size: Vec2, probe: f32) -> bool {
        let below = pos + Vec2::new(0.0, probe);
        self.blocks(pos, below, size)
    }
}
