//! Grid map model shared by the map parser and the simulator.
//!
//! The model is immutable once built. Gem and switch state that changes
//! during a run lives in the simulator's own copies.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Legend
// ══════════════════════════════════════════════════════════════════════════════

pub const WALL_GLYPH: &str = "止";
pub const GEM_GLYPH: &str = "♦";
pub const SWITCH_OPEN_GLYPH: &str = "〇";
pub const SWITCH_CLOSED_GLYPH: &str = "●";
/// Start arrows in `up, down, left, right` order.
pub const START_ARROWS: [&str; 4] = ["↑", "↓", "←", "→"];
/// Prefix of portal tokens (`W1`, `W2`, ...).
pub const PORTAL_PREFIX: char = 'W';

// ══════════════════════════════════════════════════════════════════════════════
// Direction & Position
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Clockwise rotation order.
    pub const ROTATION: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn rotation_index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    pub fn turn_right(self) -> Self {
        Self::ROTATION[(self.rotation_index() + 1) % 4]
    }

    pub fn turn_left(self) -> Self {
        Self::ROTATION[(self.rotation_index() + 3) % 4]
    }

    /// Unit vector as `(row_delta, col_delta)`.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    pub fn from_arrow(token: &str) -> Option<Self> {
        match token {
            "↑" => Some(Self::Up),
            "↓" => Some(Self::Down),
            "←" => Some(Self::Left),
            "→" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Up => START_ARROWS[0],
            Self::Down => START_ARROWS[1],
            Self::Left => START_ARROWS[2],
            Self::Right => START_ARROWS[3],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A zero-based grid coordinate. Ordered row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The `"row,col"` key form used by hosts.
    pub fn key(self) -> String {
        format!("{},{}", self.row, self.col)
    }

    /// Inverse of [`Position::key`].
    pub fn from_key(key: &str) -> Option<Position> {
        let (row, col) = key.split_once(',')?;
        Some(Position::new(row.trim().parse().ok()?, col.trim().parse().ok()?))
    }

    /// The neighbouring coordinate in `direction`, or `None` above/left of
    /// the origin. Callers still need a bounds check on the far edges.
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.delta();
        let row = usize::try_from(self.row as i64 + dr).ok()?;
        let col = usize::try_from(self.col as i64 + dc).ok()?;
        Some(Position::new(row, col))
    }
}

/// 1-based `(row, col)` as shown to learners.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row + 1, self.col + 1)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Cells
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Floor,
    Wall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    Open,
    Closed,
}

impl SwitchState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// The raw token from the map text.
    pub token: String,
    pub row: usize,
    pub col: usize,
    #[serde(rename = "type")]
    pub kind: CellKind,
    pub is_start: bool,
    pub direction: Option<Direction>,
    pub has_gem: bool,
    pub switch_state: Option<SwitchState>,
    pub warp_id: Option<u32>,
}

impl Cell {
    /// A plain floor cell carrying `token`.
    pub fn floor(token: impl Into<String>, row: usize, col: usize) -> Self {
        Self {
            token: token.into(),
            row,
            col,
            kind: CellKind::Floor,
            is_start: false,
            direction: None,
            has_gem: false,
            switch_state: None,
            warp_id: None,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn is_wall(&self) -> bool {
        self.kind == CellKind::Wall
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Map
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapModel {
    pub grid: Vec<Vec<Cell>>,
    pub rows: usize,
    pub columns: usize,
    /// Absent only when parsed with `allow_missing_start` or `allow_empty`.
    pub start: Option<Cell>,
    #[serde(with = "keyed_set")]
    pub gems: BTreeSet<Position>,
    #[serde(with = "keyed_map")]
    pub switches: BTreeMap<Position, SwitchState>,
    /// Portal id → cells carrying that id, in row-major order.
    pub portals: BTreeMap<u32, Vec<Position>>,
}

impl MapModel {
    /// A map with no cells.
    pub fn empty() -> Self {
        Self {
            grid: Vec::new(),
            rows: 0,
            columns: 0,
            start: None,
            gems: BTreeSet::new(),
            switches: BTreeMap::new(),
            portals: BTreeMap::new(),
        }
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.grid.get(pos.row)?.get(pos.col)
    }

    /// The cell one step from `from` in `direction`, or `None` off the grid.
    pub fn neighbor(&self, from: Position, direction: Direction) -> Option<&Cell> {
        self.cell(from.step(direction)?)
    }

    /// Off-grid counts as blocked.
    pub fn is_blocked(&self, from: Position, direction: Direction) -> bool {
        self.neighbor(from, direction).is_none_or(Cell::is_wall)
    }

    /// The other end of portal `warp_id` as seen from `from`.
    pub fn portal_partner(&self, warp_id: u32, from: Position) -> Option<Position> {
        self.portals
            .get(&warp_id)?
            .iter()
            .copied()
            .find(|&p| p != from)
    }

    pub fn total_gems(&self) -> usize {
        self.gems.len()
    }

    pub fn total_switches(&self) -> usize {
        self.switches.len()
    }

    /// Re-emit the tab-delimited map text from the cell tokens.
    pub fn to_text(&self) -> String {
        self.grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.token.as_str())
                    .collect::<Vec<_>>()
                    .join("\t")
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Gem positions as a list of `"row,col"` keys.
mod keyed_set {
    use super::Position;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeSet;

    pub fn serialize<S: Serializer>(set: &BTreeSet<Position>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(set.iter().map(|p| p.key()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeSet<Position>, D::Error> {
        Vec::<String>::deserialize(d)?
            .iter()
            .map(|k| {
                Position::from_key(k)
                    .ok_or_else(|| D::Error::custom(format!("bad position key: {k}")))
            })
            .collect()
    }
}

/// Switch states as an object keyed by `"row,col"`.
mod keyed_map {
    use super::{Position, SwitchState};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<Position, SwitchState>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        s.collect_map(map.iter().map(|(p, state)| (p.key(), state)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<Position, SwitchState>, D::Error> {
        BTreeMap::<String, SwitchState>::deserialize(d)?
            .into_iter()
            .map(|(k, state)| {
                Position::from_key(&k)
                    .map(|p| (p, state))
                    .ok_or_else(|| D::Error::custom(format!("bad position key: {k}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycle() {
        assert_eq!(Direction::Up.turn_right(), Direction::Right);
        assert_eq!(Direction::Left.turn_right(), Direction::Up);
        assert_eq!(Direction::Up.turn_left(), Direction::Left);
        assert_eq!(Direction::Right.turn_left(), Direction::Up);
        for d in Direction::ROTATION {
            assert_eq!(d.turn_left().turn_right(), d);
            assert_eq!(d.turn_right().turn_right().turn_right().turn_right(), d);
        }
    }

    #[test]
    fn test_arrows_round_trip() {
        for d in Direction::ROTATION {
            assert_eq!(Direction::from_arrow(d.arrow()), Some(d));
        }
        assert_eq!(Direction::from_arrow("^"), None);
    }

    #[test]
    fn test_position_step_clamps_at_origin() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(origin.step(Direction::Right), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_position_display_is_one_based() {
        assert_eq!(Position::new(0, 3).to_string(), "(1, 4)");
        assert_eq!(Position::new(2, 5).key(), "2,5");
    }

    #[test]
    fn test_position_key_round_trip() {
        assert_eq!(Position::from_key("2,5"), Some(Position::new(2, 5)));
        assert_eq!(Position::from_key("2"), None);
        assert_eq!(Position::from_key("a,1"), None);
    }

    #[test]
    fn test_map_serializes_keyed_positions() {
        let mut map = MapModel::empty();
        map.gems.insert(Position::new(1, 2));
        let switch = Position::new(0, 3);
        map.switches.insert(switch, SwitchState::Closed);
        let pair = vec![Position::new(0, 0), Position::new(1, 1)];
        map.portals.insert(4, pair);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["gems"][0], "1,2");
        assert_eq!(json["switches"]["0,3"], "closed");
        assert_eq!(json["portals"]["4"][1]["col"], 1);
        let back: MapModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_switch_toggle() {
        assert_eq!(SwitchState::Open.toggled(), SwitchState::Closed);
        assert_eq!(SwitchState::Closed.toggled(), SwitchState::Open);
    }

    #[test]
    fn test_empty_map_blocks_everything() {
        let map = MapModel::empty();
        assert!(map.is_blocked(Position::new(0, 0), Direction::Right));
        assert_eq!(map.to_text(), "");
    }
}
