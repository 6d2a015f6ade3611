//! Map text → [`MapModel`].

use std::collections::{BTreeMap, BTreeSet};

use crate::MapOptions;
use gempath_types::map::*;
use gempath_types::{ErrorCode, GempathError, Result};

/// Split on runs of line breaks, trim trailing whitespace, drop blank lines.
fn split_rows(text: &str) -> Vec<&str> {
    text.split(['\r', '\n'])
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Digits of a `W<digits>` portal token.
fn portal_digits(token: &str) -> Option<&str> {
    let digits = token.strip_prefix(PORTAL_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits)
}

/// Classify one token into a cell.
///
/// Fails only for a portal token whose id does not fit in a `u32`.
fn build_cell(token: &str, row: usize, col: usize) -> Result<Cell> {
    let mut cell = Cell::floor(token, row, col);
    if token.is_empty() {
        return Ok(cell);
    }
    if token == WALL_GLYPH {
        cell.kind = CellKind::Wall;
    } else if let Some(direction) = Direction::from_arrow(token) {
        cell.is_start = true;
        cell.direction = Some(direction);
    } else if token == GEM_GLYPH {
        cell.has_gem = true;
    } else if token == SWITCH_OPEN_GLYPH {
        cell.switch_state = Some(SwitchState::Open);
    } else if token == SWITCH_CLOSED_GLYPH {
        cell.switch_state = Some(SwitchState::Closed);
    } else if let Some(digits) = portal_digits(token) {
        let id = digits.parse::<u32>().map_err(|_| {
            GempathError::new(
                ErrorCode::INVALID_PORTAL_ID,
                format!("warp portal id is out of range: {token}"),
            )
        })?;
        cell.warp_id = Some(id);
    }
    Ok(cell)
}

/// Parse tab-delimited map text.
///
/// Fails on empty input, a missing or repeated start arrow, and portal ids
/// that do not appear exactly twice, unless `options` relaxes the check.
/// A portal id too large for a `u32` is always an error.
pub fn parse_map(text: &str, options: &MapOptions) -> Result<MapModel> {
    let lines = split_rows(text.trim_start_matches('\u{feff}'));
    if lines.is_empty() {
        if options.allow_empty {
            return Ok(MapModel::empty());
        }
        return Err(GempathError::new(ErrorCode::EMPTY_MAP, "the map is empty"));
    }

    let rows: Vec<Vec<&str>> = lines
        .iter()
        .map(|line| line.split('\t').collect())
        .collect();
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);

    let mut grid = Vec::with_capacity(rows.len());
    let mut starts = Vec::new();
    let mut gems = BTreeSet::new();
    let mut switches = BTreeMap::new();
    let mut portals: BTreeMap<u32, Vec<Position>> = BTreeMap::new();

    for (r, tokens) in rows.iter().enumerate() {
        let mut grid_row = Vec::with_capacity(columns);
        for c in 0..columns {
            let cell = build_cell(tokens.get(c).copied().unwrap_or(""), r, c)?;
            let pos = cell.position();
            if cell.is_start {
                starts.push(cell.clone());
            }
            if cell.has_gem {
                gems.insert(pos);
            }
            if let Some(state) = cell.switch_state {
                switches.insert(pos, state);
            }
            if let Some(id) = cell.warp_id {
                portals.entry(id).or_default().push(pos);
            }
            grid_row.push(cell);
        }
        grid.push(grid_row);
    }

    if !options.allow_missing_start {
        match starts.len() {
            0 => {
                return Err(GempathError::new(
                    ErrorCode::MISSING_START,
                    "the map needs a start arrow (one of ↑ ↓ ← →)",
                ))
            }
            1 => {}
            n => {
                return Err(GempathError::new(
                    ErrorCode::MULTIPLE_STARTS,
                    format!("the map must have exactly one start arrow (found {n})"),
                ))
            }
        }
    }

    if !options.allow_unpaired_portals {
        if let Some((id, cells)) = portals.iter().find(|(_, cells)| cells.len() != 2) {
            return Err(GempathError::new(
                ErrorCode::UNPAIRED_PORTAL,
                format!(
                    "warp portal W{id} must appear in exactly 2 cells (found {})",
                    cells.len()
                ),
            ));
        }
    }

    log::debug!(
        "parsed map: {}x{}, {} gems, {} switches, {} portal groups",
        grid.len(),
        columns,
        gems.len(),
        switches.len(),
        portals.len()
    );

    Ok(MapModel {
        rows: grid.len(),
        columns,
        grid,
        start: starts.pop(),
        gems,
        switches,
        portals,
    })
}
