use gempath_types::map::{Cell, SwitchState};

/// A short English description of a cell, for tooltips and legends.
pub fn describe_cell(cell: &Cell) -> String {
    if cell.is_start {
        return match cell.direction {
            Some(direction) => format!("Start (facing {direction})"),
            None => "Start (unknown facing)".to_string(),
        };
    }
    if cell.has_gem {
        return "Gem".to_string();
    }
    match cell.switch_state {
        Some(SwitchState::Open) => return "Switch (open)".to_string(),
        Some(SwitchState::Closed) => return "Switch (closed)".to_string(),
        None => {}
    }
    if let Some(id) = cell.warp_id {
        return format!("Warp portal W{id}");
    }
    if cell.is_wall() {
        return "Impassable block".to_string();
    }
    match cell.token.trim() {
        "" => "Floor".to_string(),
        custom => format!("Custom token: {custom}"),
    }
}
