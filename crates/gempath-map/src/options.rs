use serde::{Deserialize, Serialize};

/// Relaxations for previews of maps that are still being edited.
///
/// Final validation uses the default, which relaxes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapOptions {
    /// Accept a map with no start arrow. With several arrows, the last wins.
    pub allow_missing_start: bool,
    /// Accept portal ids that do not appear exactly twice.
    pub allow_unpaired_portals: bool,
    /// Return an empty model for blank input instead of failing.
    pub allow_empty: bool,
}

impl MapOptions {
    /// Everything relaxed, for live editor previews.
    pub fn preview() -> Self {
        Self {
            allow_missing_start: true,
            allow_unpaired_portals: true,
            allow_empty: true,
        }
    }
}
