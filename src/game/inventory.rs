/// Inventory weight accounting and load classification
use crate::config::GameConfig;
use crate::game::state::GameState;
use crate::game::types::Item;

// ============================================================================
// Weight Operations
// ============================================================================

/// Calculate total weight of the listed item ids.
///
/// Only the listed items count: a carried container contributes its own
/// weight, not the weight of whatever is inside it.
pub fn calculate_total_weight<'a>(
    item_ids: &[String],
    get_item: impl Fn(&str) -> Option<&'a Item>,
) -> u32 {
    item_ids
        .iter()
        .map(|id| get_item(id).map(|item| item.weight).unwrap_or(0))
        .sum()
}

/// Weight queries against the player's inventory.
#[derive(Debug, Clone)]
pub struct InventoryService {
    light_load_threshold: u32,
}

impl InventoryService {
    pub fn new(light_load_threshold: u32) -> Self {
        Self {
            light_load_threshold,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.light_load_threshold)
    }

    pub fn threshold(&self) -> u32 {
        self.light_load_threshold
    }

    pub fn total_weight(&self, state: &GameState) -> u32 {
        calculate_total_weight(state.inventory(), |id| state.item(id))
    }

    /// At or under the threshold.
    pub fn is_light_load(&self, state: &GameState) -> bool {
        self.total_weight(state) <= self.light_load_threshold
    }

    pub fn is_heavy_load(&self, state: &GameState) -> bool {
        !self.is_light_load(state)
    }

    /// Would picking up `candidate_id` push the load over the threshold?
    ///
    /// Used when judging weight-gated exits; taking items is never refused
    /// on weight. An item already carried adds nothing.
    pub fn would_exceed_limit(&self, state: &GameState, candidate_id: &str) -> bool {
        let extra = if state.is_in_inventory(candidate_id) {
            0
        } else {
            state.item(candidate_id).map(|item| item.weight).unwrap_or(0)
        };
        self.total_weight(state) + extra > self.light_load_threshold
    }

    /// Format inventory for display
    pub fn format_inventory(&self, state: &GameState) -> String {
        if state.inventory().is_empty() {
            return "You are empty-handed.".to_string();
        }

        let mut lines = vec!["You are carrying:".to_string()];
        for id in state.inventory() {
            let Some(item) = state.item(id) else {
                continue;
            };
            let mut line = format!("  {}", item.name);
            if item.is_container() {
                if item.state.open {
                    let inside: Vec<&str> = item
                        .state
                        .contents
                        .iter()
                        .filter_map(|child| state.item(child).map(|c| c.name.as_str()))
                        .collect();
                    if !inside.is_empty() {
                        line.push_str(&format!(" (containing {})", inside.join(", ")));
                    }
                } else {
                    line.push_str(" (closed)");
                }
            }
            lines.push(line);
        }
        lines.push(format!(
            "Load: {}/{}",
            self.total_weight(state),
            self.light_load_threshold
        ));
        lines.join("\n")
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
