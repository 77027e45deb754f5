//! Score awards for first visits and treasure deposits.
//!
//! Every award is guarded so it happens at most once per game:
//! first-visit bonuses by the scene's visited flag, deposits by a
//! `treasure_deposited_<item>` flag. Taking a treasure only records a
//! `treasure_found_<item>` flag and is worth nothing; points come from
//! depositing. Awards are capped at the world's maximum score.

use log::{debug, info};

use crate::config::GameConfig;
use crate::game::state::GameState;
use crate::game::types::{Item, Scene};

pub fn treasure_found_flag(item_id: &str) -> String {
    format!("treasure_found_{}", item_id)
}

pub fn treasure_deposited_flag(item_id: &str) -> String {
    format!("treasure_deposited_{}", item_id)
}

/// Best possible score: every item's highest deposit value plus every
/// scene's first-visit bonus.
pub fn compute_max_score<'a>(
    items: impl Iterator<Item = &'a Item>,
    scenes: impl Iterator<Item = &'a Scene>,
) -> i32 {
    let deposits: u32 = items.map(Item::max_deposit_value).sum();
    let visits: u32 = scenes.map(|scene| scene.first_visit_points).sum();
    (deposits + visits) as i32
}

#[derive(Debug, Clone)]
pub struct ScoringService {
    scoring_containers: Vec<String>,
}

impl ScoringService {
    pub fn new(scoring_containers: Vec<String>) -> Self {
        Self { scoring_containers }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.scoring_containers.clone())
    }

    pub fn is_scoring_container(&self, container_id: &str) -> bool {
        self.scoring_containers.iter().any(|id| id == container_id)
    }

    /// Points an item earns when placed in `container_id`, before the
    /// once-only guard. An explicit `depositValues` entry wins; otherwise
    /// `treasurePoints` applies to the configured scoring containers.
    pub fn deposit_value(&self, item: &Item, container_id: &str) -> u32 {
        if let Some(points) = item.properties.deposit_values.get(container_id) {
            return *points;
        }
        if self.is_scoring_container(container_id) {
            return item.properties.treasure_points.unwrap_or(0);
        }
        0
    }

    /// Award the scene's first-visit bonus if it has not been visited yet.
    /// The caller flips the visited flag afterwards.
    pub fn on_first_visit(&self, state: &mut GameState, scene_id: &str) -> i32 {
        if state.is_visited(scene_id) {
            return 0;
        }
        let points = state
            .scene(scene_id)
            .map(|scene| scene.first_visit_points)
            .unwrap_or(0);
        let awarded = self.award(state, points);
        if awarded > 0 {
            info!("First visit to {}: +{} points", scene_id, awarded);
        }
        awarded
    }

    /// Record that a treasure has been found. Always worth 0 points.
    pub fn on_take(&self, state: &mut GameState, item_id: &str) -> i32 {
        let is_treasure = state.item(item_id).map(Item::is_treasure).unwrap_or(false);
        if is_treasure {
            let flag = treasure_found_flag(item_id);
            if !state.flag(&flag) {
                debug!("Treasure {} found", item_id);
                state.set_flag(&flag, true);
            }
        }
        0
    }

    /// Award the deposit value the first time `item_id` lands in a container
    /// that values it, whether or not the item was ever taken.
    pub fn on_deposit(&self, state: &mut GameState, item_id: &str, container_id: &str) -> i32 {
        let value = match state.item(item_id) {
            Some(item) => self.deposit_value(item, container_id),
            None => return 0,
        };
        if value == 0 {
            return 0;
        }
        let flag = treasure_deposited_flag(item_id);
        if state.flag(&flag) {
            debug!("{} already deposited; no points", item_id);
            return 0;
        }
        state.set_flag(&flag, true);
        let awarded = self.award(state, value);
        info!("Deposited {} in {}: +{} points", item_id, container_id, awarded);
        awarded
    }

    fn award(&self, state: &mut GameState, points: u32) -> i32 {
        let headroom = (state.max_score() - state.score()).max(0);
        let awarded = (points as i32).min(headroom);
        if awarded > 0 {
            state.add_score(awarded);
        }
        awarded
    }
}
