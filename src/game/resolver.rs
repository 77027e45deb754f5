//! Target Resolution
//!
//! Maps a noun phrase typed by the player onto an item id, searching only
//! what the player can currently reach.
//!
//! ## Search order
//! 1. Inventory
//! 2. Contents of open containers the player holds or that sit in the
//!    current scene (nested open containers included)
//! 3. Visible items of the current scene
//!
//! Matching is case-insensitive and whole-phrase only: the phrase must equal
//! the item's id, name or one of its aliases. `trophy case` matches the id
//! `trophy_case`; `case` does not, unless it is a declared alias. When two
//! reachable items share an alias, the first one in search order wins.

use std::collections::VecDeque;

use crate::game::state::GameState;
use crate::game::types::Item;

/// Where a reachable item was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reach {
    Inventory,
    Container(String),
    Scene,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachableItem {
    pub id: String,
    pub reach: Reach,
}

/// Items the player can refer to right now, in resolution order.
#[derive(Debug, Clone, Default)]
pub struct VisibleSet {
    entries: Vec<ReachableItem>,
}

impl VisibleSet {
    pub fn gather(state: &GameState) -> Self {
        let mut set = VisibleSet::default();

        let scene_items: Vec<String> = state
            .current_scene()
            .items
            .iter()
            .filter(|entry| entry.visible)
            .filter(|entry| state.item(&entry.item_id).map(|i| i.visible).unwrap_or(false))
            .map(|entry| entry.item_id.clone())
            .collect();

        for id in state.inventory() {
            set.push(id, Reach::Inventory);
        }

        let mut open_containers: VecDeque<String> = state
            .inventory()
            .iter()
            .chain(scene_items.iter())
            .filter(|id| is_open_container(state, id))
            .cloned()
            .collect();

        while let Some(container_id) = open_containers.pop_front() {
            for child in state.contents_of(&container_id) {
                let visible = state.item(child).map(|i| i.visible).unwrap_or(false);
                if !visible || set.contains(child) {
                    continue;
                }
                set.push(child, Reach::Container(container_id.clone()));
                if is_open_container(state, child) {
                    open_containers.push_back(child.clone());
                }
            }
        }

        for id in &scene_items {
            set.push(id, Reach::Scene);
        }

        set
    }

    fn push(&mut self, id: &str, reach: Reach) {
        if !self.contains(id) {
            self.entries.push(ReachableItem {
                id: id.to_string(),
                reach,
            });
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn reach_of(&self, id: &str) -> Option<&Reach> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.reach)
    }

    pub fn entries(&self) -> &[ReachableItem] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    /// First reachable item whose names match `phrase`.
    pub fn resolve(&self, state: &GameState, phrase: &str) -> Option<String> {
        let wanted = match_key(phrase);
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| {
                state
                    .item(&entry.id)
                    .map(|item| item_matches(item, &wanted))
                    .unwrap_or(false)
            })
            .map(|entry| entry.id.clone())
    }
}

fn is_open_container(state: &GameState, id: &str) -> bool {
    state
        .item(id)
        .map(|item| item.is_container() && item.state.open)
        .unwrap_or(false)
}

/// Lowercase, trim and collapse whitespace. Underscores are kept, so the
/// result can be echoed back to the player as typed.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key: normalized, with underscores read as spaces.
fn match_key(name: &str) -> String {
    normalize_phrase(&name.replace('_', " "))
}

/// Whole-phrase match against id, name and aliases.
pub fn item_matches(item: &Item, wanted: &str) -> bool {
    item.match_names().any(|name| match_key(name) == wanted)
}

/// Does `phrase` name this item?
pub fn phrase_names_item(item: &Item, phrase: &str) -> bool {
    item_matches(item, &match_key(phrase))
}
