//! Game state store: the single mutable aggregate for one session.
//!
//! Item membership is kept in three places that must agree: the item's own
//! `location`, the owning list (inventory, a scene's item list or a
//! container's `contents`), and nowhere else. Only [`GameState::relocate`]
//! moves items, so the lists cannot drift apart.

use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};

use crate::game::errors::GameError;
use crate::game::scoring::compute_max_score;
use crate::game::types::{
    ExitCondition, Item, ItemLocation, Scene, SceneItem, World, INVENTORY_LOCATION,
};

#[derive(Debug, Clone)]
pub struct GameState {
    current_scene: String,
    inventory: Vec<String>,
    items: BTreeMap<String, Item>,
    scenes: BTreeMap<String, Scene>,
    score: i32,
    moves: u32,
    flags: BTreeMap<String, bool>,
    max_score: i32,
}

impl GameState {
    /// Build runtime state from loaded world data and place every item at its
    /// starting location.
    ///
    /// Placement order: scene item lists, then container initial contents,
    /// then each item's `initial_location`. The first placement wins; later
    /// conflicting ones are logged and ignored.
    pub fn new(world: World, starting_scene: &str) -> Result<Self, GameError> {
        let mut items = BTreeMap::new();
        for item in world.items {
            if items.contains_key(&item.id) {
                return Err(GameError::InvalidData(format!(
                    "duplicate item id '{}'",
                    item.id
                )));
            }
            items.insert(item.id.clone(), item);
        }

        let mut scenes = BTreeMap::new();
        let mut listed: Vec<(String, SceneItem)> = Vec::new();
        for mut scene in world.scenes {
            if scenes.contains_key(&scene.id) {
                return Err(GameError::InvalidData(format!(
                    "duplicate scene id '{}'",
                    scene.id
                )));
            }
            for entry in scene.items.drain(..) {
                listed.push((scene.id.clone(), entry));
            }
            scene.visited = false;
            scenes.insert(scene.id.clone(), scene);
        }

        if !scenes.contains_key(starting_scene) {
            return Err(GameError::SceneNotFound(starting_scene.to_string()));
        }
        close_dangling_exits(&mut scenes);

        let mut state = Self {
            current_scene: starting_scene.to_string(),
            inventory: Vec::new(),
            items,
            scenes,
            score: 0,
            moves: 0,
            flags: BTreeMap::new(),
            max_score: 0,
        };

        let mut initial_contents = Vec::new();
        for item in state.items.values_mut() {
            item.location = ItemLocation::Nowhere;
            for child in item.state.contents.drain(..) {
                initial_contents.push((item.id.clone(), child));
            }
        }

        for (scene_id, entry) in listed {
            if !state.can_place(&entry.item_id, &scene_id) {
                continue;
            }
            state.attach(&entry.item_id, ItemLocation::Scene(scene_id), entry.visible)?;
        }

        for (container_id, child) in initial_contents {
            if !state.can_place(&child, &container_id) {
                continue;
            }
            if !state.is_container(&container_id) || container_id == child {
                warn!(
                    "Item {} listed inside {} which cannot hold it; leaving it out of play",
                    child, container_id
                );
                continue;
            }
            state.attach(&child, ItemLocation::Container(container_id), true)?;
        }

        let pending: Vec<(String, String)> = state
            .items
            .values()
            .filter(|item| item.location == ItemLocation::Nowhere)
            .filter_map(|item| {
                item.initial_location
                    .as_ref()
                    .map(|loc| (item.id.clone(), loc.clone()))
            })
            .collect();

        for (item_id, raw) in pending {
            match state.location_from_raw(&raw, &item_id) {
                Some(location) => state.attach(&item_id, location, true)?,
                None => debug!(
                    "Item {} has unplaceable initial location '{}'; left out of play",
                    item_id, raw
                ),
            }
        }

        state.max_score = compute_max_score(state.items.values(), state.scenes.values());
        debug!(
            "Game state ready: {} items, {} scenes, max score {}",
            state.items.len(),
            state.scenes.len(),
            state.max_score
        );
        Ok(state)
    }

    fn can_place(&self, item_id: &str, owner: &str) -> bool {
        match self.items.get(item_id) {
            None => {
                warn!("{} lists unknown item '{}'", owner, item_id);
                false
            }
            Some(item) if item.location != ItemLocation::Nowhere => {
                warn!(
                    "Item {} already placed at {}; ignoring duplicate placement in {}",
                    item_id,
                    item.location.describe(),
                    owner
                );
                false
            }
            Some(_) => true,
        }
    }

    fn location_from_raw(&self, raw: &str, item_id: &str) -> Option<ItemLocation> {
        if raw == INVENTORY_LOCATION {
            Some(ItemLocation::Inventory)
        } else if self.scenes.contains_key(raw) {
            Some(ItemLocation::Scene(raw.to_string()))
        } else if raw != item_id && self.is_container(raw) {
            Some(ItemLocation::Container(raw.to_string()))
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Scenes
    // ------------------------------------------------------------------

    pub fn current_scene_id(&self) -> &str {
        &self.current_scene
    }

    pub fn current_scene(&self) -> &Scene {
        // starting scene is validated in new() and set_current_scene() checks targets
        &self.scenes[&self.current_scene]
    }

    pub fn set_current_scene(&mut self, scene_id: &str) -> Result<(), GameError> {
        if !self.scenes.contains_key(scene_id) {
            return Err(GameError::SceneNotFound(scene_id.to_string()));
        }
        self.current_scene = scene_id.to_string();
        Ok(())
    }

    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.get(scene_id)
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    pub fn is_visited(&self, scene_id: &str) -> bool {
        self.scenes.get(scene_id).map(|s| s.visited).unwrap_or(false)
    }

    /// Flip the visited flag. Also records a `visited_<id>` game flag so exit
    /// conditions can refer to it.
    pub fn mark_visited(&mut self, scene_id: &str) -> Result<(), GameError> {
        let scene = self
            .scenes
            .get_mut(scene_id)
            .ok_or_else(|| GameError::SceneNotFound(scene_id.to_string()))?;
        scene.visited = true;
        self.flags.insert(format!("visited_{}", scene_id), true);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.get(item_id)
    }

    /// Mutable access for state and flag changes. Location and contents must
    /// only be changed through [`GameState::relocate`].
    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.get_mut(item_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn is_in_inventory(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|id| id == item_id)
    }

    pub fn is_container(&self, item_id: &str) -> bool {
        self.items
            .get(item_id)
            .map(|item| item.is_container())
            .unwrap_or(false)
    }

    pub fn contents_of(&self, container_id: &str) -> &[String] {
        self.items
            .get(container_id)
            .map(|item| item.state.contents.as_slice())
            .unwrap_or(&[])
    }

    /// True when `item_id` is `container_id` or encloses it at any depth.
    pub fn encloses(&self, item_id: &str, container_id: &str) -> bool {
        let mut cursor = container_id.to_string();
        loop {
            if cursor == item_id {
                return true;
            }
            match self.items.get(&cursor).map(|i| &i.location) {
                Some(ItemLocation::Container(parent)) => cursor = parent.clone(),
                _ => return false,
            }
        }
    }

    /// Move an item to a new location, keeping every membership list in step.
    ///
    /// All checks run before anything is detached, so an error leaves the
    /// state untouched.
    pub fn relocate(&mut self, item_id: &str, destination: ItemLocation) -> Result<(), GameError> {
        if !self.items.contains_key(item_id) {
            return Err(GameError::ItemNotFound(item_id.to_string()));
        }
        match &destination {
            ItemLocation::Scene(scene_id) => {
                if !self.scenes.contains_key(scene_id) {
                    return Err(GameError::SceneNotFound(scene_id.clone()));
                }
            }
            ItemLocation::Container(container_id) => {
                if !self.items.contains_key(container_id) {
                    return Err(GameError::ItemNotFound(container_id.clone()));
                }
                if !self.is_container(container_id) {
                    return Err(GameError::Internal(format!(
                        "{} is not a container",
                        container_id
                    )));
                }
                if self.encloses(item_id, container_id) {
                    return Err(GameError::Internal(format!(
                        "{} cannot be placed inside itself",
                        item_id
                    )));
                }
            }
            ItemLocation::Inventory | ItemLocation::Nowhere => {}
        }

        let from = self.detach(item_id);
        debug!(
            "Relocating {}: {} -> {}",
            item_id,
            from.describe(),
            destination.describe()
        );
        self.attach(item_id, destination, true)
    }

    fn detach(&mut self, item_id: &str) -> ItemLocation {
        let from = match self.items.get_mut(item_id) {
            Some(item) => std::mem::take(&mut item.location),
            None => return ItemLocation::Nowhere,
        };
        match &from {
            ItemLocation::Scene(scene_id) => {
                if let Some(scene) = self.scenes.get_mut(scene_id) {
                    scene.items.retain(|entry| entry.item_id != item_id);
                }
            }
            ItemLocation::Inventory => self.inventory.retain(|id| id != item_id),
            ItemLocation::Container(container_id) => {
                if let Some(container) = self.items.get_mut(container_id) {
                    container.state.contents.retain(|id| id != item_id);
                }
            }
            ItemLocation::Nowhere => {}
        }
        from
    }

    fn attach(&mut self, item_id: &str, location: ItemLocation, visible: bool) -> Result<(), GameError> {
        match &location {
            ItemLocation::Scene(scene_id) => {
                let scene = self
                    .scenes
                    .get_mut(scene_id)
                    .ok_or_else(|| GameError::SceneNotFound(scene_id.clone()))?;
                scene.items.push(SceneItem {
                    item_id: item_id.to_string(),
                    visible,
                });
            }
            ItemLocation::Inventory => self.inventory.push(item_id.to_string()),
            ItemLocation::Container(container_id) => {
                let container = self
                    .items
                    .get_mut(container_id)
                    .ok_or_else(|| GameError::ItemNotFound(container_id.clone()))?;
                container.state.contents.push(item_id.to_string());
            }
            ItemLocation::Nowhere => {}
        }
        let item = self
            .items
            .get_mut(item_id)
            .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
        item.location = location;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Flags, score, moves
    // ------------------------------------------------------------------

    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }

    pub fn flags(&self) -> &BTreeMap<String, bool> {
        &self.flags
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Apply a raw score delta. Gameplay only ever passes non-negative
    /// deltas through the scoring service; debug harnesses may pass anything.
    pub fn add_score(&mut self, delta: i32) {
        self.score += delta;
    }

    pub fn max_score(&self) -> i32 {
        self.max_score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn increment_moves(&mut self) {
        self.moves += 1;
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// Report every membership inconsistency. Empty means healthy.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut memberships: BTreeMap<&str, usize> = BTreeMap::new();

        for id in &self.inventory {
            *memberships.entry(id.as_str()).or_default() += 1;
            match self.items.get(id) {
                Some(item) if item.location == ItemLocation::Inventory => {}
                Some(item) => problems.push(format!(
                    "{} is in inventory but located at {}",
                    id,
                    item.location.describe()
                )),
                None => problems.push(format!("inventory holds unknown item {}", id)),
            }
        }

        for scene in self.scenes.values() {
            for entry in &scene.items {
                *memberships.entry(entry.item_id.as_str()).or_default() += 1;
                let expected = ItemLocation::Scene(scene.id.clone());
                if self.items.get(&entry.item_id).map(|i| &i.location) != Some(&expected) {
                    problems.push(format!(
                        "scene {} lists {} which is located elsewhere",
                        scene.id, entry.item_id
                    ));
                }
            }
        }

        for container in self.items.values() {
            if !container.state.contents.is_empty() && !container.is_container() {
                problems.push(format!("{} holds items but is not a container", container.id));
            }
            for child in &container.state.contents {
                *memberships.entry(child.as_str()).or_default() += 1;
                let expected = ItemLocation::Container(container.id.clone());
                if self.items.get(child).map(|i| &i.location) != Some(&expected) {
                    problems.push(format!(
                        "{} lists {} which is located elsewhere",
                        container.id, child
                    ));
                }
            }
        }

        for item in self.items.values() {
            let count = memberships.get(item.id.as_str()).copied().unwrap_or(0);
            let expected = if item.location == ItemLocation::Nowhere { 0 } else { 1 };
            if count != expected {
                problems.push(format!(
                    "{} appears in {} membership lists (location {})",
                    item.id,
                    count,
                    item.location.describe()
                ));
            }
        }

        problems
    }
}

/// Exits whose target scene does not exist become passages that never open,
/// keeping their failure message, so the player can never be moved off the map.
fn close_dangling_exits(scenes: &mut BTreeMap<String, Scene>) {
    let known: BTreeSet<String> = scenes.keys().cloned().collect();
    for scene in scenes.values_mut() {
        for (direction, exit) in scene.exits.iter_mut() {
            if known.contains(&exit.target) || exit.condition == Some(ExitCondition::Never) {
                continue;
            }
            warn!(
                "Exit {} from {} leads to unknown scene '{}'; closing it",
                direction, scene.id, exit.target
            );
            exit.target = scene.id.clone();
            exit.condition = Some(ExitCondition::Never);
            if exit.failure_message.is_none() {
                exit.failure_message = Some("You can't go that way.".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Direction, Exit};

    fn small_world() -> World {
        World::new()
            .with_scene(
                Scene::new("field", "Field", "An open field.")
                    .with_item("mailbox")
                    .with_exit(Direction::North, Exit::to("forest"))
                    .with_points(0),
            )
            .with_scene(Scene::new("forest", "Forest", "Trees everywhere.").with_points(5))
            .with_item(Item::new("mailbox", "small mailbox").container(false))
            .with_item(Item::new("leaflet", "leaflet").portable(1).starting_in("mailbox"))
            .with_item(Item::new("sword", "elvish sword").portable(10).starting_in("inventory"))
            .with_item(Item::new("ghost", "ghost item").starting_in("unknown"))
    }

    #[test]
    fn test_initial_placement() {
        let state = GameState::new(small_world(), "field").expect("state");
        assert_eq!(state.current_scene_id(), "field");
        assert_eq!(state.inventory(), ["sword".to_string()]);
        assert_eq!(state.contents_of("mailbox"), ["leaflet".to_string()]);
        assert_eq!(
            state.item("mailbox").map(|i| i.location.clone()),
            Some(ItemLocation::Scene("field".to_string()))
        );
        assert_eq!(
            state.item("ghost").map(|i| i.location.clone()),
            Some(ItemLocation::Nowhere)
        );
        assert!(state.check_invariants().is_empty());
    }

    #[test]
    fn test_exit_to_unknown_scene_is_closed() {
        let world = small_world().with_scene(
            Scene::new("shed", "Shed", "A leaning shed.")
                .with_exit(Direction::East, Exit::to("orchard"))
                .with_exit(Direction::West, Exit::to("field")),
        );
        let state = GameState::new(world, "shed").expect("state");
        let shed = state.scene("shed").expect("shed");

        let east = &shed.exits[&Direction::East];
        assert_eq!(east.condition, Some(ExitCondition::Never));
        assert_eq!(east.target, "shed");
        assert_eq!(east.failure_message.as_deref(), Some("You can't go that way."));
        assert_eq!(shed.exits[&Direction::West].condition, None);
    }

    #[test]
    fn test_missing_starting_scene() {
        let err = GameState::new(small_world(), "nowhere").unwrap_err();
        assert!(matches!(err, GameError::SceneNotFound(id) if id == "nowhere"));
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let world = small_world().with_item(Item::new("sword", "another sword"));
        assert!(matches!(
            GameState::new(world, "field"),
            Err(GameError::InvalidData(_))
        ));
    }

    #[test]
    fn test_relocate_keeps_membership_exclusive() {
        let mut state = GameState::new(small_world(), "field").expect("state");
        state.relocate("leaflet", ItemLocation::Inventory).expect("take");
        assert!(state.is_in_inventory("leaflet"));
        assert!(state.contents_of("mailbox").is_empty());

        state
            .relocate("leaflet", ItemLocation::Scene("forest".to_string()))
            .expect("drop");
        assert!(!state.is_in_inventory("leaflet"));
        assert!(state.scene("forest").expect("forest").contains_item("leaflet"));
        assert!(state.check_invariants().is_empty());
    }

    #[test]
    fn test_relocate_rejects_cycles_without_mutation() {
        let mut state = GameState::new(small_world(), "field").expect("state");
        let err = state.relocate("mailbox", ItemLocation::Container("mailbox".to_string()));
        assert!(err.is_err());
        assert!(state.scene("field").expect("field").contains_item("mailbox"));
        assert!(state.check_invariants().is_empty());
    }

    #[test]
    fn test_relocate_into_non_container_fails() {
        let mut state = GameState::new(small_world(), "field").expect("state");
        assert!(state
            .relocate("leaflet", ItemLocation::Container("sword".to_string()))
            .is_err());
        assert_eq!(state.contents_of("mailbox"), ["leaflet".to_string()]);
    }

    #[test]
    fn test_mark_visited_sets_flag() {
        let mut state = GameState::new(small_world(), "field").expect("state");
        assert!(!state.is_visited("forest"));
        state.mark_visited("forest").expect("visit");
        assert!(state.is_visited("forest"));
        assert!(state.flag("visited_forest"));
    }

    #[test]
    fn test_max_score_includes_scene_bonuses() {
        let world = small_world().with_item(
            Item::new("coin", "coin")
                .portable(1)
                .with_deposit_value("mailbox", 12)
                .starting_in("forest"),
        );
        let state = GameState::new(world, "field").expect("state");
        assert_eq!(state.max_score(), 17);
    }
}
