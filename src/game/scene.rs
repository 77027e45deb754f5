//! Scene service: item membership, exit resolution and movement.
//!
//! This module knows nothing about scoring. The command processor decides
//! when a scene counts as visited and asks the scoring service for bonuses.

use log::{debug, info};

use crate::game::errors::GameError;
use crate::game::inventory::InventoryService;
use crate::game::state::GameState;
use crate::game::types::{Direction, Exit, ExitCondition, ItemLocation};

/// Result of trying to walk in a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: String, to: String },
    Blocked { message: String },
    NoExit { direction: Direction },
}

#[derive(Debug, Clone)]
pub struct SceneService {
    inventory: InventoryService,
}

impl SceneService {
    pub fn new(inventory: InventoryService) -> Self {
        Self { inventory }
    }

    /// Evaluate an exit condition against flags, load and item state.
    pub fn condition_holds(&self, state: &GameState, condition: &ExitCondition) -> bool {
        match condition {
            ExitCondition::Flag(name) => state.flag(name),
            ExitCondition::NotFlag(name) => !state.flag(name),
            ExitCondition::LightLoad => self.inventory.is_light_load(state),
            ExitCondition::HeavyLoad => self.inventory.is_heavy_load(state),
            ExitCondition::ItemOpen(item_id) => state
                .item(item_id)
                .map(|item| item.state.open)
                .unwrap_or(false),
            ExitCondition::All(parts) => parts.iter().all(|part| self.condition_holds(state, part)),
            ExitCondition::Never => false,
        }
    }

    pub fn is_traversable(&self, state: &GameState, exit: &Exit) -> bool {
        exit.condition
            .as_ref()
            .map(|condition| self.condition_holds(state, condition))
            .unwrap_or(true)
    }

    /// Exits whose condition currently holds, in direction order.
    pub fn get_exits(&self, state: &GameState, scene_id: &str) -> Vec<(Direction, Exit)> {
        state
            .scene(scene_id)
            .map(|scene| {
                scene
                    .exits
                    .iter()
                    .filter(|(_, exit)| self.is_traversable(state, exit))
                    .map(|(direction, exit)| (*direction, exit.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Item ids listed in a scene, insertion order.
    pub fn get_scene_items(&self, state: &GameState, scene_id: &str) -> Vec<String> {
        state
            .scene(scene_id)
            .map(|scene| scene.items.iter().map(|entry| entry.item_id.clone()).collect())
            .unwrap_or_default()
    }

    /// Scene items the player can see (both the listing and the item visible).
    pub fn visible_scene_items(&self, state: &GameState, scene_id: &str) -> Vec<String> {
        state
            .scene(scene_id)
            .map(|scene| {
                scene
                    .items
                    .iter()
                    .filter(|entry| entry.visible)
                    .filter(|entry| state.item(&entry.item_id).map(|i| i.visible).unwrap_or(false))
                    .map(|entry| entry.item_id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn add_item_to_scene(
        &self,
        state: &mut GameState,
        scene_id: &str,
        item_id: &str,
    ) -> Result<(), GameError> {
        state.relocate(item_id, ItemLocation::Scene(scene_id.to_string()))
    }

    /// Take an item out of a scene and out of play. Returns false when the
    /// item was not in that scene.
    pub fn remove_item_from_scene(
        &self,
        state: &mut GameState,
        scene_id: &str,
        item_id: &str,
    ) -> Result<bool, GameError> {
        let in_scene = state
            .scene(scene_id)
            .ok_or_else(|| GameError::SceneNotFound(scene_id.to_string()))?
            .contains_item(item_id);
        if !in_scene {
            return Ok(false);
        }
        state.relocate(item_id, ItemLocation::Nowhere)?;
        Ok(true)
    }

    /// First-visit text until the scene is marked visited, then the regular one.
    pub fn get_scene_description(&self, state: &GameState, scene_id: &str) -> Result<String, GameError> {
        let scene = state
            .scene(scene_id)
            .ok_or_else(|| GameError::SceneNotFound(scene_id.to_string()))?;
        let text = match (&scene.first_visit_description, scene.visited) {
            (Some(first), false) => first.clone(),
            _ => scene.description.clone(),
        };
        Ok(text)
    }

    /// Try to leave the current scene.
    pub fn move_player(&self, state: &mut GameState, direction: Direction) -> Result<MoveOutcome, GameError> {
        let from = state.current_scene_id().to_string();
        let exit = match state.current_scene().exits.get(&direction) {
            Some(exit) => exit.clone(),
            None => {
                debug!("No exit {} from {}", direction, from);
                return Ok(MoveOutcome::NoExit { direction });
            }
        };

        if !self.is_traversable(state, &exit) {
            debug!("Exit {} from {} blocked by {:?}", direction, from, exit.condition);
            let message = exit
                .failure_message
                .clone()
                .unwrap_or_else(|| "You can't go that way.".to_string());
            return Ok(MoveOutcome::Blocked { message });
        }

        state.set_current_scene(&exit.target)?;
        info!("Moved {} from {} to {}", direction, from, exit.target);
        Ok(MoveOutcome::Moved {
            from,
            to: exit.target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Item, Scene, World};

    fn test_state() -> GameState {
        let world = World::new()
            .with_scene(
                Scene::new("studio", "Studio", "Paint-splattered.")
                    .with_exit(
                        Direction::Up,
                        Exit::to("kitchen").when(
                            ExitCondition::LightLoad,
                            "The chimney is too narrow for you and all of your baggage.",
                        ),
                    )
                    .with_exit(
                        Direction::North,
                        Exit::to("gallery").when(ExitCondition::Flag("door_open".to_string()), "The door is closed."),
                    )
                    .with_exit(Direction::South, Exit::to("gallery"))
                    .with_item("easel"),
            )
            .with_scene(Scene::new("kitchen", "Kitchen", "A kitchen."))
            .with_scene(
                Scene::new("gallery", "Gallery", "Paintings hang here.")
                    .with_first_visit("You enter the gallery for the first time.", 4),
            )
            .with_item(Item::new("easel", "easel").portable(30))
            .with_item(Item::new("brush", "brush").portable(1).starting_in("inventory"));
        GameState::new(world, "studio").expect("state")
    }

    fn service() -> SceneService {
        SceneService::new(InventoryService::new(15))
    }

    #[test]
    fn test_get_exits_filters_conditions() {
        let mut state = test_state();
        let scenes = service();
        let dirs: Vec<Direction> = scenes.get_exits(&state, "studio").into_iter().map(|(d, _)| d).collect();
        assert_eq!(dirs, vec![Direction::South, Direction::Up]);

        state.set_flag("door_open", true);
        let dirs: Vec<Direction> = scenes.get_exits(&state, "studio").into_iter().map(|(d, _)| d).collect();
        assert_eq!(dirs, vec![Direction::North, Direction::South, Direction::Up]);
    }

    #[test]
    fn test_weight_gated_exit() {
        let mut state = test_state();
        let scenes = service();
        state.relocate("easel", ItemLocation::Inventory).expect("take easel");

        let outcome = scenes.move_player(&mut state, Direction::Up).expect("move");
        assert_eq!(
            outcome,
            MoveOutcome::Blocked {
                message: "The chimney is too narrow for you and all of your baggage.".to_string()
            }
        );
        assert_eq!(state.current_scene_id(), "studio");

        state
            .relocate("easel", ItemLocation::Scene("studio".to_string()))
            .expect("drop easel");
        let outcome = scenes.move_player(&mut state, Direction::Up).expect("move");
        assert!(matches!(outcome, MoveOutcome::Moved { ref to, .. } if to == "kitchen"));
        assert_eq!(state.current_scene_id(), "kitchen");
    }

    #[test]
    fn test_no_exit() {
        let mut state = test_state();
        let outcome = service().move_player(&mut state, Direction::West).expect("move");
        assert_eq!(outcome, MoveOutcome::NoExit { direction: Direction::West });
    }

    #[test]
    fn test_exit_resolution_is_deterministic() {
        let state = test_state();
        let scenes = service();
        let first = scenes.get_exits(&state, "studio");
        let second = scenes.get_exits(&state, "studio");
        assert_eq!(first, second);
    }

    #[test]
    fn test_description_switches_after_visit() {
        let mut state = test_state();
        let scenes = service();
        assert_eq!(
            scenes.get_scene_description(&state, "gallery").expect("desc"),
            "You enter the gallery for the first time."
        );
        state.mark_visited("gallery").expect("visit");
        assert_eq!(
            scenes.get_scene_description(&state, "gallery").expect("desc"),
            "Paintings hang here."
        );
    }

    #[test]
    fn test_scene_membership() {
        let mut state = test_state();
        let scenes = service();
        scenes.add_item_to_scene(&mut state, "studio", "brush").expect("add");
        assert_eq!(scenes.get_scene_items(&state, "studio"), vec!["easel", "brush"]);
        assert!(!state.is_in_inventory("brush"));

        assert!(scenes.remove_item_from_scene(&mut state, "studio", "easel").expect("remove"));
        assert!(!scenes.remove_item_from_scene(&mut state, "studio", "easel").expect("remove"));
        assert_eq!(scenes.get_scene_items(&state, "studio"), vec!["brush"]);
        assert!(state.check_invariants().is_empty());
    }
}
